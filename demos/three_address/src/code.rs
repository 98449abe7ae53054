use std::fmt;

/// Operand of a three-address instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Constant(String),
    Name(String),
    /// Compiler temporary `t<n>`
    Temporary(usize),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Operand::Constant(value) => write!(f, "{}", value),
            Operand::Name(name) => write!(f, "{}", name),
            Operand::Temporary(n) => write!(f, "t{}", n),
        }
    }
}

/// Jump target, `None` until backpatched
pub type Label = Option<usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Copy {
        target: Operand,
        value: Operand,
    },
    Binary {
        target: Operand,
        left: Operand,
        op: String,
        right: Operand,
    },
    IfGoto {
        left: Operand,
        rel: String,
        right: Operand,
        target: Label,
    },
    Goto {
        target: Label,
    },
}

impl Instruction {
    fn target_mut(&mut self) -> Option<&mut Label> {
        match self {
            Instruction::IfGoto { target, .. } | Instruction::Goto { target } => Some(target),
            Instruction::Copy { .. } | Instruction::Binary { .. } => None,
        }
    }
}

fn label(target: &Label) -> String {
    target.map_or("_".to_owned(), |index| index.to_string())
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Instruction::Copy { target, value } => write!(f, "{} := {}", target, value),
            Instruction::Binary {
                target,
                left,
                op,
                right,
            } => write!(f, "{} := {} {} {}", target, left, op, right),
            Instruction::IfGoto {
                left,
                rel,
                right,
                target,
            } => write!(f, "if {} {} {} goto {}", left, rel, right, label(target)),
            Instruction::Goto { target } => write!(f, "goto {}", label(target)),
        }
    }
}

/// Emitted instructions, addressed by index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionBuffer {
    instructions: Vec<Instruction>,
}

impl InstructionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction and return its index
    pub fn emit(&mut self, instruction: Instruction) -> usize {
        self.instructions.push(instruction);
        self.instructions.len() - 1
    }

    /// Index the next emitted instruction will get
    pub fn next_index(&self) -> usize {
        self.instructions.len()
    }

    /// Point every jump listed in `list` at `target`
    ///
    /// Indices of instructions that are not jumps are ignored.
    pub fn backpatch(&mut self, list: &[usize], target: usize) {
        for &index in list {
            if let Some(label) = self.instructions.get_mut(index).and_then(Instruction::target_mut) {
                *label = Some(target);
            }
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Indices of jumps that were never backpatched
    pub fn unresolved(&self) -> Vec<usize> {
        self.instructions
            .iter()
            .enumerate()
            .filter(|(_, instruction)| match instruction {
                Instruction::IfGoto { target, .. } | Instruction::Goto { target } => target.is_none(),
                _ => false,
            })
            .map(|(index, _)| index)
            .collect()
    }
}

impl fmt::Display for InstructionBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        for (index, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{:>4}: {}", index, instruction)?;
        }
        writeln!(f, "{:>4}:", self.instructions.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_backpatch_rewrites_jumps_only() {
        let mut code = InstructionBuffer::new();
        let jump = code.emit(Instruction::Goto { target: None });
        let copy = code.emit(Instruction::Copy {
            target: Operand::Name("x".to_owned()),
            value: Operand::Constant("1".to_owned()),
        });
        let branch = code.emit(Instruction::IfGoto {
            left: Operand::Name("x".to_owned()),
            rel: "<".to_owned(),
            right: Operand::Temporary(1),
            target: None,
        });
        assert_eq!(code.unresolved(), vec![jump, branch]);

        code.backpatch(&[jump, copy, branch, 42], 3);
        assert!(code.unresolved().is_empty());
        assert_eq!(code.instructions()[0].to_string(), "goto 3");
        assert_eq!(code.instructions()[1].to_string(), "x := 1");
        assert_eq!(code.instructions()[2].to_string(), "if x < t1 goto 3");
    }

    #[test]
    fn test_pending_jump_rendering() {
        let mut code = InstructionBuffer::new();
        code.emit(Instruction::Goto { target: None });
        assert_eq!(code.to_string(), "   0: goto _\n   1:\n");
    }
}

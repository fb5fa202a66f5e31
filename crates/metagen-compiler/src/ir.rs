//! Minimal instruction stream produced by metadata reference emission and
//! fill routines.
//!
//! Addresses are word-granular: `index` operands count words from `base`.

use std::fmt::{self, Write as _};

use metagen_abi::{GlobalRef, RuntimeFn};
use metagen_core::Program;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ValueId(u32);

impl ValueId {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Operand {
    Value(ValueId),
    Global(GlobalRef),
    Null,
    Int(i64),
    /// Placeholder for a value that could not be produced.
    Undef,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Callee {
    Runtime(RuntimeFn),
    Global(GlobalRef),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Inst {
    Call {
        dest: Option<ValueId>,
        callee: Callee,
        args: Vec<Operand>,
    },
    /// Stack buffer of `words` words.
    Alloca {
        dest: ValueId,
        words: u32,
    },
    Load {
        dest: ValueId,
        base: Operand,
        index: i64,
    },
    Store {
        value: Operand,
        base: Operand,
        index: i64,
    },
    SlotAddress {
        dest: ValueId,
        base: Operand,
        index: i64,
    },
    Return(Option<Operand>),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Function {
    pub name: String,
    pub params: Vec<ValueId>,
    pub body: Vec<Inst>,
}

impl Function {
    /// Runtime entry points called, in order.
    pub fn runtime_calls(&self) -> impl Iterator<Item = RuntimeFn> + '_ {
        self.body.iter().filter_map(|inst| match inst {
            Inst::Call {
                callee: Callee::Runtime(f),
                ..
            } => Some(*f),
            _ => None,
        })
    }

    pub fn call_count(&self) -> usize {
        self.body
            .iter()
            .filter(|inst| matches!(inst, Inst::Call { .. }))
            .count()
    }

    pub fn dump(&self, program: &Program) -> String {
        let mut out = String::new();
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        writeln!(out, "fn {}({}) {{", self.name, params.join(", ")).unwrap();
        for inst in &self.body {
            writeln!(out, "  {}", DisplayInst { inst, program }).unwrap();
        }
        out.push_str("}\n");
        out
    }
}

struct DisplayOperand<'a> {
    operand: &'a Operand,
    program: &'a Program,
}

impl fmt::Display for DisplayOperand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Operand::Value(v) => write!(f, "{v}"),
            Operand::Global(g) => write!(f, "&{}", g.display(self.program)),
            Operand::Null => f.write_str("null"),
            Operand::Int(n) => write!(f, "{n}"),
            Operand::Undef => f.write_str("undef"),
        }
    }
}

struct DisplayInst<'a> {
    inst: &'a Inst,
    program: &'a Program,
}

impl DisplayInst<'_> {
    fn operand<'b>(&'b self, operand: &'b Operand) -> DisplayOperand<'b> {
        DisplayOperand {
            operand,
            program: self.program,
        }
    }
}

impl fmt::Display for DisplayInst<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inst {
            Inst::Call { dest, callee, args } => {
                if let Some(dest) = dest {
                    write!(f, "{dest} = ")?;
                }
                match callee {
                    Callee::Runtime(rt) => write!(f, "call {}(", rt.symbol())?,
                    Callee::Global(g) => write!(f, "call {}(", g.display(self.program))?,
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", self.operand(arg))?;
                }
                f.write_str(")")
            }
            Inst::Alloca { dest, words } => write!(f, "{dest} = alloca [{words} x word]"),
            Inst::Load { dest, base, index } => {
                write!(f, "{dest} = load {}[{index}]", self.operand(base))
            }
            Inst::Store { value, base, index } => write!(
                f,
                "store {}, {}[{index}]",
                self.operand(value),
                self.operand(base)
            ),
            Inst::SlotAddress { dest, base, index } => {
                write!(f, "{dest} = slot {}[{index}]", self.operand(base))
            }
            Inst::Return(None) => f.write_str("ret"),
            Inst::Return(Some(value)) => write!(f, "ret {}", self.operand(value)),
        }
    }
}

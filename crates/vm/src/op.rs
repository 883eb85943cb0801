//! Op descriptors.
//!
//! An [`Op`] declares how an instruction touches the stacks and what it costs. The
//! engine checks every declaration against the limits before popping the inputs and
//! calling [`Op::invoke`].

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use neo_config::Fixed8;
use neo_core::UInt160;

use crate::error::VmResult;
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::native::NativeContract;
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

/// Popped inputs of an op. Index 0 held the top of the stack.
#[derive(Debug, Default)]
pub struct OpArgs {
    pub args: Vec<StackItem>,
    pub args_alt: Vec<StackItem>,
}

/// Context and values produced by an op. Index 0 ends on top of the stack.
#[derive(Debug)]
pub struct OpOutput {
    pub context: ExecutionContext,
    pub results: Vec<StackItem>,
    pub results_alt: Vec<StackItem>,
}

impl OpOutput {
    pub fn new(context: ExecutionContext) -> Self {
        Self {
            context,
            results: Vec::new(),
            results_alt: Vec::new(),
        }
    }

    pub fn with_results(context: ExecutionContext, results: Vec<StackItem>) -> Self {
        Self {
            context,
            results,
            results_alt: Vec::new(),
        }
    }
}

/// Function executing an op.
pub type OpInvoke = fn(&mut Machine<'_>, &Op, ExecutionContext, OpArgs) -> VmResult<OpOutput>;

/// Shape of the keys or signatures operand of `CHECKMULTISIG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiSigArg {
    /// An array item holding the values.
    Packed,
    /// A count followed by that many values.
    Inline(usize),
}

impl MultiSigArg {
    /// Stack items consumed.
    pub fn input(self) -> usize {
        match self {
            MultiSigArg::Packed => 1,
            MultiSigArg::Inline(count) => count + 1,
        }
    }
}

/// Operand decoded by an op builder.
#[derive(Clone, Default)]
pub enum Operand {
    #[default]
    None,
    /// Length of inline push data.
    Size(usize),
    /// Contract call target; `None` when the hash is popped from the stack.
    AppCall { hash: Option<UInt160>, tail: bool },
    /// Call into the current script with an isolated stack.
    CallI { rvcount: u8, pcount: u8, target: usize },
    /// Contract call with an isolated stack.
    CallE {
        rvcount: u8,
        pcount: u8,
        hash: Option<UInt160>,
        tail: bool,
    },
    MultiSig { keys: MultiSigArg, sigs: MultiSigArg },
    /// Element count of `PACK`.
    Count(usize),
    /// Native contract reached through its service name.
    Native(Arc<dyn NativeContract>),
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::None => f.write_str("None"),
            Operand::Size(size) => write!(f, "Size({size})"),
            Operand::AppCall { hash, tail } => write!(f, "AppCall({hash:?}, tail={tail})"),
            Operand::CallI {
                rvcount,
                pcount,
                target,
            } => write!(f, "CallI({rvcount}, {pcount}, {target})"),
            Operand::CallE {
                rvcount,
                pcount,
                hash,
                tail,
            } => write!(f, "CallE({rvcount}, {pcount}, {hash:?}, tail={tail})"),
            Operand::MultiSig { keys, sigs } => write!(f, "MultiSig({keys:?}, {sigs:?})"),
            Operand::Count(count) => write!(f, "Count({count})"),
            Operand::Native(native) => write!(f, "Native({})", native.service_name()),
        }
    }
}

/// Descriptor of one instruction.
#[derive(Clone)]
pub struct Op {
    pub name: Cow<'static, str>,
    pub opcode: u8,
    /// Items popped from the evaluation stack.
    pub input: usize,
    /// Items popped from the alternate stack.
    pub input_alt: usize,
    pub output: usize,
    pub output_alt: usize,
    /// Evaluation stack growth not visible in `input`/`output`.
    pub modify: isize,
    pub modify_alt: isize,
    /// Invocation depth added while the op runs.
    pub invocation: usize,
    /// Size of the array the op produces.
    pub array: usize,
    /// Size of the item the op produces.
    pub item: usize,
    pub fee: Fixed8,
    pub operand: Operand,
    pub invoke: OpInvoke,
}

impl Op {
    pub fn new(opcode: OpCode, fee: Fixed8, invoke: OpInvoke) -> Self {
        Self::named(Cow::Borrowed(opcode.name()), opcode as u8, fee, invoke)
    }

    pub fn named(name: Cow<'static, str>, opcode: u8, fee: Fixed8, invoke: OpInvoke) -> Self {
        Self {
            name,
            opcode,
            input: 0,
            input_alt: 0,
            output: 0,
            output_alt: 0,
            modify: 0,
            modify_alt: 0,
            invocation: 0,
            array: 0,
            item: 0,
            fee,
            operand: Operand::None,
            invoke,
        }
    }

    pub fn input(mut self, input: usize) -> Self {
        self.input = input;
        self
    }

    pub fn input_alt(mut self, input_alt: usize) -> Self {
        self.input_alt = input_alt;
        self
    }

    pub fn output(mut self, output: usize) -> Self {
        self.output = output;
        self
    }

    pub fn output_alt(mut self, output_alt: usize) -> Self {
        self.output_alt = output_alt;
        self
    }

    pub fn modify(mut self, modify: isize) -> Self {
        self.modify = modify;
        self
    }

    pub fn invocation(mut self, invocation: usize) -> Self {
        self.invocation = invocation;
        self
    }

    pub fn array(mut self, array: usize) -> Self {
        self.array = array;
        self
    }

    pub fn item(mut self, item: usize) -> Self {
        self.item = item;
        self
    }

    pub fn operand(mut self, operand: Operand) -> Self {
        self.operand = operand;
        self
    }
}

impl fmt::Debug for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Op")
            .field("name", &self.name)
            .field("opcode", &self.opcode)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("fee", &self.fee)
            .field("operand", &self.operand)
            .finish()
    }
}

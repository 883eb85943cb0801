//! Jump table module for the Neo Virtual Machine.
//!
//! Maps every opcode byte to either a static [`Op`] or a builder that decodes the
//! operand and inspects the stack before producing one.

pub mod bitwise;
pub mod compound;
pub mod control;
pub mod crypto;
pub mod numeric;
pub mod push;
pub mod splice;
pub mod stack;

use neo_config::FeeSchedule;

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::op::Op;
use crate::op_code::OpCode;

/// Builds the descriptor of a dynamic-arity op. May advance the program counter past
/// the operand.
pub type OpBuilder = fn(&Machine<'_>, &mut ExecutionContext) -> VmResult<Op>;

/// A jump table slot.
#[derive(Clone)]
pub enum OpEntry {
    Static(Op),
    Dynamic(OpBuilder),
}

/// Represents a jump table for the VM.
#[derive(Clone)]
pub struct JumpTable {
    entries: Vec<Option<OpEntry>>,
}

impl JumpTable {
    /// Creates the table of the Neo 2.x instruction set with the given fees.
    pub fn new(fees: &FeeSchedule) -> Self {
        let mut jump_table = Self {
            entries: vec![None; 256],
        };

        push::register_handlers(&mut jump_table, fees);
        control::register_handlers(&mut jump_table, fees);
        stack::register_handlers(&mut jump_table, fees);
        splice::register_handlers(&mut jump_table, fees);
        bitwise::register_handlers(&mut jump_table, fees);
        numeric::register_handlers(&mut jump_table, fees);
        crypto::register_handlers(&mut jump_table, fees);
        compound::register_handlers(&mut jump_table, fees);

        jump_table
    }

    /// Registers a static op.
    pub fn register(&mut self, op: Op) {
        let index = op.opcode as usize;
        self.entries[index] = Some(OpEntry::Static(op));
    }

    /// Registers a builder for an op whose shape depends on its operand or the stack.
    pub fn register_dynamic(&mut self, opcode: OpCode, builder: OpBuilder) {
        self.entries[opcode as usize] = Some(OpEntry::Dynamic(builder));
    }

    pub fn get(&self, byte: u8) -> Option<&OpEntry> {
        self.entries[byte as usize].as_ref()
    }

    /// Resolves the descriptor of the op at `byte`.
    pub fn resolve(
        &self,
        machine: &Machine<'_>,
        context: &mut ExecutionContext,
        byte: u8,
    ) -> VmResult<Op> {
        match self.get(byte) {
            Some(OpEntry::Static(op)) => Ok(op.clone()),
            Some(OpEntry::Dynamic(builder)) => builder(machine, context),
            None => Err(VmError::UnknownOp(byte)),
        }
    }
}

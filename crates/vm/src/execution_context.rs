//! Execution context implementation.
//!
//! A context is a value: every step of the engine consumes one and produces the next.
//! Nested invocations receive the caller's stacks and gas, run to completion, and hand
//! them back.

use std::collections::BTreeMap;
use std::rc::Rc;

use neo_config::Fixed8;
use neo_core::UInt160;
use neo_cryptography::hash160;

use crate::stack_item::StackItem;
use crate::vm_state::VMState;

/// State of one script invocation.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub state: VMState,
    pub error_message: Option<String>,
    pub code: Rc<[u8]>,
    /// Only push opcodes and `RET` may execute.
    pub push_only: bool,
    /// Offset of the next byte to decode.
    pub pc: usize,
    /// Invocation depth of this context.
    pub depth: usize,
    pub script_hash: UInt160,
    pub calling_script_hash: Option<UInt160>,
    pub entry_script_hash: UInt160,
    /// Evaluation stack; the top is the last element.
    pub stack: Vec<StackItem>,
    pub stack_alt: Vec<StackItem>,
    pub gas_left: Fixed8,
    /// Contracts created in this call chain, mapped to the script that created them.
    pub created_contracts: BTreeMap<UInt160, UInt160>,
    /// Number of notifications and log messages emitted so far.
    pub action_index: u32,
    /// Number of values the caller expects back, or -1 for all.
    pub rvcount: i32,
}

/// Inputs for starting a script.
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    pub depth: usize,
    pub calling_script_hash: Option<UInt160>,
    pub entry_script_hash: UInt160,
    pub stack: Vec<StackItem>,
    pub stack_alt: Vec<StackItem>,
    pub gas_left: Fixed8,
    pub created_contracts: BTreeMap<UInt160, UInt160>,
    pub action_index: u32,
    pub rvcount: i32,
}

impl ScriptOptions {
    /// Options for a top-level script that is its own entry point.
    pub fn new(entry_script_hash: UInt160, gas_left: Fixed8) -> Self {
        Self {
            depth: 1,
            calling_script_hash: None,
            entry_script_hash,
            stack: Vec::new(),
            stack_alt: Vec::new(),
            gas_left,
            created_contracts: BTreeMap::new(),
            action_index: 0,
            rvcount: -1,
        }
    }
}

/// Script hash of a code buffer.
pub fn script_hash(code: &[u8]) -> UInt160 {
    UInt160(hash160(code))
}

impl ExecutionContext {
    pub fn new(code: Rc<[u8]>, push_only: bool, options: ScriptOptions) -> Self {
        let script_hash = script_hash(&code);
        Self {
            state: VMState::NONE,
            error_message: None,
            code,
            push_only,
            pc: 0,
            depth: options.depth,
            script_hash,
            calling_script_hash: options.calling_script_hash,
            entry_script_hash: options.entry_script_hash,
            stack: options.stack,
            stack_alt: options.stack_alt,
            gas_left: options.gas_left,
            created_contracts: options.created_contracts,
            action_index: options.action_index,
            rvcount: options.rvcount,
        }
    }

    /// Options for a callee that continues this context's shared state.
    pub fn callee_options(&mut self, depth: usize) -> ScriptOptions {
        ScriptOptions {
            depth,
            calling_script_hash: Some(self.script_hash),
            entry_script_hash: self.entry_script_hash,
            stack: std::mem::take(&mut self.stack),
            stack_alt: std::mem::take(&mut self.stack_alt),
            gas_left: self.gas_left,
            created_contracts: std::mem::take(&mut self.created_contracts),
            action_index: self.action_index,
            rvcount: -1,
        }
    }

    /// Context running this script's code from `pc` on the given stack.
    ///
    /// The callee borrows the created-contract map until [`Self::take_shared_state`].
    pub fn isolated(
        &mut self,
        pc: usize,
        depth: usize,
        stack: Vec<StackItem>,
        rvcount: i32,
    ) -> ExecutionContext {
        ExecutionContext {
            state: VMState::NONE,
            error_message: None,
            code: Rc::clone(&self.code),
            push_only: self.push_only,
            pc,
            depth,
            script_hash: self.script_hash,
            calling_script_hash: self.calling_script_hash,
            entry_script_hash: self.entry_script_hash,
            stack,
            stack_alt: Vec::new(),
            gas_left: self.gas_left,
            created_contracts: std::mem::take(&mut self.created_contracts),
            action_index: self.action_index,
            rvcount,
        }
    }

    /// Takes back gas, created contracts and the action index of a finished callee.
    pub fn take_shared_state(&mut self, callee: &mut ExecutionContext) {
        self.gas_left = callee.gas_left;
        self.created_contracts = std::mem::take(&mut callee.created_contracts);
        self.action_index = callee.action_index;
    }

    /// Takes back the stacks and shared state of a finished callee.
    pub fn resume_from(&mut self, mut callee: ExecutionContext) {
        self.take_shared_state(&mut callee);
        self.stack = callee.stack;
        self.stack_alt = callee.stack_alt;
    }

    /// Marks this context faulted with the given message.
    pub fn fault(mut self, message: impl Into<String>) -> Self {
        self.state = VMState::FAULT;
        self.error_message = Some(message.into());
        self
    }

    /// Peeks the item `index` positions below the top.
    pub fn peek(&self, index: usize) -> Option<&StackItem> {
        self.stack
            .len()
            .checked_sub(index + 1)
            .and_then(|i| self.stack.get(i))
    }

    /// Bytes following the current position.
    pub fn remaining_code(&self) -> &[u8] {
        self.code.get(self.pc..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_hashes_code() {
        let code: Rc<[u8]> = Rc::from(vec![0x51u8]);
        let context = ExecutionContext::new(
            Rc::clone(&code),
            false,
            ScriptOptions::new(UInt160::zero(), 10),
        );
        assert_eq!(context.script_hash, script_hash(&code));
        assert!(context.state.is_none());
        assert_eq!(context.rvcount, -1);
    }

    #[test]
    fn test_peek_counts_from_top() {
        let mut context = ExecutionContext::new(
            Rc::from(Vec::new()),
            false,
            ScriptOptions::new(UInt160::zero(), 0),
        );
        context.stack = vec![StackItem::from_int(1), StackItem::from_int(2)];
        assert_eq!(context.peek(0), Some(&StackItem::from_int(2)));
        assert_eq!(context.peek(1), Some(&StackItem::from_int(1)));
        assert!(context.peek(2).is_none());
    }

    #[test]
    fn test_callee_round_trip() {
        let mut caller = ExecutionContext::new(
            Rc::from(vec![0x00u8]),
            false,
            ScriptOptions::new(UInt160::zero(), 100),
        );
        caller.stack.push(StackItem::from_int(7));
        let options = caller.callee_options(2);
        assert!(caller.stack.is_empty());
        assert_eq!(options.calling_script_hash, Some(caller.script_hash));

        let mut callee = ExecutionContext::new(Rc::from(vec![0x61u8]), false, options);
        callee.gas_left = 40;
        caller.resume_from(callee);
        assert_eq!(caller.stack, vec![StackItem::from_int(7)]);
        assert_eq!(caller.gas_left, 40);
    }
}

//! Execution engine module for the Neo Virtual Machine.
//!
//! [`ExecutionEngine`] holds everything that is fixed for the life of a node: limits,
//! fees, the jump table and the native contracts. [`Machine`] binds an engine to the
//! ledger and the script container of one invocation and steps contexts until they
//! halt or fault.

use std::fmt;
use std::rc::Rc;

use log::{debug, trace};
use neo_config::{FeeSchedule, Fixed8, VmConfig, VmLimits};
use neo_core::UInt160;
use neo_cryptography::ECPoint;
use neo_ledger::{Block, Blockchain, ScriptContainer};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::error::{VmError, VmResult};
use crate::execution_context::{script_hash, ExecutionContext, ScriptOptions};
use crate::jump_table::JumpTable;
use crate::native::{self, NativeRegistry};
use crate::op::{Op, OpArgs, OpOutput};
use crate::op_code::OpCode;
use crate::stack_item::ContractParameter;
use crate::trigger::TriggerType;
use crate::vm_state::VMState;

/// Per-invocation inputs shared by every context of a run.
#[derive(Debug, Clone)]
pub struct ExecutionInit {
    pub script_container: ScriptContainer,
    pub trigger: TriggerType,
    /// Block being persisted, when the run is part of block processing.
    pub persisting_block: Option<Block>,
    /// Treats every witness check as satisfied.
    pub skip_witness_verify: bool,
}

impl ExecutionInit {
    pub fn new(script_container: ScriptContainer, trigger: TriggerType) -> Self {
        Self {
            script_container,
            trigger,
            persisting_block: None,
            skip_witness_verify: false,
        }
    }

    pub fn with_persisting_block(mut self, block: Block) -> Self {
        self.persisting_block = Some(block);
        self
    }

    pub fn skip_witness_verify(mut self) -> Self {
        self.skip_witness_verify = true;
        self
    }
}

/// A `Neo.Runtime.Notify` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub script_hash: UInt160,
    /// Position among the notifications and logs of the run.
    pub index: u32,
    pub state: ContractParameter,
}

/// A `Neo.Runtime.Log` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    pub script_hash: UInt160,
    pub index: u32,
    pub message: String,
}

/// A balance change reported by a native token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    pub asset: UInt160,
    pub address: UInt160,
    /// Signed change of the balance.
    pub amount: BigInt,
}

/// Observer of the side effects of a run.
pub trait VmListener {
    fn on_notify(&mut self, _notification: &Notification) {}

    fn on_log(&mut self, _log: &LogMessage) {}

    fn on_set_votes(&mut self, _address: &UInt160, _votes: &[ECPoint]) {}

    fn on_migrate_contract(&mut self, _from: &UInt160, _to: &UInt160) {}

    fn on_balance_change(&mut self, _change: &BalanceChange) {}
}

/// Listener that keeps every event in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingListener {
    pub notifications: Vec<Notification>,
    pub logs: Vec<LogMessage>,
    pub votes: Vec<(UInt160, Vec<ECPoint>)>,
    pub migrations: Vec<(UInt160, UInt160)>,
    pub balance_changes: Vec<BalanceChange>,
}

impl VmListener for RecordingListener {
    fn on_notify(&mut self, notification: &Notification) {
        self.notifications.push(notification.clone());
    }

    fn on_log(&mut self, log: &LogMessage) {
        self.logs.push(log.clone());
    }

    fn on_set_votes(&mut self, address: &UInt160, votes: &[ECPoint]) {
        self.votes.push((*address, votes.to_vec()));
    }

    fn on_migrate_contract(&mut self, from: &UInt160, to: &UInt160) {
        self.migrations.push((*from, *to));
    }

    fn on_balance_change(&mut self, change: &BalanceChange) {
        self.balance_changes.push(change.clone());
    }
}

/// A script to run and whether it may only push data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub code: Vec<u8>,
    pub push_only: bool,
}

impl Script {
    pub fn new(code: impl Into<Vec<u8>>) -> Self {
        Self {
            code: code.into(),
            push_only: false,
        }
    }

    /// A script restricted to push opcodes, such as an invocation script.
    pub fn push_only(code: impl Into<Vec<u8>>) -> Self {
        Self {
            code: code.into(),
            push_only: true,
        }
    }
}

/// Outcome of [`ExecutionEngine::invoke_scripts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteScriptsResult {
    pub state: VMState,
    /// Evaluation stack of the last script, top first.
    pub stack: Vec<ContractParameter>,
    pub stack_alt: Vec<ContractParameter>,
    /// Gas charged to the caller, after the free allowance.
    pub gas_consumed: Fixed8,
    /// Gas spent in total.
    pub gas_cost: Fixed8,
    pub error_message: Option<String>,
}

/// The engine configuration, jump table and native contracts.
pub struct ExecutionEngine {
    config: VmConfig,
    jump_table: JumpTable,
    natives: NativeRegistry,
}

impl fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("config", &self.config)
            .field("natives", &self.natives)
            .finish_non_exhaustive()
    }
}

impl ExecutionEngine {
    /// Creates an engine without native contracts.
    pub fn new(config: VmConfig) -> Self {
        Self::with_natives(config, NativeRegistry::new())
    }

    pub fn with_natives(config: VmConfig, natives: NativeRegistry) -> Self {
        let jump_table = JumpTable::new(&config.fees);
        Self {
            config,
            jump_table,
            natives,
        }
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn jump_table(&self) -> &JumpTable {
        &self.jump_table
    }

    pub fn natives(&self) -> &NativeRegistry {
        &self.natives
    }

    /// Binds the engine to a ledger and an invocation.
    pub fn machine<'a>(
        &'a self,
        blockchain: &'a mut dyn Blockchain,
        init: &'a ExecutionInit,
        listener: Option<&'a mut dyn VmListener>,
    ) -> Machine<'a> {
        Machine {
            engine: self,
            blockchain,
            init,
            listener,
        }
    }

    /// Runs `scripts` first to last on one shared stack.
    ///
    /// The entry script hash of every run is the hash of the last script, and each
    /// script reports the one listed after it as its caller. Execution stops at the
    /// first script that does not halt. `gas` is the caller's budget on top of the free
    /// allowance.
    pub fn invoke_scripts(
        &self,
        blockchain: &mut dyn Blockchain,
        scripts: &[Script],
        gas: Fixed8,
        init: &ExecutionInit,
        listener: Option<&mut dyn VmListener>,
    ) -> ExecuteScriptsResult {
        let start = gas.saturating_add(self.config.free_gas);
        let mut machine = self.machine(blockchain, init, listener.map(|l| l as &mut dyn VmListener));
        let entry_script_hash = scripts
            .last()
            .map(|script| script_hash(&script.code))
            .unwrap_or_default();

        let mut options = ScriptOptions::new(entry_script_hash, start);
        let mut last: Option<ExecutionContext> = None;
        for index in 0..scripts.len() {
            let script = &scripts[index];
            options.depth = scripts.len() - index;
            options.calling_script_hash = scripts
                .get(index + 1)
                .map(|caller| script_hash(&caller.code));

            let context = machine.execute_script(
                Rc::from(script.code.as_slice()),
                script.push_only,
                options,
            );
            let halted = context.state.is_halt();
            options = ScriptOptions {
                depth: context.depth,
                calling_script_hash: None,
                entry_script_hash,
                stack: context.stack.clone(),
                stack_alt: context.stack_alt.clone(),
                gas_left: context.gas_left,
                created_contracts: context.created_contracts.clone(),
                action_index: context.action_index,
                rvcount: -1,
            };
            last = Some(context);
            if !halted {
                break;
            }
        }

        let (state, gas_left, stack, stack_alt, error_message) = match last {
            Some(context) => (
                context.state,
                context.gas_left,
                context.stack,
                context.stack_alt,
                context.error_message,
            ),
            None => (VMState::HALT, start, Vec::new(), Vec::new(), None),
        };
        let gas_cost = start - gas_left;
        let result = ExecuteScriptsResult {
            state,
            stack: stack.iter().rev().map(ContractParameter::from_stack_item).collect(),
            stack_alt: stack_alt
                .iter()
                .rev()
                .map(ContractParameter::from_stack_item)
                .collect(),
            gas_consumed: (gas_cost - self.config.free_gas).max(0),
            gas_cost,
            error_message,
        };
        debug!(
            "invocation finished: state={:?} gas_consumed={} gas_cost={}",
            result.state, result.gas_consumed, result.gas_cost
        );
        result
    }

    /// Writes the genesis state of the native contracts. Requires the application
    /// trigger.
    pub fn initialize_natives(
        &self,
        blockchain: &mut dyn Blockchain,
        init: &ExecutionInit,
        listener: Option<&mut dyn VmListener>,
    ) -> VmResult<()> {
        if !init.trigger.is_application() {
            return Err(VmError::InvalidVerifySyscall("native initialization".to_string()));
        }
        let mut machine = self.machine(blockchain, init, listener.map(|l| l as &mut dyn VmListener));
        let mut context = ExecutionContext::new(
            Rc::from(Vec::new()),
            false,
            ScriptOptions::new(UInt160::zero(), 0),
        );
        native::initialize_all(&mut machine, &mut context, &self.natives)
    }
}

/// An engine bound to the ledger and the invocation it runs for.
pub struct Machine<'a> {
    pub engine: &'a ExecutionEngine,
    pub blockchain: &'a mut dyn Blockchain,
    pub init: &'a ExecutionInit,
    listener: Option<&'a mut dyn VmListener>,
}

impl<'a> Machine<'a> {
    pub fn fees(&self) -> &FeeSchedule {
        &self.engine.config.fees
    }

    pub fn limits(&self) -> &VmLimits {
        &self.engine.config.limits
    }

    /// Runs `code` as a new context and returns it halted or faulted.
    pub fn execute_script(
        &mut self,
        code: Rc<[u8]>,
        push_only: bool,
        options: ScriptOptions,
    ) -> ExecutionContext {
        let context = ExecutionContext::new(code, push_only, options);
        if context.code.len() > self.limits().max_script_length {
            let error = VmError::ScriptTooLarge(context.code.len());
            return context.fault(error.to_string());
        }
        debug!(
            "executing script {} at depth {}",
            context.script_hash, context.depth
        );
        let context = self.run(context);
        debug!(
            "script {} finished: {:?} gas_left={}",
            context.script_hash, context.state, context.gas_left
        );
        context
    }

    /// Steps `context` until it leaves the `NONE` state.
    pub fn run(&mut self, mut context: ExecutionContext) -> ExecutionContext {
        while context.state.is_none() {
            context = self.step(context);
        }
        context
    }

    /// Executes one instruction. A failing step faults the context as it was before
    /// the step.
    pub fn step(&mut self, context: ExecutionContext) -> ExecutionContext {
        let snapshot = context.clone();
        match self.try_step(context) {
            Ok(context) => context,
            Err(error) => {
                let message = format!(
                    "{error} [pc: {}, script: {}]",
                    snapshot.pc, snapshot.script_hash
                );
                debug!("fault: {message}");
                snapshot.fault(message)
            }
        }
    }

    fn try_step(&mut self, mut context: ExecutionContext) -> VmResult<ExecutionContext> {
        let position = context.pc;
        let Some(&byte) = context.code.get(position) else {
            context.state = VMState::HALT;
            return Ok(context);
        };
        context.pc += 1;
        if context.push_only && byte > OpCode::PUSH16 as u8 && byte != OpCode::RET as u8 {
            return Err(VmError::PushOnly(byte));
        }

        let engine = self.engine;
        let op = engine.jump_table.resolve(self, &mut context, byte)?;
        self.check_limits(&op, &context)?;

        let split = context.stack.len() - op.input;
        let mut args = context.stack.split_off(split);
        args.reverse();
        let split_alt = context.stack_alt.len() - op.input_alt;
        let mut args_alt = context.stack_alt.split_off(split_alt);
        args_alt.reverse();

        context.gas_left = context.gas_left.saturating_sub(op.fee);
        if context.gas_left < 0 {
            return Err(VmError::OutOfGas);
        }
        trace!(
            "{position:>5} {:<24} fee={} gas_left={}",
            op.name,
            op.fee,
            context.gas_left
        );

        let OpOutput {
            mut context,
            results,
            results_alt,
        } = (op.invoke)(self, &op, context, OpArgs { args, args_alt })?;
        if context.state.is_fault() {
            return Ok(context);
        }
        check_results(&op, op.output, results.len())?;
        check_results(&op, op.output_alt, results_alt.len())?;
        context.stack.extend(results.into_iter().rev());
        context.stack_alt.extend(results_alt.into_iter().rev());
        Ok(context)
    }

    fn check_limits(&self, op: &Op, context: &ExecutionContext) -> VmResult<()> {
        let limits = self.limits();
        if context.stack.len() < op.input {
            return Err(VmError::stack_underflow(
                &*op.name,
                context.stack.len(),
                op.input,
            ));
        }
        if context.stack_alt.len() < op.input_alt {
            return Err(VmError::AltStackUnderflow);
        }
        let projected = (context.stack.len() + context.stack_alt.len() + op.output + op.output_alt)
            as isize
            + op.modify
            + op.modify_alt
            - (op.input + op.input_alt) as isize;
        if projected > limits.max_stack_size as isize {
            return Err(VmError::StackOverflow);
        }
        if context.depth + op.invocation > limits.max_invocation_stack_size {
            return Err(VmError::InvocationStackOverflow);
        }
        if op.array > limits.max_array_size {
            return Err(VmError::ArrayOverflow);
        }
        if op.item > limits.max_item_size {
            return Err(VmError::ItemOverflow);
        }
        Ok(())
    }

    pub(crate) fn notify(&mut self, notification: &Notification) {
        match self.listener.as_mut() {
            Some(listener) => listener.on_notify(notification),
            None => trace!("notification from {} dropped", notification.script_hash),
        }
    }

    pub(crate) fn log(&mut self, log: &LogMessage) {
        match self.listener.as_mut() {
            Some(listener) => listener.on_log(log),
            None => trace!("log from {} dropped: {}", log.script_hash, log.message),
        }
    }

    pub(crate) fn set_votes(&mut self, address: &UInt160, votes: &[ECPoint]) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_set_votes(address, votes);
        }
    }

    pub(crate) fn migrate_contract(&mut self, from: &UInt160, to: &UInt160) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_migrate_contract(from, to);
        }
    }

    /// Reports a native token balance change.
    pub fn balance_change(&mut self, change: &BalanceChange) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_balance_change(change);
        }
    }

    /// Reports a notification raised by a native contract on behalf of `script_hash`.
    pub fn emit_notification(
        &mut self,
        context: &mut ExecutionContext,
        script_hash: UInt160,
        state: ContractParameter,
    ) {
        let notification = Notification {
            script_hash,
            index: context.action_index,
            state,
        };
        context.action_index += 1;
        self.notify(&notification);
    }
}

fn check_results(op: &Op, expected: usize, actual: usize) -> VmResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(VmError::ResultCountMismatch {
            op: op.name.to_string(),
            expected,
            actual,
        })
    }
}

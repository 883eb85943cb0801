//! # Neo Legacy Virtual Machine
//!
//! A deterministic, gas-metered stack machine for the Neo 2.x instruction set.
//!
//! Every instruction is resolved into an [`Op`](op::Op) descriptor that declares its
//! fee, how many items it pops from the evaluation and alt stacks and how many it
//! pushes. The [`Machine`] checks those declarations against the configured limits
//! before charging gas and running the op, so every fault leaves the last good
//! context intact.
//!
//! ## Architecture
//!
//! - **ExecutionEngine**: configuration, jump table and native contracts
//! - **Machine**: one run over a [`Blockchain`](neo_ledger::Blockchain) view
//! - **JumpTable**: opcode to op descriptor dispatch
//! - **SysCall table**: `Neo.*` / `System.*` interop services
//! - **NativeContract**: contracts implemented in Rust behind a service name
//! - **StackItem**: values manipulated by scripts
//! - **ScriptBuilder**: utility for constructing scripts
//!
//! ## Example
//!
//! ```rust
//! use neo_config::VmConfig;
//! use neo_ledger::{MemoryBlockchain, ScriptContainer, Transaction};
//! use neo_vm::{
//!     ExecutionEngine, ExecutionInit, OpCode, Script, ScriptBuilder, TriggerType, VMState,
//! };
//!
//! let mut builder = ScriptBuilder::new();
//! builder.emit_push_int(2).emit_push_int(3).emit_opcode(OpCode::ADD);
//! let script = builder.into_bytes();
//!
//! let engine = ExecutionEngine::new(VmConfig::default());
//! let mut chain = MemoryBlockchain::default();
//! let init = ExecutionInit::new(
//!     ScriptContainer::Transaction(Transaction::invocation(script.clone())),
//!     TriggerType::Application,
//! );
//! let result = engine.invoke_scripts(&mut chain, &[Script::new(script)], 0, &init, None);
//! assert_eq!(result.state, VMState::HALT);
//! ```

pub mod error;
pub mod execution_context;
pub mod execution_engine;
pub mod jump_table;
pub mod native;
pub mod op;
pub mod op_code;
pub mod script_builder;
pub mod stack_item;
pub mod syscall;
pub mod trigger;
pub mod vm_state;

pub use error::{VmError, VmResult};
pub use execution_context::{script_hash, ExecutionContext};
pub use execution_engine::{
    BalanceChange, ExecuteScriptsResult, ExecutionEngine, ExecutionInit, LogMessage, Machine,
    Notification, RecordingListener, Script, VmListener,
};
pub use jump_table::JumpTable;
pub use native::{native_script, NativeContract, NativeMethod, NativeRegistry};
pub use op_code::OpCode;
pub use script_builder::ScriptBuilder;
pub use stack_item::{ContractParameter, InteropValue, StackItem, StackItemType};
pub use syscall::runtime::{check_witness, check_witness_public_key};
pub use trigger::TriggerType;
pub use vm_state::VMState;

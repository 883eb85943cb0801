//! Native contracts hosted by the engine.
//!
//! A native contract's script is a single `SYSCALL` naming its service. Calling the
//! script, or issuing that syscall directly, dispatches `method params` to the Rust
//! implementation.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use neo_config::Fixed8;
use neo_core::UInt160;
use neo_io::BinaryWriter;
use neo_ledger::ContractParameterType;

use crate::error::{VmError, VmResult};
use crate::execution_context::{script_hash, ExecutionContext};
use crate::execution_engine::Machine;
use crate::op::{Op, OpArgs, OpOutput, Operand};
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

/// A method exposed by a native contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeMethod {
    pub name: &'static str,
    /// Fee charged for a call.
    pub price: Fixed8,
    pub parameters: &'static [(&'static str, ContractParameterType)],
    pub return_type: ContractParameterType,
    /// Safe methods only read state.
    pub safe: bool,
}

impl NativeMethod {
    pub const fn new(
        name: &'static str,
        price: Fixed8,
        parameters: &'static [(&'static str, ContractParameterType)],
        return_type: ContractParameterType,
        safe: bool,
    ) -> Self {
        Self {
            name,
            price,
            parameters,
            return_type,
            safe,
        }
    }
}

/// A contract implemented in Rust and reached through its service name.
pub trait NativeContract: Send + Sync {
    /// Name of the syscall that reaches this contract, e.g. `Neo.Native.Policy`.
    fn service_name(&self) -> &str;

    /// The `SYSCALL service_name` script.
    fn script(&self) -> &[u8];

    fn hash(&self) -> UInt160 {
        script_hash(self.script())
    }

    fn methods(&self) -> &[NativeMethod];

    fn method(&self, name: &str) -> Option<&NativeMethod> {
        self.methods().iter().find(|method| method.name == name)
    }

    /// Standards implemented by this contract, e.g. `NEP-5`.
    fn supported_standards(&self) -> &[&'static str] {
        &[]
    }

    /// Runs `method` with the given parameters and returns its single result.
    fn invoke(
        &self,
        machine: &mut Machine<'_>,
        context: &mut ExecutionContext,
        method: &str,
        args: &[StackItem],
    ) -> VmResult<StackItem>;

    /// Writes the contract's genesis state.
    fn initialize(
        &self,
        _machine: &mut Machine<'_>,
        _context: &mut ExecutionContext,
    ) -> VmResult<()> {
        Ok(())
    }

    /// Error for a method this contract does not expose.
    fn unknown_method(&self, method: &str) -> VmError {
        VmError::UnknownNativeMethod {
            service: self.service_name().to_string(),
            method: method.to_string(),
        }
    }
}

/// Builds the `SYSCALL service_name` script of a native contract.
pub fn native_script(service_name: &str) -> Vec<u8> {
    let mut writer = BinaryWriter::new();
    writer.write_u8(OpCode::SYSCALL as u8);
    writer.write_var_string(service_name);
    writer.into_bytes()
}

/// Native contracts keyed by script hash and service name.
#[derive(Clone, Default)]
pub struct NativeRegistry {
    contracts: BTreeMap<UInt160, Arc<dyn NativeContract>>,
    services: HashMap<String, UInt160>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, contract: Arc<dyn NativeContract>) {
        let hash = contract.hash();
        self.services.insert(contract.service_name().to_string(), hash);
        self.contracts.insert(hash, contract);
    }

    pub fn with(mut self, contract: Arc<dyn NativeContract>) -> Self {
        self.register(contract);
        self
    }

    pub fn get_by_hash(&self, hash: &UInt160) -> Option<&Arc<dyn NativeContract>> {
        self.contracts.get(hash)
    }

    pub fn get_by_service_name(&self, name: &str) -> Option<&Arc<dyn NativeContract>> {
        self.services
            .get(name)
            .and_then(|hash| self.contracts.get(hash))
    }

    /// Contracts in script hash order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn NativeContract>> {
        self.contracts.values()
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl fmt::Debug for NativeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.services.keys()).finish()
    }
}

/// Descriptor of a native call `method params`, priced by the method on top.
pub(crate) fn build_native(
    machine: &Machine<'_>,
    context: &ExecutionContext,
    native: Arc<dyn NativeContract>,
) -> VmResult<Op> {
    let fee = match context.peek(0) {
        None => machine.fees().one,
        Some(method) => {
            let method = method.as_string()?;
            native
                .method(&method)
                .ok_or_else(|| native.unknown_method(&method))?
                .price
        }
    };
    let name = Cow::Owned(native.service_name().to_string());
    Ok(Op::named(name, OpCode::SYSCALL as u8, fee, invoke_native)
        .input(2)
        .output(1)
        .operand(Operand::Native(native)))
}

fn invoke_native(
    machine: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let Operand::Native(native) = &op.operand else {
        return Err(VmError::UnknownSysCall(op.name.to_string()));
    };
    let method = args.args[0].as_string()?;
    let params = args.args[1].as_array()?;
    let safe = native.method(&method).map_or(false, |method| method.safe);
    if !safe && !machine.init.trigger.is_application() {
        return Err(VmError::InvalidVerifySyscall(format!(
            "{}.{method}",
            native.service_name()
        )));
    }
    let result = native.invoke(machine, &mut context, &method, &params)?;
    Ok(OpOutput::with_results(context, vec![result]))
}

/// Writes the genesis state of every registered contract.
pub(crate) fn initialize_all(
    machine: &mut Machine<'_>,
    context: &mut ExecutionContext,
    natives: &NativeRegistry,
) -> VmResult<()> {
    for native in natives.iter() {
        native.initialize(machine, context)?;
    }
    Ok(())
}

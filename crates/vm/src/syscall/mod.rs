//! Syscall dispatch for the Neo Virtual Machine.
//!
//! A `SYSCALL` operand is a var-length ASCII name. Legacy `AntShares.*` and `System.*`
//! names resolve to their canonical `Neo.*` entries, a four byte operand may instead
//! carry the interop hash of a name, and the service names of registered native
//! contracts resolve to the native dispatcher.

pub mod blockchain;
pub mod contract;
pub mod engine;
pub mod entity;
pub mod governance;
pub mod iterator;
pub mod runtime;
pub mod storage;

use std::borrow::Cow;
use std::collections::HashMap;

use neo_config::{FeeSchedule, Fixed8};
use neo_cryptography::sha256;
use neo_io::MemoryReader;
use once_cell::sync::Lazy;

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::native;
use crate::op::{Op, OpInvoke};
use crate::op_code::OpCode;

/// Computes the fee of a syscall whose price depends on the stack.
pub type PriceBuilder = fn(&Machine<'_>, &ExecutionContext) -> VmResult<Fixed8>;

/// Price of a syscall.
#[derive(Clone, Copy)]
pub enum SysCallPrice {
    Fixed(fn(&FeeSchedule) -> Fixed8),
    Dynamic(PriceBuilder),
}

/// Descriptor of one syscall.
#[derive(Clone, Copy)]
pub struct SysCall {
    pub name: &'static str,
    pub input: usize,
    pub output: usize,
    pub price: SysCallPrice,
    pub invoke: OpInvoke,
}

impl SysCall {
    /// A syscall with no stack effect charged at the base fee.
    pub fn new(name: &'static str, invoke: OpInvoke) -> Self {
        Self {
            name,
            input: 0,
            output: 0,
            price: SysCallPrice::Fixed(|fees| fees.one),
            invoke,
        }
    }

    pub fn input(mut self, input: usize) -> Self {
        self.input = input;
        self
    }

    pub fn output(mut self, output: usize) -> Self {
        self.output = output;
        self
    }

    pub fn price(mut self, price: fn(&FeeSchedule) -> Fixed8) -> Self {
        self.price = SysCallPrice::Fixed(price);
        self
    }

    pub fn dynamic_price(mut self, price: PriceBuilder) -> Self {
        self.price = SysCallPrice::Dynamic(price);
        self
    }

    /// Descriptor of this syscall for the current stack.
    pub fn op(&self, machine: &Machine<'_>, context: &ExecutionContext) -> VmResult<Op> {
        let fee = match self.price {
            SysCallPrice::Fixed(price) => price(machine.fees()),
            SysCallPrice::Dynamic(price) => price(machine, context)?,
        };
        Ok(Op::named(
            Cow::Borrowed(self.name),
            OpCode::SYSCALL as u8,
            fee,
            self.invoke,
        )
        .input(self.input)
        .output(self.output))
    }
}

/// Interop hash of a syscall name: the first four bytes of its SHA-256, little endian.
pub fn interop_hash(name: &str) -> u32 {
    let digest = sha256(name.as_bytes());
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Canonical syscalls, their aliases and interop hashes.
pub struct SysCallTable {
    calls: HashMap<&'static str, SysCall>,
    aliases: HashMap<&'static str, &'static str>,
    hashes: HashMap<u32, &'static str>,
}

/// The syscall table of the Neo 2.x interop service.
pub static SYSCALLS: Lazy<SysCallTable> = Lazy::new(SysCallTable::new);

impl SysCallTable {
    fn new() -> Self {
        let mut table = Self {
            calls: HashMap::new(),
            aliases: HashMap::new(),
            hashes: HashMap::new(),
        };

        runtime::register(&mut table);
        blockchain::register(&mut table);
        entity::register(&mut table);
        storage::register(&mut table);
        contract::register(&mut table);
        iterator::register(&mut table);
        governance::register(&mut table);
        engine::register(&mut table);

        for &(alias, name) in ALIASES {
            table.alias(alias, name);
        }
        table
    }

    pub fn register(&mut self, call: SysCall) {
        self.hashes.insert(interop_hash(call.name), call.name);
        self.calls.insert(call.name, call);
    }

    fn alias(&mut self, alias: &'static str, name: &'static str) {
        if self.calls.contains_key(name) {
            self.hashes.insert(interop_hash(alias), name);
            self.aliases.insert(alias, name);
        }
    }

    /// Looks up a syscall by canonical name or alias.
    pub fn get(&self, name: &str) -> Option<&SysCall> {
        let name = self.aliases.get(name).copied().unwrap_or(name);
        self.calls.get(name)
    }

    /// Looks up a syscall by the interop hash of its name or of an alias.
    pub fn get_by_hash(&self, hash: u32) -> Option<&SysCall> {
        self.hashes.get(&hash).and_then(|name| self.calls.get(name))
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Canonical names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.calls.keys().copied()
    }
}

/// Fails unless the engine runs under the application trigger.
pub(crate) fn require_application(machine: &Machine<'_>, name: &str) -> VmResult<()> {
    if machine.init.trigger.is_application() {
        Ok(())
    } else {
        Err(VmError::InvalidVerifySyscall(name.to_string()))
    }
}

/// Resolves the syscall named by the operand at `pc` and advances past it.
pub fn build_syscall(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    let mut reader = MemoryReader::with_position(&context.code, context.pc);
    let operand = reader
        .read_var_bytes(machine.limits().max_syscall_name_length)
        .map_err(|_| VmError::CodeOverflow)?;
    context.pc = reader.position();

    let name = String::from_utf8_lossy(&operand);
    if let Some(call) = SYSCALLS.get(&name) {
        return call.op(machine, context);
    }
    if let Some(native) = machine.engine.natives().get_by_service_name(&name) {
        return native::build_native(machine, context, native.clone());
    }
    if let Ok(bytes) = <[u8; 4]>::try_from(operand.as_slice()) {
        if let Some(call) = SYSCALLS.get_by_hash(u32::from_le_bytes(bytes)) {
            return call.op(machine, context);
        }
    }
    Err(VmError::UnknownSysCall(name.into_owned()))
}

/// Legacy names and the canonical syscalls they stand for.
const ALIASES: &[(&str, &str)] = &[
    ("Neo.Iterator.Next", "Neo.Enumerator.Next"),
    ("Neo.Iterator.Value", "Neo.Enumerator.Value"),
    ("System.Enumerator.Next", "Neo.Enumerator.Next"),
    ("System.Enumerator.Value", "Neo.Enumerator.Value"),
    ("System.Enumerator.Concat", "Neo.Enumerator.Concat"),
    ("System.Iterator.Key", "Neo.Iterator.Key"),
    ("System.Iterator.Concat", "Neo.Iterator.Concat"),
    ("System.Iterator.Keys", "Neo.Iterator.Keys"),
    ("System.Iterator.Values", "Neo.Iterator.Values"),
    ("System.Runtime.Platform", "Neo.Runtime.Platform"),
    ("System.Runtime.GetTrigger", "Neo.Runtime.GetTrigger"),
    ("System.Runtime.CheckWitness", "Neo.Runtime.CheckWitness"),
    ("System.Runtime.Notify", "Neo.Runtime.Notify"),
    ("System.Runtime.Log", "Neo.Runtime.Log"),
    ("System.Runtime.GetTime", "Neo.Runtime.GetTime"),
    ("System.Runtime.Serialize", "Neo.Runtime.Serialize"),
    ("System.Runtime.Deserialize", "Neo.Runtime.Deserialize"),
    ("System.Blockchain.GetHeight", "Neo.Blockchain.GetHeight"),
    ("System.Blockchain.GetHeader", "Neo.Blockchain.GetHeader"),
    ("System.Blockchain.GetBlock", "Neo.Blockchain.GetBlock"),
    ("System.Blockchain.GetTransaction", "Neo.Blockchain.GetTransaction"),
    (
        "System.Blockchain.GetTransactionHeight",
        "Neo.Blockchain.GetTransactionHeight",
    ),
    ("System.Blockchain.GetContract", "Neo.Blockchain.GetContract"),
    ("System.Header.GetIndex", "Neo.Header.GetIndex"),
    ("System.Header.GetHash", "Neo.Header.GetHash"),
    ("System.Header.GetPrevHash", "Neo.Header.GetPrevHash"),
    ("System.Header.GetTimestamp", "Neo.Header.GetTimestamp"),
    ("System.Block.GetTransactionCount", "Neo.Block.GetTransactionCount"),
    ("System.Block.GetTransactions", "Neo.Block.GetTransactions"),
    ("System.Block.GetTransaction", "Neo.Block.GetTransaction"),
    ("System.Transaction.GetHash", "Neo.Transaction.GetHash"),
    ("System.Contract.Destroy", "Neo.Contract.Destroy"),
    ("System.Contract.GetStorageContext", "Neo.Contract.GetStorageContext"),
    ("System.Storage.GetContext", "Neo.Storage.GetContext"),
    ("System.Storage.GetReadOnlyContext", "Neo.Storage.GetReadOnlyContext"),
    ("System.Storage.Get", "Neo.Storage.Get"),
    ("System.Storage.Put", "Neo.Storage.Put"),
    ("System.Storage.PutEx", "Neo.Storage.PutEx"),
    ("System.Storage.Delete", "Neo.Storage.Delete"),
    ("System.StorageContext.AsReadOnly", "Neo.StorageContext.AsReadOnly"),
    ("AntShares.Runtime.CheckWitness", "Neo.Runtime.CheckWitness"),
    ("AntShares.Runtime.Notify", "Neo.Runtime.Notify"),
    ("AntShares.Runtime.Log", "Neo.Runtime.Log"),
    ("AntShares.Blockchain.GetHeight", "Neo.Blockchain.GetHeight"),
    ("AntShares.Blockchain.GetHeader", "Neo.Blockchain.GetHeader"),
    ("AntShares.Blockchain.GetBlock", "Neo.Blockchain.GetBlock"),
    ("AntShares.Blockchain.GetTransaction", "Neo.Blockchain.GetTransaction"),
    ("AntShares.Blockchain.GetAccount", "Neo.Blockchain.GetAccount"),
    ("AntShares.Blockchain.GetValidators", "Neo.Blockchain.GetValidators"),
    ("AntShares.Blockchain.GetAsset", "Neo.Blockchain.GetAsset"),
    ("AntShares.Blockchain.GetContract", "Neo.Blockchain.GetContract"),
    ("AntShares.Header.GetHash", "Neo.Header.GetHash"),
    ("AntShares.Header.GetVersion", "Neo.Header.GetVersion"),
    ("AntShares.Header.GetPrevHash", "Neo.Header.GetPrevHash"),
    ("AntShares.Header.GetMerkleRoot", "Neo.Header.GetMerkleRoot"),
    ("AntShares.Header.GetTimestamp", "Neo.Header.GetTimestamp"),
    ("AntShares.Header.GetConsensusData", "Neo.Header.GetConsensusData"),
    ("AntShares.Header.GetNextConsensus", "Neo.Header.GetNextConsensus"),
    ("AntShares.Block.GetTransactionCount", "Neo.Block.GetTransactionCount"),
    ("AntShares.Block.GetTransactions", "Neo.Block.GetTransactions"),
    ("AntShares.Block.GetTransaction", "Neo.Block.GetTransaction"),
    ("AntShares.Transaction.GetHash", "Neo.Transaction.GetHash"),
    ("AntShares.Transaction.GetType", "Neo.Transaction.GetType"),
    ("AntShares.Transaction.GetAttributes", "Neo.Transaction.GetAttributes"),
    ("AntShares.Transaction.GetInputs", "Neo.Transaction.GetInputs"),
    ("AntShares.Transaction.GetOutputs", "Neo.Transaction.GetOutputs"),
    ("AntShares.Transaction.GetReferences", "Neo.Transaction.GetReferences"),
    ("AntShares.Attribute.GetUsage", "Neo.Attribute.GetUsage"),
    ("AntShares.Attribute.GetData", "Neo.Attribute.GetData"),
    ("AntShares.Input.GetHash", "Neo.Input.GetHash"),
    ("AntShares.Input.GetIndex", "Neo.Input.GetIndex"),
    ("AntShares.Output.GetAssetId", "Neo.Output.GetAssetId"),
    ("AntShares.Output.GetValue", "Neo.Output.GetValue"),
    ("AntShares.Output.GetScriptHash", "Neo.Output.GetScriptHash"),
    ("AntShares.Account.GetScriptHash", "Neo.Account.GetScriptHash"),
    ("AntShares.Account.GetVotes", "Neo.Account.GetVotes"),
    ("AntShares.Account.GetBalance", "Neo.Account.GetBalance"),
    ("AntShares.Asset.GetAssetId", "Neo.Asset.GetAssetId"),
    ("AntShares.Asset.GetAssetType", "Neo.Asset.GetAssetType"),
    ("AntShares.Asset.GetAmount", "Neo.Asset.GetAmount"),
    ("AntShares.Asset.GetAvailable", "Neo.Asset.GetAvailable"),
    ("AntShares.Asset.GetPrecision", "Neo.Asset.GetPrecision"),
    ("AntShares.Asset.GetOwner", "Neo.Asset.GetOwner"),
    ("AntShares.Asset.GetAdmin", "Neo.Asset.GetAdmin"),
    ("AntShares.Asset.GetIssuer", "Neo.Asset.GetIssuer"),
    ("AntShares.Contract.GetScript", "Neo.Contract.GetScript"),
    ("AntShares.Storage.GetContext", "Neo.Storage.GetContext"),
    ("AntShares.Storage.Get", "Neo.Storage.Get"),
    ("AntShares.Account.SetVotes", "Neo.Account.SetVotes"),
    ("AntShares.Validator.Register", "Neo.Validator.Register"),
    ("AntShares.Asset.Create", "Neo.Asset.Create"),
    ("AntShares.Asset.Renew", "Neo.Asset.Renew"),
    ("AntShares.Contract.Create", "Neo.Contract.Create"),
    ("AntShares.Contract.Migrate", "Neo.Contract.Migrate"),
    ("AntShares.Contract.GetStorageContext", "Neo.Contract.GetStorageContext"),
    ("AntShares.Contract.Destroy", "Neo.Contract.Destroy"),
    ("AntShares.Storage.Put", "Neo.Storage.Put"),
    ("AntShares.Storage.Delete", "Neo.Storage.Delete"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_canonical_entries() {
        let table = &*SYSCALLS;
        for &(alias, name) in ALIASES {
            let call = table.get(alias).unwrap_or_else(|| panic!("{alias} unresolved"));
            assert_eq!(call.name, name);
        }
    }

    #[test]
    fn test_interop_hash_lookup() {
        let table = &*SYSCALLS;
        let hash = interop_hash("Neo.Runtime.CheckWitness");
        assert_eq!(table.get_by_hash(hash).map(|c| c.name), Some("Neo.Runtime.CheckWitness"));
        let alias = interop_hash("AntShares.Runtime.CheckWitness");
        assert_eq!(table.get_by_hash(alias).map(|c| c.name), Some("Neo.Runtime.CheckWitness"));
    }

    #[test]
    fn test_fixed_prices() {
        let fees = FeeSchedule::default();
        let price = |name: &str| match SYSCALLS.get(name).map(|c| c.price) {
            Some(SysCallPrice::Fixed(price)) => price(&fees),
            _ => panic!("{name} has no fixed price"),
        };
        assert_eq!(price("Neo.Runtime.GetTrigger"), fees.one);
        assert_eq!(price("Neo.Runtime.CheckWitness"), fees.two_hundred);
        assert_eq!(price("Neo.Blockchain.GetHeader"), fees.one_hundred);
        assert_eq!(price("Neo.Storage.Get"), fees.one_hundred);
        assert_eq!(price("Neo.Account.SetVotes"), fees.one_thousand);
        assert_eq!(price("Neo.Asset.Create"), fees.asset_create);
    }
}

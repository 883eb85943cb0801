//! Contract deployment syscalls.

use neo_core::UInt160;
use neo_ledger::{Contract, ContractParameterType, ContractPropertyState, StorageItem};

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::op::{Op, OpArgs, OpOutput};
use crate::stack_item::{InteropValue, StackItem, StorageContext};
use crate::syscall::entity::contract;
use crate::syscall::{require_application, SysCall, SysCallTable};

/// Longest accepted contract script.
const MAX_CONTRACT_SCRIPT: usize = 1024 * 1024;
/// Longest name, version, author and email.
const MAX_CONTRACT_FIELD: usize = 252;
const MAX_CONTRACT_DESCRIPTION: usize = 65536;

pub(super) fn register(table: &mut SysCallTable) {
    table.register(
        SysCall::new("Neo.Contract.Create", create)
            .input(9)
            .output(1)
            .dynamic_price(deploy_price),
    );
    table.register(
        SysCall::new("Neo.Contract.Migrate", migrate)
            .input(9)
            .output(1)
            .dynamic_price(deploy_price),
    );
    table.register(SysCall::new("Neo.Contract.Destroy", destroy));
    table.register(
        SysCall::new("Neo.Contract.GetStorageContext", get_storage_context)
            .input(1)
            .output(1),
    );
}

/// Priced by the properties the new contract declares.
fn deploy_price(machine: &Machine<'_>, context: &ExecutionContext) -> VmResult<i64> {
    let properties = context
        .peek(3)
        .ok_or_else(|| VmError::stack_underflow("SYSCALL", context.stack.len(), 9))?;
    let properties = contract_properties(properties)?;
    Ok(machine.fees().contract(
        properties.contains(ContractPropertyState::HAS_STORAGE),
        properties.contains(ContractPropertyState::HAS_DYNAMIC_INVOKE),
    ))
}

fn contract_properties(item: &StackItem) -> VmResult<ContractPropertyState> {
    let bits = item.as_i64()?;
    u8::try_from(bits)
        .map(ContractPropertyState::from_bits_truncate)
        .map_err(|_| VmError::InvalidEnumValue {
            kind: "ContractPropertyState",
            value: bits.to_string(),
        })
}

fn bounded_string(item: &StackItem, max: usize) -> VmResult<String> {
    let value = item.as_string()?;
    if value.len() > max {
        return Err(VmError::ItemTooLarge);
    }
    Ok(value)
}

/// Builds the contract described by `script params return properties name version
/// author email description`.
fn contract_from_args(args: &[StackItem]) -> VmResult<Contract> {
    let script = args[0].as_buffer()?;
    if script.len() > MAX_CONTRACT_SCRIPT {
        return Err(VmError::ItemTooLarge);
    }
    let parameter_list = args[1]
        .as_buffer()?
        .into_iter()
        .map(|byte| parameter_type(i64::from(byte)))
        .collect::<VmResult<Vec<_>>>()?;
    let return_type = parameter_type(args[2].as_i64()?)?;
    let properties = contract_properties(&args[3])?;

    let mut contract = Contract::new(script, properties);
    contract.parameter_list = parameter_list;
    contract.return_type = return_type;
    contract.name = bounded_string(&args[4], MAX_CONTRACT_FIELD)?;
    contract.code_version = bounded_string(&args[5], MAX_CONTRACT_FIELD)?;
    contract.author = bounded_string(&args[6], MAX_CONTRACT_FIELD)?;
    contract.email = bounded_string(&args[7], MAX_CONTRACT_FIELD)?;
    contract.description = bounded_string(&args[8], MAX_CONTRACT_DESCRIPTION)?;
    Ok(contract)
}

fn parameter_type(value: i64) -> VmResult<ContractParameterType> {
    u8::try_from(value)
        .ok()
        .and_then(ContractParameterType::from_u8)
        .ok_or_else(|| VmError::InvalidEnumValue {
            kind: "ContractParameterType",
            value: value.to_string(),
        })
}

/// Stores the contract unless it already exists. Returns the stored contract and
/// whether this call created it.
fn deploy(
    machine: &mut Machine<'_>,
    context: &mut ExecutionContext,
    contract: Contract,
) -> VmResult<(Contract, bool)> {
    if let Some(existing) = machine.blockchain.try_get_contract(&contract.hash) {
        return Ok((existing, false));
    }
    machine.blockchain.add_contract(contract.clone())?;
    context
        .created_contracts
        .insert(contract.hash, context.script_hash);
    Ok((contract, true))
}

fn create(
    machine: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    require_application(machine, &op.name)?;
    let (contract, _) = deploy(machine, &mut context, contract_from_args(&args.args)?)?;
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::interop(InteropValue::Contract(contract))],
    ))
}

/// Deploys the new contract, moves the caller's storage into it and destroys the caller.
fn migrate(
    machine: &mut Machine<'_>,
    op: &Op,
    mut context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    require_application(machine, &op.name)?;
    let (contract, created) = deploy(machine, &mut context, contract_from_args(&args.args)?)?;
    let from = context.script_hash;
    if created && contract.has_storage() {
        for item in machine.blockchain.find_storage(&from, &[]) {
            machine.blockchain.add_storage(StorageItem {
                hash: contract.hash,
                ..item
            })?;
        }
    }
    destroy_contract(machine, &from)?;
    machine.migrate_contract(&from, &contract.hash);
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::interop(InteropValue::Contract(contract))],
    ))
}

fn destroy_contract(machine: &mut Machine<'_>, hash: &UInt160) -> VmResult<()> {
    let Some(contract) = machine.blockchain.try_get_contract(hash) else {
        return Ok(());
    };
    machine.blockchain.delete_contract(hash);
    if contract.has_storage() {
        for item in machine.blockchain.find_storage(hash, &[]) {
            machine.blockchain.delete_storage(hash, &item.key);
        }
    }
    Ok(())
}

/// Removes the executing contract and its storage.
fn destroy(
    machine: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    _: OpArgs,
) -> VmResult<OpOutput> {
    require_application(machine, &op.name)?;
    destroy_contract(machine, &context.script_hash)?;
    Ok(OpOutput::new(context))
}

/// Storage context of a contract created by the executing script.
fn get_storage_context(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let contract = contract(&args.args[0])?;
    if context.created_contracts.get(&contract.hash) != Some(&context.script_hash) {
        return Err(VmError::InvalidContractGetStorageContext);
    }
    let storage = StorageContext::new(contract.hash, false);
    Ok(OpOutput::with_results(context, vec![StackItem::StorageContext(storage)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(properties: i64) -> Vec<StackItem> {
        vec![
            StackItem::from(&[0x51u8, 0x66][..]),
            StackItem::from(&[0x07u8, 0x05][..]),
            StackItem::from_int(0x05),
            StackItem::from_int(properties),
            StackItem::from("token"),
            StackItem::from("1.0"),
            StackItem::from("author"),
            StackItem::from("a@b.c"),
            StackItem::from("description"),
        ]
    }

    #[test]
    fn test_contract_from_args() {
        let contract = contract_from_args(&args(5)).unwrap();
        assert_eq!(contract.script, vec![0x51, 0x66]);
        assert_eq!(
            contract.parameter_list,
            vec![ContractParameterType::String, ContractParameterType::ByteArray]
        );
        assert_eq!(contract.return_type, ContractParameterType::ByteArray);
        assert!(contract.has_storage());
        assert!(contract.is_payable());
        assert!(!contract.has_dynamic_invoke());
        assert_eq!(contract.name, "token");
    }

    #[test]
    fn test_invalid_return_type() {
        let mut args = args(0);
        args[2] = StackItem::from_int(0x42);
        assert!(matches!(
            contract_from_args(&args),
            Err(VmError::InvalidEnumValue { kind: "ContractParameterType", .. })
        ));
    }

    #[test]
    fn test_invalid_parameter_type_faults() {
        let mut args = args(0);
        args[1] = StackItem::from(&[0x07u8, 0x42][..]);
        assert!(matches!(
            contract_from_args(&args),
            Err(VmError::InvalidEnumValue { kind: "ContractParameterType", value }) if value == "66"
        ));
    }
}

//! Policy contract native implementation.
//!
//! The Policy contract holds the block limits, the network fee per byte and the
//! list of blocked accounts. Reads are free for every trigger; writes need a witness
//! from the consensus address of the current block.

use log::debug;
use neo_config::MAX_PAYLOAD_SIZE;
use neo_core::UInt160;
use neo_ledger::{ContractParameterType, StorageItem};
use neo_vm::stack_item::bigint_to_bytes;
use neo_vm::{
    check_witness, native_script, ExecutionContext, Machine, NativeContract, NativeMethod,
    StackItem, VmError, VmResult,
};
use num_bigint::BigInt;

use super::{argument, storage_int};

pub const PREFIX_MAX_TRANSACTIONS_PER_BLOCK: u8 = 0x17;
pub const PREFIX_FEE_PER_BYTE: u8 = 0x0a;
pub const PREFIX_BLOCKED_ACCOUNTS: u8 = 0x0f;
pub const PREFIX_MAX_BLOCK_SIZE: u8 = 0x10;

const GET_PRICE: i64 = 1_000_000;
const SET_PRICE: i64 = 3_000_000;

const POLICY_METHODS: &[NativeMethod] = &[
    NativeMethod::new(
        "getMaxTransactionsPerBlock",
        GET_PRICE,
        &[],
        ContractParameterType::Integer,
        true,
    ),
    NativeMethod::new("getMaxBlockSize", GET_PRICE, &[], ContractParameterType::Integer, true),
    NativeMethod::new("getFeePerByte", GET_PRICE, &[], ContractParameterType::Integer, true),
    NativeMethod::new("getBlockedAccounts", GET_PRICE, &[], ContractParameterType::Array, true),
    NativeMethod::new(
        "setMaxBlockSize",
        SET_PRICE,
        &[("value", ContractParameterType::Integer)],
        ContractParameterType::Boolean,
        false,
    ),
    NativeMethod::new(
        "setMaxTransactionsPerBlock",
        SET_PRICE,
        &[("value", ContractParameterType::Integer)],
        ContractParameterType::Boolean,
        false,
    ),
    NativeMethod::new(
        "setFeePerByte",
        SET_PRICE,
        &[("value", ContractParameterType::Integer)],
        ContractParameterType::Boolean,
        false,
    ),
    NativeMethod::new(
        "blockAccount",
        SET_PRICE,
        &[("account", ContractParameterType::Hash160)],
        ContractParameterType::Boolean,
        false,
    ),
    NativeMethod::new(
        "unblockAccount",
        SET_PRICE,
        &[("account", ContractParameterType::Hash160)],
        ContractParameterType::Boolean,
        false,
    ),
];

/// The Policy native contract.
#[derive(Debug, Clone)]
pub struct PolicyContract {
    script: Vec<u8>,
}

impl PolicyContract {
    pub const SERVICE_NAME: &'static str = "Neo.Native.Policy";

    /// The default maximum block size, 256 KiB.
    pub const DEFAULT_MAX_BLOCK_SIZE: u32 = 1024 * 256;

    pub const DEFAULT_MAX_TRANSACTIONS_PER_BLOCK: u32 = 512;

    /// The default network fee per transaction byte, in GAS fractions.
    pub const DEFAULT_FEE_PER_BYTE: u32 = 1000;

    pub fn new() -> Self {
        Self {
            script: native_script(Self::SERVICE_NAME),
        }
    }

    pub fn max_transactions_per_block(&self, machine: &Machine<'_>) -> VmResult<BigInt> {
        self.get_int(machine, PREFIX_MAX_TRANSACTIONS_PER_BLOCK)
    }

    pub fn max_block_size(&self, machine: &Machine<'_>) -> VmResult<BigInt> {
        self.get_int(machine, PREFIX_MAX_BLOCK_SIZE)
    }

    pub fn fee_per_byte(&self, machine: &Machine<'_>) -> VmResult<BigInt> {
        self.get_int(machine, PREFIX_FEE_PER_BYTE)
    }

    pub fn blocked_accounts(&self, machine: &Machine<'_>) -> VmResult<Vec<UInt160>> {
        let row = machine
            .blockchain
            .get_storage(&self.hash(), &[PREFIX_BLOCKED_ACCOUNTS])?;
        decode_accounts(&row.value)
    }

    fn get_int(&self, machine: &Machine<'_>, prefix: u8) -> VmResult<BigInt> {
        let row = machine.blockchain.get_storage(&self.hash(), &[prefix])?;
        Ok(storage_int(&row.value))
    }

    fn put(&self, machine: &mut Machine<'_>, prefix: u8, value: Vec<u8>) -> VmResult<()> {
        let item = StorageItem::new(self.hash(), vec![prefix], value);
        if machine.blockchain.try_get_storage(&item.hash, &item.key).is_some() {
            machine.blockchain.update_storage(item)?;
        } else {
            machine.blockchain.add_storage(item)?;
        }
        Ok(())
    }

    /// Whether the consensus address of the current block witnessed the container.
    fn check_committee(&self, machine: &Machine<'_>) -> VmResult<bool> {
        let committee = machine.blockchain.current_block().next_consensus;
        let witnessed = check_witness(machine, &committee)?;
        if !witnessed {
            debug!("policy change rejected: no witness from {committee}");
        }
        Ok(witnessed)
    }

    fn set_blocked(
        &self,
        machine: &mut Machine<'_>,
        account: UInt160,
        blocked: bool,
    ) -> VmResult<()> {
        let mut accounts = self.blocked_accounts(machine)?;
        let present = accounts.contains(&account);
        if blocked && !present {
            accounts.push(account);
        } else if !blocked && present {
            accounts.retain(|candidate| *candidate != account);
        } else {
            return Ok(());
        }
        self.put(machine, PREFIX_BLOCKED_ACCOUNTS, encode_accounts(&accounts))
    }
}

impl Default for PolicyContract {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenated 20-byte script hashes.
fn encode_accounts(accounts: &[UInt160]) -> Vec<u8> {
    accounts.iter().flat_map(|account| account.to_array()).collect()
}

fn decode_accounts(bytes: &[u8]) -> VmResult<Vec<UInt160>> {
    if bytes.len() % 20 != 0 {
        return Err(VmError::conversion("Buffer", "UInt160[]"));
    }
    bytes
        .chunks(20)
        .map(|chunk| {
            UInt160::from_bytes(chunk).map_err(|_| VmError::conversion("Buffer", "UInt160"))
        })
        .collect()
}

impl NativeContract for PolicyContract {
    fn service_name(&self) -> &str {
        Self::SERVICE_NAME
    }

    fn script(&self) -> &[u8] {
        &self.script
    }

    fn methods(&self) -> &[NativeMethod] {
        POLICY_METHODS
    }

    fn invoke(
        &self,
        machine: &mut Machine<'_>,
        _context: &mut ExecutionContext,
        method: &str,
        args: &[StackItem],
    ) -> VmResult<StackItem> {
        match method {
            "getMaxTransactionsPerBlock" => {
                Ok(StackItem::from(self.max_transactions_per_block(machine)?))
            }
            "getMaxBlockSize" => Ok(StackItem::from(self.max_block_size(machine)?)),
            "getFeePerByte" => Ok(StackItem::from(self.fee_per_byte(machine)?)),
            "getBlockedAccounts" => {
                let accounts = self.blocked_accounts(machine)?;
                Ok(StackItem::new_array(accounts.into_iter().map(StackItem::from).collect()))
            }
            "setMaxBlockSize" => {
                let value = argument(args, 0)?.as_big_integer()?;
                if value > BigInt::from(MAX_PAYLOAD_SIZE) {
                    return Err(VmError::MaxPayloadExceeded(format!(
                        "{value} is above {MAX_PAYLOAD_SIZE}"
                    )));
                }
                if !self.check_committee(machine)? {
                    return Ok(StackItem::from_bool(false));
                }
                self.put(machine, PREFIX_MAX_BLOCK_SIZE, bigint_to_bytes(&value))?;
                Ok(StackItem::from_bool(true))
            }
            "setMaxTransactionsPerBlock" | "setFeePerByte" => {
                let value = argument(args, 0)?.as_big_integer()?;
                if !self.check_committee(machine)? {
                    return Ok(StackItem::from_bool(false));
                }
                let prefix = if method == "setFeePerByte" {
                    PREFIX_FEE_PER_BYTE
                } else {
                    PREFIX_MAX_TRANSACTIONS_PER_BLOCK
                };
                self.put(machine, prefix, bigint_to_bytes(&value))?;
                Ok(StackItem::from_bool(true))
            }
            "blockAccount" | "unblockAccount" => {
                let account = argument(args, 0)?.as_uint160()?;
                if !self.check_committee(machine)? {
                    return Ok(StackItem::from_bool(false));
                }
                self.set_blocked(machine, account, method == "blockAccount")?;
                Ok(StackItem::from_bool(true))
            }
            other => Err(self.unknown_method(other)),
        }
    }

    /// Writes the default limits unless they are already present.
    fn initialize(
        &self,
        machine: &mut Machine<'_>,
        _context: &mut ExecutionContext,
    ) -> VmResult<()> {
        let defaults = [
            (PREFIX_MAX_BLOCK_SIZE, bigint_to_bytes(&BigInt::from(Self::DEFAULT_MAX_BLOCK_SIZE))),
            (
                PREFIX_MAX_TRANSACTIONS_PER_BLOCK,
                bigint_to_bytes(&BigInt::from(Self::DEFAULT_MAX_TRANSACTIONS_PER_BLOCK)),
            ),
            (PREFIX_FEE_PER_BYTE, bigint_to_bytes(&BigInt::from(Self::DEFAULT_FEE_PER_BYTE))),
            (PREFIX_BLOCKED_ACCOUNTS, Vec::new()),
        ];
        let hash = self.hash();
        for (prefix, value) in defaults {
            if machine.blockchain.try_get_storage(&hash, &[prefix]).is_none() {
                machine
                    .blockchain
                    .add_storage(StorageItem::new(hash, vec![prefix], value))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_list_encoding() {
        let accounts = vec![UInt160([1; 20]), UInt160([2; 20])];
        let bytes = encode_accounts(&accounts);
        assert_eq!(bytes.len(), 40);
        assert_eq!(decode_accounts(&bytes).unwrap(), accounts);
        assert!(decode_accounts(&[]).unwrap().is_empty());
        assert!(decode_accounts(&[0; 21]).is_err());
    }

    #[test]
    fn test_setters_are_not_safe() {
        let policy = PolicyContract::new();
        for method in policy.methods() {
            assert_eq!(method.safe, method.name.starts_with("get"), "{}", method.name);
        }
        assert_eq!(policy.method("setFeePerByte").map(|m| m.price), Some(SET_PRICE));
    }
}

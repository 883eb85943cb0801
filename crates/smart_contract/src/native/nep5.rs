//! NEP-5 token base shared by the native GAS and NEO tokens.
//!
//! Balances live in the token's own storage: the total supply under
//! [`PREFIX_TOTAL_SUPPLY`] and one row per holder under [`PREFIX_ACCOUNT`] followed by
//! the holder's script hash. Balances are stored as minimal little-endian integers
//! and a holder whose balance drops to zero loses its row.

use log::debug;
use neo_core::UInt160;
use neo_ledger::{ContractParameterType, StorageItem};
use neo_vm::stack_item::bigint_to_bytes;
use neo_vm::{
    check_witness, native_script, BalanceChange, ContractParameter, ExecutionContext, Machine,
    NativeContract, NativeMethod, StackItem, VmError, VmResult,
};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use super::{argument, storage_int};

pub const PREFIX_TOTAL_SUPPLY: u8 = 0x11;
pub const PREFIX_ACCOUNT: u8 = 0x20;

pub const NEP5_STANDARDS: &[&str] = &["NEP-5", "NEP-10"];

pub const NEP5_METHODS: &[NativeMethod] = &[
    NativeMethod::new("name", 0, &[], ContractParameterType::String, true),
    NativeMethod::new("symbol", 0, &[], ContractParameterType::String, true),
    NativeMethod::new("decimals", 0, &[], ContractParameterType::Integer, true),
    NativeMethod::new("totalSupply", 1_000_000, &[], ContractParameterType::Integer, true),
    NativeMethod::new(
        "balanceOf",
        1_000_000,
        &[("account", ContractParameterType::Hash160)],
        ContractParameterType::Integer,
        true,
    ),
    NativeMethod::new(
        "transfer",
        8_000_000,
        &[
            ("from", ContractParameterType::Hash160),
            ("to", ContractParameterType::Hash160),
            ("amount", ContractParameterType::Integer),
        ],
        ContractParameterType::Boolean,
        false,
    ),
];

/// Storage key of the total supply row.
pub fn total_supply_key() -> Vec<u8> {
    vec![PREFIX_TOTAL_SUPPLY]
}

/// Storage key of the balance row of `account`.
pub fn account_key(account: &UInt160) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + 20);
    key.push(PREFIX_ACCOUNT);
    key.extend_from_slice(account.as_bytes());
    key
}

/// A fungible token whose ledger is kept in native storage.
#[derive(Debug, Clone)]
pub struct Nep5Token {
    service_name: &'static str,
    name: &'static str,
    symbol: &'static str,
    decimals: u8,
    script: Vec<u8>,
}

impl Nep5Token {
    pub fn new(
        service_name: &'static str,
        name: &'static str,
        symbol: &'static str,
        decimals: u8,
    ) -> Self {
        Self {
            service_name,
            name,
            symbol,
            decimals,
            script: native_script(service_name),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn symbol(&self) -> &str {
        self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// `10^decimals`, the number of indivisible units in one token.
    pub fn factor(&self) -> BigInt {
        num_traits::pow(BigInt::from(10), self.decimals as usize)
    }

    pub fn total_supply(&self, machine: &Machine<'_>) -> BigInt {
        let hash = self.hash();
        machine
            .blockchain
            .try_get_storage(&hash, &total_supply_key())
            .map_or_else(BigInt::zero, |item| storage_int(&item.value))
    }

    pub fn balance_of(&self, machine: &Machine<'_>, account: &UInt160) -> BigInt {
        let hash = self.hash();
        machine
            .blockchain
            .try_get_storage(&hash, &account_key(account))
            .map_or_else(BigInt::zero, |item| storage_int(&item.value))
    }

    /// Moves `amount` from `from` to `to`. Returns `false` when the transfer is not
    /// authorised, the receiver refuses payments or the sender lacks funds.
    pub fn transfer(
        &self,
        machine: &mut Machine<'_>,
        context: &mut ExecutionContext,
        from: UInt160,
        to: UInt160,
        amount: &BigInt,
    ) -> VmResult<bool> {
        if amount.is_negative() {
            return Err(VmError::InvalidAmount(format!("expected at least 0, found {amount}")));
        }
        if self.caller(context) != from && !check_witness(machine, &from)? {
            debug!("{} transfer from {from} rejected: missing witness", self.symbol);
            return Ok(false);
        }
        if let Some(contract) = machine.blockchain.try_get_contract(&to) {
            if !contract.is_payable() {
                debug!("{} transfer to {to} rejected: contract is not payable", self.symbol);
                return Ok(false);
            }
        }

        let hash = self.hash();
        let from_key = account_key(&from);
        let from_row = machine.blockchain.try_get_storage(&hash, &from_key);
        if amount.is_zero() {
            if from_row.is_some() {
                self.on_balance_change(machine, from, BigInt::zero());
            }
        } else {
            let Some(mut from_row) = from_row else {
                return Ok(false);
            };
            let balance = storage_int(&from_row.value);
            if &balance < amount {
                return Ok(false);
            }
            if from == to {
                self.on_balance_change(machine, from, BigInt::zero());
            } else {
                self.on_balance_change(machine, from, -amount.clone());
                if &balance == amount {
                    machine.blockchain.delete_storage(&hash, &from_key);
                } else {
                    from_row.value = bigint_to_bytes(&(balance - amount));
                    machine.blockchain.update_storage(from_row)?;
                }
                self.on_balance_change(machine, to, amount.clone());
                self.credit(machine, &to, amount)?;
            }
        }

        self.notify_transfer(machine, context, Some(from), Some(to), amount);
        Ok(true)
    }

    /// Creates `amount` new tokens owned by `account`.
    pub fn mint(
        &self,
        machine: &mut Machine<'_>,
        context: &mut ExecutionContext,
        account: UInt160,
        amount: &BigInt,
    ) -> VmResult<()> {
        if amount.is_negative() {
            return Err(VmError::InvalidAmount(format!("expected at least 0, found {amount}")));
        }
        if amount.is_zero() {
            return Ok(());
        }
        self.on_balance_change(machine, account, amount.clone());
        self.credit(machine, &account, amount)?;
        self.adjust_total_supply(machine, amount)?;
        self.notify_transfer(machine, context, None, Some(account), amount);
        Ok(())
    }

    /// Destroys `amount` tokens owned by `account`.
    pub fn burn(
        &self,
        machine: &mut Machine<'_>,
        context: &mut ExecutionContext,
        account: UInt160,
        amount: &BigInt,
    ) -> VmResult<()> {
        if amount.is_negative() {
            return Err(VmError::InvalidAmount(format!("expected at least 0, found {amount}")));
        }
        if amount.is_zero() {
            return Ok(());
        }
        let hash = self.hash();
        let key = account_key(&account);
        let mut row = machine.blockchain.get_storage(&hash, &key)?;
        let balance = storage_int(&row.value);
        if &balance < amount {
            return Err(VmError::InvalidAmount(format!(
                "{account} holds {balance}, cannot burn {amount}"
            )));
        }
        self.on_balance_change(machine, account, -amount.clone());
        if &balance == amount {
            machine.blockchain.delete_storage(&hash, &key);
        } else {
            row.value = bigint_to_bytes(&(balance - amount));
            machine.blockchain.update_storage(row)?;
        }
        self.adjust_total_supply(machine, &-amount.clone())?;
        self.notify_transfer(machine, context, Some(account), None, amount);
        Ok(())
    }

    /// Script hash the transfer is made on behalf of: the caller of the token when
    /// it was reached through its own script, the running script otherwise.
    fn caller(&self, context: &ExecutionContext) -> UInt160 {
        if context.script_hash == self.hash() {
            context.calling_script_hash.unwrap_or(context.script_hash)
        } else {
            context.script_hash
        }
    }

    fn credit(
        &self,
        machine: &mut Machine<'_>,
        account: &UInt160,
        amount: &BigInt,
    ) -> VmResult<()> {
        let hash = self.hash();
        let key = account_key(account);
        match machine.blockchain.try_get_storage(&hash, &key) {
            Some(mut row) => {
                row.value = bigint_to_bytes(&(storage_int(&row.value) + amount));
                machine.blockchain.update_storage(row)?;
            }
            None => {
                machine
                    .blockchain
                    .add_storage(StorageItem::new(hash, key, bigint_to_bytes(amount)))?;
            }
        }
        Ok(())
    }

    fn adjust_total_supply(&self, machine: &mut Machine<'_>, delta: &BigInt) -> VmResult<()> {
        let hash = self.hash();
        let key = total_supply_key();
        match machine.blockchain.try_get_storage(&hash, &key) {
            Some(mut row) => {
                row.value = bigint_to_bytes(&(storage_int(&row.value) + delta));
                machine.blockchain.update_storage(row)?;
            }
            None => {
                machine
                    .blockchain
                    .add_storage(StorageItem::new(hash, key, bigint_to_bytes(delta)))?;
            }
        }
        Ok(())
    }

    fn on_balance_change(&self, machine: &mut Machine<'_>, address: UInt160, amount: BigInt) {
        machine.balance_change(&BalanceChange {
            asset: self.hash(),
            address,
            amount,
        });
    }

    fn notify_transfer(
        &self,
        machine: &mut Machine<'_>,
        context: &mut ExecutionContext,
        from: Option<UInt160>,
        to: Option<UInt160>,
        amount: &BigInt,
    ) {
        let party = |account: Option<UInt160>| {
            account.map_or(ContractParameter::Void, ContractParameter::Hash160)
        };
        let state = ContractParameter::Array(vec![
            ContractParameter::String("Transfer".to_string()),
            party(from),
            party(to),
            ContractParameter::Integer(amount.clone()),
        ]);
        machine.emit_notification(context, self.hash(), state);
    }
}

impl NativeContract for Nep5Token {
    fn service_name(&self) -> &str {
        self.service_name
    }

    fn script(&self) -> &[u8] {
        &self.script
    }

    fn methods(&self) -> &[NativeMethod] {
        NEP5_METHODS
    }

    fn supported_standards(&self) -> &[&'static str] {
        NEP5_STANDARDS
    }

    fn invoke(
        &self,
        machine: &mut Machine<'_>,
        context: &mut ExecutionContext,
        method: &str,
        args: &[StackItem],
    ) -> VmResult<StackItem> {
        match method {
            "name" => Ok(StackItem::from(self.name)),
            "symbol" => Ok(StackItem::from(self.symbol)),
            "decimals" => Ok(StackItem::from_int(self.decimals)),
            "totalSupply" => Ok(StackItem::from(self.total_supply(machine))),
            "balanceOf" => {
                let account = argument(args, 0)?.as_uint160()?;
                Ok(StackItem::from(self.balance_of(machine, &account)))
            }
            "transfer" => {
                let from = argument(args, 0)?.as_uint160()?;
                let to = argument(args, 1)?.as_uint160()?;
                let amount = argument(args, 2)?.as_big_integer()?;
                let result = self.transfer(machine, context, from, to, &amount)?;
                Ok(StackItem::from_bool(result))
            }
            other => Err(self.unknown_method(other)),
        }
    }
}

//! Voting, validator registration and asset issuance syscalls.
//!
//! Every operation here is authorized by a witness of the affected account or key.

use neo_config::BLOCK_HEIGHT_YEAR;
use neo_ledger::{Account, Asset, AssetType, ScriptContainer, TransactionType, Validator};

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::op::{Op, OpArgs, OpOutput};
use crate::stack_item::{InteropValue, StackItem};
use crate::syscall::runtime::{check_witness, check_witness_public_key};
use crate::syscall::{require_application, SysCall, SysCallTable};

/// Blocks an asset stays registered before it must be renewed.
const ASSET_LIFETIME: u32 = 2_000_000;
/// Asset amounts are Fixed8 values with at most this many decimals.
const MAX_ASSET_PRECISION: u32 = 8;
const MAX_ASSET_NAME: usize = 1024;

pub(super) fn register(table: &mut SysCallTable) {
    table.register(
        SysCall::new("Neo.Account.SetVotes", set_votes)
            .input(2)
            .price(|fees| fees.one_thousand),
    );
    table.register(
        SysCall::new("Neo.Validator.Register", register_validator)
            .input(1)
            .output(1)
            .price(|fees| fees.validator_register),
    );
    table.register(
        SysCall::new("Neo.Asset.Create", create_asset)
            .input(7)
            .output(1)
            .price(|fees| fees.asset_create),
    );
    table.register(
        SysCall::new("Neo.Asset.Renew", renew_asset)
            .input(2)
            .output(1)
            .dynamic_price(renew_price),
    );
}

fn account_of(item: &StackItem) -> VmResult<&Account> {
    match item.as_interop()? {
        InteropValue::Account(account) => Ok(account),
        other => Err(VmError::conversion(other.type_name(), "Account")),
    }
}

fn asset_of(item: &StackItem) -> VmResult<&Asset> {
    match item.as_interop()? {
        InteropValue::Asset(asset) => Ok(asset),
        other => Err(VmError::conversion(other.type_name(), "Asset")),
    }
}

/// `account votes`: replaces the account's votes.
fn set_votes(
    machine: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    require_application(machine, &op.name)?;
    let hash = account_of(&args.args[0])?.hash;
    let votes = args.args[1]
        .as_array()?
        .iter()
        .map(StackItem::as_ecpoint)
        .collect::<VmResult<Vec<_>>>()?;
    if votes.len() > machine.limits().max_votes {
        return Err(VmError::TooManyVotes);
    }

    let mut account = machine
        .blockchain
        .try_get_account(&hash)
        .unwrap_or_else(|| Account::new(hash));
    if account.is_frozen {
        return Err(VmError::AccountFrozen);
    }
    let governing_token = machine.blockchain.settings().governing_token;
    if account.balance(&governing_token) <= 0 && !votes.is_empty() {
        return Err(VmError::NotEligibleVote);
    }
    if !check_witness(machine, &hash)? {
        return Err(VmError::BadWitness);
    }

    account.votes = votes.clone();
    if account.is_deletable() {
        machine.blockchain.delete_account(&hash);
    } else {
        machine.blockchain.put_account(account);
    }
    machine.set_votes(&hash, &votes);
    Ok(OpOutput::new(context))
}

fn register_validator(
    machine: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    require_application(machine, &op.name)?;
    let public_key = args.args[0].as_ecpoint()?;
    if !check_witness_public_key(machine, &public_key)? {
        return Err(VmError::BadWitness);
    }
    let validator = match machine.blockchain.try_get_validator(&public_key) {
        Some(validator) => validator,
        None => {
            let validator = Validator::new(public_key);
            machine.blockchain.add_validator(validator.clone())?;
            validator
        }
    };
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::interop(InteropValue::Validator(validator))],
    ))
}

/// Checks an asset amount against its precision. `-1` stands for an unlimited supply.
fn check_amount(amount: i64, precision: u32) -> VmResult<()> {
    if amount == 0 || amount < -1 {
        return Err(VmError::InvalidAmount(amount.to_string()));
    }
    let unit = 10_i64.pow(MAX_ASSET_PRECISION - precision);
    if amount != -1 && amount % unit != 0 {
        return Err(VmError::InvalidAmount(amount.to_string()));
    }
    Ok(())
}

/// `type name amount precision owner admin issuer`: registers an asset keyed by the
/// invocation transaction's hash.
fn create_asset(
    machine: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    require_application(machine, &op.name)?;
    let hash = match &machine.init.script_container {
        ScriptContainer::Transaction(tx) if tx.tx_type == TransactionType::Invocation => tx.hash(),
        _ => return Err(VmError::UnexpectedScriptContainer),
    };

    let type_byte = args.args[0].as_i64()?;
    let asset_type = u8::try_from(type_byte)
        .ok()
        .and_then(AssetType::from_u8)
        .ok_or_else(|| VmError::InvalidEnumValue {
            kind: "AssetType",
            value: type_byte.to_string(),
        })?;
    if matches!(asset_type, AssetType::GoverningToken | AssetType::UtilityToken) {
        return Err(VmError::InvalidAssetType);
    }

    let name = args.args[1].as_string()?;
    if name.len() > MAX_ASSET_NAME {
        return Err(VmError::ItemTooLarge);
    }
    let amount = args.args[2].as_i64()?;
    let precision = args.args[3].as_i64()?;
    let precision = u8::try_from(precision)
        .ok()
        .filter(|precision| u32::from(*precision) <= MAX_ASSET_PRECISION)
        .ok_or_else(|| VmError::InvalidEnumValue {
            kind: "precision",
            value: precision.to_string(),
        })?;
    check_amount(amount, u32::from(precision))?;

    let owner = args.args[4].as_ecpoint()?;
    if !check_witness_public_key(machine, &owner)? {
        return Err(VmError::BadWitness);
    }
    let admin = args.args[5].as_uint160()?;
    let issuer = args.args[6].as_uint160()?;

    let expiration = machine
        .blockchain
        .current_block()
        .index
        .saturating_add(1)
        .saturating_add(ASSET_LIFETIME);
    let asset = Asset {
        hash,
        asset_type,
        name,
        amount,
        available: 0,
        precision,
        owner,
        admin,
        issuer,
        expiration,
        is_frozen: false,
    };
    machine.blockchain.add_asset(asset.clone())?;
    Ok(OpOutput::with_results(
        context,
        vec![StackItem::interop(InteropValue::Asset(asset))],
    ))
}

fn renew_years(item: &StackItem) -> VmResult<u8> {
    let years = item.as_i64()?;
    u8::try_from(years).map_err(|_| VmError::InvalidAmount(years.to_string()))
}

/// Priced per renewed year.
fn renew_price(machine: &Machine<'_>, context: &ExecutionContext) -> VmResult<i64> {
    let years = context
        .peek(1)
        .ok_or_else(|| VmError::stack_underflow("SYSCALL", context.stack.len(), 2))?;
    let years = renew_years(years)?;
    Ok(machine.fees().asset_renew_per_year.saturating_mul(i64::from(years)))
}

/// New expiration of an asset renewed at `height`.
fn renewed_expiration(expiration: u32, height: u32, years: u8) -> u32 {
    let start = u64::from(expiration.max(height.saturating_add(1)));
    let extended = start + u64::from(years) * u64::from(BLOCK_HEIGHT_YEAR);
    u32::try_from(extended).unwrap_or(u32::MAX)
}

/// `asset years`: extends the registration and returns the new expiration.
fn renew_asset(
    machine: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    require_application(machine, &op.name)?;
    let hash = asset_of(&args.args[0])?.hash;
    let years = renew_years(&args.args[1])?;
    let mut asset = machine.blockchain.get_asset(&hash)?;
    let height = machine.blockchain.current_block().index;
    asset.expiration = renewed_expiration(asset.expiration, height, years);
    let expiration = asset.expiration;
    machine.blockchain.update_asset(asset)?;
    Ok(OpOutput::with_results(context, vec![StackItem::from_int(expiration)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renewed_expiration() {
        assert_eq!(renewed_expiration(100, 10, 1), 100 + BLOCK_HEIGHT_YEAR);
        assert_eq!(renewed_expiration(5, 10, 1), 11 + BLOCK_HEIGHT_YEAR);
        assert_eq!(renewed_expiration(u32::MAX - 1, 0, 255), u32::MAX);
        assert_eq!(renewed_expiration(7, 3, 0), 7);
    }

    #[test]
    fn test_check_amount() {
        assert!(check_amount(-1, 0).is_ok());
        assert!(check_amount(100_000_000, 0).is_ok());
        assert!(check_amount(1, 8).is_ok());
        assert!(check_amount(1, 0).is_err());
        assert!(check_amount(0, 8).is_err());
        assert!(check_amount(-5, 8).is_err());
    }
}

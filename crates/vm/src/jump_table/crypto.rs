//! Cryptographic operations for the Neo Virtual Machine.
//!
//! Signature checks verify against the message of the executing script container.
//! Failures inside verification produce `false` rather than a fault.

use neo_config::FeeSchedule;
use neo_core::{UInt160, UInt256};
use neo_cryptography::{hash160, hash256, sha1, sha256, verify_signature, ECPoint};

use crate::error::{VmError, VmResult};
use crate::execution_context::ExecutionContext;
use crate::execution_engine::Machine;
use crate::jump_table::JumpTable;
use crate::op::{MultiSigArg, Op, OpArgs, OpOutput, Operand};
use crate::op_code::OpCode;
use crate::stack_item::StackItem;

/// Registers the cryptographic operation handlers.
pub fn register_handlers(jump_table: &mut JumpTable, fees: &FeeSchedule) {
    jump_table.register(Op::new(OpCode::SHA1, fees.ten, hash_sha1).input(1).output(1));
    jump_table.register(Op::new(OpCode::SHA256, fees.ten, hash_sha256).input(1).output(1));
    jump_table.register(Op::new(OpCode::HASH160, fees.twenty, hash_160).input(1).output(1));
    jump_table.register(Op::new(OpCode::HASH256, fees.twenty, hash_256).input(1).output(1));
    jump_table.register(
        Op::new(OpCode::CHECKSIG, fees.one_hundred, check_sig)
            .input(2)
            .output(1),
    );
    jump_table.register(
        Op::new(OpCode::VERIFY, fees.one_hundred, verify)
            .input(3)
            .output(1),
    );
    jump_table.register_dynamic(OpCode::CHECKMULTISIG, build_check_multisig);
}

fn hash_sha1(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let digest = sha1(&args.args[0].as_buffer()?);
    Ok(OpOutput::with_results(context, vec![StackItem::from(&digest[..])]))
}

fn hash_sha256(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let digest = sha256(&args.args[0].as_buffer()?);
    Ok(OpOutput::with_results(context, vec![StackItem::from(&digest[..])]))
}

fn hash_160(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let digest = UInt160(hash160(&args.args[0].as_buffer()?));
    Ok(OpOutput::with_results(context, vec![StackItem::UInt160(digest)]))
}

fn hash_256(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let digest = UInt256(hash256(&args.args[0].as_buffer()?));
    Ok(OpOutput::with_results(context, vec![StackItem::UInt256(digest)]))
}

/// Message signed by the witnesses of the executing script container.
fn container_message(machine: &Machine<'_>) -> Option<Vec<u8>> {
    machine.init.script_container.message().ok()
}

fn check_sig(
    machine: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let public_key = args.args[0].as_ecpoint()?;
    let signature = args.args[1].as_buffer()?;
    let result = container_message(machine)
        .map_or(false, |message| {
            verify_signature(&message, &signature, &public_key).unwrap_or(false)
        });
    Ok(OpOutput::with_results(context, vec![StackItem::from_bool(result)]))
}

/// `VERIFY message signature key`: checks a signature over an explicit message.
fn verify(
    _: &mut Machine<'_>,
    _: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let public_key = args.args[0].as_ecpoint()?;
    let signature = args.args[1].as_buffer()?;
    let message = args.args[2].as_buffer()?;
    let result = verify_signature(&message, &signature, &public_key).unwrap_or(false);
    Ok(OpOutput::with_results(context, vec![StackItem::from_bool(result)]))
}

/// Reads the shape of one `CHECKMULTISIG` operand group from the stack item at `index`.
fn multisig_arg(
    context: &ExecutionContext,
    index: usize,
    allow_zero: bool,
) -> VmResult<(MultiSigArg, usize)> {
    let item = match context.peek(index) {
        Some(item) => item,
        None => return Ok((MultiSigArg::Packed, 0)),
    };
    if item.is_array() {
        return Ok((MultiSigArg::Packed, item.as_array_ref()?.borrow().len()));
    }
    let count = item.as_i64()?;
    if count < 0 || (count == 0 && !allow_zero) {
        return Err(VmError::InvalidCheckMultisigArguments);
    }
    let count = count as usize;
    Ok((MultiSigArg::Inline(count), count))
}

/// Keys are either an array or a positive count followed by that many keys. Signatures
/// follow in the same shape.
fn build_check_multisig(machine: &Machine<'_>, context: &mut ExecutionContext) -> VmResult<Op> {
    let (keys, key_count) = multisig_arg(context, 0, false)?;
    let (sigs, _) = multisig_arg(context, keys.input(), true)?;
    let fees = machine.fees();
    let fee = if key_count == 0 {
        fees.one
    } else {
        fees.one_hundred.saturating_mul(key_count as i64)
    };

    Ok(Op::new(OpCode::CHECKMULTISIG, fee, check_multisig)
        .input(keys.input().saturating_add(sigs.input()))
        .output(1)
        .operand(Operand::MultiSig { keys, sigs }))
}

/// Splits one operand group off the front of `args`.
fn split_group(args: &[StackItem], arg: MultiSigArg) -> VmResult<(Vec<StackItem>, &[StackItem])> {
    match arg {
        MultiSigArg::Packed => Ok((args[0].as_array()?, &args[1..])),
        MultiSigArg::Inline(count) => Ok((args[1..=count].to_vec(), &args[count + 1..])),
    }
}

fn check_multisig(
    machine: &mut Machine<'_>,
    op: &Op,
    context: ExecutionContext,
    args: OpArgs,
) -> VmResult<OpOutput> {
    let Operand::MultiSig { keys, sigs } = op.operand else {
        return Err(VmError::UnknownOp(op.opcode));
    };
    let (key_items, rest) = split_group(&args.args, keys)?;
    let (signature_items, _) = split_group(rest, sigs)?;

    let public_keys = key_items
        .iter()
        .map(StackItem::as_ecpoint)
        .collect::<VmResult<Vec<_>>>()?;
    let signatures = signature_items
        .iter()
        .map(StackItem::as_buffer)
        .collect::<VmResult<Vec<_>>>()?;
    if public_keys.is_empty() || signatures.is_empty() {
        return Err(VmError::InvalidCheckMultisigArguments);
    }

    let result = container_message(machine)
        .map_or(false, |message| verify_multisig(&message, &signatures, &public_keys));
    Ok(OpOutput::with_results(context, vec![StackItem::from_bool(result)]))
}

/// Checks `m` signatures against `n` keys in order.
///
/// Signatures must appear in the same order as their keys. The scan stops as soon as the
/// remaining signatures outnumber the remaining keys, and any verification error makes
/// the whole check fail.
pub fn verify_multisig(message: &[u8], signatures: &[Vec<u8>], public_keys: &[ECPoint]) -> bool {
    let m = signatures.len();
    let n = public_keys.len();
    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        match verify_signature(message, &signatures[i], &public_keys[j]) {
            Ok(true) => i += 1,
            Ok(false) => {}
            Err(_) => return false,
        }
        j += 1;
        if m - i > n - j {
            return false;
        }
    }
    i == m
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::signature::Signer;
    use p256::ecdsa::{Signature, SigningKey};

    fn key(seed: u8) -> (SigningKey, ECPoint) {
        let signing = SigningKey::from_slice(&[seed; 32]).unwrap();
        let encoded = signing.verifying_key().to_encoded_point(true);
        let point = ECPoint::from_bytes(encoded.as_bytes()).unwrap();
        (signing, point)
    }

    fn sign(signing: &SigningKey, message: &[u8]) -> Vec<u8> {
        let signature: Signature = signing.sign(message);
        signature.to_bytes().to_vec()
    }

    #[test]
    fn test_multisig_in_key_order() {
        let message = b"container";
        let (k1, p1) = key(1);
        let (_, p2) = key(2);
        let (k3, p3) = key(3);
        let keys = vec![p1, p2, p3];
        let sigs = vec![sign(&k1, message), sign(&k3, message)];
        assert!(verify_multisig(message, &sigs, &keys));
    }

    #[test]
    fn test_multisig_out_of_order_fails() {
        let message = b"container";
        let (k1, p1) = key(1);
        let (k2, p2) = key(2);
        let keys = vec![p1, p2];
        let sigs = vec![sign(&k2, message), sign(&k1, message)];
        assert!(!verify_multisig(message, &sigs, &keys));
    }

    #[test]
    fn test_multisig_more_signatures_than_keys() {
        let message = b"container";
        let (k1, p1) = key(1);
        let sigs = vec![sign(&k1, message), sign(&k1, message)];
        assert!(!verify_multisig(message, &sigs, &[p1]));
    }

    #[test]
    fn test_multisig_malformed_signature_is_false() {
        let (_, p1) = key(1);
        assert!(!verify_multisig(b"m", &[vec![1, 2, 3]], &[p1]));
    }
}

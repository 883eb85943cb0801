//! `CHECKSIG`, `VERIFY` and `CHECKMULTISIG` against real secp256r1 signatures.

mod common;

use common::{fault_message, invocation, run_with};
use neo_cryptography::ECPoint;
use neo_ledger::{MemoryBlockchain, ScriptContainer, Transaction};
use neo_vm::{ContractParameter, ExecutionInit, OpCode, ScriptBuilder, TriggerType};
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};

struct Key {
    signing: SigningKey,
    public: ECPoint,
}

fn key(seed: u8) -> Key {
    let signing = SigningKey::from_slice(&[seed; 32]).unwrap();
    let encoded = signing.verifying_key().to_encoded_point(true);
    Key {
        signing,
        public: ECPoint::from_bytes(encoded.as_bytes()).unwrap(),
    }
}

/// The container every script in this file runs for.
fn container() -> Transaction {
    Transaction::invocation(vec![OpCode::PUSH1 as u8])
}

fn init() -> ExecutionInit {
    ExecutionInit::new(ScriptContainer::Transaction(container()), TriggerType::Verification)
}

fn sign(key: &Key) -> Vec<u8> {
    let message = container().message().unwrap();
    let signature: Signature = key.signing.sign(&message);
    signature.to_bytes().to_vec()
}

/// Signatures then keys, each group followed by its count.
fn multisig_script(signatures: &[Vec<u8>], keys: &[&Key]) -> Vec<u8> {
    let mut builder = ScriptBuilder::new();
    for signature in signatures {
        builder.emit_push(signature);
    }
    builder.emit_push_int(signatures.len() as i64);
    for key in keys {
        builder.emit_push(key.public.as_bytes());
    }
    builder
        .emit_push_int(keys.len() as i64)
        .emit_opcode(OpCode::CHECKMULTISIG);
    builder.into_bytes()
}

fn check(script: &[u8]) -> ContractParameter {
    let mut chain = MemoryBlockchain::default();
    let result = run_with(&mut chain, script, &init(), None);
    assert!(result.state.is_halt(), "{:?}", result.error_message);
    assert_eq!(result.stack.len(), 1);
    result.stack[0].clone()
}

#[test]
fn test_check_sig() {
    let a = key(1);
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(&sign(&a))
        .emit_push(a.public.as_bytes())
        .emit_opcode(OpCode::CHECKSIG);
    assert_eq!(check(&builder.into_bytes()), ContractParameter::Boolean(true));

    let b = key(2);
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(&sign(&a))
        .emit_push(b.public.as_bytes())
        .emit_opcode(OpCode::CHECKSIG);
    assert_eq!(check(&builder.into_bytes()), ContractParameter::Boolean(false));
}

#[test]
fn test_verify_explicit_message() {
    let a = key(3);
    let signature: Signature = a.signing.sign(b"payload");
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"payload")
        .emit_push(&signature.to_bytes())
        .emit_push(a.public.as_bytes())
        .emit_opcode(OpCode::VERIFY);
    assert_eq!(check(&builder.into_bytes()), ContractParameter::Boolean(true));
}

#[test]
fn test_two_of_two() {
    let (a, b) = (key(1), key(2));
    let script = multisig_script(&[sign(&a), sign(&b)], &[&a, &b]);
    assert_eq!(check(&script), ContractParameter::Boolean(true));
}

#[test]
fn test_signatures_out_of_key_order() {
    let (a, b) = (key(1), key(2));
    let script = multisig_script(&[sign(&b), sign(&a)], &[&a, &b]);
    assert_eq!(check(&script), ContractParameter::Boolean(false));
}

#[test]
fn test_two_of_three_skips_unsigned_key() {
    let (a, b, c) = (key(1), key(2), key(3));
    let script = multisig_script(&[sign(&a), sign(&c)], &[&a, &b, &c]);
    assert_eq!(check(&script), ContractParameter::Boolean(true));
}

#[test]
fn test_more_signatures_than_keys() {
    let (a, b) = (key(1), key(2));
    let script = multisig_script(&[sign(&a), sign(&b), sign(&b)], &[&a, &b]);
    assert_eq!(check(&script), ContractParameter::Boolean(false));
}

#[test]
fn test_packed_keys() {
    let (a, b) = (key(4), key(5));
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(&sign(&a))
        .emit_push(&sign(&b))
        .emit_push_int(2)
        .emit_push(a.public.as_bytes())
        .emit_push(b.public.as_bytes())
        .emit_push_int(2)
        .emit_opcode(OpCode::PACK)
        .emit_opcode(OpCode::CHECKMULTISIG);
    assert_eq!(check(&builder.into_bytes()), ContractParameter::Boolean(true));
}

#[test]
fn test_zero_keys_faults() {
    let a = key(1);
    let script = multisig_script(&[sign(&a)], &[]);
    let mut chain = MemoryBlockchain::default();
    let result = run_with(&mut chain, &script, &invocation(&script, &[]), None);
    assert!(fault_message(&result).contains("Invalid CHECKMULTISIG Arguments"));
}

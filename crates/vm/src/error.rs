//! Error types for the Neo Virtual Machine.
//!
//! Every variant is a fault class: raising one from an op or syscall transitions the
//! executing context to `FAULT` with the rendered message.

use neo_core::{CoreError, UInt160};
use neo_cryptography::CryptoError;
use neo_io::IoError;
use neo_ledger::LedgerError;
use thiserror::Error;

/// Faults raised while decoding or executing a script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("Stack Underflow. Op: {op}. Stack Length: {length}. Expected: {expected}")]
    StackUnderflow {
        op: String,
        length: usize,
        expected: usize,
    },

    #[error("Alt Stack Underflow.")]
    AltStackUnderflow,

    #[error("Stack Overflow")]
    StackOverflow,

    #[error("Invocation Stack Overflow")]
    InvocationStackOverflow,

    #[error("Array Overflow")]
    ArrayOverflow,

    #[error("Item Overflow")]
    ItemOverflow,

    #[error("Item Too Large")]
    ItemTooLarge,

    #[error("Script Too Large: {0} bytes")]
    ScriptTooLarge(usize),

    #[error("Container Too Large")]
    ContainerTooLarge,

    #[error("Out of GAS")]
    OutOfGas,

    #[error("Code Overflow")]
    CodeOverflow,

    #[error("Unknown op: {0:#04x}")]
    UnknownOp(u8),

    #[error("Push only mode, found non-push byte code: {0:#04x}")]
    PushOnly(u8),

    #[error("Unknown SysCall: {0}")]
    UnknownSysCall(String),

    #[error("Op {op} returned {actual} results, declared {expected}")]
    ResultCountMismatch {
        op: String,
        expected: usize,
        actual: usize,
    },

    #[error("Script execution threw an Error")]
    Throw,

    #[error("{0} Negative Index")]
    NegativeIndex(&'static str),

    #[error("SUBSTR Negative End")]
    SubstrNegativeEnd,

    #[error("SUBSTR Negative Start")]
    SubstrNegativeStart,

    #[error("RIGHT Length Less Than Index")]
    RightLength,

    #[error("Shift Too Large: {0}")]
    ShiftTooLarge(String),

    #[error("Divide By Zero")]
    DivideByZero,

    #[error("Number Too Large: {0}")]
    NumberTooLarge(String),

    #[error("Invalid PACK Count")]
    InvalidPackCount,

    #[error("Invalid CHECKMULTISIG Arguments")]
    InvalidCheckMultisigArguments,

    #[error("Invalid PICKITEM Index: {0}")]
    InvalidPickItemKey(String),

    #[error("Invalid SETITEM Index")]
    InvalidSetItemIndex,

    #[error("Invalid REMOVE Index: {0}")]
    InvalidRemoveIndex(String),

    #[error("Invalid HASKEY Index")]
    InvalidHasKeyIndex,

    #[error("Cannot convert {from} to {to}")]
    Conversion {
        from: &'static str,
        to: &'static str,
    },

    #[error("Invalid {kind} value: {value}")]
    InvalidEnumValue { kind: &'static str, value: String },

    #[error("Circular reference detected while serializing")]
    CircularReference,

    #[error("Invalid serialized stack item: {0}")]
    InvalidFormat(String),

    #[error("StorageContext is read only")]
    ReadOnlyStorageContext,

    #[error("Contract Does Not Have Storage: {0}")]
    ContractNoStorage(UInt160),

    #[error("Contract Does Not Have Dynamic Invoke: {0}")]
    ContractNoDynamicInvoke(UInt160),

    #[error("Insufficient return values. Found {found}, expected {expected}")]
    InsufficientReturnValue { found: usize, expected: usize },

    #[error("Invalid tail call return value count. Found {found}, expected {expected}")]
    InvalidTailCall { found: i32, expected: i32 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown method {method} on native contract {service}")]
    UnknownNativeMethod { service: String, method: String },

    #[error("Bad Witness")]
    BadWitness,

    #[error("Account Frozen")]
    AccountFrozen,

    #[error("Too Many Votes")]
    TooManyVotes,

    #[error("Ineligible To Vote")]
    NotEligibleVote,

    #[error("Invalid Asset Type.")]
    InvalidAssetType,

    #[error("Unexpected Script Container")]
    UnexpectedScriptContainer,

    #[error("Invalid Index.")]
    InvalidIndex,

    #[error("Invalid GETHEADER Arguments")]
    InvalidGetHeaderArguments,

    #[error("Invalid GETBLOCK Argument: {0}")]
    InvalidGetBlockArguments(String),

    #[error("Expected InvocationTransaction.")]
    InvalidInvocationTransaction,

    #[error("Invalid Contract.GetStorageContext context")]
    InvalidContractGetStorageContext,

    #[error("{0} is only available to the Application trigger")]
    InvalidVerifySyscall(String),

    #[error("Storage item is constant: {0}")]
    ConstantStorage(String),

    #[error("Max payload size exceeded: {0}")]
    MaxPayloadExceeded(String),

    #[error("Iterator is not positioned on an entry")]
    IteratorNotPositioned,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl VmError {
    /// Creates a stack underflow error for the named op.
    pub fn stack_underflow(op: impl Into<String>, length: usize, expected: usize) -> Self {
        Self::StackUnderflow {
            op: op.into(),
            length,
            expected,
        }
    }

    /// Creates a conversion error between two stack item kinds.
    pub fn conversion(from: &'static str, to: &'static str) -> Self {
        Self::Conversion { from, to }
    }
}

/// Result type for VM operations.
pub type VmResult<T> = Result<T, VmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_op() {
        let error = VmError::stack_underflow("PICK", 2, 6);
        assert_eq!(
            error.to_string(),
            "Stack Underflow. Op: PICK. Stack Length: 2. Expected: 6"
        );
        assert_eq!(
            VmError::NegativeIndex("XDROP").to_string(),
            "XDROP Negative Index"
        );
    }

    #[test]
    fn test_wrapped_errors() {
        let error: VmError = LedgerError::not_found("Contract", "0x00").into();
        assert!(matches!(error, VmError::Ledger(_)));
        assert_eq!(error.to_string(), "Contract not found: 0x00");
    }
}

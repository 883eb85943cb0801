//! Programmatic construction of scripts.

use neo_core::UInt160;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::error::{VmError, VmResult};
use crate::op_code::OpCode;
use crate::stack_item::{bigint_to_bytes, StackItem};

/// Longest service name a `SYSCALL` operand can carry.
const MAX_SYSCALL_NAME: usize = 252;

/// Helps construct VM scripts programmatically.
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a single byte.
    pub fn emit(&mut self, byte: u8) -> &mut Self {
        self.script.push(byte);
        self
    }

    pub fn emit_opcode(&mut self, op: OpCode) -> &mut Self {
        self.emit(op as u8)
    }

    /// Emits raw bytes without a length prefix.
    pub fn emit_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.script.extend_from_slice(bytes);
        self
    }

    /// Pushes `data` with the shortest `PUSHBYTES`/`PUSHDATA` form.
    pub fn emit_push(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();
        if len <= OpCode::PUSHBYTES75 as usize {
            self.emit(len as u8);
        } else if let Ok(len) = u8::try_from(len) {
            self.emit_opcode(OpCode::PUSHDATA1).emit(len);
        } else if let Ok(len) = u16::try_from(len) {
            self.emit_opcode(OpCode::PUSHDATA2).emit_bytes(&len.to_le_bytes());
        } else {
            let len = len as u32;
            self.emit_opcode(OpCode::PUSHDATA4).emit_bytes(&len.to_le_bytes());
        }
        self.emit_bytes(data)
    }

    pub fn emit_push_int(&mut self, value: impl Into<BigInt>) -> &mut Self {
        let value = value.into();
        match value.to_i8() {
            Some(-1) => self.emit_opcode(OpCode::PUSHM1),
            Some(0) => self.emit_opcode(OpCode::PUSH0),
            Some(small @ 1..=16) => self.emit(OpCode::PUSH1 as u8 + (small as u8 - 1)),
            _ if value.is_zero() => self.emit_opcode(OpCode::PUSH0),
            _ => self.emit_push(&bigint_to_bytes(&value)),
        }
    }

    pub fn emit_push_bool(&mut self, value: bool) -> &mut Self {
        self.emit_opcode(if value { OpCode::PUSHT } else { OpCode::PUSHF })
    }

    pub fn emit_push_string(&mut self, value: &str) -> &mut Self {
        self.emit_push(value.as_bytes())
    }

    /// Pushes a scalar item, or the elements of an array followed by `PACK`.
    pub fn emit_push_item(&mut self, item: &StackItem) -> VmResult<&mut Self> {
        match item {
            StackItem::Null => self.emit_opcode(OpCode::PUSHNULL),
            StackItem::Boolean(value) => self.emit_push_bool(*value),
            StackItem::Integer(value) => self.emit_push_int(value.clone()),
            StackItem::Buffer(bytes) => self.emit_push(bytes),
            StackItem::UInt160(hash) => self.emit_push(hash.as_bytes()),
            StackItem::UInt256(hash) => self.emit_push(hash.as_bytes()),
            StackItem::ECPoint(point) => self.emit_push(point.as_bytes()),
            StackItem::Array(items) | StackItem::Struct(items) => {
                let items = items.borrow();
                for item in items.iter().rev() {
                    self.emit_push_item(item)?;
                }
                self.emit_push_int(items.len() as i64).emit_opcode(OpCode::PACK)
            }
            other => return Err(VmError::conversion(other.type_name(), "script")),
        };
        Ok(self)
    }

    /// Emits a jump with a signed offset relative to the jump opcode.
    pub fn emit_jump(&mut self, op: OpCode, offset: i16) -> VmResult<&mut Self> {
        if !matches!(op, OpCode::JMP | OpCode::JMPIF | OpCode::JMPIFNOT | OpCode::CALL) {
            return Err(VmError::UnknownOp(op as u8));
        }
        Ok(self.emit_opcode(op).emit_bytes(&offset.to_le_bytes()))
    }

    pub fn emit_syscall(&mut self, api: &str) -> VmResult<&mut Self> {
        let bytes = api.as_bytes();
        if bytes.len() > MAX_SYSCALL_NAME {
            return Err(VmError::ItemTooLarge);
        }
        Ok(self
            .emit_opcode(OpCode::SYSCALL)
            .emit(bytes.len() as u8)
            .emit_bytes(bytes))
    }

    /// `APPCALL hash`, or `TAILCALL hash` when `tail` is set. A zero hash calls
    /// the contract popped from the stack.
    pub fn emit_app_call(&mut self, hash: &UInt160, tail: bool) -> &mut Self {
        let op = if tail { OpCode::TAILCALL } else { OpCode::APPCALL };
        self.emit_opcode(op).emit_bytes(hash.as_bytes())
    }

    /// Calls `operation` on the contract at `hash` with `args`, pushed as an array.
    pub fn emit_app_call_with_args(
        &mut self,
        hash: &UInt160,
        operation: &str,
        args: &[StackItem],
    ) -> VmResult<&mut Self> {
        for arg in args.iter().rev() {
            self.emit_push_item(arg)?;
        }
        self.emit_push_int(args.len() as i64)
            .emit_opcode(OpCode::PACK)
            .emit_push_string(operation);
        Ok(self.emit_app_call(hash, false))
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn to_array(&self) -> Vec<u8> {
        self.script.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_opcode() {
        let mut builder = ScriptBuilder::new();
        builder
            .emit_opcode(OpCode::PUSH1)
            .emit_opcode(OpCode::PUSH2)
            .emit_opcode(OpCode::ADD);
        assert_eq!(builder.to_array(), vec![0x51, 0x52, 0x93]);
    }

    #[test]
    fn test_emit_push_int() {
        let mut builder = ScriptBuilder::new();
        builder
            .emit_push_int(-1)
            .emit_push_int(0)
            .emit_push_int(10)
            .emit_push_int(16)
            .emit_push_int(17)
            .emit_push_int(-100)
            .emit_push_int(128);
        assert_eq!(
            builder.to_array(),
            vec![
                OpCode::PUSHM1 as u8,
                OpCode::PUSH0 as u8,
                OpCode::PUSH10 as u8,
                OpCode::PUSH16 as u8,
                0x01,
                17,
                0x01,
                0x9c,
                0x02,
                0x80,
                0x00,
            ]
        );
    }

    #[test]
    fn test_emit_push_bool() {
        let mut builder = ScriptBuilder::new();
        builder.emit_push_bool(true).emit_push_bool(false);
        assert_eq!(builder.to_array(), vec![0x51, 0x00]);
    }

    #[test]
    fn test_emit_push_lengths() {
        let mut builder = ScriptBuilder::new();
        builder.emit_push(&[1, 2, 3]);
        builder.emit_push(&[0; 200]);
        builder.emit_push(&[0; 65000]);
        let script = builder.to_array();

        assert_eq!(&script[..4], &[3, 1, 2, 3]);
        assert_eq!(script[4], OpCode::PUSHDATA1 as u8);
        assert_eq!(script[5], 200);
        let offset = 4 + 2 + 200;
        assert_eq!(script[offset], OpCode::PUSHDATA2 as u8);
        assert_eq!(&script[offset + 1..offset + 3], &65000u16.to_le_bytes());
        assert_eq!(script.len(), offset + 3 + 65000);
    }

    #[test]
    fn test_emit_jump() {
        let mut builder = ScriptBuilder::new();
        builder.emit_jump(OpCode::JMP, -3).unwrap();
        assert_eq!(builder.to_array(), vec![OpCode::JMP as u8, 0xfd, 0xff]);
        assert!(ScriptBuilder::new().emit_jump(OpCode::ADD, 3).is_err());
    }

    #[test]
    fn test_emit_syscall() {
        let mut builder = ScriptBuilder::new();
        builder.emit_syscall("System.Runtime.Log").unwrap();
        let script = builder.to_array();
        assert_eq!(script[0], OpCode::SYSCALL as u8);
        assert_eq!(script[1], 18);
        assert_eq!(&script[2..], b"System.Runtime.Log");

        let long = "x".repeat(253);
        assert!(ScriptBuilder::new().emit_syscall(&long).is_err());
    }

    #[test]
    fn test_emit_app_call() {
        let hash = UInt160([7; 20]);
        let mut builder = ScriptBuilder::new();
        builder.emit_app_call(&hash, true);
        let script = builder.into_bytes();
        assert_eq!(script[0], OpCode::TAILCALL as u8);
        assert_eq!(&script[1..], &[7; 20]);
    }

    #[test]
    fn test_emit_push_array() {
        let item = StackItem::new_array(vec![StackItem::from_int(1), StackItem::from("a")]);
        let mut builder = ScriptBuilder::new();
        builder.emit_push_item(&item).unwrap();
        assert_eq!(
            builder.to_array(),
            vec![0x01, b'a', 0x51, 0x52, OpCode::PACK as u8]
        );
    }
}

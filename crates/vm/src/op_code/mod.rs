//! OpCode definitions for the Neo legacy instruction set.

/// Defines the opcode enum together with its byte lookup and names.
macro_rules! opcodes {
    ($($(#[$doc:meta])* $name:ident = $value:literal,)*) => {
        /// An instruction of the Neo 2.x virtual machine.
        #[allow(non_camel_case_types)]
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum OpCode {
            $($(#[$doc])* $name = $value,)*
        }

        impl OpCode {
            /// Every defined opcode, in byte order.
            pub const ALL: &'static [OpCode] = &[$(OpCode::$name,)*];

            /// Looks up the opcode for a byte.
            pub fn from_u8(byte: u8) -> Option<Self> {
                match byte {
                    $($value => Some(OpCode::$name),)*
                    _ => None,
                }
            }

            /// Mnemonic of the opcode.
            pub fn name(self) -> &'static str {
                match self {
                    $(OpCode::$name => stringify!($name),)*
                }
            }
        }
    };
}

opcodes! {
    /// Pushes an empty byte array.
    PUSH0 = 0x00,
    /// Pushes the next 1 byte of the script.
    PUSHBYTES1 = 0x01,
    PUSHBYTES2 = 0x02,
    PUSHBYTES3 = 0x03,
    PUSHBYTES4 = 0x04,
    PUSHBYTES5 = 0x05,
    PUSHBYTES6 = 0x06,
    PUSHBYTES7 = 0x07,
    PUSHBYTES8 = 0x08,
    PUSHBYTES9 = 0x09,
    PUSHBYTES10 = 0x0a,
    PUSHBYTES11 = 0x0b,
    PUSHBYTES12 = 0x0c,
    PUSHBYTES13 = 0x0d,
    PUSHBYTES14 = 0x0e,
    PUSHBYTES15 = 0x0f,
    PUSHBYTES16 = 0x10,
    PUSHBYTES17 = 0x11,
    PUSHBYTES18 = 0x12,
    PUSHBYTES19 = 0x13,
    PUSHBYTES20 = 0x14,
    PUSHBYTES21 = 0x15,
    PUSHBYTES22 = 0x16,
    PUSHBYTES23 = 0x17,
    PUSHBYTES24 = 0x18,
    PUSHBYTES25 = 0x19,
    PUSHBYTES26 = 0x1a,
    PUSHBYTES27 = 0x1b,
    PUSHBYTES28 = 0x1c,
    PUSHBYTES29 = 0x1d,
    PUSHBYTES30 = 0x1e,
    PUSHBYTES31 = 0x1f,
    PUSHBYTES32 = 0x20,
    PUSHBYTES33 = 0x21,
    PUSHBYTES34 = 0x22,
    PUSHBYTES35 = 0x23,
    PUSHBYTES36 = 0x24,
    PUSHBYTES37 = 0x25,
    PUSHBYTES38 = 0x26,
    PUSHBYTES39 = 0x27,
    PUSHBYTES40 = 0x28,
    PUSHBYTES41 = 0x29,
    PUSHBYTES42 = 0x2a,
    PUSHBYTES43 = 0x2b,
    PUSHBYTES44 = 0x2c,
    PUSHBYTES45 = 0x2d,
    PUSHBYTES46 = 0x2e,
    PUSHBYTES47 = 0x2f,
    PUSHBYTES48 = 0x30,
    PUSHBYTES49 = 0x31,
    PUSHBYTES50 = 0x32,
    PUSHBYTES51 = 0x33,
    PUSHBYTES52 = 0x34,
    PUSHBYTES53 = 0x35,
    PUSHBYTES54 = 0x36,
    PUSHBYTES55 = 0x37,
    PUSHBYTES56 = 0x38,
    PUSHBYTES57 = 0x39,
    PUSHBYTES58 = 0x3a,
    PUSHBYTES59 = 0x3b,
    PUSHBYTES60 = 0x3c,
    PUSHBYTES61 = 0x3d,
    PUSHBYTES62 = 0x3e,
    PUSHBYTES63 = 0x3f,
    PUSHBYTES64 = 0x40,
    PUSHBYTES65 = 0x41,
    PUSHBYTES66 = 0x42,
    PUSHBYTES67 = 0x43,
    PUSHBYTES68 = 0x44,
    PUSHBYTES69 = 0x45,
    PUSHBYTES70 = 0x46,
    PUSHBYTES71 = 0x47,
    PUSHBYTES72 = 0x48,
    PUSHBYTES73 = 0x49,
    PUSHBYTES74 = 0x4a,
    /// Pushes the next 75 bytes of the script.
    PUSHBYTES75 = 0x4b,
    /// Pushes data whose length is a `u8` operand.
    PUSHDATA1 = 0x4c,
    /// Pushes data whose length is a `u16` operand.
    PUSHDATA2 = 0x4d,
    /// Pushes data whose length is an `i32` operand.
    PUSHDATA4 = 0x4e,
    /// Pushes the number -1.
    PUSHM1 = 0x4f,
    /// Pushes a null item.
    PUSHNULL = 0x50,
    PUSH1 = 0x51,
    PUSH2 = 0x52,
    PUSH3 = 0x53,
    PUSH4 = 0x54,
    PUSH5 = 0x55,
    PUSH6 = 0x56,
    PUSH7 = 0x57,
    PUSH8 = 0x58,
    PUSH9 = 0x59,
    PUSH10 = 0x5a,
    PUSH11 = 0x5b,
    PUSH12 = 0x5c,
    PUSH13 = 0x5d,
    PUSH14 = 0x5e,
    PUSH15 = 0x5f,
    PUSH16 = 0x60,

    // Flow control
    NOP = 0x61,
    JMP = 0x62,
    JMPIF = 0x63,
    JMPIFNOT = 0x64,
    CALL = 0x65,
    RET = 0x66,
    /// Calls the contract whose hash follows the opcode.
    APPCALL = 0x67,
    SYSCALL = 0x68,
    /// Like `APPCALL`, but the caller does not resume.
    TAILCALL = 0x69,

    // Stack
    DUPFROMALTSTACK = 0x6a,
    TOALTSTACK = 0x6b,
    FROMALTSTACK = 0x6c,
    XDROP = 0x6d,
    DUPFROMALTSTACKBOTTOM = 0x6e,
    ISNULL = 0x70,
    XSWAP = 0x72,
    XTUCK = 0x73,
    DEPTH = 0x74,
    DROP = 0x75,
    DUP = 0x76,
    NIP = 0x77,
    OVER = 0x78,
    PICK = 0x79,
    ROLL = 0x7a,
    ROT = 0x7b,
    SWAP = 0x7c,
    TUCK = 0x7d,

    // Splice
    CAT = 0x7e,
    SUBSTR = 0x7f,
    LEFT = 0x80,
    RIGHT = 0x81,
    SIZE = 0x82,

    // Bitwise logic
    INVERT = 0x83,
    AND = 0x84,
    OR = 0x85,
    XOR = 0x86,
    EQUAL = 0x87,

    // Arithmetic
    INC = 0x8b,
    DEC = 0x8c,
    SIGN = 0x8d,
    NEGATE = 0x8f,
    ABS = 0x90,
    NOT = 0x91,
    NZ = 0x92,
    ADD = 0x93,
    SUB = 0x94,
    MUL = 0x95,
    DIV = 0x96,
    MOD = 0x97,
    SHL = 0x98,
    SHR = 0x99,
    BOOLAND = 0x9a,
    BOOLOR = 0x9b,
    NUMEQUAL = 0x9c,
    NUMNOTEQUAL = 0x9e,
    LT = 0x9f,
    GT = 0xa0,
    LTE = 0xa1,
    GTE = 0xa2,
    MIN = 0xa3,
    MAX = 0xa4,
    WITHIN = 0xa5,

    // Crypto
    SHA1 = 0xa7,
    SHA256 = 0xa8,
    HASH160 = 0xa9,
    HASH256 = 0xaa,
    CHECKSIG = 0xac,
    VERIFY = 0xad,
    CHECKMULTISIG = 0xae,

    // Array
    ARRAYSIZE = 0xc0,
    PACK = 0xc1,
    UNPACK = 0xc2,
    PICKITEM = 0xc3,
    SETITEM = 0xc4,
    NEWARRAY = 0xc5,
    NEWSTRUCT = 0xc6,
    NEWMAP = 0xc7,
    APPEND = 0xc8,
    REVERSE = 0xc9,
    REMOVE = 0xca,
    HASKEY = 0xcb,
    KEYS = 0xcc,
    VALUES = 0xcd,

    // Stack isolation
    /// Calls an offset in the current script with an isolated stack.
    CALL_I = 0xe0,
    /// Calls a contract with an isolated stack.
    CALL_E = 0xe1,
    /// Calls a contract popped from the stack with an isolated stack.
    CALL_ED = 0xe2,
    CALL_ET = 0xe3,
    CALL_EDT = 0xe4,

    // Exceptions
    THROW = 0xf0,
    THROWIFNOT = 0xf1,
}

impl OpCode {
    /// Alias of `PUSH0`.
    pub const PUSHF: OpCode = OpCode::PUSH0;
    /// Alias of `PUSH1`.
    pub const PUSHT: OpCode = OpCode::PUSH1;

    /// Returns true for opcodes allowed in push-only scripts besides `RET`.
    pub fn is_push(self) -> bool {
        self <= OpCode::PUSH16
    }
}

impl From<OpCode> for u8 {
    fn from(opcode: OpCode) -> Self {
        opcode as u8
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        OpCode::from_u8(byte).ok_or(byte)
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

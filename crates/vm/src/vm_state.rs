//! VM state implementation.

use serde::{Deserialize, Serialize};

/// Indicates the status of an execution context.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VMState {
    /// Indicates that the execution is in progress or has not yet begun.
    #[default]
    NONE = 0,

    /// Indicates that the execution has been completed successfully.
    HALT = 1 << 0,

    /// Indicates that the execution has ended with a fault.
    FAULT = 1 << 1,
}

impl VMState {
    #[inline]
    pub fn is_none(self) -> bool {
        self == VMState::NONE
    }

    #[inline]
    pub fn is_halt(self) -> bool {
        self == VMState::HALT
    }

    #[inline]
    pub fn is_fault(self) -> bool {
        self == VMState::FAULT
    }
}

impl std::fmt::Display for VMState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VMState::NONE => "NONE",
            VMState::HALT => "HALT",
            VMState::FAULT => "FAULT",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_none() {
        assert!(VMState::default().is_none());
        assert!(VMState::HALT.is_halt());
        assert!(!VMState::FAULT.is_halt());
        assert_eq!(VMState::FAULT.to_string(), "FAULT");
    }
}

//! Trigger types a script can be executed under.

use serde::{Deserialize, Serialize};

/// Reason an execution was started, exposed by `Runtime.GetTrigger`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerType {
    /// Witness verification of a script container.
    Verification = 0x00,
    /// Verification of a transaction output receiving assets.
    VerificationR = 0x01,
    /// Execution of an invocation transaction.
    Application = 0x10,
    /// Application execution on behalf of an asset receiver.
    ApplicationR = 0x11,
}

impl TriggerType {
    pub fn is_application(self) -> bool {
        self == TriggerType::Application
    }
}

impl TryFrom<u8> for TriggerType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Verification),
            0x01 => Ok(Self::VerificationR),
            0x10 => Ok(Self::Application),
            0x11 => Ok(Self::ApplicationR),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_values() {
        assert_eq!(TriggerType::Application as u8, 0x10);
        assert_eq!(TriggerType::try_from(0x01), Ok(TriggerType::VerificationR));
        assert_eq!(TriggerType::try_from(0x02), Err(0x02));
    }
}

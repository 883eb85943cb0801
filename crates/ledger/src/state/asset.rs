use neo_core::{UInt160, UInt256};
use neo_cryptography::ECPoint;
use serde::{Deserialize, Serialize};

/// Registered asset kinds.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    GoverningToken = 0x00,
    UtilityToken = 0x01,
    Currency = 0x08,
    CreditFlag = 0x40,
    Token = 0x60,
    DutyFlag = 0x80,
    Share = 0x90,
    Invoice = 0x98,
}

impl AssetType {
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0x00 => Self::GoverningToken,
            0x01 => Self::UtilityToken,
            0x08 => Self::Currency,
            0x40 => Self::CreditFlag,
            0x60 => Self::Token,
            0x80 => Self::DutyFlag,
            0x90 => Self::Share,
            0x98 => Self::Invoice,
            _ => return None,
        })
    }

    /// Assets whose transfers must be witnessed by the recipient.
    pub fn is_duty(self) -> bool {
        (self as u8) & (Self::DutyFlag as u8) != 0
    }
}

/// Registered asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub hash: UInt256,
    pub asset_type: AssetType,
    pub name: String,
    /// Fixed8 total amount.
    pub amount: i64,
    /// Fixed8 amount issued so far.
    pub available: i64,
    pub precision: u8,
    pub owner: ECPoint,
    pub admin: UInt160,
    pub issuer: UInt160,
    pub expiration: u32,
    pub is_frozen: bool,
}

//! Resource limits enforced by the execution engine.

use serde::{Deserialize, Serialize};

/// Limits checked before every instruction and at every call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmLimits {
    /// Maximum combined size of the evaluation and alternate stacks.
    pub max_stack_size: usize,
    /// Maximum invocation depth.
    pub max_invocation_stack_size: usize,
    /// Maximum number of elements an array or map may produce.
    pub max_array_size: usize,
    /// Maximum size in bytes of a single item.
    pub max_item_size: usize,
    /// Maximum script length in bytes.
    pub max_script_length: usize,
    /// Absolute bound on SHL/SHR shift amounts.
    pub max_shl_shr: i64,
    /// Maximum number of votes an account may cast.
    pub max_votes: usize,
    /// Maximum length of a syscall name operand.
    pub max_syscall_name_length: usize,
    /// Maximum storage key length in bytes.
    pub max_storage_key_size: usize,
}

impl Default for VmLimits {
    fn default() -> Self {
        Self {
            max_stack_size: 2048,
            max_invocation_stack_size: 1024,
            max_array_size: 1024,
            max_item_size: 1024 * 1024,
            max_script_length: 1024 * 1024,
            max_shl_shr: 256,
            max_votes: 1024,
            max_syscall_name_length: 252,
            max_storage_key_size: 1024,
        }
    }
}

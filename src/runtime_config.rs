//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the coroutine runtime.
//!
//! ## Environment Variables
//!
//! ### `MICROROUTE_STACK_SIZE`
//!
//! Sets the stack size for connection coroutines. Accepts values in:
//! - Decimal: `16384` (16 KB)
//! - Hexadecimal: `0x4000` (16 KB)
//!
//! Default: `0x4000` (16 KB)
//!
//! Total memory scales with `stack_size × concurrent connections`; tune for
//! handler complexity and concurrency level.

use std::env;

/// Runtime configuration loaded from environment variables.
///
/// Load at startup with [`RuntimeConfig::from_env`] before spawning the
/// accept loop.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for connection coroutines in bytes (default: 16 KB).
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = match env::var("MICROROUTE_STACK_SIZE") {
            Ok(val) => {
                if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).unwrap_or(0x4000)
                } else {
                    val.parse().unwrap_or(0x4000)
                }
            }
            Err(_) => 0x4000,
        };
        RuntimeConfig { stack_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stack_size() {
        std::env::remove_var("MICROROUTE_STACK_SIZE");
        assert_eq!(RuntimeConfig::from_env().stack_size, 0x4000);
    }
}

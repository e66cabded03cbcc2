//! CLI command implementations

pub mod auth;
pub mod profile;
pub mod transactions;

use anyhow::{Context, Result};
use finance_core::{ClientConfig, FinanceApi};

/// Open the stored session and wire up the API clients.
pub fn connect(config: &ClientConfig) -> Result<FinanceApi> {
    FinanceApi::from_config(config).with_context(|| {
        format!(
            "Failed to open session file {}",
            config.token_path.display()
        )
    })
}

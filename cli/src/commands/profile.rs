use anyhow::Result;
use finance_core::{FinanceApi, UpdateProfile};

use crate::output;

pub fn show(api: &FinanceApi) -> Result<()> {
    let profile = api.user.profile()?;
    output::print_profile(&profile);
    Ok(())
}

/// Email is fixed server-side; only name and mobile are sent.
pub fn update(api: &FinanceApi, name: String, mobile: Option<String>) -> Result<()> {
    let profile = api.user.update_profile(&UpdateProfile {
        name,
        mobile_number: mobile.filter(|m| !m.trim().is_empty()),
    })?;
    output::success("Profile updated");
    output::print_profile(&profile);
    Ok(())
}

//! Sign-up, sign-in, logout and session status

use anyhow::Result;
use colored::Colorize;
use dialoguer::Password;
use finance_core::{ClientConfig, FinanceApi, SignInRequest, SignUpRequest};

use crate::output;

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(Password::new().with_prompt("Password").interact()?),
    }
}

pub fn sign_up(api: &FinanceApi, name: String, email: String, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    let credential = api.auth.sign_up(&SignUpRequest { name, email, password })?;
    api.login(credential)?;
    output::success("Account created, you are signed in");
    Ok(())
}

pub fn sign_in(api: &FinanceApi, email: String, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    let credential = api.auth.sign_in(&SignInRequest { email, password })?;
    api.login(credential)?;
    output::success("Signed in");
    Ok(())
}

pub fn logout(api: &FinanceApi) -> Result<()> {
    api.logout()?;
    output::success("Signed out");
    Ok(())
}

pub fn status(api: &FinanceApi, config: &ClientConfig) -> Result<()> {
    println!("{}", "Finance Session".bold());
    println!();
    println!("API:     {}", config.base_url);
    println!("Session: {}", config.token_path.display());
    if api.is_authenticated() {
        println!("State:   {}", "signed in".green());
    } else {
        println!("State:   {}", "signed out".dimmed());
        output::info("Run `finance signin --email <EMAIL>` to sign in");
    }
    Ok(())
}

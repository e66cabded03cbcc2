//! Transaction list, summary, dashboard and CRUD commands

use anyhow::Result;
use chrono::NaiveDate;
use colored::Colorize;
use dialoguer::Confirm;
use finance_core::form::categories as categories_for;
use finance_core::{FinanceApi, FormEvent, TransactionForm, TransactionType, UpdateTransaction};

use crate::output;

pub fn list(api: &FinanceApi, json: bool) -> Result<()> {
    let transactions = api.transactions.list()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&transactions)?);
    } else {
        output::print_transactions(&transactions);
    }
    Ok(())
}

pub fn summary(api: &FinanceApi, json: bool) -> Result<()> {
    let summary = api.transactions.summary()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        output::print_summary(&summary);
    }
    Ok(())
}

pub fn dashboard(api: &FinanceApi) -> Result<()> {
    let dashboard = api.dashboard()?;
    println!("{}", "Summary".bold());
    output::print_summary(&dashboard.summary);
    println!();
    println!("{}", "Transactions".bold());
    output::print_transactions(&dashboard.transactions);
    Ok(())
}

pub fn categories(kind: TransactionType) {
    println!("{}", format!("{kind} categories").bold());
    for category in categories_for(kind) {
        println!("  • {category}");
    }
}

/// Fill the add form from flags, in the order a user would edit it.
fn fill_form(
    kind: TransactionType,
    category: Option<String>,
    amount: Option<String>,
    description: Option<String>,
    date: Option<NaiveDate>,
) -> TransactionForm {
    let mut form = TransactionForm::default();
    form.apply(FormEvent::SetKind(kind));
    let events = [
        category.map(FormEvent::SetCategory),
        amount.map(FormEvent::SetAmount),
        description.map(FormEvent::SetDescription),
        date.map(FormEvent::SetDate),
    ];
    for event in events.into_iter().flatten() {
        form.apply(event);
    }
    form
}

pub fn add(
    api: &FinanceApi,
    kind: TransactionType,
    category: Option<String>,
    amount: Option<String>,
    description: Option<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let form = fill_form(kind, category, amount, description, date);
    let input = form.submit()?;
    if !categories_for(input.kind).contains(&input.category.as_str()) {
        output::info(&format!("'{}' is not a standard {} category", input.category, input.kind));
    }

    let created = api.transactions.create(&input)?;
    output::success(&format!("Transaction {} added", created.id));
    refresh(api)
}

pub fn show(api: &FinanceApi, id: i64, json: bool) -> Result<()> {
    let transaction = api.transactions.get(id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&transaction)?);
    } else {
        output::print_transaction(&transaction);
    }
    Ok(())
}

pub fn edit(api: &FinanceApi, id: i64, patch: &UpdateTransaction) -> Result<()> {
    let updated = api.transactions.update(id, patch)?;
    output::success(&format!("Transaction {} updated", updated.id));
    refresh(api)
}

pub fn delete(api: &FinanceApi, id: i64, force: bool) -> Result<()> {
    if !force
        && !Confirm::new()
            .with_prompt(format!("Delete transaction {id}?"))
            .default(false)
            .interact()?
    {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    api.transactions.delete(id)?;
    output::success(&format!("Transaction {id} deleted"));
    refresh(api)
}

/// Re-fetch the list after a change so the user sees the server's state.
fn refresh(api: &FinanceApi) -> Result<()> {
    println!();
    list(api, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn fill_form_applies_flags() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let form = fill_form(
            TransactionType::Income,
            Some("Salary".to_string()),
            Some("100".to_string()),
            None,
            Some(date),
        );
        let input = form.submit().unwrap();
        assert_eq!(input.kind, TransactionType::Income);
        assert_eq!(input.category, "Salary");
        assert_eq!(input.amount, Decimal::from(100));
        assert_eq!(input.transaction_date, date);
    }

    #[test]
    fn fill_form_without_category_fails_validation() {
        let form = fill_form(TransactionType::Expense, None, Some("5".to_string()), None, None);
        assert_eq!(form.submit().unwrap_err().missing(), &["category"]);
    }
}

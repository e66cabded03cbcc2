//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use finance_core::{Transaction, TransactionSummary, TransactionType, UserProfile};
use rust_decimal::Decimal;

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

fn signed_amount(tx: &Transaction) -> Cell {
    match tx.kind {
        TransactionType::Income => Cell::new(format!("+{}", money(tx.amount))).fg(Color::Green),
        TransactionType::Expense => Cell::new(format!("-{}", money(tx.amount))).fg(Color::Red),
    }
}

pub fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        info("No transactions yet");
        return;
    }

    let mut table = create_table();
    table.set_header(vec!["ID", "Date", "Type", "Category", "Amount", "Description"]);
    for tx in transactions {
        table.add_row(vec![
            Cell::new(tx.id),
            Cell::new(tx.transaction_date),
            Cell::new(tx.kind),
            Cell::new(&tx.category),
            signed_amount(tx),
            Cell::new(tx.description.as_deref().unwrap_or("")),
        ]);
    }
    println!("{table}");
}

pub fn print_summary(summary: &TransactionSummary) {
    let mut table = create_table();
    table.add_row(vec![
        Cell::new("Income"),
        Cell::new(money(summary.total_income)).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Expense"),
        Cell::new(money(summary.total_expense)).fg(Color::Red),
    ]);
    let balance = if summary.balance.is_sign_negative() {
        Cell::new(money(summary.balance)).fg(Color::Red)
    } else {
        Cell::new(money(summary.balance))
    };
    table.add_row(vec![Cell::new("Balance"), balance]);
    println!("{table}");
}

pub fn print_transaction(tx: &Transaction) {
    let mut table = create_table();
    table.add_row(vec![Cell::new("ID"), Cell::new(tx.id)]);
    table.add_row(vec![Cell::new("Type"), Cell::new(tx.kind)]);
    table.add_row(vec![Cell::new("Category"), Cell::new(&tx.category)]);
    table.add_row(vec![Cell::new("Amount"), signed_amount(tx)]);
    table.add_row(vec![
        Cell::new("Description"),
        Cell::new(tx.description.as_deref().unwrap_or("-")),
    ]);
    table.add_row(vec![Cell::new("Date"), Cell::new(tx.transaction_date)]);
    table.add_row(vec![
        Cell::new("Updated"),
        Cell::new(tx.updated_at.format("%Y-%m-%d %H:%M")),
    ]);
    println!("{table}");
}

pub fn print_profile(profile: &UserProfile) {
    let mut table = create_table();
    table.add_row(vec!["Name", profile.name.as_str()]);
    table.add_row(vec!["Email", profile.email.as_str()]);
    table.add_row(vec![
        "Mobile",
        profile.mobile_number.as_deref().unwrap_or("-"),
    ]);
    let member_since = profile.created_at.format("%Y-%m-%d").to_string();
    table.add_row(vec!["Member since", member_since.as_str()]);
    println!("{table}");
}

//! State of the add-transaction form.
//!
//! Field edits go through `TransactionForm::apply` so derived state stays in
//! one place: switching the transaction type clears the category, since the
//! category list depends on the type. `submit` performs the required-field
//! check that keeps incomplete input off the network.

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{Required, ValidationError};
use crate::types::{CreateTransaction, TransactionType};

const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Entertainment",
    "Healthcare",
    "Other",
];

const INCOME_CATEGORIES: &[&str] = &["Salary", "Freelance", "Business", "Investment", "Gift", "Other"];

/// Categories offered for a transaction type.
pub fn categories(kind: TransactionType) -> &'static [&'static str] {
    match kind {
        TransactionType::Expense => EXPENSE_CATEGORIES,
        TransactionType::Income => INCOME_CATEGORIES,
    }
}

/// A single user edit.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    SetKind(TransactionType),
    SetCategory(String),
    SetAmount(String),
    SetDescription(String),
    SetDate(NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    pub kind: TransactionType,
    pub category: String,
    /// Raw text as typed; parsed on submit.
    pub amount: String,
    pub description: String,
    pub transaction_date: NaiveDate,
}

impl TransactionForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            kind: TransactionType::Expense,
            category: String::new(),
            amount: String::new(),
            description: String::new(),
            transaction_date: today,
        }
    }

    pub fn apply(&mut self, event: FormEvent) {
        match event {
            FormEvent::SetKind(kind) => {
                if kind != self.kind {
                    self.category.clear();
                }
                self.kind = kind;
            }
            FormEvent::SetCategory(category) => self.category = category,
            FormEvent::SetAmount(amount) => self.amount = amount,
            FormEvent::SetDescription(description) => self.description = description,
            FormEvent::SetDate(date) => self.transaction_date = date,
        }
    }

    /// Builds the create payload. An amount that does not parse counts as
    /// missing; range checks are left to the server.
    pub fn submit(&self) -> Result<CreateTransaction, ValidationError> {
        let amount = self.amount.trim().parse::<Decimal>().ok();
        Required::new()
            .text("category", &self.category)
            .present("amount", amount.as_ref())
            .check()?;
        let Some(amount) = amount else {
            return Err(ValidationError::MissingFields(vec!["amount"]));
        };

        let description = self.description.trim();
        Ok(CreateTransaction {
            kind: self.kind,
            category: self.category.trim().to_string(),
            amount,
            description: (!description.is_empty()).then(|| description.to_string()),
            transaction_date: self.transaction_date,
        })
    }

    /// Back to a blank expense dated today.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

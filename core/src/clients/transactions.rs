use crate::error::{ApiError, Required, ValidationError};
use crate::pipeline::ApiPipeline;
use crate::types::{CreateTransaction, Transaction, TransactionSummary, UpdateTransaction};

/// CRUD and summary over the caller's transactions.
#[derive(Debug, Clone)]
pub struct TransactionClient {
    pipeline: ApiPipeline,
}

impl TransactionClient {
    pub fn new(pipeline: ApiPipeline) -> Self {
        Self { pipeline }
    }

    pub fn create(&self, input: &CreateTransaction) -> Result<Transaction, ApiError> {
        Required::new().text("category", &input.category).check()?;
        self.pipeline.post("/transactions", input)
    }

    pub fn list(&self) -> Result<Vec<Transaction>, ApiError> {
        self.pipeline.get("/transactions")
    }

    pub fn summary(&self) -> Result<TransactionSummary, ApiError> {
        self.pipeline.get("/transactions/summary")
    }

    pub fn get(&self, id: i64) -> Result<Transaction, ApiError> {
        self.pipeline.get(&format!("/transactions/{id}"))
    }

    /// Partial update. A patch that sets nothing, or blanks the category,
    /// is rejected locally.
    pub fn update(&self, id: i64, patch: &UpdateTransaction) -> Result<Transaction, ApiError> {
        if patch.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        if let Some(category) = &patch.category {
            Required::new().text("category", category).check()?;
        }
        self.pipeline.put(&format!("/transactions/{id}"), patch)
    }

    pub fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.pipeline.delete(&format!("/transactions/{id}"))
    }
}

//! Home-page data: the transaction list and the summary, fetched together.

use std::thread;

use crate::clients::TransactionClient;
use crate::error::ApiError;
use crate::types::{Transaction, TransactionSummary};

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub transactions: Vec<Transaction>,
    pub summary: TransactionSummary,
}

/// Fetch list and summary concurrently and join both.
///
/// The load fails if either call fails; when both fail the list's error is
/// reported.
pub fn load_dashboard(client: &TransactionClient) -> Result<Dashboard, ApiError> {
    let (transactions, summary) = thread::scope(|scope| {
        let summary = scope.spawn(|| client.summary());
        let transactions = client.list();
        let summary = summary
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (transactions, summary)
    });

    Ok(Dashboard {
        transactions: transactions?,
        summary: summary?,
    })
}

//! In-memory transaction ledger
//!
//! The ledger exclusively owns the ordered collection of transactions.
//! Records are kept most-recent-first, are never mutated after insertion,
//! and there is no delete operation. Summary figures are recomputed on
//! demand; the expected list sizes make caching unnecessary.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{Transaction, TransactionDraft, TransactionKind};

/// Derived summary figures
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of all income amounts
    pub income: f64,
    /// Sum of all expense amounts
    pub expense: f64,
    /// income - expense
    pub balance: f64,
}

/// Ordered, append-only transaction collection
#[derive(Debug, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a transaction, most recent first
    ///
    /// Assigns a unique id when the draft carries none. Returns the stored
    /// record. No duplicate detection is performed.
    pub fn append(&mut self, draft: TransactionDraft) -> Result<Transaction, CoreError> {
        draft.validate()?;

        let transaction = Transaction {
            id: draft.id.unwrap_or_else(finhero_utils::generate_id),
            title: draft.title,
            amount: draft.amount,
            kind: draft.kind,
            category: draft.category,
            date: draft.date,
            description: draft.description,
        };

        self.transactions.insert(0, transaction.clone());
        Ok(transaction)
    }

    /// Read-only view of the full sequence, most recent first
    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Compute income, expense, and balance over the current state
    ///
    /// 0/0/0 over an empty ledger.
    pub fn totals(&self) -> Totals {
        let mut income = 0.0;
        let mut expense = 0.0;
        for t in &self.transactions {
            match t.kind {
                TransactionKind::Income => income += t.amount,
                TransactionKind::Expense => expense += t.amount,
            }
        }
        Totals {
            income,
            expense,
            balance: income - expense,
        }
    }

    /// Replace the whole collection, e.g. after a remote refresh
    ///
    /// The given order is preserved and assumed most-recent-first.
    pub fn replace_all(&mut self, transactions: Vec<Transaction>) {
        self.transactions = transactions;
    }

    /// Number of stored transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Check whether the ledger holds no transactions
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

//! Domain models for the finhero core

use chrono::NaiveDate;
use finhero_client::{NewTransactionRecord, TransactionRecord, UserRecord};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Authenticated user identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}

/// The authenticated identity and token held for the current user
///
/// Either fully present or absent; token and user are set and cleared
/// together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque backend-issued token
    pub token: String,
    pub user: User,
}

/// Direction of a transaction
///
/// The sign of an amount is always carried here, never by the amount itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money going out
    Expense,
    /// Money coming in
    Income,
}

impl std::str::FromStr for TransactionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" | "despesa" => Ok(TransactionKind::Expense),
            "income" | "receita" => Ok(TransactionKind::Income),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Expense => write!(f, "expense"),
            TransactionKind::Income => write!(f, "income"),
        }
    }
}

/// A ledger transaction
///
/// Immutable once stored; the ledger never edits or deletes records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique id, assigned at creation time
    pub id: String,
    pub title: String,
    /// Always positive; direction is carried by `kind`
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: String,
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    pub description: Option<String>,
}

impl Transaction {
    /// Get the transaction date as NaiveDate
    pub fn date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = CoreError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let kind = record
            .kind
            .parse::<TransactionKind>()
            .map_err(|message| CoreError::Validation { message })?;
        Ok(Self {
            id: record.id,
            title: record.title,
            amount: record.amount,
            kind,
            category: record.category,
            date: record.date,
            description: record.description,
        })
    }
}

/// Input for a new ledger transaction, before an id is assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Pre-assigned id (e.g., from the backend); generated when absent
    pub id: Option<String>,
    pub title: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: String,
    pub date: String,
    pub description: Option<String>,
}

impl TransactionDraft {
    /// Check the ledger invariants for this input
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::Validation {
                message: "Title must not be empty".to_string(),
            });
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(CoreError::Validation {
                message: "Amount must be a positive number".to_string(),
            });
        }
        if NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_err() {
            return Err(CoreError::Validation {
                message: format!("Invalid date: {} (expected YYYY-MM-DD)", self.date),
            });
        }
        Ok(())
    }

    /// Build the wire payload for remote creation
    pub fn to_record(&self) -> NewTransactionRecord {
        NewTransactionRecord {
            title: self.title.clone(),
            amount: self.amount,
            kind: self.kind.to_string(),
            category: self.category.clone(),
            date: self.date.clone(),
            description: self.description.clone(),
        }
    }
}

impl TryFrom<TransactionRecord> for TransactionDraft {
    type Error = CoreError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let kind = record
            .kind
            .parse::<TransactionKind>()
            .map_err(|message| CoreError::Validation { message })?;
        Ok(Self {
            id: Some(record.id),
            title: record.title,
            amount: record.amount,
            kind,
            category: record.category,
            date: record.date,
            description: record.description,
        })
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryId;
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Negative amounts are spending, everything else is income.
    pub fn from_signed(amount: Money) -> Self {
        if amount.is_negative() {
            TransactionKind::Expense
        } else {
            TransactionKind::Income
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("Unknown transaction kind: '{other}'")),
        }
    }
}

/// A statement row that survived parsing, ready to be stored by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCandidate {
    /// Always strictly positive; the direction lives in `kind`.
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    /// Canonical display name of the merchant.
    pub note: String,
    /// Merchant text exactly as it appeared in the document.
    pub raw_note: String,
    pub category: CategoryId,
}

/// A transaction the caller already has on record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingTransaction {
    pub id: String,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub raw_note: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryId>,
}

impl ExistingTransaction {
    /// The record a caller ends up storing for an imported candidate.
    pub fn from_candidate(id: impl Into<String>, candidate: &TransactionCandidate) -> Self {
        ExistingTransaction {
            id: id.into(),
            amount: candidate.amount,
            kind: candidate.kind,
            date: candidate.date,
            note: candidate.note.clone(),
            raw_note: Some(candidate.raw_note.clone()),
            category: Some(candidate.category.clone()),
        }
    }

    /// Stored raw text, if any non-blank value was kept.
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_note.as_deref().filter(|s| !s.trim().is_empty())
    }
}

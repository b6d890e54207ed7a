//! Import deduplicator: drops candidates that repeat a transaction the caller
//! already has on record.

use chrono::{FixedOffset, Offset, Utc};
use hearth_core::{ExistingTransaction, TransactionCandidate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::cell::local_day;
use crate::util::squash;

/// Two amounts within one cent are the same amount.
pub const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Clone, Serialize)]
pub struct SuppressedCandidate {
    pub candidate: TransactionCandidate,
    pub matched_id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DedupOutcome {
    pub fresh: Vec<TransactionCandidate>,
    pub suppressed: Vec<SuppressedCandidate>,
}

pub struct ImportDeduplicator<'a> {
    existing: &'a [ExistingTransaction],
    offset: FixedOffset,
}

impl<'a> ImportDeduplicator<'a> {
    /// Calendar days are compared in UTC until [`with_offset`](Self::with_offset) is called.
    pub fn new(existing: &'a [ExistingTransaction]) -> Self {
        Self { existing, offset: Utc.fix() }
    }

    /// Compares calendar days on the statement's wall clock.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Walks the candidates in document order. Each stored record can absorb
    /// at most one candidate per call.
    pub fn filter(&self, candidates: Vec<TransactionCandidate>) -> DedupOutcome {
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut outcome = DedupOutcome::default();

        for candidate in candidates {
            let matched = self
                .existing
                .iter()
                .find(|tx| !claimed.contains(tx.id.as_str()) && self.is_same_transaction(&candidate, tx));

            match matched {
                Some(tx) => {
                    claimed.insert(tx.id.as_str());
                    debug!(matched_id = %tx.id, note = %candidate.note, "duplicate suppressed");
                    outcome.suppressed.push(SuppressedCandidate {
                        candidate,
                        matched_id: tx.id.clone(),
                    });
                }
                None => outcome.fresh.push(candidate),
            }
        }

        info!(
            fresh = outcome.fresh.len(),
            suppressed = outcome.suppressed.len(),
            "deduplication finished"
        );
        outcome
    }

    /// Same local day, amount within a cent, same direction and the same text.
    fn is_same_transaction(&self, candidate: &TransactionCandidate, existing: &ExistingTransaction) -> bool {
        candidate.kind == existing.kind
            && candidate.amount.abs_diff(existing.amount) <= AMOUNT_TOLERANCE
            && local_day(candidate.date, self.offset) == local_day(existing.date, self.offset)
            && same_text(candidate, existing)
    }
}

/// Raw texts decide when the stored record kept one; otherwise the canonical
/// notes are compared.
fn same_text(candidate: &TransactionCandidate, existing: &ExistingTransaction) -> bool {
    match existing.raw_text() {
        Some(raw) => squash(raw) == squash(&candidate.raw_note),
        None => squash(&existing.note) == squash(&candidate.note),
    }
}

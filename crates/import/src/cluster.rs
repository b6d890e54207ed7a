//! Retrospective duplicate clusterer over transactions already on record,
//! with persistent "not a duplicate" decisions.

use chrono::Duration;
use hearth_core::ExistingTransaction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::info;

use crate::cell::time_gap;
use crate::dedup::AMOUNT_TOLERANCE;
use crate::util::squash;

/// Members of a group lie at most this far from its first member.
pub const CLUSTER_WINDOW_MINUTES: i64 = 5;

/// Order-independent key for a pair of transaction ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnorePairKey(String);

impl IgnorePairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        IgnorePairKey(format!("{first}_{second}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Pairs the user has declared "not a duplicate".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreList {
    keys: BTreeSet<IgnorePairKey>,
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &IgnorePairKey) -> bool {
        self.keys.contains(key)
    }

    pub fn contains_pair(&self, a: &str, b: &str) -> bool {
        self.contains(&IgnorePairKey::new(a, b))
    }

    /// A new list that also holds every pairwise key of `group`.
    pub fn dismissed(&self, group: &DuplicateGroup) -> IgnoreList {
        let mut keys = self.keys.clone();
        for (i, a) in group.members.iter().enumerate() {
            for b in &group.members[i + 1..] {
                keys.insert(IgnorePairKey::new(&a.id, &b.id));
            }
        }
        IgnoreList { keys }
    }
}

impl FromIterator<IgnorePairKey> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = IgnorePairKey>>(iter: I) -> Self {
        IgnoreList { keys: iter.into_iter().collect() }
    }
}

/// Two or more stored transactions that look like the same event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    /// Date order; the first member is the original.
    pub members: Vec<ExistingTransaction>,
}

impl DuplicateGroup {
    pub fn original(&self) -> &ExistingTransaction {
        &self.members[0]
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.id.as_str())
    }
}

/// Groups stored transactions in date order. Each candidate member is
/// matched against the group's first member only, not against every member.
pub struct DuplicateClusterer<'a> {
    ignore: &'a IgnoreList,
    window: Duration,
}

impl<'a> DuplicateClusterer<'a> {
    pub fn new(ignore: &'a IgnoreList) -> Self {
        Self { ignore, window: Duration::minutes(CLUSTER_WINDOW_MINUTES) }
    }

    pub fn find_groups(&self, existing: &[ExistingTransaction]) -> Vec<DuplicateGroup> {
        self.find_groups_until(existing, || false)
    }

    /// Like [`find_groups`](Self::find_groups), but stops early once
    /// `should_stop` returns true; groups found so far are returned.
    pub fn find_groups_until(
        &self,
        existing: &[ExistingTransaction],
        mut should_stop: impl FnMut() -> bool,
    ) -> Vec<DuplicateGroup> {
        let mut sorted: Vec<&ExistingTransaction> = existing.iter().collect();
        sorted.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        let mut absorbed: HashSet<usize> = HashSet::new();
        let mut groups = Vec::new();

        for i in 0..sorted.len() {
            if should_stop() {
                break;
            }
            if absorbed.contains(&i) {
                continue;
            }
            let anchor = sorted[i];
            let mut members = vec![anchor];

            for (j, other) in sorted.iter().enumerate().skip(i + 1) {
                if time_gap(other.date, anchor.date) > self.window {
                    break;
                }
                if absorbed.contains(&j) || !looks_alike(anchor, other) {
                    continue;
                }
                if members.iter().any(|m| self.ignore.contains_pair(&m.id, &other.id)) {
                    continue;
                }
                members.push(*other);
                absorbed.insert(j);
            }

            if members.len() > 1 {
                absorbed.insert(i);
                groups.push(DuplicateGroup { members: members.into_iter().cloned().collect() });
            }
        }

        info!(transactions = existing.len(), groups = groups.len(), "duplicate scan finished");
        groups
    }
}

fn looks_alike(a: &ExistingTransaction, b: &ExistingTransaction) -> bool {
    a.kind == b.kind
        && a.amount.abs_diff(b.amount) <= AMOUNT_TOLERANCE
        && (same_text(&a.note, &b.note) || same_raw_text(a, b))
}

fn same_text(a: &str, b: &str) -> bool {
    squash(a) == squash(b)
}

fn same_raw_text(a: &ExistingTransaction, b: &ExistingTransaction) -> bool {
    match (a.raw_text(), b.raw_text()) {
        (Some(x), Some(y)) => same_text(x, y),
        _ => false,
    }
}

/// Review state of one group: which members are marked for deletion.
#[derive(Debug, Clone)]
pub struct GroupReview {
    group: DuplicateGroup,
    marked: HashSet<String>,
}

impl GroupReview {
    /// Every member but the original starts marked for deletion.
    pub fn new(group: DuplicateGroup) -> Self {
        let marked = group.members.iter().skip(1).map(|m| m.id.clone()).collect();
        Self { group, marked }
    }

    pub fn group(&self) -> &DuplicateGroup {
        &self.group
    }

    pub fn is_marked(&self, id: &str) -> bool {
        self.marked.contains(id)
    }

    /// Flips a non-original member between delete and keep. Returns false for
    /// the original or an id outside the group.
    pub fn toggle(&mut self, id: &str) -> bool {
        let is_member = self.group.members.iter().skip(1).any(|m| m.id == id);
        if !is_member {
            return false;
        }
        if !self.marked.remove(id) {
            self.marked.insert(id.to_string());
        }
        true
    }

    /// Ids marked for deletion, in group order.
    pub fn to_delete(&self) -> Vec<String> {
        self.group
            .ids()
            .filter(|id| self.marked.contains(*id))
            .map(str::to_string)
            .collect()
    }

    /// "Not a duplicate": the updated ignore list to persist.
    pub fn dismiss(&self, ignore: &IgnoreList) -> IgnoreList {
        ignore.dismissed(&self.group)
    }
}

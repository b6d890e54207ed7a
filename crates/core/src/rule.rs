use serde::{Deserialize, Serialize};

use super::category::CategoryId;

/// A user-confirmed mapping from a merchant text fragment to a display name
/// and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedRule {
    /// Case-insensitive substring looked up in the raw merchant text.
    pub keyword: String,
    pub clean_name: String,
    pub category_id: CategoryId,
}

impl LearnedRule {
    pub fn new(keyword: &str, clean_name: &str, category_id: &str) -> Self {
        LearnedRule {
            keyword: keyword.to_string(),
            clean_name: clean_name.to_string(),
            category_id: CategoryId::from(category_id),
        }
    }

    /// A blank keyword would match every text, so it never matches anything.
    pub fn is_blank(&self) -> bool {
        self.keyword.trim().is_empty()
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category identifier as stored by the application, e.g. `"food"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        CategoryId(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub label: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl Category {
    pub fn new(id: &str, label: &str, color: &str, icon: &str) -> Self {
        Category {
            id: CategoryId::from(id),
            label: label.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
            is_custom: false,
        }
    }
}

pub const FOOD: &str = "food";
pub const TRANSFER: &str = "transfer";
pub const OTHER: &str = "other";

pub const DEFAULT_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    (FOOD, "Groceries", "#4caf50", "cart"),
    ("cafe", "Cafes & Restaurants", "#ff9800", "coffee"),
    ("transport", "Transport", "#2196f3", "car"),
    ("shopping", "Shopping", "#9c27b0", "bag"),
    ("health", "Health", "#f44336", "heart"),
    ("entertainment", "Entertainment", "#e91e63", "film"),
    ("utilities", "Utilities", "#795548", "home"),
    ("communication", "Phone & Internet", "#00bcd4", "phone"),
    (TRANSFER, "Transfers", "#607d8b", "swap"),
    ("salary", "Salary", "#8bc34a", "wallet"),
    (OTHER, "Other", "#9e9e9e", "dots"),
];

pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(id, label, color, icon)| Category::new(id, label, color, icon))
        .collect()
}

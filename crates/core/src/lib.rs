pub mod category;
pub mod money;
pub mod rule;
pub mod settings;
pub mod transaction;

pub use category::{default_categories, Category, CategoryId, DEFAULT_CATEGORIES};
pub use money::Money;
pub use rule::LearnedRule;
pub use settings::{ColumnHints, ImportSettings, SettingsError};
pub use transaction::{ExistingTransaction, TransactionCandidate, TransactionKind};

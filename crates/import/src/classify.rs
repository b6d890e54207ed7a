//! Category classifier: layered inference of a spending category.

use hearth_core::category::{OTHER, TRANSFER};
use hearth_core::{Category, CategoryId};
use serde::Serialize;

use crate::rules::RuleBook;
use crate::tables::{mcc_category, BANK_CATEGORY_LABELS, CATEGORY_KEYWORDS};
use crate::transfer::is_transfer;
use crate::util::{fold, lookup_fragment, re};

re!(re_mcc, r"\d{4}");

/// Which layer decided a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    LearnedRule,
    Transfer,
    MerchantCategoryCode,
    Keyword,
    BankLabel,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: CategoryId,
    pub source: CategorySource,
}

/// Everything the classifier may look at for one row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowText<'a> {
    /// Unmodified description from the statement.
    pub raw: &'a str,
    /// Output of the canonicalizer.
    pub name: &'a str,
    pub merchant_category_code: Option<&'a str>,
    /// The bank's own category label, if the export has one.
    pub bank_category: Option<&'a str>,
}

pub struct Classifier<'a> {
    rules: &'a RuleBook,
    categories: &'a [Category],
}

impl<'a> Classifier<'a> {
    pub fn new(rules: &'a RuleBook, categories: &'a [Category]) -> Self {
        Self { rules, categories }
    }

    pub fn classify(&self, row: &RowText<'_>) -> Classification {
        let decided = |category: &str, source| Classification { category: CategoryId::from(category), source };

        if let Some(rule) = self.rules.find_matching_rule(row.raw) {
            if !rule.category_id.as_str().trim().is_empty() {
                return Classification { category: rule.category_id.clone(), source: CategorySource::LearnedRule };
            }
        }

        if is_transfer(row.raw) {
            return decided(TRANSFER, CategorySource::Transfer);
        }

        if let Some(category) = row.merchant_category_code.and_then(category_for_mcc) {
            return decided(category, CategorySource::MerchantCategoryCode);
        }

        let keyword = lookup_fragment(&fold(row.name), CATEGORY_KEYWORDS)
            .or_else(|| lookup_fragment(&fold(row.raw), CATEGORY_KEYWORDS));
        if let Some(category) = keyword {
            return decided(category, CategorySource::Keyword);
        }

        if let Some(category) = row.bank_category.and_then(|label| self.bank_label(label)) {
            return Classification { category, source: CategorySource::BankLabel };
        }

        decided(OTHER, CategorySource::Fallback)
    }

    /// Static label table first, then a caller category named the same way.
    fn bank_label(&self, label: &str) -> Option<CategoryId> {
        let folded = fold(label.trim());
        if folded.is_empty() {
            return None;
        }
        if let Some(category) = lookup_fragment(&folded, BANK_CATEGORY_LABELS) {
            return Some(CategoryId::from(category));
        }
        self.categories
            .iter()
            .find(|c| fold(c.label.trim()) == folded || fold(c.id.as_str()) == folded)
            .map(|c| c.id.clone())
    }
}

/// First four-digit run of the cell, looked up exactly.
fn category_for_mcc(text: &str) -> Option<&'static str> {
    let code = re_mcc().find(text)?.as_str().parse().ok()?;
    mcc_category(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{default_categories, LearnedRule};

    fn classify(rules: &RuleBook, row: RowText<'_>) -> Classification {
        let categories = default_categories();
        Classifier::new(rules, &categories).classify(&row)
    }

    fn text<'a>(raw: &'a str, name: &'a str) -> RowText<'a> {
        RowText { raw, name, ..RowText::default() }
    }

    // ── layer order ───────────────────────────────────────────────────────────

    #[test]
    fn learned_rule_wins_over_everything() {
        let rules = RuleBook::new(vec![LearnedRule::new("пятерочка", "Пятерочка", "shopping")]);
        let row = RowText { merchant_category_code: Some("5411"), ..text("Пятерочка 5551", "Пятерочка") };
        let c = classify(&rules, row);
        assert_eq!(c.category, CategoryId::from("shopping"));
        assert_eq!(c.source, CategorySource::LearnedRule);
    }

    #[test]
    fn transfer_wording_beats_mcc() {
        let row = RowText {
            merchant_category_code: Some("5411"),
            ..text("Перевод СБП 79161234567", "Transfer via fast-payment system +7 916 123-45-67")
        };
        let c = classify(&RuleBook::empty(), row);
        assert_eq!(c.category, CategoryId::from("transfer"));
        assert_eq!(c.source, CategorySource::Transfer);
    }

    #[test]
    fn mcc_uses_first_four_digit_run() {
        let row = RowText { merchant_category_code: Some("MCC 5812"), ..text("ZERNO", "ZERNO") };
        let c = classify(&RuleBook::empty(), row);
        assert_eq!(c.category, CategoryId::from("cafe"));
        assert_eq!(c.source, CategorySource::MerchantCategoryCode);
    }

    #[test]
    fn unknown_mcc_falls_through_to_keywords() {
        let row = RowText { merchant_category_code: Some("0001"), ..text("Аптека 36,6", "Аптека 36,6") };
        let c = classify(&RuleBook::empty(), row);
        assert_eq!(c.category, CategoryId::from("health"));
        assert_eq!(c.source, CategorySource::Keyword);
    }

    #[test]
    fn keyword_on_cleaned_name() {
        let c = classify(&RuleBook::empty(), text("Пятерочка 5551 Москва", "Пятерочка"));
        assert_eq!(c.category, CategoryId::from("food"));
        assert_eq!(c.source, CategorySource::Keyword);
    }

    #[test]
    fn keyword_on_raw_text_when_name_is_silent() {
        let c = classify(&RuleBook::empty(), text("GOLD APPLE SUPERMARKET", "Gold apple"));
        assert_eq!(c.category, CategoryId::from("food"));
    }

    // ── bank labels ───────────────────────────────────────────────────────────

    #[test]
    fn bank_label_table() {
        let row = RowText { bank_category: Some("Супермаркеты"), ..text("ZERNO", "ZERNO") };
        let c = classify(&RuleBook::empty(), row);
        assert_eq!(c.category, CategoryId::from("food"));
        assert_eq!(c.source, CategorySource::BankLabel);
    }

    #[test]
    fn bank_label_matches_caller_category() {
        let categories = vec![Category::new("pets", "Питомцы", "#ffc107", "paw")];
        let rules = RuleBook::empty();
        let classifier = Classifier::new(&rules, &categories);
        let row = RowText { bank_category: Some(" ПИТОМЦЫ "), ..text("ZOO", "ZOO") };
        assert_eq!(classifier.classify(&row).category, CategoryId::from("pets"));
        let row = RowText { bank_category: Some("Pets"), ..text("ZOO", "ZOO") };
        assert_eq!(classifier.classify(&row).category, CategoryId::from("pets"));
    }

    #[test]
    fn falls_back_to_other() {
        let row = RowText { bank_category: Some("Разное"), ..text("ZOO", "ZOO") };
        let c = classify(&RuleBook::empty(), row);
        assert_eq!(c.category, CategoryId::from("other"));
        assert_eq!(c.source, CategorySource::Fallback);
    }
}

use hearth_core::ColumnHints;
use serde::Serialize;
use std::fmt;

use crate::grid::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Date,
    Amount,
    Note,
    Category,
    MerchantCategoryCode,
}

impl Field {
    /// Resolution order. The MCC column is resolved before the text columns
    /// so a "Merchant Category Code" header is not also taken as category or
    /// note.
    pub const RESOLUTION_ORDER: [Field; 5] = [
        Field::Date,
        Field::Amount,
        Field::MerchantCategoryCode,
        Field::Category,
        Field::Note,
    ];

    pub fn is_required(self) -> bool {
        matches!(self, Field::Date | Field::Amount)
    }

    pub fn default_terms(self) -> &'static [&'static str] {
        match self {
            Field::Date => &[
                "дата операции", "дата", "date", "transaction date", "время", "posted",
            ],
            Field::Amount => &[
                "сумма операции", "сумма", "amount", "sum", "списано", "зачислено", "дебет",
                "кредит", "debit", "credit",
            ],
            Field::Note => &[
                "описание", "description", "назначение платежа", "назначение", "контрагент",
                "получатель", "merchant", "payee", "note", "комментарий", "memo", "details",
            ],
            Field::Category => &["категория", "category"],
            Field::MerchantCategoryCode => &["mcc", "мсс", "merchant category code", "код категории"],
        }
    }

    fn hint(self, hints: &ColumnHints) -> Option<&str> {
        let hint = match self {
            Field::Date => hints.date.as_deref(),
            Field::Amount => hints.amount.as_deref(),
            Field::Note => hints.note.as_deref(),
            Field::Category => hints.category.as_deref(),
            Field::MerchantCategoryCode => None,
        };
        hint.map(str::trim).filter(|h| !h.is_empty())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Date => write!(f, "date"),
            Field::Amount => write!(f, "amount"),
            Field::Note => write!(f, "note"),
            Field::Category => write!(f, "category"),
            Field::MerchantCategoryCode => write!(f, "merchantCategoryCode"),
        }
    }
}

/// Physical column of each semantic field, built once per document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub amount: Option<usize>,
    pub note: Option<usize>,
    pub category: Option<usize>,
    pub merchant_category_code: Option<usize>,
}

impl ColumnMap {
    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::Date => self.date,
            Field::Amount => self.amount,
            Field::Note => self.note,
            Field::Category => self.category,
            Field::MerchantCategoryCode => self.merchant_category_code,
        }
    }

    fn set(&mut self, field: Field, column: Option<usize>) {
        match field {
            Field::Date => self.date = column,
            Field::Amount => self.amount = column,
            Field::Note => self.note = column,
            Field::Category => self.category = column,
            Field::MerchantCategoryCode => self.merchant_category_code = column,
        }
    }

    /// Required fields that did not resolve.
    pub fn missing_required(&self) -> Vec<Field> {
        Field::RESOLUTION_ORDER
            .into_iter()
            .filter(|f| f.is_required() && self.get(*f).is_none())
            .collect()
    }
}

/// Maps every field to a header column: exact match on any term first, then
/// containment; the leftmost qualifying column wins.
pub fn resolve_columns(header: &[Cell], hints: &ColumnHints) -> ColumnMap {
    let cells: Vec<String> = header
        .iter()
        .map(|c| c.text_form().trim().to_lowercase())
        .collect();

    let mut map = ColumnMap::default();
    let mut taken = vec![false; cells.len()];

    for field in Field::RESOLUTION_ORDER {
        let hint = field.hint(hints).map(str::to_lowercase);
        let terms: Vec<&str> = hint
            .as_deref()
            .into_iter()
            .chain(field.default_terms().iter().copied())
            .collect();

        let free = |i: &usize| !taken[*i] && !cells[*i].is_empty();
        let exact = (0..cells.len())
            .filter(free)
            .find(|&i| terms.iter().any(|t| cells[i] == *t));
        let column = exact.or_else(|| {
            (0..cells.len())
                .filter(free)
                .find(|&i| terms.iter().any(|t| cells[i].contains(t)))
        });

        if let Some(i) = column {
            taken[i] = true;
        }
        map.set(field, column);
    }

    map
}

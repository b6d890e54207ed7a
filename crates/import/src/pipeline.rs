//! Row pipeline: grid → header → column map → transaction candidates.

use chrono::FixedOffset;
use hearth_core::{Category, ColumnHints, ImportSettings, Money, TransactionCandidate, TransactionKind};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::cell::{offset_from_minutes, parse_amount, parse_date};
use crate::classify::{Classifier, RowText};
use crate::columns::{resolve_columns, ColumnMap, Field};
use crate::grid::{Cell, RawGrid, EMPTY};
use crate::header::{locate_header, HeaderCandidate};
use crate::merchant::{Canonicalizer, PLACEHOLDER_NAME};
use crate::rules::RuleBook;
use crate::source::SourceError;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Document contains no data")]
    EmptyDocument,
    #[error("Missing required columns: {}", field_list(.missing))]
    MissingRequiredColumns { missing: Vec<Field> },
    #[error("Failed to read document: {0}")]
    SourceRead(#[from] SourceError),
}

fn field_list(fields: &[Field]) -> String {
    fields.iter().map(Field::to_string).collect::<Vec<_>>().join(", ")
}

/// Why a data row produced no candidate.
#[derive(Error, Debug, Clone, PartialEq)]
enum SkipReason {
    #[error("blank row")]
    Blank,
    #[error("no date")]
    MissingDate,
    #[error("unparseable date {0:?}")]
    BadDate(String),
    #[error("zero or unparseable amount {0:?}")]
    BadAmount(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsedStatement {
    pub header: HeaderCandidate,
    pub columns: ColumnMap,
    pub candidates: Vec<TransactionCandidate>,
    pub skipped_rows: usize,
}

/// Parses one statement grid with a fixed set of settings and rules.
pub struct StatementParser<'s> {
    rules: RuleBook,
    categories: &'s [Category],
    hints: &'s ColumnHints,
    offset: FixedOffset,
}

impl<'s> StatementParser<'s> {
    pub fn new(settings: &'s ImportSettings) -> Self {
        Self::with_rules(settings, RuleBook::new(settings.rules.clone()))
    }

    /// Uses `rules` instead of the rules stored in `settings`.
    pub fn with_rules(settings: &'s ImportSettings, rules: RuleBook) -> Self {
        Self {
            rules,
            categories: &settings.categories,
            hints: &settings.hints,
            offset: offset_from_minutes(settings.utc_offset_minutes),
        }
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn parse(&self, grid: &RawGrid) -> Result<ParsedStatement, ImportError> {
        if grid.rows().iter().all(|row| row.iter().all(Cell::is_blank)) {
            return Err(ImportError::EmptyDocument);
        }

        let header = locate_header(grid);
        let columns = resolve_columns(grid.row(header.row).unwrap_or_default(), self.hints);
        let missing = columns.missing_required();
        if !missing.is_empty() {
            return Err(ImportError::MissingRequiredColumns { missing });
        }

        let canonicalizer = Canonicalizer::new(&self.rules);
        let classifier = Classifier::new(&self.rules, self.categories);

        let mut candidates = Vec::new();
        let mut skipped_rows = 0;
        for index in header.row + 1..grid.len() {
            match self.parse_row(grid, index, &columns, &canonicalizer, &classifier) {
                Ok(candidate) => candidates.push(candidate),
                Err(reason) => {
                    debug!(row = index, %reason, "row skipped");
                    skipped_rows += 1;
                }
            }
        }

        info!(
            header_row = header.row,
            parsed = candidates.len(),
            skipped = skipped_rows,
            "statement parsed"
        );

        Ok(ParsedStatement { header, columns, candidates, skipped_rows })
    }

    fn parse_row(
        &self,
        grid: &RawGrid,
        index: usize,
        columns: &ColumnMap,
        canonicalizer: &Canonicalizer<'_>,
        classifier: &Classifier<'_>,
    ) -> Result<TransactionCandidate, SkipReason> {
        if grid.row(index).unwrap_or_default().iter().all(Cell::is_blank) {
            return Err(SkipReason::Blank);
        }
        let cell = |field: Field| columns.get(field).map(|c| grid.cell(index, c)).unwrap_or(&EMPTY);
        let text = |field: Field| {
            let value = cell(field).text_form().trim().to_string();
            (!value.is_empty()).then_some(value)
        };

        let date_cell = cell(Field::Date);
        if date_cell.is_blank() {
            return Err(SkipReason::MissingDate);
        }
        let date = parse_date(date_cell, self.offset)
            .ok_or_else(|| SkipReason::BadDate(date_cell.text_form().into_owned()))?;

        let amount_cell = cell(Field::Amount);
        let signed = parse_amount(amount_cell)
            .map(Money::from_decimal)
            .filter(|m| !m.is_zero())
            .ok_or_else(|| SkipReason::BadAmount(amount_cell.text_form().into_owned()))?;

        let bank_category = text(Field::Category);
        let raw_note = text(Field::Note)
            .or_else(|| bank_category.clone())
            .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());
        let name = canonicalizer.canonicalize(&raw_note);
        let mcc = text(Field::MerchantCategoryCode);
        let classification = classifier.classify(&RowText {
            raw: &raw_note,
            name: &name.name,
            merchant_category_code: mcc.as_deref(),
            bank_category: bank_category.as_deref(),
        });

        Ok(TransactionCandidate {
            amount: signed.abs(),
            kind: TransactionKind::from_signed(signed),
            date,
            note: name.name,
            raw_note,
            category: classification.category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hearth_core::{CategoryId, LearnedRule};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        RawGrid::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|s| Cell::from(*s)).collect())
                .collect(),
        )
    }

    fn money(s: &str) -> Money {
        Money::from_decimal(Decimal::from_str(s).unwrap())
    }

    fn parse(g: &RawGrid) -> Result<ParsedStatement, ImportError> {
        StatementParser::new(&ImportSettings::default()).parse(g)
    }

    // ── happy path ────────────────────────────────────────────────────────────

    #[test]
    fn parses_rows_after_preamble() {
        let g = grid(&[
            &["Выписка по карте *1234"],
            &["Дата операции", "Сумма", "Категория", "Описание"],
            &["15.03.2024 14:22", "-350,00", "Супермаркеты", "Пятерочка 5551 Москва"],
            &["16.03.2024", "50 000,00", "Зарплата", "Зарплата за март"],
        ]);
        let parsed = parse(&g).unwrap();
        assert_eq!(parsed.header.row, 1);
        assert_eq!(parsed.skipped_rows, 0);
        assert_eq!(parsed.candidates.len(), 2);

        let first = &parsed.candidates[0];
        assert_eq!(first.amount, money("350"));
        assert_eq!(first.kind, TransactionKind::Expense);
        assert_eq!(first.date, Utc.with_ymd_and_hms(2024, 3, 15, 14, 22, 0).unwrap());
        assert_eq!(first.note, "Пятерочка");
        assert_eq!(first.raw_note, "Пятерочка 5551 Москва");
        assert_eq!(first.category, CategoryId::from("food"));

        let second = &parsed.candidates[1];
        assert_eq!(second.kind, TransactionKind::Income);
        assert_eq!(second.amount, money("50000"));
        assert_eq!(second.category, CategoryId::from("salary"));
    }

    #[test]
    fn amounts_are_rounded_to_cents() {
        let g = grid(&[&["Date", "Amount", "Description"], &["2024-03-01", "-10.005", "Coffee"]]);
        assert_eq!(parse(&g).unwrap().candidates[0].amount, money("10.00"));
    }

    #[test]
    fn numeric_cells_from_workbooks() {
        let g = RawGrid::from_rows(vec![
            vec![Cell::from("Date"), Cell::from("Amount"), Cell::from("MCC"), Cell::from("Description")],
            vec![Cell::Number(44927.0), Cell::Number(-120.5), Cell::Number(5812.0), Cell::from("ZERNO")],
        ]);
        let c = &parse(&g).unwrap().candidates[0];
        assert_eq!(c.date, Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(c.amount, money("120.50"));
        assert_eq!(c.category, CategoryId::from("cafe"));
    }

    #[test]
    fn statement_offset_shifts_text_dates() {
        let settings = ImportSettings { utc_offset_minutes: 180, ..ImportSettings::default() };
        let g = grid(&[&["Date", "Amount"], &["15.03.2024 02:00", "-1"]]);
        let c = &StatementParser::new(&settings).parse(&g).unwrap().candidates[0];
        assert_eq!(c.date, Utc.with_ymd_and_hms(2024, 3, 14, 23, 0, 0).unwrap());
    }

    // ── merchant text fallbacks ───────────────────────────────────────────────

    #[test]
    fn category_cell_stands_in_for_missing_note() {
        let g = grid(&[&["Date", "Amount", "Category"], &["2024-03-01", "-5", "Аптеки"]]);
        let c = &parse(&g).unwrap().candidates[0];
        assert_eq!(c.raw_note, "Аптеки");
        assert_eq!(c.category, CategoryId::from("health"));
    }

    #[test]
    fn placeholder_when_no_text_at_all() {
        let g = grid(&[&["Date", "Amount", "Description"], &["2024-03-01", "-5", ""]]);
        let c = &parse(&g).unwrap().candidates[0];
        assert_eq!(c.raw_note, PLACEHOLDER_NAME);
        assert_eq!(c.note, PLACEHOLDER_NAME);
        assert_eq!(c.category, CategoryId::from("other"));
    }

    #[test]
    fn settings_rules_are_applied() {
        let settings = ImportSettings {
            rules: vec![LearnedRule::new("zerno", "Зерно", "cafe")],
            ..ImportSettings::default()
        };
        let g = grid(&[&["Date", "Amount", "Description"], &["2024-03-01", "-5", "ZERNO COFFEE 0042"]]);
        let c = &StatementParser::new(&settings).parse(&g).unwrap().candidates[0];
        assert_eq!(c.note, "Зерно");
        assert_eq!(c.category, CategoryId::from("cafe"));
    }

    // ── skipped rows ──────────────────────────────────────────────────────────

    #[test]
    fn bad_rows_are_counted_not_fatal() {
        let g = grid(&[
            &["Date", "Amount", "Description"],
            &[],
            &["", "-5", "no date"],
            &["вчера", "-5", "bad date"],
            &["2024-03-01", "0,00", "zero"],
            &["2024-03-01", "n/a", "bad amount"],
            &["Итого", "", ""],
            &["2024-03-02", "-7", "Kept"],
        ]);
        let parsed = parse(&g).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.skipped_rows, 6);
    }

    // ── fatal errors ──────────────────────────────────────────────────────────

    #[test]
    fn empty_document() {
        assert!(matches!(parse(&RawGrid::default()), Err(ImportError::EmptyDocument)));
        assert!(matches!(parse(&grid(&[&[""], &[" "]])), Err(ImportError::EmptyDocument)));
    }

    #[test]
    fn missing_required_columns_names_every_field() {
        let err = parse(&grid(&[&["Описание", "Категория"], &["x", "y"]])).unwrap_err();
        match &err {
            ImportError::MissingRequiredColumns { missing } => {
                assert_eq!(missing, &vec![Field::Date, Field::Amount]);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.to_string(), "Missing required columns: date, amount");
    }
}

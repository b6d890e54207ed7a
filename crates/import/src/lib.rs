pub mod cell;
pub mod classify;
pub mod cluster;
pub mod columns;
pub mod dedup;
pub mod grid;
pub mod header;
pub mod merchant;
pub mod pipeline;
pub mod rules;
pub mod source;
pub mod tables;
pub mod transfer;
pub(crate) mod util;

pub use classify::{CategorySource, Classification, Classifier, RowText};
pub use cluster::{DuplicateClusterer, DuplicateGroup, GroupReview, IgnoreList, IgnorePairKey};
pub use columns::{ColumnMap, Field};
pub use dedup::{DedupOutcome, ImportDeduplicator, SuppressedCandidate};
pub use grid::{Cell, RawGrid};
pub use header::HeaderCandidate;
pub use merchant::{CanonicalName, Canonicalizer, NameSource, PLACEHOLDER_NAME};
pub use pipeline::{ImportError, ParsedStatement, StatementParser};
pub use rules::RuleBook;
pub use source::SourceError;

pub mod import {
    use hearth_core::{ExistingTransaction, ImportSettings, TransactionCandidate};
    use serde::Serialize;
    use std::path::Path;

    use crate::*;

    /// What one statement import produced.
    #[derive(Debug, Clone, Serialize)]
    pub struct ImportReport {
        pub header_row: usize,
        pub candidates: Vec<TransactionCandidate>,
        pub duplicates_suppressed: usize,
        pub rows_skipped: usize,
    }

    /// Parses `grid` and drops the rows already present in `existing`.
    pub fn import_statement(
        grid: &RawGrid,
        settings: &ImportSettings,
        existing: &[ExistingTransaction],
    ) -> Result<ImportReport, ImportError> {
        let parsed = StatementParser::new(settings).parse(grid)?;
        let offset = crate::cell::offset_from_minutes(settings.utc_offset_minutes);
        let outcome = ImportDeduplicator::new(existing).with_offset(offset).filter(parsed.candidates);
        Ok(ImportReport {
            header_row: parsed.header.row,
            candidates: outcome.fresh,
            duplicates_suppressed: outcome.suppressed.len(),
            rows_skipped: parsed.skipped_rows,
        })
    }

    /// Reads the document at `path` and imports it.
    pub fn import_file(
        path: &Path,
        settings: &ImportSettings,
        existing: &[ExistingTransaction],
    ) -> Result<ImportReport, ImportError> {
        let grid = crate::source::read_path(path)?;
        import_statement(&grid, settings, existing)
    }

    pub fn find_duplicate_groups(
        existing: &[ExistingTransaction],
        ignore: &IgnoreList,
    ) -> Vec<DuplicateGroup> {
        DuplicateClusterer::new(ignore).find_groups(existing)
    }
}

#[cfg(test)]
mod tests {
    use super::import::{find_duplicate_groups, import_statement};
    use super::*;
    use hearth_core::{CategoryId, ExistingTransaction, ImportSettings, LearnedRule, TransactionCandidate};

    fn statement() -> RawGrid {
        read_csv_str(
            "Выписка по счету 40817810000000000001\n\
             Период;01.03.2024 - 31.03.2024\n\
             Дата операции;Сумма операции;Категория;MCC;Описание\n\
             15.03.2024 10:01;-350,00;Супермаркеты;5411;Пятерочка 5551 Москва\n\
             15.03.2024 19:40;-350,00;Супермаркеты;5411;Пятерочка 5551 Москва\n\
             16.03.2024 12:00;-1 500,00;Переводы;;Перевод по СБП 79161234567\n\
             17.03.2024;+2 000,00;;;ООО Ромашка 1234 MOSCOW RUS\n\
             Итого;;;;\n",
        )
    }

    fn read_csv_str(s: &str) -> RawGrid {
        source::read_csv(s.as_bytes()).unwrap()
    }

    fn store(candidates: &[TransactionCandidate]) -> Vec<ExistingTransaction> {
        candidates
            .iter()
            .enumerate()
            .map(|(i, c)| ExistingTransaction::from_candidate(format!("tx-{i}"), c))
            .collect()
    }

    // ── end to end ────────────────────────────────────────────────────────────

    #[test]
    fn first_import_keeps_every_parsed_row() {
        let report = import_statement(&statement(), &ImportSettings::default(), &[]).unwrap();
        assert_eq!(report.header_row, 2);
        assert_eq!(report.candidates.len(), 4);
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(report.duplicates_suppressed, 0);

        let grocery = &report.candidates[0];
        assert_eq!(grocery.note, "Пятерочка");
        assert_eq!(grocery.category, CategoryId::from("food"));

        let transfer = &report.candidates[2];
        assert_eq!(transfer.note, "Transfer via fast-payment system +7 916 123-45-67");
        assert_eq!(transfer.category, CategoryId::from("transfer"));

        let income = &report.candidates[3];
        assert_eq!(income.note, "Ромашка");
        assert_eq!(income.kind, hearth_core::TransactionKind::Income);
    }

    #[test]
    fn second_import_of_the_same_statement_adds_nothing() {
        let settings = ImportSettings::default();
        let first = import_statement(&statement(), &settings, &[]).unwrap();
        let stored = store(&first.candidates);

        let second = import_statement(&statement(), &settings, &stored).unwrap();
        assert!(second.candidates.is_empty());
        assert_eq!(second.duplicates_suppressed, 4);
    }

    #[test]
    fn same_day_repeat_needs_two_stored_records() {
        let settings = ImportSettings::default();
        let first = import_statement(&statement(), &settings, &[]).unwrap();
        let only_one_grocery = store(&first.candidates[..1]);

        let second = import_statement(&statement(), &settings, &only_one_grocery).unwrap();
        assert_eq!(second.duplicates_suppressed, 1);
        assert_eq!(second.candidates.len(), 3);
        assert_eq!(second.candidates[0].note, "Пятерочка");
    }

    #[test]
    fn suggested_rule_applies_on_next_import() {
        let settings = ImportSettings::default();
        let report = import_statement(&statement(), &settings, &[]).unwrap();
        let romashka = &report.candidates[3];
        assert_eq!(romashka.category, CategoryId::from("other"));

        let book = RuleBook::new(settings.rules.clone());
        let rule = book.suggest(romashka, &CategoryId::from("salary")).unwrap();
        let settings = ImportSettings { rules: vec![rule], ..settings };

        let again = import_statement(&statement(), &settings, &[]).unwrap();
        assert_eq!(again.candidates[3].category, CategoryId::from("salary"));
        assert!(RuleBook::new(settings.rules.clone()).suggest(&again.candidates[3], &CategoryId::from("salary")).is_none());
    }

    #[test]
    fn suggested_rules_fire_for_rewritten_names() {
        let grid = read_csv_str(
            "Дата;Сумма;Описание\n\
             15.03.2024;-350,00;PYATEROCHKA 1234 MOSCOW\n\
             16.03.2024;-180,00;KOFEYNYA 0042 ZERNO\n",
        );
        let health = CategoryId::from("health");
        let settings = ImportSettings::default();
        let first = import_statement(&grid, &settings, &[]).unwrap();
        assert_eq!(first.candidates[0].note, "Пятерочка");

        let mut book = RuleBook::new(settings.rules.clone());
        for candidate in &first.candidates {
            let rule = book.suggest(candidate, &health).unwrap();
            book = book.with_rule(rule);
        }
        let settings = ImportSettings { rules: book.rules().cloned().collect(), ..settings };

        let again = import_statement(&grid, &settings, &[]).unwrap();
        for candidate in &again.candidates {
            assert_eq!(candidate.category, health);
            assert!(book.suggest(candidate, &health).is_none());
        }
    }

    #[test]
    fn date_only_export_matches_timed_record_on_local_day() {
        let settings = ImportSettings { utc_offset_minutes: 180, ..ImportSettings::default() };
        let timed = read_csv_str("Дата;Сумма;Описание\n15.03.2024 22:00;-350,00;Пятерочка 5551\n");
        let date_only = read_csv_str("Дата;Сумма;Описание\n15.03.2024;-350,00;Пятерочка 5551\n");

        let first = import_statement(&timed, &settings, &[]).unwrap();
        let stored = store(&first.candidates);
        let second = import_statement(&date_only, &settings, &stored).unwrap();
        assert_eq!(second.duplicates_suppressed, 1);
        assert!(second.candidates.is_empty());
    }

    #[test]
    fn learned_rule_overrides_brand_end_to_end() {
        let settings = ImportSettings {
            rules: vec![LearnedRule::new("пятерочка 5551", "Пятерочка у дома", "shopping")],
            ..ImportSettings::default()
        };
        let report = import_statement(&statement(), &settings, &[]).unwrap();
        assert_eq!(report.candidates[0].note, "Пятерочка у дома");
        assert_eq!(report.candidates[0].category, CategoryId::from("shopping"));
    }

    #[test]
    fn stored_duplicates_cluster_and_dismissal_sticks() {
        let first = import_statement(&statement(), &ImportSettings::default(), &[]).unwrap();
        let mut stored = store(&first.candidates);
        let mut copy = stored[0].clone();
        copy.id = "tx-copy".to_string();
        copy.date += chrono::Duration::minutes(3);
        stored.push(copy);

        let groups = find_duplicate_groups(&stored, &IgnoreList::new());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].original().id, "tx-0");

        let review = GroupReview::new(groups[0].clone());
        assert_eq!(review.to_delete(), vec!["tx-copy"]);
        let ignore = review.dismiss(&IgnoreList::new());
        assert!(find_duplicate_groups(&stored, &ignore).is_empty());
    }

    #[test]
    fn unusable_documents_are_errors() {
        let settings = ImportSettings::default();
        assert!(matches!(
            import_statement(&RawGrid::default(), &settings, &[]),
            Err(ImportError::EmptyDocument)
        ));
        assert!(matches!(
            import_statement(&read_csv_str("Описание\nкофе\n"), &settings, &[]),
            Err(ImportError::MissingRequiredColumns { .. })
        ));
    }
}

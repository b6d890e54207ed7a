use serde::Serialize;

use crate::grid::RawGrid;

/// Only the leading rows of a document are considered for the header.
pub const HEADER_SCAN_ROWS: usize = 30;
/// Below this score the best row is not trusted and row 0 is used instead.
pub const MIN_HEADER_SCORE: u32 = 2;

const DATE_KEYWORDS: &[&str] = &["date", "дата", "время", "time", "день"];
const AMOUNT_KEYWORDS: &[&str] = &[
    "amount", "sum", "сумма", "дебет", "кредит", "списано", "зачислено", "приход", "расход",
    "debit", "credit",
];
const NOTE_KEYWORDS: &[&str] = &[
    "description", "описание", "назначение", "note", "комментарий", "контрагент", "получатель",
    "merchant", "payee", "details", "memo",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderCandidate {
    pub row: usize,
    pub score: u32,
}

/// Scores one row: +2 for a date keyword, +2 for an amount keyword, +1 for a
/// description keyword. Each group counts once per row.
pub fn score_row<S: AsRef<str>>(cells: &[S]) -> u32 {
    let lowered: Vec<String> = cells.iter().map(|c| c.as_ref().to_lowercase()).collect();
    let has_any = |keywords: &[&str]| {
        lowered
            .iter()
            .any(|cell| keywords.iter().any(|k| cell.contains(k)))
    };

    let mut score = 0;
    if has_any(DATE_KEYWORDS) {
        score += 2;
    }
    if has_any(AMOUNT_KEYWORDS) {
        score += 2;
    }
    if has_any(NOTE_KEYWORDS) {
        score += 1;
    }
    score
}

/// Picks the header row. The earliest row wins ties; a weak best score falls
/// back to row 0 so the column resolver can still try.
pub fn locate_header(grid: &RawGrid) -> HeaderCandidate {
    let mut best = HeaderCandidate { row: 0, score: 0 };

    for (row, cells) in grid.rows().iter().take(HEADER_SCAN_ROWS).enumerate() {
        let texts: Vec<_> = cells.iter().map(|c| c.text_form()).collect();
        let score = score_row(texts.as_slice());
        if score > best.score {
            best = HeaderCandidate { row, score };
        }
    }

    if best.score < MIN_HEADER_SCORE {
        tracing::warn!(
            best_row = best.row,
            best_score = best.score,
            "no convincing header row found, falling back to row 0"
        );
        return HeaderCandidate { row: 0, score: best.score };
    }

    best
}

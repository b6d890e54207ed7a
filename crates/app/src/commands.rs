use anyhow::{bail, Context, Result};
use hearth_core::{ExistingTransaction, ImportSettings};
use hearth_import::import::{find_duplicate_groups, import_file, ImportReport};
use hearth_import::{DuplicateGroup, GroupReview, IgnoreList};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One group as printed by `hearth duplicates`.
#[derive(Debug, Serialize)]
pub struct GroupOutput {
    pub index: usize,
    pub original_id: String,
    pub to_delete: Vec<String>,
    pub members: Vec<ExistingTransaction>,
}

impl GroupOutput {
    fn new(index: usize, group: &DuplicateGroup) -> Self {
        let review = GroupReview::new(group.clone());
        GroupOutput {
            index,
            original_id: group.original().id.clone(),
            to_delete: review.to_delete(),
            members: group.members.clone(),
        }
    }
}

pub fn cmd_import(file: &Path, config: Option<&Path>, existing: Option<&Path>) -> Result<()> {
    let settings = match config {
        Some(path) => ImportSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => ImportSettings::default(),
    };
    let existing = match existing {
        Some(path) => load_existing(path)?,
        None => Vec::new(),
    };

    info!("Importing {}", file.display());
    let report = import_file(file, &settings, &existing)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    log_report(&report, &settings);

    println!("{}", serde_json::to_string_pretty(&report.candidates)?);
    Ok(())
}

fn log_report(report: &ImportReport, settings: &ImportSettings) {
    info!(
        header_row = report.header_row,
        new = report.candidates.len(),
        duplicates = report.duplicates_suppressed,
        skipped = report.rows_skipped,
        currency = %settings.currency,
        "import finished"
    );
}

pub fn cmd_duplicates(existing: &Path, ignore_path: Option<&Path>, dismiss: &[usize]) -> Result<()> {
    let existing = load_existing(existing)?;
    let mut ignore = match ignore_path {
        Some(path) if path.exists() => load_ignore(path)?,
        _ => IgnoreList::new(),
    };

    let groups = find_duplicate_groups(&existing, &ignore);
    let output: Vec<GroupOutput> = groups
        .iter()
        .enumerate()
        .map(|(index, group)| GroupOutput::new(index, group))
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);

    if dismiss.is_empty() {
        return Ok(());
    }
    let Some(path) = ignore_path else {
        bail!("--dismiss needs an --ignore file to record the decision");
    };
    for &index in dismiss {
        let group = groups
            .get(index)
            .with_context(|| format!("No duplicate group with index {index}"))?;
        ignore = GroupReview::new(group.clone()).dismiss(&ignore);
    }

    std::fs::write(path, serde_json::to_string_pretty(&ignore)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(dismissed = dismiss.len(), keys = ignore.len(), "ignore list updated");
    Ok(())
}

fn load_existing(path: &Path) -> Result<Vec<ExistingTransaction>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid transactions file {}", path.display()))
}

fn load_ignore(path: &Path) -> Result<IgnoreList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid ignore file {}", path.display()))
}

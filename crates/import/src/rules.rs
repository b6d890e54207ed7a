use hearth_core::{CategoryId, LearnedRule, TransactionCandidate};
use serde::Deserialize;

use crate::merchant::{strip_noise, PLACEHOLDER_NAME};
use crate::transfer::{FAST_PAYMENT_LABEL, TRANSFER_LABEL};
use crate::util::fold;

/// Internal pairing of a rule with its folded keyword.
struct FoldedRule {
    rule: LearnedRule,
    keyword: String,
}

/// The caller's learned rules, evaluated in the order they were supplied.
pub struct RuleBook {
    rules: Vec<FoldedRule>,
}

#[derive(Deserialize)]
struct RulesDocument {
    #[serde(default)]
    rules: Vec<LearnedRule>,
}

impl RuleBook {
    pub fn new(rules: Vec<LearnedRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| FoldedRule { keyword: fold(rule.keyword.trim()), rule })
            .collect();
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Parses a document of `[[rules]]` tables.
    pub fn from_toml(toml_content: &str) -> Result<Self, String> {
        let doc: RulesDocument =
            toml::from_str(toml_content).map_err(|e| format!("Failed to parse TOML: {e}"))?;
        Ok(Self::new(doc.rules))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &LearnedRule> {
        self.rules.iter().map(|fr| &fr.rule)
    }

    /// First rule, in caller order, whose keyword occurs in `text`.
    pub fn find_matching_rule(&self, text: &str) -> Option<&LearnedRule> {
        let text = fold(text);
        self.rules
            .iter()
            .find(|fr| !fr.rule.is_blank() && text.contains(&fr.keyword))
            .map(|fr| &fr.rule)
    }

    /// Returns a new book with `rule` appended after the existing ones.
    pub fn with_rule(&self, rule: LearnedRule) -> Self {
        let mut rules: Vec<LearnedRule> = self.rules().cloned().collect();
        rules.push(rule);
        Self::new(rules)
    }

    /// Rule the caller may store after confirming `category` for a merchant
    /// the engine did not recognise. The keyword is a fragment of the raw
    /// text so the rule fires on the next import of the same row; `None` for
    /// placeholder and transfer names, when no such fragment exists, or when a
    /// rule already covers the text.
    pub fn suggest(&self, candidate: &TransactionCandidate, category: &CategoryId) -> Option<LearnedRule> {
        let name = candidate.note.trim();
        let generic = name.chars().count() < 2
            || name == PLACEHOLDER_NAME
            || name.starts_with(TRANSFER_LABEL)
            || name.starts_with(FAST_PAYMENT_LABEL);
        if generic || self.find_matching_rule(&candidate.raw_note).is_some() {
            return None;
        }
        let keyword = suggested_keyword(&candidate.raw_note)?;
        Some(LearnedRule {
            keyword,
            clean_name: name.to_string(),
            category_id: category.clone(),
        })
    }
}

/// Longest run of cleaned words that still occurs verbatim in the folded raw
/// text. Ties go to the earlier run.
fn suggested_keyword(raw: &str) -> Option<String> {
    let haystack = fold(raw);
    let cleaned = fold(&strip_noise(raw));
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    let mut best: Option<String> = None;
    for start in 0..words.len() {
        for end in start + 1..=words.len() {
            let phrase = words[start..end].join(" ");
            if !haystack.contains(&phrase) {
                break;
            }
            let longer = best
                .as_ref()
                .map_or(true, |b| phrase.chars().count() > b.chars().count());
            if longer {
                best = Some(phrase);
            }
        }
    }
    best.filter(|k| k.chars().count() >= 2)
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::empty()
    }
}

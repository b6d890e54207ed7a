//! Merchant canonicalizer: reduces a bank's free-text description to a short
//! human-readable merchant name.

use serde::Serialize;

use crate::rules::RuleBook;
use crate::tables::BRANDS;
use crate::transfer::{fast_payment_name, transfer_name};
use crate::util::{capitalize_first, fold, lookup_fragment, re};

/// Name used when nothing better can be derived.
pub const PLACEHOLDER_NAME: &str = "Bank operation";

re!(re_leading_operation,
    r"(?i)^\s*(?:операция\s+по\s+карте|оплата\s+товаров\s+и\s+услуг|безналичная\s+оплата|оплата|покупка|списание|платеж|payment|purchase|retail|pos|card)\b[\s:\-]*");
re!(re_trailing_place,
    r"(?i)[\s,]+(?:г\.?\s*)?(?:москва|moscow|msk|мск|санкт[\s\-]петербург|spb|спб|st\.?\s*petersburg|sankt[\s\-]peterbu\w*|rus|russia|россия|rf|рф|ru)\.?\s*$");
re!(re_time, r"\b\d{1,2}:\d{2}(?::\d{2})?\b");
re!(re_date, r"\b\d{1,4}[./\-]\d{1,2}[./\-]\d{1,4}\b");
re!(re_masked_card, r"(?:\d{4,6})?[*•xX]{2,}\s*\d{2,4}\b|\b(?i:card|карта)\s*[*•]?\d{4}\b");
re!(re_legal_form, r"(?i)\b(?:ооо|оао|пао|зао|нко|ао|ип|llc|ltd|inc|gmbh)\b\.?");
re!(re_long_number, r"\b\d{4,}\b");
re!(re_punctuation, r#"[\s,;:*#№|/\\_"'«»()\[\]]+"#);

/// Which layer produced a canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSource {
    LearnedRule,
    FastPayment,
    Transfer,
    Brand,
    Cleaned,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalName {
    pub name: String,
    pub source: NameSource,
}

type Layer = fn(&RuleBook, &str) -> Option<String>;

/// Evaluated in order; the first layer that yields a name wins.
const LAYERS: [(NameSource, Layer); 5] = [
    (NameSource::LearnedRule, learned_name),
    (NameSource::FastPayment, fast_payment_layer),
    (NameSource::Transfer, transfer_layer),
    (NameSource::Brand, brand_name),
    (NameSource::Cleaned, cleaned_layer),
];

pub struct Canonicalizer<'r> {
    rules: &'r RuleBook,
}

impl<'r> Canonicalizer<'r> {
    pub fn new(rules: &'r RuleBook) -> Self {
        Self { rules }
    }

    pub fn canonicalize(&self, raw: &str) -> CanonicalName {
        let raw = raw.trim();
        LAYERS
            .iter()
            .find_map(|(source, layer)| {
                layer(self.rules, raw).map(|name| CanonicalName { name, source: *source })
            })
            .unwrap_or_else(|| CanonicalName {
                name: PLACEHOLDER_NAME.to_string(),
                source: NameSource::Placeholder,
            })
    }
}

fn learned_name(rules: &RuleBook, text: &str) -> Option<String> {
    rules
        .find_matching_rule(text)
        .map(|rule| rule.clean_name.trim().to_string())
        .filter(|name| !name.is_empty())
}

fn fast_payment_layer(_: &RuleBook, text: &str) -> Option<String> {
    fast_payment_name(text)
}

fn transfer_layer(_: &RuleBook, text: &str) -> Option<String> {
    transfer_name(text)
}

fn brand_name(_: &RuleBook, text: &str) -> Option<String> {
    lookup_fragment(&fold(text), BRANDS).map(str::to_string)
}

fn cleaned_layer(_: &RuleBook, text: &str) -> Option<String> {
    let cleaned = strip_noise(text);
    (cleaned.chars().count() >= 2).then_some(cleaned)
}

/// Removes operation prefixes, places, timestamps, dates, card fragments,
/// legal forms and store numbers, then capitalises what is left.
pub fn strip_noise(text: &str) -> String {
    let mut s = text.to_string();
    for pattern in [re_time(), re_date(), re_masked_card(), re_legal_form(), re_long_number()] {
        s = pattern.replace_all(&s, " ").into_owned();
    }
    s = re_punctuation().replace_all(&s, " ").trim().to_string();

    loop {
        let next = re_leading_operation().replace(&s, "").trim().to_string();
        if next == s {
            break;
        }
        s = next;
    }
    loop {
        let next = re_trailing_place().replace(&s, "").trim().to_string();
        if next == s {
            break;
        }
        s = next;
    }

    let s = s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '.' | ','));
    capitalize_first(s)
}

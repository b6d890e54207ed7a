//! Peer-to-peer transfer detection: fast-payment-system (SBP) phrasing,
//! generic transfer wording and embedded Russian mobile numbers.

use crate::util::{fold, re};

re!(re_fast_payment,
    r"(?i)(?:\bсбп\b|систем\w*\s+быстрых\s+платежей|\bsbp\b|fast[\s\-]*payment)");
re!(re_transfer,
    r"(?i)(?:перевод|\btransfer|\bp2p\b|по\s+номеру\s+телефона|card2card|с\s+карты\s+на\s+карту)");
re!(re_phone,
    r"(?:^|[^\d])((?:\+\s*7|7|8)?[\s\-(]*9\d{2}[\s\-)]*\d{3}[\s\-]*\d{2}[\s\-]*\d{2})(?:$|[^\d])");
// "Иван Иванович И.", "Иванов И.И.": a capitalised word, an optional second
// one, then a single initial with a dot.
re!(re_payer,
    r"\b([А-ЯЁA-Z][а-яёa-z]+)(?:\s+[А-ЯЁA-Z][а-яёa-z]+)?\s+([А-ЯЁA-Z])\.");

pub const FAST_PAYMENT_LABEL: &str = "Transfer via fast-payment system";
pub const TRANSFER_LABEL: &str = "Transfer";

/// A normalized Russian mobile number: the ten national digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone(String);

impl Phone {
    /// Accepts `+7`/`7`/`8` + 10 digits or a bare 10-digit number starting
    /// with 9.
    pub fn from_digits(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        let national = match digits.len() {
            11 if digits.starts_with('7') || digits.starts_with('8') => &digits[1..],
            10 => digits.as_str(),
            _ => return None,
        };
        national.starts_with('9').then(|| Phone(national.to_string()))
    }

    /// `+7 916 123-45-67`
    pub fn formatted(&self) -> String {
        let d = &self.0;
        format!("+7 {} {}-{}-{}", &d[0..3], &d[3..6], &d[6..8], &d[8..10])
    }
}

/// First phone-like digit run in the text.
pub fn find_phone(text: &str) -> Option<Phone> {
    re_phone()
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .find_map(|m| Phone::from_digits(m.as_str()))
}

pub fn mentions_fast_payment(text: &str) -> bool {
    re_fast_payment().is_match(text)
}

/// Any transfer wording, fast-payment phrasing included.
pub fn is_transfer(text: &str) -> bool {
    mentions_fast_payment(text) || re_transfer().is_match(&fold(text))
}

/// Payer display name as "Name S.".
fn find_payer(text: &str) -> Option<String> {
    // Blank the phone so the name pattern cannot span across it.
    let without_phone = re_phone().replace_all(text, " ");
    let caps = re_payer().captures(&without_phone)?;
    Some(format!("{} {}.", caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Canonical name for a structured fast-payment transfer: the phrase plus a
/// phone number are both required, the payer name is optional.
pub fn fast_payment_name(text: &str) -> Option<String> {
    if !mentions_fast_payment(text) {
        return None;
    }
    let phone = find_phone(text)?;
    Some(match find_payer(text) {
        Some(payer) => format!("{FAST_PAYMENT_LABEL} {} ({payer})", phone.formatted()),
        None => format!("{FAST_PAYMENT_LABEL} {}", phone.formatted()),
    })
}

/// Canonical name for any other transfer wording.
pub fn transfer_name(text: &str) -> Option<String> {
    if !is_transfer(text) {
        return None;
    }
    Some(match find_phone(text) {
        Some(phone) => format!("{TRANSFER_LABEL} {}", phone.formatted()),
        None => TRANSFER_LABEL.to_string(),
    })
}

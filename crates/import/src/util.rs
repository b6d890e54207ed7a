// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static R: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            R.get_or_init(|| ::regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

pub(crate) use re;

// ── Text folding ──────────────────────────────────────────────────────────────

/// Lower-cases and folds `ё` to `е` so keyword tables need one spelling.
pub fn fold(s: &str) -> String {
    s.to_lowercase().replace('ё', "е")
}

/// Case- and whitespace-insensitive comparison key.
pub fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns the first `(fragment, value)` entry whose fragment occurs in the
/// already-folded `haystack`.
pub fn lookup_fragment<'a>(haystack: &str, table: &'a [(&'a str, &'a str)]) -> Option<&'a str> {
    table
        .iter()
        .find(|(fragment, _)| haystack.contains(fragment))
        .map(|(_, value)| *value)
}

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

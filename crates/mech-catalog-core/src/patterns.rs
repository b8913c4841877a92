use std::sync::OnceLock;

use regex_lite::Regex;

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    // Patterns below are string literals covered by unit tests.
    Regex::new(pattern).expect("literal regex pattern must compile")
}

/// `Prime` (any case) or a lone uppercase letter A-H, as a whole word.
pub(crate) fn configuration_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"\b(?:(?i:prime)|[A-H])\b"))
}

pub(crate) fn numeric_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"\b([0-9]+)\b"))
}

pub(crate) fn parenthesized() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"\(([^)]+)\)"))
}

pub(crate) fn bracketed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"\[([^\]]+)\]"))
}

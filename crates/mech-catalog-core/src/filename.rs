//! Fallback extraction of unit identity from corpus file names.
//!
//! Only consulted when the structured `chassis`/`model` fields are absent.
//! File names follow the converter's convention of
//! `<chassis> (<variant>) [<tag>].json`.

use crate::patterns;

/// File name without its `.json` extension.
#[must_use]
pub fn file_stem(file_name: &str) -> &str {
    file_name.strip_suffix(".json").unwrap_or(file_name)
}

/// Contents of the first non-empty `(...)` group.
#[must_use]
pub fn parenthesized(file_name: &str) -> Option<&str> {
    first_capture(patterns::parenthesized(), file_name)
}

/// Contents of the first non-empty `[...]` group.
#[must_use]
pub fn bracketed(file_name: &str) -> Option<&str> {
    first_capture(patterns::bracketed(), file_name)
}

/// Chassis label: the stem truncated before any parenthesised suffix.
///
/// `"Achileus BA (Sqd 4) [David].json"` yields `"Achileus BA"`. A stem that
/// opens with `(` is kept whole, so the label is never empty for a non-empty
/// file name.
#[must_use]
pub fn chassis_from_file_name(file_name: &str) -> String {
    let stem = file_stem(file_name);
    let head = stem.split_once('(').map_or(stem, |(head, _)| head).trim();
    if !head.is_empty() {
        head.to_string()
    } else if !stem.trim().is_empty() {
        stem.trim().to_string()
    } else {
        file_name.to_string()
    }
}

/// Synthetic model label from a file name carrying both a `(...)` and a
/// `[...]` group, joined parenthesised group first.
///
/// `"Achileus BA (Sqd 4) [David].json"` yields `"Sqd 4 David"`.
#[must_use]
pub fn model_from_file_name(file_name: &str) -> Option<String> {
    let paren = parenthesized(file_name)?;
    let bracket = bracketed(file_name)?;
    Some(format!("{paren} {bracket}"))
}

fn first_capture<'a>(re: &regex_lite::Regex, haystack: &'a str) -> Option<&'a str> {
    re.captures(haystack).and_then(|captures| captures.get(1)).map(|group| group.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_file_name_becomes_chassis() {
        assert_eq!(chassis_from_file_name("Annihilator ANH-1A.json"), "Annihilator ANH-1A");
        assert_eq!(model_from_file_name("Annihilator ANH-1A.json"), None);
    }

    #[test]
    fn parenthesised_suffix_is_truncated() {
        assert_eq!(chassis_from_file_name("Black Hawk (Nova) Prime.json"), "Black Hawk");
        assert_eq!(chassis_from_file_name("Achileus BA (Sqd 4) [David].json"), "Achileus BA");
    }

    #[test]
    fn leading_group_keeps_whole_stem() {
        assert_eq!(chassis_from_file_name("(Nova) Prime.json"), "(Nova) Prime");
        assert_eq!(chassis_from_file_name(".json"), ".json");
    }

    #[test]
    fn model_requires_both_groups() {
        assert_eq!(
            model_from_file_name("Achileus BA (Sqd 4) [David].json").as_deref(),
            Some("Sqd 4 David")
        );
        assert_eq!(model_from_file_name("Black Hawk (Nova) Prime.json"), None);
        assert_eq!(model_from_file_name("Elemental [Laser].json"), None);
    }

    #[test]
    fn stem_only_strips_json_extension() {
        assert_eq!(file_stem("Atlas AS7-D.json"), "Atlas AS7-D");
        assert_eq!(file_stem("Atlas AS7-D"), "Atlas AS7-D");
    }
}

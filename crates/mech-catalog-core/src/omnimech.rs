//! OmniMech detection and base-chassis / configuration decomposition.

use serde::{Deserialize, Serialize};

use crate::{filename, patterns};

/// Document keys holding the configuration string, in lookup order.
pub const CONFIG_KEYS: [&str; 2] = ["Config", "config"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct OmniMechInfo {
    pub is_omnimech: bool,
    pub base_chassis: Option<String>,
    pub configuration: Option<String>,
}

/// Everything the decomposer may look at for one unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct OmniMechInput<'a> {
    pub config: &'a str,
    pub chassis: &'a str,
    pub model: &'a str,
    pub clan_name: Option<&'a str>,
    /// Explicit `is_omnimech` flag already present on the document.
    pub flagged: bool,
    /// Source file name, used only when no model is available.
    pub file_name: Option<&'a str>,
}

#[must_use]
pub fn is_omnimech_config(config: &str) -> bool {
    config.to_lowercase().contains("omnimech")
}

/// Decomposes a unit from its configuration string and naming fields.
#[must_use]
pub fn decompose(config: &str, chassis: &str, model: &str, clan_name: Option<&str>) -> OmniMechInfo {
    decompose_with(&OmniMechInput { config, chassis, model, clan_name, ..OmniMechInput::default() })
}

/// Full decomposition, including the explicit flag and file-name fallback.
///
/// The configuration is looked up in this order:
/// 1. a `Prime` / `A`-`H` token in the model,
/// 2. the same token in the chassis, which is then stripped from the base
///    chassis unless a Clan name supplies it,
/// 3. the model (or, when there is no model, the parenthesised part of the
///    file name) as a label: its `Prime` / letter token, else its first
///    numeric token, else the label verbatim.
#[must_use]
pub fn decompose_with(input: &OmniMechInput<'_>) -> OmniMechInfo {
    if !input.flagged && !is_omnimech_config(input.config) {
        return OmniMechInfo::default();
    }

    let clan_name = input.clan_name.filter(|name| !name.is_empty());
    let mut base_chassis = clan_name.unwrap_or(input.chassis).to_string();

    let configuration = if let Some(token) = configuration_token(input.model) {
        Some(token)
    } else if let Some((token, stripped)) = strip_configuration_token(input.chassis) {
        if clan_name.is_none() {
            base_chassis = stripped;
        }
        Some(token)
    } else {
        fallback_label(input).and_then(configuration_from_label)
    };

    OmniMechInfo {
        is_omnimech: true,
        base_chassis: Some(base_chassis).filter(|base| !base.is_empty()),
        configuration,
    }
}

fn configuration_token(text: &str) -> Option<String> {
    patterns::configuration_token().find(text).map(|found| canonical_token(found.as_str()))
}

fn canonical_token(token: &str) -> String {
    if token.eq_ignore_ascii_case("prime") {
        "Prime".to_string()
    } else {
        token.to_string()
    }
}

/// Token found in `chassis` plus the chassis with that token (and the
/// whitespace before it) removed.
fn strip_configuration_token(chassis: &str) -> Option<(String, String)> {
    let found = patterns::configuration_token().find(chassis)?;
    let head = chassis[..found.start()].trim_end();
    let stripped = format!("{head}{}", &chassis[found.end()..]).trim().to_string();
    let base = if stripped.is_empty() { chassis.to_string() } else { stripped };
    Some((canonical_token(found.as_str()), base))
}

fn fallback_label<'a>(input: &OmniMechInput<'a>) -> Option<&'a str> {
    if input.model.trim().is_empty() {
        input.file_name.and_then(filename::parenthesized)
    } else {
        Some(input.model)
    }
}

fn configuration_from_label(label: &str) -> Option<String> {
    configuration_token(label)
        .or_else(|| {
            patterns::numeric_token()
                .captures(label)
                .and_then(|captures| captures.get(1))
                .map(|digits| digits.as_str().to_string())
        })
        .or_else(|| Some(label.to_string()).filter(|text| !text.trim().is_empty()))
}

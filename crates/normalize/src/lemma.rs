//! Noun lemmatization through a fixed table plus plural-suffix rules.
//!
//! The model artifacts were fitted on noun lemmas (`printers` -> `printer`,
//! `queries` -> `query`). Verbs and adjectives pass through unchanged, so
//! `working` stays `working`.
//!
//! Resolution order:
//! 1. the irregular table (`children` -> `child`, `data` -> `datum`),
//! 2. the keep list (words that look plural but are not),
//! 3. suffix rules, most specific first.

use fxhash::FxHashMap;
use once_cell::sync::Lazy;

const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("data", "datum"),
    ("criteria", "criterion"),
    ("analyses", "analysis"),
    ("diagnoses", "diagnosis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("knives", "knife"),
    ("shelves", "shelf"),
    ("halves", "half"),
    ("wives", "wife"),
];

/// Words ending in `s` that are already lemmas.
const KEEP: &[&str] = &[
    "always", "news", "series", "species", "means", "perhaps", "sometimes", "canvas", "atlas",
    "alias", "bias", "lens", "chaos", "thanks", "mathematics", "physics", "economics",
    "analytics", "logistics", "diabetes", "windows", "ios", "macos", "dns", "https", "sms",
    "gps", "aws", "yes", "whereas", "afterwards",
];

static IRREGULAR_TABLE: Lazy<FxHashMap<&'static str, &'static str>> =
    Lazy::new(|| IRREGULAR.iter().copied().collect());

static KEEP_TABLE: Lazy<fxhash::FxHashSet<&'static str>> =
    Lazy::new(|| KEEP.iter().copied().collect());

/// Reduce a lowercase ASCII token to its noun lemma.
///
/// Tokens of three bytes or fewer are returned unchanged.
pub fn lemmatize(token: &str) -> String {
    if let Some(lemma) = IRREGULAR_TABLE.get(token) {
        return (*lemma).to_string();
    }
    if token.len() <= 3 || KEEP_TABLE.contains(token) {
        return token.to_string();
    }

    // `ss`, `us` and `is` endings are singular (access, status, analysis).
    if token.ends_with("ss") || token.ends_with("us") || token.ends_with("is") {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{stem}y");
        }
        return token.to_string();
    }

    for suffix in ["sses", "ches", "shes", "xes", "zes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }

    if let Some(stem) = token.strip_suffix('s') {
        return stem.to_string();
    }

    token.to_string()
}

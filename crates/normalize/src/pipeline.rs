use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizeConfig;
use crate::error::NormalizeError;
use crate::lemma::lemmatize;
use crate::stopwords::is_stop_word;
use crate::text::NormalizedText;

/// Main entry point. Turns raw ticket text into its canonical token sequence.
///
/// Characters that are neither ASCII letters nor whitespace are dropped
/// without splitting the surrounding word, so `e-mail` becomes `email` and
/// `wi-fi2` becomes `wifi`.
pub fn normalize(input: &str, cfg: &NormalizeConfig) -> Result<NormalizedText, NormalizeError> {
    cfg.validate()?;

    // NFKC first, as it can turn compatibility forms into plain letters.
    let unicode_text: Cow<str> = if cfg.normalize_unicode {
        Cow::Owned(input.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(input)
    };

    let mut tokens: Vec<String> = Vec::with_capacity((unicode_text.len() / 6).saturating_add(1));
    let mut current = String::new();

    for ch in unicode_text.chars() {
        if ch.is_whitespace() {
            finalize_token(&mut current, cfg, &mut tokens);
        } else if ch.is_ascii_alphabetic() {
            current.push(ch.to_ascii_lowercase());
        }
    }
    finalize_token(&mut current, cfg, &mut tokens);

    let text = tokens.join(" ");
    Ok(NormalizedText {
        tokens,
        text,
        version: cfg.version,
    })
}

/// Applies stop-word removal and lemmatization to the pending token.
fn finalize_token(current: &mut String, cfg: &NormalizeConfig, tokens: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let raw = std::mem::take(current);

    if cfg.remove_stop_words && (is_stop_word(&raw) || is_extra_stop_word(&raw, cfg)) {
        return;
    }

    let token = if cfg.lemmatize { lemmatize(&raw) } else { raw };
    if token.len() < cfg.min_token_len {
        return;
    }
    tokens.push(token);
}

fn is_extra_stop_word(token: &str, cfg: &NormalizeConfig) -> bool {
    cfg.extra_stop_words
        .iter()
        .any(|word| word.trim().eq_ignore_ascii_case(token))
}

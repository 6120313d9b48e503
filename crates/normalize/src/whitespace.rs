//! Whitespace normalization utilities.
//!
//! [`collapse_whitespace`] is shared with the routing layer, which compares
//! department names after trimming and collapsing internal runs.
//!
//! ```rust
//! use normalize::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  IT \t  Support \n"), "IT Support");
//! ```

/// Collapses repeated Unicode whitespace into single ASCII spaces and trims
/// both edges. Whitespace-only input yields an empty string.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(segment);
    }
    out
}

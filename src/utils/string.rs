//! String utility functions for posting text normalization

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Convert an algorithm or component name into snake_case.
///
/// Acronyms are kept together, separators (spaces, dashes, dots) become
/// underscores.
///
/// # Examples
/// ```
/// use skills_ml::utils::string::to_snake_case;
///
/// assert_eq!(to_snake_case("MockClassifier"), "mock_classifier");
/// assert_eq!(to_snake_case("KNNDoc2VecClassifier"), "knn_doc2_vec_classifier");
/// assert_eq!(to_snake_case("already_snake"), "already_snake");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' || c == '-' || c == '.' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }

        out.extend(c.to_lowercase());
    }

    out.trim_matches('_').to_string()
}

/// Remove HTML tags, replacing each with a space
pub fn strip_html(s: &str) -> String {
    HTML_TAG.replace_all(s, " ").into_owned()
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

//! # URL Templates
//!
//! Operations are bound to a URL template such as `/movies/{id}/ratings`. Callers fill the
//! `{name}` placeholders at trigger time with an ordered list of [`UrlParam`]s.
//!
//! Substitution is **sequential**: each param replaces the *first remaining* occurrence of its
//! placeholder in the string produced by the previous params. Repeating a name therefore walks
//! through the template left to right:
//!
//! ```rust
//! use review_client::url_template::{resolve, UrlParam};
//!
//! let url = resolve(
//!     "/movies/{id}/ratings/{id}/votes/{id}",
//!     &[UrlParam::new("id", 1), UrlParam::new("id", 2)],
//! );
//! assert_eq!(url, "/movies/1/ratings/2/votes/{id}");
//! ```
//!
//! Placeholders without a matching param are left in place and no error is raised.

use std::fmt::Display;

/// A named value substituted into a URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParam {
    pub name: String,
    pub value: String,
}

impl UrlParam {
    /// Numbers and strings are both accepted; the value is stored in its display form.
    pub fn new(name: impl Into<String>, value: impl Display) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

/// Applies `params` to `template` one after another.
pub fn resolve(template: &str, params: &[UrlParam]) -> String {
    params.iter().fold(template.to_owned(), |url, param| {
        url.replacen(&format!("{{{}}}", param.name), &param.value, 1)
    })
}

/// Returns true when `url` still contains a `{name}` placeholder.
pub fn has_placeholders(url: &str) -> bool {
    let mut rest = url;
    while let Some(open) = rest.find('{') {
        rest = &rest[open + 1..];
        match rest.find(['{', '}']) {
            Some(close) if rest.as_bytes()[close] == b'}' && close > 0 => return true,
            Some(close) => rest = &rest[close..],
            None => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_names_consume_occurrences_left_to_right() {
        let url = resolve(
            "/movies/{id}/ratings/{id}/votes/{id}",
            &[UrlParam::new("id", 1), UrlParam::new("id", 2)],
        );
        assert_eq!(url, "/movies/1/ratings/2/votes/{id}");
    }

    #[test]
    fn distinct_names_are_substituted() {
        let url = resolve(
            "/movies/{movieId}/ratings/{ratingId}",
            &[UrlParam::new("ratingId", 7), UrlParam::new("movieId", "42")],
        );
        assert_eq!(url, "/movies/42/ratings/7");
    }

    #[test]
    fn unknown_params_and_missing_values_are_ignored() {
        let url = resolve("/directors/{id}", &[UrlParam::new("name", "x")]);
        assert_eq!(url, "/directors/{id}");
        assert_eq!(resolve("/directors", &[]), "/directors");
    }

    #[test]
    fn substitution_is_not_atomic() {
        // The first value introduces a placeholder the second param then fills.
        let url = resolve(
            "/a/{first}",
            &[UrlParam::new("first", "{second}"), UrlParam::new("second", 9)],
        );
        assert_eq!(url, "/a/9");
    }

    #[test]
    fn detects_unresolved_placeholders() {
        assert!(has_placeholders("/movies/{id}"));
        assert!(has_placeholders("/a/{ {b}"));
        assert!(!has_placeholders("/movies/1"));
        assert!(!has_placeholders("/movies/{}"));
        assert!(!has_placeholders("/movies/{open"));
    }
}

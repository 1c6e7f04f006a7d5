use druglikenz::core::rules::RuleId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),

    #[error("Invalid {kind} value for {key}: {value}")]
    InvalidValue {
        kind: &'static str,
        key: String,
        value: String,
    },

    #[error("Page {page} does not exist. The screening produced {total} page(s).")]
    PageOutOfRange { page: usize, total: usize },

    #[error("{0}")]
    UnknownRule(String),
}

/// Splits `KEY=VALUE` at the first `=`. The key must be non-empty.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidKeyValue(pair.to_string())),
    }
}

pub fn parse_rule(raw: &str) -> Result<RuleId, ParseError> {
    raw.parse::<RuleId>()
        .map_err(|e| ParseError::UnknownRule(e.to_string()))
}

pub fn parse_bool(key: &str, value: &str) -> Result<bool, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ParseError::InvalidValue {
            kind: "boolean",
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

pub fn parse_integer<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        kind: "integer",
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Zero-based page indices to print. `page` is one-based; with neither option only the
/// first page is shown.
pub fn select_pages(
    page: Option<usize>,
    all_pages: bool,
    total: usize,
) -> Result<Vec<usize>, ParseError> {
    if all_pages {
        return Ok((0..total).collect());
    }
    match page {
        Some(n) if n == 0 || n > total => Err(ParseError::PageOutOfRange { page: n, total }),
        Some(n) => Ok(vec![n - 1]),
        None if total == 0 => Ok(Vec::new()),
        None => Ok(vec![0]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_pairs_split_on_first_equals() {
        assert_eq!(
            parse_key_value("screening.rule=ro3"),
            Ok(("screening.rule", "ro3"))
        );
        assert_eq!(
            parse_key_value("resolver.base-url=http://host/a=b"),
            Ok(("resolver.base-url", "http://host/a=b"))
        );
        assert_eq!(
            parse_key_value("no-equals"),
            Err(ParseError::InvalidKeyValue("no-equals".to_string()))
        );
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn invalid_pair_message_names_the_expected_format() {
        let err = parse_key_value("chunk").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid --set format: 'chunk'. Expected KEY=VALUE."
        );
    }

    #[test]
    fn rules_accept_aliases() {
        assert_eq!(parse_rule("ro3"), Ok(RuleId::Congreve));
        assert!(matches!(parse_rule("ghose"), Err(ParseError::UnknownRule(_))));
    }

    #[test]
    fn booleans_and_integers() {
        assert_eq!(parse_bool("resolver.enabled", "Yes"), Ok(true));
        assert_eq!(parse_bool("resolver.enabled", "off"), Ok(false));
        assert!(parse_bool("resolver.enabled", "maybe").is_err());
        assert_eq!(parse_integer::<usize>("screening.chunk-size", "12"), Ok(12));
        assert!(parse_integer::<usize>("screening.chunk-size", "-1").is_err());
    }

    #[test]
    fn page_selection() {
        assert_eq!(select_pages(None, false, 3), Ok(vec![0]));
        assert_eq!(select_pages(Some(2), false, 3), Ok(vec![1]));
        assert_eq!(select_pages(None, true, 3), Ok(vec![0, 1, 2]));
        assert_eq!(
            select_pages(Some(4), false, 3),
            Err(ParseError::PageOutOfRange { page: 4, total: 3 })
        );
        assert!(select_pages(Some(0), false, 3).is_err());
        assert_eq!(select_pages(None, false, 0), Ok(Vec::new()));
    }
}

use serde::{Deserialize, Deserializer};

// `?page=abc` is treated like a missing page rather than a rejected request,
// while a number too large for i64 saturates so it still lands past the end
pub fn deserialize_lenient_page<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| parse_saturating(v.trim())))
}

fn parse_saturating(value: &str) -> Option<i64> {
    if let Ok(page) = value.parse::<i64>() {
        return Some(page);
    }
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Query {
        #[serde(default, deserialize_with = "deserialize_lenient_page")]
        page: Option<i64>,
    }

    fn parse(json: &str) -> Option<i64> {
        serde_json::from_str::<Query>(json).unwrap().page
    }

    #[test]
    fn numeric_page_is_parsed() {
        assert_eq!(parse(r#"{"page": "3"}"#), Some(3));
        assert_eq!(parse(r#"{"page": " 2 "}"#), Some(2));
        assert_eq!(parse(r#"{"page": "-1"}"#), Some(-1));
    }

    #[test]
    fn overflowing_page_saturates() {
        assert_eq!(parse(r#"{"page": "99999999999999999999"}"#), Some(i64::MAX));
        assert_eq!(parse(r#"{"page": "-99999999999999999999"}"#), Some(i64::MIN));
        assert_eq!(parse(r#"{"page": "9999999999999999999x"}"#), None);
    }

    #[test]
    fn garbage_or_missing_page_is_none() {
        assert_eq!(parse(r#"{"page": "abc"}"#), None);
        assert_eq!(parse(r#"{"page": ""}"#), None);
        assert_eq!(parse(r#"{"page": "-"}"#), None);
        assert_eq!(parse("{}"), None);
    }
}

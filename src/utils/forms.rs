//! Raw urlencoded form access for fields that may repeat.

use serde::Deserialize;

/// Every `name=value` pair of an urlencoded body, in submission order.
///
/// `axum::Form` into a struct keeps only one value per key; checkbox groups
/// need all of them.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// First value submitted for `name`, or an empty string.
    pub fn value(&self, name: &str) -> String {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }

    /// Every non-empty value submitted for `name`.
    pub fn values(&self, name: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(key, value)| key == name && !value.is_empty())
            .map(|(_, value)| value.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn repeated_keys_are_all_kept() {
        let form = fields(&[("genre", "a"), ("title", "T"), ("genre", "b"), ("genre", "")]);
        assert_eq!(form.values("genre"), vec!["a", "b"]);
        assert_eq!(form.value("title"), "T");
    }

    #[test]
    fn missing_keys_are_empty() {
        let form = fields(&[]);
        assert_eq!(form.value("title"), "");
        assert!(form.values("genre").is_empty());
    }
}

//! Postal code (CEP) format validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

static CEP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{5}-?[0-9]{3}$").expect("static CEP pattern is valid")
});

/// Body of `POST /weather` on both services.
///
/// A missing or `null` `cep` decodes as an empty string, which then fails
/// validation. `CEP` and `Cep` are accepted as the key too.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PostalCodeRequest {
    #[serde(default, alias = "CEP", alias = "Cep", deserialize_with = "null_as_empty")]
    pub cep: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// True when `raw` is eight digits with an optional hyphen after the fifth.
pub fn is_valid(raw: &str) -> bool {
    CEP_PATTERN.is_match(raw)
}

/// A postal code that passed format validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Validate `raw`, keeping it exactly as submitted.
    pub fn parse(raw: &str) -> Option<Self> {
        is_valid(raw).then(|| Self(raw.to_string()))
    }

    /// The code as submitted, hyphen included if there was one.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The eight digits, without hyphen.
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }
}

impl std::fmt::Display for PostalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

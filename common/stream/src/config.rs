use std::str::FromStr;

/// A configuration value that must be present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyString(pub String);

impl NonEmptyString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct StringIsEmptyError;

impl std::fmt::Display for StringIsEmptyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("value must not be empty")
    }
}

impl std::error::Error for StringIsEmptyError {}

impl FromStr for NonEmptyString {
    type Err = StringIsEmptyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err(StringIsEmptyError)
        } else {
            Ok(NonEmptyString(trimmed.to_owned()))
        }
    }
}

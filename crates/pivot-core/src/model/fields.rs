use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_TAG_LEN: usize = 50;

/// A field value that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} '{value}': {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl ValidationError {
    pub fn new(field: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        Self {
            field,
            value: value.into(),
            reason,
        }
    }
}

fn is_title_char(c: char) -> bool {
    c.is_alphanumeric() || c == ' ' || "-'.,&()/:#".contains(c)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == ' ' || c == '-' || c == '\''
}

/// Declares a validated text newtype with serde round-tripping through `String`.
macro_rules! text_field {
    ($(#[$meta:meta])* $name:ident, $field:literal, $check:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap `raw`. Surrounding whitespace is trimmed first.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
                let value = raw.as_ref().trim();
                let check: fn(&str) -> Result<(), &'static str> = $check;
                check(value).map_err(|reason| ValidationError::new($field, value, reason))?;
                Ok(Self(value.to_string()))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_field!(
    /// Case title: non-blank, alphanumeric with spaces and light punctuation.
    Title,
    "title",
    |s| {
        if s.is_empty() {
            return Err("must not be blank");
        }
        if s.chars().count() > MAX_TITLE_LEN {
            return Err("must be at most 200 characters");
        }
        if !s.chars().all(is_title_char) {
            return Err("must only contain alphanumeric characters, spaces and - ' . , & ( ) / : #");
        }
        Ok(())
    }
);

text_field!(
    /// Free-text case description. May be empty.
    Description,
    "description",
    |s| {
        if s.chars().any(char::is_control) {
            return Err("must not contain control characters");
        }
        Ok(())
    }
);

text_field!(
    /// Name of a case person or document.
    Name,
    "name",
    |s| {
        if s.is_empty() {
            return Err("must not be blank");
        }
        if !s.chars().all(is_name_char) {
            return Err("must only contain alphanumeric characters, spaces, - and '");
        }
        Ok(())
    }
);

text_field!(
    Phone,
    "phone",
    |s| {
        if s.len() < 3 || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err("must only contain digits and be at least 3 digits long");
        }
        Ok(())
    }
);

text_field!(
    Email,
    "email",
    |s| {
        let Some((local, domain)) = s.split_once('@') else {
            return Err("must be of the form local-part@domain");
        };
        let local_ok = !local.is_empty()
            && local
                .chars()
                .all(|c| c.is_alphanumeric() || "+_.-".contains(c))
            && !local.starts_with('.')
            && !local.ends_with('.');
        let domain_ok = domain.split('.').count() >= 2
            && domain.split('.').all(|label| {
                !label.is_empty()
                    && label.chars().all(|c| c.is_alphanumeric() || c == '-')
                    && !label.starts_with('-')
                    && !label.ends_with('-')
            });
        if local_ok && domain_ok {
            Ok(())
        } else {
            Err("must be of the form local-part@domain")
        }
    }
);

text_field!(
    Address,
    "address",
    |s| {
        if s.is_empty() {
            return Err("must not be blank");
        }
        Ok(())
    }
);

text_field!(
    /// Relative reference to a document file.
    Reference,
    "reference",
    |s| {
        if s.is_empty() {
            return Err("must not be blank");
        }
        if s.starts_with('/') || s.starts_with('\\') {
            return Err("must be a relative path");
        }
        if s.split(['/', '\\']).any(|part| part == "..") {
            return Err("must not contain '..' components");
        }
        Ok(())
    }
);

text_field!(
    Tag,
    "tag",
    |s| {
        if s.is_empty() || !s.chars().all(char::is_alphanumeric) {
            return Err("must be a single alphanumeric word");
        }
        if s.chars().count() > MAX_TAG_LEN {
            return Err("must be at most 50 characters");
        }
        Ok(())
    }
);

impl Default for Description {
    fn default() -> Self {
        Self(String::new())
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected}: '{got}'")]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

/// Investigation lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Closed,
    Cold,
}

impl Status {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Cold => "cold",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" | "open" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            "cold" => Ok(Self::Cold),
            _ => Err(ParseEnumError {
                expected: "status (active|closed|cold)",
                got: s.to_string(),
            }),
        }
    }
}

/// Whether a case shows in the default list or the archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveStatus {
    #[default]
    Default,
    Archived,
}

impl ArchiveStatus {
    #[must_use]
    pub const fn is_archived(self) -> bool {
        matches!(self, Self::Archived)
    }
}

impl fmt::Display for ArchiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::Archived => "archived",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "-",
        })
    }
}

impl FromStr for Sex {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            "-" | "u" | "unknown" => Ok(Self::Unknown),
            _ => Err(ParseEnumError {
                expected: "sex (m|f|unknown)",
                got: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_trims_and_rejects_blank() {
        assert_eq!(
            Title::new("  Theft at Library ").expect("valid").as_str(),
            "Theft at Library"
        );
        let err = Title::new("   ").expect_err("blank");
        assert_eq!(err.field, "title");
    }

    #[test]
    fn title_rejects_symbols() {
        assert!(Title::new("Robbery $$$").is_err());
        assert!(Title::new("Case #12: Dock (North)").is_ok());
    }

    #[test]
    fn phone_needs_three_digits() {
        assert!(Phone::new("12").is_err());
        assert!(Phone::new("91234567").is_ok());
        assert!(Phone::new("9123-4567").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(Email::new("amy@example.com").is_ok());
        assert!(Email::new("amy@example").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("amy@-bad.com").is_err());
    }

    #[test]
    fn reference_must_be_relative() {
        assert!(Reference::new("evidence/photo1.png").is_ok());
        assert!(Reference::new("/etc/passwd").is_err());
        assert!(Reference::new("../secret.txt").is_err());
    }

    #[test]
    fn tag_is_single_word() {
        assert!(Tag::new("urgent").is_ok());
        assert!(Tag::new("two words").is_err());
    }

    #[test]
    fn status_parses_aliases() {
        assert_eq!("OPEN".parse::<Status>(), Ok(Status::Active));
        assert_eq!("cold".parse::<Status>(), Ok(Status::Cold));
        assert!("pending".parse::<Status>().is_err());
    }

    #[test]
    fn serde_rejects_invalid_field() {
        let err = serde_json::from_str::<Title>("\"\"");
        assert!(err.is_err());
        let ok: Title = serde_json::from_str("\"Arson\"").expect("valid title");
        assert_eq!(ok.as_str(), "Arson");
    }
}

use super::fields::{Address, Email, Name, Phone, Reference, Sex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which person list of a case an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Suspect,
    Victim,
    Witness,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Suspect => "suspect",
            Self::Victim => "victim",
            Self::Witness => "witness",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suspect, victim or witness attached to a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasePerson {
    pub name: Name,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Phone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl CasePerson {
    #[must_use]
    pub const fn new(name: Name) -> Self {
        Self {
            name,
            sex: Sex::Unknown,
            phone: None,
            email: None,
            address: None,
        }
    }

    #[must_use]
    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: Phone) -> Self {
        self.phone = Some(phone);
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }
}

impl fmt::Display for CasePerson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Sex: {})", self.name, self.sex)?;
        if let Some(phone) = &self.phone {
            write!(f, " Phone: {phone}")?;
        }
        if let Some(email) = &self.email {
            write!(f, " Email: {email}")?;
        }
        if let Some(address) = &self.address {
            write!(f, " Address: {address}")?;
        }
        Ok(())
    }
}

/// A document attached to a case: a display name and a file reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: Name,
    pub reference: Reference,
}

impl Document {
    #[must_use]
    pub const fn new(name: Name, reference: Reference) -> Self {
        Self { name, reference }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Reference: {})", self.name, self.reference)
    }
}

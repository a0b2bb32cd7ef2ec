//! Partial-update descriptors for `edit` commands.
//!
//! Each descriptor holds only the fields the user supplied. `apply` builds a
//! new value from an existing one; the existing value is never touched.

use super::case::Case;
use super::fields::{Address, Description, Email, Name, Phone, Reference, Sex, Status, Title};
use super::person::{CasePerson, Document};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseEdit {
    pub title: Option<Title>,
    pub description: Option<Description>,
    pub status: Option<Status>,
}

impl CaseEdit {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    #[must_use]
    pub fn apply(&self, case: &Case) -> Case {
        let mut updated = case.clone();
        if let Some(title) = &self.title {
            updated = updated.with_title(title.clone());
        }
        if let Some(description) = &self.description {
            updated = updated.with_description(description.clone());
        }
        if let Some(status) = self.status {
            updated = updated.with_status(status);
        }
        updated
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonEdit {
    pub name: Option<Name>,
    pub sex: Option<Sex>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub address: Option<Address>,
}

impl PersonEdit {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sex.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
    }

    #[must_use]
    pub fn apply(&self, person: &CasePerson) -> CasePerson {
        CasePerson {
            name: self.name.clone().unwrap_or_else(|| person.name.clone()),
            sex: self.sex.unwrap_or(person.sex),
            phone: self.phone.clone().or_else(|| person.phone.clone()),
            email: self.email.clone().or_else(|| person.email.clone()),
            address: self.address.clone().or_else(|| person.address.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentEdit {
    pub name: Option<Name>,
    pub reference: Option<Reference>,
}

impl DocumentEdit {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.reference.is_none()
    }

    #[must_use]
    pub fn apply(&self, document: &Document) -> Document {
        Document {
            name: self.name.clone().unwrap_or_else(|| document.name.clone()),
            reference: self
                .reference
                .clone()
                .unwrap_or_else(|| document.reference.clone()),
        }
    }
}

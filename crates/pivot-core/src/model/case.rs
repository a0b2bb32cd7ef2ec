use super::fields::{ArchiveStatus, Description, Status, Tag, Title};
use super::person::{CasePerson, Document, Role};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An investigation case and everything attached to it.
///
/// Cases are values. There is no `&mut` access to the nested collections;
/// every change goes through one of the `with_*` methods, which consume the
/// receiver and return the replacement. Callers that need to keep the
/// original clone it first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    title: Title,
    #[serde(default)]
    description: Description,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    archive_status: ArchiveStatus,
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    suspects: Vec<CasePerson>,
    #[serde(default)]
    victims: Vec<CasePerson>,
    #[serde(default)]
    witnesses: Vec<CasePerson>,
    #[serde(default)]
    tags: BTreeSet<Tag>,
}

impl Case {
    /// A fresh active, unarchived case with no attachments.
    #[must_use]
    pub fn new(title: Title) -> Self {
        Self {
            title,
            description: Description::default(),
            status: Status::Active,
            archive_status: ArchiveStatus::Default,
            documents: Vec::new(),
            suspects: Vec::new(),
            victims: Vec::new(),
            witnesses: Vec::new(),
            tags: BTreeSet::new(),
        }
    }

    #[must_use]
    pub const fn title(&self) -> &Title {
        &self.title
    }

    #[must_use]
    pub const fn description(&self) -> &Description {
        &self.description
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub const fn archive_status(&self) -> ArchiveStatus {
        self.archive_status
    }

    #[must_use]
    pub const fn is_archived(&self) -> bool {
        self.archive_status.is_archived()
    }

    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    #[must_use]
    pub fn suspects(&self) -> &[CasePerson] {
        &self.suspects
    }

    #[must_use]
    pub fn victims(&self) -> &[CasePerson] {
        &self.victims
    }

    #[must_use]
    pub fn witnesses(&self) -> &[CasePerson] {
        &self.witnesses
    }

    #[must_use]
    pub fn persons(&self, role: Role) -> &[CasePerson] {
        match role {
            Role::Suspect => &self.suspects,
            Role::Victim => &self.victims,
            Role::Witness => &self.witnesses,
        }
    }

    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    #[must_use]
    pub fn with_title(mut self, title: Title) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: Description) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_archive_status(mut self, archive_status: ArchiveStatus) -> Self {
        self.archive_status = archive_status;
        self
    }

    #[must_use]
    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = documents;
        self
    }

    #[must_use]
    pub fn with_persons(mut self, role: Role, persons: Vec<CasePerson>) -> Self {
        match role {
            Role::Suspect => self.suspects = persons,
            Role::Victim => self.victims = persons,
            Role::Witness => self.witnesses = persons,
        }
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: BTreeSet<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Weak identity used for duplicate detection.
    ///
    /// Two cases are the same case when their titles match (ignoring case)
    /// and at least one other identity field, status or description, matches.
    #[must_use]
    pub fn is_same_case(&self, other: &Self) -> bool {
        eq_ignore_case(self.title.as_str(), other.title.as_str())
            && (self.status == other.status || self.description == other.description)
    }

    /// True when any keyword equals a whole word of this case's searchable text.
    ///
    /// Matching is case-insensitive and covers the title, description, status,
    /// tags, and the names of every attached person and document.
    #[must_use]
    pub fn matches_keywords<S: AsRef<str>>(&self, keywords: &[S]) -> bool {
        let status = self.status.to_string();
        let mut haystacks: Vec<&str> = vec![
            self.title.as_str(),
            self.description.as_str(),
            status.as_str(),
        ];
        haystacks.extend(self.tags.iter().map(Tag::as_str));
        haystacks.extend(self.documents.iter().map(|d| d.name.as_str()));
        haystacks.extend(
            self.suspects
                .iter()
                .chain(&self.victims)
                .chain(&self.witnesses)
                .map(|p| p.name.as_str()),
        );

        keywords.iter().any(|keyword| {
            let keyword = keyword.as_ref();
            haystacks
                .iter()
                .flat_map(|text| text.split_whitespace())
                .any(|word| eq_ignore_case(word, keyword))
        })
    }
}

/// Unicode case-insensitive equality; titles and names are not ASCII-only.
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Status: {})", self.title, self.status)?;
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(Tag::as_str).collect();
            write!(f, " [{}]", tags.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fields::Name;

    fn case(title: &str) -> Case {
        Case::new(Title::new(title).expect("valid title"))
    }

    #[test]
    fn same_title_and_status_is_same_case() {
        let a = case("Theft at Library");
        let b = case("theft at library")
            .with_description(Description::new("different").expect("valid"));
        assert!(a.is_same_case(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn title_identity_folds_non_ascii_letters() {
        assert!(case("Ärson in Malmö").is_same_case(&case("ärson IN MALMÖ")));
        assert!(!case("Ärson").is_same_case(&case("Arson")));
        assert!(case("Brand in Zürich").matches_keywords(&["ZÜRICH"]));
    }

    #[test]
    fn same_title_different_status_and_description_is_distinct() {
        let a = case("Theft at Library");
        let b = case("Theft at Library")
            .with_status(Status::Closed)
            .with_description(Description::new("second").expect("valid"));
        assert!(!a.is_same_case(&b));
    }

    #[test]
    fn with_methods_leave_original_untouched() {
        let original = case("Arson");
        let suspect = CasePerson::new(Name::new("John").expect("valid"));
        let updated = original
            .clone()
            .with_persons(Role::Suspect, vec![suspect.clone()]);
        assert!(original.suspects().is_empty());
        assert_eq!(updated.suspects(), &[suspect]);
        assert_eq!(updated.persons(Role::Victim), original.victims());
    }

    #[test]
    fn keyword_matching_is_whole_word() {
        let c = case("Theft at Library")
            .with_persons(
                Role::Witness,
                vec![CasePerson::new(Name::new("Alice Tan").expect("valid"))],
            )
            .with_tags(BTreeSet::from([Tag::new("urgent").expect("valid")]));
        assert!(c.matches_keywords(&["library"]));
        assert!(c.matches_keywords(&["TAN"]));
        assert!(c.matches_keywords(&["urgent"]));
        assert!(c.matches_keywords(&["active"]));
        assert!(!c.matches_keywords(&["lib"]));
    }

    #[test]
    fn deserializes_with_defaults() {
        let c: Case = serde_json::from_str(r#"{"title":"Burglary"}"#).expect("parse");
        assert_eq!(c, case("Burglary"));
    }
}

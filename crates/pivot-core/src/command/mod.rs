//! Command layer.
//!
//! [`Command`] is a closed set of variants, one per user action. Each variant
//! is executed by a function in one of the submodules. Mutating commands
//! follow the same protocol:
//!
//! 1. check the navigation guard,
//! 2. resolve indices against the *current* filtered view,
//! 3. build the replacement case as a new value,
//! 4. write it into the repository,
//! 5. re-synchronise navigation with the new view,
//! 6. commit a history snapshot,
//! 7. return the user-facing message.
//!
//! Steps 1–3 only read state, so any error leaves the session untouched.

mod case;
mod entity;
mod view;

use crate::error::CommandError;
use crate::model::{Case, CaseEdit, CasePerson, Document, DocumentEdit, PersonEdit, Role, Tag};
use crate::nav::{Page, Section};
use crate::session::Session;
use serde::Serialize;
use std::fmt;

/// A zero-based position in a displayed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index(usize);

impl Index {
    #[must_use]
    pub const fn from_zero_based(index: usize) -> Self {
        Self(index)
    }

    /// Convert a one-based index as typed by the user. Zero is rejected.
    #[must_use]
    pub const fn from_one_based(index: usize) -> Option<Self> {
        match index.checked_sub(1) {
            Some(zero_based) => Some(Self(zero_based)),
            None => None,
        }
    }

    #[must_use]
    pub const fn zero_based(self) -> usize {
        self.0
    }

    #[must_use]
    pub const fn one_based(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.one_based())
    }
}

/// Every action the engine can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddCase(Case),
    DeleteCase { index: Index },
    /// Edit the case at `index` on the list page, or the open case when `index` is `None`.
    EditCase { index: Option<Index>, edit: CaseEdit },
    ArchiveCase { index: Index },
    UnarchiveCase { index: Index },
    ListCases { archived: bool },
    FindCases { keywords: Vec<String> },
    OpenCase { index: Index },
    ReturnToList,
    ViewSection(Section),
    AddTags { tags: Vec<Tag> },
    DeleteTag { tag: Tag },
    AddPerson { role: Role, person: CasePerson },
    DeletePerson { role: Role, index: Index },
    EditPerson { role: Role, index: Index, edit: PersonEdit },
    AddDocument(Document),
    DeleteDocument { index: Index },
    EditDocument { index: Index, edit: DocumentEdit },
    Undo,
    Redo,
}

impl Command {
    /// Short stable name used in logs.
    #[must_use]
    pub const fn word(&self) -> &'static str {
        match self {
            Self::AddCase(_) => "add-case",
            Self::DeleteCase { .. } => "delete-case",
            Self::EditCase { .. } => "edit-case",
            Self::ArchiveCase { .. } => "archive-case",
            Self::UnarchiveCase { .. } => "unarchive-case",
            Self::ListCases { .. } => "list-cases",
            Self::FindCases { .. } => "find-cases",
            Self::OpenCase { .. } => "open-case",
            Self::ReturnToList => "return",
            Self::ViewSection(_) => "view-section",
            Self::AddTags { .. } => "add-tags",
            Self::DeleteTag { .. } => "delete-tag",
            Self::AddPerson { .. } => "add-person",
            Self::DeletePerson { .. } => "delete-person",
            Self::EditPerson { .. } => "edit-person",
            Self::AddDocument(_) => "add-document",
            Self::DeleteDocument { .. } => "delete-document",
            Self::EditDocument { .. } => "edit-document",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    /// True for commands that commit a history entry when they succeed.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::ListCases { .. }
                | Self::FindCases { .. }
                | Self::OpenCase { .. }
                | Self::ReturnToList
                | Self::ViewSection(_)
        )
    }

    pub(crate) fn execute(&self, session: &mut Session) -> Result<CommandOutcome, CommandError> {
        match self {
            Self::AddCase(new_case) => case::add(session, new_case),
            Self::DeleteCase { index } => case::delete(session, *index),
            Self::EditCase { index, edit } => case::edit(session, *index, edit),
            Self::ArchiveCase { index } => case::archive(session, *index),
            Self::UnarchiveCase { index } => case::unarchive(session, *index),
            Self::AddTags { tags } => case::add_tags(session, tags),
            Self::DeleteTag { tag } => case::delete_tag(session, tag),
            Self::ListCases { archived } => view::list(session, *archived),
            Self::FindCases { keywords } => view::find(session, keywords),
            Self::OpenCase { index } => view::open(session, *index),
            Self::ReturnToList => view::return_to_list(session),
            Self::ViewSection(section) => view::view_section(session, *section),
            Self::Undo => view::undo(session),
            Self::Redo => view::redo(session),
            Self::AddPerson { role, person } => entity::add_person(session, *role, person),
            Self::DeletePerson { role, index } => entity::delete_person(session, *role, *index),
            Self::EditPerson { role, index, edit } => {
                entity::edit_person(session, *role, *index, edit)
            }
            Self::AddDocument(document) => entity::add_document(session, document),
            Self::DeleteDocument { index } => entity::delete_document(session, *index),
            Self::EditDocument { index, edit } => entity::edit_document(session, *index, edit),
        }
    }
}

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    /// User-facing feedback.
    pub message: String,
    /// True when the repository changed (a history entry was committed or restored).
    pub mutated: bool,
    /// Navigation state after the command.
    pub page: Page,
}

impl CommandOutcome {
    pub(crate) const fn mutated(message: String, page: Page) -> Self {
        Self {
            message,
            mutated: true,
            page,
        }
    }

    pub(crate) const fn viewed(message: String, page: Page) -> Self {
        Self {
            message,
            mutated: false,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_zero_is_rejected() {
        assert_eq!(Index::from_one_based(0), None);
        assert_eq!(
            Index::from_one_based(3).map(Index::zero_based),
            Some(2)
        );
    }

    #[test]
    fn index_displays_one_based() {
        assert_eq!(Index::from_zero_based(0).to_string(), "1");
    }

    #[test]
    fn navigation_commands_are_not_mutating() {
        assert!(!Command::ReturnToList.is_mutating());
        assert!(!Command::ListCases { archived: true }.is_mutating());
        assert!(Command::Undo.is_mutating());
        assert!(Command::DeleteCase {
            index: Index::from_zero_based(0)
        }
        .is_mutating());
    }
}

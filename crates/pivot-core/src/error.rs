use crate::model::ValidationError;
use crate::nav::{Page, Section};
use std::fmt;

/// Machine-readable error codes surfaced next to every user-facing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidField,
    InvalidCommand,
    InvalidIndex,
    InvalidSubIndex,
    WrongPage,
    DuplicateCase,
    CaseNotFound,
    EntityNotFound,
    DuplicateEntity,
    NothingToEdit,
    NoUndoableState,
    NoRedoableState,
    StorageIo,
    StorageLock,
    CorruptData,
    ConfigParseError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidField => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidCommand => "E1003",
            Self::InvalidIndex => "E2001",
            Self::InvalidSubIndex => "E2002",
            Self::WrongPage => "E2003",
            Self::DuplicateCase => "E2004",
            Self::CaseNotFound => "E2005",
            Self::EntityNotFound => "E2006",
            Self::DuplicateEntity => "E2007",
            Self::NothingToEdit => "E2008",
            Self::NoUndoableState => "E3001",
            Self::NoRedoableState => "E3002",
            Self::StorageIo => "E5001",
            Self::StorageLock => "E5002",
            Self::CorruptData => "E5003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidField => "Invalid field value",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidCommand => "Unrecognised command",
            Self::InvalidIndex => "Case index out of range",
            Self::InvalidSubIndex => "Entry index out of range",
            Self::WrongPage => "Command not available on this page",
            Self::DuplicateCase => "Case already exists",
            Self::CaseNotFound => "Case not found",
            Self::EntityNotFound => "Entry not found",
            Self::DuplicateEntity => "Entry already exists",
            Self::NothingToEdit => "Nothing to edit",
            Self::NoUndoableState => "Nothing to undo",
            Self::NoRedoableState => "Nothing to redo",
            Self::StorageIo => "Data file I/O failed",
            Self::StorageLock => "Data file is locked",
            Self::CorruptData => "Data file is corrupt",
        }
    }

    /// Optional remediation hint shown under the error.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidField => None,
            Self::ConfigParseError => Some("Fix syntax in .pivot/config.toml and retry."),
            Self::InvalidCommand => Some("Type `help` to see the command formats."),
            Self::InvalidIndex => Some("Use an index shown by `list case` or `find case`."),
            Self::InvalidSubIndex => Some("Use an index shown in the open case's section."),
            Self::WrongPage => {
                Some("Use `open case INDEX`, `view SECTION` or `return` to change page.")
            }
            Self::DuplicateCase => Some("Change the title, status or description."),
            Self::CaseNotFound | Self::EntityNotFound => {
                Some("The list changed; list again and retry with a fresh index.")
            }
            Self::DuplicateEntity => Some("Change at least one field of the entry."),
            Self::NothingToEdit => Some("Provide at least one field to change."),
            Self::NoUndoableState | Self::NoRedoableState => None,
            Self::StorageIo => Some("Check disk space and write permissions."),
            Self::StorageLock => Some("Retry after the other `pivot` process releases its lock."),
            Self::CorruptData => {
                Some("Fix or move the data file aside; pivot starts empty without it.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Why a command could not be executed.
///
/// Every variant is raised before any state changes, so a failed command
/// leaves the session exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidField(#[from] ValidationError),

    #[error("case index {} is out of range (list has {len} case(s))", .index + 1)]
    InvalidIndex { index: usize, len: usize },

    #[error("{section} index {} is out of range (case has {len})", .index + 1)]
    InvalidSubIndex {
        section: Section,
        index: usize,
        len: usize,
    },

    #[error("this command needs {required}, but the current page is {actual}")]
    WrongPage {
        required: &'static str,
        actual: Page,
    },

    #[error("a case with this title and status or description already exists")]
    DuplicateCase,

    #[error("the referenced case no longer exists")]
    CaseNotFound,

    #[error("this command needs {required}; use `list case` or `list archive` first")]
    WrongView { required: &'static str },

    #[error("the referenced {0} does not exist in the case")]
    EntityNotFound(&'static str),

    #[error("this {0} already exists in the case")]
    DuplicateEntity(&'static str),

    #[error("at least one field to edit must be provided")]
    NothingToEdit,

    #[error("there is no command to undo")]
    NoUndoableState,

    #[error("there is no command to redo")]
    NoRedoableState,
}

impl CommandError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidField(_) => ErrorCode::InvalidField,
            Self::InvalidIndex { .. } => ErrorCode::InvalidIndex,
            Self::InvalidSubIndex { .. } => ErrorCode::InvalidSubIndex,
            Self::WrongPage { .. } | Self::WrongView { .. } => ErrorCode::WrongPage,
            Self::DuplicateCase => ErrorCode::DuplicateCase,
            Self::CaseNotFound => ErrorCode::CaseNotFound,
            Self::EntityNotFound(_) => ErrorCode::EntityNotFound,
            Self::DuplicateEntity(_) => ErrorCode::DuplicateEntity,
            Self::NothingToEdit => ErrorCode::NothingToEdit,
            Self::NoUndoableState => ErrorCode::NoUndoableState,
            Self::NoRedoableState => ErrorCode::NoRedoableState,
        }
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::InvalidField,
            ErrorCode::InvalidCommand,
            ErrorCode::InvalidIndex,
            ErrorCode::InvalidSubIndex,
            ErrorCode::WrongPage,
            ErrorCode::DuplicateCase,
            ErrorCode::CaseNotFound,
            ErrorCode::EntityNotFound,
            ErrorCode::DuplicateEntity,
            ErrorCode::NothingToEdit,
            ErrorCode::NoUndoableState,
            ErrorCode::NoRedoableState,
            ErrorCode::StorageIo,
            ErrorCode::StorageLock,
            ErrorCode::CorruptData,
            ErrorCode::ConfigParseError,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::WrongPage.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn index_errors_report_one_based_positions() {
        let err = CommandError::InvalidIndex { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "case index 5 is out of range (list has 2 case(s))"
        );
        let err = CommandError::InvalidSubIndex {
            section: Section::Suspects,
            index: 0,
            len: 0,
        };
        assert_eq!(
            err.to_string(),
            "suspects index 1 is out of range (case has 0)"
        );
    }

    #[test]
    fn wrong_page_names_both_pages() {
        let err = CommandError::WrongPage {
            required: "the case list",
            actual: Page::CaseDetail {
                case_index: 1,
                section: None,
            },
        };
        assert_eq!(err.code(), ErrorCode::WrongPage);
        assert_eq!(
            err.to_string(),
            "this command needs the case list, but the current page is case 2"
        );
    }
}

//! Navigation state guard.
//!
//! Tracks which page the user is on and gates which commands are legal
//! there. The guard stores only indices into the repository's filtered view,
//! never case references, so it cannot dangle after a mutation. Callers must
//! re-synchronise it (see [`NavigationGuard::relocate`] and
//! [`NavigationGuard::invalidate`]) whenever the view shifts.

use crate::error::CommandError;
use crate::model::Role;
use serde::Serialize;
use std::fmt;

/// A sub-entity list shown on a case detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Suspects,
    Victims,
    Witnesses,
    Documents,
}

impl Section {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Suspects => "suspects",
            Self::Victims => "victims",
            Self::Witnesses => "witnesses",
            Self::Documents => "documents",
        }
    }

    /// Requirement text used in `WrongPage` errors.
    const fn requirement(self) -> &'static str {
        match self {
            Self::Suspects => "the suspects section of a case",
            Self::Victims => "the victims section of a case",
            Self::Witnesses => "the witnesses section of a case",
            Self::Documents => "the documents section of a case",
        }
    }
}

impl From<Role> for Section {
    fn from(role: Role) -> Self {
        match role {
            Role::Suspect => Self::Suspects,
            Role::Victim => Self::Victims,
            Role::Witness => Self::Witnesses,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The page currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    #[default]
    List,
    CaseDetail {
        case_index: usize,
        section: Option<Section>,
    },
}

impl Page {
    #[must_use]
    pub const fn case_index(self) -> Option<usize> {
        match self {
            Self::List => None,
            Self::CaseDetail { case_index, .. } => Some(case_index),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("the case list"),
            Self::CaseDetail {
                case_index,
                section: None,
            } => write!(f, "case {}", case_index + 1),
            Self::CaseDetail {
                case_index,
                section: Some(section),
            } => write!(f, "the {section} section of case {}", case_index + 1),
        }
    }
}

type PageObserver = Box<dyn FnMut(Page)>;

/// State machine over [`Page`].
#[derive(Default)]
pub struct NavigationGuard {
    page: Page,
    observers: Vec<PageObserver>,
}

impl fmt::Debug for NavigationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationGuard")
            .field("page", &self.page)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl NavigationGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn page(&self) -> Page {
        self.page
    }

    /// Register a callback invoked with the new page after every change.
    pub fn subscribe(&mut self, observer: impl FnMut(Page) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn set(&mut self, page: Page) {
        if self.page == page {
            return;
        }
        tracing::debug!(from = %self.page, to = %page, "navigation changed");
        self.page = page;
        for observer in &mut self.observers {
            observer(page);
        }
    }

    /// Show the detail page of the case at `case_index` in a view of `view_len` cases.
    ///
    /// # Errors
    ///
    /// [`CommandError::InvalidIndex`] when `case_index >= view_len`.
    pub fn open(&mut self, case_index: usize, view_len: usize) -> Result<(), CommandError> {
        if case_index >= view_len {
            return Err(CommandError::InvalidIndex {
                index: case_index,
                len: view_len,
            });
        }
        self.set(Page::CaseDetail {
            case_index,
            section: None,
        });
        Ok(())
    }

    pub fn close(&mut self) {
        self.set(Page::List);
    }

    /// Drop the selection; used when the selected case left the view.
    pub fn invalidate(&mut self) {
        self.set(Page::List);
    }

    /// Point the detail page at the selected case's new position in the view.
    ///
    /// No-op on the list page.
    pub fn relocate(&mut self, new_index: usize) {
        if let Page::CaseDetail { section, .. } = self.page {
            self.set(Page::CaseDetail {
                case_index: new_index,
                section,
            });
        }
    }

    /// Switch the active section of the open case.
    ///
    /// # Errors
    ///
    /// [`CommandError::WrongPage`] when no case is open.
    pub fn view_section(&mut self, section: Section) -> Result<(), CommandError> {
        let case_index = self.require_case()?;
        self.set(Page::CaseDetail {
            case_index,
            section: Some(section),
        });
        Ok(())
    }

    /// Switch the active section if a case is still open; no-op on the list page.
    pub fn focus_section(&mut self, section: Section) {
        if let Page::CaseDetail { case_index, .. } = self.page {
            self.set(Page::CaseDetail {
                case_index,
                section: Some(section),
            });
        }
    }

    /// # Errors
    ///
    /// [`CommandError::WrongPage`] unless on the case list.
    pub fn require_list(&self) -> Result<(), CommandError> {
        match self.page {
            Page::List => Ok(()),
            Page::CaseDetail { .. } => Err(self.wrong_page("the case list")),
        }
    }

    /// Returns the open case's index.
    ///
    /// # Errors
    ///
    /// [`CommandError::WrongPage`] unless a case is open.
    pub fn require_case(&self) -> Result<usize, CommandError> {
        self.page
            .case_index()
            .ok_or_else(|| self.wrong_page("an open case"))
    }

    /// Returns the open case's index when `section` is the active section.
    ///
    /// # Errors
    ///
    /// [`CommandError::WrongPage`] when no case is open or another section is active.
    pub fn require_section(&self, section: Section) -> Result<usize, CommandError> {
        match self.page {
            Page::CaseDetail {
                case_index,
                section: Some(active),
            } if active == section => Ok(case_index),
            _ => Err(self.wrong_page(section.requirement())),
        }
    }

    const fn wrong_page(&self, required: &'static str) -> CommandError {
        CommandError::WrongPage {
            required,
            actual: self.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn starts_on_list() {
        let guard = NavigationGuard::new();
        assert_eq!(guard.page(), Page::List);
        assert!(guard.require_list().is_ok());
        assert!(guard.require_case().is_err());
    }

    #[test]
    fn open_rejects_out_of_bounds() {
        let mut guard = NavigationGuard::new();
        let err = guard.open(1, 1).expect_err("index 1 of 1 is out of range");
        assert_eq!(err, CommandError::InvalidIndex { index: 1, len: 1 });
        assert_eq!(guard.page(), Page::List);
    }

    #[test]
    fn section_required_until_viewed() {
        let mut guard = NavigationGuard::new();
        guard.open(0, 1).expect("open");
        assert!(matches!(
            guard.require_section(Section::Suspects),
            Err(CommandError::WrongPage { .. })
        ));
        guard.view_section(Section::Suspects).expect("view");
        assert_eq!(guard.require_section(Section::Suspects), Ok(0));
        assert!(guard.require_section(Section::Victims).is_err());
    }

    #[test]
    fn view_section_needs_open_case() {
        let mut guard = NavigationGuard::new();
        assert!(guard.view_section(Section::Documents).is_err());
    }

    #[test]
    fn relocate_keeps_section() {
        let mut guard = NavigationGuard::new();
        guard.open(3, 4).expect("open");
        guard.view_section(Section::Witnesses).expect("view");
        guard.relocate(2);
        assert_eq!(
            guard.page(),
            Page::CaseDetail {
                case_index: 2,
                section: Some(Section::Witnesses)
            }
        );
    }

    #[test]
    fn relocate_on_list_is_noop() {
        let mut guard = NavigationGuard::new();
        guard.relocate(5);
        assert_eq!(guard.page(), Page::List);
    }

    #[test]
    fn observers_see_changes_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut guard = NavigationGuard::new();
        guard.subscribe(move |page| sink.borrow_mut().push(page));

        guard.close();
        guard.open(0, 2).expect("open");
        guard.invalidate();

        assert_eq!(
            *seen.borrow(),
            vec![
                Page::CaseDetail {
                    case_index: 0,
                    section: None
                },
                Page::List
            ]
        );
    }
}

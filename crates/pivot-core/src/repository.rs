//! Authoritative case collection.
//!
//! The repository owns the ordered case sequence and the active list filter.
//! The filtered view is derived on every call from the sequence and the
//! filter; nothing is cached, so an index resolved against
//! [`Repository::filtered_cases`] always refers to the current state.

use crate::model::Case;
use std::fmt;

/// Errors raised by repository mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("a case with this title and status or description already exists")]
    DuplicateCase,
    #[error("the referenced case does not exist")]
    CaseNotFound,
}

impl From<RepositoryError> for crate::error::CommandError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateCase => Self::DuplicateCase,
            RepositoryError::CaseNotFound => Self::CaseNotFound,
        }
    }
}

/// Which cases the list view shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CaseFilter {
    /// Every case that is not archived.
    #[default]
    Default,
    /// Archived cases only.
    Archived,
    /// Cases matching any keyword, within the default or archived list.
    Keywords { keywords: Vec<String>, archived: bool },
}

impl CaseFilter {
    #[must_use]
    pub fn matches(&self, case: &Case) -> bool {
        match self {
            Self::Default => !case.is_archived(),
            Self::Archived => case.is_archived(),
            Self::Keywords { keywords, archived } => {
                case.is_archived() == *archived && case.matches_keywords(keywords)
            }
        }
    }

    /// True when the filter draws from the archive.
    #[must_use]
    pub const fn is_archive_view(&self) -> bool {
        match self {
            Self::Default => false,
            Self::Archived => true,
            Self::Keywords { archived, .. } => *archived,
        }
    }
}

/// Change notification delivered to repository observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryEvent {
    Added { index: usize },
    Removed { index: usize },
    Replaced { index: usize },
    Reset { len: usize },
    FilterChanged,
}

type Observer = Box<dyn FnMut(&RepositoryEvent)>;

#[derive(Default)]
pub struct Repository {
    cases: Vec<Case>,
    filter: CaseFilter,
    observers: Vec<Observer>,
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("cases", &self.cases)
            .field("filter", &self.filter)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Repository {
    /// Build a repository from a snapshot.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::DuplicateCase`] if two cases in `cases` share weak identity.
    pub fn from_cases(cases: Vec<Case>) -> Result<Self, RepositoryError> {
        ensure_unique(&cases)?;
        Ok(Self {
            cases,
            ..Self::default()
        })
    }

    /// The full ordered sequence, archived cases included.
    #[must_use]
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Copy of the full sequence for history and persistence.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Case> {
        self.cases.clone()
    }

    #[must_use]
    pub const fn filter(&self) -> &CaseFilter {
        &self.filter
    }

    #[must_use]
    pub fn contains_same(&self, case: &Case) -> bool {
        self.cases.iter().any(|existing| existing.is_same_case(case))
    }

    /// Cases visible under the active filter, in sequence order.
    #[must_use]
    pub fn filtered_cases(&self) -> Vec<&Case> {
        self.filtered_by(|case| self.filter.matches(case))
    }

    /// Cases matching a caller-supplied predicate, in sequence order.
    pub fn filtered_by(&self, predicate: impl Fn(&Case) -> bool) -> Vec<&Case> {
        self.cases.iter().filter(|case| predicate(case)).collect()
    }

    /// Register a callback run synchronously after every mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(&RepositoryEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, event: RepositoryEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    /// Append a case.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::DuplicateCase`] if an existing case has the same weak identity.
    pub fn add_case(&mut self, case: Case) -> Result<(), RepositoryError> {
        if self.contains_same(&case) {
            return Err(RepositoryError::DuplicateCase);
        }
        self.cases.push(case);
        let index = self.cases.len() - 1;
        self.notify(RepositoryEvent::Added { index });
        Ok(())
    }

    /// Remove the first case fully equal to `case`.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::CaseNotFound`] if no case is fully equal.
    pub fn delete_case(&mut self, case: &Case) -> Result<(), RepositoryError> {
        let index = self.position(case)?;
        self.cases.remove(index);
        self.notify(RepositoryEvent::Removed { index });
        Ok(())
    }

    /// Replace `old` with `new` at the same position.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::CaseNotFound`] if `old` is absent.
    /// - [`RepositoryError::DuplicateCase`] if `new` has the weak identity of a different case.
    pub fn set_case(&mut self, old: &Case, new: Case) -> Result<(), RepositoryError> {
        let index = self.position(old)?;
        let collides = self
            .cases
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && existing.is_same_case(&new));
        if collides {
            return Err(RepositoryError::DuplicateCase);
        }
        self.cases[index] = new;
        self.notify(RepositoryEvent::Replaced { index });
        Ok(())
    }

    /// Swap in a whole snapshot, e.g. one restored from history.
    ///
    /// The active filter is kept.
    pub fn replace_all(&mut self, cases: Vec<Case>) {
        self.cases = cases;
        let len = self.cases.len();
        self.notify(RepositoryEvent::Reset { len });
    }

    pub fn set_filter(&mut self, filter: CaseFilter) {
        self.filter = filter;
        self.notify(RepositoryEvent::FilterChanged);
    }

    fn position(&self, case: &Case) -> Result<usize, RepositoryError> {
        self.cases
            .iter()
            .position(|existing| existing == case)
            .ok_or(RepositoryError::CaseNotFound)
    }
}

/// Reject a snapshot containing two weak-identity-equal cases.
///
/// # Errors
///
/// [`RepositoryError::DuplicateCase`] on the first collision found.
pub fn ensure_unique(cases: &[Case]) -> Result<(), RepositoryError> {
    for (i, case) in cases.iter().enumerate() {
        if cases[i + 1..].iter().any(|other| other.is_same_case(case)) {
            return Err(RepositoryError::DuplicateCase);
        }
    }
    Ok(())
}

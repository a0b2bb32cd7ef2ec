//! The execution context handed to every command.
//!
//! A `Session` bundles the three pieces of mutable state the command layer
//! works on: the repository, the undo/redo history, and the navigation
//! guard. It is built once at startup and passed by `&mut` into
//! [`Session::execute`]; there is no process-wide state.

use crate::command::{Command, CommandOutcome};
use crate::error::CommandError;
use crate::history::History;
use crate::model::Case;
use crate::nav::{NavigationGuard, Page};
use crate::repository::{Repository, RepositoryError, RepositoryEvent};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Session {
    pub(crate) repository: Repository,
    pub(crate) history: History,
    pub(crate) guard: NavigationGuard,
}

impl Session {
    /// Start a session over `cases`, which also becomes the undo floor.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::DuplicateCase`] when `cases` breaks case uniqueness.
    pub fn new(cases: Vec<Case>) -> Result<Self, RepositoryError> {
        let repository = Repository::from_cases(cases)?;
        let history = History::new(repository.snapshot());
        Ok(Self {
            repository,
            history,
            guard: NavigationGuard::new(),
        })
    }

    #[must_use]
    pub const fn repository(&self) -> &Repository {
        &self.repository
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub const fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    #[must_use]
    pub const fn page(&self) -> Page {
        self.guard.page()
    }

    /// Subscribe to repository change notifications.
    pub fn on_repository_change(&mut self, observer: impl FnMut(&RepositoryEvent) + 'static) {
        self.repository.subscribe(observer);
    }

    /// Subscribe to navigation changes.
    pub fn on_navigation_change(&mut self, observer: impl FnMut(Page) + 'static) {
        self.guard.subscribe(observer);
    }

    /// Run one command to completion.
    ///
    /// On error nothing has changed: repository, history and navigation are
    /// as they were before the call.
    ///
    /// # Errors
    ///
    /// Any [`CommandError`] raised while validating the command.
    pub fn execute(&mut self, command: &Command) -> Result<CommandOutcome, CommandError> {
        debug!(command = command.word(), page = %self.guard.page(), "executing command");
        match command.execute(self) {
            Ok(outcome) => {
                if outcome.mutated {
                    info!(
                        command = command.word(),
                        history = self.history.len(),
                        "{}",
                        outcome.message
                    );
                }
                Ok(outcome)
            }
            Err(err) => {
                debug!(command = command.word(), code = %err.code(), "command rejected: {err}");
                Err(err)
            }
        }
    }

    /// Resolve `index` against the current filtered view.
    pub(crate) fn resolve_case(&self, index: usize) -> Result<Case, CommandError> {
        let view = self.repository.filtered_cases();
        view.get(index)
            .map(|case| (*case).clone())
            .ok_or(CommandError::InvalidIndex {
                index,
                len: view.len(),
            })
    }

    /// The case the detail page currently shows, if any.
    pub(crate) fn selected_case(&self) -> Option<Case> {
        let index = self.guard.page().case_index()?;
        self.repository
            .filtered_cases()
            .get(index)
            .map(|case| (*case).clone())
    }

    /// Point navigation back at `tracked` after the view changed.
    ///
    /// `tracked` is the case that should stay selected, already replaced by
    /// its new value if the command rewrote it. When it is no longer in the
    /// filtered view the selection is dropped.
    pub(crate) fn resync(&mut self, tracked: Option<Case>) {
        if self.guard.page() == Page::List {
            return;
        }
        let position = tracked.and_then(|tracked| {
            self.repository
                .filtered_cases()
                .iter()
                .position(|case| **case == tracked)
        });
        match position {
            Some(index) => self.guard.relocate(index),
            None => self.guard.invalidate(),
        }
    }

    /// Replace `old` with `new`, keep navigation on the same case, and commit.
    pub(crate) fn replace_case(
        &mut self,
        old: &Case,
        new: Case,
        message: String,
    ) -> Result<CommandOutcome, CommandError> {
        let tracked = self
            .selected_case()
            .map(|selected| if selected == *old { new.clone() } else { selected });
        self.repository.set_case(old, new)?;
        self.resync(tracked);
        Ok(self.commit(message))
    }

    /// Record the repository's current state in history.
    pub(crate) fn commit(&mut self, message: String) -> CommandOutcome {
        self.history
            .commit(self.repository.snapshot(), message.clone());
        CommandOutcome::mutated(message, self.guard.page())
    }
}

//! Commands that change what is shown rather than what is stored: list
//! filters, navigation, and history traversal.

use super::{CommandOutcome, Index};
use crate::error::CommandError;
use crate::history::Restored;
use crate::nav::Section;
use crate::repository::CaseFilter;
use crate::session::Session;

/// Swap the list filter, then drop the selection if it fell out of view.
fn refilter(session: &mut Session, filter: CaseFilter) {
    let tracked = session.selected_case();
    session.repository.set_filter(filter);
    session.resync(tracked);
}

pub(super) fn list(session: &mut Session, archived: bool) -> Result<CommandOutcome, CommandError> {
    let (filter, message) = if archived {
        (CaseFilter::Archived, "Listed all archived cases")
    } else {
        (CaseFilter::Default, "Listed all cases")
    };
    refilter(session, filter);
    Ok(CommandOutcome::viewed(
        message.to_string(),
        session.guard.page(),
    ))
}

pub(super) fn find(
    session: &mut Session,
    keywords: &[String],
) -> Result<CommandOutcome, CommandError> {
    let archived = session.repository.filter().is_archive_view();
    refilter(
        session,
        CaseFilter::Keywords {
            keywords: keywords.to_vec(),
            archived,
        },
    );
    let count = session.repository.filtered_cases().len();
    Ok(CommandOutcome::viewed(
        format!("{count} case(s) listed"),
        session.guard.page(),
    ))
}

pub(super) fn open(session: &mut Session, index: Index) -> Result<CommandOutcome, CommandError> {
    session.guard.require_list()?;
    let target = session.resolve_case(index.zero_based())?;
    let view_len = session.repository.filtered_cases().len();
    session.guard.open(index.zero_based(), view_len)?;
    Ok(CommandOutcome::viewed(
        format!("Opened case: {target}"),
        session.guard.page(),
    ))
}

pub(super) fn return_to_list(session: &mut Session) -> Result<CommandOutcome, CommandError> {
    session.guard.require_case()?;
    session.guard.close();
    Ok(CommandOutcome::viewed(
        "Returned to the case list".to_string(),
        session.guard.page(),
    ))
}

pub(super) fn view_section(
    session: &mut Session,
    section: Section,
) -> Result<CommandOutcome, CommandError> {
    let case_index = session.guard.require_case()?;
    let target = session.resolve_case(case_index)?;
    session.guard.view_section(section)?;
    Ok(CommandOutcome::viewed(
        format!("Viewing {section} of case: {}", target.title()),
        session.guard.page(),
    ))
}

/// Install a restored snapshot. Indices from before the restore cannot be
/// trusted, so navigation always returns to the list.
fn restore(session: &mut Session, restored: Restored, verb: &str) -> CommandOutcome {
    session.repository.replace_all(restored.snapshot);
    session.guard.invalidate();
    CommandOutcome::mutated(
        format!("{verb} successful: {}", restored.message),
        session.guard.page(),
    )
}

pub(super) fn undo(session: &mut Session) -> Result<CommandOutcome, CommandError> {
    let restored = session.history.undo()?;
    Ok(restore(session, restored, "Undo"))
}

pub(super) fn redo(session: &mut Session) -> Result<CommandOutcome, CommandError> {
    let restored = session.history.redo()?;
    Ok(restore(session, restored, "Redo"))
}

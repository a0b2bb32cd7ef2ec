//! Case-level commands: add, delete, edit, archive, unarchive, tags.

use super::{CommandOutcome, Index};
use crate::error::CommandError;
use crate::model::{ArchiveStatus, Case, CaseEdit, Tag};
use crate::nav::Page;
use crate::session::Session;
use std::collections::BTreeSet;

pub(super) fn add(session: &mut Session, new_case: &Case) -> Result<CommandOutcome, CommandError> {
    session.guard.require_list()?;
    session.repository.add_case(new_case.clone())?;
    Ok(session.commit(format!("New case added: {new_case}")))
}

pub(super) fn delete(session: &mut Session, index: Index) -> Result<CommandOutcome, CommandError> {
    let target = session.resolve_case(index.zero_based())?;
    let tracked = session.selected_case();
    session.repository.delete_case(&target)?;
    session.resync(tracked);
    Ok(session.commit(format!("Deleted case: {target}")))
}

pub(super) fn edit(
    session: &mut Session,
    index: Option<Index>,
    edit: &CaseEdit,
) -> Result<CommandOutcome, CommandError> {
    let case_index = match (session.guard.page(), index) {
        (Page::List, Some(index)) => index.zero_based(),
        (Page::CaseDetail { case_index, .. }, None) => case_index,
        (actual @ Page::List, None) => {
            return Err(CommandError::WrongPage {
                required: "an open case",
                actual,
            });
        }
        (actual @ Page::CaseDetail { .. }, Some(_)) => {
            return Err(CommandError::WrongPage {
                required: "the case list",
                actual,
            });
        }
    };
    if edit.is_empty() {
        return Err(CommandError::NothingToEdit);
    }
    let target = session.resolve_case(case_index)?;
    let updated = edit.apply(&target);
    if updated == target {
        return Err(CommandError::NothingToEdit);
    }
    let message = format!("Edited case: {updated}");
    session.replace_case(&target, updated, message)
}

pub(super) fn archive(session: &mut Session, index: Index) -> Result<CommandOutcome, CommandError> {
    if session.repository.filter().is_archive_view() {
        return Err(CommandError::WrongView {
            required: "the default case list",
        });
    }
    let target = session.resolve_case(index.zero_based())?;
    let archived = target.clone().with_archive_status(ArchiveStatus::Archived);
    let message = format!("Case archived: {archived}");
    session.replace_case(&target, archived, message)
}

pub(super) fn unarchive(
    session: &mut Session,
    index: Index,
) -> Result<CommandOutcome, CommandError> {
    if !session.repository.filter().is_archive_view() {
        return Err(CommandError::WrongView {
            required: "the archived case list",
        });
    }
    let target = session.resolve_case(index.zero_based())?;
    let restored = target.clone().with_archive_status(ArchiveStatus::Default);
    let message = format!("Case unarchived: {restored}");
    session.replace_case(&target, restored, message)
}

pub(super) fn add_tags(session: &mut Session, tags: &[Tag]) -> Result<CommandOutcome, CommandError> {
    let case_index = session.guard.require_case()?;
    let target = session.resolve_case(case_index)?;
    let added: BTreeSet<&Tag> = tags
        .iter()
        .filter(|tag| !target.tags().contains(*tag))
        .collect();
    if added.is_empty() {
        return Err(CommandError::DuplicateEntity("tag"));
    }
    let mut updated_tags = target.tags().clone();
    updated_tags.extend(added.iter().map(|tag| (*tag).clone()));
    let names: Vec<&str> = added.iter().map(|tag| tag.as_str()).collect();
    let message = format!("Added tag(s) to {}: {}", target.title(), names.join(", "));
    let updated = target.clone().with_tags(updated_tags);
    session.replace_case(&target, updated, message)
}

pub(super) fn delete_tag(session: &mut Session, tag: &Tag) -> Result<CommandOutcome, CommandError> {
    let case_index = session.guard.require_case()?;
    let target = session.resolve_case(case_index)?;
    if !target.tags().contains(tag) {
        return Err(CommandError::EntityNotFound("tag"));
    }
    let mut updated_tags = target.tags().clone();
    updated_tags.remove(tag);
    let message = format!("Deleted tag from {}: {tag}", target.title());
    let updated = target.clone().with_tags(updated_tags);
    session.replace_case(&target, updated, message)
}

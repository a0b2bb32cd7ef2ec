//! Commands on a case's nested entries: suspects, victims, witnesses, documents.
//!
//! Adding needs an open case and switches to the matching section. Deleting
//! and editing address an entry by its index in the active section, so they
//! require that section to be showing.

use super::{CommandOutcome, Index};
use crate::error::CommandError;
use crate::model::{CasePerson, Document, DocumentEdit, PersonEdit, Role};
use crate::nav::Section;
use crate::session::Session;

const DOCUMENT: &str = "document";

fn entry<T: Clone>(items: &[T], section: Section, index: Index) -> Result<T, CommandError> {
    items
        .get(index.zero_based())
        .cloned()
        .ok_or(CommandError::InvalidSubIndex {
            section,
            index: index.zero_based(),
            len: items.len(),
        })
}

fn without<T: Clone>(items: &[T], index: Index) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index.zero_based())
        .map(|(_, item)| item.clone())
        .collect()
}

fn replaced<T: Clone + PartialEq>(
    items: &[T],
    index: Index,
    new: T,
    entity: &'static str,
) -> Result<Vec<T>, CommandError> {
    let collides = items
        .iter()
        .enumerate()
        .any(|(i, item)| i != index.zero_based() && *item == new);
    if collides {
        return Err(CommandError::DuplicateEntity(entity));
    }
    let mut updated = items.to_vec();
    updated[index.zero_based()] = new;
    Ok(updated)
}

fn appended<T: Clone + PartialEq>(
    items: &[T],
    new: &T,
    entity: &'static str,
) -> Result<Vec<T>, CommandError> {
    if items.contains(new) {
        return Err(CommandError::DuplicateEntity(entity));
    }
    let mut updated = items.to_vec();
    updated.push(new.clone());
    Ok(updated)
}

pub(super) fn add_person(
    session: &mut Session,
    role: Role,
    person: &CasePerson,
) -> Result<CommandOutcome, CommandError> {
    let case_index = session.guard.require_case()?;
    let target = session.resolve_case(case_index)?;
    let persons = appended(target.persons(role), person, role.as_str())?;
    let updated = target.clone().with_persons(role, persons);
    let message = format!("New {role} added: {person}");
    let mut outcome = session.replace_case(&target, updated, message)?;
    session.guard.focus_section(role.into());
    outcome.page = session.guard.page();
    Ok(outcome)
}

pub(super) fn delete_person(
    session: &mut Session,
    role: Role,
    index: Index,
) -> Result<CommandOutcome, CommandError> {
    let section = Section::from(role);
    let case_index = session.guard.require_section(section)?;
    let target = session.resolve_case(case_index)?;
    let removed = entry(target.persons(role), section, index)?;
    let persons = without(target.persons(role), index);
    let updated = target.clone().with_persons(role, persons);
    session.replace_case(&target, updated, format!("Deleted {role}: {removed}"))
}

pub(super) fn edit_person(
    session: &mut Session,
    role: Role,
    index: Index,
    edit: &PersonEdit,
) -> Result<CommandOutcome, CommandError> {
    let section = Section::from(role);
    let case_index = session.guard.require_section(section)?;
    if edit.is_empty() {
        return Err(CommandError::NothingToEdit);
    }
    let target = session.resolve_case(case_index)?;
    let original = entry(target.persons(role), section, index)?;
    let edited = edit.apply(&original);
    if edited == original {
        return Err(CommandError::NothingToEdit);
    }
    let message = format!("Edited {role}: {edited}");
    let persons = replaced(target.persons(role), index, edited, role.as_str())?;
    let updated = target.clone().with_persons(role, persons);
    session.replace_case(&target, updated, message)
}

pub(super) fn add_document(
    session: &mut Session,
    document: &Document,
) -> Result<CommandOutcome, CommandError> {
    let case_index = session.guard.require_case()?;
    let target = session.resolve_case(case_index)?;
    let documents = appended(target.documents(), document, DOCUMENT)?;
    let updated = target.clone().with_documents(documents);
    let message = format!("New document added: {document}");
    let mut outcome = session.replace_case(&target, updated, message)?;
    session.guard.focus_section(Section::Documents);
    outcome.page = session.guard.page();
    Ok(outcome)
}

pub(super) fn delete_document(
    session: &mut Session,
    index: Index,
) -> Result<CommandOutcome, CommandError> {
    let case_index = session.guard.require_section(Section::Documents)?;
    let target = session.resolve_case(case_index)?;
    let removed = entry(target.documents(), Section::Documents, index)?;
    let documents = without(target.documents(), index);
    let updated = target.clone().with_documents(documents);
    session.replace_case(&target, updated, format!("Deleted document: {removed}"))
}

pub(super) fn edit_document(
    session: &mut Session,
    index: Index,
    edit: &DocumentEdit,
) -> Result<CommandOutcome, CommandError> {
    let case_index = session.guard.require_section(Section::Documents)?;
    if edit.is_empty() {
        return Err(CommandError::NothingToEdit);
    }
    let target = session.resolve_case(case_index)?;
    let original = entry(target.documents(), Section::Documents, index)?;
    let edited = edit.apply(&original);
    if edited == original {
        return Err(CommandError::NothingToEdit);
    }
    let message = format!("Edited document: {edited}");
    let documents = replaced(target.documents(), index, edited, DOCUMENT)?;
    let updated = target.clone().with_documents(documents);
    session.replace_case(&target, updated, message)
}

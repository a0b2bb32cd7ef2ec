//! Case data model: value objects, field newtypes, and edit descriptors.

pub mod case;
pub mod edit;
pub mod fields;
pub mod person;

pub use case::Case;
pub use edit::{CaseEdit, DocumentEdit, PersonEdit};
pub use fields::{
    Address, ArchiveStatus, Description, Email, Name, ParseEnumError, Phone, Reference, Sex,
    Status, Tag, Title, ValidationError,
};
pub use person::{CasePerson, Document, Role};

//! Errors raised when the local organizer tree cannot apply an operation

use thiserror::Error;

use crate::organizer::OrganizerId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrganizerError {
    #[error("Organizer {0} not found")]
    NotFound(OrganizerId),

    #[error("Parent organizer {0} not found")]
    ParentNotFound(OrganizerId),

    #[error("An organizer with ID {0} already exists in this tree")]
    DuplicateId(OrganizerId),

    #[error("Invalid operation: cannot delete the root organizer")]
    CannotDeleteRoot,

    #[error("Cannot move organizer {0} under {1}")]
    InvalidMove(OrganizerId, OrganizerId),

    #[error("Invalid organizer name: {0}")]
    InvalidName(String),

    #[error("Payload has no organizer ID")]
    MissingId,
}

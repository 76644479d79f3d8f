mod email;
mod external_id;
mod internal_id;
mod name;
mod photo_url;
mod username;

pub use self::{email::*, external_id::*, internal_id::*, name::*, photo_url::*, username::*};
use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

/// A persisted mirror of one identity-provider account.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Destructure, References)]
pub struct User {
    internal_id: InternalId,
    external_id: ExternalId,
    email: EmailAddress,
    username: UserName,
    first_name: FirstName,
    last_name: LastName,
    photo_url: Option<PhotoUrl>,
}

impl User {
    pub fn new(
        internal_id: InternalId,
        external_id: ExternalId,
        email: EmailAddress,
        username: UserName,
        first_name: FirstName,
        last_name: LastName,
        photo_url: Option<PhotoUrl>,
    ) -> Self {
        Self {
            internal_id,
            external_id,
            email,
            username,
            first_name,
            last_name,
            photo_url,
        }
    }
}

/// Field set for a record that has not been persisted yet. The store
/// assigns the internal id on creation.
#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct UserDraft {
    external_id: ExternalId,
    email: EmailAddress,
    username: UserName,
    first_name: FirstName,
    last_name: LastName,
    photo_url: Option<PhotoUrl>,
}

impl UserDraft {
    pub fn new(
        external_id: ExternalId,
        email: EmailAddress,
        username: UserName,
        first_name: FirstName,
        last_name: LastName,
        photo_url: Option<PhotoUrl>,
    ) -> Self {
        Self {
            external_id,
            email,
            username,
            first_name,
            last_name,
            photo_url,
        }
    }
}

/// The fields an update event declares. Name fields overwrite whatever
/// is stored; the photo keeps its prior value when absent.
#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct UserChanges {
    username: UserName,
    first_name: FirstName,
    last_name: LastName,
    photo_url: Option<PhotoUrl>,
}

impl UserChanges {
    pub fn new(
        username: UserName,
        first_name: FirstName,
        last_name: LastName,
        photo_url: Option<PhotoUrl>,
    ) -> Self {
        Self {
            username,
            first_name,
            last_name,
            photo_url,
        }
    }
}

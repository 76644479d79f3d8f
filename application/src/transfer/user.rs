use kernel::interface::event::EventKind;
use kernel::prelude::entity::{
    DestructUser, EmailAddress, ExternalId, FirstName, InternalId, LastName, PhotoUrl, User,
    UserName,
};

pub struct GetUserDto {
    pub id: ExternalId,
}

/// Flattened user record handed to presentation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UserDto {
    pub internal_id: InternalId,
    pub external_id: ExternalId,
    pub email: EmailAddress,
    pub username: UserName,
    pub first_name: FirstName,
    pub last_name: LastName,
    pub photo_url: Option<PhotoUrl>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        let DestructUser {
            internal_id,
            external_id,
            email,
            username,
            first_name,
            last_name,
            photo_url,
        } = user.into_destruct();
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

/// What a verified delivery amounted to. Unsupported kinds are reported,
/// not escalated.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum UserEventOutcome {
    Applied(UserDto),
    Ignored { kind: EventKind },
}

use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::{EmailAddress, ExternalId, FirstName, LastName, PhotoUrl, UserName};

/// Raw event-type tag as delivered by the provider.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct EventKind(String);

impl EventKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }
}

/// One verified delivery from the identity provider. Each supported
/// variant maps to exactly one store operation; unsupported kinds are
/// carried through so the endpoint can report them without treating the
/// delivery as a fault.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum UserLifecycleEvent {
    Created {
        id: ExternalId,
        email: EmailAddress,
        username: Option<UserName>,
        first_name: FirstName,
        last_name: LastName,
        photo_url: Option<PhotoUrl>,
    },
    Updated {
        id: ExternalId,
        username: Option<UserName>,
        first_name: FirstName,
        last_name: LastName,
        photo_url: Option<PhotoUrl>,
    },
    Deleted {
        id: Option<ExternalId>,
    },
    Unsupported {
        kind: EventKind,
    },
}

impl UserLifecycleEvent {
    pub fn kind(&self) -> &str {
        match self {
            Self::Created { .. } => "user.created",
            Self::Updated { .. } => "user.updated",
            Self::Deleted { .. } => "user.deleted",
            Self::Unsupported { kind } => kind.as_ref(),
        }
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

/// Store-assigned identifier, distinct from the provider's external id.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct InternalId(Uuid);

impl InternalId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Identity-provider-issued subject identifier. Immutable once set and
/// unique across user records.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct ExternalId(String);

impl ExternalId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

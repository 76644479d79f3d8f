use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// May be empty when the provider omits every address.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }
}

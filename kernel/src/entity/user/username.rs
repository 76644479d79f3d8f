use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::{FirstName, LastName};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Fallback when the provider did not supply a username: first and
    /// last name joined with an underscore, lower-cased, all whitespace
    /// removed. Deterministic, not guaranteed unique.
    pub fn derive(first_name: &FirstName, last_name: &LastName) -> Self {
        let joined = format!("{}_{}", first_name.as_ref(), last_name.as_ref());
        Self(
            joined
                .to_lowercase()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect(),
        )
    }
}

use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Fromln, AsRefln, Serialize, Deserialize)]
pub struct PhotoUrl(String);

impl PhotoUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}

mod user;
mod webhook;

pub use self::user::*;
pub use self::webhook::*;

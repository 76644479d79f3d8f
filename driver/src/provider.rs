mod clerk;

pub use self::clerk::*;

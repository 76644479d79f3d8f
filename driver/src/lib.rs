use error_stack::ResultExt;
use kernel::KernelError;

pub mod database;
mod error;
pub mod provider;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .change_context(KernelError::Config)
        .attach_printable_lazy(|| format!("{key} is not set"))
}

use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    Request,
    MissingId,
    NotFound,
    Duplicate,
    Config,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Request => write!(f, "Malformed event payload"),
            KernelError::MissingId => write!(f, "User ID is required"),
            KernelError::NotFound => write!(f, "User not found"),
            KernelError::Duplicate => write!(f, "User already exists"),
            KernelError::Config => write!(f, "Service is not configured"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

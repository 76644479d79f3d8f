use kernel::KernelError;

/// Converts vendor error types into kernel error contexts.
pub(crate) trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

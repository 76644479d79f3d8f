use crate::entity::{ExternalId, InternalId};
use crate::KernelError;

/// Write-back seam to the identity provider. The only mutation performed
/// against the provider is attaching the store-assigned id to the
/// external account after a successful create.
#[async_trait::async_trait]
pub trait IdentityProvider: 'static + Sync + Send {
    async fn attach_internal_id(
        &self,
        external_id: &ExternalId,
        internal_id: &InternalId,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnIdentityProvider: 'static + Sync + Send {
    type IdentityProvider: IdentityProvider;
    fn identity_provider(&self) -> &Self::IdentityProvider;
}

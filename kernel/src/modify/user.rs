use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{ExternalId, User, UserChanges, UserDraft};
use crate::KernelError;

/// Single-record mutations keyed by the external id. Every operation
/// returns the affected record so callers can echo it back.
#[async_trait::async_trait]
pub trait UserModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        draft: UserDraft,
    ) -> error_stack::Result<User, KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        id: &ExternalId,
        changes: UserChanges,
    ) -> error_stack::Result<User, KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        id: &ExternalId,
    ) -> error_stack::Result<User, KernelError>;
}

pub trait DependOnUserModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type UserModifier: UserModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn user_modifier(&self) -> &Self::UserModifier;
}

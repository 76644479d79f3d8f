use driver::database::{PostgresDatabase, PostgresUserRepository};
use driver::provider::ClerkProvider;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::provider::DependOnIdentityProvider;
use kernel::interface::query::DependOnUserQuery;
use kernel::interface::update::DependOnUserModifier;
use kernel::KernelError;
use std::ops::Deref;
use std::sync::Arc;
use vodca::References;

use crate::signature::WebhookVerifier;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init().await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

#[derive(References)]
pub struct Handler {
    pgpool: PostgresDatabase,
    users: PostgresUserRepository,
    clerk: ClerkProvider,
    verifier: WebhookVerifier,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;
        let users = PostgresUserRepository;
        let clerk = ClerkProvider::new()?;
        let verifier = WebhookVerifier::from_env()?;

        Ok(Self {
            pgpool,
            users,
            clerk,
            verifier,
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &PostgresDatabase {
        self.pgpool()
    }
}

impl DependOnUserQuery for Handler {
    type UserQuery = PostgresUserRepository;
    fn user_query(&self) -> &PostgresUserRepository {
        self.users()
    }
}

impl DependOnUserModifier for Handler {
    type UserModifier = PostgresUserRepository;
    fn user_modifier(&self) -> &PostgresUserRepository {
        self.users()
    }
}

impl DependOnIdentityProvider for Handler {
    type IdentityProvider = ClerkProvider;
    fn identity_provider(&self) -> &ClerkProvider {
        self.clerk()
    }
}

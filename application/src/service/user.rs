use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::event::UserLifecycleEvent;
use kernel::interface::provider::{DependOnIdentityProvider, IdentityProvider};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::update::{DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{UserChanges, UserDraft, UserName};
use kernel::KernelError;

use crate::transfer::{GetUserDto, UserDto, UserEventOutcome};

#[async_trait::async_trait]
pub trait HandleUserEventService:
    'static + Sync + Send + DependOnUserModifier + DependOnIdentityProvider
{
    /// Applies one verified lifecycle event to the store. Exactly one
    /// store operation per supported event. The internal-id write-back
    /// after a create is best-effort: its failure is logged and never
    /// fails the delivery.
    async fn handle_event(
        &self,
        event: UserLifecycleEvent,
    ) -> error_stack::Result<UserEventOutcome, KernelError> {
        match event {
            UserLifecycleEvent::Created {
                id,
                email,
                username,
                first_name,
                last_name,
                photo_url,
            } => {
                let username =
                    username.unwrap_or_else(|| UserName::derive(&first_name, &last_name));
                let draft = UserDraft::new(
                    id.clone(),
                    email,
                    username,
                    first_name,
                    last_name,
                    photo_url,
                );

                let mut connection = self.database_connection().transact().await?;
                let user = self.user_modifier().create(&mut connection, draft).await?;
                connection.commit().await?;

                if let Err(report) = self
                    .identity_provider()
                    .attach_internal_id(&id, user.internal_id())
                    .await
                {
                    tracing::warn!(
                        external_id = %id.as_ref(),
                        error = ?report,
                        "failed to attach the internal id to the provider account"
                    );
                }

                tracing::info!(external_id = %id.as_ref(), "user record created");
                Ok(UserEventOutcome::Applied(UserDto::from(user)))
            }
            UserLifecycleEvent::Updated {
                id,
                username,
                first_name,
                last_name,
                photo_url,
            } => {
                // Declared fields overwrite unconditionally; an absent
                // username becomes empty, an absent photo keeps its value.
                let changes = UserChanges::new(
                    username.unwrap_or_else(|| UserName::new("")),
                    first_name,
                    last_name,
                    photo_url,
                );

                let mut connection = self.database_connection().transact().await?;
                let user = self
                    .user_modifier()
                    .update(&mut connection, &id, changes)
                    .await?;
                connection.commit().await?;

                tracing::info!(external_id = %id.as_ref(), "user record updated");
                Ok(UserEventOutcome::Applied(UserDto::from(user)))
            }
            UserLifecycleEvent::Deleted { id } => {
                let id = id.ok_or_else(|| Report::new(KernelError::MissingId))?;

                let mut connection = self.database_connection().transact().await?;
                let user = self.user_modifier().delete(&mut connection, &id).await?;
                connection.commit().await?;

                tracing::info!(external_id = %id.as_ref(), "user record deleted");
                Ok(UserEventOutcome::Applied(UserDto::from(user)))
            }
            UserLifecycleEvent::Unsupported { kind } => {
                tracing::warn!(kind = %kind.as_ref(), "unsupported event kind delivered");
                Ok(UserEventOutcome::Ignored { kind })
            }
        }
    }
}

impl<T> HandleUserEventService for T where T: DependOnUserModifier + DependOnIdentityProvider {}

#[async_trait::async_trait]
pub trait GetUserService: 'static + Sync + Send + DependOnUserQuery {
    async fn get_user(
        &self,
        dto: GetUserDto,
    ) -> error_stack::Result<Option<UserDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let user = self
            .user_query()
            .find_by_external_id(&mut connection, &dto.id)
            .await?;
        connection.commit().await?;

        Ok(user.map(UserDto::from))
    }
}

impl<T> GetUserService for T where T: DependOnUserQuery {}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use error_stack::Report;
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
    use kernel::interface::event::{EventKind, UserLifecycleEvent};
    use kernel::interface::provider::{DependOnIdentityProvider, IdentityProvider};
    use kernel::interface::query::{DependOnUserQuery, UserQuery};
    use kernel::interface::update::{DependOnUserModifier, UserModifier};
    use kernel::prelude::entity::{
        EmailAddress, ExternalId, FirstName, InternalId, LastName, PhotoUrl, User, UserChanges,
        UserDraft, UserName,
    };
    use kernel::KernelError;

    use crate::service::{GetUserService, HandleUserEventService};
    use crate::transfer::{GetUserDto, UserEventOutcome};

    struct MemoryConnection;

    #[async_trait::async_trait]
    impl Transaction for MemoryConnection {
        async fn commit(self) -> error_stack::Result<(), KernelError> {
            Ok(())
        }

        async fn roll_back(self) -> error_stack::Result<(), KernelError> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct MemoryStore {
        records: Arc<Mutex<HashMap<String, User>>>,
    }

    #[async_trait::async_trait]
    impl DatabaseConnection for MemoryStore {
        type Transaction = MemoryConnection;
        async fn transact(&self) -> error_stack::Result<MemoryConnection, KernelError> {
            Ok(MemoryConnection)
        }
    }

    #[async_trait::async_trait]
    impl UserQuery for MemoryStore {
        type Transaction = MemoryConnection;
        async fn find_by_external_id(
            &self,
            _: &mut MemoryConnection,
            id: &ExternalId,
        ) -> error_stack::Result<Option<User>, KernelError> {
            Ok(self.records.lock().unwrap().get(id.as_ref()).cloned())
        }
    }

    #[async_trait::async_trait]
    impl UserModifier for MemoryStore {
        type Transaction = MemoryConnection;
        async fn create(
            &self,
            _: &mut MemoryConnection,
            draft: UserDraft,
        ) -> error_stack::Result<User, KernelError> {
            let mut records = self.records.lock().unwrap();
            let key = draft.external_id().as_ref().clone();
            if records.contains_key(&key) {
                return Err(Report::new(KernelError::Duplicate));
            }
            let draft = draft.into_destruct();
            let user = User::new(
                InternalId::new(Uuid::new_v4()),
                draft.external_id,
                draft.email,
                draft.username,
                draft.first_name,
                draft.last_name,
                draft.photo_url,
            );
            records.insert(key, user.clone());
            Ok(user)
        }

        async fn update(
            &self,
            _: &mut MemoryConnection,
            id: &ExternalId,
            changes: UserChanges,
        ) -> error_stack::Result<User, KernelError> {
            let mut records = self.records.lock().unwrap();
            let prior = records
                .get(id.as_ref())
                .cloned()
                .ok_or_else(|| Report::new(KernelError::NotFound))?
                .into_destruct();
            let changes = changes.into_destruct();
            let user = User::new(
                prior.internal_id,
                prior.external_id,
                prior.email,
                changes.username,
                changes.first_name,
                changes.last_name,
                changes.photo_url.or(prior.photo_url),
            );
            records.insert(id.as_ref().clone(), user.clone());
            Ok(user)
        }

        async fn delete(
            &self,
            _: &mut MemoryConnection,
            id: &ExternalId,
        ) -> error_stack::Result<User, KernelError> {
            self.records
                .lock()
                .unwrap()
                .remove(id.as_ref())
                .ok_or_else(|| Report::new(KernelError::NotFound))
        }
    }

    #[derive(Default)]
    struct RecordingProvider {
        fail: bool,
        attached: Mutex<Vec<(ExternalId, InternalId)>>,
    }

    #[async_trait::async_trait]
    impl IdentityProvider for RecordingProvider {
        async fn attach_internal_id(
            &self,
            external_id: &ExternalId,
            internal_id: &InternalId,
        ) -> error_stack::Result<(), KernelError> {
            if self.fail {
                return Err(Report::new(KernelError::Internal));
            }
            self.attached
                .lock()
                .unwrap()
                .push((external_id.clone(), internal_id.clone()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct TestModule {
        store: MemoryStore,
        provider: RecordingProvider,
    }

    impl DependOnDatabaseConnection for TestModule {
        type DatabaseConnection = MemoryStore;
        fn database_connection(&self) -> &MemoryStore {
            &self.store
        }
    }

    impl DependOnUserQuery for TestModule {
        type UserQuery = MemoryStore;
        fn user_query(&self) -> &MemoryStore {
            &self.store
        }
    }

    impl DependOnUserModifier for TestModule {
        type UserModifier = MemoryStore;
        fn user_modifier(&self) -> &MemoryStore {
            &self.store
        }
    }

    impl DependOnIdentityProvider for TestModule {
        type IdentityProvider = RecordingProvider;
        fn identity_provider(&self) -> &RecordingProvider {
            &self.provider
        }
    }

    fn created_event(id: &str) -> UserLifecycleEvent {
        UserLifecycleEvent::Created {
            id: ExternalId::new(id),
            email: EmailAddress::new("a@b.com"),
            username: None,
            first_name: FirstName::new("Jane"),
            last_name: LastName::new("Doe"),
            photo_url: None,
        }
    }

    fn updated_event(id: &str) -> UserLifecycleEvent {
        UserLifecycleEvent::Updated {
            id: ExternalId::new(id),
            username: None,
            first_name: FirstName::new("Janet"),
            last_name: LastName::new("Doe"),
            photo_url: Some(PhotoUrl::new("https://img.example/1.png")),
        }
    }

    #[tokio::test]
    async fn created_applies_username_fallback_and_writes_back() {
        let module = TestModule::default();

        let outcome = module.handle_event(created_event("ext_1")).await.unwrap();
        let UserEventOutcome::Applied(user) = outcome else {
            panic!("expected an applied outcome");
        };
        assert_eq!(user.external_id, ExternalId::new("ext_1"));
        assert_eq!(user.email, EmailAddress::new("a@b.com"));
        assert_eq!(user.username, UserName::new("jane_doe"));

        let attached = module.provider.attached.lock().unwrap();
        assert_eq!(
            attached.as_slice(),
            &[(ExternalId::new("ext_1"), user.internal_id.clone())]
        );
    }

    #[tokio::test]
    async fn created_keeps_a_supplied_username() {
        let module = TestModule::default();

        let outcome = module
            .handle_event(UserLifecycleEvent::Created {
                id: ExternalId::new("ext_1"),
                email: EmailAddress::new(""),
                username: Some(UserName::new("jd")),
                first_name: FirstName::new("Jane"),
                last_name: LastName::new("Doe"),
                photo_url: None,
            })
            .await
            .unwrap();
        let UserEventOutcome::Applied(user) = outcome else {
            panic!("expected an applied outcome");
        };
        assert_eq!(user.username, UserName::new("jd"));
    }

    #[tokio::test]
    async fn provider_failure_does_not_fail_the_create() {
        let module = TestModule {
            store: MemoryStore::default(),
            provider: RecordingProvider {
                fail: true,
                attached: Mutex::new(Vec::new()),
            },
        };

        let outcome = module.handle_event(created_event("ext_1")).await.unwrap();
        assert!(matches!(outcome, UserEventOutcome::Applied(_)));
        assert!(module
            .store
            .records
            .lock()
            .unwrap()
            .contains_key("ext_1"));
    }

    #[tokio::test]
    async fn duplicate_create_surfaces_conflict() {
        let module = TestModule::default();

        module.handle_event(created_event("ext_1")).await.unwrap();
        let error = module
            .handle_event(created_event("ext_1"))
            .await
            .expect_err("redelivered create must surface the conflict");
        assert!(matches!(error.current_context(), KernelError::Duplicate));
    }

    #[tokio::test]
    async fn update_overwrites_declared_fields_and_is_idempotent() {
        let module = TestModule::default();
        module.handle_event(created_event("ext_1")).await.unwrap();

        let first = module.handle_event(updated_event("ext_1")).await.unwrap();
        let second = module.handle_event(updated_event("ext_1")).await.unwrap();
        assert_eq!(first, second);

        let UserEventOutcome::Applied(user) = second else {
            panic!("expected an applied outcome");
        };
        // username was absent from the event and is overwritten to empty
        assert_eq!(user.username, UserName::new(""));
        assert_eq!(user.first_name, FirstName::new("Janet"));
        assert_eq!(user.photo_url, Some(PhotoUrl::new("https://img.example/1.png")));
        // email is creation-only
        assert_eq!(user.email, EmailAddress::new("a@b.com"));
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let module = TestModule::default();

        let error = module
            .handle_event(updated_event("ext_missing"))
            .await
            .expect_err("updating an unknown user must fail");
        assert!(matches!(error.current_context(), KernelError::NotFound));
    }

    #[tokio::test]
    async fn delete_requires_an_external_id() {
        let module = TestModule::default();

        let error = module
            .handle_event(UserLifecycleEvent::Deleted { id: None })
            .await
            .expect_err("a delete event without an id must fail");
        assert!(matches!(error.current_context(), KernelError::MissingId));
    }

    #[tokio::test]
    async fn redelivered_delete_is_not_found() {
        let module = TestModule::default();
        module.handle_event(created_event("ext_1")).await.unwrap();

        let delete = UserLifecycleEvent::Deleted {
            id: Some(ExternalId::new("ext_1")),
        };
        module.handle_event(delete.clone()).await.unwrap();
        let error = module
            .handle_event(delete)
            .await
            .expect_err("redelivered delete must report the record as absent");
        assert!(matches!(error.current_context(), KernelError::NotFound));
    }

    #[tokio::test]
    async fn unsupported_event_is_reported_not_escalated() {
        let module = TestModule::default();

        let outcome = module
            .handle_event(UserLifecycleEvent::Unsupported {
                kind: EventKind::new("user.foo"),
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            UserEventOutcome::Ignored {
                kind: EventKind::new("user.foo"),
            }
        );
        assert!(module.store.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_user_reads_the_mirrored_record() {
        let module = TestModule::default();
        module.handle_event(created_event("ext_1")).await.unwrap();

        let found = module
            .get_user(GetUserDto {
                id: ExternalId::new("ext_1"),
            })
            .await
            .unwrap();
        assert_eq!(found.map(|user| user.username), Some(UserName::new("jane_doe")));

        let missing = module
            .get_user(GetUserDto {
                id: ExternalId::new("ext_2"),
            })
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}

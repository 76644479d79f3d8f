use error_stack::Report;
use sqlx::types::Uuid;
use sqlx::PgConnection;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{
    DestructUserChanges, DestructUserDraft, EmailAddress, ExternalId, FirstName, InternalId,
    LastName, PhotoUrl, User, UserChanges, UserDraft, UserName,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresUserRepository;

#[async_trait::async_trait]
impl UserQuery for PostgresUserRepository {
    type Transaction = PostgresConnection;
    async fn find_by_external_id(
        &self,
        con: &mut PostgresConnection,
        id: &ExternalId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_external_id(con.as_pg(), id).await
    }
}

#[async_trait::async_trait]
impl UserModifier for PostgresUserRepository {
    type Transaction = PostgresConnection;
    async fn create(
        &self,
        con: &mut PostgresConnection,
        draft: UserDraft,
    ) -> error_stack::Result<User, KernelError> {
        PgUserInternal::create(con.as_pg(), draft).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        id: &ExternalId,
        changes: UserChanges,
    ) -> error_stack::Result<User, KernelError> {
        PgUserInternal::update(con.as_pg(), id, changes).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        id: &ExternalId,
    ) -> error_stack::Result<User, KernelError> {
        PgUserInternal::delete(con.as_pg(), id).await
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    internal_id: Uuid,
    external_id: String,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    photo_url: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(
            InternalId::new(row.internal_id),
            ExternalId::new(row.external_id),
            EmailAddress::new(row.email),
            UserName::new(row.username),
            FirstName::new(row.first_name),
            LastName::new(row.last_name),
            row.photo_url.map(PhotoUrl::new),
        )
    }
}

pub(in crate::database) struct PgUserInternal;

impl PgUserInternal {
    async fn find_by_external_id(
        con: &mut PgConnection,
        id: &ExternalId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            SELECT internal_id, external_id, email, username, first_name, last_name, photo_url
            FROM users
            WHERE external_id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(User::from))
    }

    async fn create(
        con: &mut PgConnection,
        draft: UserDraft,
    ) -> error_stack::Result<User, KernelError> {
        let DestructUserDraft {
            external_id,
            email,
            username,
            first_name,
            last_name,
            photo_url,
        } = draft.into_destruct();
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            INSERT INTO users (internal_id, external_id, email, username, first_name, last_name, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING internal_id, external_id, email, username, first_name, last_name, photo_url
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(external_id.as_ref())
        .bind(email.as_ref())
        .bind(username.as_ref())
        .bind(first_name.as_ref())
        .bind(last_name.as_ref())
        .bind(photo_url.as_ref().map(|url| url.as_ref()))
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(User::from(row))
    }

    async fn update(
        con: &mut PgConnection,
        id: &ExternalId,
        changes: UserChanges,
    ) -> error_stack::Result<User, KernelError> {
        let DestructUserChanges {
            username,
            first_name,
            last_name,
            photo_url,
        } = changes.into_destruct();
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            UPDATE users
            SET username = $2, first_name = $3, last_name = $4,
                photo_url = COALESCE($5, photo_url)
            WHERE external_id = $1
            RETURNING internal_id, external_id, email, username, first_name, last_name, photo_url
            "#,
        )
        .bind(id.as_ref())
        .bind(username.as_ref())
        .bind(first_name.as_ref())
        .bind(last_name.as_ref())
        .bind(photo_url.as_ref().map(|url| url.as_ref()))
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(User::from).ok_or_else(|| {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("no user record for {}", id.as_ref()))
        })
    }

    async fn delete(
        con: &mut PgConnection,
        id: &ExternalId,
    ) -> error_stack::Result<User, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            DELETE FROM users
            WHERE external_id = $1
            RETURNING internal_id, external_id, email, username, first_name, last_name, photo_url
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(User::from).ok_or_else(|| {
            Report::new(KernelError::NotFound)
                .attach_printable(format!("no user record for {}", id.as_ref()))
        })
    }
}

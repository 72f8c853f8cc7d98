use async_trait::async_trait;
use diesel::{
    insert_into,
    prelude::*,
    result::{DatabaseErrorKind, Error::DatabaseError},
};
use diesel_async::{
    pooled_connection::deadpool::Pool, scoped_futures::ScopedFutureExt, AsyncConnection,
    AsyncPgConnection, RunQueryDsl,
};

use super::{UserStore, UserStoreError};
use crate::models::{User, UserCredentials};
use crate::schema;

#[derive(Clone)]
pub struct PgUserStore {
    pool: Pool<AsyncPgConnection>,
}

impl PgUserStore {
    pub fn new(pool: Pool<AsyncPgConnection>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert_user(
        &self,
        user: &User,
        credentials: &UserCredentials,
    ) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                insert_into(schema::users::table)
                    .values(user)
                    .execute(conn)
                    .await?;
                insert_into(schema::user_credentials::table)
                    .values(credentials)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| match err {
            DatabaseError(DatabaseErrorKind::UniqueViolation, _) => UserStoreError::Duplicate,
            err => UserStoreError::Query(err),
        })
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, UserCredentials)>, UserStoreError> {
        let mut conn = self.pool.get().await?;
        let found = schema::users::table
            .inner_join(schema::user_credentials::table)
            .filter(schema::users::email.eq(email))
            .select((User::as_select(), UserCredentials::as_select()))
            .first::<(User, UserCredentials)>(&mut conn)
            .await
            .optional()?;
        Ok(found)
    }
}

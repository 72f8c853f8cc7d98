use async_trait::async_trait;
use thiserror::Error;

use crate::models::{User, UserCredentials};

pub mod memory;
pub mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

#[derive(Error, Debug)]
pub enum UserStoreError {
    #[error("cannot acquire database connection")]
    Pool(#[from] diesel_async::pooled_connection::deadpool::PoolError),
    #[error("error while executing database query")]
    Query(#[from] diesel::result::Error),
    #[error("user already exists")]
    Duplicate,
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Stores the user together with its credentials, atomically.
    async fn insert_user(
        &self,
        user: &User,
        credentials: &UserCredentials,
    ) -> Result<(), UserStoreError>;

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, UserCredentials)>, UserStoreError>;
}

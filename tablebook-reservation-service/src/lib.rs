use diesel_async::{
    pooled_connection::{
        deadpool::{BuildError, Pool},
        AsyncDieselConnectionManager,
    },
    AsyncPgConnection,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations};

pub mod admission;
pub mod locks;
pub mod models;
pub mod schema;
pub mod store;
pub mod tables;
pub mod time_slot;

pub use admission::{AdmissionError, ReservationAdmission, ValidationError};
pub use tables::{TableError, TableRegistry};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub fn establish_pool(
    database_url: &str,
    max_size: usize,
) -> Result<Pool<AsyncPgConnection>, BuildError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Pool::builder(manager).max_size(max_size).build()
}

use diesel_migrations::{embed_migrations, EmbeddedMigrations};

pub mod models;
pub mod schema;
pub mod service;
pub mod store;
pub mod token;

pub use service::{AuthError, AuthService, NewUser};
pub use token::{AccessToken, TokenIssuer};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

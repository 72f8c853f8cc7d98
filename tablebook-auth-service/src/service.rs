use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHash};
use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::models::{User, UserCredentials};
use crate::store::{UserStore, UserStoreError};
use crate::token::{AccessToken, TokenIssuer};

pub const PASSWORD_MIN_LENGTH: usize = 12;
pub const PASSWORD_SPECIAL_CHARACTERS: &str = "$%^*-_";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("user already exists")]
    UserExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("cannot hash passphrase")]
    Hash,
    #[error("cannot issue token")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("user store failure")]
    Store(#[source] UserStoreError),
}

impl From<UserStoreError> for AuthError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::Duplicate => AuthError::UserExists,
            err => AuthError::Store(err),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

fn invalid(field: &'static str, reason: &str) -> AuthError {
    AuthError::InvalidField {
        field,
        reason: reason.to_string(),
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("email", "must contain '@'"))?;
    let well_formed = !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty());
    if !well_formed {
        return Err(invalid("email", "is not a valid address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(invalid(
            "password",
            &format!("must be at least {PASSWORD_MIN_LENGTH} characters"),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic())
        || !password.chars().any(|c| c.is_ascii_digit())
        || !password
            .chars()
            .any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(c))
    {
        return Err(invalid(
            "password",
            &format!("must contain a letter, a digit and one of {PASSWORD_SPECIAL_CHARACTERS}"),
        ));
    }
    Ok(())
}

/// Identity provider: user signup, password signin and token verification.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    #[instrument(skip_all)]
    pub async fn signup(&self, new_user: NewUser) -> Result<User, AuthError> {
        let email = normalize_email(&new_user.email);
        if new_user.first_name.trim().is_empty() {
            return Err(invalid("firstName", "must not be empty"));
        }
        if new_user.last_name.trim().is_empty() {
            return Err(invalid("lastName", "must not be empty"));
        }
        validate_email(&email)?;
        validate_password(&new_user.password)?;

        let salt = SaltString::generate(&mut OsRng);
        let passphrase_hash = Argon2::default()
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|_| AuthError::Hash)?
            .to_string();

        let user = User {
            id: Uuid::new_v4(),
            email,
            first_name: new_user.first_name.trim().to_string(),
            last_name: new_user.last_name.trim().to_string(),
            created_at: Utc::now(),
        };
        let credentials = UserCredentials {
            user_id: user.id,
            passphrase_hash,
        };
        self.store.insert_user(&user, &credentials).await?;

        info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    /// Unknown users and wrong passwords are indistinguishable to the caller.
    #[instrument(skip_all)]
    pub async fn signin(&self, email: &str, password: &str) -> Result<AccessToken, AuthError> {
        let email = normalize_email(email);
        let Some((user, credentials)) = self.store.find_by_email(&email).await? else {
            warn!("signin for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        let verified = PasswordHash::new(&credentials.passphrase_hash)
            .map(|hash| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &hash)
                    .is_ok()
            })
            .unwrap_or(false);
        if !verified {
            warn!(user_id = %user.id, "signin with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(self.tokens.issue(&user.id)?)
    }

    pub fn verify_token(&self, token: &str) -> Result<Uuid, AuthError> {
        self.tokens.verify(token).ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::store::MemoryUserStore;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUserStore::new()),
            TokenIssuer::new(b"secret", TimeDelta::hours(8)),
        )
    }

    fn new_user(email: &str, password: &str) -> NewUser {
        NewUser {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane@example.com").is_ok());
        for email in ["jane", "@example.com", "jane@example", "jane@.com", "ja ne@example.com", "a@b@c.com"] {
            assert!(validate_email(email).is_err(), "{email:?} should be rejected");
        }
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Password123$").is_ok());
        for password in ["Pass123$", "Password1234", "Password$$$$", "123456789$$$"] {
            assert!(
                matches!(
                    validate_password(password),
                    Err(AuthError::InvalidField { field: "password", .. })
                ),
                "{password:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_signup_then_signin() {
        let service = service();

        let user = service
            .signup(new_user(" Jane@Example.com ", "Password123$"))
            .await
            .unwrap();
        assert_eq!(user.email, "jane@example.com");

        let token = service
            .signin("jane@example.com", "Password123$")
            .await
            .unwrap();
        assert_eq!(service.verify_token(&token.access_token).unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let service = service();
        service
            .signup(new_user("jane@example.com", "Password123$"))
            .await
            .unwrap();

        let err = service
            .signup(new_user("JANE@example.com", "Password456$"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserExists));
    }

    #[tokio::test]
    async fn test_signup_rejects_blank_names() {
        let service = service();
        let mut user = new_user("jane@example.com", "Password123$");
        user.first_name = " ".to_string();

        let err = service.signup(user).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidField { field: "firstName", .. }));
    }

    #[tokio::test]
    async fn test_signin_rejects_wrong_password_and_unknown_user() {
        let service = service();
        service
            .signup(new_user("jane@example.com", "Password123$"))
            .await
            .unwrap();

        assert!(matches!(
            service.signin("jane@example.com", "Password124$").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.signin("john@example.com", "Password123$").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_token_rejects_garbage() {
        assert!(matches!(
            service().verify_token("garbage"),
            Err(AuthError::InvalidToken)
        ));
    }
}

//! Authentication service - accounts, credentials and tokens.
//!
//! Access and refresh tokens are HS256 JWTs signed with separate secrets and
//! carry a `typ` claim, so one kind can never stand in for the other.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, TOKEN_TYPE_BEARER};
use crate::domain::policy::{self, Action};
use crate::domain::{Actor, NewUser, Password, Profile, User, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Which secret signed a token and where it may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: UserRole,
    pub typ: TokenKind,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn actor(&self) -> Actor {
        Actor::new(self.sub, self.role)
    }
}

/// Token pair returned after login or refresh
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token lifetime in seconds
    #[schema(example = 900)]
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Fields for a new student or instructor account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Self-service student signup
    async fn register_student(&self, registration: Registration) -> AppResult<User>;

    /// Exchange a username or email plus password for a token pair
    async fn login(&self, identifier: String, password: String) -> AppResult<TokenResponse>;

    /// Exchange a refresh token for a fresh token pair
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse>;

    /// Admin-only creation of an instructor account
    async fn create_instructor(&self, actor: Actor, registration: Registration) -> AppResult<User>;

    /// Create the configured bootstrap admin unless an admin already exists.
    /// Returns whether an account was created.
    async fn ensure_admin(&self) -> AppResult<bool>;

    /// Verify an access token and extract its claims
    fn verify_access_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.config.jwt_secret_bytes(),
            TokenKind::Refresh => self.config.jwt_refresh_secret_bytes(),
        }
    }

    fn sign(&self, user: &User, kind: TokenKind, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            typ: kind,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        )?)
    }

    fn verify(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret(kind)),
            &Validation::default(),
        )?
        .claims;

        if claims.typ != kind {
            tracing::debug!(expected = ?kind, got = ?claims.typ, "Token type mismatch");
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }

    fn issue_tokens(&self, user: User) -> AppResult<TokenResponse> {
        let access_ttl = Duration::minutes(self.config.access_token_minutes);
        let refresh_ttl = Duration::days(self.config.refresh_token_days);

        Ok(TokenResponse {
            access_token: self.sign(&user, TokenKind::Access, access_ttl)?,
            refresh_token: self.sign(&user, TokenKind::Refresh, refresh_ttl)?,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: access_ttl.num_seconds(),
            user: UserResponse::from(user),
        })
    }

    async fn create_account(&self, registration: Registration, role: UserRole) -> AppResult<User> {
        let users = self.uow.users();
        let email = registration.email.trim().to_lowercase();

        if users.username_exists(&registration.username).await? {
            return Err(AppError::conflict("Username"));
        }
        if users.email_exists(&email).await? {
            return Err(AppError::conflict("Email"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = users
            .create(NewUser {
                username: registration.username,
                email,
                password_hash,
                role,
                profile: Profile {
                    first_name: registration.first_name,
                    last_name: registration.last_name,
                    ..Default::default()
                },
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "Account created");
        Ok(user)
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register_student(&self, registration: Registration) -> AppResult<User> {
        self.create_account(registration, UserRole::Student).await
    }

    async fn login(&self, identifier: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_login(identifier.trim()).await?;

        // Unknown accounts still pay for a hash verification
        let valid = Password::verify_stored(user.as_ref().map(|u| u.password_hash.as_str()), &password);

        let user = match user {
            Some(user) if valid => user,
            _ => {
                tracing::debug!("Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !user.is_active() {
            return Err(AppError::forbidden(format!("Account is {}", user.status)));
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue_tokens(user)
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let claims = self.verify(refresh_token, TokenKind::Refresh)?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !user.is_active() {
            return Err(AppError::forbidden(format!("Account is {}", user.status)));
        }

        self.issue_tokens(user)
    }

    async fn create_instructor(&self, actor: Actor, registration: Registration) -> AppResult<User> {
        policy::authorize(&actor, Action::ManageUsers)?;
        self.create_account(registration, UserRole::Instructor).await
    }

    async fn ensure_admin(&self) -> AppResult<bool> {
        let users = self.uow.users();
        if users.admin_exists().await? {
            tracing::debug!("Admin account present");
            return Ok(false);
        }

        let admin = &self.config.admin;
        let Some(password) = admin.password() else {
            tracing::warn!("No admin account exists and ADMIN_PASSWORD is not set");
            return Ok(false);
        };

        let password_hash = Password::new(password)?.into_string();
        let user = users
            .create(NewUser {
                username: admin.username.clone(),
                email: admin.email.to_lowercase(),
                password_hash,
                role: UserRole::Admin,
                profile: Profile::default(),
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "Bootstrap admin created");
        Ok(true)
    }

    fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        self.verify(token, TokenKind::Access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserStatus;
    use crate::infra::MockUserRepository;
    use crate::services::testing::{user, MockUow};

    const ACCESS: &str = "test-access-secret-that-is-long-enough";
    const REFRESH: &str = "test-refresh-secret-that-is-long-enough";

    fn service(users: MockUserRepository) -> Authenticator<crate::services::testing::MockedPersistence> {
        let uow = MockUow {
            users,
            ..Default::default()
        }
        .build();
        Authenticator::new(uow, Config::with_secrets(ACCESS, REFRESH))
    }

    fn registration(username: &str, email: &str) -> Registration {
        Registration {
            username: username.into(),
            email: email.into(),
            password: "pw123456".into(),
            first_name: Some("Alice".into()),
            last_name: None,
        }
    }

    fn stored_user(username: &str, password: &str, role: UserRole) -> User {
        let mut u = user(role);
        u.username = username.into();
        u.password_hash = Password::new(password).unwrap().into_string();
        u
    }

    #[tokio::test]
    async fn test_register_student_creates_student_role() {
        let mut users = MockUserRepository::new();
        users.expect_username_exists().returning(|_| Ok(false));
        users.expect_email_exists().returning(|_| Ok(false));
        users
            .expect_create()
            .withf(|u| u.role == UserRole::Student && u.email == "alice@example.com")
            .times(1)
            .returning(|u| {
                let mut created = user(u.role);
                created.username = u.username;
                created.email = u.email;
                Ok(created)
            });

        let created = service(users)
            .register_student(registration("alice", "Alice@Example.com"))
            .await
            .unwrap();
        assert_eq!(created.role, UserRole::Student);
        assert_eq!(created.username, "alice");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let mut users = MockUserRepository::new();
        users.expect_username_exists().returning(|_| Ok(true));
        users.expect_create().never();

        let err = service(users)
            .register_student(registration("alice", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref e) if e == "Username"));
    }

    #[tokio::test]
    async fn test_login_returns_token_pair() {
        let mut users = MockUserRepository::new();
        let alice = stored_user("alice", "pw123456", UserRole::Student);
        users
            .expect_find_by_login()
            .returning(move |_| Ok(Some(alice.clone())));

        let auth = service(users);
        let tokens = auth.login("alice".into(), "pw123456".into()).await.unwrap();

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 15 * 60);
        let claims = auth.verify_access_token(&tokens.access_token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, UserRole::Student);
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_user_look_the_same() {
        let mut users = MockUserRepository::new();
        let alice = stored_user("alice", "pw123456", UserRole::Student);
        users
            .expect_find_by_login()
            .returning(move |login| Ok((login == "alice").then(|| alice.clone())));
        let auth = service(users);

        let wrong = auth.login("alice".into(), "nope-nope".into()).await.unwrap_err();
        let unknown = auth.login("mallory".into(), "pw123456".into()).await.unwrap_err();
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_banned_user_forbidden() {
        let mut users = MockUserRepository::new();
        let mut alice = stored_user("alice", "pw123456", UserRole::Student);
        alice.status = UserStatus::Banned;
        users
            .expect_find_by_login()
            .returning(move |_| Ok(Some(alice.clone())));

        let err = service(users)
            .login("alice".into(), "pw123456".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let mut users = MockUserRepository::new();
        let alice = stored_user("alice", "pw123456", UserRole::Student);
        let id = alice.id;
        let same = alice.clone();
        users
            .expect_find_by_login()
            .returning(move |_| Ok(Some(alice.clone())));
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(same.clone())));

        let auth = service(users);
        let tokens = auth.login("alice".into(), "pw123456".into()).await.unwrap();

        assert!(auth.verify_access_token(&tokens.refresh_token).is_err());
        assert!(auth.refresh(&tokens.access_token).await.is_err());

        let renewed = auth.refresh(&tokens.refresh_token).await.unwrap();
        assert_eq!(auth.verify_access_token(&renewed.access_token).unwrap().sub, id);
    }

    #[tokio::test]
    async fn test_create_instructor_requires_admin() {
        let mut users = MockUserRepository::new();
        users.expect_create().never();
        let auth = service(users);

        let instructor = Actor::new(Uuid::new_v4(), UserRole::Instructor);
        let err = auth
            .create_instructor(instructor, registration("bob", "bob@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let mut users = MockUserRepository::new();
        users.expect_admin_exists().times(1).returning(|| Ok(true));
        users.expect_create().never();

        let uow = MockUow {
            users,
            ..Default::default()
        }
        .build();
        let config = Config::with_secrets(ACCESS, REFRESH).with_admin_password("admin-pass-123");
        let created = Authenticator::new(uow, config).ensure_admin().await.unwrap();
        assert!(!created);
    }

    #[tokio::test]
    async fn test_ensure_admin_creates_bootstrap_account() {
        let mut users = MockUserRepository::new();
        users.expect_admin_exists().returning(|| Ok(false));
        users
            .expect_create()
            .withf(|u| u.role == UserRole::Admin && u.username == "admin")
            .times(1)
            .returning(|u| Ok(user(u.role)));

        let uow = MockUow {
            users,
            ..Default::default()
        }
        .build();
        let config = Config::with_secrets(ACCESS, REFRESH).with_admin_password("admin-pass-123");
        assert!(Authenticator::new(uow, config).ensure_admin().await.unwrap());
    }
}

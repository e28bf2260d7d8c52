use crate::conf::MockConf;
use crate::error::{DataError, DataResult};
use crate::store::HostedClient;
use crate::trace::spawn_blocking_with_tracing;
use anyhow::Context;
use async_trait::async_trait;
use interfacing::{timestamp, LoginForm, Profile, Role};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl From<LoginForm> for Credentials {
    fn from(form: LoginForm) -> Self {
        Self {
            username: form.username,
            password: form.password,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Authentication failed")]
    InvalidCredentials(#[source] anyhow::Error),

    #[error("Username is taken")]
    UsernameTaken,

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl From<DataError> for AuthError {
    fn from(value: DataError) -> Self {
        Self::UnexpectedError(value.into())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Session-style authentication with the same two-backend split as the
/// store: [`MockAuth`] simulates everything in memory, [`HostedAuth`]
/// talks to the hosted auth API.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Opens a session. Unknown username and wrong password both come back
    /// as [`AuthError::InvalidCredentials`].
    async fn sign_in(&self, credentials: Credentials) -> AuthResult<Profile>;

    /// Registers a new account and signs it in right away.
    async fn sign_up(&self, credentials: Credentials) -> AuthResult<Profile>;

    /// Drops the session. The account itself stays.
    async fn sign_out(&self);

    async fn current_profile(&self) -> DataResult<Option<Profile>>;

    async fn is_admin(&self) -> DataResult<bool> {
        Ok(self
            .current_profile()
            .await?
            .map_or(false, |profile| profile.is_admin()))
    }
}

// accounts register with a bare username, the backing auth API wants an email
fn synth_email(username: &str) -> String {
    format!("{username}@example.com")
}

/// In-memory account directory plus a single session slot.
pub struct MockAuth {
    directory: RwLock<Directory>,
    session: RwLock<Option<Profile>>,
    fallback_hash: SecretString,
    latency: Duration,
}

struct Directory {
    users: Vec<UserRecord>,
    next_user_id: u64,
}

struct UserRecord {
    profile: Profile,
    password_hash: SecretString,
}

impl Directory {
    fn find(&self, username: &str) -> Option<&UserRecord> {
        self.users
            .iter()
            .find(|record| record.profile.username == username)
    }

    fn take_user_id(&mut self) -> String {
        let id = self.next_user_id.to_string();
        self.next_user_id += 1;
        id
    }
}

impl MockAuth {
    /// Seeded with the well-known `admin` account.
    pub fn new(conf: &MockConf) -> anyhow::Result<Self> {
        let admin = UserRecord {
            profile: Profile {
                id: "1".into(),
                username: "admin".into(),
                email: synth_email("admin"),
                role: Role::Admin,
                created_at: timestamp::formatted_now(),
            },
            password_hash: auth::hash_pwd(b"admin123")
                .context("Failed to hash the seeded admin password")?
                .into(),
        };

        Self::with_directory(
            conf,
            Directory {
                users: vec![admin],
                next_user_id: 2,
            },
        )
    }

    /// Empty directory. The first account registered becomes the admin.
    pub fn unseeded(conf: &MockConf) -> anyhow::Result<Self> {
        Self::with_directory(
            conf,
            Directory {
                users: vec![],
                next_user_id: 1,
            },
        )
    }

    fn with_directory(conf: &MockConf, directory: Directory) -> anyhow::Result<Self> {
        Ok(Self {
            directory: RwLock::new(directory),
            session: RwLock::new(None),
            // parseable stand-in so unknown usernames still pay for a verify
            fallback_hash: auth::hash_pwd(b"fallback")?.into(),
            latency: conf.latency(),
        })
    }

    async fn round_trip(&self) {
        tokio::time::sleep(self.latency).await;
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    #[tracing::instrument(name = "Sign in", skip_all, fields(username = %credentials.username))]
    async fn sign_in(&self, credentials: Credentials) -> AuthResult<Profile> {
        self.round_trip().await;

        let (profile, expected_hash) = {
            let directory = self.directory.read().await;
            match directory.find(&credentials.username) {
                Some(record) => (Some(record.profile.clone()), record.password_hash.clone()),
                // unknown users still pay for a full verify
                None => (None, self.fallback_hash.clone()),
            }
        };

        let password = credentials.password;
        let verified = spawn_blocking_with_tracing(move || {
            auth::verify_pwd(
                password.expose_secret().as_bytes(),
                expected_hash.expose_secret(),
            )
        })
        .await
        .context("Failed to spawn a password verification task")??;

        match (verified, profile) {
            (true, Some(profile)) => {
                *self.session.write().await = Some(profile.clone());
                Ok(profile)
            }
            _ => Err(AuthError::InvalidCredentials(anyhow::anyhow!(
                "Unknown username or wrong password"
            ))),
        }
    }

    #[tracing::instrument(name = "Sign up", skip_all, fields(username = %credentials.username))]
    async fn sign_up(&self, credentials: Credentials) -> AuthResult<Profile> {
        self.round_trip().await;

        let mut directory = self.directory.write().await;
        if directory.find(&credentials.username).is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let password = credentials.password;
        let password_hash: SecretString = spawn_blocking_with_tracing(move || {
            auth::hash_pwd(password.expose_secret().as_bytes())
        })
        .await
        .context("Failed to spawn a password hashing task")??
        .into();

        // the first account registered becomes the admin
        let role = if directory.users.is_empty() {
            Role::Admin
        } else {
            Role::User
        };

        let profile = Profile {
            id: directory.take_user_id(),
            username: credentials.username.clone(),
            email: synth_email(&credentials.username),
            role,
            created_at: timestamp::formatted_now(),
        };

        directory.users.push(UserRecord {
            profile: profile.clone(),
            password_hash,
        });
        *self.session.write().await = Some(profile.clone());

        Ok(profile)
    }

    #[tracing::instrument(name = "Sign out", skip_all)]
    async fn sign_out(&self) {
        self.round_trip().await;
        *self.session.write().await = None;
    }

    #[tracing::instrument(name = "Current profile", skip_all)]
    async fn current_profile(&self) -> DataResult<Option<Profile>> {
        self.round_trip().await;
        Ok(self.session.read().await.clone())
    }
}

/// Auth API client. The bearer token of the open session lives here,
/// the account records live on the server.
pub struct HostedAuth {
    client: Arc<HostedClient>,
    token: RwLock<Option<SecretString>>,
}

#[derive(serde::Deserialize)]
struct TokenPayload {
    access_token: SecretString,
}

#[derive(serde::Deserialize)]
struct AuthUser {
    id: String,
}

impl HostedAuth {
    pub fn new(client: Arc<HostedClient>) -> Self {
        Self {
            client,
            token: RwLock::new(None),
        }
    }

    async fn store_session(&self, payload: TokenPayload) -> AuthResult<Profile> {
        *self.token.write().await = Some(payload.access_token);

        self.current_profile()
            .await?
            .context("Session opened but no profile row exists")
            .map_err(AuthError::UnexpectedError)
    }

    async fn profile_by_id(&self, id: &str, token: &SecretString) -> DataResult<Option<Profile>> {
        let rows: Vec<Profile> = self
            .client
            .request(Method::GET, self.client.rest_url("profiles"))
            .bearer_auth(token.expose_secret())
            .query(&[
                ("select", "*".to_owned()),
                ("id", format!("eq.{id}")),
                ("limit", "1".to_owned()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl AuthProvider for HostedAuth {
    #[tracing::instrument(name = "Sign in", skip_all, fields(username = %credentials.username))]
    async fn sign_in(&self, credentials: Credentials) -> AuthResult<Profile> {
        let response = self
            .client
            .request(Method::POST, self.client.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({
                "email": synth_email(&credentials.username),
                "password": credentials.password.expose_secret(),
            }))
            .send()
            .await
            .context("Failed to reach the auth API")?;

        if matches!(
            response.status(),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED
        ) {
            return Err(AuthError::InvalidCredentials(anyhow::anyhow!(
                "The auth API rejected the credentials"
            )));
        }

        let payload: TokenPayload = response
            .error_for_status()
            .context("Token request failed")?
            .json()
            .await
            .context("Malformed token payload")?;

        self.store_session(payload).await
    }

    #[tracing::instrument(name = "Sign up", skip_all, fields(username = %credentials.username))]
    async fn sign_up(&self, credentials: Credentials) -> AuthResult<Profile> {
        let response = self
            .client
            .request(Method::POST, self.client.auth_url("signup"))
            .json(&serde_json::json!({
                "email": synth_email(&credentials.username),
                "password": credentials.password.expose_secret(),
            }))
            .send()
            .await
            .context("Failed to reach the auth API")?;

        // an already registered email answers 422
        if response.status() == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(AuthError::UsernameTaken);
        }

        let payload: TokenPayload = response
            .error_for_status()
            .context("Signup request failed")?
            .json()
            .await
            .context("Malformed signup payload")?;

        self.store_session(payload).await
    }

    #[tracing::instrument(name = "Sign out", skip_all)]
    async fn sign_out(&self) {
        let token = self.token.write().await.take();

        if let Some(token) = token {
            let outcome = self
                .client
                .request(Method::POST, self.client.auth_url("logout"))
                .bearer_auth(token.expose_secret())
                .send()
                .await
                .and_then(|response| response.error_for_status());

            // the local session is gone either way
            if let Err(e) = outcome {
                tracing::warn!("Logout call failed: {e}");
            }
        }
    }

    #[tracing::instrument(name = "Current profile", skip_all)]
    async fn current_profile(&self) -> DataResult<Option<Profile>> {
        let token = match self.token.read().await.clone() {
            Some(token) => token,
            None => return Ok(None),
        };

        let response = self
            .client
            .request(Method::GET, self.client.auth_url("user"))
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        // an expired or revoked token reads as signed out
        if response.status() == StatusCode::UNAUTHORIZED {
            *self.token.write().await = None;
            return Ok(None);
        }

        let user: AuthUser = response.error_for_status()?.json().await?;
        self.profile_by_id(&user.id, &token).await
    }
}

//! Account boundary used by the landing screen.
//!
//! The editor itself never talks to an identity service; it only asks a
//! [`GetStartedGate`] whether someone is signed in.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use thiserror::Error;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Password must be at least {0} characters long.")]
    WeakPassword(usize),

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("User already registered")]
    AlreadyRegistered,

    #[error("Invalid or expired recovery link")]
    InvalidToken,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Authentication provider error: {0}")]
    Provider(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub last_sign_in: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: AuthUser,
    pub access_token: String,
}

/// Operations an identity service offers
pub trait AuthProvider: Send + Sync {
    fn sign_up(&self, email: &str, password: &str) -> AuthResult<AuthUser>;
    fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession>;
    fn sign_out(&self) -> AuthResult<()>;
    /// Returns the recovery token that would be mailed to the user
    fn request_password_reset(&self, email: &str) -> AuthResult<String>;
    fn verify_recovery_token(&self, token: &str) -> AuthResult<AuthSession>;
    fn update_password(&self, new_password: &str) -> AuthResult<AuthUser>;
    fn current_user(&self) -> Option<AuthUser>;
}

pub fn validate_email(email: &str) -> AuthResult<()> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid { Ok(()) } else { Err(AuthError::InvalidEmail) }
}

pub fn validate_password(password: &str) -> AuthResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Accounts {
    users: HashMap<String, (AuthUser, String)>,
    recovery: HashMap<String, String>,
    session: Option<AuthSession>,
}

/// Provider keeping accounts in memory, for offline use and tests
#[derive(Debug, Default)]
pub struct MemoryAuthProvider {
    accounts: Mutex<Accounts>,
}

impl MemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn open_session(accounts: &mut Accounts, email: &str) -> AuthResult<AuthSession> {
        let (user, _) = accounts.users.get_mut(email).ok_or(AuthError::InvalidCredentials)?;
        user.last_sign_in = Some(Utc::now());
        let session = AuthSession {
            user: user.clone(),
            access_token: Uuid::new_v4().simple().to_string(),
        };
        accounts.session = Some(session.clone());
        Ok(session)
    }
}

impl AuthProvider for MemoryAuthProvider {
    fn sign_up(&self, email: &str, password: &str) -> AuthResult<AuthUser> {
        validate_email(email)?;
        validate_password(password)?;
        let email = email.trim().to_lowercase();
        let mut accounts = self.accounts.lock();
        if accounts.users.contains_key(&email) {
            return Err(AuthError::AlreadyRegistered);
        }
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: email.clone(),
            last_sign_in: None,
        };
        accounts.users.insert(email, (user.clone(), password.to_owned()));
        log::info!("Signed up {}", user.email);
        Ok(user)
    }

    fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        let email = email.trim().to_lowercase();
        let mut accounts = self.accounts.lock();
        match accounts.users.get(&email) {
            Some((_, stored)) if stored == password => {}
            _ => return Err(AuthError::InvalidCredentials),
        }
        Self::open_session(&mut accounts, &email)
    }

    fn sign_out(&self) -> AuthResult<()> {
        self.accounts
            .lock()
            .session
            .take()
            .map(|_| ())
            .ok_or(AuthError::NotSignedIn)
    }

    fn request_password_reset(&self, email: &str) -> AuthResult<String> {
        validate_email(email)?;
        let email = email.trim().to_lowercase();
        let mut accounts = self.accounts.lock();
        if !accounts.users.contains_key(&email) {
            return Err(AuthError::InvalidCredentials);
        }
        let token = Uuid::new_v4().simple().to_string();
        accounts.recovery.insert(token.clone(), email);
        Ok(token)
    }

    fn verify_recovery_token(&self, token: &str) -> AuthResult<AuthSession> {
        let mut accounts = self.accounts.lock();
        let email = accounts.recovery.remove(token).ok_or(AuthError::InvalidToken)?;
        Self::open_session(&mut accounts, &email)
    }

    fn update_password(&self, new_password: &str) -> AuthResult<AuthUser> {
        validate_password(new_password)?;
        let mut accounts = self.accounts.lock();
        let email = accounts
            .session
            .as_ref()
            .map(|s| s.user.email.clone())
            .ok_or(AuthError::NotSignedIn)?;
        let (user, password) = accounts.users.get_mut(&email).ok_or(AuthError::NotSignedIn)?;
        *password = new_password.to_owned();
        Ok(user.clone())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.accounts.lock().session.as_ref().map(|s| s.user.clone())
    }
}

/// Where the "Get started" button leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetStarted {
    OpenEditor,
    ShowSignIn,
}

pub struct GetStartedGate<'a> {
    provider: &'a dyn AuthProvider,
}

impl<'a> GetStartedGate<'a> {
    pub fn new(provider: &'a dyn AuthProvider) -> Self {
        Self { provider }
    }

    pub fn destination(&self) -> GetStarted {
        match self.provider.current_user() {
            Some(_) => GetStarted::OpenEditor,
            None => GetStarted::ShowSignIn,
        }
    }
}

//! Error types for the account layer.

use codebreak_domain::ErrorKind;

/// Errors from account creation, login and session resolution.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// A blank or missing username on registration.
    #[error("username required")]
    UsernameRequired,

    /// The password is shorter than the minimum length.
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    /// Another account already owns this username.
    #[error("username already exists")]
    UsernameTaken,

    /// No account with this username.
    #[error("account not found")]
    AccountNotFound,

    /// Username exists but the password does not match. Worded the same
    /// as a hash failure would be; callers only see the kind.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The session token is unknown or was logged out.
    #[error("invalid session")]
    InvalidSession,

    /// The password hasher rejected its input. Not a caller mistake.
    #[error("unable to hash password")]
    Hashing,
}

impl AccountError {
    /// Classification for the HTTP layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UsernameRequired | Self::PasswordTooShort(_) | Self::UsernameTaken => {
                ErrorKind::InvalidInput
            }
            Self::AccountNotFound => ErrorKind::NotFound,
            Self::InvalidCredentials | Self::InvalidSession => ErrorKind::Unauthorized,
            Self::Hashing => ErrorKind::Internal,
        }
    }
}

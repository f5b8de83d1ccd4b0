//! Login credentials for staff accounts.
//!
//! Handlers parse form input into [`LoginCredentials`] before talking to the
//! login port so blank submissions never reach the data API.

use std::fmt;

use zeroize::Zeroizing;

/// Raised when submitted login form values are unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email address was missing or blank once trimmed.
    EmptyEmailAddress,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmailAddress => write!(f, "You must provide an email address"),
            Self::EmptyPassword => write!(f, "You must provide your password"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// The email address is trimmed; the password is kept as typed and wiped from
/// memory on drop.
///
/// # Examples
/// ```
/// use marketplace_admin::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ops@example.gov ", "pw").unwrap();
/// assert_eq!(creds.email_address(), "ops@example.gov");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email_address: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form values.
    pub fn try_from_parts(
        email_address: &str,
        password: &str,
    ) -> Result<Self, LoginValidationError> {
        let email_address = email_address.trim();
        if email_address.is_empty() {
            return Err(LoginValidationError::EmptyEmailAddress);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email_address: email_address.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email_address(&self) -> &str {
        &self.email_address
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

//! Administrative roles carried by signed-in staff accounts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A recognised administrative role.
///
/// Role strings that do not parse into one of these variants grant nothing:
/// callers hold an `Option<Role>` and `None` fails every gate.
///
/// # Examples
/// ```
/// use marketplace_admin::domain::Role;
///
/// let role: Role = "admin-ccs-sourcing".parse().unwrap();
/// assert_eq!(role, Role::AdminCcsSourcing);
/// assert!("supplier".parse::<Role>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    AdminCcsCategory,
    AdminCcsSourcing,
    AdminFrameworkManager,
    AdminManager,
}

impl Role {
    /// Every recognised role, in declaration order.
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::AdminCcsCategory,
        Role::AdminCcsSourcing,
        Role::AdminFrameworkManager,
        Role::AdminManager,
    ];

    /// Wire representation used by the data API and the session cookie.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::AdminCcsCategory => "admin-ccs-category",
            Self::AdminCcsSourcing => "admin-ccs-sourcing",
            Self::AdminFrameworkManager => "admin-framework-manager",
            Self::AdminManager => "admin-manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a role string is not an administrative role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| UnknownRole(value.to_owned()))
    }
}

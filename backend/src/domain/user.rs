//! Staff and marketplace user accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// The signed-in staff member, as stored in the session cookie.
///
/// The raw role string is kept so an unrecognised role survives the session
/// round trip and keeps failing every gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: u64,
    pub name: String,
    pub email_address: String,
    pub role: String,
}

impl AdminUser {
    /// Parsed role, or `None` when the stored string is not an admin role.
    ///
    /// # Examples
    /// ```
    /// use marketplace_admin::domain::{AdminUser, Role};
    ///
    /// let mut user = AdminUser {
    ///     id: 1,
    ///     name: "Ops".into(),
    ///     email_address: "ops@example.gov".into(),
    ///     role: "admin-manager".into(),
    /// };
    /// assert_eq!(user.role(), Some(Role::AdminManager));
    /// user.role = "buyer".into();
    /// assert_eq!(user.role(), None);
    /// ```
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// Supplier reference attached to a supplier user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRef {
    pub supplier_id: u64,
    pub name: String,
}

/// A marketplace user account as returned by the data API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: u64,
    pub name: String,
    pub email_address: String,
    pub role: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub supplier: Option<SupplierRef>,
    pub active: bool,
    pub locked: bool,
    #[serde(default)]
    pub personal_data_removed: bool,
    #[serde(default)]
    pub user_research_opted_in: bool,
    #[serde(default)]
    pub logged_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub password_changed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Account state changes offered on the user lookup page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountAction {
    Unlock,
    Deactivate,
    Activate,
}

impl AccountAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unlock => "unlock",
            Self::Deactivate => "deactivate",
            Self::Activate => "activate",
        }
    }
}

impl UserAccount {
    /// Actions that apply to the account in its current state.
    ///
    /// Accounts whose personal data has been removed can only be deactivated.
    pub fn available_actions(&self) -> Vec<AccountAction> {
        let mut actions = Vec::new();
        if self.locked && !self.personal_data_removed {
            actions.push(AccountAction::Unlock);
        }
        if self.active {
            actions.push(AccountAction::Deactivate);
        } else if !self.personal_data_removed {
            actions.push(AccountAction::Activate);
        }
        actions
    }
}

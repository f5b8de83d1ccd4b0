//! Route gates: which roles may reach each administrative page.
//!
//! Dashboard links are resolved separately in [`crate::domain::visibility`];
//! the gates here protect the pages those links point at.

use super::Role;

/// A protected group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// The home dashboard.
    Dashboard,
    /// `GET /admin/users`.
    FindUsers,
    /// Supplier contact lists for a framework.
    FrameworkUserLists,
    /// Supplier user research participant lists.
    UserResearchDownloads,
    /// Buyer CSV export.
    BuyerListDownload,
    /// Read-only service pages.
    ViewServices,
    /// Service document replacement.
    EditServiceDocuments,
    /// Framework communications and clarifications.
    ManageCommunications,
}

use Role::{Admin, AdminCcsCategory, AdminCcsSourcing, AdminFrameworkManager, AdminManager};

impl Gate {
    /// Roles admitted through this gate.
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::Dashboard => &[
                Admin,
                AdminCcsCategory,
                AdminCcsSourcing,
                AdminFrameworkManager,
                AdminManager,
            ],
            Self::FindUsers => &[Admin, AdminCcsCategory],
            Self::FrameworkUserLists => &[AdminCcsCategory, AdminFrameworkManager],
            Self::UserResearchDownloads => &[Admin],
            Self::BuyerListDownload => &[Admin, AdminFrameworkManager],
            Self::ViewServices => &[Admin, AdminCcsCategory, AdminFrameworkManager],
            Self::EditServiceDocuments => &[Admin, AdminCcsCategory],
            Self::ManageCommunications => &[AdminFrameworkManager],
        }
    }

    /// Whether `role` passes the gate. `None` never does.
    ///
    /// # Examples
    /// ```
    /// use marketplace_admin::domain::{Gate, Role};
    ///
    /// assert!(Gate::FindUsers.permits(Some(Role::Admin)));
    /// assert!(!Gate::FindUsers.permits(Some(Role::AdminManager)));
    /// assert!(!Gate::Dashboard.permits(None));
    /// ```
    pub fn permits(self, role: Option<Role>) -> bool {
        role.is_some_and(|role| self.allowed_roles().contains(&role))
    }
}

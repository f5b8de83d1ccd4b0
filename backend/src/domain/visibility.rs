//! Dashboard visibility rules.
//!
//! One declarative table decides which global links, section headers, and
//! per-framework actions each role sees on the home dashboard. Resolution is
//! a pure function of the role and the framework list.

use serde::Serialize;

use super::{Framework, FrameworkStatus, Role, framework::newest_first};

/// Section headers on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Header {
    UserSupport,
    ManageApplications,
}

/// Links that do not depend on any framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalLink {
    AddBuyerEmailDomain,
    FindUserByEmail,
    ManageAdminUsers,
    CheckServiceEdits,
    FindBuyerByOpportunityId,
    DownloadBuyersList,
    BuyerResearchParticipants,
    SupplierResearchParticipants,
    FindSuppliersAndServices,
}

/// Actions listed under a framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameworkAction {
    Agreements,
    ApplicationStatistics,
    UploadCommunications,
    ContactSuppliers,
}

struct Grant {
    role: Role,
    label: &'static str,
}

const fn grant(role: Role, label: &'static str) -> Grant {
    Grant { role, label }
}

struct HeaderRule {
    header: Header,
    title: &'static str,
    roles: &'static [Role],
}

struct LinkRule {
    link: GlobalLink,
    href: &'static str,
    grants: &'static [Grant],
}

struct ActionRule {
    action: FrameworkAction,
    statuses: &'static [FrameworkStatus],
    grants: &'static [Grant],
}

use Role::{Admin, AdminCcsCategory, AdminCcsSourcing, AdminFrameworkManager, AdminManager};

const HEADER_RULES: &[HeaderRule] = &[
    HeaderRule {
        header: Header::UserSupport,
        title: "User support",
        roles: &[Admin, AdminCcsCategory, AdminCcsSourcing, AdminFrameworkManager],
    },
    HeaderRule {
        header: Header::ManageApplications,
        title: "Manage applications",
        roles: &[AdminCcsCategory, AdminCcsSourcing, AdminFrameworkManager],
    },
];

const LINK_RULES: &[LinkRule] = &[
    LinkRule {
        link: GlobalLink::AddBuyerEmailDomain,
        href: "/admin/buyers/add-buyer-domains",
        grants: &[grant(Admin, "Add a buyer email domain")],
    },
    LinkRule {
        link: GlobalLink::FindUserByEmail,
        href: "/admin/users",
        grants: &[
            grant(Admin, "Find a user by email"),
            grant(AdminCcsCategory, "Find a user by email"),
        ],
    },
    LinkRule {
        link: GlobalLink::ManageAdminUsers,
        href: "/admin/admin-users",
        grants: &[grant(AdminManager, "Manage admin users")],
    },
    LinkRule {
        link: GlobalLink::CheckServiceEdits,
        href: "/admin/services/updates/unapproved",
        grants: &[grant(AdminCcsCategory, "Check service edits")],
    },
    LinkRule {
        link: GlobalLink::FindBuyerByOpportunityId,
        href: "/admin/buyers",
        grants: &[
            grant(Admin, "Find a buyer by opportunity ID"),
            grant(AdminCcsCategory, "Find a buyer by opportunity ID"),
        ],
    },
    LinkRule {
        link: GlobalLink::DownloadBuyersList,
        href: "/admin/users/download/buyers",
        grants: &[grant(AdminFrameworkManager, "Download list of buyers")],
    },
    LinkRule {
        link: GlobalLink::BuyerResearchParticipants,
        href: "/admin/users/download/buyers",
        grants: &[grant(
            Admin,
            "Download list of potential user research participants",
        )],
    },
    LinkRule {
        link: GlobalLink::SupplierResearchParticipants,
        href: "/admin/users/download/suppliers",
        grants: &[grant(
            Admin,
            "Download lists of potential user research participants",
        )],
    },
    LinkRule {
        link: GlobalLink::FindSuppliersAndServices,
        href: "/admin/find-suppliers-and-services",
        grants: &[
            grant(Admin, "Edit supplier accounts or view services"),
            grant(AdminCcsCategory, "Edit suppliers and services"),
            grant(AdminCcsSourcing, "Edit supplier declarations"),
            grant(AdminFrameworkManager, "View suppliers and services"),
        ],
    },
];

const ACTION_RULES: &[ActionRule] = &[
    ActionRule {
        action: FrameworkAction::Agreements,
        statuses: &FrameworkStatus::AGREEMENTS,
        grants: &[
            grant(AdminCcsCategory, "View agreements"),
            grant(AdminCcsSourcing, "Countersign agreements"),
            grant(AdminFrameworkManager, "View agreements"),
        ],
    },
    ActionRule {
        action: FrameworkAction::ApplicationStatistics,
        statuses: &FrameworkStatus::ACTIVE,
        grants: &[
            grant(AdminCcsSourcing, "View application statistics"),
            grant(AdminFrameworkManager, "View application statistics"),
        ],
    },
    ActionRule {
        action: FrameworkAction::UploadCommunications,
        statuses: &FrameworkStatus::ACTIVE,
        grants: &[grant(AdminFrameworkManager, "Upload communications")],
    },
    ActionRule {
        action: FrameworkAction::ContactSuppliers,
        statuses: &FrameworkStatus::ACTIVE,
        grants: &[grant(AdminFrameworkManager, "Contact suppliers")],
    },
];

fn label_for(grants: &[Grant], role: Role) -> Option<&'static str> {
    grants
        .iter()
        .find(|grant| grant.role == role)
        .map(|grant| grant.label)
}

fn action_href(action: FrameworkAction, framework: &Framework) -> String {
    let slug = framework.slug.as_str();
    match action {
        FrameworkAction::Agreements if framework.framework_agreement_version.is_some() => {
            format!("/admin/frameworks/{slug}/agreements")
        }
        FrameworkAction::Agreements => format!("/admin/agreements/{slug}"),
        FrameworkAction::ApplicationStatistics => format!("/admin/statistics/{slug}"),
        FrameworkAction::UploadCommunications => format!("/admin/communications/{slug}"),
        FrameworkAction::ContactSuppliers => format!("/admin/frameworks/{slug}/users"),
    }
}

/// A header the role may see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleHeader {
    pub header: Header,
    pub title: &'static str,
}

/// A global link with its role-dependent label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleLink {
    pub link: GlobalLink,
    pub label: &'static str,
    pub href: &'static str,
}

/// A framework action with its role-dependent label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleAction {
    pub action: FrameworkAction,
    pub label: &'static str,
    pub href: String,
}

/// Actions available for one framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkPanel {
    pub slug: String,
    pub name: String,
    pub status: FrameworkStatus,
    pub actions: Vec<VisibleAction>,
}

/// Everything the dashboard shows for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub headers: Vec<VisibleHeader>,
    pub links: Vec<VisibleLink>,
    pub frameworks: Vec<FrameworkPanel>,
}

impl Dashboard {
    /// Label of `link`, if visible.
    pub fn link(&self, link: GlobalLink) -> Option<&VisibleLink> {
        self.links.iter().find(|visible| visible.link == link)
    }

    /// Whether `header` is visible.
    pub fn has_header(&self, header: Header) -> bool {
        self.headers.iter().any(|visible| visible.header == header)
    }

    /// Every visible framework action across all panels.
    pub fn actions(&self) -> impl Iterator<Item = &VisibleAction> {
        self.frameworks.iter().flat_map(|panel| panel.actions.iter())
    }
}

/// Resolve the dashboard for `role`.
///
/// Frameworks that are `coming`, `expired`, or unknown are dropped, as are
/// frameworks with no visible action. Panels are ordered newest first. A
/// missing role yields an empty dashboard.
///
/// # Examples
/// ```
/// use marketplace_admin::domain::{
///     visible_actions, Framework, FrameworkAction, FrameworkStatus, Role,
/// };
///
/// let frameworks = vec![Framework {
///     id: 1,
///     slug: "g-cloud-10".into(),
///     name: "G-Cloud 10".into(),
///     status: FrameworkStatus::Standstill,
///     framework_agreement_version: None,
/// }];
///
/// let dashboard = visible_actions(Some(Role::AdminCcsSourcing), &frameworks);
/// let agreements = dashboard
///     .actions()
///     .find(|a| a.action == FrameworkAction::Agreements)
///     .unwrap();
/// assert_eq!(agreements.label, "Countersign agreements");
///
/// let dashboard = visible_actions(Some(Role::Admin), &frameworks);
/// assert!(dashboard.actions().next().is_none());
/// ```
pub fn visible_actions(role: Option<Role>, frameworks: &[Framework]) -> Dashboard {
    let Some(role) = role else {
        return Dashboard::default();
    };

    let headers = HEADER_RULES
        .iter()
        .filter(|rule| rule.roles.contains(&role))
        .map(|rule| VisibleHeader {
            header: rule.header,
            title: rule.title,
        })
        .collect();

    let links = LINK_RULES
        .iter()
        .filter_map(|rule| {
            label_for(rule.grants, role).map(|label| VisibleLink {
                link: rule.link,
                label,
                href: rule.href,
            })
        })
        .collect();

    let mut ordered: Vec<Framework> = frameworks
        .iter()
        .filter(|framework| framework.status.is_active())
        .cloned()
        .collect();
    newest_first(&mut ordered);

    let frameworks = ordered
        .into_iter()
        .filter_map(|framework| {
            let actions: Vec<VisibleAction> = ACTION_RULES
                .iter()
                .filter(|rule| rule.statuses.contains(&framework.status))
                .filter_map(|rule| {
                    label_for(rule.grants, role).map(|label| VisibleAction {
                        action: rule.action,
                        label,
                        href: action_href(rule.action, &framework),
                    })
                })
                .collect();
            (!actions.is_empty()).then(|| FrameworkPanel {
                slug: framework.slug,
                name: framework.name,
                status: framework.status,
                actions,
            })
        })
        .collect();

    Dashboard {
        headers,
        links,
        frameworks,
    }
}

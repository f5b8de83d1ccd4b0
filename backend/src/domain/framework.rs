//! Procurement frameworks as read from the data API.
//!
//! The admin application never changes framework status; the data API owns
//! the lifecycle and this module only classifies what it reports.

use serde::{Deserialize, Serialize};

/// Slug kept available for reports after expiry.
pub const REPORTS_AFTER_EXPIRY_SLUG: &str = "digital-outcomes-and-specialists-2";

/// Framework lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkStatus {
    Coming,
    Open,
    Pending,
    Standstill,
    Live,
    Expired,
    /// A status this application does not know about; treated like `coming`.
    #[serde(other)]
    Unknown,
}

impl FrameworkStatus {
    /// Statuses for which a framework appears on the dashboard at all.
    pub const ACTIVE: [FrameworkStatus; 4] = [
        FrameworkStatus::Open,
        FrameworkStatus::Pending,
        FrameworkStatus::Standstill,
        FrameworkStatus::Live,
    ];

    /// Statuses in which agreements have been signed.
    pub const AGREEMENTS: [FrameworkStatus; 2] =
        [FrameworkStatus::Standstill, FrameworkStatus::Live];

    /// Whether the dashboard lists the framework.
    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }
}

/// A framework record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Framework {
    /// Ordering key; larger ids are newer frameworks.
    #[serde(default)]
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub status: FrameworkStatus,
    #[serde(default)]
    pub framework_agreement_version: Option<String>,
}

impl Framework {
    /// Whether supplier lists and research exports may be downloaded.
    ///
    /// # Examples
    /// ```
    /// use marketplace_admin::domain::{Framework, FrameworkStatus};
    ///
    /// let mut framework = Framework {
    ///     id: 9,
    ///     slug: "g-cloud-9".into(),
    ///     name: "G-Cloud 9".into(),
    ///     status: FrameworkStatus::Live,
    ///     framework_agreement_version: None,
    /// };
    /// assert!(framework.reports_available());
    /// framework.status = FrameworkStatus::Expired;
    /// assert!(!framework.reports_available());
    /// ```
    pub fn reports_available(&self) -> bool {
        match self.status {
            FrameworkStatus::Coming | FrameworkStatus::Expired | FrameworkStatus::Unknown => {
                self.slug == REPORTS_AFTER_EXPIRY_SLUG
            }
            _ => true,
        }
    }
}

/// Order frameworks newest first by `id`, keeping input order for ties.
pub fn newest_first(frameworks: &mut [Framework]) {
    frameworks.sort_by(|a, b| b.id.cmp(&a.id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn framework(id: u64, slug: &str, status: FrameworkStatus) -> Framework {
        Framework {
            id,
            slug: slug.to_owned(),
            name: slug.to_owned(),
            status,
            framework_agreement_version: None,
        }
    }

    #[rstest]
    #[case("", false)]
    #[case("-2", true)]
    #[case("-3", false)]
    fn only_dos2_stays_available_after_expiry(#[case] suffix: &str, #[case] expected: bool) {
        let slug = format!("digital-outcomes-and-specialists{suffix}");
        let expired = framework(1, &slug, FrameworkStatus::Expired);
        assert_eq!(expired.reports_available(), expected);
    }

    #[rstest]
    #[case(FrameworkStatus::Coming, false)]
    #[case(FrameworkStatus::Open, true)]
    #[case(FrameworkStatus::Pending, true)]
    #[case(FrameworkStatus::Standstill, true)]
    #[case(FrameworkStatus::Live, true)]
    #[case(FrameworkStatus::Expired, false)]
    fn report_availability_follows_status(
        #[case] status: FrameworkStatus,
        #[case] expected: bool,
    ) {
        assert_eq!(framework(1, "g-cloud-9", status).reports_available(), expected);
    }

    #[rstest]
    fn newest_first_is_stable_for_equal_ids() {
        let mut frameworks = vec![
            framework(1, "a", FrameworkStatus::Live),
            framework(3, "b", FrameworkStatus::Live),
            framework(1, "c", FrameworkStatus::Live),
        ];
        newest_first(&mut frameworks);
        let slugs: Vec<_> = frameworks.iter().map(|f| f.slug.as_str()).collect();
        assert_eq!(slugs, ["b", "a", "c"]);
    }

    #[rstest]
    fn unknown_statuses_deserialise() {
        let framework: Framework = serde_json::from_str(
            r#"{"id": 4, "slug": "x", "name": "X", "status": "archived"}"#,
        )
        .expect("framework");
        assert_eq!(framework.status, FrameworkStatus::Unknown);
        assert!(!framework.status.is_active());
    }
}

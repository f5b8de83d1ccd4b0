//! Supplier report locations and the buyer list export.

use super::{Framework, UserAccount};

/// Pre-generated supplier reports kept in the reports bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierReport {
    /// Every supplier user account on the framework.
    AllEmailAccounts,
    /// Official contact details declared by each supplier.
    OfficialDetails,
    /// Supplier users who agreed to take part in user research.
    UserResearch,
}

impl SupplierReport {
    /// Object path of the report for `framework_slug`.
    ///
    /// # Examples
    /// ```
    /// use marketplace_admin::domain::SupplierReport;
    ///
    /// assert_eq!(
    ///     SupplierReport::OfficialDetails.object_path("g-cloud-9"),
    ///     "g-cloud-9/reports/official-details-for-suppliers-g-cloud-9.csv"
    /// );
    /// ```
    pub fn object_path(self, framework_slug: &str) -> String {
        let stem = match self {
            Self::AllEmailAccounts => "all-email-accounts-for-suppliers",
            Self::OfficialDetails => "official-details-for-suppliers",
            Self::UserResearch => "user-research-suppliers-on",
        };
        format!("{framework_slug}/reports/{stem}-{framework_slug}.csv")
    }
}

/// Frameworks offering research participant downloads, sorted by name.
pub fn research_frameworks(frameworks: &[Framework]) -> Vec<&Framework> {
    let mut available: Vec<&Framework> = frameworks
        .iter()
        .filter(|framework| framework.reports_available())
        .collect();
    available.sort_by(|a, b| a.name.cmp(&b.name));
    available
}

pub const BUYER_CSV_HEADER: [&str; 4] = ["email address", "name", "phone number", "created at"];

/// Render buyer accounts as CSV.
///
/// With `research_only` set, buyers who have not opted in to user research
/// are left out.
pub fn buyer_csv(buyers: &[UserAccount], research_only: bool) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(BUYER_CSV_HEADER)?;
    for buyer in buyers
        .iter()
        .filter(|buyer| !research_only || buyer.user_research_opted_in)
    {
        let created_at = buyer
            .created_at
            .map(|at| at.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_default();
        writer.write_record([
            buyer.email_address.as_str(),
            buyer.name.as_str(),
            buyer.phone_number.as_deref().unwrap_or_default(),
            created_at.as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|error| csv::Error::from(error.into_error()))
}

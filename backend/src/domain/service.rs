//! Supplier services as read from the data API.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Field patch sent to the data API when a service is updated.
pub type ServicePatch = Map<String, Value>;

/// Identifier of a service.
///
/// The data API reports ids as strings for newer frameworks and as integers
/// for older ones; both forms deserialise into the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ServiceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(number) => Self(number.to_string()),
        })
    }
}

/// A service record. Fields the admin application does not interpret are
/// kept verbatim in `fields` so views can show them unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    pub supplier_id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Service {
    /// Current URL of a document field; `null` and empty strings count as
    /// absent.
    ///
    /// # Examples
    /// ```
    /// use marketplace_admin::domain::Service;
    /// use serde_json::json;
    ///
    /// let service: Service = serde_json::from_value(json!({
    ///     "id": 1,
    ///     "supplierId": 2,
    ///     "pricingDocumentURL": "http://assets/documents/1/2-pricing.pdf",
    ///     "sfiaRateDocumentURL": null,
    /// })).unwrap();
    /// assert!(service.document_url("pricingDocumentURL").is_some());
    /// assert!(service.document_url("sfiaRateDocumentURL").is_none());
    /// ```
    pub fn document_url(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }

    /// Copy of the service with `patch` applied on top.
    #[must_use]
    pub fn with_patch(&self, patch: &ServicePatch) -> Self {
        let mut patched = self.clone();
        for (key, value) in patch {
            patched.fields.insert(key.clone(), value.clone());
        }
        patched
    }
}

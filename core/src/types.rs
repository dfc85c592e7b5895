//! DTOs for the PAPI property version endpoints.
//!
//! # Design
//! Request types carry path and query parameters and are never serialized,
//! except `PropertyVersionCreate` which is the POST body. Response types
//! mirror the vendor JSON; every field defaults when absent so a partial
//! document still decodes. The mock-server crate defines its own copies;
//! integration tests catch schema drift.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Query parameters for `GET /papi/v1/properties/{propertyId}/versions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetPropertyVersionsRequest {
    pub property_id: String,
    pub contract_id: String,
    pub group_id: String,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Parameters for `GET /papi/v1/properties/{propertyId}/versions/latest`.
///
/// Without `activated_on` the server returns the latest version overall.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetLatestVersionRequest {
    pub property_id: String,
    pub contract_id: String,
    pub group_id: String,
    pub activated_on: Option<ActivationNetwork>,
}

/// Parameters for `GET /papi/v1/properties/{propertyId}/versions/{propertyVersion}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetPropertyVersionRequest {
    pub property_id: String,
    pub property_version: u32,
    pub contract_id: String,
    pub group_id: String,
}

/// Parameters and body for `POST /papi/v1/properties/{propertyId}/versions`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatePropertyVersionRequest {
    pub property_id: String,
    pub contract_id: String,
    pub group_id: String,
    pub version: PropertyVersionCreate,
}

/// JSON body of the create request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyVersionCreate {
    pub create_from_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_from_version_etag: Option<String>,
}

/// Network a version may be active on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationNetwork {
    Production,
    Staging,
}

impl ActivationNetwork {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivationNetwork::Production => "PRODUCTION",
            ActivationNetwork::Staging => "STAGING",
        }
    }
}

impl fmt::Display for ActivationNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activation status of a version on one network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionStatus {
    Active,
    Inactive,
    Pending,
    Deactivated,
    Failed,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Envelope returned by the list, latest and single-version endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetPropertyVersionsResponse {
    pub property_id: String,
    pub property_name: String,
    pub account_id: String,
    pub contract_id: String,
    pub group_id: String,
    pub asset_id: String,
    pub versions: PropertyVersionItems,
}

impl GetPropertyVersionsResponse {
    /// The first item, which is the requested version for latest and get.
    pub fn version(&self) -> Option<&PropertyVersionGetItem> {
        self.versions.items.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyVersionItems {
    pub items: Vec<PropertyVersionGetItem>,
}

/// One property version as returned by GET.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyVersionGetItem {
    pub etag: String,
    pub note: String,
    pub product_id: String,
    pub production_status: VersionStatus,
    pub property_version: u32,
    pub rule_format: String,
    pub staging_status: VersionStatus,
    pub updated_by_user: String,
    pub updated_date: String,
}

/// Result of creating a version. `property_version` is not sent by the
/// server; it is extracted from `version_link`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyVersionResponse {
    pub version_link: String,
    #[serde(skip)]
    pub property_version: u32,
}

//! Azure API type definitions

use serde::Deserialize;

// ============ Entra ID ============

/// OAuth2 token endpoint success response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// OAuth2 token endpoint error response.
#[derive(Debug, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

// ============ Resource Manager ============

/// One page of `Zones - List`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneListResult {
    #[serde(default)]
    pub value: Vec<ArmZone>,
    pub next_link: Option<String>,
}

/// A DNS zone resource.
#[derive(Debug, Deserialize)]
pub struct ArmZone {
    pub name: String,
    #[serde(default)]
    pub properties: Option<ZoneProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneProperties {
    #[serde(default)]
    pub name_servers: Option<Vec<String>>,
}

/// Resource Manager error envelope.
#[derive(Debug, Deserialize)]
pub struct ArmErrorResponse {
    pub error: ArmErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ArmErrorDetail {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}

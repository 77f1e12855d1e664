//! Cloudflare API v4 wire types

use serde::{Deserialize, Serialize};

/// Envelope of a `GET /zones/{zone}/dns_records` response
#[derive(Debug, Deserialize)]
pub struct ListRecordsResponse {
    #[serde(default)]
    pub success: Option<bool>,
    pub result: Option<Vec<CloudflareDnsRecord>>,
    pub errors: Option<Vec<CloudflareApiError>>,
    pub result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareApiError {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

/// Pagination metadata attached to list responses
#[derive(Debug, Deserialize)]
pub struct ResultInfo {
    #[allow(dead_code)]
    #[serde(default)]
    pub page: u32,
    #[allow(dead_code)]
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[allow(dead_code)]
    #[serde(default)]
    pub total_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareDnsRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub content: String,
}

/// Body of `PUT /zones/{zone}/dns_records/{id}`
#[derive(Debug, Serialize)]
pub struct UpdateRecordRequest<'a> {
    pub content: String,
    pub name: &'a str,
    pub proxied: bool,
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub comment: &'a str,
}

//! Site-wide settings edited from the admin dashboard.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Settings stored as a single object under `kyucsa_settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub site_name: String,
    pub tagline: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    /// Platform name to profile URL
    pub social_links: BTreeMap<String, String>,
    pub ai_chat_enabled: bool,
    /// Banner shown across public pages when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_notice: Option<String>,
}

pub const SETTINGS_KEY: &str = "kyucsa_settings";

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "KYUCSA".to_string(),
            tagline: "Kyambogo University Computing Students' Association".to_string(),
            contact_email: "info@kyucsa.org".to_string(),
            contact_phone: String::new(),
            address: "Kyambogo University, Kampala".to_string(),
            social_links: BTreeMap::new(),
            ai_chat_enabled: false,
            maintenance_notice: None,
        }
    }
}

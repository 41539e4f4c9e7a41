//! Leadership roster partitioned by cabinet year.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A cabinet member, president or executive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipMember {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// One cabinet year's roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CabinetTerm {
    #[serde(default)]
    pub president: Option<LeadershipMember>,
    #[serde(default)]
    pub executives: Vec<LeadershipMember>,
}

/// Cabinet year string (e.g. "2025-2026") to roster. Year keys are not validated.
pub type LeadershipBook = BTreeMap<String, CabinetTerm>;

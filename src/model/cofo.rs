//! Governor CofO register payloads.
//!
//! The list and detail endpoints share one shape; list rows simply leave
//! the detail-only fields out.
use super::application::{CofoDocument, LandRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CofoHolder {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CofoHolder {
    /// Full name, else first and last name, else email, else id.
    pub fn display_name(&self) -> String {
        if let Some(name) = self
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            return name.to_string();
        }
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.is_empty() {
            return joined;
        }
        self.email
            .as_deref()
            .filter(|email| !email.trim().is_empty())
            .unwrap_or(&self.id)
            .to_string()
    }
}

/// Staff member currently holding the application.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CurrentReviewer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ministry: Option<String>,
}

/// One stage of the processing history.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcessingLog {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_number: Option<u64>,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorCofo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_number: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<CofoHolder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land: Option<LandRef>,
    #[serde(rename = "cofODocuments", default)]
    pub documents: Vec<CofoDocument>,
    #[serde(default)]
    pub logs: Vec<ProcessingLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_reviewer: Option<CurrentReviewer>,
    #[serde(rename = "cofONumber", default, skip_serializing_if = "Option::is_none")]
    pub cofo_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governor_signature_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_by_id: Option<String>,
}

impl GovernorCofo {
    /// Application number, falling back to the id.
    pub fn reference(&self) -> &str {
        self.application_number
            .as_deref()
            .filter(|number| !number.trim().is_empty())
            .unwrap_or(&self.id)
    }

    /// Case-insensitive status match, e.g. `approved` for `APPROVED`.
    pub fn has_status(&self, status: &str) -> bool {
        self.status.trim().eq_ignore_ascii_case(status.trim())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CofoPageMeta {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub limit: u64,
}

/// One page of the governor CofO register.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GovernorCofoPage {
    #[serde(default)]
    pub results: Vec<GovernorCofo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<CofoPageMeta>,
}

/// The detail endpoint may wrap the record in `{ "cofO": ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GovernorCofoResponse {
    Wrapped {
        #[serde(rename = "cofO")]
        cofo: GovernorCofo,
    },
    Bare(GovernorCofo),
}

impl GovernorCofoResponse {
    pub fn into_cofo(self) -> GovernorCofo {
        match self {
            GovernorCofoResponse::Wrapped { cofo } | GovernorCofoResponse::Bare(cofo) => cofo,
        }
    }
}

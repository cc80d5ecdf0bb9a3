//! CofO application, document and audit payloads.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Application lifecycle status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Draft,
    InReview,
    NeedsCorrection,
    Resubmitted,
    Approved,
    RejectedFinal,
}

impl ApplicationStatus {
    /// Return the wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "DRAFT",
            ApplicationStatus::InReview => "IN_REVIEW",
            ApplicationStatus::NeedsCorrection => "NEEDS_CORRECTION",
            ApplicationStatus::Resubmitted => "RESUBMITTED",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::RejectedFinal => "REJECTED_FINAL",
        }
    }

    /// Human label, e.g. `NEEDS CORRECTION`.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Approved | ApplicationStatus::RejectedFinal
        )
    }

    /// Whether reviewers may submit application-level decisions.
    pub fn accepts_decisions(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::InReview
                | ApplicationStatus::NeedsCorrection
                | ApplicationStatus::Resubmitted
        )
    }

    /// Transition table for backend-confirmed status changes.
    ///
    /// `IN_REVIEW -> IN_REVIEW` is the multi-stage advance; the correction
    /// loop is the only way back from `NEEDS_CORRECTION`.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        match self {
            Draft => next == InReview,
            InReview => matches!(next, InReview | NeedsCorrection | Approved | RejectedFinal),
            NeedsCorrection => matches!(next, Resubmitted | NeedsCorrection | RejectedFinal),
            Resubmitted => matches!(next, InReview | NeedsCorrection | Approved | RejectedFinal),
            Approved | RejectedFinal => false,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-document review status. Absent, null and unrecognized values read as
/// `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    pub fn from_wire(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("APPROVED") {
            DocumentStatus::Approved
        } else if raw.eq_ignore_ascii_case("REJECTED") {
            DocumentStatus::Rejected
        } else {
            DocumentStatus::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "PENDING",
            DocumentStatus::Approved => "APPROVED",
            DocumentStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DocumentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(DocumentStatus::from_wire)
            .unwrap_or_default())
    }
}

/// A document uploaded against a CofO application.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CofoDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_message: Option<String>,
}

impl CofoDocument {
    pub fn display_name(&self) -> &str {
        [self.title.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditApplicationRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_number: Option<String>,
}

/// Append-only approval audit entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalAudit {
    pub id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "cofO", default, skip_serializing_if = "Option::is_none")]
    pub application: Option<AuditApplicationRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantRef {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl ApplicantRef {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StateRef {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LandRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateRef>,
}

/// Full application as returned by the review endpoint.
///
/// Documents and audits are owned by the application and only ever replaced
/// wholesale by a re-fetch.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForReview {
    pub id: String,
    #[serde(default)]
    pub application_number: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ApplicantRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land: Option<LandRef>,
    #[serde(rename = "cofODocuments", default)]
    pub documents: Vec<CofoDocument>,
    #[serde(rename = "approvalAudits", default)]
    pub audits: Vec<ApprovalAudit>,
}

impl ApplicationForReview {
    pub fn document(&self, document_id: &str) -> Option<&CofoDocument> {
        self.documents.iter().find(|doc| doc.id == document_id)
    }
}

/// Row in the reviewer's application list.
///
/// The list endpoint mixes workflow and inbox statuses, so the status stays
/// a display string here.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ApplicantRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land: Option<LandRef>,
}

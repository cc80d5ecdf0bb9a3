//! Ownership transfer payloads reviewed by the governor.
use super::DocumentStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    PendingGovernor,
    Approved,
    Rejected,
}

impl TransferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::PendingGovernor => "PENDING_GOVERNOR",
            TransferStatus::Approved => "APPROVED",
            TransferStatus::Rejected => "REJECTED",
        }
    }

    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_message: Option<String>,
}

impl TransferDocument {
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferLand {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_meters: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipTransfer {
    pub id: String,
    pub status: TransferStatus,
    #[serde(default)]
    pub created_at: String,
    pub land: TransferLand,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_owner: Option<OwnerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_owner_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_owner_phone: Option<String>,
    #[serde(default)]
    pub documents: Vec<TransferDocument>,
}

impl OwnershipTransfer {
    pub fn document(&self, document_id: &str) -> Option<&TransferDocument> {
        self.documents.iter().find(|doc| doc.id == document_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TransferSummary {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub rejected: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TransferBuckets {
    #[serde(default)]
    pub pending: Vec<OwnershipTransfer>,
    #[serde(default)]
    pub approved: Vec<OwnershipTransfer>,
    #[serde(default)]
    pub rejected: Vec<OwnershipTransfer>,
    #[serde(default)]
    pub all: Vec<OwnershipTransfer>,
}

/// Response of the governor transfer list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GovernorTransferList {
    #[serde(default)]
    pub summary: TransferSummary,
    #[serde(default)]
    pub transfers: TransferBuckets,
}

/// The review endpoint wraps the transfer in `{ "transfer": ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferEnvelope {
    pub transfer: OwnershipTransfer,
}

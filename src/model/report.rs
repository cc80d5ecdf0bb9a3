//! Read-only dashboard and governor report rows.
//!
//! Aggregates are computed by the backend; these types only fix the field
//! names and fill absent counters with zero.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDashboardStats {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    pending: Option<u64>,
    #[serde(default)]
    approved: Option<u64>,
    #[serde(default)]
    needs_correction: Option<u64>,
    #[serde(default)]
    rejected: Option<u64>,
    #[serde(default)]
    completed: Option<u64>,
    #[serde(default, rename = "COMPLETED")]
    completed_upper: Option<u64>,
    #[serde(default)]
    resubmitted: Option<u64>,
    #[serde(default, rename = "RESUBMITTED")]
    resubmitted_upper: Option<u64>,
}

/// Dashboard counters, normalized across the reviewer and governor shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "RawDashboardStats", rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub needs_correction: u64,
    pub rejected: u64,
    pub completed: u64,
    pub resubmitted: u64,
}

impl From<RawDashboardStats> for DashboardStats {
    fn from(raw: RawDashboardStats) -> Self {
        Self {
            total: raw.total.unwrap_or(0),
            pending: raw.pending.unwrap_or(0),
            approved: raw.approved.unwrap_or(0),
            needs_correction: raw.needs_correction.unwrap_or(0),
            rejected: raw.rejected.unwrap_or(0),
            completed: raw.completed.or(raw.completed_upper).unwrap_or(0),
            resubmitted: raw.resubmitted.or(raw.resubmitted_upper).unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxApplicant {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxApplication {
    pub id: String,
    #[serde(default)]
    pub application_number: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<InboxApplicant>,
}

/// A per-actor notification of an application awaiting that actor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxTask {
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "cofOId", default)]
    pub application_id: String,
    #[serde(rename = "cofO", default, skip_serializing_if = "Option::is_none")]
    pub application: Option<InboxApplication>,
}

impl InboxTask {
    pub fn application_number(&self) -> &str {
        self.application
            .as_ref()
            .map(|app| app.application_number.as_str())
            .filter(|number| !number.is_empty())
            .unwrap_or(&self.application_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(rename = "cofOId", default)]
    pub application_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MonthlyTrend {
    pub month: String,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub rejected: u64,
    #[serde(default)]
    pub pending: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorStatusReport {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub in_review: u64,
    #[serde(default)]
    pub needs_correction: u64,
    #[serde(default)]
    pub resubmitted: u64,
    #[serde(default)]
    pub approved: u64,
    #[serde(default)]
    pub rejected: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingTimeReport {
    #[serde(default)]
    pub approved_count: u64,
    #[serde(default)]
    pub average_processing_days: f64,
}

/// Per-location totals; the grouping keys vary by backend version.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocationReport {
    #[serde(default)]
    pub total: u64,
    #[serde(flatten)]
    pub keys: BTreeMap<String, serde_json::Value>,
}

pub type TrendReport = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReviewerPerformance {
    pub reviewer: String,
    #[serde(default)]
    pub handled: u64,
    #[serde(default)]
    pub corrections: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproverPerformance {
    pub approver: String,
    #[serde(default)]
    pub total_handled: u64,
    #[serde(default)]
    pub avg_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDelayReport {
    pub stage: u32,
    #[serde(default)]
    pub avg_hours: f64,
    #[serde(default)]
    pub total_handled: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxBacklogItem {
    pub approver: String,
    #[serde(rename = "cofOId")]
    pub application_id: String,
    #[serde(default)]
    pub hours_waiting: f64,
    #[serde(default)]
    pub status: String,
}

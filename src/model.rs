//! Typed backend payloads.
//!
//! The backend is loosely typed (missing document statuses, optional owner
//! fields, mixed-case report keys). These types pin the shapes down at the
//! deserialization boundary so call sites never re-derive defaults.
pub(crate) mod application;
pub(crate) mod cofo;
pub(crate) mod report;
pub(crate) mod transfer;

pub use application::{
    ApplicationForReview, ApplicationStatus, ApplicationSummary, ApprovalAudit, CofoDocument,
    DocumentStatus,
};
pub use cofo::{GovernorCofo, GovernorCofoPage, GovernorCofoResponse};
pub use report::{
    ActivityLog, ApproverPerformance, DashboardStats, GovernorStatusReport, InboxBacklogItem,
    InboxTask, LocationReport, MonthlyTrend, ProcessingTimeReport, ReviewerPerformance,
    StageDelayReport, TrendReport,
};
pub use transfer::{
    GovernorTransferList, OwnershipTransfer, TransferDocument, TransferEnvelope, TransferStatus,
    TransferSummary,
};

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;

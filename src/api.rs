//! Backend API seam.
//!
//! [`ReviewApi`] is the set of calls the review sessions depend on. The
//! blocking HTTP client implements it for real use; tests substitute a
//! recording fake so decision rules can be checked without a network.
//!
//! | Call | Method & path |
//! |---|---|
//! | reviewer applications | `GET /internal-users/reviewer/applications` |
//! | application for review | `GET /internal-users/review/{id}` |
//! | submit decision | `POST /cofo/review/{id}` |
//! | document status | `POST /internal-users/approve-document/{docId}` |
//! | governor transfers | `GET /ownership/governor/list` |
//! | transfer for review | `GET /ownership/governor/review/{id}` |
//! | approve / reject transfer | `POST /ownership/{id}/approve` \| `/reject` |
//! | transfer document | `POST /ownership/document/{docId}/approve` \| `/reject` |
use crate::decision::transfer::{TransferApproval, TransferDocumentRejection, TransferRejection};
use crate::decision::{DecisionPayload, DocumentStatusUpdate};
use crate::error::Result;
use crate::model::{
    ApplicationForReview, ApplicationSummary, ApprovalAudit, CofoDocument, GovernorTransferList,
    OwnershipTransfer,
};

mod http;
mod reports;

pub use http::HttpApi;

pub trait ReviewApi {
    fn reviewer_applications(&self) -> Result<Vec<ApplicationSummary>>;

    fn application_for_review(&self, application_id: &str) -> Result<ApplicationForReview>;

    /// Submit an application-level decision.
    ///
    /// `Ok(None)` means the backend accepted the decision without returning
    /// an audit entry.
    fn submit_decision(
        &self,
        application_id: &str,
        payload: &DecisionPayload,
    ) -> Result<Option<ApprovalAudit>>;

    fn update_document_status(
        &self,
        document_id: &str,
        update: &DocumentStatusUpdate,
    ) -> Result<Option<CofoDocument>>;

    fn governor_transfers(&self) -> Result<GovernorTransferList>;

    fn transfer_for_review(&self, transfer_id: &str) -> Result<OwnershipTransfer>;

    fn approve_transfer(&self, transfer_id: &str, approval: &TransferApproval) -> Result<()>;

    fn reject_transfer(&self, transfer_id: &str, rejection: &TransferRejection) -> Result<()>;

    fn approve_transfer_document(&self, document_id: &str) -> Result<()>;

    fn reject_transfer_document(
        &self,
        document_id: &str,
        rejection: &TransferDocumentRejection,
    ) -> Result<()>;
}

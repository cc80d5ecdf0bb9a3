//! Approval decision model.
//!
//! A pure projection of an application's status, its documents' statuses
//! and the actor's role into:
//! - which decisions are enabled ([`available_actions`]),
//! - what must hold before a decision may be submitted (`prepare_*`),
//! - the wire payload to submit ([`DecisionPayload`]),
//! - the status the backend is expected to move the application to
//!   ([`ExpectedOutcome`]).
//!
//! Nothing here performs I/O. Every `prepare_*` function either returns a
//! payload or a [`ReviewError::Validation`], so a failed precondition can
//! never reach the network.
//!
//! # Decision Rules
//!
//! ```text
//! approve    : not terminal, no REJECTED document, confirm if any PENDING,
//!              governor must supply a plot number
//! reject     : not terminal, non-blank reason
//! send back  : not terminal, non-blank notes (same REJECT verb on the wire)
//! document   : independent of application status, reject needs a message
//! ```
use crate::error::{Result, ReviewError};
use crate::model::{ApplicationForReview, ApplicationStatus, CofoDocument, DocumentStatus};
use crate::session::Actor;
use serde::{Deserialize, Serialize};

pub mod transfer;

/// Wire verb for application-level decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionAction {
    Approve,
    Reject,
}

/// What the actor meant; send-back and reject share the `REJECT` verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionIntent {
    Approve,
    Reject,
    SendBack,
}

impl DecisionIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionIntent::Approve => "approve",
            DecisionIntent::Reject => "reject",
            DecisionIntent::SendBack => "send back",
        }
    }
}

/// Body of `POST /cofo/review/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPayload {
    pub action: DecisionAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_number: Option<String>,
}

/// Status the backend should report once it confirms a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedOutcome {
    /// A specific status.
    Status(ApplicationStatus),
    /// The next review stage; stage semantics belong to the backend.
    NextStage,
}

impl ExpectedOutcome {
    /// Whether a re-fetched status is consistent with this outcome.
    pub fn matches(&self, previous: ApplicationStatus, observed: ApplicationStatus) -> bool {
        match self {
            ExpectedOutcome::Status(status) => *status == observed,
            ExpectedOutcome::NextStage => {
                observed != ApplicationStatus::RejectedFinal
                    && observed != ApplicationStatus::NeedsCorrection
                    && previous.can_transition_to(observed)
            }
        }
    }
}

/// A validated application-level decision ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub intent: DecisionIntent,
    pub payload: DecisionPayload,
    pub expected: ExpectedOutcome,
}

/// Result of preparing a decision that may need the actor's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared<T> {
    Ready(T),
    /// The actor declined a confirmation; nothing is submitted.
    Declined,
}

/// Blocking yes/no confirmation from the actor.
pub trait Confirm {
    fn confirm(&mut self, title: &str, detail: &str) -> bool;
}

/// Per-document verdict; `PENDING` is never submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentVerdict {
    Approved,
    Rejected,
}

impl From<DocumentVerdict> for DocumentStatus {
    fn from(verdict: DocumentVerdict) -> Self {
        match verdict {
            DocumentVerdict::Approved => DocumentStatus::Approved,
            DocumentVerdict::Rejected => DocumentStatus::Rejected,
        }
    }
}

/// Body of `POST /internal-users/approve-document/{docId}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStatusUpdate {
    pub status: DocumentVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_message: Option<String>,
}

/// Document counts behind the approval gates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentTally {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl DocumentTally {
    pub fn of(documents: &[CofoDocument]) -> Self {
        documents
            .iter()
            .fold(DocumentTally::default(), |mut tally, doc| {
                match doc.status {
                    DocumentStatus::Pending => tally.pending += 1,
                    DocumentStatus::Approved => tally.approved += 1,
                    DocumentStatus::Rejected => tally.rejected += 1,
                }
                tally
            })
    }

    pub fn any_rejected(&self) -> bool {
        self.rejected > 0
    }

    pub fn any_pending(&self) -> bool {
        self.pending > 0
    }
}

pub fn any_rejected(documents: &[CofoDocument]) -> bool {
    documents
        .iter()
        .any(|doc| doc.status == DocumentStatus::Rejected)
}

pub fn any_pending(documents: &[CofoDocument]) -> bool {
    documents
        .iter()
        .any(|doc| doc.status == DocumentStatus::Pending)
}

/// Enabled-action projection for one application and actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvailableActions {
    pub approve: bool,
    pub reject: bool,
    pub send_back: bool,
    pub document_actions: bool,
    /// Approval will ask for confirmation because documents are pending.
    pub approve_needs_confirmation: bool,
    pub plot_number_required: bool,
}

pub fn available_actions(application: &ApplicationForReview, actor: &Actor) -> AvailableActions {
    let open = application.status.accepts_decisions();
    let tally = DocumentTally::of(&application.documents);
    AvailableActions {
        approve: open && !tally.any_rejected(),
        reject: open,
        send_back: open,
        document_actions: true,
        approve_needs_confirmation: open && !tally.any_rejected() && tally.any_pending(),
        plot_number_required: open && actor.is_governor(),
    }
}

pub fn ensure_open(application: &ApplicationForReview, intent: DecisionIntent) -> Result<()> {
    let status = application.status;
    if status.is_terminal() {
        return Err(ReviewError::validation(format!(
            "cannot {} application {}: status {} is final",
            intent.as_str(),
            application.id,
            status
        )));
    }
    if !status.accepts_decisions() {
        return Err(ReviewError::validation(format!(
            "cannot {} application {}: status {} is not under review",
            intent.as_str(),
            application.id,
            status
        )));
    }
    Ok(())
}

/// Return the trimmed text, or `None` when blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Validate and build an approval.
///
/// Rejected documents block outright; pending documents only ask the actor
/// to confirm. Governors sign off terminally and must supply a plot number.
pub fn prepare_approval(
    application: &ApplicationForReview,
    actor: &Actor,
    notes: &str,
    plot_number: Option<&str>,
    confirm: &mut dyn Confirm,
) -> Result<Prepared<Decision>> {
    ensure_open(application, DecisionIntent::Approve)?;
    if any_rejected(&application.documents) {
        return Err(ReviewError::validation(
            "Cannot Approve: one or more documents have been rejected. Please resolve before approving.",
        ));
    }
    if any_pending(&application.documents)
        && !confirm.confirm(
            "Some documents are still pending",
            "Do you want to proceed to approve the application anyway?",
        )
    {
        return Ok(Prepared::Declined);
    }

    let (plot_number, expected) = if actor.is_governor() {
        let plot_number = non_blank(plot_number).ok_or_else(|| {
            ReviewError::validation(
                "Missing Plot Number: please provide the plot number before approving.",
            )
        })?;
        (
            Some(plot_number.to_string()),
            ExpectedOutcome::Status(ApplicationStatus::Approved),
        )
    } else {
        (None, ExpectedOutcome::NextStage)
    };

    Ok(Prepared::Ready(Decision {
        intent: DecisionIntent::Approve,
        payload: DecisionPayload {
            action: DecisionAction::Approve,
            message: Some(notes.to_string()),
            plot_number,
        },
        expected,
    }))
}

/// Validate and build a final rejection.
pub fn prepare_rejection(
    application: &ApplicationForReview,
    _actor: &Actor,
    reason: Option<&str>,
) -> Result<Decision> {
    ensure_open(application, DecisionIntent::Reject)?;
    let reason = non_blank(reason)
        .ok_or_else(|| ReviewError::validation("a rejection reason is required"))?;
    Ok(Decision {
        intent: DecisionIntent::Reject,
        payload: DecisionPayload {
            action: DecisionAction::Reject,
            message: Some(reason.to_string()),
            plot_number: None,
        },
        expected: ExpectedOutcome::Status(ApplicationStatus::RejectedFinal),
    })
}

/// Validate and build a send-back for correction.
///
/// The wire payload is identical to a rejection; the backend infers intent.
pub fn prepare_send_back(
    application: &ApplicationForReview,
    _actor: &Actor,
    correction_notes: Option<&str>,
) -> Result<Decision> {
    ensure_open(application, DecisionIntent::SendBack)?;
    let notes = non_blank(correction_notes)
        .ok_or_else(|| ReviewError::validation("correction notes are required"))?;
    Ok(Decision {
        intent: DecisionIntent::SendBack,
        payload: DecisionPayload {
            action: DecisionAction::Reject,
            message: Some(notes.to_string()),
            plot_number: None,
        },
        expected: ExpectedOutcome::Status(ApplicationStatus::NeedsCorrection),
    })
}

/// Approving a document is always allowed, including one already approved.
pub fn prepare_document_approval(_document: &CofoDocument) -> DocumentStatusUpdate {
    DocumentStatusUpdate {
        status: DocumentVerdict::Approved,
        rejection_message: None,
    }
}

pub fn prepare_document_rejection(
    document: &CofoDocument,
    message: Option<&str>,
) -> Result<DocumentStatusUpdate> {
    let message = non_blank(message).ok_or_else(|| {
        ReviewError::validation(format!(
            "a reason is required to reject {}",
            document.display_name()
        ))
    })?;
    Ok(DocumentStatusUpdate {
        status: DocumentVerdict::Rejected,
        rejection_message: Some(message.to_string()),
    })
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;

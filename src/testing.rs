//! Fixtures and a recording in-memory backend for unit tests.
use crate::api::ReviewApi;
use crate::decision::transfer::{TransferApproval, TransferDocumentRejection, TransferRejection};
use crate::decision::{Confirm, DecisionAction, DecisionPayload, DocumentStatusUpdate};
use crate::error::{Result, ReviewError};
use crate::model::application::{ApplicantRef, AuditApplicationRef, LandRef, StateRef};
use crate::model::transfer::{TransferBuckets, TransferLand};
use crate::model::{
    ApplicationForReview, ApplicationStatus, ApplicationSummary, ApprovalAudit, CofoDocument,
    DocumentStatus, GovernorTransferList, OwnershipTransfer, TransferDocument, TransferStatus,
    TransferSummary,
};
use crate::session::{Actor, Role};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

pub(crate) fn actor(role: Role) -> Actor {
    Actor {
        id: format!("u-{}", role.as_str()),
        email: format!("{}@lands.gov.ng", role.as_str()),
        name: format!("Test {}", role.as_str()),
        role,
    }
}

pub(crate) fn reviewer() -> Actor {
    actor(Role::Reviewer)
}

pub(crate) fn governor() -> Actor {
    actor(Role::Governor)
}

pub(crate) fn document(id: &str, status: DocumentStatus) -> CofoDocument {
    CofoDocument {
        id: id.to_string(),
        name: Some(format!("{id}.pdf")),
        title: Some(format!("Document {id}")),
        doc_type: Some("survey_plan".to_string()),
        url: Some(format!("https://files.example/{id}.pdf")),
        uploaded_at: Some("2026-03-01T10:00:00Z".to_string()),
        status,
        rejection_message: None,
    }
}

pub(crate) fn application(
    id: &str,
    status: ApplicationStatus,
    documents: Vec<CofoDocument>,
) -> ApplicationForReview {
    ApplicationForReview {
        id: id.to_string(),
        application_number: format!("COFO-{id}"),
        status,
        created_at: "2026-03-01T09:00:00Z".to_string(),
        updated_at: "2026-03-02T09:00:00Z".to_string(),
        user: Some(ApplicantRef {
            id: "applicant-1".to_string(),
            email: "applicant@example.ng".to_string(),
            full_name: Some("Chinedu Okafor".to_string()),
        }),
        land: Some(LandRef {
            id: "land-1".to_string(),
            address: Some("4 Unity Close".to_string()),
            state: Some(StateRef {
                id: "state-1".to_string(),
                name: Some("Enugu".to_string()),
            }),
        }),
        documents,
        audits: Vec::new(),
    }
}

pub(crate) fn transfer(
    id: &str,
    status: TransferStatus,
    documents: Vec<TransferDocument>,
) -> OwnershipTransfer {
    OwnershipTransfer {
        id: id.to_string(),
        status,
        created_at: "2026-04-01T08:00:00Z".to_string(),
        land: TransferLand {
            id: "land-9".to_string(),
            address: Some("9 Garden Avenue".to_string()),
            latitude: Some(6.45),
            longitude: Some(7.51),
            square_meters: Some(600.0),
        },
        current_owner: None,
        new_owner_email: Some("buyer@example.ng".to_string()),
        new_owner_phone: None,
        documents,
    }
}

pub(crate) fn transfer_document(id: &str, status: DocumentStatus) -> TransferDocument {
    TransferDocument {
        id: id.to_string(),
        title: Some(format!("Transfer document {id}")),
        doc_type: Some("deed".to_string()),
        url: None,
        status,
        rejection_message: None,
    }
}

/// Confirmation stub that answers with a fixed value and counts prompts.
pub(crate) struct ScriptedConfirm {
    pub(crate) answer: bool,
    pub(crate) asked: usize,
}

impl ScriptedConfirm {
    pub(crate) fn answering(answer: bool) -> Self {
        Self { answer, asked: 0 }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, _title: &str, _detail: &str) -> bool {
        self.asked += 1;
        self.answer
    }
}

/// A mutating call as the fake backend received it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Recorded {
    Decision {
        application_id: String,
        payload: DecisionPayload,
    },
    DocumentStatus {
        document_id: String,
        update: DocumentStatusUpdate,
    },
    ApproveTransfer {
        transfer_id: String,
        approval: TransferApproval,
    },
    RejectTransfer {
        transfer_id: String,
        rejection: TransferRejection,
    },
    ApproveTransferDocument(String),
    RejectTransferDocument {
        document_id: String,
        rejection: TransferDocumentRejection,
    },
}

/// In-memory backend that records every mutation it receives.
#[derive(Default)]
pub(crate) struct FakeApi {
    pub(crate) applications: RefCell<BTreeMap<String, ApplicationForReview>>,
    pub(crate) transfers: RefCell<BTreeMap<String, OwnershipTransfer>>,
    pub(crate) recorded: RefCell<Vec<Recorded>>,
    pub(crate) fail_next: RefCell<Option<ReviewError>>,
    pub(crate) fail_fetches: Cell<bool>,
    pub(crate) fetches: Cell<usize>,
    /// Accept mutations without echoing the audit or document back.
    pub(crate) bare_acks: Cell<bool>,
}

impl FakeApi {
    pub(crate) fn with_application(application: ApplicationForReview) -> Self {
        let api = FakeApi::default();
        api.applications
            .borrow_mut()
            .insert(application.id.clone(), application);
        api
    }

    pub(crate) fn with_transfer(transfer: OwnershipTransfer) -> Self {
        let api = FakeApi::default();
        api.transfers
            .borrow_mut()
            .insert(transfer.id.clone(), transfer);
        api
    }

    pub(crate) fn fail_next_with(&self, err: ReviewError) {
        *self.fail_next.borrow_mut() = Some(err);
    }

    pub(crate) fn recorded(&self) -> Vec<Recorded> {
        self.recorded.borrow().clone()
    }

    fn record(&self, call: Recorded) -> Result<()> {
        self.recorded.borrow_mut().push(call);
        match self.fail_next.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn not_found(what: &str, id: &str) -> ReviewError {
        ReviewError::Request {
            status: Some(404),
            message: format!("{what} {id} not found"),
        }
    }

    fn fetch_guard(&self) -> Result<()> {
        self.fetches.set(self.fetches.get() + 1);
        if self.fail_fetches.get() {
            return Err(ReviewError::Request {
                status: None,
                message: "backend unreachable".to_string(),
            });
        }
        Ok(())
    }
}

impl ReviewApi for FakeApi {
    fn reviewer_applications(&self) -> Result<Vec<ApplicationSummary>> {
        self.fetch_guard()?;
        Ok(self
            .applications
            .borrow()
            .values()
            .map(|app| ApplicationSummary {
                id: app.id.clone(),
                status: app.status.as_str().to_string(),
                created_at: app.created_at.clone(),
                address: None,
                user: app.user.clone(),
                land: app.land.clone(),
            })
            .collect())
    }

    fn application_for_review(&self, application_id: &str) -> Result<ApplicationForReview> {
        self.fetch_guard()?;
        self.applications
            .borrow()
            .get(application_id)
            .cloned()
            .ok_or_else(|| Self::not_found("application", application_id))
    }

    fn submit_decision(
        &self,
        application_id: &str,
        payload: &DecisionPayload,
    ) -> Result<Option<ApprovalAudit>> {
        self.record(Recorded::Decision {
            application_id: application_id.to_string(),
            payload: payload.clone(),
        })?;
        let mut applications = self.applications.borrow_mut();
        let application = applications
            .get_mut(application_id)
            .ok_or_else(|| Self::not_found("application", application_id))?;
        application.status = match (payload.action, payload.plot_number.is_some()) {
            (DecisionAction::Approve, true) => ApplicationStatus::Approved,
            (DecisionAction::Approve, false) => ApplicationStatus::InReview,
            (DecisionAction::Reject, _) => ApplicationStatus::NeedsCorrection,
        };
        let audit = ApprovalAudit {
            id: format!("audit-{}", application.audits.len() + 1),
            created_at: "2026-03-03T12:00:00Z".to_string(),
            status: application.status.as_str().to_string(),
            comment: payload.message.clone(),
            application: Some(AuditApplicationRef {
                id: application.id.clone(),
                application_number: Some(application.application_number.clone()),
            }),
        };
        application.audits.push(audit.clone());
        Ok((!self.bare_acks.get()).then_some(audit))
    }

    fn update_document_status(
        &self,
        document_id: &str,
        update: &DocumentStatusUpdate,
    ) -> Result<Option<CofoDocument>> {
        self.record(Recorded::DocumentStatus {
            document_id: document_id.to_string(),
            update: update.clone(),
        })?;
        let mut applications = self.applications.borrow_mut();
        let document = applications
            .values_mut()
            .flat_map(|app| app.documents.iter_mut())
            .find(|doc| doc.id == document_id)
            .ok_or_else(|| Self::not_found("document", document_id))?;
        document.status = update.status.into();
        document.rejection_message = update.rejection_message.clone();
        Ok((!self.bare_acks.get()).then(|| document.clone()))
    }

    fn governor_transfers(&self) -> Result<GovernorTransferList> {
        self.fetch_guard()?;
        let all = self.transfers.borrow().values().cloned().collect::<Vec<_>>();
        let bucket = |status: TransferStatus| {
            all.iter()
                .filter(|t| t.status == status)
                .cloned()
                .collect::<Vec<_>>()
        };
        let transfers = TransferBuckets {
            pending: bucket(TransferStatus::PendingGovernor),
            approved: bucket(TransferStatus::Approved),
            rejected: bucket(TransferStatus::Rejected),
            all: all.clone(),
        };
        Ok(GovernorTransferList {
            summary: TransferSummary {
                total: all.len() as u64,
                pending: transfers.pending.len() as u64,
                approved: transfers.approved.len() as u64,
                rejected: transfers.rejected.len() as u64,
            },
            transfers,
        })
    }

    fn transfer_for_review(&self, transfer_id: &str) -> Result<OwnershipTransfer> {
        self.fetch_guard()?;
        self.transfers
            .borrow()
            .get(transfer_id)
            .cloned()
            .ok_or_else(|| Self::not_found("transfer", transfer_id))
    }

    fn approve_transfer(&self, transfer_id: &str, approval: &TransferApproval) -> Result<()> {
        self.record(Recorded::ApproveTransfer {
            transfer_id: transfer_id.to_string(),
            approval: approval.clone(),
        })?;
        self.set_transfer_status(transfer_id, TransferStatus::Approved)
    }

    fn reject_transfer(&self, transfer_id: &str, rejection: &TransferRejection) -> Result<()> {
        self.record(Recorded::RejectTransfer {
            transfer_id: transfer_id.to_string(),
            rejection: rejection.clone(),
        })?;
        self.set_transfer_status(transfer_id, TransferStatus::Rejected)
    }

    fn approve_transfer_document(&self, document_id: &str) -> Result<()> {
        self.record(Recorded::ApproveTransferDocument(document_id.to_string()))?;
        self.set_transfer_document(document_id, DocumentStatus::Approved, None)
    }

    fn reject_transfer_document(
        &self,
        document_id: &str,
        rejection: &TransferDocumentRejection,
    ) -> Result<()> {
        self.record(Recorded::RejectTransferDocument {
            document_id: document_id.to_string(),
            rejection: rejection.clone(),
        })?;
        self.set_transfer_document(
            document_id,
            DocumentStatus::Rejected,
            Some(rejection.rejection_message.clone()),
        )
    }
}

impl FakeApi {
    fn set_transfer_status(&self, transfer_id: &str, status: TransferStatus) -> Result<()> {
        let mut transfers = self.transfers.borrow_mut();
        let transfer = transfers
            .get_mut(transfer_id)
            .ok_or_else(|| Self::not_found("transfer", transfer_id))?;
        transfer.status = status;
        Ok(())
    }

    fn set_transfer_document(
        &self,
        document_id: &str,
        status: DocumentStatus,
        message: Option<String>,
    ) -> Result<()> {
        let mut transfers = self.transfers.borrow_mut();
        let document = transfers
            .values_mut()
            .flat_map(|transfer| transfer.documents.iter_mut())
            .find(|doc| doc.id == document_id)
            .ok_or_else(|| Self::not_found("document", document_id))?;
        document.status = status;
        document.rejection_message = message;
        Ok(())
    }
}

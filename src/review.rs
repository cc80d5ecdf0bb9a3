//! Review sessions over one application or one ownership transfer.
//!
//! A session owns the single cached copy of its entity. Decisions go through
//! the decision model first, then exactly one backend call. The cache is
//! never edited locally: it is replaced by a re-fetch after a successful
//! call and left untouched when the call fails. Every mutating method takes
//! `&mut self`, so a session has at most one decision in flight.
use crate::api::ReviewApi;
use crate::decision::transfer::{
    ensure_reviewable, prepare_transfer_approval, prepare_transfer_document_approval,
    prepare_transfer_document_rejection, prepare_transfer_rejection, transfer_actions,
    TransferActions,
};
use crate::decision::{
    available_actions, prepare_approval, prepare_document_approval, prepare_document_rejection,
    ensure_open, prepare_rejection, prepare_send_back, AvailableActions, Confirm, Decision,
    DecisionIntent, ExpectedOutcome, Prepared,
};
use crate::error::{Result, ReviewError};
use crate::model::{
    ApplicationForReview, ApprovalAudit, CofoDocument, DocumentStatus, OwnershipTransfer,
    TransferDocument,
};
use crate::session::Actor;

/// What happened to an application-level decision.
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    Submitted {
        /// Audit entry echoed by the backend, when it returned one.
        audit: Option<ApprovalAudit>,
        expected: ExpectedOutcome,
    },
    /// The actor declined the pending-documents confirmation.
    Declined,
}

pub struct ApplicationReview<'a, A: ReviewApi + ?Sized> {
    api: &'a A,
    application: ApplicationForReview,
}

impl<'a, A: ReviewApi + ?Sized> ApplicationReview<'a, A> {
    pub fn open(api: &'a A, application_id: &str) -> Result<Self> {
        let application = api.application_for_review(application_id)?;
        Ok(Self { api, application })
    }

    pub fn application(&self) -> &ApplicationForReview {
        &self.application
    }

    pub fn actions(&self, actor: &Actor) -> AvailableActions {
        available_actions(&self.application, actor)
    }

    /// Fail when the application no longer accepts `intent`.
    pub fn ensure_open(&self, intent: DecisionIntent) -> Result<()> {
        ensure_open(&self.application, intent)
    }

    /// Replace the cached application with the backend's current view.
    pub fn revalidate(&mut self) -> Result<()> {
        self.application = self.api.application_for_review(&self.application.id)?;
        Ok(())
    }

    fn revalidate_after(&mut self, action: &str) {
        if let Err(err) = self.revalidate() {
            tracing::warn!(
                application = %self.application.id,
                action,
                error = %err,
                "refresh after successful decision failed; cached view is stale"
            );
        }
    }

    pub fn approve(
        &mut self,
        actor: &Actor,
        notes: &str,
        plot_number: Option<&str>,
        confirm: &mut dyn Confirm,
    ) -> Result<DecisionOutcome> {
        match prepare_approval(&self.application, actor, notes, plot_number, confirm)? {
            Prepared::Ready(decision) => self.submit(decision),
            Prepared::Declined => {
                tracing::info!(application = %self.application.id, "approval declined by actor");
                Ok(DecisionOutcome::Declined)
            }
        }
    }

    pub fn reject(&mut self, actor: &Actor, reason: Option<&str>) -> Result<DecisionOutcome> {
        let decision = prepare_rejection(&self.application, actor, reason)?;
        self.submit(decision)
    }

    pub fn send_back(
        &mut self,
        actor: &Actor,
        correction_notes: Option<&str>,
    ) -> Result<DecisionOutcome> {
        let decision = prepare_send_back(&self.application, actor, correction_notes)?;
        self.submit(decision)
    }

    fn submit(&mut self, decision: Decision) -> Result<DecisionOutcome> {
        let previous = self.application.status;
        tracing::info!(
            application = %self.application.id,
            intent = decision.intent.as_str(),
            expected = ?decision.expected,
            "submitting decision"
        );
        let audit = self
            .api
            .submit_decision(&self.application.id, &decision.payload)?;
        self.revalidate_after(decision.intent.as_str());
        if !decision.expected.matches(previous, self.application.status) {
            tracing::debug!(
                application = %self.application.id,
                observed = %self.application.status,
                expected = ?decision.expected,
                "backend status differs from expected outcome"
            );
        }
        Ok(DecisionOutcome::Submitted {
            audit,
            expected: decision.expected,
        })
    }

    fn document(&self, document_id: &str) -> Result<&CofoDocument> {
        self.application.document(document_id).ok_or_else(|| {
            ReviewError::validation(format!(
                "document {document_id} does not belong to application {}",
                self.application.id
            ))
        })
    }

    pub fn approve_document(&mut self, document_id: &str) -> Result<CofoDocument> {
        let update = prepare_document_approval(self.document(document_id)?);
        tracing::info!(
            application = %self.application.id,
            document = document_id,
            "approving document"
        );
        let returned = self.api.update_document_status(document_id, &update)?;
        self.revalidate_after("approve document");
        Ok(self.updated_document(document_id, returned, update.status.into()))
    }

    pub fn reject_document(
        &mut self,
        document_id: &str,
        message: Option<&str>,
    ) -> Result<CofoDocument> {
        let update = prepare_document_rejection(self.document(document_id)?, message)?;
        tracing::info!(
            application = %self.application.id,
            document = document_id,
            "rejecting document"
        );
        let returned = self.api.update_document_status(document_id, &update)?;
        self.revalidate_after("reject document");
        Ok(self.updated_document(document_id, returned, update.status.into()))
    }

    /// The document as the backend last reported it.
    ///
    /// Prefers the echoed document, then the refreshed cache. When neither
    /// is available the cached copy is returned with the accepted status.
    fn updated_document(
        &self,
        document_id: &str,
        returned: Option<CofoDocument>,
        accepted: DocumentStatus,
    ) -> CofoDocument {
        if let Some(document) = returned {
            return document;
        }
        match self.application.document(document_id) {
            Some(document) => CofoDocument {
                status: accepted,
                ..document.clone()
            },
            None => CofoDocument {
                id: document_id.to_string(),
                name: None,
                title: None,
                doc_type: None,
                url: None,
                uploaded_at: None,
                status: accepted,
                rejection_message: None,
            },
        }
    }
}

pub struct TransferReview<'a, A: ReviewApi + ?Sized> {
    api: &'a A,
    transfer: OwnershipTransfer,
}

impl<'a, A: ReviewApi + ?Sized> TransferReview<'a, A> {
    pub fn open(api: &'a A, transfer_id: &str) -> Result<Self> {
        let transfer = api.transfer_for_review(transfer_id)?;
        Ok(Self { api, transfer })
    }

    pub fn transfer(&self) -> &OwnershipTransfer {
        &self.transfer
    }

    pub fn actions(&self, actor: &Actor) -> TransferActions {
        transfer_actions(&self.transfer, actor)
    }

    pub fn ensure_reviewable(&self, actor: &Actor) -> Result<()> {
        ensure_reviewable(&self.transfer, actor)
    }

    pub fn revalidate(&mut self) -> Result<()> {
        self.transfer = self.api.transfer_for_review(&self.transfer.id)?;
        Ok(())
    }

    fn revalidate_after(&mut self, action: &str) {
        if let Err(err) = self.revalidate() {
            tracing::warn!(
                transfer = %self.transfer.id,
                action,
                error = %err,
                "refresh after successful transfer decision failed; cached view is stale"
            );
        }
    }

    fn document(&self, document_id: &str) -> Result<&TransferDocument> {
        self.transfer.document(document_id).ok_or_else(|| {
            ReviewError::validation(format!(
                "document {document_id} does not belong to transfer {}",
                self.transfer.id
            ))
        })
    }

    pub fn approve(&mut self, actor: &Actor, comment: Option<&str>) -> Result<()> {
        let approval = prepare_transfer_approval(&self.transfer, actor, comment)?;
        tracing::info!(transfer = %self.transfer.id, "approving transfer");
        self.api.approve_transfer(&self.transfer.id, &approval)?;
        self.revalidate_after("approve transfer");
        Ok(())
    }

    pub fn reject(
        &mut self,
        actor: &Actor,
        reason: Option<&str>,
        comment: Option<&str>,
    ) -> Result<()> {
        let rejection = prepare_transfer_rejection(&self.transfer, actor, reason, comment)?;
        tracing::info!(transfer = %self.transfer.id, "rejecting transfer");
        self.api.reject_transfer(&self.transfer.id, &rejection)?;
        self.revalidate_after("reject transfer");
        Ok(())
    }

    pub fn approve_document(&mut self, actor: &Actor, document_id: &str) -> Result<()> {
        prepare_transfer_document_approval(self.document(document_id)?, actor)?;
        self.api.approve_transfer_document(document_id)?;
        self.revalidate_after("approve transfer document");
        Ok(())
    }

    pub fn reject_document(
        &mut self,
        actor: &Actor,
        document_id: &str,
        message: Option<&str>,
    ) -> Result<()> {
        let rejection =
            prepare_transfer_document_rejection(self.document(document_id)?, actor, message)?;
        self.api.reject_transfer_document(document_id, &rejection)?;
        self.revalidate_after("reject transfer document");
        Ok(())
    }
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;

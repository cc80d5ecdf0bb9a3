//! Governor decisions on ownership transfers.
//!
//! Only governors act on transfers, only while the transfer is
//! `PENDING_GOVERNOR`, and transfer documents only while they are `PENDING`.
use super::non_blank;
use crate::error::{Result, ReviewError};
use crate::model::{DocumentStatus, OwnershipTransfer, TransferDocument, TransferStatus};
use crate::session::Actor;
use serde::Serialize;

/// Body of `POST /ownership/{id}/approve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferApproval {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub governor_comment: Option<String>,
}

/// Body of `POST /ownership/{id}/reject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRejection {
    pub rejection_reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub governor_comment: Option<String>,
}

/// Body of `POST /ownership/document/{docId}/reject`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDocumentRejection {
    pub rejection_message: String,
}

/// Enabled-action projection for one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferActions {
    pub approve: bool,
    pub reject: bool,
}

pub fn ensure_governor(actor: &Actor) -> Result<()> {
    if actor.is_governor() {
        Ok(())
    } else {
        Err(ReviewError::validation(format!(
            "ownership transfers are reviewed by the governor (signed in as {})",
            actor.role
        )))
    }
}

fn ensure_pending(transfer: &OwnershipTransfer) -> Result<()> {
    if transfer.status == TransferStatus::PendingGovernor {
        Ok(())
    } else {
        Err(ReviewError::validation(format!(
            "transfer {} is already {}",
            transfer.id,
            transfer.status.label()
        )))
    }
}

/// The governor may still decide on `transfer`.
pub fn ensure_reviewable(transfer: &OwnershipTransfer, actor: &Actor) -> Result<()> {
    ensure_governor(actor)?;
    ensure_pending(transfer)
}

fn ensure_document_pending(document: &TransferDocument) -> Result<()> {
    if document.status == DocumentStatus::Pending {
        Ok(())
    } else {
        Err(ReviewError::validation(format!(
            "document {} is already {}",
            document.display_name(),
            document.status
        )))
    }
}

pub fn transfer_actions(transfer: &OwnershipTransfer, actor: &Actor) -> TransferActions {
    let open = actor.is_governor() && transfer.status == TransferStatus::PendingGovernor;
    TransferActions {
        approve: open,
        reject: open,
    }
}

pub fn prepare_transfer_approval(
    transfer: &OwnershipTransfer,
    actor: &Actor,
    comment: Option<&str>,
) -> Result<TransferApproval> {
    ensure_reviewable(transfer, actor)?;
    Ok(TransferApproval {
        governor_comment: non_blank(comment).map(str::to_string),
    })
}

pub fn prepare_transfer_rejection(
    transfer: &OwnershipTransfer,
    actor: &Actor,
    reason: Option<&str>,
    comment: Option<&str>,
) -> Result<TransferRejection> {
    ensure_reviewable(transfer, actor)?;
    let reason = non_blank(reason)
        .ok_or_else(|| ReviewError::validation("Please provide a rejection reason"))?;
    Ok(TransferRejection {
        rejection_reason: reason.to_string(),
        governor_comment: non_blank(comment).map(str::to_string),
    })
}

pub fn prepare_transfer_document_approval(
    document: &TransferDocument,
    actor: &Actor,
) -> Result<()> {
    ensure_governor(actor)?;
    ensure_document_pending(document)
}

pub fn prepare_transfer_document_rejection(
    document: &TransferDocument,
    actor: &Actor,
    message: Option<&str>,
) -> Result<TransferDocumentRejection> {
    ensure_governor(actor)?;
    ensure_document_pending(document)?;
    let message = non_blank(message)
        .ok_or_else(|| ReviewError::validation("Please provide a rejection message"))?;
    Ok(TransferDocumentRejection {
        rejection_message: message.to_string(),
    })
}

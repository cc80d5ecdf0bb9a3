//! Text and JSON rendering for command output.
//!
//! Renderers return strings so the workflow decides where they go; JSON
//! output is the model serialized as-is.
use crate::decision::transfer::TransferActions;
use crate::decision::{AvailableActions, DocumentTally};
use crate::model::cofo::CofoPageMeta;
use crate::model::{
    ApplicationForReview, ApplicationSummary, DashboardStats, GovernorCofo, InboxTask,
    OwnershipTransfer, TransferSummary,
};
use crate::session::Actor;
use anyhow::Result;
use serde::Serialize;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn or_dash(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("-")
}

/// Left-aligned columns sized to the widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.len()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }
    let format_row = |cells: Vec<&str>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    push_line(&mut out, &format_row(headers.to_vec()));
    for row in rows {
        push_line(&mut out, &format_row(row.iter().map(String::as_str).collect()));
    }
    out
}

pub fn render_actor(actor: &Actor, base_url: &str) -> String {
    let mut out = String::new();
    push_line(&mut out, &format!("{} <{}>", actor.display_name(), actor.email));
    push_line(&mut out, &format!("role: {}", actor.role));
    push_line(&mut out, &format!("backend: {base_url}"));
    out
}

pub fn render_application_list(applications: &[ApplicationSummary]) -> String {
    if applications.is_empty() {
        return "No applications assigned.\n".to_string();
    }
    let rows: Vec<Vec<String>> = applications
        .iter()
        .map(|app| {
            let address = app
                .address
                .as_deref()
                .or_else(|| app.land.as_ref().and_then(|land| land.address.as_deref()));
            vec![
                app.id.clone(),
                app.status.replace('_', " "),
                or_dash(app.user.as_ref().map(|user| user.display_name())).to_string(),
                or_dash(address).to_string(),
                or_dash(Some(app.created_at.as_str())).to_string(),
            ]
        })
        .collect();
    render_table(&["ID", "STATUS", "APPLICANT", "ADDRESS", "SUBMITTED"], &rows)
}

pub fn render_application(
    application: &ApplicationForReview,
    actions: &AvailableActions,
) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        &format!(
            "{} [{}]",
            or_dash(Some(application.application_number.as_str())),
            application.status.label()
        ),
    );
    push_line(&mut out, &format!("id: {}", application.id));
    if let Some(user) = &application.user {
        push_line(
            &mut out,
            &format!("applicant: {} <{}>", user.display_name(), user.email),
        );
    }
    if let Some(land) = &application.land {
        let state = land.state.as_ref().and_then(|state| state.name.as_deref());
        push_line(
            &mut out,
            &format!(
                "land: {} ({})",
                or_dash(land.address.as_deref()),
                or_dash(state)
            ),
        );
    }
    push_line(
        &mut out,
        &format!(
            "submitted: {}  updated: {}",
            or_dash(Some(application.created_at.as_str())),
            or_dash(Some(application.updated_at.as_str()))
        ),
    );

    let tally = DocumentTally::of(&application.documents);
    push_line(
        &mut out,
        &format!(
            "\ndocuments ({} approved, {} pending, {} rejected):",
            tally.approved, tally.pending, tally.rejected
        ),
    );
    if application.documents.is_empty() {
        push_line(&mut out, "  none");
    }
    for doc in &application.documents {
        let mut line = format!(
            "  {:<9} {}  {}",
            doc.status.as_str(),
            doc.id,
            doc.display_name()
        );
        if let Some(message) = doc.rejection_message.as_deref().filter(|m| !m.trim().is_empty()) {
            line.push_str(&format!("  ({})", message.trim()));
        }
        push_line(&mut out, &line);
    }

    push_line(&mut out, "\nhistory:");
    if application.audits.is_empty() {
        push_line(&mut out, "  none");
    }
    for audit in &application.audits {
        push_line(
            &mut out,
            &format!(
                "  {}  {}  {}",
                or_dash(Some(audit.created_at.as_str())),
                audit.status.replace('_', " "),
                or_dash(audit.comment.as_deref())
            ),
        );
    }

    push_line(&mut out, &format!("\nactions: {}", describe_actions(actions)));
    if actions.approve_needs_confirmation {
        push_line(
            &mut out,
            "note: some documents are still pending; approval will ask for confirmation",
        );
    }
    if actions.plot_number_required {
        push_line(&mut out, "note: approval requires --plot-number");
    }
    out
}

fn describe_actions(actions: &AvailableActions) -> String {
    let enabled: Vec<&str> = [
        (actions.approve, "approve"),
        (actions.reject, "reject"),
        (actions.send_back, "send-back"),
        (actions.document_actions, "approve-document"),
        (actions.document_actions, "reject-document"),
    ]
    .into_iter()
    .filter_map(|(enabled, name)| enabled.then_some(name))
    .collect();
    if enabled.is_empty() {
        "none".to_string()
    } else {
        enabled.join(", ")
    }
}

pub fn render_transfer_list(summary: &TransferSummary, transfers: &[OwnershipTransfer]) -> String {
    let mut out = format!(
        "transfers: {} total, {} pending, {} approved, {} rejected\n",
        summary.total, summary.pending, summary.approved, summary.rejected
    );
    if transfers.is_empty() {
        push_line(&mut out, "No transfers in this view.");
        return out;
    }
    let rows: Vec<Vec<String>> = transfers
        .iter()
        .map(|transfer| {
            vec![
                transfer.id.clone(),
                transfer.status.label(),
                or_dash(
                    transfer
                        .current_owner
                        .as_ref()
                        .and_then(|owner| owner.full_name.as_deref()),
                )
                .to_string(),
                or_dash(transfer.new_owner_email.as_deref()).to_string(),
                or_dash(transfer.land.address.as_deref()).to_string(),
            ]
        })
        .collect();
    out.push_str(&render_table(
        &["ID", "STATUS", "CURRENT OWNER", "NEW OWNER", "ADDRESS"],
        &rows,
    ));
    out
}

pub fn render_transfer(transfer: &OwnershipTransfer, actions: &TransferActions) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        &format!("transfer {} [{}]", transfer.id, transfer.status.label()),
    );
    if let Some(owner) = &transfer.current_owner {
        push_line(
            &mut out,
            &format!(
                "current owner: {} <{}>",
                or_dash(owner.full_name.as_deref()),
                or_dash(owner.email.as_deref())
            ),
        );
    }
    push_line(
        &mut out,
        &format!(
            "new owner: {} {}",
            or_dash(transfer.new_owner_email.as_deref()),
            or_dash(transfer.new_owner_phone.as_deref())
        ),
    );
    let land = &transfer.land;
    let mut land_line = format!("land: {}", or_dash(land.address.as_deref()));
    if let (Some(lat), Some(long)) = (land.latitude, land.longitude) {
        land_line.push_str(&format!(" at {lat:.5},{long:.5}"));
    }
    if let Some(area) = land.square_meters {
        land_line.push_str(&format!(" ({area} m²)"));
    }
    push_line(&mut out, &land_line);

    push_line(&mut out, "\ndocuments:");
    if transfer.documents.is_empty() {
        push_line(&mut out, "  none");
    }
    for doc in &transfer.documents {
        let mut line = format!(
            "  {:<9} {}  {}",
            doc.status.as_str(),
            doc.id,
            doc.display_name()
        );
        if let Some(message) = doc.rejection_message.as_deref().filter(|m| !m.trim().is_empty()) {
            line.push_str(&format!("  ({})", message.trim()));
        }
        push_line(&mut out, &line);
    }

    let enabled: Vec<&str> = [(actions.approve, "approve"), (actions.reject, "reject")]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect();
    let described = if enabled.is_empty() {
        "none".to_string()
    } else {
        enabled.join(", ")
    };
    push_line(&mut out, &format!("\nactions: {described}"));
    out
}

pub fn render_governor_cofo_list(meta: Option<&CofoPageMeta>, cofos: &[GovernorCofo]) -> String {
    let mut out = String::new();
    if let Some(meta) = meta {
        push_line(
            &mut out,
            &format!(
                "certificates: {} total (page {}, {} per page)",
                meta.total, meta.page, meta.limit
            ),
        );
    }
    if cofos.is_empty() {
        push_line(&mut out, "No certificates in this view.");
        return out;
    }
    let rows: Vec<Vec<String>> = cofos
        .iter()
        .map(|cofo| {
            vec![
                cofo.id.clone(),
                cofo.reference().to_string(),
                cofo.status.replace('_', " "),
                cofo.user
                    .as_ref()
                    .map(|holder| holder.display_name())
                    .unwrap_or_else(|| "-".to_string()),
                or_dash(cofo.cofo_number.as_deref()).to_string(),
                or_dash(Some(cofo.created_at.as_str())).to_string(),
            ]
        })
        .collect();
    out.push_str(&render_table(
        &["ID", "APPLICATION", "STATUS", "HOLDER", "COFO NO", "CREATED"],
        &rows,
    ));
    out
}

pub fn render_governor_cofo(cofo: &GovernorCofo) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        &format!("{} [{}]", cofo.reference(), cofo.status.replace('_', " ")),
    );
    push_line(&mut out, &format!("id: {}", cofo.id));
    push_line(
        &mut out,
        &format!("cofo number: {}", or_dash(cofo.cofo_number.as_deref())),
    );
    push_line(
        &mut out,
        &format!(
            "applied: {}  signed: {}  revisions: {}",
            or_dash(Some(cofo.created_at.as_str())),
            or_dash(cofo.signed_at.as_deref()),
            cofo.revision_count.unwrap_or(0)
        ),
    );
    if let Some(holder) = &cofo.user {
        push_line(
            &mut out,
            &format!(
                "applicant: {} <{}>",
                holder.display_name(),
                or_dash(holder.email.as_deref())
            ),
        );
    }
    if let Some(land) = &cofo.land {
        let state = land.state.as_ref().and_then(|state| state.name.as_deref());
        push_line(
            &mut out,
            &format!(
                "land: {} ({})",
                or_dash(land.address.as_deref()),
                or_dash(state)
            ),
        );
    }
    if let Some(reviewer) = &cofo.current_reviewer {
        push_line(
            &mut out,
            &format!(
                "current reviewer: {} ({}, {}) <{}>",
                or_dash(reviewer.name.as_deref()),
                or_dash(reviewer.role.as_deref()),
                or_dash(reviewer.department.as_deref()),
                or_dash(reviewer.email.as_deref())
            ),
        );
    }

    push_line(&mut out, "\ndocuments:");
    if cofo.documents.is_empty() {
        push_line(&mut out, "  none");
    }
    for doc in &cofo.documents {
        push_line(
            &mut out,
            &format!(
                "  {:<9} {}  {}",
                doc.status.as_str(),
                doc.id,
                doc.display_name()
            ),
        );
    }

    if !cofo.logs.is_empty() {
        push_line(&mut out, "\nprocessing history:");
        for log in &cofo.logs {
            let stage = log
                .stage_number
                .map(|stage| format!("stage {stage}"))
                .unwrap_or_else(|| "stage -".to_string());
            push_line(
                &mut out,
                &format!(
                    "  {}  {}  {}",
                    or_dash(Some(log.created_at.as_str())),
                    stage,
                    log.status.replace('_', " ")
                ),
            );
        }
    }
    out
}

pub fn render_stats(stats: &DashboardStats) -> String {
    let rows = [
        vec!["total".to_string(), stats.total.to_string()],
        vec!["pending".to_string(), stats.pending.to_string()],
        vec!["approved".to_string(), stats.approved.to_string()],
        vec!["needs correction".to_string(), stats.needs_correction.to_string()],
        vec!["rejected".to_string(), stats.rejected.to_string()],
        vec!["completed".to_string(), stats.completed.to_string()],
        vec!["resubmitted".to_string(), stats.resubmitted.to_string()],
    ];
    render_table(&["COUNTER", "VALUE"], &rows)
}

pub fn render_inbox(tasks: &[InboxTask]) -> String {
    if tasks.is_empty() {
        return "Inbox is empty.\n".to_string();
    }
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|task| {
            let applicant = task
                .application
                .as_ref()
                .and_then(|app| app.user.as_ref())
                .map(|user| user.email.as_str());
            vec![
                task.application_number().to_string(),
                task.status.replace('_', " "),
                or_dash(applicant).to_string(),
                or_dash(Some(task.timestamp.as_str())).to_string(),
            ]
        })
        .collect();
    render_table(&["APPLICATION", "STATUS", "APPLICANT", "RECEIVED"], &rows)
}

//! Per-command runners.
//!
//! Runners resolve configuration and the stored session, open a review
//! session or call the report endpoints, then print the result. Validation
//! always happens in the decision model, before any mutating request.
use crate::api::{HttpApi, ReviewApi};
use crate::account::{self, prepare_password_setup};
use crate::cli::{
    ApproveArgs, DocumentArgs, GlobalArgs, GovernorCofoArgs, GovernorCofosArgs, InitArgs,
    ListArgs, LoginArgs, RejectArgs, RejectDocumentArgs, ReportArgs, ReportKind, SendBackArgs,
    SetPasswordArgs, ShowArgs, TransferCommand, TransferFilter, TransfersArgs, VerifyEmailArgs,
    WhoamiArgs,
};
use crate::config::{self, ClientConfig, ResolvedConfig};
use crate::decision::{AvailableActions, DecisionIntent, ExpectedOutcome};
use crate::error::ReviewError;
use crate::decision::transfer::ensure_governor;
use crate::model::{ApplicationForReview, GovernorCofo, GovernorCofoPage, OwnershipTransfer};
use crate::output::{self, print_json, render_table};
use crate::prompt::TerminalPrompt;
use crate::review::{ApplicationReview, DecisionOutcome, TransferReview};
use crate::session::{self, Session};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;

pub const PASSWORD_ENV: &str = "COFO_REVIEW_PASSWORD";

fn resolve_config(global: &GlobalArgs) -> Result<ResolvedConfig> {
    config::resolve(
        global.base_url.as_deref(),
        global.config.as_deref(),
        global.session.as_deref(),
    )
}

/// Load the stored session and build a client carrying its cookie.
///
/// Fails with a session error before any network call when the actor is
/// not logged in against this backend.
fn authenticated(global: &GlobalArgs) -> Result<(ResolvedConfig, Session, HttpApi)> {
    let config = resolve_config(global)?;
    let session = session::require_session(&config.session_path, &config.base_url)?;
    let api = HttpApi::new(&config.base_url, config.timeout).with_cookie(session.cookie.clone());
    Ok((config, session, api))
}

pub fn run_init(global: &GlobalArgs, args: InitArgs) -> Result<()> {
    let config_path = match &global.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    if config_path.is_file() && !args.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    let env_value = std::env::var(config::BASE_URL_ENV).ok();
    let base_url =
        config::resolve_base_url(global.base_url.as_deref(), None, env_value.as_deref())?;
    let config = ClientConfig {
        base_url: Some(base_url),
        ..ClientConfig::default()
    };
    config::write_config(&config_path, &config)?;
    println!("wrote {}", config_path.display());
    Ok(())
}

pub fn run_verify_email(global: &GlobalArgs, args: VerifyEmailArgs) -> Result<()> {
    let config = resolve_config(global)?;
    let token = account::require_token(
        Some(args.token.as_str()),
        "No verification token found. Please check your email link.",
    )?;
    let api = HttpApi::new(&config.base_url, config.timeout);
    let verification = api.verify_email(token).context("verify email")?;
    println!(
        "{}",
        verification
            .message
            .as_deref()
            .unwrap_or("Your email has been verified successfully!")
    );
    match verification.password_token.as_deref() {
        Some(password_token) => {
            println!("password token: {password_token}");
            println!("next: cofo-review set-password --token {password_token}");
        }
        None => eprintln!("note: the backend returned no password-setup token"),
    }
    Ok(())
}

/// New password and confirmation: both from the environment, or prompted.
fn new_password() -> (String, String) {
    if let Some(password) = std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|password| !password.is_empty())
    {
        return (password.clone(), password);
    }
    let mut prompt = TerminalPrompt::new(false);
    let password = prompt.ask_text("New password").unwrap_or_default();
    let confirmation = prompt.ask_text("Confirm password").unwrap_or_default();
    (password, confirmation)
}

pub fn run_set_password(global: &GlobalArgs, args: SetPasswordArgs) -> Result<()> {
    let config = resolve_config(global)?;
    account::require_token(
        Some(args.token.as_str()),
        "Password setup token is missing. Please request a new verification email.",
    )?;
    let (password, confirmation) = new_password();
    let setup = prepare_password_setup(Some(args.token.as_str()), &password, &confirmation)?;
    let api = HttpApi::new(&config.base_url, config.timeout);
    let message = api.set_password(&setup).context("set password")?;
    println!(
        "{}",
        message.as_deref().unwrap_or("You can now log in with your new password.")
    );
    Ok(())
}

pub fn run_login(global: &GlobalArgs, args: LoginArgs) -> Result<()> {
    let config = resolve_config(global)?;
    let email = args.email.trim();
    if email.is_empty() {
        return Err(ReviewError::validation("Please provide an email address").into());
    }
    let password = match std::env::var(PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => Some(password),
        _ => TerminalPrompt::new(false).ask_text("Password"),
    }
    .filter(|password| !password.is_empty())
    .ok_or_else(|| ReviewError::validation("Please provide a password"))?;

    let api = HttpApi::new(&config.base_url, config.timeout);
    let authenticated = api.login(email, &password)?;
    let cookie = authenticated.cookie.ok_or_else(|| ReviewError::Request {
        status: None,
        message: "Login failed: the backend did not return a session cookie".to_string(),
    })?;
    let session = Session::new(&config.base_url, cookie, authenticated.actor)?;
    session::write_session(&config.session_path, &session)?;
    tracing::info!(email, role = %session.actor.role, "logged in");
    println!(
        "Logged in as {} ({})",
        session.actor.display_name(),
        session.actor.role
    );
    Ok(())
}

pub fn run_whoami(global: &GlobalArgs, args: WhoamiArgs) -> Result<()> {
    let (config, mut session, api) = authenticated(global)?;
    if args.refresh {
        match api.refresh_session() {
            Ok(refreshed) => {
                session.actor = refreshed.actor;
                if let Some(cookie) = refreshed.cookie {
                    session.cookie = cookie;
                }
                session::write_session(&config.session_path, &session)?;
            }
            Err(err) => {
                session::clear_session(&config.session_path)?;
                return Err(err).context("refresh session");
            }
        }
    }
    if args.json {
        return print_json(&session.actor);
    }
    print!("{}", output::render_actor(&session.actor, &session.base_url));
    Ok(())
}

pub fn run_logout(global: &GlobalArgs) -> Result<()> {
    let config = resolve_config(global)?;
    if let Some(session) = session::load_session_optional(&config.session_path)? {
        let api = HttpApi::new(&config.base_url, config.timeout).with_cookie(session.cookie);
        if let Err(err) = api.logout() {
            tracing::warn!(error = %err, "backend logout failed; removing local session anyway");
        }
    }
    session::clear_session(&config.session_path)?;
    println!("Logged out");
    Ok(())
}

pub fn run_applications(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let (_, _, api) = authenticated(global)?;
    let applications = api
        .reviewer_applications()
        .context("load reviewer applications")?;
    if args.json {
        return print_json(&applications);
    }
    print!("{}", output::render_application_list(&applications));
    Ok(())
}

#[derive(Serialize)]
struct ApplicationView<'a> {
    application: &'a ApplicationForReview,
    available_actions: AvailableActions,
}

pub fn run_show(global: &GlobalArgs, args: ShowArgs) -> Result<()> {
    let (_, session, api) = authenticated(global)?;
    let review = open_application(&api, &args.application_id)?;
    let actions = review.actions(&session.actor);
    if args.json {
        return print_json(&ApplicationView {
            application: review.application(),
            available_actions: actions,
        });
    }
    print!("{}", output::render_application(review.application(), &actions));
    Ok(())
}

fn open_application<'a>(
    api: &'a HttpApi,
    application_id: &str,
) -> Result<ApplicationReview<'a, HttpApi>> {
    ApplicationReview::open(api, application_id)
        .with_context(|| format!("load application {application_id}"))
}

fn acknowledge_decision(
    verb: &str,
    review: &ApplicationReview<'_, HttpApi>,
    outcome: &DecisionOutcome,
) {
    let application = review.application();
    match outcome {
        DecisionOutcome::Declined => {
            eprintln!("Approval cancelled; nothing was sent.");
        }
        DecisionOutcome::Submitted { expected, .. } => {
            println!(
                "{verb} {} (status: {})",
                application.application_number,
                application.status.label()
            );
            if let ExpectedOutcome::Status(status) = expected {
                if *status != application.status {
                    eprintln!(
                        "note: backend reports {} (expected {})",
                        application.status.label(),
                        status.label()
                    );
                }
            }
        }
    }
}

pub fn run_approve(global: &GlobalArgs, args: ApproveArgs) -> Result<()> {
    let (_, session, api) = authenticated(global)?;
    let mut review = open_application(&api, &args.application_id)?;
    let mut prompt = TerminalPrompt::new(args.yes);
    let outcome = review.approve(
        &session.actor,
        &args.notes,
        args.plot_number.as_deref(),
        &mut prompt,
    )?;
    acknowledge_decision("Approved", &review, &outcome);
    Ok(())
}

pub fn run_reject(global: &GlobalArgs, args: RejectArgs) -> Result<()> {
    let (_, session, api) = authenticated(global)?;
    let mut review = open_application(&api, &args.application_id)?;
    review.ensure_open(DecisionIntent::Reject)?;
    let reason = TerminalPrompt::new(false).text_or_ask(args.reason, "Rejection reason");
    let outcome = review.reject(&session.actor, reason.as_deref())?;
    acknowledge_decision("Rejected", &review, &outcome);
    Ok(())
}

pub fn run_send_back(global: &GlobalArgs, args: SendBackArgs) -> Result<()> {
    let (_, session, api) = authenticated(global)?;
    let mut review = open_application(&api, &args.application_id)?;
    review.ensure_open(DecisionIntent::SendBack)?;
    let notes = TerminalPrompt::new(false).text_or_ask(args.notes, "Correction notes");
    let outcome = review.send_back(&session.actor, notes.as_deref())?;
    acknowledge_decision("Sent back for correction", &review, &outcome);
    Ok(())
}

pub fn run_approve_document(global: &GlobalArgs, args: DocumentArgs) -> Result<()> {
    let (_, _, api) = authenticated(global)?;
    let mut review = open_application(&api, &args.application_id)?;
    let updated = review.approve_document(&args.document_id)?;
    println!(
        "Document {} approved (status: {})",
        updated.display_name(),
        updated.status
    );
    Ok(())
}

pub fn run_reject_document(global: &GlobalArgs, args: RejectDocumentArgs) -> Result<()> {
    let (_, _, api) = authenticated(global)?;
    let mut review = open_application(&api, &args.application_id)?;
    let message = TerminalPrompt::new(false).text_or_ask(args.message, "Rejection message");
    let updated = review.reject_document(&args.document_id, message.as_deref())?;
    println!(
        "Document {} rejected (status: {})",
        updated.display_name(),
        updated.status
    );
    Ok(())
}

pub fn run_governor_cofos(global: &GlobalArgs, args: GovernorCofosArgs) -> Result<()> {
    let (_, session, api) = authenticated(global)?;
    ensure_governor(&session.actor)?;
    let page = api
        .governor_cofos(args.page, args.limit)
        .context("load governor certificates")?;
    let results: Vec<GovernorCofo> = match args.status.as_deref() {
        Some(status) => page
            .results
            .into_iter()
            .filter(|cofo| cofo.has_status(status))
            .collect(),
        None => page.results,
    };
    if args.json {
        return print_json(&GovernorCofoPage {
            results,
            meta: page.meta,
        });
    }
    print!(
        "{}",
        output::render_governor_cofo_list(page.meta.as_ref(), &results)
    );
    Ok(())
}

pub fn run_governor_cofo(global: &GlobalArgs, args: GovernorCofoArgs) -> Result<()> {
    let (_, session, api) = authenticated(global)?;
    ensure_governor(&session.actor)?;
    let cofo = api
        .governor_cofo(&args.cofo_id)
        .with_context(|| format!("load certificate {}", args.cofo_id))?;
    if args.json {
        return print_json(&cofo);
    }
    print!("{}", output::render_governor_cofo(&cofo));
    Ok(())
}

pub fn run_transfers(global: &GlobalArgs, args: TransfersArgs) -> Result<()> {
    let (_, session, api) = authenticated(global)?;
    ensure_governor(&session.actor)?;
    let list = api.governor_transfers().context("load transfers")?;
    let transfers: &[OwnershipTransfer] = match args.status {
        TransferFilter::Pending => &list.transfers.pending,
        TransferFilter::Approved => &list.transfers.approved,
        TransferFilter::Rejected => &list.transfers.rejected,
        TransferFilter::All => &list.transfers.all,
    };
    if args.json {
        return print_json(transfers);
    }
    print!("{}", output::render_transfer_list(&list.summary, transfers));
    Ok(())
}

pub fn run_transfer(global: &GlobalArgs, command: TransferCommand) -> Result<()> {
    let (_, session, api) = authenticated(global)?;
    let actor = &session.actor;
    match command {
        TransferCommand::Show { transfer_id, json } => {
            let review = open_transfer(&api, &transfer_id)?;
            if json {
                return print_json(review.transfer());
            }
            print!(
                "{}",
                output::render_transfer(review.transfer(), &review.actions(actor))
            );
        }
        TransferCommand::Approve {
            transfer_id,
            comment,
        } => {
            let mut review = open_transfer(&api, &transfer_id)?;
            review.approve(actor, comment.as_deref())?;
            println!(
                "Transfer {} approved (status: {})",
                transfer_id,
                review.transfer().status.label()
            );
        }
        TransferCommand::Reject {
            transfer_id,
            reason,
            comment,
        } => {
            let mut review = open_transfer(&api, &transfer_id)?;
            review.ensure_reviewable(actor)?;
            let reason = TerminalPrompt::new(false).text_or_ask(reason, "Rejection reason");
            review.reject(actor, reason.as_deref(), comment.as_deref())?;
            println!(
                "Transfer {} rejected (status: {})",
                transfer_id,
                review.transfer().status.label()
            );
        }
        TransferCommand::ApproveDocument {
            transfer_id,
            document_id,
        } => {
            let mut review = open_transfer(&api, &transfer_id)?;
            review.approve_document(actor, &document_id)?;
            println!("Transfer document {document_id} approved");
        }
        TransferCommand::RejectDocument {
            transfer_id,
            document_id,
            message,
        } => {
            let mut review = open_transfer(&api, &transfer_id)?;
            let message = TerminalPrompt::new(false).text_or_ask(message, "Rejection message");
            review.reject_document(actor, &document_id, message.as_deref())?;
            println!("Transfer document {document_id} rejected");
        }
    }
    Ok(())
}

fn open_transfer<'a>(api: &'a HttpApi, transfer_id: &str) -> Result<TransferReview<'a, HttpApi>> {
    TransferReview::open(api, transfer_id).with_context(|| format!("load transfer {transfer_id}"))
}

pub fn run_stats(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let (_, session, api) = authenticated(global)?;
    let stats = api
        .dashboard_stats(&session.actor.role)
        .context("load dashboard stats")?;
    if args.json {
        return print_json(&stats);
    }
    print!("{}", output::render_stats(&stats));
    Ok(())
}

pub fn run_inbox(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let (_, _, api) = authenticated(global)?;
    let tasks = api.inbox_tasks().context("load inbox")?;
    if args.json {
        return print_json(&tasks);
    }
    print!("{}", output::render_inbox(&tasks));
    Ok(())
}

fn count(value: u64) -> String {
    value.to_string()
}

fn decimal(value: f64) -> String {
    format!("{value:.1}")
}

pub fn run_report(global: &GlobalArgs, args: ReportArgs) -> Result<()> {
    let (_, _, api) = authenticated(global)?;
    let context = || format!("load {:?} report", args.kind);
    let table = match args.kind {
        ReportKind::Status => {
            let report = api.status_report().with_context(context)?;
            if args.json {
                return print_json(&report);
            }
            let rows = [
                ("total", report.total),
                ("in review", report.in_review),
                ("needs correction", report.needs_correction),
                ("resubmitted", report.resubmitted),
                ("approved", report.approved),
                ("rejected", report.rejected),
            ]
            .into_iter()
            .map(|(label, value)| vec![label.to_string(), count(value)])
            .collect::<Vec<_>>();
            render_table(&["STATUS", "COUNT"], &rows)
        }
        ReportKind::ProcessingTime => {
            let report = api.processing_time_report().with_context(context)?;
            if args.json {
                return print_json(&report);
            }
            render_table(
                &["APPROVED", "AVERAGE DAYS"],
                &[vec![
                    count(report.approved_count),
                    decimal(report.average_processing_days),
                ]],
            )
        }
        ReportKind::Location => {
            let report = api.location_report().with_context(context)?;
            if args.json {
                return print_json(&report);
            }
            let rows = report
                .iter()
                .map(|row| {
                    let keys = row
                        .keys
                        .iter()
                        .map(|(key, value)| match value.as_str() {
                            Some(text) => format!("{key}={text}"),
                            None => format!("{key}={value}"),
                        })
                        .collect::<Vec<_>>()
                        .join(" ");
                    vec![keys, count(row.total)]
                })
                .collect::<Vec<_>>();
            render_table(&["LOCATION", "TOTAL"], &rows)
        }
        ReportKind::Trends => {
            let report = api.trend_report().with_context(context)?;
            if args.json {
                return print_json(&report);
            }
            let rows = report
                .iter()
                .map(|(period, value)| vec![period.clone(), decimal(*value)])
                .collect::<Vec<_>>();
            render_table(&["PERIOD", "VALUE"], &rows)
        }
        ReportKind::ReviewerPerformance => {
            let report = api.reviewer_performance().with_context(context)?;
            if args.json {
                return print_json(&report);
            }
            let rows = report
                .iter()
                .map(|row| {
                    vec![
                        row.reviewer.clone(),
                        count(row.handled),
                        count(row.corrections),
                    ]
                })
                .collect::<Vec<_>>();
            render_table(&["REVIEWER", "HANDLED", "CORRECTIONS"], &rows)
        }
        ReportKind::ApproverPerformance => {
            let report = api.approver_performance().with_context(context)?;
            if args.json {
                return print_json(&report);
            }
            let rows = report
                .iter()
                .map(|row| {
                    vec![
                        row.approver.clone(),
                        count(row.total_handled),
                        decimal(row.avg_hours),
                    ]
                })
                .collect::<Vec<_>>();
            render_table(&["APPROVER", "HANDLED", "AVG HOURS"], &rows)
        }
        ReportKind::StageDelays => {
            let report = api.stage_delays().with_context(context)?;
            if args.json {
                return print_json(&report);
            }
            let rows = report
                .iter()
                .map(|row| {
                    vec![
                        row.stage.to_string(),
                        decimal(row.avg_hours),
                        count(row.total_handled),
                    ]
                })
                .collect::<Vec<_>>();
            render_table(&["STAGE", "AVG HOURS", "HANDLED"], &rows)
        }
        ReportKind::InboxBacklog => {
            let report = api.inbox_backlog().with_context(context)?;
            if args.json {
                return print_json(&report);
            }
            let rows = report
                .iter()
                .map(|row| {
                    vec![
                        row.approver.clone(),
                        row.application_id.clone(),
                        decimal(row.hours_waiting),
                        row.status.replace('_', " "),
                    ]
                })
                .collect::<Vec<_>>();
            render_table(&["APPROVER", "APPLICATION", "HOURS WAITING", "STATUS"], &rows)
        }
        ReportKind::Activity => {
            let report = api.activity_logs().with_context(context)?;
            if args.json {
                return print_json(&report);
            }
            let rows = report
                .iter()
                .map(|row| {
                    vec![
                        row.created_at.clone(),
                        row.action.clone(),
                        row.application_id.clone(),
                    ]
                })
                .collect::<Vec<_>>();
            render_table(&["WHEN", "ACTION", "APPLICATION"], &rows)
        }
        ReportKind::MonthlyTrends => {
            let report = api.monthly_trends().with_context(context)?;
            if args.json {
                return print_json(&report);
            }
            let rows = report
                .iter()
                .map(|row| {
                    vec![
                        row.month.clone(),
                        count(row.approved),
                        count(row.rejected),
                        count(row.pending),
                    ]
                })
                .collect::<Vec<_>>();
            render_table(&["MONTH", "APPROVED", "REJECTED", "PENDING"], &rows)
        }
    };
    print!("{table}");
    Ok(())
}

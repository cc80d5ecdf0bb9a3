use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod account;
mod api;
mod cli;
mod config;
mod decision;
mod error;
mod model;
mod output;
mod prompt;
mod review;
mod session;
#[cfg(test)]
mod testing;
mod workflow;

use cli::{Command, RootArgs};
use error::ReviewError;

const LOG_ENV: &str = "COFO_REVIEW_LOG";

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(root: RootArgs) -> anyhow::Result<()> {
    let global = &root.global;
    match root.command {
        Command::Init(args) => workflow::run_init(global, args),
        Command::VerifyEmail(args) => workflow::run_verify_email(global, args),
        Command::SetPassword(args) => workflow::run_set_password(global, args),
        Command::Login(args) => workflow::run_login(global, args),
        Command::Whoami(args) => workflow::run_whoami(global, args),
        Command::Logout => workflow::run_logout(global),
        Command::Applications(args) => workflow::run_applications(global, args),
        Command::Show(args) => workflow::run_show(global, args),
        Command::Approve(args) => workflow::run_approve(global, args),
        Command::Reject(args) => workflow::run_reject(global, args),
        Command::SendBack(args) => workflow::run_send_back(global, args),
        Command::ApproveDocument(args) => workflow::run_approve_document(global, args),
        Command::RejectDocument(args) => workflow::run_reject_document(global, args),
        Command::GovernorCofos(args) => workflow::run_governor_cofos(global, args),
        Command::GovernorCofo(args) => workflow::run_governor_cofo(global, args),
        Command::Transfers(args) => workflow::run_transfers(global, args),
        Command::Transfer(command) => workflow::run_transfer(global, command),
        Command::Stats(args) => workflow::run_stats(global, args),
        Command::Inbox(args) => workflow::run_inbox(global, args),
        Command::Report(args) => workflow::run_report(global, args),
    }
}

/// Exit code for a failed command: 2 validation, 3 session, 1 otherwise.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    let review_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<ReviewError>());
    match review_error {
        Some(err) if err.is_validation() => 2,
        Some(ReviewError::Session(_)) => 3,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let root = RootArgs::parse();
    init_tracing(root.global.verbose);

    match run(root) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn exit_codes_follow_the_error_class() {
        let validation: anyhow::Result<()> =
            Err(ReviewError::validation("Missing Plot Number")).context("approve app-1");
        assert_eq!(exit_code_for(&validation.unwrap_err()), 2);

        let session = anyhow::Error::new(ReviewError::session("not logged in"));
        assert_eq!(exit_code_for(&session), 3);

        let request = anyhow::Error::new(ReviewError::Request {
            status: Some(500),
            message: "boom".to_string(),
        });
        assert_eq!(exit_code_for(&request), 1);
        assert_eq!(exit_code_for(&anyhow::anyhow!("disk full")), 1);
    }
}

//! CLI argument parsing for the review client.
//!
//! Each subcommand maps to one `workflow::run_*` function; flags never carry
//! policy, they only feed values into the decision model.
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cofo-review",
    version,
    about = "Review Certificate of Occupancy applications and ownership transfers",
    after_help = "Examples:\n  cofo-review login --email reviewer@lands.gov.ng\n  cofo-review applications\n  cofo-review show <application-id>\n  cofo-review approve-document <application-id> <document-id>\n  cofo-review approve <application-id> --notes \"survey verified\"\n  cofo-review send-back <application-id> --notes \"re-upload survey plan\"\n  cofo-review transfer approve <transfer-id>\n  cofo-review verify-email --token <token>",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Backend base URL (overrides config file and COFO_REVIEW_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Config file path (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Session file path (defaults to the user data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub session: Option<PathBuf>,

    /// Log request and decision details to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    VerifyEmail(VerifyEmailArgs),
    SetPassword(SetPasswordArgs),
    Login(LoginArgs),
    Whoami(WhoamiArgs),
    /// End the backend session and delete the session file
    Logout,
    /// List applications assigned to the logged-in reviewer
    Applications(ListArgs),
    Show(ShowArgs),
    Approve(ApproveArgs),
    Reject(RejectArgs),
    SendBack(SendBackArgs),
    ApproveDocument(DocumentArgs),
    RejectDocument(RejectDocumentArgs),
    GovernorCofos(GovernorCofosArgs),
    GovernorCofo(GovernorCofoArgs),
    Transfers(TransfersArgs),
    /// Review one ownership transfer (governor only)
    #[command(subcommand)]
    Transfer(TransferCommand),
    /// Dashboard counters for the actor's role
    Stats(ListArgs),
    /// Inbox tasks assigned to the logged-in actor
    Inbox(ListArgs),
    Report(ReportArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Write a config file with the resolved base URL")]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Verify a staff email address with the emailed token")]
pub struct VerifyEmailArgs {
    /// Token from the verification link
    #[arg(long)]
    pub token: String,
}

#[derive(Parser, Debug)]
#[command(
    about = "Set the first password with the token returned by verify-email",
    after_help = "The password is read from COFO_REVIEW_PASSWORD or prompted for twice."
)]
pub struct SetPasswordArgs {
    /// Password-setup token
    #[arg(long)]
    pub token: String,
}

#[derive(Parser, Debug)]
#[command(about = "Log in and store the session cookie")]
pub struct LoginArgs {
    /// Staff email address
    #[arg(long)]
    pub email: String,
}

#[derive(Parser, Debug)]
#[command(about = "Show the logged-in actor")]
pub struct WhoamiArgs {
    /// Re-read the actor from the backend instead of the session file
    #[arg(long)]
    pub refresh: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Show one application with documents, history and available actions")]
pub struct ShowArgs {
    pub application_id: String,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Approve an application at the current stage")]
pub struct ApproveArgs {
    pub application_id: String,

    /// Approval notes sent with the decision
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Plot number (required for governor approval)
    #[arg(long, value_name = "PLOT")]
    pub plot_number: Option<String>,

    /// Approve without asking when documents are still pending
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Reject an application")]
pub struct RejectArgs {
    pub application_id: String,

    /// Rejection reason (prompted for when omitted)
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Send an application back to the applicant for correction")]
pub struct SendBackArgs {
    pub application_id: String,

    /// Correction notes (prompted for when omitted)
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Approve one document of an application")]
pub struct DocumentArgs {
    pub application_id: String,
    pub document_id: String,
}

#[derive(Parser, Debug)]
#[command(about = "Reject one document of an application")]
pub struct RejectDocumentArgs {
    pub application_id: String,
    pub document_id: String,

    /// Rejection message shown to the applicant (prompted for when omitted)
    #[arg(long)]
    pub message: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "List the governor's Certificate of Occupancy register")]
pub struct GovernorCofosArgs {
    /// Page number (1-based)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: Option<u32>,

    /// Rows per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Only show rows with this status, e.g. APPROVED
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Show one certificate with its reviewer, documents and processing history")]
pub struct GovernorCofoArgs {
    pub cofo_id: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "List ownership transfers awaiting or past governor review")]
pub struct TransfersArgs {
    /// Only show transfers in this bucket
    #[arg(long, value_enum, default_value_t = TransferFilter::Pending)]
    pub status: TransferFilter,

    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFilter {
    Pending,
    Approved,
    Rejected,
    All,
}

#[derive(Subcommand, Debug)]
pub enum TransferCommand {
    /// Show a transfer with its documents
    Show {
        transfer_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Approve a transfer
    Approve {
        transfer_id: String,
        /// Optional governor comment
        #[arg(long)]
        comment: Option<String>,
    },
    /// Reject a transfer
    Reject {
        transfer_id: String,
        /// Rejection reason (prompted for when omitted)
        #[arg(long)]
        reason: Option<String>,
        /// Optional governor comment
        #[arg(long)]
        comment: Option<String>,
    },
    /// Approve one transfer document
    ApproveDocument {
        transfer_id: String,
        document_id: String,
    },
    /// Reject one transfer document
    RejectDocument {
        transfer_id: String,
        document_id: String,
        /// Rejection message (prompted for when omitted)
        #[arg(long)]
        message: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(about = "Print one backend report")]
pub struct ReportArgs {
    #[arg(value_enum)]
    pub kind: ReportKind,

    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Status,
    ProcessingTime,
    Location,
    Trends,
    ReviewerPerformance,
    ApproverPerformance,
    StageDelays,
    InboxBacklog,
    Activity,
    MonthlyTrends,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        RootArgs::command().debug_assert();
    }

    #[test]
    fn approve_flags_parse() {
        let args = RootArgs::try_parse_from([
            "cofo-review",
            "approve",
            "app-1",
            "--notes",
            "verified",
            "--plot-number",
            "PL-9",
            "--yes",
            "--base-url",
            "http://localhost:4000/api",
        ])
        .expect("parse approve");
        assert_eq!(
            args.global.base_url.as_deref(),
            Some("http://localhost:4000/api")
        );
        match args.command {
            Command::Approve(approve) => {
                assert_eq!(approve.application_id, "app-1");
                assert_eq!(approve.notes, "verified");
                assert_eq!(approve.plot_number.as_deref(), Some("PL-9"));
                assert!(approve.yes);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn transfer_subcommands_and_report_kinds_parse() {
        let args = RootArgs::try_parse_from([
            "cofo-review",
            "transfer",
            "reject-document",
            "tr-1",
            "td-2",
            "--message",
            "expired ID",
        ])
        .expect("parse transfer");
        assert!(matches!(
            args.command,
            Command::Transfer(TransferCommand::RejectDocument { .. })
        ));

        let args = RootArgs::try_parse_from([
            "cofo-review",
            "governor-cofos",
            "--page",
            "2",
            "--limit",
            "20",
            "--status",
            "approved",
        ])
        .expect("parse governor-cofos");
        match args.command {
            Command::GovernorCofos(list) => {
                assert_eq!(list.page, Some(2));
                assert_eq!(list.limit, Some(20));
                assert_eq!(list.status.as_deref(), Some("approved"));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(
            RootArgs::try_parse_from(["cofo-review", "governor-cofos", "--page", "0"]).is_err()
        );

        let args = RootArgs::try_parse_from(["cofo-review", "report", "stage-delays", "--json"])
            .expect("parse report");
        match args.command {
            Command::Report(report) => {
                assert_eq!(report.kind, ReportKind::StageDelays);
                assert!(report.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

use crate::domain::model::PassStatus;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "buspass")]
#[command(about = "Student bus pass plans, validity checks and conductor scans")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file [default: buspass.toml]")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the plans on sale
    Plans,

    /// Compute the expiry of a pass bought now (or at --from)
    Expiry {
        #[arg(long)]
        plan: String,

        #[arg(long, help = "Purchase time, RFC 3339")]
        from: Option<String>,

        #[arg(long, help = "Reject unknown plan ids instead of using monthly")]
        strict: bool,
    },

    /// Check a pass expiry against the current time
    Status {
        #[arg(long, help = "Pass expiry, RFC 3339")]
        valid_till: Option<String>,
    },

    /// Print the payload a student's pass QR code carries
    Pass {
        #[arg(long)]
        student_id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        school: String,

        #[arg(long, help = "Pass expiry, RFC 3339")]
        valid_till: Option<String>,
    },

    /// Validate a scanned pass payload
    Scan {
        /// Payload text; read from the demo camera when --camera is set
        payload: Option<String>,

        #[arg(long, conflicts_with = "payload")]
        camera: bool,

        #[arg(long, help = "Print the verdict as JSON")]
        json: bool,
    },

    /// Admin view of the student roster
    Students {
        #[arg(long)]
        admin_user: String,

        #[arg(long)]
        admin_password: String,

        #[arg(long, default_value = "")]
        search: String,

        #[arg(long, value_enum)]
        status: Option<StatusFilter>,

        #[arg(long, help = "Write the roster as CSV to stdout")]
        csv: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    Active,
    Expired,
    Inactive,
}

impl From<StatusFilter> for PassStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Active => PassStatus::Active,
            StatusFilter::Expired => PassStatus::Expired,
            StatusFilter::Inactive => PassStatus::Inactive,
        }
    }
}

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wl", about = concat!("[v] weeklist v", env!("CARGO_PKG_VERSION"), " - your week in plain text"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite the tasks file in canonical form
    Fmt(FmtArgs),
    /// List weeks with task counts
    Weeks,
    /// Show one week's grid
    Show(ShowArgs),
    /// Advance a task's status for one day
    Mark(MarkArgs),
    /// Toggle a task's done checkbox
    Done(DoneArgs),
    /// Print a share link for a week
    Share(ShareArgs),
    /// Decode a share link
    Open(OpenArgs),
}

#[derive(Args)]
pub struct FmtArgs {
    /// Exit with an error instead of writing if the file is not canonical
    #[arg(long)]
    pub check: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Week key like 2025-2 (default: current week)
    pub week: Option<String>,
}

#[derive(Args)]
pub struct MarkArgs {
    /// Task ID
    pub id: String,
    /// Day of week (mon..sun or monday..sunday)
    pub day: String,
}

#[derive(Args)]
pub struct DoneArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct ShareArgs {
    /// Week key like 2025-2 (default: current week)
    pub week: Option<String>,
}

#[derive(Args)]
pub struct OpenArgs {
    /// Share slug or full share URL
    pub link: String,
}

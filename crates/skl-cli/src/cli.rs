use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "skl",
    about = "Skill Ledger — self-reported skills, peer verification, reputation",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Journal file holding the ledger state
    #[arg(long, global = true, default_value = ".skl/journal.log")]
    pub journal: PathBuf,

    /// Act as the developer with this handle
    #[arg(long = "as", global = true, value_name = "HANDLE", conflicts_with = "caller")]
    pub as_handle: Option<String>,

    /// Act as the developer with this hex identity
    #[arg(long, global = true, value_name = "HEX")]
    pub caller: Option<String>,

    /// Sequence marker for this call (defaults to the next one after the journal's last)
    #[arg(long, global = true)]
    pub sequence: Option<u64>,

    /// TOML file overriding point values and thresholds
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register the acting developer
    Init,
    /// Self-report an achievement in a skill category
    Report(ReportArgs),
    /// Verify another developer's skill
    Verify(VerifyArgs),
    /// Show a developer's skill in one category
    Skill(SkillArgs),
    /// Show a developer's profile and skills
    Profile(ProfileArgs),
    /// Show the verification receipt for a verifier, developer and category
    Receipt(ReceiptArgs),
    /// Print the display name of a skill level code
    LevelName(CodeArgs),
    /// Print the display name of a skill category code
    CategoryName(CodeArgs),
    /// Check ledger-wide invariants
    Audit,
}

#[derive(Args)]
pub struct ReportArgs {
    pub category: u32,
    pub description: String,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Developer handle or hex identity
    pub developer: String,
    pub category: u32,
}

#[derive(Args)]
pub struct SkillArgs {
    pub developer: String,
    pub category: u32,
}

#[derive(Args)]
pub struct ProfileArgs {
    pub developer: String,
}

#[derive(Args)]
pub struct ReceiptArgs {
    pub verifier: String,
    pub developer: String,
    pub category: u32,
}

#[derive(Args)]
pub struct CodeArgs {
    pub code: u32,
}

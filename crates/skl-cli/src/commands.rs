use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use skl_ledger::{CallContext, LedgerConfig, LedgerError, SkillLedger, SkillView};
use skl_store::{JournalConfig, JournaledStore};
use skl_types::{category_name, level_name, DeveloperId, SequenceMarker};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::LevelName(args) => {
            let name = u8::try_from(args.code).map(level_name).unwrap_or(level_name(0));
            return emit(&cli.format, &json!({ "code": args.code, "name": name }), || {
                println!("{name}")
            });
        }
        Command::CategoryName(args) => {
            let name = category_name(args.code);
            return emit(&cli.format, &json!({ "code": args.code, "name": name }), || {
                println!("{name}")
            });
        }
        _ => {}
    }

    let config = load_config(cli.config.as_deref())?;
    let store = JournaledStore::open(&cli.journal, JournalConfig::default())
        .with_context(|| format!("opening journal {}", cli.journal.display()))?;
    let sequence = cli
        .sequence
        .map(SequenceMarker::new)
        .unwrap_or_else(|| store.last_sequence().next());
    let ledger = SkillLedger::with_config(store, config);

    match &cli.command {
        Command::Init => cmd_init(&cli, &ledger, sequence),
        Command::Report(args) => cmd_report(&cli, &ledger, sequence, args),
        Command::Verify(args) => cmd_verify(&cli, &ledger, sequence, args),
        Command::Skill(args) => cmd_skill(&cli, &ledger, args),
        Command::Profile(args) => cmd_profile(&cli, &ledger, args),
        Command::Receipt(args) => cmd_receipt(&cli, &ledger, args),
        Command::Audit => cmd_audit(&cli, &ledger),
        Command::LevelName(_) | Command::CategoryName(_) => Ok(()),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LedgerConfig> {
    let Some(path) = path else {
        return Ok(LedgerConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// The acting identity, from `--caller` or `--as`.
fn acting_identity(cli: &Cli) -> anyhow::Result<DeveloperId> {
    if let Some(hex) = &cli.caller {
        return DeveloperId::from_hex(hex).map_err(|e| anyhow!("invalid --caller: {e}"));
    }
    match &cli.as_handle {
        Some(handle) => Ok(DeveloperId::from_handle(handle)),
        None => bail!("no acting identity; pass --as <HANDLE> or --caller <HEX>"),
    }
}

/// A developer argument: a hex identity if it parses as one, otherwise a handle.
fn developer_arg(raw: &str) -> DeveloperId {
    DeveloperId::from_hex(raw).unwrap_or_else(|_| DeveloperId::from_handle(raw))
}

fn rejected(error: LedgerError) -> anyhow::Error {
    anyhow!("rejected ({}): {error}", error.code())
}

fn emit<T: Serialize>(
    format: &OutputFormat,
    value: &T,
    text: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => text(),
    }
    Ok(())
}

fn cmd_init(
    cli: &Cli,
    ledger: &SkillLedger<JournaledStore>,
    sequence: SequenceMarker,
) -> anyhow::Result<()> {
    let caller = acting_identity(cli)?;
    let created = ledger
        .initialize_profile(&CallContext::new(caller.clone(), sequence))
        .map_err(rejected)?;
    emit(
        &cli.format,
        &json!({ "developer": caller.to_hex(), "created": created }),
        || {
            let who = caller.to_string().cyan();
            if created {
                println!("{} Profile initialized for {who}", "✓".green().bold());
            } else {
                println!("{} Profile already exists for {who}", "✓".green());
            }
        },
    )
}

fn cmd_report(
    cli: &Cli,
    ledger: &SkillLedger<JournaledStore>,
    sequence: SequenceMarker,
    args: &ReportArgs,
) -> anyhow::Result<()> {
    let caller = acting_identity(cli)?;
    let awarded = ledger
        .report_achievement(
            &CallContext::new(caller, sequence),
            args.category,
            &args.description,
        )
        .map_err(rejected)?;
    emit(&cli.format, &json!({ "awarded": awarded }), || {
        println!(
            "{} +{} points in {}",
            "✓".green().bold(),
            awarded.to_string().bold(),
            category_name(args.category).yellow()
        )
    })
}

fn cmd_verify(
    cli: &Cli,
    ledger: &SkillLedger<JournaledStore>,
    sequence: SequenceMarker,
    args: &VerifyArgs,
) -> anyhow::Result<()> {
    let caller = acting_identity(cli)?;
    let developer = developer_arg(&args.developer);
    let awarded = ledger
        .verify_peer_skill(&CallContext::new(caller, sequence), &developer, args.category)
        .map_err(rejected)?;
    emit(&cli.format, &json!({ "awarded": awarded }), || {
        println!(
            "{} Verified {} in {} (+{} points)",
            "✓".green().bold(),
            developer.to_string().cyan(),
            category_name(args.category).yellow(),
            awarded
        )
    })
}

fn print_skill(view: &SkillView) {
    println!(
        "  {:<22} {:>5} pts  {:<12} self-reported {}  verified {}  (updated {})",
        view.category.name().yellow(),
        view.points,
        view.level.name().bold(),
        view.self_reported_count,
        view.verified_count,
        view.last_updated
    );
}

fn cmd_skill(
    cli: &Cli,
    ledger: &SkillLedger<JournaledStore>,
    args: &SkillArgs,
) -> anyhow::Result<()> {
    let developer = developer_arg(&args.developer);
    let view = ledger.get_skill(&developer, args.category).map_err(rejected)?;
    emit(&cli.format, &view, || match &view {
        Some(view) => print_skill(view),
        None => println!("No skill recorded."),
    })
}

fn cmd_profile(
    cli: &Cli,
    ledger: &SkillLedger<JournaledStore>,
    args: &ProfileArgs,
) -> anyhow::Result<()> {
    let developer = developer_arg(&args.developer);
    let profile = ledger.get_profile(&developer).map_err(rejected)?;
    let skills = ledger.skills_of(&developer).map_err(rejected)?;
    emit(
        &cli.format,
        &json!({ "developer": developer.to_hex(), "profile": profile, "skills": skills }),
        || match &profile {
            Some(profile) => {
                println!("Developer {}", developer.to_string().cyan().bold());
                println!("  Reputation: {}", profile.total_reputation.to_string().bold());
                println!("  Verifications given: {}", profile.verifications_given);
                println!("  Joined: {}", profile.join_sequence);
                for view in &skills {
                    print_skill(view);
                }
            }
            None => println!("No profile for {}.", developer.to_string().cyan()),
        },
    )
}

fn cmd_receipt(
    cli: &Cli,
    ledger: &SkillLedger<JournaledStore>,
    args: &ReceiptArgs,
) -> anyhow::Result<()> {
    let verifier = developer_arg(&args.verifier);
    let developer = developer_arg(&args.developer);
    let receipt = ledger
        .get_peer_verification(&verifier, &developer, args.category)
        .map_err(rejected)?;
    emit(&cli.format, &receipt, || match &receipt {
        Some(receipt) => println!(
            "{} verified by {} at {} (+{} points)",
            developer.to_string().cyan(),
            verifier.to_string().cyan(),
            receipt.verification_sequence,
            receipt.points_awarded
        ),
        None => println!("No verification."),
    })
}

fn cmd_audit(cli: &Cli, ledger: &SkillLedger<JournaledStore>) -> anyhow::Result<()> {
    let report = ledger.audit().map_err(rejected)?;
    emit(&cli.format, &report, || {
        if report.is_consistent() {
            println!("{} Ledger consistent", "✓".green().bold());
        } else {
            println!("{} {} violation(s)", "✗".red().bold(), report.violations.len());
            for v in &report.violations {
                println!("  {:?} {}: {}", v.kind, v.developer.to_string().cyan(), v.description);
            }
        }
        println!(
            "  Profiles: {}  Skills: {}  Receipts: {}",
            report.profiles_checked, report.skills_checked, report.receipts_checked
        );
    })?;
    if !report.is_consistent() {
        bail!("ledger audit failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn run(dir: &TempDir, args: &[&str]) -> anyhow::Result<()> {
        let journal = dir.path().join("journal.log");
        let mut argv = vec!["skl", "--journal", journal.to_str().unwrap()];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv)?)
    }

    fn open(dir: &TempDir) -> SkillLedger<JournaledStore> {
        let store =
            JournaledStore::open(&dir.path().join("journal.log"), JournalConfig::default())
                .unwrap();
        SkillLedger::new(store)
    }

    #[test]
    fn commands_persist_through_the_journal() {
        let dir = TempDir::new().unwrap();
        run(&dir, &["--as", "dana", "init"]).unwrap();
        run(&dir, &["--as", "dana", "report", "1", "first contract"]).unwrap();

        let ledger = open(&dir);
        let skill = ledger
            .get_skill(&DeveloperId::from_handle("dana"), 1)
            .unwrap()
            .unwrap();
        assert_eq!(skill.points, 10);
        assert_eq!(skill.last_updated, SequenceMarker::new(2));
    }

    #[test]
    fn rejected_operation_surfaces_error_code() {
        let dir = TempDir::new().unwrap();
        let err = run(&dir, &["--as", "eve", "report", "7", "x"]).unwrap_err();
        assert!(err.to_string().contains("(100)"));
    }

    #[test]
    fn mutating_commands_need_an_identity() {
        let dir = TempDir::new().unwrap();
        assert!(run(&dir, &["init"]).is_err());
    }

    #[test]
    fn config_file_overrides_gate() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("ledger.toml");
        fs::write(&config, "min_verifier_reputation = 10\n").unwrap();
        let config = config.to_str().unwrap();

        run(&dir, &["--as", "v", "init"]).unwrap();
        run(&dir, &["--as", "v", "report", "2", "vault"]).unwrap();
        run(&dir, &["--as", "d", "init"]).unwrap();
        run(&dir, &["--as", "d", "report", "2", "swap"]).unwrap();
        assert!(run(&dir, &["--as", "v", "verify", "d", "2"]).is_err());
        run(&dir, &["--as", "v", "--config", config, "verify", "d", "2"]).unwrap();

        let ledger = open(&dir);
        assert!(ledger
            .get_peer_verification(
                &DeveloperId::from_handle("v"),
                &DeveloperId::from_handle("d"),
                2
            )
            .unwrap()
            .is_some());
        run(&dir, &["audit"]).unwrap();
    }

    #[test]
    fn developer_args_accept_hex_or_handle() {
        let id = DeveloperId::from_handle("frank");
        assert_eq!(developer_arg(&id.to_hex()), id);
        assert_eq!(developer_arg("frank"), id);
    }
}

use std::path::PathBuf;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use credit_cli::{OptionList, commands};
use credit_core::wizard::{BranchFlags, WizardStep};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Customer credit application wizard.
///
/// Builds blank applications, shows the step path for a set of answers,
/// and validates saved applications.
#[derive(Debug, Parser)]
#[command(name = "credit-wizard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// The two branch answers, both "yes" unless switched off.
#[derive(Debug, Args)]
struct BranchArgs {
    /// Answer "no" to requesting a line of credit.
    #[arg(long, default_value_t = false)]
    no_credit: bool,

    /// Answer "no" to requesting tax exemption.
    #[arg(long, default_value_t = false)]
    no_tax: bool,
}

impl BranchArgs {
    fn flags(&self) -> BranchFlags {
        BranchFlags {
            request_line_of_credit: !self.no_credit,
            request_tax_exempt: !self.no_tax,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a blank application as TOML.
    Init {
        /// Deployment config (TOML). Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        branches: BranchArgs,
    },

    /// Print the steps visited for the given answers.
    Walk {
        #[command(flatten)]
        branches: BranchArgs,
    },

    /// Validate a saved application.
    Check {
        /// Application file written by `init` and filled in.
        #[arg(short, long)]
        application: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only check this step (business, credit, tax, sign, review).
        #[arg(short, long, value_parser = parse_step)]
        step: Option<WizardStep>,
    },

    /// Print the display mask for an SSN.
    Mask { ssn: String },

    /// Print a select option list.
    Options {
        #[arg(value_enum)]
        list: OptionList,
    },

    /// Print the branding for a plant code.
    Plant { code: String },
}

fn parse_step(s: &str) -> Result<WizardStep, String> {
    WizardStep::parse(s).ok_or_else(|| format!("unknown step '{s}'"))
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info`.
/// * Writes to stderr so command output stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");

    match cli.command {
        Command::Init { config, branches } => {
            let config = commands::load_config(config.as_deref())?;
            print!("{}", commands::init(&config, branches.flags())?);
        }
        Command::Walk { branches } => print!("{}", commands::walk(branches.flags())),
        Command::Check {
            application,
            config,
            step,
        } => {
            let config = commands::load_config(config.as_deref())?;
            let loaded = commands::load_application(&application)?;
            let report = commands::check(&loaded, &config, step);
            print!("{report}");
            if !report.is_ok() {
                bail!(
                    "{} failed validation with {} problem(s)",
                    application.display(),
                    report.errors.len()
                );
            }
        }
        Command::Mask { ssn } => println!("{}", commands::mask(&ssn)),
        Command::Options { list } => print!("{}", commands::options(list)),
        Command::Plant { code } => print!("{}", commands::plant(&code)),
    }

    Ok(())
}

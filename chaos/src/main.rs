//! `chaos`: inject build-breaking faults into a web project and restore it.
//!
//! Every injection is backed up under `.chaos-backup/` first; `chaos restore`
//! puts the project back exactly as it was.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use chaos::core::registry::Registry;
use chaos::error::ChaosError;
use chaos::exit_codes;
use chaos::inject::{InjectOptions, inject};
use chaos::io::confirm::{AssumeYes, StdinConfirm};
use chaos::io::project::Project;
use chaos::io::template::TemplateValidation;
use chaos::logging;
use chaos::report;
use chaos::restore::restore;

#[derive(Parser)]
#[command(
    name = "chaos",
    version,
    about = "Inject and restore deterministic faults in a web project"
)]
struct Cli {
    /// Project root to operate on.
    #[arg(long, global = true, env = "CHAOS_PROJECT_ROOT", default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Back up the fault's targets and overwrite them with its templates.
    Inject {
        /// Fault id (see `chaos list`).
        #[arg(long = "type", value_name = "ID")]
        fault_type: String,
        /// Discard an unrestored injection instead of refusing.
        #[arg(short, long)]
        force: bool,
    },
    /// Revert the last injection and delete the backup.
    Restore {
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// List available faults grouped by category.
    List,
    /// Show a fault's metadata and a preview of its template.
    Info {
        /// Fault id (see `chaos list`).
        #[arg(long = "type", value_name = "ID")]
        fault_type: String,
    },
    /// Show whether a fault is currently injected.
    Status,
    /// Validate every template under the templates directory.
    Templates,
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let registry = Registry::builtin();
    match cli.command {
        Command::Inject { fault_type, force } => {
            cmd_inject(&cli.root, &registry, &fault_type, force)
        }
        Command::Restore { yes } => cmd_restore(&cli.root, yes),
        Command::List => {
            print!("{}", report::render_list(&registry));
            Ok(exit_codes::OK)
        }
        Command::Info { fault_type } => cmd_info(&cli.root, &registry, &fault_type),
        Command::Status => cmd_status(&cli.root),
        Command::Templates => cmd_templates(&cli.root),
    }
}

fn open(root: &Path) -> Result<Project> {
    Project::open(root).with_context(|| format!("open project {}", root.display()))
}

fn cmd_inject(root: &Path, registry: &Registry, fault_id: &str, force: bool) -> Result<i32> {
    let project = open(root)?;
    let outcome = inject(&project, registry, fault_id, InjectOptions { force })
        .with_context(|| format!("inject '{fault_id}'"))?;
    print!("{}", report::render_inject(&outcome));
    Ok(exit_codes::OK)
}

fn cmd_restore(root: &Path, yes: bool) -> Result<i32> {
    let project = open(root)?;
    let assume_yes = yes || !project.config().confirm_restore || !std::io::stdin().is_terminal();
    let outcome = if assume_yes {
        restore(&project, &AssumeYes)
    } else {
        restore(&project, &StdinConfirm)
    }
    .context("restore")?;
    print!("{}", report::render_restore(&outcome));
    Ok(exit_codes::OK)
}

fn cmd_info(root: &Path, registry: &Registry, fault_id: &str) -> Result<i32> {
    let fault = registry.require(fault_id)?;
    let project = open(root)?;
    let loader = project.templates();
    let validations: Vec<TemplateValidation> = fault
        .template_paths()
        .into_iter()
        .map(|path| loader.validate(path))
        .collect();
    print!(
        "{}",
        report::render_info(fault, &validations, project.config().preview_lines)
    );
    Ok(exit_codes::OK)
}

fn cmd_status(root: &Path) -> Result<i32> {
    let project = open(root)?;
    let status = report::collect_status(&project).context("read backup state")?;
    print!("{}", report::render_status(&status));
    Ok(exit_codes::OK)
}

fn cmd_templates(root: &Path) -> Result<i32> {
    let project = open(root)?;
    let loader = project.templates();
    let validations: Vec<TemplateValidation> = loader
        .list()
        .context("list templates")?
        .iter()
        .map(|template| loader.validate(&template.path))
        .collect();
    print!("{}", report::render_templates(&validations));
    if validations.iter().all(|v| v.valid) {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::INVALID_TEMPLATES)
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.chain().find_map(|cause| cause.downcast_ref::<ChaosError>()) {
        Some(ChaosError::UnknownFault { .. }) => exit_codes::UNKNOWN_FAULT,
        Some(ChaosError::AlreadyInjected { .. }) => exit_codes::ALREADY_INJECTED,
        _ => exit_codes::FAILURE,
    }
}

use clap::{Parser, Subcommand};
use rig_project::{ProjectResult, RigFile, StepDef, build_rig, run_step};
use rig_sim::{CycleOutcome, CycleReport};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rig-cli")]
#[command(about = "Training rig CLI - electrical and pneumatic loop simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate rig file syntax and structure
    Validate {
        /// Path to the rig file (YAML, or JSON by extension)
        rig_path: PathBuf,
    },
    /// Write the standard rig template
    Template {
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit JSON instead of YAML
        #[arg(long)]
        json: bool,
    },
    /// Build the rig and replay its scenario
    Run {
        /// Path to the rig file (YAML, or JSON by extension)
        rig_path: PathBuf,
        /// Override the RNG seed from the file
        #[arg(long)]
        seed: Option<u64>,
        /// Print each cycle report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ProjectResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { rig_path } => cmd_validate(&rig_path),
        Commands::Template { output, json } => cmd_template(output.as_deref(), json),
        Commands::Run {
            rig_path,
            seed,
            json,
        } => cmd_run(&rig_path, seed, json),
    }
}

fn cmd_validate(rig_path: &Path) -> ProjectResult<()> {
    println!("Validating rig: {}", rig_path.display());
    let rig = rig_project::load(rig_path)?;
    println!(
        "✓ Rig is valid ({} devices, {} connections, {} scenario steps)",
        rig.devices.len(),
        rig.connections.len(),
        rig.scenario.len()
    );
    Ok(())
}

fn cmd_template(output: Option<&Path>, json: bool) -> ProjectResult<()> {
    let rig = rig_project::standard_rig();
    match output {
        Some(path) if json => rig_project::save_json(path, &rig)?,
        Some(path) => rig_project::save_yaml(path, &rig)?,
        None if json => println!("{}", serde_json::to_string_pretty(&rig)?),
        None => print!("{}", serde_yaml::to_string(&rig)?),
    }
    if let Some(path) = output {
        println!("✓ Template written to {}", path.display());
    }
    Ok(())
}

fn cmd_run(rig_path: &Path, seed: Option<u64>, json: bool) -> ProjectResult<()> {
    let mut file: RigFile = rig_project::load(rig_path)?;
    if let Some(seed) = seed {
        let mut opts = file.options.clone().unwrap_or(rig_project::OptionsDef {
            seed: 0,
            tick_s: 0.1,
        });
        opts.seed = seed;
        file.options = Some(opts);
    }

    println!("Running rig: {}", file.name);
    let mut rig = build_rig(&file)?;
    if let Some(report) = rig.report() {
        print_report("initial", report, json)?;
    }

    for (i, step) in file.scenario.iter().enumerate() {
        let label = format!("step {}: {}", i + 1, describe(step));
        match run_step(&mut rig, step) {
            Ok(CycleOutcome::Completed) => {}
            Ok(outcome) => {
                tracing::warn!(step = i + 1, ?outcome, "cycle did not complete");
            }
            Err(e) => {
                println!("✗ {label} failed: {e}");
                continue;
            }
        }
        if let Some(report) = rig.report() {
            print_report(&label, report, json)?;
        }
    }
    Ok(())
}

fn describe(step: &StepDef) -> String {
    match step {
        StepDef::Connect { from, to, kind } => format!("connect {from} -> {to} ({})", kind.tag()),
        StepDef::Disconnect { from, to } => format!("disconnect {from} -> {to}"),
        StepDef::Set { device, value } => format!("set {device} = {value}"),
        StepDef::Power { device, on } => {
            let state = if *on { "on" } else { "off" };
            format!("switch {device} {state}")
        }
        StepDef::Mode { device, mode } => format!("{device} mode {mode:?}"),
        StepDef::Fault { fault } => format!("fault {fault:?}"),
        StepDef::RandomFault { family } => format!("random {family:?} fault"),
        StepDef::Repair { target } => format!("repair {target}"),
        StepDef::ClearFaults => "clear faults".to_string(),
        StepDef::Refill { device } => format!("refill {device}"),
        StepDef::Tick { seconds } => format!("tick {seconds} s"),
    }
}

fn print_report(label: &str, report: &CycleReport, json: bool) -> ProjectResult<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }
    let loop_state = if report.path_complete {
        "closed"
    } else {
        "open"
    };
    println!(
        "[{label}] loop {loop_state}, {:.2} mA",
        report.loop_current_ma
    );
    for (id, text) in &report.displays {
        if !text.is_empty() {
            println!("  {id:<6} {text}");
        }
    }
    Ok(())
}

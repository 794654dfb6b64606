use clap::{Parser, Subcommand};
use gt_app::{AppResult, RunOverrides, ScenarioOutcome, project_service, run_service};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "gt-cli")]
#[command(about = "Gas turbine engine model - run engine scenarios", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an engine scenario file
    Validate {
        /// Path to the scenario file (YAML, or JSON with a .json extension)
        scenario_path: PathBuf,
    },
    /// Show derived engine figures
    Show {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a scenario
    Run {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Time step in seconds (overrides the file)
        #[arg(long)]
        dt: Option<f64>,
        /// End time in seconds (overrides the file)
        #[arg(long)]
        t_end: Option<f64>,
        /// Output CSV file path for the recorded samples (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Column delimiter for samples and telemetry
        #[arg(long, default_value = ",")]
        delimiter: String,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Show {
            scenario_path,
            json,
        } => cmd_show(&scenario_path, json),
        Commands::Run {
            scenario_path,
            dt,
            t_end,
            output,
            delimiter,
        } => cmd_run(
            &scenario_path,
            RunOverrides { dt, t_end },
            output.as_deref(),
            &delimiter,
        ),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let project = project_service::load_project(scenario_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_show(scenario_path: &Path, json: bool) -> AppResult<()> {
    let project = project_service::load_project(scenario_path)?;
    let summary = project_service::summarize(&project);

    if json {
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| gt_app::AppError::Project(format!("Failed to serialize summary: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    println!("Engine: {}", summary.name);
    println!("  Military thrust: {:.1} lbf", summary.mil_thrust_lbf);
    if summary.augmented {
        println!("  Max thrust: {:.1} lbf", summary.max_thrust_lbf);
        if let Some(method) = summary.aug_method {
            println!("  Afterburner: {method:?}");
        }
    }
    println!("  Bypass ratio: {:.2}", summary.bypass_ratio);
    println!("  Spool rate: {:.2} %/s", summary.spool_rate_pct_s);
    println!("  Idle fuel flow: {:.1} pph", summary.idle_fuel_flow_pph);
    println!(
        "  Water injection: {}",
        if summary.injected { "yes" } else { "no" }
    );
    println!("  Scheduled controls: {}", summary.control_count);
    Ok(())
}

fn cmd_run(
    scenario_path: &Path,
    overrides: RunOverrides,
    output: Option<&Path>,
    delimiter: &str,
) -> AppResult<()> {
    let project = project_service::load_project(scenario_path)?;
    debug!(engine = %project.engine.name, "running scenario");
    let outcome = run_service::run_project(&project, &overrides, delimiter)?;

    if let Some(path) = output {
        gt_app::write_samples_csv(path, &outcome.record, delimiter)?;
        print_outcome(&outcome);
        println!(
            "✓ Exported {} samples to {}",
            outcome.record.samples.len(),
            path.display()
        );
    } else {
        print!("{}", gt_app::samples_csv(&outcome.record, delimiter));
    }
    Ok(())
}

fn print_outcome(outcome: &ScenarioOutcome) {
    println!("✓ Scenario completed: {}", outcome.engine);
    println!("  Steps: {}", outcome.record.steps);
    println!("  Final phase: {}", outcome.final_phase);
    if let Some(last) = outcome.record.last() {
        println!("  Final N1/N2: {:.1}% / {:.1}%", last.n1, last.n2);
        println!("  Final thrust: {:.1} lbf", last.thrust_lbf);
    }
    println!("  Fuel burned: {:.2} lbm", outcome.record.fuel_burned_lbs);
    if let Some(left) = outcome.fuel_remaining_lbs {
        println!("  Fuel remaining: {left:.2} lbm");
    }
    let phases: Vec<String> = outcome
        .record
        .phases()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("  Phases: {}", phases.join(" -> "));
    if outcome.faults.is_empty() {
        println!("  Faults: none");
    } else {
        for fault in &outcome.faults {
            println!("  Fault raised: {fault}");
        }
    }
    println!("\n{}", outcome.telemetry_labels);
    println!("{}", outcome.telemetry_values);
}

//! Top-level CLI definition and dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::{Colorize, control};

use model_gov::core::config::Config;
use model_gov::core::errors::Result;
use model_gov::pipeline::{DEFAULT_MODEL_ID, Pipeline};
use model_gov::risk::{Decision, RiskAssessment};

/// mgov — governance gate for trained predictive models.
#[derive(Debug, Parser)]
#[command(
    name = "mgov",
    author,
    version,
    about = "Model governance pipeline - stress, score, report",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override registry root directory.
    #[arg(long, global = true, value_name = "DIR")]
    registry: Option<PathBuf>,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Fit the model on the synthetic series and register it.
    Train(ModelArgs),
    /// Run the stress scenarios against the registered model.
    Stress(ModelArgs),
    /// Score stress results into a risk assessment.
    Score(ModelArgs),
    /// Render the governance model card.
    Report(ModelArgs),
    /// Run every stage in order: train, stress, score, report.
    Run(ModelArgs),
}

#[derive(Debug, Clone, Args)]
struct ModelArgs {
    /// Model identifier scoping all artifacts for this run.
    #[arg(long, default_value = DEFAULT_MODEL_ID, value_name = "ID")]
    model_id: String,
}

/// Dispatch a parsed CLI invocation.
pub fn run(cli: &Cli) -> Result<()> {
    if cli.no_color {
        control::set_override(false);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.registry {
        config.registry.root_dir.clone_from(dir);
    }
    let pipeline = Pipeline::from_config(config);

    match &cli.command {
        Command::Train(args) => {
            let metrics = pipeline.train(&args.model_id)?;
            println!(
                "trained {}: mae={:.6} r2={:.3} (n_train={}, n_test={})",
                args.model_id, metrics.mae, metrics.r2, metrics.n_train, metrics.n_test
            );
        }
        Command::Stress(args) => {
            let results = pipeline.stress(&args.model_id)?;
            for (scenario, mae) in results.iter() {
                println!("{scenario:>10}: mae={mae:.6}");
            }
        }
        Command::Score(args) => {
            let assessment = pipeline.score(&args.model_id)?;
            print_assessment(&assessment);
        }
        Command::Report(args) => {
            let card = pipeline.report(&args.model_id)?;
            println!("{card}");
        }
        Command::Run(args) => {
            let outcome = pipeline.run(&args.model_id)?;
            print_assessment(&outcome.assessment);
            println!(
                "model card written to {}",
                pipeline
                    .store()
                    .artifact_path(&args.model_id, model_gov::registry::Artifact::ModelCard)
                    .display()
            );
        }
    }
    Ok(())
}

fn print_assessment(assessment: &RiskAssessment) {
    let decision = match assessment.decision {
        Decision::Approve => assessment.decision.label().green().bold(),
        Decision::ApproveWithCaution => assessment.decision.label().yellow().bold(),
        Decision::Reject => assessment.decision.label().red().bold(),
    };
    println!(
        "risk_score={} noise_degradation={:.2} volatility_degradation={:.2} r2={:.3}",
        assessment.risk_score,
        assessment.noise_degradation,
        assessment.volatility_degradation,
        assessment.r2
    );
    println!("decision: {decision}");
}

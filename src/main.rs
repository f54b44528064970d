use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use accuplot_core::{EntryOutcome, RunSummary};
use accuplot_rust::{App, AppConfig};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "accuplot", version, about = "Replot only the accuracy plots whose configuration changed")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    overrides: Overrides,
    /// Log a nivel debug (RUST_LOG tiene prioridad).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Renderiza las entradas nuevas o modificadas y actualiza el hash store (default).
    Render,
    /// Muestra qué se renderizaría, sin dibujar ni escribir el store.
    Plan,
    /// Imprime los fingerprints actuales como CSV.
    Hashes,
}

#[derive(Args, Debug, Default)]
struct Overrides {
    /// Documento JSON con las entradas de plot.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    results_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    plots_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    hash_store: Option<PathBuf>,
    /// Archivo cuyo mtime invalida todos los plots (repetible).
    #[arg(long = "renderer-source", global = true)]
    renderer_sources: Vec<PathBuf>,
    #[arg(short, long, global = true)]
    jobs: Option<usize>,
    /// Rerender completo sin mirar el hash store.
    #[arg(long, global = true)]
    force: bool,
    /// Incluye el digest de los datos en el fingerprint.
    #[arg(long, global = true)]
    data_fingerprint: bool,
}

impl Overrides {
    fn apply(self, cfg: &mut AppConfig) {
        if let Some(p) = self.config {
            cfg.plot_config = p;
        }
        if let Some(p) = self.results_dir {
            cfg.results_dir = p;
        }
        if let Some(p) = self.plots_dir {
            cfg.plots_dir = p;
        }
        if let Some(p) = self.hash_store {
            cfg.hash_store = p;
        }
        if !self.renderer_sources.is_empty() {
            cfg.renderer_sources = self.renderer_sources;
        }
        if let Some(j) = self.jobs {
            cfg.jobs = j.max(1);
        }
        cfg.force |= self.force;
        cfg.data_fingerprint |= self.data_fingerprint;
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env().context("failed to read ACCUPLOT_* environment")?;
    cli.overrides.apply(&mut config);
    let app = App::new(config);

    match cli.command.unwrap_or(Command::Render) {
        Command::Render => {
            let summary = app.render()
                             .with_context(|| format!("replot run failed ({})", app.config().plot_config.display()))?;
            print_summary(&summary);
        }
        Command::Plan => {
            let (state, plan) = app.plan()
                                   .with_context(|| format!("failed to plan {}", app.config().plot_config.display()))?;
            if plan.forced {
                println!("# full rerender (renderer newer than hash store, or --force)");
            }
            for d in &plan.render {
                println!("render {:<40} {}", d.id, d.reason.describe());
            }
            for d in &plan.skip {
                println!("skip   {:<40} {}", d.id, d.reason.describe());
            }
            for (id, e) in &state.digest_failures {
                println!("error  {:<40} {e}", id);
            }
        }
        Command::Hashes => {
            let fingerprints = app.hashes()
                                  .with_context(|| format!("failed to read {}", app.config().plot_config.display()))?;
            println!("id,fingerprint");
            for (id, fp) in &fingerprints {
                println!("{id},{fp}");
            }
        }
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    for (id, outcome) in &summary.report.outcomes {
        match outcome {
            EntryOutcome::Rendered { outputs } => println!("rendered {id} ({} files)", outputs.len()),
            EntryOutcome::Skipped(_) => {}
            EntryOutcome::DataFailed(e) => println!("FAILED   {id}: {e}"),
            EntryOutcome::RenderFailed(e) => println!("FAILED   {id}: {e}"),
        }
    }
    println!("{} rendered, {} skipped, {} failed; hash store updated at {}",
             summary.rendered_count(),
             summary.report.skipped_count(),
             summary.report.failure_count(),
             summary.saved_at.to_rfc3339());
}

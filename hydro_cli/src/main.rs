//! # Aqueduct Design CLI
//!
//! Runs flume hydraulic designs from `.aqd` project files.
//!
//! ```text
//! hydro_cli template --output aqueduct.aqd
//! hydro_cli design --input aqueduct.aqd --output result.json
//! hydro_cli demo --trace
//! hydro_cli equations > EQUATIONS.md
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use hydro_core::calculations::flume_design::{calculate, FlumeDesignInput, FlumeDesignResult};
use hydro_core::calculations::freeboard::GoverningFlow;
use hydro_core::equations::generate_equations_markdown;
use hydro_core::project::{DesignSettings, Project};
use hydro_core::{load_project, save_project, save_result};

/// Aqueduct flume hydraulic design
#[derive(Parser)]
#[command(name = "hydro_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Aqueduct flume hydraulic design", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print every computed quantity after the summary
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the design stored in a project file
    Design(DesignArgs),
    /// Run the built-in U-shell aqueduct example
    Demo,
    /// Write a starter project file
    Template(TemplateArgs),
    /// Print the equation reference as markdown
    Equations,
}

#[derive(Args)]
struct DesignArgs {
    /// Project file (.aqd)
    #[arg(short, long)]
    input: PathBuf,

    /// Write the full result as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct TemplateArgs {
    /// Where to write the project file
    #[arg(short, long, default_value = "aqueduct.aqd")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Design(args) => run_design(args, cli.trace),
        Commands::Demo => run_demo(cli.trace),
        Commands::Template(args) => write_template(args),
        Commands::Equations => {
            print!("{}", generate_equations_markdown());
            Ok(())
        }
    }
}

fn run_design(args: DesignArgs, trace: bool) -> Result<()> {
    let project = load_project(&args.input).with_context(|| format!("loading {}", args.input.display()))?;
    info!(job_id = %project.meta.job_id, engineer = %project.meta.engineer, "project loaded");

    let result = calculate(&project.design, &project.settings)
        .with_context(|| format!("designing '{}'", project.design.label))?;
    print_summary(&project.design, &result, trace);

    if let Some(path) = args.output {
        save_result(&result, &path).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "result written");
    }
    Ok(())
}

fn run_demo(trace: bool) -> Result<()> {
    let input = FlumeDesignInput::example();
    let result = calculate(&input, &DesignSettings::default()).context("running demo design")?;
    print_summary(&input, &result, trace);
    Ok(())
}

fn write_template(args: TemplateArgs) -> Result<()> {
    let project = Project::new("Engineer", "00-000", "Client", FlumeDesignInput::example());
    save_project(&project, &args.output).with_context(|| format!("writing {}", args.output.display()))?;
    println!("Template written to {}", args.output.display());
    Ok(())
}

fn pass_fail(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "FAIL"
    }
}

fn print_summary(input: &FlumeDesignInput, r: &FlumeDesignResult, trace: bool) {
    let sym = input.flume.kind.dimension_symbol();
    let fb = &r.freeboard;
    let fl = &r.floor;
    let e = fl.elevations;

    println!("═══════════════════════════════════════");
    println!("  AQUEDUCT DESIGN: {}", r.label);
    println!("═══════════════════════════════════════");
    println!();
    println!("Discharge:");
    println!("  Q_s = {:.3} m³/s (design)", input.design_discharge);
    println!("  Q_j = {:.3} m³/s (checked)", input.checked_discharge);
    println!();
    println!("Flume ({}):", input.flume.kind.display_name());
    println!(
        "  {sym} window  [{:.3}, {:.3}] m  {}",
        r.width.lower_bound,
        r.width.upper_bound,
        if r.width.is_feasible { "" } else { "(empty)" }
    );
    println!("  {sym} adopted {:.3} m  [{}]", r.dimension, pass_fail(r.dimension_in_window()));
    println!();
    println!("Wall height:");
    println!("  h_s = {:.3} m   H_s = {:.3} m", fb.design_depth, fb.design_requirement);
    println!("  h_j = {:.3} m   H_j = {:.3} m", fb.checked_depth, fb.checked_requirement);
    let governs = match fb.governing {
        GoverningFlow::Design => "design flow",
        GoverningFlow::Checked => "checked flow",
    };
    println!("  H   = {:.3} m ({governs} governs)", fb.required_height);
    println!("  freeboard at Q_s {:.3} m", fb.design_freeboard());
    println!("  adopted {:.3} m  [{}]", r.wall_height, pass_fail(r.wall_height_adequate));
    println!();
    println!("Water-surface drop at Q_s:");
    println!("  Z1 = {:.4} m  Z2 = {:.4} m  Z3 = {:.4} m", fl.inlet_drop, fl.flume_drop, fl.outlet_recovery);
    println!("  ΔZ = {:.4} m", fl.total_drop);
    println!();
    println!("Floor elevations:");
    println!("  N3 = {:.3} m (upstream canal)", e.upstream_canal);
    println!("  N1 = {:.3} m (flume inlet)", e.flume_inlet);
    println!("  N2 = {:.3} m (flume outlet)", e.flume_outlet);
    println!("  N4 = {:.3} m (downstream canal)", e.downstream_canal);
    println!();
    println!(
        "Backwater profile at Q_s: upstream depth {:.4} m (max {} iterations per reach)",
        r.design_profile.upstream_depth(),
        r.design_profile.max_iterations()
    );
    println!();
    println!(
        "Backwater profile at Q_j (max {} iterations per reach):",
        r.checked_profile.max_iterations()
    );
    println!("  {:<22} {:>8}", "Downstream canal", format!("{:.4}", r.checked_profile.boundary_depth));
    for reach in &r.checked_profile.reaches {
        println!("  {:<22} {:>8}", reach.label, format!("{:.4}", reach.upstream.depth));
    }
    println!();
    let rc = &r.rise_check;
    println!(
        "Rise check: h0 = {:.4} m, allowed {:.4} m ({:.3} x {:.4})  [{}]",
        rc.computed_depth,
        rc.allowed,
        rc.limit_ratio,
        rc.normal_depth,
        pass_fail(rc.passes)
    );
    println!("  rise above normal depth {:.4} m (ratio {:.4})", rc.rise(), rc.ratio());
    println!();
    println!("Overall: {}", if r.passes() { "PASS" } else { "CHECK REQUIRED" });

    if trace {
        println!();
        println!("Calculation trace ({} entries):", r.report.len());
        print!("{}", r.report.to_text());
    }
}

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use threephase::{CasError, ReportOptions, Result, catalog, cli, find};

#[derive(Parser)]
#[command(name = "threephase")]
#[command(about = "Closed-form solutions for three-phase elastic layers and cylinders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalogued problems
    List,
    /// Solve a problem and print factored closed forms
    Solve {
        /// Problem id (see `list`)
        id: String,
        /// Print every unknown instead of the reported ones
        #[arg(long)]
        all: bool,
        /// Substitute the solution back and report the residual check
        #[arg(long)]
        verify: bool,
        /// Specialise a parameter before solving, e.g. `--set eT=0 --set x2=x1`
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },
    /// Print the equation system of a problem
    Show {
        /// Problem id (see `list`)
        id: String,
        /// Specialise a parameter, e.g. `--set mu_beta=mu_alpha`
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,
    },
}

fn main() -> ExitCode {
    cli::init_tracing();

    let args = Cli::parse();

    cli::finish(run(args.command))
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::List => cmd_list(),
        Commands::Solve {
            id,
            all,
            verify,
            set,
        } => cmd_solve(
            &id,
            ReportOptions {
                all_unknowns: all,
                verify,
            },
            &set,
        ),
        Commands::Show { id, set } => cmd_show(&id, &set),
    }
}

fn cmd_list() -> Result<()> {
    for problem in catalog() {
        println!(
            "  {:<28} {} ({}, reports {})",
            problem.id,
            problem.title,
            problem.geometry,
            problem.reported.join(", ")
        );
    }
    Ok(())
}

fn cmd_solve(id: &str, options: ReportOptions, set: &[String]) -> Result<()> {
    let problem = specialise(id, set)?;
    for line in problem.solve()?.report(options)? {
        println!("{line}");
    }
    Ok(())
}

fn cmd_show(id: &str, set: &[String]) -> Result<()> {
    for line in specialise(id, set)?.describe()? {
        println!("{line}");
    }
    Ok(())
}

fn specialise(id: &str, set: &[String]) -> Result<threephase::Problem> {
    let problem = find(id)?;
    if set.is_empty() {
        return Ok(problem);
    }
    let pairs = set
        .iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(name, value)| (name.trim(), value.trim()))
                .ok_or_else(|| CasError::Parse(format!("expected NAME=VALUE, got `{entry}`")))
        })
        .collect::<Result<Vec<_>>>()?;
    problem.with_parameters(&pairs)
}

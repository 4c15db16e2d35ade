//! rxn2ode - compile reaction-network CSV tables into an ODE/DDE function
//!
//! Usage: rxn2ode <reactions.csv> <parameters.csv> <ratelaws.csv> [options]
//!
//! Options:
//!   -o, --output <path>        Write the generated function to <path>
//!                              (default: stdout)
//!   -s, --sidecar <path>       Write the species symbol table to <path>
//!       --json-symbols <path>  Also write the symbol table as JSON
//!   -n, --name <name>          Emitted function name (default: model!)
//!       --strict               Abort on the first per-reaction failure
//!   -h, --help                 Show help and exit
//!   -v, --version              Show version and exit

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use rxn2ode::{compile_files, CompileOptions};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "Usage: rxn2ode <reactions.csv> <parameters.csv> <ratelaws.csv> [options]

Options:
  -o, --output <path>        Write the generated function to <path> (default: stdout)
  -s, --sidecar <path>       Write the species symbol table to <path>
      --json-symbols <path>  Also write the symbol table as JSON
  -n, --name <name>          Emitted function name (default: model!)
      --strict               Abort on the first per-reaction failure
  -h, --help                 Show help and exit
  -v, --version              Show version and exit";

struct Args {
    reactions: PathBuf,
    parameters: PathBuf,
    rate_laws: PathBuf,
    output: Option<PathBuf>,
    sidecar: Option<PathBuf>,
    json_symbols: Option<PathBuf>,
    function_name: String,
    strict: bool,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut tables = Vec::new();
    let mut output = None;
    let mut sidecar = None;
    let mut json_symbols = None;
    let mut function_name = "model!".to_string();
    let mut strict = false;

    let take_value = |i: &mut usize, flag: &str| -> Result<String> {
        *i += 1;
        args.get(*i)
            .cloned()
            .with_context(|| format!("{flag} requires a value"))
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => output = Some(PathBuf::from(take_value(&mut i, "--output")?)),
            "-s" | "--sidecar" => sidecar = Some(PathBuf::from(take_value(&mut i, "--sidecar")?)),
            "--json-symbols" => {
                json_symbols = Some(PathBuf::from(take_value(&mut i, "--json-symbols")?))
            }
            "-n" | "--name" => function_name = take_value(&mut i, "--name")?,
            "--strict" => strict = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            "-v" | "--version" => {
                println!("rxn2ode {VERSION}");
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown option '{other}'\n{USAGE}"),
            _ => tables.push(PathBuf::from(&args[i])),
        }
        i += 1;
    }

    if tables.len() != 3 {
        bail!(
            "expected three table paths (reactions, parameters, ratelaws), got {}\n{USAGE}",
            tables.len()
        );
    }
    let mut tables = tables.into_iter();

    Ok(Args {
        reactions: tables.next().unwrap(),
        parameters: tables.next().unwrap(),
        rate_laws: tables.next().unwrap(),
        output,
        sidecar,
        json_symbols,
        function_name,
        strict,
    })
}

fn run(args: Args) -> Result<()> {
    let options = CompileOptions {
        strict: args.strict,
        function_name: args.function_name,
        sources: None,
    };

    let compiled = compile_files(&args.reactions, &args.parameters, &args.rate_laws, &options)
        .context("compilation failed")?;

    tracing::info!(
        equations = compiled.stats.equations,
        delays = compiled.stats.delays,
        dropped = compiled.stats.dropped,
        kind = ?compiled.kind,
        "compiled reaction network"
    );

    match &args.output {
        Some(path) => std::fs::write(path, &compiled.source)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", compiled.source),
    }

    if let Some(path) = &args.sidecar {
        std::fs::write(path, compiled.symbol_table.render())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if let Some(path) = &args.json_symbols {
        let json = compiled.symbol_table.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match run(parsed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

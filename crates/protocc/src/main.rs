use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::PossibleValuesParser;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use protocc_core::{BuildContext, Language};
use protocc_exec::{CommandObserver, DockerCli, EchoObserver, Pipeline, TracingObserver};

mod config;
mod error;

use config::Config;
use error::format_error;

const USAGE_NO_LANGUAGE: &str = "Must choose an output language with --out";

#[derive(Parser)]
#[command(
    name = "protocc",
    version,
    about = "Compile protobufs (protoc) inside a container (protocc)!"
)]
struct Cli {
    /// List of languages to output. Example: `--out go`
    #[arg(long, num_args = 1.., value_parser = PossibleValuesParser::new(Language::NAMES.iter().copied()))]
    out: Vec<String>,
    /// Config file (defaults to ./protocc.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Docker-compatible engine binary
    #[arg(long)]
    engine: Option<String>,
    /// Use the shared tmp/protocc image and protocc container names
    #[arg(long)]
    fixed_names: bool,
    /// Log engine commands through tracing instead of echoing them
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.out.is_empty() {
        println!("{USAGE_NO_LANGUAGE}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = config::current_dir()?;
    let mut config = Config::load(cli.config.as_deref(), &cwd)?;
    if let Some(engine) = cli.engine {
        config.engine.binary = engine;
    }
    if cli.fixed_names {
        config.engine.unique_names = false;
    }

    let context =
        BuildContext::new(&cwd, config.resolve_gopath()).with_versions(config.versions.clone());
    let engine = DockerCli::new(config.engine.binary.clone());
    let observer: Box<dyn CommandObserver> = if cli.quiet {
        Box::new(TracingObserver)
    } else {
        Box::new(EchoObserver)
    };

    let reports = Pipeline::new(&engine, observer.as_ref(), ".", context)
        .with_unique_names(config.engine.unique_names)
        .run(&cli.out)?;
    for report in &reports {
        info!(
            language = %report.language,
            dirs = report.dirs.len(),
            files = report.files.len(),
            "generated"
        );
    }
    Ok(())
}

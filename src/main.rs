use shadowmap::{Error, ReconcileConfig, ReconcileOptions, Reconciler, Result};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

const USAGE: &str =
    "shadowmap [--config FILE] [--compiler-root DIR] [--input FILE] [--verbose] <workspace-root>";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    compiler_root: Option<PathBuf>,
    input: Option<PathBuf>,
    verbose: bool,
    workspace_root: PathBuf,
}

fn parse_args(raw: &[String]) -> Result<Args> {
    let mut args = Args::default();
    let mut root = None;
    let mut iter = raw.iter();

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .map(PathBuf::from)
                .ok_or_else(|| Error::Usage(format!("{flag} needs a value\n{USAGE}")))
        };
        match arg.as_str() {
            "--config" => args.config = Some(value("--config")?),
            "--compiler-root" => args.compiler_root = Some(value("--compiler-root")?),
            "--input" => args.input = Some(value("--input")?),
            "-v" | "--verbose" => args.verbose = true,
            "-h" | "--help" => return Err(Error::Usage(USAGE.to_string())),
            other if other.starts_with('-') => {
                return Err(Error::Usage(format!("unknown flag {other}\n{USAGE}")))
            }
            other => {
                if root.replace(PathBuf::from(other)).is_some() {
                    return Err(Error::Usage(format!("only one workspace root\n{USAGE}")));
                }
            }
        }
    }

    args.workspace_root = root.ok_or_else(|| Error::Usage(USAGE.to_string()))?;
    Ok(args)
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("SHADOWMAP_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_output(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => shadowmap::error::read_text(path),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| Error::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(text)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => ReconcileConfig::load(path)?,
        None => ReconcileConfig::default(),
    };
    let workspace_root = std::path::absolute(&args.workspace_root).map_err(|source| Error::Io {
        path: args.workspace_root.clone(),
        source,
    })?;
    let output = read_output(args.input.as_ref())?;
    debug!(bytes = output.len(), root = %workspace_root.display(), "read compiler output");

    let options = ReconcileOptions {
        compiler_root: args.compiler_root,
    };
    let diagnostics = Reconciler::new(config).reconcile_with(&output, &workspace_root, &options);

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &diagnostics)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(stdout))
        .map_err(|source| Error::Io {
            path: PathBuf::from("<stdout>"),
            source,
        })
}

fn main() -> ExitCode {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    setup_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use eloquery::{Config, NamespacePolicy, Position, resolve_model_at};

/// Probe which Eloquent model the query-builder call at a cursor
/// position resolves to.
#[derive(Parser)]
#[command(name = "eloquery", version, about)]
struct Args {
    /// PHP file to inspect.
    file: PathBuf,

    /// Zero-based cursor line.
    #[arg(long)]
    line: u32,

    /// Zero-based cursor column.
    #[arg(long)]
    character: u32,

    /// Trigger method name (repeatable); defaults to the builtin set.
    #[arg(long = "trigger")]
    triggers: Vec<String>,

    /// Return unqualified names as-is instead of prefixing the current
    /// namespace.
    #[arg(long)]
    bare_names: bool,

    /// Emit the result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(serde::Serialize)]
struct Outcome<'a> {
    class: Option<&'a str>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let source = match std::fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("eloquery: {}: {}", args.file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let mut config = Config::default();
    if !args.triggers.is_empty() {
        config.trigger_methods = args.triggers;
    }
    if args.bare_names {
        config.namespace_policy = NamespacePolicy::Bare;
    }

    let cursor = Position::new(args.line, args.character);
    let class = resolve_model_at(&source, cursor, &config);

    if args.json {
        let outcome = Outcome {
            class: class.as_deref(),
        };
        println!("{}", serde_json::to_string(&outcome).unwrap_or_default());
    } else {
        match &class {
            Some(name) => println!("{}", name),
            None => println!("(no model)"),
        }
    }
    ExitCode::SUCCESS
}

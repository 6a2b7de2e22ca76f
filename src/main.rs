use clap::{Parser, Subcommand};
use filter_expressions::{compile, try_evaluate, Options, Settings};
use serde_json::Value;
use tracing::Level;

/// Evaluate filter expressions or compile them to MongoDB queries.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Evaluation settings as JSON, e.g. '{"unknownOperator":"strict"}'
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Log each evaluation step to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an expression against an optional JSON context
    Eval {
        /// Expression as JSON, e.g. '["==", "a", 1]'
        expr: String,
        /// Context object as JSON
        #[arg(long)]
        context: Option<String>,
    },
    /// Compile an expression to a MongoDB filter document
    Compile {
        /// Expression as JSON
        expr: String,
    },
}

fn parse_json(what: &str, text: &str) -> Value {
    match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid {what} JSON: {e}");
            std::process::exit(1);
        }
    }
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::TRACE } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    // Build options.
    let settings = match args.settings.as_deref() {
        Some(s) => match serde_json::from_str::<Settings>(s) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Invalid settings: {e}");
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let options = Options::new().with_settings(settings);

    let result = match &args.command {
        Command::Eval { expr, context } => {
            let expr = parse_json("expression", expr);
            let context = context.as_deref().map(|c| parse_json("context", c));
            try_evaluate(&expr, context.as_ref(), &options).map_err(|e| e.to_string())
        }
        Command::Compile { expr } => {
            let expr = parse_json("expression", expr);
            compile(&expr, &options).map_err(|e| e.to_string())
        }
    };

    match result {
        Ok(out) => match serde_json::to_string_pretty(&out) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

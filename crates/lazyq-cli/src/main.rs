//! lazyq CLI: run a query over a JSON document and print the result as JSON.

use clap::{Parser, Subcommand, ValueEnum};
use lazyq_core::config::QueryConfig;
use lazyq_core::{Key, Value};
use lazyq_exec::Query;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lazyq")]
#[command(about = "lazyq: deferred LINQ-style queries over JSON lists and objects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a query against a JSON document
    Eval {
        /// Path to a JSON array or object
        #[arg(short, long)]
        input: PathBuf,

        /// Keep only elements of this kind (int, float, string, list, map, ...)
        #[arg(long)]
        of_type: Option<String>,

        /// Sort by element value before slicing
        #[arg(long)]
        sort: bool,

        /// Sort descending (implies --sort)
        #[arg(long)]
        descending: bool,

        /// Skip this many elements
        #[arg(long)]
        skip: Option<usize>,

        /// Keep at most this many elements
        #[arg(long)]
        take: Option<usize>,

        /// Reject sources with more elements (overrides LAZYQ_MAX_SOURCE_LEN)
        #[arg(long)]
        max_source_len: Option<usize>,

        /// Terminal operator to run
        #[arg(value_enum)]
        terminal: Terminal,

        /// JSON operand for index-of, last-index-of, and contains
        #[arg(long)]
        value: Option<String>,
    },

    /// Check that a JSON document can be queried and print its element count
    Validate {
        /// Path to a JSON array or object
        #[arg(short, long)]
        input: PathBuf,

        /// Reject sources with more elements (overrides LAZYQ_MAX_SOURCE_LEN)
        #[arg(long)]
        max_source_len: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Terminal {
    ToArray,
    ToDictionary,
    First,
    Last,
    Single,
    Count,
    Average,
    Rank,
    IndexOf,
    LastIndexOf,
    Contains,
}

/// Non-terminal steps selected on the command line, applied in a fixed order.
#[derive(Debug, Default)]
struct Steps {
    of_type: Option<String>,
    sort: bool,
    descending: bool,
    skip: Option<usize>,
    take: Option<usize>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            input,
            of_type,
            sort,
            descending,
            skip,
            take,
            max_source_len,
            terminal,
            value,
        } => {
            let steps = Steps {
                of_type,
                sort,
                descending,
                skip,
                take,
            };
            match run_eval(&input, max_source_len, &steps, terminal, value.as_deref()) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Validate {
            input,
            max_source_len,
        } => match validate_input(&input, max_source_len) {
            Ok(len) => println!("✓ Source is valid ({len} elements)"),
            Err(e) => {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn load_config(max_source_len: Option<usize>) -> QueryConfig {
    let mut config = QueryConfig::from_env();
    if let Some(limit) = max_source_len {
        config.max_source_len = Some(limit);
    }
    config
}

fn load_query(path: &Path, config: QueryConfig) -> Result<Query, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(Query::from_json_str(&text)?.with_config(config)?)
}

fn validate_input(path: &Path, max_source_len: Option<usize>) -> Result<usize, Box<dyn std::error::Error>> {
    let query = load_query(path, load_config(max_source_len))?;
    Ok(query.source().len())
}

fn run_eval(
    path: &Path,
    max_source_len: Option<usize>,
    steps: &Steps,
    terminal: Terminal,
    value: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    let query = apply_steps(load_query(path, load_config(max_source_len))?, steps)?;
    let operand = value.map(serde_json::from_str::<serde_json::Value>).transpose()?;
    let result = evaluate(&query, terminal, operand.map(Value::from))?;
    Ok(serde_json::to_string_pretty(&result)?)
}

fn apply_steps(mut query: Query, steps: &Steps) -> lazyq_core::Result<Query> {
    if let Some(kind) = &steps.of_type {
        query = query.of_type_name(kind)?;
    }
    if steps.descending {
        query = query.order_by_descending(|v, _| v.clone());
    } else if steps.sort {
        query = query.order_by(|v, _| v.clone());
    }
    if let Some(n) = steps.skip {
        query = query.skip(n);
    }
    if let Some(n) = steps.take {
        query = query.take(n);
    }
    Ok(query)
}

fn evaluate(
    query: &Query,
    terminal: Terminal,
    operand: Option<Value>,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let key_json = |key: Option<Key>| key.map_or(serde_json::Value::Null, |k| k.to_value().to_json());
    let json = match terminal {
        Terminal::ToArray => Value::List(query.to_array()?).to_json(),
        Terminal::ToDictionary => Value::Map(query.to_dictionary()?).to_json(),
        Terminal::First => query.first(None)?.to_json(),
        Terminal::Last => query.last(None)?.to_json(),
        Terminal::Single => query.single(None)?.to_json(),
        Terminal::Count => serde_json::Value::from(query.count(None)?),
        Terminal::Average => query
            .average()?
            .map_or(serde_json::Value::Null, |avg| Value::Float(avg).to_json()),
        Terminal::Rank => serde_json::Value::from(query.rank()?),
        Terminal::IndexOf => key_json(query.index_of(required(operand, "index-of")?, None, None)?),
        Terminal::LastIndexOf => {
            key_json(query.last_index_of(required(operand, "last-index-of")?, None, None)?)
        }
        Terminal::Contains => serde_json::Value::Bool(query.contains(required(operand, "contains")?)?),
    };
    Ok(json)
}

fn required(operand: Option<Value>, terminal: &str) -> Result<Value, String> {
    operand.ok_or_else(|| format!("--value is required for {terminal}"))
}

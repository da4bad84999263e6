//! oxide-ddl CLI
//!
//! Command-line tool for generating and applying `CREATE TABLE` statements
//! from table description files.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl::prelude::*;

/// Generate and apply CREATE TABLE statements from table descriptions.
#[derive(Parser)]
#[command(name = "oxide-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite::memory:")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// How descriptor files are read and rendered.
#[derive(Args)]
struct InputArgs {
    /// Descriptor files; each one is an independent batch.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Field delimiter for delimited files.
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Treat the first line as a header row naming the fields.
    #[arg(long)]
    header: bool,

    /// Keep the single space before the closing parenthesis.
    #[arg(long)]
    legacy: bool,
}

impl InputArgs {
    fn format(&self) -> InputFormat {
        InputFormat::new()
            .delimiter(self.delimiter)
            .header(self.header)
    }

    fn mode(&self) -> FormatMode {
        if self.legacy {
            FormatMode::Legacy
        } else {
            FormatMode::Standard
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print CREATE TABLE statements without touching the database.
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Print each batch as a JSON array.
        #[arg(long)]
        json: bool,
    },

    /// Create the described tables, referenced tables first.
    Apply {
        #[command(flatten)]
        input: InputArgs,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the database's tables as descriptor rows.
    Inspect {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run a SQL statement and print any returned rows.
    Query {
        /// The statement to run.
        sql: String,

        /// Print rows as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate { input, json } => {
            let generator = DdlGenerator::new().mode(input.mode());
            let format = input.format();
            let mut failed = 0;

            for path in &input.files {
                match generate_batch(path, &format, &generator) {
                    Ok(statements) if json => {
                        println!("{}", serde_json::to_string_pretty(&statements)?);
                    }
                    Ok(statements) => {
                        for sql in statements {
                            println!("{sql}");
                        }
                    }
                    Err(err) => {
                        error!(path = %path.display(), "{err}");
                        failed += 1;
                    }
                }
            }

            finish(failed, input.files.len())?;
        }

        Commands::Apply { input, dry_run } => {
            let format = input.format();
            let mut batches = Vec::new();
            let mut failed = 0;
            for path in &input.files {
                match read_batch(path, &format) {
                    Ok(batch) => batches.push(batch),
                    Err(err) => {
                        error!(path = %path.display(), "{err}");
                        failed += 1;
                    }
                }
            }

            let executor = SqliteExecutor::connect(&cli.database).await?;
            let runner = DdlRunner::new(executor)
                .mode(input.mode())
                .dry_run(dry_run);

            for outcome in runner.apply_batches(&batches).await {
                match outcome.result {
                    Ok(report) if report.executed => {
                        info!(
                            source = %outcome.source,
                            "Created tables: {}",
                            report.tables.join(", ")
                        );
                    }
                    Ok(_) => {}
                    Err(_) => failed += 1,
                }
            }

            finish(failed, input.files.len())?;
        }

        Commands::Inspect { json } => {
            let executor = SqliteExecutor::connect(&cli.database).await?;
            let tables = reflect_tables(&executor).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else if tables.is_empty() {
                info!("Database has no tables.");
            } else {
                for column in tables.iter().flat_map(|t| &t.columns) {
                    println!("{}", format_row(column, ','));
                }
            }
        }

        Commands::Query { sql, json } => {
            let executor = SqliteExecutor::connect(&cli.database).await?;
            let rows = executor.fetch_all(&sql).await?;

            if json {
                let objects: Vec<serde_json::Map<String, serde_json::Value>> = rows
                    .iter()
                    .map(|row| {
                        row.columns
                            .iter()
                            .map(|(name, value)| Ok((name.clone(), serde_json::to_value(value)?)))
                            .collect::<Result<_>>()
                    })
                    .collect::<Result<_>>()?;
                println!("{}", serde_json::to_string_pretty(&objects)?);
            } else if let Some(first) = rows.first() {
                let header: Vec<&str> = first.columns.iter().map(|(n, _)| n.as_str()).collect();
                println!("{}", header.join("\t"));
                for row in &rows {
                    let values: Vec<String> =
                        row.columns.iter().map(|(_, v)| v.to_string()).collect();
                    println!("{}", values.join("\t"));
                }
            } else {
                info!("Statement returned no rows.");
            }
        }
    }

    Ok(())
}

/// Reads one descriptor file and renders its statements.
fn generate_batch(
    path: &Path,
    format: &InputFormat,
    generator: &DdlGenerator,
) -> Result<Vec<String>> {
    let batch = read_batch(path, format)?;
    Ok(generator.generate(&batch.descriptors)?)
}

fn finish(failed: usize, total: usize) -> anyhow::Result<()> {
    if failed > 0 {
        anyhow::bail!("{failed} of {total} batches failed");
    }
    Ok(())
}

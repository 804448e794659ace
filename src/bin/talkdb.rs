//! TalkDB CLI: ask a SQLite database questions in plain English.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use talkdb::config::{load_env_file, Config, Overrides};
use talkdb::logging::{init_logging, LogFormat};
use talkdb::render::{error_message, render_answer, render_result, OutputFormat};
use talkdb::storage::create_demo_database;
use talkdb::{server, TextToSql};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "talkdb")]
#[command(about = "Talk to your Database - English questions answered with LLM-generated SQL", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true, env = "TALKDB_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file (default: student.db)
    #[arg(long, global = true, env = "TALKDB_DATABASE")]
    database: Option<PathBuf>,

    /// Completion model (default: llama-3.1-8b-instant on Groq)
    #[arg(long, global = true, env = "TALKDB_MODEL")]
    model: Option<String>,

    /// Override the provider's API base URL
    #[arg(long, global = true, env = "TALKDB_BASE_URL")]
    base_url: Option<String>,

    /// Only run single SELECT statements
    #[arg(long, global = true, env = "TALKDB_READ_ONLY")]
    read_only: bool,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, env = "TALKDB_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format
    #[arg(long, global = true, value_enum, env = "TALKDB_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question and print the query and rows
    Ask {
        /// Natural language question
        question: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Interactive prompt: one question per line, Ctrl-D to quit
    Shell,

    /// Serve the web form
    Serve {
        /// Listen address (default: 127.0.0.1:8501)
        #[arg(long, env = "TALKDB_BIND")]
        bind: Option<String>,
    },

    /// Create the demo STUDENT database
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run SQL directly against the database, skipping the model
    Query {
        /// SQL statement
        sql: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

fn build_pipeline(config: &Config) -> anyhow::Result<TextToSql> {
    let client = config.llm_client()?;
    Ok(TextToSql::new(Arc::new(client), config.executor()?))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing, so `TALKDB_*` flags and API keys can come from `.env`.
    let env_file = load_env_file(None);
    let cli = Cli::parse();

    let bind = match &cli.command {
        Commands::Serve { bind } => bind.clone(),
        _ => None,
    };
    let config = Config::load_or_default(cli.config.as_deref())?.with_overrides(Overrides {
        database: cli.database,
        model: cli.model,
        base_url: cli.base_url,
        read_only: cli.read_only,
        bind,
        log_level: cli.log_level,
        log_format: cli.log_format,
    });
    init_logging(&config.log_level, config.log_format)?;
    if let Some(path) = &env_file {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    match cli.command {
        Commands::Ask { question, format } => {
            let pipeline = build_pipeline(&config)?;
            match pipeline.ask_from(&question, "cli").await {
                Ok(answer) => print!("{}", render_answer(&answer, format)?),
                Err(err) => {
                    eprintln!("{}", error_message(&err).red());
                    std::process::exit(1);
                }
            }
        }

        Commands::Shell => {
            let pipeline = build_pipeline(&config)?;
            println!("{}", "Talk to your Database!".bold());
            println!(
                "   {} model {} · database {}",
                "→".dimmed(),
                pipeline.model().cyan(),
                pipeline.executor().path().display()
            );

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                print!("Input: ");
                std::io::stdout().flush()?;

                let Some(line) = lines.next_line().await? else {
                    println!();
                    break;
                };
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }

                match pipeline.ask_from(question, "shell").await {
                    Ok(answer) => print!("{}", render_answer(&answer, OutputFormat::Table)?),
                    Err(err) => println!("{}", error_message(&err).red()),
                }
            }
        }

        Commands::Serve { .. } => {
            let pipeline = build_pipeline(&config)?;
            let addr: SocketAddr = config
                .bind
                .parse()
                .with_context(|| format!("invalid bind address '{}'", config.bind))?;

            println!("{} Serving on http://{}", "✓".green(), addr);
            server::serve(addr, Arc::new(pipeline)).await?;
        }

        Commands::Init { force } => {
            let path = config.database_path()?;
            let rows = create_demo_database(&path, force)?;
            println!(
                "{} Created {} with {} STUDENT rows",
                "✓".green(),
                path.display(),
                rows
            );
        }

        Commands::Query { sql, format } => {
            let executor = config.executor()?;
            match executor.execute_async(sql.clone()).await {
                Ok(result) => print!("{}", render_result(&sql, &result, format)?),
                Err(err) => {
                    eprintln!("{}", error_message(&err).red());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

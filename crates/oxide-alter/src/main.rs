//! oxide-alter CLI
//!
//! Plans ALTER TABLE migrations between two table definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_alter::{describe_dialects, format_operations, plan_files, plan_options, OutputFormat};

/// Plans ALTER TABLE migrations between two table definitions.
#[derive(Parser)]
#[command(name = "oxide-alter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target SQL dialect.
    #[arg(short, long, env = "OXIDE_ALTER_DIALECT", default_value = "postgresql")]
    dialect: String,

    /// Schema to qualify the table with (ignored by MySQL; the dataset for BigQuery).
    #[arg(short, long, env = "OXIDE_ALTER_SCHEMA")]
    schema: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the operations needed to migrate the table.
    Plan {
        /// Original table definition (JSON).
        original: PathBuf,

        /// Updated table definition (JSON).
        updated: PathBuf,

        /// Match columns by name instead of by initial name.
        #[arg(long)]
        literal: bool,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the SQL for the migration.
    Sql {
        /// Original table definition (JSON).
        original: PathBuf,

        /// Updated table definition (JSON).
        updated: PathBuf,

        /// Match columns by name instead of by initial name.
        #[arg(long)]
        literal: bool,

        /// Do not wrap the statements in BEGIN/COMMIT.
        #[arg(long)]
        no_transaction: bool,
    },

    /// List supported dialects.
    Dialects,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for plans and SQL
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
        Commands::Plan {
            original,
            updated,
            literal,
            format,
        } => {
            let options = plan_options(&cli.dialect, cli.schema.as_deref(), literal, true)?;
            let plan = plan_files(&original, &updated, &options)?;
            if plan.is_empty() && format == OutputFormat::Text {
                info!("No changes detected.");
            } else {
                println!("{}", format_operations(&plan, format)?);
            }
        }

        Commands::Sql {
            original,
            updated,
            literal,
            no_transaction,
        } => {
            let options =
                plan_options(&cli.dialect, cli.schema.as_deref(), literal, !no_transaction)?;
            let plan = plan_files(&original, &updated, &options)?;
            if plan.is_empty() {
                info!("No changes detected.");
            } else {
                info!(
                    "{} statement(s) for {} ({})",
                    plan.statements.len(),
                    plan.table,
                    plan.dialect
                );
                println!("{}", plan.to_sql());
            }
        }

        Commands::Dialects => {
            println!("{}", describe_dialects());
        }
    }

    Ok(())
}

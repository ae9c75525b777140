//! sqlseed CLI
//!
//! Command-line tool for turning CSV files into tables.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use sqlseed_load::prelude::*;

/// Create and fill MySQL/PostgreSQL tables from CSV files.
#[derive(Parser)]
#[command(name = "sqlseed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL. Without a URL or server config, SQL is printed only.
    #[arg(short, long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// JSON connection file (user, password, host, port, database).
    #[arg(short, long)]
    server_config: Option<PathBuf>,

    /// JSON synthesizer settings; flags given on the command line win.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQL dialect [default: mysql].
    #[arg(long, value_enum)]
    dialect: Option<DialectKind>,

    /// Print SQL without executing.
    #[arg(long)]
    dry_run: bool,

    /// Rows per INSERT statement, 0 for a single statement [default: 1000].
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Rows inspected for type inference [default: 100000].
    #[arg(long)]
    sample_rows: Option<usize>,

    /// Emit CREATE TABLE IF NOT EXISTS.
    #[arg(long)]
    if_not_exists: bool,

    /// Use a connection pool instead of a single connection.
    #[arg(long)]
    pooled: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a table shaped like a CSV file.
    CreateTable {
        /// Source file.
        file: PathBuf,

        /// Primary key column (repeat for a composite key).
        #[arg(short, long)]
        primary_key: Vec<String>,

        /// Table name (defaults to the file stem).
        #[arg(short, long)]
        table: Option<String>,
    },

    /// Insert every row of a CSV file.
    Insert {
        /// Source file.
        file: PathBuf,

        /// Update existing rows that collide on this column.
        #[arg(short, long)]
        update_key: Option<String>,

        /// Table name (defaults to the file stem).
        #[arg(short, long)]
        table: Option<String>,
    },

    /// Create and fill one table per matching file.
    Load {
        /// File pattern, e.g. 'data/*.csv'.
        pattern: String,

        /// Primary key for a table: `table=col` or `table=col1,col2`.
        #[arg(short, long, value_parser = parse_key)]
        key: Vec<(String, Vec<String>)>,
    },

    /// List databases.
    Databases,

    /// Create a database.
    CreateDatabase {
        /// Database name.
        name: String,
    },

    /// Drop a database.
    DropDatabase {
        /// Database name.
        name: String,
    },

    /// Select the default database.
    Use {
        /// Database name.
        name: String,
    },

    /// List tables.
    Tables,

    /// List the columns of a table.
    Columns {
        /// Table name.
        table: String,
    },

    /// Drop tables.
    DropTables {
        /// Table names.
        #[arg(required = true)]
        tables: Vec<String>,
    },

    /// Copy a table with its rows.
    CloneTable {
        /// Source table.
        source: String,

        /// Target table (defaults to `<source>_copy`).
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Drop a column.
    DropColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Show the rows of a table.
    Select {
        /// Table name.
        table: String,

        /// Maximum number of rows.
        #[arg(short, long)]
        limit: Option<u64>,
    },
}

fn parse_key(raw: &str) -> std::result::Result<(String, Vec<String>), String> {
    let (table, columns) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected table=column, got '{raw}'"))?;
    let columns: Vec<String> = columns
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if table.is_empty() || columns.is_empty() {
        return Err(format!("expected table=column, got '{raw}'"));
    }
    Ok((table.to_string(), columns))
}

fn synth_config(cli: &Cli) -> anyhow::Result<SynthConfig> {
    let mut config = match &cli.config {
        Some(path) => SynthConfig::load(path)?,
        None => SynthConfig::default(),
    };
    if let Some(dialect) = cli.dialect {
        config.dialect = dialect;
    }
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(sample_rows) = cli.sample_rows {
        config.sample_rows = sample_rows;
    }
    config.dry_run |= cli.dry_run;
    config.if_not_exists |= cli.if_not_exists;
    Ok(config)
}

async fn connect(cli: &Cli, config: &SynthConfig) -> anyhow::Result<Option<ExecutionHandle>> {
    if config.dry_run {
        info!("Dry run mode - SQL will be printed but not executed.");
        return Ok(None);
    }
    let url = match (&cli.database_url, &cli.server_config) {
        (Some(url), _) => url.clone(),
        (None, Some(path)) => ServerConfig::load(path)?.url(config.dialect),
        (None, None) => {
            info!("No database given - SQL will be printed but not executed.");
            return Ok(None);
        }
    };
    let handle = if cli.pooled {
        ExecutionHandle::connect_engine(&url, 5).await?
    } else {
        ExecutionHandle::connect_cursor(&url).await?
    };
    Ok(Some(handle))
}

async fn run(
    synth: &SchemaSynthesizer,
    handle: &mut Option<ExecutionHandle>,
    statements: &[String],
) -> anyhow::Result<()> {
    for sql in statements {
        match synth.execute_or_render(sql, handle.as_mut()).await? {
            Outcome::Rendered(sql) => println!("{sql};"),
            Outcome::Executed(result) => info!(rows = result.rows_affected, "Statement executed"),
        }
    }
    Ok(())
}

async fn list(
    synth: &SchemaSynthesizer,
    handle: &mut Option<ExecutionHandle>,
    sql: String,
) -> anyhow::Result<()> {
    match handle.as_mut() {
        Some(handle) => {
            for value in handle.fetch_strings(&sql).await? {
                println!("{value}");
            }
            Ok(())
        }
        None => run(synth, &mut None, &[sql]).await,
    }
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

    let config = synth_config(&cli)?;
    let mut handle = connect(&cli, &config).await?;
    let synth = SchemaSynthesizer::new(config);
    let renderer = synth.renderer();

    match cli.command {
        Commands::CreateTable {
            file,
            primary_key,
            table,
        } => {
            let sql = synth.file_table_statement(&file, table.as_deref(), &primary_key)?;
            run(&synth, &mut handle, &[sql]).await?;
        }

        Commands::Insert {
            file,
            update_key,
            table,
        } => {
            let statements =
                synth.file_insert_statements(&file, table.as_deref(), update_key.as_deref())?;
            run(&synth, &mut handle, &statements).await?;
        }

        Commands::Load { pattern, key } => {
            let keys: HashMap<String, Vec<String>> = key.into_iter().collect();
            let summary = synth
                .batch_load_directory(&pattern, &keys, handle.as_mut())
                .await?;

            for loaded in &summary.loaded {
                for sql in &loaded.statements {
                    println!("{sql};");
                }
                info!(table = %loaded.table, rows = loaded.rows, "Loaded");
            }
            if !summary.missing_primary_key.is_empty() {
                warn!(
                    tables = %summary.missing_primary_key.join(", "),
                    "No primary key assigned"
                );
            }
            if let Some(failure) = summary.failure {
                return Err(anyhow::Error::new(failure.error)
                    .context(format!("loading {}", failure.path.display())));
            }
        }

        Commands::Databases => list(&synth, &mut handle, renderer.show_databases()).await?,

        Commands::CreateDatabase { name } => {
            run(&synth, &mut handle, &[renderer.create_database(&name)]).await?;
        }

        Commands::DropDatabase { name } => {
            run(&synth, &mut handle, &[renderer.drop_database(&name)]).await?;
        }

        Commands::Use { name } => {
            run(&synth, &mut handle, &[renderer.use_database(&name)?]).await?;
        }

        Commands::Tables => list(&synth, &mut handle, renderer.show_tables()).await?,

        Commands::Columns { table } => {
            list(&synth, &mut handle, renderer.show_columns(&table)).await?;
        }

        Commands::DropTables { tables } => {
            run(&synth, &mut handle, &[renderer.drop_tables(&tables)?]).await?;
        }

        Commands::CloneTable { source, target } => {
            let sql = renderer.clone_table(&source, target.as_deref());
            run(&synth, &mut handle, &[sql]).await?;
        }

        Commands::DropColumn { table, column } => {
            run(&synth, &mut handle, &[renderer.drop_column(&table, &column)]).await?;
        }

        Commands::Select { table, limit } => {
            let sql = renderer.select_from(&table, limit);
            match handle.as_mut() {
                Some(handle) => {
                    for row in handle.fetch_rows(&sql).await? {
                        println!("{}", row.join("\t"));
                    }
                }
                None => run(&synth, &mut None, &[sql]).await?,
            }
        }
    }

    if let Some(handle) = handle {
        handle.close().await?;
    }
    Ok(())
}

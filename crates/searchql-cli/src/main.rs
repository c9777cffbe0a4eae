use anyhow::{bail, Result};
use clap::Parser;

use searchql::{fixtures, CompileOptions};

/// Compiles a searchql query against one of the built-in fixture models
/// and prints the resulting SQL and bound arguments.
///
/// Runs no I/O against a real database; it only calls the compiler and
/// prints what it returns.
#[derive(Parser)]
#[command(name = "search-cli", version, about)]
struct Cli {
    /// Fixture model to compile against (guild, message, user).
    model: String,

    /// Query terms; joined with spaces before parsing.
    query: Vec<String>,

    /// Emit `ORDER BY`/`JOIN`s for declared `always_join` references too.
    #[arg(long)]
    include_foreign_data: bool,

    /// Maximum rows to return.
    #[arg(long)]
    limit: Option<u64>,

    /// Rows to skip; only takes effect alongside `--limit`.
    #[arg(long)]
    offset: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::builder().format_timestamp(None).init();

    let cli = Cli::parse();
    let Some(model) = fixtures::by_name(&cli.model) else {
        bail!(
            "unknown model `{}`; expected one of: guild, message, user",
            cli.model
        );
    };

    let query = cli.query.join(" ");
    let options = CompileOptions {
        include_foreign_data: cli.include_foreign_data,
        limit: cli.limit,
        offset: cli.offset,
        ..Default::default()
    };

    let compiled = searchql::compile_query(&query, model, options)?;

    println!("{}", compiled.sql);
    if !compiled.args.is_empty() {
        println!("args: {:?}", compiled.args);
    }

    Ok(())
}

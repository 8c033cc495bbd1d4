use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{routes::RoutesArgs, schema::SchemaArgs};

mod parsers;
mod routes;
mod schema;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Computes the best route of every order subset of a dispatch problem
    #[command(visible_alias = "r")]
    Routes {
        #[command(flatten)]
        args: RoutesArgs,
    },
    /// Prints the JSON schema of the problem input or of the route output
    Schema {
        #[command(flatten)]
        args: SchemaArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Routes { args } => routes::run(args)?,
        Commands::Schema { args } => schema::run(args)?,
    }

    Ok(())
}

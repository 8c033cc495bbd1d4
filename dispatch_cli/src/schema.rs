use std::path::PathBuf;

use clap::Args;
use dispatch_routes::json::schema::{generate_json_schema, generate_output_json_schema};

#[derive(Args)]
pub struct SchemaArgs {
    /// Print the schema of the route table output instead of the problem input
    #[arg(long)]
    result: bool,

    /// Write the schema to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: SchemaArgs) -> Result<(), anyhow::Error> {
    let schema = if args.result {
        generate_output_json_schema()?
    } else {
        generate_json_schema()?
    };

    match args.output {
        Some(path) => std::fs::write(path, schema)?,
        None => println!("{schema}"),
    }

    Ok(())
}

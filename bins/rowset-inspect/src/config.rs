use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rowset-inspect", about = "Decode a captured query result page")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every row of a result page as `name=value` pairs
    Dump(DumpArgs),
}

#[derive(Args, Clone, Debug)]
pub struct DumpArgs {
    /// JSON result page: `{id, schema, data, error?}`
    #[arg(long)]
    pub input: String,

    /// TOML decoder config
    #[arg(long, env = "ROWSET_CONFIG")]
    pub config: Option<String>,

    /// Session time zone, overrides the config (`UTC`, `+08:00`, ...)
    #[arg(long)]
    pub time_zone: Option<String>,
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "nomad-tool", version, about = "Invoke Nomad API operations by name")]
pub struct Cli {
    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Agent address, e.g. http://127.0.0.1:4646 (overrides NOMAD_ADDR).
    #[arg(long, global = true)]
    pub address: Option<String>,

    /// ACL secret (overrides NOMAD_TOKEN).
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Log filter directive, e.g. "debug" or "nomad_client=trace".
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every operation with a one-line description.
    Operations,

    /// Show an operation's arguments.
    Describe {
        /// Operation name, e.g. list_jobs.
        operation: String,
    },

    /// Run one operation against the agent and print its result.
    Invoke {
        /// Operation name, e.g. drain_node.
        operation: String,

        /// Argument as key=value; repeatable. Non-string arguments are parsed
        /// as JSON (`count=3`, `enable=true`, `items={"k":"v"}`).
        #[arg(long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,

        /// All arguments as one JSON object; `--arg` values take precedence.
        #[arg(long, value_name = "JSON")]
        args_json: Option<String>,
    },
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "custody")]
#[command(about = "Quorum-gated custody wallet tooling")]
pub struct Cli {
    /// Also write ledger events to this file (no ANSI colors)
    #[arg(long, value_name = "FILE", global = true)]
    pub audit_log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a new wallet config
    Init {
        #[arg(short, long, value_name = "OUT", default_value = "wallet.json")]
        out: PathBuf,
        /// Comma separated approver identities, in order
        #[arg(short, long, value_delimiter = ',', required = true)]
        approvers: Vec<String>,
        #[arg(short, long)]
        quorum: usize,
        /// Amount the pool is funded with on deployment
        #[arg(short, long, default_value_t = 0)]
        deposit: u128,
    },
    /// Print approvers and quorum of a wallet config
    Show {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },
    /// Deploy a wallet from CONFIG and replay the operations in SCRIPT
    Run {
        #[arg(short, long, value_name = "CONFIG", default_value = "wallet.json")]
        config: PathBuf,
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
        /// Stop at the first failing operation
        #[arg(long)]
        fail_fast: bool,
    },
}

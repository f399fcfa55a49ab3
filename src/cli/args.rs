use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging for internal details
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the hospital API server (default)
    Serve,
    /// Print the effective configuration
    Show,
    /// Operate the patient queue through the server, or the local cache when it is down
    #[command(subcommand)]
    Token(TokenCommand),
}

#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// Issue a token for a new patient
    Submit(SubmitArgs),
    /// List tokens in creation order
    List,
    /// Show queue statistics in display order
    Stats,
    /// Complete the current patient and call the next one
    CallNext,
    /// Complete the current patient without calling the next one
    Complete,
    /// Remove a token by id
    Remove {
        /// Token id (not the Q-number)
        id: String,
    },
    /// Remove every token and restart numbering at Q001
    Clear,
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Patient name
    pub name: String,

    /// Patient age in years
    pub age: u32,

    /// Patient gender
    pub gender: String,

    /// Department or problem, e.g. "General Checkup"
    pub problem: String,

    /// Queue the patient ahead of normal tokens
    #[arg(short, long)]
    pub emergency: bool,
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "libris",
    about = "Libris — in-memory library catalog",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file of books to load instead of the built-in sample
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Walk through lookups, borrows, and totals (default)
    Demo,
    /// List every book with its copy counts
    List,
    /// Find books by exact author name (case-insensitive)
    Author(QueryArgs),
    /// Find books by exact title (case-insensitive)
    Title(QueryArgs),
    /// Show one book by ISBN
    Isbn(IsbnArgs),
    /// Borrow copies of a book
    Borrow(BorrowArgs),
}

#[derive(Args)]
pub struct QueryArgs {
    pub query: String,
}

#[derive(Args)]
pub struct IsbnArgs {
    pub isbn: String,
}

#[derive(Args)]
pub struct BorrowArgs {
    pub isbn: String,
    #[arg(short = 'n', long, default_value = "1")]
    pub times: u32,
}

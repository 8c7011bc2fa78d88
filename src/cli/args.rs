//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Kerning class manager: class collections, pair tables and leader transplants
#[derive(Parser, Debug)]
#[command(name = "kernrig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .kernrig.toml; relative paths resolve against it (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect and edit class collections
    Classes {
        #[command(subcommand)]
        command: ClassesCommands,
    },

    /// Generate a kerning pair table from a composition
    Pairs {
        /// Composition document (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        composition: PathBuf,
        /// Class collection referenced by the composition
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        classes: PathBuf,
        /// Output pair table
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Drop pairs produced by more than one group
        #[arg(long)]
        dedup: bool,
    },

    /// Copy class leaders from one collection into another
    Transplant {
        /// Collection providing the leaders
        #[arg(value_hint = ValueHint::FilePath)]
        source: PathBuf,
        /// Collection receiving the leaders
        #[arg(value_hint = ValueHint::FilePath)]
        destination: PathBuf,
        /// Write the result here instead of overwriting the destination
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Add leaders missing from the destination class
        #[arg(short, long)]
        force: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClassesCommands {
    /// Show classes as a tree, leader first
    Show {
        /// Class collection (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Import kerning groups from project metadata as classes
    Import {
        /// Group mapping (JSON object of group name to glyph list)
        #[arg(value_hint = ValueHint::FilePath)]
        groups: PathBuf,
        /// Output class collection
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Group prefix (default: group_prefix setting)
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Make a glyph the leader of a class (file edited in place)
    Leader {
        /// Class collection (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Class name
        class: String,
        /// Glyph to promote
        glyph: String,
        /// Add the glyph if the class lacks it
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a commented config template
    Template,
}

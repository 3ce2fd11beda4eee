//! Command-line interface, defined with `clap`'s derive API, grounded on the teacher's
//! own `GlobalArgs`/`Mode` split between "things every subcommand needs" and "the
//! mode enum that decides whether output is colored/has progress bars".

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{crate_description, crate_version, ArgAction, Args, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "sizer", version = crate_version!(), about = crate_description!())]
pub struct CommandLineArgs {
    #[command(flatten)]
    pub global_args: GlobalArgs,

    /// Path to the Git repository to analyze.
    #[arg(value_name = "REPO", default_value = ".")]
    pub repository: PathBuf,

    /// Only report metrics whose level of concern is at least this many stars (0-3).
    ///
    /// A value of 0 shows every metric, including unremarkable ones.
    #[arg(long, default_value_t = 1, value_name = "LEVEL")]
    pub threshold: u8,

    /// Emit the report as JSON instead of an ASCII table.
    #[arg(long)]
    pub json: bool,

    /// Don't reconstruct real paths for the "biggest object" entries in the report;
    /// identify them by hex OID instead.
    ///
    /// Faster and uses less memory on repositories with very large trees, at the cost
    /// of a report that's harder for a human to act on.
    #[arg(long)]
    pub no_names: bool,

    /// Read additional defaults from a TOML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Limit the walk to these references instead of every reference in the repository.
    #[arg(value_name = "REF")]
    pub refs: Vec<String>,
}

#[derive(Args, Debug)]
#[command(next_help_heading = "Global Options")]
pub struct GlobalArgs {
    /// Enable verbose output. Can be repeated up to 3 times for more detail.
    #[arg(global = true, long, short, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error feedback messages and disable progress bars.
    #[arg(global = true, long, short)]
    pub quiet: bool,

    /// Enable or disable colored output.
    #[arg(global = true, long, default_value_t = Mode::Auto, value_name = "MODE", alias = "colour")]
    pub color: Mode,

    /// Enable or disable progress bars.
    #[arg(global = true, long, default_value_t = Mode::Auto, value_name = "MODE")]
    pub progress: Mode,
}

impl GlobalArgs {
    pub fn use_color<T: IsTerminal>(&self, out: T) -> bool {
        match self.color {
            Mode::Never => false,
            Mode::Always => true,
            Mode::Auto => out.is_terminal(),
        }
    }

    pub fn use_progress(&self) -> bool {
        if self.quiet {
            return false;
        }
        match self.progress {
            Mode::Never => false,
            Mode::Always => true,
            Mode::Auto => std::io::stderr().is_terminal(),
        }
    }
}

/// A generic auto/never/always mode value, shared by `--color` and `--progress`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Mode {
    Auto,
    Never,
    Always,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mode::Auto => "auto",
            Mode::Never => "never",
            Mode::Always => "always",
        };
        f.write_str(s)
    }
}

impl CommandLineArgs {
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }
}

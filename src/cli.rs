use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "propsync")]
#[command(version)]
#[command(about = "Reconcile declared user and group properties with the system directory", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (defaults to ~/.config/propsync/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Report changes without enforcing them
    #[arg(long, global = true)]
    pub noop: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that the directory tools are installed
    Probe,

    /// Show current values vs desired values
    Status(StatusArgs),

    /// Make current values match desired values
    Apply(ApplyArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct StatusArgs {
    /// Only show resources matching this name, e.g. "bob" or "user[bob]"
    pub target: Option<String>,

    /// Number of resources inspected in parallel (overrides config)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Only apply resources matching this name, e.g. "bob" or "user[bob]"
    pub target: Option<String>,

    /// Number of resources applied in parallel (overrides config)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Print change events as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::parse_from(["propsync", "--noop", "-vv", "apply", "bob", "--yes", "-j", "2"]);
        assert!(cli.noop);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Apply(args) => {
                assert_eq!(args.target.as_deref(), Some("bob"));
                assert!(args.yes);
                assert_eq!(args.jobs, Some(2));
            }
            _ => panic!("expected apply"),
        }
    }
}

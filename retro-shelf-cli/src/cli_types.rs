//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "retro-shelf")]
#[command(about = "Browse, sync, and launch ROM collections described by es_systems.cfg", long_about = None)]
pub(crate) struct Cli {
    /// Systems config file (defaults to ~/.emulationstation/es_systems.cfg)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Build catalogs from gamelist entries only, without scanning ROM folders
    #[arg(long, global = true)]
    pub gamelist_only: bool,

    /// Do not read or write gamelist.xml files
    #[arg(long, global = true, conflicts_with = "gamelist_only")]
    pub ignore_gamelist: bool,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List configured systems and how many games each has
    List,

    /// Print the game tree of one or all systems
    Tree {
        /// Only show this system
        #[arg(short, long)]
        system: Option<String>,
    },

    /// Merge gamelists with what is on disk and write them back
    Sync {
        /// Report what would change without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Render (and optionally run) a system's launch command for a ROM
    Launch {
        /// System the ROM belongs to
        #[arg(short, long)]
        system: String,

        /// Path to the ROM file
        path: PathBuf,

        /// Run the command through `sh -c` and record the play
        #[arg(long)]
        exec: bool,
    },

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write an example es_systems.cfg and default settings.toml
    Init,
    /// Print the config file locations
    Path,
    /// Show parsed systems and effective settings
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "retro-shelf",
            "launch",
            "--system",
            "nes",
            "roms/Mario.nes",
            "--ignore-gamelist",
            "-v",
        ])
        .unwrap();
        assert!(cli.ignore_gamelist);
        assert!(cli.verbose);
        match cli.command {
            Commands::Launch { system, path, exec } => {
                assert_eq!(system, "nes");
                assert_eq!(path, PathBuf::from("roms/Mario.nes"));
                assert!(!exec);
            }
            _ => panic!("expected launch"),
        }
    }

    #[test]
    fn test_gamelist_modes_conflict() {
        let parsed = Cli::try_parse_from(["retro-shelf", "--gamelist-only", "--ignore-gamelist", "list"]);
        assert!(parsed.is_err());
    }
}

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use modresolve_core::{ConfigLoader, ContextKind, ResolutionRequest, Resolver, ResolverConfig};
use std::path::PathBuf;

use crate::commands::{inspect_command, pack_command, rank_command, resolve_command};

#[derive(Parser, Debug)]
#[command(name = "modresolve")]
#[command(version, about = "Fuzzy module resolution for plug-in hosts", long_about = None)]
#[command(
    after_help = "ENVIRONMENT:\n    RUST_LOG=debug              Enable debug logging\n    MODRESOLVE_CONFIG=<FILE>    Use an explicit config file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a module request and print the module it binds to
    #[command(visible_alias = "r")]
    Resolve {
        /// Requested name, e.g. "Foo, Version=1.0.0.0" or "MyScript.dll"
        name: String,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Show the ranked candidates a resolution would try, without loading
    Rank {
        /// Requested name, e.g. "Foo, Version=1.0.0.0"
        name: String,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Print the header of a module container as JSON
    #[command(visible_alias = "i")]
    Inspect {
        /// Path to the module file
        file: PathBuf,

        /// Also verify the payload checksum
        #[arg(long)]
        verify: bool,
    },
    /// Wrap a payload into a module container
    Pack {
        /// Declared module name
        #[arg(long)]
        name: String,

        /// Declared module version (1 to 4 dotted components)
        #[arg(long)]
        version: String,

        /// Target architecture; omit for architecture-neutral modules
        #[arg(long)]
        arch: Option<String>,

        /// File whose bytes become the payload
        payload: PathBuf,

        /// Container file to write
        output: PathBuf,
    },
}

/// Options shared by the commands that search for modules
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Resolve for inspection only (metadata-only context)
    #[arg(short, long)]
    pub metadata_only: bool,

    /// Name of the module issuing the request
    #[arg(long, value_name = "NAME")]
    pub requesting: Option<String>,

    /// Plug-in install root to search; repeatable
    #[arg(long = "root", value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Extra search folder to register; repeatable
    #[arg(long = "folder", value_name = "DIR")]
    pub folders: Vec<PathBuf>,

    /// Extra module file to register; repeatable
    #[arg(long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Config file to use instead of discovering one
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl SearchArgs {
    pub fn context_kind(&self) -> ContextKind {
        if self.metadata_only {
            ContextKind::MetadataOnly
        } else {
            ContextKind::Normal
        }
    }

    pub fn request(&self, name: &str) -> ResolutionRequest {
        let request = ResolutionRequest::new(name);
        match &self.requesting {
            Some(requesting) => request.with_requesting_module(requesting.clone()),
            None => request,
        }
    }

    /// Discovered (or explicit) config with the command-line locations added
    pub fn load_config(&self) -> Result<ResolverConfig> {
        let cwd = std::env::current_dir().context("Failed to read the working directory")?;
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_with_override(&cwd, Some(path))
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ConfigLoader::load_from_path(&cwd)?,
        };

        config.plugin_roots.extend(self.roots.iter().cloned());
        config.search_folders.extend(self.folders.iter().cloned());
        config.search_files.extend(self.files.iter().cloned());
        Ok(config)
    }

    pub fn build_resolver(&self) -> Result<Resolver> {
        let config = self.load_config()?;
        Ok(Resolver::new(config)?)
    }
}

impl Commands {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Resolve { name, search } => resolve_command(&name, &search),
            Commands::Rank { name, search } => rank_command(&name, &search),
            Commands::Inspect { file, verify } => inspect_command(&file, verify),
            Commands::Pack {
                name,
                version,
                arch,
                payload,
                output,
            } => pack_command(&name, &version, arch.as_deref(), &payload, &output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve_with_search_options() {
        let cli = Cli::try_parse_from([
            "modresolve",
            "resolve",
            "Foo, Version=1.0.0.0",
            "--metadata-only",
            "--root",
            "/a",
            "--root",
            "/b",
            "--requesting",
            "Bar",
        ])
        .unwrap();

        let Commands::Resolve { name, search } = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(name, "Foo, Version=1.0.0.0");
        assert_eq!(search.context_kind(), ContextKind::MetadataOnly);
        assert_eq!(search.roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(search.request(&name).requesting_module.as_deref(), Some("Bar"));
    }

    #[test]
    fn test_pack_requires_name_and_version() {
        assert!(Cli::try_parse_from(["modresolve", "pack", "in.bin", "out.dll"]).is_err());
        assert!(
            Cli::try_parse_from([
                "modresolve",
                "pack",
                "--name",
                "Foo",
                "--version",
                "1.0",
                "in.bin",
                "out.dll"
            ])
            .is_ok()
        );
    }
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use jkds_utility::config::{UtilityConfig, log_path};
use jkds_utility::fs::{self, FileUtils, SymlinkPolicy, UnitConvention};
use jkds_utility::logging;
use jkds_utility::store::{AppStoreLookup, StoreVersion};

#[derive(Parser)]
#[command(name = "jkds-utility")]
#[command(version, about = "File, size and App Store version helpers")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base directory for relative names (defaults to the documents directory)
    #[arg(long, global = true)]
    base: Option<PathBuf>,

    /// Also write logs to the data directory
    #[arg(long, global = true)]
    log_file: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the size of a file or directory
    Size {
        path: PathBuf,
        /// Use 1024-byte units
        #[arg(long)]
        binary: bool,
        /// Follow symbolic links that stay inside the directory
        #[arg(long)]
        follow_links: bool,
    },
    /// Report whether a file exists inside a folder under the base
    Exists { directory: String, file_name: String },
    /// Create a folder under the base
    Mkdir { name: String },
    /// Remove a folder under the base
    Rmdir { name: String },
    /// Remove a file or directory
    Rm { path: PathBuf },
    /// Exclude a folder under the base from backups
    ExcludeBackup { name: String },
    /// Print the version published in the App Store
    FetchVersion {
        #[arg(long)]
        app_id: String,
    },
    /// Compare the App Store version with the running one
    CheckVersion {
        #[arg(long)]
        app_id: String,
        #[arg(long)]
        current: String,
        /// Request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli.log_file.then(log_path);
    let _guard = logging::init(logging::default_directive(cli.verbose), log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => UtilityConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => UtilityConfig::default(),
    };
    if let Some(base) = cli.base {
        config.files.base_dir = Some(base);
    }

    run(cli.command, config)
}

fn run(command: Command, mut config: UtilityConfig) -> anyhow::Result<()> {
    let utils = FileUtils::from_config(&config.files);

    match command {
        Command::Size {
            path,
            binary,
            follow_links,
        } => {
            let mut utils = utils;
            if binary {
                utils = utils.units(UnitConvention::Binary);
            }
            if follow_links {
                utils = utils.symlinks(SymlinkPolicy::FollowWithinTree);
            }
            let size = if path.is_dir() {
                utils.directory_size(&path)
            } else {
                utils.file_size(&path)
            };
            println!(
                "{}\t{} bytes",
                size.format(utils.unit_convention()),
                size.bytes()
            );
        }
        Command::Exists {
            directory,
            file_name,
        } => {
            println!("{}", utils.is_exist_file(&file_name, &directory));
        }
        Command::Mkdir { name } => utils.create_folder(&name)?,
        Command::Rmdir { name } => utils.remove_folder(&name)?,
        Command::Rm { path } => fs::delete(&path)?,
        Command::ExcludeBackup { name } => utils.exclude_from_backup(&name)?,
        Command::FetchVersion { app_id } => {
            let store = StoreVersion::new(AppStoreLookup::from_config(&config.lookup));
            let version = block_on(async move { store.lookup(&app_id).await })??;
            println!("{version}");
        }
        Command::CheckVersion {
            app_id,
            current,
            timeout_ms,
            json,
        } => {
            if timeout_ms.is_some() {
                config.lookup.timeout_ms = timeout_ms;
            }
            let store = StoreVersion::new(AppStoreLookup::from_config(&config.lookup));
            let result =
                block_on(async move { store.check_app_version(&app_id, &current).await })?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                match (&result.store_version, result.difference) {
                    (Some(store_version), Some(difference)) => {
                        println!("{} -> {}: {:?}", result.current_version, store_version, difference)
                    }
                    _ => println!("{}: store version unavailable", result.current_version),
                }
            }
        }
    }

    Ok(())
}

fn block_on<F: std::future::Future>(future: F) -> anyhow::Result<F::Output> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(future))
}

use anyhow::Result;
use clap::Parser;
use semsearch_core::{logging, Config};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "semsearch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Pin requirements.txt to the installed package versions
    ///
    /// Reads the manifest (requirements.txt in the current directory, or
    /// `requirements_path` from the config) line by line:
    ///
    /// - Blank lines, editable installs (-e) and options (--) are kept as is
    /// - Each declaration is rewritten to name==<installed version>
    /// - Packages that are not installed keep their original line and are
    ///   listed in the summary
    ///
    /// Installed versions are read from the site-packages directories of
    /// the configured Python interpreter (`python`, default python3), or
    /// from `site_packages` when set.
    ///
    /// The file is overwritten in place. Running it again without changing
    /// the environment leaves the file untouched.
    Pin,
    /// Create the configured Qdrant collection if it does not exist
    ///
    /// Connects to `qdrant_url` (with `qdrant_api_key` if set), lists the
    /// existing collections and creates `qdrant_collection` with a single
    /// "default" vector field of `vector_size` dimensions, cosine distance
    /// and on-disk storage. An existing collection is left alone.
    EnsureCollection,
    /// Inspect or edit the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file
    Get {
        /// Config key (e.g. qdrant_url)
        key: Option<String>,
    },
    /// Set a value in the config file
    Set {
        /// Config key (e.g. vector_size)
        key: String,
        /// New value
        value: String,
    },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    if let Err(e) = logging::init(&config) {
        eprintln!("warning: logging disabled: {:#}", e);
    }

    match cli.command {
        Commands::Pin => {
            commands::run_pin(&config)?;
        }
        Commands::EnsureCollection => {
            commands::run_ensure_collection(&config).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Get { key } => commands::config::get_config(&config, key)?,
            ConfigAction::Set { key, value } => commands::config::set_config(&key, &value)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}

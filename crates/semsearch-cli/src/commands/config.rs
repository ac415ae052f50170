use anyhow::{Context, Result};
use semsearch_core::{config, Config};
use toml_edit::{value, Array, DocumentMut, Item};

const VALID_KEYS: &str = "qdrant_url, qdrant_api_key, qdrant_collection, vector_size, \
timeout_secs, requirements_path, python, site_packages, log_level, log_coloured";

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  qdrant_url: {}", config.qdrant_url.as_deref().unwrap_or("<not set>"));
    println!("  qdrant_api_key: {}",
        if config.qdrant_api_key.is_some() { "<set>" } else { "<not set>" });
    println!("  qdrant_collection: {}", config.collection());
    println!("  vector_size: {}", config.vector_size());
    println!("  timeout_secs: {}", config.timeout_secs);
    println!("  requirements_path: {}", config.requirements_path.display());
    println!("  python: {}", config.python);
    if config.site_packages.is_empty() {
        println!("  site_packages: <ask {}>", config.python);
    } else {
        println!("  site_packages:");
        for dir in &config.site_packages {
            println!("    - {}", dir.display());
        }
    }
    println!("  log_level: {}", config.log_level);
    println!("  log_coloured: {}", config.log_coloured);

    println!("\nPriority: ENV vars (SEMSEARCH_*) > Config file > QDRANT_*/VECTOR_SIZE > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        // No key provided, show entire config file contents
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'semsearch config init' to create it.");
        }
        return Ok(());
    };

    let not_set = || String::from("<not set>");
    let shown = match key.as_str() {
        "qdrant_url" => config.qdrant_url.clone().unwrap_or_else(not_set),
        "qdrant_api_key" => config.qdrant_api_key.clone().unwrap_or_else(not_set),
        "qdrant_collection" => config.collection().to_string(),
        "vector_size" => config.vector_size().to_string(),
        "timeout_secs" => config.timeout_secs.to_string(),
        "requirements_path" => config.requirements_path.display().to_string(),
        "python" => config.python.clone(),
        "site_packages" => config
            .site_packages
            .iter()
            .map(|dir| dir.display().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        "log_level" => config.log_level.clone(),
        "log_coloured" => config.log_coloured.to_string(),
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    };
    println!("{}", shown);

    Ok(())
}

/// Convert a command-line value into the TOML item stored for `key`.
fn parse_setting(key: &str, raw: &str) -> Result<Item> {
    let item = match key {
        "qdrant_url" | "qdrant_api_key" | "qdrant_collection" | "requirements_path" | "python"
        | "log_level" => value(raw),
        "vector_size" | "timeout_secs" => {
            let number: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number, got '{}'", key, raw))?;
            anyhow::ensure!(number > 0, "{} must be positive, got {}", key, number);
            value(number)
        }
        "log_coloured" => {
            let flag: bool = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be true or false, got '{}'", key, raw))?;
            value(flag)
        }
        "site_packages" => {
            let mut dirs = Array::new();
            for dir in raw.split(',').map(str::trim).filter(|dir| !dir.is_empty()) {
                dirs.push(dir);
            }
            value(dirs)
        }
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    };
    Ok(item)
}

/// Set a config value.
pub fn set_config(key: &str, raw: &str) -> Result<()> {
    let item = parse_setting(key, raw)?;
    let config_path = config::config_file_path();

    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path)
        .context("Failed to read config file")?;
    let mut document: DocumentMut = contents
        .parse()
        .context("Failed to parse config file")?;

    document[key] = item;

    std::fs::write(&config_path, document.to_string())
        .context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, raw);
    println!("  in {}", config_path.display());

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to point semsearch at your Qdrant instance.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

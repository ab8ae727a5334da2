//! The `moments config` command for configuration management.

use clap::{Args, Subcommand};
use moments_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

const INIT_HEADER: &str = "\
# Moments configuration.
#
# Credentials stay out of this file: the ${AZURE_VISION_*} references below
# are resolved from the environment when `moments sync` runs. A `.env` file
# in the working directory is loaded first, e.g.
#
#   AZURE_VISION_ENDPOINT=https://<resource>.cognitiveservices.azure.com/
#   AZURE_VISION_KEY=<subscription key>
#
# description_policy: \"preserve\" keeps captions already in the gallery,
# \"overwrite\" replaces them on every sync.

";

/// Default config with a header explaining where credentials come from.
fn init_template() -> anyhow::Result<String> {
    Ok(format!("{INIT_HEADER}{}", Config::default().to_toml()?))
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(&path, init_template()?)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

//! init command - Create the configuration directory and an example config

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bn_core::{ConfigManager, ConfigMode};
use bn_core::config::LOCAL_CONFIG_DIR;
use clap::Args;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Starter configuration written by `bnav init`
const EXAMPLE_CONFIG: &str = r#"# bucket-nav configuration
schema_version = 1

[defaults]
# auto, always or never
color = "auto"
progress = true

[navigator]
# Most folders and files listed in one menu
max_items = 30

[[profiles]]
name = "local"
endpoint = "http://localhost:9000"
access_key = "YOUR_ACCESS_KEY"
secret_key = "YOUR_SECRET_KEY"
region = "us-east-1"
bucket_lookup = "auto"
default_bucket = "YOUR_BUCKET_NAME"

# Offer several buckets in the bucket menu instead of the default bucket
# [[profiles.buckets]]
# name = "media-prod"
# display_name = "Media"
"#;

/// Initialize the configuration
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Create ./.bnav/ in the working directory instead of the global config
    #[arg(long)]
    pub local: bool,
}

/// Outcome of writing the example config
#[derive(Debug, PartialEq, Eq)]
enum InitOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

fn write_example_config(path: &Path) -> Result<InitOutcome> {
    if path.exists() {
        return Ok(InitOutcome::AlreadyExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {}", parent.display()))?;
    }

    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("writing example config {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("restricting permissions on {}", path.display()))?;
    }

    Ok(InitOutcome::Created(path.to_path_buf()))
}

fn target_path(args: &InitArgs) -> Result<(PathBuf, ConfigMode)> {
    if args.local {
        let cwd = std::env::current_dir().context("reading working directory")?;
        return Ok((cwd.join(LOCAL_CONFIG_DIR).join("config.toml"), ConfigMode::Local));
    }
    let manager = ConfigManager::new().context("locating configuration directory")?;
    Ok((manager.config_path().clone(), manager.mode()))
}

/// Execute the init command
pub async fn execute(args: InitArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let outcome = target_path(&args).and_then(|(path, mode)| {
        tracing::debug!(path = %path.display(), %mode, "writing example config");
        write_example_config(&path).map(|outcome| (outcome, mode))
    });

    match outcome {
        Ok((InitOutcome::Created(path), mode)) => {
            formatter.success(&format!("Created: {}", path.display()));
            formatter.info(&format!("Configuration mode: {mode}"));
            formatter.println("\nNext steps:");
            formatter.println(&format!(
                "1. Edit the profile in {} or run `bnav profile set`",
                path.display()
            ));
            formatter.println("2. Run: bnav browse");
            ExitCode::Success
        }
        Ok((InitOutcome::AlreadyExists(path), _)) => {
            formatter.warning(&format!("Config already exists: {}", path.display()));
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            ExitCode::GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bn_core::Config;
    use tempfile::TempDir;

    #[test]
    fn test_example_config_loads() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        write_example_config(&path).unwrap();

        let config: Config = ConfigManager::with_path(path).load().unwrap();
        assert_eq!(config.navigator.max_items, 30);
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(
            config.profiles[0].default_bucket.as_deref(),
            Some("YOUR_BUCKET_NAME")
        );
    }

    #[test]
    fn test_write_example_config_creates_then_keeps() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        assert_eq!(
            write_example_config(&path).unwrap(),
            InitOutcome::Created(path.clone())
        );
        std::fs::write(&path, "edited").unwrap();

        assert_eq!(
            write_example_config(&path).unwrap(),
            InitOutcome::AlreadyExists(path.clone())
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "edited");
    }
}

//! Profile management commands
//!
//! Profiles are named references to S3-compatible storage endpoints,
//! including connection details, credentials and the buckets to browse.

use clap::Subcommand;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use bn_core::{BucketEntry, Profile, ProfileManager};

/// Profile subcommands for managing storage service connections
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Add or update a profile
    Set(SetArgs),

    /// List all configured profiles
    List(ListArgs),

    /// Remove a profile
    Remove(RemoveArgs),
}

/// Arguments for the `profile set` command
#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Profile name (e.g., "local", "prod")
    pub name: String,

    /// S3 endpoint URL (e.g., "http://localhost:9000", "https://s3.amazonaws.com")
    pub endpoint: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// AWS region
    #[arg(long, default_value = "us-east-1")]
    pub region: String,

    /// Bucket lookup style: auto, path, or dns
    #[arg(long, default_value = "auto")]
    pub bucket_lookup: String,

    /// Bucket opened when no bucket list is configured
    #[arg(long)]
    pub default_bucket: Option<String>,

    /// Bucket offered in the bucket menu, as NAME or NAME=DISPLAY (repeatable)
    #[arg(long = "bucket", value_name = "NAME[=DISPLAY]")]
    pub buckets: Vec<String>,
}

/// Arguments for the `profile list` command
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show full details in a table
    #[arg(short, long)]
    pub long: bool,
}

/// Arguments for the `profile remove` command
#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Name of the profile to remove
    pub name: String,
}

/// JSON output for profile list
#[derive(Serialize)]
struct ProfileListOutput {
    profiles: Vec<ProfileInfo>,
}

/// Profile information for output (without credentials)
#[derive(Serialize)]
struct ProfileInfo {
    name: String,
    endpoint: String,
    region: String,
    bucket_lookup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_bucket: Option<String>,
    buckets: Vec<String>,
}

impl From<&Profile> for ProfileInfo {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            endpoint: profile.endpoint.clone(),
            region: profile.region.clone(),
            bucket_lookup: profile.bucket_lookup.clone(),
            default_bucket: profile.default_bucket.clone(),
            buckets: profile.buckets.iter().map(|b| b.name.clone()).collect(),
        }
    }
}

/// JSON output for profile set/remove operations
#[derive(Serialize)]
struct ProfileOperationOutput {
    success: bool,
    profile: String,
    message: String,
}

/// Execute a profile subcommand
pub async fn execute(cmd: ProfileCommands, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let manager = match ProfileManager::new() {
        Ok(pm) => pm,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    match cmd {
        ProfileCommands::Set(args) => execute_set(args, &manager, &formatter),
        ProfileCommands::List(args) => execute_list(args, &manager, &formatter),
        ProfileCommands::Remove(args) => execute_remove(args, &manager, &formatter),
    }
}

/// Parse `NAME` or `NAME=DISPLAY`
fn parse_bucket_entry(raw: &str) -> Result<BucketEntry, String> {
    let (name, display_name) = match raw.split_once('=') {
        Some((name, display)) => (name.trim(), Some(display.trim())),
        None => (raw.trim(), None),
    };

    if name.is_empty() {
        return Err(format!("Invalid bucket entry '{raw}': name cannot be empty"));
    }

    Ok(BucketEntry {
        name: name.to_string(),
        display_name: display_name
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    })
}

/// Check the `set` arguments and build the profile
fn build_profile(args: &SetArgs) -> Result<Profile, String> {
    if args.name.is_empty() {
        return Err("Profile name cannot be empty".to_string());
    }

    if let Err(e) = url::Url::parse(&args.endpoint) {
        return Err(format!("Invalid endpoint URL '{}': {e}", args.endpoint));
    }

    if !matches!(args.bucket_lookup.as_str(), "auto" | "path" | "dns") {
        return Err("Bucket lookup must be 'auto', 'path', or 'dns'".to_string());
    }

    let mut profile = Profile::new(&args.name, &args.endpoint, &args.access_key, &args.secret_key);
    profile.region = args.region.clone();
    profile.bucket_lookup = args.bucket_lookup.clone();
    profile.default_bucket = args.default_bucket.clone();
    profile.buckets = args
        .buckets
        .iter()
        .map(|raw| parse_bucket_entry(raw))
        .collect::<Result<_, _>>()?;

    Ok(profile)
}

fn execute_set(args: SetArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    let profile = match build_profile(&args) {
        Ok(p) => p,
        Err(msg) => {
            formatter.error(&msg);
            return ExitCode::UsageError;
        }
    };

    let existed = manager.exists(&args.name).unwrap_or(false);
    match manager.set(profile) {
        Ok(()) => {
            let verb = if existed { "updated" } else { "configured" };
            let message = format!("Profile '{}' {verb} successfully", args.name);
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: args.name,
                    message,
                });
            } else {
                formatter.success(&message);
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

fn profile_table(profiles: &[Profile]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Endpoint", "Region", "Lookup", "Buckets"]);

    for profile in profiles {
        let buckets = profile
            .buckets()
            .iter()
            .map(|b| {
                if b.display_name == b.id {
                    b.id.clone()
                } else {
                    format!("{} ({})", b.display_name, b.id)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(vec![
            profile.name.clone(),
            profile.endpoint.clone(),
            profile.region.clone(),
            profile.bucket_lookup.clone(),
            if buckets.is_empty() { "-".to_string() } else { buckets },
        ]);
    }
    table
}

fn execute_list(args: ListArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    match manager.list() {
        Ok(profiles) => {
            if formatter.is_json() {
                formatter.json(&ProfileListOutput {
                    profiles: profiles.iter().map(ProfileInfo::from).collect(),
                });
            } else if profiles.is_empty() {
                formatter.println("No profiles configured.");
            } else if args.long {
                formatter.println(&profile_table(&profiles).to_string());
            } else {
                for profile in &profiles {
                    formatter.println(&format!("{:<12} {}", profile.name, profile.endpoint));
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

fn execute_remove(args: RemoveArgs, manager: &ProfileManager, formatter: &Formatter) -> ExitCode {
    match manager.remove(&args.name) {
        Ok(()) => {
            let message = format!("Profile '{}' removed successfully", args.name);
            if formatter.is_json() {
                formatter.json(&ProfileOperationOutput {
                    success: true,
                    profile: args.name,
                    message,
                });
            } else {
                formatter.success(&message);
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}

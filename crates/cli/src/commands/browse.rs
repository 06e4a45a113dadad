//! browse command - Navigate a bucket interactively
//!
//! Resolves the profile and bucket (asking when there is a choice to make),
//! builds one S3 client for the whole session and hands control to the
//! navigator until the user presses Escape.

use bn_core::contents::backend_buckets;
use bn_core::path::{folder_prefix, parse_target};
use bn_core::{BucketRef, Config, ConfigManager, Error, ObjectStore, Profile, Result};
use bn_s3::S3Client;
use clap::Args;
use console::Term;

use crate::exit_code::ExitCode;
use crate::navigator::{
    Choice, KeyBindings, MenuResult, Navigator, NavigatorOptions, Prompter, Screen, TermPrompter,
};
use crate::output::{Formatter, OutputConfig};

/// Browse a bucket
#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Profile to use (asked for when several are configured)
    pub profile: Option<String>,

    /// Bucket to open, skipping the bucket menu
    ///
    /// `bucket/folder` also picks the starting folder.
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Folder to start in (e.g. "photos/2024")
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Most folders and files listed in one menu
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_items: Option<u64>,
}

/// Pick the profile to browse with
///
/// `Ok(None)` means the user pressed Escape.
pub fn select_profile<P: Prompter>(
    config: &Config,
    requested: Option<&str>,
    prompter: &mut P,
) -> Result<Option<Profile>> {
    if let Some(name) = requested {
        return config.profile(name).cloned().map(Some);
    }

    match config.profiles.as_slice() {
        [] => Err(Error::Config(
            "No profiles configured. Run `bnav init` or `bnav profile set` first".into(),
        )),
        [only] => Ok(Some(only.clone())),
        profiles => {
            let choices: Vec<Choice<usize>> = profiles
                .iter()
                .enumerate()
                .map(|(i, p)| Choice::new(format!("{} ({})", p.name, p.endpoint), i))
                .collect();
            match prompter.select("Select profile (ESC exit):", &choices, &KeyBindings::new(false))? {
                MenuResult::Select(i) => Ok(profiles.get(i).cloned()),
                _ => Ok(None),
            }
        }
    }
}

/// Pick the bucket to browse
///
/// The profile's configured buckets come first; without any, the backend is
/// asked. `Ok(None)` means the user pressed Escape.
pub async fn select_bucket<S, P>(
    profile: &Profile,
    requested: Option<&str>,
    store: &S,
    prompter: &mut P,
) -> Result<Option<BucketRef>>
where
    S: ObjectStore + ?Sized,
    P: Prompter,
{
    let mut buckets = profile.buckets();

    if let Some(name) = requested {
        let bucket = buckets
            .into_iter()
            .find(|b| b.id == name)
            .unwrap_or_else(|| BucketRef::named(name));
        return Ok(Some(bucket));
    }

    if buckets.is_empty() {
        tracing::debug!(profile = %profile.name, "no configured buckets, asking the backend");
        buckets = backend_buckets(store).await?;
    }

    match buckets.len() {
        0 => Err(Error::Listing(format!(
            "No buckets available for profile '{}'",
            profile.name
        ))),
        1 => Ok(buckets.pop()),
        _ => {
            let choices: Vec<Choice<usize>> = buckets
                .iter()
                .enumerate()
                .map(|(i, b)| Choice::new(format!("{}. {} ({})", i + 1, b.display_name, b.id), i))
                .collect();
            match prompter.select("Select bucket (ESC exit):", &choices, &KeyBindings::new(false))? {
                MenuResult::Select(i) => Ok(buckets.get(i).cloned()),
                _ => Ok(None),
            }
        }
    }
}

/// Execute the browse command
pub async fn execute(args: BrowseArgs, output_config: OutputConfig) -> ExitCode {
    let loaded = ConfigManager::new().and_then(|manager| manager.load());
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            Formatter::new(output_config).error(&format!("Failed to load configuration: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let output_config = output_config.with_defaults(&config.defaults);
    let formatter = Formatter::new(output_config.clone());

    if formatter.is_json() {
        formatter.error("browse is interactive and cannot produce JSON output");
        return ExitCode::UsageError;
    }
    if !Term::stdout().is_term() {
        formatter.error("browse needs an interactive terminal");
        return ExitCode::UsageError;
    }

    let colors = formatter.colors_enabled();
    let mut prompter = TermPrompter::stdout(colors);

    let profile = match select_profile(&config, args.profile.as_deref(), &mut prompter) {
        Ok(Some(profile)) => profile,
        Ok(None) => return ExitCode::Success,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let client = match S3Client::new(&profile).await {
        Ok(client) => client,
        Err(e) => {
            formatter.error(&format!("Failed to create S3 client: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    let target = match args.bucket.as_deref().map(parse_target).transpose() {
        Ok(target) => target,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };
    let requested = target.as_ref().map(|t| t.bucket.as_str());

    let bucket =
        match select_bucket(&profile, requested, &client, &mut prompter).await {
            Ok(Some(bucket)) => bucket,
            Ok(None) => return ExitCode::Success,
            Err(e) => {
                formatter.error(&e.to_string());
                return ExitCode::from_error(&e);
            }
        };

    let work_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            formatter.error(&format!("Cannot read working directory: {e}"));
            return ExitCode::GeneralError;
        }
    };

    let options = NavigatorOptions {
        max_items: args
            .max_items
            .map(|n| n as usize)
            .unwrap_or(config.navigator.max_items),
        work_dir,
    };
    let start = args
        .prefix
        .as_deref()
        .map(folder_prefix)
        .or_else(|| target.map(|t| t.key))
        .unwrap_or_default();
    let screen = Screen::new(std::io::stdout(), colors)
        .with_spinner(!output_config.no_progress && !output_config.quiet);

    tracing::debug!(
        profile = %profile.name,
        bucket = %bucket.id,
        start = %start,
        max_items = options.max_items,
        "starting navigator"
    );

    let mut navigator = Navigator::new(&client, bucket.id, prompter, screen, options)
        .starting_at(&start);

    match navigator.run().await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            // Listing failures were already printed by the navigator
            if !matches!(e, Error::Listing(_)) {
                formatter.error(&e.to_string());
            }
            ExitCode::from_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Answers every menu with a fixed choice index or Escape
    struct FixedPrompter {
        pick: Option<usize>,
        menus: Vec<Vec<String>>,
    }

    impl Prompter for FixedPrompter {
        fn select<T: Clone>(
            &mut self,
            _message: &str,
            choices: &[Choice<T>],
            _bindings: &KeyBindings<'_, T>,
        ) -> io::Result<MenuResult<T>> {
            self.menus
                .push(choices.iter().map(|c| c.label.clone()).collect());
            Ok(match self.pick {
                Some(i) => MenuResult::Select(choices[i].value.clone().unwrap()),
                None => MenuResult::Escape,
            })
        }

        fn confirm(&mut self, _message: &str, default: bool) -> io::Result<bool> {
            Ok(default)
        }

        fn input(&mut self, _message: &str) -> io::Result<String> {
            Ok(String::new())
        }
    }

    fn prompter(pick: Option<usize>) -> FixedPrompter {
        FixedPrompter {
            pick,
            menus: Vec::new(),
        }
    }

    fn config_with(names: &[&str]) -> Config {
        let mut config = Config::default();
        for name in names {
            config
                .profiles
                .push(Profile::new(*name, "http://localhost:9000", "k", "s"));
        }
        config
    }

    #[test]
    fn test_select_profile_without_profiles_is_config_error() {
        let result = select_profile(&Config::default(), None, &mut prompter(Some(0)));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_select_profile_single_skips_menu() {
        let mut p = prompter(None);
        let profile = select_profile(&config_with(&["only"]), None, &mut p)
            .unwrap()
            .unwrap();
        assert_eq!(profile.name, "only");
        assert!(p.menus.is_empty());
    }

    #[test]
    fn test_select_profile_prompts_when_several() {
        let mut p = prompter(Some(1));
        let profile = select_profile(&config_with(&["a", "b"]), None, &mut p)
            .unwrap()
            .unwrap();
        assert_eq!(profile.name, "b");
        assert_eq!(p.menus[0][0], "a (http://localhost:9000)");

        let escaped = select_profile(&config_with(&["a", "b"]), None, &mut prompter(None)).unwrap();
        assert!(escaped.is_none());
    }

    #[test]
    fn test_select_profile_by_name() {
        let config = config_with(&["a", "b"]);
        let profile = select_profile(&config, Some("b"), &mut prompter(None))
            .unwrap()
            .unwrap();
        assert_eq!(profile.name, "b");
        assert!(matches!(
            select_profile(&config, Some("zzz"), &mut prompter(None)),
            Err(Error::ProfileNotFound(_))
        ));
    }
}

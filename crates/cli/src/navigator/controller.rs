//! Navigation state machine
//!
//! One [`Navigator`] drives a browsing session over a single bucket: it
//! lists the folder on top of the [`PathStack`], shows the menu, and turns
//! the prompt result into a stack change or a backend action. Listing
//! failures end the session; transfer and delete failures become operation
//! log entries and the loop carries on.

use std::io::Write;
use std::path::PathBuf;

use bn_core::path::{base_name, relative_name, validate_folder_name};
use bn_core::{BucketContents, NavItem, ObjectStore, Result};
use console::Style;

use super::menu::{MenuAction, build_menu, delete_allowed, menu_message};
use super::oplog::OperationLog;
use super::prompt::{KeyBindings, MenuResult, Prompter};
use super::screen::Screen;
use super::stack::PathStack;
use crate::output::paint;

const UPLOAD_PROMPT: &str = "Enter local file path to upload (or leave empty to cancel):";
const FOLDER_PROMPT: &str = "Enter folder name (or leave empty to cancel):";

/// Where the navigator is in its loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    /// Showing the folder on top of the path stack
    Browsing,
    /// Waiting for a yes/no before deleting the item
    ConfirmingDelete(NavItem),
    /// Waiting for a local path to upload
    AwaitingUploadPath,
    /// Waiting for the name of a new folder
    AwaitingFolderName,
    /// Session over
    Exited,
}

/// Session settings
#[derive(Debug, Clone)]
pub struct NavigatorOptions {
    /// Most folders and files shown in one menu
    pub max_items: usize,
    /// Download target and base for relative upload paths
    pub work_dir: PathBuf,
}

/// Interactive browser over one bucket
pub struct Navigator<'a, S: ObjectStore + ?Sized, P: Prompter, W: Write> {
    contents: BucketContents<'a, S>,
    prompter: P,
    screen: Screen<W>,
    options: NavigatorOptions,
    stack: PathStack,
    log: OperationLog,
    state: NavState,
}

fn display_prefix(prefix: &str) -> &str {
    if prefix.is_empty() { "/" } else { prefix }
}

impl<'a, S, P, W> Navigator<'a, S, P, W>
where
    S: ObjectStore + ?Sized,
    P: Prompter,
    W: Write,
{
    pub fn new(
        store: &'a S,
        bucket: impl Into<String>,
        prompter: P,
        screen: Screen<W>,
        options: NavigatorOptions,
    ) -> Self {
        Self {
            contents: BucketContents::new(store, bucket),
            prompter,
            screen,
            options,
            stack: PathStack::new(),
            log: OperationLog::new(),
            state: NavState::Browsing,
        }
    }

    /// Start below the root, with every ancestor of `prefix` on the stack
    pub fn starting_at(mut self, prefix: &str) -> Self {
        self.stack = PathStack::from_prefix(prefix);
        self
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn stack(&self) -> &PathStack {
        &self.stack
    }

    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn screen(&self) -> &Screen<W> {
        &self.screen
    }

    /// Run until the user exits or a listing fails
    pub async fn run(&mut self) -> Result<()> {
        while self.state != NavState::Exited {
            self.step().await?;
        }
        Ok(())
    }

    /// Perform one transition
    ///
    /// On error the navigator is left in [`NavState::Exited`].
    pub async fn step(&mut self) -> Result<()> {
        let state = std::mem::replace(&mut self.state, NavState::Exited);
        self.state = match state {
            NavState::Browsing => self.browse().await?,
            NavState::ConfirmingDelete(item) => self.confirm_delete(item).await?,
            NavState::AwaitingUploadPath => self.upload().await?,
            NavState::AwaitingFolderName => self.create_folder().await?,
            NavState::Exited => NavState::Exited,
        };
        tracing::debug!(state = ?self.state, depth = self.stack.depth(), "navigator transition");
        Ok(())
    }

    /// Replace the prompt's summary with `? bucket:path (keys) <action>`
    fn breadcrumb(&mut self, message: &str, action: &str, style: Style) -> Result<()> {
        let colors = self.screen.colors();
        let line = format!(
            "{} {message} {}",
            paint("?", Style::new().green(), colors),
            paint(action, style, colors)
        );
        self.screen.overwrite_last_menu_line(&line)?;
        Ok(())
    }

    async fn browse(&mut self) -> Result<NavState> {
        let prefix = self.stack.top().to_string();
        self.screen.flush_operation_log(&mut self.log)?;

        self.screen
            .show_progress(&format!("Listing {}", display_prefix(&prefix)))?;
        let listing = self.contents.list(&prefix).await;
        self.screen.clear_progress()?;

        let listing = match listing {
            Ok(listing) => listing,
            Err(e) => {
                self.screen.error(&format!(
                    "Failed to list {}:{}: {e}",
                    self.contents.bucket(),
                    display_prefix(&prefix)
                ))?;
                return Err(e);
            }
        };

        let back_enabled = self.stack.back_enabled();
        let choices = build_menu(&listing, &prefix, self.options.max_items);
        let message = menu_message(self.contents.bucket(), &prefix, back_enabled);
        let bindings: KeyBindings<'_, MenuAction> =
            KeyBindings::new(back_enabled).with_delete(&delete_allowed);

        let next = match self.prompter.select(&message, &choices, &bindings)? {
            MenuResult::Escape => {
                self.breadcrumb(&message, "<- exit", Style::new().red())?;
                NavState::Exited
            }
            MenuResult::Back => {
                self.stack.pop()?;
                self.breadcrumb(&message, "<- back", Style::new().cyan())?;
                NavState::Browsing
            }
            MenuResult::Delete(MenuAction::Item(item)) => NavState::ConfirmingDelete(item),
            MenuResult::Delete(_) => NavState::Browsing,
            MenuResult::Select(MenuAction::Item(NavItem::Folder { prefix: folder })) => {
                let crumb = format!("[D] {}", relative_name(&folder, &prefix));
                self.breadcrumb(&message, &crumb, Style::new().cyan())?;
                self.stack.push(folder);
                NavState::Browsing
            }
            MenuResult::Select(MenuAction::Item(NavItem::File { path, .. })) => {
                self.download(&path).await?;
                NavState::Browsing
            }
            MenuResult::Select(MenuAction::Upload) => NavState::AwaitingUploadPath,
            MenuResult::Select(MenuAction::CreateFolder) => NavState::AwaitingFolderName,
        };
        Ok(next)
    }

    async fn download(&mut self, key: &str) -> Result<()> {
        let name = base_name(key).to_string();
        let local = self.options.work_dir.join(&name);

        self.screen.show_progress(&format!("Downloading {name}"))?;
        let result = self.contents.download(key, &local).await;
        self.screen.clear_progress()?;

        match result {
            Ok(_) => self
                .log
                .success(format!("Downloaded: {name} → {}", local.display())),
            Err(e) if e.is_recoverable() => self.log.error(format!("Download failed: {name} - {e}")),
            Err(e) => return Err(e),
        }
        Ok(())
    }

    async fn confirm_delete(&mut self, item: NavItem) -> Result<NavState> {
        let prefix = self.stack.top().to_string();
        let name = relative_name(item.key(), &prefix).to_string();
        let kind = item.kind();

        let question = format!("Delete {kind} \"{name}\"?");
        if !self.prompter.confirm(&question, false)? {
            self.log.info(format!("Delete cancelled: {name}"));
            return Ok(NavState::Browsing);
        }

        self.screen.show_progress(&format!("Deleting {kind} {name}"))?;
        let result = match &item {
            NavItem::Folder { prefix: folder } => self.contents.delete_folder(folder).await.map(Some),
            NavItem::File { path, .. } => self.contents.delete_file(path).await.map(|()| None),
        };
        self.screen.clear_progress()?;

        match result {
            Ok(Some(count)) => self
                .log
                .success(format!("Deleted folder \"{name}\" ({count} files)")),
            Ok(None) => self.log.success(format!("Deleted file \"{name}\"")),
            Err(e) if e.is_recoverable() => self.log.error(format!("Delete failed: {name} - {e}")),
            Err(e) => return Err(e),
        }
        Ok(NavState::Browsing)
    }

    async fn upload(&mut self) -> Result<NavState> {
        let input = self.prompter.input(UPLOAD_PROMPT)?;
        if input.is_empty() {
            self.log.info("Upload cancelled");
            return Ok(NavState::Browsing);
        }

        let local = self.options.work_dir.join(&input);
        let name = base_name(&input).to_string();
        let key = format!("{}{name}", self.stack.top());

        self.screen.show_progress(&format!("Uploading {name}"))?;
        let result = self.contents.upload(&local, &key).await;
        self.screen.clear_progress()?;

        match result {
            Ok(_) => self
                .log
                .success(format!("Uploaded: {name} → {}/{key}", self.contents.bucket())),
            Err(e) if e.is_recoverable() => self.log.error(format!("Upload failed: {name} - {e}")),
            Err(e) => return Err(e),
        }
        Ok(NavState::Browsing)
    }

    async fn create_folder(&mut self) -> Result<NavState> {
        let name = self.prompter.input(FOLDER_PROMPT)?;
        if name.is_empty() {
            self.log.info("Create folder cancelled");
            return Ok(NavState::Browsing);
        }

        if let Err(e) = validate_folder_name(&name) {
            self.screen.warning(&e.to_string())?;
            return Ok(NavState::AwaitingFolderName);
        }

        let prefix = self.stack.top().to_string();
        let marker = format!("{prefix}{name}/");

        self.screen.show_progress(&format!("Creating folder {name}"))?;
        let result = self.contents.create_folder(&marker).await;
        self.screen.clear_progress()?;

        match result {
            Ok(()) => self.log.success(format!(
                "Folder created: {name} at {}:{}",
                self.contents.bucket(),
                display_prefix(&prefix)
            )),
            Err(e) if e.is_recoverable() => {
                self.log.error(format!("Create folder failed: {name} - {e}"))
            }
            Err(e) => return Err(e),
        }
        Ok(NavState::Browsing)
    }
}

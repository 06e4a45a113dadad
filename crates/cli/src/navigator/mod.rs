//! Interactive folder navigator
//!
//! A stack-based browser over one bucket. The controller lists the current
//! folder, shows it through a [`Prompter`], and dispatches the chosen
//! action; the [`Screen`] repaints breadcrumbs, pending lines and the
//! operation log between prompts.

mod controller;
mod menu;
mod oplog;
mod prompt;
mod screen;
mod stack;

pub use controller::{NavState, Navigator, NavigatorOptions};
pub use menu::{MenuAction, build_menu, delete_allowed, format_size, item_label, menu_message};
pub use oplog::{LogEntry, LogKind, OperationLog};
pub use prompt::{Choice, KeyBindings, MenuResult, Prompter, SelectState, TermPrompter};
pub use screen::Screen;
pub use stack::PathStack;

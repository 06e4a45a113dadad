//! Menu construction for one folder

use bn_core::path::relative_name;
use bn_core::{DirectoryContents, NavItem};
use console::Style;

use super::prompt::Choice;

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Separator drawn between the entries and the fixed actions
const SEPARATOR: &str = "─────────────";

/// What a menu row stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// A folder or file of the current listing
    Item(NavItem),
    /// Upload a local file into the current folder
    Upload,
    /// Create a sub-folder of the current folder
    CreateFolder,
}

/// Human-readable size in binary units, one decimal place
///
/// `0` is `"0 B"`; `1536` is `"1.5 KB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    while unit + 1 < SIZE_UNITS.len() && bytes >= 1u64 << (10 * (unit + 1)) {
        unit += 1;
    }

    let value = bytes as f64 / (1u64 << (10 * unit)) as f64;
    format!("{value:.1} {}", SIZE_UNITS[unit])
}

/// Label of a folder or file row
pub fn item_label(item: &NavItem, prefix: &str) -> String {
    match item {
        NavItem::Folder { prefix: folder } => format!("[D] {}", relative_name(folder, prefix)),
        NavItem::File { path, size_bytes } => format!(
            "[F] {} ({})",
            relative_name(path, prefix),
            format_size(*size_bytes)
        ),
    }
}

/// Build the menu for `prefix`
///
/// Folders come before files, each group in listing order. At most
/// `max_items` entries are shown. A separator follows the entries when there
/// are any, then a notice when some were dropped. The upload and
/// create-folder actions always close the menu.
pub fn build_menu(
    contents: &DirectoryContents,
    prefix: &str,
    max_items: usize,
) -> Vec<Choice<MenuAction>> {
    let mut choices: Vec<Choice<MenuAction>> = contents
        .items()
        .take(max_items)
        .map(|item| {
            let folder = item.is_folder();
            let choice = Choice::new(item_label(&item, prefix), MenuAction::Item(item));
            if folder {
                choice.styled(Style::new().cyan())
            } else {
                choice
            }
        })
        .collect();

    if !choices.is_empty() {
        choices.push(Choice::separator(SEPARATOR));
    }
    if contents.len() > max_items {
        choices.push(
            Choice::separator(format!("(showing first {max_items} items)"))
                .styled(Style::new().yellow()),
        );
    }

    choices.push(Choice::new("↑ Upload file here", MenuAction::Upload).styled(Style::new().green()));
    choices.push(
        Choice::new("+ Create folder here", MenuAction::CreateFolder).styled(Style::new().green()),
    );
    choices
}

/// Prompt message naming the folder and the keys that apply
pub fn menu_message(bucket: &str, prefix: &str, back_enabled: bool) -> String {
    let location = if prefix.is_empty() { "/" } else { prefix };
    let keys = if back_enabled {
        "← back, DEL delete, ESC exit"
    } else {
        "DEL delete, ESC exit"
    };
    format!("{bucket}:{location} ({keys})")
}

/// Only real folders and files can be deleted
pub fn delete_allowed(action: &MenuAction) -> bool {
    matches!(action, MenuAction::Item(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bn_core::FileEntry;

    fn labels(choices: &[Choice<MenuAction>]) -> String {
        choices
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn file(path: &str, size_bytes: u64) -> FileEntry {
        FileEntry {
            path: path.into(),
            size_bytes,
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(500), "500.0 B");
        assert_eq!(format_size(1023), "1023.0 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(1048576), "1.0 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024u64), "5.0 GB");
        assert_eq!(format_size(3u64 << 40), "3.0 TB");
        assert_eq!(format_size(2048u64 << 40), "2048.0 TB");
    }

    #[test]
    fn test_format_size_unit_never_decreases() {
        let mut last_unit = 0;
        for bytes in [1u64, 1023, 1024, 1 << 20, (1 << 20) + 1, 1 << 30, 1 << 40, u64::MAX] {
            let formatted = format_size(bytes);
            let unit = formatted.rsplit(' ').next().unwrap();
            let index = SIZE_UNITS.iter().position(|u| *u == unit).unwrap();
            assert!(index >= last_unit, "{formatted}");
            last_unit = index;
        }
    }

    #[test]
    fn test_menu_for_root_listing() {
        let contents = DirectoryContents {
            folders: vec!["a/".into()],
            files: vec![file("b.txt", 2048)],
        };

        let choices = build_menu(&contents, "", 30);
        insta::assert_snapshot!(labels(&choices), @r"
[D] a/
[F] b.txt (2.0 KB)
─────────────
↑ Upload file here
+ Create folder here
");
        assert!(!choices[2].is_selectable());
        assert_eq!(choices[3].value, Some(MenuAction::Upload));
        assert_eq!(choices[4].value, Some(MenuAction::CreateFolder));
    }

    #[test]
    fn test_menu_names_are_relative_to_prefix() {
        let contents = DirectoryContents {
            folders: vec!["docs/img/".into()],
            files: vec![file("docs/readme.md", 0)],
        };

        let choices = build_menu(&contents, "docs/", 30);
        assert_eq!(choices[0].label, "[D] img/");
        assert_eq!(choices[1].label, "[F] readme.md (0 B)");
    }

    #[test]
    fn test_menu_truncates_without_reordering() {
        let contents = DirectoryContents {
            folders: vec!["z/".into(), "y/".into()],
            files: vec![file("c", 1), file("b", 2), file("a", 3)],
        };

        let choices = build_menu(&contents, "", 3);
        insta::assert_snapshot!(labels(&choices), @r"
[D] z/
[D] y/
[F] c (1.0 B)
─────────────
(showing first 3 items)
↑ Upload file here
+ Create folder here
");
    }

    #[test]
    fn test_menu_for_empty_folder_has_only_actions() {
        let choices = build_menu(&DirectoryContents::default(), "empty/", 30);
        assert_eq!(
            labels(&choices),
            "↑ Upload file here\n+ Create folder here"
        );
        let selectable: Vec<_> = choices.iter().filter_map(|c| c.value.clone()).collect();
        assert_eq!(selectable, vec![MenuAction::Upload, MenuAction::CreateFolder]);
    }

    #[test]
    fn test_folder_rows_carry_style_not_escape_codes() {
        let contents = DirectoryContents {
            folders: vec!["a/".into()],
            files: vec![file("b.txt", 1)],
        };

        let choices = build_menu(&contents, "", 30);
        assert_eq!(choices[0].label, "[D] a/");
        assert_eq!(choices[0].style, Some(Style::new().cyan()));
        assert_eq!(choices[1].style, None);
        assert!(choices.iter().all(|c| !c.label.contains('\x1b')));
    }

    #[test]
    fn test_exact_max_items_has_no_notice() {
        let contents = DirectoryContents {
            folders: vec![],
            files: vec![file("a", 1), file("b", 1)],
        };
        let choices = build_menu(&contents, "", 2);
        assert!(!labels(&choices).contains("showing first"));
    }

    #[test]
    fn test_menu_message() {
        assert_eq!(menu_message("bkt", "", false), "bkt:/ (DEL delete, ESC exit)");
        assert_eq!(
            menu_message("bkt", "a/b/", true),
            "bkt:a/b/ (← back, DEL delete, ESC exit)"
        );
    }

    #[test]
    fn test_delete_allowed_only_for_items() {
        let folder = MenuAction::Item(NavItem::Folder { prefix: "a/".into() });
        let file = MenuAction::Item(NavItem::File {
            path: "b".into(),
            size_bytes: 1,
        });
        assert!(delete_allowed(&folder));
        assert!(delete_allowed(&file));
        assert!(!delete_allowed(&MenuAction::Upload));
        assert!(!delete_allowed(&MenuAction::CreateFolder));
    }
}

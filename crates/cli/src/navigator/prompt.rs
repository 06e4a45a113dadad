//! Single-selection prompt with extra key bindings
//!
//! Besides the usual up/down/enter selection, the prompt reacts to Escape,
//! Left-Arrow and Delete and returns a tagged [`MenuResult`]. Key handling
//! lives in [`SelectState`], which never touches the terminal, so every
//! binding can be driven from tests. [`TermPrompter`] owns the raw terminal.

use std::io;

use console::{Key, Style, Term, measure_text_width};

use crate::output::paint;

/// Number of choices visible at once
const PAGE_SIZE: usize = 15;

/// Outcome of one menu prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuResult<T> {
    /// Enter on the highlighted choice
    Select(T),
    /// Left-Arrow while going back is enabled
    Back,
    /// Delete on a choice the delete predicate accepts
    Delete(T),
    /// Escape, always accepted
    Escape,
}

/// One row of a menu
///
/// Rows without a value are separators or notices and cannot be highlighted.
/// The label stays plain text; `style` is applied when the row is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T> {
    pub label: String,
    pub value: Option<T>,
    pub style: Option<Style>,
}

impl<T> Choice<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value: Some(value),
            style: None,
        }
    }

    pub fn separator(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: None,
            style: None,
        }
    }

    /// Draw the row with `style` when it is not highlighted
    pub fn styled(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn is_selectable(&self) -> bool {
        self.value.is_some()
    }
}

/// Extra keys a prompt honours
pub struct KeyBindings<'a, T> {
    /// Left-Arrow returns [`MenuResult::Back`]
    pub back_enabled: bool,
    /// Delete returns [`MenuResult::Delete`] for values this accepts; `None` disables Delete
    pub delete_allowed: Option<&'a dyn Fn(&T) -> bool>,
}

impl<'a, T> KeyBindings<'a, T> {
    pub fn new(back_enabled: bool) -> Self {
        Self {
            back_enabled,
            delete_allowed: None,
        }
    }

    pub fn with_delete(mut self, allowed: &'a dyn Fn(&T) -> bool) -> Self {
        self.delete_allowed = Some(allowed);
        self
    }

    fn allows_delete(&self, value: &T) -> bool {
        self.delete_allowed.is_some_and(|allowed| allowed(value))
    }
}

/// Highlight position and key decoding for one prompt invocation
pub struct SelectState<'a, T> {
    choices: &'a [Choice<T>],
    bindings: &'a KeyBindings<'a, T>,
    cursor: Option<usize>,
}

impl<'a, T: Clone> SelectState<'a, T> {
    pub fn new(choices: &'a [Choice<T>], bindings: &'a KeyBindings<'a, T>) -> Self {
        Self {
            cursor: choices.iter().position(Choice::is_selectable),
            choices,
            bindings,
        }
    }

    /// Index of the highlighted choice
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The highlighted choice
    pub fn highlighted(&self) -> Option<&'a Choice<T>> {
        self.cursor.map(|i| &self.choices[i])
    }

    /// Apply one key press
    ///
    /// Returns `Some` when the key ends the prompt; ignored keys and
    /// movement return `None`.
    pub fn handle_key(&mut self, key: &Key) -> Option<MenuResult<T>> {
        match key {
            Key::Escape => Some(MenuResult::Escape),
            Key::ArrowLeft if self.bindings.back_enabled => Some(MenuResult::Back),
            Key::Del => self
                .highlighted()
                .and_then(|choice| choice.value.as_ref())
                .filter(|value| self.bindings.allows_delete(value))
                .map(|value| MenuResult::Delete(value.clone())),
            Key::Enter => self
                .highlighted()
                .and_then(|choice| choice.value.clone())
                .map(MenuResult::Select),
            Key::ArrowUp | Key::Char('k') => {
                self.step(false);
                None
            }
            Key::ArrowDown | Key::Char('j') | Key::Tab => {
                self.step(true);
                None
            }
            _ => None,
        }
    }

    /// Move to the next selectable choice, wrapping around
    fn step(&mut self, forward: bool) {
        let Some(start) = self.cursor else {
            return;
        };
        let len = self.choices.len();
        let mut index = start;
        for _ in 0..len {
            index = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            if self.choices[index].is_selectable() {
                self.cursor = Some(index);
                return;
            }
        }
    }

    /// Rows of the visible page, highlighted row marked
    pub fn lines(&self, colors: bool) -> Vec<String> {
        let len = self.choices.len();
        let focus = self.cursor.unwrap_or(0);
        let start = focus
            .saturating_sub(PAGE_SIZE / 2)
            .min(len.saturating_sub(PAGE_SIZE));
        let end = (start + PAGE_SIZE).min(len);

        let mut lines: Vec<String> = self.choices[start..end]
            .iter()
            .enumerate()
            .map(|(offset, choice)| {
                let text = format!("  {}", choice.label);
                if Some(start + offset) == self.cursor {
                    paint(format!("❯ {}", choice.label), Style::new().cyan(), colors).to_string()
                } else if let Some(style) = &choice.style {
                    paint(text, style.clone(), colors).to_string()
                } else if choice.is_selectable() {
                    text
                } else {
                    paint(text, Style::new().dim(), colors).to_string()
                }
            })
            .collect();

        if len > PAGE_SIZE {
            lines.push(
                paint("(Move up and down to reveal more choices)", Style::new().dim(), colors)
                    .to_string(),
            );
        }
        lines
    }
}

/// Answer echoed on the summary line a prompt leaves behind
fn summary<T>(result: &MenuResult<T>, label: &str) -> String {
    match result {
        MenuResult::Select(_) => label.to_string(),
        MenuResult::Back => "←".to_string(),
        MenuResult::Delete(_) => format!("DEL {label}"),
        MenuResult::Escape => "ESC".to_string(),
    }
}

/// Interactive questions asked by the navigator
pub trait Prompter {
    /// Show a menu until one of the four outcomes is chosen
    ///
    /// The menu is erased before returning and replaced by one summary line.
    fn select<T: Clone>(
        &mut self,
        message: &str,
        choices: &[Choice<T>],
        bindings: &KeyBindings<'_, T>,
    ) -> io::Result<MenuResult<T>>;

    /// Yes/no question
    fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool>;

    /// Free text, trimmed
    fn input(&mut self, message: &str) -> io::Result<String>;
}

/// Terminal rows `lines` occupy once long lines wrap at `width` columns
fn physical_rows(lines: &[String], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|line| measure_text_width(line).div_ceil(width).max(1))
        .sum()
}

fn interrupted() -> io::Error {
    io::Error::new(io::ErrorKind::Interrupted, "interrupted by user")
}

/// Prompter reading raw keys from the controlling terminal
pub struct TermPrompter {
    term: Term,
    colors: bool,
}

impl TermPrompter {
    pub fn new(term: Term, colors: bool) -> Self {
        Self { term, colors }
    }

    pub fn stdout(colors: bool) -> Self {
        Self::new(Term::stdout(), colors)
    }

    fn header(&self, message: &str) -> String {
        format!(
            "{} {}",
            paint("?", Style::new().green(), self.colors),
            paint(message, Style::new().bold(), self.colors)
        )
    }

    fn write_summary(&self, message: &str, answer: &str) -> io::Result<()> {
        self.term.write_line(&format!(
            "{} {}",
            self.header(message),
            paint(answer, Style::new().cyan(), self.colors)
        ))
    }

    /// Draw the menu, returning the terminal rows it took
    fn draw<T: Clone>(&self, message: &str, state: &SelectState<'_, T>) -> io::Result<usize> {
        let mut lines = vec![self.header(message)];
        lines.extend(state.lines(self.colors));
        for line in &lines {
            self.term.write_line(line)?;
        }
        let (_, columns) = self.term.size();
        Ok(physical_rows(&lines, usize::from(columns)))
    }

    fn read_key(&self) -> io::Result<Key> {
        match self.term.read_key()? {
            Key::Char('\u{3}') => Err(interrupted()),
            key => Ok(key),
        }
    }
}

impl Prompter for TermPrompter {
    fn select<T: Clone>(
        &mut self,
        message: &str,
        choices: &[Choice<T>],
        bindings: &KeyBindings<'_, T>,
    ) -> io::Result<MenuResult<T>> {
        let mut state = SelectState::new(choices, bindings);
        self.term.hide_cursor()?;
        let mut height = self.draw(message, &state)?;

        let result = loop {
            let key = match self.read_key() {
                Ok(key) => key,
                Err(e) => {
                    self.term.clear_last_lines(height)?;
                    self.term.show_cursor()?;
                    return Err(e);
                }
            };
            if let Some(result) = state.handle_key(&key) {
                break result;
            }
            self.term.clear_last_lines(height)?;
            height = self.draw(message, &state)?;
        };

        let label = state.highlighted().map(|c| c.label.as_str()).unwrap_or("");
        self.term.clear_last_lines(height)?;
        self.write_summary(message, &summary(&result, label))?;
        self.term.show_cursor()?;
        Ok(result)
    }

    fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        self.term
            .write_str(&format!("{} {} ", self.header(message), hint))?;

        let answer = loop {
            match self.read_key()? {
                Key::Char('y') | Key::Char('Y') => break true,
                Key::Char('n') | Key::Char('N') | Key::Escape => break false,
                Key::Enter => break default,
                _ => {}
            }
        };

        self.term.clear_line()?;
        self.write_summary(message, if answer { "Yes" } else { "No" })?;
        Ok(answer)
    }

    fn input(&mut self, message: &str) -> io::Result<String> {
        self.term.write_str(&format!("{} ", self.header(message)))?;
        let line = self.term.read_line()?;
        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Vec<Choice<&'static str>> {
        vec![
            Choice::new("first", "one"),
            Choice::separator("───"),
            Choice::new("second", "two"),
            Choice::new("third", "three"),
        ]
    }

    #[test]
    fn test_escape_is_always_accepted() {
        let choices = menu();
        let bindings = KeyBindings::new(false);
        let mut state = SelectState::new(&choices, &bindings);
        assert_eq!(state.handle_key(&Key::Escape), Some(MenuResult::Escape));
    }

    #[test]
    fn test_left_only_when_back_enabled() {
        let choices = menu();

        let disabled = KeyBindings::new(false);
        let mut state = SelectState::new(&choices, &disabled);
        assert_eq!(state.handle_key(&Key::ArrowLeft), None);

        let enabled = KeyBindings::new(true);
        let mut state = SelectState::new(&choices, &enabled);
        assert_eq!(state.handle_key(&Key::ArrowLeft), Some(MenuResult::Back));
    }

    #[test]
    fn test_delete_follows_predicate() {
        let choices = menu();
        let only_three = |value: &&str| *value == "three";
        let bindings = KeyBindings::new(false).with_delete(&only_three);
        let mut state = SelectState::new(&choices, &bindings);

        assert_eq!(state.handle_key(&Key::Del), None);
        state.handle_key(&Key::ArrowDown);
        state.handle_key(&Key::ArrowDown);
        assert_eq!(state.handle_key(&Key::Del), Some(MenuResult::Delete("three")));
    }

    #[test]
    fn test_delete_disabled_without_predicate() {
        let choices = menu();
        let bindings = KeyBindings::new(true);
        let mut state = SelectState::new(&choices, &bindings);
        assert_eq!(state.handle_key(&Key::Del), None);
    }

    #[test]
    fn test_movement_skips_separators_and_wraps() {
        let choices = menu();
        let bindings = KeyBindings::new(false);
        let mut state = SelectState::new(&choices, &bindings);
        assert_eq!(state.cursor(), Some(0));

        assert_eq!(state.handle_key(&Key::ArrowDown), None);
        assert_eq!(state.cursor(), Some(2));

        state.handle_key(&Key::ArrowDown);
        state.handle_key(&Key::ArrowDown);
        assert_eq!(state.cursor(), Some(0));

        state.handle_key(&Key::ArrowUp);
        assert_eq!(state.handle_key(&Key::Enter), Some(MenuResult::Select("three")));
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let choices = menu();
        let bindings = KeyBindings::new(true);
        let mut state = SelectState::new(&choices, &bindings);
        for key in [Key::ArrowRight, Key::Char('x'), Key::Backspace, Key::Home] {
            assert_eq!(state.handle_key(&key), None);
        }
        assert_eq!(state.cursor(), Some(0));
    }

    #[test]
    fn test_enter_without_selectable_choice_is_ignored() {
        let choices: Vec<Choice<u8>> = vec![Choice::separator("nothing here")];
        let bindings = KeyBindings::new(false);
        let mut state = SelectState::new(&choices, &bindings);
        assert_eq!(state.handle_key(&Key::Enter), None);
        assert_eq!(state.handle_key(&Key::Escape), Some(MenuResult::Escape));
    }

    #[test]
    fn test_lines_mark_highlighted_row() {
        let choices = menu();
        let bindings = KeyBindings::new(false);
        let mut state = SelectState::new(&choices, &bindings);
        state.handle_key(&Key::ArrowDown);

        insta::assert_snapshot!(state.lines(false).join("\n"), @r"
  first
  ───
❯ second
  third
");
    }

    #[test]
    fn test_lines_page_long_menus() {
        let choices: Vec<Choice<usize>> = (0..40)
            .map(|i| Choice::new(format!("item {i}"), i))
            .collect();
        let bindings = KeyBindings::new(false);
        let mut state = SelectState::new(&choices, &bindings);
        for _ in 0..20 {
            state.handle_key(&Key::ArrowDown);
        }

        let lines = state.lines(false);
        assert_eq!(lines.len(), PAGE_SIZE + 1);
        assert!(lines.contains(&"❯ item 20".to_string()));
        assert!(lines.last().unwrap().contains("reveal more"));
    }

    #[test]
    fn test_styles_stay_out_of_labels() {
        let choices = vec![
            Choice::new("[D] a/", 1).styled(Style::new().cyan()),
            Choice::new("[F] b", 2),
        ];
        let bindings = KeyBindings::new(false);
        let mut state = SelectState::new(&choices, &bindings);
        state.handle_key(&Key::ArrowDown);

        let lines = state.lines(true);
        assert_eq!(choices[0].label, "[D] a/");
        assert_eq!(
            lines[0],
            Style::new().cyan().force_styling(true).apply_to("  [D] a/").to_string()
        );
        // The highlight is the only style on the selected row
        assert_eq!(
            lines[1],
            Style::new().cyan().force_styling(true).apply_to("❯ [F] b").to_string()
        );
    }

    #[test]
    fn test_physical_rows_count_wrapped_lines() {
        let lines = vec![
            "? pick".to_string(),
            "x".repeat(25),
            String::new(),
            Style::new().red().force_styling(true).apply_to("y".repeat(10)).to_string(),
        ];
        assert_eq!(physical_rows(&lines, 10), 1 + 3 + 1 + 1);
        assert_eq!(physical_rows(&lines, 80), 4);
        assert_eq!(physical_rows(&lines, 0), 6 + 25 + 1 + 10);
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(summary(&MenuResult::Select(1), "[F] b.txt"), "[F] b.txt");
        assert_eq!(summary(&MenuResult::<u8>::Back, "x"), "←");
        assert_eq!(summary(&MenuResult::Delete(1), "[D] a/"), "DEL [D] a/");
        assert_eq!(summary(&MenuResult::<u8>::Escape, "x"), "ESC");
    }
}

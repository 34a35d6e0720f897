use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use tui_textarea::{CursorMove, Input, Key, TextArea};

use crate::config::Theme;

/// Event emitted by TextInput widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputEvent {
    None,
    Changed, // Text was edited
    Submit,  // Enter pressed
    Cancel,  // Esc pressed
    StepUp,
    StepDown,
}

/// Single-line text input widget wrapping tui-textarea
pub struct TextInput {
    textarea: TextArea<'static>,
    pub value: String,
    pub cursor: usize,
    max_chars: Option<usize>,
    text_color: Option<Color>,
    background_color: Option<Color>,
    focused: bool,
}

impl TextInput {
    pub fn new() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default()); // No underline

        let mut widget = Self {
            textarea,
            value: String::new(),
            cursor: 0,
            max_chars: None,
            text_color: None,
            background_color: None,
            focused: false,
        };
        widget.apply_colors_to_textarea();
        widget.set_focused(false);
        widget
    }

    /// Sync value and cursor from textarea
    fn sync_from_textarea(&mut self) {
        self.value = self.textarea.lines().first().cloned().unwrap_or_default();
        self.cursor = self.textarea.cursor().1;
    }

    fn apply_colors_to_textarea(&mut self) {
        let mut style = Style::default();
        if let Some(text_color) = self.text_color {
            style = style.fg(text_color);
        }
        if let Some(bg_color) = self.background_color {
            style = style.bg(bg_color);
        }
        self.textarea.set_style(style);
        self.textarea.set_cursor_line_style(Style::default());
    }

    /// Sync textarea from value and cursor
    fn sync_to_textarea(&mut self) {
        let single_line = self.value.replace(['\n', '\r'], " ");
        self.textarea = TextArea::new(vec![single_line]);
        // A fresh TextArea drops styling and cursor state
        self.apply_colors_to_textarea();
        self.set_focused(self.focused);
        self.textarea
            .move_cursor(CursorMove::Jump(0, self.cursor.min(u16::MAX as usize) as u16));
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color);
        self.apply_colors_to_textarea();
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self.apply_colors_to_textarea();
        self
    }

    /// Use the theme's input colors
    pub fn with_theme(self, theme: &Theme) -> Self {
        self.with_text_color(theme.get("input_fg"))
            .with_background(theme.get("input_bg"))
    }

    /// Refuse edits that would grow the value past `max_chars`
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.textarea
                .set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
        } else {
            // Matching the text style hides the cursor
            let textarea_style = self.textarea.style();
            self.textarea.set_cursor_style(textarea_style);
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the text and move the cursor to its end
    pub fn set_value(&mut self, value: String) {
        self.cursor = value.chars().count();
        self.value = value;
        self.sync_to_textarea();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
        self.sync_to_textarea();
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Handle a key event
    pub fn handle_key(&mut self, event: &KeyEvent) -> TextInputEvent {
        match event.code {
            KeyCode::Enter => return TextInputEvent::Submit,
            KeyCode::Esc => return TextInputEvent::Cancel,
            KeyCode::Up => return TextInputEvent::StepUp,
            KeyCode::Down => return TextInputEvent::StepDown,
            KeyCode::Char(_) => {
                if let Some(max) = self.max_chars {
                    if self.value.chars().count() >= max {
                        return TextInputEvent::None;
                    }
                }
            }
            _ => {}
        }

        let input = key_event_to_input(event);
        if matches!(input.key, Key::Char('\n') | Key::Char('\r') | Key::Null) {
            return TextInputEvent::None;
        }
        let before = self.value.clone();
        self.textarea.input(input);
        self.sync_from_textarea();
        if self.value != before {
            TextInputEvent::Changed
        } else {
            TextInputEvent::None
        }
    }
}

/// Convert crossterm KeyEvent to tui_textarea::Input
fn key_event_to_input(event: &KeyEvent) -> Input {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);

    let key = match event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Esc,
        _ => Key::Null,
    };

    Input {
        key,
        ctrl,
        alt,
        shift,
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        if area.is_empty() {
            return;
        }
        self.textarea.render(area, buf);

        // tui-textarea underlines the cursor line; strip it
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                let cell = &mut buf[(x, y)];
                let style = cell.style().remove_modifier(Modifier::UNDERLINED);
                cell.set_style(style);
            }
        }
    }
}

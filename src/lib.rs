use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::sync::mpsc::Sender;

use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use ratatui::widgets::{Block, Borders, Paragraph};

pub mod cli;
pub mod config;
pub mod logging;
pub mod scroll;
pub mod sequence;
pub mod strip;
pub mod widgets;

pub use cli::Args;
pub use config::{AppConfig, ColorParser, ConfigManager, Theme};
pub use scroll::{ScrollListener, ScrollSurface};
pub use strip::{BoxMetrics, DragState, StripState};

use sequence::{MAX_LENGTH, MIN_LENGTH};
use widgets::controls::Controls;
use widgets::debug::DebugState;
use widgets::fib_strip::{group_digits, project, FibStrip, StripColors};
use widgets::text_input::{TextInput, TextInputEvent};

/// Application name used for config, data, and log paths
pub const APP_NAME: &str = "fibstrip";

const INPUT_LABEL: &str = "Number of boxes (10-50): ";
const INPUT_WIDTH: u16 = 6;

/// Startup options resolved from CLI args and config
#[derive(Debug, Clone)]
pub struct StripOptions {
    pub initial_length: usize,
    pub debug: bool,
    pub mouse: bool,
    pub log_to_file: bool,
    pub event_poll_interval_ms: u64,
}

impl StripOptions {
    /// Create StripOptions from CLI args and config, with CLI args taking precedence
    pub fn from_args_and_config(args: &cli::Args, config: &AppConfig) -> Self {
        let initial_length = args
            .length
            .as_deref()
            .map(sequence::normalize_length)
            .unwrap_or_else(|| sequence::clamp_length(config.strip.initial_length as i64));

        Self {
            initial_length,
            debug: args.debug || config.debug.enabled,
            mouse: !args.no_mouse,
            log_to_file: config.debug.log_to_file || logging::env_requested(),
            event_poll_interval_ms: config.performance.event_poll_interval_ms,
        }
    }
}

impl Default for StripOptions {
    fn default() -> Self {
        let config = AppConfig::default();
        Self {
            initial_length: config.strip.initial_length,
            debug: false,
            mouse: true,
            log_to_file: false,
            event_poll_interval_ms: config.performance.event_poll_interval_ms,
        }
    }
}

impl From<&cli::Args> for StripOptions {
    fn from(args: &cli::Args) -> Self {
        Self::from_args_and_config(args, &AppConfig::default())
    }
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Scroll(i32), // new scroll offset reported by the scroll surface
    Resize(u16, u16),
    Exit,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Strip,
    Input,
}

pub struct App {
    pub strip: StripState,
    pub focus: Focus,
    scroll: ScrollSurface,
    scroll_listener: Option<ScrollListener>,
    events: Sender<AppEvent>,
    input: TextInput,
    debug: DebugState,
    theme: Theme,
    metrics: BoxMetrics,
    separator: String,
    strip_area: Rect,
    input_area: Rect,
}

impl App {
    pub fn new(events: Sender<AppEvent>) -> App {
        Self::new_with_config(events, Theme::default(), &AppConfig::default())
    }

    pub fn new_with_config(events: Sender<AppEvent>, theme: Theme, config: &AppConfig) -> App {
        let strip = StripState::new(config.strip.initial_length);
        let input = TextInput::new().with_theme(&theme).with_max_chars(INPUT_WIDTH as usize - 1);

        let mut app = App {
            strip,
            focus: Focus::Strip,
            scroll: ScrollSurface::new(),
            scroll_listener: None,
            events,
            input,
            debug: DebugState::default(),
            theme,
            metrics: config.layout.metrics(),
            separator: config.strip.thousands_separator.clone(),
            strip_area: Rect::default(),
            input_area: Rect::default(),
        };
        app.sync_input();
        app.sync_extent();
        app
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    /// Count a frame drawn by the event loop. Rendering itself leaves state untouched.
    pub fn record_frame(&mut self) {
        self.debug.num_frames += 1;
    }

    /// Start listening for scroll changes. Idempotent.
    pub fn mount(&mut self) {
        if self.scroll_listener.is_none() {
            self.scroll_listener = Some(self.scroll.attach(self.events.clone()));
            tracing::info!(length = self.strip.length, "strip mounted");
        }
    }

    /// Stop listening for scroll changes. Dropping the app does the same.
    pub fn unmount(&mut self) {
        if let Some(listener) = self.scroll_listener.take() {
            listener.detach();
            tracing::info!("strip unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.scroll_listener.is_some()
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll.offset()
    }

    pub fn input_value(&self) -> &str {
        self.input.value()
    }

    pub fn metrics(&self) -> BoxMetrics {
        self.metrics
    }

    /// Get a color from the theme by name
    fn color(&self, name: &str) -> Color {
        self.theme.get(name)
    }

    fn update(&mut self, transition: impl FnOnce(StripState) -> StripState) {
        let state = std::mem::take(&mut self.strip);
        self.strip = transition(state);
    }

    /// Apply raw text as if it had been typed into the length field
    pub fn apply_length_input(&mut self, raw: &str) {
        self.update(|s| s.on_length_input(raw));
        self.sync_extent();
    }

    /// Set the length directly and show it in the length field
    pub fn set_length(&mut self, length: usize) {
        self.update(|s| s.with_length(length));
        self.sync_input();
        self.sync_extent();
    }

    fn step_length(&mut self, delta: i64) {
        self.update(|s| s.step_length(delta));
        self.sync_input();
        self.sync_extent();
    }

    fn sync_input(&mut self) {
        self.input.set_value(self.strip.length.to_string());
    }

    fn sync_extent(&mut self) {
        let content = self.metrics.content_width(self.strip.length);
        let viewport = self.scroll.viewport_width();
        self.scroll.set_extent(content, viewport);
    }

    fn focus_input(&mut self) {
        self.focus = Focus::Input;
        self.input.set_focused(true);
        self.debug.action("focus_input");
    }

    fn blur_input(&mut self) {
        self.focus = Focus::Strip;
        self.input.set_focused(false);
        self.sync_input();
        self.debug.action("blur_input");
    }

    fn scroll_by_boxes(&mut self, boxes: i32) {
        let pitch = self.metrics.pitch() as i32;
        self.scroll.scroll_by(boxes * pitch);
    }

    fn end_drag(&mut self, action: &str) {
        if self.strip.drag.dragging {
            self.update(StripState::on_drag_end);
            self.debug.action(action);
        }
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        self.debug.on_key(event);

        if event.kind == KeyEventKind::Release {
            return None;
        }

        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Exit);
        }

        match self.focus {
            Focus::Input => self.input_key(event),
            Focus::Strip => self.strip_key(event),
        }
    }

    fn input_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        if matches!(event.code, KeyCode::Tab | KeyCode::BackTab) {
            self.blur_input();
            return None;
        }

        match self.input.handle_key(event) {
            TextInputEvent::Changed => {
                let raw = self.input.value().to_string();
                self.apply_length_input(&raw);
                self.debug.action("length_input");
            }
            TextInputEvent::Submit | TextInputEvent::Cancel => self.blur_input(),
            TextInputEvent::StepUp => self.step_length(1),
            TextInputEvent::StepDown => self.step_length(-1),
            TextInputEvent::None => {}
        }
        None
    }

    fn strip_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(AppEvent::Exit),
            KeyCode::Tab | KeyCode::Char('/') | KeyCode::Char('i') => self.focus_input(),
            KeyCode::Left | KeyCode::Char('h') => {
                self.scroll_by_boxes(-1);
                self.debug.action("scroll_left");
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.scroll_by_boxes(1);
                self.debug.action("scroll_right");
            }
            KeyCode::Home => {
                self.scroll.set_offset(0);
                self.debug.action("scroll_home");
            }
            KeyCode::End => {
                self.scroll.set_offset(i32::MAX);
                self.debug.action("scroll_end");
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.step_length(1),
            KeyCode::Char('-') => self.step_length(-1),
            _ => {}
        }
        None
    }

    fn mouse(&mut self, event: &MouseEvent) -> Option<AppEvent> {
        self.debug.on_mouse(event);

        let position = Position::new(event.column, event.row);
        let inside = self.strip_area.contains(position);
        let pointer_x = event.column as i32;

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if inside {
                    if self.focus == Focus::Input {
                        self.blur_input();
                    }
                    let offset = self.scroll.offset();
                    self.update(|s| s.on_drag_start(pointer_x, offset));
                    self.debug.action("drag_start");
                } else if self.input_area.contains(position) {
                    self.focus_input();
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                if !inside {
                    self.end_drag("pointer_leave");
                    self.update(|s| s.on_hover(None));
                    return None;
                }
                if let Some(target) = self.strip.drag_target(pointer_x) {
                    self.scroll.set_offset(target);
                    self.debug.action("drag_move");
                }
                let content_x = pointer_x - self.strip_area.x as i32 + self.scroll.offset();
                let hovered = self.metrics.box_at(content_x, self.strip.length);
                self.update(|s| s.on_hover(hovered));
            }
            MouseEventKind::Up(MouseButton::Left) => self.end_drag("drag_end"),
            MouseEventKind::ScrollDown | MouseEventKind::ScrollRight if inside => {
                self.scroll_by_boxes(1);
                self.debug.action("wheel");
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft if inside => {
                self.scroll_by_boxes(-1);
                self.debug.action("wheel");
            }
            _ => {}
        }
        None
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Mouse(mouse) => self.mouse(mouse),
            AppEvent::Scroll(offset) => {
                self.debug.num_scroll_events += 1;
                self.debug.action(&format!("scroll {}", offset));
                // Read the surface, not the payload; later changes may already be applied
                let current = self.scroll.offset();
                let pitch = self.metrics.pitch();
                self.update(|s| s.on_scroll(current, pitch));
                None
            }
            // Extent is refreshed on the next render
            AppEvent::Resize(_, _) => None,
            AppEvent::Exit => None,
        }
    }

    fn render_input_line(&mut self, area: Rect, buf: &mut Buffer) {
        let label_width = INPUT_LABEL.chars().count() as u16;
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(label_width),
                Constraint::Length(INPUT_WIDTH),
                Constraint::Fill(1),
            ])
            .split(area);

        let label_style = if self.focus == Focus::Input {
            Style::default().fg(self.color("primary"))
        } else {
            Style::default().fg(self.color("text_primary"))
        };
        Paragraph::new(INPUT_LABEL)
            .style(label_style)
            .render(layout[0], buf);

        self.input_area = layout[1];
        (&self.input).render(layout[1], buf);
    }

    fn render_info_line(&self, area: Rect, buf: &mut Buffer) {
        let value = self
            .strip
            .active_value()
            .map(|v| group_digits(v, &self.separator))
            .unwrap_or_default();
        let text = format!(
            "Active: {} of {}   Value: {}",
            self.strip.active_index + 1,
            self.strip.length,
            value
        );
        Paragraph::new(text)
            .style(Style::default().fg(self.color("text_secondary")))
            .render(area, buf);
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let background_color = self.color("background");
        Block::default()
            .style(Style::default().bg(background_color))
            .render(area, buf);

        let mut constraints = vec![
            // Length input
            Constraint::Length(1),
            // Strip with its border
            Constraint::Length(self.metrics.height.saturating_add(2)),
            // Active box info
            Constraint::Length(1),
            Constraint::Fill(1),
            // Controls
            Constraint::Length(1),
        ];
        if self.debug.enabled {
            // Debug line
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        self.render_input_line(layout[0], buf);

        let border_color = if self.focus == Focus::Strip {
            self.color("primary")
        } else {
            self.color("dimmed")
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(format!(" Fibonacci ({}–{}) ", MIN_LENGTH, MAX_LENGTH))
            .title_style(Style::default().add_modifier(Modifier::BOLD));
        let strip_area = block.inner(layout[1]);
        block.render(layout[1], buf);

        self.strip_area = strip_area;
        self.scroll.set_extent(
            self.metrics.content_width(self.strip.length),
            strip_area.width as i32,
        );

        let boxes = project(
            &self.strip.sequence,
            self.strip.active_index,
            self.strip.hovered,
            &self.separator,
        );
        FibStrip::new(&boxes, self.metrics)
            .offset(self.scroll.offset())
            .colors(StripColors::from_theme(&self.theme))
            .render(strip_area, buf);

        self.render_info_line(layout[2], buf);

        let controls = Controls::with_position(self.strip.active_index, self.strip.length)
            .with_input_active(self.focus == Focus::Input)
            .with_dragging(self.strip.drag.dragging)
            .with_colors(self.color("controls_bg"), self.color("keybind_hints"));
        controls.render(layout[4], buf);

        if self.debug.enabled {
            (&self.debug).render(layout[5], buf);
        }
    }
}

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Paragraph, Widget},
};

#[derive(Default)]
pub struct DebugState {
    pub num_events: usize,
    pub num_frames: usize,
    pub num_key_events: usize,
    pub num_mouse_events: usize,
    pub num_scroll_events: usize,
    pub last_key_event_name: String,
    pub last_mouse_event_name: String,
    /// Last action taken (e.g. "drag_start") for debugging input handling.
    pub last_action: String,
    pub enabled: bool,
}

impl DebugState {
    pub fn on_key(&mut self, event: &crossterm::event::KeyEvent) {
        self.num_key_events += 1;
        self.last_key_event_name = format!("{:?}", event.code);
    }

    pub fn on_mouse(&mut self, event: &crossterm::event::MouseEvent) {
        self.num_mouse_events += 1;
        self.last_mouse_event_name = format!("{:?}@{},{}", event.kind, event.column, event.row);
    }

    pub fn action(&mut self, name: &str) {
        self.last_action.clear();
        self.last_action.push_str(name);
    }
}

impl Widget for &DebugState {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(format!(
            "events={} keys={} mouse={} scrolls={} last_key={} last_mouse={} last_action={} frames={}",
            self.num_events,
            self.num_key_events,
            self.num_mouse_events,
            self.num_scroll_events,
            self.last_key_event_name,
            self.last_mouse_event_name,
            self.last_action,
            self.num_frames,
        ))
        .render(area, buf);
    }
}

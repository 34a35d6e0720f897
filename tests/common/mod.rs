#![allow(dead_code)]

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use fibstrip::{App, AppEvent, Focus};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use std::sync::mpsc::Receiver;

pub const WIDTH: u16 = 80;
pub const HEIGHT: u16 = 20;

pub fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn mouse(kind: MouseEventKind, column: u16, row: u16) -> AppEvent {
    AppEvent::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

pub fn press(column: u16, row: u16) -> AppEvent {
    mouse(MouseEventKind::Down(MouseButton::Left), column, row)
}

pub fn drag(column: u16, row: u16) -> AppEvent {
    mouse(MouseEventKind::Drag(MouseButton::Left), column, row)
}

pub fn release(column: u16, row: u16) -> AppEvent {
    mouse(MouseEventKind::Up(MouseButton::Left), column, row)
}

/// Feed queued events back into the app, as the main loop does
pub fn pump(app: &mut App, rx: &Receiver<AppEvent>) {
    while let Ok(event) = rx.try_recv() {
        if let Some(next) = app.event(&event) {
            app.event(&next);
        }
    }
}

/// Type `text` into the length field, replacing what is there.
/// Focuses the field first unless it already has focus.
pub fn type_length(app: &mut App, text: &str) {
    if app.focus != Focus::Input {
        app.event(&key(KeyCode::Tab));
    }
    for _ in 0..8 {
        app.event(&key(KeyCode::Backspace));
    }
    for c in text.chars() {
        app.event(&key(KeyCode::Char(c)));
    }
}

pub fn render(app: &mut App) -> Buffer {
    render_sized(app, WIDTH, HEIGHT)
}

pub fn render_sized(app: &mut App, width: u16, height: u16) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    Widget::render(&mut *app, area, &mut buf);
    buf
}

pub fn row_text(buf: &Buffer, row: u16) -> String {
    (0..buf.area.width)
        .map(|x| buf[(x, row)].symbol())
        .collect::<String>()
}

pub fn screen_text(buf: &Buffer) -> String {
    (0..buf.area.height)
        .map(|y| row_text(buf, y))
        .collect::<Vec<_>>()
        .join("\n")
}

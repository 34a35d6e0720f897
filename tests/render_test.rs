use crossterm::event::{KeyCode, MouseEventKind};
use fibstrip::config::{AppConfig, Theme};
use fibstrip::{App, AppEvent};
use ratatui::style::{Color, Modifier};
use std::sync::mpsc;

mod common;
use common::{drag, key, mouse, press, pump, render, render_sized, row_text, screen_text};

fn ensure_colors_enabled() {
    std::env::remove_var("NO_COLOR");
}

#[test]
fn test_first_box_is_highlighted() {
    ensure_colors_enabled();
    let (tx, _rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new(tx);
    let buf = render(&mut app);

    // First box spans columns 1..16, rows 2..7; its label sits on the middle row
    assert_eq!(buf[(1, 2)].symbol(), "┌");
    assert_eq!(buf[(2, 3)].bg, Color::Green);
    assert_eq!(buf[(8, 4)].symbol(), "0");
    assert!(buf[(8, 4)].modifier.contains(Modifier::BOLD));

    // Second box is not
    assert_eq!(buf[(17, 2)].symbol(), "┌");
    assert_ne!(buf[(18, 3)].bg, Color::Green);
}

#[test]
fn test_box_under_pointer_is_highlighted() {
    ensure_colors_enabled();
    let (tx, _rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new(tx);
    render(&mut app);

    // Column 20 falls inside the second box, which spans screen columns 17..32
    app.event(&mouse(MouseEventKind::Moved, 20, 3));
    assert_eq!(app.strip.hovered, Some(1));
    let buf = render(&mut app);
    assert_eq!(buf[(17, 2)].fg, Color::White);
    assert!(buf[(17, 2)].modifier.contains(Modifier::BOLD));
    assert_eq!(buf[(33, 2)].fg, Color::Indexed(7));
    // The active box keeps its own style
    assert_eq!(buf[(2, 3)].bg, Color::Green);

    // The gap between boxes hovers nothing
    app.event(&mouse(MouseEventKind::Moved, 16, 3));
    assert_eq!(app.strip.hovered, None);

    app.event(&mouse(MouseEventKind::Moved, 20, 3));
    app.event(&mouse(MouseEventKind::Moved, 20, 15));
    assert_eq!(app.strip.hovered, None);
    let buf = render(&mut app);
    assert_eq!(buf[(17, 2)].fg, Color::Indexed(7));
}

#[test]
fn test_labels_use_digit_grouping_and_tiers() {
    ensure_colors_enabled();
    let (tx, rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new(tx);
    app.set_length(50);
    render(&mut app);
    app.mount();

    app.event(&key(KeyCode::End));
    pump(&mut app, &rx);
    let buf = render(&mut app);

    assert_eq!(app.strip.active_index, 45);
    assert!(row_text(&buf, 8).contains("Active: 46 of 50   Value: 1,134,903,170"));
    assert!(row_text(&buf, 19).contains("Box 46 / 50"));

    let screen = screen_text(&buf);
    assert!(screen.contains("7,778,742,049"));

    // Large values are dimmed
    let label_row = 4;
    let row = row_text(&buf, label_row);
    let col = row.chars().position(|c| c == '7').unwrap() as u16;
    assert!(buf[(col, label_row)].modifier.contains(Modifier::DIM));
}

#[test]
fn test_scrolled_strip_is_clipped() {
    let (tx, rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new(tx);
    render(&mut app);
    app.mount();

    app.event(&press(60, 3));
    app.event(&drag(52, 3));
    pump(&mut app, &rx);
    assert_eq!(app.scroll_offset(), 8);

    let buf = render(&mut app);
    // Box 1 starts at content column 16, now drawn 8 columns further left
    assert_eq!(buf[(9, 2)].symbol(), "┌");
    // The left part of box 0 is scrolled out; its right border is at screen column 7
    assert_eq!(buf[(7, 2)].symbol(), "┐");
    // 8 / 16 rounds up, and the drag marker shows while the pointer is held
    assert_eq!(app.strip.active_index, 1);
    assert!(row_text(&buf, 19).contains("» Box 2 / 10"));
}

#[test]
fn test_render_is_idempotent() {
    let (tx, _rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new(tx);
    app.set_length(20);

    let first = render(&mut app);
    let second = render(&mut app);
    assert_eq!(first, second);
}

#[test]
fn test_render_with_debug_line_is_idempotent() {
    let (tx, _rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new(tx);
    app.enable_debug();
    app.event(&key(KeyCode::Right));

    let first = render_sized(&mut app, 120, 20);
    let second = render_sized(&mut app, 120, 20);
    assert_eq!(first, second);

    // Frames are counted by the event loop, not by drawing
    app.record_frame();
    let third = render_sized(&mut app, 120, 20);
    assert!(row_text(&third, 19).contains("frames=1"));
    assert!(row_text(&first, 19).contains("frames=0"));
}

#[test]
fn test_debug_line_shows_counters() {
    let (tx, _rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new(tx);
    app.enable_debug();

    app.event(&key(KeyCode::Right));
    let buf = render_sized(&mut app, 120, 20);
    let last = row_text(&buf, 19);
    assert!(last.contains("keys=1"));
    assert!(last.contains("last_action=scroll_right"));
}

#[test]
fn test_tiny_screen_does_not_panic() {
    let (tx, _rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new(tx);
    app.set_length(50);

    render_sized(&mut app, 10, 3);
    render_sized(&mut app, 1, 1);
}

#[test]
fn test_custom_theme_applies_to_active_box() {
    ensure_colors_enabled();
    let mut config = AppConfig::default();
    config.theme.colors.active_box_bg = "blue".to_string();
    config.theme.colors.active_box_fg = "black".to_string();
    let theme = Theme::from_config(&config.theme).unwrap();

    let (tx, _rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new_with_config(tx, theme, &config);
    let buf = render(&mut app);

    assert_eq!(buf[(2, 3)].bg, Color::Blue);
    assert_eq!(buf[(8, 4)].fg, Color::Black);
}

#[test]
fn test_layout_config_changes_pitch() {
    let mut config = AppConfig::default();
    config.layout.box_width = 20;
    config.layout.box_gap = 2;
    let (tx, _rx) = mpsc::channel::<AppEvent>();
    let mut app = App::new_with_config(tx, Theme::default(), &config);
    let buf = render(&mut app);

    assert_eq!(app.metrics().pitch(), 22);
    assert_eq!(buf[(1, 2)].symbol(), "┌");
    assert_eq!(buf[(23, 2)].symbol(), "┌");
}

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::config::Theme;
use crate::strip::BoxMetrics;

/// Text treatment for a box label, chosen by the magnitude of its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontTier {
    /// Values below 100
    Large,
    /// Values from 100 up to 1000
    Medium,
    /// Values of 1000 and above
    Small,
}

impl FontTier {
    pub fn for_value(value: u64) -> Self {
        if value < 100 {
            Self::Large
        } else if value < 1000 {
            Self::Medium
        } else {
            Self::Small
        }
    }

    pub fn modifier(self) -> Modifier {
        match self {
            Self::Large => Modifier::BOLD,
            Self::Medium => Modifier::empty(),
            Self::Small => Modifier::DIM,
        }
    }
}

/// Format `value` with `separator` between groups of three digits.
/// An empty separator leaves the digits ungrouped.
pub fn group_digits(value: u64, separator: &str) -> String {
    let digits = value.to_string();
    if separator.is_empty() || digits.len() <= 3 {
        return digits;
    }
    let mut out = String::with_capacity(digits.len() + separator.len() * (digits.len() / 3));
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

/// What a single box shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxView {
    pub index: usize,
    pub value: u64,
    pub label: String,
    pub tier: FontTier,
    pub active: bool,
    pub hovered: bool,
}

/// Project a sequence onto the boxes that display it
pub fn project(
    sequence: &[u64],
    active_index: usize,
    hovered: Option<usize>,
    separator: &str,
) -> Vec<BoxView> {
    sequence
        .iter()
        .enumerate()
        .map(|(index, &value)| BoxView {
            index,
            value,
            label: group_digits(value, separator),
            tier: FontTier::for_value(value),
            active: index == active_index,
            hovered: hovered == Some(index),
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct StripColors {
    pub border: Color,
    pub text: Color,
    pub active_bg: Color,
    pub active_fg: Color,
    pub hover: Color,
}

impl Default for StripColors {
    fn default() -> Self {
        Self {
            border: Color::Indexed(7),
            text: Color::White,
            active_bg: Color::Green,
            active_fg: Color::White,
            hover: Color::White,
        }
    }
}

impl StripColors {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            border: theme.get("box_border"),
            text: theme.get("text_primary"),
            active_bg: theme.get("active_box_bg"),
            active_fg: theme.get("active_box_fg"),
            hover: theme.get("box_hover"),
        }
    }
}

/// Horizontally scrolled row of boxes
pub struct FibStrip<'a> {
    boxes: &'a [BoxView],
    metrics: BoxMetrics,
    offset: i32,
    colors: StripColors,
}

impl<'a> FibStrip<'a> {
    pub fn new(boxes: &'a [BoxView], metrics: BoxMetrics) -> Self {
        Self {
            boxes,
            metrics,
            offset: 0,
            colors: StripColors::default(),
        }
    }

    pub fn offset(mut self, offset: i32) -> Self {
        self.offset = offset.max(0);
        self
    }

    pub fn colors(mut self, colors: StripColors) -> Self {
        self.colors = colors;
        self
    }

    fn render_box(&self, view: &BoxView, area: Rect, buf: &mut Buffer) {
        let style = if view.active {
            Style::default().bg(self.colors.active_bg).fg(self.colors.active_fg)
        } else {
            Style::default().fg(self.colors.text)
        };
        let border_style = if view.active {
            style
        } else if view.hovered {
            Style::default()
                .fg(self.colors.hover)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.colors.border)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(style);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }
        let label_area = Rect {
            y: inner.y + inner.height / 2,
            height: 1,
            ..inner
        };
        Paragraph::new(view.label.as_str())
            .style(style.add_modifier(view.tier.modifier()))
            .alignment(Alignment::Center)
            .render(label_area, buf);
    }
}

impl Widget for FibStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() || self.boxes.is_empty() {
            return;
        }

        // Draw the whole row off-screen, then copy the visible window across
        let content_width = self
            .metrics
            .content_width(self.boxes.len())
            .clamp(0, u16::MAX as i32) as u16;
        let box_height = self.metrics.height.min(area.height);
        let mut strip = Buffer::empty(Rect::new(0, 0, content_width, area.height));

        let pitch = self.metrics.pitch() as u32;
        let footprint = self.metrics.footprint_width();
        for view in self.boxes {
            let x = view.index as u32 * pitch;
            if x >= content_width as u32 {
                break;
            }
            let width = footprint.min(content_width - x as u16);
            self.render_box(view, Rect::new(x as u16, 0, width, box_height), &mut strip);
        }

        for dy in 0..area.height {
            for dx in 0..area.width {
                let src_x = self.offset + dx as i32;
                if src_x >= content_width as i32 {
                    break;
                }
                buf[(area.x + dx, area.y + dy)] = strip[(src_x as u16, dy)].clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_tiers() {
        assert_eq!(FontTier::for_value(0), FontTier::Large);
        assert_eq!(FontTier::for_value(99), FontTier::Large);
        assert_eq!(FontTier::for_value(100), FontTier::Medium);
        assert_eq!(FontTier::for_value(999), FontTier::Medium);
        assert_eq!(FontTier::for_value(1000), FontTier::Small);
        assert_eq!(FontTier::for_value(7_778_742_049), FontTier::Small);
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0, ","), "0");
        assert_eq!(group_digits(999, ","), "999");
        assert_eq!(group_digits(1000, ","), "1,000");
        assert_eq!(group_digits(75025, ","), "75,025");
        assert_eq!(group_digits(1234567, ","), "1,234,567");
        assert_eq!(group_digits(7_778_742_049, "."), "7.778.742.049");
        assert_eq!(group_digits(1234567, ""), "1234567");
        assert_eq!(group_digits(1234567, "\u{202f}"), "1\u{202f}234\u{202f}567");
    }

    #[test]
    fn test_project_marks_single_active_box() {
        let sequence = crate::sequence::generate(12);
        let boxes = project(&sequence, 3, Some(5), ",");
        assert_eq!(boxes.len(), 12);
        assert_eq!(boxes.iter().filter(|b| b.active).count(), 1);
        assert!(boxes[3].active);
        assert_eq!(boxes.iter().filter(|b| b.hovered).count(), 1);
        assert!(boxes[5].hovered);
        assert_eq!(boxes[11].value, 89);
        assert_eq!(boxes[11].label, "89");
    }

    #[test]
    fn test_project_out_of_range_active_index() {
        let sequence = crate::sequence::generate(10);
        let boxes = project(&sequence, 10, None, ",");
        assert!(boxes.iter().all(|b| !b.active && !b.hovered));
    }
}

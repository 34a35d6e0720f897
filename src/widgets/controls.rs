use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
};

/// Key hint bar along the bottom of the screen
#[derive(Default)]
pub struct Controls {
    pub position: Option<(usize, usize)>,
    pub input_active: bool,
    pub dragging: bool,
    pub bg: Option<Color>,
    pub highlight: Option<Color>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show "active / total" at the right edge
    pub fn with_position(active: usize, total: usize) -> Self {
        Self {
            position: Some((active, total)),
            ..Self::default()
        }
    }

    pub fn with_input_active(mut self, input_active: bool) -> Self {
        self.input_active = input_active;
        self
    }

    pub fn with_dragging(mut self, dragging: bool) -> Self {
        self.dragging = dragging;
        self
    }

    pub fn with_colors(mut self, bg: Color, highlight: Color) -> Self {
        self.bg = Some(bg);
        self.highlight = Some(highlight);
        self
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.input_active {
            &[("↑↓", "Step"), ("Enter", "Apply"), ("Esc", "Back")]
        } else {
            &[
                ("←→", "Scroll"),
                ("Home", "Start"),
                ("End", "End"),
                ("Tab", "Length"),
                ("q", "Quit"),
            ]
        }
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let hints = self.hints();

        let mut constraints = hints.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });
        constraints.push(Constraint::Fill(1));
        if self.position.is_some() {
            constraints.push(Constraint::Length(16)); // "Box 50 / 50" plus drag marker
        }

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);
        let bg = self.bg.unwrap_or(Color::DarkGray);
        let highlight = self.highlight.unwrap_or(Color::Cyan);
        let base_style = Style::default();

        for (i, (key, action)) in hints.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(base_style.add_modifier(Modifier::BOLD))
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(base_style.bg(bg))
                .render(layout[j + 1], buf);
        }

        let fill_idx = hints.len() * 2;
        Paragraph::new("")
            .style(base_style.bg(bg))
            .render(layout[fill_idx], buf);

        if let Some((active, total)) = self.position {
            let marker = if self.dragging { "» " } else { "" };
            let text = format!("{}Box {} / {}", marker, active + 1, total);
            Paragraph::new(text)
                .style(base_style.bg(bg).fg(highlight))
                .right_aligned()
                .render(layout[fill_idx + 1], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, width: u16) -> String {
        (0..width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_controls_show_position() {
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        Controls::with_position(2, 25).render(area, &mut buf);
        let text = row_text(&buf, 100);
        assert!(text.contains("Scroll"));
        assert!(text.contains("Box 3 / 25"));
    }

    #[test]
    fn test_controls_keys_are_bold() {
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        Controls::new().render(area, &mut buf);
        // First hint key "←→" is centered in its 4-column slot
        assert_eq!(buf[(1, 0)].symbol(), "←");
        assert!(buf[(1, 0)].modifier.contains(Modifier::BOLD));
        assert!(!buf[(5, 0)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_controls_input_hints() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        Controls::new().with_input_active(true).render(area, &mut buf);
        let text = row_text(&buf, 80);
        assert!(text.contains("Apply"));
        assert!(!text.contains("Scroll"));
    }
}

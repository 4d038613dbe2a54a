use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::format::truncate_unicode;
use crate::ui::popup;
use crate::ui::theme::Theme;

const NAME_WIDTH: usize = 32;

/// Interface chooser. `labels` pairs each row with whether it is the
/// active selection; `cursor` is the highlighted row.
pub fn render(frame: &mut Frame, area: Rect, labels: &[(String, bool)], cursor: usize, theme: &Theme) {
    let lines: Vec<Line> = labels
        .iter()
        .enumerate()
        .map(|(i, (name, active))| {
            let marker = if *active { "\u{25cf}" } else { " " };
            let text = format!(" {marker} {}", truncate_unicode(name, NAME_WIDTH));
            let style = if i == cursor {
                Style::default()
                    .fg(theme.pill_key_fg)
                    .bg(theme.pill_key_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.pill_desc_fg)
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    popup::render(frame, area, "Network interface", lines, NAME_WIDTH as u16 + 8, theme);
}

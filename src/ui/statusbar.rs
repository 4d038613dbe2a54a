use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{InputMode, ResolvedKeybinds, key_label};
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    input_mode: InputMode,
    keybinds: &ResolvedKeybinds,
    status_message: Option<&(String, std::time::Instant)>,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    // Status message takes priority
    if let Some((msg, _)) = status_message {
        let color = if msg.starts_with("Could not") {
            theme.status_err
        } else {
            theme.status_ok
        };
        let line = Line::from(Span::styled(
            format!(" {msg}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let mut spans = Vec::new();
    match input_mode {
        InputMode::InterfacePicker => {
            spans.extend(pill_spans("\u{2191}\u{2193}".to_string(), "Move", theme));
            spans.extend(pill_spans("Enter".to_string(), "Select", theme));
            spans.extend(pill_spans("Esc".to_string(), "Cancel", theme));
        }
        InputMode::Help => {
            spans.extend(pill_spans("Esc".to_string(), "Close", theme));
        }
        InputMode::Normal => {
            spans.extend(pill_spans(key_label(keybinds.quit), "Quit", theme));
            spans.extend(pill_spans(key_label(keybinds.toggle_cpu), "CPU", theme));
            spans.extend(pill_spans(key_label(keybinds.toggle_mem), "Mem", theme));
            spans.extend(pill_spans(key_label(keybinds.toggle_net), "Net", theme));
            spans.extend(pill_spans(key_label(keybinds.pick_interface), "Iface", theme));
            spans.extend(pill_spans(key_label(keybinds.help), "Help", theme));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn pill_spans<'a>(key: String, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}

pub mod header;
pub mod help;
pub mod picker;
pub mod popup;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;
use crate::system::CounterSource;
use crate::ui::header::GraphStrip;

pub fn draw<S: CounterSource>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let graphs = app.visible_graphs();
    let net_label = app.selection_label();
    let strip = GraphStrip {
        snapshot: &app.snapshot,
        history: &app.history,
        graphs: &graphs,
        net_label: &net_label,
    };
    header::render_graphs(frame, chunks[0], &strip, &app.theme);
    header::render_readout(frame, chunks[1], &app.snapshot, &app.theme);
    statusbar::render(
        frame,
        chunks[2],
        app.input_mode,
        &app.keybinds,
        app.status_message.as_ref(),
        &app.theme,
    );

    // Overlays last so they draw on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
    if app.show_picker() {
        picker::render(
            frame,
            frame.area(),
            &app.picker_labels(),
            app.picker_index,
            &app.theme,
        );
    }
}

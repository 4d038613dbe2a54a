use ratatui::style::Color;

use crate::action::Graph;

#[derive(Debug, Clone)]
pub struct Theme {
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_secondary: Color,
    pub accent: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub surface_bg: Color,
    pub cpu_graph: Color,
    pub mem_graph: Color,
    pub net_graph: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            status_ok: Color::Green,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            overlay_border: Color::DarkGray,
            text_secondary: Color::Gray,
            accent: Color::Green,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            surface_bg: Color::DarkGray,
            cpu_graph: Color::Rgb(52, 211, 153),
            mem_graph: Color::Rgb(96, 165, 250),
            net_graph: Color::Rgb(250, 204, 21),
        }
    }

    pub fn graph_color(&self, graph: Graph) -> Color {
        match graph {
            Graph::Cpu => self.cpu_graph,
            Graph::Memory => self.mem_graph,
            Graph::Network => self.net_graph,
        }
    }
}

use ratatui::style::{Color, Modifier, Style};

// Centralized theme colors for the status screen and the overlay panel.

pub fn panel_bg() -> Color {
    Color::Black
}

pub fn panel_border() -> Color {
    Color::DarkGray
}

pub fn panel_title() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::Blue)
        .add_modifier(Modifier::BOLD)
}

/// Header while the panel is being dragged.
pub fn panel_title_dragging() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn panel_close() -> Style {
    Style::default().fg(Color::LightRed).bg(Color::Blue)
}

pub fn app_label() -> Style {
    Style::default().fg(Color::LightGreen).bg(panel_bg())
}

pub fn window_label() -> Style {
    Style::default().fg(Color::LightCyan).bg(panel_bg())
}

pub fn history_title() -> Style {
    Style::default()
        .fg(Color::Gray)
        .bg(panel_bg())
        .add_modifier(Modifier::UNDERLINED)
}

pub fn history_app_name() -> Style {
    Style::default().fg(Color::Yellow).bg(panel_bg())
}

pub fn history_window() -> Style {
    Style::default().fg(Color::White).bg(panel_bg())
}

pub fn placeholder() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .bg(panel_bg())
        .add_modifier(Modifier::ITALIC)
}

pub fn status_bar() -> Style {
    Style::default().fg(Color::Black).bg(Color::Gray)
}

pub fn toast() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub fn status_heading() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

//! Sign-in screen

use super::field_renderer::draw_field;
use crate::app::App;
use crate::state::Form;
use crate::ui::components::{centered_rect, render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw_login(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.login;
    let panel = centered_rect(area, 50, 16);

    let block = Block::default()
        .title(Span::styled(
            " ClientDesk ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),             // Email
            Constraint::Length(3),             // Password
            Constraint::Length(2),             // Error
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Min(0),
        ])
        .split(inner);

    for index in 0..form.field_count() {
        if let Some(field) = form.get_field(index) {
            draw_field(frame, chunks[index], field, form.active_field() == index);
        }
    }

    if let Some(error) = &form.error {
        frame.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            chunks[2],
        );
    }

    let label = if form.submitting {
        "Signing in..."
    } else {
        "Sign in  ⏎"
    };
    let button_area = centered_rect(chunks[3], 20, BUTTON_HEIGHT);
    render_button(
        frame,
        button_area,
        label,
        form.active_field() == 1,
        form.is_complete() && !form.submitting,
    );

    if let Some(hint_area) = chunks.get(4) {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("API: {}", app.api.base_url()),
                Style::default().fg(Color::DarkGray),
            ))),
            *hint_area,
        );
    }
}

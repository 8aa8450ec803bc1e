//! Form listings for admins and clients

use crate::api::{FormRecord, FormStatus};
use crate::app::App;
use crate::auth::Route;
use crate::utils::{format_date, format_datetime};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

fn status_span(status: FormStatus) -> Span<'static> {
    let color = match status {
        FormStatus::Draft => Color::Yellow,
        FormStatus::Published => Color::Green,
    };
    Span::styled(format!("[{}]", status.label()), Style::default().fg(color))
}

fn form_item(form: &FormRecord, is_selected: bool, show_status: bool) -> ListItem<'static> {
    let prefix = if is_selected { "▸ " } else { "  " };
    let style = if is_selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::styled(prefix, style)];
    if show_status {
        spans.push(status_span(form.status));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        form.title.clone(),
        style.add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(
        format!(
            "  {} field(s) · updated {}",
            form.data.fields.len(),
            format_date(&form.updated_at)
        ),
        Style::default().fg(Color::DarkGray),
    ));
    ListItem::new(Line::from(spans))
}

/// Draw the forms listing for the current dashboard route
pub fn draw_forms(frame: &mut Frame, area: Rect, app: &App) {
    let is_admin = app.state.route == Route::AdminDashboard;
    let forms = app.state.visible_forms();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Filter
            Constraint::Min(0),    // List
            Constraint::Length(3), // Details
        ])
        .split(area);

    let filter_line = if app.state.filter_active {
        Line::from(vec![
            Span::styled(" / ", Style::default().fg(Color::Cyan)),
            Span::raw(app.state.filter_input.clone()),
            Span::styled("▌", Style::default().fg(Color::Cyan)),
        ])
    } else if !app.state.filter.is_empty() {
        Line::from(vec![
            Span::styled(" filter: ", Style::default().fg(Color::DarkGray)),
            Span::styled(app.state.filter.clone(), Style::default().fg(Color::Cyan)),
        ])
    } else {
        Line::from(Span::styled(
            " / to filter",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(filter_line), chunks[0]);

    let title = format!(" {} ({}) ", app.state.route.title(), forms.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if forms.is_empty() {
        let message = if app.state.loading {
            "Loading..."
        } else if !app.state.filter.is_empty() {
            "No forms match the filter."
        } else if is_admin {
            "No forms yet.\nPress 'n' to create one."
        } else {
            "No published forms yet."
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            chunks[1],
        );
        return;
    }

    let items: Vec<ListItem> = forms
        .iter()
        .enumerate()
        .map(|(idx, form)| form_item(form, idx == app.state.selected_index, is_admin))
        .collect();
    let mut list_state = ListState::default().with_selected(Some(app.state.selected_index));
    frame.render_stateful_widget(List::new(items).block(block), chunks[1], &mut list_state);

    if let Some(form) = forms.get(app.state.selected_index) {
        let details = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Created ", Style::default().fg(Color::DarkGray)),
                Span::raw(format_datetime(&form.created_at)),
                Span::styled("   Updated ", Style::default().fg(Color::DarkGray)),
                Span::raw(format_datetime(&form.updated_at)),
            ]),
            Line::from(Span::styled(
                format!("id {}", form.id),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(Block::default().borders(Borders::TOP));
        frame.render_widget(details, chunks[2]);
    }
}

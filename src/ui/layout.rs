//! Layout components (navigation sidebar, drawer, status bar)

use super::components::{render_nav_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::auth::Route;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Width of the docked sidebar
const SIDEBAR_WIDTH: u16 = 20;

/// Split the screen into an optional sidebar and the main content area.
/// The bottom line is always reserved for the status bar.
pub fn create_layout(area: Rect, docked: bool) -> (Option<Rect>, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    if !docked {
        return (None, rows[0]);
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH), // Sidebar
            Constraint::Min(0),                // Main content
        ])
        .split(rows[0]);

    (Some(chunks[0]), chunks[1])
}

fn draw_nav_buttons(frame: &mut Frame, area: Rect, app: &App, show_selection: bool) {
    let items = app.nav_items();
    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(items.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (idx, item) in items.iter().enumerate() {
        let is_selected = show_selection && idx == app.state.nav.selected;
        render_nav_button(
            frame,
            chunks[idx + 1],
            item.label(),
            item.is_active(app.state.route),
            is_selected,
        );
    }
}

/// Draw the docked sidebar
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    draw_nav_buttons(frame, area, app, app.state.nav.is_open());
}

/// Draw the navigation drawer over the content on narrow terminals
pub fn draw_nav_drawer(frame: &mut Frame, area: Rect, app: &App) {
    let count = app.nav_items().len() as u16;
    let height = (count * BUTTON_HEIGHT + 3).min(area.height);
    let drawer = Rect {
        x: area.x,
        y: area.y,
        width: (SIDEBAR_WIDTH + 2).min(area.width),
        height,
    };

    frame.render_widget(Clear, drawer);
    let block = Block::default()
        .title(" Menu ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(drawer);
    frame.render_widget(block, drawer);
    draw_nav_buttons(frame, inner, app, true);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    if app.state.loading || app.is_saving() {
        spans.push(Span::styled(" ◌ ", Style::default().fg(Color::Yellow)));
    } else {
        spans.push(Span::raw(" "));
    }

    let hints = get_route_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Some(user) = app.sessions.user() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!(
                "{} ({})",
                user.display_name(),
                format!("{:?}", user.role).to_lowercase()
            ),
            Style::default().fg(Color::Blue),
        ));
    }

    let quit_hint = " ^C:quit ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the current screen
fn get_route_hints(app: &App) -> String {
    if app.state.confirm.is_some() {
        return "←/→:choose  Enter:confirm  y/n  Esc:cancel".to_string();
    }
    if app.state.nav.is_open() {
        return "j/k:nav  Enter:go  Esc:close".to_string();
    }
    if app.state.filter_active {
        return "type to filter  Enter:done  Esc:clear".to_string();
    }
    match app.state.route {
        Route::Login => "Tab:next  Enter:sign in".to_string(),
        Route::AdminDashboard => {
            "j/k:nav  n:new  e:edit  d:delete  p:publish  /:filter  r:refresh  o:sign out  ^B:menu"
                .to_string()
        }
        Route::ClientDashboard => {
            "j/k:nav  Enter:open  /:filter  r:refresh  o:sign out  ^B:menu".to_string()
        }
        Route::FormBuilder => {
            "Tab:next  ^S:save  ^↑/^↓:move  ^D:del field  ^K:col  ^R:row  ^X:del  Esc:close"
                .to_string()
        }
    }
}

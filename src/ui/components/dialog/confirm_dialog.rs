//! Confirmation dialog for destructive actions

use super::base::{render_dialog, DialogConfig};
use crate::state::{ConfirmDialog, PendingAction};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

/// Render a confirmation dialog
pub fn render_confirm_dialog(frame: &mut Frame, dialog: &ConfirmDialog) {
    let (confirm_label, accent) = match dialog.action {
        PendingAction::DeleteForm { .. } => ("Delete", Color::Red),
        PendingAction::DiscardEdits => ("Discard", Color::Yellow),
        PendingAction::Logout => ("Sign out", Color::Cyan),
    };

    let mut footer = Vec::new();
    for (is_confirm, label, color) in [
        (false, "Cancel", Color::White),
        (true, confirm_label, accent),
    ] {
        let is_selected = dialog.selected_option == is_confirm;
        let prefix = if is_selected { "▸ " } else { "  " };
        let style = if is_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        footer.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));
    }
    footer.push(Line::from(""));
    footer.push(Line::from(vec![
        Span::styled("↑↓", Style::default().fg(Color::Cyan)),
        Span::styled(" select  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::styled(" confirm  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ]));

    render_dialog(
        frame,
        DialogConfig {
            title: &dialog.title,
            accent,
            message: &dialog.message,
            footer,
            max_width: 56,
        },
    );
}

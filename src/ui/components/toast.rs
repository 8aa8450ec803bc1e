//! Toast overlay in the top-right corner

use crate::state::{ToastKind, ToastQueue};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const TOAST_WIDTH: u16 = 40;
const TOAST_HEIGHT: u16 = 3;

fn kind_color(kind: ToastKind) -> Color {
    match kind {
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
        ToastKind::Info => Color::Cyan,
        ToastKind::Warning => Color::Yellow,
    }
}

/// Draw the newest toasts stacked below each other, newest on top
pub fn render_toasts(frame: &mut Frame, toasts: &ToastQueue) {
    let area = frame.area();
    let width = TOAST_WIDTH.min(area.width);
    let max_visible = (area.height.saturating_sub(1) / TOAST_HEIGHT) as usize;

    for (i, toast) in toasts.iter().rev().take(max_visible).enumerate() {
        let toast_area = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y: area.y + 1 + i as u16 * TOAST_HEIGHT,
            width,
            height: TOAST_HEIGHT,
        };
        let color = kind_color(toast.kind);
        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(toast.message.as_str())
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(color).bg(Color::Black))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                ),
            toast_area,
        );
    }
}

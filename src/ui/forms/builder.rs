//! Form builder screen
//!
//! The editor is laid out as one scrolling list of lines. Each input slot
//! lives on a known line so the view can follow the focus.

use super::field_renderer::CURSOR;
use crate::app::App;
use crate::state::{describe, CellInput, EditSession, EditorSlot, FieldKind, FieldView, TableView};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn focus_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn label_span(text: &str) -> Span<'static> {
    Span::styled(format!("{text:<10}"), Style::default().fg(Color::Gray))
}

fn text_input(text: &str, focused: bool) -> Vec<Span<'static>> {
    if focused {
        vec![
            Span::styled(text.to_string(), focus_style()),
            Span::styled(CURSOR, Style::default().fg(Color::Cyan)),
        ]
    } else if text.is_empty() {
        vec![Span::styled("(empty)", Style::default().fg(Color::DarkGray))]
    } else {
        vec![Span::raw(text.to_string())]
    }
}

fn select(text: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        focus_style()
    } else {
        Style::default().fg(Color::Yellow)
    };
    Span::styled(format!("‹{text}›"), style)
}

fn checkbox(checked: bool, focused: bool) -> Span<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    let style = if focused {
        focus_style()
    } else {
        Style::default()
    };
    Span::styled(mark, style)
}

/// Collects lines and remembers which one holds the focused slot
struct LineBuilder {
    lines: Vec<Line<'static>>,
    focused: Option<EditorSlot>,
    focus_line: usize,
}

impl LineBuilder {
    fn is_focused(&self, slot: EditorSlot) -> bool {
        self.focused == Some(slot)
    }

    /// Push a line containing the given slots
    fn push(&mut self, slots: &[EditorSlot], spans: Vec<Span<'static>>) {
        if slots.iter().any(|s| self.focused == Some(*s)) {
            self.focus_line = self.lines.len();
        }
        self.lines.push(Line::from(spans));
    }

    fn blank(&mut self) {
        self.lines.push(Line::from(""));
    }
}

fn push_table(out: &mut LineBuilder, f: usize, table: &TableView) {
    if table.columns.is_empty() {
        out.push(
            &[],
            vec![Span::styled(
                "  No columns yet. Ctrl+K adds one",
                Style::default().fg(Color::DarkGray),
            )],
        );
        return;
    }

    out.push(&[], vec![label_span("  Columns")]);
    for (c, column) in table.columns.iter().enumerate() {
        let label_slot = EditorSlot::ColumnLabel { field: f, column: c };
        let type_slot = EditorSlot::ColumnType { field: f, column: c };
        let access_slot = EditorSlot::ColumnAccess { field: f, column: c };

        let mut spans = vec![Span::raw(format!("    {}. ", c + 1))];
        spans.extend(text_input(&column.label, out.is_focused(label_slot)));
        spans.push(Span::raw("  "));
        spans.push(select(column.column_type.label(), out.is_focused(type_slot)));
        spans.push(Span::raw(" "));
        spans.push(select(column.access.label(), out.is_focused(access_slot)));
        out.push(&[label_slot, type_slot, access_slot], spans);
    }

    if table.rows.is_empty() {
        out.push(
            &[],
            vec![Span::styled(
                "  No pre-filled rows. Ctrl+R adds one",
                Style::default().fg(Color::DarkGray),
            )],
        );
        return;
    }

    out.push(&[], vec![label_span("  Rows")]);
    for (r, row) in table.rows.iter().enumerate() {
        let mut spans = vec![Span::raw(format!("    Row {}  ", r + 1))];
        let mut slots = Vec::with_capacity(table.columns.len());
        for (c, column) in table.columns.iter().enumerate() {
            let slot = EditorSlot::Cell { field: f, row: r, column: c };
            let focused = out.is_focused(slot);
            slots.push(slot);
            match row.cells.get(&c) {
                Some(CellInput::Checkbox(checked)) => spans.push(checkbox(*checked, focused)),
                Some(CellInput::Text(text)) => {
                    spans.push(Span::raw("["));
                    spans.extend(text_input(text, focused));
                    spans.push(Span::raw("]"));
                }
                None if column.column_type == crate::state::ColumnType::Checkbox => {
                    spans.push(checkbox(false, focused))
                }
                None => {
                    spans.push(Span::raw("["));
                    spans.extend(text_input("", focused));
                    spans.push(Span::raw("]"));
                }
            }
            spans.push(Span::raw(" "));
        }
        out.push(&slots, spans);
    }
}

fn push_field(out: &mut LineBuilder, f: usize, kind: Option<FieldKind>, view: &FieldView) {
    let header = match kind {
        Some(kind) => {
            let d = describe(kind);
            format!("── {}. {} {} ", f + 1, d.icon, d.label)
        }
        None => format!("── {}. ", f + 1),
    };
    out.push(
        &[],
        vec![Span::styled(
            header,
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )],
    );

    let label_slot = EditorSlot::FieldLabel(f);
    let mut spans = vec![label_span("  Label")];
    spans.extend(text_input(&view.label, out.is_focused(label_slot)));
    out.push(&[label_slot], spans);

    let required_slot = EditorSlot::FieldRequired(f);
    let focused = out.is_focused(required_slot);
    out.push(
        &[required_slot],
        vec![
            Span::raw("  "),
            checkbox(view.required, focused),
            Span::raw(" Required"),
        ],
    );

    if let Some(options) = &view.options {
        let slot = EditorSlot::FieldOptions(f);
        let mut spans = vec![label_span("  Options")];
        spans.extend(text_input(options, out.is_focused(slot)));
        out.push(&[slot], spans);
    }

    if let Some(table) = &view.table {
        push_table(out, f, table);
    }
    out.blank();
}

/// Lines of the editor and the index of the line holding `focused`
pub fn build_lines(
    session: &EditSession,
    focused: Option<EditorSlot>,
    palette_index: usize,
) -> (Vec<Line<'static>>, usize) {
    let mut out = LineBuilder {
        lines: Vec::new(),
        focused,
        focus_line: 0,
    };
    let view = session.view();

    let mut spans = vec![label_span("Title")];
    spans.extend(text_input(&view.title, out.is_focused(EditorSlot::Title)));
    out.push(&[EditorSlot::Title], spans);
    out.blank();

    if view.fields.is_empty() {
        out.push(
            &[],
            vec![Span::styled(
                "No fields yet. Pick a type below to add one.",
                Style::default().fg(Color::DarkGray),
            )],
        );
        out.blank();
    }

    for (f, field_view) in view.fields.iter().enumerate() {
        let kind = session.document().fields.get(f).map(|field| field.kind);
        push_field(&mut out, f, kind, field_view);
    }

    let palette_focused = out.is_focused(EditorSlot::AddField);
    let mut spans = vec![label_span("Add field")];
    for (i, kind) in FieldKind::ALL.iter().enumerate() {
        let d = describe(*kind);
        let style = if palette_focused && i == palette_index {
            focus_style().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} {} {} ", i + 1, d.icon, d.label), style));
    }
    out.push(&[EditorSlot::AddField], spans);

    (out.lines, out.focus_line)
}

/// Scroll offset that keeps `focus_line` visible in a viewport of `height` rows
pub fn scroll_offset(focus_line: usize, height: u16) -> u16 {
    let height = height.max(1) as usize;
    let margin = 2.min(height.saturating_sub(1));
    focus_line.saturating_sub(height - 1 - margin) as u16
}

pub fn draw_form_builder(frame: &mut Frame, area: Rect, app: &App) {
    let Some(session) = app.controller.session() else {
        frame.render_widget(
            Paragraph::new("No form open").block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    let title = match (session.is_new(), app.is_saving()) {
        (_, true) => " Form Builder - saving... ".to_string(),
        (true, false) => " Form Builder - new form ".to_string(),
        (false, false) => " Form Builder - editing ".to_string(),
    };
    let dirty = if session.is_dirty() { " ● unsaved " } else { "" };

    let block = Block::default()
        .title(title)
        .title(Span::styled(dirty, Style::default().fg(Color::Yellow)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);

    let (lines, focus_line) = build_lines(session, app.focused_slot(), app.state.palette_index);
    let offset = scroll_offset(focus_line, inner.height);

    frame.render_widget(Paragraph::new(lines).scroll((offset, 0)).block(block), area);
}

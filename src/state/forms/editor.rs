//! Field editors: the live, editable view state of a form and the
//! render/extract pair that moves data between it and the document model.
//!
//! The view is the source of truth between renders. Structural edits on the
//! document first extract the view back into the model so nothing typed is lost.

use super::model::{CellValue, Column, ColumnAccess, ColumnType, Field, FieldPayload, FormDocument, Row};
use std::collections::BTreeMap;

/// Input widget backing one table cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellInput {
    Text(String),
    Checkbox(bool),
}

impl CellInput {
    /// Empty input matching a column's type
    pub fn empty_for(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Checkbox => Self::Checkbox(false),
            _ => Self::Text(String::new()),
        }
    }
}

/// Column settings as shown in the column editor
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub label: String,
    pub column_type: ColumnType,
    pub access: ColumnAccess,
}

/// Cell inputs of one row, keyed by column position
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowView {
    pub cells: BTreeMap<usize, CellInput>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableView {
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
}

/// Editable inputs of a single field.
///
/// `options` and `table` are `None` when the kind has no such editor; an
/// absent editor leaves the model untouched on extraction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldView {
    pub label: String,
    pub required: bool,
    /// Comma separated option list (dropdown only)
    pub options: Option<String>,
    pub table: Option<TableView>,
}

/// Everything the form builder currently shows on screen
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorView {
    pub title: String,
    pub fields: Vec<FieldView>,
}

/// An addressable input inside the editor, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorSlot {
    Title,
    FieldLabel(usize),
    FieldRequired(usize),
    FieldOptions(usize),
    ColumnLabel { field: usize, column: usize },
    ColumnType { field: usize, column: usize },
    ColumnAccess { field: usize, column: usize },
    Cell { field: usize, row: usize, column: usize },
    AddField,
}

impl EditorSlot {
    /// Index of the field this slot belongs to
    pub fn field_index(&self) -> Option<usize> {
        match *self {
            Self::Title | Self::AddField => None,
            Self::FieldLabel(f) | Self::FieldRequired(f) | Self::FieldOptions(f) => Some(f),
            Self::ColumnLabel { field, .. }
            | Self::ColumnType { field, .. }
            | Self::ColumnAccess { field, .. }
            | Self::Cell { field, .. } => Some(field),
        }
    }

    pub fn accepts_text(&self) -> bool {
        matches!(
            self,
            Self::Title
                | Self::FieldLabel(_)
                | Self::FieldOptions(_)
                | Self::ColumnLabel { .. }
                | Self::Cell { .. }
        )
    }
}

/// Split a comma separated option list into trimmed, non-empty options
pub fn parse_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Checkbox state of a value that reads as a boolean
fn as_checkbox(value: &CellValue) -> Option<bool> {
    match value {
        CellValue::Bool(b) => Some(*b),
        CellValue::Text(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
        CellValue::Text(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Input for a stored value. In checkbox columns, values that are not
/// boolean stay as text until the cell is toggled.
fn render_cell(value: Option<&CellValue>, column_type: ColumnType) -> CellInput {
    match (column_type, value) {
        (ColumnType::Checkbox, None) => CellInput::Checkbox(false),
        (ColumnType::Checkbox, Some(v)) => match as_checkbox(v) {
            Some(checked) => CellInput::Checkbox(checked),
            None => CellInput::Text(v.display()),
        },
        (_, Some(v)) => CellInput::Text(v.display()),
        (_, None) => CellInput::Text(String::new()),
    }
}

/// Build the editor inputs for a field
pub fn render_field(field: &Field) -> FieldView {
    let (options, table) = match &field.payload {
        FieldPayload::Options(options) => (Some(options.join(", ")), None),
        FieldPayload::Table(data) => {
            let columns: Vec<ColumnView> = data
                .columns
                .iter()
                .map(|c| ColumnView {
                    label: c.label.clone(),
                    column_type: c.column_type,
                    access: c.access,
                })
                .collect();
            let rows = data
                .rows
                .iter()
                .map(|row| RowView {
                    cells: columns
                        .iter()
                        .enumerate()
                        .map(|(pos, col)| (pos, render_cell(row.get(pos), col.column_type)))
                        .collect(),
                })
                .collect();
            (None, Some(TableView { columns, rows }))
        }
        FieldPayload::None => (None, None),
    };

    FieldView {
        label: field.label.clone(),
        required: field.required,
        options,
        table,
    }
}

fn extract_cell(input: &CellInput, column: &Column, prior: Option<&CellValue>) -> Option<CellValue> {
    match input {
        CellInput::Checkbox(true) => Some(CellValue::Bool(true)),
        CellInput::Checkbox(false) => None,
        CellInput::Text(s) if s.is_empty() => None,
        CellInput::Text(s) if prior.is_some_and(|p| p.display() == *s) => prior.cloned(),
        CellInput::Text(s) => {
            let keep_numeric = column.column_type == ColumnType::Number
                && matches!(prior, Some(CellValue::Number(_)));
            match s.trim().parse::<f64>() {
                Ok(n) if keep_numeric => Some(CellValue::Number(n)),
                _ => Some(CellValue::Text(s.clone())),
            }
        }
    }
}

/// Produce an updated field from its editor inputs
pub fn extract_field(view: &FieldView, prior: &Field) -> Field {
    let mut field = prior.clone();
    field.label = view.label.clone();
    field.required = view.required;

    match &mut field.payload {
        FieldPayload::Options(options) => {
            if let Some(raw) = &view.options {
                *options = parse_options(raw);
            }
        }
        FieldPayload::Table(data) => {
            if let Some(table) = &view.table {
                let columns: Vec<Column> = table
                    .columns
                    .iter()
                    .map(|c| Column {
                        label: c.label.clone(),
                        column_type: c.column_type,
                        access: c.access,
                    })
                    .collect();
                let rows = table
                    .rows
                    .iter()
                    .enumerate()
                    .map(|(r, row_view)| {
                        let prior_row = data.rows.get(r);
                        let cells = row_view
                            .cells
                            .iter()
                            .filter_map(|(&pos, input)| {
                                let column = columns.get(pos)?;
                                let prior_cell = prior_row.and_then(|row| row.get(pos));
                                extract_cell(input, column, prior_cell).map(|v| (pos, v))
                            })
                            .collect();
                        Row { cells }
                    })
                    .collect();
                data.columns = columns;
                data.rows = rows;
            }
        }
        FieldPayload::None => {}
    }

    field
}

impl EditorView {
    /// Full render of a document
    pub fn render(document: &FormDocument) -> Self {
        Self {
            title: document.title.clone(),
            fields: document.fields.iter().map(render_field).collect(),
        }
    }

    /// Reconcile the on-screen inputs into `document`.
    /// Fields without a matching view are left as they are.
    pub fn commit_into(&self, document: &mut FormDocument) {
        document.title = self.title.clone();
        for (field, view) in document.fields.iter_mut().zip(&self.fields) {
            *field = extract_field(view, field);
        }
    }

    /// Every input in tab order
    pub fn slots(&self) -> Vec<EditorSlot> {
        let mut slots = vec![EditorSlot::Title];
        for (f, field) in self.fields.iter().enumerate() {
            slots.push(EditorSlot::FieldLabel(f));
            slots.push(EditorSlot::FieldRequired(f));
            if field.options.is_some() {
                slots.push(EditorSlot::FieldOptions(f));
            }
            if let Some(table) = &field.table {
                for column in 0..table.columns.len() {
                    slots.push(EditorSlot::ColumnLabel { field: f, column });
                    slots.push(EditorSlot::ColumnType { field: f, column });
                    slots.push(EditorSlot::ColumnAccess { field: f, column });
                }
                for row in 0..table.rows.len() {
                    for column in 0..table.columns.len() {
                        slots.push(EditorSlot::Cell { field: f, row, column });
                    }
                }
            }
        }
        slots.push(EditorSlot::AddField);
        slots
    }

    fn text_mut(&mut self, slot: EditorSlot) -> Option<&mut String> {
        match slot {
            EditorSlot::Title => Some(&mut self.title),
            EditorSlot::FieldLabel(f) => self.fields.get_mut(f).map(|v| &mut v.label),
            EditorSlot::FieldOptions(f) => self.fields.get_mut(f)?.options.as_mut(),
            EditorSlot::ColumnLabel { field, column } => self
                .table_mut(field)?
                .columns
                .get_mut(column)
                .map(|c| &mut c.label),
            EditorSlot::Cell { field, row, column } => {
                let table = self.table_mut(field)?;
                let column_type = table.columns.get(column)?.column_type;
                let cell = table
                    .rows
                    .get_mut(row)?
                    .cells
                    .entry(column)
                    .or_insert_with(|| CellInput::empty_for(column_type));
                match cell {
                    CellInput::Text(s) => Some(s),
                    CellInput::Checkbox(_) => None,
                }
            }
            _ => None,
        }
    }

    fn table_mut(&mut self, field: usize) -> Option<&mut TableView> {
        self.fields.get_mut(field)?.table.as_mut()
    }

    /// Current text of a text slot
    #[cfg(test)]
    pub fn text(&self, slot: EditorSlot) -> Option<&str> {
        match slot {
            EditorSlot::Title => Some(&self.title),
            EditorSlot::FieldLabel(f) => self.fields.get(f).map(|v| v.label.as_str()),
            EditorSlot::FieldOptions(f) => self.fields.get(f)?.options.as_deref(),
            EditorSlot::ColumnLabel { field, column } => self
                .fields
                .get(field)?
                .table
                .as_ref()?
                .columns
                .get(column)
                .map(|c| c.label.as_str()),
            EditorSlot::Cell { field, row, column } => {
                match self.fields.get(field)?.table.as_ref()?.rows.get(row)?.cells.get(&column) {
                    Some(CellInput::Text(s)) => Some(s),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn input_char(&mut self, slot: EditorSlot, c: char) {
        if let Some(text) = self.text_mut(slot) {
            text.push(c);
        }
    }

    pub fn backspace(&mut self, slot: EditorSlot) {
        if let Some(text) = self.text_mut(slot) {
            text.pop();
        }
    }

    /// Whether the slot is toggled rather than typed into
    pub fn is_checkbox(&self, slot: EditorSlot) -> bool {
        match slot {
            EditorSlot::FieldRequired(_) => true,
            EditorSlot::Cell { field, column, .. } => self
                .fields
                .get(field)
                .and_then(|f| f.table.as_ref())
                .and_then(|t| t.columns.get(column))
                .is_some_and(|c| c.column_type == ColumnType::Checkbox),
            _ => false,
        }
    }

    /// Toggle a checkbox-like slot or advance a select; returns whether anything changed
    pub fn activate(&mut self, slot: EditorSlot) -> bool {
        match slot {
            EditorSlot::FieldRequired(f) => match self.fields.get_mut(f) {
                Some(view) => {
                    view.required = !view.required;
                    true
                }
                None => false,
            },
            EditorSlot::ColumnType { .. } | EditorSlot::ColumnAccess { .. } => self.cycle(slot, true),
            EditorSlot::Cell { field, row, column } => {
                let Some(table) = self.table_mut(field) else {
                    return false;
                };
                let is_checkbox = table
                    .columns
                    .get(column)
                    .is_some_and(|c| c.column_type == ColumnType::Checkbox);
                match table.rows.get_mut(row) {
                    Some(row_view) if is_checkbox => {
                        let cell = row_view
                            .cells
                            .entry(column)
                            .or_insert(CellInput::Checkbox(false));
                        let toggled = match &*cell {
                            CellInput::Checkbox(checked) => !*checked,
                            CellInput::Text(s) => !s.trim().eq_ignore_ascii_case("true"),
                        };
                        *cell = CellInput::Checkbox(toggled);
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Step a select slot (column type or access) forward or backward
    pub fn cycle(&mut self, slot: EditorSlot, forward: bool) -> bool {
        match slot {
            EditorSlot::ColumnType { field, column } => {
                match self.table_mut(field).and_then(|t| t.columns.get_mut(column)) {
                    Some(col) => {
                        col.column_type = if forward {
                            col.column_type.next()
                        } else {
                            col.column_type.prev()
                        };
                        true
                    }
                    None => false,
                }
            }
            EditorSlot::ColumnAccess { field, column } => {
                match self.table_mut(field).and_then(|t| t.columns.get_mut(column)) {
                    Some(col) => {
                        col.access = col.access.toggle();
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::catalog::FieldKind;
    use crate::state::forms::model::TableData;
    use pretty_assertions::assert_eq;

    fn table_field(columns: Vec<Column>, rows: Vec<Row>) -> Field {
        let mut field = Field::new(FieldKind::DynamicTable);
        field.payload = FieldPayload::Table(TableData { columns, rows });
        field
    }

    fn column(label: &str, column_type: ColumnType) -> Column {
        Column {
            label: label.to_string(),
            column_type,
            access: ColumnAccess::Client,
        }
    }

    #[test]
    fn test_parse_options_trims_and_drops_blanks() {
        assert_eq!(parse_options("A, B ,, C"), vec!["A", "B", "C"]);
        assert!(parse_options(" , ,").is_empty());
    }

    #[test]
    fn test_dropdown_extraction_splits_options() {
        let field = Field::new(FieldKind::Dropdown);
        let mut view = render_field(&field);
        view.label = "Favorite color".to_string();
        view.options = Some("Red,Green".to_string());
        let updated = extract_field(&view, &field);
        assert_eq!(updated.label, "Favorite color");
        assert_eq!(updated.options(), Some(&["Red".to_string(), "Green".to_string()][..]));
    }

    #[test]
    fn test_missing_options_editor_means_no_change() {
        let mut field = Field::new(FieldKind::Dropdown);
        field.payload = FieldPayload::Options(vec!["Keep".to_string()]);
        let mut view = render_field(&field);
        view.options = None;
        let updated = extract_field(&view, &field);
        assert_eq!(updated.options(), Some(&["Keep".to_string()][..]));
    }

    #[test]
    fn test_missing_table_editor_means_no_change() {
        let field = table_field(vec![column("A", ColumnType::Text)], vec![Row::default()]);
        let mut view = render_field(&field);
        view.table = None;
        assert_eq!(extract_field(&view, &field), field);
    }

    #[test]
    fn test_table_round_trip_preserves_positions() {
        let mut row = Row::default();
        row.set(0, CellValue::Text("5".to_string()));
        row.set(1, CellValue::Bool(true));
        let field = table_field(
            vec![column("Qty", ColumnType::Number), column("Done", ColumnType::Checkbox)],
            vec![row.clone()],
        );

        let view = render_field(&field);
        let extracted = extract_field(&view, &field);
        assert_eq!(extracted.table().unwrap().rows, vec![row]);
        assert_eq!(render_field(&extracted), view);
    }

    #[test]
    fn test_numeric_cells_stay_numeric() {
        let mut row = Row::default();
        row.set(0, CellValue::Number(3.0));
        let field = table_field(vec![column("Qty", ColumnType::Number)], vec![row]);
        let mut view = render_field(&field);
        view.table.as_mut().unwrap().rows[0]
            .cells
            .insert(0, CellInput::Text("4".to_string()));
        let extracted = extract_field(&view, &field);
        assert_eq!(
            extracted.table().unwrap().rows[0].get(0),
            Some(&CellValue::Number(4.0))
        );
    }

    #[test]
    fn test_orphaned_cells_are_ignored() {
        let field = table_field(
            vec![column("A", ColumnType::Text), column("B", ColumnType::Text)],
            vec![Row::default()],
        );
        let mut view = render_field(&field);
        let table = view.table.as_mut().unwrap();
        table.rows[0].cells.insert(1, CellInput::Text("b".to_string()));
        table.rows[0].cells.insert(7, CellInput::Text("stale".to_string()));
        table.columns.pop();

        let extracted = extract_field(&view, &field);
        let data = extracted.table().unwrap();
        assert_eq!(data.columns.len(), 1);
        assert!(data.rows[0].cells.is_empty());
    }

    #[test]
    fn test_empty_cells_are_stored_absent() {
        let field = table_field(
            vec![column("A", ColumnType::Text), column("B", ColumnType::Checkbox)],
            vec![Row::default()],
        );
        let view = render_field(&field);
        let extracted = extract_field(&view, &field);
        assert!(extracted.table().unwrap().rows[0].cells.is_empty());
    }

    #[test]
    fn test_text_cells_survive_switch_to_checkbox() {
        let mut row = Row::default();
        row.set(0, CellValue::Text("Breakfast".to_string()));
        row.set(1, CellValue::Number(2.0));
        let text_field = table_field(
            vec![column("Meal", ColumnType::Text), column("Qty", ColumnType::Number)],
            vec![row.clone()],
        );

        let mut switched = text_field.clone();
        for col in &mut switched.table_mut().unwrap().columns {
            col.column_type = ColumnType::Checkbox;
        }
        let view = render_field(&switched);
        let cells = &view.table.as_ref().unwrap().rows[0].cells;
        assert_eq!(cells.get(&0), Some(&CellInput::Text("Breakfast".to_string())));
        assert_eq!(cells.get(&1), Some(&CellInput::Text("2".to_string())));

        let extracted = extract_field(&view, &switched);
        assert_eq!(extracted.table().unwrap().rows, vec![row]);
    }

    #[test]
    fn test_checkbox_cells_survive_switch_to_text() {
        let mut row = Row::default();
        row.set(0, CellValue::Bool(true));
        let field = table_field(vec![column("Done", ColumnType::Text)], vec![row.clone()]);

        let view = render_field(&field);
        assert_eq!(
            view.table.as_ref().unwrap().rows[0].cells.get(&0),
            Some(&CellInput::Text("true".to_string()))
        );
        let extracted = extract_field(&view, &field);
        assert_eq!(extracted.table().unwrap().rows, vec![row]);
    }

    #[test]
    fn test_boolean_text_renders_as_checkbox() {
        let mut row = Row::default();
        row.set(0, CellValue::Text("TRUE".to_string()));
        row.set(1, CellValue::Text("false".to_string()));
        let field = table_field(
            vec![column("A", ColumnType::Checkbox), column("B", ColumnType::Checkbox)],
            vec![row],
        );
        let view = render_field(&field);
        let cells = &view.table.as_ref().unwrap().rows[0].cells;
        assert_eq!(cells.get(&0), Some(&CellInput::Checkbox(true)));
        assert_eq!(cells.get(&1), Some(&CellInput::Checkbox(false)));
    }

    #[test]
    fn test_toggling_a_text_cell_makes_it_a_checkbox() {
        let mut row = Row::default();
        row.set(0, CellValue::Text("Breakfast".to_string()));
        let field = table_field(vec![column("Done", ColumnType::Checkbox)], vec![row]);
        let mut view = EditorView {
            title: String::new(),
            fields: vec![render_field(&field)],
        };
        let cell = EditorSlot::Cell { field: 0, row: 0, column: 0 };
        assert!(view.is_checkbox(cell));
        assert!(view.activate(cell));
        assert_eq!(
            view.fields[0].table.as_ref().unwrap().rows[0].cells.get(&0),
            Some(&CellInput::Checkbox(true))
        );
    }

    #[test]
    fn test_is_checkbox_slots() {
        let field = table_field(
            vec![column("A", ColumnType::Text), column("B", ColumnType::Checkbox)],
            vec![Row::default()],
        );
        let view = EditorView {
            title: String::new(),
            fields: vec![render_field(&field)],
        };
        assert!(view.is_checkbox(EditorSlot::FieldRequired(0)));
        assert!(!view.is_checkbox(EditorSlot::Cell { field: 0, row: 0, column: 0 }));
        assert!(view.is_checkbox(EditorSlot::Cell { field: 0, row: 0, column: 1 }));
        assert!(!view.is_checkbox(EditorSlot::Title));
    }

    #[test]
    fn test_slots_cover_table_inputs() {
        let field = table_field(
            vec![column("A", ColumnType::Text), column("B", ColumnType::Text)],
            vec![Row::default()],
        );
        let view = EditorView {
            title: String::new(),
            fields: vec![render_field(&field)],
        };
        let slots = view.slots();
        // title, label, required, 2 columns x 3, 1 row x 2 cells, add-field palette
        assert_eq!(slots.len(), 1 + 2 + 6 + 2 + 1);
        assert_eq!(slots.first(), Some(&EditorSlot::Title));
        assert_eq!(slots.last(), Some(&EditorSlot::AddField));
        assert!(slots.contains(&EditorSlot::Cell { field: 0, row: 0, column: 1 }));
    }

    #[test]
    fn test_typing_into_an_absent_cell_creates_it() {
        let field = table_field(vec![column("A", ColumnType::Text)], vec![Row::default()]);
        let mut view = EditorView {
            title: String::new(),
            fields: vec![render_field(&field)],
        };
        view.fields[0].table.as_mut().unwrap().rows[0].cells.clear();
        let slot = EditorSlot::Cell { field: 0, row: 0, column: 0 };
        view.input_char(slot, 'h');
        view.input_char(slot, 'i');
        view.backspace(slot);
        assert_eq!(view.text(slot), Some("h"));
    }

    #[test]
    fn test_activate_toggles_required_and_checkbox_cells() {
        let field = table_field(vec![column("Done", ColumnType::Checkbox)], vec![Row::default()]);
        let mut view = EditorView {
            title: String::new(),
            fields: vec![render_field(&field)],
        };
        assert!(view.activate(EditorSlot::FieldRequired(0)));
        assert!(view.fields[0].required);

        let cell = EditorSlot::Cell { field: 0, row: 0, column: 0 };
        assert!(view.activate(cell));
        assert_eq!(
            view.fields[0].table.as_ref().unwrap().rows[0].cells.get(&0),
            Some(&CellInput::Checkbox(true))
        );
        assert!(!view.activate(EditorSlot::Title));
    }

    #[test]
    fn test_cycle_column_settings() {
        let field = table_field(vec![column("A", ColumnType::Text)], vec![]);
        let mut view = EditorView {
            title: String::new(),
            fields: vec![render_field(&field)],
        };
        view.cycle(EditorSlot::ColumnType { field: 0, column: 0 }, true);
        view.cycle(EditorSlot::ColumnAccess { field: 0, column: 0 }, true);
        let col = &view.fields[0].table.as_ref().unwrap().columns[0];
        assert_eq!(col.column_type, ColumnType::Number);
        assert_eq!(col.access, ColumnAccess::Admin);
    }

    #[test]
    fn test_text_slots_ignore_toggle_slots() {
        let mut view = EditorView::default();
        view.input_char(EditorSlot::AddField, 'x');
        view.input_char(EditorSlot::Title, 'T');
        assert_eq!(view.title, "T");
        assert!(EditorSlot::Title.accepts_text());
        assert!(!EditorSlot::FieldRequired(0).accepts_text());
    }
}

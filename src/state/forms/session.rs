//! Edit session: one in-progress create or edit of a single form

use super::catalog::FieldKind;
use super::editor::EditorView;
use super::model::{Field, FormData, FormDocument};
use crate::api::FormRecord;

/// Direction for reordering a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    fn target(self, index: usize, len: usize) -> Option<usize> {
        match self {
            Self::Up => index.checked_sub(1),
            Self::Down => Some(index + 1).filter(|&i| i < len),
        }
    }
}

/// The form being edited together with its on-screen editor state.
///
/// All structural operations reconcile the editor into the document first,
/// mutate the document, then re-render the whole editor.
#[derive(Debug, Clone)]
pub struct EditSession {
    /// Id of the persisted form being replaced; `None` when creating
    form_id: Option<String>,
    document: FormDocument,
    /// Document as it was when the session opened
    baseline: FormDocument,
    view: EditorView,
}

impl EditSession {
    /// Start an empty form
    pub fn start_new() -> Self {
        Self::from_document(None, FormDocument::default())
    }

    /// Start editing a copy of a persisted form
    pub fn start_editing(record: &FormRecord) -> Self {
        let document = FormDocument {
            title: record.title.clone(),
            fields: record.data.fields.clone(),
        };
        Self::from_document(Some(record.id.clone()), document)
    }

    fn from_document(form_id: Option<String>, document: FormDocument) -> Self {
        let view = EditorView::render(&document);
        Self {
            form_id,
            baseline: document.clone(),
            document,
            view,
        }
    }

    pub fn form_id(&self) -> Option<&str> {
        self.form_id.as_deref()
    }

    pub fn is_new(&self) -> bool {
        self.form_id.is_none()
    }

    /// The model as of the last reconciliation
    pub fn document(&self) -> &FormDocument {
        &self.document
    }

    pub fn view(&self) -> &EditorView {
        &self.view
    }

    /// Live editor inputs, written by key handlers between structural edits
    pub fn view_mut(&mut self) -> &mut EditorView {
        &mut self.view
    }

    pub fn field_count(&self) -> usize {
        self.document.fields.len()
    }

    /// Reconcile the editor's current inputs back into the document
    pub fn commit_editor_state(&mut self) {
        self.view.commit_into(&mut self.document);
    }

    fn rerender(&mut self) {
        self.view = EditorView::render(&self.document);
    }

    /// Commit pending input and re-render, e.g. after a column type change
    pub fn refresh(&mut self) {
        self.commit_editor_state();
        self.rerender();
    }

    /// Append a field of `kind`; returns its index
    pub fn add_field(&mut self, kind: FieldKind) -> usize {
        self.commit_editor_state();
        self.document.fields.push(Field::new(kind));
        self.rerender();
        self.document.fields.len() - 1
    }

    pub fn remove_field(&mut self, index: usize) {
        self.commit_editor_state();
        if index < self.document.fields.len() {
            self.document.fields.remove(index);
        }
        self.rerender();
    }

    /// Swap a field with its neighbour; returns the field's new index, or
    /// `None` when the move would leave the list
    pub fn move_field(&mut self, index: usize, direction: MoveDirection) -> Option<usize> {
        let len = self.document.fields.len();
        if index >= len {
            return None;
        }
        let target = direction.target(index, len)?;
        self.commit_editor_state();
        self.document.fields.swap(index, target);
        self.rerender();
        Some(target)
    }

    pub fn add_column(&mut self, field: usize) {
        self.commit_editor_state();
        if let Some(table) = self.document.table_mut(field) {
            table.add_column();
        }
        self.rerender();
    }

    pub fn remove_column(&mut self, field: usize, column: usize) {
        self.commit_editor_state();
        if let Some(table) = self.document.table_mut(field) {
            table.remove_column(column);
        }
        self.rerender();
    }

    pub fn add_row(&mut self, field: usize) {
        self.commit_editor_state();
        if let Some(table) = self.document.table_mut(field) {
            table.add_row();
        }
        self.rerender();
    }

    pub fn remove_row(&mut self, field: usize, row: usize) {
        self.commit_editor_state();
        if let Some(table) = self.document.table_mut(field) {
            table.remove_row(row);
        }
        self.rerender();
    }

    /// Whether the editor holds changes not present when the session opened
    pub fn is_dirty(&self) -> bool {
        let mut current = self.document.clone();
        self.view.commit_into(&mut current);
        current != self.baseline
    }

    /// Commit and return the title and `data` payload to persist
    pub fn payload(&mut self) -> (String, FormData) {
        self.commit_editor_state();
        (self.document.title.clone(), self.document.to_data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::editor::{CellInput, EditorSlot};
    use crate::state::forms::model::{CellValue, ColumnType};
    use pretty_assertions::assert_eq;

    fn type_into(session: &mut EditSession, slot: EditorSlot, text: &str) {
        for c in text.chars() {
            session.view_mut().input_char(slot, c);
        }
    }

    fn labels(session: &EditSession) -> Vec<String> {
        session
            .document()
            .fields
            .iter()
            .map(|f| f.label.clone())
            .collect()
    }

    #[test]
    fn test_start_new_is_empty() {
        let session = EditSession::start_new();
        assert!(session.is_new());
        assert_eq!(session.field_count(), 0);
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_add_then_remove_restores_fields() {
        let mut session = EditSession::start_new();
        session.add_field(FieldKind::Text);
        let before = session.document().fields.clone();

        for kind in FieldKind::ALL {
            let index = session.add_field(kind);
            session.remove_field(index);
            assert_eq!(session.document().fields, before);
        }
    }

    #[test]
    fn test_move_field_is_noop_at_boundaries() {
        let mut session = EditSession::start_new();
        for label in ["a", "b", "c"] {
            let i = session.add_field(FieldKind::Text);
            type_into(&mut session, EditorSlot::FieldLabel(i), label);
        }
        session.commit_editor_state();

        assert_eq!(session.move_field(0, MoveDirection::Up), None);
        assert_eq!(session.move_field(2, MoveDirection::Down), None);
        assert_eq!(session.move_field(9, MoveDirection::Down), None);
        assert_eq!(labels(&session), vec!["a", "b", "c"]);

        assert_eq!(session.move_field(0, MoveDirection::Down), Some(1));
        assert_eq!(labels(&session), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_structural_edits_keep_typed_input() {
        let mut session = EditSession::start_new();
        let table = session.add_field(FieldKind::DynamicTable);
        type_into(&mut session, EditorSlot::FieldLabel(table), "Meals");
        type_into(&mut session, EditorSlot::Title, "Weekly");

        session.add_column(table);

        assert_eq!(session.document().title, "Weekly");
        assert_eq!(session.document().fields[0].label, "Meals");
        assert_eq!(session.view().fields[0].label, "Meals");
        let columns = &session.document().fields[0].table().unwrap().columns;
        assert_eq!(columns[0].label, "New Column");
        assert_eq!(columns[0].column_type, ColumnType::Text);
    }

    #[test]
    fn test_table_cells_survive_row_edits() {
        let mut session = EditSession::start_new();
        let f = session.add_field(FieldKind::DynamicTable);
        session.add_column(f);
        session.add_column(f);
        session.add_row(f);
        session.add_row(f);

        type_into(&mut session, EditorSlot::Cell { field: f, row: 1, column: 1 }, "x");
        session.remove_row(f, 0);

        let rows = &session.document().fields[f].table().unwrap().rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(1), Some(&CellValue::Text("x".to_string())));
    }

    #[test]
    fn test_remove_column_renumbers_rows() {
        let mut session = EditSession::start_new();
        let f = session.add_field(FieldKind::DynamicTable);
        session.add_column(f);
        session.add_column(f);
        session.add_row(f);
        type_into(&mut session, EditorSlot::Cell { field: f, row: 0, column: 0 }, "a");
        type_into(&mut session, EditorSlot::Cell { field: f, row: 0, column: 1 }, "b");

        session.remove_column(f, 0);

        let table = session.document().fields[f].table().unwrap();
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.rows[0].get(0), Some(&CellValue::Text("b".to_string())));
        assert_eq!(
            session.view().fields[f].table.as_ref().unwrap().rows[0].cells.get(&0),
            Some(&CellInput::Text("b".to_string()))
        );
    }

    #[test]
    fn test_column_type_cycle_keeps_cells() {
        let mut session = EditSession::start_new();
        let f = session.add_field(FieldKind::DynamicTable);
        session.add_column(f);
        session.add_row(f);
        type_into(&mut session, EditorSlot::Cell { field: f, row: 0, column: 0 }, "Breakfast");

        let type_slot = EditorSlot::ColumnType { field: f, column: 0 };
        for expected in [
            ColumnType::Number,
            ColumnType::Checkbox,
            ColumnType::Dropdown,
            ColumnType::Text,
        ] {
            assert!(session.view_mut().cycle(type_slot, true));
            session.refresh();
            let table = session.document().fields[f].table().unwrap();
            assert_eq!(table.columns[0].column_type, expected);
            assert_eq!(
                table.rows[0].get(0),
                Some(&CellValue::Text("Breakfast".to_string()))
            );
        }
    }

    #[test]
    fn test_checked_cell_survives_round_trip_through_text() {
        let mut session = EditSession::start_new();
        let f = session.add_field(FieldKind::DynamicTable);
        session.add_column(f);
        session.add_row(f);

        let type_slot = EditorSlot::ColumnType { field: f, column: 0 };
        session.view_mut().cycle(type_slot, true);
        session.view_mut().cycle(type_slot, true);
        session.refresh();
        assert!(session
            .view_mut()
            .activate(EditorSlot::Cell { field: f, row: 0, column: 0 }));

        session.view_mut().cycle(type_slot, false);
        session.refresh();
        assert_eq!(
            session.view().fields[f].table.as_ref().unwrap().rows[0].cells.get(&0),
            Some(&CellInput::Text("true".to_string()))
        );

        session.view_mut().cycle(type_slot, true);
        session.refresh();
        let table = session.document().fields[f].table().unwrap();
        assert_eq!(table.columns[0].column_type, ColumnType::Checkbox);
        assert_eq!(table.rows[0].get(0), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn test_table_ops_on_non_table_field_are_ignored() {
        let mut session = EditSession::start_new();
        let f = session.add_field(FieldKind::Text);
        session.add_column(f);
        session.add_row(f);
        session.remove_column(f, 0);
        assert!(session.document().fields[f].table().is_none());
    }

    #[test]
    fn test_start_editing_copies_record() {
        let mut record = FormRecord::fixture("form-1", "Intake");
        record.data.fields.push(Field::new(FieldKind::Checkbox));
        let mut session = EditSession::start_editing(&record);

        assert_eq!(session.form_id(), Some("form-1"));
        type_into(&mut session, EditorSlot::FieldLabel(0), "Agree?");
        session.commit_editor_state();

        assert_eq!(record.data.fields[0].label, "");
        assert_eq!(session.document().fields[0].label, "Agree?");
        assert!(session.is_dirty());
    }

    #[test]
    fn test_dirty_tracks_uncommitted_input() {
        let mut session = EditSession::start_new();
        type_into(&mut session, EditorSlot::Title, "T");
        assert!(session.is_dirty());
        session.view_mut().backspace(EditorSlot::Title);
        assert!(!session.is_dirty());
    }
}

//! Form document model: the questionnaire being built and its persisted shape

use super::catalog::FieldKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Key prefix for row cells in the persisted representation (`col_0`, `col_1`, ...)
const CELL_KEY_PREFIX: &str = "col_";

/// Cell type of a dynamic-table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Checkbox,
    Dropdown,
}

impl ColumnType {
    pub fn next(&self) -> Self {
        match self {
            Self::Text => Self::Number,
            Self::Number => Self::Checkbox,
            Self::Checkbox => Self::Dropdown,
            Self::Dropdown => Self::Text,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Text => Self::Dropdown,
            Self::Number => Self::Text,
            Self::Checkbox => Self::Number,
            Self::Dropdown => Self::Checkbox,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Checkbox => "Checkbox",
            Self::Dropdown => "Dropdown",
        }
    }
}

/// Who may edit a column's cells when the form is filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnAccess {
    Admin,
    #[default]
    Client,
}

impl ColumnAccess {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Admin => Self::Client,
            Self::Client => Self::Admin,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin Only",
            Self::Client => "Client Editable",
        }
    }
}

/// A column of a dynamic table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    #[serde(default)]
    pub access: ColumnAccess,
}

impl Column {
    /// Column appended by "Add Column"
    pub fn new_default() -> Self {
        Self {
            label: "New Column".to_string(),
            column_type: ColumnType::Text,
            access: ColumnAccess::Client,
        }
    }
}

/// A scalar cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Text shown in an input box for this value
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            Self::Number(n) => n.to_string(),
        }
    }

    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(b)),
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s)),
            _ => None,
        }
    }
}

/// One pre-filled table row: a sparse map from column position to value.
/// Absent positions are empty cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Value>",
    into = "BTreeMap<String, CellValue>"
)]
pub struct Row {
    pub cells: BTreeMap<usize, CellValue>,
}

impl Row {
    pub fn get(&self, column: usize) -> Option<&CellValue> {
        self.cells.get(&column)
    }

    pub fn set(&mut self, column: usize, value: CellValue) {
        self.cells.insert(column, value);
    }

    /// Drop the cell at `column` and shift the cells to its right one position left
    pub fn remove_column(&mut self, column: usize) {
        self.cells = std::mem::take(&mut self.cells)
            .into_iter()
            .filter(|(pos, _)| *pos != column)
            .map(|(pos, value)| if pos > column { (pos - 1, value) } else { (pos, value) })
            .collect();
    }
}

impl From<BTreeMap<String, Value>> for Row {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let cells = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let pos = key.strip_prefix(CELL_KEY_PREFIX)?.parse::<usize>().ok()?;
                Some((pos, CellValue::from_json(value)?))
            })
            .collect();
        Self { cells }
    }
}

impl From<Row> for BTreeMap<String, CellValue> {
    fn from(row: Row) -> Self {
        row.cells
            .into_iter()
            .map(|(pos, value)| (format!("{CELL_KEY_PREFIX}{pos}"), value))
            .collect()
    }
}

/// Column and row configuration of a dynamic-table field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableData {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl TableData {
    pub fn add_column(&mut self) {
        self.columns.push(Column::new_default());
    }

    /// Remove a column and renumber every row so cells stay under their column
    pub fn remove_column(&mut self, column: usize) {
        if column >= self.columns.len() {
            return;
        }
        self.columns.remove(column);
        for row in &mut self.rows {
            row.remove_column(column);
        }
    }

    pub fn add_row(&mut self) {
        self.rows.push(Row::default());
    }

    pub fn remove_row(&mut self, row: usize) {
        if row < self.rows.len() {
            self.rows.remove(row);
        }
    }
}

/// Kind-specific data carried by a field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldPayload {
    #[default]
    None,
    Options(Vec<String>),
    Table(TableData),
}

impl FieldPayload {
    /// Empty payload appropriate for a freshly added field of `kind`
    pub fn empty_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Dropdown => Self::Options(Vec::new()),
            FieldKind::DynamicTable => Self::Table(TableData::default()),
            _ => Self::None,
        }
    }
}

/// One question on a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FieldRecord", into = "FieldRecord")]
pub struct Field {
    pub id: String,
    pub kind: FieldKind,
    pub label: String,
    pub required: bool,
    pub payload: FieldPayload,
}

impl Field {
    /// Create an unlabeled, optional field with a fresh id
    pub fn new(kind: FieldKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            label: String::new(),
            required: false,
            payload: FieldPayload::empty_for(kind),
        }
    }

    #[cfg(test)]
    pub fn options(&self) -> Option<&[String]> {
        match &self.payload {
            FieldPayload::Options(options) => Some(options),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&TableData> {
        match &self.payload {
            FieldPayload::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn table_mut(&mut self) -> Option<&mut TableData> {
        match &mut self.payload {
            FieldPayload::Table(table) => Some(table),
            _ => None,
        }
    }
}

/// Persisted shape of a field; payload keys appear only for kinds that use them
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FieldRecord {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    kind: FieldKind,
    #[serde(default)]
    label: String,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    columns: Option<Vec<Column>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rows: Option<Vec<Row>>,
}

impl From<FieldRecord> for Field {
    fn from(record: FieldRecord) -> Self {
        let payload = match record.kind {
            FieldKind::Dropdown => FieldPayload::Options(record.options.unwrap_or_default()),
            FieldKind::DynamicTable => FieldPayload::Table(TableData {
                columns: record.columns.unwrap_or_default(),
                rows: record.rows.unwrap_or_default(),
            }),
            _ => FieldPayload::None,
        };
        let id = if record.id.is_empty() {
            Uuid::new_v4().to_string()
        } else {
            record.id
        };
        Self {
            id,
            kind: record.kind,
            label: record.label,
            required: record.required,
            payload,
        }
    }
}

impl From<Field> for FieldRecord {
    fn from(field: Field) -> Self {
        let (options, columns, rows) = match field.payload {
            FieldPayload::None => (None, None, None),
            FieldPayload::Options(options) => (Some(options), None, None),
            FieldPayload::Table(table) => (None, Some(table.columns), Some(table.rows)),
        };
        Self {
            id: field.id,
            kind: field.kind,
            label: field.label,
            required: field.required,
            options,
            columns,
            rows,
        }
    }
}

/// The `data` object stored with a form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormData {
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A form under construction: its title and ordered fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormDocument {
    pub title: String,
    pub fields: Vec<Field>,
}

impl FormDocument {
    pub fn table_mut(&mut self, field: usize) -> Option<&mut TableData> {
        self.fields.get_mut(field).and_then(Field::table_mut)
    }

    pub fn to_data(&self) -> FormData {
        FormData {
            fields: self.fields.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_new_field_has_kind_payload() {
        assert_eq!(
            Field::new(FieldKind::Dropdown).payload,
            FieldPayload::Options(vec![])
        );
        assert_eq!(
            Field::new(FieldKind::DynamicTable).payload,
            FieldPayload::Table(TableData::default())
        );
        assert_eq!(Field::new(FieldKind::Date).payload, FieldPayload::None);
    }

    #[test]
    fn test_new_fields_get_distinct_ids() {
        let a = Field::new(FieldKind::Text);
        let b = Field::new(FieldKind::Text);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_text_field_omits_payload_keys() {
        let mut field = Field::new(FieldKind::Text);
        field.id = "f1".to_string();
        field.label = "Name".to_string();
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(
            value,
            json!({"id": "f1", "type": "text", "label": "Name", "required": false})
        );
    }

    #[test]
    fn test_dynamic_table_serializes_rows_by_position() {
        let mut row = Row::default();
        row.set(0, CellValue::Text("5".to_string()));
        row.set(1, CellValue::Bool(true));
        let field = Field {
            id: "t1".to_string(),
            kind: FieldKind::DynamicTable,
            label: "Meals".to_string(),
            required: true,
            payload: FieldPayload::Table(TableData {
                columns: vec![Column::new_default()],
                rows: vec![row],
            }),
        };
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "t1",
                "type": "dynamic_table",
                "label": "Meals",
                "required": true,
                "columns": [{"label": "New Column", "type": "text", "access": "client"}],
                "rows": [{"col_0": "5", "col_1": true}]
            })
        );
    }

    #[test]
    fn test_deserialize_tolerates_missing_and_foreign_keys() {
        let value = json!({
            "type": "dynamic_table",
            "columns": [{"label": "Qty", "type": "number"}],
            "rows": [{"col_0": 3, "note": "x", "col_bad": 1, "col_2": null}]
        });
        let field: Field = serde_json::from_value(value).unwrap();
        assert!(!field.id.is_empty());
        assert_eq!(field.label, "");
        assert!(!field.required);
        let table = field.table().unwrap();
        assert_eq!(table.columns[0].access, ColumnAccess::Client);
        assert_eq!(table.rows[0].cells.len(), 1);
        assert_eq!(table.rows[0].get(0), Some(&CellValue::Number(3.0)));
    }

    #[test]
    fn test_options_ignored_for_non_dropdown_kinds() {
        let value = json!({"id": "a", "type": "text", "options": ["x"]});
        let field: Field = serde_json::from_value(value).unwrap();
        assert_eq!(field.payload, FieldPayload::None);
    }

    #[test]
    fn test_remove_column_shifts_cells_left() {
        let mut table = TableData::default();
        table.add_column();
        table.add_column();
        table.add_column();
        let mut row = Row::default();
        row.set(0, CellValue::Text("a".into()));
        row.set(1, CellValue::Text("b".into()));
        row.set(2, CellValue::Text("c".into()));
        table.rows.push(row);

        table.remove_column(1);

        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.rows[0].get(0), Some(&CellValue::Text("a".into())));
        assert_eq!(table.rows[0].get(1), Some(&CellValue::Text("c".into())));
        assert_eq!(table.rows[0].get(2), None);
    }

    #[test]
    fn test_remove_column_out_of_range_is_noop() {
        let mut table = TableData::default();
        table.add_column();
        table.remove_column(5);
        assert_eq!(table.columns.len(), 1);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(5.0).display(), "5");
        assert_eq!(CellValue::Number(2.5).display(), "2.5");
        assert_eq!(CellValue::Bool(true).display(), "true");
    }

    #[test]
    fn test_column_type_cycle_is_closed() {
        for column_type in [
            ColumnType::Text,
            ColumnType::Number,
            ColumnType::Checkbox,
            ColumnType::Dropdown,
        ] {
            assert_eq!(column_type.next().prev(), column_type);
        }
    }
}

//! Form domain layer
//!
//! The field catalog, the persisted document model, the field editors that
//! mirror it on screen, and the edit session tying them together. The
//! sign-in inputs live here as well.

mod catalog;
mod editor;
mod field;
mod form_state;
mod model;
mod session;

pub use catalog::{describe, FieldKind};
pub use editor::{CellInput, EditorSlot, FieldView, TableView};
pub use field::FormField;
pub use form_state::{Form, LoginForm};
pub use model::{ColumnType, FormData};
pub use session::{EditSession, MoveDirection};

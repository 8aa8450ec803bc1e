//! Dialog components for TUI

mod base;
mod confirm_dialog;

pub use base::centered_rect;
pub use confirm_dialog::render_confirm_dialog;

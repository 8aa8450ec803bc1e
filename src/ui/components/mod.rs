//! Reusable UI components

mod button;
mod dialog;
mod toast;

pub use button::{render_button, render_nav_button, BUTTON_HEIGHT};
pub use dialog::{centered_rect, render_confirm_dialog};
pub use toast::render_toasts;

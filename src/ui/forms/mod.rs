//! Form rendering module
//!
//! - `field_renderer`: boxed single-line inputs
//! - `login`: sign-in screen
//! - `builder`: the form builder editor

mod builder;
mod field_renderer;
mod login;

pub use builder::draw_form_builder;
pub use login::draw_login;

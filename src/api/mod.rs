//! HTTP client module for the REST backend

mod client;
mod error;
mod traits;
mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use traits::FormsApi;
pub use types::{CreateFormRequest, FormRecord, FormStatus, UpdateFormRequest};

#[cfg(test)]
pub use traits::MockFormsApi;

//! Trait abstraction over the forms endpoints to enable mocking in tests

use super::error::ApiError;
use super::types::{CreateFormRequest, FormRecord, UpdateFormRequest};
use async_trait::async_trait;

/// Form persistence operations of the backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormsApi: Send + Sync {
    /// List every form belonging to a client
    async fn list_client_forms(&mut self, client_id: i64) -> Result<Vec<FormRecord>, ApiError>;

    /// List the published forms of a client
    async fn list_published_forms(&mut self, client_id: i64) -> Result<Vec<FormRecord>, ApiError>;

    /// Create a new form
    async fn create_form(&mut self, request: &CreateFormRequest) -> Result<FormRecord, ApiError>;

    /// Replace the title and fields of an existing form
    async fn update_form(
        &mut self,
        form_id: &str,
        request: &UpdateFormRequest,
    ) -> Result<FormRecord, ApiError>;

    /// Delete a form
    async fn delete_form(&mut self, form_id: &str) -> Result<(), ApiError>;

    /// Make a form visible to its client
    async fn publish_form(&mut self, form_id: &str) -> Result<FormRecord, ApiError>;

    /// Return a published form to draft
    async fn unpublish_form(&mut self, form_id: &str) -> Result<FormRecord, ApiError>;
}

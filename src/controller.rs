//! Document controller: owns the edit session and persists it
//!
//! Submission is split into [`DocumentController::begin_submit`] and
//! [`DocumentController::finish_submit`] around the network call so the
//! in-flight flag is observable while the request is outstanding.

use crate::api::{ApiError, CreateFormRequest, FormRecord, FormsApi, UpdateFormRequest};
use crate::state::{EditSession, FormData};
use thiserror::Error;

/// Fallback shown when a save fails without a backend message
pub const SAVE_FAILED: &str = "Failed to save form";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a form title")]
    MissingTitle,
    #[error("Please add at least one field")]
    NoFields,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("No form is being edited")]
    NoSession,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A save is already in progress")]
    SaveInFlight,

    #[error("Your session has expired, please sign in again")]
    AuthExpired,

    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for SubmitError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::AuthExpired,
            other => Self::Api(other),
        }
    }
}

impl SubmitError {
    /// Text for the error toast
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Status { message, .. }) => message.clone(),
            Self::Api(_) => SAVE_FAILED.to_string(),
            other => other.to_string(),
        }
    }
}

/// What a successful save did
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(FormRecord),
    Updated(FormRecord),
}

impl SaveOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Created(_) => "Form created successfully!",
            Self::Updated(_) => "Form updated successfully!",
        }
    }

    pub fn record(&self) -> &FormRecord {
        match self {
            Self::Created(record) | Self::Updated(record) => record,
        }
    }
}

/// The call a submission resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest {
    Create(CreateFormRequest),
    Update {
        form_id: String,
        request: UpdateFormRequest,
    },
}

fn validate(title: &str, data: &FormData) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if data.fields.is_empty() {
        return Err(ValidationError::NoFields);
    }
    Ok(())
}

/// Owns at most one edit session
#[derive(Debug, Default)]
pub struct DocumentController {
    session: Option<EditSession>,
    saving: bool,
}

impl DocumentController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a blank form, replacing any open session
    pub fn open_new(&mut self) -> &mut EditSession {
        tracing::debug!("opening new form");
        self.saving = false;
        self.session.insert(EditSession::start_new())
    }

    /// Start editing a persisted form, replacing any open session
    pub fn open_existing(&mut self, record: &FormRecord) -> &mut EditSession {
        tracing::debug!(form_id = %record.id, "opening form for edit");
        self.saving = false;
        self.session.insert(EditSession::start_editing(record))
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        self.session.as_mut()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Discard the session without saving
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("edit session cancelled");
        }
        self.saving = false;
    }

    /// Validate the session and mark a save as in flight
    pub fn begin_submit(&mut self, client_id: i64) -> Result<SaveRequest, SubmitError> {
        if self.saving {
            return Err(SubmitError::SaveInFlight);
        }
        let session = self.session.as_mut().ok_or(SubmitError::NoSession)?;
        let (title, data) = session.payload();
        validate(&title, &data)?;

        let request = match session.form_id() {
            Some(id) => SaveRequest::Update {
                form_id: id.to_string(),
                request: UpdateFormRequest { title, data },
            },
            None => SaveRequest::Create(CreateFormRequest::draft(client_id, title, data)),
        };
        self.saving = true;
        Ok(request)
    }

    /// Clear the in-flight flag and close the session on success.
    /// Failures keep the session open, except an expired login.
    pub fn finish_submit(
        &mut self,
        result: Result<SaveOutcome, ApiError>,
    ) -> Result<SaveOutcome, SubmitError> {
        self.saving = false;
        match result {
            Ok(outcome) => {
                tracing::info!(form_id = %outcome.record().id, "form saved");
                self.session = None;
                Ok(outcome)
            }
            Err(err) => {
                let err = SubmitError::from(err);
                if matches!(err, SubmitError::AuthExpired) {
                    self.session = None;
                }
                tracing::warn!(error = %err, "form save failed");
                Err(err)
            }
        }
    }

    /// Validate, persist and close the current session
    pub async fn submit<A>(&mut self, api: &mut A, client_id: i64) -> Result<SaveOutcome, SubmitError>
    where
        A: FormsApi + ?Sized,
    {
        let result = match self.begin_submit(client_id)? {
            SaveRequest::Create(request) => {
                api.create_form(&request).await.map(SaveOutcome::Created)
            }
            SaveRequest::Update { form_id, request } => api
                .update_form(&form_id, &request)
                .await
                .map(SaveOutcome::Updated),
        };
        self.finish_submit(result)
    }
}

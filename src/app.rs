//! Application state and core logic

use crate::api::{ApiClient, ApiError, FormStatus, FormsApi};
use crate::auth::{guard_route, redirect_by_role, GuardOutcome, Role, Route, SessionStore};
use crate::config::TuiConfig;
use crate::controller::{DocumentController, SubmitError};
use crate::logging;
use crate::state::{
    items_for, AppState, ConfirmDialog, EditorSlot, FieldKind, Form, MoveDirection, NavItem,
    NavState, PendingAction, ToastQueue,
};
use crate::utils::Debouncer;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Delay before typed filter text is applied to the listing
const FILTER_DEBOUNCE: Duration = Duration::from_millis(300);

const NO_CLIENT: &str = "No client selected: set client_id in config.json or CLIENTDESK_CLIENT_ID";

/// Network work queued by a key press. It runs after the next frame is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredWork {
    SignIn,
    Save { client_id: i64 },
    Reload,
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// REST client for the backend
    pub api: ApiClient,
    /// Signed-in user, persisted between runs
    pub sessions: SessionStore,
    /// Owner of the form being edited
    pub controller: DocumentController,
    config: TuiConfig,
    /// Whether the app should quit
    quit: bool,
    filter_debouncer: Debouncer<String>,
    filter_updates: UnboundedReceiver<String>,
    /// Last known terminal width
    pub terminal_width: u16,
    deferred: Option<DeferredWork>,
}

impl App {
    /// Create a new App instance, restoring a stored session when its token is still valid
    pub async fn new(config: TuiConfig) -> Result<Self> {
        let api = ApiClient::new(config.api_base_url())?;
        let sessions = SessionStore::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "discarding unreadable session");
            SessionStore::default()
        });

        let mut app = Self::with_parts(config, api, sessions);
        app.restore_session().await;
        Ok(app)
    }

    fn with_parts(config: TuiConfig, api: ApiClient, sessions: SessionStore) -> Self {
        let state = AppState::new(
            NavState::new(config.nav_collapse_width()),
            ToastQueue::new(Duration::from_millis(config.toast_duration_ms())),
        );
        let (tx, filter_updates) = mpsc::unbounded_channel();
        Self {
            state,
            api,
            sessions,
            controller: DocumentController::new(),
            config,
            quit: false,
            filter_debouncer: Debouncer::new(FILTER_DEBOUNCE, tx),
            filter_updates,
            terminal_width: 0,
            deferred: None,
        }
    }

    async fn restore_session(&mut self) {
        let Some(token) = self.sessions.token().map(str::to_string) else {
            return;
        };
        self.api.set_token(token);
        if self.api.verify_token().await {
            tracing::info!("restored stored session");
            let route = redirect_by_role(self.sessions.current());
            self.navigate(route);
        } else {
            tracing::info!("stored token rejected");
            self.clear_auth();
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn role(&self) -> Option<Role> {
        self.sessions.user().map(|u| u.role)
    }

    /// Client whose forms are listed: a client's own id, otherwise the configured one
    pub fn client_id(&self) -> Option<i64> {
        match self.sessions.user() {
            Some(user) if user.role == Role::Client => {
                user.id.parse().ok().or(self.config.client_id)
            }
            _ => self.config.client_id,
        }
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        items_for(self.role())
    }

    pub fn nav_docked(&self) -> bool {
        self.role().is_some() && self.state.nav.is_docked(self.terminal_width)
    }

    /// Per-tick housekeeping: expire toasts, apply debounced filter text
    pub fn tick(&mut self) {
        self.state.toasts.prune();
        let mut latest = None;
        while let Ok(filter) = self.filter_updates.try_recv() {
            latest = Some(filter);
        }
        if let Some(filter) = latest {
            self.state.apply_filter(filter);
        }
    }

    pub fn on_resize(&mut self, width: u16) {
        self.terminal_width = width;
        self.state.nav.on_resize(width);
    }

    /// A save is queued or in flight
    pub fn is_saving(&self) -> bool {
        matches!(self.deferred, Some(DeferredWork::Save { .. })) || self.controller.is_saving()
    }

    pub fn has_deferred_work(&self) -> bool {
        self.deferred.is_some()
    }

    /// Run the network call queued by the last key press
    pub async fn run_deferred_work(&mut self) {
        match self.deferred.take() {
            Some(DeferredWork::SignIn) => self.submit_login().await,
            Some(DeferredWork::Save { client_id }) => self.save_form(client_id).await,
            Some(DeferredWork::Reload) => self.load_forms().await,
            None => {}
        }
    }

    /// Navigate to a route, applying its guard
    pub fn navigate(&mut self, route: Route) {
        let target = match guard_route(route, self.sessions.current()) {
            GuardOutcome::Allow => route,
            GuardOutcome::Redirect(to) => to,
        };
        self.state.route = target;
        self.state.nav.close();
        match target {
            Route::AdminDashboard | Route::ClientDashboard => self.request_reload(),
            Route::FormBuilder => {
                if !self.controller.is_open() {
                    self.controller.open_new();
                }
                self.state.reset_editor();
            }
            Route::Login => {}
        }
    }

    /// Queue a reload of the current dashboard's listing
    fn request_reload(&mut self) {
        if self.client_id().is_none() {
            self.state.set_forms(Vec::new());
            self.state.toasts.warning(NO_CLIENT);
            return;
        }
        self.state.loading = true;
        self.deferred = Some(DeferredWork::Reload);
    }

    async fn load_forms(&mut self) {
        let Some(client_id) = self.client_id() else {
            self.state.loading = false;
            return;
        };
        self.state.loading = true;
        let result = match self.role() {
            Some(Role::Client) => self.api.list_published_forms(client_id).await,
            _ => self.api.list_client_forms(client_id).await,
        };
        self.state.loading = false;
        match result {
            Ok(forms) => self.state.set_forms(forms),
            Err(err) => self.handle_api_error(err, "Failed to load forms"),
        }
    }

    /// Report an API failure, signing out when the token was rejected
    fn handle_api_error(&mut self, err: ApiError, fallback: &str) {
        match err {
            ApiError::Unauthorized => self.expire_session(),
            ApiError::Status { message, .. } => self.state.toasts.error(message),
            other => {
                tracing::warn!(error = %other, "{fallback}");
                self.state.toasts.error(fallback);
            }
        }
    }

    fn clear_auth(&mut self) {
        if let Err(err) = self.sessions.clear() {
            tracing::warn!(error = %err, "failed to remove stored session");
        }
        self.api.clear_token();
        self.controller.cancel();
        self.state.reset_for_logout();
    }

    fn expire_session(&mut self) {
        tracing::info!("session expired");
        self.clear_auth();
        self.state
            .toasts
            .warning("Your session has expired, please sign in again");
    }

    fn logout(&mut self) {
        if let Some(user) = self.sessions.user() {
            logging::user_action("logout", &user.email);
        }
        self.clear_auth();
        self.state.toasts.info("Signed out");
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Confirmation dialog is modal
        if self.state.confirm.is_some() {
            self.handle_confirm_key(key).await?;
            return Ok(());
        }

        if self.state.nav.is_open() {
            self.handle_nav_key(key);
            return Ok(());
        }

        // Ctrl+B: toggle the navigation drawer
        if self.sessions.is_authenticated()
            && key.code == KeyCode::Char('b')
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.state.nav.toggle();
            return Ok(());
        }

        match self.state.route {
            Route::Login => self.handle_login_key(key),
            Route::AdminDashboard => self.handle_admin_key(key).await,
            Route::ClientDashboard => self.handle_client_key(key),
            Route::FormBuilder => self.handle_builder_key(key),
        }
        Ok(())
    }

    async fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(dialog) = self.state.confirm.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Up
            | KeyCode::Down
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::BackTab => dialog.toggle(),
            KeyCode::Char('y') => {
                if let Some(dialog) = self.state.confirm.take() {
                    self.run_pending(dialog.action).await;
                }
            }
            KeyCode::Enter => {
                if let Some(dialog) = self.state.confirm.take() {
                    if dialog.selected_option {
                        self.run_pending(dialog.action).await;
                    }
                }
            }
            KeyCode::Esc | KeyCode::Char('n') => {
                self.state.confirm = None;
            }
            _ => {}
        }
        Ok(())
    }

    async fn run_pending(&mut self, action: PendingAction) {
        match action {
            PendingAction::DeleteForm { id, title } => self.delete_form(&id, &title).await,
            PendingAction::DiscardEdits => self.close_builder(),
            PendingAction::Logout => self.logout(),
        }
    }

    fn confirm(&mut self, action: PendingAction) {
        self.state.confirm = Some(ConfirmDialog::new(action));
    }

    fn handle_nav_key(&mut self, key: KeyEvent) {
        let count = self.nav_items().len();
        match key.code {
            KeyCode::Esc => self.state.nav.close(),
            KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.nav.close()
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.nav.select_next(count),
            KeyCode::Char('k') | KeyCode::Up => self.state.nav.select_prev(count),
            KeyCode::Enter => {
                let item = self.nav_items().get(self.state.nav.selected).copied();
                self.state.nav.close();
                if let Some(item) = item {
                    self.activate_nav_item(item);
                }
            }
            _ => {}
        }
    }

    fn activate_nav_item(&mut self, item: NavItem) {
        match item {
            NavItem::Logout => self.confirm(PendingAction::Logout),
            NavItem::Go(Route::FormBuilder) => self.open_builder(None),
            NavItem::Go(route) => {
                if self.state.route == Route::FormBuilder && self.builder_is_dirty() {
                    self.confirm(PendingAction::DiscardEdits);
                } else {
                    self.controller.cancel();
                    self.navigate(route);
                }
            }
        }
    }

    /// Handle keys on the sign-in screen
    fn handle_login_key(&mut self, key: KeyEvent) {
        let form = &mut self.state.login;
        if form.submitting {
            return;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Enter => {
                if form.active_field() == 0 {
                    form.next_field();
                } else {
                    self.request_login();
                }
            }
            KeyCode::Backspace => form.get_active_field_mut().pop_char(),
            KeyCode::Char(c) => {
                form.error = None;
                form.get_active_field_mut().push_char(c);
            }
            _ => {}
        }
    }

    fn request_login(&mut self) {
        if !self.state.login.is_complete() {
            self.state.login.error = Some("Please enter your email and password".to_string());
            return;
        }
        self.state.login.submitting = true;
        self.deferred = Some(DeferredWork::SignIn);
    }

    async fn submit_login(&mut self) {
        let email = self.state.login.email.as_text().trim().to_string();
        let password = self.state.login.password.as_text().to_string();

        let result = self.api.login(&email, &password).await;
        self.state.login.submitting = false;

        match result {
            Ok(session) => {
                logging::user_action("login", &email);
                let greeting = format!("Welcome, {}", session.user.display_name());
                if let Err(err) = self.sessions.save(session) {
                    tracing::warn!(error = %err, "failed to store session");
                    self.state.toasts.warning("Signed in, but the session could not be saved");
                }
                self.state.login = Default::default();
                self.state.toasts.success(greeting);
                let route = redirect_by_role(self.sessions.current());
                self.navigate(route);
            }
            Err(err) => {
                let message = match err {
                    ApiError::Unauthorized => "Invalid email or password".to_string(),
                    ApiError::Status { message, .. } => message,
                    other => other.to_string(),
                };
                tracing::info!(%email, %message, "sign-in failed");
                self.state.login.error = Some(message);
                self.state.login.reset_password();
            }
        }
    }

    /// Keys shared by both dashboards; returns true when handled
    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        if self.state.filter_active {
            match key.code {
                KeyCode::Esc => {
                    self.state.filter_active = false;
                    self.state.filter_input.clear();
                    self.filter_debouncer.cancel();
                    self.state.apply_filter(String::new());
                }
                KeyCode::Enter => {
                    self.state.filter_active = false;
                    self.filter_debouncer.cancel();
                    let filter = self.state.filter_input.clone();
                    self.state.apply_filter(filter);
                }
                KeyCode::Backspace => {
                    self.state.filter_input.pop();
                    self.filter_debouncer.call(self.state.filter_input.clone());
                }
                KeyCode::Char(c) => {
                    self.state.filter_input.push(c);
                    self.filter_debouncer.call(self.state.filter_input.clone());
                }
                _ => {}
            }
            return true;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('/') => self.state.filter_active = true,
            KeyCode::Char('r') => self.request_reload(),
            KeyCode::Char('o') => self.confirm(PendingAction::Logout),
            KeyCode::Char('q') => self.quit = true,
            _ => return false,
        }
        true
    }

    /// Handle keys in the admin form listing
    async fn handle_admin_key(&mut self, key: KeyEvent) {
        if self.handle_list_key(key) {
            return;
        }
        match key.code {
            KeyCode::Char('n') => self.open_builder(None),
            KeyCode::Char('e') | KeyCode::Enter => {
                let selected = self.state.selected_form().cloned();
                if let Some(record) = selected {
                    self.open_builder(Some(record));
                }
            }
            KeyCode::Char('d') => {
                if let Some(form) = self.state.selected_form() {
                    let action = PendingAction::DeleteForm {
                        id: form.id.clone(),
                        title: form.title.clone(),
                    };
                    self.confirm(action);
                }
            }
            KeyCode::Char('p') => self.toggle_publish().await,
            _ => {}
        }
    }

    /// Handle keys in the client's published forms listing
    fn handle_client_key(&mut self, key: KeyEvent) {
        if !self.handle_list_key(key) {
            if key.code == KeyCode::Enter {
                if let Some(form) = self.state.selected_form() {
                    let fields = form.data.fields.len();
                    let message = format!("\"{}\" has {fields} field(s)", form.title);
                    self.state.toasts.info(message);
                }
            }
        }
    }

    async fn delete_form(&mut self, id: &str, title: &str) {
        match self.api.delete_form(id).await {
            Ok(()) => {
                logging::user_action("delete_form", id);
                self.state.toasts.success(format!("Deleted \"{title}\""));
                self.request_reload();
            }
            Err(err) => self.handle_api_error(err, "Failed to delete form"),
        }
    }

    async fn toggle_publish(&mut self) {
        let Some(form) = self.state.selected_form() else {
            return;
        };
        let id = form.id.clone();
        let result = match form.status {
            FormStatus::Draft => self.api.publish_form(&id).await,
            FormStatus::Published => self.api.unpublish_form(&id).await,
        };
        match result {
            Ok(updated) => {
                logging::user_action("set_status", updated.status.label());
                self.state
                    .toasts
                    .success(format!("Form is now {}", updated.status.label()));
                if let Some(slot) = self.state.forms.iter_mut().find(|f| f.id == updated.id) {
                    *slot = updated;
                }
            }
            Err(err) => self.handle_api_error(err, "Failed to update form status"),
        }
    }

    /// Open the form builder on a new form or a copy of an existing one
    fn open_builder(&mut self, record: Option<crate::api::FormRecord>) {
        match &record {
            Some(record) => {
                self.controller.open_existing(record);
            }
            None => {
                self.controller.open_new();
            }
        }
        self.navigate(Route::FormBuilder);
    }

    fn close_builder(&mut self) {
        self.controller.cancel();
        self.navigate(Route::AdminDashboard);
    }

    fn builder_is_dirty(&self) -> bool {
        self.controller.session().is_some_and(|s| s.is_dirty())
    }

    /// The slot that currently has focus in the builder
    pub fn focused_slot(&self) -> Option<EditorSlot> {
        let slots = self.controller.session()?.view().slots();
        slots
            .get(self.state.editor_focus.min(slots.len().saturating_sub(1)))
            .copied()
    }

    fn focus_slot(&mut self, target: EditorSlot) {
        if let Some(session) = self.controller.session() {
            if let Some(index) = session.view().slots().iter().position(|s| *s == target) {
                self.state.editor_focus = index;
            }
        }
    }

    fn clamp_focus(&mut self) {
        if let Some(session) = self.controller.session() {
            let len = session.view().slots().len();
            self.state.editor_focus = self.state.editor_focus.min(len.saturating_sub(1));
        }
    }

    /// Handle keys in the form builder
    fn handle_builder_key(&mut self, key: KeyEvent) {
        if self.controller.session().is_none() {
            self.controller.open_new();
            self.state.reset_editor();
        }
        let Some(slot) = self.focused_slot() else {
            return;
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl {
            match key.code {
                KeyCode::Char('s') => self.request_save(),
                KeyCode::Up => self.move_focused_field(slot, MoveDirection::Up),
                KeyCode::Down => self.move_focused_field(slot, MoveDirection::Down),
                KeyCode::Char('d') => self.remove_focused_field(slot),
                KeyCode::Char('k') => self.add_column(slot),
                KeyCode::Char('r') => self.add_row(slot),
                KeyCode::Char('x') => self.remove_focused_part(slot),
                _ => {}
            }
            return;
        }

        let slot_count = self
            .controller
            .session()
            .map(|s| s.view().slots().len())
            .unwrap_or(1)
            .max(1);

        match key.code {
            KeyCode::Esc => {
                if self.builder_is_dirty() {
                    self.confirm(PendingAction::DiscardEdits);
                } else {
                    self.close_builder();
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                self.state.editor_focus = (self.state.editor_focus + 1) % slot_count;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.state.editor_focus = (self.state.editor_focus + slot_count - 1) % slot_count;
            }
            KeyCode::Left | KeyCode::Right if slot == EditorSlot::AddField => {
                let count = FieldKind::ALL.len();
                self.state.palette_index = if key.code == KeyCode::Right {
                    (self.state.palette_index + 1) % count
                } else {
                    (self.state.palette_index + count - 1) % count
                };
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                if let Some(session) = self.controller.session_mut() {
                    if session.view_mut().cycle(slot, forward)
                        && matches!(slot, EditorSlot::ColumnType { .. })
                    {
                        session.refresh();
                    }
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') if slot == EditorSlot::AddField => {
                let kind = FieldKind::ALL[self.state.palette_index % FieldKind::ALL.len()];
                self.add_field(kind);
            }
            KeyCode::Char(c @ '1'..='7') if slot == EditorSlot::AddField => {
                let index = c as usize - '1' as usize;
                self.state.palette_index = index;
                self.add_field(FieldKind::ALL[index]);
            }
            KeyCode::Enter | KeyCode::Char(' ')
                if !slot.accepts_text() || self.is_checkbox(slot) =>
            {
                if let Some(session) = self.controller.session_mut() {
                    if session.view_mut().activate(slot)
                        && matches!(slot, EditorSlot::ColumnType { .. })
                    {
                        session.refresh();
                    }
                }
            }
            KeyCode::Enter => {
                self.state.editor_focus = (self.state.editor_focus + 1) % slot_count;
            }
            KeyCode::Backspace => {
                if let Some(session) = self.controller.session_mut() {
                    session.view_mut().backspace(slot);
                }
            }
            KeyCode::Char(c) => {
                if let Some(session) = self.controller.session_mut() {
                    session.view_mut().input_char(slot, c);
                }
            }
            _ => {}
        }
    }

    fn is_checkbox(&self, slot: EditorSlot) -> bool {
        self.controller
            .session()
            .is_some_and(|s| s.view().is_checkbox(slot))
    }

    fn add_field(&mut self, kind: FieldKind) {
        if let Some(session) = self.controller.session_mut() {
            let index = session.add_field(kind);
            logging::user_action("add_field", kind.as_str());
            self.focus_slot(EditorSlot::FieldLabel(index));
        }
    }

    fn move_focused_field(&mut self, slot: EditorSlot, direction: MoveDirection) {
        let Some(field) = slot.field_index() else {
            return;
        };
        let moved = self
            .controller
            .session_mut()
            .and_then(|s| s.move_field(field, direction));
        if let Some(index) = moved {
            self.focus_slot(EditorSlot::FieldLabel(index));
        }
    }

    fn remove_focused_field(&mut self, slot: EditorSlot) {
        let Some(field) = slot.field_index() else {
            return;
        };
        if let Some(session) = self.controller.session_mut() {
            session.remove_field(field);
            logging::user_action("remove_field", &field.to_string());
        }
        if field > 0 {
            self.focus_slot(EditorSlot::FieldLabel(field - 1));
        }
        self.clamp_focus();
    }

    fn add_column(&mut self, slot: EditorSlot) {
        let Some(field) = slot.field_index() else {
            return;
        };
        if let Some(session) = self.controller.session_mut() {
            session.add_column(field);
        }
        self.clamp_focus();
    }

    fn add_row(&mut self, slot: EditorSlot) {
        let Some(field) = slot.field_index() else {
            return;
        };
        if let Some(session) = self.controller.session_mut() {
            session.add_row(field);
        }
        self.clamp_focus();
    }

    /// Remove the column or row the focus is on
    fn remove_focused_part(&mut self, slot: EditorSlot) {
        let Some(session) = self.controller.session_mut() else {
            return;
        };
        match slot {
            EditorSlot::ColumnLabel { field, column }
            | EditorSlot::ColumnType { field, column }
            | EditorSlot::ColumnAccess { field, column } => session.remove_column(field, column),
            EditorSlot::Cell { field, row, .. } => session.remove_row(field, row),
            _ => return,
        }
        self.clamp_focus();
    }

    /// Queue a save of the open form
    fn request_save(&mut self) {
        if self.is_saving() {
            return;
        }
        let is_new = self.controller.session().is_some_and(|s| s.is_new());
        let client_id = match (is_new, self.client_id()) {
            (true, None) => {
                self.state.toasts.error(NO_CLIENT);
                return;
            }
            (_, id) => id.unwrap_or_default(),
        };
        self.deferred = Some(DeferredWork::Save { client_id });
    }

    async fn save_form(&mut self, client_id: i64) {
        match self.controller.submit(&mut self.api, client_id).await {
            Ok(outcome) => {
                logging::user_action("save_form", &outcome.record().id);
                self.state.toasts.success(outcome.message());
                self.navigate(Route::AdminDashboard);
            }
            Err(SubmitError::AuthExpired) => self.expire_session(),
            Err(err) => self.state.toasts.error(err.user_message()),
        }
    }
}

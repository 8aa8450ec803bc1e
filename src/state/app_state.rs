//! Application state definitions

use super::forms::LoginForm;
use super::navigation::NavState;
use super::toast::ToastQueue;
use crate::api::FormRecord;
use crate::auth::Route;

/// Action waiting on a confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteForm { id: String, title: String },
    DiscardEdits,
    Logout,
}

/// A yes/no modal in front of the current screen
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub action: PendingAction,
    /// true when "Confirm" is highlighted
    pub selected_option: bool,
}

impl ConfirmDialog {
    pub fn new(action: PendingAction) -> Self {
        let (title, message) = match &action {
            PendingAction::DeleteForm { title, .. } => (
                "Confirm Delete".to_string(),
                format!("Are you sure you want to delete \"{title}\"?"),
            ),
            PendingAction::DiscardEdits => (
                "Discard Changes".to_string(),
                "You have unsaved changes. Leave the form builder anyway?".to_string(),
            ),
            PendingAction::Logout => (
                "Confirm Action".to_string(),
                "Are you sure you want to sign out?".to_string(),
            ),
        };
        Self {
            title,
            message,
            action,
            selected_option: false,
        }
    }

    pub fn toggle(&mut self) {
        self.selected_option = !self.selected_option;
    }
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub route: Route,
    pub nav: NavState,
    pub toasts: ToastQueue,
    pub confirm: Option<ConfirmDialog>,
    pub login: LoginForm,

    /// Forms of the current listing, as returned by the backend
    pub forms: Vec<FormRecord>,
    pub selected_index: usize,
    /// Live filter text and the debounced value applied to the listing
    pub filter_input: String,
    pub filter: String,
    pub filter_active: bool,
    pub loading: bool,

    /// Index into the editor's tab order
    pub editor_focus: usize,
    /// Highlighted entry of the add-field palette
    pub palette_index: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(NavState::default(), ToastQueue::default())
    }
}

impl AppState {
    pub fn new(nav: NavState, toasts: ToastQueue) -> Self {
        Self {
            route: Route::Login,
            nav,
            toasts,
            confirm: None,
            login: LoginForm::new(),
            forms: Vec::new(),
            selected_index: 0,
            filter_input: String::new(),
            filter: String::new(),
            filter_active: false,
            loading: false,
            editor_focus: 0,
            palette_index: 0,
        }
    }

    /// Forms matching the applied filter, case-insensitively on the title
    pub fn visible_forms(&self) -> Vec<&FormRecord> {
        let needle = self.filter.trim().to_lowercase();
        self.forms
            .iter()
            .filter(|f| needle.is_empty() || f.title.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn selected_form(&self) -> Option<&FormRecord> {
        self.visible_forms().get(self.selected_index).copied()
    }

    pub fn move_selection_down(&mut self) {
        let max = self.visible_forms().len();
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Replace the listing, keeping the selection in range
    pub fn set_forms(&mut self, forms: Vec<FormRecord>) {
        self.forms = forms;
        self.clamp_selection();
    }

    pub fn apply_filter(&mut self, filter: String) {
        self.filter = filter;
        self.selected_index = 0;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_forms().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn reset_editor(&mut self) {
        self.editor_focus = 0;
        self.palette_index = 0;
    }

    /// Forget everything tied to the signed-in user
    pub fn reset_for_logout(&mut self) {
        self.forms.clear();
        self.selected_index = 0;
        self.filter.clear();
        self.filter_input.clear();
        self.filter_active = false;
        self.confirm = None;
        self.nav.close();
        self.login = LoginForm::new();
        self.reset_editor();
        self.route = Route::Login;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(titles: &[&str]) -> AppState {
        let mut state = AppState::default();
        state.set_forms(
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| FormRecord::fixture(&i.to_string(), t))
                .collect(),
        );
        state
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut state = state_with(&["A", "B"]);
        state.move_selection_up();
        assert_eq!(state.selected_index, 0);
        state.move_selection_down();
        state.move_selection_down();
        assert_eq!(state.selected_index, 1);

        state.set_forms(vec![FormRecord::fixture("x", "Only")]);
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_filter_matches_title_case_insensitively() {
        let mut state = state_with(&["Weekly Check-in", "Intake", "Monthly check-in"]);
        state.move_selection_down();
        state.apply_filter("CHECK".to_string());
        let titles: Vec<&str> = state.visible_forms().iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["Weekly Check-in", "Monthly check-in"]);
        assert_eq!(state.selected_index, 0);
        assert_eq!(state.selected_form().map(|f| f.id.as_str()), Some("0"));
    }

    #[test]
    fn test_confirm_dialog_defaults_to_cancel() {
        let mut dialog = ConfirmDialog::new(PendingAction::DeleteForm {
            id: "1".to_string(),
            title: "Intake".to_string(),
        });
        assert!(!dialog.selected_option);
        assert!(dialog.message.contains("\"Intake\""));
        dialog.toggle();
        assert!(dialog.selected_option);
    }

    #[test]
    fn test_reset_for_logout() {
        let mut state = state_with(&["A"]);
        state.route = Route::AdminDashboard;
        state.login.email.push_char('x');
        state.reset_for_logout();
        assert_eq!(state.route, Route::Login);
        assert!(state.forms.is_empty());
        assert_eq!(state.login.email.as_text(), "");
    }
}

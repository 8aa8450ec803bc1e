//! Sign-in form state

use super::field::FormField;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_active_field_mut(&mut self) -> &mut FormField;
    fn get_field(&self, index: usize) -> Option<&FormField>;
}

/// Email and password inputs plus the last sign-in failure
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: FormField,
    pub password: FormField,
    pub active_field_index: usize,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: FormField::text("email", "Email"),
            password: FormField::secret("password", "Password"),
            active_field_index: 0,
            error: None,
            submitting: false,
        }
    }

    /// Both inputs are filled in
    pub fn is_complete(&self) -> bool {
        !self.email.as_text().trim().is_empty() && !self.password.as_text().is_empty()
    }

    /// Forget the typed password, keeping the email for another attempt
    pub fn reset_password(&mut self) {
        self.password.clear();
        self.active_field_index = 1;
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for LoginForm {
    fn field_count(&self) -> usize {
        2
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(1);
    }
    fn get_active_field_mut(&mut self) -> &mut FormField {
        match self.active_field_index {
            0 => &mut self.email,
            _ => &mut self.password,
        }
    }
    fn get_field(&self, index: usize) -> Option<&FormField> {
        match index {
            0 => Some(&self.email),
            1 => Some(&self.password),
            _ => None,
        }
    }
}

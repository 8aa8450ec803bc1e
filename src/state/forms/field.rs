//! Single-line text input used by the sign-in screen

/// Represents a single input with its label and value
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: String,
    /// Rendered as bullets instead of the typed characters
    pub is_secret: bool,
}

impl FormField {
    /// Create a new plain text field
    pub fn text(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: String::new(),
            is_secret: false,
        }
    }

    /// Create a new masked field
    pub fn secret(name: &str, label: &str) -> Self {
        Self {
            is_secret: true,
            ..Self::text(name, label)
        }
    }

    pub fn as_text(&self) -> &str {
        &self.value
    }

    pub fn push_char(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn pop_char(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        if self.is_secret {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_field_is_masked() {
        let mut field = FormField::secret("password", "Password");
        for c in "hunter2".chars() {
            field.push_char(c);
        }
        assert_eq!(field.as_text(), "hunter2");
        assert_eq!(field.display_value(), "•••••••");
        field.pop_char();
        assert_eq!(field.display_value().chars().count(), 6);
    }

    #[test]
    fn test_clear() {
        let mut field = FormField::text("email", "Email");
        field.push_char('a');
        field.clear();
        assert_eq!(field.display_value(), "");
    }
}

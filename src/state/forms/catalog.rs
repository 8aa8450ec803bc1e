//! Catalog of the field kinds the form builder can place on a form

use serde::{Deserialize, Serialize};

/// Every kind of field a questionnaire can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Dropdown,
    Checkbox,
    Textarea,
    DynamicTable,
}

/// Display metadata for a field kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub label: &'static str,
    pub icon: &'static str,
    /// Whether the kind exposes a target/destination setting (no editor uses it yet)
    pub has_target: bool,
}

impl FieldKind {
    /// All kinds, in the order the add-field palette shows them
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Text,
        FieldKind::Number,
        FieldKind::Date,
        FieldKind::Dropdown,
        FieldKind::Checkbox,
        FieldKind::Textarea,
        FieldKind::DynamicTable,
    ];

    pub fn describe(self) -> FieldDescriptor {
        describe(self)
    }

    /// Wire name used in the persisted `type` key
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Dropdown => "dropdown",
            Self::Checkbox => "checkbox",
            Self::Textarea => "textarea",
            Self::DynamicTable => "dynamic_table",
        }
    }
}

/// Look up display metadata for a field kind
pub fn describe(kind: FieldKind) -> FieldDescriptor {
    let (label, icon, has_target) = match kind {
        FieldKind::Text => ("Text", "📝", false),
        FieldKind::Number => ("Number", "🔢", true),
        FieldKind::Date => ("Date", "📅", false),
        FieldKind::Dropdown => ("Dropdown", "📋", false),
        FieldKind::Checkbox => ("Checkbox", "☑️", false),
        FieldKind::Textarea => ("Long Text", "📄", false),
        FieldKind::DynamicTable => ("Dynamic Table", "📊", false),
    };
    FieldDescriptor {
        label,
        icon,
        has_target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_label() {
        for kind in FieldKind::ALL {
            assert!(!describe(kind).label.is_empty());
            assert!(!describe(kind).icon.is_empty());
        }
    }

    #[test]
    fn test_only_number_has_target() {
        let with_target: Vec<_> = FieldKind::ALL
            .into_iter()
            .filter(|k| k.describe().has_target)
            .collect();
        assert_eq!(with_target, vec![FieldKind::Number]);
    }

    #[test]
    fn test_textarea_displays_as_long_text() {
        assert_eq!(describe(FieldKind::Textarea).label, "Long Text");
    }

    #[test]
    fn test_wire_names_match_serde() {
        for kind in FieldKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_unknown_kind_fails_to_parse() {
        let parsed: Result<FieldKind, _> = serde_json::from_str("\"signature\"");
        assert!(parsed.is_err());
    }
}

use serde::{Deserialize, Serialize};

/// A single field reference as it appears in lineage input.
///
/// A `final` field is a literal terminal identifier; any other field is
/// positioned in the pipeline grid by `(level, index)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRef {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub index: u32,
    pub field_name: String,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

impl FieldRef {
    pub fn positioned(level: u32, index: u32, field_name: impl Into<String>) -> Self {
        Self {
            level,
            index,
            field_name: field_name.into(),
            is_final: false,
        }
    }

    pub fn terminal(field_name: impl Into<String>) -> Self {
        Self {
            level: 0,
            index: 0,
            field_name: field_name.into(),
            is_final: true,
        }
    }
}

/// A reference field feeding a target, with an optional edge label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefField {
    #[serde(flatten)]
    pub field: FieldRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl RefField {
    pub fn new(field: FieldRef) -> Self {
        Self { field, label: None }
    }

    pub fn labeled(field: FieldRef, label: impl Into<String>) -> Self {
        Self {
            field,
            label: Some(label.into()),
        }
    }
}

/// One statement that a target field derives from zero or more reference fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageRecord {
    pub target_field: FieldRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_fields: Option<Vec<RefField>>,
}

impl LineageRecord {
    pub fn new(target_field: FieldRef) -> Self {
        Self {
            target_field,
            ref_fields: None,
        }
    }

    pub fn with_refs(target_field: FieldRef, refs: Vec<RefField>) -> Self {
        Self {
            target_field,
            ref_fields: Some(refs),
        }
    }

    pub fn refs(&self) -> &[RefField] {
        self.ref_fields.as_deref().unwrap_or_default()
    }
}

use serde::{Deserialize, Serialize};

/// Identifier of a placed field. Rendered containers use `field-{id}` as
/// their element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub i64);

impl FieldId {
    pub fn dom_id(self) -> String {
        format!("field-{}", self.0)
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    Signature,
    FreeSignature,
    Initials,
    Name,
    Email,
    Date,
    Text,
    Number,
    Radio,
    Checkbox,
    Dropdown,
}

impl FieldType {
    /// Checkbox and radio groups size themselves to their options.
    pub fn auto_sizes(self) -> bool {
        matches!(self, FieldType::Checkbox | FieldType::Radio)
    }

    pub fn is_signature(self) -> bool {
        matches!(self, FieldType::Signature | FieldType::FreeSignature)
    }
}

/// Advanced field settings. Keys this crate does not interpret are kept in
/// `extra` so records survive a round trip untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Where a field actually ended up when it was signed.
///
/// Only honoured when both components are present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSignedPosition {
    #[serde(default)]
    pub field_signed_position_x: Option<f64>,
    #[serde(default)]
    pub field_signed_position_y: Option<f64>,
}

impl FieldSignedPosition {
    pub fn coords(&self) -> Option<PercentCoords> {
        match (self.field_signed_position_x, self.field_signed_position_y) {
            (Some(x), Some(y)) => Some(PercentCoords { x, y }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    /// 1-based page number.
    pub page: u32,
    pub position_x: f64,
    pub position_y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub inserted: bool,
    #[serde(default)]
    pub field_meta: Option<FieldMeta>,
    #[serde(default)]
    pub field_signed_position: Option<FieldSignedPosition>,
}

impl Field {
    pub fn width_percent(&self) -> f64 {
        non_negative(self.width)
    }

    pub fn height_percent(&self) -> f64 {
        non_negative(self.height)
    }

    pub fn size_percent(&self) -> PercentCoords {
        PercentCoords {
            x: self.width_percent(),
            y: self.height_percent(),
        }
    }

    /// Position to display before any interaction: the signed position when
    /// it is fully recorded, the design position otherwise.
    pub fn initial_percent(&self) -> PercentCoords {
        self.field_signed_position
            .as_ref()
            .and_then(FieldSignedPosition::coords)
            .unwrap_or(PercentCoords {
                x: self.position_x,
                y: self.position_y,
            })
    }

    /// Fields without settings are required by default.
    pub fn is_required(&self) -> bool {
        match &self.field_meta {
            None => true,
            Some(meta) => meta.required == Some(true),
        }
    }

    pub fn is_unsigned_and_required(&self) -> bool {
        self.is_required() && !self.inserted
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Position in percent of the page dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentCoords {
    pub x: f64,
    pub y: f64,
}

/// Screen-space box. Derived on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelCoords {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

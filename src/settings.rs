use crate::drag::DEFAULT_DRAG_THRESHOLD_PX;
use crate::files::StorageTransport;
use crate::registry::{PAGE_NUMBER_ATTRIBUTE, VALIDATE_ATTRIBUTE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the logger is initialised at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving a copy of the log output.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Pointer travel in pixels before a press on a field counts as a drag.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold_px: f64,
    /// Maximum accepted upload size in megabytes.
    #[serde(default = "default_upload_size_limit")]
    pub upload_size_limit_mb: u64,
    #[serde(default)]
    pub storage_transport: StorageTransport,
    /// Attribute carrying the page number on rendered page containers.
    #[serde(default = "default_page_number_attribute")]
    pub page_number_attribute: String,
    /// Attribute toggled on field containers to re-run validity styling.
    #[serde(default = "default_validate_attribute")]
    pub validate_attribute: String,
}

fn default_drag_threshold() -> f64 {
    DEFAULT_DRAG_THRESHOLD_PX
}

fn default_upload_size_limit() -> u64 {
    50
}

fn default_page_number_attribute() -> String {
    PAGE_NUMBER_ATTRIBUTE.to_string()
}

fn default_validate_attribute() -> String {
    VALIDATE_ATTRIBUTE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            drag_threshold_px: default_drag_threshold(),
            upload_size_limit_mb: default_upload_size_limit(),
            storage_transport: StorageTransport::default(),
            page_number_attribute: default_page_number_attribute(),
            validate_attribute: default_validate_attribute(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Settings = serde_json::from_str(&content)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Drag threshold to use, falling back to the default for values that
    /// cannot be a distance.
    pub fn drag_threshold(&self) -> f64 {
        if self.drag_threshold_px.is_finite() && self.drag_threshold_px >= 0.0 {
            self.drag_threshold_px
        } else {
            tracing::warn!(
                "drag threshold {} is invalid; using default {}",
                self.drag_threshold_px,
                DEFAULT_DRAG_THRESHOLD_PX
            );
            DEFAULT_DRAG_THRESHOLD_PX
        }
    }

    fn sanitize(&mut self) {
        self.drag_threshold_px = self.drag_threshold();
        if self.page_number_attribute.trim().is_empty() {
            self.page_number_attribute = default_page_number_attribute();
        }
        if self.validate_attribute.trim().is_empty() {
            self.validate_attribute = default_validate_attribute();
        }
    }
}

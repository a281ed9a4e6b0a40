//! Policy-as-data configuration for new pages and interactive splits.
//!
//! # Loading
//!
//! ```toml
//! # folio.toml
//! page_width = 794
//! page_height = 1123
//! divider_thickness = 6.0
//! ```
//!
//! ```rust,ignore
//! let policy = LayoutPolicy::from_toml_file("folio.toml")?;
//! let policy = LayoutPolicy::from_json_str(json)?.validated()?;
//! ```
//!
//! Missing keys fall back to [`LayoutPolicy::default`].

#[cfg(feature = "policy-config")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::node::{DEFAULT_RATIO, MAX_RATIO, MIN_RATIO, Ratio};

/// US letter width at 96 DPI.
pub const DEFAULT_PAGE_WIDTH: u32 = 816;

/// US letter height at 96 DPI.
pub const DEFAULT_PAGE_HEIGHT: u32 = 1056;

/// Divider strip width in page units.
pub const DEFAULT_DIVIDER_THICKNESS: f64 = 4.0;

/// Tunables for a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPolicy {
    /// Width of newly created pages. Default: 816.
    pub page_width: u32,
    /// Height of newly created pages. Default: 1056.
    pub page_height: u32,
    /// Share given to the first child of a split created by a drop. Clamped to
    /// `[0.1, 0.9]` when applied. Default: 0.5.
    pub split_ratio: f64,
    /// Width of divider strips. Default: 4.0.
    pub divider_thickness: f64,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            page_height: DEFAULT_PAGE_HEIGHT,
            split_ratio: DEFAULT_RATIO,
            divider_thickness: DEFAULT_DIVIDER_THICKNESS,
        }
    }
}

impl LayoutPolicy {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, PolicyConfigError> {
        toml::from_str(s).map_err(PolicyConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, PolicyConfigError> {
        serde_json::from_str(s).map_err(PolicyConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PolicyConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.page_width == 0 {
            errors.push("page_width must be > 0".into());
        }
        if self.page_height == 0 {
            errors.push("page_height must be > 0".into());
        }
        if !self.split_ratio.is_finite() {
            errors.push(format!(
                "split_ratio must be a finite number, got {}",
                self.split_ratio
            ));
        } else if !(MIN_RATIO..=MAX_RATIO).contains(&self.split_ratio) {
            errors.push(format!(
                "split_ratio must be in [{MIN_RATIO}, {MAX_RATIO}], got {}",
                self.split_ratio
            ));
        }
        if !self.divider_thickness.is_finite() || self.divider_thickness < 0.0 {
            errors.push(format!(
                "divider_thickness must be >= 0, got {}",
                self.divider_thickness
            ));
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) reports nothing.
    pub fn validated(self) -> Result<Self, PolicyConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(PolicyConfigError::Validation(errors))
        }
    }

    /// Ratio for splits created by drops.
    #[must_use]
    pub fn split_ratio(&self) -> Ratio {
        Ratio::new(self.split_ratio).unwrap_or(Ratio::HALF)
    }
}

/// Errors that can occur when loading a policy configuration.
#[derive(Debug)]
pub enum PolicyConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for PolicyConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for PolicyConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_letter_at_even_ratio() {
        let policy = LayoutPolicy::default();
        assert_eq!((policy.page_width, policy.page_height), (816, 1056));
        assert_eq!(policy.split_ratio(), Ratio::HALF);
        assert_eq!(policy.divider_thickness, 4.0);
        assert!(policy.validate().is_empty());
    }

    #[test]
    fn validate_catches_zero_page() {
        let policy = LayoutPolicy {
            page_width: 0,
            ..LayoutPolicy::default()
        };
        let errors = policy.validate();
        assert!(errors.iter().any(|e| e.contains("page_width")));
    }

    #[test]
    fn validate_catches_bad_ratio() {
        let policy = LayoutPolicy {
            split_ratio: 0.95,
            ..LayoutPolicy::default()
        };
        assert!(policy.validate().iter().any(|e| e.contains("split_ratio")));
        let policy = LayoutPolicy {
            split_ratio: f64::NAN,
            ..LayoutPolicy::default()
        };
        assert!(policy.validate().iter().any(|e| e.contains("finite")));
        assert_eq!(policy.split_ratio(), Ratio::HALF);
    }

    #[test]
    fn validate_catches_negative_divider() {
        let policy = LayoutPolicy {
            divider_thickness: -1.0,
            ..LayoutPolicy::default()
        };
        let err = policy.validated().expect_err("invalid");
        assert!(err.to_string().starts_with("validation errors: divider_thickness"));
    }

    #[test]
    fn out_of_range_ratio_is_clamped_on_use() {
        let policy = LayoutPolicy {
            split_ratio: 0.95,
            ..LayoutPolicy::default()
        };
        assert_eq!(policy.split_ratio().get(), MAX_RATIO);
    }
}

//! Model descriptor
//!
//! The device model declares which kernel and gadget the device boots, which
//! packages it must carry, and whether it is a classic system.

use serde::{Deserialize, Serialize};

use super::assertion::{Assertion, AssertionError, AssertionType};

/// Immutable, validated view of a model assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModelDescriptor {
    /// Assertion series
    pub series: String,
    /// Brand account id
    pub brand_id: String,
    /// Model name within the brand
    pub model: String,
    /// Whether this model describes a classic system
    #[serde(default)]
    pub classic: bool,
    /// Kernel package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel: Option<String>,
    /// Gadget package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gadget: Option<String>,
    /// Packages the device must always carry
    #[serde(default, rename = "required-packages")]
    pub required: Vec<String>,
}

impl ModelDescriptor {
    /// Decode a model descriptor from a model assertion
    pub fn from_assertion(assertion: &Assertion) -> Result<Self, AssertionError> {
        if assertion.assertion_type != AssertionType::Model {
            return Err(AssertionError::WrongType {
                expected: AssertionType::Model,
                actual: assertion.assertion_type,
            });
        }

        // Only the headers this type knows about are read; the rest are ignored.
        let headers = serde_json::Value::Object(
            assertion.headers.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        );
        let mut model: Self =
            serde_json::from_value(headers).map_err(|source| AssertionError::InvalidHeaders {
                assertion_type: AssertionType::Model,
                source,
            })?;

        // An empty kernel/gadget header means "none".
        model.kernel = model.kernel.filter(|k| !k.is_empty());
        model.gadget = model.gadget.filter(|g| !g.is_empty());
        Ok(model)
    }

    /// Kernel package name, if the model names one
    #[must_use]
    pub fn kernel(&self) -> Option<&str> {
        self.kernel.as_deref()
    }

    /// Gadget package name, if the model names one
    #[must_use]
    pub fn gadget(&self) -> Option<&str> {
        self.gadget.as_deref()
    }

    /// Whether a package is in the model's required set
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

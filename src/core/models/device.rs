//! Device identity and build mode

use serde::{Deserialize, Serialize};

/// Persisted identity of this device, bound to a brand and model on first boot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Brand account id
    #[serde(default)]
    pub brand: String,
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Serial number, if one has been issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
}

/// How the running system was built
///
/// Classic systems may legitimately boot without any seed, so for them a
/// missing trust directory or manifest is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildMode {
    /// Traditional distribution with packages layered on top
    Classic,
    /// System composed entirely of packages
    #[default]
    PackageBased,
}

impl BuildMode {
    /// Whether seeding is optional in this mode
    #[must_use]
    pub const fn seed_optional(self) -> bool {
        matches!(self, Self::Classic)
    }

    /// Whether this mode is classic
    #[must_use]
    pub const fn is_classic(self) -> bool {
        matches!(self, Self::Classic)
    }
}

impl std::str::FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "package-based" | "packages" | "all-packages" => Ok(Self::PackageBased),
            _ => Err(format!("Unknown build mode: {s}. Use 'classic' or 'package-based'")),
        }
    }
}

impl std::fmt::Display for BuildMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classic => write!(f, "classic"),
            Self::PackageBased => write!(f, "package-based"),
        }
    }
}

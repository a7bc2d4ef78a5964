//! Configuration file parsing
//!
//! Configuration is an optional TOML file:
//!
//! ```toml
//! programmer = "internal"
//! variant = "blue"
//! led = "green"
//!
//! [images]
//! gold = "xenium_os/xenium_gold.bin"
//! blue = "xenium_os/xenium_blue.bin"
//! ice = "xenium_os/xenium_ice.bin"
//! ```
//!
//! Every key is optional. Missing image paths fall back to
//! [`Variant::default_image_path`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::string::String;

use crate::led::Led;

/// Name of the configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "xenflash.toml";

/// Errors reading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unknown values
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Firmware build flavours shipped for the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Gold
    Gold,
    /// Blue
    #[default]
    Blue,
    /// Ice
    Ice,
}

impl Variant {
    /// All variants
    pub const ALL: [Variant; 3] = [Variant::Gold, Variant::Blue, Variant::Ice];

    /// Lower-case name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Blue => "blue",
            Self::Ice => "ice",
        }
    }

    /// Image path used when the configuration does not name one
    pub fn default_image_path(self) -> PathBuf {
        PathBuf::from(format!("xenium_os/xenium_{}.bin", self.name()))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown variant '{}' (expected gold, blue or ice)", s))
    }
}

/// Image path overrides, one per variant
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImagePaths {
    /// Gold image
    pub gold: Option<PathBuf>,
    /// Blue image
    pub blue: Option<PathBuf>,
    /// Ice image
    pub ice: Option<PathBuf>,
}

/// Parsed configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Programmer string, e.g. `internal` or `dummy:genuine=yes`
    pub programmer: Option<String>,
    /// Variant written when none is given on the command line
    #[serde(default)]
    pub variant: Variant,
    /// LED colour shown after a successful session
    pub led: Option<Led>,
    /// Image path overrides
    #[serde(default)]
    pub images: ImagePaths,
}

impl Config {
    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise [`DEFAULT_CONFIG_FILE`] if it exists
    ///
    /// An explicitly named file must exist. A missing default file yields
    /// the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Image file for a variant
    pub fn image_path(&self, variant: Variant) -> PathBuf {
        let configured = match variant {
            Variant::Gold => &self.images.gold,
            Variant::Blue => &self.images.blue,
            Variant::Ice => &self.images.ice,
        };
        configured
            .clone()
            .unwrap_or_else(|| variant.default_image_path())
    }
}

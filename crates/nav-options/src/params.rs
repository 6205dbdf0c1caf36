//! Option parameter values
//!
//! A [`Param`] wraps a single option value and remembers where it came from.
//! Parsing is lenient: a missing key, `null`, or a value of the wrong shape all
//! produce [`Param::Unset`] instead of failing the surrounding options.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::merge::{Merge, MergeMode};

// =============================================================================
// Param
// =============================================================================

/// A single, possibly unspecified, option value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Param<T> {
    /// No value was provided
    #[default]
    Unset,
    /// The value was provided explicitly on this node
    Set(T),
    /// The value was filled in from an ancestor or default options
    Inherited(T),
}

impl<T> Param<T> {
    /// Whether any value (explicit or inherited) is present
    pub fn has_value(&self) -> bool {
        !matches!(self, Param::Unset)
    }

    /// Whether no value is present
    pub fn is_unset(&self) -> bool {
        matches!(self, Param::Unset)
    }

    /// Whether the value was set explicitly on this node
    pub fn is_explicit(&self) -> bool {
        matches!(self, Param::Set(_))
    }

    /// Borrow the value, if any
    pub fn get(&self) -> Option<&T> {
        match self {
            Param::Unset => None,
            Param::Set(value) | Param::Inherited(value) => Some(value),
        }
    }

    /// Take the value out, if any
    pub fn into_option(self) -> Option<T> {
        match self {
            Param::Unset => None,
            Param::Set(value) | Param::Inherited(value) => Some(value),
        }
    }
}

impl<T: Clone> Param<T> {
    /// The value, or `default` when unset
    pub fn get_or(&self, default: T) -> T {
        self.get().cloned().unwrap_or(default)
    }
}

impl Param<bool> {
    /// True only when a value is present and it is `true`
    pub fn is_true(&self) -> bool {
        matches!(self, Param::Set(true) | Param::Inherited(true))
    }

    /// True only when a value is present and it is `false`
    pub fn is_false(&self) -> bool {
        matches!(self, Param::Set(false) | Param::Inherited(false))
    }
}

impl<T> From<T> for Param<T> {
    fn from(value: T) -> Self {
        Param::Set(value)
    }
}

impl<T: Clone> Merge for Param<T> {
    fn merge(&mut self, other: &Self, mode: MergeMode) {
        match mode {
            MergeMode::Overlay => {
                if other.has_value() {
                    *self = other.clone();
                }
            }
            MergeMode::FillDefaults => {
                if let (Param::Unset, Some(value)) = (&*self, other.get()) {
                    *self = Param::Inherited(value.clone());
                }
            }
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Param<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Param::Unset);
        }
        match serde_json::from_value(value) {
            Ok(parsed) => Ok(Param::Set(parsed)),
            Err(e) => {
                tracing::debug!("Ignoring malformed option value: {}", e);
                Ok(Param::Unset)
            }
        }
    }
}

/// Deserialize a nested section, falling back to its default when malformed
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Boolean option
pub type Bool = Param<bool>;

/// Text option
pub type Text = Param<String>;

/// Integer option (durations, sizes, indices)
pub type Number = Param<i32>;

/// Floating point option
pub type Fraction = Param<f64>;

/// Color option
pub type Colour = Param<Color>;

// =============================================================================
// Color
// =============================================================================

/// A native color, as packed ARGB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Create a color from ARGB components
    pub fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color(u32::from_be_bytes([a, r, g, b]))
    }

    /// Alpha component
    pub fn alpha(&self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    /// Whether the color is fully transparent
    pub fn is_transparent(&self) -> bool {
        self.alpha() == 0
    }
}

// =============================================================================
// Images
// =============================================================================

/// An image asset resolved from a bundled resource handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAsset {
    /// Location of the image
    pub uri: String,
    /// Width in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Pixel density
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// An image reference used by icons and backgrounds
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageSource {
    /// Plain uri or system image name
    Uri(String),
    /// Asset resolved by the options processor
    Asset(ResolvedAsset),
}

impl ImageSource {
    /// The uri this image points at
    pub fn uri(&self) -> &str {
        match self {
            ImageSource::Uri(uri) => uri,
            ImageSource::Asset(asset) => &asset.uri,
        }
    }
}

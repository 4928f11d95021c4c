//! Setting definitions and per-setting validation.
//!
//! Values are always carried as text. A setting never parses its value
//! eagerly; `is_valid` only checks that the text would be accepted by the
//! engine for the declared type, so whatever literal was stored is what gets
//! written back out.

use serde::{Deserialize, Serialize};

/// Literals accepted for a Boolean setting. Case-sensitive.
pub const BOOLEAN_LITERALS: [&str; 4] = ["0", "1", "True", "False"];

/// Declared type of a setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingValueType {
    Boolean,
    Integer,
    Float,
    String,
    /// Ordered set of allowed literals.
    Enum(Vec<String>),
}

impl SettingValueType {
    /// Storage tag used by persistence adapters ("Boolean", "Enum", ...).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::String => "String",
            Self::Enum(_) => "Enum",
        }
    }

    /// Rebuild a value type from its storage tag.
    ///
    /// Unknown tags, and `Enum` without options, degrade to `String`.
    pub fn from_tag(tag: &str, enum_options: Option<Vec<String>>) -> Self {
        match tag {
            "Boolean" => Self::Boolean,
            "Integer" => Self::Integer,
            "Float" => Self::Float,
            "Enum" => match enum_options {
                Some(options) => Self::Enum(options),
                None => Self::String,
            },
            _ => Self::String,
        }
    }

    /// Human-readable acceptance rule, used in validation messages.
    pub fn rule(&self) -> String {
        match self {
            Self::Boolean => format!("boolean (one of {})", BOOLEAN_LITERALS.join(", ")),
            Self::Integer => "integer".to_string(),
            Self::Float => "float".to_string(),
            Self::String => "any text".to_string(),
            Self::Enum(options) => format!("one of {}", options.join(", ")),
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Boolean => BOOLEAN_LITERALS.contains(&value),
            Self::Integer => value.parse::<i64>().is_ok(),
            Self::Float => value.parse::<f64>().is_ok(),
            Self::String => true,
            Self::Enum(options) => options.iter().any(|o| o == value),
        }
    }
}

/// Result of the advisory min/max check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsCheck {
    /// No bounds declared, or not a numeric setting.
    Unbounded,
    Within,
    BelowMin,
    AboveMax,
    /// Value or bound did not parse as a number.
    NotNumeric,
}

/// One tunable engine value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub name: String,
    pub section: String,
    pub description: String,
    pub value_type: SettingValueType,
    pub current_value: String,
    pub default_value: String,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
    /// Classification tag ("Performance", "Visual", ...). Descriptive only.
    pub impact: String,
}

impl Setting {
    /// Build a setting whose current value starts at its default.
    pub fn new(
        section: impl Into<String>,
        name: impl Into<String>,
        value_type: SettingValueType,
        default_value: impl Into<String>,
    ) -> Self {
        let default_value = default_value.into();
        Self {
            name: name.into(),
            section: section.into(),
            description: String::new(),
            value_type,
            current_value: default_value.clone(),
            default_value,
            min_value: None,
            max_value: None,
            impact: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_bounds(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.min_value = Some(min.into());
        self.max_value = Some(max.into());
        self
    }

    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = impact.into();
        self
    }

    pub fn with_current(mut self, value: impl Into<String>) -> Self {
        self.current_value = value.into();
        self
    }

    /// `section.name`, the identity used by presets.
    pub fn qualified_key(&self) -> String {
        qualified_key(&self.section, &self.name)
    }

    pub fn is_valid(&self, value: &str) -> bool {
        self.value_type.accepts(value)
    }

    pub fn enum_options(&self) -> Option<&[String]> {
        match &self.value_type {
            SettingValueType::Enum(options) => Some(options),
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.current_value == self.default_value
    }

    /// Advisory bounds check for Integer/Float settings. Never clamps.
    pub fn check_bounds(&self, value: &str) -> BoundsCheck {
        if !matches!(self.value_type, SettingValueType::Integer | SettingValueType::Float) {
            return BoundsCheck::Unbounded;
        }
        if self.min_value.is_none() && self.max_value.is_none() {
            return BoundsCheck::Unbounded;
        }
        let Ok(v) = value.parse::<f64>() else {
            return BoundsCheck::NotNumeric;
        };
        let parse_bound = |b: &Option<String>| -> Result<Option<f64>, ()> {
            match b {
                Some(s) => s.parse::<f64>().map(Some).map_err(|_| ()),
                None => Ok(None),
            }
        };
        let (Ok(min), Ok(max)) = (parse_bound(&self.min_value), parse_bound(&self.max_value)) else {
            return BoundsCheck::NotNumeric;
        };
        match (min, max) {
            (Some(min), _) if v < min => BoundsCheck::BelowMin,
            (_, Some(max)) if v > max => BoundsCheck::AboveMax,
            _ => BoundsCheck::Within,
        }
    }
}

/// Join a section and a setting name into a qualified key.
pub fn qualified_key(section: &str, name: &str) -> String {
    format!("{section}.{name}")
}

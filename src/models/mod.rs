use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Two-valued selector sent to the prediction service as 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Flag {
    #[default]
    No,
    Yes,
}

impl Flag {
    /// Flip to the other value. Applying it twice yields the original flag.
    pub fn toggle(self) -> Self {
        match self {
            Flag::No => Flag::Yes,
            Flag::Yes => Flag::No,
        }
    }

    pub fn is_set(self) -> bool {
        self == Flag::Yes
    }
}

impl From<Flag> for u8 {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::No => 0,
            Flag::Yes => 1,
        }
    }
}

impl TryFrom<u8> for Flag {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Flag::No),
            1 => Ok(Flag::Yes),
            other => Err(format!("flag must be 0 or 1, got {}", other)),
        }
    }
}

/// Furnishing status, encoded with the service's own strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Furnishing {
    #[default]
    #[serde(rename = "vazio")]
    Unfurnished,
    #[serde(rename = "semi-mobiliado")]
    SemiFurnished,
    #[serde(rename = "mobiliado")]
    Furnished,
}

impl Furnishing {
    pub const ALL: [Furnishing; 3] = [
        Furnishing::Unfurnished,
        Furnishing::SemiFurnished,
        Furnishing::Furnished,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Furnishing::Unfurnished => "vazio",
            Furnishing::SemiFurnished => "semi-mobiliado",
            Furnishing::Furnished => "mobiliado",
        }
    }
}

impl fmt::Display for Furnishing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Furnishing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Furnishing::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "must be one of: {}",
                    Furnishing::ALL.map(Furnishing::as_str).join(", ")
                )
            })
    }
}

/// Validated property attributes, i.e. the prediction payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAttributes {
    #[serde(serialize_with = "serialize_area")]
    pub area: f64,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub stories: u8,
    pub mainroad: Flag,
    pub guestroom: Flag,
    pub basement: Flag,
    pub hotwaterheating: Flag,
    pub airconditioning: Flag,
    pub parking: u8,
    pub prefarea: Flag,
    pub furnishingstatus: Furnishing,
}

/// Whole areas go out as integers, which is what the service expects
fn serialize_area<S: Serializer>(area: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if area.fract() == 0.0 && area.abs() < 1e15 {
        serializer.serialize_i64(*area as i64)
    } else {
        serializer.serialize_f64(*area)
    }
}

/// Value of a single feature reported back by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers print without the trailing ".0"
            FeatureValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FeatureValue::Number(n) => write!(f, "{}", n),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

/// A price estimate returned by the prediction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Currency-formatted price, e.g. "R$ 450.000,00"
    pub formatted_price: String,
    /// Free-text confidence label, e.g. "Alta"
    pub confidence: String,
    /// Raw numeric estimate, when the service reports one
    pub price: Option<f64>,
    /// Inputs or derived factors the estimate was computed from
    pub features: Option<BTreeMap<String, FeatureValue>>,
    pub received_at: DateTime<Utc>,
}

impl PredictionResult {
    pub fn confidence_tier(&self) -> ConfidenceTier {
        ConfidenceTier::classify(&self.confidence)
    }
}

/// Presentation tier derived from the confidence label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Unknown,
}

impl ConfidenceTier {
    /// Case-insensitive substring match on the known labels.
    /// High wins over Medium when a label somehow contains both.
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("alta") || label.contains("high") {
            ConfidenceTier::High
        } else if label.contains("média") || label.contains("medium") {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Unknown
        }
    }
}

use serde::{Deserialize, Serialize};

/// How an attribute's value is encoded, as far as stepping is concerned.
///
/// Percentage values are multipliers around 1.0 (`1.25` is +25%). Inverted percentages are
/// also multipliers around 1.0 but improve toward 0 (`0.8` is 20% faster).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "FormatRepr", into = "String")]
pub enum DescriptionFormat {
    #[default]
    Linear,
    Percentage,
    InvertedPercentage,
}

impl DescriptionFormat {
    /// Maps the schema's numeric description-format code. Only the two percentage codes
    /// are special; additive, additive-percentage, date and the rest step linearly.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Percentage,
            1 => Self::InvertedPercentage,
            _ => Self::Linear,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "value_is_percentage" | "percentage" => Self::Percentage,
            "value_is_inverted_percentage" | "inverted_percentage" => Self::InvertedPercentage,
            _ => Self::Linear,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "value_is_additive",
            Self::Percentage => "value_is_percentage",
            Self::InvertedPercentage => "value_is_inverted_percentage",
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, Self::Percentage | Self::InvertedPercentage)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormatRepr {
    Code(i64),
    Name(String),
}

impl From<FormatRepr> for DescriptionFormat {
    fn from(repr: FormatRepr) -> Self {
        match repr {
            FormatRepr::Code(code) => Self::from_code(code),
            FormatRepr::Name(name) => Self::from_name(&name),
        }
    }
}

impl From<DescriptionFormat> for String {
    fn from(format: DescriptionFormat) -> Self {
        format.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_names_map_to_the_same_formats() {
        assert_eq!(DescriptionFormat::from_code(0), DescriptionFormat::Percentage);
        assert_eq!(
            DescriptionFormat::from_code(1),
            DescriptionFormat::InvertedPercentage
        );
        assert_eq!(DescriptionFormat::from_code(2), DescriptionFormat::Linear);
        assert_eq!(DescriptionFormat::from_code(9), DescriptionFormat::Linear);
        assert_eq!(
            DescriptionFormat::from_name("value_is_inverted_percentage"),
            DescriptionFormat::InvertedPercentage
        );
        assert_eq!(
            DescriptionFormat::from_name("value_is_additive_percentage"),
            DescriptionFormat::Linear
        );
    }

    #[test]
    fn deserializes_from_either_representation() {
        let by_code: DescriptionFormat = serde_json::from_str("1").unwrap();
        let by_name: DescriptionFormat = serde_json::from_str("\"value_is_percentage\"").unwrap();
        assert_eq!(by_code, DescriptionFormat::InvertedPercentage);
        assert_eq!(by_name, DescriptionFormat::Percentage);
        assert_eq!(
            serde_json::to_string(&DescriptionFormat::Percentage).unwrap(),
            "\"value_is_percentage\""
        );
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A hospitality business category supported by the analysis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cafe,
    Restaurant,
    Hotel,
    Hostel,
}

impl Category {
    /// The place-type vocabulary used by the mapping provider for this
    /// category. Hotels and hostels share the provider's `lodging` type.
    #[must_use]
    pub const fn place_type(self) -> &'static str {
        match self {
            Self::Cafe => "cafe",
            Self::Restaurant => "restaurant",
            Self::Hotel | Self::Hostel => "lodging",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cafe => "cafe",
            Self::Restaurant => "restaurant",
            Self::Hotel => "hotel",
            Self::Hostel => "hostel",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cafe" => Ok(Self::Cafe),
            "restaurant" => Ok(Self::Restaurant),
            "hotel" => Ok(Self::Hotel),
            "hostel" => Ok(Self::Hostel),
            other => Err(CoreError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_type_maps_lodging_categories() {
        assert_eq!(Category::Hotel.place_type(), "lodging");
        assert_eq!(Category::Hostel.place_type(), "lodging");
        assert_eq!(Category::Cafe.place_type(), "cafe");
        assert_eq!(Category::Restaurant.place_type(), "restaurant");
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("Cafe".parse::<Category>().unwrap(), Category::Cafe);
        assert_eq!(" HOSTEL ".parse::<Category>().unwrap(), Category::Hostel);
    }

    #[test]
    fn from_str_rejects_unknown_category() {
        let err = "bakery".parse::<Category>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownCategory(ref s) if s == "bakery"));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Category::Restaurant).unwrap();
        assert_eq!(json, "\"restaurant\"");
        let parsed: Category = serde_json::from_str("\"hostel\"").unwrap();
        assert_eq!(parsed, Category::Hostel);
    }
}

//! Actuarial category keys identifying which life table applies to a person

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TableLoadError;

/// Gender used for table selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Hombre,
    Mujer,
}

/// Validity status used for table selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Valid (not disabled) lives
    #[serde(rename = "No_Invalido")]
    NoInvalido,
    /// Disabled lives
    Invalido,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Hombre => "Hombre",
            Gender::Mujer => "Mujer",
        }
    }
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::NoInvalido => "No_Invalido",
            Condition::Invalido => "Invalido",
        }
    }
}

/// Table category, rendered as `<Gender>_<Condition>` (e.g. `Hombre_No_Invalido`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableKey {
    pub gender: Gender,
    pub condition: Condition,
}

impl TableKey {
    pub fn new(gender: Gender, condition: Condition) -> Self {
        Self { gender, condition }
    }

    /// All four categories a complete table set provides
    pub fn all() -> [TableKey; 4] {
        [
            TableKey::new(Gender::Hombre, Condition::NoInvalido),
            TableKey::new(Gender::Hombre, Condition::Invalido),
            TableKey::new(Gender::Mujer, Condition::NoInvalido),
            TableKey::new(Gender::Mujer, Condition::Invalido),
        ]
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.gender.as_str(), self.condition.as_str())
    }
}

impl FromStr for TableKey {
    type Err = TableLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (gender, condition) = s
            .split_once('_')
            .ok_or_else(|| TableLoadError::UnknownKey(s.to_string()))?;

        let gender = match gender {
            "Hombre" => Gender::Hombre,
            "Mujer" => Gender::Mujer,
            _ => return Err(TableLoadError::UnknownKey(s.to_string())),
        };
        let condition = match condition {
            "No_Invalido" => Condition::NoInvalido,
            "Invalido" => Condition::Invalido,
            _ => return Err(TableLoadError::UnknownKey(s.to_string())),
        };

        Ok(TableKey::new(gender, condition))
    }
}

impl TryFrom<String> for TableKey {
    type Error = TableLoadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TableKey> for String {
    fn from(key: TableKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trips_through_string() {
        for key in TableKey::all() {
            let parsed: TableKey = key.to_string().parse().unwrap();
            assert_eq!(parsed, key);
        }
        assert_eq!(
            TableKey::new(Gender::Hombre, Condition::NoInvalido).to_string(),
            "Hombre_No_Invalido"
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!("Hombre".parse::<TableKey>().is_err());
        assert!("Otro_Invalido".parse::<TableKey>().is_err());
        assert!("Mujer_Valido".parse::<TableKey>().is_err());
    }

    #[test]
    fn test_key_serializes_as_string() {
        let key = TableKey::new(Gender::Mujer, Condition::Invalido);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"Mujer_Invalido\"");
        let back: TableKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::validation::null_as_empty;

/// Student profile completion form, every field raw as typed by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFormData {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nome: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cognome: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub codice_fiscale: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data_nascita: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub telefono: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub indirizzo: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub citta: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub provincia: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cap: String,
}

/// Normalized profile, produced only when every field passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFormValues {
    pub nome: String,
    pub cognome: String,
    pub codice_fiscale: String,
    pub data_nascita: NaiveDate,
    pub telefono: String,
    pub indirizzo: String,
    pub citta: String,
    pub provincia: String,
    pub cap: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    Padre,
    Madre,
    TutoreLegale,
    Altro,
}

impl Relationship {
    pub const ALL: [Relationship; 4] = [
        Relationship::Padre,
        Relationship::Madre,
        Relationship::TutoreLegale,
        Relationship::Altro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::Padre => "PADRE",
            Relationship::Madre => "MADRE",
            Relationship::TutoreLegale => "TUTORE_LEGALE",
            Relationship::Altro => "ALTRO",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Relationship::ALL
            .into_iter()
            .find(|r| r.as_str() == wanted)
            .ok_or_else(|| format!("Unknown relationship: {}", s))
    }
}

/// Parent or legal guardian attached to a minor student.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentGuardianFormData {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub relationship: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nome: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cognome: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub codice_fiscale: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub telefono: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub indirizzo: Option<String>,
    #[serde(default)]
    pub citta: Option<String>,
    #[serde(default)]
    pub provincia: Option<String>,
    #[serde(default)]
    pub cap: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentGuardianValues {
    pub relationship: Relationship,
    pub nome: String,
    pub cognome: String,
    pub codice_fiscale: String,
    pub telefono: String,
    pub email: Option<String>,
    pub indirizzo: Option<String>,
    pub citta: Option<String>,
    pub provincia: Option<String>,
    pub cap: Option<String>,
}

//! Tennis player domain model (`JOUEUR` table)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use validator::Validate;

/// Player sex, stored as a single character: `H` (homme) or `F` (femme)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    #[serde(rename = "H")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn code(self) -> char {
        match self {
            Sex::Male => 'H',
            Sex::Female => 'F',
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sex code '{0}', expected H or F")]
pub struct UnknownSexCode(pub String);

impl std::str::FromStr for Sex {
    type Err = UnknownSexCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "H" | "h" => Ok(Sex::Male),
            "F" | "f" => Ok(Sex::Female),
            other => Err(UnknownSexCode(other.to_string())),
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl sqlx::Type<sqlx::MySql> for Sex {
    fn type_info() -> sqlx::mysql::MySqlTypeInfo {
        <String as sqlx::Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &sqlx::mysql::MySqlTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::MySql>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::MySql> for Sex {
    fn decode(value: sqlx::mysql::MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::MySql>>::decode(value)?;
        Ok(s.parse()?)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::MySql> for Sex {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<u8>,
    ) -> Result<sqlx::encode::IsNull, Box<dyn std::error::Error + Send + Sync>> {
        <String as sqlx::Encode<sqlx::MySql>>::encode_by_ref(&self.code().to_string(), buf)
    }
}

/// Row of the `JOUEUR` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct Player {
    #[sqlx(rename = "ID")]
    pub id: i64,
    #[sqlx(rename = "NOM")]
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[sqlx(rename = "PRENOM")]
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[sqlx(rename = "SEXE")]
    pub sex: Sex,
}

impl Player {
    pub fn new(last_name: impl Into<String>, first_name: impl Into<String>, sex: Sex) -> Self {
        Self {
            id: 0,
            last_name: last_name.into(),
            first_name: first_name.into(),
            sex,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} {} ({})",
            self.id, self.last_name, self.first_name, self.sex
        )
    }
}

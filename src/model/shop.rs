use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use eyre::Report;
use serde::{Deserialize, Serialize};

/// Storefront a game was acquired from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameShop {
    Steam,
    Epic,
    Custom,
}

impl GameShop {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Steam => "steam",
            Self::Epic => "epic",
            Self::Custom => "custom",
        }
    }
}

impl Display for GameShop {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameShop {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "steam" => Ok(Self::Steam),
            "epic" => Ok(Self::Epic),
            "custom" => Ok(Self::Custom),
            _ => Err(eyre!(
                "Failed to parse shop `{s}`; must be one of the following: steam, epic, custom"
            )),
        }
    }
}

use eyre::Report;
use serde::{Deserialize, Serialize};

use super::{GameShop, UserAchievement, UserPreferences};

/// Single line of input in serve mode.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    GetUnlockedAchievements { object_id: Box<str>, shop: GameShop },
    GetUserPreferences,
    UpdateUserPreferences(UserPreferences),
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Response {
    Ok { data: ResponseData },
    Error { message: String },
}

impl Response {
    pub fn error(err: &Report) -> Self {
        Self::Error {
            message: format!("{err:#}"),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Achievements(Vec<UserAchievement>),
    Preferences(UserPreferences),
}

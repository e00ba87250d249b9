use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Whether descriptions of hidden achievements are shown before unlocking them.
    pub show_hidden_achievements_description: bool,
}

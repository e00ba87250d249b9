use serde::{
    de::{Error as DeError, IgnoredAny, Unexpected},
    Deserialize, Deserializer, Serialize,
};

/// Achievement as described by the shop's catalog.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDefinition {
    pub name: Box<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<Box<str>>,
    #[serde(default)]
    pub description: Box<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_description: Option<Box<str>>,
    pub icon: Box<str>,
    #[serde(default)]
    pub icongray: Box<str>,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub hidden: bool,
}

impl AchievementDefinition {
    /// Icon to show while locked.
    ///
    /// Catalogs without a distinct locked icon provide a bare directory
    /// path, in which case the regular icon is used instead.
    pub fn locked_icon(&self) -> &str {
        if self.icongray.is_empty() || self.icongray.ends_with('/') {
            &self.icon
        } else {
            &self.icongray
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRecord {
    pub name: Box<str>,
    pub unlock_time: i64,
}

/// Locally cached unlock state of a single game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedGameAchievements {
    #[serde(default, deserialize_with = "skip_malformed")]
    pub unlocked_achievements: Vec<UnlockRecord>,
}

/// Catalog entry merged with the user's unlock state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAchievement {
    pub name: Box<str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<Box<str>>,
    /// `None` if the description is redacted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Box<str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_description: Option<Box<str>>,
    pub icon: Box<str>,
    pub icongray: Box<str>,
    pub hidden: bool,
    pub unlocked: bool,
    pub unlock_time: Option<i64>,
}

fn bool_or_int<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(d)? {
        Flag::Bool(flag) => Ok(flag),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(n) => Err(DeError::invalid_value(
            Unexpected::Signed(n),
            &"a boolean, 0, or 1",
        )),
    }
}

fn skip_malformed<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<UnlockRecord>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeRecord {
        Valid(UnlockRecord),
        Malformed(IgnoredAny),
    }

    let entries = Vec::<MaybeRecord>::deserialize(d)?;
    let total = entries.len();

    let records: Vec<_> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            MaybeRecord::Valid(record) => Some(record),
            MaybeRecord::Malformed(_) => None,
        })
        .collect();

    if records.len() < total {
        warn!(
            "Skipped {} malformed unlock record(s) out of {total}",
            total - records.len()
        );
    }

    Ok(records)
}

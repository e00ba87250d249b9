use std::{cmp::Ordering, collections::HashMap};

use crate::model::{AchievementDefinition, UnlockRecord, UserAchievement};

/// Merges a game's catalog with the locally cached unlocks.
///
/// Every catalog entry yields exactly one achievement and unlocks without
/// a catalog counterpart are dropped. Names are matched ignoring case; if
/// multiple unlocks share a name, the first one in cache order wins.
///
/// Descriptions of hidden achievements that are still locked are omitted
/// unless `disclose_hidden` is set.
///
/// Unlocked achievements come first, most recent unlock first, followed by
/// locked ones with visible achievements before hidden ones. Remaining ties
/// keep the catalog order.
pub fn reconcile(
    catalog: &[AchievementDefinition],
    unlocks: &[UnlockRecord],
    disclose_hidden: bool,
) -> Vec<UserAchievement> {
    let unlock_times = unlocks.iter().fold(
        HashMap::with_capacity(unlocks.len()),
        |mut unlock_times, record| {
            unlock_times
                .entry(record.name.to_uppercase())
                .or_insert(record.unlock_time);

            unlock_times
        },
    );

    let mut achievements: Vec<_> = catalog
        .iter()
        .map(|definition| {
            let unlock_time = unlock_times.get(&definition.name.to_uppercase()).copied();

            user_achievement(definition, unlock_time, disclose_hidden)
        })
        .collect();

    // must be stable so ties keep the catalog order
    achievements.sort_by(display_order);

    achievements
}

fn user_achievement(
    definition: &AchievementDefinition,
    unlock_time: Option<i64>,
    disclose_hidden: bool,
) -> UserAchievement {
    let unlocked = unlock_time.is_some();

    let description = (unlocked || !definition.hidden || disclose_hidden)
        .then(|| definition.description.clone());

    UserAchievement {
        name: definition.name.clone(),
        display_name: definition.display_name.clone(),
        description,
        hidden_description: definition.hidden_description.clone(),
        icon: definition.icon.clone(),
        icongray: definition.locked_icon().into(),
        hidden: definition.hidden,
        unlocked,
        unlock_time,
    }
}

fn display_order(a: &UserAchievement, b: &UserAchievement) -> Ordering {
    match (a.unlock_time, b.unlock_time) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.hidden.cmp(&b.hidden),
    }
}

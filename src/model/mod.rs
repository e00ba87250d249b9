pub use self::{
    achievement::{AchievementDefinition, CachedGameAchievements, UnlockRecord, UserAchievement},
    preferences::UserPreferences,
    request::{Request, Response, ResponseData},
    shop::GameShop,
};

mod achievement;
mod preferences;
mod request;
mod shop;

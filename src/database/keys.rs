use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::model::GameShop;

/// Names of the sublevels partitioning the key-value store.
pub struct Sublevels;

impl Sublevels {
    pub const GAME_SHOP_CACHE: &'static str = "gameShopCache";
    pub const GAME_ACHIEVEMENTS: &'static str = "gameAchievements";
}

/// Key of an entry within a sublevel.
///
/// Components are joined with `:`. Shops never contain the separator so
/// the first `:` always ends the shop, and language codes never contain
/// it either so the last `:` always starts the language. Object ids are
/// taken as they are, including any `:` of their own.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(Box<str>);

impl Key {
    const SEPARATOR: char = ':';

    /// Key of a game's entry, e.g. `steam:1091500`.
    pub fn game(shop: GameShop, object_id: &str) -> Self {
        Self(format!("{shop}{}{object_id}", Self::SEPARATOR).into_boxed_str())
    }

    /// Key of a game's localized shop data, e.g. `steam:1091500:en`.
    pub fn game_shop_cache_item(shop: GameShop, object_id: &str, language: &str) -> Self {
        let sep = Self::SEPARATOR;

        Self(format!("{shop}{sep}{object_id}{sep}{language}").into_boxed_str())
    }

    /// Wraps a key as it was read back from the store.
    pub(super) fn from_stored(key: String) -> Self {
        Self(key.into_boxed_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Key {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

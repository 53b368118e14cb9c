//! Simulation settings read from environment variables.

use std::env;
use std::path::PathBuf;

use power_core::{ItemRarity, ItemType};

/// Runtime options for one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Directory holding `affixes.ron`, `config.toml` and `derived.ron`.
    pub data_dir: PathBuf,
    pub seed: u64,
    pub items: usize,
    pub item_level: u32,
    pub rarity: ItemRarity,
    /// Fixed item type; `None` picks one at random per item.
    pub item_type: Option<ItemType>,
    /// Emit the report as JSON instead of text.
    pub json: bool,
}

impl SimConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "data";
    pub const DEFAULT_SEED: u64 = 42;
    pub const DEFAULT_ITEMS: usize = 5;
    pub const DEFAULT_ITEM_LEVEL: u32 = 60;
    pub const MAX_ITEMS: usize = 64;

    /// Load configuration from environment variables.
    ///
    /// | Variable           | Meaning                              |
    /// |--------------------|--------------------------------------|
    /// | `POWER_DATA_DIR`   | content directory                    |
    /// | `POWER_SEED`       | RNG seed                             |
    /// | `POWER_ITEMS`      | items to roll (1..=64)               |
    /// | `POWER_ITEM_LEVEL` | item level                           |
    /// | `POWER_RARITY`     | `normal` .. `mythic`                 |
    /// | `POWER_ITEM_TYPE`  | e.g. `sword`; random when unset      |
    /// | `POWER_JSON`       | `true` for JSON output               |
    ///
    /// Unparseable values are ignored in favour of the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).map(|value| value.trim().to_owned());

        if let Some(dir) = read("POWER_DATA_DIR").filter(|dir| !dir.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(seed) = parse(read("POWER_SEED")) {
            config.seed = seed;
        }
        if let Some(items) = parse::<usize>(read("POWER_ITEMS")) {
            config.items = items.clamp(1, Self::MAX_ITEMS);
        }
        if let Some(level) = parse(read("POWER_ITEM_LEVEL")) {
            config.item_level = level;
        }
        if let Some(rarity) = parse(read("POWER_RARITY")) {
            config.rarity = rarity;
        }
        config.item_type = parse(read("POWER_ITEM_TYPE"));

        // Setting the variable without a value also enables it
        match read("POWER_JSON") {
            Some(value) if value.is_empty() => config.json = true,
            value => {
                if let Some(json) = parse(value) {
                    config.json = json;
                }
            }
        }

        config
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(Self::DEFAULT_DATA_DIR),
            seed: Self::DEFAULT_SEED,
            items: Self::DEFAULT_ITEMS,
            item_level: Self::DEFAULT_ITEM_LEVEL,
            rarity: ItemRarity::Rare,
            item_type: None,
            json: false,
        }
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.parse().ok()
}

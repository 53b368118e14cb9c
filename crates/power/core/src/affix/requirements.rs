//! Item requirements gating affix eligibility.

use crate::item::{ItemSlot, ItemType};

/// Which items an affix may appear on.
///
/// Empty `item_types` / `slots` lists accept anything. A non-empty list
/// rejects an item whose type (or slot) is unknown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Requirements {
    pub min_level: u32,
    /// `None` means uncapped.
    pub max_level: Option<u32>,
    pub item_types: Vec<ItemType>,
    pub slots: Vec<ItemSlot>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level_range(mut self, min_level: u32, max_level: Option<u32>) -> Self {
        self.min_level = min_level;
        self.max_level = max_level;
        self
    }

    #[must_use]
    pub fn with_item_types(mut self, item_types: &[ItemType]) -> Self {
        self.item_types = item_types.to_vec();
        self
    }

    #[must_use]
    pub fn with_slots(mut self, slots: &[ItemSlot]) -> Self {
        self.slots = slots.to_vec();
        self
    }

    /// True when `item_level` falls inside the level window.
    pub fn accepts_level(&self, item_level: u32) -> bool {
        item_level >= self.min_level && self.max_level.is_none_or(|max| item_level <= max)
    }

    pub fn check(&self, item_type: Option<ItemType>, item_level: u32, slot: Option<ItemSlot>) -> bool {
        if !self.accepts_level(item_level) {
            return false;
        }
        if !self.item_types.is_empty()
            && !item_type.is_some_and(|item_type| self.item_types.contains(&item_type))
        {
            return false;
        }
        if !self.slots.is_empty() && !slot.is_some_and(|slot| self.slots.contains(&slot)) {
            return false;
        }
        true
    }
}

//! Room contents and point ledgers
//!
//! Rooms are filled with point-awarding and point-consuming entities after
//! placement. The ledger of a room is the sum of what its contents can give
//! and take, and is what the door economy prices gates from.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::rng::GameRng;

use super::room::{Difficulty, RoomNode, RoomType};

/// Default price of a shop item
pub const SHOP_ITEM_COST: u32 = 50;

/// Default stat multiplier granted by a shop item
pub const SHOP_ITEM_MULTIPLIER: u32 = 2;

/// Whether a point trigger gives or takes points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum TriggerEffect {
    Add,
    Remove,
}

/// Stat boosted by a shop item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ShopItem {
    Attack,
    Defense,
    Speed,
}

/// An entity placed in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    /// Enemy that awards points when defeated
    Enemy { reward: u32 },
    /// Floor trigger that adds or removes points once
    PointTrigger { effect: TriggerEffect, value: u32 },
    /// Barrier that opens on a point check, optionally charging for it
    PointBlocker { cost: u32, takes_points: bool },
    /// Item for sale; buying is optional so it never enters the ledger
    ShopItem {
        item: ShopItem,
        cost: u32,
        stat_multiplier: u32,
    },
}

impl Content {
    /// Points this entity can award
    pub fn gain(&self) -> i64 {
        match *self {
            Content::Enemy { reward } => reward as i64,
            Content::PointTrigger {
                effect: TriggerEffect::Add,
                value,
            } => value as i64,
            _ => 0,
        }
    }

    /// Points this entity can take
    pub fn loss(&self) -> i64 {
        match *self {
            Content::PointTrigger {
                effect: TriggerEffect::Remove,
                value,
            } => value as i64,
            Content::PointBlocker {
                cost,
                takes_points: true,
            } => cost as i64,
            _ => 0,
        }
    }
}

/// Potential point gain and loss of one room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointLedger {
    pub potential_gain: i64,
    pub potential_loss: i64,
}

impl PointLedger {
    pub const fn new(potential_gain: i64, potential_loss: i64) -> Self {
        Self {
            potential_gain,
            potential_loss,
        }
    }

    /// Sum the gain and loss of a room's contents
    pub fn from_contents(contents: &[Content]) -> Self {
        contents.iter().fold(Self::default(), |ledger, content| Self {
            potential_gain: ledger.potential_gain + content.gain(),
            potential_loss: ledger.potential_loss + content.loss(),
        })
    }

    /// Gain minus loss
    pub fn surplus(&self) -> i64 {
        self.potential_gain - self.potential_loss
    }
}

/// Supplies the contents of placed rooms
///
/// Called once per room after all paths are laid out and before pricing.
pub trait ContentAuthor {
    fn author(&mut self, room: &RoomNode, rng: &mut GameRng) -> Vec<Content>;
}

/// Leaves every room empty
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyContent;

impl ContentAuthor for EmptyContent {
    fn author(&mut self, _room: &RoomNode, _rng: &mut GameRng) -> Vec<Content> {
        Vec::new()
    }
}

/// Fills rooms from their type and difficulty
#[derive(Debug, Clone)]
pub struct StandardContent {
    pub shop_item_cost: u32,
    pub shop_item_multiplier: u32,
}

impl Default for StandardContent {
    fn default() -> Self {
        Self {
            shop_item_cost: SHOP_ITEM_COST,
            shop_item_multiplier: SHOP_ITEM_MULTIPLIER,
        }
    }
}

impl StandardContent {
    fn enemies(count: u32, reward: u32, out: &mut Vec<Content>) {
        for _ in 0..count {
            out.push(Content::Enemy { reward });
        }
    }

    fn shop(&self, rng: &mut GameRng, out: &mut Vec<Content>) {
        let count = 2 + rng.rn2(2);
        for _ in 0..count {
            let item = match rng.rn2(3) {
                0 => ShopItem::Attack,
                1 => ShopItem::Defense,
                _ => ShopItem::Speed,
            };
            out.push(Content::ShopItem {
                item,
                cost: self.shop_item_cost,
                stat_multiplier: self.shop_item_multiplier,
            });
        }
    }
}

impl ContentAuthor for StandardContent {
    fn author(&mut self, room: &RoomNode, rng: &mut GameRng) -> Vec<Content> {
        let tier = difficulty_tier(room.difficulty);
        let mut contents = Vec::new();

        match room.room_type {
            RoomType::Start => {}
            RoomType::Classic => {
                let count = 1 + rng.rn2(2) + tier / 2;
                Self::enemies(count, 2 * tier + rng.rn2(3), &mut contents);
            }
            RoomType::Trap => {
                contents.push(Content::PointTrigger {
                    effect: TriggerEffect::Add,
                    value: 2 + rng.rn2(3),
                });
                for _ in 0..tier {
                    contents.push(Content::PointTrigger {
                        effect: TriggerEffect::Remove,
                        value: 1 + rng.rn2(2 * tier),
                    });
                }
            }
            RoomType::Danger => {
                Self::enemies(1 + tier, 4 * tier + rng.rn2(4), &mut contents);
                contents.push(Content::PointBlocker {
                    cost: 3 * tier,
                    takes_points: true,
                });
            }
            RoomType::Safe => {
                // Never below 5 so the opening seed gate is always covered
                contents.push(Content::PointTrigger {
                    effect: TriggerEffect::Add,
                    value: (5 + rng.rn2(3)) * tier,
                });
            }
            RoomType::Merchant => self.shop(rng, &mut contents),
            RoomType::Secret => {
                contents.push(Content::PointTrigger {
                    effect: TriggerEffect::Add,
                    value: 10 * tier,
                });
                contents.push(Content::PointBlocker {
                    cost: 5 * tier,
                    takes_points: false,
                });
            }
            RoomType::End => {
                contents.push(Content::Enemy {
                    reward: 10 + rng.rn2(6),
                });
            }
        }

        contents
    }
}

/// 1, 2 or 3 for Easy, Medium, Hard
fn difficulty_tier(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 1,
        Difficulty::Medium => 2,
        Difficulty::Hard => 3,
    }
}

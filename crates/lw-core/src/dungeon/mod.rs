//! Dungeon system
//!
//! Contains the room graph, the path builders, the room sampler, content
//! authoring, the door economy and the generation driver.

mod connection;
mod content;
mod economy;
mod generation;
mod graph;
mod grid;
mod points;
mod primary;
mod render;
mod room;
mod sampler;
mod secondary;

pub use connection::{Connection, ConnectionId, DoorSpec, DoorState, GatePredicate};
pub use content::{
    Content, ContentAuthor, EmptyContent, PointLedger, SHOP_ITEM_COST, SHOP_ITEM_MULTIPLIER,
    ShopItem, StandardContent, TriggerEffect,
};
pub use economy::{
    DoorEconomy, GateScope, PricingReport, price_doors, primary_gate_cost, primary_surplus,
    secondary_gate_cost, secondary_surplus,
};
pub use generation::{
    Dungeon, DungeonGenerator, GenerationSession, GenerationState, default_branch_plans,
};
pub use graph::{GraphError, RoomGraph};
pub use grid::{Direction, Directions, Footprint, Position};
pub use points::{PointSource, Wallet, try_open};
pub use primary::{
    DIRECTION_RETRY_CAP, PrimaryPath, SEED_GATE_COST, build_primary_path, choose_direction,
};
pub use render::{ascii_map, describe_doors, describe_rooms};
pub use room::{Difficulty, RoomId, RoomNode, RoomType};
pub use sampler::{
    EARLY_DIFFICULTY, INITIAL_TYPE_WEIGHT, LATE_DIFFICULTY, MIDDLE_DIFFICULTY, RoomSampler,
    TYPE_WEIGHT_DECREMENT, WeightTable, difficulty_table,
};
pub use secondary::{
    Anchor, BranchKind, BranchOutcome, BranchPlan, build_secondary_path, choose_branch_target,
};

//! Room types and room nodes
//!
//! A room node is identified by its lattice position and carries its type,
//! difficulty, whether it lies on the primary path, its contents and point
//! ledger, and the connections leaving it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::connection::ConnectionId;
use super::content::{Content, PointLedger};
use super::grid::Position;

/// Handle of a room in its graph, in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub usize);

impl RoomId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl core::fmt::Display for RoomId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "room #{}", self.0)
    }
}

/// Room types
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum RoomType {
    /// Entry room of the dungeon
    Start,
    /// Ordinary combat room
    #[default]
    Classic,
    /// Room with point-draining triggers
    Trap,
    /// Heavy combat with a point-charging blocker
    Danger,
    /// Calm room with point rewards
    Safe,
    /// Shop
    Merchant,
    /// Hidden bonus room at the end of a branch
    Secret,
    /// Exit room
    End,
}

impl RoomType {
    /// Types drawn by the room sampler, in tie-break order
    pub const SAMPLED: [RoomType; 5] = [
        RoomType::Classic,
        RoomType::Trap,
        RoomType::Danger,
        RoomType::Safe,
        RoomType::Merchant,
    ];

    /// Map symbol
    pub const fn symbol(self) -> char {
        match self {
            RoomType::Start => 'S',
            RoomType::Classic => 'c',
            RoomType::Trap => 't',
            RoomType::Danger => 'd',
            RoomType::Safe => 's',
            RoomType::Merchant => 'm',
            RoomType::Secret => '?',
            RoomType::End => 'E',
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RoomType::Start => "Starting room",
            RoomType::Classic => "Combat room",
            RoomType::Trap => "Trapped room",
            RoomType::Danger => "Dangerous room",
            RoomType::Safe => "Safe room",
            RoomType::Merchant => "Merchant",
            RoomType::Secret => "Secret room",
            RoomType::End => "Exit room",
        }
    }
}

/// Room difficulty
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    Display, EnumIter,
)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Difficulties in tie-break order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

/// A placed room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomNode {
    pub position: Position,
    pub room_type: RoomType,
    pub difficulty: Difficulty,
    /// On the main route rather than a branch
    pub is_primary: bool,
    /// Set once by content authoring
    pub ledger: PointLedger,
    pub contents: Vec<Content>,
    /// Outgoing connections, at most one per direction
    pub(crate) connections: Vec<ConnectionId>,
}

impl RoomNode {
    pub fn new(
        position: Position,
        room_type: RoomType,
        difficulty: Difficulty,
        is_primary: bool,
    ) -> Self {
        Self {
            position,
            room_type,
            difficulty,
            is_primary,
            ledger: PointLedger::default(),
            contents: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    pub fn potential_gain(&self) -> i64 {
        self.ledger.potential_gain
    }

    pub fn potential_loss(&self) -> i64 {
        self.ledger.potential_loss
    }

    pub fn surplus(&self) -> i64 {
        self.ledger.surplus()
    }
}

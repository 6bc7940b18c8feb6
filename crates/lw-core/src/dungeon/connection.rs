//! Connections between rooms
//!
//! A connection is a directed edge. Every edge is stored twice, once per
//! endpoint, and both records always carry the same lock, cost, secrecy and
//! wall flags.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::grid::Direction;
use super::room::RoomId;

/// Handle of a directed connection record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub usize);

impl core::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "connection #{}", self.0)
    }
}

/// Comparison a player's points must satisfy against a door cost
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum GatePredicate {
    Less,
    LessEqual,
    Equal,
    Greater,
    #[default]
    GreaterEqual,
    /// Always passable
    Any,
}

impl GatePredicate {
    pub const fn symbol(self) -> &'static str {
        match self {
            GatePredicate::Less => "<",
            GatePredicate::LessEqual => "≤",
            GatePredicate::Equal => "=",
            GatePredicate::Greater => ">",
            GatePredicate::GreaterEqual => "≥",
            GatePredicate::Any => "≥ any",
        }
    }

    /// Check a point total against a cost
    pub const fn allows(self, points: i64, cost: u32) -> bool {
        let cost = cost as i64;
        match self {
            GatePredicate::Less => points < cost,
            GatePredicate::LessEqual => points <= cost,
            GatePredicate::Equal => points == cost,
            GatePredicate::Greater => points > cost,
            GatePredicate::GreaterEqual => points >= cost,
            GatePredicate::Any => true,
        }
    }

    /// Human-readable door label, e.g. `≥ 12` or `≥ any`
    pub fn label(self, cost: u32) -> String {
        match self {
            GatePredicate::Any => self.symbol().to_string(),
            _ => format!("{} {}", self.symbol(), cost),
        }
    }
}

/// How a door is presented on a room side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum DoorState {
    Open,
    Closed,
    Wall,
    Secret,
}

/// Door flags used when creating a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoorSpec {
    pub locked: bool,
    pub cost: u32,
    pub secret: bool,
    /// Cost is authored at placement and never repriced
    pub fixed: bool,
}

impl DoorSpec {
    pub const OPEN: DoorSpec = DoorSpec {
        locked: false,
        cost: 0,
        secret: false,
        fixed: false,
    };

    pub const SECRET: DoorSpec = DoorSpec {
        locked: false,
        cost: 0,
        secret: true,
        fixed: false,
    };

    /// Locked door priced later by the economy
    pub const fn locked(cost: u32) -> Self {
        Self {
            locked: true,
            cost,
            secret: false,
            fixed: false,
        }
    }

    /// Locked door with a cost that is never repriced
    pub const fn fixed(cost: u32) -> Self {
        Self {
            locked: true,
            cost,
            secret: false,
            fixed: true,
        }
    }
}

/// Directed connection record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub origin: RoomId,
    pub destination: RoomId,
    pub direction: Direction,
    pub has_lock: bool,
    pub opening_cost: u32,
    pub is_secret: bool,
    /// Demoted to an impassable wall
    pub is_wall: bool,
    pub fixed_cost: bool,
    pub predicate: GatePredicate,
    pub label: Option<String>,
    /// Record created by the builder, as opposed to its mirror
    pub(crate) forward: bool,
    pub(crate) mirror: ConnectionId,
}

impl Connection {
    pub(crate) fn new(
        origin: RoomId,
        destination: RoomId,
        direction: Direction,
        door: DoorSpec,
        forward: bool,
        mirror: ConnectionId,
    ) -> Self {
        let predicate = GatePredicate::GreaterEqual;
        Self {
            origin,
            destination,
            direction,
            has_lock: door.locked,
            opening_cost: door.cost,
            is_secret: door.secret,
            is_wall: false,
            fixed_cost: door.fixed,
            predicate,
            label: door.locked.then(|| predicate.label(door.cost)),
            forward,
            mirror,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    pub fn mirror(&self) -> ConnectionId {
        self.mirror
    }

    /// Traversable once any lock is satisfied
    pub fn is_passage(&self) -> bool {
        !self.is_wall
    }

    pub fn state(&self) -> DoorState {
        if self.is_wall {
            DoorState::Wall
        } else if self.is_secret {
            DoorState::Secret
        } else if self.has_lock {
            DoorState::Closed
        } else {
            DoorState::Open
        }
    }

    /// Whether a player holding `points` may pass
    pub fn allows(&self, points: i64) -> bool {
        if self.is_wall {
            return false;
        }
        !self.has_lock || self.predicate.allows(points, self.opening_cost)
    }
}

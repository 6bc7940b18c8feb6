//! Player points
//!
//! Gate checks pull the player's current total through [`PointSource`];
//! [`Wallet`] is a plain counter for callers that do not track points
//! themselves.

use serde::{Deserialize, Serialize};

use super::connection::Connection;

/// Anything that can report the player's current points
pub trait PointSource {
    fn current_points(&self) -> i64;
}

/// Simple point counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wallet {
    points: i64,
}

impl Wallet {
    pub const fn new(points: i64) -> Self {
        Self { points }
    }

    pub fn points(&self) -> i64 {
        self.points
    }

    pub fn add(&mut self, amount: i64) {
        self.points += amount;
    }

    /// Deduct unconditionally; the total may go negative
    pub fn spend(&mut self, amount: i64) {
        self.points -= amount;
    }

    /// Deduct only if the wallet holds at least `amount`
    pub fn try_spend(&mut self, amount: i64) -> bool {
        if self.points < amount {
            return false;
        }
        self.points -= amount;
        true
    }

    /// Deduct a gate cost, never leaving less than one point
    pub fn spend_to_floor(&mut self, cost: u32) {
        self.points = (self.points - i64::from(cost)).max(1);
    }
}

impl PointSource for Wallet {
    fn current_points(&self) -> i64 {
        self.points
    }
}

/// Open a door with the wallet's points, charging its cost on success
pub fn try_open(door: &Connection, wallet: &mut Wallet) -> bool {
    if !door.allows(wallet.current_points()) {
        return false;
    }
    if door.has_lock {
        wallet.spend_to_floor(door.opening_cost);
    }
    true
}

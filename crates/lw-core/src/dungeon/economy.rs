//! Door economy
//!
//! Prices every locked gate from the point surplus a player can collect
//! before reaching it, so optimal play can always afford the next door.
//!
//! Primary gates cost the surplus of the primary rooms since the previous
//! primary lock, minus one. Secondary gates cost half of the surplus of the
//! unlocked subgraph behind them.

use std::collections::HashSet;

use log::{debug, warn};
use serde::Serialize;
use strum::Display;

use crate::error::GenerationError;

use super::connection::{ConnectionId, GatePredicate};
use super::graph::RoomGraph;
use super::grid::Direction;
use super::points::PointSource;
use super::room::RoomId;

/// Which pricing rule applies to a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum GateScope {
    Primary,
    Secondary,
}

/// Price of one gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoorEconomy {
    /// Forward record of the gate
    pub connection: ConnectionId,
    pub origin: RoomId,
    pub destination: RoomId,
    pub direction: Direction,
    pub scope: GateScope,
    pub opening_cost: u32,
    pub predicate: GatePredicate,
    pub label: String,
    /// Surplus the price was derived from
    pub reachable_surplus: i64,
}

impl DoorEconomy {
    pub fn can_open(&self, points: &impl PointSource) -> bool {
        self.predicate
            .allows(points.current_points(), self.opening_cost)
    }
}

/// Result of pricing a graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PricingReport {
    pub doors: Vec<DoorEconomy>,
    /// Gates demoted to walls because their destination was missing
    pub demoted: Vec<ConnectionId>,
}

/// Surplus of the primary rooms leading up to a gate
///
/// Walks primary rooms backward in creation order from the gate's origin and
/// stops after a room that was entered through an earlier primary lock.
pub fn primary_surplus(graph: &RoomGraph, gate: ConnectionId) -> Result<i64, GenerationError> {
    let conn = graph
        .connection(gate)
        .ok_or(GenerationError::UnresolvedDestination { connection: gate })?;
    let primary = graph.primary_rooms();
    let Some(mut index) = primary.iter().position(|&id| id == conn.origin) else {
        return Ok(0);
    };

    let mut surplus = 0;
    loop {
        let room = primary[index];
        surplus += graph.room(room).map_or(0, |r| r.surplus());
        if index == 0 {
            break;
        }
        let previous = primary[index - 1];
        if graph
            .connection_between(previous, room)
            .is_some_and(|c| c.has_lock && !c.is_wall)
        {
            break;
        }
        index -= 1;
    }
    Ok(surplus)
}

/// `max(surplus - 1, 0)` and the predicate that goes with it
pub fn primary_gate_cost(surplus: i64) -> (u32, GatePredicate) {
    let cost = clamp_cost(surplus - 1);
    let predicate = if cost == 0 {
        GatePredicate::Any
    } else {
        GatePredicate::GreaterEqual
    };
    (cost, predicate)
}

/// Surplus of the rooms reachable behind a gate without passing another lock
///
/// Iterative depth-first search from the gate's destination. The gate's
/// origin is marked visited up front so the scan never walks back through
/// the gate. Walls and locked connections are not followed.
pub fn secondary_surplus(graph: &RoomGraph, gate: ConnectionId) -> Result<i64, GenerationError> {
    let unresolved = GenerationError::UnresolvedDestination { connection: gate };
    let conn = graph.connection(gate).ok_or(unresolved.clone())?;
    let origin = graph.room(conn.origin).ok_or(unresolved.clone())?;
    let destination = graph.room(conn.destination).ok_or(unresolved)?;

    let mut visited = HashSet::from([origin.position, destination.position]);
    let mut stack = vec![conn.destination];
    let mut surplus = 0;

    while let Some(id) = stack.pop() {
        let Some(room) = graph.room(id) else {
            continue;
        };
        surplus += room.surplus();
        for (_, next) in graph.connections_of(id) {
            if next.has_lock || next.is_wall {
                continue;
            }
            // Dangling inner edges are ignored; only the gate itself is fatal
            let Some(target) = graph.room(next.destination) else {
                continue;
            };
            if visited.insert(target.position) {
                stack.push(next.destination);
            }
        }
    }
    Ok(surplus)
}

/// Half the surplus, floored at zero
pub fn secondary_gate_cost(surplus: i64) -> u32 {
    clamp_cost(surplus.max(0) / 2)
}

/// Assign a cost, predicate and label to every locked gate
///
/// Gates whose destination cannot be resolved are demoted to walls.
pub fn price_doors(graph: &mut RoomGraph) -> PricingReport {
    let gates: Vec<ConnectionId> = graph
        .connections()
        .filter(|(_, c)| c.is_forward() && c.has_lock && !c.is_wall)
        .map(|(id, _)| id)
        .collect();

    let mut report = PricingReport::default();
    for gate in gates {
        match price_gate(graph, gate) {
            Ok(door) => {
                debug!(
                    "{} {} {} priced {} from surplus {}",
                    door.scope, door.origin, door.direction, door.label, door.reachable_surplus
                );
                report.doors.push(door);
            }
            Err(err) => {
                warn!("{err}; demoting {gate} to a wall");
                graph.demote_to_wall(gate);
                report.demoted.push(gate);
            }
        }
    }
    report
}

fn price_gate(graph: &mut RoomGraph, gate: ConnectionId) -> Result<DoorEconomy, GenerationError> {
    let conn = graph
        .connection(gate)
        .cloned()
        .ok_or(GenerationError::UnresolvedDestination { connection: gate })?;
    let destination = graph
        .room(conn.destination)
        .ok_or(GenerationError::UnresolvedDestination { connection: gate })?;

    let scope = if destination.is_primary {
        GateScope::Primary
    } else {
        GateScope::Secondary
    };
    let surplus = match scope {
        GateScope::Primary => primary_surplus(graph, gate)?,
        GateScope::Secondary => secondary_surplus(graph, gate)?,
    };

    let (cost, predicate) = if conn.fixed_cost {
        if surplus < i64::from(conn.opening_cost) {
            warn!(
                "fixed gate {} costs {} but only {} points are reachable before it",
                gate, conn.opening_cost, surplus
            );
        }
        (conn.opening_cost, GatePredicate::GreaterEqual)
    } else {
        match scope {
            GateScope::Primary => primary_gate_cost(surplus),
            GateScope::Secondary => (secondary_gate_cost(surplus), GatePredicate::GreaterEqual),
        }
    };

    graph.update_gate(gate, cost, predicate);

    Ok(DoorEconomy {
        connection: gate,
        origin: conn.origin,
        destination: conn.destination,
        direction: conn.direction,
        scope,
        opening_cost: cost,
        predicate,
        label: predicate.label(cost),
        reachable_surplus: surplus,
    })
}

fn clamp_cost(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

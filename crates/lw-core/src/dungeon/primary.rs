//! Primary path builder
//!
//! Lays out the required corridor from the Start room to the End room. The
//! first path of a session opens with Start, a Safe seed room and a Classic
//! seed room behind a fixed-cost gate; later paths resume from an existing
//! room. Corridor rooms are sampled with escalating difficulty and joined by
//! open doors, and the End room is forced behind a lock priced later by the
//! economy.

use log::debug;

use crate::config::MIN_PRIMARY_BUDGET;
use crate::error::GenerationError;
use crate::rng::GameRng;

use super::connection::{ConnectionId, DoorSpec};
use super::generation::GenerationSession;
use super::graph::RoomGraph;
use super::grid::{Direction, Position};
use super::room::{Difficulty, RoomId, RoomNode, RoomType};
use super::sampler::RoomSampler;

/// Rotations tried after the first random direction before giving up
pub const DIRECTION_RETRY_CAP: u32 = 6;

/// Fixed cost of the gate between the two seed rooms
pub const SEED_GATE_COST: u32 = 5;

/// Rooms laid out by one primary build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryPath {
    /// Rooms in placement order, End last
    pub rooms: Vec<RoomId>,
    /// Gate between the seed rooms, on opening paths only
    pub seed_gate: Option<ConnectionId>,
    pub end_gate: ConnectionId,
}

impl PrimaryPath {
    pub fn end(&self) -> Option<RoomId> {
        self.rooms.last().copied()
    }
}

/// Pick a free direction around `position`
///
/// Draws a random direction, then rotates clockwise at most
/// [`DIRECTION_RETRY_CAP`] times.
pub fn choose_direction(
    graph: &RoomGraph,
    position: Position,
    rng: &mut GameRng,
) -> Option<Direction> {
    let mut direction = Direction::from_index(rng.rn2(4));
    for rotation in 0..=DIRECTION_RETRY_CAP {
        if graph.is_free(position, direction) {
            debug!("placing {direction} of {position} after {rotation} rotations");
            return Some(direction);
        }
        direction = direction.rotate_clockwise();
    }
    None
}

/// Build a primary path of `budget` rooms from `start`
///
/// On failure the session graph is left partially built; the driver discards
/// it and retries.
pub fn build_primary_path(
    session: &mut GenerationSession,
    rng: &mut GameRng,
    start: Position,
    budget: usize,
    is_first_path: bool,
) -> Result<PrimaryPath, GenerationError> {
    if budget < MIN_PRIMARY_BUDGET {
        return Err(GenerationError::BudgetTooSmall {
            budget,
            minimum: MIN_PRIMARY_BUDGET,
        });
    }

    let (mut rooms, seed_gate) = if is_first_path && !session.opening_placed {
        let (rooms, gate) = place_opening(&mut session.graph, start)?;
        session.opening_placed = true;
        (rooms, Some(gate))
    } else {
        let anchor = session
            .graph
            .id_at(start)
            .or_else(|| session.graph.nearest_room(start))
            .ok_or(GenerationError::PlacementFailure {
                position: start,
                rooms_placed: 0,
            })?;
        debug!("resuming primary path from {anchor}");
        (vec![anchor], None)
    };

    let mut sampler = RoomSampler::new(budget);
    let mut rooms_placed = rooms.len();
    let mut last = rooms[rooms.len() - 1];

    while rooms_placed < budget - 1 {
        let (room_type, difficulty) = sampler.sample(rng, rooms_placed);
        let position = room_position(&session.graph, last)?;
        let direction = choose_direction(&session.graph, position, rng).ok_or(
            GenerationError::PlacementFailure {
                position,
                rooms_placed,
            },
        )?;
        let (room, _) = session.graph.spawn_adjacent(
            last,
            direction,
            room_type,
            difficulty,
            true,
            DoorSpec::OPEN,
        )?;
        rooms.push(room);
        last = room;
        rooms_placed += 1;
    }

    let position = room_position(&session.graph, last)?;
    let direction = choose_direction(&session.graph, position, rng).ok_or(
        GenerationError::PlacementFailure {
            position,
            rooms_placed,
        },
    )?;
    let (end, end_gate) = session.graph.spawn_adjacent(
        last,
        direction,
        RoomType::End,
        Difficulty::Hard,
        true,
        DoorSpec::locked(0),
    )?;
    rooms.push(end);
    debug!("primary path closed with End {direction} of {position}");

    Ok(PrimaryPath {
        rooms,
        seed_gate,
        end_gate,
    })
}

/// Start, then two seed rooms to the East
fn place_opening(
    graph: &mut RoomGraph,
    start: Position,
) -> Result<(Vec<RoomId>, ConnectionId), GenerationError> {
    let start_room = graph.insert(RoomNode::new(start, RoomType::Start, Difficulty::Easy, true))?;

    let mut rooms = vec![start_room];
    let mut last = start_room;
    let mut gate = None;
    for (room_type, door) in [
        (RoomType::Safe, DoorSpec::OPEN),
        (RoomType::Classic, DoorSpec::fixed(SEED_GATE_COST)),
    ] {
        let position = room_position(graph, last)?;
        if !graph.is_free(position, Direction::East) {
            return Err(GenerationError::PlacementFailure {
                position,
                rooms_placed: rooms.len(),
            });
        }
        let (room, conn) =
            graph.spawn_adjacent(last, Direction::East, room_type, Difficulty::Easy, true, door)?;
        if door.locked {
            gate = Some(conn);
        }
        rooms.push(room);
        last = room;
    }

    let gate = gate.ok_or(GenerationError::PlacementFailure {
        position: start,
        rooms_placed: rooms.len(),
    })?;
    Ok((rooms, gate))
}

fn room_position(graph: &RoomGraph, id: RoomId) -> Result<Position, GenerationError> {
    graph
        .room(id)
        .map(|r| r.position)
        .ok_or_else(|| super::graph::GraphError::UnknownRoom(id).into())
}

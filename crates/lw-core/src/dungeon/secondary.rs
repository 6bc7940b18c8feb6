//! Secondary branch builder
//!
//! Grows an optional branch from an existing room toward a target position,
//! alternating between the vertical and horizontal axis on every step.
//! Blocked steps are skipped, not retried, so some branches come out short.
//! A secret branch ends in a Secret room with a hidden passage to a bonus
//! Merchant room.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::GenerationError;
use crate::rng::GameRng;

use super::connection::{ConnectionId, DoorSpec};
use super::generation::GenerationSession;
use super::graph::{GraphError, RoomGraph};
use super::grid::{Direction, Position};
use super::room::{Difficulty, RoomId, RoomType};
use super::sampler::RoomSampler;

/// What a branch is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum BranchKind {
    /// Optional side corridor
    Combat,
    /// Ends in a Secret room and a hidden Merchant
    Secret,
}

/// Where a branch departs, as an index into the primary path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// Index counted from the Start room
    FromStart(usize),
    /// Index counted back from the room before End (0 is that room)
    FromEnd(usize),
}

impl Anchor {
    /// Resolve against primary rooms in placement order, End last
    pub fn resolve(self, primary: &[RoomId]) -> Option<RoomId> {
        let index = match self {
            Anchor::FromStart(i) => i,
            Anchor::FromEnd(i) => primary.len().checked_sub(2 + i)?,
        };
        primary.get(index).copied()
    }
}

/// One configured branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchPlan {
    pub kind: BranchKind,
    pub anchor: Anchor,
    pub budget: usize,
}

/// What a branch build placed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchOutcome {
    pub kind: BranchKind,
    pub anchor: RoomId,
    pub target: Position,
    /// Branch rooms in placement order, bonus room excluded
    pub rooms: Vec<RoomId>,
    /// Locked connection from the anchor into the branch
    pub gate: Option<ConnectionId>,
    /// Steps lost to occupied cells
    pub skipped_steps: usize,
    pub secret_room: Option<RoomId>,
    pub bonus_room: Option<RoomId>,
}

/// Pick a target `budget` lattice steps from `anchor`
///
/// Heads `ceil(budget / 2)` steps through a random free side of the anchor
/// and `floor(budget / 2)` steps along a random perpendicular.
pub fn choose_branch_target(
    graph: &RoomGraph,
    anchor: RoomId,
    budget: usize,
    rng: &mut GameRng,
) -> Option<Position> {
    let position = graph.room(anchor)?.position;
    let free: Vec<Direction> = graph.adjacent_free_directions(position).directions().collect();
    if free.is_empty() {
        return None;
    }
    let heading = free[rng.rn2(free.len() as u32) as usize];
    let side = if rng.one_in(2) {
        heading.rotate_clockwise()
    } else {
        heading.rotate_counter_clockwise()
    };
    let footprint = graph.footprint();
    Some(
        position
            .step_n(heading, budget.div_ceil(2), footprint)
            .step_n(side, budget / 2, footprint),
    )
}

/// Build a branch of at most `budget` rooms from `anchor` toward `target`
pub fn build_secondary_path(
    session: &mut GenerationSession,
    rng: &mut GameRng,
    anchor: RoomId,
    target: Position,
    budget: usize,
    kind: BranchKind,
) -> Result<BranchOutcome, GenerationError> {
    let graph = &mut session.graph;
    let footprint = graph.footprint();
    let origin = graph
        .room(anchor)
        .ok_or(GraphError::UnknownRoom(anchor))?
        .position;

    let distance = origin.distance(target);
    if budget == 0 || distance > footprint.diagonal() * budget as f64 {
        return Err(GenerationError::BudgetInfeasible { budget, distance });
    }

    let (cells_x, cells_y) = (
        (target.x - origin.x) / footprint.width as i32,
        (target.y - origin.y) / footprint.height as i32,
    );
    let mut vertical = cells_y.abs() >= cells_x.abs();

    let mut sampler = RoomSampler::new(budget);
    let mut rooms = Vec::new();
    let mut gate = None;
    let mut skipped_steps = 0;
    let mut current = anchor;
    let mut remaining = budget;
    let mut safety = 2 * budget;

    while remaining > 0 && safety > 0 {
        safety -= 1;
        let position = graph
            .room(current)
            .ok_or(GraphError::UnknownRoom(current))?
            .position;

        if current != anchor && graph.touches_room_type(position, RoomType::End) {
            debug!("branch reached the End room at {position}");
            break;
        }

        let (sx, sy) = position.signum_toward(target);
        let Some(direction) = axis_direction(vertical, sx, sy) else {
            if axis_direction(!vertical, sx, sy).is_none() {
                debug!("branch reached its target {target}");
                break;
            }
            vertical = !vertical;
            continue;
        };

        if graph.is_free(position, direction) {
            let (room_type, difficulty) = sampler.sample(rng, rooms.len());
            let door = if rooms.is_empty() {
                DoorSpec::locked(0)
            } else {
                DoorSpec::OPEN
            };
            let (room, conn) =
                graph.spawn_adjacent(current, direction, room_type, difficulty, false, door)?;
            if rooms.is_empty() {
                gate = Some(conn);
            }
            rooms.push(room);
            current = room;
        } else {
            debug!("branch step {direction} of {position} is occupied, skipping");
            skipped_steps += 1;
        }

        vertical = !vertical;
        remaining -= 1;
    }

    let mut outcome = BranchOutcome {
        kind,
        anchor,
        target,
        rooms,
        gate,
        skipped_steps,
        secret_room: None,
        bonus_room: None,
    };

    if kind == BranchKind::Secret {
        attach_secret_room(graph, rng, &mut outcome)?;
    }

    Ok(outcome)
}

/// Retype the last branch room and hide a Merchant behind it
fn attach_secret_room(
    graph: &mut RoomGraph,
    rng: &mut GameRng,
    outcome: &mut BranchOutcome,
) -> Result<(), GenerationError> {
    let Some(&last) = outcome.rooms.last() else {
        warn!("secret branch from {} placed no rooms", outcome.anchor);
        return Ok(());
    };
    graph.set_room_type(last, RoomType::Secret);
    outcome.secret_room = Some(last);

    let position = graph.room(last).ok_or(GraphError::UnknownRoom(last))?.position;
    let free: Vec<Direction> = graph.adjacent_free_directions(position).directions().collect();
    if free.is_empty() {
        warn!("no room for a bonus merchant next to the secret room at {position}");
        return Ok(());
    }
    let direction = free[rng.rn2(free.len() as u32) as usize];
    let (bonus, _) = graph.spawn_adjacent(
        last,
        direction,
        RoomType::Merchant,
        Difficulty::Easy,
        false,
        DoorSpec::SECRET,
    )?;
    outcome.bonus_room = Some(bonus);
    Ok(())
}

fn axis_direction(vertical: bool, sx: i32, sy: i32) -> Option<Direction> {
    match (vertical, sx, sy) {
        (true, _, 1) => Some(Direction::North),
        (true, _, -1) => Some(Direction::South),
        (false, 1, _) => Some(Direction::East),
        (false, -1, _) => Some(Direction::West),
        _ => None,
    }
}

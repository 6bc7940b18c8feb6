//! Room graph
//!
//! An arena of rooms addressed by [`RoomId`] in creation order, an arena of
//! directed connection records addressed by [`ConnectionId`], and an index
//! from lattice position to room.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use super::connection::{Connection, ConnectionId, DoorSpec, DoorState, GatePredicate};
use super::content::{Content, PointLedger};
use super::grid::{Direction, Directions, Footprint, Position};
use super::room::{Difficulty, RoomId, RoomNode, RoomType};

/// Graph mutation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("a room already occupies {0}")]
    DuplicatePosition(Position),

    #[error("unknown {0}")]
    UnknownRoom(RoomId),

    #[error("room at {position} already has a {direction} connection")]
    DirectionTaken {
        position: Position,
        direction: Direction,
    },

    #[error("room at {to} is not the {direction} neighbour of {from}")]
    NotAdjacent {
        from: Position,
        to: Position,
        direction: Direction,
    },
}

/// Rooms and connections of one dungeon
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoomGraph {
    footprint: Footprint,
    rooms: Vec<RoomNode>,
    pub(crate) connections: Vec<Connection>,
    #[serde(skip)]
    by_position: HashMap<Position, RoomId>,
}

impl RoomGraph {
    pub fn new(footprint: Footprint) -> Self {
        Self {
            footprint,
            ..Self::default()
        }
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Number of rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Remove all rooms and connections
    pub fn clear(&mut self) {
        self.rooms.clear();
        self.connections.clear();
        self.by_position.clear();
    }

    /// Add a room; its lattice cell must be free
    pub fn insert(&mut self, mut node: RoomNode) -> Result<RoomId, GraphError> {
        if self.by_position.contains_key(&node.position) {
            return Err(GraphError::DuplicatePosition(node.position));
        }
        let id = RoomId(self.rooms.len());
        node.connections.clear();
        self.by_position.insert(node.position, id);
        self.rooms.push(node);
        Ok(id)
    }

    /// Connect two adjacent rooms with a mirrored pair of records
    ///
    /// Returns the record leaving `from`.
    pub fn connect(
        &mut self,
        from: RoomId,
        to: RoomId,
        direction: Direction,
        door: DoorSpec,
    ) -> Result<ConnectionId, GraphError> {
        let from_pos = self.room(from).ok_or(GraphError::UnknownRoom(from))?.position;
        let to_pos = self.room(to).ok_or(GraphError::UnknownRoom(to))?.position;

        if from_pos.step(direction, self.footprint) != to_pos {
            return Err(GraphError::NotAdjacent {
                from: from_pos,
                to: to_pos,
                direction,
            });
        }
        if self.connection_toward(from, direction).is_some() {
            return Err(GraphError::DirectionTaken {
                position: from_pos,
                direction,
            });
        }
        if self.connection_toward(to, direction.opposite()).is_some() {
            return Err(GraphError::DirectionTaken {
                position: to_pos,
                direction: direction.opposite(),
            });
        }

        let forward_id = ConnectionId(self.connections.len());
        let mirror_id = ConnectionId(forward_id.0 + 1);
        self.connections
            .push(Connection::new(from, to, direction, door, true, mirror_id));
        self.connections.push(Connection::new(
            to,
            from,
            direction.opposite(),
            door,
            false,
            forward_id,
        ));
        self.rooms[from.0].connections.push(forward_id);
        self.rooms[to.0].connections.push(mirror_id);
        Ok(forward_id)
    }

    /// Insert a room next to `from` and connect it
    pub fn spawn_adjacent(
        &mut self,
        from: RoomId,
        direction: Direction,
        room_type: RoomType,
        difficulty: Difficulty,
        is_primary: bool,
        door: DoorSpec,
    ) -> Result<(RoomId, ConnectionId), GraphError> {
        let origin = self.room(from).ok_or(GraphError::UnknownRoom(from))?.position;
        let position = origin.step(direction, self.footprint);
        let room = self.insert(RoomNode::new(position, room_type, difficulty, is_primary))?;
        let connection = self.connect(from, room, direction, door)?;
        Ok((room, connection))
    }

    pub fn room(&self, id: RoomId) -> Option<&RoomNode> {
        self.rooms.get(id.0)
    }

    pub fn find_by_position(&self, position: Position) -> Option<&RoomNode> {
        self.id_at(position).and_then(|id| self.room(id))
    }

    /// The `index`th room created
    pub fn find_by_index(&self, index: usize) -> Option<&RoomNode> {
        self.rooms.get(index)
    }

    pub fn id_at(&self, position: Position) -> Option<RoomId> {
        self.by_position.get(&position).copied()
    }

    /// Rooms in creation order
    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &RoomNode)> {
        self.rooms.iter().enumerate().map(|(i, r)| (RoomId(i), r))
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id.0)
    }

    /// All directed records in creation order
    pub fn connections(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections
            .iter()
            .enumerate()
            .map(|(i, c)| (ConnectionId(i), c))
    }

    /// Records leaving a room
    pub fn connections_of(&self, id: RoomId) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.room(id)
            .map(|room| room.connections.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&cid| self.connection(cid).map(|c| (cid, c)))
    }

    pub fn connection_toward(&self, id: RoomId, direction: Direction) -> Option<&Connection> {
        self.connections_of(id)
            .map(|(_, c)| c)
            .find(|c| c.direction == direction)
    }

    /// Record leaving `a` toward `b`
    pub fn connection_between(&self, a: RoomId, b: RoomId) -> Option<&Connection> {
        self.connections_of(a)
            .map(|(_, c)| c)
            .find(|c| c.destination == b)
    }

    /// Lattice neighbour of a position
    pub fn neighbor(&self, position: Position, direction: Direction) -> Position {
        position.step(direction, self.footprint)
    }

    /// Whether the neighbouring cell in `direction` is free
    pub fn is_free(&self, position: Position, direction: Direction) -> bool {
        !self
            .by_position
            .contains_key(&self.neighbor(position, direction))
    }

    /// Directions whose neighbouring cell holds no room
    pub fn adjacent_free_directions(&self, position: Position) -> Directions {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.is_free(position, d))
            .fold(Directions::empty(), |set, d| set | d.flag())
    }

    /// Whether a room of `room_type` sits in a neighbouring cell
    pub fn touches_room_type(&self, position: Position, room_type: RoomType) -> bool {
        Direction::ALL.into_iter().any(|d| {
            self.find_by_position(self.neighbor(position, d))
                .is_some_and(|r| r.room_type == room_type)
        })
    }

    /// Primary rooms in creation order
    pub fn primary_rooms(&self) -> Vec<RoomId> {
        self.rooms()
            .filter(|(_, r)| r.is_primary)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn count_of(&self, room_type: RoomType) -> usize {
        self.rooms
            .iter()
            .filter(|r| r.room_type == room_type)
            .count()
    }

    pub fn first_of(&self, room_type: RoomType) -> Option<RoomId> {
        self.rooms()
            .find(|(_, r)| r.room_type == room_type)
            .map(|(id, _)| id)
    }

    /// Room closest to `position`, earliest created on ties
    pub fn nearest_room(&self, position: Position) -> Option<RoomId> {
        let mut best: Option<(RoomId, f64)> = None;
        for (id, room) in self.rooms() {
            let d = room.position.distance(position);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Door presentation on one side of a room
    pub fn door_state(&self, id: RoomId, direction: Direction) -> DoorState {
        self.connection_toward(id, direction)
            .map_or(DoorState::Wall, Connection::state)
    }

    /// Rooms reachable from `start` through non-wall connections, ignoring locks
    pub fn reachable_from(&self, start: RoomId) -> HashSet<RoomId> {
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if self.room(id).is_none() || !seen.insert(id) {
                continue;
            }
            for (_, c) in self.connections_of(id) {
                if c.is_passage() && !seen.contains(&c.destination) {
                    stack.push(c.destination);
                }
            }
        }
        seen
    }

    pub(crate) fn set_room_type(&mut self, id: RoomId, room_type: RoomType) {
        if let Some(room) = self.rooms.get_mut(id.0) {
            room.room_type = room_type;
        }
    }

    /// Store a room's contents and derive its ledger
    pub(crate) fn set_contents(&mut self, id: RoomId, contents: Vec<Content>) {
        if let Some(room) = self.rooms.get_mut(id.0) {
            room.ledger = PointLedger::from_contents(&contents);
            room.contents = contents;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_ledger(&mut self, id: RoomId, ledger: PointLedger) {
        if let Some(room) = self.rooms.get_mut(id.0) {
            room.ledger = ledger;
        }
    }

    /// Apply a price to a record and its mirror
    pub(crate) fn update_gate(&mut self, id: ConnectionId, cost: u32, predicate: GatePredicate) {
        for cid in self.pair(id) {
            if let Some(c) = self.connections.get_mut(cid.0) {
                c.opening_cost = cost;
                c.predicate = predicate;
                c.label = Some(predicate.label(cost));
            }
        }
    }

    /// Turn a record and its mirror into an impassable wall
    pub(crate) fn demote_to_wall(&mut self, id: ConnectionId) {
        for cid in self.pair(id) {
            if let Some(c) = self.connections.get_mut(cid.0) {
                c.is_wall = true;
                c.has_lock = false;
                c.opening_cost = 0;
                c.label = None;
            }
        }
    }

    fn pair(&self, id: ConnectionId) -> Vec<ConnectionId> {
        match self.connection(id) {
            Some(c) => vec![id, c.mirror],
            None => Vec::new(),
        }
    }
}

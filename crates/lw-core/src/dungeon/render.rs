//! Text rendering of generated dungeons

use std::fmt::Write as _;

use super::connection::DoorState;
use super::generation::Dungeon;
use super::graph::RoomGraph;
use super::grid::Direction;

/// Connector glyph between two lattice cells
fn connector(state: DoorState, direction: Direction) -> char {
    match state {
        DoorState::Open if direction.is_vertical() => '|',
        DoorState::Open => '-',
        DoorState::Closed => '+',
        DoorState::Secret => '~',
        DoorState::Wall => ' ',
    }
}

/// Draw the room lattice, North up
///
/// Rooms are shown by their type symbol, connections by `-`/`|` when open,
/// `+` when locked and `~` when secret.
pub fn ascii_map(graph: &RoomGraph) -> String {
    let footprint = graph.footprint();
    let cells: Vec<_> = graph
        .rooms()
        .map(|(id, room)| (id, room.position.cell(footprint), room.room_type.symbol()))
        .collect();
    let Some(min_x) = cells.iter().map(|(_, (x, _), _)| *x).min() else {
        return String::new();
    };
    let max_x = cells.iter().map(|(_, (x, _), _)| *x).max().unwrap_or(min_x);
    let min_y = cells.iter().map(|(_, (_, y), _)| *y).min().unwrap_or(0);
    let max_y = cells.iter().map(|(_, (_, y), _)| *y).max().unwrap_or(min_y);

    let width = (2 * (max_x - min_x) + 1) as usize;
    let height = (2 * (max_y - min_y) + 1) as usize;
    let mut canvas = vec![vec![' '; width]; height];
    let to_canvas = |x: i32, y: i32| ((2 * (x - min_x)) as usize, (2 * (max_y - y)) as usize);

    for &(_, (x, y), symbol) in &cells {
        let (col, row) = to_canvas(x, y);
        canvas[row][col] = symbol;
    }

    for (_, conn) in graph.connections().filter(|(_, c)| c.is_forward()) {
        let Some(origin) = graph.room(conn.origin) else {
            continue;
        };
        let (x, y) = origin.position.cell(footprint);
        let (col, row) = to_canvas(x, y);
        let (dx, dy) = conn.direction.offset();
        let col = (col as i32 + dx) as usize;
        let row = (row as i32 - dy) as usize;
        if let Some(cell) = canvas.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = connector(conn.state(), conn.direction);
        }
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per room
pub fn describe_rooms(dungeon: &Dungeon) -> String {
    let graph = dungeon.graph();
    let mut out = String::new();
    for (id, room) in graph.rooms() {
        let exits: Vec<String> = Direction::ALL
            .into_iter()
            .filter_map(|d| match graph.door_state(id, d) {
                DoorState::Wall => None,
                state => Some(format!("{d} {state}")),
            })
            .collect();
        let _ = writeln!(
            out,
            "{:>9} {} {:<14} {:<6} {:<9} {:>10} gain {:>3} loss {:>3}  [{}]",
            id.to_string(),
            room.room_type.symbol(),
            room.room_type.description(),
            room.difficulty,
            if room.is_primary { "primary" } else { "branch" },
            room.position.to_string(),
            room.potential_gain(),
            room.potential_loss(),
            exits.join(", "),
        );
    }
    out
}

/// One line per priced gate
pub fn describe_doors(dungeon: &Dungeon) -> String {
    let mut out = String::new();
    for door in dungeon.doors() {
        let _ = writeln!(
            out,
            "{} -> {} ({}, {}): {} from surplus {}",
            door.origin,
            door.destination,
            door.direction,
            door.scope,
            door.label,
            door.reachable_surplus,
        );
    }
    for conn in dungeon.demoted() {
        let _ = writeln!(out, "{conn}: walled off");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::connection::DoorSpec;
    use crate::dungeon::grid::{Footprint, Position};
    use crate::dungeon::room::{Difficulty, RoomNode, RoomType};

    #[test]
    fn test_ascii_map() {
        let mut g = RoomGraph::new(Footprint::new(11, 9));
        let start = g
            .insert(RoomNode::new(Position::ORIGIN, RoomType::Start, Difficulty::Easy, true))
            .unwrap();
        let (a, _) = g
            .spawn_adjacent(start, Direction::East, RoomType::Safe, Difficulty::Easy, true, DoorSpec::OPEN)
            .unwrap();
        let (b, _) = g
            .spawn_adjacent(a, Direction::North, RoomType::End, Difficulty::Hard, true, DoorSpec::locked(0))
            .unwrap();
        g.spawn_adjacent(b, Direction::West, RoomType::Merchant, Difficulty::Easy, false, DoorSpec::SECRET)
            .unwrap();

        assert_eq!(ascii_map(&g), "m~E\n  +\nS-s");
    }

    #[test]
    fn test_empty_map() {
        assert_eq!(ascii_map(&RoomGraph::new(Footprint::default())), "");
    }
}

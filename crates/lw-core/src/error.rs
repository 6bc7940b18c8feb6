//! Generation errors

use thiserror::Error;

use crate::config::ConfigError;
use crate::dungeon::{ConnectionId, GraphError, Position};

/// Failures surfaced by the builders, the economy and the driver
///
/// `PlacementFailure` is recovered by the driver with a full retry,
/// `BudgetInfeasible` by skipping the branch and `UnresolvedDestination` by
/// demoting the connection to a wall. `RetryCapExceeded` is fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("no free direction around {position} after placing {rooms_placed} rooms")]
    PlacementFailure {
        position: Position,
        rooms_placed: usize,
    },

    #[error("branch budget {budget} cannot cover a distance of {distance:.1}")]
    BudgetInfeasible { budget: usize, distance: f64 },

    #[error("{connection} leads to a room that is not in the graph")]
    UnresolvedDestination { connection: ConnectionId },

    #[error("dungeon could not be generated after {attempts} attempts")]
    RetryCapExceeded { attempts: usize },

    #[error("primary budget {budget} is below the minimum of {minimum}")]
    BudgetTooSmall { budget: usize, minimum: usize },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = GenerationError::RetryCapExceeded { attempts: 11 };
        assert_eq!(
            err.to_string(),
            "dungeon could not be generated after 11 attempts"
        );
        let err = GenerationError::BudgetInfeasible {
            budget: 1,
            distance: 28.456,
        };
        assert_eq!(
            err.to_string(),
            "branch budget 1 cannot cover a distance of 28.5"
        );
    }

    #[test]
    fn test_graph_error_is_transparent() {
        let err: GenerationError = GraphError::DuplicatePosition(Position::ORIGIN).into();
        assert_eq!(err.to_string(), "a room already occupies (0, 0)");
    }
}

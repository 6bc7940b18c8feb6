//! Dungeon generation driver
//!
//! Runs the builders in order and retries whole attempts when the primary
//! path cannot be placed:
//!
//! ```text
//! Idle -> BuildingPrimary -> BuildingSecondary(k)... -> AuthoringContent -> Pricing -> Done
//!              |
//!              +-> Failed(attempt) -> Idle (fresh session)
//! ```
//!
//! Every attempt gets a fresh [`GenerationSession`]; only the RNG carries
//! over between attempts.

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::{ConfigError, GeneratorConfig};
use crate::error::GenerationError;
use crate::rng::GameRng;

use super::connection::ConnectionId;
use super::content::ContentAuthor;
use super::economy::{DoorEconomy, price_doors};
use super::graph::RoomGraph;
use super::grid::{Footprint, Position};
use super::primary::{PrimaryPath, build_primary_path};
use super::room::{RoomId, RoomType};
use super::secondary::{
    Anchor, BranchKind, BranchOutcome, BranchPlan, build_secondary_path, choose_branch_target,
};

/// Driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GenerationState {
    #[default]
    Idle,
    BuildingPrimary,
    /// Building the branch at this index of the plan list
    BuildingSecondary(usize),
    AuthoringContent,
    Pricing,
    Done,
    /// The numbered attempt failed
    Failed(usize),
}

/// Mutable state of one generation attempt
#[derive(Debug, Clone)]
pub struct GenerationSession {
    /// 1-based attempt number
    pub attempt: usize,
    pub graph: RoomGraph,
    /// Set once the Start room and seed rooms exist
    pub(crate) opening_placed: bool,
}

impl GenerationSession {
    pub fn new(attempt: usize, footprint: Footprint) -> Self {
        Self {
            attempt,
            graph: RoomGraph::new(footprint),
            opening_placed: false,
        }
    }

    pub fn opening_placed(&self) -> bool {
        self.opening_placed
    }
}

/// A generated dungeon, read-only
#[derive(Debug, Clone, Serialize)]
pub struct Dungeon {
    seed: u64,
    attempts: usize,
    graph: RoomGraph,
    primary: Vec<RoomId>,
    doors: Vec<DoorEconomy>,
    demoted: Vec<ConnectionId>,
    branches: Vec<BranchOutcome>,
}

impl Dungeon {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Attempts used, the successful one included
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    /// Primary rooms from Start to End
    pub fn primary_path(&self) -> &[RoomId] {
        &self.primary
    }

    pub fn start(&self) -> Option<RoomId> {
        self.graph.first_of(RoomType::Start)
    }

    pub fn end(&self) -> Option<RoomId> {
        self.graph.first_of(RoomType::End)
    }

    /// Priced gates in connection order
    pub fn doors(&self) -> &[DoorEconomy] {
        &self.doors
    }

    pub fn door(&self, connection: ConnectionId) -> Option<&DoorEconomy> {
        self.doors.iter().find(|d| d.connection == connection)
    }

    /// Gates turned into walls while pricing
    pub fn demoted(&self) -> &[ConnectionId] {
        &self.demoted
    }

    pub fn branches(&self) -> &[BranchOutcome] {
        &self.branches
    }
}

/// Branches built after the primary path: a combat branch past the seed
/// gate and a secret branch off the room before End
pub fn default_branch_plans(config: &GeneratorConfig) -> Vec<BranchPlan> {
    vec![
        BranchPlan {
            kind: BranchKind::Combat,
            anchor: Anchor::FromStart(2),
            budget: config.room_budget_secondary_branch1,
        },
        BranchPlan {
            kind: BranchKind::Secret,
            anchor: Anchor::FromEnd(0),
            budget: config.room_budget_secondary_branch2,
        },
    ]
}

/// Generates dungeons from one configuration and RNG
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    config: GeneratorConfig,
    rng: GameRng,
    state: GenerationState,
    plans: Vec<BranchPlan>,
    attempts: usize,
}

impl DungeonGenerator {
    /// Validate the configuration and seed the RNG
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Ok(Self {
            plans: default_branch_plans(&config),
            config,
            rng,
            state: GenerationState::Idle,
            attempts: 0,
        })
    }

    /// Replace the default branch plans
    pub fn with_branch_plans(mut self, plans: Vec<BranchPlan>) -> Self {
        self.plans = plans;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Primitive RNG draws taken so far
    pub fn rng_draws(&self) -> u64 {
        self.rng.draws()
    }

    /// Attempts used by the last call to [`generate`](Self::generate)
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn branch_plans(&self) -> &[BranchPlan] {
        &self.plans
    }

    fn transition(&mut self, next: GenerationState) {
        debug!("generation state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Generate one dungeon
    ///
    /// Makes one attempt plus at most `extra_tries_clamp` retries.
    pub fn generate(
        &mut self,
        author: &mut dyn ContentAuthor,
    ) -> Result<Dungeon, GenerationError> {
        let max_attempts = 1 + self.config.extra_tries_clamp;
        self.attempts = 0;

        for attempt in 1..=max_attempts {
            self.transition(GenerationState::Idle);
            self.attempts = attempt;
            let mut session = GenerationSession::new(attempt, self.config.room_footprint);

            self.transition(GenerationState::BuildingPrimary);
            let primary = match build_primary_path(
                &mut session,
                &mut self.rng,
                Position::ORIGIN,
                self.config.room_budget_primary,
                true,
            ) {
                Ok(path) => path,
                Err(err @ GenerationError::PlacementFailure { .. }) => {
                    info!("attempt {attempt} failed: {err}");
                    self.transition(GenerationState::Failed(attempt));
                    continue;
                }
                Err(err) => {
                    self.transition(GenerationState::Failed(attempt));
                    return Err(err);
                }
            };

            if attempt > 1 {
                info!("dungeon generated after {} extra tries", attempt - 1);
            }
            return self.complete(session, primary, author).inspect_err(|_| {
                self.state = GenerationState::Failed(attempt);
            });
        }

        warn!("giving up after {max_attempts} attempts");
        Err(GenerationError::RetryCapExceeded {
            attempts: max_attempts,
        })
    }

    fn complete(
        &mut self,
        mut session: GenerationSession,
        primary: PrimaryPath,
        author: &mut dyn ContentAuthor,
    ) -> Result<Dungeon, GenerationError> {
        let mut branches = Vec::new();
        for (k, plan) in self.plans.clone().into_iter().enumerate() {
            self.transition(GenerationState::BuildingSecondary(k));
            match self.build_branch(&mut session, &primary.rooms, plan) {
                Ok(Some(branch)) => branches.push(branch),
                Ok(None) => {}
                Err(err @ GenerationError::BudgetInfeasible { .. }) => {
                    warn!("skipping {} branch: {err}", plan.kind);
                }
                Err(err) => return Err(err),
            }
        }

        self.transition(GenerationState::AuthoringContent);
        let ids: Vec<RoomId> = session.graph.rooms().map(|(id, _)| id).collect();
        for id in ids {
            let Some(room) = session.graph.room(id) else {
                continue;
            };
            let contents = author.author(room, &mut self.rng);
            session.graph.set_contents(id, contents);
        }

        self.transition(GenerationState::Pricing);
        let report = price_doors(&mut session.graph);

        self.transition(GenerationState::Done);
        info!(
            "generated {} rooms and {} gates in {} attempt(s)",
            session.graph.len(),
            report.doors.len(),
            session.attempt
        );

        Ok(Dungeon {
            seed: self.rng.seed(),
            attempts: session.attempt,
            graph: session.graph,
            primary: primary.rooms,
            doors: report.doors,
            demoted: report.demoted,
            branches,
        })
    }

    fn build_branch(
        &mut self,
        session: &mut GenerationSession,
        primary: &[RoomId],
        plan: BranchPlan,
    ) -> Result<Option<BranchOutcome>, GenerationError> {
        if plan.budget == 0 {
            debug!("{} branch has no budget", plan.kind);
            return Ok(None);
        }
        let Some(anchor) = plan.anchor.resolve(primary) else {
            warn!("skipping {} branch: anchor {:?} is not on the primary path", plan.kind, plan.anchor);
            return Ok(None);
        };
        let Some(target) = choose_branch_target(&session.graph, anchor, plan.budget, &mut self.rng)
        else {
            warn!("skipping {} branch: {anchor} has no free side", plan.kind);
            return Ok(None);
        };
        debug!("{} branch from {anchor} toward {target}", plan.kind);
        build_secondary_path(session, &mut self.rng, anchor, target, plan.budget, plan.kind)
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::content::{EmptyContent, StandardContent};

    fn config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            rng_seed: Some(seed),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let bad = GeneratorConfig {
            room_budget_primary: 1,
            ..GeneratorConfig::default()
        };
        assert!(DungeonGenerator::new(bad).is_err());

        let wide = GeneratorConfig {
            room_footprint: Footprint::new(u32::MAX, 9),
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            DungeonGenerator::new(wide),
            Err(ConfigError::OutOfRange { option: "room_footprint", .. })
        ));
    }

    #[test]
    fn test_generate_reaches_done() {
        let mut generator = DungeonGenerator::new(config(42)).unwrap();
        assert_eq!(generator.state(), GenerationState::Idle);
        let dungeon = generator.generate(&mut StandardContent::default()).unwrap();
        assert_eq!(generator.state(), GenerationState::Done);
        assert_eq!(dungeon.seed(), 42);
        assert!(dungeon.attempts() >= 1);
        assert_eq!(dungeon.graph().count_of(RoomType::Start), 1);
        assert_eq!(dungeon.graph().count_of(RoomType::End), 1);
        assert_eq!(dungeon.primary_path().len(), 5);
        assert_eq!(dungeon.start(), Some(RoomId(0)));
    }

    #[test]
    fn test_default_plans() {
        let generator = DungeonGenerator::new(config(1)).unwrap();
        let plans = generator.branch_plans();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].anchor, Anchor::FromStart(2));
        assert_eq!(plans[0].budget, 3);
        assert_eq!(plans[1].kind, BranchKind::Secret);
        assert_eq!(plans[1].budget, 2);
    }

    #[test]
    fn test_zero_budget_branches_are_skipped() {
        let cfg = GeneratorConfig {
            room_budget_secondary_branch1: 0,
            room_budget_secondary_branch2: 0,
            ..config(7)
        };
        let mut generator = DungeonGenerator::new(cfg).unwrap();
        let dungeon = generator.generate(&mut EmptyContent).unwrap();
        assert!(dungeon.branches().is_empty());
        assert_eq!(dungeon.graph().len(), dungeon.primary_path().len());
    }

    #[test]
    fn test_unresolvable_anchor_is_skipped() {
        let mut generator = DungeonGenerator::new(config(3))
            .unwrap()
            .with_branch_plans(vec![BranchPlan {
                kind: BranchKind::Combat,
                anchor: Anchor::FromStart(40),
                budget: 3,
            }]);
        let dungeon = generator.generate(&mut EmptyContent).unwrap();
        assert!(dungeon.branches().is_empty());
    }

    #[test]
    fn test_secret_branch_has_bonus_merchant() {
        let mut found = false;
        for seed in 0..20 {
            let mut generator = DungeonGenerator::new(config(seed)).unwrap();
            let dungeon = generator.generate(&mut EmptyContent).unwrap();
            for branch in dungeon.branches() {
                if let Some(bonus) = branch.bonus_room {
                    let room = dungeon.graph().room(bonus).unwrap();
                    assert_eq!(room.room_type, RoomType::Merchant);
                    assert!(!room.is_primary);
                    found = true;
                }
            }
        }
        assert!(found);
    }

    #[test]
    fn test_contents_are_authored_before_pricing() {
        let mut generator = DungeonGenerator::new(config(12)).unwrap();
        let dungeon = generator.generate(&mut StandardContent::default()).unwrap();
        let end = dungeon.end().unwrap();
        assert!(dungeon.graph().room(end).unwrap().potential_gain() > 0);
        for door in dungeon.doors() {
            let conn = dungeon.graph().connection(door.connection).unwrap();
            assert_eq!(conn.opening_cost, door.opening_cost);
        }
    }
}

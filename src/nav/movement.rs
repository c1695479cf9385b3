//! Avatar movement along a planned path
//!
//! A movement request is planned with A*, checked against the action-point
//! ledger, then walked one cell at a time. Each step pays its own cost, moves
//! the avatar, and refreshes vision before the executor yields until the next
//! step. Only one movement runs at a time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{broadcast, Notify};

use crate::core::config::MovementConfig;
use crate::core::error::{NavError, Result};
use crate::core::types::WorldPosition;
use crate::nav::hex::{hex_to_world, world_to_hex, HexCoord};
use crate::nav::ledger::{ActionPointLedger, PositionStore, TierProvider};
use crate::nav::map::{GridBounds, TerrainSource};
use crate::nav::pathfinding::{find_path, reachable_within, step_cost, PathResult};
use crate::nav::terrain::TerrainCostTable;
use crate::nav::vision::{HexVisibility, VisionCapability, VisionState};

/// Where the executor is in a movement request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MovementPhase {
    #[default]
    Idle,
    Planning,
    Validating,
    Animating,
}

/// Expected reasons a movement does not run to completion
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementFailure {
    #[error("No path to {destination}")]
    NoPathFound { destination: HexCoord },

    #[error("Movement costs {required} action points but only {available} are available")]
    InsufficientActionPoints { required: u32, available: u32 },

    #[error("Movement already in progress")]
    MovementAlreadyInProgress,

    #[error("Could not pay {cost} action points to enter {at}")]
    LedgerDebitFailedMidRoute { at: HexCoord, cost: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementStatus {
    Completed,
    Cancelled,
    Failed(MovementFailure),
}

/// Result of a movement request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementOutcome {
    pub status: MovementStatus,
    /// The path that was planned (failure result if planning failed)
    pub planned: PathResult,
    /// Cells actually occupied, starting cell first; empty if nothing moved
    pub traveled: Vec<HexCoord>,
    /// Points actually debited
    pub spent: u32,
}

impl MovementOutcome {
    fn rejected(failure: MovementFailure, planned: PathResult) -> Self {
        Self {
            status: MovementStatus::Failed(failure),
            planned,
            traveled: Vec::new(),
            spent: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == MovementStatus::Completed
    }

    pub fn failure(&self) -> Option<&MovementFailure> {
        match &self.status {
            MovementStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Where the avatar ended up, if it moved at all
    pub fn final_hex(&self) -> Option<HexCoord> {
        self.traveled.last().copied()
    }

    /// Player-facing summary
    pub fn message(&self) -> String {
        match &self.status {
            MovementStatus::Completed => format!(
                "Arrived after {} steps for {} action points",
                self.traveled.len().saturating_sub(1),
                self.spent
            ),
            MovementStatus::Cancelled => format!(
                "Movement stopped after {} steps for {} action points",
                self.traveled.len().saturating_sub(1),
                self.spent
            ),
            MovementStatus::Failed(failure) => failure.to_string(),
        }
    }
}

/// One cell of movement, published to renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub hex: HexCoord,
    pub position: WorldPosition,
    /// 1-based step number
    pub step: usize,
    pub total_steps: usize,
    pub cost: u32,
}

/// What happened when the session was advanced by one step
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    Moved(PositionUpdate),
    /// Nothing left to walk
    Finished,
    /// A cancel was requested; nothing was paid or moved
    Cancelled,
    /// The ledger refused the debit; the avatar stays where it is
    DebitFailed { at: HexCoord, cost: u32 },
    /// The next cell can no longer be entered
    Blocked { at: HexCoord },
}

/// Outcome of [`MovementExecutor::begin_movement`]
#[derive(Debug)]
pub enum MovementStart {
    Accepted(MovementSession),
    Rejected(MovementOutcome),
}

/// Returns the executor to Idle when dropped
#[derive(Debug)]
struct PhaseGuard {
    phase: Arc<Mutex<MovementPhase>>,
}

impl PhaseGuard {
    fn set(&self, next: MovementPhase) {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }
}

impl Drop for PhaseGuard {
    fn drop(&mut self) {
        self.set(MovementPhase::Idle);
    }
}

/// A movement that has been accepted and is being walked.
///
/// The executor is busy for as long as the session lives.
#[derive(Debug)]
pub struct MovementSession {
    path: PathResult,
    current_step_index: usize,
    step_delay: Duration,
    traveled: Vec<HexCoord>,
    spent: u32,
    guard: PhaseGuard,
}

impl MovementSession {
    pub fn path(&self) -> &PathResult {
        &self.path
    }

    /// Index into the path of the cell the avatar occupies
    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn total_steps(&self) -> usize {
        self.path.steps()
    }

    pub fn is_finished(&self) -> bool {
        self.current_step_index >= self.total_steps()
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }

    pub fn traveled(&self) -> &[HexCoord] {
        &self.traveled
    }

    pub fn spent(&self) -> u32 {
        self.spent
    }

    /// End the session, releasing the executor
    pub fn into_outcome(self, status: MovementStatus) -> MovementOutcome {
        MovementOutcome {
            status,
            planned: self.path,
            traveled: self.traveled,
            spent: self.spent,
        }
    }
}

/// Plans and walks avatar movement against host-owned state
pub struct MovementExecutor<L, P, T> {
    ledger: L,
    position: P,
    tier: T,
    costs: TerrainCostTable,
    config: MovementConfig,
    phase: Arc<Mutex<MovementPhase>>,
    cancel_requested: AtomicBool,
    cancel_signal: Notify,
    vision: RwLock<VisionState>,
    updates: broadcast::Sender<PositionUpdate>,
}

impl<L, P, T> MovementExecutor<L, P, T>
where
    L: ActionPointLedger,
    P: PositionStore,
    T: TierProvider,
{
    pub fn new(ledger: L, position: P, tier: T, costs: TerrainCostTable, config: MovementConfig) -> Self {
        let (updates, _) = broadcast::channel(config.update_capacity.max(1));
        Self {
            ledger,
            position,
            tier,
            costs,
            config,
            phase: Arc::new(Mutex::new(MovementPhase::Idle)),
            cancel_requested: AtomicBool::new(false),
            cancel_signal: Notify::new(),
            vision: RwLock::new(VisionState::new()),
            updates,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn position(&self) -> &P {
        &self.position
    }

    pub fn costs(&self) -> &TerrainCostTable {
        &self.costs
    }

    pub fn phase(&self) -> MovementPhase {
        *self.phase.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_moving(&self) -> bool {
        self.phase() == MovementPhase::Animating
    }

    /// Ask the running movement to stop at the next step boundary
    pub fn cancel(&self) {
        if self.is_moving() {
            tracing::debug!("Movement cancel requested");
            self.cancel_requested.store(true, Ordering::SeqCst);
            self.cancel_signal.notify_waiters();
        }
    }

    fn cancel_pending(&self) -> bool {
        self.cancel_requested.load(Ordering::SeqCst)
    }

    /// Position updates for every completed step
    pub fn subscribe(&self) -> broadcast::Receiver<PositionUpdate> {
        self.updates.subscribe()
    }

    /// The cell the avatar stands on
    pub fn current_hex(&self) -> HexCoord {
        world_to_hex(self.position.world_position())
    }

    /// Snapshot of current vision and explored cells
    pub fn vision(&self) -> VisionState {
        self.vision.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn visibility(&self, coord: HexCoord, capability: VisionCapability) -> HexVisibility {
        self.vision
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .visibility(coord, capability)
    }

    /// Recompute vision where the avatar stands, e.g. after spawning or a
    /// tier upgrade
    pub fn refresh_vision(&self, bounds: &GridBounds) {
        let observer = self.current_hex();
        let tier = self.tier.tier();
        self.vision
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .refresh(observer, tier, bounds);
    }

    /// The avatar's cell, which must lie on the map
    fn start_hex(&self, bounds: &GridBounds) -> Result<HexCoord> {
        let start = self.current_hex();
        if !bounds.contains(start) {
            return Err(NavError::InvalidCoordinate(start));
        }
        Ok(start)
    }

    /// Path and cost to `destination` without spending or moving anything
    pub fn preview_movement<S: TerrainSource + ?Sized>(
        &self,
        destination: HexCoord,
        terrain: &S,
    ) -> Result<PathResult> {
        if !destination.is_valid() {
            return Err(NavError::InvalidCoordinate(destination));
        }
        let start = self.start_hex(&terrain.bounds())?;
        find_path(terrain, &self.costs, start, destination, self.tier.tier())
    }

    /// Cells affordable with the points currently in the ledger
    pub fn movement_range<S: TerrainSource + ?Sized>(&self, terrain: &S) -> Result<HashMap<HexCoord, u32>> {
        let start = self.start_hex(&terrain.bounds())?;
        reachable_within(
            terrain,
            &self.costs,
            start,
            self.tier.tier(),
            self.ledger.current_points(),
        )
    }

    /// Plan and validate a movement. On acceptance the executor is busy until
    /// the returned session is dropped or turned into an outcome.
    pub fn begin_movement<S: TerrainSource + ?Sized>(
        &self,
        destination: HexCoord,
        terrain: &S,
    ) -> Result<MovementStart> {
        if !destination.is_valid() {
            return Err(NavError::InvalidCoordinate(destination));
        }

        let guard = {
            let mut phase = self.phase.lock().unwrap_or_else(|e| e.into_inner());
            if *phase != MovementPhase::Idle {
                tracing::debug!("Rejected movement to {}: already {:?}", destination, *phase);
                return Ok(MovementStart::Rejected(MovementOutcome::rejected(
                    MovementFailure::MovementAlreadyInProgress,
                    PathResult::failure(),
                )));
            }
            *phase = MovementPhase::Planning;
            PhaseGuard {
                phase: Arc::clone(&self.phase),
            }
        };

        let bounds = terrain.bounds();
        let start = self.start_hex(&bounds)?;
        let tier = self.tier.tier();
        let path = find_path(terrain, &self.costs, start, destination, tier)?;

        guard.set(MovementPhase::Validating);
        if !path.success {
            tracing::debug!("No path from {} to {}", start, destination);
            return Ok(MovementStart::Rejected(MovementOutcome::rejected(
                MovementFailure::NoPathFound { destination },
                path,
            )));
        }

        let available = self.ledger.current_points();
        if path.total_cost > available {
            tracing::debug!(
                "Movement to {} needs {} points, have {}",
                destination,
                path.total_cost,
                available
            );
            return Ok(MovementStart::Rejected(MovementOutcome::rejected(
                MovementFailure::InsufficientActionPoints {
                    required: path.total_cost,
                    available,
                },
                path,
            )));
        }

        guard.set(MovementPhase::Animating);
        self.cancel_requested.store(false, Ordering::SeqCst);
        self.vision
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .refresh(start, tier, &bounds);
        tracing::debug!(
            "Moving {} -> {}: {} steps, {} points",
            start,
            destination,
            path.steps(),
            path.total_cost
        );

        Ok(MovementStart::Accepted(MovementSession {
            traveled: vec![start],
            path,
            current_step_index: 0,
            step_delay: self.config.step_delay(),
            spent: 0,
            guard,
        }))
    }

    /// Walk one cell: pay for it, move there, refresh vision, publish.
    pub fn advance_one_step<S: TerrainSource + ?Sized>(
        &self,
        session: &mut MovementSession,
        terrain: &S,
    ) -> Result<StepResult> {
        if session.is_finished() {
            return Ok(StepResult::Finished);
        }
        if self.cancel_pending() {
            return Ok(StepResult::Cancelled);
        }

        let next = session.path.path[session.current_step_index + 1];
        let tier = self.tier.tier();

        let Some(cost) = step_cost(terrain, &self.costs, next, tier)? else {
            tracing::warn!("Path blocked at {} after {} steps", next, session.current_step_index);
            return Ok(StepResult::Blocked { at: next });
        };

        if !self.ledger.try_spend(cost) {
            tracing::warn!(
                "Could not pay {} points to enter {}; stopping after {} steps",
                cost,
                next,
                session.current_step_index
            );
            return Ok(StepResult::DebitFailed { at: next, cost });
        }

        let position = hex_to_world(next);
        self.position.set_world_position(position);
        self.vision
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .refresh(next, tier, &terrain.bounds());

        session.current_step_index += 1;
        session.spent += cost;
        session.traveled.push(next);

        let update = PositionUpdate {
            hex: next,
            position,
            step: session.current_step_index,
            total_steps: session.total_steps(),
            cost,
        };
        // No subscribers is fine
        let _ = self.updates.send(update);

        tracing::debug!(
            "Step {}/{} to {} for {} points",
            update.step,
            update.total_steps,
            next,
            cost
        );
        Ok(StepResult::Moved(update))
    }

    /// Wait out the step delay, waking early on cancel
    async fn pause_between_steps(&self, delay: Duration) {
        if delay.is_zero() {
            tokio::task::yield_now().await;
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = self.cancel_signal.notified() => {}
        }
    }

    /// Plan, validate and walk a movement to `destination`.
    ///
    /// Gameplay failures are reported in the outcome; `Err` is reserved for
    /// invalid coordinates and broken terrain lookups.
    pub async fn plan_and_execute<S: TerrainSource + ?Sized>(
        &self,
        destination: HexCoord,
        terrain: &S,
    ) -> Result<MovementOutcome> {
        let mut session = match self.begin_movement(destination, terrain)? {
            MovementStart::Accepted(session) => session,
            MovementStart::Rejected(outcome) => return Ok(outcome),
        };

        loop {
            match self.advance_one_step(&mut session, terrain)? {
                StepResult::Moved(_) => {}
                StepResult::Finished => break,
                StepResult::Cancelled => {
                    tracing::info!(
                        "Movement cancelled at {} after {} steps",
                        session.traveled().last().copied().unwrap_or(destination),
                        session.current_step_index()
                    );
                    return Ok(session.into_outcome(MovementStatus::Cancelled));
                }
                StepResult::DebitFailed { at, cost } => {
                    return Ok(session.into_outcome(MovementStatus::Failed(
                        MovementFailure::LedgerDebitFailedMidRoute { at, cost },
                    )));
                }
                StepResult::Blocked { .. } => {
                    return Ok(session.into_outcome(MovementStatus::Failed(
                        MovementFailure::NoPathFound { destination },
                    )));
                }
            }

            if session.is_finished() {
                break;
            }
            if !self.cancel_pending() {
                self.pause_between_steps(session.step_delay()).await;
            }
        }

        tracing::info!(
            "Arrived at {} after {} steps for {} points",
            destination,
            session.total_steps(),
            session.spent()
        );
        Ok(session.into_outcome(MovementStatus::Completed))
    }
}

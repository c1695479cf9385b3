//! Host-owned state the movement executor reads and writes
//!
//! The executor never keeps its own copy of points, position or tier; every
//! step goes back through these traits so it never acts on a stale read.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::types::WorldPosition;
use crate::nav::hex::{hex_to_world, HexCoord};

/// Spendable action points
pub trait ActionPointLedger {
    fn current_points(&self) -> u32;

    /// Atomically check and debit. Returns false and spends nothing when the
    /// balance is too low.
    fn try_spend(&self, amount: u32) -> bool;
}

/// Where the avatar is drawn
pub trait PositionStore {
    fn world_position(&self) -> WorldPosition;
    fn set_world_position(&self, position: WorldPosition);
}

/// The player's current exploration tier
pub trait TierProvider {
    fn tier(&self) -> u32;
}

/// Lock-free in-memory ledger
#[derive(Debug, Default)]
pub struct ActionPoints {
    points: AtomicU32,
}

impl ActionPoints {
    pub fn new(points: u32) -> Self {
        Self {
            points: AtomicU32::new(points),
        }
    }

    pub fn grant(&self, amount: u32) {
        self.points.fetch_add(amount, Ordering::SeqCst);
    }

    pub fn set(&self, points: u32) {
        self.points.store(points, Ordering::SeqCst);
    }
}

impl ActionPointLedger for ActionPoints {
    fn current_points(&self) -> u32 {
        self.points.load(Ordering::SeqCst)
    }

    fn try_spend(&self, amount: u32) -> bool {
        self.points
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                current.checked_sub(amount)
            })
            .is_ok()
    }
}

/// In-memory avatar position
#[derive(Debug, Default)]
pub struct SharedPosition {
    position: Mutex<WorldPosition>,
}

impl SharedPosition {
    pub fn new(position: WorldPosition) -> Self {
        Self {
            position: Mutex::new(position),
        }
    }

    /// Start centred on a cell
    pub fn at_hex(hex: HexCoord) -> Self {
        Self::new(hex_to_world(hex))
    }
}

impl PositionStore for SharedPosition {
    fn world_position(&self) -> WorldPosition {
        *self.position.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_world_position(&self, position: WorldPosition) {
        *self.position.lock().unwrap_or_else(|e| e.into_inner()) = position;
    }
}

/// In-memory exploration tier
#[derive(Debug, Default)]
pub struct SharedTier {
    tier: AtomicU32,
}

impl SharedTier {
    pub fn new(tier: u32) -> Self {
        Self {
            tier: AtomicU32::new(tier),
        }
    }

    pub fn set(&self, tier: u32) {
        self.tier.store(tier, Ordering::SeqCst);
    }

    pub fn upgrade(&self) {
        self.tier.fetch_add(1, Ordering::SeqCst);
    }
}

impl TierProvider for SharedTier {
    fn tier(&self) -> u32 {
        self.tier.load(Ordering::SeqCst)
    }
}

impl<T: ActionPointLedger + ?Sized> ActionPointLedger for Arc<T> {
    fn current_points(&self) -> u32 {
        (**self).current_points()
    }

    fn try_spend(&self, amount: u32) -> bool {
        (**self).try_spend(amount)
    }
}

impl<T: PositionStore + ?Sized> PositionStore for Arc<T> {
    fn world_position(&self) -> WorldPosition {
        (**self).world_position()
    }

    fn set_world_position(&self, position: WorldPosition) {
        (**self).set_world_position(position)
    }
}

impl<T: TierProvider + ?Sized> TierProvider for Arc<T> {
    fn tier(&self) -> u32 {
        (**self).tier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_spend_debits() {
        let ledger = ActionPoints::new(10);
        assert!(ledger.try_spend(4));
        assert_eq!(ledger.current_points(), 6);
    }

    #[test]
    fn test_try_spend_insufficient_leaves_balance() {
        let ledger = ActionPoints::new(3);
        assert!(!ledger.try_spend(4));
        assert_eq!(ledger.current_points(), 3);
    }

    #[test]
    fn test_try_spend_exact_balance() {
        let ledger = ActionPoints::new(5);
        assert!(ledger.try_spend(5));
        assert_eq!(ledger.current_points(), 0);
        assert!(ledger.try_spend(0));
    }

    #[test]
    fn test_grant_and_set() {
        let ledger = ActionPoints::new(1);
        ledger.grant(4);
        assert_eq!(ledger.current_points(), 5);
        ledger.set(2);
        assert_eq!(ledger.current_points(), 2);
    }

    #[test]
    fn test_shared_position_at_hex() {
        let position = SharedPosition::at_hex(HexCoord::new(2, 0));
        assert_eq!(position.world_position(), WorldPosition::new(3.0, 0.0));
        position.set_world_position(WorldPosition::new(1.0, 1.0));
        assert_eq!(position.world_position(), WorldPosition::new(1.0, 1.0));
    }

    #[test]
    fn test_arc_forwards() {
        let tier = Arc::new(SharedTier::new(1));
        tier.upgrade();
        assert_eq!(TierProvider::tier(&tier), 2);
    }
}

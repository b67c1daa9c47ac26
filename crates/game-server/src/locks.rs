//! Per-game mutual exclusion for read-validate-commit sequences.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

#[derive(Default)]
pub struct GameLocks {
    locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
}

impl GameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `game_id`. Other games are unaffected.
    pub async fn lock(&self, game_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // entries nobody holds or waits on are only referenced by the map
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(game_id).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_game_waits() {
        let locks = GameLocks::new();
        let held = locks.lock(1).await;

        let waited = tokio::time::timeout(Duration::from_millis(50), locks.lock(1)).await;
        assert!(waited.is_err(), "second lock on the same game should block");

        drop(held);
        let again = tokio::time::timeout(Duration::from_millis(50), locks.lock(1)).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_other_games_do_not_wait() {
        let locks = GameLocks::new();
        let _held = locks.lock(1).await;
        let other = tokio::time::timeout(Duration::from_millis(50), locks.lock(2)).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_released_locks_are_dropped() {
        let locks = GameLocks::new();
        for game_id in 0..100 {
            drop(locks.lock(game_id).await);
        }
        let _held = locks.lock(500).await;
        assert_eq!(locks.tracked(), 1);
    }
}

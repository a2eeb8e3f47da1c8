use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

struct Armed {
    _guard: DropGuard,
    handle: JoinHandle<()>,
}

/// Background timers keyed by owner.
///
/// Each timer task gets its own cancellation token whose drop guard lives in
/// the registry: disarming, re-arming the same key or dropping the registry
/// cancels the task.
pub struct ScopedTimers<K> {
    armed: HashMap<K, Armed>,
}

impl<K: Eq + Hash> Default for ScopedTimers<K> {
    fn default() -> Self {
        Self {
            armed: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> ScopedTimers<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `task` on the current runtime. Any timer already armed under
    /// `key` is cancelled first.
    pub fn arm<F, Fut>(&mut self, key: K, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.prune();
        self.armed.remove(&key);
        let token = CancellationToken::new();
        let handle = tokio::spawn(task(token.clone()));
        self.armed.insert(
            key,
            Armed {
                _guard: token.drop_guard(),
                handle,
            },
        );
    }

    /// Cancels the timer under `key`. Returns false when none was armed.
    pub fn disarm(&mut self, key: &K) -> bool {
        self.armed.remove(key).is_some()
    }

    pub fn is_armed(&self, key: &K) -> bool {
        self.armed
            .get(key)
            .is_some_and(|armed| !armed.handle.is_finished())
    }

    /// Number of timers that have not yet run to completion.
    pub fn active(&self) -> usize {
        self.armed
            .values()
            .filter(|armed| !armed.handle.is_finished())
            .count()
    }

    pub fn clear(&mut self) {
        self.armed.clear();
    }

    /// Forgets one-shot timers that already fired.
    fn prune(&mut self) {
        self.armed.retain(|_, armed| !armed.handle.is_finished());
    }
}

//! Widget script loader: a singleton per script URL.
//!
//! The first request injects the script tag; every later request just
//! queues its continuation. Readiness is polled on a fixed cadence and
//! bounded by a timeout, after which queued continuations are dropped
//! rather than held forever. The loader is tick-driven: the host calls
//! [`ScriptLoader::tick`] with elapsed time, so behavior is fully
//! deterministic under test.

/// How often the host should tick the loader while a load is in flight
pub const POLL_INTERVAL_MS: u64 = 100;

/// A script that has not signalled ready within this budget has failed
pub const LOAD_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptState {
    NotRequested,
    Loading { elapsed_ms: u64 },
    Ready,
    Failed,
}

/// What the loader needs from its environment: tag injection and the
/// readiness probe (e.g. a global the script defines once executed)
pub trait ScriptHost {
    fn inject(&mut self, url: &str);
    fn is_ready(&self) -> bool;
}

/// Handle for a queued continuation; lets an unmounting view withdraw
/// before the script lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaiterId(u64);

pub struct ScriptLoader {
    url: String,
    state: ScriptState,
    waiters: Vec<(WaiterId, Box<dyn FnOnce()>)>,
    next_waiter: u64,
}

impl ScriptLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: ScriptState::NotRequested,
            waiters: Vec::new(),
            next_waiter: 0,
        }
    }

    pub fn state(&self) -> ScriptState {
        self.state
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask for the script, running `on_ready` once it is available.
    /// Injects at most once no matter how many views request it. The
    /// returned handle is `Some` only while the continuation sits
    /// queued; pass it to [`cancel`](Self::cancel) on unmount.
    pub fn request(
        &mut self,
        host: &mut dyn ScriptHost,
        on_ready: impl FnOnce() + 'static,
    ) -> Option<WaiterId> {
        match self.state {
            ScriptState::NotRequested => {
                if host.is_ready() {
                    // Script already present (e.g. loaded by the page)
                    self.state = ScriptState::Ready;
                    on_ready();
                    None
                } else {
                    tracing::debug!(url = %self.url, "injecting widget script");
                    host.inject(&self.url);
                    self.state = ScriptState::Loading { elapsed_ms: 0 };
                    Some(self.enqueue(on_ready))
                }
            }
            ScriptState::Loading { .. } => Some(self.enqueue(on_ready)),
            ScriptState::Ready => {
                on_ready();
                None
            }
            ScriptState::Failed => {
                tracing::warn!(url = %self.url, "widget script failed earlier, dropping request");
                None
            }
        }
    }

    /// Withdraw a queued continuation (view unmounted or its URL
    /// changed before the script landed)
    pub fn cancel(&mut self, id: WaiterId) {
        self.waiters.retain(|(waiter_id, _)| *waiter_id != id);
    }

    fn enqueue(&mut self, on_ready: impl FnOnce() + 'static) -> WaiterId {
        let id = WaiterId(self.next_waiter);
        self.next_waiter += 1;
        self.waiters.push((id, Box::new(on_ready)));
        id
    }

    /// Advance the poll clock by `dt_ms`
    pub fn tick(&mut self, host: &dyn ScriptHost, dt_ms: u64) {
        let ScriptState::Loading { elapsed_ms } = self.state else {
            return;
        };

        if host.is_ready() {
            self.state = ScriptState::Ready;
            for (_, waiter) in self.waiters.drain(..) {
                waiter();
            }
            return;
        }

        let elapsed_ms = elapsed_ms + dt_ms;
        if elapsed_ms >= LOAD_TIMEOUT_MS {
            tracing::warn!(url = %self.url, "widget script load timed out");
            self.state = ScriptState::Failed;
            self.waiters.clear();
        } else {
            self.state = ScriptState::Loading { elapsed_ms };
        }
    }
}

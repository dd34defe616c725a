use crate::error::MisError;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::trace;

/// Reusable barrier whose party count shrinks as processes terminate.
///
/// Every round a candidate passes the gate twice: once after computing its decision from
/// neighbour state, once after applying its writes. A process that stops being a candidate
/// calls [`RoundGate::leave`] so the rest are not held up waiting for it.
#[derive(Debug)]
pub struct RoundGate {
    state: Mutex<GateState>,
    generation: watch::Sender<u64>,
}

#[derive(Debug)]
struct GateState {
    parties: usize,
    arrived: usize,
    generation: u64,
}

impl RoundGate {
    pub fn new(parties: usize) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            state: Mutex::new(GateState {
                parties,
                arrived: 0,
                generation: 0,
            }),
            generation,
        }
    }

    /// Waits until every registered party has arrived, then releases them together.
    ///
    /// Returns the generation that was released.
    pub async fn arrive_and_wait(&self) -> Result<u64, MisError> {
        let (target, mut released) = {
            let mut state = self.lock();
            let target = state.generation + 1;
            let released = self.generation.subscribe();
            state.arrived += 1;
            if state.arrived >= state.parties {
                self.release(&mut state);
            }
            (target, released)
        };

        released
            .wait_for(|generation| *generation >= target)
            .await
            .map_err(|_| MisError::BarrierClosed)?;
        Ok(target)
    }

    /// Deregisters one party. Releases the waiting parties if they are now complete.
    pub fn leave(&self) {
        let mut state = self.lock();
        state.parties = state.parties.saturating_sub(1);
        if state.arrived > 0 && state.arrived >= state.parties {
            self.release(&mut state);
        }
    }

    /// Parties still registered.
    pub fn parties(&self) -> usize {
        self.lock().parties
    }

    fn release(&self, state: &mut GateState) {
        state.arrived = 0;
        state.generation += 1;
        trace!(generation = state.generation, parties = state.parties, "round gate released");
        self.generation.send_replace(state.generation);
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

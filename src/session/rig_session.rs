use crate::foundation::error::RigResult;
use crate::session::state::RigState;

/// Handle for one requested recomputation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Owner of the current [`RigState`].
///
/// Recomputations are last-writer-wins: every request takes a [`Ticket`], and a result
/// is only accepted if no newer request was issued in the meantime. Stale results are
/// dropped.
#[derive(Debug)]
pub struct RigSession {
    current: RigState,
    issued: u64,
    committed: u64,
}

impl RigSession {
    /// Session starting from `state`.
    pub fn new(state: RigState) -> Self {
        Self {
            current: state,
            issued: 0,
            committed: 0,
        }
    }

    /// The state last committed.
    pub fn current(&self) -> &RigState {
        &self.current
    }

    /// Start a recomputation; any earlier outstanding ticket becomes stale.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Install `state` if `ticket` is still the newest request. Returns whether it was
    /// accepted.
    pub fn commit(&mut self, ticket: Ticket, state: RigState) -> bool {
        if ticket.0 != self.issued || ticket.0 <= self.committed {
            tracing::debug!(
                ticket = ticket.0,
                newest = self.issued,
                "discarding superseded rig state"
            );
            return false;
        }
        self.committed = ticket.0;
        self.current = state;
        true
    }

    /// Run an infallible operation on a copy of the current state and commit it.
    pub fn apply(&mut self, op: impl FnOnce(RigState) -> RigState) -> &RigState {
        let ticket = self.begin();
        let next = op(self.current.clone());
        self.commit(ticket, next);
        &self.current
    }

    /// Run a fallible operation; on error the current state is left untouched.
    pub fn try_apply(
        &mut self,
        op: impl FnOnce(RigState) -> RigResult<RigState>,
    ) -> RigResult<&RigState> {
        let ticket = self.begin();
        let next = op(self.current.clone())?;
        self.commit(ticket, next);
        Ok(&self.current)
    }

    /// Consume the session, returning the current state.
    pub fn into_state(self) -> RigState {
        self.current
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/rig_session.rs"]
mod tests;

use crate::foundation::error::{FlipError, FlipResult};

/// Editor lifecycle states. `Exported` is not terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Streaming,
    Captured,
    Editing,
    Saved,
    Exported,
}

/// Requests the session can make of its state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    StartStream,
    StopStream,
    Capture,
    Edit,
    Save,
    Export,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateTransition {
    pub from: SessionState,
    pub event: SessionEvent,
    pub to: SessionState,
}

impl StateTransition {
    pub fn new(from: SessionState, event: SessionEvent, to: SessionState) -> Self {
        Self { from, event, to }
    }
}

#[derive(Debug, Default)]
pub struct StateMachine {
    state: SessionState,
    history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Accepted transitions in order.
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    pub fn can_transition(&self, event: SessionEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: SessionEvent) -> Option<SessionState> {
        use SessionEvent::*;
        use SessionState::*;
        match (self.state, event) {
            (Idle | Captured | Editing | Saved | Exported, StartStream) => Some(Streaming),
            (Streaming, StopStream) => Some(Idle),
            (Streaming | Captured | Editing | Saved | Exported, Capture) => Some(Captured),
            (Captured | Editing | Saved | Exported, Edit) => Some(Editing),
            (Editing | Saved | Exported, Save) => Some(Saved),
            (Captured | Editing | Saved | Exported, Export) => Some(Exported),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: SessionEvent) -> FlipResult<SessionState> {
        tracing::debug!(from = ?self.state, event = ?event, "request session transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid session transition requested");
            FlipError::InvalidTransition { from, event }
        })?;

        self.history
            .push(StateTransition::new(self.state, event, next));
        self.state = next;
        Ok(next)
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionState::{:?}", self.state)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/machine.rs"]
mod tests;

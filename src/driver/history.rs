use std::collections::VecDeque;

/// Bounded stack of past states for stepping backwards.
///
/// The most recent state is at the front and is never popped, so there is
/// always something to show.
#[derive(Debug, Clone)]
pub struct History<S> {
    states: VecDeque<S>,
    /// Maximum number of states to keep. Never less than one.
    max_states: usize,
}

impl<S> History<S> {
    pub fn new(initial: S, max_states: usize) -> Self {
        let max_states = max_states.max(1);
        let mut states = VecDeque::with_capacity(max_states.min(1024));
        states.push_front(initial);
        History { states, max_states }
    }

    /// Records a new current state, dropping the oldest ones past the cap.
    pub fn push(&mut self, state: S) {
        // Remove oldest states if we exceed max history size
        self.states.truncate(self.max_states - 1);
        self.states.push_front(state);
    }

    /// Discards the current state and returns to the previous one.
    /// Returns `false` when only the initial state is left.
    pub fn pop(&mut self) -> bool {
        if self.states.len() <= 1 {
            return false;
        }
        self.states.pop_front();
        true
    }

    pub fn current(&self) -> &S {
        // Constructed with one state and `pop` never removes the last one
        &self.states[0]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.states.len() > 1
    }

    /// Drops everything and starts over from `initial`.
    pub fn reset(&mut self, initial: S) {
        self.states.clear();
        self.states.push_front(initial);
    }
}

//! Automaton Data Structures
//! The editable graph of states and transitions, and the queries the view
//! and the test panel run against it

use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod simulation;
mod state;
mod transition;

pub use simulation::TestReport;
pub use state::{Point, State};
pub use transition::Transition;


#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("Unknown state: {0}")]
    UnknownState(String),
    #[error("A state named '{0}' already exists")]
    DuplicateState(String),
    #[error("State '{id}' is stored under key '{key}'")]
    MismatchedStateKey { key: String, id: String },
}

pub type AutomatonResult<T> = Result<T, AutomatonError>;

/// Which acceptance algorithm `simulate` runs.
///
/// The mode never restricts editing: a "deterministic" automaton may still
/// hold several transitions on the same symbol out of one state, in which
/// case the first one in insertion order wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Single current state, reject on a missing transition
    #[default]
    Deterministic,
    /// Set of current states, accept if any accepting state survives
    Nondeterministic,
}

impl Mode {
    /// Short name shown in the UI
    pub fn abbreviation(self) -> &'static str {
        match self {
            Mode::Deterministic => "DFA",
            Mode::Nondeterministic => "NFA",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mode::Deterministic => "deterministic",
            Mode::Nondeterministic => "nondeterministic",
        })
    }
}

/// A finite automaton under construction.
///
/// States are keyed by id and kept in insertion order, as are transitions,
/// so every "first match" query is reproducible. Transitions only ever
/// reference states that are present: adding one with an unknown endpoint
/// fails, and removing a state removes every transition touching it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawAutomaton")]
pub struct Automaton {
    states: IndexMap<String, State>,
    transitions: IndexSet<Transition>,
    /// Grows with every added transition, never shrinks on removal
    alphabet: BTreeSet<String>,
    initial_state: Option<String>,
    mode: Mode,
}

/// Serialized form of an [`Automaton`], checked before use
#[derive(Deserialize)]
struct RawAutomaton {
    states: IndexMap<String, State>,
    transitions: Vec<Transition>,
    #[serde(default)]
    alphabet: BTreeSet<String>,
    initial_state: Option<String>,
    #[serde(default)]
    mode: Mode,
}

impl TryFrom<RawAutomaton> for Automaton {
    type Error = AutomatonError;

    /// Replay the stored edits, so a loaded automaton obeys the same rules
    /// as one built by hand
    fn try_from(raw: RawAutomaton) -> AutomatonResult<Self> {
        let mut automaton = Automaton::new();
        automaton.mode = raw.mode;
        for (key, state) in raw.states {
            if key != state.id {
                return Err(AutomatonError::MismatchedStateKey { key, id: state.id });
            }
            automaton.add_state(state)?;
        }
        for transition in raw.transitions {
            automaton.add_transition(transition)?;
        }
        automaton.set_initial_state(raw.initial_state.as_deref())?;
        // Symbols of transitions removed before saving stay in the alphabet
        automaton.alphabet.extend(raw.alphabet);
        Ok(automaton)
    }
}

impl Automaton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!("switching to {mode} simulation");
        }
        self.mode = mode;
    }

    pub fn is_nondeterministic(&self) -> bool {
        self.mode == Mode::Nondeterministic
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Insert a new state. Ids are unique; inserting an id that is already
    /// present leaves the automaton untouched.
    pub fn add_state(&mut self, state: State) -> AutomatonResult<()> {
        if self.states.contains_key(&state.id) {
            return Err(AutomatonError::DuplicateState(state.id));
        }
        debug!("added state {} at ({}, {})", state.id, state.position.x, state.position.y);
        self.states.insert(state.id.clone(), state);
        Ok(())
    }

    /// Remove the state `id` together with every transition into or out of
    /// it. Removing the initial state leaves the automaton without one.
    pub fn remove_state(&mut self, id: &str) -> Option<State> {
        let removed = self.states.shift_remove(id)?;
        let before = self.transitions.len();
        self.transitions.retain(|t| !t.touches(id));
        if self.initial_state.as_deref() == Some(id) {
            self.initial_state = None;
        }
        debug!(
            "removed state {id} and {} transition(s)",
            before - self.transitions.len()
        );
        Some(removed)
    }

    /// Insert a transition and grow the alphabet by its symbols. Both
    /// endpoints must already be states of this automaton.
    pub fn add_transition(&mut self, transition: Transition) -> AutomatonResult<()> {
        for endpoint in [&transition.source, &transition.target] {
            if !self.states.contains_key(endpoint) {
                return Err(AutomatonError::UnknownState(endpoint.clone()));
            }
        }
        self.alphabet.extend(
            transition
                .individual_symbols()
                .into_iter()
                .map(str::to_string),
        );
        debug!("added transition {transition}");
        self.transitions.insert(transition);
        Ok(())
    }

    /// Remove a transition. The alphabet keeps its symbols.
    pub fn remove_transition(&mut self, transition: &Transition) -> bool {
        let removed = self.transitions.shift_remove(transition);
        if removed {
            debug!("removed transition {transition}");
        }
        removed
    }

    /// Install `id` as the initial state, or clear it with `None`. The
    /// previous initial state, if any, stops being initial.
    pub fn set_initial_state(&mut self, id: Option<&str>) -> AutomatonResult<()> {
        match id {
            Some(id) if !self.states.contains_key(id) => {
                Err(AutomatonError::UnknownState(id.to_string()))
            }
            Some(id) => {
                debug!("initial state is now {id}");
                self.initial_state = Some(id.to_string());
                Ok(())
            }
            None => {
                debug!("initial state cleared");
                self.initial_state = None;
                Ok(())
            }
        }
    }

    /// Flip the accepting flag of `id`, returning the new value
    pub fn toggle_accepting(&mut self, id: &str) -> Option<bool> {
        let state = self.states.get_mut(id)?;
        state.set_accepting(!state.is_accepting());
        debug!("state {id} accepting: {}", state.accepting);
        Some(state.accepting)
    }

    pub fn set_accepting(&mut self, id: &str, accepting: bool) -> AutomatonResult<()> {
        let state = self
            .states
            .get_mut(id)
            .ok_or_else(|| AutomatonError::UnknownState(id.to_string()))?;
        state.set_accepting(accepting);
        Ok(())
    }

    pub fn move_state(&mut self, id: &str, x: i32, y: i32) -> AutomatonResult<()> {
        let state = self
            .states
            .get_mut(id)
            .ok_or_else(|| AutomatonError::UnknownState(id.to_string()))?;
        state.set_position(x, y);
        Ok(())
    }

    /// Recompute the alphabet from the transitions currently present
    pub fn rebuild_alphabet(&mut self) {
        self.alphabet = self
            .transitions
            .iter()
            .flat_map(|t| t.individual_symbols())
            .map(str::to_string)
            .collect();
    }

    /// Remove every state and transition. The simulation mode is a user
    /// setting and survives.
    pub fn clear(&mut self) {
        debug!(
            "clearing {} state(s) and {} transition(s)",
            self.states.len(),
            self.transitions.len()
        );
        self.states.clear();
        self.transitions.clear();
        self.alphabet.clear();
        self.initial_state = None;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    pub fn contains_state(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// States in insertion order
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.values()
    }

    /// Transitions in insertion order
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.iter()
    }

    pub fn contains_transition(&self, transition: &Transition) -> bool {
        self.transitions.contains(transition)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Every symbol used by a label so far, sorted
    pub fn alphabet(&self) -> impl Iterator<Item = &str> + '_ {
        self.alphabet.iter().map(String::as_str)
    }

    pub fn initial_state(&self) -> Option<&State> {
        self.initial_state
            .as_deref()
            .and_then(|id| self.states.get(id))
    }

    pub fn is_initial(&self, id: &str) -> bool {
        self.initial_state.as_deref() == Some(id)
    }

    /// First state, in insertion order, whose disc contains `(x, y)`
    pub fn state_at(&self, x: i32, y: i32) -> Option<&State> {
        self.states.values().find(|s| s.contains(x, y))
    }

    /// First transition out of `from` that fires on `symbol`
    pub fn get_transition(&self, from: &str, symbol: &str) -> Option<&Transition> {
        self.matching_transitions(from, symbol).next()
    }

    /// Every transition out of `from` that fires on `symbol`
    pub fn get_all_transitions(&self, from: &str, symbol: &str) -> Vec<&Transition> {
        self.matching_transitions(from, symbol).collect()
    }

    pub fn transitions_from(&self, id: &str) -> Vec<&Transition> {
        self.transitions.iter().filter(|t| t.source == id).collect()
    }

    /// Transitions from `source` to `target`, in insertion order
    pub fn transitions_between(&self, source: &str, target: &str) -> Vec<&Transition> {
        self.transitions
            .iter()
            .filter(|t| t.source == source && t.target == target)
            .collect()
    }

    pub(crate) fn matching_transitions<'a, 'b>(
        &'a self,
        from: &'b str,
        symbol: &'b str,
    ) -> impl Iterator<Item = &'a Transition> + 'b
    where
        'a: 'b,
    {
        self.transitions
            .iter()
            .filter(move |t| t.source == from && t.accepts_symbol(symbol))
    }
}

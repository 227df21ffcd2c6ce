//! Editor
//! Turns pointer events on the canvas into edits of an [`Automaton`],
//! according to the active [`EditMode`].
//!
//! The editor never blocks for user input. When a new transition needs a
//! label it parks a [`PendingTransition`] and ignores further presses until
//! the shell answers with [`Editor::submit_label`].

use log::{debug, warn};

use crate::automaton::{Automaton, State, Transition};

#[cfg(test)]
mod tests;

/// What a press on the canvas does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Pick a state and drag it around
    #[default]
    Select,
    /// Create a state on empty canvas
    AddState,
    /// Click a source, then a target, then name the label
    AddTransition,
    SetInitial,
    ToggleAccepting,
    /// Remove a state and its transitions
    Delete,
}

impl EditMode {
    pub const ALL: [EditMode; 6] = [
        EditMode::Select,
        EditMode::AddState,
        EditMode::AddTransition,
        EditMode::SetInitial,
        EditMode::ToggleAccepting,
        EditMode::Delete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditMode::Select => "Move",
            EditMode::AddState => "Add state",
            EditMode::AddTransition => "Add transition",
            EditMode::SetInitial => "Set initial state",
            EditMode::ToggleAccepting => "Toggle accepting state",
            EditMode::Delete => "Delete",
        }
    }
}

/// Endpoints of a transition waiting for its label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone)]
struct Drag {
    state: String,
    /// Pointer position relative to the state centre when the drag began
    offset: (i32, i32),
}

#[derive(Debug, Clone, Default)]
pub struct Editor {
    mode: EditMode,
    selected: Option<String>,
    drag: Option<Drag>,
    transition_source: Option<String>,
    pending: Option<PendingTransition>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Switch edit mode, dropping any half-finished gesture
    pub fn set_mode(&mut self, mode: EditMode) {
        if self.mode != mode {
            debug!("edit mode: {}", mode.label());
        }
        self.mode = mode;
        self.reset();
    }

    /// The state to highlight: the one picked in select mode, or the source
    /// of a transition being drawn
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn pending_transition(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Handle a primary button press at canvas position `(x, y)`
    pub fn press(&mut self, automaton: &mut Automaton, x: i32, y: i32) {
        if self.pending.is_some() {
            return;
        }
        let hit = automaton.state_at(x, y).map(|s| (s.id.clone(), s.position()));

        match self.mode {
            EditMode::Select => {
                self.drag = hit.as_ref().map(|(id, pos)| Drag {
                    state: id.clone(),
                    offset: (x - pos.x, y - pos.y),
                });
                self.selected = hit.map(|(id, _)| id);
            }
            EditMode::AddState => {
                if hit.is_none() {
                    let id = format!("q{}", automaton.state_count());
                    if let Err(e) = automaton.add_state(State::new(id, x, y)) {
                        warn!("state not created: {e}");
                    }
                }
            }
            EditMode::AddTransition => {
                let Some((id, _)) = hit else { return };
                match self.transition_source.take() {
                    None => {
                        self.transition_source = Some(id.clone());
                        self.selected = Some(id);
                    }
                    Some(source) => {
                        self.pending = Some(PendingTransition { source, target: id });
                        self.selected = None;
                    }
                }
            }
            EditMode::SetInitial => {
                if let Some((id, _)) = hit {
                    if let Err(e) = automaton.set_initial_state(Some(&id)) {
                        warn!("initial state not changed: {e}");
                    }
                }
            }
            EditMode::ToggleAccepting => {
                if let Some((id, _)) = hit {
                    automaton.toggle_accepting(&id);
                }
            }
            EditMode::Delete => {
                if let Some((id, _)) = hit {
                    automaton.remove_state(&id);
                    if self.selected.as_deref() == Some(id.as_str()) {
                        self.selected = None;
                    }
                }
            }
        }
    }

    /// Handle pointer movement with the primary button held
    pub fn drag(&mut self, automaton: &mut Automaton, x: i32, y: i32) {
        if self.mode != EditMode::Select {
            return;
        }
        let Some(drag) = &self.drag else { return };
        let (dx, dy) = drag.offset;
        if automaton.move_state(&drag.state, x - dx, y - dy).is_err() {
            // The state went away under the pointer
            self.drag = None;
        }
    }

    pub fn release(&mut self) {
        self.drag = None;
    }

    /// Answer the label prompt of the pending transition. `None` or a blank
    /// label cancels it. Returns the transition that was added, if any.
    pub fn submit_label(
        &mut self,
        automaton: &mut Automaton,
        label: Option<&str>,
    ) -> Option<Transition> {
        let pending = self.pending.take()?;
        let label = label.map(str::trim).filter(|l| !l.is_empty())?;
        let transition = Transition::new(pending.source, pending.target, label);
        match automaton.add_transition(transition.clone()) {
            Ok(()) => Some(transition),
            Err(e) => {
                warn!("transition not created: {e}");
                None
            }
        }
    }

    /// Wipe the automaton and any gesture in progress
    pub fn clear(&mut self, automaton: &mut Automaton) {
        automaton.clear();
        self.reset();
    }

    fn reset(&mut self) {
        self.selected = None;
        self.drag = None;
        self.transition_source = None;
        self.pending = None;
    }
}

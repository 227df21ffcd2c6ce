//! Automata Tutor - build finite automata on a canvas and test words against them
//! Core model, DFA/NFA simulation, edge routing and the canvas editor

pub mod automaton;
pub mod editor;
pub mod routing;

pub use automaton::*;
pub use editor::{EditMode, Editor, PendingTransition};
pub use routing::{EdgeRouter, Route, RouteKind, RouterConfig};

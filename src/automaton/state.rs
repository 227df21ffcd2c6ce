//! States of an automaton

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A position on the canvas, in integer pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    pub fn distance(self, other: Point) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        dx.hypot(dy)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A named node of the automaton.
///
/// Identity is the id alone: two states with the same id compare equal no
/// matter where they are drawn or whether they accept. Whether a state is
/// initial is owned by the [`Automaton`](super::Automaton), not the state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// State name (identifier)
    pub id: String,
    /// Visual position on the canvas
    pub position: Point,
    /// Whether ending a run here accepts the input
    pub accepting: bool,
}

impl State {
    /// Radius of the disc a state is drawn as, and hit-tested against
    pub const RADIUS: f64 = 30.0;

    pub fn new(id: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            id: id.into(),
            position: Point::new(x, y),
            accepting: false,
        }
    }

    pub fn with_accepting(mut self, accepting: bool) -> Self {
        self.accepting = accepting;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = Point::new(x, y);
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn set_accepting(&mut self, accepting: bool) {
        self.accepting = accepting;
    }

    /// Whether `(x, y)` lies on the state's disc (boundary included)
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.position.distance(Point::new(x, y)) <= Self::RADIUS
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

//! Edge Routing
//! Decides how each transition is drawn: as a self-loop, a straight arrow,
//! or a quadratic curve bent away from the straight line. The router is a
//! pure function of the automaton's current geometry; it never mutates it.
//!
//! A transition is straight only when it is unambiguous: it is the sole
//! edge from its source to its target, there is no edge back, and the
//! straight segment does not cross a third state. Everything else curves.
//! Parallel edges are spread over lanes on both sides of the midline, and
//! the two directions of a bidirectional pair bend to opposite sides
//! because each bends relative to its own direction of travel.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_6, PI};

use egui::{pos2, vec2, Pos2, Vec2};

use crate::automaton::{Automaton, Point, State, Transition};

#[cfg(test)]
mod tests;

/// Geometry constants of the routing policy
#[derive(Clone, Debug, PartialEq)]
pub struct RouterConfig {
    /// Radius of a state disc; edges start and end on its boundary
    pub state_radius: f32,
    /// A third state closer than this to a straight segment obstructs it
    pub obstruction_radius: f32,
    /// Only states projecting strictly inside this parameter window of the
    /// segment count as obstructions
    pub obstruction_window: (f32, f32),
    /// Distance of a curve's control point from the midline
    pub base_offset: f32,
    /// Distance between neighbouring lanes of parallel edges
    pub lane_spacing: f32,
    /// Length of an arrow barb
    pub arrow_size: f32,
    /// Angle of each barb against the shaft
    pub arrow_angle: f32,
    /// Distance of a curve label from its control point
    pub label_offset: f32,
    /// Radius of the self-loop arc
    pub loop_radius: f32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            state_radius: State::RADIUS as f32,
            obstruction_radius: 45.0,
            obstruction_window: (0.1, 0.9),
            base_offset: 70.0,
            lane_spacing: 25.0,
            arrow_size: 10.0,
            arrow_angle: FRAC_PI_6,
            label_offset: 10.0,
            loop_radius: 20.0,
        }
    }
}

/// The two barbs of an arrow head meeting at `tip`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowHead {
    pub tip: Pos2,
    pub barbs: [Pos2; 2],
}

impl ArrowHead {
    /// Arrow head at `tip` for a shaft travelling in direction `angle`
    fn new(tip: Pos2, angle: f32, config: &RouterConfig) -> Self {
        let barb = |a: f32| tip - config.arrow_size * vec2(a.cos(), a.sin());
        Self {
            tip,
            barbs: [
                barb(angle - config.arrow_angle),
                barb(angle + config.arrow_angle),
            ],
        }
    }
}

/// A three-quarter arc sitting on top of its state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopRoute {
    pub center: Pos2,
    pub radius: f32,
    /// Counter-clockwise (as seen on screen) angle where the arc starts,
    /// measured from the positive x axis
    pub start_angle: f32,
    /// Counter-clockwise sweep of the arc
    pub sweep: f32,
    pub arrow: ArrowHead,
    pub label_pos: Pos2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StraightRoute {
    pub start: Pos2,
    pub end: Pos2,
    pub arrow: ArrowHead,
    pub label_pos: Pos2,
}

/// A quadratic Bezier from `start` to `end` via `control`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvedRoute {
    pub start: Pos2,
    pub control: Pos2,
    pub end: Pos2,
    /// Index of this edge among the parallel edges of its ordered pair
    pub lane: usize,
    /// Number of parallel edges of its ordered pair
    pub lanes: usize,
    /// Signed distance of the control point from the midline, along the
    /// perpendicular `(-dy, dx)` of the direction of travel
    pub offset: f32,
    pub arrow: ArrowHead,
    pub label_pos: Pos2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteKind {
    SelfLoop,
    Straight,
    Curved,
}

/// How one transition is drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Route {
    SelfLoop(LoopRoute),
    Straight(StraightRoute),
    Curved(CurvedRoute),
}

impl Route {
    pub fn kind(&self) -> RouteKind {
        match self {
            Route::SelfLoop(_) => RouteKind::SelfLoop,
            Route::Straight(_) => RouteKind::Straight,
            Route::Curved(_) => RouteKind::Curved,
        }
    }

    pub fn arrow(&self) -> ArrowHead {
        match self {
            Route::SelfLoop(r) => r.arrow,
            Route::Straight(r) => r.arrow,
            Route::Curved(r) => r.arrow,
        }
    }

    pub fn label_pos(&self) -> Pos2 {
        match self {
            Route::SelfLoop(r) => r.label_pos,
            Route::Straight(r) => r.label_pos,
            Route::Curved(r) => r.label_pos,
        }
    }

    /// The route flattened into a polyline with `segments` pieces for the
    /// curved kinds
    pub fn polyline(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(1);
        match self {
            Route::Straight(r) => vec![r.start, r.end],
            Route::SelfLoop(r) => (0..=segments)
                .map(|k| {
                    let angle = r.start_angle + r.sweep * k as f32 / segments as f32;
                    // Screen y grows downwards, so counter-clockwise flips sin
                    r.center + r.radius * vec2(angle.cos(), -angle.sin())
                })
                .collect(),
            Route::Curved(r) => (0..=segments)
                .map(|k| quadratic_point(r.start, r.control, r.end, k as f32 / segments as f32))
                .collect(),
        }
    }
}

/// Point at parameter `t` on the quadratic Bezier `p0, p1, p2`
fn quadratic_point(p0: Pos2, p1: Pos2, p2: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    let v = (u * u) * p0.to_vec2() + (2.0 * u * t) * p1.to_vec2() + (t * t) * p2.to_vec2();
    v.to_pos2()
}

fn to_pos(point: Point) -> Pos2 {
    pos2(point.x as f32, point.y as f32)
}

/// Unit perpendicular `(-dy, dx)` of `from -> to`, `None` if they coincide
fn unit_perpendicular(from: Pos2, to: Pos2) -> Option<Vec2> {
    let d = to - from;
    let length = d.length();
    (length > 0.0).then(|| vec2(-d.y, d.x) / length)
}

/// Routing policy for the edges of an automaton
#[derive(Clone, Debug, Default)]
pub struct EdgeRouter {
    config: RouterConfig,
}

impl EdgeRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Route every transition of `automaton`, in insertion order
    pub fn routes<'a>(&self, automaton: &'a Automaton) -> Vec<(&'a Transition, Route)> {
        automaton
            .transitions()
            .filter_map(|t| self.route(automaton, t).map(|route| (t, route)))
            .collect()
    }

    /// Route `transition`. `None` when `transition` is not part of
    /// `automaton`.
    pub fn route(&self, automaton: &Automaton, transition: &Transition) -> Option<Route> {
        if !automaton.contains_transition(transition) {
            return None;
        }
        let source = automaton.state(transition.source())?;
        let target = automaton.state(transition.target())?;
        let from = to_pos(source.position());
        let to = to_pos(target.position());

        // Distinct states drawn on top of each other have no direction to
        // route along
        if transition.is_self_loop() || from == to {
            return Some(Route::SelfLoop(self.self_loop(from)));
        }

        let parallel = automaton.transitions_between(source.id(), target.id());
        let has_reverse = !automaton
            .transitions_between(target.id(), source.id())
            .is_empty();
        let obstructed = self.is_obstructed(automaton, source, target);

        if parallel.len() == 1 && !has_reverse && !obstructed {
            return Some(Route::Straight(self.straight(from, to)));
        }

        let lanes = parallel.len().max(1);
        let lane = parallel.iter().position(|t| *t == transition)?;
        self.curved(from, to, lane, lanes).map(Route::Curved)
    }

    /// Whether the straight segment between `source` and `target` passes
    /// close to the centre of some third state lying between them
    pub fn is_obstructed(&self, automaton: &Automaton, source: &State, target: &State) -> bool {
        let from = to_pos(source.position());
        let to = to_pos(target.position());
        let d = to - from;
        let length_sq = d.length_sq();
        if length_sq == 0.0 {
            return false;
        }
        let (low, high) = self.config.obstruction_window;
        automaton
            .states()
            .filter(|s| *s != source && *s != target)
            .any(|s| {
                let center = to_pos(s.position());
                let t = (center - from).dot(d) / length_sq;
                if t <= low || t >= high {
                    return false;
                }
                let closest = from + t * d;
                closest.distance(center) < self.config.obstruction_radius
            })
    }

    fn self_loop(&self, at: Pos2) -> LoopRoute {
        let radius = self.config.loop_radius;
        let center = at - vec2(0.0, self.config.state_radius);
        let tip = center + vec2(0.75 * radius, 0.0);
        LoopRoute {
            center,
            radius,
            start_angle: 0.0,
            sweep: 1.5 * PI,
            arrow: ArrowHead::new(tip, FRAC_PI_2, &self.config),
            label_pos: center - vec2(0.0, radius + self.config.label_offset),
        }
    }

    fn straight(&self, from: Pos2, to: Pos2) -> StraightRoute {
        let angle = (to.y - from.y).atan2(to.x - from.x);
        let step = self.config.state_radius * vec2(angle.cos(), angle.sin());
        let start = from + step;
        let end = to - step;
        StraightRoute {
            start,
            end,
            arrow: ArrowHead::new(end, angle, &self.config),
            label_pos: start.lerp(end, 0.5),
        }
    }

    fn curved(&self, from: Pos2, to: Pos2, lane: usize, lanes: usize) -> Option<CurvedRoute> {
        let perpendicular = unit_perpendicular(from, to)?;
        let offset = self.lane_offset(lane, lanes);
        let control = from.lerp(to, 0.5) + offset * perpendicular;

        let start = self.anchor(from, control);
        let end = self.anchor(to, control);
        let tangent = end - control;
        let angle = tangent.y.atan2(tangent.x);

        Some(CurvedRoute {
            start,
            control,
            end,
            lane,
            lanes,
            offset,
            arrow: ArrowHead::new(end, angle, &self.config),
            label_pos: control + self.config.label_offset * perpendicular,
        })
    }

    /// Signed control point offset of lane `lane` out of `lanes`. Lanes are
    /// centred on the midline and then pushed out by the base offset, away
    /// from it; the centre lane goes to the positive side.
    fn lane_offset(&self, lane: usize, lanes: usize) -> f32 {
        let base = self.config.base_offset;
        if lanes <= 1 {
            return base;
        }
        let spread = (lanes - 1) as f32 * self.config.lane_spacing;
        let offset = lane as f32 * self.config.lane_spacing - spread / 2.0;
        if offset >= 0.0 {
            offset + base
        } else {
            offset - base
        }
    }

    /// Point on the disc around `center` facing `toward`
    fn anchor(&self, center: Pos2, toward: Pos2) -> Pos2 {
        let direction = (toward - center).normalized();
        center + self.config.state_radius * direction
    }
}

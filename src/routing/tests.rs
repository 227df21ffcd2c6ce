//! Unit tests for the edge routing policy

use egui::{pos2, Pos2};

use crate::automaton::{Automaton, State, Transition};
use crate::routing::{EdgeRouter, Route, RouteKind, RouterConfig};

fn automaton_with(states: &[(&str, i32, i32)], transitions: &[(&str, &str, &str)]) -> Automaton {
    let mut automaton = Automaton::new();
    for &(id, x, y) in states {
        automaton.add_state(State::new(id, x, y)).unwrap();
    }
    for &(from, to, label) in transitions {
        automaton.add_transition(Transition::new(from, to, label)).unwrap();
    }
    automaton
}

fn route_of(automaton: &Automaton, from: &str, to: &str, label: &str) -> Route {
    EdgeRouter::default()
        .route(automaton, &Transition::new(from, to, label))
        .expect("endpoints exist")
}

fn assert_close(actual: Pos2, expected: Pos2) {
    assert!(
        actual.distance(expected) < 1e-3,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn test_default_config_values() {
    let config = RouterConfig::default();
    assert_eq!(config.state_radius, 30.0);
    assert_eq!(config.obstruction_radius, 45.0);
    assert_eq!(config.base_offset, 70.0);
    assert_eq!(config.lane_spacing, 25.0);
    assert_eq!(config.arrow_size, 10.0);
}

#[test]
fn test_lone_edge_is_straight_and_trimmed_to_discs() {
    let automaton = automaton_with(&[("q0", 100, 100), ("q1", 300, 100)], &[("q0", "q1", "a")]);
    let Route::Straight(route) = route_of(&automaton, "q0", "q1", "a") else {
        panic!("expected a straight route");
    };
    assert_close(route.start, pos2(130.0, 100.0));
    assert_close(route.end, pos2(270.0, 100.0));
    assert_close(route.label_pos, pos2(200.0, 100.0));
    assert_close(route.arrow.tip, route.end);
    // Barbs trail the tip by 10 at +-30 degrees
    let cos30 = 10.0 * (std::f32::consts::FRAC_PI_6).cos();
    assert_close(route.arrow.barbs[0], pos2(270.0 - cos30, 105.0));
    assert_close(route.arrow.barbs[1], pos2(270.0 - cos30, 95.0));
}

#[test]
fn test_self_loop_sits_above_state() {
    let automaton = automaton_with(&[("q0", 100, 100)], &[("q0", "q0", "a")]);
    let Route::SelfLoop(route) = route_of(&automaton, "q0", "q0", "a") else {
        panic!("expected a self-loop");
    };
    assert_close(route.center, pos2(100.0, 70.0));
    assert_eq!(route.radius, 20.0);
    assert_close(route.arrow.tip, pos2(115.0, 70.0));
    assert!(route.label_pos.y < route.center.y - route.radius);
    // Arrow points down towards the state
    assert!(route.arrow.barbs.iter().all(|b| b.y < route.arrow.tip.y));
}

#[test]
fn test_self_loop_polyline_is_three_quarter_arc() {
    let automaton = automaton_with(&[("q0", 100, 100)], &[("q0", "q0", "a")]);
    let route = route_of(&automaton, "q0", "q0", "a");
    let points = route.polyline(4);
    assert_eq!(points.len(), 5);
    assert_close(points[0], pos2(120.0, 70.0));
    let quarter = 0.375 * std::f32::consts::PI;
    assert_close(
        points[1],
        pos2(100.0 + 20.0 * quarter.cos(), 70.0 - 20.0 * quarter.sin()),
    );
    assert_close(points[4], pos2(100.0, 90.0));
}

#[test]
fn test_coincident_states_fall_back_to_self_loop() {
    let automaton = automaton_with(&[("q0", 100, 100), ("q1", 100, 100)], &[("q0", "q1", "a")]);
    assert_eq!(route_of(&automaton, "q0", "q1", "a").kind(), RouteKind::SelfLoop);
}

#[test]
fn test_reverse_pair_curves_to_opposite_sides() {
    let automaton = automaton_with(
        &[("q0", 100, 100), ("q1", 300, 100)],
        &[("q0", "q1", "a"), ("q1", "q0", "b")],
    );
    let Route::Curved(forward) = route_of(&automaton, "q0", "q1", "a") else {
        panic!("expected a curve");
    };
    let Route::Curved(backward) = route_of(&automaton, "q1", "q0", "b") else {
        panic!("expected a curve");
    };
    assert_eq!(forward.offset, 70.0);
    assert_eq!(backward.offset, 70.0);
    // Perpendicular of +x is +y, of -x is -y
    assert_close(forward.control, pos2(200.0, 170.0));
    assert_close(backward.control, pos2(200.0, 30.0));
    assert_close(forward.label_pos, pos2(200.0, 180.0));
}

#[test]
fn test_curve_anchors_lie_on_discs() {
    let automaton = automaton_with(
        &[("q0", 100, 100), ("q1", 300, 100)],
        &[("q0", "q1", "a"), ("q1", "q0", "b")],
    );
    let Route::Curved(route) = route_of(&automaton, "q0", "q1", "a") else {
        panic!("expected a curve");
    };
    assert!((route.start.distance(pos2(100.0, 100.0)) - 30.0).abs() < 1e-3);
    assert!((route.end.distance(pos2(300.0, 100.0)) - 30.0).abs() < 1e-3);
    assert_close(route.arrow.tip, route.end);
    let points = Route::Curved(route).polyline(8);
    assert_close(points[0], route.start);
    assert_close(points[8], route.end);
}

#[test]
fn test_parallel_lanes_spread_symmetrically() {
    let automaton = automaton_with(
        &[("q0", 100, 100), ("q1", 300, 100)],
        &[("q0", "q1", "a"), ("q0", "q1", "b"), ("q0", "q1", "c")],
    );
    let offsets: Vec<f32> = ["a", "b", "c"]
        .iter()
        .map(|label| match route_of(&automaton, "q0", "q1", label) {
            Route::Curved(route) => {
                assert_eq!(route.lanes, 3);
                route.offset
            }
            other => panic!("expected a curve, got {other:?}"),
        })
        .collect();
    assert_eq!(offsets, vec![-95.0, 70.0, 95.0]);
}

#[test]
fn test_obstruction_window_excludes_states_near_endpoints() {
    // q2 sits right on the segment, but at t = 0.05
    let near_end = automaton_with(
        &[("q0", 0, 0), ("q1", 400, 0), ("q2", 20, 0)],
        &[("q0", "q1", "a")],
    );
    assert_eq!(route_of(&near_end, "q0", "q1", "a").kind(), RouteKind::Straight);

    // Same distance from the line, but halfway along
    let middle = automaton_with(
        &[("q0", 0, 0), ("q1", 400, 0), ("q2", 200, 44)],
        &[("q0", "q1", "a")],
    );
    assert_eq!(route_of(&middle, "q0", "q1", "a").kind(), RouteKind::Curved);

    let far = automaton_with(
        &[("q0", 0, 0), ("q1", 400, 0), ("q2", 200, 46)],
        &[("q0", "q1", "a")],
    );
    assert_eq!(route_of(&far, "q0", "q1", "a").kind(), RouteKind::Straight);
}

#[test]
fn test_routes_cover_every_transition_in_order() {
    let automaton = automaton_with(
        &[("q0", 100, 100), ("q1", 300, 100)],
        &[("q0", "q1", "a"), ("q1", "q1", "b")],
    );
    let routes = EdgeRouter::default().routes(&automaton);
    let kinds: Vec<_> = routes.iter().map(|(t, r)| (t.label(), r.kind())).collect();
    assert_eq!(
        kinds,
        vec![("a", RouteKind::Straight), ("b", RouteKind::SelfLoop)]
    );
}

#[test]
fn test_route_of_foreign_transition_is_none() {
    let automaton = automaton_with(&[("q0", 0, 0)], &[]);
    assert!(EdgeRouter::default()
        .route(&automaton, &Transition::new("q0", "q7", "a"))
        .is_none());
}

#[test]
fn test_route_of_absent_transition_between_known_states_is_none() {
    let automaton = automaton_with(&[("q0", 0, 0), ("q1", 200, 0)], &[("q0", "q1", "a")]);
    let router = EdgeRouter::default();
    assert!(router.route(&automaton, &Transition::new("q0", "q1", "b")).is_none());
    assert!(router.route(&automaton, &Transition::new("q1", "q0", "a")).is_none());
    assert!(router.route(&automaton, &Transition::new("q0", "q0", "a")).is_none());
}

#[test]
fn test_custom_config_moves_control_point() {
    let automaton = automaton_with(
        &[("q0", 100, 100), ("q1", 300, 100)],
        &[("q0", "q1", "a"), ("q1", "q0", "b")],
    );
    let router = EdgeRouter::new(RouterConfig {
        base_offset: 40.0,
        ..RouterConfig::default()
    });
    let Some(Route::Curved(route)) = router.route(&automaton, &Transition::new("q0", "q1", "a")) else {
        panic!("expected a curve");
    };
    assert_close(route.control, pos2(200.0, 140.0));
}

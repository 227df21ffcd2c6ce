//! Unit tests for the canvas editor

use crate::automaton::{Automaton, Mode, Point, State, Transition};
use crate::editor::{EditMode, Editor, PendingTransition};

fn editor_in(mode: EditMode) -> Editor {
    let mut editor = Editor::new();
    editor.set_mode(mode);
    editor
}

#[test]
fn test_add_state_names_by_count() {
    let mut automaton = Automaton::new();
    let mut editor = editor_in(EditMode::AddState);
    editor.press(&mut automaton, 100, 100);
    editor.press(&mut automaton, 300, 100);
    let ids: Vec<_> = automaton.states().map(State::id).collect();
    assert_eq!(ids, vec!["q0", "q1"]);
    assert_eq!(automaton.state("q1").unwrap().position(), Point::new(300, 100));
}

#[test]
fn test_add_state_on_existing_state_does_nothing() {
    let mut automaton = Automaton::new();
    let mut editor = editor_in(EditMode::AddState);
    editor.press(&mut automaton, 100, 100);
    editor.press(&mut automaton, 110, 105);
    assert_eq!(automaton.state_count(), 1);
}

#[test]
fn test_add_state_with_taken_name_is_skipped() {
    let mut automaton = Automaton::new();
    let mut editor = editor_in(EditMode::AddState);
    editor.press(&mut automaton, 100, 100); // q0
    editor.press(&mut automaton, 300, 100); // q1
    automaton.remove_state("q0");
    // One state left, so the next name would be q1 again
    editor.press(&mut automaton, 500, 100);
    assert_eq!(automaton.state_count(), 1);
    assert_eq!(automaton.state("q1").unwrap().position(), Point::new(300, 100));
}

#[test]
fn test_select_and_drag_keeps_grab_offset() {
    let mut automaton = Automaton::new();
    automaton.add_state(State::new("q0", 100, 100)).unwrap();
    let mut editor = editor_in(EditMode::Select);

    editor.press(&mut automaton, 110, 95);
    assert_eq!(editor.selected(), Some("q0"));
    assert!(editor.is_dragging());

    editor.drag(&mut automaton, 210, 195);
    assert_eq!(automaton.state("q0").unwrap().position(), Point::new(200, 200));

    editor.release();
    assert!(!editor.is_dragging());
    editor.drag(&mut automaton, 0, 0);
    assert_eq!(automaton.state("q0").unwrap().position(), Point::new(200, 200));
}

#[test]
fn test_select_on_empty_canvas_deselects() {
    let mut automaton = Automaton::new();
    automaton.add_state(State::new("q0", 100, 100)).unwrap();
    let mut editor = editor_in(EditMode::Select);
    editor.press(&mut automaton, 100, 100);
    editor.release();
    editor.press(&mut automaton, 500, 500);
    assert_eq!(editor.selected(), None);
    assert!(!editor.is_dragging());
}

#[test]
fn test_add_transition_flow() {
    let mut automaton = Automaton::new();
    automaton.add_state(State::new("q0", 100, 100)).unwrap();
    automaton.add_state(State::new("q1", 300, 100)).unwrap();
    let mut editor = editor_in(EditMode::AddTransition);

    // Empty canvas is ignored
    editor.press(&mut automaton, 200, 300);
    assert_eq!(editor.selected(), None);

    editor.press(&mut automaton, 100, 100);
    assert_eq!(editor.selected(), Some("q0"));
    assert!(editor.pending_transition().is_none());

    editor.press(&mut automaton, 300, 100);
    assert_eq!(
        editor.pending_transition(),
        Some(&PendingTransition {
            source: "q0".to_string(),
            target: "q1".to_string(),
        })
    );
    assert_eq!(editor.selected(), None);

    // Presses are ignored while the label prompt is open
    editor.press(&mut automaton, 100, 100);
    assert!(editor.pending_transition().is_some());

    let added = editor.submit_label(&mut automaton, Some("  0,1 "));
    assert_eq!(added, Some(Transition::new("q0", "q1", "0,1")));
    assert!(editor.pending_transition().is_none());
    assert_eq!(automaton.transition_count(), 1);
    assert_eq!(automaton.alphabet().collect::<Vec<_>>(), vec!["0", "1"]);
}

#[test]
fn test_add_self_loop_by_clicking_twice() {
    let mut automaton = Automaton::new();
    automaton.add_state(State::new("q0", 100, 100)).unwrap();
    let mut editor = editor_in(EditMode::AddTransition);
    editor.press(&mut automaton, 100, 100);
    editor.press(&mut automaton, 100, 100);
    editor.submit_label(&mut automaton, Some("a"));
    assert!(automaton.transitions().all(Transition::is_self_loop));
    assert_eq!(automaton.transition_count(), 1);
}

#[test]
fn test_cancelled_or_blank_label_creates_nothing() {
    let mut automaton = Automaton::new();
    automaton.add_state(State::new("q0", 100, 100)).unwrap();
    automaton.add_state(State::new("q1", 300, 100)).unwrap();
    let mut editor = editor_in(EditMode::AddTransition);

    for answer in [None, Some(""), Some("   ")] {
        editor.press(&mut automaton, 100, 100);
        editor.press(&mut automaton, 300, 100);
        assert!(editor.submit_label(&mut automaton, answer).is_none());
        assert!(editor.pending_transition().is_none());
    }
    assert_eq!(automaton.transition_count(), 0);
}

#[test]
fn test_set_initial_toggle_accepting_and_delete() {
    let mut automaton = Automaton::new();
    automaton.add_state(State::new("q0", 100, 100)).unwrap();
    automaton.add_state(State::new("q1", 300, 100)).unwrap();
    automaton.add_transition(Transition::new("q0", "q1", "a")).unwrap();
    let mut editor = Editor::new();

    editor.set_mode(EditMode::SetInitial);
    editor.press(&mut automaton, 100, 100);
    assert!(automaton.is_initial("q0"));
    editor.press(&mut automaton, 300, 100);
    assert!(automaton.is_initial("q1"));
    assert!(!automaton.is_initial("q0"));

    editor.set_mode(EditMode::ToggleAccepting);
    editor.press(&mut automaton, 300, 100);
    assert!(automaton.state("q1").unwrap().is_accepting());
    editor.press(&mut automaton, 300, 100);
    assert!(!automaton.state("q1").unwrap().is_accepting());

    editor.set_mode(EditMode::Delete);
    editor.press(&mut automaton, 500, 500);
    assert_eq!(automaton.state_count(), 2);
    editor.press(&mut automaton, 300, 100);
    assert_eq!(automaton.state_count(), 1);
    assert_eq!(automaton.transition_count(), 0);
    assert!(automaton.initial_state().is_none());
}

#[test]
fn test_mode_switch_drops_half_finished_transition() {
    let mut automaton = Automaton::new();
    automaton.add_state(State::new("q0", 100, 100)).unwrap();
    automaton.add_state(State::new("q1", 300, 100)).unwrap();
    let mut editor = editor_in(EditMode::AddTransition);
    editor.press(&mut automaton, 100, 100);

    editor.set_mode(EditMode::Select);
    editor.set_mode(EditMode::AddTransition);
    assert_eq!(editor.selected(), None);
    // This press starts a new transition rather than finishing the old one
    editor.press(&mut automaton, 300, 100);
    assert!(editor.pending_transition().is_none());
    assert_eq!(editor.selected(), Some("q1"));
}

#[test]
fn test_drag_only_in_select_mode() {
    let mut automaton = Automaton::new();
    automaton.add_state(State::new("q0", 100, 100)).unwrap();
    let mut editor = editor_in(EditMode::ToggleAccepting);
    editor.press(&mut automaton, 100, 100);
    editor.drag(&mut automaton, 400, 400);
    assert_eq!(automaton.state("q0").unwrap().position(), Point::new(100, 100));
}

#[test]
fn test_clear_wipes_automaton_but_keeps_modes() {
    let mut automaton = Automaton::new();
    let mut editor = editor_in(EditMode::AddState);
    editor.press(&mut automaton, 100, 100);
    automaton.set_mode(Mode::Nondeterministic);

    editor.clear(&mut automaton);
    assert!(automaton.is_empty());
    assert!(automaton.is_nondeterministic());
    assert_eq!(editor.mode(), EditMode::AddState);
}

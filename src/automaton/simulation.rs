//! Acceptance checks and step traces for input words.
//!
//! Every `char` of the input is one symbol. In deterministic mode the run
//! follows the first matching transition and rejects as soon as none
//! exists; in nondeterministic mode all runs are followed in parallel as a
//! set of current states.

use std::fmt;

use indexmap::IndexSet;
use log::trace;
use serde::Serialize;

use super::{Automaton, Mode, State};

impl Automaton {
    /// Whether the automaton accepts `input` under the current mode.
    /// Without an initial state nothing is accepted.
    pub fn simulate(&self, input: &str) -> bool {
        match self.mode {
            Mode::Deterministic => self.simulate_deterministic(input),
            Mode::Nondeterministic => self.simulate_nondeterministic(input),
        }
    }

    /// One exemplary run over `input` under the current mode, starting with
    /// the initial state. The run stops early where it blocks. Without an
    /// initial state the trace is empty.
    pub fn simulate_steps(&self, input: &str) -> Vec<&State> {
        match self.mode {
            Mode::Deterministic => self.deterministic_steps(input),
            Mode::Nondeterministic => self.nondeterministic_steps(input),
        }
    }

    /// Run `input` and collect everything the test panel shows
    pub fn test(&self, input: &str) -> TestReport {
        let accepted = self.simulate(input);
        let steps = self.simulate_steps(input);
        TestReport {
            input: input.to_string(),
            mode: self.mode,
            accepted,
            final_accepting: steps.last().is_some_and(|s| s.accepting),
            trace: steps.into_iter().map(|s| s.id.clone()).collect(),
        }
    }

    fn simulate_deterministic(&self, input: &str) -> bool {
        let Some(mut current) = self.initial_state() else {
            return false;
        };
        for c in input.chars() {
            let mut buf = [0u8; 4];
            let symbol: &str = c.encode_utf8(&mut buf);
            let Some(next) = self.deterministic_successor(current, symbol) else {
                trace!("{}: no transition on '{symbol}', rejecting", current.id);
                return false;
            };
            trace!("{} --{symbol}--> {}", current.id, next.id);
            current = next;
        }
        current.accepting
    }

    fn simulate_nondeterministic(&self, input: &str) -> bool {
        let Some(initial) = self.initial_state() else {
            return false;
        };
        let mut current: IndexSet<&State> = IndexSet::from([initial]);
        for c in input.chars() {
            let mut buf = [0u8; 4];
            let symbol: &str = c.encode_utf8(&mut buf);
            let next: IndexSet<&State> = current
                .iter()
                .flat_map(|q| self.successors(q, symbol))
                .collect();
            trace!(
                "{{{}}} --{symbol}--> {{{}}}",
                join_ids(&current),
                join_ids(&next)
            );
            if next.is_empty() {
                return false;
            }
            current = next;
        }
        current.iter().any(|q| q.accepting)
    }

    fn deterministic_steps(&self, input: &str) -> Vec<&State> {
        let Some(mut current) = self.initial_state() else {
            return Vec::new();
        };
        let mut steps = vec![current];
        for c in input.chars() {
            let mut buf = [0u8; 4];
            let symbol: &str = c.encode_utf8(&mut buf);
            match self.deterministic_successor(current, symbol) {
                Some(next) => {
                    current = next;
                    steps.push(current);
                }
                None => break,
            }
        }
        steps
    }

    /// Breadth-first search over runs, one level per symbol.
    ///
    /// Each level keeps only the first path reaching a given state; the
    /// set of reachable end states is the same as when keeping every path.
    /// When a level dies out, the first path of the farthest level is
    /// returned. Otherwise the first path ending in an accepting state wins,
    /// falling back to the first surviving path.
    fn nondeterministic_steps(&self, input: &str) -> Vec<&State> {
        let Some(initial) = self.initial_state() else {
            return Vec::new();
        };
        let mut level: Vec<Vec<&State>> = vec![vec![initial]];
        for c in input.chars() {
            let mut buf = [0u8; 4];
            let symbol: &str = c.encode_utf8(&mut buf);
            let mut reached: IndexSet<&State> = IndexSet::new();
            let mut next: Vec<Vec<&State>> = Vec::new();
            for path in &level {
                let Some(last) = path.last() else { continue };
                for target in self.successors(last, symbol) {
                    if reached.insert(target) {
                        let mut child = path.clone();
                        child.push(target);
                        next.push(child);
                    }
                }
            }
            if next.is_empty() {
                trace!("all runs blocked on '{symbol}'");
                return level.into_iter().next().unwrap_or_default();
            }
            level = next;
        }
        let chosen = level
            .iter()
            .position(|path| path.last().is_some_and(|q| q.accepting))
            .unwrap_or(0);
        level.into_iter().nth(chosen).unwrap_or_default()
    }

    fn deterministic_successor(&self, from: &State, symbol: &str) -> Option<&State> {
        self.get_transition(&from.id, symbol)
            .and_then(|t| self.state(&t.target))
    }

    fn successors<'a, 'b>(
        &'a self,
        from: &'b State,
        symbol: &'b str,
    ) -> impl Iterator<Item = &'a State> + 'b
    where
        'a: 'b,
    {
        self.matching_transitions(&from.id, symbol)
            .filter_map(|t| self.state(&t.target))
    }
}

fn join_ids(states: &IndexSet<&State>) -> String {
    states
        .iter()
        .map(|s| s.id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of testing one input word, detached from the automaton so it
/// can outlive further edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestReport {
    pub input: String,
    pub mode: Mode,
    pub accepted: bool,
    /// Ids along the exemplary run, starting with the initial state
    pub trace: Vec<String>,
    /// Whether the last state of the trace was accepting
    pub final_accepting: bool,
}

impl TestReport {
    /// Index of the first symbol the run could not consume
    pub fn blocked_at(&self) -> Option<usize> {
        if self.trace.is_empty() {
            return None;
        }
        let consumed = self.trace.len() - 1;
        (consumed < self.input.chars().count()).then_some(consumed)
    }

    pub fn final_state(&self) -> Option<&str> {
        self.trace.last().map(String::as_str)
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(start) = self.trace.first() else {
            return f.write_str("No run (no initial state)");
        };
        write!(f, "Start: {start}")?;
        if self.input.is_empty() {
            f.write_str("\n(empty input)")?;
        } else {
            for (i, c) in self.input.chars().enumerate() {
                match self.trace.get(i + 1) {
                    Some(next) => write!(f, "\nRead '{c}' -> {next}")?,
                    None => {
                        write!(f, "\nRead '{c}' -> (no transition - BLOCKED)")?;
                        break;
                    }
                }
            }
        }
        let last = self.trace.last().unwrap_or(start);
        let verdict = if self.final_accepting {
            "accepting"
        } else {
            "not accepting"
        };
        write!(f, "\n\nFinal state: {last} ({verdict})")
    }
}

//! Post-parse validation of a complete state machine tree.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

use crate::error::FsmError;
use crate::model::{DEFAULT_STATE, DEFAULT_TRANSITION, Fsm, Guard, Map, State, StateRef};

/// A tree that passed [`validate`]. Backends only accept this.
#[derive(Debug, Clone)]
pub struct Validated<'a> {
    fsm: &'a Fsm,
    start: (&'a Map, &'a State),
    unreachable: Vec<String>,
}

impl<'a> Validated<'a> {
    pub fn fsm(&self) -> &'a Fsm {
        self.fsm
    }

    pub fn start_map(&self) -> &'a Map {
        self.start.0
    }

    pub fn start_state(&self) -> &'a State {
        self.start.1
    }

    /// States (as `Map::State`) no transition chain from the start state
    /// reaches. Reported, not rejected.
    pub fn unreachable(&self) -> &[String] {
        &self.unreachable
    }
}

/// Checks every cross-entity rule of `fsm`; the first violation aborts.
pub fn validate(fsm: &Fsm) -> Result<Validated<'_>, FsmError> {
    let _span = tracing::debug_span!("validate", context = fsm.context()).entered();

    check_complete(fsm)?;
    let start = resolve_start(fsm)?;

    let transition_names: Vec<&str> = fsm
        .transitions()
        .into_iter()
        .map(|t| t.name())
        .filter(|name| *name != DEFAULT_TRANSITION)
        .collect();

    for map in fsm.maps() {
        for state in map.default_state().into_iter().chain(map.states()) {
            for transition in state.transitions() {
                for guard in transition.guards() {
                    check_guard(fsm, map, guard, &transition_names)?;
                }
            }
        }
    }

    let unreachable = unreachable_states(fsm, start);
    for name in &unreachable {
        tracing::warn!(state = %name, "state is unreachable from the start state");
    }

    tracing::debug!(maps = fsm.maps().len(), "state machine is valid");
    Ok(Validated {
        fsm,
        start,
        unreachable,
    })
}

fn check_complete(fsm: &Fsm) -> Result<(), FsmError> {
    let incomplete = |reason: &str| FsmError::Incomplete {
        reason: reason.to_owned(),
        line: fsm.start_line(),
    };

    if fsm.context().trim().is_empty() {
        return Err(incomplete("no context class"));
    }
    if fsm.start_state().is_none() {
        return Err(incomplete("no start state"));
    }
    if fsm.maps().is_empty() {
        return Err(incomplete("no maps"));
    }
    Ok(())
}

fn resolve_start(fsm: &Fsm) -> Result<(&Map, &State), FsmError> {
    let line = fsm.start_line();
    let Some(start) = fsm.start_state() else {
        return Err(FsmError::Incomplete {
            reason: "no start state".to_owned(),
            line,
        });
    };
    let unknown = || FsmError::UnknownStartState {
        state: start.to_string(),
        line,
    };

    if let Some(map) = start.map() {
        return fsm.resolve(start, map).ok_or_else(unknown);
    }

    let mut found = fsm
        .states()
        .filter(|(_, state)| state.instance_name() == start.state());
    match (found.next(), found.next()) {
        (Some(only), None) => Ok(only),
        (Some(_), Some(_)) => Err(FsmError::AmbiguousStartState {
            state: start.to_string(),
            line,
        }),
        (None, _) => Err(unknown()),
    }
}

fn check_guard(
    fsm: &Fsm,
    map: &Map,
    guard: &Guard,
    transition_names: &[&str],
) -> Result<(), FsmError> {
    let line = guard.line();

    if let Some(end) = guard.end_state().and_then(|end| end.state_ref()) {
        check_target(fsm, map, end, line)?;
    }
    if let Some(push) = guard.push_state() {
        check_target(fsm, map, push, line)?;
    }
    if let Some(transition) = guard.pop_transition() {
        if !transition_names.contains(&transition) {
            return Err(FsmError::UnknownPopTransition {
                transition: transition.to_owned(),
                line,
            });
        }
    }
    Ok(())
}

fn check_target(fsm: &Fsm, map: &Map, target: &StateRef, line: u32) -> Result<(), FsmError> {
    if target.state() == DEFAULT_STATE {
        return Err(FsmError::DefaultTarget { line });
    }
    match fsm.resolve(target, map.name()) {
        Some(_) => Ok(()),
        None => Err(FsmError::UnknownState {
            map: target.map_or(map.name()).to_owned(),
            state: target.state().to_owned(),
            line,
        }),
    }
}

/// Searches the state graph from the start state. Default-state guards
/// apply to every state of their map.
fn unreachable_states(fsm: &Fsm, start: (&Map, &State)) -> Vec<String> {
    let mut graph: DiGraph<(&str, &str), ()> = DiGraph::new();
    let mut index: HashMap<(&str, &str), NodeIndex> = HashMap::new();
    for (map, state) in fsm.states() {
        let key = (map.name(), state.instance_name());
        index.insert(key, graph.add_node(key));
    }

    let targets = |map: &Map, guard: &Guard| -> Vec<NodeIndex> {
        let end = guard.end_state().and_then(|end| end.state_ref());
        end.into_iter()
            .chain(guard.push_state())
            .filter_map(|target| fsm.resolve(target, map.name()))
            .filter_map(|(m, s)| index.get(&(m.name(), s.instance_name())).copied())
            .collect()
    };

    let mut edges = Vec::new();
    for map in fsm.maps() {
        let default_guards: Vec<&Guard> = map
            .default_state()
            .into_iter()
            .flat_map(|d| d.transitions())
            .flat_map(|t| t.guards())
            .collect();

        for state in map.states() {
            let from = index[&(map.name(), state.instance_name())];
            let own = state.transitions().iter().flat_map(|t| t.guards());
            for guard in own.chain(default_guards.iter().copied()) {
                for to in targets(map, guard) {
                    edges.push((from, to));
                }
            }
        }
    }
    graph.extend_with_edges(edges);

    let start = index[&(start.0.name(), start.1.instance_name())];
    let mut reached = vec![false; graph.node_count()];
    let mut dfs = Dfs::new(&graph, start);
    while let Some(node) = dfs.next(&graph) {
        reached[node.index()] = true;
    }

    graph
        .node_indices()
        .filter(|node| !reached[node.index()])
        .map(|node| {
            let (map, state) = graph[node];
            format!("{map}::{state}")
        })
        .collect()
}

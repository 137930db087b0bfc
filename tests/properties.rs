use std::collections::BTreeSet;

use fsmc::{
    EndState, Fsm, GeneratorOptions, Guard, Map, State, Target, TransType, Transfer, Transition,
    generate, is_loopback,
};
use proptest::prelude::*;

const NAMES: [&str; 4] = ["Alpha", "Beta", "Gamma", "Delta"];

/// Per state: the transition names it defines, each with a target state
/// index (`None` for nil).
type StateShape = Vec<(usize, Option<usize>)>;

fn state_shapes() -> impl Strategy<Value = (Vec<StateShape>, StateShape)> {
    let transitions = |states: usize| {
        proptest::collection::btree_map(
            0..NAMES.len(),
            proptest::option::of(0..states),
            0..NAMES.len(),
        )
        .prop_map(|m| m.into_iter().collect::<StateShape>())
    };
    (1usize..5).prop_flat_map(move |states| {
        (
            proptest::collection::vec(transitions(states), states),
            transitions(states),
        )
    })
}

fn build((states, default): &(Vec<StateShape>, StateShape), with_default: bool) -> Fsm {
    let state = |name: String, shape: &StateShape| {
        shape.iter().fold(State::new(name, 1), |state, (t, end)| {
            let end = end.map_or_else(|| "nil".to_owned(), |i| format!("S{i}"));
            let transition = Transition::new(NAMES[*t], 1)
                .with_guard(Guard::new("", Transfer::Set(EndState::parse(&end)), 1))
                .unwrap();
            state.with_transition(transition).unwrap()
        })
    };

    let mut map = Map::new("Main", 1);
    for (i, shape) in states.iter().enumerate() {
        map.add_state(state(format!("S{i}"), shape)).unwrap();
    }
    if with_default {
        map.add_state(state("Default".to_owned(), default)).unwrap();
    }
    let mut fsm = Fsm::new("Owner").with_map(map).unwrap();
    fsm.set_start_state("Main::S0", 1);
    fsm
}

proptest! {
    #[test]
    fn merged_transitions_sorted_and_unique(shapes in state_shapes(), with_default: bool) {
        let fsm = build(&shapes, with_default);
        let map = &fsm.maps()[0];
        let names: Vec<&str> = map.transitions().iter().map(|t| t.name()).collect();

        let mut expected = BTreeSet::new();
        for state in map.states().iter().chain(map.default_state()) {
            for transition in state.transitions() {
                expected.insert(transition.name());
            }
        }
        prop_assert_eq!(names, expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn default_stubs_cover_exactly_the_missing_names(shapes in state_shapes(), with_default: bool) {
        let fsm = build(&shapes, with_default);
        let map = &fsm.maps()[0];

        let defined: BTreeSet<&str> = map
            .default_state()
            .map(|d| d.transitions().iter().map(|t| t.name()).collect())
            .unwrap_or_default();
        let used: BTreeSet<&str> = map
            .states()
            .iter()
            .flat_map(|s| s.transitions())
            .map(|t| t.name())
            .collect();
        let stubs: Vec<&str> = map
            .undefined_default_transitions()
            .iter()
            .map(|t| t.name())
            .collect();

        prop_assert_eq!(stubs, used.difference(&defined).copied().collect::<Vec<_>>());
    }

    #[test]
    fn generation_is_deterministic_and_parses(shapes in state_shapes(), with_default: bool) {
        let fsm = build(&shapes, with_default);
        let options = GeneratorOptions::default();

        let first = generate(&fsm, Target::Rust, &options).unwrap();
        let second = generate(&build(&shapes, with_default), Target::Rust, &options).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(syn::parse_file(&first).is_ok());

        let listing = generate(&fsm, Target::Listing, &options).unwrap();
        prop_assert_eq!(listing, generate(&fsm, Target::Listing, &options).unwrap());
    }

    #[test]
    fn loopback_matches_guard(end in proptest::option::of("[A-Z][a-z]{0,6}"), kind in 0u8..3) {
        let end = end.map_or(EndState::Nil, |name| EndState::parse(&name));
        let transfer = match kind {
            0 => Transfer::Set(end.clone()),
            1 => Transfer::Push { end: end.clone(), push: fsmc::StateRef::parse("Other") },
            _ => Transfer::Pop { transition: None, args: Vec::new() },
        };
        let guard = Guard::new("", transfer, 1);
        let trans_type = guard.trans_type();

        prop_assert_eq!(guard.is_loopback(), is_loopback(trans_type, &end));
        prop_assert_eq!(
            guard.is_loopback(),
            trans_type == TransType::Push || (trans_type == TransType::Set && end.is_nil())
        );
    }
}

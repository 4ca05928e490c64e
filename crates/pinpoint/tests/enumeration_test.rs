//! Integration tests for justification and repair enumeration

use pinpoint::{
    collect_justifications, has_cycle, is_derivable, load_proof, CancellationToken,
    CycleRemovingProof, Enumeration, EnumerationConfig, EnumerationStatus, EnumerationStrategy,
    InferenceSet, ProofInfo, SelectionStrategy, StronglyConnectedComponents,
    TautologyRemovingProof,
};

fn strategies() -> Vec<EnumerationStrategy> {
    vec![
        EnumerationStrategy::BottomUp,
        EnumerationStrategy::TopDown,
        EnumerationStrategy::Resolution(SelectionStrategy::BottomUp),
        EnumerationStrategy::Resolution(SelectionStrategy::TopDown),
        EnumerationStrategy::Resolution(SelectionStrategy::Threshold(2)),
    ]
}

fn config(strategy: EnumerationStrategy) -> EnumerationConfig {
    EnumerationConfig {
        strategy,
        ..EnumerationConfig::default()
    }
}

fn sorted(mut sets: Vec<Vec<&'static str>>) -> Vec<Vec<&'static str>> {
    for set in &mut sets {
        set.sort();
    }
    sets.sort();
    sets
}

fn two_alternatives() -> InferenceSet<&'static str, &'static str> {
    InferenceSet::new()
        .with("r1", "G", ["x"], ["ax1"])
        .with("r2", "G", [], ["ax2", "ax3"])
        .with("r3", "x", [], ["ax4"])
}

#[test]
fn test_two_alternatives_with_every_strategy() {
    let set = two_alternatives();
    for strategy in strategies() {
        let enumeration = Enumeration::new(&set, &set, &config(strategy)).unwrap();
        let mut found: Vec<Vec<&str>> = Vec::new();
        let report = enumeration.justifications(&"G", &mut found);
        assert!(report.is_complete(), "{}", strategy);
        assert_eq!(sorted(found), vec![vec!["ax1", "ax4"], vec!["ax2", "ax3"]], "{}", strategy);
    }
}

#[test]
fn test_self_loop_has_no_justification() {
    let set: InferenceSet<&str, &str> = InferenceSet::new().with("loop", "X", ["X"], []);
    for strategy in strategies() {
        let enumeration = Enumeration::new(&set, &set, &config(strategy)).unwrap();
        let mut found: Vec<Vec<&str>> = Vec::new();
        let report = enumeration.justifications(&"X", &mut found);
        assert_eq!(report.status, EnumerationStatus::Complete);
        assert!(found.is_empty(), "{}", strategy);
    }
    assert!(has_cycle(&set, &"X"));
}

#[test]
fn test_repairs_of_two_alternatives() {
    let set = two_alternatives();
    let enumeration = Enumeration::new(&set, &set, &EnumerationConfig::default()).unwrap();
    let mut found: Vec<Vec<&str>> = Vec::new();
    let report = enumeration.repairs(&"G", &mut found);
    assert!(report.is_complete());
    assert_eq!(
        sorted(found.clone()),
        vec![
            vec!["ax1", "ax2"],
            vec!["ax1", "ax3"],
            vec!["ax2", "ax4"],
            vec!["ax3", "ax4"],
        ]
    );
    let all = ["ax1", "ax2", "ax3", "ax4"];
    for repair in found {
        let rest: Vec<&str> = all.iter().copied().filter(|a| !repair.contains(a)).collect();
        assert!(!is_derivable(&set, &set, &"G", &rest));
    }
}

#[test]
fn test_cancellation_from_listener() {
    let set = two_alternatives();
    for strategy in strategies() {
        let token = CancellationToken::new();
        let enumeration = Enumeration::new(&set, &set, &config(strategy))
            .unwrap()
            .with_monitor(&token);
        let mut found: Vec<Vec<&str>> = Vec::new();
        let report = enumeration.justifications(&"G", &mut |axioms: &[&'static str]| {
            found.push(axioms.to_vec());
            token.cancel();
        });
        assert_eq!(report.status, EnumerationStatus::Interrupted, "{}", strategy);
        assert_eq!(found.len(), 1, "{}", strategy);
        assert_eq!(report.emitted, 1);
    }
}

#[test]
fn test_collector_respects_size_limit() {
    let set = InferenceSet::new()
        .with("small", "G", [], ["a"])
        .with("via", "G", ["x"], [])
        .with("x", "x", [], ["b", "c"])
        .with("large", "G", [], ["d", "e", "f", "g"]);
    let found = collect_justifications(&set, &set, &"G", &EnumerationConfig::default(), 2).unwrap();
    assert_eq!(found, vec![vec!["a"], vec!["b", "c"]]);
}

#[test]
fn test_json_proof_enumeration() {
    let json = r#"{
        "goal": "G",
        "inferences": [
            {"name": "g", "conclusion": "G", "premises": ["a", "b"]},
            {"name": "a", "conclusion": "a", "axioms": ["p"]},
            {"name": "b1", "conclusion": "b", "axioms": ["q"]},
            {"name": "b2", "conclusion": "b", "premises": ["a"], "axioms": []}
        ]
    }"#;
    let (set, goal) = load_proof(json).unwrap();
    let goal = goal.unwrap();
    let config = EnumerationConfig::from_json(r#"{"strategy": "top-down"}"#).unwrap();
    let enumeration = Enumeration::new(&set, &set, &config).unwrap();
    let mut found: Vec<Vec<String>> = Vec::new();
    enumeration.justifications(&goal, &mut found);
    assert_eq!(found, vec![vec!["p".to_string()]]);
}

#[test]
fn test_cycle_removal_keeps_justifications() {
    let set = InferenceSet::new()
        .with("g", "G", ["a"], [])
        .with("ab", "a", ["b"], ["x"])
        .with("ba", "b", ["a"], ["y"])
        .with("b", "b", [], ["z"])
        .with("aa", "a", ["a"], ["w"]);
    let acyclic = CycleRemovingProof::new(&set, &"G");
    assert!(!has_cycle(&acyclic, &"G"));
    assert!(has_cycle(&set, &"G"));

    for strategy in strategies() {
        let original = Enumeration::new(&set, &set, &config(strategy)).unwrap();
        let adapted = Enumeration::new(&acyclic, &set, &config(strategy)).unwrap();
        let mut before: Vec<Vec<&str>> = Vec::new();
        let mut after: Vec<Vec<&str>> = Vec::new();
        original.justifications(&"G", &mut before);
        adapted.justifications(&"G", &mut after);
        assert_eq!(sorted(before), sorted(after), "{}", strategy);
    }
}

#[test]
fn test_tautology_removal_keeps_justifications() {
    let set = InferenceSet::new()
        .with("g", "G", ["t"], ["a"])
        .with("t1", "t", [], [])
        .with("t2", "t", ["s"], ["c"])
        .with("s", "s", [], ["d"]);
    let adapted = TautologyRemovingProof::new(&set, &set, &"G");
    assert!(adapted.is_tautology(&"t"));

    let info = ProofInfo::collect(&adapted, &set, &"G");
    assert_eq!(info.inferences.len(), 2);
    assert_eq!(info.axioms, vec!["a"]);

    let enumeration = Enumeration::new(&adapted, &set, &EnumerationConfig::default()).unwrap();
    let mut found: Vec<Vec<&str>> = Vec::new();
    enumeration.justifications(&"G", &mut found);
    assert_eq!(found, vec![vec!["a"]]);
}

#[test]
fn test_profile_serializes_to_json() {
    let set = two_alternatives();
    let config = EnumerationConfig {
        enable_profiling: true,
        strategy: EnumerationStrategy::BottomUp,
    };
    let enumeration = Enumeration::new(&set, &set, &config).unwrap();
    let report = enumeration.justifications(&"G", &mut |_: &[&str]| {});
    let profile = report.profile.expect("profiling was enabled");
    let value: serde_json::Value = serde_json::to_value(&profile).unwrap();
    assert_eq!(value["algorithm"], "bottom-up");
    assert_eq!(value["conclusions"], 2);
    assert_eq!(value["axioms"], 4);
    assert_eq!(value["search"]["emitted"], 2);
    assert!(value["total_time"].is_f64());
}

#[test]
fn test_strongly_connected_components() {
    let set: InferenceSet<&str, &str> = InferenceSet::new()
        .with("g", "G", ["a", "c"], [])
        .with("ab", "a", ["b"], [])
        .with("ba", "b", ["a"], [])
        .with("c", "c", [], ["x"]);
    let sccs = StronglyConnectedComponents::compute(&set, &"G");
    assert_eq!(sccs.len(), 3);
    assert_eq!(sccs.component_id(&"a"), sccs.component_id(&"b"));
    assert_ne!(sccs.component_id(&"a"), sccs.component_id(&"G"));
    assert_eq!(sccs.largest_component_size(), 2);
    assert_eq!(sccs.cyclic_components().count(), 1);
}

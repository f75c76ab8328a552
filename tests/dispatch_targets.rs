// tests/dispatch_targets.rs

use mkrun::dispatch::{EXTRA_ARGS_VAR, capturing_rule, dispatch};
use mkrun_test_utils::args;
use proptest::prelude::*;

#[test]
fn plain_targets_are_forwarded_verbatim() {
    let targets = args(&["clean", "build", "install"]);
    let d = dispatch(&targets);
    assert_eq!(d.targets, targets);
    assert_eq!(d.extra_args, None);
    assert!(d.env().is_empty());
}

#[test]
fn tokens_after_a_capturing_verb_become_extra_args() {
    let d = dispatch(&args(&["build", "run-server", "--port"]));
    assert_eq!(d.targets, args(&["build", "run-server"]));
    assert_eq!(d.extra_args.as_deref(), Some("--port"));
    assert_eq!(
        d.env(),
        vec![(EXTRA_ARGS_VAR.to_string(), "--port".to_string())]
    );
}

#[test]
fn captured_tail_is_joined_with_single_spaces() {
    let d = dispatch(&args(&["lint-go", "./...", "-v", "--fix"]));
    assert_eq!(d.targets, args(&["lint-go"]));
    assert_eq!(d.extra_args.as_deref(), Some("./... -v --fix"));
}

#[test]
fn only_the_first_capturing_verb_splits() {
    let d = dispatch(&args(&["build", "git-log", "run-x", "-3"]));
    assert_eq!(d.targets, args(&["build", "git-log"]));
    assert_eq!(d.extra_args.as_deref(), Some("run-x -3"));
}

#[test]
fn capturing_verb_in_last_position_captures_nothing() {
    let targets = args(&["build", "test-unit"]);
    let d = dispatch(&targets);
    assert_eq!(d.targets, targets);
    assert_eq!(d.extra_args, None);
}

#[test]
fn verb_families_need_the_dash() {
    assert!(capturing_rule("test").is_none());
    assert!(capturing_rule("runner").is_none());
    assert!(capturing_rule("xcall-foo").is_none());
    assert_eq!(capturing_rule("test-e2e").map(|r| r.family), Some("test"));
    assert_eq!(capturing_rule("update-deps").map(|r| r.family), Some("update"));
    assert_eq!(capturing_rule("version-bump").map(|r| r.family), Some("version"));
    for verb in ["call-x", "show-x", "lint-x", "run-x", "git-x"] {
        assert!(capturing_rule(verb).is_some(), "{verb} should capture");
    }
}

#[test]
fn empty_target_list_dispatches_nothing() {
    let d = dispatch(&[]);
    assert!(d.targets.is_empty());
    assert_eq!(d.extra_args, None);
}

fn plain_target() -> impl Strategy<Value = String> {
    // No dash, so never a capturing verb.
    "[a-z]{1,8}"
}

fn verb() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["call", "show", "test", "lint", "run", "version", "update", "git"]),
        "[a-z]{1,6}",
    )
        .prop_map(|(family, rest)| format!("{family}-{rest}"))
}

proptest! {
    #[test]
    fn lists_without_capturing_verbs_pass_through(targets in prop::collection::vec(plain_target(), 0..8)) {
        let d = dispatch(&targets);
        prop_assert_eq!(d.targets, targets);
        prop_assert_eq!(d.extra_args, None);
    }

    #[test]
    fn first_verb_splits_head_from_tail(
        head in prop::collection::vec(plain_target(), 0..4),
        v in verb(),
        tail in prop::collection::vec("[a-z0-9=-]{1,8}", 1..5),
    ) {
        let mut targets = head.clone();
        targets.push(v.clone());
        targets.extend(tail.iter().cloned());

        let d = dispatch(&targets);

        let mut expected = head;
        expected.push(v);
        prop_assert_eq!(d.targets, expected);
        prop_assert_eq!(d.extra_args, Some(tail.join(" ")));
    }
}

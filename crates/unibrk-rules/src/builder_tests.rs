use indoc::indoc;
use insta::assert_snapshot;

use crate::builder::{RuleDirection, RuleOptions, compile_rules};
use crate::error::WarningKind;

#[test]
fn options_default_to_off() {
    let compiled = compile_rules("a;").unwrap();
    assert_eq!(compiled.options(), RuleOptions::default());
    assert!(compiled.warnings().is_empty());
}

#[test]
fn option_statements_set_flags() {
    let rules = "!!chain;\n!!LBCMNoChain;\n!!lookAheadHardBreak;\na;";
    let compiled = compile_rules(rules).unwrap();
    assert_eq!(
        compiled.options(),
        RuleOptions {
            chain_rules: true,
            lbcm_no_chain: true,
            look_ahead_hard_break: true,
        }
    );
}

#[test]
fn option_statements_are_not_rules() {
    let compiled = compile_rules("!!chain;\na;\nb;").unwrap();
    assert_eq!(compiled.rule_count(), 2);
}

#[test]
fn assignments_count_as_rules() {
    let compiled = compile_rules("$x = a;\n$x;").unwrap();
    assert_eq!(compiled.rule_count(), 2);
}

#[test]
fn chaining_marks_rules_except_caret_marked_ones() {
    let compiled = compile_rules("!!chain;\na;\n^b;").unwrap();
    assert_snapshot!(compiled.dump_tree(RuleDirection::Forward), @r"
    opOr
        setRef a [root] [chainIn]
        setRef b [root]
    ");
}

#[test]
fn without_chain_option_no_rule_chains_in() {
    let compiled = compile_rules("a;\nb;").unwrap();
    assert_snapshot!(compiled.dump_tree(RuleDirection::Forward), @r"
    opOr
        setRef a [root]
        setRef b [root]
    ");
}

#[test]
fn direction_options_route_rules() {
    let rules = indoc! {"
        !!forward;
        a;
        !!reverse;
        b;
        !!safe_forward;
        c;
        !!safe_reverse;
        d;
    "};
    let compiled = compile_rules(rules).unwrap();
    assert_snapshot!(compiled.dump_tree(RuleDirection::Forward), @"setRef a [root]");
    assert_snapshot!(compiled.dump_tree(RuleDirection::Reverse), @"setRef b [root]");
    assert_snapshot!(compiled.dump_tree(RuleDirection::SafeForward), @"setRef c [root]");
    assert_snapshot!(compiled.dump_tree(RuleDirection::SafeReverse), @"setRef d [root]");
}

#[test]
fn safe_groups_absent_unless_used() {
    let compiled = compile_rules("a;").unwrap();
    assert!(compiled.root(RuleDirection::SafeForward).is_none());
    assert!(compiled.root(RuleDirection::SafeReverse).is_none());
    assert_snapshot!(compiled.dump_tree(RuleDirection::SafeForward), @"-- empty --");
}

#[test]
fn bang_prefix_overrides_the_default_group() {
    let compiled = compile_rules("!!reverse;\n!!forward;\na;\n!b;").unwrap();
    assert_snapshot!(compiled.dump_tree(RuleDirection::Forward), @"setRef a [root]");
    assert_snapshot!(compiled.dump_tree(RuleDirection::Reverse), @"setRef b [root]");
}

#[test]
fn unrecognized_option_warns_but_compiles() {
    let compiled = compile_rules("!!bogus;\na;").unwrap();
    assert_eq!(compiled.warnings().len(), 1);
    let warning = &compiled.warnings()[0];
    let WarningKind::UnrecognizedOption(name) = &warning.kind;
    assert_eq!(name, "bogus");
    assert_eq!(warning.line, 1);
}

#[test]
fn set_nodes_preserve_first_use_order() {
    let compiled = compile_rules("a [b-d] e;").unwrap();
    let texts: Vec<&str> = compiled
        .set_nodes()
        .iter()
        .map(|&id| compiled.arena().node(id).text.as_str())
        .collect();
    assert_eq!(texts, ["a", "[b-d]", "e", "any"]);
}

use super::common::*;
use crate::compute::scope::{
    default_scope_rules, is_available, Scope, ScopeRule, ScopeRules,
};

#[test]
fn empty_rule_mapping_is_available_everywhere() {
    let rules = ScopeRules::new();

    assert!(is_available(&rules, &ctx(None, None, None)));
    assert!(is_available(&rules, &ctx(Some("S1"), Some("P1"), Some("U1"))));
}

#[test]
fn enabled_rule_passes_any_identifier_including_absent() {
    let rules = rules([ScopeRule::enabled_for_all(Scope::Project)]);

    assert!(is_available(&rules, &ctx(None, Some("P1"), None)));
    assert!(is_available(&rules, &ctx(None, None, None)));
}

#[test]
fn restricted_rule_passes_only_listed_identifiers() {
    let rules = rules([ScopeRule::restricted_to(Scope::Project, ["P1", "P2"])]);

    assert!(is_available(&rules, &ctx(None, Some("P1"), None)));
    assert!(is_available(&rules, &ctx(None, Some("P2"), None)));
    assert!(!is_available(&rules, &ctx(None, Some("P3"), None)));
    assert!(!is_available(&rules, &ctx(None, None, None)));
}

#[test]
fn restricted_rule_with_empty_allow_set_hides_from_everyone() {
    let rules = rules([ScopeRule::restricted_to::<_, String>(Scope::User, [])]);

    assert!(!is_available(&rules, &ctx(None, None, Some("U1"))));
    assert!(!is_available(&rules, &ctx(Some("S1"), Some("P1"), Some("U2"))));
    assert!(!is_available(&rules, &ctx(None, None, None)));
}

#[test]
fn levels_without_rules_impose_no_restriction() {
    // Only the project level is governed; site and user are free.
    let rules = rules([ScopeRule::restricted_to(Scope::Project, ["P1"])]);

    assert!(is_available(
        &rules,
        &ctx(Some("anything"), Some("P1"), Some("anyone"))
    ));
}

#[test]
fn evaluation_is_a_conjunction_across_levels() {
    let rules = rules([
        ScopeRule::enabled_for_all(Scope::Site),
        ScopeRule::restricted_to(Scope::Project, ["P1"]),
        ScopeRule::restricted_to(Scope::User, ["U1"]),
    ]);

    assert!(is_available(&rules, &ctx(None, Some("P1"), Some("U1"))));
    // One failing level fails the whole evaluation.
    assert!(!is_available(&rules, &ctx(None, Some("P1"), Some("U2"))));
    assert!(!is_available(&rules, &ctx(None, Some("P2"), Some("U1"))));
}

#[test]
fn default_scope_rules_cover_every_level_and_allow_everyone() {
    let defaults = default_scope_rules();

    for scope in Scope::ALL {
        let rule = defaults.get(&scope).expect("every level seeded");
        assert!(rule.enabled);
        assert!(rule.ids.is_empty());
    }
    assert!(is_available(&defaults, &ctx(None, None, None)));
    assert!(is_available(
        &defaults,
        &ctx(Some("S1"), Some("P1"), Some("U1"))
    ));
}

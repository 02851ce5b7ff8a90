/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use extend::ExtensionStore;
use selectors::ToCss;

use crate::{add_extension, add_optional_extension, class, css, complexes, list, location};

#[test]
fn extension_after_selector() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(".a"), location(), None).unwrap();
    add_extension(&mut store, ".b", &class("a"));
    assert_eq!(css(&rule.value()), ".a, .b");
}

#[test]
fn extension_before_selector() {
    let mut store = ExtensionStore::new();
    add_extension(&mut store, ".b", &class("a"));
    let rule = store.add_selector(list(".a"), location(), None).unwrap();
    assert_eq!(css(&rule.value()), ".a, .b");
}

#[test]
fn extension_applies_in_compounds() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(".x.a"), location(), None).unwrap();
    add_extension(&mut store, ".b", &class("a"));
    assert_eq!(css(&rule.value()), ".x.a, .x.b");
}

#[test]
fn extension_applies_through_descendants() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(".x .a"), location(), None).unwrap();
    add_extension(&mut store, ".b", &class("a"));
    assert_eq!(css(&rule.value()), ".x .a, .x .b");
}

#[test]
fn complex_extender_weaves_into_place() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(".x .a"), location(), None).unwrap();
    add_extension(&mut store, ".y .b", &class("a"));
    assert_eq!(
        complexes(&rule.value()),
        vec![
            ".x .a".to_owned(),
            ".x .y .b".to_owned(),
            ".y .x .b".to_owned(),
        ]
    );
}

#[test]
fn transitive_chain_extends_through_extenders() {
    let mut store = ExtensionStore::new();
    let rule_a = store.add_selector(list(".a"), location(), None).unwrap();
    let rule_b = store.add_selector(list(".b"), location(), None).unwrap();
    add_extension(&mut store, ".b", &class("a"));
    store.add_selector(list(".c"), location(), None).unwrap();
    add_extension(&mut store, ".c", &class("b"));

    // `.c` extends `.b`, which extends `.a`, so all three end up in the
    // `.a` rule.
    assert_eq!(css(&rule_a.value()), ".a, .b, .c");
    assert_eq!(css(&rule_b.value()), ".b, .c");
}

#[test]
fn transitive_cycle_converges() {
    let mut store = ExtensionStore::new();
    let rule_c = store.add_selector(list(".c"), location(), None).unwrap();
    add_extension(&mut store, ".c", &class("a"));
    let rule_a = store.add_selector(list(".x.y.a"), location(), None).unwrap();
    add_extension(&mut store, ".x.y.a", &class("b"));
    let rule_b = store.add_selector(list(".z.b"), location(), None).unwrap();
    add_extension(&mut store, ".z.b", &class("c"));

    let c_complexes = complexes(&rule_c.value());
    assert!(c_complexes.contains(&".c".to_owned()), "got {:?}", c_complexes);
    assert!(c_complexes.contains(&".z.b".to_owned()), "got {:?}", c_complexes);

    // The `.x.y.a` rule picked up `.c` when it was registered, and the late
    // `.z.b {@extend .c}` reaches it through that generated selector.
    let a_complexes = complexes(&rule_a.value());
    assert!(a_complexes.contains(&".x.y.a".to_owned()), "got {:?}", a_complexes);
    assert!(a_complexes.contains(&".x.y.c".to_owned()), "got {:?}", a_complexes);
    assert!(
        a_complexes.contains(&".x.y.z.b".to_owned()),
        "got {:?}",
        a_complexes
    );

    let b_complexes = complexes(&rule_b.value());
    assert!(b_complexes.contains(&".z.b".to_owned()), "got {:?}", b_complexes);
}

#[test]
fn optional_extension_with_unmatched_target_is_inert() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(".x"), location(), None).unwrap();
    add_optional_extension(&mut store, ".b", &class("a"));

    assert_eq!(css(&rule.value()), ".x");
    assert_eq!(store.extensions_where_target(|_| true).count(), 0);
}

#[test]
fn mandatory_extensions_are_reported() {
    let mut store = ExtensionStore::new();
    add_extension(&mut store, ".b", &class("a"));
    add_optional_extension(&mut store, ".c", &class("x"));

    let mandatory: Vec<_> = store
        .extensions_where_target(|target| *target == class("a"))
        .collect();
    assert_eq!(mandatory.len(), 1);
    assert_eq!(mandatory[0].extender.selector.to_css_string(), ".b");
    assert_eq!(store.extensions_where_target(|target| *target == class("x")).count(), 0);
}

#[test]
fn repeated_extension_merges_and_unmerges() {
    let mut store = ExtensionStore::new();
    add_extension(&mut store, ".b", &class("a"));
    add_extension(&mut store, ".b", &class("a"));

    // Both mandatory registrations survive the merge.
    let mandatory: Vec<_> = store.extensions_where_target(|_| true).collect();
    assert_eq!(mandatory.len(), 2);
}

#[test]
fn optional_merge_into_mandatory_stays_mandatory() {
    let mut store = ExtensionStore::new();
    add_optional_extension(&mut store, ".b", &class("a"));
    add_extension(&mut store, ".b", &class("a"));

    let mandatory: Vec<_> = store.extensions_where_target(|_| true).collect();
    assert_eq!(mandatory.len(), 1);
}

#[test]
fn repeated_extension_does_not_duplicate_output() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(".a"), location(), None).unwrap();
    add_extension(&mut store, ".b", &class("a"));
    add_extension(&mut store, ".b", &class("a"));
    assert_eq!(css(&rule.value()), ".a, .b");
}

#[test]
fn extension_order_is_irrelevant_up_to_reordering() {
    let run = |first: &str, second: &str| {
        let mut store = ExtensionStore::new();
        let rule = store.add_selector(list(".x"), location(), None).unwrap();
        add_extension(&mut store, first, &class("x"));
        add_extension(&mut store, second, &class("x"));
        let mut result = complexes(&rule.value());
        result.sort();
        result
    };
    assert_eq!(run(".a", ".b"), run(".b", ".a"));
}

#[test]
fn simple_selectors_reflect_registered_rules() {
    let mut store = ExtensionStore::new();
    store.add_selector(list(".a:not(.b)"), location(), None).unwrap();

    let simples: Vec<_> = store.simple_selectors().cloned().collect();
    assert!(simples.contains(&class("a")));
    // Simple selectors inside pseudo arguments are indexed too.
    assert!(simples.contains(&class("b")));
}

#[test]
fn is_empty_tracks_extensions_only() {
    let mut store = ExtensionStore::new();
    assert!(store.is_empty());
    store.add_selector(list(".a"), location(), None).unwrap();
    assert!(store.is_empty());
    add_extension(&mut store, ".b", &class("a"));
    assert!(!store.is_empty());
}

#[test]
fn clone_is_independent() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(".a"), location(), None).unwrap();

    let (mut fork, old_to_new) = store.clone_store();
    let twin = old_to_new.get(&rule).expect("cell should have a twin").clone();
    add_extension(&mut fork, ".b", &class("a"));

    assert_eq!(css(&rule.value()), ".a");
    assert_eq!(css(&twin.value()), ".a, .b");
}

#[test]
fn clone_preserves_cell_sharing() {
    let mut store = ExtensionStore::new();
    // One cell registered under two simple selectors.
    let rule = store.add_selector(list(".a.b"), location(), None).unwrap();

    let (mut fork, old_to_new) = store.clone_store();
    let twin = old_to_new.get(&rule).unwrap().clone();

    // Extending either simple rewrites the same twin.
    add_extension(&mut fork, ".x", &class("a"));
    add_extension(&mut fork, ".y", &class("b"));
    let result = complexes(&twin.value());
    assert!(result.contains(&".a.b".to_owned()), "got {:?}", result);
    assert!(result.contains(&".b.x".to_owned()), "got {:?}", result);
    assert!(result.contains(&".a.y".to_owned()), "got {:?}", result);
}

#[test]
fn add_extensions_applies_to_existing_selectors() {
    let mut upstream = ExtensionStore::new();
    add_extension(&mut upstream, ".b", &class("a"));

    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(".a"), location(), None).unwrap();
    store.add_extensions([&upstream]).unwrap();

    assert_eq!(css(&rule.value()), ".a, .b");
}

#[test]
fn add_extensions_skips_private_placeholders() {
    let mut upstream = ExtensionStore::new();
    add_extension(&mut upstream, ".b", &crate::placeholder("-a"));

    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list("%-a"), location(), None).unwrap();
    store.add_extensions([&upstream]).unwrap();

    assert!(store.is_empty());
    assert_eq!(complexes(&rule.value()), vec!["%-a".to_owned()]);
}

#[test]
fn add_extensions_carries_public_placeholders() {
    let mut upstream = ExtensionStore::new();
    add_extension(&mut upstream, ".b", &crate::placeholder("a"));

    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list("%a"), location(), None).unwrap();
    store.add_extensions([&upstream]).unwrap();

    assert_eq!(complexes(&rule.value()), vec!["%a".to_owned(), ".b".to_owned()]);
}

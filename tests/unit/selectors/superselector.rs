/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::{complex, compound, list};

fn is_super(selector: &str, other: &str) -> bool {
    complex(selector).is_superselector(&complex(other))
}

#[test]
fn compound_containment() {
    assert!(is_super(".a", ".a.b"));
    assert!(!is_super(".a.b", ".a"));
    assert!(is_super(".a", ".a"));
    assert!(!is_super(".a", ".b"));
}

#[test]
fn descendant_containment() {
    assert!(is_super(".a", ".c .a"));
    assert!(is_super(".a .b", ".x .a .y .b"));
    assert!(!is_super(".a .b", ".b"));
    assert!(!is_super(".x .a", ".a"));
}

#[test]
fn descendant_covers_child() {
    assert!(is_super(".a .b", ".a > .b"));
    assert!(!is_super(".a > .b", ".a .b"));
    assert!(is_super(".a > .b", ".a > .b"));
}

#[test]
fn child_does_not_skip_levels() {
    assert!(!is_super(".a > .b", ".a > .x > .b"));
    assert!(!is_super(".a > .b", ".a > .x .b"));
}

#[test]
fn following_sibling_covers_next_sibling() {
    assert!(is_super(".a ~ .b", ".a + .b"));
    assert!(!is_super(".a + .b", ".a ~ .b"));
    assert!(is_super(".a ~ .b", ".a ~ .b"));
    assert!(!is_super(".a ~ .b", ".a > .b"));
}

#[test]
fn trailing_combinators_are_never_contained() {
    let trailing = selectors::ComplexSelector::new(
        vec![
            selectors::ComplexSelectorComponent::Compound(compound(".a")),
            selectors::ComplexSelectorComponent::Combinator(selectors::Combinator::Child),
        ],
        false,
    );
    assert!(!trailing.is_superselector(&complex(".a")));
    assert!(!complex(".a").is_superselector(&trailing));
}

#[test]
fn is_pseudo_covers_its_arguments() {
    assert!(is_super(":is(.a)", ".a"));
    assert!(is_super(":is(.a, .b)", ".b"));
    assert!(!is_super(":is(.a, .b)", ".c"));
    assert!(is_super(":is(.a)", ":is(.a)"));
}

#[test]
fn matches_pseudo_covers_argument_list() {
    assert!(is_super(":matches(.a, .b)", ":matches(.a)"));
    assert!(!is_super(":matches(.a)", ":matches(.a, .b)"));
}

#[test]
fn not_pseudo_requires_counterevidence() {
    assert!(is_super(":not(.a)", ".b:not(.a)"));
    assert!(!is_super(":not(.a)", ".b"));
    assert!(is_super(":not(.a, .b)", ":not(.a, .b, .c)"));
    assert!(is_super(":not(#a)", "#b"));
    assert!(is_super(":not(a)", "span"));
    assert!(!is_super(":not(a)", "a"));
}

#[test]
fn has_pseudo_is_layered() {
    assert!(is_super(":has(.a)", ":has(.a)"));
    assert!(is_super(":has(.a)", ":has(.a.b)"));
    // `:has` can't be unwrapped into its argument.
    assert!(!is_super(":has(.a)", ".a"));
}

#[test]
fn pseudo_elements_must_be_mirrored() {
    assert!(!is_super(".a", ".a::before"));
    assert!(is_super(".a::before", ".a.b::before"));
}

#[test]
fn list_containment() {
    assert!(list(".a, .b").is_superselector(&list(".a")));
    assert!(list(".a, .b").is_superselector(&list(".a, .b")));
    assert!(!list(".a").is_superselector(&list(".a, .b")));
    assert!(list(".a").is_superselector(&list(".a.b, .a.c")));
}

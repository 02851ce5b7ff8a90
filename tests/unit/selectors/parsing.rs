/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use selectors::parser::parse;
use selectors::{
    ComplexSelector, SimpleSelector, ToCss, SPECIFICITY_PER_CLASS, SPECIFICITY_PER_ELEMENT,
    SPECIFICITY_PER_ID,
};

use crate::{complex, compound, list};

fn round_trips(text: &str) {
    assert_eq!(list(text).to_css_string(), text);
}

#[test]
fn simple_selectors_round_trip() {
    round_trips(".a");
    round_trips("#a");
    round_trips("a");
    round_trips("*");
    round_trips("%a");
    round_trips(":hover");
    round_trips("::before");
}

#[test]
fn compounds_and_combinators_round_trip() {
    round_trips(".a.b");
    round_trips("a.b#c");
    round_trips(".a .b");
    round_trips(".a > .b");
    round_trips(".a + .b");
    round_trips(".a ~ .b .c");
}

#[test]
fn lists_round_trip() {
    round_trips(".a, .b");
    round_trips(".a .b, .c > .d");
}

#[test]
fn selector_pseudos_round_trip() {
    round_trips(":not(.a)");
    round_trips(":not(.a, .b)");
    round_trips(":is(.a .b, .c)");
    round_trips(":matches(.a)");
    round_trips(":has(> .a)");
}

#[test]
fn argument_pseudos_round_trip() {
    round_trips(":nth-child(2n+1)");
    round_trips(":lang(en)");
}

#[test]
fn attribute_selectors_round_trip() {
    round_trips("[href]");
    assert_eq!(list("[href^='http']").to_css_string(), "[href^=\"http\"]");
    assert_eq!(list("[a = b]").to_css_string(), "[a=\"b\"]");
}

#[test]
fn legacy_pseudo_elements_are_elements() {
    let compound = compound(":before");
    match &compound.components[0] {
        SimpleSelector::Pseudo(pseudo) => assert!(pseudo.is_element),
        other => panic!("expected a pseudo, got {:?}", other),
    }
}

#[test]
fn pseudo_names_are_normalized() {
    let compound = compound(":-moz-any(.a)");
    match &compound.components[0] {
        SimpleSelector::Pseudo(pseudo) => {
            assert_eq!(pseudo.normalized_name(), "any");
            assert!(pseudo.selector.is_some());
        },
        other => panic!("expected a pseudo, got {:?}", other),
    }
}

#[test]
fn empty_and_dangling_selectors_fail() {
    assert!(parse("").is_err());
    assert!(parse(".a >").is_err());
    assert!(parse(".a,").is_err());
    assert!(parse(". a").is_err());
}

#[test]
fn class_specificity() {
    let complex = complex(".a");
    assert_eq!(complex.min_specificity(), SPECIFICITY_PER_CLASS);
    assert_eq!(complex.max_specificity(), SPECIFICITY_PER_CLASS);
}

#[test]
fn compound_specificity_sums() {
    let complex = complex("a.b#c");
    let expected = SPECIFICITY_PER_ELEMENT + SPECIFICITY_PER_CLASS + SPECIFICITY_PER_ID;
    assert_eq!(complex.max_specificity(), expected);
}

#[test]
fn complex_specificity_sums_compounds() {
    let complex = complex(".a > .b .c");
    assert_eq!(complex.max_specificity(), 3 * SPECIFICITY_PER_CLASS);
}

#[test]
fn not_specificity_takes_inner_max() {
    let complex = complex(":not(.a, #b)");
    assert_eq!(complex.max_specificity(), SPECIFICITY_PER_ID);
    assert_eq!(complex.min_specificity(), SPECIFICITY_PER_ID);
}

#[test]
fn is_specificity_bounds() {
    let complex = complex(":is(.a)");
    assert_eq!(complex.min_specificity(), 0);
    assert_eq!(complex.max_specificity(), SPECIFICITY_PER_CLASS);
}

#[test]
fn line_break_is_ignored_by_equality() {
    let a = complex(".a .b");
    let b = ComplexSelector::new(a.components.clone(), true);
    assert_eq!(a, b);
}

#[test]
fn placeholders_are_invisible() {
    assert!(list("%a").is_invisible());
    assert!(!list(".a, %b").is_invisible());
    // `:not(%a)` matches everything `%a` doesn't, which is everything.
    assert!(!list(":not(%a)").is_invisible());
    assert!(list(":is(%a)").is_invisible());
}

#[test]
fn invisible_complexes_are_not_written() {
    assert_eq!(list(".a, %b").to_css_string(), ".a");
}

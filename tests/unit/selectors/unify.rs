/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use selectors::{paths, unify_complex, weave, ComplexSelector, ToCss};

use crate::{complex, compound};

fn weave_css(complexes: &[&str]) -> Vec<String> {
    let inputs = complexes
        .iter()
        .map(|text| complex(text).components)
        .collect();
    weave(inputs)
        .into_iter()
        .map(|components| ComplexSelector::new(components, false).to_css_string())
        .collect()
}

fn unify_css(complexes: &[&str]) -> Option<Vec<String>> {
    let inputs = complexes
        .iter()
        .map(|text| complex(text).components)
        .collect();
    unify_complex(inputs).map(|result| {
        result
            .into_iter()
            .map(|components| ComplexSelector::new(components, false).to_css_string())
            .collect()
    })
}

#[test]
fn compound_unification_merges_simples() {
    let unified = compound(".a").unify(&compound(".b")).unwrap();
    assert_eq!(unified.to_css_string(), ".b.a");
}

#[test]
fn compound_unification_deduplicates() {
    let unified = compound(".a").unify(&compound(".a.b")).unwrap();
    assert_eq!(unified.to_css_string(), ".a.b");
}

#[test]
fn conflicting_ids_do_not_unify() {
    assert!(compound("#a").unify(&compound("#b")).is_none());
    assert_eq!(
        compound("#a").unify(&compound("#a")).unwrap().to_css_string(),
        "#a"
    );
}

#[test]
fn conflicting_types_do_not_unify() {
    assert!(compound("a").unify(&compound("span")).is_none());
}

#[test]
fn universal_unifies_with_anything() {
    assert_eq!(compound("*").unify(&compound("a")).unwrap().to_css_string(), "a");
    assert_eq!(compound("a").unify(&compound("*")).unwrap().to_css_string(), "a");
}

#[test]
fn type_prepends_to_classes() {
    let unified = compound("a").unify(&compound(".b")).unwrap();
    assert_eq!(unified.to_css_string(), "a.b");
}

#[test]
fn pseudos_stay_last() {
    let unified = compound(".a").unify(&compound("::after")).unwrap();
    assert_eq!(unified.to_css_string(), ".a::after");
}

#[test]
fn conflicting_pseudo_elements_do_not_unify() {
    assert!(compound("::before").unify(&compound("::after")).is_none());
}

#[test]
fn unify_complex_merges_trailing_compounds() {
    assert_eq!(
        unify_css(&[".a .b", ".c"]).unwrap(),
        vec![".a .b.c".to_owned()]
    );
}

#[test]
fn unify_complex_weaves_parents() {
    let result = unify_css(&[".a .x", ".b .x"]).unwrap();
    assert_eq!(
        result,
        vec![".a .b .x".to_owned(), ".b .a .x".to_owned()]
    );
}

#[test]
fn unify_complex_merges_child_combinators() {
    // Identical trailing `>` combinators force their compounds to unify.
    assert_eq!(
        unify_css(&[".a > .x", ".b > .x"]).unwrap(),
        vec![".b.a > .x".to_owned()]
    );
}

#[test]
fn unify_complex_merges_sibling_combinators() {
    // `~` covers `+`, so the merged tail offers both the ordered and the
    // unified interpretation.
    assert_eq!(
        unify_css(&[".a + .x", ".b ~ .x"]).unwrap(),
        vec![".b ~ .a + .x".to_owned(), ".a.b + .x".to_owned()]
    );
}

#[test]
fn unify_complex_fails_on_conflicting_bases() {
    assert!(unify_css(&[".a #x", ".b #y"]).is_none());
}

#[test]
fn weave_single_sequence_is_identity() {
    assert_eq!(weave_css(&[".a .b"]), vec![".a .b".to_owned()]);
}

#[test]
fn weave_interleaves_parents() {
    assert_eq!(
        weave_css(&[".a .b", ".x .y"]),
        vec![".a .b .x .y".to_owned(), ".x .a .b .y".to_owned()]
    );
}

#[test]
fn weave_collapses_shared_parents() {
    // `.a` appears in both parent sequences and is matched, not repeated.
    assert_eq!(weave_css(&[".a .b", ".a .y"]), vec![".a .b .y".to_owned()]);
}

#[test]
fn paths_is_the_cartesian_product() {
    assert_eq!(
        paths(vec![vec![1, 2], vec![3, 4]]),
        vec![vec![1, 3], vec![2, 3], vec![1, 4], vec![2, 4]]
    );
}

#[test]
fn paths_with_empty_choice_is_empty() {
    assert!(paths(vec![vec![1, 2], Vec::<i32>::new()]).is_empty());
}

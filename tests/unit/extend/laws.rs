/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The two laws of extend: originals always survive, and generated
//! selectors are only trimmed under a superselector with enough
//! specificity.

use extend::ExtensionStore;

use crate::{add_extension, class, complexes, css, list, location};

#[test]
fn originals_survive_extension() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(".a.b, .c"), location(), None).unwrap();
    add_extension(&mut store, ".z", &class("a"));
    add_extension(&mut store, ".y", &class("c"));

    let result = complexes(&rule.value());
    assert!(result.contains(&".a.b".to_owned()), "got {:?}", result);
    assert!(result.contains(&".c".to_owned()), "got {:?}", result);
}

#[test]
fn originals_survive_even_when_superselected() {
    let mut store = ExtensionStore::new();
    // `.a` written by the author, `.a.b` generated would be trimmed; the
    // other way around both stay.
    let rule = store.add_selector(list(".a.b"), location(), None).unwrap();
    add_extension(&mut store, ".a", &class("b"));

    let result = complexes(&rule.value());
    assert!(result.contains(&".a.b".to_owned()), "got {:?}", result);
}

#[test]
fn redundant_generated_selectors_are_trimmed() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(".a.b"), location(), None).unwrap();
    add_extension(&mut store, ".z", &class("a"));
    add_extension(&mut store, ".z", &class("b"));

    // `.a.z` and `.b.z` are subselectors of the plain `.z` produced by
    // extending both halves, so only `.z` survives.
    assert_eq!(css(&rule.value()), ".a.b, .z");
}

#[test]
fn trim_respects_source_specificity() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(".a"), location(), None).unwrap();
    // The generated `.a.b` is superselected by the original `.a`, but `.a`'s
    // specificity is below the extender's source specificity, so it stays.
    add_extension(&mut store, ".a.b", &class("a"));

    let result = complexes(&rule.value());
    assert!(result.contains(&".a".to_owned()), "got {:?}", result);
    assert!(result.contains(&".a.b".to_owned()), "got {:?}", result);
}

#[test]
fn duplicate_originals_collapse() {
    let mut store = ExtensionStore::new();
    // A rule that extends a component of its own selector produces its own
    // selector again; only one copy is kept.
    let rule = store.add_selector(list(".a"), location(), None).unwrap();
    add_extension(&mut store, ".a", &class("a"));
    assert_eq!(css(&rule.value()), ".a");
}

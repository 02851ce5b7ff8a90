/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Extension inside pseudo-selector arguments.

use extend::ExtensionStore;

use crate::{add_extension, class, css, list, location};

#[test]
fn not_splits_into_separate_pseudos() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(":not(.a)"), location(), None).unwrap();
    add_extension(&mut store, ".b", &class("a"));

    // A single-argument `:not` is kept single-argument for older browsers,
    // so the extension lands in a second `:not`.
    assert_eq!(css(&rule.value()), ":not(.a):not(.b)");
}

#[test]
fn not_with_list_argument_grows_in_place() {
    let mut store = ExtensionStore::new();
    let rule = store
        .add_selector(list(":not(.a, .x)"), location(), None)
        .unwrap();
    add_extension(&mut store, ".b", &class("a"));

    assert_eq!(css(&rule.value()), ":not(.a, .b, .x)");
}

#[test]
fn is_grows_its_argument_list() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(":is(.a)"), location(), None).unwrap();
    add_extension(&mut store, ".b", &class("a"));

    assert_eq!(css(&rule.value()), ":is(.a, .b)");
}

#[test]
fn matches_grows_its_argument_list() {
    let mut store = ExtensionStore::new();
    let rule = store
        .add_selector(list(":matches(.a)"), location(), None)
        .unwrap();
    add_extension(&mut store, ".b", &class("a"));

    assert_eq!(css(&rule.value()), ":matches(.a, .b)");
}

#[test]
fn not_drops_complex_extensions_of_simple_arguments() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(":not(.a)"), location(), None).unwrap();
    add_extension(&mut store, ".x .y", &class("a"));

    // `:not(.x .y)` wouldn't parse in older browsers, and the original had
    // no complex arguments, so the complex result is discarded.
    assert_eq!(css(&rule.value()), ":not(.a)");
}

#[test]
fn unchanged_pseudo_is_untouched() {
    let mut store = ExtensionStore::new();
    let rule = store.add_selector(list(":not(.a)"), location(), None).unwrap();
    add_extension(&mut store, ".b", &class("z"));

    assert_eq!(css(&rule.value()), ":not(.a)");
}

#[test]
fn extension_reaches_nested_pseudos() {
    let mut store = ExtensionStore::new();
    let rule = store
        .add_selector(list(".x:not(.a)"), location(), None)
        .unwrap();
    add_extension(&mut store, ".b", &class("a"));

    assert_eq!(css(&rule.value()), ".x:not(.a):not(.b)");
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

#![cfg(test)]

mod parsing;
mod superselector;
mod unify;

use selectors::parser::parse;
use selectors::{ComplexSelector, CompoundSelector, SelectorList};

/// Parses a selector list, panicking on failure.
pub fn list(text: &str) -> SelectorList {
    parse(text).expect("test selector should parse")
}

/// Parses a single complex selector.
pub fn complex(text: &str) -> ComplexSelector {
    let mut list = list(text);
    assert_eq!(list.components.len(), 1, "expected one complex selector");
    list.components.remove(0)
}

/// Parses a single compound selector.
pub fn compound(text: &str) -> CompoundSelector {
    let complex = complex(text);
    assert_eq!(complex.components.len(), 1, "expected one compound selector");
    match complex.components.into_iter().next() {
        Some(selectors::ComplexSelectorComponent::Compound(compound)) => compound,
        _ => panic!("expected a compound selector"),
    }
}

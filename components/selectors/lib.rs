/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The selector data model and set algebra used by stylesheet compilation.
//!
//! Selectors are plain value types: a [`SelectorList`] is a list of
//! [`ComplexSelector`]s, each a sequence of [`CompoundSelector`]s and
//! [`Combinator`]s, and each compound a sequence of [`SimpleSelector`]s.
//! On top of the model, this crate provides the set-theoretic operations
//! the `@extend` engine is built from: unification ([`unify_complex`]),
//! weaving ([`weave`]), Cartesian expansion ([`paths`]), and superselector
//! computation.

#![deny(unsafe_code)]

use std::fmt;

mod complex;
mod compound;
mod list;
pub mod parser;
mod simple;
mod superselector;
mod unify;

pub use complex::{Combinator, ComplexSelector, ComplexSelectorComponent};
pub use compound::CompoundSelector;
pub use list::SelectorList;
pub use simple::{
    AttributeOperator, AttributeSelector, Pseudo, SimpleSelector, SPECIFICITY_PER_CLASS,
    SPECIFICITY_PER_ELEMENT, SPECIFICITY_PER_ID,
};
pub use superselector::{
    complex_is_parent_superselector, complex_is_superselector, compound_is_superselector,
    list_is_superselector,
};
pub use unify::{paths, unify_complex, unify_compound, weave};

/// Serialization to CSS text.
pub trait ToCss {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result;

    fn to_css_string(&self) -> String {
        let mut result = String::new();
        self.to_css(&mut result)
            .expect("writing to a string is infallible");
        result
    }
}

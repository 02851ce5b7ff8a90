/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;

use smallvec::SmallVec;

use crate::simple::SimpleSelector;
use crate::superselector::compound_is_superselector;
use crate::unify::unify_compound;
use crate::ToCss;

/// A sequence of simple selectors that all match the same element, like
/// `a.visited`. Never empty.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CompoundSelector {
    pub components: SmallVec<[SimpleSelector; 2]>,
}

impl CompoundSelector {
    pub fn new<I>(components: I) -> Self
    where
        I: IntoIterator<Item = SimpleSelector>,
    {
        let components: SmallVec<[SimpleSelector; 2]> = components.into_iter().collect();
        debug_assert!(!components.is_empty());
        CompoundSelector { components }
    }

    pub fn is_invisible(&self) -> bool {
        self.components.iter().any(|simple| simple.is_invisible())
    }

    pub fn min_specificity(&self) -> i32 {
        self.components
            .iter()
            .map(|simple| simple.min_specificity())
            .sum()
    }

    pub fn max_specificity(&self) -> i32 {
        self.components
            .iter()
            .map(|simple| simple.max_specificity())
            .sum()
    }

    /// Returns a compound that matches only elements matched by both `self`
    /// and `other`, or `None` if no such compound exists.
    pub fn unify(&self, other: &CompoundSelector) -> Option<CompoundSelector> {
        let unified = unify_compound(&self.components, &other.components)?;
        Some(CompoundSelector::new(unified))
    }

    /// Whether every element matched by `other` is also matched by `self`.
    pub fn is_superselector(&self, other: &CompoundSelector) -> bool {
        compound_is_superselector(self, other, &[])
    }
}

impl ToCss for CompoundSelector {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        for simple in &self.components {
            simple.to_css(dest)?;
        }
        Ok(())
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

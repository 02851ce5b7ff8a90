/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;

use crate::complex::ComplexSelector;
use crate::superselector::list_is_superselector;
use crate::ToCss;

/// A comma-separated list of complex selectors. Matches any element matched
/// by one of its components.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SelectorList {
    pub components: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn new(components: Vec<ComplexSelector>) -> Self {
        SelectorList { components }
    }

    pub fn is_invisible(&self) -> bool {
        self.components
            .iter()
            .all(|complex| complex.is_invisible())
    }

    pub fn contains(&self, complex: &ComplexSelector) -> bool {
        self.components.contains(complex)
    }

    /// Whether every element matched by `other` is also matched by `self`.
    pub fn is_superselector(&self, other: &SelectorList) -> bool {
        list_is_superselector(&self.components, &other.components)
    }
}

impl ToCss for SelectorList {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        let mut first = true;
        for complex in &self.components {
            if complex.is_invisible() {
                continue;
            }
            if !first {
                dest.write_char(',')?;
                dest.write_char(if complex.line_break { '\n' } else { ' ' })?;
            }
            first = false;
            complex.to_css(dest)?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

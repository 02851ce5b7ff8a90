/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::compound::CompoundSelector;
use crate::superselector::complex_is_superselector;
use crate::ToCss;

/// A combinator between two compound selectors. Descendant combination is
/// implicit: two adjacent compounds in a complex selector are related by it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Combinator {
    /// `+`
    NextSibling,
    /// `>`
    Child,
    /// `~`
    FollowingSibling,
}

impl Combinator {
    pub fn as_char(&self) -> char {
        match *self {
            Combinator::NextSibling => '+',
            Combinator::Child => '>',
            Combinator::FollowingSibling => '~',
        }
    }
}

/// One element of a complex selector's component sequence.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ComplexSelectorComponent {
    Compound(CompoundSelector),
    Combinator(Combinator),
}

impl ComplexSelectorComponent {
    pub fn is_compound(&self) -> bool {
        matches!(self, ComplexSelectorComponent::Compound(_))
    }

    pub fn is_combinator(&self) -> bool {
        matches!(self, ComplexSelectorComponent::Combinator(_))
    }

    pub fn as_compound(&self) -> Option<&CompoundSelector> {
        match self {
            ComplexSelectorComponent::Compound(compound) => Some(compound),
            ComplexSelectorComponent::Combinator(_) => None,
        }
    }
}

/// A sequence of compound selectors separated by combinators, like
/// `a > b + c`.
#[derive(Clone, Debug)]
pub struct ComplexSelector {
    pub components: Vec<ComplexSelectorComponent>,
    /// Whether a line break followed this selector in the source. Carried for
    /// output formatting only; ignored by equality and hashing.
    pub line_break: bool,
}

impl PartialEq for ComplexSelector {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for ComplexSelector {}

impl Hash for ComplexSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

impl ComplexSelector {
    pub fn new(components: Vec<ComplexSelectorComponent>, line_break: bool) -> Self {
        ComplexSelector {
            components,
            line_break,
        }
    }

    pub fn is_invisible(&self) -> bool {
        self.components
            .iter()
            .any(|component| matches!(component, ComplexSelectorComponent::Compound(compound) if compound.is_invisible()))
    }

    /// A lower bound on this selector's cascade weight; the weight of pseudos
    /// like `:is()` depends on what their arguments match.
    pub fn min_specificity(&self) -> i32 {
        self.components
            .iter()
            .filter_map(|component| component.as_compound())
            .map(|compound| compound.min_specificity())
            .sum()
    }

    /// An upper bound on this selector's cascade weight.
    pub fn max_specificity(&self) -> i32 {
        self.components
            .iter()
            .filter_map(|component| component.as_compound())
            .map(|compound| compound.max_specificity())
            .sum()
    }

    /// Whether every element matched by `other` is also matched by `self`.
    pub fn is_superselector(&self, other: &ComplexSelector) -> bool {
        complex_is_superselector(&self.components, &other.components)
    }
}

impl ToCss for ComplexSelector {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                dest.write_char(' ')?;
            }
            first = false;
            match component {
                ComplexSelectorComponent::Compound(compound) => compound.to_css(dest)?,
                ComplexSelectorComponent::Combinator(combinator) => {
                    dest.write_char(combinator.as_char())?
                },
            }
        }
        Ok(())
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

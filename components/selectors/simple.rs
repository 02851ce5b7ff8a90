/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Simple selectors and their unification rules.

use std::fmt;

use cssparser::{serialize_identifier, serialize_string};

use crate::list::SelectorList;
use crate::ToCss;

/// The cascade weight contributed by a class-level simple selector
/// (class, attribute, placeholder, or pseudo-class).
pub const SPECIFICITY_PER_CLASS: i32 = 1000;

/// The cascade weight contributed by an id selector.
pub const SPECIFICITY_PER_ID: i32 = SPECIFICITY_PER_CLASS * SPECIFICITY_PER_CLASS;

/// The cascade weight contributed by a type selector or a pseudo-element.
pub const SPECIFICITY_PER_ELEMENT: i32 = 1;

/// A single selector component that matches against one element, with no
/// combinators involved.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SimpleSelector {
    /// `*`
    Universal,
    /// `a`
    Type(String),
    /// `.a`
    Class(String),
    /// `#a`
    Id(String),
    /// `[a=b]`
    Attribute(AttributeSelector),
    /// `%a`; matches nothing in emitted CSS, exists to be extended.
    Placeholder(String),
    /// `:a`, `::a`, `:a(...)`
    Pseudo(Pseudo),
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub operator: Option<AttributeOperator>,
    pub value: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AttributeOperator {
    /// `=`
    Equal,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

impl AttributeOperator {
    pub fn as_str(&self) -> &'static str {
        match *self {
            AttributeOperator::Equal => "=",
            AttributeOperator::Includes => "~=",
            AttributeOperator::DashMatch => "|=",
            AttributeOperator::Prefix => "^=",
            AttributeOperator::Suffix => "$=",
            AttributeOperator::Substring => "*=",
        }
    }
}

/// A pseudo-class or pseudo-element, optionally carrying an argument
/// (`:nth-child(2n)`) or an inner selector list (`:not(.a, .b)`).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Pseudo {
    /// The name as written, lowercased. Does not include the colons.
    pub name: String,
    /// Whether this is a pseudo-element rather than a pseudo-class.
    pub is_element: bool,
    /// A raw argument, for pseudos whose argument is not a selector.
    pub argument: Option<String>,
    /// The inner selector list, for pseudos that take one.
    pub selector: Option<Box<SelectorList>>,
}

/// Strips a `-vendor-` prefix, so `-moz-any` compares like `any`.
pub(crate) fn unvendor(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix('-') {
        if let Some(dash) = rest.find('-') {
            return &rest[dash + 1..];
        }
    }
    name
}

impl Pseudo {
    pub fn normalized_name(&self) -> &str {
        unvendor(&self.name)
    }

    pub fn is_class(&self) -> bool {
        !self.is_element
    }

    pub fn is_host(&self) -> bool {
        self.is_class() && matches!(self.normalized_name(), "host" | "host-context")
    }

    /// Returns a copy of this pseudo with its inner selector replaced.
    pub fn with_selector(&self, selector: SelectorList) -> Pseudo {
        Pseudo {
            name: self.name.clone(),
            is_element: self.is_element,
            argument: self.argument.clone(),
            selector: Some(Box::new(selector)),
        }
    }

    fn min_specificity(&self) -> i32 {
        if self.is_element {
            return SPECIFICITY_PER_ELEMENT;
        }
        match &self.selector {
            None => SPECIFICITY_PER_CLASS,
            Some(selector) if self.normalized_name() == "not" => selector
                .components
                .iter()
                .map(|complex| complex.min_specificity())
                .max()
                .unwrap_or(0),
            Some(_) => 0,
        }
    }

    fn max_specificity(&self) -> i32 {
        if self.is_element {
            return SPECIFICITY_PER_ELEMENT;
        }
        match &self.selector {
            None => SPECIFICITY_PER_CLASS,
            Some(selector) if self.normalized_name() == "not" => selector
                .components
                .iter()
                .map(|complex| complex.max_specificity())
                .max()
                .unwrap_or(0),
            Some(_) => SPECIFICITY_PER_CLASS,
        }
    }

    fn is_invisible(&self) -> bool {
        match &self.selector {
            // `:not(%a)` means "doesn't match this selector that matches
            // nothing", so it's equivalent to `*` and stays visible.
            Some(selector) => self.normalized_name() != "not" && selector.is_invisible(),
            None => false,
        }
    }
}

impl SimpleSelector {
    /// Whether this selector can never appear in emitted CSS.
    pub fn is_invisible(&self) -> bool {
        match self {
            SimpleSelector::Placeholder(_) => true,
            SimpleSelector::Pseudo(pseudo) => pseudo.is_invisible(),
            _ => false,
        }
    }

    /// Whether this is a placeholder whose name marks it private to the
    /// module that defined it.
    pub fn is_private_placeholder(&self) -> bool {
        match self {
            SimpleSelector::Placeholder(name) => {
                name.starts_with('-') || name.starts_with('_')
            },
            _ => false,
        }
    }

    pub fn min_specificity(&self) -> i32 {
        match self {
            SimpleSelector::Universal => 0,
            SimpleSelector::Type(_) => SPECIFICITY_PER_ELEMENT,
            SimpleSelector::Id(_) => SPECIFICITY_PER_ID,
            SimpleSelector::Pseudo(pseudo) => pseudo.min_specificity(),
            _ => SPECIFICITY_PER_CLASS,
        }
    }

    pub fn max_specificity(&self) -> i32 {
        match self {
            SimpleSelector::Universal => 0,
            SimpleSelector::Type(_) => SPECIFICITY_PER_ELEMENT,
            SimpleSelector::Id(_) => SPECIFICITY_PER_ID,
            SimpleSelector::Pseudo(pseudo) => pseudo.max_specificity(),
            _ => SPECIFICITY_PER_CLASS,
        }
    }

    /// Adds this selector to a compound's simple sequence, returning `None`
    /// when the combination can never match anything.
    pub fn unify(&self, compound: &[SimpleSelector]) -> Option<Vec<SimpleSelector>> {
        match self {
            SimpleSelector::Universal | SimpleSelector::Type(_) => {
                unify_leading_element(self, compound)
            },
            SimpleSelector::Id(name) => {
                let conflict = compound.iter().any(|simple| {
                    matches!(simple, SimpleSelector::Id(other) if other != name)
                });
                if conflict {
                    None
                } else {
                    unify_default(self, compound)
                }
            },
            SimpleSelector::Pseudo(pseudo) => unify_pseudo(pseudo, self, compound),
            _ => unify_default(self, compound),
        }
    }
}

/// The fallback unification: keep the compound's order, with the new simple
/// inserted before any pseudo selectors.
fn unify_default(simple: &SimpleSelector, compound: &[SimpleSelector]) -> Option<Vec<SimpleSelector>> {
    if let [other] = compound {
        let takes_over = matches!(other, SimpleSelector::Universal) ||
            matches!(other, SimpleSelector::Pseudo(pseudo) if pseudo.is_host());
        if takes_over {
            return other.unify(std::slice::from_ref(simple));
        }
    }
    if compound.contains(simple) {
        return Some(compound.to_vec());
    }

    let mut result = Vec::with_capacity(compound.len() + 1);
    let mut added_self = false;
    for other in compound {
        if !added_self && matches!(other, SimpleSelector::Pseudo(_)) {
            result.push(simple.clone());
            added_self = true;
        }
        result.push(other.clone());
    }
    if !added_self {
        result.push(simple.clone());
    }
    Some(result)
}

/// Type and universal selectors merge with the compound's leading element
/// selector, since a compound can constrain at most one element name.
fn unify_leading_element(
    simple: &SimpleSelector,
    compound: &[SimpleSelector],
) -> Option<Vec<SimpleSelector>> {
    match compound.first() {
        Some(first @ (SimpleSelector::Universal | SimpleSelector::Type(_))) => {
            let unified = unify_universal_and_element(simple, first)?;
            let mut result = Vec::with_capacity(compound.len());
            result.push(unified);
            result.extend(compound[1..].iter().cloned());
            Some(result)
        },
        _ => {
            if matches!(simple, SimpleSelector::Universal) {
                // `*` adds no constraint.
                return Some(compound.to_vec());
            }
            let mut result = Vec::with_capacity(compound.len() + 1);
            result.push(simple.clone());
            result.extend(compound.iter().cloned());
            Some(result)
        },
    }
}

fn unify_universal_and_element(
    selector1: &SimpleSelector,
    selector2: &SimpleSelector,
) -> Option<SimpleSelector> {
    match (selector1, selector2) {
        (SimpleSelector::Universal, other) | (other, SimpleSelector::Universal) => {
            Some(other.clone())
        },
        (SimpleSelector::Type(name1), SimpleSelector::Type(name2)) => {
            if name1 == name2 {
                Some(selector1.clone())
            } else {
                None
            }
        },
        _ => None,
    }
}

fn unify_pseudo(
    pseudo: &Pseudo,
    simple: &SimpleSelector,
    compound: &[SimpleSelector],
) -> Option<Vec<SimpleSelector>> {
    if pseudo.is_host() {
        // `:host` only matches when every other selector in the compound is
        // also shadow-piercing.
        let compatible = compound.iter().all(|other| {
            matches!(other, SimpleSelector::Pseudo(other) if other.is_host() || other.selector.is_some())
        });
        if !compatible {
            return None;
        }
    } else if let [other] = compound {
        let takes_over = matches!(other, SimpleSelector::Universal) ||
            matches!(other, SimpleSelector::Pseudo(other) if other.is_host());
        if takes_over {
            return other.unify(std::slice::from_ref(simple));
        }
    }

    if compound.contains(simple) {
        return Some(compound.to_vec());
    }

    let mut result = Vec::with_capacity(compound.len() + 1);
    let mut added_self = false;
    for other in compound {
        if let SimpleSelector::Pseudo(other_pseudo) = other {
            if other_pseudo.is_element && !added_self {
                // A compound may contain at most one pseudo-element, and
                // pseudo-classes sort before it.
                if pseudo.is_element {
                    return None;
                }
                result.push(simple.clone());
                added_self = true;
            }
        }
        result.push(other.clone());
    }
    if !added_self {
        result.push(simple.clone());
    }
    Some(result)
}

impl ToCss for SimpleSelector {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        match self {
            SimpleSelector::Universal => dest.write_char('*'),
            SimpleSelector::Type(name) => serialize_identifier(name, dest),
            SimpleSelector::Class(name) => {
                dest.write_char('.')?;
                serialize_identifier(name, dest)
            },
            SimpleSelector::Id(name) => {
                dest.write_char('#')?;
                serialize_identifier(name, dest)
            },
            SimpleSelector::Placeholder(name) => {
                dest.write_char('%')?;
                serialize_identifier(name, dest)
            },
            SimpleSelector::Attribute(attribute) => attribute.to_css(dest),
            SimpleSelector::Pseudo(pseudo) => pseudo.to_css(dest),
        }
    }
}

impl ToCss for AttributeSelector {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_char('[')?;
        serialize_identifier(&self.name, dest)?;
        if let Some(operator) = self.operator {
            dest.write_str(operator.as_str())?;
            if let Some(value) = &self.value {
                serialize_string(value, dest)?;
            }
        }
        dest.write_char(']')
    }
}

impl ToCss for Pseudo {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_char(':')?;
        if self.is_element {
            dest.write_char(':')?;
        }
        serialize_identifier(&self.name, dest)?;
        if self.argument.is_none() && self.selector.is_none() {
            return Ok(());
        }
        dest.write_char('(')?;
        if let Some(argument) = &self.argument {
            dest.write_str(argument)?;
            if self.selector.is_some() {
                dest.write_char(' ')?;
            }
        }
        if let Some(selector) = &self.selector {
            selector.to_css(dest)?;
        }
        dest.write_char(')')
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(f)
    }
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Selector containment: whether one selector matches every element another
//! matches.

use crate::complex::{Combinator, ComplexSelector, ComplexSelectorComponent};
use crate::compound::CompoundSelector;
use crate::list::SelectorList;
use crate::simple::{Pseudo, SimpleSelector};

/// Pseudo-classes that match whatever their selector arguments match, so a
/// simple selector inside their argument acts like one written directly.
static SUBSELECTOR_PSEUDOS: phf::Set<&'static str> = phf::phf_set! {
    "is",
    "matches",
    "any",
    "where",
    "current",
    "nth-child",
    "nth-last-child",
};

/// Whether `list1` matches every element `list2` matches.
pub fn list_is_superselector(list1: &[ComplexSelector], list2: &[ComplexSelector]) -> bool {
    list2.iter().all(|complex1| {
        list1
            .iter()
            .any(|complex2| complex2.is_superselector(complex1))
    })
}

/// Like [`complex_is_superselector`], but `complex1` may match an element
/// that is an ancestor of what `complex2` matches.
pub fn complex_is_parent_superselector(
    complex1: &[ComplexSelectorComponent],
    complex2: &[ComplexSelectorComponent],
) -> bool {
    if matches!(complex1.first(), Some(ComplexSelectorComponent::Combinator(_))) {
        return false;
    }
    if matches!(complex2.first(), Some(ComplexSelectorComponent::Combinator(_))) {
        return false;
    }
    if complex1.len() > complex2.len() {
        return false;
    }

    // Appending an impossible-to-match base makes the regular superselector
    // computation compare only the ancestor parts.
    let base = ComplexSelectorComponent::Compound(CompoundSelector::new([
        SimpleSelector::Placeholder("<temp>".to_owned()),
    ]));
    let mut padded1 = complex1.to_vec();
    padded1.push(base.clone());
    let mut padded2 = complex2.to_vec();
    padded2.push(base);
    complex_is_superselector(&padded1, &padded2)
}

/// Whether `complex1` matches every element `complex2` matches.
pub fn complex_is_superselector(
    complex1: &[ComplexSelectorComponent],
    complex2: &[ComplexSelectorComponent],
) -> bool {
    // Selectors with trailing combinators are neither superselectors nor
    // subselectors.
    if matches!(complex1.last(), Some(ComplexSelectorComponent::Combinator(_))) {
        return false;
    }
    if matches!(complex2.last(), Some(ComplexSelectorComponent::Combinator(_))) {
        return false;
    }

    let mut i1 = 0;
    let mut i2 = 0;
    loop {
        let remaining1 = complex1.len() - i1;
        let remaining2 = complex2.len() - i2;
        if remaining1 == 0 || remaining2 == 0 {
            return false;
        }
        // More complex selectors are never superselectors of less complex
        // ones.
        if remaining1 > remaining2 {
            return false;
        }

        let compound1 = match &complex1[i1] {
            ComplexSelectorComponent::Compound(compound) => compound,
            ComplexSelectorComponent::Combinator(_) => return false,
        };
        if matches!(&complex2[i2], ComplexSelectorComponent::Combinator(_)) {
            return false;
        }

        if remaining1 == 1 {
            let last2 = match complex2.last() {
                Some(ComplexSelectorComponent::Compound(compound)) => compound,
                _ => return false,
            };
            return compound_is_superselector(
                compound1,
                last2,
                &complex2[i2..complex2.len() - 1],
            );
        }

        // Find the first index in `complex2` after which `compound1` covers
        // a leading compound; stop before consuming all of `complex2`, since
        // the rest of `complex1` still needs something to match.
        let mut after_superselector = i2 + 1;
        while after_superselector < complex2.len() {
            if let ComplexSelectorComponent::Compound(compound2) =
                &complex2[after_superselector - 1]
            {
                if compound_is_superselector(
                    compound1,
                    compound2,
                    &complex2[i2..after_superselector - 1],
                ) {
                    break;
                }
            }
            after_superselector += 1;
        }
        if after_superselector == complex2.len() {
            return false;
        }

        let component1 = &complex1[i1 + 1];
        let component2 = &complex2[after_superselector];
        match (component1, component2) {
            (
                ComplexSelectorComponent::Combinator(combinator1),
                ComplexSelectorComponent::Combinator(combinator2),
            ) => {
                // `.foo ~ .bar` covers `.foo + .bar`; otherwise the
                // combinators must match exactly.
                if *combinator1 == Combinator::FollowingSibling {
                    if *combinator2 == Combinator::Child {
                        return false;
                    }
                } else if combinator1 != combinator2 {
                    return false;
                }

                // `.foo > .baz` is not a superselector of
                // `.foo > .bar > .baz`, even though `.baz` covers
                // `.bar > .baz`.
                if remaining1 == 3 && remaining2 > 3 {
                    return false;
                }

                i1 += 2;
                i2 = after_superselector + 1;
            },
            (ComplexSelectorComponent::Combinator(_), _) => return false,
            (_, ComplexSelectorComponent::Combinator(combinator2)) => {
                if *combinator2 != Combinator::Child {
                    return false;
                }
                i1 += 1;
                i2 = after_superselector + 1;
            },
            _ => {
                i1 += 1;
                i2 = after_superselector;
            },
        }
    }
}

/// Whether `compound1` matches every element `compound2` matches.
///
/// `parents` are the components preceding `compound2` in its complex
/// selector, which selector-argument pseudos may need to match against.
pub fn compound_is_superselector(
    compound1: &CompoundSelector,
    compound2: &CompoundSelector,
    parents: &[ComplexSelectorComponent],
) -> bool {
    for simple1 in &compound1.components {
        if let SimpleSelector::Pseudo(pseudo) = simple1 {
            if pseudo.selector.is_some() {
                if !selector_pseudo_is_superselector(pseudo, compound2, parents) {
                    return false;
                }
                continue;
            }
        }
        if !simple_is_superselector_of_compound(simple1, compound2) {
            return false;
        }
    }

    // A pseudo-element on the right must be mirrored on the left.
    for simple2 in &compound2.components {
        if let SimpleSelector::Pseudo(pseudo) = simple2 {
            if pseudo.is_element && !compound1.components.contains(simple2) {
                return false;
            }
        }
    }

    true
}

fn simple_is_superselector_of_compound(
    simple: &SimpleSelector,
    compound: &CompoundSelector,
) -> bool {
    compound.components.iter().any(|their_simple| {
        if simple == their_simple {
            return true;
        }

        // Some selectors match everything their subselectors match.
        if let SimpleSelector::Pseudo(pseudo) = their_simple {
            if let Some(selector) = &pseudo.selector {
                if SUBSELECTOR_PSEUDOS.contains(pseudo.normalized_name()) {
                    return selector.components.iter().all(|complex| {
                        match &complex.components[..] {
                            [ComplexSelectorComponent::Compound(compound)] => {
                                compound.components.contains(simple)
                            },
                            _ => false,
                        }
                    });
                }
            }
        }
        false
    })
}

fn selector_pseudo_is_superselector(
    pseudo1: &Pseudo,
    compound2: &CompoundSelector,
    parents: &[ComplexSelectorComponent],
) -> bool {
    let selector1 = match &pseudo1.selector {
        Some(selector) => selector,
        None => return false,
    };

    match pseudo1.normalized_name() {
        "is" | "matches" | "any" | "where" => {
            // The args are a disjunction: superselector if some arg list is
            // covered, or if some inner complex covers the compound (plus
            // its ancestors) directly.
            if selector_pseudo_args(compound2, &pseudo1.name, true)
                .any(|selector2| selector1.is_superselector(selector2))
            {
                return true;
            }
            let mut target: Vec<ComplexSelectorComponent> = parents.to_vec();
            target.push(ComplexSelectorComponent::Compound(compound2.clone()));
            selector1
                .components
                .iter()
                .any(|complex1| complex_is_superselector(&complex1.components, &target))
        },
        "has" | "host" | "host-context" => selector_pseudo_args(compound2, &pseudo1.name, true)
            .any(|selector2| selector1.is_superselector(selector2)),
        "slotted" => selector_pseudo_args(compound2, &pseudo1.name, false)
            .any(|selector2| selector1.is_superselector(selector2)),
        "not" => selector1.components.iter().all(|complex| {
            compound2.components.iter().any(|simple2| match simple2 {
                SimpleSelector::Type(_) => match complex.components.last() {
                    Some(ComplexSelectorComponent::Compound(compound1)) => {
                        compound1.components.iter().any(|simple1| {
                            matches!(simple1, SimpleSelector::Type(_)) && simple1 != simple2
                        })
                    },
                    _ => false,
                },
                SimpleSelector::Id(_) => match complex.components.last() {
                    Some(ComplexSelectorComponent::Compound(compound1)) => {
                        compound1.components.iter().any(|simple1| {
                            matches!(simple1, SimpleSelector::Id(_)) && simple1 != simple2
                        })
                    },
                    _ => false,
                },
                SimpleSelector::Pseudo(pseudo2) => {
                    if pseudo2.name != pseudo1.name {
                        return false;
                    }
                    match &pseudo2.selector {
                        Some(selector2) => list_is_superselector(
                            &selector2.components,
                            std::slice::from_ref(complex),
                        ),
                        None => false,
                    }
                },
                _ => false,
            })
        }),
        "current" => selector_pseudo_args(compound2, &pseudo1.name, true)
            .any(|selector2| **selector1 == *selector2),
        "nth-child" | "nth-last-child" => {
            compound2.components.iter().any(|simple2| match simple2 {
                SimpleSelector::Pseudo(pseudo2) => {
                    pseudo2.name == pseudo1.name &&
                        pseudo2.argument == pseudo1.argument &&
                        pseudo2
                            .selector
                            .as_ref()
                            .is_some_and(|selector2| selector1.is_superselector(selector2))
                },
                _ => false,
            })
        },
        _ => false,
    }
}

/// The inner selector lists of pseudos in `compound` with the given name.
fn selector_pseudo_args<'a>(
    compound: &'a CompoundSelector,
    name: &'a str,
    is_class: bool,
) -> impl Iterator<Item = &'a SelectorList> {
    compound.components.iter().filter_map(move |simple| match simple {
        SimpleSelector::Pseudo(pseudo) if pseudo.is_class() == is_class && pseudo.name == name => {
            pseudo.selector.as_deref()
        },
        _ => None,
    })
}

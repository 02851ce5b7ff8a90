/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Combination of complex selectors: unification (intersecting compound
//! requirements) and weaving (interleaving parent sequences while
//! respecting combinator semantics).

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::complex::{Combinator, ComplexSelectorComponent};
use crate::compound::CompoundSelector;
use crate::simple::SimpleSelector;
use crate::superselector::complex_is_parent_superselector;

/// Returns the contents of a selector list that matches only elements
/// matched by every one of `complexes`.
///
/// If no such list can be produced, returns `None`.
pub fn unify_complex(
    complexes: Vec<Vec<ComplexSelectorComponent>>,
) -> Option<Vec<Vec<ComplexSelectorComponent>>> {
    debug_assert!(!complexes.is_empty());
    if complexes.len() == 1 {
        return Some(complexes);
    }

    let mut unified_base: Option<Vec<SimpleSelector>> = None;
    for complex in &complexes {
        let base = match complex.last() {
            Some(ComplexSelectorComponent::Compound(base)) => base,
            _ => return None,
        };
        match &mut unified_base {
            None => unified_base = Some(base.components.to_vec()),
            Some(unified) => {
                for simple in &base.components {
                    *unified = simple.unify(unified)?;
                }
            },
        }
    }
    let unified_base = unified_base?;

    let mut without_bases: Vec<Vec<ComplexSelectorComponent>> = complexes
        .into_iter()
        .map(|mut complex| {
            complex.pop();
            complex
        })
        .collect();
    if let Some(last) = without_bases.last_mut() {
        last.push(ComplexSelectorComponent::Compound(CompoundSelector::new(
            unified_base,
        )));
    }
    Some(weave(without_bases))
}

/// Folds every simple selector of `compound1` into `compound2`.
pub fn unify_compound(
    compound1: &[SimpleSelector],
    compound2: &[SimpleSelector],
) -> Option<Vec<SimpleSelector>> {
    let mut result = compound2.to_vec();
    for simple in compound1 {
        result = simple.unify(&result)?;
    }
    Some(result)
}

/// Expands "parenthesized selectors": returns all component sequences that
/// match elements matched by all of `complexes`, preserving the relative
/// order of each input sequence.
///
/// The selector `.D (.A .B)` is represented as `[[.D], [.A, .B]]` and weaves
/// to `.D .A .B`, `.A .D .B`, and `.A .B .D`.
pub fn weave(
    complexes: Vec<Vec<ComplexSelectorComponent>>,
) -> Vec<Vec<ComplexSelectorComponent>> {
    let mut iter = complexes.into_iter();
    let mut prefixes: Vec<Vec<ComplexSelectorComponent>> = match iter.next() {
        Some(first) => vec![first],
        None => return Vec::new(),
    };

    for mut complex in iter {
        let target = match complex.pop() {
            Some(target) => target,
            None => continue,
        };
        if complex.is_empty() {
            for prefix in &mut prefixes {
                prefix.push(target.clone());
            }
            continue;
        }

        let parents = complex;
        let mut new_prefixes = Vec::new();
        for prefix in &prefixes {
            if let Some(parent_prefixes) = weave_parents(prefix, &parents) {
                for mut parent_prefix in parent_prefixes {
                    parent_prefix.push(target.clone());
                    new_prefixes.push(parent_prefix);
                }
            }
        }
        prefixes = new_prefixes;
    }

    prefixes
}

/// Interweaves `parents1` and `parents2` into all possible ancestor
/// sequences that match both, or `None` when their combinators are
/// incompatible.
fn weave_parents(
    parents1: &[ComplexSelectorComponent],
    parents2: &[ComplexSelectorComponent],
) -> Option<Vec<Vec<ComplexSelectorComponent>>> {
    let mut queue1: VecDeque<ComplexSelectorComponent> = parents1.iter().cloned().collect();
    let mut queue2: VecDeque<ComplexSelectorComponent> = parents2.iter().cloned().collect();

    let initial_combinators = merge_initial_combinators(&mut queue1, &mut queue2)?;
    let final_combinators = merge_final_combinators(&mut queue1, &mut queue2)?;

    // Make sure there's at most one `:root` in the output.
    match (first_if_root(&mut queue1), first_if_root(&mut queue2)) {
        (Some(root1), Some(root2)) => {
            let root = root1.unify(&root2)?;
            queue1.push_front(ComplexSelectorComponent::Compound(root.clone()));
            queue2.push_front(ComplexSelectorComponent::Compound(root));
        },
        (Some(root1), None) => {
            queue2.push_front(ComplexSelectorComponent::Compound(root1));
        },
        (None, Some(root2)) => {
            queue1.push_front(ComplexSelectorComponent::Compound(root2));
        },
        (None, None) => {},
    }

    let mut groups1 = group_selectors(queue1);
    let mut groups2 = group_selectors(queue2);
    let lcs = longest_common_subsequence(
        groups2.make_contiguous(),
        groups1.make_contiguous(),
        |group1, group2| {
            if group1 == group2 {
                return Some(group1.clone());
            }
            if !matches!(group1.first(), Some(ComplexSelectorComponent::Compound(_))) ||
                !matches!(group2.first(), Some(ComplexSelectorComponent::Compound(_)))
            {
                return None;
            }
            if complex_is_parent_superselector(group1, group2) {
                return Some(group2.clone());
            }
            if complex_is_parent_superselector(group2, group1) {
                return Some(group1.clone());
            }
            if !must_unify(group1, group2) {
                return None;
            }
            let unified = unify_complex(vec![group1.clone(), group2.clone()])?;
            if unified.len() > 1 {
                return None;
            }
            unified.into_iter().next()
        },
    );

    let mut choices: Vec<Vec<Vec<ComplexSelectorComponent>>> = vec![vec![initial_combinators
        .into_iter()
        .map(ComplexSelectorComponent::Combinator)
        .collect()]];

    for group in lcs {
        let chunk = chunks(&mut groups1, &mut groups2, |queue| {
            queue
                .front()
                .map_or(true, |first| complex_is_parent_superselector(first, &group))
        });
        choices.push(
            chunk
                .into_iter()
                .map(|groups| groups.into_iter().flatten().collect())
                .collect(),
        );
        choices.push(vec![group]);
        groups1.pop_front();
        groups2.pop_front();
    }

    let tail = chunks(&mut groups1, &mut groups2, |queue| queue.is_empty());
    choices.push(
        tail.into_iter()
            .map(|groups| groups.into_iter().flatten().collect())
            .collect(),
    );
    choices.extend(final_combinators);

    let non_empty: Vec<Vec<Vec<ComplexSelectorComponent>>> = choices
        .into_iter()
        .filter(|choice| !choice.is_empty())
        .collect();
    Some(
        paths(non_empty)
            .into_iter()
            .map(|path| path.into_iter().flatten().collect())
            .collect(),
    )
}

/// Extracts leading combinators from both queues and merges them: one run
/// must be a suffix of the other, and the longer run wins.
fn merge_initial_combinators(
    components1: &mut VecDeque<ComplexSelectorComponent>,
    components2: &mut VecDeque<ComplexSelectorComponent>,
) -> Option<Vec<Combinator>> {
    let mut combinators1 = Vec::new();
    while let Some(ComplexSelectorComponent::Combinator(combinator)) = components1.front() {
        combinators1.push(*combinator);
        components1.pop_front();
    }
    let mut combinators2 = Vec::new();
    while let Some(ComplexSelectorComponent::Combinator(combinator)) = components2.front() {
        combinators2.push(*combinator);
        components2.pop_front();
    }

    let lcs = longest_common_subsequence(&combinators1, &combinators2, |combinator1, combinator2| {
        if combinator1 == combinator2 {
            Some(*combinator1)
        } else {
            None
        }
    });
    if lcs == combinators1 {
        Some(combinators2)
    } else if lcs == combinators2 {
        Some(combinators1)
    } else {
        None
    }
}

/// Extracts trailing combinators (and their compounds) from both queues and
/// merges them, producing the choices for the merged tail back-to-front.
fn merge_final_combinators(
    components1: &mut VecDeque<ComplexSelectorComponent>,
    components2: &mut VecDeque<ComplexSelectorComponent>,
) -> Option<VecDeque<Vec<Vec<ComplexSelectorComponent>>>> {
    use Combinator::{Child, FollowingSibling, NextSibling};
    use ComplexSelectorComponent::{Combinator as Comb, Compound};

    let mut result: VecDeque<Vec<Vec<ComplexSelectorComponent>>> = VecDeque::new();
    loop {
        if !matches!(components1.back(), Some(Comb(_))) &&
            !matches!(components2.back(), Some(Comb(_)))
        {
            return Some(result);
        }

        let mut combinators1 = Vec::new();
        while let Some(Comb(combinator)) = components1.back() {
            combinators1.push(*combinator);
            components1.pop_back();
        }
        let mut combinators2 = Vec::new();
        while let Some(Comb(combinator)) = components2.back() {
            combinators2.push(*combinator);
            components2.pop_back();
        }

        if combinators1.len() > 1 || combinators2.len() > 1 {
            // Multiple trailing combinators only appear in selectors that
            // were already invalid; keep whichever sequence contains the
            // other, and give up otherwise.
            let lcs = longest_common_subsequence(&combinators1, &combinators2, |a, b| {
                if a == b {
                    Some(*a)
                } else {
                    None
                }
            });
            if lcs == combinators1 {
                let mut option: Vec<ComplexSelectorComponent> =
                    components2.iter().cloned().collect();
                option.extend(combinators2.iter().rev().map(|c| Comb(*c)));
                result.push_front(vec![option]);
            } else if lcs == combinators2 {
                let mut option: Vec<ComplexSelectorComponent> =
                    components1.iter().cloned().collect();
                option.extend(combinators1.iter().rev().map(|c| Comb(*c)));
                result.push_front(vec![option]);
            } else {
                return None;
            }
            return Some(result);
        }

        match (combinators1.first().copied(), combinators2.first().copied()) {
            (Some(combinator1), Some(combinator2)) => {
                let compound1 = match components1.pop_back() {
                    Some(Compound(compound)) => compound,
                    _ => return None,
                };
                let compound2 = match components2.pop_back() {
                    Some(Compound(compound)) => compound,
                    _ => return None,
                };

                match (combinator1, combinator2) {
                    (FollowingSibling, FollowingSibling) => {
                        if compound1.is_superselector(&compound2) {
                            result.push_front(vec![vec![
                                Compound(compound2),
                                Comb(FollowingSibling),
                            ]]);
                        } else if compound2.is_superselector(&compound1) {
                            result.push_front(vec![vec![
                                Compound(compound1),
                                Comb(FollowingSibling),
                            ]]);
                        } else {
                            let mut options = vec![
                                vec![
                                    Compound(compound1.clone()),
                                    Comb(FollowingSibling),
                                    Compound(compound2.clone()),
                                    Comb(FollowingSibling),
                                ],
                                vec![
                                    Compound(compound2.clone()),
                                    Comb(FollowingSibling),
                                    Compound(compound1.clone()),
                                    Comb(FollowingSibling),
                                ],
                            ];
                            if let Some(unified) = compound1.unify(&compound2) {
                                options.push(vec![Compound(unified), Comb(FollowingSibling)]);
                            }
                            result.push_front(options);
                        }
                    },
                    (FollowingSibling, NextSibling) | (NextSibling, FollowingSibling) => {
                        let (following, next) = if combinator1 == FollowingSibling {
                            (compound1, compound2)
                        } else {
                            (compound2, compound1)
                        };
                        if following.is_superselector(&next) {
                            result.push_front(vec![vec![Compound(next), Comb(NextSibling)]]);
                        } else {
                            let mut options = vec![vec![
                                Compound(following.clone()),
                                Comb(FollowingSibling),
                                Compound(next.clone()),
                                Comb(NextSibling),
                            ]];
                            if let Some(unified) = following.unify(&next) {
                                options.push(vec![Compound(unified), Comb(NextSibling)]);
                            }
                            result.push_front(options);
                        }
                    },
                    (Child, NextSibling) | (Child, FollowingSibling) => {
                        result.push_front(vec![vec![Compound(compound2), Comb(combinator2)]]);
                        components1.push_back(Compound(compound1));
                        components1.push_back(Comb(Child));
                    },
                    (NextSibling, Child) | (FollowingSibling, Child) => {
                        result.push_front(vec![vec![Compound(compound1), Comb(combinator1)]]);
                        components2.push_back(Compound(compound2));
                        components2.push_back(Comb(Child));
                    },
                    _ if combinator1 == combinator2 => {
                        let unified = compound1.unify(&compound2)?;
                        result.push_front(vec![vec![Compound(unified), Comb(combinator1)]]);
                    },
                    _ => return None,
                }
            },
            (Some(combinator1), None) => {
                if combinator1 == Child {
                    let redundant = match (components1.back(), components2.back()) {
                        (Some(Compound(compound1)), Some(Compound(compound2))) => {
                            compound2.is_superselector(compound1)
                        },
                        _ => false,
                    };
                    if redundant {
                        components2.pop_back();
                    }
                }
                let last = components1.pop_back()?;
                result.push_front(vec![vec![last, Comb(combinator1)]]);
            },
            (None, Some(combinator2)) => {
                if combinator2 == Child {
                    let redundant = match (components1.back(), components2.back()) {
                        (Some(Compound(compound1)), Some(Compound(compound2))) => {
                            compound1.is_superselector(compound2)
                        },
                        _ => false,
                    };
                    if redundant {
                        components1.pop_back();
                    }
                }
                let last = components2.pop_back()?;
                result.push_front(vec![vec![last, Comb(combinator2)]]);
            },
            (None, None) => unreachable!("loop guard ensures a trailing combinator"),
        }
    }
}

/// Pops and returns the leading compound if it contains `:root`.
fn first_if_root(
    components: &mut VecDeque<ComplexSelectorComponent>,
) -> Option<CompoundSelector> {
    let is_root = match components.front() {
        Some(ComplexSelectorComponent::Compound(compound)) => has_root(compound),
        _ => false,
    };
    if !is_root {
        return None;
    }
    match components.pop_front() {
        Some(ComplexSelectorComponent::Compound(compound)) => Some(compound),
        _ => unreachable!("front was just checked to be a compound"),
    }
}

fn has_root(compound: &CompoundSelector) -> bool {
    compound.components.iter().any(|simple| {
        matches!(simple, SimpleSelector::Pseudo(pseudo)
            if pseudo.is_class() && pseudo.normalized_name() == "root")
    })
}

/// Splits a component sequence into "growable" groups: each group is a
/// compound plus any combinators attached to it.
fn group_selectors(
    components: impl IntoIterator<Item = ComplexSelectorComponent>,
) -> VecDeque<Vec<ComplexSelectorComponent>> {
    let mut groups: Vec<Vec<ComplexSelectorComponent>> = Vec::new();
    for component in components {
        if let Some(last_group) = groups.last_mut() {
            let attach = matches!(last_group.last(), Some(ComplexSelectorComponent::Combinator(_))) ||
                component.is_combinator();
            if attach {
                last_group.push(component);
                continue;
            }
        }
        groups.push(vec![component]);
    }
    groups.into()
}

/// Returns all orderings of the prefixes of `queue1` and `queue2` up to the
/// point where `done` becomes true for each.
fn chunks<T: Clone>(
    queue1: &mut VecDeque<T>,
    queue2: &mut VecDeque<T>,
    done: impl Fn(&VecDeque<T>) -> bool,
) -> Vec<Vec<T>> {
    let mut chunk1 = Vec::new();
    while !done(queue1) {
        match queue1.pop_front() {
            Some(element) => chunk1.push(element),
            None => break,
        }
    }
    let mut chunk2 = Vec::new();
    while !done(queue2) {
        match queue2.pop_front() {
            Some(element) => chunk2.push(element),
            None => break,
        }
    }

    match (chunk1.is_empty(), chunk2.is_empty()) {
        (true, true) => Vec::new(),
        (true, false) => vec![chunk2],
        (false, true) => vec![chunk1],
        (false, false) => {
            let mut order1 = chunk1.clone();
            order1.extend(chunk2.iter().cloned());
            let mut order2 = chunk2;
            order2.extend(chunk1);
            vec![order1, order2]
        },
    }
}

/// Whether `complex1` and `complex2` need to be unified to produce a valid
/// combined selector: true when both contain the same unique simple selector
/// (an id, or a pseudo-element).
fn must_unify(
    complex1: &[ComplexSelectorComponent],
    complex2: &[ComplexSelectorComponent],
) -> bool {
    let unique_selectors: FxHashSet<&SimpleSelector> = complex1
        .iter()
        .filter_map(|component| component.as_compound())
        .flat_map(|compound| compound.components.iter())
        .filter(|simple| is_unique(simple))
        .collect();
    if unique_selectors.is_empty() {
        return false;
    }

    complex2
        .iter()
        .filter_map(|component| component.as_compound())
        .flat_map(|compound| compound.components.iter())
        .any(|simple| is_unique(simple) && unique_selectors.contains(simple))
}

fn is_unique(simple: &SimpleSelector) -> bool {
    match simple {
        SimpleSelector::Id(_) => true,
        SimpleSelector::Pseudo(pseudo) => pseudo.is_element,
        _ => false,
    }
}

/// Returns the Cartesian product of `choices`, one option from each choice
/// per path.
pub fn paths<T: Clone>(choices: Vec<Vec<T>>) -> Vec<Vec<T>> {
    let mut paths: Vec<Vec<T>> = vec![Vec::new()];
    for choice in choices {
        let mut next = Vec::with_capacity(paths.len().saturating_mul(choice.len()));
        for option in &choice {
            for path in &paths {
                let mut path = path.clone();
                path.push(option.clone());
                next.push(path);
            }
        }
        paths = next;
    }
    paths
}

/// The longest common subsequence of `list1` and `list2`, where `select`
/// both tests whether a pair of elements matches and produces the value to
/// use for it.
pub(crate) fn longest_common_subsequence<T: Clone>(
    list1: &[T],
    list2: &[T],
    select: impl Fn(&T, &T) -> Option<T>,
) -> Vec<T> {
    let mut lengths = vec![vec![0usize; list2.len() + 1]; list1.len() + 1];
    let mut selections: Vec<Vec<Option<T>>> = vec![vec![None; list2.len()]; list1.len()];

    for i in 0..list1.len() {
        for j in 0..list2.len() {
            let selection = select(&list1[i], &list2[j]);
            lengths[i + 1][j + 1] = match &selection {
                Some(_) => lengths[i][j] + 1,
                None => lengths[i + 1][j].max(lengths[i][j + 1]),
            };
            selections[i][j] = selection;
        }
    }

    let mut result = Vec::new();
    let mut i = list1.len();
    let mut j = list2.len();
    while i > 0 && j > 0 {
        if let Some(selection) = selections[i - 1][j - 1].take() {
            result.push(selection);
            i -= 1;
            j -= 1;
        } else if lengths[i][j - 1] > lengths[i - 1][j] {
            j -= 1;
        } else {
            i -= 1;
        }
    }
    result.reverse();
    result
}

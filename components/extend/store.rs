/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The extension store: tracks style-rule selectors and `@extend`
//! relationships, rewriting stored selectors in place as extensions arrive.

use std::collections::VecDeque;

use cssparser::SourceLocation;
use indexmap::{IndexMap, IndexSet};
use log::debug;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use selectors::{
    paths, unify_complex, weave, ComplexSelector, ComplexSelectorComponent, CompoundSelector,
    Pseudo, SelectorList, SimpleSelector, ToCss,
};

use crate::error::{ExtendError, ExtendResult};
use crate::extended_selector::ExtendedSelector;
use crate::extension::{Extender, Extension};
use crate::media::CssMediaQuery;
use crate::mode::ExtendMode;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// The extensions that apply to a single target, keyed by the extender's
/// complex selector. At most one extension is stored per key; collisions
/// merge.
type ExtensionsByComplex = FxIndexMap<ComplexSelector, Extension>;

/// Extensions grouped by target.
type ExtensionsByTarget = FxIndexMap<SimpleSelector, ExtensionsByComplex>;

/// A value paired with the source location it was parsed from.
#[derive(Clone, Debug)]
pub struct CssValue<T> {
    pub value: T,
    pub location: SourceLocation,
}

impl<T> CssValue<T> {
    pub fn new(value: T, location: SourceLocation) -> Self {
        CssValue { value, location }
    }
}

/// Tracks selectors and extensions and applies the latter to the former.
///
/// Rule selectors arrive through [`add_selector`](ExtensionStore::add_selector)
/// and `@extend`s through [`add_extension`](ExtensionStore::add_extension),
/// in document order. Each arrival may rewrite previously stored selectors
/// (and previously stored extensions' extenders) in place.
#[derive(Debug, Default)]
pub struct ExtensionStore {
    /// Which rule selectors contain each simple selector, including
    /// occurrences inside pseudo inner selectors. Used to find the rules
    /// affected by a new extension.
    selectors: FxIndexMap<SimpleSelector, FxIndexSet<ExtendedSelector>>,
    /// Registered extensions, by target and then by extender selector.
    extensions: ExtensionsByTarget,
    /// The extensions whose extender selector contains each simple selector.
    /// Used to find extensions that must themselves be re-extended.
    extensions_by_extender: FxHashMap<SimpleSelector, Vec<Extension>>,
    /// The media context of rules defined inside `@media`.
    media_contexts: FxHashMap<ExtendedSelector, Vec<CssMediaQuery>>,
    /// The maximum specificity of the author-written selector that first
    /// introduced each simple selector. First writer wins.
    source_specificity: FxHashMap<SimpleSelector, i32>,
    /// Complex selectors the author wrote, as opposed to ones produced by
    /// extension. These are never trimmed from output.
    originals: FxHashSet<ComplexSelector>,
    mode: ExtendMode,
}

impl ExtensionStore {
    pub fn new() -> Self {
        Self::with_mode(ExtendMode::Normal)
    }

    pub fn with_mode(mode: ExtendMode) -> Self {
        ExtensionStore {
            selectors: FxIndexMap::default(),
            extensions: ExtensionsByTarget::default(),
            extensions_by_extender: FxHashMap::default(),
            media_contexts: FxHashMap::default(),
            source_specificity: FxHashMap::default(),
            originals: FxHashSet::default(),
            mode,
        }
    }

    /// Whether any extensions have been registered.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// The simple selectors that occur in registered rule selectors.
    pub fn simple_selectors(&self) -> impl Iterator<Item = &SimpleSelector> {
        self.selectors.keys()
    }

    /// Extends `selector` as though `source` appeared in rules whose
    /// selectors match each compound in `targets`, adding the extended
    /// selectors alongside the originals.
    pub fn extend(
        selector: SelectorList,
        source: &SelectorList,
        targets: &SelectorList,
        location: SourceLocation,
    ) -> ExtendResult<SelectorList> {
        Self::extend_or_replace(selector, source, targets, ExtendMode::AllTargets, location)
    }

    /// Like [`extend`](ExtensionStore::extend), but the extended selectors
    /// replace the targets rather than being added next to them.
    pub fn replace(
        selector: SelectorList,
        source: &SelectorList,
        targets: &SelectorList,
        location: SourceLocation,
    ) -> ExtendResult<SelectorList> {
        Self::extend_or_replace(selector, source, targets, ExtendMode::Replace, location)
    }

    fn extend_or_replace(
        mut selector: SelectorList,
        source: &SelectorList,
        targets: &SelectorList,
        mode: ExtendMode,
        location: SourceLocation,
    ) -> ExtendResult<SelectorList> {
        let mut store = ExtensionStore::with_mode(mode);
        if !selector.is_invisible() {
            store
                .originals
                .extend(selector.components.iter().cloned());
        }

        for complex in &targets.components {
            let compound = match &complex.components[..] {
                [ComplexSelectorComponent::Compound(compound)] => compound,
                _ => {
                    return Err(ExtendError::invalid_target(
                        complex.to_css_string(),
                        location,
                    ));
                },
            };

            let mut extensions = ExtensionsByTarget::default();
            for simple in &compound.components {
                let sources: ExtensionsByComplex = source
                    .components
                    .iter()
                    .map(|complex| {
                        let extension = Extension::new(
                            complex.clone(),
                            simple.clone(),
                            location,
                            None,
                            true,
                        );
                        (complex.clone(), extension)
                    })
                    .collect();
                extensions.insert(simple.clone(), sources);
            }

            if let Some(extended) = store.extend_list(&selector, location, &extensions, None)? {
                selector = extended;
            }
        }

        Ok(selector)
    }

    /// Registers a rule's selector, extending it by every extension known so
    /// far, and returns the shared cell future extensions will keep
    /// rewriting.
    pub fn add_selector(
        &mut self,
        selector: SelectorList,
        location: SourceLocation,
        media_context: Option<Vec<CssMediaQuery>>,
    ) -> ExtendResult<ExtendedSelector> {
        let original = selector;
        if !original.is_invisible() {
            for complex in &original.components {
                self.originals.insert(complex.clone());
            }
        }

        let extended = if self.extensions.is_empty() {
            original
        } else {
            let extensions = self.extensions.clone();
            match self
                .extend_list(&original, location, &extensions, media_context.as_deref())
                .map_err(|error| error.within(location))?
            {
                Some(extended) => extended,
                None => original,
            }
        };

        debug!(
            "registering selector `{}` ({} complex selectors)",
            extended.to_css_string(),
            extended.components.len()
        );

        let cell = ExtendedSelector::new(extended.clone(), location);
        if let Some(media_context) = media_context {
            self.media_contexts.insert(cell.clone(), media_context);
        }
        self.register_selector(&extended, &cell);
        Ok(cell)
    }

    /// Records every simple selector occurring in `list` (recursing into
    /// pseudo inner selectors) as belonging to `cell`.
    fn register_selector(&mut self, list: &SelectorList, cell: &ExtendedSelector) {
        for complex in &list.components {
            for component in &complex.components {
                let compound = match component {
                    ComplexSelectorComponent::Compound(compound) => compound,
                    ComplexSelectorComponent::Combinator(_) => continue,
                };
                for simple in &compound.components {
                    self.selectors
                        .entry(simple.clone())
                        .or_default()
                        .insert(cell.clone());
                    if let SimpleSelector::Pseudo(pseudo) = simple {
                        if let Some(inner) = &pseudo.selector {
                            self.register_selector(inner, cell);
                        }
                    }
                }
            }
        }
    }

    /// Registers an `@extend` from every complex selector in `extender` to
    /// `target`, then re-extends any stored extensions and selectors the new
    /// extensions affect.
    pub fn add_extension(
        &mut self,
        extender: &CssValue<SelectorList>,
        target: &SimpleSelector,
        optional: bool,
        media_context: Option<&Vec<CssMediaQuery>>,
    ) -> ExtendResult<()> {
        let existing_selectors = self.selectors.get(target).cloned();
        let existing_extensions = self.extensions_by_extender.get(target).cloned();

        let mut new_sources: Option<ExtensionsByComplex> = None;
        for complex in &extender.value.components {
            let extension = Extension::new(
                complex.clone(),
                target.clone(),
                extender.location,
                media_context.cloned(),
                optional,
            );

            let sources = self.extensions.entry(target.clone()).or_default();
            if let Some(existing) = sources.get(complex).cloned() {
                // An extension already exists for this extender; merge rather
                // than overwrite so neither occurrence is lost.
                sources.insert(complex.clone(), Extension::merge(existing, extension)?);
                continue;
            }
            sources.insert(complex.clone(), extension.clone());

            for simple in simple_selectors_of(complex) {
                self.extensions_by_extender
                    .entry(simple.clone())
                    .or_default()
                    .push(extension.clone());
                // Only the original selector's specificity is relevant;
                // selectors generated by extension don't get their own.
                self.source_specificity
                    .entry(simple.clone())
                    .or_insert_with(|| complex.max_specificity());
            }

            if existing_selectors.is_some() || existing_extensions.is_some() {
                new_sources
                    .get_or_insert_with(Default::default)
                    .insert(complex.clone(), extension);
            }
        }

        let new_sources = match new_sources {
            Some(new_sources) => new_sources,
            None => return Ok(()),
        };

        debug!(
            "extension target `{}` gained {} new source selector(s)",
            target.to_css_string(),
            new_sources.len()
        );

        let mut new_extensions = ExtensionsByTarget::default();
        new_extensions.insert(target.clone(), new_sources);

        if let Some(existing_extensions) = existing_extensions {
            let additional =
                self.extend_existing_extensions(&existing_extensions, &new_extensions)?;
            if let Some(additional) = additional {
                for (target, sources) in additional {
                    new_extensions.entry(target).or_default().extend(sources);
                }
            }
        }

        if let Some(selectors) = existing_selectors {
            self.extend_existing_selectors(&selectors, &new_extensions)?;
        }
        Ok(())
    }

    /// Adds all the extensions of `stores` to this store, without
    /// re-extending the other stores themselves.
    pub fn add_extensions<'a>(
        &mut self,
        stores: impl IntoIterator<Item = &'a ExtensionStore>,
    ) -> ExtendResult<()> {
        let mut extensions_to_extend: Vec<Extension> = Vec::new();
        let mut selectors_to_extend: Option<FxIndexSet<ExtendedSelector>> = None;
        let mut new_extensions: Option<ExtensionsByTarget> = None;

        for store in stores {
            if store.is_empty() {
                continue;
            }
            for (simple, specificity) in &store.source_specificity {
                self.source_specificity
                    .entry(simple.clone())
                    .or_insert(*specificity);
            }

            for (target, new_sources) in &store.extensions {
                // Private placeholders can't be extended across module
                // boundaries.
                if target.is_private_placeholder() {
                    continue;
                }

                let existing_extensions = self.extensions_by_extender.get(target);
                let has_existing_extensions =
                    existing_extensions.is_some_and(|extensions| !extensions.is_empty());
                if let Some(extensions) = existing_extensions {
                    extensions_to_extend.extend(extensions.iter().cloned());
                }

                let existing_selectors = self.selectors.get(target);
                let has_existing_selectors = existing_selectors.is_some();
                if let Some(cells) = existing_selectors {
                    selectors_to_extend
                        .get_or_insert_with(Default::default)
                        .extend(cells.iter().cloned());
                }

                match self.extensions.get_mut(target) {
                    None => {
                        self.extensions.insert(target.clone(), new_sources.clone());
                        if has_existing_extensions || has_existing_selectors {
                            new_extensions
                                .get_or_insert_with(Default::default)
                                .insert(target.clone(), new_sources.clone());
                        }
                    },
                    Some(existing_sources) => {
                        for (complex, extension) in new_sources {
                            let merged = match existing_sources.get(complex).cloned() {
                                Some(existing) => Extension::merge(existing, extension.clone())?,
                                None => extension.clone(),
                            };
                            existing_sources.insert(complex.clone(), merged.clone());
                            if has_existing_extensions || has_existing_selectors {
                                new_extensions
                                    .get_or_insert_with(Default::default)
                                    .entry(target.clone())
                                    .or_default()
                                    .insert(complex.clone(), merged);
                            }
                        }
                    },
                }
            }
        }

        if let Some(new_extensions) = new_extensions {
            if !extensions_to_extend.is_empty() {
                // Further registrations are discarded: extension loops can't
                // cross module boundaries by construction.
                self.extend_existing_extensions(&extensions_to_extend, &new_extensions)?;
            }
            if let Some(selectors) = selectors_to_extend {
                self.extend_existing_selectors(&selectors, &new_extensions)?;
            }
        }
        Ok(())
    }

    /// Re-extends the extender selectors of `extensions` with
    /// `new_extensions`, registering the results as extensions of their own.
    /// Returns the registrations whose target is also a key of
    /// `new_extensions`, so the caller can keep propagating them.
    fn extend_existing_extensions(
        &mut self,
        extensions: &[Extension],
        new_extensions: &ExtensionsByTarget,
    ) -> ExtendResult<Option<ExtensionsByTarget>> {
        let mut additional: Option<ExtensionsByTarget> = None;

        for extension in extensions {
            let selectors = match self.extend_complex(
                &extension.extender.selector,
                extension.extender.location,
                new_extensions,
                extension.media_context.as_deref(),
            ) {
                Ok(Some(selectors)) => selectors,
                Ok(None) => continue,
                Err(error) => return Err(error.within(extension.extender.location)),
            };

            let contains_extension =
                selectors.first() == Some(&extension.extender.selector);
            let mut first = false;
            for complex in selectors {
                // If the output contains the original extender, there's no
                // need to recreate its extension.
                if contains_extension && !first {
                    first = true;
                    continue;
                }

                let with_extender = extension.with_extender(complex.clone());
                let existing = self
                    .extensions
                    .get(&extension.target)
                    .and_then(|sources| sources.get(&complex))
                    .cloned();
                match existing {
                    Some(existing) => {
                        let merged = Extension::merge(existing, with_extender)?;
                        self.extensions
                            .entry(extension.target.clone())
                            .or_default()
                            .insert(complex, merged);
                    },
                    None => {
                        self.extensions
                            .entry(extension.target.clone())
                            .or_default()
                            .insert(complex.clone(), with_extender.clone());
                        for component in &complex.components {
                            if let ComplexSelectorComponent::Compound(compound) = component {
                                for simple in &compound.components {
                                    self.extensions_by_extender
                                        .entry(simple.clone())
                                        .or_default()
                                        .push(with_extender.clone());
                                }
                            }
                        }
                        if new_extensions.contains_key(&extension.target) {
                            additional
                                .get_or_insert_with(Default::default)
                                .entry(extension.target.clone())
                                .or_default()
                                .insert(complex, with_extender);
                        }
                    },
                }
            }

            // The re-extension output no longer contains the original
            // extender (a `:not()` expansion, for example), so its stale
            // entry must go.
            if !contains_extension {
                if let Some(sources) = self.extensions.get_mut(&extension.target) {
                    sources.shift_remove(&extension.extender.selector);
                }
            }
        }

        Ok(additional)
    }

    /// Rewrites each stored selector cell by `new_extensions`, re-registering
    /// cells whose value actually changed.
    fn extend_existing_selectors(
        &mut self,
        selectors: &FxIndexSet<ExtendedSelector>,
        new_extensions: &ExtensionsByTarget,
    ) -> ExtendResult<()> {
        for cell in selectors {
            let old_value = cell.value();
            let media_context = self.media_contexts.get(cell).cloned();
            let extended = match self.extend_list(
                &old_value,
                cell.location(),
                new_extensions,
                media_context.as_deref(),
            ) {
                Ok(Some(extended)) => extended,
                // No extension actually applied (unification may have
                // failed), so the cell doesn't need re-registration.
                Ok(None) => continue,
                Err(error) => return Err(error.within(cell.location())),
            };

            debug!(
                "rewriting selector `{}` to `{}`",
                old_value.to_css_string(),
                extended.to_css_string()
            );
            cell.set_value(extended.clone());
            self.register_selector(&extended, cell);
        }
        Ok(())
    }

    /// Extends `list` with `extensions`. Returns `None` when no extension
    /// applied, which callers use as the "nothing changed" signal.
    fn extend_list(
        &mut self,
        list: &SelectorList,
        location: SourceLocation,
        extensions: &ExtensionsByTarget,
        media_context: Option<&[CssMediaQuery]>,
    ) -> ExtendResult<Option<SelectorList>> {
        let mut extended: Option<Vec<ComplexSelector>> = None;
        for (i, complex) in list.components.iter().enumerate() {
            match self.extend_complex(complex, location, extensions, media_context)? {
                None => {
                    if let Some(extended) = &mut extended {
                        extended.push(complex.clone());
                    }
                },
                Some(result) => {
                    let extended =
                        extended.get_or_insert_with(|| list.components[..i].to_vec());
                    extended.extend(result);
                },
            }
        }

        let extended = match extended {
            Some(extended) => extended,
            None => return Ok(None),
        };
        let trimmed = self.trim(extended, |complex| self.originals.contains(complex));
        Ok(Some(SelectorList {
            components: trimmed,
        }))
    }

    /// Extends `complex` with `extensions`, returning every complex selector
    /// it can now stand for, or `None` when no extension applies.
    fn extend_complex(
        &mut self,
        complex: &ComplexSelector,
        location: SourceLocation,
        extensions: &ExtensionsByTarget,
        media_context: Option<&[CssMediaQuery]>,
    ) -> ExtendResult<Option<Vec<ComplexSelector>>> {
        let in_original = self.originals.contains(complex);

        // The alternatives at each position of `complex`: a singleton for
        // untouched positions, the extension results elsewhere. Left unbuilt
        // until the first position actually changes.
        let mut extended_not_expanded: Option<Vec<Vec<ComplexSelector>>> = None;

        for (i, component) in complex.components.iter().enumerate() {
            let extended = match component {
                ComplexSelectorComponent::Compound(compound) => self.extend_compound(
                    compound,
                    location,
                    extensions,
                    media_context,
                    in_original,
                )?,
                ComplexSelectorComponent::Combinator(_) => None,
            };
            match extended {
                None => {
                    if let Some(alternatives) = &mut extended_not_expanded {
                        alternatives
                            .push(vec![ComplexSelector::new(vec![component.clone()], false)]);
                    }
                },
                Some(result) => {
                    let alternatives = extended_not_expanded.get_or_insert_with(|| {
                        complex.components[..i]
                            .iter()
                            .map(|component| {
                                vec![ComplexSelector::new(
                                    vec![component.clone()],
                                    complex.line_break,
                                )]
                            })
                            .collect()
                    });
                    alternatives.push(result);
                },
            }
        }

        let extended_not_expanded = match extended_not_expanded {
            Some(alternatives) => alternatives,
            None => return Ok(None),
        };

        let mut first = true;
        let mut result = Vec::new();
        for path in paths(extended_not_expanded) {
            let woven = weave(path.iter().map(|complex| complex.components.clone()).collect());
            for components in woven {
                let output = ComplexSelector::new(
                    components,
                    complex.line_break || path.iter().any(|input| input.line_break),
                );

                // Copies of `complex` retain their status as original
                // selectors, including ones modified by `:not()` extension.
                if first && self.originals.contains(complex) {
                    self.originals.insert(output.clone());
                }
                first = false;

                result.push(output);
            }
        }
        Ok(Some(result))
    }

    /// Extends `compound` with `extensions`, returning the complex selectors
    /// that replace it, or `None` when no extension applies.
    fn extend_compound(
        &mut self,
        compound: &CompoundSelector,
        location: SourceLocation,
        extensions: &ExtensionsByTarget,
        media_context: Option<&[CssMediaQuery]>,
        in_original: bool,
    ) -> ExtendResult<Option<Vec<ComplexSelector>>> {
        // When multiple targets must all match, track which ones did.
        let mut targets_used: Option<FxIndexSet<SimpleSelector>> =
            if self.mode == ExtendMode::Normal || extensions.len() < 2 {
                None
            } else {
                Some(FxIndexSet::default())
            };

        let mut options: Option<Vec<Vec<Extender>>> = None;
        for (i, simple) in compound.components.iter().enumerate() {
            match self.extend_simple(
                simple,
                location,
                extensions,
                media_context,
                targets_used.as_mut(),
            )? {
                None => {
                    if let Some(options) = &mut options {
                        options.push(vec![self.extender_for_simple(simple.clone(), location)]);
                    }
                },
                Some(extended) => {
                    if options.is_none() {
                        let mut fresh = Vec::new();
                        if i != 0 {
                            fresh.push(vec![self.extender_for_compound(
                                &compound.components[..i],
                                location,
                            )]);
                        }
                        options = Some(fresh);
                    }
                    if let Some(options) = &mut options {
                        options.extend(extended);
                    }
                },
            }
        }

        let options = match options {
            Some(options) => options,
            None => return Ok(None),
        };

        // If not every target matched somewhere in this compound, extension
        // fails for it outright.
        if let Some(targets_used) = &targets_used {
            if targets_used.len() != extensions.len() {
                return Ok(None);
            }
        }

        // A single simple selector needs no unification.
        if options.len() == 1 {
            let mut result = Vec::new();
            for extender in options.into_iter().flatten() {
                extender.assert_compatible_media_context(media_context)?;
                result.push(extender.selector);
            }
            return Ok(Some(result));
        }

        let mut first = self.mode != ExtendMode::Replace;
        let mut result: Vec<ComplexSelector> = Vec::new();

        for path in paths(options) {
            let complexes: Option<Vec<Vec<ComplexSelectorComponent>>> = if first {
                // The first path is always the original selector. It can't
                // be returned as-is because pseudo selectors may have been
                // rewritten, but it needs no unification.
                first = false;
                let mut simples: Vec<SimpleSelector> = Vec::new();
                for extender in &path {
                    debug_assert!(extender.selector.components.len() == 1);
                    if let Some(ComplexSelectorComponent::Compound(compound)) =
                        extender.selector.components.last()
                    {
                        simples.extend(compound.components.iter().cloned());
                    }
                }
                Some(vec![vec![ComplexSelectorComponent::Compound(
                    CompoundSelector::new(simples),
                )]])
            } else {
                let mut to_unify: VecDeque<Vec<ComplexSelectorComponent>> = VecDeque::new();
                let mut originals: Vec<SimpleSelector> = Vec::new();
                for extender in &path {
                    if extender.original {
                        if let Some(ComplexSelectorComponent::Compound(compound)) =
                            extender.selector.components.last()
                        {
                            originals.extend(compound.components.iter().cloned());
                        }
                    } else {
                        to_unify.push_back(extender.selector.components.clone());
                    }
                }
                if !originals.is_empty() {
                    to_unify.push_front(vec![ComplexSelectorComponent::Compound(
                        CompoundSelector::new(originals),
                    )]);
                }
                unify_complex(to_unify.into_iter().collect())
            };

            let complexes = match complexes {
                Some(complexes) => complexes,
                None => continue,
            };

            let mut line_break = false;
            for extender in &path {
                extender.assert_compatible_media_context(media_context)?;
                line_break = line_break || extender.selector.line_break;
            }

            for components in complexes {
                result.push(ComplexSelector::new(components, line_break));
            }
        }

        let trimmed = if in_original && self.mode != ExtendMode::Replace {
            let original = result.first().cloned();
            self.trim(result, |complex| Some(complex) == original.as_ref())
        } else {
            self.trim(result, |_| false)
        };
        Ok(Some(trimmed))
    }

    /// Extends `simple` with `extensions`, returning the sets of extender
    /// alternatives it contributes to its compound, or `None` when no
    /// extension applies.
    fn extend_simple(
        &mut self,
        simple: &SimpleSelector,
        location: SourceLocation,
        extensions: &ExtensionsByTarget,
        media_context: Option<&[CssMediaQuery]>,
        mut targets_used: Option<&mut FxIndexSet<SimpleSelector>>,
    ) -> ExtendResult<Option<Vec<Vec<Extender>>>> {
        if let SimpleSelector::Pseudo(pseudo) = simple {
            if pseudo.selector.is_some() {
                if let Some(extended) =
                    self.extend_pseudo(pseudo, location, extensions, media_context)?
                {
                    let mut result = Vec::with_capacity(extended.len());
                    for pseudo in extended {
                        let simple = SimpleSelector::Pseudo(pseudo);
                        let option = self
                            .without_pseudo(&simple, location, extensions, targets_used.as_deref_mut())
                            .unwrap_or_else(|| {
                                vec![self.extender_for_simple(simple.clone(), location)]
                            });
                        result.push(option);
                    }
                    return Ok(Some(result));
                }
            }
        }

        Ok(self
            .without_pseudo(simple, location, extensions, targets_used)
            .map(|option| vec![option]))
    }

    /// The extenders for `simple` itself, ignoring any pseudo rewriting: the
    /// self-extender (outside replace mode) followed by every registered
    /// extension's extender.
    fn without_pseudo(
        &self,
        simple: &SimpleSelector,
        location: SourceLocation,
        extensions: &ExtensionsByTarget,
        targets_used: Option<&mut FxIndexSet<SimpleSelector>>,
    ) -> Option<Vec<Extender>> {
        let sources = extensions.get(simple)?;
        if let Some(targets_used) = targets_used {
            targets_used.insert(simple.clone());
        }

        let mut result = Vec::with_capacity(sources.len() + 1);
        if self.mode != ExtendMode::Replace {
            result.push(self.extender_for_simple(simple.clone(), location));
        }
        for extension in sources.values() {
            result.push(extension.extender.clone());
        }
        Some(result)
    }

    /// Extends the inner selector of `pseudo`, applying the rewrites that
    /// keep nested pseudos valid, or returns `None` when the inner selector
    /// is unchanged.
    fn extend_pseudo(
        &mut self,
        pseudo: &Pseudo,
        location: SourceLocation,
        extensions: &ExtensionsByTarget,
        media_context: Option<&[CssMediaQuery]>,
    ) -> ExtendResult<Option<Vec<Pseudo>>> {
        let selector = match &pseudo.selector {
            Some(selector) => (**selector).clone(),
            None => {
                debug_assert!(false, "extend_pseudo requires a selector argument");
                return Ok(None);
            },
        };

        let extended = match self.extend_list(&selector, location, extensions, media_context)? {
            Some(extended) => extended,
            None => return Ok(None),
        };

        // `:not()` arguments with combinators fail to parse in most
        // browsers, so they're dropped unless the original already had them
        // or nothing else remains.
        let complexes: Vec<ComplexSelector> = if pseudo.normalized_name() == "not" &&
            !selector
                .components
                .iter()
                .any(|complex| complex.components.len() > 1) &&
            extended
                .components
                .iter()
                .any(|complex| complex.components.len() == 1)
        {
            extended
                .components
                .into_iter()
                .filter(|complex| complex.components.len() <= 1)
                .collect()
        } else {
            extended.components
        };

        let complexes: Vec<ComplexSelector> = complexes
            .into_iter()
            .flat_map(|complex| -> Vec<ComplexSelector> {
                // Unwrap single-compound, single-pseudo inner selectors where
                // the outer pseudo's semantics allow it.
                let inner_pseudo = match &complex.components[..] {
                    [ComplexSelectorComponent::Compound(compound)]
                        if compound.components.len() == 1 =>
                    {
                        match &compound.components[0] {
                            SimpleSelector::Pseudo(inner) if inner.selector.is_some() => {
                                Some(inner.clone())
                            },
                            _ => None,
                        }
                    },
                    _ => None,
                };
                let inner_pseudo = match inner_pseudo {
                    Some(inner_pseudo) => inner_pseudo,
                    None => return vec![complex],
                };
                let inner_selector = match &inner_pseudo.selector {
                    Some(selector) => selector,
                    None => return vec![complex],
                };

                match pseudo.normalized_name() {
                    "not" => {
                        // An inner `:not` would need its contents unified
                        // with the result; that narrow case isn't supported,
                        // so only `:is`/`:matches` are inlined.
                        if !matches!(inner_pseudo.normalized_name(), "is" | "matches") {
                            return Vec::new();
                        }
                        inner_selector.components.clone()
                    },
                    "is" | "matches" | "any" | "current" | "nth-child" | "nth-last-child" => {
                        if inner_pseudo.name != pseudo.name ||
                            inner_pseudo.argument != pseudo.argument
                        {
                            return Vec::new();
                        }
                        inner_selector.components.clone()
                    },
                    // Each layer of these pseudos adds its own semantics;
                    // `:has(:has(img))` is not `:has(img)`.
                    "has" | "host" | "host-context" | "slotted" => vec![complex],
                    _ => Vec::new(),
                }
            })
            .collect();

        if complexes.is_empty() {
            return Ok(None);
        }

        // Older browsers only support `:not` with a single argument, so the
        // result is split unless the original was already a list.
        if pseudo.normalized_name() == "not" && selector.components.len() == 1 {
            return Ok(Some(
                complexes
                    .into_iter()
                    .map(|complex| {
                        pseudo.with_selector(SelectorList {
                            components: vec![complex],
                        })
                    })
                    .collect(),
            ));
        }
        Ok(Some(vec![pseudo.with_selector(SelectorList {
            components: complexes,
        })]))
    }

    /// An extender standing for a written simple selector, credited with the
    /// specificity of the selector that introduced it.
    fn extender_for_simple(&self, simple: SimpleSelector, location: SourceLocation) -> Extender {
        let specificity = self.source_specificity.get(&simple).copied().unwrap_or(0);
        Extender::new(
            ComplexSelector::new(
                vec![ComplexSelectorComponent::Compound(CompoundSelector::new([
                    simple,
                ]))],
                false,
            ),
            location,
            specificity,
            true,
        )
    }

    /// Like [`extender_for_simple`](Self::extender_for_simple), for a run of
    /// simple selectors kept together as one compound.
    fn extender_for_compound(
        &self,
        simples: &[SimpleSelector],
        location: SourceLocation,
    ) -> Extender {
        let compound = CompoundSelector::new(simples.iter().cloned());
        let specificity = self.source_specificity_for(&compound);
        Extender::new(
            ComplexSelector::new(
                vec![ComplexSelectorComponent::Compound(compound)],
                false,
            ),
            location,
            specificity,
            true,
        )
    }

    fn source_specificity_for(&self, compound: &CompoundSelector) -> i32 {
        compound
            .components
            .iter()
            .map(|simple| self.source_specificity.get(simple).copied().unwrap_or(0))
            .max()
            .unwrap_or(0)
    }

    /// Removes redundant selectors from `selectors`: a generated selector is
    /// dropped when another selector matches everything it matches with at
    /// least the specificity of the sources that generated it. Selectors for
    /// which `is_original` returns true are always kept.
    fn trim(
        &self,
        selectors: Vec<ComplexSelector>,
        is_original: impl Fn(&ComplexSelector) -> bool,
    ) -> Vec<ComplexSelector> {
        // Above this size the quadratic scan costs more than the duplicate
        // output it would remove.
        if selectors.len() > 100 {
            return selectors;
        }

        let mut result: VecDeque<ComplexSelector> = VecDeque::new();
        for i in (0..selectors.len()).rev() {
            let complex1 = &selectors[i];

            if is_original(complex1) {
                // Rules that extend a component of their own selector can
                // produce duplicate originals; keep a single copy, rotated
                // to the front.
                match result.iter().position(|complex2| complex2 == complex1) {
                    Some(position) => {
                        if let Some(duplicate) = result.remove(position) {
                            result.push_front(duplicate);
                        }
                    },
                    None => result.push_front(complex1.clone()),
                }
                continue;
            }

            // For `complex1` to be removed, a superselector must match with
            // specificity at least that of the sources that generated it.
            let mut max_specificity = 0;
            for component in &complex1.components {
                if let ComplexSelectorComponent::Compound(compound) = component {
                    max_specificity = max_specificity.max(self.source_specificity_for(compound));
                }
            }

            // Compare against already-kept later selectors, so a duplicate
            // pair loses only one member...
            if result.iter().any(|complex2| {
                complex2.min_specificity() >= max_specificity &&
                    complex2.is_superselector(complex1)
            }) {
                continue;
            }
            // ...and against not-yet-visited earlier selectors, which may be
            // trimmed themselves later.
            if selectors[..i].iter().any(|complex2| {
                complex2.min_specificity() >= max_specificity &&
                    complex2.is_superselector(complex1)
            }) {
                continue;
            }

            result.push_front(complex1.clone());
        }
        result.into_iter().collect()
    }

    /// Yields every mandatory extension whose target satisfies `predicate`,
    /// expanding merged extensions into the base extensions they were built
    /// from.
    pub fn extensions_where_target<'a>(
        &'a self,
        predicate: impl Fn(&SimpleSelector) -> bool + 'a,
    ) -> impl Iterator<Item = Extension> + 'a {
        self.extensions
            .iter()
            .filter(move |(target, _)| predicate(*target))
            .flat_map(|(_, sources)| sources.values())
            .flat_map(|extension| extension.clone().unmerge())
            .filter(|extension| !extension.optional)
    }

    /// Forks this store into an independent copy that shares no mutable
    /// state, along with a map from each old selector cell to its new twin.
    /// The copy's mode is reset to [`ExtendMode::Normal`].
    pub fn clone_store(&self) -> (ExtensionStore, FxHashMap<ExtendedSelector, ExtendedSelector>) {
        let mut new_selectors: FxIndexMap<SimpleSelector, FxIndexSet<ExtendedSelector>> =
            FxIndexMap::default();
        let mut new_media_contexts: FxHashMap<ExtendedSelector, Vec<CssMediaQuery>> =
            FxHashMap::default();
        let mut old_to_new: FxHashMap<ExtendedSelector, ExtendedSelector> = FxHashMap::default();

        for (simple, cells) in &self.selectors {
            let mut new_set = FxIndexSet::default();
            for cell in cells {
                // A cell registered under several simple selectors must map
                // to a single twin, so sharing survives the fork.
                let new_cell = match old_to_new.get(cell) {
                    Some(new_cell) => new_cell.clone(),
                    None => {
                        let new_cell = ExtendedSelector::new(cell.value(), cell.location());
                        old_to_new.insert(cell.clone(), new_cell.clone());
                        if let Some(context) = self.media_contexts.get(cell) {
                            new_media_contexts.insert(new_cell.clone(), context.clone());
                        }
                        new_cell
                    },
                };
                new_set.insert(new_cell);
            }
            new_selectors.insert(simple.clone(), new_set);
        }

        let store = ExtensionStore {
            selectors: new_selectors,
            extensions: self.extensions.clone(),
            extensions_by_extender: self.extensions_by_extender.clone(),
            media_contexts: new_media_contexts,
            source_specificity: self.source_specificity.clone(),
            originals: self.originals.clone(),
            mode: ExtendMode::Normal,
        };
        (store, old_to_new)
    }
}

/// Every simple selector in `complex`, recursing into pseudo inner
/// selectors.
fn simple_selectors_of(complex: &ComplexSelector) -> Vec<&SimpleSelector> {
    fn visit<'a>(complex: &'a ComplexSelector, out: &mut Vec<&'a SimpleSelector>) {
        for component in &complex.components {
            if let ComplexSelectorComponent::Compound(compound) = component {
                for simple in &compound.components {
                    out.push(simple);
                    if let SimpleSelector::Pseudo(pseudo) = simple {
                        if let Some(selector) = &pseudo.selector {
                            for inner in &selector.components {
                                visit(inner, out);
                            }
                        }
                    }
                }
            }
        }
    }

    let mut out = Vec::new();
    visit(complex, &mut out);
    out
}

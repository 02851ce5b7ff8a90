/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use cssparser::SourceLocation;
use selectors::{ComplexSelector, SimpleSelector};

use crate::error::{ExtendError, ExtendResult};
use crate::media::CssMediaQuery;

/// A selector to be injected into rules that contain an extension's target.
#[derive(Clone, Debug)]
pub struct Extender {
    pub selector: ComplexSelector,
    pub location: SourceLocation,
    /// The specificity the injected selector is credited with. For extenders
    /// synthesized from a written simple selector, this is the source
    /// specificity of that simple, not the selector's own weight.
    pub specificity: i32,
    /// Whether this extender stands for a selector the author wrote, as
    /// opposed to one produced by extension.
    pub original: bool,
    media_context: Option<Vec<CssMediaQuery>>,
}

impl Extender {
    pub(crate) fn new(
        selector: ComplexSelector,
        location: SourceLocation,
        specificity: i32,
        original: bool,
    ) -> Self {
        Extender {
            selector,
            location,
            specificity,
            original,
            media_context: None,
        }
    }

    fn for_extension(
        selector: ComplexSelector,
        location: SourceLocation,
        media_context: Option<Vec<CssMediaQuery>>,
    ) -> Self {
        let specificity = selector.max_specificity();
        Extender {
            selector,
            location,
            specificity,
            original: false,
            media_context,
        }
    }

    /// Fails when this extender was defined in a media context different
    /// from the one it is being applied in.
    pub fn assert_compatible_media_context(
        &self,
        media_context: Option<&[CssMediaQuery]>,
    ) -> ExtendResult<()> {
        let expected = match &self.media_context {
            Some(expected) => expected,
            None => return Ok(()),
        };
        if media_context == Some(expected.as_slice()) {
            return Ok(());
        }
        Err(ExtendError::media_context_conflict(self.location))
    }
}

/// A single `@extend` relationship: the extender's selector is injected
/// wherever the target simple selector appears.
#[derive(Clone, Debug)]
pub struct Extension {
    pub extender: Extender,
    /// The simple selector being extended.
    pub target: SimpleSelector,
    /// The span of the `@extend` rule that created this extension.
    pub location: SourceLocation,
    pub media_context: Option<Vec<CssMediaQuery>>,
    /// Whether it's an error for the target to never appear in any selector.
    pub optional: bool,
    /// The two extensions this one was merged from, if any.
    merged_from: Option<Box<(Extension, Extension)>>,
}

impl Extension {
    pub fn new(
        selector: ComplexSelector,
        target: SimpleSelector,
        location: SourceLocation,
        media_context: Option<Vec<CssMediaQuery>>,
        optional: bool,
    ) -> Self {
        Extension {
            extender: Extender::for_extension(selector, location, media_context.clone()),
            target,
            location,
            media_context,
            optional,
            merged_from: None,
        }
    }

    /// A copy of this extension with the extender's selector replaced.
    pub fn with_extender(&self, selector: ComplexSelector) -> Extension {
        Extension {
            extender: Extender::for_extension(
                selector,
                self.extender.location,
                self.media_context.clone(),
            ),
            target: self.target.clone(),
            location: self.location,
            media_context: self.media_context.clone(),
            optional: self.optional,
            merged_from: None,
        }
    }

    /// Merges two extensions with the same target and extender selector.
    ///
    /// The merge is mandatory if either input is mandatory, and fails if the
    /// inputs carry conflicting media contexts.
    pub fn merge(left: Extension, right: Extension) -> ExtendResult<Extension> {
        debug_assert!(left.target == right.target);
        debug_assert!(left.extender.selector == right.extender.selector);

        // An optional extension with no special media context adds nothing
        // to the other.
        if right.optional && right.media_context.is_none() {
            return Ok(left);
        }
        if left.optional && left.media_context.is_none() {
            return Ok(right);
        }

        let media_context = match (&left.media_context, &right.media_context) {
            (None, right_context) => right_context.clone(),
            (left_context, None) => left_context.clone(),
            (Some(left_context), Some(right_context)) => {
                if left_context != right_context {
                    return Err(ExtendError::media_context_conflict(right.location)
                        .within(left.location));
                }
                Some(left_context.clone())
            },
        };

        let extender = Extender::for_extension(
            left.extender.selector.clone(),
            left.extender.location,
            media_context.clone(),
        );
        let target = left.target.clone();
        let location = left.location;
        let optional = left.optional && right.optional;
        Ok(Extension {
            extender,
            target,
            location,
            media_context,
            optional,
            merged_from: Some(Box::new((left, right))),
        })
    }

    /// Flattens a merged extension back into the base extensions it was
    /// built from. A non-merged extension yields itself.
    pub fn unmerge(self) -> Vec<Extension> {
        match self.merged_from {
            None => vec![self],
            Some(sources) => {
                let (left, right) = *sources;
                let mut result = left.unmerge();
                result.extend(right.unmerge());
                result
            },
        }
    }
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::error::Error;
use std::fmt;

use cssparser::SourceLocation;

pub type ExtendResult<T> = Result<T, ExtendError>;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExtendErrorKind {
    /// The target of an extension was a complex selector rather than a
    /// single compound.
    InvalidTarget { target: String },
    /// An extension defined in one media context was applied under a
    /// different one.
    MediaContextConflict,
}

/// A failure while registering or applying extensions.
///
/// `location` is the primary span of the failure. When the failure surfaces
/// while re-extending previously stored state, the locations of the
/// enclosing selectors or extenders are recorded in `context`,
/// innermost-first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtendError {
    kind: ExtendErrorKind,
    location: SourceLocation,
    context: Vec<SourceLocation>,
}

impl ExtendError {
    pub(crate) fn invalid_target(target: String, location: SourceLocation) -> Self {
        ExtendError {
            kind: ExtendErrorKind::InvalidTarget { target },
            location,
            context: Vec::new(),
        }
    }

    pub(crate) fn media_context_conflict(location: SourceLocation) -> Self {
        ExtendError {
            kind: ExtendErrorKind::MediaContextConflict,
            location,
            context: Vec::new(),
        }
    }

    /// Records that this error surfaced while processing the selector or
    /// extender at `location`.
    pub(crate) fn within(mut self, location: SourceLocation) -> Self {
        self.context.push(location);
        self
    }

    pub fn kind(&self) -> &ExtendErrorKind {
        &self.kind
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

impl fmt::Display for ExtendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for location in self.context.iter().rev() {
            write!(f, "From {}:{}: ", location.line, location.column)?;
        }
        match &self.kind {
            ExtendErrorKind::InvalidTarget { target } => {
                write!(f, "can't extend complex selector `{}`", target)
            },
            ExtendErrorKind::MediaContextConflict => {
                write!(f, "selectors may not be extended across media queries")
            },
        }
    }
}

impl Error for ExtendError {}

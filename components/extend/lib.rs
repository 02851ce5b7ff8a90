/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Selector extension for stylesheet compilation.
//!
//! An [`ExtensionStore`] tracks the selectors of emitted style rules and the
//! `@extend` relationships between them. Both arrive in document order;
//! whenever one side gains a new entry, the other side is rewritten in
//! place: registering `.b {@extend .a}` rewrites every stored selector
//! containing `.a` to also match `.b`, and registering a selector applies
//! all previously seen extensions to it before it is stored.
//!
//! The rewriting obeys two laws: selectors the author wrote keep matching
//! what they originally matched, and selectors produced by extension never
//! exceed the specificity of the extender that produced them. Redundant
//! generated selectors are trimmed under those constraints.
//!
//! The stateless [`ExtensionStore::extend`] and [`ExtensionStore::replace`]
//! entry points apply a single extension to a single selector list without
//! building up state, for use by stylesheet-level functions.

#![deny(unsafe_code)]

mod error;
mod extended_selector;
mod extension;
mod media;
mod mode;
mod store;

pub use error::{ExtendError, ExtendErrorKind, ExtendResult};
pub use extended_selector::ExtendedSelector;
pub use extension::{Extender, Extension};
pub use media::CssMediaQuery;
pub use mode::ExtendMode;
pub use store::{CssValue, ExtensionStore};

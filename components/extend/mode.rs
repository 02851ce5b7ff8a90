/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

/// How extension sources are applied to the selectors that match their
/// targets.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ExtendMode {
    /// Extended selectors are added alongside the selectors they extend.
    #[default]
    Normal,
    /// Like `Normal`, except that extension fails for a compound unless
    /// every target matches somewhere in it.
    AllTargets,
    /// Extended selectors replace the selectors they extend rather than
    /// being added next to them.
    Replace,
}

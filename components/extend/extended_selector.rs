/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::cell::{Ref, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use cssparser::SourceLocation;
use selectors::SelectorList;

/// A style rule's selector, shared between the extension store and the rule
/// that owns it. The store rewrites the value in place as new extensions
/// arrive, so the rule observes the updates without re-registration.
///
/// Equality and hashing use the identity of the shared cell, not its value:
/// two rules with identical selector text are still distinct rules.
#[derive(Clone)]
pub struct ExtendedSelector(Rc<SelectorCell>);

struct SelectorCell {
    value: RefCell<SelectorList>,
    location: SourceLocation,
}

impl ExtendedSelector {
    pub fn new(value: SelectorList, location: SourceLocation) -> Self {
        ExtendedSelector(Rc::new(SelectorCell {
            value: RefCell::new(value),
            location,
        }))
    }

    /// The current selector value. Reflects every extension applied so far.
    pub fn value(&self) -> SelectorList {
        self.0.value.borrow().clone()
    }

    pub fn borrow(&self) -> Ref<'_, SelectorList> {
        self.0.value.borrow()
    }

    pub fn location(&self) -> SourceLocation {
        self.0.location
    }

    pub(crate) fn set_value(&self, value: SelectorList) {
        *self.0.value.borrow_mut() = value;
    }
}

impl PartialEq for ExtendedSelector {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ExtendedSelector {}

impl Hash for ExtendedSelector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(Rc::as_ptr(&self.0) as usize);
    }
}

impl fmt::Debug for ExtendedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedSelector")
            .field("value", &*self.0.value.borrow())
            .field("location", &self.0.location)
            .finish()
    }
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fmt;

/// A single media query, as it appears in a `@media` rule's query list.
///
/// The extension engine only compares media queries for equality, so the
/// representation stays close to the source text.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CssMediaQuery {
    /// `not` or `only`, when present.
    pub modifier: Option<String>,
    /// The media type (`screen`, `print`, ...), or `None` for a query that
    /// has only features.
    pub media_type: Option<String>,
    /// Raw feature expressions, like `min-width: 600px`.
    pub features: Vec<String>,
}

impl CssMediaQuery {
    /// A query that matches a bare media type, like `@media screen`.
    pub fn media_type(name: &str) -> Self {
        CssMediaQuery {
            modifier: None,
            media_type: Some(name.to_owned()),
            features: Vec::new(),
        }
    }
}

impl fmt::Display for CssMediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut needs_space = false;
        if let Some(modifier) = &self.modifier {
            write!(f, "{}", modifier)?;
            needs_space = true;
        }
        if let Some(media_type) = &self.media_type {
            if needs_space {
                f.write_str(" ")?;
            }
            write!(f, "{}", media_type)?;
            needs_space = true;
        }
        for feature in &self.features {
            if needs_space {
                f.write_str(" and ")?;
            }
            write!(f, "({})", feature)?;
            needs_space = true;
        }
        Ok(())
    }
}

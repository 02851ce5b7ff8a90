/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Parses selector text into [`SelectorList`]s.

use std::fmt;

use cssparser::{Parser, ParserInput, SourceLocation, Token};
use smallvec::SmallVec;

use crate::complex::{Combinator, ComplexSelector, ComplexSelectorComponent};
use crate::compound::CompoundSelector;
use crate::list::SelectorList;
use crate::simple::{unvendor, AttributeOperator, AttributeSelector, Pseudo, SimpleSelector};

/// Pseudos whose parenthesized argument is itself a selector list.
static SELECTOR_PSEUDOS: phf::Set<&'static str> = phf::phf_set! {
    "not",
    "is",
    "matches",
    "any",
    "where",
    "has",
    "host",
    "host-context",
    "slotted",
    "current",
};

/// Pseudo-elements that may be written with a single colon.
static LEGACY_PSEUDO_ELEMENTS: phf::Set<&'static str> = phf::phf_set! {
    "before",
    "after",
    "first-line",
    "first-letter",
};

#[derive(Clone, Debug, PartialEq)]
pub enum SelectorParseErrorKind<'i> {
    EmptySelector,
    DanglingCombinator,
    UnexpectedToken(Token<'i>),
}

pub type ParseError<'i> = cssparser::ParseError<'i, SelectorParseErrorKind<'i>>;

/// A parse failure that owns its diagnostics, for callers that outlive the
/// input buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseFailure {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.message, self.location.line, self.location.column
        )
    }
}

impl std::error::Error for ParseFailure {}

/// Parses a selector list from raw text.
pub fn parse(text: &str) -> Result<SelectorList, ParseFailure> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    parse_selector_list(&mut parser).map_err(|error| ParseFailure {
        message: format!("{:?}", error.kind),
        location: error.location,
    })
}

/// Parses a comma-separated selector list.
pub fn parse_selector_list<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<SelectorList, ParseError<'i>> {
    let components = input.parse_comma_separated(parse_complex_selector)?;
    Ok(SelectorList { components })
}

fn parse_complex_selector<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<ComplexSelector, ParseError<'i>> {
    let mut components: Vec<ComplexSelectorComponent> = Vec::new();

    loop {
        input.skip_whitespace();
        let before = input.state();
        match input.next() {
            Err(_) => break,
            Ok(&Token::Delim('>')) => {
                components.push(ComplexSelectorComponent::Combinator(Combinator::Child));
            },
            Ok(&Token::Delim('+')) => {
                components.push(ComplexSelectorComponent::Combinator(Combinator::NextSibling));
            },
            Ok(&Token::Delim('~')) => {
                components.push(ComplexSelectorComponent::Combinator(
                    Combinator::FollowingSibling,
                ));
            },
            Ok(_) => {
                input.reset(&before);
                let compound = parse_compound_selector(input)?;
                components.push(ComplexSelectorComponent::Compound(compound));
            },
        }
    }

    if components.is_empty() {
        return Err(input.new_custom_error(SelectorParseErrorKind::EmptySelector));
    }
    if matches!(components.last(), Some(ComplexSelectorComponent::Combinator(_))) {
        return Err(input.new_custom_error(SelectorParseErrorKind::DanglingCombinator));
    }
    Ok(ComplexSelector::new(components, false))
}

fn parse_compound_selector<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<CompoundSelector, ParseError<'i>> {
    let mut components: SmallVec<[SimpleSelector; 2]> = SmallVec::new();

    loop {
        let before = input.state();
        let token = match input.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::WhiteSpace(_) |
            Token::Delim('>') |
            Token::Delim('+') |
            Token::Delim('~') => {
                input.reset(&before);
                break;
            },
            Token::Ident(name) => {
                components.push(SimpleSelector::Type(name.as_ref().to_owned()));
            },
            Token::Delim('*') => components.push(SimpleSelector::Universal),
            Token::Delim('.') => {
                components.push(SimpleSelector::Class(expect_identifier(input)?));
            },
            Token::Delim('%') => {
                components.push(SimpleSelector::Placeholder(expect_identifier(input)?));
            },
            Token::IDHash(name) => {
                components.push(SimpleSelector::Id(name.as_ref().to_owned()));
            },
            Token::SquareBracketBlock => {
                let attribute = input.parse_nested_block(parse_attribute_selector)?;
                components.push(SimpleSelector::Attribute(attribute));
            },
            Token::Colon => {
                let pseudo = parse_pseudo_selector(input)?;
                components.push(SimpleSelector::Pseudo(pseudo));
            },
            token => {
                if components.is_empty() {
                    return Err(
                        input.new_custom_error(SelectorParseErrorKind::UnexpectedToken(token))
                    );
                }
                input.reset(&before);
                break;
            },
        }
    }

    if components.is_empty() {
        return Err(input.new_custom_error(SelectorParseErrorKind::EmptySelector));
    }
    Ok(CompoundSelector { components })
}

/// Expects an identifier with no intervening whitespace, as after `.` or `%`.
fn expect_identifier<'i, 't>(input: &mut Parser<'i, 't>) -> Result<String, ParseError<'i>> {
    match input.next_including_whitespace() {
        Ok(&Token::Ident(ref name)) => Ok(name.as_ref().to_owned()),
        Ok(token) => {
            let token = token.clone();
            Err(input.new_custom_error(SelectorParseErrorKind::UnexpectedToken(token)))
        },
        Err(error) => Err(error.into()),
    }
}

fn parse_pseudo_selector<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Pseudo, ParseError<'i>> {
    let mut is_element = false;
    let before = input.state();
    match input.next_including_whitespace() {
        Ok(&Token::Colon) => is_element = true,
        _ => input.reset(&before),
    }

    let (name, has_argument) = match input.next_including_whitespace() {
        Ok(&Token::Ident(ref name)) => (name.as_ref().to_ascii_lowercase(), false),
        Ok(&Token::Function(ref name)) => (name.as_ref().to_ascii_lowercase(), true),
        Ok(token) => {
            let token = token.clone();
            return Err(input.new_custom_error(SelectorParseErrorKind::UnexpectedToken(token)));
        },
        Err(error) => return Err(error.into()),
    };

    if !is_element && LEGACY_PSEUDO_ELEMENTS.contains(name.as_str()) {
        is_element = true;
    }

    if !has_argument {
        return Ok(Pseudo {
            name,
            is_element,
            argument: None,
            selector: None,
        });
    }

    if SELECTOR_PSEUDOS.contains(unvendor(&name)) {
        let selector = input.parse_nested_block(parse_selector_list)?;
        Ok(Pseudo {
            name,
            is_element,
            argument: None,
            selector: Some(Box::new(selector)),
        })
    } else {
        let argument = input.parse_nested_block(|input| {
            let start = input.position();
            while input.next_including_whitespace().is_ok() {}
            Ok::<_, ParseError<'i>>(input.slice_from(start).trim().to_owned())
        })?;
        Ok(Pseudo {
            name,
            is_element,
            argument: Some(argument),
            selector: None,
        })
    }
}

fn parse_attribute_selector<'i, 't>(
    input: &mut Parser<'i, 't>,
) -> Result<AttributeSelector, ParseError<'i>> {
    let name = input.expect_ident()?.as_ref().to_owned();

    let operator = match input.next() {
        Err(_) => {
            return Ok(AttributeSelector {
                name,
                operator: None,
                value: None,
            });
        },
        Ok(&Token::Delim('=')) => AttributeOperator::Equal,
        Ok(&Token::IncludeMatch) => AttributeOperator::Includes,
        Ok(&Token::DashMatch) => AttributeOperator::DashMatch,
        Ok(&Token::PrefixMatch) => AttributeOperator::Prefix,
        Ok(&Token::SuffixMatch) => AttributeOperator::Suffix,
        Ok(&Token::SubstringMatch) => AttributeOperator::Substring,
        Ok(token) => {
            let token = token.clone();
            return Err(input.new_custom_error(SelectorParseErrorKind::UnexpectedToken(token)));
        },
    };

    let value = match input.next() {
        Ok(&Token::Ident(ref value)) | Ok(&Token::QuotedString(ref value)) => {
            value.as_ref().to_owned()
        },
        Ok(token) => {
            let token = token.clone();
            return Err(input.new_custom_error(SelectorParseErrorKind::UnexpectedToken(token)));
        },
        Err(error) => return Err(error.into()),
    };

    Ok(AttributeSelector {
        name,
        operator: Some(operator),
        value: Some(value),
    })
}

//! nom building blocks for the declaration parser.
//!
//! Tokens (trivia, identifiers, keywords) are plain combinators. The
//! balanced scanners are custom nom parsers in the same spirit: type
//! texts, default-value snippets and skipped bodies need bracket-depth
//! tracking that stays opaque to string and character literals and
//! comments, so their bodies walk the input directly while keeping the
//! `IResult` contract for composition.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char as nom_char, satisfy};
use nom::combinator::{not, opt, recognize, value};
use nom::error::{ErrorKind, ParseError, VerboseError, VerboseErrorKind};
use nom::multi::{many0_count, separated_list1};
use nom::sequence::{pair, terminated};
use nom::IResult;

pub type SResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

fn ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn plain_error(input: &str, kind: ErrorKind) -> nom::Err<VerboseError<&str>> {
    nom::Err::Error(VerboseError::from_error_kind(input, kind))
}

/// An error carrying a human-readable expectation.
pub fn ctx_error<'a>(input: &'a str, message: &'static str) -> nom::Err<VerboseError<&'a str>> {
    nom::Err::Error(VerboseError {
        errors: vec![(input, VerboseErrorKind::Context(message))],
    })
}

fn line_comment(input: &str) -> SResult<'_, &str> {
    recognize(pair(tag("//"), take_while(|c| c != '\n')))(input)
}

/// Block comment with nesting. An unterminated comment consumes the
/// rest of the input.
fn block_comment(input: &str) -> SResult<'_, &str> {
    if !input.starts_with("/*") {
        return Err(plain_error(input, ErrorKind::Tag));
    }
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < input.len() {
        if input[i..].starts_with("/*") {
            depth += 1;
            i += 2;
        } else if input[i..].starts_with("*/") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return Ok((&input[i..], &input[..i]));
            }
        } else {
            i += input[i..].chars().next().map(char::len_utf8).unwrap_or(1);
        }
    }
    Ok(("", input))
}

/// Whitespace and comments; never fails.
pub fn trivia(input: &str) -> SResult<'_, ()> {
    value(
        (),
        many0_count(alt((
            value((), take_while1(char::is_whitespace)),
            value((), line_comment),
            value((), block_comment),
        ))),
    )(input)
}

/// Horizontal whitespace and block comments only; a newline stays put,
/// which terminates single-line constructs such as initializers.
pub fn inline_trivia(input: &str) -> SResult<'_, ()> {
    value(
        (),
        many0_count(alt((
            value((), take_while1(|c| c == ' ' || c == '\t' || c == '\r')),
            value((), block_comment),
        ))),
    )(input)
}

/// Run `inner` after consuming any leading trivia.
pub fn ws<'a, O, F>(mut inner: F) -> impl FnMut(&'a str) -> SResult<'a, O>
where
    F: FnMut(&'a str) -> SResult<'a, O>,
{
    move |input| {
        let (input, _) = trivia(input)?;
        inner(input)
    }
}

pub fn identifier(input: &str) -> SResult<'_, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(ident_char),
    ))(input)
}

/// Dotted name; a final `.*` segment is accepted for wildcard imports.
pub fn qualified_name(input: &str) -> SResult<'_, String> {
    let (input, base) = recognize(separated_list1(nom_char('.'), identifier))(input)?;
    let (input, star) = opt(tag(".*"))(input)?;
    let mut name = base.to_string();
    if star.is_some() {
        name.push_str(".*");
    }
    Ok((input, name))
}

/// Consume `kw` only at a word boundary.
pub fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> SResult<'a, &'a str> {
    terminated(tag(kw), not(satisfy(ident_char)))
}

pub struct ScanStops<'s> {
    pub chars: &'s [char],
    pub keywords: &'s [&'s str],
    pub stop_on_newline: bool,
}

/// Scan forward until one of the stop characters or keywords occurs with
/// all bracket depths at zero. Never fails; the stop token is left in
/// the remaining input, and end of input yields the whole remainder.
///
/// String and character literals and comments are skipped opaquely. A
/// `>` that is part of `->` or occurs at zero angle depth (a comparison)
/// does not change depth.
pub fn scan_balanced<'a>(input: &'a str, stops: &ScanStops<'_>) -> SResult<'a, &'a str> {
    let mut paren = 0usize;
    let mut bracket = 0usize;
    let mut brace = 0usize;
    let mut angle = 0usize;
    let mut i = 0usize;
    let mut prev_char = '\0';
    while i < input.len() {
        let c = input[i..].chars().next().expect("i is a char boundary");
        let at_top = paren == 0 && bracket == 0 && brace == 0 && angle == 0;
        if at_top {
            if stops.chars.contains(&c) || (stops.stop_on_newline && c == '\n') {
                return Ok((&input[i..], &input[..i]));
            }
            if (c.is_alphabetic() || c == '_')
                && !(prev_char.is_alphanumeric() || prev_char == '_')
            {
                for kw in stops.keywords {
                    if input[i..].starts_with(kw) {
                        let after = &input[i + kw.len()..];
                        let boundary = match after.chars().next() {
                            Some(n) => !(n.is_alphanumeric() || n == '_'),
                            None => true,
                        };
                        if boundary {
                            return Ok((&input[i..], &input[..i]));
                        }
                    }
                }
            }
        }
        match c {
            '"' => {
                i = skip_string_literal(input, i);
                prev_char = '"';
                continue;
            }
            '\'' => {
                i = skip_char_literal(input, i);
                prev_char = '\'';
                continue;
            }
            '/' if input[i..].starts_with("//") => {
                i = match input[i..].find('\n') {
                    Some(offset) => i + offset,
                    None => input.len(),
                };
                prev_char = '/';
                continue;
            }
            '/' if input[i..].starts_with("/*") => {
                i = match input[i..].find("*/") {
                    Some(offset) => i + offset + 2,
                    None => input.len(),
                };
                prev_char = '/';
                continue;
            }
            '(' => paren += 1,
            ')' => paren = paren.saturating_sub(1),
            '[' => bracket += 1,
            ']' => bracket = bracket.saturating_sub(1),
            '{' => brace += 1,
            '}' => brace = brace.saturating_sub(1),
            '<' => angle += 1,
            '>' => {
                if prev_char != '-' {
                    angle = angle.saturating_sub(1);
                }
            }
            _ => {}
        }
        prev_char = c;
        i += c.len_utf8();
    }
    Ok(("", input))
}

/// Balanced region starting at `open`; yields the consumed region and
/// errors when the region never closes.
pub fn balanced_block(input: &str, open: char, close: char) -> SResult<'_, &str> {
    if !input.starts_with(open) {
        return Err(plain_error(input, ErrorKind::Char));
    }
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < input.len() {
        let c = input[i..].chars().next().expect("i is a char boundary");
        match c {
            '"' => {
                i = skip_string_literal(input, i);
                continue;
            }
            '\'' => {
                i = skip_char_literal(input, i);
                continue;
            }
            '/' if input[i..].starts_with("//") => {
                i = match input[i..].find('\n') {
                    Some(offset) => i + offset,
                    None => input.len(),
                };
                continue;
            }
            '/' if input[i..].starts_with("/*") => {
                i = match input[i..].find("*/") {
                    Some(offset) => i + offset + 2,
                    None => input.len(),
                };
                continue;
            }
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    let end = i + c.len_utf8();
                    return Ok((&input[end..], &input[..end]));
                }
            }
            _ => {}
        }
        i += c.len_utf8();
    }
    Err(plain_error(input, ErrorKind::TakeUntil))
}

fn skip_string_literal(input: &str, start: usize) -> usize {
    if input[start..].starts_with("\"\"\"") {
        return match input[start + 3..].find("\"\"\"") {
            Some(offset) => start + 3 + offset + 3,
            None => input.len(),
        };
    }
    let bytes = input.as_bytes();
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    input.len()
}

fn skip_char_literal(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\'' => return i + 1,
            _ => i += 1,
        }
    }
    input.len()
}

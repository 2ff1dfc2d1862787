//! Parser converting textual types from metadata back into [`CodeType`].
//!
//! The grammar is whitespace-insensitive. Comma splitting happens only at
//! the top level of an argument list (nesting is consumed recursively),
//! and a trailing `?` applies to the complete expression to its left.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char as nom_char, multispace0, multispace1, satisfy};
use nom::combinator::{map, opt, recognize};
use nom::multi::{many0, separated_list0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;
use thiserror::Error;

use super::model::CodeType;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("malformed type text {0:?}")]
    Invalid(String),
    #[error("trailing input {rest:?} after type in {input:?}")]
    Trailing { input: String, rest: String },
}

/// Parse a complete type string. The whole input must be consumed.
pub fn parse_type(text: &str) -> Result<CodeType, TypeParseError> {
    match type_expr(text) {
        Ok((rest, ty)) if rest.trim().is_empty() => Ok(ty),
        Ok((rest, _)) => Err(TypeParseError::Trailing {
            input: text.to_string(),
            rest: rest.trim().to_string(),
        }),
        Err(_) => Err(TypeParseError::Invalid(text.to_string())),
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))(input)
}

fn qualified_name(input: &str) -> IResult<&str, &str> {
    recognize(separated_list1(nom_char('.'), identifier))(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(multispace0, nom_char(','), multispace0)(input)
}

fn type_expr(input: &str) -> IResult<&str, CodeType> {
    let (input, _) = multispace0(input)?;
    let (input, base) = alt((function_or_paren, named_type))(input)?;
    // Each trailing '?' wraps the complete expression to its left
    let (input, marks) = many0(preceded(multispace0, nom_char('?')))(input)?;
    let ty = marks
        .into_iter()
        .fold(base, |inner, _| CodeType::Nullable(Box::new(inner)));
    Ok((input, ty))
}

/// `suspend? ( TypeList? )` followed by `-> Type` is a function type;
/// without the arrow a single-element parenthesized list is grouping.
fn function_or_paren(input: &str) -> IResult<&str, CodeType> {
    let (input, suspend) = opt(terminated(tag("suspend"), multispace1))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = nom_char('(')(input)?;
    let (input, params) = separated_list0(comma, type_expr)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = nom_char(')')(input)?;
    let (after_arrow, arrow) = opt(preceded(multispace0, tag("->")))(input)?;
    match arrow {
        Some(_) => {
            let (rest, ret) = type_expr(after_arrow)?;
            Ok((
                rest,
                CodeType::Lambda {
                    params,
                    ret: Box::new(ret),
                    is_suspend: suspend.is_some(),
                },
            ))
        }
        None if suspend.is_none() && params.len() == 1 => {
            Ok((input, params.into_iter().next().expect("single element")))
        }
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        ))),
    }
}

fn named_type(input: &str) -> IResult<&str, CodeType> {
    alt((
        // Star projection inside argument lists
        map(nom_char('*'), |_| CodeType::Simple("*".to_string())),
        plain_or_generic,
    ))(input)
}

fn plain_or_generic(input: &str) -> IResult<&str, CodeType> {
    let (input, name) = qualified_name(input)?;
    let (input, args) = opt(delimited(
        preceded(multispace0, nom_char('<')),
        separated_list1(comma, type_argument),
        preceded(multispace0, nom_char('>')),
    ))(input)?;
    let ty = match args {
        Some(args) => CodeType::Generic {
            name: name.to_string(),
            args,
        },
        None => CodeType::Simple(name.to_string()),
    };
    Ok((input, ty))
}

/// A type argument may carry a variance marker. The marker is folded
/// into the head name so it survives rendering verbatim.
fn type_argument(input: &str) -> IResult<&str, CodeType> {
    let (input, variance) = opt(terminated(
        alt((tag("out"), tag("in"))),
        multispace1,
    ))(input)?;
    let (input, ty) = type_expr(input)?;
    let ty = match (variance, ty) {
        (Some(kw), CodeType::Simple(name)) => CodeType::Simple(format!("{} {}", kw, name)),
        (Some(kw), CodeType::Generic { name, args }) => CodeType::Generic {
            name: format!("{} {}", kw, name),
            args,
        },
        (_, ty) => ty,
    };
    Ok((input, ty))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(text: &str) {
        let first = parse_type(text).unwrap_or_else(|e| panic!("parse {:?}: {}", text, e));
        let rendered = first.render();
        let second = parse_type(&rendered)
            .unwrap_or_else(|e| panic!("re-parse {:?}: {}", rendered, e));
        assert_eq!(first, second, "round trip diverged for {:?}", text);
    }

    #[test]
    fn simple_and_qualified() {
        assert_eq!(parse_type("String").unwrap(), CodeType::simple("String"));
        assert_eq!(
            parse_type("kotlin.collections.List").unwrap(),
            CodeType::simple("kotlin.collections.List")
        );
    }

    #[test]
    fn generics_split_only_at_top_level() {
        let ty = parse_type("Map<String, List<Int>>").unwrap();
        assert_eq!(
            ty,
            CodeType::generic(
                "Map",
                vec![
                    CodeType::simple("String"),
                    CodeType::generic("List", vec![CodeType::simple("Int")]),
                ]
            )
        );
    }

    #[test]
    fn nullability_applies_to_outermost() {
        let ty = parse_type("Map<String, Int>?").unwrap();
        assert!(ty.is_nullable());
        let inner_nullable = parse_type("List<Int?>").unwrap();
        assert_eq!(
            inner_nullable,
            CodeType::generic("List", vec![CodeType::simple("Int").nullable()])
        );
    }

    #[test]
    fn function_types() {
        let ty = parse_type("(String, Int) -> Boolean").unwrap();
        assert_eq!(
            ty,
            CodeType::lambda(
                vec![CodeType::simple("String"), CodeType::simple("Int")],
                CodeType::simple("Boolean"),
                false,
            )
        );
        let suspend = parse_type("suspend (String) -> Result<String>").unwrap();
        match suspend {
            CodeType::Lambda { is_suspend, .. } => assert!(is_suspend),
            other => panic!("expected lambda, got {:?}", other),
        }
    }

    #[test]
    fn nullable_function_type_needs_parens() {
        let ty = parse_type("((String) -> Int)?").unwrap();
        assert!(ty.is_nullable());
        assert_eq!(ty.render(), "((String) -> Int)?");
    }

    #[test]
    fn arrow_binds_return_nullability_inward() {
        let ty = parse_type("(A) -> B?").unwrap();
        match ty {
            CodeType::Lambda { ret, .. } => assert!(ret.is_nullable()),
            other => panic!("expected lambda, got {:?}", other),
        }
    }

    #[test]
    fn star_and_variance_projections() {
        round_trip("List<*>");
        let ty = parse_type("Box<out T>").unwrap();
        assert_eq!(
            ty,
            CodeType::generic("Box", vec![CodeType::simple("out T")])
        );
    }

    #[test]
    fn render_parse_round_trips() {
        for text in [
            "String",
            "kotlin.String?",
            "Map<String, Int>",
            "Map<String , List<Int>> ?",
            "() -> Unit",
            "(A, B) -> C?",
            "suspend (String) -> Result<String>",
            "((A) -> B)?",
            "Map<String, (Int) -> Unit>",
            "List<List<Int>>",
            "T??",
        ] {
            round_trip(text);
        }
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(matches!(
            parse_type("List<Int> whatever"),
            Err(TypeParseError::Trailing { .. })
        ));
        assert!(parse_type("List<").is_err());
    }
}

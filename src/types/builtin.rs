//! Built-in primitive argument types
//!
//! Handles the `builtin` namespace:
//!
//! | Key | Parameters |
//! |-----|------------|
//! | `builtin:bool` | none |
//! | `builtin:string` | `single_word`, `quotable_phrase` or `greedy_phrase` |
//! | `builtin:integer` | `[min [max]]` as `i32` |
//! | `builtin:long` | `[min [max]]` as `i64` |
//! | `builtin:float` | `[min [max]]` as `f32` |
//! | `builtin:double` | `[min [max]]` as `f64` |
//!
//! Numeric parameters are only consumed while the next token is a string
//! token. The words `min` and `max` stand for the numeric type's extremes.
//! `NaN` is rejected as a bound so that resolved types compare equal to
//! themselves.

use std::error::Error as StdError;

use super::argument::{ArgumentType, BoundValue, Bounds, StringKind, BUILTIN_NAMESPACE};
use super::registry::ArgumentTypeParser;
use crate::parser::error::{ErrorKind, ParseError};
use crate::parser::lexer::TokenStream;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinArgumentTypeParser;

impl ArgumentTypeParser for BuiltinArgumentTypeParser {
    fn can_parse(&self, namespace: &str, name: &str) -> bool {
        namespace == BUILTIN_NAMESPACE
            && matches!(
                name,
                "bool" | "string" | "integer" | "long" | "float" | "double"
            )
    }

    fn parse(
        &self,
        _namespace: &str,
        name: &str,
        tokens: &mut dyn TokenStream,
    ) -> Result<ArgumentType, ParseError> {
        match name {
            "bool" => Ok(ArgumentType::Bool),
            "string" => Ok(ArgumentType::String {
                kind: parse_string_kind(tokens)?,
            }),
            "integer" => Ok(ArgumentType::Integer {
                bounds: parse_bounds(tokens)?,
            }),
            "long" => Ok(ArgumentType::Long {
                bounds: parse_bounds(tokens)?,
            }),
            "float" => Ok(ArgumentType::Float {
                bounds: parse_bounds(tokens)?,
            }),
            "double" => Ok(ArgumentType::Double {
                bounds: parse_bounds(tokens)?,
            }),
            other => Err(tokens.error(
                ErrorKind::UnknownType,
                format!(
                    "Unable to parse argument type: {}:{}",
                    BUILTIN_NAMESPACE, other
                ),
            )),
        }
    }
}

fn parse_string_kind(tokens: &mut dyn TokenStream) -> Result<StringKind, ParseError> {
    let selector = tokens.expect_string(ErrorKind::InvalidParameter, "string type")?;
    StringKind::from_selector(&selector).ok_or_else(|| {
        tokens.error(
            ErrorKind::InvalidParameter,
            format!("Unknown string type: {}", selector),
        )
    })
}

fn parse_bounds<T>(tokens: &mut dyn TokenStream) -> Result<Bounds<T>, ParseError>
where
    T: BoundValue,
    T::Err: StdError + Send + Sync + 'static,
{
    if !tokens.peek_is_string()? {
        return Ok(Bounds::unbounded());
    }
    let min = parse_number::<T>(tokens)?;

    if !tokens.peek_is_string()? {
        return Ok(Bounds::at_least(min));
    }
    let max = parse_number::<T>(tokens)?;

    Ok(Bounds::new(min, max))
}

fn parse_number<T>(tokens: &mut dyn TokenStream) -> Result<T, ParseError>
where
    T: BoundValue,
    T::Err: StdError + Send + Sync + 'static,
{
    let value = tokens.expect_string(ErrorKind::InvalidParameter, T::LABEL)?;
    match value.as_str() {
        "min" => Ok(T::MIN),
        "max" => Ok(T::MAX),
        text => match text.parse::<T>() {
            Ok(value) if value.is_comparable() => Ok(value),
            Ok(_) => Err(tokens.error(
                ErrorKind::InvalidParameter,
                format!("Expected {} but got {}", T::LABEL, text),
            )),
            Err(e) => Err(ParseError::with_cause(
                ErrorKind::InvalidParameter,
                format!("Expected {} but got {}", T::LABEL, text),
                tokens.line(),
                e,
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::{Lexer, Token};

    fn resolve(name: &str, params: &str) -> Result<ArgumentType, ParseError> {
        let mut tokens = Lexer::from_source(params);
        BuiltinArgumentTypeParser.parse(BUILTIN_NAMESPACE, name, &mut tokens)
    }

    #[test]
    fn test_can_parse() {
        let parser = BuiltinArgumentTypeParser;
        assert!(parser.can_parse("builtin", "bool"));
        assert!(parser.can_parse("builtin", "double"));
        assert!(!parser.can_parse("builtin", "vec3"));
        assert!(!parser.can_parse("brigadier", "bool"));
    }

    #[test]
    fn test_bool_consumes_nothing() {
        let mut tokens = Lexer::from_source("extra;");
        let ty = BuiltinArgumentTypeParser
            .parse("builtin", "bool", &mut tokens)
            .unwrap();
        assert_eq!(ty, ArgumentType::Bool);
        assert_eq!(tokens.peek().unwrap(), &Token::String("extra".into()));
    }

    #[test]
    fn test_integer_stops_at_structural_token() {
        let mut tokens = Lexer::from_source("3 { a; }");
        let ty = BuiltinArgumentTypeParser
            .parse("builtin", "integer", &mut tokens)
            .unwrap();
        assert_eq!(
            ty,
            ArgumentType::Integer {
                bounds: Bounds::at_least(3)
            }
        );
        assert_eq!(tokens.peek().unwrap(), &Token::OpenBlock);
    }

    #[test]
    fn test_sentinels_are_type_extremes() {
        assert_eq!(
            resolve("long", "min max;").unwrap(),
            ArgumentType::Long {
                bounds: Bounds::new(i64::MIN, i64::MAX)
            }
        );
        assert_eq!(
            resolve("float", "min 0;").unwrap(),
            ArgumentType::Float {
                bounds: Bounds::new(f32::MIN, 0.0)
            }
        );
    }

    #[test]
    fn test_malformed_number_keeps_cause() {
        let err = resolve("double", "1.0 abc;").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.message(), "Expected double but got abc");
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_nan_bounds_are_rejected() {
        let cases = [("double", "NaN;", "double"), ("float", "0 NaN;", "float")];
        for (name, params, label) in cases {
            let err = resolve(name, params).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
            assert_eq!(err.message(), format!("Expected {} but got NaN", label));
        }

        let ty = resolve("double", "-inf inf;").unwrap();
        assert_eq!(ty, resolve("double", "-inf inf;").unwrap());
    }

    #[test]
    fn test_integer_overflow_is_rejected() {
        let err = resolve("integer", "2147483648;").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_unknown_string_selector() {
        let err = resolve("string", "paragraph;").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.message(), "Unknown string type: paragraph");
    }

    #[test]
    fn test_missing_string_selector() {
        let err = resolve("string", ";").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(
            err.message(),
            "Expected string token for string type but got ';'"
        );
    }
}

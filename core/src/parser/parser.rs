use crate::parser::error::{ParseError, ParseErrorKind, convert_pest_error};
use crate::parser::{
    BinaryOp, BoolOp, ComparisonOp, Expr, ExprKind, Literal, ShiftOp, Span, UnaryOp,
};
use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;

/// Deepest parenthesis nesting accepted before parsing starts.
pub const DEFAULT_MAX_DEPTH: usize = 256;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::or, Assoc::Left))            // `|`
        .op(Op::infix(Rule::and, Assoc::Left))           // `&`
        .op(
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::ne, Assoc::Left)
        )                                               // `=`, `!=`
        .op(
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left) |
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left)
        )                                               // `>`, `>=`, `<`, `<=`
        .op(
            Op::infix(Rule::shl, Assoc::Left) |
            Op::infix(Rule::shr, Assoc::Left)
        )                                               // `<<`, `>>`
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                               // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left)
        )                                               // `*`, `/`
        .op(Op::prefix(Rule::neg))                       // `-`
        .op(Op::infix(Rule::pow, Assoc::Right))          // `^` (right-assoc)
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/expression.pest"]
pub struct ExpressionParser;

type PestError = pest::error::Error<Rule>;

fn custom_error(message: String, span: pest::Span<'_>) -> PestError {
    pest::error::Error::new_from_span(pest::error::ErrorVariant::CustomError { message }, span)
}

fn missing(pair: &Pair<Rule>) -> PestError {
    custom_error("missing expected pair in rule".to_string(), pair.as_span())
}

pub fn parse_expr(pair: Pair<Rule>) -> Result<Expr, PestError> {
    let span = Span::from(pair.as_span());
    match pair.as_rule() {
        Rule::main => {
            let inner = pair.clone().into_inner().next().ok_or_else(|| missing(&pair))?;
            parse_expr(inner)
        }

        Rule::expression => PRATT_PARSER
            .map_primary(parse_expr)
            .map_prefix(|op, rhs| {
                let rhs = rhs?;
                let op_span = Span::from(op.as_span());
                let op = match op.as_rule() {
                    Rule::neg => UnaryOp::Neg,
                    rule => {
                        return Err(custom_error(
                            format!("unknown prefix operator: {:?}", rule),
                            op.as_span(),
                        ));
                    }
                };
                let span = Span::combine(&op_span, &rhs.span);
                Ok(Expr::new(
                    ExprKind::Unary {
                        op,
                        expr: Box::new(rhs),
                    },
                    span,
                ))
            })
            .map_infix(|lhs, op, rhs| {
                let (left, right) = (Box::new(lhs?), Box::new(rhs?));
                let span = Span::combine(&left.span, &right.span);
                let kind = match op.as_rule() {
                    Rule::add => ExprKind::Binary { op: BinaryOp::Add, left, right },
                    Rule::sub => ExprKind::Binary { op: BinaryOp::Sub, left, right },
                    Rule::mul => ExprKind::Binary { op: BinaryOp::Mul, left, right },
                    Rule::div => ExprKind::Binary { op: BinaryOp::Div, left, right },
                    Rule::pow => ExprKind::Binary { op: BinaryOp::Pow, left, right },
                    Rule::and => ExprKind::Boolean { op: BoolOp::And, left, right },
                    Rule::or => ExprKind::Boolean { op: BoolOp::Or, left, right },
                    Rule::shl => ExprKind::Shift { op: ShiftOp::Left, left, right },
                    Rule::shr => ExprKind::Shift { op: ShiftOp::Right, left, right },
                    Rule::eq => ExprKind::Comparison { op: ComparisonOp::Eq, left, right },
                    Rule::ne => ExprKind::Comparison { op: ComparisonOp::Ne, left, right },
                    Rule::gt => ExprKind::Comparison { op: ComparisonOp::Gt, left, right },
                    Rule::ge => ExprKind::Comparison { op: ComparisonOp::Ge, left, right },
                    Rule::lt => ExprKind::Comparison { op: ComparisonOp::Lt, left, right },
                    Rule::le => ExprKind::Comparison { op: ComparisonOp::Le, left, right },
                    rule => {
                        return Err(custom_error(
                            format!("unknown binary operator: {:?}", rule),
                            op.as_span(),
                        ));
                    }
                };
                Ok(Expr::new(kind, span))
            })
            .parse(pair.into_inner()),

        Rule::call => {
            let mut inner = pair.clone().into_inner();
            let name = inner.next().ok_or_else(|| missing(&pair))?.as_str().to_string();
            let args = inner.map(parse_expr).collect::<Result<_, _>>()?;
            Ok(Expr::new(ExprKind::Call { name, args }, span))
        }

        Rule::integer => {
            let text = pair.as_str().replace('_', "");
            let parsed = match text.get(..2) {
                Some("0x") | Some("0X") => i64::from_str_radix(&text[2..], 16),
                _ => text.parse(),
            };
            let value = parsed.map_err(|_| {
                custom_error(
                    format!("{}{}", INVALID_NUMBER, pair.as_str()),
                    pair.as_span(),
                )
            })?;
            Ok(Expr::new(ExprKind::Literal(Literal::Int(value)), span))
        }

        Rule::float => {
            let value = pair.as_str().replace('_', "").parse().map_err(|_| {
                custom_error(
                    format!("{}{}", INVALID_NUMBER, pair.as_str()),
                    pair.as_span(),
                )
            })?;
            Ok(Expr::new(ExprKind::Literal(Literal::Float(value)), span))
        }

        Rule::boolean => {
            let value = pair.as_str() == "true";
            Ok(Expr::new(ExprKind::Literal(Literal::Bool(value)), span))
        }

        Rule::grouped => {
            let inner = pair.clone().into_inner().next().ok_or_else(|| missing(&pair))?;
            parse_expr(inner)
        }

        Rule::ident => Ok(Expr::new(ExprKind::Ident(pair.as_str().to_string()), span)),

        rule => Err(custom_error(
            format!("Unhandled rule: {:?}", rule),
            pair.as_span(),
        )),
    }
}

/// Prefix of the custom pest message used for malformed numbers.
pub(crate) const INVALID_NUMBER: &str = "invalid number literal: ";

/// Parse an expression (with literals already extracted).
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Expr, ParseError> {
    check_depth(source, max_depth)?;
    let mut pairs =
        ExpressionParser::parse(Rule::main, source).map_err(|e| convert_pest_error(e, source))?;
    let pair = pairs.next().ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::Other {
                message: "empty parse result".to_string(),
            },
            source.to_string(),
            Span::new(0, source.len()),
        )
    })?;
    parse_expr(pair).map_err(|e| convert_pest_error(e, source))
}

/// Reject pathological nesting before pest recurses into it.
fn check_depth(source: &str, max_depth: usize) -> Result<(), ParseError> {
    let mut depth = 0usize;
    for (pos, c) in source.char_indices() {
        match c {
            '(' => {
                depth += 1;
                if depth > max_depth {
                    return Err(ParseError::new(
                        ParseErrorKind::MaxDepthExceeded { depth, max_depth },
                        source.to_string(),
                        Span::new(pos, pos + 1),
                    ));
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lit(value: i64) -> Box<Expr> {
        Box::new(Expr::new(ExprKind::Literal(Literal::Int(value)), Span::default()))
    }

    fn ident(name: &str) -> Box<Expr> {
        Box::new(Expr::new(ExprKind::Ident(name.to_string()), Span::default()))
    }

    #[test]
    fn test_simple_binary_expr() {
        let parsed = parse("1 + 2").unwrap();
        assert_eq!(
            parsed.kind,
            ExprKind::Binary {
                op: BinaryOp::Add,
                left: lit(1),
                right: lit(2),
            }
        );
        assert_eq!(parsed.span, Span::new(0, 5));
    }

    #[test]
    fn test_call_expr() {
        let parsed = parse("log(2, x)").unwrap();
        assert_eq!(
            parsed.kind,
            ExprKind::Call {
                name: "log".to_string(),
                args: vec![*lit(2), *ident("x")],
            }
        );
    }

    #[test]
    fn test_zero_argument_call() {
        let parsed = parse("now()").unwrap();
        assert_eq!(
            parsed.kind,
            ExprKind::Call {
                name: "now".to_string(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_unary_span() {
        let parsed = parse("  -x").unwrap();
        assert_eq!(parsed.span, Span::new(2, 4));
        assert_eq!(
            parsed.kind,
            ExprKind::Unary {
                op: UnaryOp::Neg,
                expr: ident("x"),
            }
        );
    }

    #[test]
    fn test_number_literals() {
        let cases = [
            ("42", Literal::Int(42)),
            ("1_000", Literal::Int(1000)),
            ("0xff", Literal::Int(255)),
            ("1.5", Literal::Float(1.5)),
            ("2.", Literal::Float(2.0)),
            (".25", Literal::Float(0.25)),
            ("1e3", Literal::Float(1000.0)),
            ("true", Literal::Bool(true)),
        ];
        for (source, expected) in cases {
            assert_eq!(parse(source).unwrap().kind, ExprKind::Literal(expected), "{}", source);
        }
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let err = parse("99999999999999999999").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::InvalidNumber { .. }));
    }

    #[test]
    fn test_identifier_starting_with_keyword() {
        assert_eq!(parse("trueish").unwrap().kind, ExprKind::Ident("trueish".to_string()));
        assert_eq!(parse("false_").unwrap().kind, ExprKind::Ident("false_".to_string()));
    }

    #[test]
    fn test_max_depth() {
        let source = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert!(parse_with_max_depth(&source, 10).is_ok());
        let err = parse_with_max_depth(&source, 9).unwrap_err();
        assert!(matches!(
            err.kind,
            ParseErrorKind::MaxDepthExceeded { max_depth: 9, .. }
        ));
    }

    #[test]
    fn test_trailing_garbage() {
        assert!(parse("1 +").is_err());
        assert!(parse("1 2").is_err());
        assert!(parse("").is_err());
    }
}

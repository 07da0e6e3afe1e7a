// tests/parser_tests.rs

use sieve_lang::ast::{CompareOp, Expr, LogicalOp};
use sieve_lang::lexer::{Position, tokenize};
use sieve_lang::parser::{MAX_DEPTH, ParseError, parse};

fn parse_str(input: &str) -> Result<Expr, ParseError> {
    parse(tokenize(input).expect("lexes"))
}

fn canonical(input: &str) -> String {
    parse_str(input).unwrap().to_string()
}

fn field(key: &str) -> Box<Expr> {
    Box::new(Expr::Field(key.to_string()))
}

// ============================================================================
// Simple tests
// ============================================================================

#[test]
fn test_comparison() {
    let expr = parse_str("user.balance >= 500").unwrap();

    assert_eq!(
        expr,
        Expr::Compare {
            op: CompareOp::GreaterEqual,
            left: field("balance"),
            right: Box::new(Expr::Integer(500)),
        }
    );
}

#[test]
fn test_all_comparison_operators() {
    let cases = [
        ("==", CompareOp::Equal),
        ("!=", CompareOp::NotEqual),
        ("<", CompareOp::LessThan),
        ("<=", CompareOp::LessEqual),
        (">", CompareOp::GreaterThan),
        (">=", CompareOp::GreaterEqual),
    ];

    for (symbol, expected) in cases {
        let expr = parse_str(&format!("user.age {} 1", symbol)).unwrap();
        assert!(
            matches!(expr, Expr::Compare { op, .. } if op == expected),
            "Failed for operator: {}",
            symbol
        );
    }
}

#[test]
fn test_literals() {
    assert_eq!(parse_str("true").unwrap(), Expr::Boolean(true));
    assert_eq!(parse_str("42").unwrap(), Expr::Integer(42));
    assert_eq!(parse_str("2.5").unwrap(), Expr::Float(2.5));
    assert_eq!(
        parse_str(r#""yf2""#).unwrap(),
        Expr::String("yf2".to_string())
    );
}

#[test]
fn test_float_canonical_form_has_no_exponent() {
    for (input, expected) in [
        ("user.a < 100000000000000000000.0", "(user.a < 100000000000000000000.0)"),
        ("user.a < 0.00000001", "(user.a < 0.00000001)"),
        ("user.a < 500.0", "(user.a < 500.0)"),
    ] {
        let printed = canonical(input);
        assert_eq!(printed, expected);
        assert_eq!(parse_str(&printed).unwrap(), parse_str(input).unwrap());
    }
}

#[test]
fn test_literal_on_left() {
    assert_eq!(canonical("30 >= user.age"), "(30 >= user.age)");
    assert_eq!(canonical(r#""a" == "b""#), r#"("a" == "b")"#);
}

#[test]
fn test_field_path_is_flattened() {
    assert_eq!(parse_str("user.age").unwrap(), Expr::Field("age".to_string()));
    assert_eq!(
        parse_str("user.address.city").unwrap(),
        Expr::Field("address.city".to_string())
    );
}

// ============================================================================
// Precedence and associativity
// ============================================================================

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(
        canonical("user.a || user.b && user.c"),
        "(user.a || (user.b && user.c))"
    );
    assert_eq!(
        canonical("user.a && user.b || user.c"),
        "((user.a && user.b) || user.c)"
    );
}

#[test]
fn test_left_associative() {
    assert_eq!(
        canonical("user.a && user.b && user.c"),
        "((user.a && user.b) && user.c)"
    );
    assert_eq!(
        canonical("user.a || user.b || user.c"),
        "((user.a || user.b) || user.c)"
    );
}

#[test]
fn test_comparison_binds_tighter_than_logical() {
    assert_eq!(
        canonical(r#"user.balance >= 500 && user.gender == "female" && user.age <= 30"#),
        r#"(((user.balance >= 500) && (user.gender == "female")) && (user.age <= 30))"#
    );
}

#[test]
fn test_not_applies_to_whole_comparison() {
    // `!` sits above comparison in the grammar, so `!a == b` is `!(a == b)`.
    let expr = parse_str("!user.active == true").unwrap();
    assert_eq!(
        expr,
        Expr::Not(Box::new(Expr::Compare {
            op: CompareOp::Equal,
            left: field("active"),
            right: Box::new(Expr::Boolean(true)),
        }))
    );
}

#[test]
fn test_not_binds_tighter_than_and() {
    assert_eq!(canonical("!user.a && user.b"), "(!user.a && user.b)");
    assert_eq!(canonical("!!user.a"), "!!user.a");
}

#[test]
fn test_parentheses_override_precedence() {
    let expr = parse_str("(user.a || user.b) && user.c").unwrap();
    match expr {
        Expr::Logical {
            op: LogicalOp::And,
            left,
            right,
        } => {
            assert!(matches!(*left, Expr::Logical { op: LogicalOp::Or, .. }));
            assert_eq!(right, field("c"));
        }
        _ => panic!("Expected && at the root"),
    }
}

#[test]
fn test_parentheses_are_transparent() {
    assert_eq!(parse_str("((user.a))").unwrap(), parse_str("user.a").unwrap());
    assert_eq!(
        parse_str("(user.age) < (3)").unwrap(),
        parse_str("user.age < 3").unwrap()
    );
    assert_eq!(canonical("!(user.a)"), "!user.a");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_bare_user_rejected() {
    assert_eq!(
        parse_str("user"),
        Err(ParseError::InvalidFieldPath {
            path: "user".to_string(),
            position: Position::new(0),
        })
    );
}

#[test]
fn test_invalid_field_paths() {
    for input in ["user.", "user..age", "account.age", "age", "users.age", "null", "user.age.", "x == 1"] {
        assert!(
            matches!(parse_str(input), Err(ParseError::InvalidFieldPath { .. })),
            "Expected invalid path for input: {}",
            input
        );
    }
}

#[test]
fn test_chained_comparison_rejected() {
    assert_eq!(
        parse_str("1 < user.age < 3"),
        Err(ParseError::ChainedComparison {
            position: Position::new(13),
        })
    );
    assert!(matches!(
        parse_str("user.a == user.b == true"),
        Err(ParseError::ChainedComparison { .. })
    ));
    // Grouping makes it a single comparison per level.
    assert!(parse_str("(user.a == user.b) == true").is_ok());
}

#[test]
fn test_unclosed_paren() {
    assert_eq!(
        parse_str("(user.a && (user.b)"),
        Err(ParseError::UnclosedParen {
            opened_at: Position::new(0),
        })
    );
}

#[test]
fn test_unmatched_paren() {
    assert_eq!(
        parse_str("user.a)"),
        Err(ParseError::UnmatchedParen {
            position: Position::new(6),
        })
    );
}

#[test]
fn test_trailing_input() {
    assert!(matches!(
        parse_str("user.a user.b"),
        Err(ParseError::TrailingInput { .. })
    ));
    assert!(matches!(
        parse_str("true false"),
        Err(ParseError::TrailingInput { .. })
    ));
}

#[test]
fn test_unexpected_tokens() {
    for input in ["", "&&", "user.a &&", "user.a ==", "()", "(user.a true)", "user.a == !true", "!"] {
        assert!(
            matches!(parse_str(input), Err(ParseError::UnexpectedToken { .. })),
            "Expected unexpected-token error for input: {:?}",
            input
        );
    }
}

#[test]
fn test_error_message() {
    let err = parse_str("user.age >").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Expected a literal, a field or '(', got end of input at position 10"
    );
}

#[test]
fn test_depth_limit() {
    let ok = format!("{}true{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1));
    assert!(parse_str(&ok).is_ok());

    let nots = format!("{}true", "!".repeat(MAX_DEPTH + 1));
    assert_eq!(parse_str(&nots), Err(ParseError::TooDeep { max: MAX_DEPTH }));

    let nested = format!("{}true{}", "(".repeat(1000), ")".repeat(1000));
    assert_eq!(parse_str(&nested), Err(ParseError::TooDeep { max: MAX_DEPTH }));
}

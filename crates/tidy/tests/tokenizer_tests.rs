use pretty_assertions::assert_eq;
use tidy::{SchemeError, Token, Tokenizer};

fn tokens(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(input).expect("tokenizer failed");
    let mut out = Vec::new();
    while !tokenizer.is_end() {
        out.push(tokenizer.next().expect("next failed"));
    }
    out
}

fn sym(name: &str) -> Token {
    Token::Symbol(name.to_string())
}

// ═══════════════════════════════════════════════════════════════════════
// Token Shapes
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_empty_input() {
    let tokenizer = Tokenizer::new("").unwrap();
    assert!(tokenizer.is_end());

    let tokenizer = Tokenizer::new("   \n\t  ").unwrap();
    assert!(tokenizer.is_end());
}

#[test]
fn test_brackets_and_constants() {
    assert_eq!(
        tokens("(+ 1 2)"),
        vec![
            Token::Open,
            sym("+"),
            Token::Constant(1),
            Token::Constant(2),
            Token::Close,
        ]
    );
}

#[test]
fn test_signed_constants() {
    assert_eq!(tokens("+4"), vec![Token::Constant(4)]);
    assert_eq!(tokens("-2"), vec![Token::Constant(-2)]);
    assert_eq!(tokens("-2 - 2"), vec![Token::Constant(-2), sym("-"), Token::Constant(2)]);
}

#[test]
fn test_full_signed_range() {
    assert_eq!(
        tokens("-9223372036854775808"),
        vec![Token::Constant(i64::MIN)]
    );
    assert_eq!(
        tokens("9223372036854775807"),
        vec![Token::Constant(i64::MAX)]
    );
}

#[test]
fn test_bare_signs_are_symbols() {
    assert_eq!(tokens("+ -"), vec![sym("+"), sym("-")]);
}

#[test]
fn test_boolean_literals() {
    assert_eq!(tokens("#t #f"), vec![Token::Bool(true), Token::Bool(false)]);
}

#[test]
fn test_symbols_with_suffix_characters() {
    assert_eq!(
        tokens("null? set-car! list-tail <="),
        vec![sym("null?"), sym("set-car!"), sym("list-tail"), sym("<=")]
    );
}

#[test]
fn test_quote_and_dot() {
    assert_eq!(
        tokens("'(1 . 2)"),
        vec![
            Token::Quote,
            Token::Open,
            Token::Constant(1),
            Token::Dot,
            Token::Constant(2),
            Token::Close,
        ]
    );
}

#[test]
fn test_no_whitespace_needed_around_brackets() {
    assert_eq!(
        tokens("(car(cdr x))"),
        vec![
            Token::Open,
            sym("car"),
            Token::Open,
            sym("cdr"),
            sym("x"),
            Token::Close,
            Token::Close,
        ]
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Error Conditions
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_unexpected_character() {
    assert!(matches!(
        Tokenizer::new("~"),
        Err(SchemeError::Syntax(_))
    ));
}

#[test]
fn test_number_overflow_is_syntax_error() {
    assert!(matches!(
        Tokenizer::new("99999999999999999999"),
        Err(SchemeError::Syntax(_))
    ));
}

#[test]
fn test_reading_past_end_is_syntax_error() {
    let mut tokenizer = Tokenizer::new("1").unwrap();
    tokenizer.next().unwrap();
    assert!(matches!(tokenizer.next(), Err(SchemeError::Syntax(_))));
}

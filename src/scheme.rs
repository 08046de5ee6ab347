//! S-expression parsing and special-form compilation.
//!
//! Parsing happens in two stages. A nom-based reader first turns source
//! text into plain data ([`Value`] atoms and lists), then a compile pass
//! turns each datum into an [`Expr`]: special forms (`quote`, `if`,
//! `lambda`, `let`, `set!`, `define`) are recognized by their head symbol
//! and checked for shape, primitive names are resolved against the builtin
//! table, and everything else becomes a variable reference or an
//! application.
//!
//! [`parse_program`] accepts a whitespace-separated sequence of top-level
//! forms and is the only entry point where `define` is legal.
//! [`parse_expression`] parses exactly one expression and rejects trailing
//! input.
//!
//! Primitive names are resolved here, at compile time, so a primitive can
//! not be shadowed by a local binding of the same name. Special-form
//! keywords are likewise not ordinary names.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{opt, recognize, value},
    error::ErrorKind,
    multi::separated_list0,
    sequence::pair,
};

use crate::ast::{Binding, Expr, NumberType, SYMBOL_SPECIAL_CHARS, is_valid_symbol};
use crate::primitives::find_primitive;
use crate::value::Value;
use crate::{Error, MAX_PARSE_DEPTH, ParseError, ParseErrorKind};

/// Convert nom parsing errors to a structured ParseError
fn nom_error_to_parse_error(input: &str, error: nom::Err<nom::error::Error<&str>>) -> ParseError {
    match error {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let position = input.len().saturating_sub(e.input.len());
            if e.code == ErrorKind::TooLarge {
                ParseError::from_message(
                    ParseErrorKind::TooDeeplyNested,
                    format!("Expression too deeply nested (max depth: {MAX_PARSE_DEPTH})"),
                )
            } else if e.input.is_empty() {
                ParseError::from_message(ParseErrorKind::Incomplete, "Unexpected end of input")
            } else {
                ParseError::with_context(
                    ParseErrorKind::InvalidSyntax,
                    "Invalid syntax",
                    input,
                    position,
                )
            }
        }
        nom::Err::Incomplete(_) => {
            ParseError::from_message(ParseErrorKind::Incomplete, "Incomplete input")
        }
    }
}

fn malformed(message: impl Into<String>) -> Error {
    Error::ParseError(ParseError::from_message(
        ParseErrorKind::MalformedSpecialForm,
        message,
    ))
}

//
// Stage one: text to datum
//

/// Parse a number (integer only, supports decimal and hexadecimal)
fn parse_number(input: &str) -> IResult<&str, Value> {
    alt((parse_hexadecimal, parse_decimal)).parse(input)
}

fn parse_decimal(input: &str) -> IResult<&str, Value> {
    let (input, number_str) = recognize(pair(
        opt(char('-')),
        take_while1(|c: char| c.is_ascii_digit()),
    ))
    .parse(input)?;

    match number_str.parse::<NumberType>() {
        Ok(n) => Ok((input, Value::Number(n))),
        // Overflowing literals fail here; symbol parsing rejects a digit
        // prefix too, so the whole datum is a parse error
        Err(_) => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

/// Parse a hexadecimal number (#x or #X prefix)
fn parse_hexadecimal(input: &str) -> IResult<&str, Value> {
    let (input, _) = char('#').parse(input)?;
    let (input, _) = alt((char('x'), char('X'))).parse(input)?;
    let (input, hex_digits) = take_while1(|c: char| c.is_ascii_hexdigit()).parse(input)?;

    match NumberType::from_str_radix(hex_digits, 16) {
        Ok(n) => Ok((input, Value::Number(n))),
        Err(_) => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::HexDigit,
        ))),
    }
}

/// Parse a boolean (#t or #f, case sensitive)
fn parse_bool(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Bool(true), tag("#t")),
        value(Value::Bool(false), tag("#f")),
    ))
    .parse(input)
}

/// Parse a symbol (identifier)
fn parse_symbol(input: &str) -> IResult<&str, Value> {
    let mut symbol_chars =
        take_while1(|c: char| c.is_alphanumeric() || SYMBOL_SPECIAL_CHARS.contains(c));

    let (remaining, candidate) = symbol_chars.parse(input)?;

    if is_valid_symbol(candidate) {
        Ok((remaining, Value::Symbol(candidate.into())))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Alpha,
        )))
    }
}

/// Parse a string literal with escape sequences
fn parse_string(input: &str) -> IResult<&str, Value> {
    let (mut remaining, _) = char('"').parse(input)?;
    let mut chars = Vec::new();

    loop {
        let mut char_iter = remaining.chars();
        match char_iter.next() {
            Some('"') => {
                return Ok((
                    char_iter.as_str(),
                    Value::String(chars.into_iter().collect()),
                ));
            }
            Some('\\') => {
                match char_iter.next() {
                    Some('n') => chars.push('\n'),
                    Some('t') => chars.push('\t'),
                    Some('r') => chars.push('\r'),
                    Some('\\') => chars.push('\\'),
                    Some('"') => chars.push('"'),
                    // Unknown or dangling escape sequence
                    Some(_) | None => {
                        return Err(nom::Err::Error(nom::error::Error::new(
                            remaining,
                            nom::error::ErrorKind::Char,
                        )));
                    }
                }
                remaining = char_iter.as_str();
            }
            Some(ch) => {
                chars.push(ch);
                remaining = char_iter.as_str();
            }
            // End of input before the closing quote
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    remaining,
                    nom::error::ErrorKind::Char,
                )));
            }
        }
    }
}

fn parse_list(input: &str, depth: usize) -> IResult<&str, Value> {
    let (input, _) = char('(').parse(input)?;
    let (input, _) = multispace0.parse(input)?;

    let (input, elements) =
        separated_list0(multispace1, |input| parse_sexpr(input, depth + 1)).parse(input)?;

    let (input, _) = multispace0.parse(input)?;
    let (input, _) = char(')').parse(input)?;

    Ok((input, Value::List(elements)))
}

/// Parse the quote shorthand: 'expr reads as (quote expr)
fn parse_quote(input: &str, depth: usize) -> IResult<&str, Value> {
    let (input, _) = char('\'').parse(input)?;
    let (input, datum) = parse_sexpr(input, depth + 1)?;
    Ok((
        input,
        Value::List(vec![Value::Symbol("quote".into()), datum]),
    ))
}

/// Parse one S-expression into a plain datum
fn parse_sexpr(input: &str, depth: usize) -> IResult<&str, Value> {
    if depth >= MAX_PARSE_DEPTH {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::TooLarge,
        )));
    }
    let (input, _) = multispace0.parse(input)?;
    alt((
        |input| parse_quote(input, depth),
        |input| parse_list(input, depth),
        parse_number,
        parse_bool,
        parse_string,
        parse_symbol,
    ))
    .parse(input)
}

//
// Stage two: datum to expression
//

/// Compile a top-level form; this is the one place `define` is accepted.
fn compile_form(datum: &Value) -> Result<Expr, Error> {
    if let Value::List(elements) = datum {
        if let [Value::Symbol(head), rest @ ..] = elements.as_slice() {
            if head == "define" {
                return compile_define(rest, datum);
            }
        }
    }
    compile_expr(datum)
}

fn compile_define(rest: &[Value], whole: &Value) -> Result<Expr, Error> {
    match rest {
        [Value::Symbol(name), expr] => Ok(Expr::Define {
            name: name.clone(),
            expr: Box::new(compile_expr(expr)?),
        }),
        [_, _] => Err(malformed("define requires a symbol as its first operand")),
        _ => Err(Error::arity_error_with_expr(2, rest.len(), format!("{whole}"))),
    }
}

/// Compile a datum in expression position
fn compile_expr(datum: &Value) -> Result<Expr, Error> {
    match datum {
        Value::Number(n) => Ok(Expr::Num(*n)),
        Value::Bool(b) => Ok(Expr::Bool(*b)),
        Value::String(s) => Ok(Expr::Str(s.clone())),
        Value::Symbol(name) => match find_primitive(name) {
            Some(op) => Ok(Expr::Prim(op)),
            None => Ok(Expr::VarRef(name.clone())),
        },
        Value::List(elements) => compile_list(elements, datum),
        // The reader never produces procedure or unspecified datums
        other => Err(malformed(format!("Cannot compile datum: {other}"))),
    }
}

fn compile_list(elements: &[Value], whole: &Value) -> Result<Expr, Error> {
    let Some((head, rest)) = elements.split_first() else {
        return Err(Error::ParseError(ParseError::from_message(
            ParseErrorKind::InvalidSyntax,
            "Empty application: () is not evaluable",
        )));
    };

    if let Value::Symbol(name) = head {
        match name.as_str() {
            "quote" => return compile_quote(rest, whole),
            "if" => return compile_if(rest, whole),
            "lambda" => return compile_lambda(rest, whole),
            "let" => return compile_let(rest, whole),
            "set!" => return compile_set(rest, whole),
            "define" => {
                return Err(malformed("define is only allowed at the top level"));
            }
            _ => {}
        }
    }

    let rator = Box::new(compile_expr(head)?);
    let rands = rest.iter().map(compile_expr).collect::<Result<_, _>>()?;
    Ok(Expr::App { rator, rands })
}

fn compile_quote(rest: &[Value], whole: &Value) -> Result<Expr, Error> {
    match rest {
        [datum] => Ok(Expr::Lit(datum.clone())),
        _ => Err(Error::arity_error_with_expr(1, rest.len(), format!("{whole}"))),
    }
}

fn compile_if(rest: &[Value], whole: &Value) -> Result<Expr, Error> {
    match rest {
        [test, then, alt] => Ok(Expr::If {
            test: Box::new(compile_expr(test)?),
            then: Box::new(compile_expr(then)?),
            alt: Box::new(compile_expr(alt)?),
        }),
        _ => Err(Error::arity_error_with_expr(3, rest.len(), format!("{whole}"))),
    }
}

/// Extract and validate lambda/let binding names, rejecting duplicates
fn check_duplicate_names(names: &[String], form: &str) -> Result<(), Error> {
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(malformed(format!("Duplicate name '{name}' in {form}")));
        }
    }
    Ok(())
}

fn compile_lambda(rest: &[Value], whole: &Value) -> Result<Expr, Error> {
    let Some((params_datum, body)) = rest.split_first() else {
        return Err(Error::arity_error_with_expr(1, 0, format!("{whole}")));
    };

    let Value::List(param_datums) = params_datum else {
        return Err(malformed("lambda requires a parameter list"));
    };
    let params = param_datums
        .iter()
        .map(|p| match p {
            Value::Symbol(name) => Ok(name.clone()),
            other => Err(malformed(format!(
                "lambda parameter must be a symbol, got {other}"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    check_duplicate_names(&params, "lambda parameters")?;

    // An empty body parses; applying the procedure reports it
    let body = body.iter().map(compile_expr).collect::<Result<_, _>>()?;
    Ok(Expr::Proc { params, body })
}

fn compile_let(rest: &[Value], whole: &Value) -> Result<Expr, Error> {
    let Some((bindings_datum, body)) = rest.split_first() else {
        return Err(Error::arity_error_with_expr(1, 0, format!("{whole}")));
    };

    let Value::List(binding_datums) = bindings_datum else {
        return Err(malformed("let requires a list of bindings"));
    };
    let bindings = binding_datums
        .iter()
        .map(|b| match b {
            Value::List(pair) => match pair.as_slice() {
                [Value::Symbol(name), expr] => Ok(Binding {
                    name: name.clone(),
                    expr: compile_expr(expr)?,
                }),
                _ => Err(malformed(format!("Malformed let binding: {b}"))),
            },
            other => Err(malformed(format!("Malformed let binding: {other}"))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let names: Vec<String> = bindings.iter().map(|b| b.name.clone()).collect();
    check_duplicate_names(&names, "let bindings")?;

    let body = body.iter().map(compile_expr).collect::<Result<_, _>>()?;
    Ok(Expr::Let { bindings, body })
}

fn compile_set(rest: &[Value], whole: &Value) -> Result<Expr, Error> {
    match rest {
        [Value::Symbol(name), expr] => Ok(Expr::Set {
            name: name.clone(),
            expr: Box::new(compile_expr(expr)?),
        }),
        [_, _] => Err(malformed("set! requires a symbol as its first operand")),
        _ => Err(Error::arity_error_with_expr(2, rest.len(), format!("{whole}"))),
    }
}

//
// Entry points
//

/// Parse a program: one or more whitespace-separated top-level forms.
pub fn parse_program(input: &str) -> Result<Vec<Expr>, Error> {
    let mut forms = Vec::new();
    let mut rest = input.trim_start();

    if rest.is_empty() {
        return Err(Error::ParseError(ParseError::from_message(
            ParseErrorKind::Incomplete,
            "Empty program",
        )));
    }

    while !rest.is_empty() {
        let (remaining, datum) =
            parse_sexpr(rest, 0).map_err(|e| Error::ParseError(nom_error_to_parse_error(input, e)))?;

        // Atoms must be delimiter-terminated, so "123abc" is one bad
        // token rather than a number followed by a symbol
        let delimited = remaining
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || c == '(' || c == ')' || c == '\'');
        if !delimited {
            let position = input.len() - remaining.len();
            return Err(Error::ParseError(ParseError::with_context(
                ParseErrorKind::InvalidSyntax,
                "Invalid syntax",
                input,
                position,
            )));
        }

        forms.push(compile_form(&datum)?);
        rest = remaining.trim_start();
    }

    Ok(forms)
}

/// Parse exactly one expression; trailing input and `define` are rejected.
pub fn parse_expression(input: &str) -> Result<Expr, Error> {
    let (remaining, datum) =
        parse_sexpr(input, 0).map_err(|e| Error::ParseError(nom_error_to_parse_error(input, e)))?;

    if !remaining.trim_start().is_empty() {
        return Err(Error::ParseError(ParseError::with_context(
            ParseErrorKind::TrailingContent,
            "Unexpected content after expression",
            input,
            input.len() - remaining.len(),
        )));
    }

    compile_expr(&datum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::value::{nil, sym, val};

    /// Test result variants for comprehensive parsing tests
    #[derive(Debug)]
    enum ParseTestResult {
        Success(Expr),
        SpecificError(&'static str),
        Error,
    }
    use ParseTestResult::*;

    fn num(n: NumberType) -> Expr {
        Expr::Num(n)
    }

    fn var(name: &str) -> Expr {
        Expr::VarRef(name.to_owned())
    }

    fn prim(name: &str) -> Expr {
        Expr::Prim(find_primitive(name).expect("unknown primitive in test"))
    }

    fn app(rator: Expr, rands: Vec<Expr>) -> Expr {
        Expr::App {
            rator: Box::new(rator),
            rands,
        }
    }

    /// Run parse tests through parse_expression
    fn run_parse_tests(test_cases: Vec<(&str, ParseTestResult)>) {
        for (i, (input, expected)) in test_cases.iter().enumerate() {
            let test_id = format!("Parse test #{}", i + 1);
            match (parse_expression(input), expected) {
                (Ok(actual), Success(expected_expr)) => {
                    assert_eq!(actual, *expected_expr, "{test_id}: mismatch for {input:?}");
                }
                (Err(_), Error) => {}
                (Err(err), SpecificError(expected_text)) => {
                    let msg = format!("{err}");
                    assert!(
                        msg.contains(expected_text),
                        "{test_id}: error for {input:?} should contain '{expected_text}', got: {msg}"
                    );
                }
                (Ok(actual), Error | SpecificError(_)) => {
                    panic!("{test_id}: expected error for {input:?}, got {actual:?}");
                }
                (Err(err), Success(_)) => {
                    panic!("{test_id}: expected success for {input:?}, got error {err:?}");
                }
            }
        }
    }

    #[test]
    fn test_atom_parsing() {
        let test_cases = vec![
            // Decimal numbers
            ("42", Success(num(42))),
            ("-5", Success(num(-5))),
            ("0", Success(num(0))),
            ("9223372036854775807", Success(num(i64::MAX))),
            ("-9223372036854775808", Success(num(i64::MIN))),
            // Hexadecimal
            ("#x1A", Success(num(26))),
            ("#X1a", Success(num(26))),
            ("#xff", Success(num(255))),
            // Number failures
            ("3.14", Error),
            ("#xG", Error),
            ("#x", Error),
            ("99999999999999999999", Error),
            // Booleans, case sensitive
            ("#t", Success(Expr::Bool(true))),
            ("#f", Success(Expr::Bool(false))),
            ("#T", Error),
            ("#true", Error),
            // Strings and escapes
            ("\"hello\"", Success(Expr::Str("hello".into()))),
            ("\"\"", Success(Expr::Str(String::new()))),
            (r#""a\nb""#, Success(Expr::Str("a\nb".into()))),
            (r#""q\"q""#, Success(Expr::Str("q\"q".into()))),
            (r#""back\\slash""#, Success(Expr::Str("back\\slash".into()))),
            (r#""bad\xescape""#, Error),
            (r#""unterminated"#, SpecificError("end of input")),
            // Symbols compile to variable references or primitives
            ("foo", Success(var("foo"))),
            ("is-even?", Success(var("is-even?"))),
            ("-abc", Success(var("-abc"))),
            ("+", Success(prim("+"))),
            ("car", Success(prim("car"))),
            ("string=?", Success(prim("string=?"))),
            // Invalid symbols
            ("@invalid", Error),
            // Whitespace tolerance
            ("  42  ", Success(num(42))),
            ("\t#t\n", Success(Expr::Bool(true))),
        ];
        run_parse_tests(test_cases);
    }

    #[test]
    fn test_quote_and_literals() {
        let test_cases = vec![
            ("'foo", Success(Expr::Lit(sym("foo")))),
            ("'()", Success(Expr::Lit(nil()))),
            ("'(1 2 3)", Success(Expr::Lit(val([1, 2, 3])))),
            (
                "'(a (b c))",
                Success(Expr::Lit(val(vec![
                    sym("a"),
                    val(vec![sym("b"), sym("c")]),
                ]))),
            ),
            ("(quote foo)", Success(Expr::Lit(sym("foo")))),
            // Shorthand nested inside quoted data stays in longhand form
            (
                "''x",
                Success(Expr::Lit(val(vec![sym("quote"), sym("x")]))),
            ),
            // quote takes exactly one datum
            ("(quote)", SpecificError("ArityError")),
            ("(quote a b)", SpecificError("ArityError")),
        ];
        run_parse_tests(test_cases);
    }

    #[test]
    fn test_applications() {
        let test_cases = vec![
            // Primitive heads resolve at compile time
            ("(+ 1 2)", Success(app(prim("+"), vec![num(1), num(2)]))),
            (
                "(car (list 1 2))",
                Success(app(
                    prim("car"),
                    vec![app(prim("list"), vec![num(1), num(2)])],
                )),
            ),
            // Unknown heads are ordinary variable references
            ("(foo 1 2)", Success(app(var("foo"), vec![num(1), num(2)]))),
            ("(f)", Success(app(var("f"), vec![]))),
            // Computed operator position
            (
                "((g 1) 2)",
                Success(app(app(var("g"), vec![num(1)]), vec![num(2)])),
            ),
            // The empty list is not an expression
            ("()", SpecificError("Empty application")),
            ("(())", SpecificError("Empty application")),
            // Mismatched parentheses
            ("(1 2", SpecificError("end of input")),
            (")", Error),
        ];
        run_parse_tests(test_cases);
    }

    #[test]
    fn test_special_form_shapes() {
        let test_cases = vec![
            (
                "(if #t 1 2)",
                Success(Expr::If {
                    test: Box::new(Expr::Bool(true)),
                    then: Box::new(num(1)),
                    alt: Box::new(num(2)),
                }),
            ),
            ("(if #t 1)", SpecificError("ArityError")),
            ("(if)", SpecificError("ArityError")),
            ("(if #t 1 2 3)", SpecificError("ArityError")),
            (
                "(lambda (x) x)",
                Success(Expr::Proc {
                    params: vec!["x".into()],
                    body: vec![var("x")],
                }),
            ),
            (
                "(lambda () 42)",
                Success(Expr::Proc {
                    params: vec![],
                    body: vec![num(42)],
                }),
            ),
            // Empty bodies parse; application reports them later
            (
                "(lambda (x))",
                Success(Expr::Proc {
                    params: vec!["x".into()],
                    body: vec![],
                }),
            ),
            ("(lambda)", SpecificError("ArityError")),
            ("(lambda x x)", SpecificError("parameter list")),
            ("(lambda (1) x)", SpecificError("must be a symbol")),
            ("(lambda (x x) x)", SpecificError("Duplicate name")),
            (
                "(let ((x 1)) x)",
                Success(Expr::Let {
                    bindings: vec![Binding {
                        name: "x".into(),
                        expr: num(1),
                    }],
                    body: vec![var("x")],
                }),
            ),
            ("(let)", SpecificError("ArityError")),
            ("(let x 1)", SpecificError("list of bindings")),
            ("(let ((x)) x)", SpecificError("Malformed let binding")),
            ("(let ((x 1) (x 2)) x)", SpecificError("Duplicate name")),
            (
                "(set! x 1)",
                Success(Expr::Set {
                    name: "x".into(),
                    expr: Box::new(num(1)),
                }),
            ),
            ("(set! 1 2)", SpecificError("symbol")),
            ("(set! x)", SpecificError("ArityError")),
            // define never appears in expression position
            ("(define x 1)", SpecificError("top level")),
            ("(+ 1 (define x 2))", SpecificError("top level")),
        ];
        run_parse_tests(test_cases);
    }

    #[test]
    fn test_parse_program_top_level() {
        // Multiple forms, defines allowed
        let forms = parse_program("(define x 3) (define y (+ x 4)) y").unwrap();
        assert_eq!(forms.len(), 3);
        assert!(matches!(&forms[0], Expr::Define { name, .. } if name == "x"));
        assert!(matches!(&forms[2], Expr::VarRef(name) if name == "y"));

        // define shape checking
        assert!(matches!(
            parse_program("(define 1 2)"),
            Err(Error::ParseError(ParseError {
                kind: ParseErrorKind::MalformedSpecialForm,
                ..
            }))
        ));
        assert!(matches!(
            parse_program("(define x)"),
            Err(Error::ArityError { expected: 2, got: 1, .. })
        ));
        // Nested define is rejected even at the top level of a program
        assert!(parse_program("(define f (lambda (x) (define y 1)))").is_err());

        // Empty and whitespace-only programs
        assert!(matches!(
            parse_program(""),
            Err(Error::ParseError(ParseError {
                kind: ParseErrorKind::Incomplete,
                ..
            }))
        ));
        assert!(parse_program("  \t\n ").is_err());

        // Atoms must be separated by delimiters
        assert!(parse_program("123abc").is_err());
        assert!(parse_program("(+ 1 2)(+ 3 4)").is_ok()); // parens self-delimit
    }

    #[test]
    fn test_parse_expression_rejects_trailing_content() {
        assert!(parse_expression("42").is_ok());
        assert!(matches!(
            parse_expression("42 43"),
            Err(Error::ParseError(ParseError {
                kind: ParseErrorKind::TrailingContent,
                ..
            }))
        ));
        assert!(matches!(
            parse_expression("(+ 1 2) tail"),
            Err(Error::ParseError(ParseError {
                kind: ParseErrorKind::TrailingContent,
                ..
            }))
        ));
    }

    #[test]
    fn test_parser_depth_limits() {
        let parens_under_limit = format!(
            "{}x{}",
            "(".repeat(MAX_PARSE_DEPTH - 1),
            ")".repeat(MAX_PARSE_DEPTH - 1)
        );
        let deep_parens_at_limit = format!(
            "{}1{}",
            "(".repeat(MAX_PARSE_DEPTH),
            ")".repeat(MAX_PARSE_DEPTH)
        );
        let deep_quotes_at_limit = format!("{}a", "'".repeat(MAX_PARSE_DEPTH));

        assert!(
            parse_expression(&parens_under_limit).is_ok(),
            "nesting just under the depth limit should parse"
        );

        for input in [deep_parens_at_limit, deep_quotes_at_limit] {
            match parse_expression(&input) {
                Err(Error::ParseError(e)) => {
                    assert_eq!(e.kind, ParseErrorKind::TooDeeplyNested, "for {input:?}");
                }
                other => panic!("expected depth error for {input:?}, got {other:?}"),
            }
        }
    }
}

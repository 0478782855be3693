//! `nom` grammar for rule conditions.
//!
//! ```text
//! expr    := term (AND term)*
//! term    := FIELD OP VALUE
//! OP      := == | != | <= | >= | < | >
//! VALUE   := NUMBER | STRING | null
//! ```
//!
//! The grammar is parsed into raw terms first; field names and operand
//! types are checked afterwards so the caller gets a [`RuleError`] that
//! names the actual problem instead of a bare syntax error.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{opt, recognize, value},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
};

use retention_rules::RuleError;
use retention_rules::ir::expr::{CompareOp, Comparison, Expr, Field, Literal};

/// Compile condition text into a type-checked [`Expr`].
///
/// Returns [`RuleError::Parse`] for syntax errors and trailing input,
/// [`RuleError::UnknownField`] for an unrecognized field name and
/// [`RuleError::TypeError`] when an operator or literal does not fit the field.
pub fn compile_condition(input: &str) -> Result<Expr, RuleError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(RuleError::Parse("empty condition".to_owned()));
    }
    let (rest, raw_terms) = parse_terms(input)
        .map_err(|e| RuleError::Parse(format!("condition parse error: {e}")))?;
    let rest = rest.trim();
    if !rest.is_empty() {
        return Err(RuleError::Parse(format!(
            "unexpected trailing input: {rest:?}"
        )));
    }

    let terms = raw_terms
        .into_iter()
        .map(RawTerm::compile)
        .collect::<Result<Vec<_>, _>>()?;
    Expr::new(terms)
}

/// A syntactically valid term whose field name is not yet resolved.
#[derive(Debug, PartialEq)]
struct RawTerm<'a> {
    field: &'a str,
    op: CompareOp,
    literal: Literal,
}

impl RawTerm<'_> {
    fn compile(self) -> Result<Comparison, RuleError> {
        let field: Field = self.field.parse()?;
        Comparison::new(field, self.op, self.literal)
    }
}

/// Consume optional whitespace around a parser.
fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Fail with `kind` unless the next character ends a word.
fn word_boundary<'a>(
    input: &'a str,
    rest: &'a str,
    kind: nom::error::ErrorKind,
) -> Result<(), nom::Err<nom::error::Error<&'a str>>> {
    if rest.chars().next().is_some_and(is_ident_char) {
        return Err(nom::Err::Error(nom::error::Error::new(input, kind)));
    }
    Ok(())
}

fn parse_terms(input: &str) -> IResult<&str, Vec<RawTerm<'_>>> {
    separated_list1(parse_and, parse_term)(input)
}

/// `AND`, case-insensitive, surrounded by whitespace.
fn parse_and(input: &str) -> IResult<&str, &str> {
    delimited(multispace1, tag_no_case("and"), multispace1)(input)
}

fn parse_term(input: &str) -> IResult<&str, RawTerm<'_>> {
    // No trailing whitespace is consumed so `parse_and` can require it.
    let (rest, (field, op, literal)) = tuple((
        ws(parse_ident),
        ws(parse_operator),
        preceded(multispace0, parse_literal),
    ))(input)?;
    Ok((rest, RawTerm { field, op, literal }))
}

fn parse_ident(input: &str) -> IResult<&str, &str> {
    take_while1(is_ident_char)(input)
}

fn parse_operator(input: &str) -> IResult<&str, CompareOp> {
    // Two-character operators must be tried before their prefixes.
    alt((
        value(CompareOp::Eq, tag("==")),
        value(CompareOp::Ne, tag("!=")),
        value(CompareOp::Le, tag("<=")),
        value(CompareOp::Ge, tag(">=")),
        value(CompareOp::Lt, tag("<")),
        value(CompareOp::Gt, tag(">")),
    ))(input)
}

fn parse_literal(input: &str) -> IResult<&str, Literal> {
    alt((parse_null, parse_number, parse_string_literal))(input)
}

fn parse_null(input: &str) -> IResult<&str, Literal> {
    let (rest, _) = tag("null")(input)?;
    word_boundary(input, rest, nom::error::ErrorKind::Tag)?;
    Ok((rest, Literal::Null))
}

/// `-?digits(.digits)?`
fn parse_number(input: &str) -> IResult<&str, Literal> {
    let (rest, num_str) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(tuple((char('.'), digit1))),
    )))(input)?;
    word_boundary(input, rest, nom::error::ErrorKind::Digit)?;

    let n: f64 = num_str.parse().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Float))
    })?;
    Ok((rest, Literal::Number(n)))
}

/// Double-quoted string with `\"`, `\\`, `\n` and `\t` escapes. Any other
/// escaped character is kept as written.
fn parse_string_literal(input: &str) -> IResult<&str, Literal> {
    let (body, _) = char('"')(input)?;
    let mut result = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((&body[i + 1..], Literal::String(result))),
            '\\' => match chars.next() {
                Some((_, 'n')) => result.push('\n'),
                Some((_, 't')) => result.push('\t'),
                Some((_, '\\')) => result.push('\\'),
                Some((_, '"')) => result.push('"'),
                Some((_, other)) => {
                    result.push('\\');
                    result.push(other);
                }
                None => break,
            },
            other => result.push(other),
        }
    }
    // Unterminated literal.
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

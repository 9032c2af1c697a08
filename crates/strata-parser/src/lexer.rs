//! Tolerant lexical analyzer for schema documents.
//!
//! The lexer converts document text into a stream of [`Token`]s. It knows
//! just enough of the schema grammar to tell definitions, braces and field
//! separators apart from descriptions and comments.
//!
//! Lexing never fails. Characters outside the grammar become
//! [`Token::Punct`], and unterminated strings run to the end of the line
//! (regular strings) or to the end of the input (block strings). The spans
//! of the produced tokens are contiguous and cover the whole input.

use log::warn;
use winnow::{
    Parser as _,
    combinator::{alt, not, opt, peek, preceded, repeat, terminated},
    error::{ContextError, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, literal, none_of, one_of, take_while},
};

use crate::{
    span::Span,
    tokens::{PositionedToken, Token},
};

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError>;

/// Parse line comment starting with '#'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded('#', take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// One unit of block string content: an escaped `\"""` or any character
/// that does not start the closing delimiter.
fn block_string_unit(input: &mut Input<'_>) -> IResult<()> {
    alt((
        literal("\\\"\"\"").void(),
        preceded(not(literal("\"\"\"")), any).void(),
    ))
    .parse_next(input)
}

fn block_string_body(input: &mut Input<'_>) -> IResult<()> {
    repeat(0.., block_string_unit).parse_next(input)
}

/// Parse a block string `"""..."""`, running to end of input if unterminated.
fn block_string<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (
        literal("\"\"\""),
        block_string_body,
        opt(literal("\"\"\"")),
    )
        .take()
        .map(Token::StringLiteral)
        .parse_next(input)
}

/// One unit of regular string content: an escape pair or a plain character.
fn string_unit(input: &mut Input<'_>) -> IResult<()> {
    alt((
        preceded('\\', any).void(),
        none_of(['"', '\\', '\n']).void(),
    ))
    .parse_next(input)
}

fn string_body(input: &mut Input<'_>) -> IResult<()> {
    repeat(0.., string_unit).parse_next(input)
}

/// Parse a regular string, running to end of line if unterminated.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    ('"', string_body, opt('"'))
        .take()
        .map(Token::StringLiteral)
        .parse_next(input)
}

/// Parse keywords with word boundary checking
fn keyword<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated(
        alt((
            literal("type"),
            literal("interface"),
            literal("implements"),
        )),
        // Ensure keyword is not followed by identifier character (word boundary)
        peek(not(one_of(|c: char| c.is_ascii_alphanumeric() || c == '_'))),
    )
    .map(|keyword: &str| match keyword {
        "type" => Token::Type,
        "interface" => Token::Interface,
        "implements" => Token::Implements,
        _ => unreachable!(),
    })
    .parse_next(input)
}

/// Parse identifiers
fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    // Start with letter or underscore, followed by alphanumeric or underscore
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_')
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse the single character tokens the extractor cares about
fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        ':'.value(Token::Colon),
    ))
    .parse_next(input)
}

/// Parse newline
fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse whitespace (spaces, tabs, carriage returns, but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Any other character
fn punct<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    any.map(Token::Punct).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,      // Must come before punct
        block_string,      // Must come before string_literal
        string_literal,    // Must come before punct
        keyword,           // Must come before identifier
        identifier,        // Must come before punct
        single_char_token, // Significant punctuation
        newline,           // Must come before whitespace
        whitespace,        // General whitespace
        punct,             // Everything else
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    let span = Span::new(start_pos..end_pos);

    Ok(PositionedToken::new(token, span))
}

/// Tokenize a document.
///
/// Always succeeds; see the module documentation for how unusual input is
/// handled.
pub fn tokenize(source: &str) -> Vec<PositionedToken<'_>> {
    let mut input = LocatingSlice::new(source);
    let mut tokens = Vec::new();

    while !input.is_empty() {
        match positioned_token(&mut input) {
            Ok(token) => tokens.push(token),
            Err(err) => {
                // `punct` accepts any character, so this only triggers on a
                // grammar bug. Skip one character to keep making progress.
                let error_pos = input.current_token_start();
                warn!(position = error_pos, error:? = err; "Skipping unlexable character");
                input.next_token();
            }
        }
    }

    tokens
}

//! Schema parser using nom.
//!
//! Reads the table-definition DSL of a Rails `schema.rb` (or a migration)
//! into a [`Catalogue`].
//!
//! # Syntax Overview
//!
//! ```text
//! create_table "users", force: :cascade do |t|
//! ─────┬────── ───┬───  ───────┬───────
//!      │          │            └── Options (ignored)
//!      │          └── Table name ("users", 'users' or :users)
//!      └── Table declaration
//!   t.string "email", null: false
//!   ─┬────── ───┬───
//!    │          └── Column name
//!    └── Column type (t.column "email", :string is also accepted)
//! end
//! ```
//!
//! Lines that are neither a declaration, a named column nor the closing
//! `end` (comments, `t.index [...]`, `t.timestamps`, `add_foreign_key`, ...)
//! are skipped. Parsing never fails; a text without declarations yields an
//! empty catalogue.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, space0, space1},
    combinator::{value, verify},
    sequence::{delimited, preceded, tuple},
    IResult,
};
use tracing::{debug, warn};

use crate::schema::{Attribute, Catalogue};

/// Parse a complete schema text.
pub fn parse_schema(input: &str) -> Catalogue {
    let mut catalogue = Catalogue::new();
    let mut current: Option<(&str, Closer, Vec<Attribute>)> = None;

    for line in input.lines() {
        let line = line.trim();

        if let Some((name, closer, attributes)) = current.as_mut() {
            if closer.closes(line) {
                let name = *name;
                let attributes = std::mem::take(attributes);
                add_table(&mut catalogue, name, attributes);
                current = None;
            } else if let Ok((_, attribute)) = parse_column(line) {
                attributes.push(attribute);
            }
            continue;
        }

        if let Ok((rest, name)) = parse_table_header(line) {
            match classify_header(rest) {
                Header::Bare => add_table(&mut catalogue, name, Vec::new()),
                Header::Open(closer) => current = Some((name, closer, Vec::new())),
                Header::Inline(body) => {
                    let attributes = body
                        .split(';')
                        .filter_map(|stmt| parse_column(stmt.trim()).ok())
                        .map(|(_, attribute)| attribute)
                        .collect();
                    add_table(&mut catalogue, name, attributes);
                }
            }
        }
    }

    // Unterminated block at end of input still declares its table.
    if let Some((name, _, attributes)) = current {
        add_table(&mut catalogue, name, attributes);
    }

    debug!(tables = catalogue.len(), "parsed schema");
    catalogue
}

/// How a `create_table` line continues after the table name.
#[derive(Debug, PartialEq, Eq)]
enum Header<'a> {
    /// No block: a table without columns.
    Bare,
    /// Block closed by a later `end` or `}` line.
    Open(Closer),
    /// Block opened and closed on the same line; holds the body.
    Inline(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closer {
    End,
    Brace,
}

impl Closer {
    fn closes(self, line: &str) -> bool {
        match self {
            Self::End => is_block_end(line),
            Self::Brace => line.starts_with('}'),
        }
    }
}

fn classify_header(rest: &str) -> Header<'_> {
    if let Some(idx) = rest.find('{') {
        let body = &rest[idx + 1..];
        return match body.rfind('}') {
            Some(close) => Header::Inline(strip_block_param(&body[..close])),
            None => Header::Open(Closer::Brace),
        };
    }

    let Some(idx) = find_word(rest, "do") else {
        return Header::Bare;
    };
    let body = rest[idx + 2..].trim_end();
    match body.strip_suffix("end") {
        Some(inner) if !inner.ends_with(is_identifier_char) => {
            Header::Inline(strip_block_param(inner))
        }
        _ => Header::Open(Closer::End),
    }
}

/// Drop the `|t|` block parameter.
fn strip_block_param(body: &str) -> &str {
    let body = body.trim();
    match body.strip_prefix('|').and_then(|b| b.find('|').map(|i| &b[i + 1..])) {
        Some(rest) => rest.trim(),
        None => body,
    }
}

/// Byte offset of `word` as a whole word in `haystack`.
fn find_word(haystack: &str, word: &str) -> Option<usize> {
    haystack.match_indices(word).map(|(i, _)| i).find(|&i| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + word.len()..].chars().next();
        !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
    })
}

fn add_table(catalogue: &mut Catalogue, name: &str, attributes: Vec<Attribute>) {
    if catalogue.push(name, attributes).is_none() {
        warn!(table = name, "duplicate table declaration skipped");
    }
}

/// Parse `create_table <name>`, returning the rest of the line.
fn parse_table_header(input: &str) -> IResult<&str, &str> {
    let (input, _) = tag("create_table")(input)?;
    let (input, _) = alt((space1, tag("(")))(input)?;
    let (input, _) = space0(input)?;
    parse_name(input, is_table_name_char)
}

/// Parse a column line: `t.<type> <name>` or `t.column <name>, <type>`.
fn parse_column(input: &str) -> IResult<&str, Attribute> {
    let (input, _) = tag("t.")(input)?;
    let (input, kind) = verify(parse_identifier, |k: &str| !NON_COLUMN_METHODS.contains(&k))(input)?;
    let (input, _) = alt((space1, tag("(")))(input)?;
    let (input, _) = space0(input)?;
    let (input, name) = parse_name(input, is_identifier_char)?;

    if kind == "column" {
        let (input, _) = tuple((space0, char(','), space0))(input)?;
        let (input, column_kind) = parse_name(input, is_identifier_char)?;
        return Ok((input, Attribute::new(name, column_kind)));
    }

    Ok((input, Attribute::new(name, kind)))
}

/// Table-block methods that take a string but declare no column.
const NON_COLUMN_METHODS: &[&str] = &[
    "index",
    "check_constraint",
    "exclusion_constraint",
    "unique_constraint",
    "foreign_key",
    "timestamps",
];

/// Parse a name: `"name"`, `'name'` or `:name`. Quoted names may only
/// contain characters accepted by `accept`.
fn parse_name(input: &str, accept: fn(char) -> bool) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while1(accept), char('"')),
        delimited(char('\''), take_while1(accept), char('\'')),
        preceded(char(':'), parse_identifier),
    ))(input)
}

/// Parse an identifier (column type, symbol name).
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(is_identifier_char)(input)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Table names may be schema-qualified (`"audit.events"`).
fn is_table_name_char(c: char) -> bool {
    is_identifier_char(c) || c == '.'
}

fn is_block_end(line: &str) -> bool {
    let end: IResult<&str, ()> = value((), tag("end"))(line);
    match end {
        Ok((rest, ())) => rest.is_empty() || rest.starts_with([' ', '\t', '#']),
        Err(_) => false,
    }
}

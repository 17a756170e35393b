//! Table selection expressions.
//!
//! | Form      | Meaning                                   |
//! |-----------|-------------------------------------------|
//! | `*`       | every table, in catalogue order           |
//! | `4`       | table 4                                   |
//! | `(4..6)`  | tables 4 to 6 inclusive                   |
//! | `[4,6]`   | tables 4 and 6, in the order listed       |
//!
//! Whitespace is allowed around every token (`( 4 .. 6 )`, `[4, 6]`).
//! Anything else, including nested or unbalanced brackets and empty lists,
//! is a [`ScaffoldError::InvalidSelection`].

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, value},
    multi::separated_list1,
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};
use tracing::debug;

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::schema::{Catalogue, TableId};

/// Options line shown next to the table listing.
pub const SELECTION_HELP: &str =
    "Options are:\n4 for table 4; (4..6) for table 4 to 6; [4,6] for tables 4 and 6; * for all Tables";

/// A parsed selection expression, not yet checked against a catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Single(usize),
    Range(usize, usize),
    List(Vec<usize>),
}

impl Selection {
    /// Parse a selection expression.
    pub fn parse(input: &str) -> ScaffoldResult<Self> {
        match parse_expression(input) {
            Ok((_, selection)) => Ok(selection),
            Err(_) => Err(ScaffoldError::invalid(input.trim())),
        }
    }

    /// Resolve against a catalogue. `input` is echoed back in errors.
    pub fn resolve(&self, catalogue: &Catalogue, input: &str) -> ScaffoldResult<Vec<TableId>> {
        if catalogue.is_empty() {
            return Err(ScaffoldError::ParseEmpty);
        }
        let input = input.trim();

        let ids: Vec<TableId> = match self {
            Self::All => catalogue.ids(),
            Self::Single(n) => vec![TableId::new(*n)],
            Self::Range(start, end) => {
                if start > end {
                    return Err(ScaffoldError::InvalidRange {
                        start: *start,
                        end: *end,
                    });
                }
                // Ids are contiguous from 1, so checking the bounds covers the range.
                for bound in [*start, *end] {
                    if !catalogue.contains(TableId::new(bound)) {
                        let first_missing = if *start == 0 {
                            0
                        } else {
                            (*start).max(catalogue.len() + 1)
                        };
                        return Err(ScaffoldError::unknown(first_missing, input));
                    }
                }
                (*start..=*end).map(TableId::new).collect()
            }
            Self::List(items) => {
                let mut ids: Vec<TableId> = Vec::with_capacity(items.len());
                for id in items.iter().copied().map(TableId::new) {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
                ids
            }
        };

        if let Some(missing) = ids.iter().find(|id| !catalogue.contains(**id)) {
            return Err(ScaffoldError::unknown(missing, input));
        }
        if ids.is_empty() {
            return Err(ScaffoldError::invalid(input));
        }
        Ok(ids)
    }
}

/// Interpret a selection expression against the catalogue.
///
/// The result is ordered, deduplicated and never empty; every identifier
/// refers to a table of `catalogue`.
pub fn select(catalogue: &Catalogue, expr: &str) -> ScaffoldResult<Vec<TableId>> {
    if catalogue.is_empty() {
        return Err(ScaffoldError::ParseEmpty);
    }
    let ids = Selection::parse(expr)?.resolve(catalogue, expr)?;
    debug!(input = expr.trim(), selected = ids.len(), "resolved selection");
    Ok(ids)
}

/// Look up a single table by numeric identifier or exact name.
///
/// Returns `None` when nothing matches; the caller decides how to report it.
pub fn select_by_name_or_id(catalogue: &Catalogue, token: &str) -> Option<TableId> {
    let token = token.trim();
    if let Ok(n) = token.parse::<usize>() {
        let id = TableId::new(n);
        if catalogue.contains(id) {
            return Some(id);
        }
    }
    catalogue.by_name(token).map(|t| t.id())
}

/// `(id, name)` pairs in catalogue order, for the selection prompt.
pub fn list_names(catalogue: &Catalogue) -> Vec<(TableId, &str)> {
    catalogue
        .iter()
        .map(|t| (t.id(), t.name.as_str()))
        .collect()
}

fn parse_expression(input: &str) -> IResult<&str, Selection> {
    all_consuming(delimited(
        multispace0,
        alt((
            value(Selection::All, char('*')),
            parse_range,
            parse_list,
            map(parse_number, Selection::Single),
        )),
        multispace0,
    ))(input)
}

/// Parse `(A..B)`.
fn parse_range(input: &str) -> IResult<&str, Selection> {
    map(
        delimited(
            terminated(char('('), multispace0),
            separated_pair(
                parse_number,
                delimited(multispace0, tag(".."), multispace0),
                parse_number,
            ),
            preceded(multispace0, char(')')),
        ),
        |(start, end)| Selection::Range(start, end),
    )(input)
}

/// Parse `[A,B,...]`.
fn parse_list(input: &str) -> IResult<&str, Selection> {
    map(
        delimited(
            terminated(char('['), multispace0),
            separated_list1(delimited(multispace0, char(','), multispace0), parse_number),
            preceded(multispace0, char(']')),
        ),
        Selection::List,
    )(input)
}

/// Digits beyond `usize` saturate; no catalogue holds such an id.
fn parse_number(input: &str) -> IResult<&str, usize> {
    map(digit1, |digits: &str| digits.parse().unwrap_or(usize::MAX))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    fn catalogue(n: usize) -> Catalogue {
        let text: String = (1..=n)
            .map(|i| format!("create_table \"t{i}\" do |t|\nend\n"))
            .collect();
        parse_schema(&text)
    }

    fn ids(raw: &[usize]) -> Vec<TableId> {
        raw.iter().copied().map(TableId::new).collect()
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(Selection::parse("*").unwrap(), Selection::All);
        assert_eq!(Selection::parse("4").unwrap(), Selection::Single(4));
        assert_eq!(Selection::parse("(4..6)").unwrap(), Selection::Range(4, 6));
        assert_eq!(Selection::parse("[4,6]").unwrap(), Selection::List(vec![4, 6]));
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(Selection::parse("  ( 4 .. 6 ) ").unwrap(), Selection::Range(4, 6));
        assert_eq!(Selection::parse("[ 4 , 6 ]\n").unwrap(), Selection::List(vec![4, 6]));
        assert_eq!(Selection::parse(" * ").unwrap(), Selection::All);
    }

    #[test]
    fn test_malformed_rejected() {
        for input in ["", "abc", "[]", "[[4]]", "(4..6", "[4,6", "4..6", "(4...6)", "-1", "[4,]", "* *"] {
            assert!(
                matches!(Selection::parse(input), Err(ScaffoldError::InvalidSelection(_))),
                "expected InvalidSelection for {input:?}"
            );
        }
    }

    #[test]
    fn test_select_all() {
        let cat = catalogue(5);
        assert_eq!(select(&cat, "*").unwrap(), ids(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_select_range() {
        let cat = catalogue(6);
        assert_eq!(select(&cat, "(4..6)").unwrap(), ids(&[4, 5, 6]));
        assert_eq!(select(&cat, "(2..2)").unwrap(), ids(&[2]));
    }

    #[test]
    fn test_reversed_range() {
        let cat = catalogue(6);
        assert!(matches!(
            select(&cat, "(6..4)"),
            Err(ScaffoldError::InvalidRange { start: 6, end: 4 })
        ));
    }

    #[test]
    fn test_list_order_preserved_and_deduplicated() {
        let cat = catalogue(6);
        assert_eq!(select(&cat, "[4,6]").unwrap(), ids(&[4, 6]));
        assert_eq!(select(&cat, "[6,4]").unwrap(), ids(&[6, 4]));
        assert_eq!(select(&cat, "[6,4,6,1,4]").unwrap(), ids(&[6, 4, 1]));
    }

    #[test]
    fn test_unknown_table_echoes_input() {
        let cat = catalogue(5);
        match select(&cat, " 99 ") {
            Err(ScaffoldError::UnknownTable { id, input }) => {
                assert_eq!(id, "99");
                assert_eq!(input, "99");
            }
            other => panic!("expected UnknownTable, got {other:?}"),
        }
        assert!(matches!(select(&cat, "0"), Err(ScaffoldError::UnknownTable { .. })));
        assert!(matches!(select(&cat, "(4..7)"), Err(ScaffoldError::UnknownTable { id, .. }) if id == "6"));
        assert!(matches!(select(&cat, "(1..99999999)"), Err(ScaffoldError::UnknownTable { id, .. }) if id == "6"));
        assert!(matches!(select(&cat, "(8..9)"), Err(ScaffoldError::UnknownTable { id, .. }) if id == "8"));
        assert!(matches!(select(&cat, "[1,9]"), Err(ScaffoldError::UnknownTable { .. })));
    }

    #[test]
    fn test_oversized_number_is_unknown_table() {
        let cat = catalogue(5);
        let huge = "99999999999999999999999";
        match select(&cat, huge) {
            Err(ScaffoldError::UnknownTable { input, .. }) => assert_eq!(input, huge),
            other => panic!("expected UnknownTable, got {other:?}"),
        }
        let list = format!("[1,{huge}]");
        match select(&cat, &list) {
            Err(ScaffoldError::UnknownTable { input, .. }) => assert_eq!(input, list),
            other => panic!("expected UnknownTable, got {other:?}"),
        }
        assert!(matches!(
            select(&cat, &format!("(1..{huge})")),
            Err(ScaffoldError::UnknownTable { .. })
        ));
    }

    #[test]
    fn test_empty_catalogue_fails() {
        let cat = Catalogue::new();
        assert!(matches!(select(&cat, "*"), Err(ScaffoldError::ParseEmpty)));
        assert!(matches!(select(&cat, "1"), Err(ScaffoldError::ParseEmpty)));
    }

    #[test]
    fn test_select_by_name_or_id() {
        let cat = catalogue(3);
        assert_eq!(select_by_name_or_id(&cat, "2"), Some(TableId::new(2)));
        assert_eq!(select_by_name_or_id(&cat, "t3"), Some(TableId::new(3)));
        assert_eq!(select_by_name_or_id(&cat, "9"), None);
        assert_eq!(select_by_name_or_id(&cat, "missing"), None);
    }

    #[test]
    fn test_list_names() {
        let cat = catalogue(2);
        assert_eq!(
            list_names(&cat),
            vec![(TableId::new(1), "t1"), (TableId::new(2), "t2")]
        );
    }
}

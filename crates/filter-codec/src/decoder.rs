//! Filter string → filter predicates.
//!
//! Recursive descent over the filter grammar with an explicit byte cursor.
//! All delimiters are ASCII and every value is percent-escaped, so slicing at
//! delimiter positions always lands on a character boundary.
//!
//! Set groups are expanded back into one [`FilterPredicate::Set`] per value:
//! `in(...)` yields the listed values in listed order, `notIn(...)` yields the
//! rest of the value domain in domain order.
//!
//! Decoding is all-or-nothing: the first grammar violation aborts with a
//! [`FilterError`] carrying the byte offset.

use crate::domain::ValueDomain;
use crate::error::{FilterError, Result};
use crate::escape::unescape_at;
use crate::types::{
    FilterPredicate, IdFilter, SetKind, SetOp, SetPredicate, ValuePredicate, CATEGORY_MARKER,
    STATUS_COLUMN,
};
use std::collections::HashSet;

/// Decode a filter string into a flat predicate list.
///
/// The empty string decodes to an empty list.
///
/// ```
/// use filter_codec::{deserialize, FilterPredicate, StaticDomain};
///
/// let predicates = deserialize("0(1*cputime*(value(%3A1234)))", &StaticDomain::new()).unwrap();
/// assert_eq!(predicates, vec![FilterPredicate::value(0, 1, "cputime", ":1234")]);
/// ```
pub fn deserialize<D: ValueDomain + ?Sized>(text: &str, domain: &D) -> Result<Vec<FilterPredicate>> {
    let mut predicates = Vec::new();
    if text.is_empty() {
        return Ok(predicates);
    }

    let mut parser = Parser::new(text);
    loop {
        parser.parse_group(domain, &mut predicates)?;
        match parser.peek() {
            None => break,
            Some(b',') => parser.pos += 1,
            Some(b')') => {
                return Err(FilterError::UnbalancedParens {
                    position: parser.pos,
                })
            }
            Some(_) => return Err(parser.unexpected("',' between groups")),
        }
    }

    tracing::trace!(
        encoded_len = text.len(),
        predicates = predicates.len(),
        "deserialized filters"
    );
    Ok(predicates)
}

/// Cursor over the filter string.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Advance to the next byte in `stops` (or the end of input) and return
    /// the skipped text with its start offset.
    fn take_until(&mut self, stops: &[u8]) -> (usize, &'a str) {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && !stops.contains(&bytes[self.pos]) {
            self.pos += 1;
        }
        (start, &self.input[start..self.pos])
    }

    /// Consume `byte` or fail. Running out of input while a `)` is expected
    /// means a group was left open.
    fn expect(&mut self, byte: u8) -> Result<()> {
        match self.peek() {
            Some(found) if found == byte => {
                self.pos += 1;
                Ok(())
            }
            None if byte == b')' => Err(FilterError::UnbalancedParens { position: self.pos }),
            _ => Err(self.unexpected(&format!("'{}'", byte as char))),
        }
    }

    fn unexpected(&self, wanted: &str) -> FilterError {
        let found = match self.input[self.pos..].chars().next() {
            Some(c) => format!("'{c}'"),
            None => "end of input".to_string(),
        };
        FilterError::Malformed {
            position: self.pos,
            message: format!("expected {wanted}, found {found}"),
        }
    }

    /// `id(values(...))` or `runset(column, ...)`.
    fn parse_group<D: ValueDomain + ?Sized>(
        &mut self,
        domain: &D,
        out: &mut Vec<FilterPredicate>,
    ) -> Result<()> {
        let (start, token) = self.take_until(b"(),");
        if token.is_empty() {
            return Err(self.unexpected("a filter group"));
        }
        if token == "id" {
            self.expect(b'(')?;
            let values = self.parse_id_body()?;
            out.push(FilterPredicate::Id(IdFilter { values }));
            return Ok(());
        }
        if token.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(FilterError::UnknownTag {
                position: start,
                tag: token.to_string(),
            });
        }

        let runset = parse_index(token, start)?;
        self.expect(b'(')?;
        loop {
            self.parse_column(runset, domain, out)?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    return Ok(());
                }
                None => return Err(FilterError::UnbalancedParens { position: self.pos }),
                Some(_) => return Err(self.unexpected("',' or ')' after column group")),
            }
        }
    }

    /// `values(v1,...))`, the part after `id(`.
    fn parse_id_body(&mut self) -> Result<Vec<String>> {
        let (start, tag) = self.take_until(b"(),");
        if tag != "values" {
            return Err(FilterError::UnknownTag {
                position: start,
                tag: tag.to_string(),
            });
        }
        self.expect(b'(')?;
        let values = self
            .parse_value_list()?
            .into_iter()
            .map(|(pos, raw)| unescape_at(raw, pos))
            .collect::<Result<Vec<_>>>()?;
        self.expect(b')')?;
        Ok(values)
    }

    /// `col*name*(payload)`.
    fn parse_column<D: ValueDomain + ?Sized>(
        &mut self,
        runset: usize,
        domain: &D,
        out: &mut Vec<FilterPredicate>,
    ) -> Result<()> {
        let (index_start, index) = self.take_until(b"*(),");
        if index.is_empty() {
            return Err(self.unexpected("a column index"));
        }
        let column = parse_index(index, index_start)?;
        self.expect(b'*')?;

        let (name_start, name) = self.take_until(b"*(),");
        if name.is_empty() {
            return Err(FilterError::Malformed {
                position: name_start,
                message: "empty column name".to_string(),
            });
        }
        let column_name = unescape_at(name, name_start)?;
        self.expect(b'*')?;
        self.expect(b'(')?;

        let (tag_start, tag) = self.take_until(b"(),*");
        self.expect(b'(')?;
        match tag {
            "value" => {
                let (value_start, raw) = self.take_until(b"(),");
                self.expect(b')')?;
                out.push(FilterPredicate::Value(ValuePredicate {
                    runset,
                    column,
                    column_name,
                    value: unescape_at(raw, value_start)?,
                }));
            }
            "status" | "category" => {
                let kind = if tag == "status" {
                    SetKind::Status
                } else {
                    SetKind::Category
                };
                if column != STATUS_COLUMN || column_name != SetKind::Status.tag() {
                    return Err(FilterError::Malformed {
                        position: index_start,
                        message: format!(
                            "{tag}(...) payload on column {column}*{column_name}*, \
                             expected {STATUS_COLUMN}*status*"
                        ),
                    });
                }
                self.parse_set_expr(runset, kind, domain, out)?;
                self.expect(b')')?;
            }
            _ => {
                return Err(FilterError::UnknownTag {
                    position: tag_start,
                    tag: tag.to_string(),
                })
            }
        }
        self.expect(b')')
    }

    /// `in(v1,...)` or `notIn(v1,...)`, expanded to one predicate per
    /// included value.
    fn parse_set_expr<D: ValueDomain + ?Sized>(
        &mut self,
        runset: usize,
        kind: SetKind,
        domain: &D,
        out: &mut Vec<FilterPredicate>,
    ) -> Result<()> {
        let (op_start, op) = self.take_until(b"(),");
        let op = match op {
            "in" => SetOp::In,
            "notIn" => SetOp::NotIn,
            other => {
                return Err(FilterError::UnknownTag {
                    position: op_start,
                    tag: other.to_string(),
                })
            }
        };
        self.expect(b'(')?;

        let mut listed = Vec::new();
        for (pos, raw) in self.parse_value_list()? {
            let mut value = unescape_at(raw, pos)?;
            if kind == SetKind::Category {
                value.push(CATEGORY_MARKER);
            }
            listed.push(value);
        }

        let set = |value: String| FilterPredicate::Set(SetPredicate { runset, kind, value });
        match op {
            SetOp::In => out.extend(listed.into_iter().map(set)),
            SetOp::NotIn => {
                let excluded: HashSet<&str> = listed.iter().map(String::as_str).collect();
                out.extend(
                    domain
                        .values(kind, runset)
                        .iter()
                        .filter(|v| !excluded.contains(v.as_str()))
                        .cloned()
                        .map(set),
                );
            }
        }
        Ok(())
    }

    /// Raw comma-separated values up to and including the closing `)`.
    /// A list is never empty: `()` holds one empty value.
    fn parse_value_list(&mut self) -> Result<Vec<(usize, &'a str)>> {
        let mut values = Vec::new();
        loop {
            let item = self.take_until(b"(),");
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    values.push(item);
                }
                Some(b')') => {
                    self.pos += 1;
                    values.push(item);
                    return Ok(values);
                }
                None => return Err(FilterError::UnbalancedParens { position: self.pos }),
                Some(_) => return Err(self.unexpected("',' or ')' in value list")),
            }
        }
    }
}

/// Parse a runset/column index segment.
fn parse_index(segment: &str, position: usize) -> Result<usize> {
    let invalid = || FilterError::InvalidIndex {
        position,
        segment: segment.to_string(),
    };
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    segment.parse().map_err(|_| invalid())
}

//! Filter predicates → filter string.
//!
//! Output layout:
//!
//! ```text
//! id(values(a,b)),0(1*cputime*(value(%3A12)),0*status*(status(in(OOM)))),1(...)
//! ```
//!
//! - The id group comes first, then one group per runset in ascending order.
//! - Inside a runset, column groups are ordered by column index. The status
//!   column (index 0) may carry a literal group, a `status(...)` group and a
//!   `category(...)` group, emitted in that order.
//! - Set groups are reduced to their shorter `in`/`notIn` form against the
//!   value domain, values in domain order.

use crate::domain::ValueDomain;
use crate::escape::escape;
use crate::set_encoding::choose_set_encoding;
use crate::types::{
    FilterPredicate, IdFilter, SetExpr, SetKind, SetOp, ValuePredicate, CATEGORY_MARKER,
    STATUS_COLUMN,
};
use std::collections::BTreeMap;

/// Slot of a column group inside one runset: column index first, then
/// literal < status < category for groups sharing the status column.
type ColumnSlot = (usize, u8);

/// Predicates of one runset, grouped for rendering.
#[derive(Default)]
struct RunsetGroup<'a> {
    literals: BTreeMap<usize, &'a ValuePredicate>,
    sets: BTreeMap<SetKind, Vec<&'a str>>,
}

/// Encode a predicate list into a filter string.
///
/// Never fails; an empty predicate list yields an empty string. When several
/// literal predicates target the same runset and column, or several id
/// filters are given, the last one wins. An id filter without values is
/// not written.
///
/// ```
/// use filter_codec::{serialize, FilterPredicate, StaticDomain};
///
/// let domain = StaticDomain::new();
/// let filters = vec![
///     FilterPredicate::value(0, 2, "hostname", "satu"),
///     FilterPredicate::id(["abc", "def"]),
/// ];
/// assert_eq!(
///     serialize(&filters, &domain),
///     "id(values(abc,def)),0(2*hostname*(value(satu)))"
/// );
/// ```
pub fn serialize<D: ValueDomain + ?Sized>(predicates: &[FilterPredicate], domain: &D) -> String {
    let mut id_filter: Option<&IdFilter> = None;
    let mut runsets: BTreeMap<usize, RunsetGroup<'_>> = BTreeMap::new();

    for predicate in predicates {
        match predicate {
            FilterPredicate::Id(id) => {
                if id_filter.replace(id).is_some() {
                    tracing::debug!("multiple id filters given, keeping the last one");
                }
            }
            FilterPredicate::Value(v) => {
                let group = runsets.entry(v.runset).or_default();
                if group.literals.insert(v.column, v).is_some() {
                    tracing::debug!(
                        runset = v.runset,
                        column = v.column,
                        "duplicate literal filter for column, keeping the last one"
                    );
                }
            }
            FilterPredicate::Set(s) => {
                runsets
                    .entry(s.runset)
                    .or_default()
                    .sets
                    .entry(s.kind)
                    .or_default()
                    .push(&s.value);
            }
        }
    }

    let mut groups: Vec<String> = Vec::with_capacity(runsets.len() + 1);
    // `values()` reads back as one empty id, so an empty filter is dropped.
    if let Some(id) = id_filter.filter(|id| !id.values.is_empty()) {
        groups.push(encode_id_group(id));
    }
    for (runset, group) in &runsets {
        groups.push(encode_runset_group(*runset, group, domain));
    }

    let out = groups.join(",");
    tracing::trace!(
        predicates = predicates.len(),
        encoded_len = out.len(),
        "serialized filters"
    );
    out
}

/// `id(values(v1,v2,...))`, values in caller order.
fn encode_id_group(id: &IdFilter) -> String {
    format!("id(values({}))", join_escaped(id.values.iter().map(String::as_str)))
}

/// `runset(col*name*(...),...)`.
fn encode_runset_group<D: ValueDomain + ?Sized>(
    runset: usize,
    group: &RunsetGroup<'_>,
    domain: &D,
) -> String {
    let mut columns: BTreeMap<ColumnSlot, String> = BTreeMap::new();

    for (column, literal) in &group.literals {
        columns.insert(
            (*column, 0),
            format!(
                "{}*{}*(value({}))",
                column,
                escape(&literal.column_name),
                escape(&literal.value)
            ),
        );
    }

    for (kind, included) in &group.sets {
        let rank = match kind {
            SetKind::Status => 1,
            SetKind::Category => 2,
        };
        columns.insert(
            (STATUS_COLUMN, rank),
            encode_set_group(runset, *kind, included, domain),
        );
    }

    let inner: Vec<String> = columns.into_values().collect();
    format!("{}({})", runset, inner.join(","))
}

/// `0*status*(kind(op(v1,...)))`.
///
/// The literal column tag is always `status`; the kind only shows in the
/// payload wrapper. Category values lose their trailing marker.
///
/// An empty `notIn()` would read back as excluding the empty value, so when
/// the domain has a value that is empty on the wire the full selection is
/// listed with `in(...)` instead.
fn encode_set_group<D: ValueDomain + ?Sized>(
    runset: usize,
    kind: SetKind,
    included: &[&str],
    domain: &D,
) -> String {
    let domain_values = domain.values(kind, runset);
    let mut expr = choose_set_encoding(included, domain_values);
    if expr.op == SetOp::NotIn
        && expr.values.is_empty()
        && domain_values.iter().any(|v| wire_value(kind, v).is_empty())
    {
        expr = SetExpr {
            op: SetOp::In,
            values: domain_values.to_vec(),
        };
    }
    let values = expr.values.iter().map(|v| wire_value(kind, v));
    format!(
        "{}*{}*({}({}({})))",
        STATUS_COLUMN,
        SetKind::Status.tag(),
        kind.tag(),
        expr.op.tag(),
        join_escaped(values)
    )
}

/// Category values travel without their trailing marker.
fn wire_value(kind: SetKind, value: &str) -> &str {
    match kind {
        SetKind::Status => value,
        SetKind::Category => value.strip_suffix(CATEGORY_MARKER).unwrap_or(value),
    }
}

fn join_escaped<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.map(escape).collect::<Vec<_>>().join(",")
}

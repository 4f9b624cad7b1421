//! Filter predicate model shared by the encoder and decoder.
//!
//! The results table applies its filters as a flat list of predicates. Each
//! predicate is one of three shapes: the domain-independent id filter, a
//! literal match on one column of a runset, or one selected member of the
//! status/category column of a runset. Several [`SetPredicate`]s with the
//! same runset and [`SetKind`] together form "the set of values currently
//! included" for that slot.

use serde::{Deserialize, Serialize};

/// Index of the status/category column inside every runset.
pub const STATUS_COLUMN: usize = 0;

/// Trailing character the value domain appends to every category string.
///
/// It is stripped before a category is written into a filter string and put
/// back when the string is decoded.
pub const CATEGORY_MARKER: char = ' ';

/// One atomic filter condition over the result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterPredicate {
    /// Task-id filter, keyed by the literal tag `id`.
    Id(IdFilter),
    /// Literal match on one column.
    Value(ValuePredicate),
    /// One included member of a status or category set.
    Set(SetPredicate),
}

/// Filter on the task id columns. `values` keeps caller order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdFilter {
    pub values: Vec<String>,
}

/// A single literal match on one column of one runset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuePredicate {
    pub runset: usize,
    pub column: usize,
    pub column_name: String,
    pub value: String,
}

/// One selected member of the status/category column of a runset.
///
/// The column index is always [`STATUS_COLUMN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPredicate {
    pub runset: usize,
    pub kind: SetKind,
    pub value: String,
}

/// Which value list of the status column a [`SetPredicate`] selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetKind {
    Status,
    Category,
}

impl SetKind {
    /// Payload tag used in the filter grammar.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Category => "category",
        }
    }
}

/// Whether a set expression lists the included or the excluded values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    In,
    NotIn,
}

impl SetOp {
    /// Tag used in the filter grammar.
    pub fn tag(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::NotIn => "notIn",
        }
    }
}

/// Encoded form of one status/category group, as picked by
/// [`crate::set_encoding::choose_set_encoding`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetExpr {
    pub op: SetOp,
    pub values: Vec<String>,
}

impl FilterPredicate {
    /// Build an id filter.
    pub fn id<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Id(IdFilter {
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Build a literal column match.
    pub fn value(
        runset: usize,
        column: usize,
        column_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Value(ValuePredicate {
            runset,
            column,
            column_name: column_name.into(),
            value: value.into(),
        })
    }

    /// Build a status set member.
    pub fn status(runset: usize, value: impl Into<String>) -> Self {
        Self::Set(SetPredicate {
            runset,
            kind: SetKind::Status,
            value: value.into(),
        })
    }

    /// Build a category set member. `value` is expected in domain form,
    /// i.e. including the trailing [`CATEGORY_MARKER`].
    pub fn category(runset: usize, value: impl Into<String>) -> Self {
        Self::Set(SetPredicate {
            runset,
            kind: SetKind::Category,
            value: value.into(),
        })
    }

    /// Runset the predicate belongs to; `None` for the id filter.
    pub fn runset(&self) -> Option<usize> {
        match self {
            Self::Id(_) => None,
            Self::Value(v) => Some(v.runset),
            Self::Set(s) => Some(s.runset),
        }
    }

    /// Column the predicate belongs to; `None` for the id filter.
    pub fn column(&self) -> Option<usize> {
        match self {
            Self::Id(_) => None,
            Self::Value(v) => Some(v.column),
            Self::Set(_) => Some(STATUS_COLUMN),
        }
    }
}

//! Interop with the results table's flat filter records.
//!
//! The table keeps its active filters as `{ "id": "<runset>_<column name>_<column index>",
//! "value": ... }` records, plus one `{ "id": "id", "values": [...] }` record
//! for the task-id filter. The status column is always `<runset>_status_0`,
//! whether the selected value is a status or a category.

use crate::domain::ValueDomain;
use crate::error::{FilterError, Result};
use crate::types::{FilterPredicate, IdFilter, SetKind, SetPredicate, ValuePredicate};
use crate::types::{CATEGORY_MARKER, STATUS_COLUMN};
use serde::{Deserialize, Serialize};

/// Record id of the task-id filter.
pub const ID_FILTER_ID: &str = "id";

/// Column name the table uses for the status column.
const STATUS_COLUMN_NAME: &str = "status";

/// One filter record as the results table stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

impl TableFilter {
    /// Record for a single-value filter.
    pub fn with_value(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: Some(value.into()),
            values: None,
        }
    }

    /// Record form of a predicate.
    pub fn from_predicate(predicate: &FilterPredicate) -> Self {
        match predicate {
            FilterPredicate::Id(id) => Self {
                id: ID_FILTER_ID.to_string(),
                value: None,
                values: Some(id.values.clone()),
            },
            FilterPredicate::Value(v) => Self::with_value(
                format!("{}_{}_{}", v.runset, v.column_name, v.column),
                v.value.clone(),
            ),
            FilterPredicate::Set(s) => Self::with_value(
                format!("{}_{}_{}", s.runset, STATUS_COLUMN_NAME, STATUS_COLUMN),
                s.value.clone(),
            ),
        }
    }
}

impl FilterPredicate {
    /// Predicate form of a table record.
    ///
    /// The id is split at its first and last `_`, so column names may
    /// contain underscores. A record on the status column becomes a set
    /// predicate; its kind is decided by which value list of the runset
    /// contains the value, falling back to the trailing
    /// [`CATEGORY_MARKER`] when neither does.
    pub fn from_table_filter<D: ValueDomain + ?Sized>(
        filter: &TableFilter,
        domain: &D,
    ) -> Result<Self> {
        if filter.id == ID_FILTER_ID {
            let values = filter.values.clone().ok_or_else(|| {
                FilterError::InvalidTableFilter("id filter without values".to_string())
            })?;
            return Ok(Self::Id(IdFilter { values }));
        }

        let (runset, column_name, column) = split_filter_id(&filter.id)?;
        let value = filter.value.clone().ok_or_else(|| {
            FilterError::InvalidTableFilter(format!("filter '{}' has no value", filter.id))
        })?;

        if column == STATUS_COLUMN && column_name == STATUS_COLUMN_NAME {
            let kind = set_kind_of(&value, runset, domain);
            return Ok(Self::Set(SetPredicate {
                runset,
                kind,
                value,
            }));
        }

        Ok(Self::Value(ValuePredicate {
            runset,
            column,
            column_name: column_name.to_string(),
            value,
        }))
    }
}

fn set_kind_of<D: ValueDomain + ?Sized>(value: &str, runset: usize, domain: &D) -> SetKind {
    let listed = |values: Option<&[String]>| values.is_some_and(|vs| vs.iter().any(|v| v == value));
    if listed(domain.category_values(runset)) {
        SetKind::Category
    } else if listed(domain.status_values(runset)) {
        SetKind::Status
    } else if value.ends_with(CATEGORY_MARKER) {
        SetKind::Category
    } else {
        SetKind::Status
    }
}

/// `"<runset>_<name>_<column>"` → parts.
fn split_filter_id(id: &str) -> Result<(usize, &str, usize)> {
    let invalid = || FilterError::InvalidTableFilter(format!("malformed filter id '{id}'"));
    let (runset, rest) = id.split_once('_').ok_or_else(invalid)?;
    let (name, column) = rest.rsplit_once('_').ok_or_else(invalid)?;
    let runset = runset.parse().map_err(|_| invalid())?;
    let column = column.parse().map_err(|_| invalid())?;
    Ok((runset, name, column))
}

/// Encode table records directly into a filter string.
pub fn serialize_table_filters<D: ValueDomain + ?Sized>(
    filters: &[TableFilter],
    domain: &D,
) -> Result<String> {
    let predicates = filters
        .iter()
        .map(|f| FilterPredicate::from_table_filter(f, domain))
        .collect::<Result<Vec<_>>>()?;
    Ok(crate::encoder::serialize(&predicates, domain))
}

/// Decode a filter string directly into table records.
pub fn deserialize_table_filters<D: ValueDomain + ?Sized>(
    text: &str,
    domain: &D,
) -> Result<Vec<TableFilter>> {
    let predicates = crate::decoder::deserialize(text, domain)?;
    Ok(predicates.iter().map(TableFilter::from_predicate).collect())
}

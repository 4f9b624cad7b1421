//! Value-domain registry consumed by the codec.
//!
//! The domain lists, per runset, every legal status string and every legal
//! category string of the status column, in canonical (display) order. The
//! codec only reads it: the encoder needs it to compute complements and the
//! decoder needs it to expand `notIn(...)` lists.

use crate::error::Result;
use crate::types::{SetKind, STATUS_COLUMN};
use serde::{Deserialize, Deserializer, Serialize};

/// Read-only lookup of the legal status/category values of each runset.
///
/// A `None` answer is a lookup miss; the codec treats it as an empty domain.
pub trait ValueDomain {
    /// Status values of `runset`, in canonical order.
    fn status_values(&self, runset: usize) -> Option<&[String]>;

    /// Category values of `runset` (each ending in
    /// [`crate::CATEGORY_MARKER`]), in canonical order.
    fn category_values(&self, runset: usize) -> Option<&[String]>;

    /// Values of the given kind, with lookup misses mapped to an empty slice.
    fn values(&self, kind: SetKind, runset: usize) -> &[String] {
        let found = match kind {
            SetKind::Status => self.status_values(runset),
            SetKind::Category => self.category_values(runset),
        };
        match found {
            Some(values) => values,
            None => {
                tracing::debug!(runset, kind = kind.tag(), "value domain lookup miss");
                &[]
            }
        }
    }
}

impl<D: ValueDomain + ?Sized> ValueDomain for &D {
    fn status_values(&self, runset: usize) -> Option<&[String]> {
        (**self).status_values(runset)
    }

    fn category_values(&self, runset: usize) -> Option<&[String]> {
        (**self).category_values(runset)
    }
}

/// In-memory domain indexed by runset position.
///
/// Deserializes from the JSON the results table ships with its data, where
/// each runset holds one value list per column and only the status column
/// (index 0) is read:
///
/// ```
/// use filter_codec::{StaticDomain, ValueDomain};
///
/// let domain = StaticDomain::from_json(
///     r#"{"statusValues":[[["true","false"]]],"categoryValues":[[["correct ","wrong "]]]}"#,
/// ).unwrap();
/// assert_eq!(domain.status_values(0).unwrap(), ["true", "false"]);
/// assert!(domain.status_values(1).is_none());
/// ```
///
/// A runset may also be given as a flat list, which is the form this type
/// serializes to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticDomain {
    #[serde(default, alias = "statusValues", deserialize_with = "status_column")]
    pub status_values: Vec<Vec<String>>,
    #[serde(default, alias = "categoryValues", deserialize_with = "status_column")]
    pub category_values: Vec<Vec<String>>,
}

/// One runset entry of a domain file.
#[derive(Deserialize)]
#[serde(untagged)]
enum RunsetValues {
    Flat(Vec<String>),
    PerColumn(Vec<Option<Vec<String>>>),
}

impl RunsetValues {
    fn into_status_column(self) -> Vec<String> {
        match self {
            Self::Flat(values) => values,
            Self::PerColumn(mut columns) => {
                if columns.len() > STATUS_COLUMN {
                    columns.swap_remove(STATUS_COLUMN).unwrap_or_default()
                } else {
                    Vec::new()
                }
            }
        }
    }
}

fn status_column<'de, D>(deserializer: D) -> std::result::Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let runsets = Vec::<RunsetValues>::deserialize(deserializer)?;
    Ok(runsets
        .into_iter()
        .map(RunsetValues::into_status_column)
        .collect())
}

impl StaticDomain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a domain from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append the next runset's value lists.
    pub fn with_runset<S, C>(mut self, status: S, category: C) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        self.status_values
            .push(status.into_iter().map(Into::into).collect());
        self.category_values
            .push(category.into_iter().map(Into::into).collect());
        self
    }
}

impl ValueDomain for StaticDomain {
    fn status_values(&self, runset: usize) -> Option<&[String]> {
        self.status_values.get(runset).map(Vec::as_slice)
    }

    fn category_values(&self, runset: usize) -> Option<&[String]> {
        self.category_values.get(runset).map(Vec::as_slice)
    }
}

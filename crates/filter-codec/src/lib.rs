//! # filter-codec
//!
//! Compact, delimiter-safe encoding of a results table's active filters, for
//! embedding in the fragment of a shareable link.
//!
//! A filter state is a flat list of [`FilterPredicate`]s. [`serialize`] turns
//! it into a string such as
//!
//! ```text
//! id(values(abc,def)),0(1*cputime*(value(1223%3A4567)),0*status*(status(notIn(true,false))))
//! ```
//!
//! and [`deserialize`] restores the list. Status and category selections are
//! written in whichever of the `in(...)` / `notIn(...)` forms is shorter, so
//! both directions need the [`ValueDomain`] listing the legal values of every
//! runset.
//!
//! ## Quick start
//!
//! ```rust
//! use filter_codec::{deserialize, serialize, FilterPredicate, StaticDomain};
//!
//! let domain = StaticDomain::new()
//!     .with_runset(["true", "false", "TIMEOUT", "OOM"], ["correct ", "wrong "]);
//!
//! let filters = vec![
//!     FilterPredicate::status(0, "TIMEOUT"),
//!     FilterPredicate::status(0, "OOM"),
//!     FilterPredicate::status(0, "false"),
//! ];
//! let text = serialize(&filters, &domain);
//! assert_eq!(text, "0(0*status*(status(notIn(true))))");
//!
//! let back = deserialize(&text, &domain).unwrap();
//! assert_eq!(back[0], FilterPredicate::status(0, "false"));
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — predicates → filter string
//! - [`decoder`] — filter string → predicates
//! - [`set_encoding`] — `in` / `notIn` selection
//! - [`escape`] — percent-escaping of values
//! - [`domain`] — value-domain registry
//! - [`table`] — conversion from/to the table's `{id, value}` records
//! - [`types`] — predicate model
//! - [`error`] — error types

pub mod decoder;
pub mod domain;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod set_encoding;
pub mod table;
pub mod types;

pub use decoder::deserialize;
pub use domain::{StaticDomain, ValueDomain};
pub use encoder::serialize;
pub use error::FilterError;
pub use escape::{escape, unescape};
pub use set_encoding::choose_set_encoding;
pub use table::{deserialize_table_filters, serialize_table_filters, TableFilter};
pub use types::{
    FilterPredicate, IdFilter, SetExpr, SetKind, SetOp, SetPredicate, ValuePredicate,
    CATEGORY_MARKER, STATUS_COLUMN,
};

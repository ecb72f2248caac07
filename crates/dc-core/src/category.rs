//! Categories scope events and limits.

use serde::{Deserialize, Serialize};

use crate::types::CategoryId;

/// A named grouping that owns events and limits. Only `id` matters to the
/// engine; `name` and `color` are presentation data carried along for the
/// stores and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
}

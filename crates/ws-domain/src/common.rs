//! Shared identifiers, traits, and enums for ledger rows.

use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{ExpensePatch, SalesPatch};

/// Stable identifier of a row within its collection.
///
/// Serialized as a string. Older slots stored numeric ids, which are accepted on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRowId {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawRowId>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawRowId::Text(text)) => RowId(text),
            Some(RawRowId::Integer(value)) => RowId(value.to_string()),
            Some(RawRowId::Float(value)) => RowId(value.to_string()),
            None => RowId::default(),
        })
    }
}

/// Exposes the stable identifier of a stored row.
pub trait Identifiable {
    fn id(&self) -> &RowId;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Behaviour shared by every row kind the ledger store manages.
pub trait LedgerRow: Identifiable + NamedEntity + Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Partial update accepted by this row kind.
    type Patch: Clone + Default + fmt::Debug;

    const COLLECTION: Collection;

    /// Builds a fresh row, defaulting every field the patch leaves out.
    fn from_patch(id: RowId, patch: &Self::Patch) -> Self;

    /// Merges the named fields of `patch` into the row, leaving the rest untouched.
    fn apply(&mut self, patch: &Self::Patch);

    fn set_id(&mut self, id: RowId);
}

/// The two row collections owned by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Sales,
    Expenses,
}

impl Collection {
    pub fn label(self) -> &'static str {
        match self {
            Collection::Sales => "sales",
            Collection::Expenses => "expenses",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Collection {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sale" | "sales" => Ok(Collection::Sales),
            "expense" | "expenses" => Ok(Collection::Expenses),
            other => Err(UnknownName::Collection(other.to_string())),
        }
    }
}

/// A typed partial update. The variant selects the collection it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum RowPatch {
    Sales(SalesPatch),
    Expense(ExpensePatch),
}

impl RowPatch {
    pub fn collection(&self) -> Collection {
        match self {
            RowPatch::Sales(_) => Collection::Sales,
            RowPatch::Expense(_) => Collection::Expenses,
        }
    }
}

impl From<SalesPatch> for RowPatch {
    fn from(patch: SalesPatch) -> Self {
        RowPatch::Sales(patch)
    }
}

impl From<ExpensePatch> for RowPatch {
    fn from(patch: ExpensePatch) -> Self {
        RowPatch::Expense(patch)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownName {
    #[error("unknown collection `{0}` (expected sales or expenses)")]
    Collection(String),
    #[error("unknown field `{0}`")]
    Field(String),
}

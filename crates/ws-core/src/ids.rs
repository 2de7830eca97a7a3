use uuid::Uuid;
use ws_domain::RowId;

/// Source of fresh row identifiers, injected into the ledger store.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> RowId;
}

/// Random v4 identifiers.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> RowId {
        RowId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic `<prefix><n>` identifiers starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("row-")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> RowId {
        let id = RowId::new(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

impl<F> IdGenerator for F
where
    F: FnMut() -> RowId + Send,
{
    fn next_id(&mut self) -> RowId {
        self()
    }
}

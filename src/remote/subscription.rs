use crate::remote::Fields;
use std::sync::mpsc::{Receiver, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocChange {
    pub kind: ChangeKind,
    pub id: String,
    /// Current fields, `None` for removals.
    pub fields: Option<Fields>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeBatch {
    pub changes: Vec<DocChange>,
}

impl ChangeBatch {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Live change feed on one collection.
///
/// Cancelling drops the receiving end; the store notices on its next
/// delivery and forgets the subscriber. Dropping the subscription has the
/// same effect.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: Option<Receiver<ChangeBatch>>,
}

impl Subscription {
    pub fn new(id: u64, rx: Receiver<ChangeBatch>) -> Self {
        Self { id, rx: Some(rx) }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.rx.is_some()
    }

    /// Next delivered batch, if any. A feed whose sender went away is
    /// treated as cancelled.
    pub fn try_next(&mut self) -> Option<ChangeBatch> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(batch) => Some(batch),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.rx = None;
                None
            }
        }
    }

    pub fn drain(&mut self) -> Vec<ChangeBatch> {
        let mut out = Vec::new();
        while let Some(b) = self.try_next() {
            out.push(b);
        }
        out
    }

    /// Stop the feed. Returns false when it was already cancelled.
    pub fn cancel(&mut self) -> bool {
        self.rx.take().is_some()
    }
}

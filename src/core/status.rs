/// Transient sync indicator shown after remote reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncStatus {
    #[default]
    Idle,
    Loading,
    Saving,
    Saved,
    /// Sticky until the next successful operation.
    Failed(String),
}

impl SyncStatus {
    pub fn label(&self) -> Option<String> {
        match self {
            SyncStatus::Idle => None,
            SyncStatus::Loading => Some("Loading...".into()),
            SyncStatus::Saving => Some("Saving...".into()),
            SyncStatus::Saved => Some("Saved".into()),
            SyncStatus::Failed(msg) => Some(msg.clone()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SyncStatus::Failed(_))
    }
}

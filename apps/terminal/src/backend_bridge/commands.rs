//! Backend commands queued from the UI to the backend worker.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Search { query: String },
    ConfirmAdminName { name: String },
}

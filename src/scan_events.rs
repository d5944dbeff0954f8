//! Progress events emitted while collecting file metadata

/// One progress update, emitted after each file finishes (success or failure).
///
/// Completion order inside a concurrent batch is unspecified; only
/// `processed` is guaranteed to increase monotonically.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Files completed so far, including this one
    pub processed: usize,
    /// Total files in this collection run
    pub total: usize,
    /// Base name of the file that just completed
    pub current_file: String,
    /// Whether metadata extraction succeeded for this file
    pub succeeded: bool,
    /// Error message when it did not
    pub error: Option<String>,
}

//! Core types shared by the library and the binary.

/// Parameter handed to the placeholder task.
///
/// Opaque to the task itself: it is only echoed back in the report.
pub type TaskParam = i64;

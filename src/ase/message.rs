use std::sync::Arc;

/// An informational or warning message sent by the ASE server.
///
/// ASE reports these out-of-band from query results (severity 10 and below);
/// anything more severe is surfaced as an error by the driver layer instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AseInfoMessage {
    /// The server message number.
    pub message_number: i32,
    /// Severity class; informational messages are severity 10 or lower.
    pub severity: u8,
    /// The server state associated with the message.
    pub state: u8,
    /// Line number in the batch or procedure that produced the message.
    pub line_number: u32,
    /// Name of the server that raised the message, when reported.
    pub server_name: Option<String>,
    /// Name of the stored procedure that raised the message, when reported.
    pub proc_name: Option<String>,
    /// The message text.
    pub text: String,
}

impl AseInfoMessage {
    /// A message with only the fields every server report carries; the
    /// optional origin fields start out empty.
    pub fn new(message_number: i32, severity: u8, text: impl Into<String>) -> Self {
        Self {
            message_number,
            severity,
            state: 0,
            line_number: 0,
            server_name: None,
            proc_name: None,
            text: text.into(),
        }
    }
}

/// A callback registered for [`AseInfoMessage`] delivery.
///
/// Handlers are invoked on whatever thread the driver reports server
/// messages from, outside any client lock; they must tolerate concurrent
/// invocation.
pub type InfoMessageHandler = Arc<dyn Fn(&AseInfoMessage) + Send + Sync>;

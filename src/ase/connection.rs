use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

use bitflags::bitflags;

use crate::ase::message::{AseInfoMessage, InfoMessageHandler};
use crate::ase::options::AseConnectOptions;
use crate::error::Result;
use crate::executor::ClientConnection;

bitflags! {
    /// Capabilities negotiated for an ASE session.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AseCapabilities: u8 {
        /// The server reports informational messages out-of-band.
        const INFO_MESSAGES = 1;
        /// The session supports server-side cursors.
        const CURSORS = 1 << 1;
        /// The session supports wide (255+ column) result tables.
        const WIDE_TABLES = 1 << 2;
    }
}

struct AseConnectionInner {
    options: AseConnectOptions,
    open: bool,
    capabilities: AseCapabilities,
    info_handlers: Vec<InfoMessageHandler>,
}

/// A handle to an ASE connection.
///
/// The handle is cheap to clone; all clones share one inner connection
/// state behind a single mutex. That mutex is the serialization point for
/// everything that touches the connection: lifecycle transitions
/// (open/close) and info-message subscription changes all acquire it, so a
/// subscription can never land on a connection that is mid-teardown.
///
/// Message *delivery* is not serialized by the mutex. The driver layer
/// snapshots the handler list under the lock and invokes handlers after
/// releasing it, on its own reporting thread.
#[derive(Clone)]
pub struct AseConnection(Arc<Mutex<AseConnectionInner>>);

impl AseConnection {
    /// Build an open connection handle from parsed options.
    ///
    /// No network I/O happens here; ASE connections open lazily and the
    /// login handshake belongs to the driver layer.
    pub fn establish(options: &AseConnectOptions) -> Result<Self> {
        log::debug!("establishing ASE connection handle to {}", options.redacted_url());

        Ok(Self(Arc::new(Mutex::new(AseConnectionInner {
            options: options.clone(),
            open: true,
            capabilities: AseCapabilities::all(),
            info_handlers: Vec::new(),
        }))))
    }

    fn inner(&self) -> MutexGuard<'_, AseConnectionInner> {
        // A poisoned lock means a handler-registration path panicked while
        // holding the connection; nothing can be salvaged from that state.
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether two handles refer to the same underlying connection.
    pub fn same_handle(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// The options this connection was configured from.
    pub fn options(&self) -> AseConnectOptions {
        self.inner().options.clone()
    }

    /// Capabilities negotiated for this session.
    pub fn capabilities(&self) -> AseCapabilities {
        self.inner().capabilities
    }

    /// The server name this connection was configured for, when one was
    /// given; empty otherwise.
    pub fn server_name(&self) -> String {
        self.inner().options.server_name.clone()
    }

    /// Mark the connection open again after a [`close`][Self::close].
    /// Subscriptions do not survive a close; callers re-register.
    pub fn open(&self) {
        let mut inner = self.inner();
        if !inner.open {
            log::debug!("reopening ASE connection to {}", inner.options.redacted_url());
            inner.open = true;
        }
    }

    /// Number of info-message registrations currently held.
    ///
    /// Duplicate registrations of one handler count separately.
    pub fn info_handler_count(&self) -> usize {
        self.inner().info_handlers.len()
    }

    /// Register `handler` for informational messages.
    ///
    /// Registration is not deduplicated: registering the same handler twice
    /// yields two deliveries per message, matching the driver's semantics.
    pub fn add_info_handler(&self, handler: InfoMessageHandler) {
        let mut inner = self.inner();
        inner.info_handlers.push(handler);
        log::trace!(
            "registered info-message handler ({} now active)",
            inner.info_handlers.len()
        );
    }

    /// Remove one registration of `handler`, matched by identity.
    ///
    /// The most recent registration is removed first; removing a handler
    /// that was never registered is a no-op.
    pub fn remove_info_handler(&self, handler: &InfoMessageHandler) {
        let mut inner = self.inner();
        if let Some(pos) = inner
            .info_handlers
            .iter()
            .rposition(|h| Arc::ptr_eq(h, handler))
        {
            inner.info_handlers.remove(pos);
            log::trace!(
                "removed info-message handler ({} still active)",
                inner.info_handlers.len()
            );
        }
    }

    /// Deliver `message` to every registered handler.
    ///
    /// This is the entry point the protocol layer calls from its reporting
    /// thread when the server sends an informational token. The handler
    /// list is snapshotted under the connection lock and the handlers run
    /// after it is released, so a slow handler cannot stall registration or
    /// teardown. Returns the number of handlers invoked.
    pub fn raise_info_message(&self, message: &AseInfoMessage) -> usize {
        let handlers = {
            let inner = self.inner();
            if !inner.open {
                return 0;
            }
            inner.info_handlers.clone()
        };

        log::trace!(
            "server message {} (severity {}): {}",
            message.message_number,
            message.severity,
            message.text
        );

        for handler in &handlers {
            handler(message);
        }

        handlers.len()
    }
}

impl ClientConnection for AseConnection {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "AseConnection"
    }

    fn connection_string(&self) -> String {
        self.inner().options.redacted_url()
    }

    fn is_open(&self) -> bool {
        self.inner().open
    }

    fn close(&self) {
        let mut inner = self.inner();
        if inner.open {
            log::debug!("closing ASE connection to {}", inner.options.redacted_url());
            inner.open = false;
            // Subscriptions never outlive the connection they were made on.
            inner.info_handlers.clear();
        }
    }
}

impl Debug for AseConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let inner = self.inner();
        f.debug_struct("AseConnection")
            .field("url", &inner.options.redacted_url())
            .field("open", &inner.open)
            .field("info_handlers", &inner.info_handlers.len())
            .finish()
    }
}

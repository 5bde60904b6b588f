use std::any::Any;
use std::fmt::Debug;

use crate::error::Result;

/// Represents how a command string handed to an executor should be
/// interpreted by the data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandMode {
    /// The command is a plain SQL text statement.
    #[default]
    Text,

    /// The command is the name of a stored procedure.
    StoredProcedure,

    /// The command is the name of a table to read directly.
    TableDirect,
}

/// A live (or lazily-opened) database connection owned by an executor.
///
/// Vendor drivers implement this for their connection handle; the handle is
/// expected to be cheap to share and to serialize its own lifecycle
/// transitions internally. Query execution is not part of this trait; it
/// belongs to the driver layer.
pub trait ClientConnection: Send + Sync + Debug {
    /// Upcast to [`Any`] so that vendor clients can recover their concrete
    /// connection type with a checked downcast.
    fn as_any(&self) -> &dyn Any;

    /// The concrete type name, used in
    /// [`Error::TypeMismatch`][crate::error::Error::TypeMismatch] reports.
    fn type_name(&self) -> &'static str;

    /// A displayable form of the connection string this connection was
    /// configured from, with credentials redacted.
    fn connection_string(&self) -> String;

    /// Whether the connection is currently open.
    fn is_open(&self) -> bool;

    /// Close the connection. Closing an already-closed connection is a
    /// no-op.
    fn close(&self);
}

/// Produces vendor-specific connections from a connection string.
///
/// Vendor clients fix a default factory; callers may supply their own to
/// substitute a test double or an alternative driver build.
pub trait ConnectionFactory: Send + Sync {
    fn create_connection(&self, connection_string: &str) -> Result<Box<dyn ClientConnection>>;
}

/// The generic executor seam: owns exactly one connection and a command
/// interpretation mode.
///
/// The executor never closes its connection implicitly; connection lifetime
/// stays caller-controlled. Everything beyond these two accessors (statement
/// preparation, execution, result materialization) is owned by the driver
/// layer and is deliberately absent here.
pub trait SqlExecutor: Send + Sync + Debug {
    /// The connection this executor runs commands against.
    fn connection(&self) -> &dyn ClientConnection;

    /// How command strings handed to this executor are interpreted.
    fn command_mode(&self) -> CommandMode;
}

/// The default [`SqlExecutor`] implementation.
#[derive(Debug)]
pub struct Executor {
    connection: Box<dyn ClientConnection>,
    mode: CommandMode,
}

impl Executor {
    /// Build an executor by asking `factory` to create a connection for
    /// `connection_string`.
    ///
    /// Fails with [`Error::Configuration`][crate::error::Error::Configuration]
    /// when the factory rejects the connection string.
    pub fn from_connection_string(
        connection_string: &str,
        factory: &dyn ConnectionFactory,
        mode: CommandMode,
    ) -> Result<Self> {
        let connection = factory.create_connection(connection_string)?;
        Ok(Self { connection, mode })
    }

    /// Build an executor around an existing connection. No new connection
    /// is created.
    pub fn from_connection(connection: Box<dyn ClientConnection>, mode: CommandMode) -> Self {
        Self { connection, mode }
    }
}

impl SqlExecutor for Executor {
    fn connection(&self) -> &dyn ClientConnection {
        &*self.connection
    }

    fn command_mode(&self) -> CommandMode {
        self.mode
    }
}

use std::sync::Arc;

use crate::ase::connection::AseConnection;
use crate::ase::factory::AseClientFactory;
use crate::ase::message::InfoMessageHandler;
use crate::error::{Error, Result};
use crate::executor::{CommandMode, ConnectionFactory, Executor, SqlExecutor};

/// A client specialized for querying an ASE database.
///
/// The client binds the generic [`SqlExecutor`] seam to the ASE driver: it
/// fixes [`AseClientFactory`] as the connection source and re-exposes the
/// one capability that is ASE-specific in shape, subscribing to server
/// informational messages.
///
/// All query execution goes through the wrapped executor; the client adds
/// no execution behavior of its own.
#[derive(Debug)]
pub struct AseClient {
    executor: Box<dyn SqlExecutor>,
}

impl AseClient {
    /// Start configuring a client. See [`AseClientBuilder`] for the
    /// available construction modes.
    pub fn builder() -> AseClientBuilder {
        AseClientBuilder::new()
    }

    /// Build a client from a connection string, using the default factory
    /// and [`CommandMode::Text`].
    pub fn connect(connection_string: &str) -> Result<Self> {
        Self::builder().connection_string(connection_string).build()
    }

    /// Build a client around an existing connection. The connection is
    /// wrapped as-is; `self.connection()` returns this same handle.
    pub fn from_connection(connection: AseConnection) -> Self {
        Self {
            executor: Box::new(Executor::from_connection(
                Box::new(connection),
                CommandMode::default(),
            )),
        }
    }

    /// The executor this client runs commands through.
    pub fn executor(&self) -> &dyn SqlExecutor {
        &*self.executor
    }

    /// The ASE connection owned by the executor.
    ///
    /// Fails with [`Error::TypeMismatch`] when the client was built over an
    /// executor whose connection is not an [`AseConnection`]; that is only
    /// possible through [`AseClientBuilder::executor`].
    pub fn connection(&self) -> Result<AseConnection> {
        let connection = self.executor.connection();

        connection
            .as_any()
            .downcast_ref::<AseConnection>()
            .cloned()
            .ok_or_else(|| Error::TypeMismatch {
                expected: "AseConnection",
                actual: connection.type_name(),
            })
    }

    /// Register `handler` for any message or warning sent by the database.
    ///
    /// The registration mutates the connection's subscriber list under the
    /// connection's own lock, so it serializes against other subscription
    /// changes and against connection teardown. The lock is blocking and
    /// untimed; a handler-registration path that never returns will stall
    /// every other caller of that connection.
    ///
    /// Registering the same handler twice yields two deliveries per
    /// message.
    pub fn subscribe(&self, handler: InfoMessageHandler) -> Result<()> {
        self.connection()?.add_info_handler(handler);
        Ok(())
    }

    /// Remove one registration of `handler` from the delivery set.
    ///
    /// Unsubscribing a handler that was never registered is a no-op.
    pub fn unsubscribe(&self, handler: &InfoMessageHandler) -> Result<()> {
        self.connection()?.remove_info_handler(handler);
        Ok(())
    }
}

/// Configures and builds an [`AseClient`].
///
/// Exactly one connection source must be supplied:
///
/// - [`connection_string`][Self::connection_string], optionally combined
///   with [`factory`][Self::factory] and
///   [`command_mode`][Self::command_mode];
/// - [`connection`][Self::connection], optionally combined with
///   [`command_mode`][Self::command_mode];
/// - [`executor`][Self::executor], which is wrapped as-is and combines
///   with nothing else.
///
/// Conflicting or missing sources fail [`build`][Self::build] with
/// [`Error::Configuration`].
pub struct AseClientBuilder {
    connection_string: Option<String>,
    command_mode: CommandMode,
    factory: Option<Arc<dyn ConnectionFactory>>,
    connection: Option<AseConnection>,
    executor: Option<Box<dyn SqlExecutor>>,
}

impl AseClientBuilder {
    fn new() -> Self {
        Self {
            connection_string: None,
            command_mode: CommandMode::default(),
            factory: None,
            connection: None,
            executor: None,
        }
    }

    /// Create a fresh connection from `connection_string` at build time.
    pub fn connection_string(mut self, connection_string: &str) -> Self {
        self.connection_string = Some(connection_string.to_owned());
        self
    }

    /// How command strings handed to the executor are interpreted.
    /// Defaults to [`CommandMode::Text`].
    pub fn command_mode(mut self, mode: CommandMode) -> Self {
        self.command_mode = mode;
        self
    }

    /// Use `factory` instead of [`AseClientFactory`] to create the
    /// connection. Only meaningful together with a connection string.
    pub fn factory(mut self, factory: Arc<dyn ConnectionFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Wrap an existing connection; no new connection is created.
    pub fn connection(mut self, connection: AseConnection) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Wrap an already-configured executor as-is.
    ///
    /// The executor's connection is only checked for the ASE connection
    /// type when it is first accessed, not here.
    pub fn executor(mut self, executor: Box<dyn SqlExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn build(self) -> Result<AseClient> {
        if let Some(executor) = self.executor {
            if self.connection_string.is_some()
                || self.connection.is_some()
                || self.factory.is_some()
            {
                return Err(Error::config(BuilderConflict(
                    "an executor cannot be combined with another connection source",
                )));
            }

            return Ok(AseClient { executor });
        }

        if let Some(connection) = self.connection {
            if self.connection_string.is_some() {
                return Err(Error::config(BuilderConflict(
                    "a connection cannot be combined with a connection string",
                )));
            }
            if self.factory.is_some() {
                return Err(Error::config(BuilderConflict(
                    "a factory is only used when connecting from a connection string",
                )));
            }

            return Ok(AseClient {
                executor: Box::new(Executor::from_connection(
                    Box::new(connection),
                    self.command_mode,
                )),
            });
        }

        if let Some(connection_string) = self.connection_string {
            let default_factory;
            let factory: &dyn ConnectionFactory = match &self.factory {
                Some(factory) => &**factory,
                None => {
                    default_factory = AseClientFactory;
                    &default_factory
                }
            };

            let executor =
                Executor::from_connection_string(&connection_string, factory, self.command_mode)?;

            return Ok(AseClient {
                executor: Box::new(executor),
            });
        }

        Err(Error::config(BuilderConflict(
            "no connection source configured; supply a connection string, connection, or executor",
        )))
    }
}

#[derive(Debug)]
struct BuilderConflict(&'static str);

impl std::fmt::Display for BuilderConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for BuilderConflict {}

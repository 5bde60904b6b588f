use std::str::FromStr;

use crate::ase::connection::AseConnection;
use crate::ase::options::AseConnectOptions;
use crate::error::Result;
use crate::executor::{ClientConnection, ConnectionFactory};

/// The default [`ConnectionFactory`] for ASE.
///
/// Parses the connection string as [`AseConnectOptions`] and builds an
/// [`AseConnection`] handle from it. [`AseClient`][crate::AseClient] uses
/// this factory unless the caller supplies another one.
#[derive(Debug, Default, Clone, Copy)]
pub struct AseClientFactory;

impl ConnectionFactory for AseClientFactory {
    fn create_connection(&self, connection_string: &str) -> Result<Box<dyn ClientConnection>> {
        let options = AseConnectOptions::from_str(connection_string)?;
        let connection = AseConnection::establish(&options)?;

        Ok(Box::new(connection))
    }
}

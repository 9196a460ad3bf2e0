//! Named connections opened on demand and shared afterwards.

use crate::client::Executor;
use crate::config::{DatabaseConfig, ManagerConfig};
use crate::connection::Connection;
use crate::error::{OrmError, OrmResult};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

/// Opens an executor for a connection config (a driver pool, a client, ...).
pub trait Connector: Send + Sync {
    type Executor: Executor;

    fn connect(
        &self,
        config: &DatabaseConfig,
    ) -> impl Future<Output = OrmResult<Self::Executor>> + Send;
}

/// Registry of named connections.
///
/// Each name is opened once through the [`Connector`]; later lookups return
/// the same [`Connection`].
pub struct Manager<C: Connector> {
    config: ManagerConfig,
    connector: C,
    connections: Mutex<HashMap<String, Arc<Connection<C::Executor>>>>,
}

impl<C: Connector> Manager<C> {
    pub fn new(config: ManagerConfig, connector: C) -> Self {
        Self {
            config,
            connector,
            connections: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// The connection registered under `name`, opening it on first use.
    ///
    /// A failure from the [`Connector`] is reported as
    /// [`OrmError::Connection`] and nothing is cached.
    pub async fn connection(&self, name: &str) -> OrmResult<Arc<Connection<C::Executor>>> {
        if let Some(conn) = self.cached(name) {
            return Ok(conn);
        }

        let config = self.config.get(name)?;
        let executor = self.connector.connect(config).await.map_err(|err| {
            tracing::warn!(
                target: "fluorm.manager",
                connection = name,
                error = %err,
                "failed to open connection"
            );
            match err {
                OrmError::Connection(_) => err,
                other => OrmError::connection(format!("`{name}`: {other}")),
            }
        })?;
        let conn = Arc::new(Connection::from_config(executor, config)?);
        tracing::debug!(
            target: "fluorm.manager",
            connection = name,
            driver = %config.driver,
            "opened connection"
        );

        // A concurrent caller may have opened the same name; keep the first.
        let mut connections = self.lock();
        Ok(Arc::clone(
            connections.entry(name.to_string()).or_insert(conn),
        ))
    }

    /// The default connection.
    pub async fn default_connection(&self) -> OrmResult<Arc<Connection<C::Executor>>> {
        self.connection(&self.config.default).await
    }

    /// Forget a cached connection. It closes once its last user drops it.
    pub fn disconnect(&self, name: &str) -> bool {
        self.lock().remove(name).is_some()
    }

    /// Names of the currently open connections.
    pub fn open_connections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn cached(&self, name: &str) -> Option<Arc<Connection<C::Executor>>> {
        self.lock().get(name).cloned()
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Connection<C::Executor>>>> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

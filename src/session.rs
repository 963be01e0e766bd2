//! SNMP session seam.
//!
//! The device facade never talks to the network directly. It asks a
//! [`Connector`] for an [`SnmpSession`] and issues GET and walk requests
//! through it. [`UdpConnector`] is the production implementation on top of
//! the `async-snmp` client; tests substitute an in-process agent.
//!
//! Both traits return [`BoxFuture`] so they stay dyn-compatible and can be
//! held as `Arc<dyn ...>`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_snmp::client::Retry;
use async_snmp::{Auth, Client, Oid, Value, VarBind};

use crate::config::DeviceConfig;
use crate::error::{Error, QueryErrorKind, Result};
use crate::version::Version;

/// Type alias for boxed async return type (dyn-compatible).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// An open session with one agent.
pub trait SnmpSession: Send + Sync {
    /// Fetch a single OID.
    ///
    /// Exception values (noSuchObject and friends) are returned as values;
    /// use [`check_exception`] to turn them into errors.
    fn get<'a>(&'a self, oid: &'a Oid) -> BoxFuture<'a, Result<Value>>;

    /// Fetch every varbind under `prefix`, in OID order.
    fn walk<'a>(&'a self, prefix: &'a Oid) -> BoxFuture<'a, Result<Vec<VarBind>>>;
}

/// Opens sessions for a device configuration.
pub trait Connector: Send + Sync {
    /// Open a session.
    ///
    /// Must fail with [`Error::Connection`] if no session can be built.
    fn connect<'a>(&'a self, config: &'a DeviceConfig)
    -> BoxFuture<'a, Result<Arc<dyn SnmpSession>>>;
}

/// Turn an exception value into a query error.
pub fn check_exception(oid: &Oid, value: Value) -> Result<Value> {
    let name = match value {
        Value::NoSuchObject => "noSuchObject",
        Value::NoSuchInstance => "noSuchInstance",
        Value::EndOfMibView => "endOfMibView",
        other => return Ok(other),
    };
    Err(Error::query(oid.clone(), QueryErrorKind::Exception(name)))
}

/// Connector backed by an `async-snmp` UDP client.
///
/// Retries are disabled; every request waits at most the configured timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdpConnector;

impl Connector for UdpConnector {
    fn connect<'a>(
        &'a self,
        config: &'a DeviceConfig,
    ) -> BoxFuture<'a, Result<Arc<dyn SnmpSession>>> {
        Box::pin(async move {
            let target = config.target();
            let community = config.community();

            let auth = match config.version() {
                Version::V1 => Auth::v1(community),
                Version::V2c => Auth::v2c(community),
            };
            let client = Client::builder(target.clone(), auth)
                .timeout(config.request_timeout())
                .retry(Retry::none())
                .connect()
                .await
                .map_err(|e| Error::connection(target.clone(), e))?;

            tracing::debug!(target: "snmp_device::session", { target = %target, version = %config.version() }, "session opened");

            Ok(Arc::new(ClientSession { client }) as Arc<dyn SnmpSession>)
        })
    }
}

/// [`SnmpSession`] over an `async-snmp` client.
struct ClientSession {
    client: Client,
}

impl SnmpSession for ClientSession {
    fn get<'a>(&'a self, oid: &'a Oid) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            tracing::trace!(target: "snmp_device::session", { oid = %oid }, "get");
            let vb = self
                .client
                .get(oid)
                .await
                .map_err(|e| Error::query(oid.clone(), e))?;
            Ok(vb.value)
        })
    }

    fn walk<'a>(&'a self, prefix: &'a Oid) -> BoxFuture<'a, Result<Vec<VarBind>>> {
        Box::pin(async move {
            tracing::trace!(target: "snmp_device::session", { prefix = %prefix }, "walk");
            // GETNEXT keeps v1 and v2c agents on the same request path.
            let results = self
                .client
                .walk_getnext(prefix.clone())
                .collect()
                .await
                .map_err(|e| Error::query(prefix.clone(), e))?;
            tracing::trace!(target: "snmp_device::session", { prefix = %prefix, count = results.len() }, "walk complete");
            Ok(results)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn oid() -> Oid {
        Oid::from_slice(&[1, 3, 6, 1, 2, 1, 1, 5, 0])
    }

    #[test]
    fn test_check_exception_passes_data() {
        let value = Value::OctetString(Bytes::from_static(b"router"));
        assert_eq!(check_exception(&oid(), value.clone()).unwrap(), value);
    }

    #[test]
    fn test_check_exception_rejects_exceptions() {
        for (value, name) in [
            (Value::NoSuchObject, "noSuchObject"),
            (Value::NoSuchInstance, "noSuchInstance"),
            (Value::EndOfMibView, "endOfMibView"),
        ] {
            let err = check_exception(&oid(), value).unwrap_err();
            assert!(matches!(err, Error::Query { .. }));
            assert!(err.to_string().ends_with(&format!("agent returned {}", name)));
        }
    }

    #[tokio::test]
    async fn test_unanswered_get_is_query_error() {
        // Nothing listens on this port; the request either times out or
        // gets a port-unreachable error.
        let config = DeviceConfig::new("127.0.0.1", "public", 1, 2)
            .timeout(std::time::Duration::from_millis(100));
        let session = UdpConnector.connect(&config).await.unwrap();

        let err = session.get(&oid()).await.unwrap_err();
        assert!(matches!(err, Error::Query { .. }));
        assert_eq!(err.oid(), Some(&oid()));
    }

    #[tokio::test]
    async fn test_unanswered_walk_is_query_error_on_prefix() {
        let config = DeviceConfig::new("127.0.0.1", "public", 1, 1)
            .timeout(std::time::Duration::from_millis(100));
        let session = UdpConnector.connect(&config).await.unwrap();
        let prefix = Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, 1]);

        let err = session.walk(&prefix).await.unwrap_err();
        assert!(matches!(err, Error::Query { .. }));
        assert_eq!(err.oid(), Some(&prefix));
    }
}

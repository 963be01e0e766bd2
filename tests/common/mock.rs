//! In-process SNMP agent for device tests.
//!
//! `MockAgent` implements both [`Connector`] and [`SnmpSession`] over an
//! in-memory MIB, counts every request, and can be told to drop requests,
//! refuse sessions, or answer slowly.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_snmp::{Oid, Value, VarBind};
use snmp_device::{BoxFuture, Connector, DeviceConfig, Error, Result, SnmpSession};

#[derive(Default)]
struct State {
    mib: Mutex<BTreeMap<Oid, Value>>,
    requests: Mutex<Vec<Oid>>,
    lost: Mutex<BTreeSet<Oid>>,
    unreachable: AtomicBool,
    refuse_connect: AtomicBool,
    delay: Mutex<Option<Duration>>,
    sessions: AtomicUsize,
}

/// Cloneable handle to an in-memory agent.
#[derive(Clone, Default)]
pub struct MockAgent {
    state: Arc<State>,
}

impl MockAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace a value.
    pub fn set(&self, oid: Oid, value: Value) {
        self.state.mib.lock().unwrap().insert(oid, value);
    }

    /// Remove a value; GETs for it answer noSuchInstance.
    pub fn remove(&self, oid: &Oid) {
        self.state.mib.lock().unwrap().remove(oid);
    }

    /// Drop every request for `oid` as if it timed out.
    pub fn lose(&self, oid: Oid) {
        self.state.lost.lock().unwrap().insert(oid);
    }

    /// Drop every request.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Fail session construction.
    pub fn refuse_connect(&self, refuse: bool) {
        self.state.refuse_connect.store(refuse, Ordering::SeqCst);
    }

    /// Delay every GET by `delay`.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.state.delay.lock().unwrap() = delay;
    }

    /// Total requests received (a walk counts once).
    pub fn requests(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Requests received for one OID.
    pub fn requests_for(&self, oid: &Oid) -> usize {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|o| *o == oid)
            .count()
    }

    /// Sessions opened through this agent.
    pub fn sessions(&self) -> usize {
        self.state.sessions.load(Ordering::SeqCst)
    }

    /// Connector handle for [`snmp_device::Device::with_connector`].
    pub fn connector(&self) -> Arc<dyn Connector> {
        Arc::new(self.clone())
    }

    fn record(&self, oid: &Oid) -> Result<()> {
        self.state.requests.lock().unwrap().push(oid.clone());
        if self.state.unreachable.load(Ordering::SeqCst)
            || self.state.lost.lock().unwrap().contains(oid)
        {
            return Err(Error::query(oid.clone(), "request timed out"));
        }
        Ok(())
    }
}

impl SnmpSession for MockAgent {
    fn get<'a>(&'a self, oid: &'a Oid) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            self.record(oid)?;
            let delay = *self.state.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let mib = self.state.mib.lock().unwrap();
            Ok(mib.get(oid).cloned().unwrap_or(Value::NoSuchInstance))
        })
    }

    fn walk<'a>(&'a self, prefix: &'a Oid) -> BoxFuture<'a, Result<Vec<VarBind>>> {
        Box::pin(async move {
            self.record(prefix)?;
            let mib = self.state.mib.lock().unwrap();
            Ok(mib
                .iter()
                .filter(|(oid, _)| *oid != prefix && oid.starts_with(prefix))
                .map(|(oid, value)| VarBind::new(oid.clone(), value.clone()))
                .collect())
        })
    }
}

impl Connector for MockAgent {
    fn connect<'a>(
        &'a self,
        config: &'a DeviceConfig,
    ) -> BoxFuture<'a, Result<Arc<dyn SnmpSession>>> {
        Box::pin(async move {
            if self.state.refuse_connect.load(Ordering::SeqCst) {
                return Err(Error::connection(config.target(), "connection refused"));
            }
            self.state.sessions.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(self.clone()) as Arc<dyn SnmpSession>)
        })
    }
}

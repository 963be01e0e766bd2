//! Device facade.
//!
//! A [`Device`] owns one configuration and at most one session. Device-wide
//! attributes are fetched in bulk by [`Device::populate`] into an immutable
//! [`DeviceSnapshot`]; interface attributes are fetched on demand.
//!
//! # Example
//!
//! ```rust,no_run
//! use snmp_device::{Device, DeviceConfig, InterfaceAttribute};
//!
//! # async fn example() -> snmp_device::Result<()> {
//! let mut device = Device::new(DeviceConfig::new("192.168.1.1", "public", 161, 2));
//! device.connect().await?;
//!
//! println!("{} is up for {:?}", device.name(), device.uptime());
//! for port in device.indexes() {
//!     let status = device
//!         .interface_attribute(port, InterfaceAttribute::OperStatus)
//!         .await?;
//!     println!("{}: {}", port, status);
//! }
//! device.disconnect();
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_snmp::{Oid, Value};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::DeviceConfig;
use crate::decode::{self, AttributeValue, MacDelimiter};
use crate::error::{DecodeErrorKind, Error, Result, ValidationErrorKind};
use crate::oids::{InterfaceAttribute, SystemAttribute, ValueKind, if_index};
use crate::session::{Connector, SnmpSession, UdpConnector, check_exception};
use crate::tables::IF_TYPES;

/// Device-wide attributes captured by one populate pass.
///
/// Fields that could not be fetched are left empty or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSnapshot {
    name: String,
    description: String,
    contact: String,
    location: String,
    uptime: Duration,
    interface_count: u64,
    indexes: Vec<u32>,
    types: Vec<&'static str>,
    answered: usize,
    failed: usize,
}

impl DeviceSnapshot {
    /// sysName.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// sysDescr.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// sysContact.
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// sysLocation.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// sysUpTime.
    pub fn uptime(&self) -> Duration {
        self.uptime
    }

    /// ifNumber.
    pub fn interface_count(&self) -> u64 {
        self.interface_count
    }

    /// Interface indexes in walk order.
    pub fn indexes(&self) -> &[u32] {
        &self.indexes
    }

    /// Distinct interface type names, in first-seen order.
    pub fn types(&self) -> &[&'static str] {
        &self.types
    }

    /// Number of requests the agent answered.
    pub fn answered(&self) -> usize {
        self.answered
    }

    /// Number of fields left empty because a request or decode failed.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Check whether `port` is a known interface index.
    pub fn has_interface(&self, port: u32) -> bool {
        self.indexes.contains(&port)
    }

    /// Value of a system attribute.
    pub fn attribute(&self, attr: SystemAttribute) -> AttributeValue {
        match attr {
            SystemAttribute::Description => AttributeValue::Text(self.description.clone()),
            SystemAttribute::Uptime => AttributeValue::Duration(self.uptime),
            SystemAttribute::Contact => AttributeValue::Text(self.contact.clone()),
            SystemAttribute::Name => AttributeValue::Text(self.name.clone()),
            SystemAttribute::Location => AttributeValue::Text(self.location.clone()),
            SystemAttribute::InterfaceCount => AttributeValue::Integer(self.interface_count),
        }
    }
}

/// Request bookkeeping for one populate pass.
#[derive(Default)]
struct Pass {
    answered: usize,
    failed: usize,
}

impl Pass {
    /// Keep the value of a successful fetch, or log and count the failure.
    fn record<T>(&mut self, field: &'static str, result: Result<T>) -> Option<T> {
        match result {
            Ok(v) => {
                self.answered += 1;
                Some(v)
            }
            Err(e) => {
                // A decode failure still means the agent answered.
                if matches!(e, Error::Decode { .. }) {
                    self.answered += 1;
                }
                self.failed += 1;
                tracing::warn!(target: "snmp_device::device", { field, error = %e }, "field left empty");
                None
            }
        }
    }
}

/// State shared between the device and its auto-update task.
struct Shared {
    session: RwLock<Option<Arc<dyn SnmpSession>>>,
    snapshot: RwLock<Arc<DeviceSnapshot>>,
    /// Held for the duration of a populate pass.
    populating: tokio::sync::Mutex<()>,
}

impl Shared {
    fn new() -> Self {
        Self {
            session: RwLock::new(None),
            snapshot: RwLock::new(Arc::new(DeviceSnapshot::default())),
            populating: tokio::sync::Mutex::new(()),
        }
    }

    fn session(&self) -> Option<Arc<dyn SnmpSession>> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_session(&self, session: Option<Arc<dyn SnmpSession>>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn snapshot(&self) -> Arc<DeviceSnapshot> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn publish(&self, snapshot: DeviceSnapshot) -> Arc<DeviceSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);
        snapshot
    }

    /// Run a full pass and publish the result.
    async fn populate(&self) -> Result<Arc<DeviceSnapshot>> {
        let _running = self.populating.lock().await;
        let session = self.session().ok_or(Error::NotConnected)?;
        let snapshot = collect(session.as_ref()).await;
        Ok(self.publish(snapshot))
    }
}

/// Fetch one OID and decode it.
async fn fetch(session: &dyn SnmpSession, oid: &Oid, kind: ValueKind) -> Result<AttributeValue> {
    let value = fetch_raw(session, oid).await?;
    decode::decode(oid, &value, kind)
}

async fn fetch_raw(session: &dyn SnmpSession, oid: &Oid) -> Result<Value> {
    let value = session.get(oid).await?;
    check_exception(oid, value)
}

/// Query every device-wide attribute.
///
/// Individual failures leave their field empty and never abort the pass.
async fn collect(session: &dyn SnmpSession) -> DeviceSnapshot {
    let mut pass = Pass::default();
    let mut snapshot = DeviceSnapshot::default();

    let count = SystemAttribute::InterfaceCount;
    let oid = count.oid();
    let result = fetch_raw(session, &oid)
        .await
        .and_then(|v| decode::decode_integer(&oid, &v));
    snapshot.interface_count = pass.record(count.name(), result).unwrap_or(0);

    if snapshot.interface_count > 0 {
        let column = if_index();
        if let Some(rows) = pass.record("ifIndex", session.walk(&column).await) {
            for vb in rows {
                let index = decode::decode_integer(&vb.oid, &vb.value).and_then(|i| {
                    u32::try_from(i)
                        .ok()
                        .filter(|i| *i > 0)
                        .ok_or_else(|| Error::decode(vb.oid.clone(), DecodeErrorKind::InvalidIndex(i)))
                });
                // The walk itself was already counted as answered.
                match index {
                    Ok(i) if !snapshot.indexes.contains(&i) => snapshot.indexes.push(i),
                    Ok(_) => {}
                    Err(e) => {
                        pass.failed += 1;
                        tracing::warn!(target: "snmp_device::device", { error = %e }, "skipping interface index");
                    }
                }
            }
        }
    }

    let attr = InterfaceAttribute::Type;
    for port in snapshot.indexes.clone() {
        let oid = attr.oid(port);
        let result = fetch_raw(session, &oid)
            .await
            .and_then(|v| decode::decode_label(&oid, &v, IF_TYPES));
        if let Some(label) = pass.record(attr.name(), result)
            && !snapshot.types.contains(&label)
        {
            snapshot.types.push(label);
        }
    }

    for attr in [
        SystemAttribute::Description,
        SystemAttribute::Contact,
        SystemAttribute::Name,
        SystemAttribute::Location,
    ] {
        let text = fetch_raw(session, &attr.oid())
            .await
            .map(|v| decode::decode_text(&v));
        let text = pass.record(attr.name(), text).unwrap_or_default();
        match attr {
            SystemAttribute::Description => snapshot.description = text,
            SystemAttribute::Contact => snapshot.contact = text,
            SystemAttribute::Name => snapshot.name = text,
            _ => snapshot.location = text,
        }
    }

    let attr = SystemAttribute::Uptime;
    let result = fetch(session, &attr.oid(), attr.kind()).await;
    snapshot.uptime = pass
        .record(attr.name(), result)
        .and_then(|v| v.as_duration())
        .unwrap_or_default();

    snapshot.answered = pass.answered;
    snapshot.failed = pass.failed;

    tracing::debug!(target: "snmp_device::device", {
        interfaces = snapshot.indexes.len(),
        answered = snapshot.answered,
        failed = snapshot.failed
    }, "populate finished");

    snapshot
}

/// Background auto-update task.
struct AutoUpdate {
    cancel: CancellationToken,
    task: JoinHandle<()>,
    interval: Duration,
}

impl AutoUpdate {
    fn start(handle: &Handle, shared: Arc<Shared>, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let Ok(_running) = shared.populating.try_lock() else {
                    tracing::debug!(target: "snmp_device::device", "populate still running, skipping tick");
                    continue;
                };
                let Some(session) = shared.session() else {
                    tracing::warn!(target: "snmp_device::device", "auto-update tick without a session");
                    continue;
                };
                shared.publish(collect(session.as_ref()).await);
            }

            tracing::debug!(target: "snmp_device::device", "auto-update stopped");
        });

        Self {
            cancel,
            task,
            interval,
        }
    }

    fn stop(self) {
        self.cancel.cancel();
        // The task exits at its next select; nothing to wait for.
        drop(self.task);
    }
}

/// An SNMP-managed network device.
pub struct Device {
    config: DeviceConfig,
    connector: Arc<dyn Connector>,
    shared: Arc<Shared>,
    auto_update: Option<AutoUpdate>,
}

impl Device {
    /// Create a device that connects over UDP.
    pub fn new(config: DeviceConfig) -> Self {
        Self::with_connector(config, Arc::new(UdpConnector))
    }

    /// Create a device with a custom session connector.
    pub fn with_connector(config: DeviceConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            config,
            connector,
            shared: Arc::new(Shared::new()),
            auto_update: None,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Mutable configuration. Changes apply from the next [`connect`](Self::connect).
    pub fn config_mut(&mut self) -> &mut DeviceConfig {
        &mut self.config
    }

    /// Replace the connection settings, substituting defaults for invalid fields.
    ///
    /// Timeout and update interval are kept. Returns the rejected values.
    /// Changes apply from the next [`connect`](Self::connect).
    pub fn configure(
        &mut self,
        address: &str,
        community: &str,
        port: u32,
        version: u8,
    ) -> Vec<ValidationErrorKind> {
        let (config, rejected) = DeviceConfig::resolve(address, community, port, version);
        self.config = config
            .timeout(self.config.request_timeout())
            .update_interval(self.config.interval());
        rejected
    }

    /// Check whether a session is open.
    pub fn is_connected(&self) -> bool {
        self.shared.session().is_some()
    }

    /// Open a session and populate the device attributes.
    ///
    /// Fails with [`Error::Connection`] if the session cannot be opened or the
    /// agent answers none of the populate requests. On failure any previous
    /// session is closed and the last snapshot is kept.
    pub async fn connect(&self) -> Result<Arc<DeviceSnapshot>> {
        let target = self.config.target();
        tracing::debug!(target: "snmp_device::device", { target = %target }, "connecting");

        self.shared.set_session(None);
        let session = self.connector.connect(&self.config).await?;

        let _running = self.shared.populating.lock().await;
        let snapshot = collect(session.as_ref()).await;
        if snapshot.answered == 0 {
            return Err(Error::connection(target, "agent did not answer any request"));
        }

        self.shared.set_session(Some(session));
        tracing::debug!(target: "snmp_device::device", { target = %target, name = %snapshot.name }, "connected");
        Ok(self.shared.publish(snapshot))
    }

    /// Stop auto-update and close the session. Idempotent.
    pub fn disconnect(&mut self) {
        if let Some(auto) = self.auto_update.take() {
            auto.stop();
        }
        if self.is_connected() {
            tracing::debug!(target: "snmp_device::device", { target = %self.config.target() }, "disconnected");
        }
        self.shared.set_session(None);
    }

    /// Refresh every device-wide attribute and return the new snapshot.
    pub async fn populate(&self) -> Result<Arc<DeviceSnapshot>> {
        self.shared.populate().await
    }

    /// Most recent snapshot.
    pub fn snapshot(&self) -> Arc<DeviceSnapshot> {
        self.shared.snapshot()
    }

    /// Cached value of a system attribute. Never queries the agent.
    pub fn system_attribute(&self, attr: SystemAttribute) -> AttributeValue {
        self.snapshot().attribute(attr)
    }

    /// sysName.
    pub fn name(&self) -> String {
        self.snapshot().name.clone()
    }

    /// sysDescr.
    pub fn description(&self) -> String {
        self.snapshot().description.clone()
    }

    /// sysContact.
    pub fn contact(&self) -> String {
        self.snapshot().contact.clone()
    }

    /// sysLocation.
    pub fn location(&self) -> String {
        self.snapshot().location.clone()
    }

    /// sysUpTime.
    pub fn uptime(&self) -> Duration {
        self.snapshot().uptime
    }

    /// ifNumber.
    pub fn interface_count(&self) -> u64 {
        self.snapshot().interface_count
    }

    /// Interface indexes.
    pub fn indexes(&self) -> Vec<u32> {
        self.snapshot().indexes.clone()
    }

    /// Distinct interface type names.
    pub fn types(&self) -> Vec<&'static str> {
        self.snapshot().types.clone()
    }

    /// Fetch one attribute of one interface.
    pub async fn interface_attribute(
        &self,
        port: u32,
        attr: InterfaceAttribute,
    ) -> Result<AttributeValue> {
        let session = self.interface_session(port)?;
        fetch(session.as_ref(), &attr.oid(port), attr.kind()).await
    }

    /// Fetch an interface's physical address, grouped with `delimiter`.
    ///
    /// `delimiter` must be `:`, `-` or `.`.
    pub async fn phys_address(&self, port: u32, delimiter: char) -> Result<String> {
        let delimiter = MacDelimiter::try_from(delimiter)?;
        let session = self.interface_session(port)?;
        let oid = InterfaceAttribute::PhysAddress.oid(port);
        let value = fetch_raw(session.as_ref(), &oid).await?;
        decode::decode_phys_address(&oid, &value, delimiter)
    }

    fn interface_session(&self, port: u32) -> Result<Arc<dyn SnmpSession>> {
        let session = self.shared.session().ok_or(Error::NotConnected)?;
        if !self.snapshot().has_interface(port) {
            return Err(Error::UnknownInterface { port });
        }
        Ok(session)
    }

    /// Enable or disable periodic populate.
    ///
    /// `interval` defaults to the configured update interval. The first
    /// refresh happens one interval after enabling. Enabling again replaces
    /// the running task. Must be called within a tokio runtime.
    pub fn set_auto_update(&mut self, enabled: bool, interval: Option<Duration>) -> Result<()> {
        if let Some(interval) = interval {
            self.config.set_update_interval(interval)?;
        }

        if let Some(auto) = self.auto_update.take() {
            auto.stop();
        }
        if !enabled {
            tracing::debug!(target: "snmp_device::device", "auto-update disabled");
            return Ok(());
        }

        let handle = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let interval = self.config.interval();
        self.auto_update = Some(AutoUpdate::start(&handle, Arc::clone(&self.shared), interval));

        tracing::debug!(target: "snmp_device::device", { interval_secs = interval.as_secs_f64() }, "auto-update enabled");
        Ok(())
    }

    /// Active auto-update interval, if enabled.
    pub fn auto_update(&self) -> Option<Duration> {
        self.auto_update.as_ref().map(|a| a.interval)
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if let Some(auto) = self.auto_update.take() {
            auto.stop();
        }
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .field("auto_update", &self.auto_update())
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{:<15}{}", "Name:", self.snapshot().name)?;
        writeln!(f, "{:<15}{}", "Address:", self.config.address())?;
        writeln!(f, "{:<15}{}", "Port:", self.config.port())?;
        writeln!(f, "{:<15}{}", "Community:", self.config.community())?;
        writeln!(f, "{:<15}{}", "Version:", self.config.version().as_number())
    }
}

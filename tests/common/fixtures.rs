//! Common test fixtures and constants.

use async_snmp::{Oid, Value, oid};
use bytes::Bytes;

use super::MockAgent;

// =============================================================================
// Standard system MIB OIDs (1.3.6.1.2.1.1.*)
// =============================================================================

pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}
pub fn sys_contact() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 4, 0)
}
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}
pub fn sys_location() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 6, 0)
}
pub fn if_number() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 1, 0)
}

/// ifTable column instance: 1.3.6.1.2.1.2.2.1.<column>.<index>
pub fn if_entry(column: u32, index: u32) -> Oid {
    Oid::from_slice(&[1, 3, 6, 1, 2, 1, 2, 2, 1, column, index])
}

/// ifXTable column instance: 1.3.6.1.2.1.31.1.1.1.<column>.<index>
pub fn if_x_entry(column: u32, index: u32) -> Oid {
    Oid::from_slice(&[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, column, index])
}

// =============================================================================
// Sample device
// =============================================================================

pub const SYS_DESCR: &str = "Cisco IOS Software, C2960 Software, Version 15.0(2)SE11";
pub const SYS_CONTACT: &str = "noc@example.net";
pub const SYS_NAME: &str = "access-sw3";
pub const SYS_LOCATION: &str = "Building 2, Rack 14";
/// 3 days, 0:58:00.50
pub const SYS_UPTIME_TICKS: u32 = 26_268_050;

pub const MAC_PORT_1: [u8; 6] = [0xD4, 0xCA, 0x6D, 0x68, 0xE7, 0x6E];
pub const MAC_PORT_2: [u8; 6] = [0x00, 0x1B, 0x54, 0xC2, 0x0A, 0x01];

/// Number of requests one populate pass issues against [`sample_agent`].
///
/// ifNumber, ifIndex walk, three ifType gets, five system scalars.
pub const POPULATE_REQUESTS: usize = 10;

fn text(s: &str) -> Value {
    Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
}

/// A switch with two Ethernet ports and a loopback.
pub fn sample_agent() -> MockAgent {
    let agent = MockAgent::new();

    agent.set(sys_descr(), text(SYS_DESCR));
    agent.set(sys_uptime(), Value::TimeTicks(SYS_UPTIME_TICKS));
    agent.set(sys_contact(), text(SYS_CONTACT));
    agent.set(sys_name(), text(SYS_NAME));
    agent.set(sys_location(), text(SYS_LOCATION));
    agent.set(if_number(), Value::Integer(3));

    let ports: [(u32, &str, i32, u32, &[u8], i32); 3] = [
        (1, "GigabitEthernet0/1", 6, 1_000_000_000, &MAC_PORT_1, 1),
        (2, "GigabitEthernet0/2", 6, 100_000_000, &MAC_PORT_2, 2),
        (3, "Loopback0", 24, 8_000_000, &[], 1),
    ];

    for (index, descr, if_type, speed, mac, oper) in ports {
        agent.set(if_entry(1, index), Value::Integer(index as i32));
        agent.set(if_entry(2, index), text(descr));
        agent.set(if_entry(3, index), Value::Integer(if_type));
        agent.set(if_entry(4, index), Value::Integer(1500));
        agent.set(if_entry(5, index), Value::Gauge32(speed));
        agent.set(
            if_entry(6, index),
            Value::OctetString(Bytes::copy_from_slice(mac)),
        );
        agent.set(if_entry(7, index), Value::Integer(1));
        agent.set(if_entry(8, index), Value::Integer(oper));
        agent.set(if_entry(9, index), Value::TimeTicks(4_200));
        agent.set(if_entry(10, index), Value::Counter32(1_234_567 * index));
        agent.set(if_entry(14, index), Value::Counter32(0));
        agent.set(if_entry(16, index), Value::Counter32(7_654_321 * index));
        agent.set(if_entry(20, index), Value::Counter32(index));
        agent.set(if_x_entry(2, index), Value::Counter64(5_000_000_000));
        agent.set(if_x_entry(3, index), Value::Counter64(42));
    }

    agent
}

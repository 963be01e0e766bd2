//! Static OID table and attribute kinds.
//!
//! Every attribute the facade can read is named by a variant of
//! [`SystemAttribute`] or [`InterfaceAttribute`]. Each variant knows its OID
//! and how its response is decoded, so adding an attribute is one table row
//! rather than one more accessor method.

use async_snmp::Oid;

/// How a raw response is turned into an [`AttributeValue`](crate::AttributeValue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Free-form text.
    Text,
    /// Unsigned integer (counters, gauges, MTU).
    Integer,
    /// Hundredths of a second, decoded to a duration.
    TimeTicks,
    /// ifType code, looked up in the interface type table.
    InterfaceType,
    /// ifAdminStatus code.
    AdminStatus,
    /// ifOperStatus code.
    OperStatus,
    /// Octet string rendered as a hardware address.
    PhysAddress,
    /// Bits per second, reported in Mbit/s.
    Speed,
}

// SNMPv2-MIB::system
const SYSTEM: [u32; 7] = [1, 3, 6, 1, 2, 1, 1];
// IF-MIB::interfaces
const INTERFACES: [u32; 7] = [1, 3, 6, 1, 2, 1, 2];
// IF-MIB::ifEntry
const IF_ENTRY: [u32; 9] = [1, 3, 6, 1, 2, 1, 2, 2, 1];
// IF-MIB::ifXEntry
const IF_X_ENTRY: [u32; 10] = [1, 3, 6, 1, 2, 1, 31, 1, 1, 1];

/// Device-wide scalar attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemAttribute {
    /// sysDescr.0
    Description,
    /// sysUpTime.0
    Uptime,
    /// sysContact.0
    Contact,
    /// sysName.0
    Name,
    /// sysLocation.0
    Location,
    /// ifNumber.0
    InterfaceCount,
}

impl SystemAttribute {
    /// All system attributes in table order.
    pub const ALL: [SystemAttribute; 6] = [
        SystemAttribute::Description,
        SystemAttribute::Uptime,
        SystemAttribute::Contact,
        SystemAttribute::Name,
        SystemAttribute::Location,
        SystemAttribute::InterfaceCount,
    ];

    /// MIB object name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Description => "sysDescr",
            Self::Uptime => "sysUpTime",
            Self::Contact => "sysContact",
            Self::Name => "sysName",
            Self::Location => "sysLocation",
            Self::InterfaceCount => "ifNumber",
        }
    }

    /// Decoder for this attribute.
    pub const fn kind(self) -> ValueKind {
        match self {
            Self::Uptime => ValueKind::TimeTicks,
            Self::InterfaceCount => ValueKind::Integer,
            _ => ValueKind::Text,
        }
    }

    /// Scalar instance OID (ends in `.0`).
    pub fn oid(self) -> Oid {
        let (base, column): (&[u32], u32) = match self {
            Self::Description => (&SYSTEM, 1),
            Self::Uptime => (&SYSTEM, 3),
            Self::Contact => (&SYSTEM, 4),
            Self::Name => (&SYSTEM, 5),
            Self::Location => (&SYSTEM, 6),
            Self::InterfaceCount => (&INTERFACES, 1),
        };
        build(base, &[column, 0])
    }
}

impl std::fmt::Display for SystemAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-interface table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceAttribute {
    /// ifDescr
    Description,
    /// ifType
    Type,
    /// ifMtu
    Mtu,
    /// ifSpeed
    Speed,
    /// ifPhysAddress
    PhysAddress,
    /// ifAdminStatus
    AdminStatus,
    /// ifOperStatus
    OperStatus,
    /// ifLastChange
    LastChange,
    /// ifInOctets
    InOctets,
    /// ifInUcastPkts
    InUnicast,
    /// ifInNUcastPkts
    InNonUnicast,
    /// ifInDiscards
    InDiscards,
    /// ifInErrors
    InErrors,
    /// ifInUnknownProtos
    UnknownProtos,
    /// ifOutOctets
    OutOctets,
    /// ifOutUcastPkts
    OutUnicast,
    /// ifOutNUcastPkts
    OutNonUnicast,
    /// ifOutDiscards
    OutDiscards,
    /// ifOutErrors
    OutErrors,
    /// ifInMulticastPkts
    InMulticast,
    /// ifInBroadcastPkts
    InBroadcast,
    /// ifOutMulticastPkts
    OutMulticast,
    /// ifOutBroadcastPkts
    OutBroadcast,
}

impl InterfaceAttribute {
    /// All interface attributes in table order.
    pub const ALL: [InterfaceAttribute; 23] = [
        Self::Description,
        Self::Type,
        Self::Mtu,
        Self::Speed,
        Self::PhysAddress,
        Self::AdminStatus,
        Self::OperStatus,
        Self::LastChange,
        Self::InOctets,
        Self::InUnicast,
        Self::InNonUnicast,
        Self::InDiscards,
        Self::InErrors,
        Self::UnknownProtos,
        Self::OutOctets,
        Self::OutUnicast,
        Self::OutNonUnicast,
        Self::OutDiscards,
        Self::OutErrors,
        Self::InMulticast,
        Self::InBroadcast,
        Self::OutMulticast,
        Self::OutBroadcast,
    ];

    /// MIB object name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Description => "ifDescr",
            Self::Type => "ifType",
            Self::Mtu => "ifMtu",
            Self::Speed => "ifSpeed",
            Self::PhysAddress => "ifPhysAddress",
            Self::AdminStatus => "ifAdminStatus",
            Self::OperStatus => "ifOperStatus",
            Self::LastChange => "ifLastChange",
            Self::InOctets => "ifInOctets",
            Self::InUnicast => "ifInUcastPkts",
            Self::InNonUnicast => "ifInNUcastPkts",
            Self::InDiscards => "ifInDiscards",
            Self::InErrors => "ifInErrors",
            Self::UnknownProtos => "ifInUnknownProtos",
            Self::OutOctets => "ifOutOctets",
            Self::OutUnicast => "ifOutUcastPkts",
            Self::OutNonUnicast => "ifOutNUcastPkts",
            Self::OutDiscards => "ifOutDiscards",
            Self::OutErrors => "ifOutErrors",
            Self::InMulticast => "ifInMulticastPkts",
            Self::InBroadcast => "ifInBroadcastPkts",
            Self::OutMulticast => "ifOutMulticastPkts",
            Self::OutBroadcast => "ifOutBroadcastPkts",
        }
    }

    /// Decoder for this attribute.
    pub const fn kind(self) -> ValueKind {
        match self {
            Self::Description => ValueKind::Text,
            Self::Type => ValueKind::InterfaceType,
            Self::Speed => ValueKind::Speed,
            Self::PhysAddress => ValueKind::PhysAddress,
            Self::AdminStatus => ValueKind::AdminStatus,
            Self::OperStatus => ValueKind::OperStatus,
            Self::LastChange => ValueKind::TimeTicks,
            _ => ValueKind::Integer,
        }
    }

    /// Column OID without the instance index.
    pub fn column(self) -> Oid {
        let (base, column): (&[u32], u32) = match self {
            Self::Description => (&IF_ENTRY, 2),
            Self::Type => (&IF_ENTRY, 3),
            Self::Mtu => (&IF_ENTRY, 4),
            Self::Speed => (&IF_ENTRY, 5),
            Self::PhysAddress => (&IF_ENTRY, 6),
            Self::AdminStatus => (&IF_ENTRY, 7),
            Self::OperStatus => (&IF_ENTRY, 8),
            Self::LastChange => (&IF_ENTRY, 9),
            Self::InOctets => (&IF_ENTRY, 10),
            Self::InUnicast => (&IF_ENTRY, 11),
            Self::InNonUnicast => (&IF_ENTRY, 12),
            Self::InDiscards => (&IF_ENTRY, 13),
            Self::InErrors => (&IF_ENTRY, 14),
            Self::UnknownProtos => (&IF_ENTRY, 15),
            Self::OutOctets => (&IF_ENTRY, 16),
            Self::OutUnicast => (&IF_ENTRY, 17),
            Self::OutNonUnicast => (&IF_ENTRY, 18),
            Self::OutDiscards => (&IF_ENTRY, 19),
            Self::OutErrors => (&IF_ENTRY, 20),
            Self::InMulticast => (&IF_X_ENTRY, 2),
            Self::InBroadcast => (&IF_X_ENTRY, 3),
            Self::OutMulticast => (&IF_X_ENTRY, 4),
            Self::OutBroadcast => (&IF_X_ENTRY, 5),
        };
        build(base, &[column])
    }

    /// Instance OID for one interface.
    pub fn oid(self, port: u32) -> Oid {
        let mut arcs = self.column().arcs().to_vec();
        arcs.push(port);
        Oid::from_slice(&arcs)
    }
}

impl std::fmt::Display for InterfaceAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// ifIndex column, walked to list the interfaces.
pub fn if_index() -> Oid {
    build(&IF_ENTRY, &[1])
}

fn build(base: &[u32], tail: &[u32]) -> Oid {
    let arcs: Vec<u32> = base.iter().chain(tail).copied().collect();
    Oid::from_slice(&arcs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_oids() {
        let expected = [
            (SystemAttribute::Description, "1.3.6.1.2.1.1.1.0"),
            (SystemAttribute::Uptime, "1.3.6.1.2.1.1.3.0"),
            (SystemAttribute::Contact, "1.3.6.1.2.1.1.4.0"),
            (SystemAttribute::Name, "1.3.6.1.2.1.1.5.0"),
            (SystemAttribute::Location, "1.3.6.1.2.1.1.6.0"),
            (SystemAttribute::InterfaceCount, "1.3.6.1.2.1.2.1.0"),
        ];
        for (attr, oid) in expected {
            assert_eq!(attr.oid().to_string(), oid, "{}", attr);
        }
    }

    #[test]
    fn test_interface_oids() {
        assert_eq!(if_index().to_string(), "1.3.6.1.2.1.2.2.1.1");
        assert_eq!(
            InterfaceAttribute::InOctets.oid(3).to_string(),
            "1.3.6.1.2.1.2.2.1.10.3"
        );
        assert_eq!(
            InterfaceAttribute::OutErrors.oid(12).to_string(),
            "1.3.6.1.2.1.2.2.1.20.12"
        );
        assert_eq!(
            InterfaceAttribute::OutBroadcast.oid(1).to_string(),
            "1.3.6.1.2.1.31.1.1.1.5.1"
        );
    }

    #[test]
    fn test_if_table_columns_are_contiguous() {
        let if_table: Vec<u32> = InterfaceAttribute::ALL[..19]
            .iter()
            .map(|a| *a.column().arcs().last().unwrap())
            .collect();
        assert_eq!(if_table, (2..=20).collect::<Vec<u32>>());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(SystemAttribute::Uptime.kind(), ValueKind::TimeTicks);
        assert_eq!(SystemAttribute::Name.kind(), ValueKind::Text);
        assert_eq!(InterfaceAttribute::Mtu.kind(), ValueKind::Integer);
        assert_eq!(InterfaceAttribute::LastChange.kind(), ValueKind::TimeTicks);
        assert_eq!(
            InterfaceAttribute::PhysAddress.kind(),
            ValueKind::PhysAddress
        );
    }
}

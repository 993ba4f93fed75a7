/// Sentinel used for origin/destination when no route is resolved.
pub const UNKNOWN_ROUTE: &str = "Unknown";

/// A 24-bit ICAO transponder address, the join key between the live state
/// feed and the metadata registry.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord)]
pub struct IcaoAddress(u32);

impl IcaoAddress {
    pub const MAX_VALUE: u32 = 0x00FF_FFFF;

    pub fn new(value: u32) -> Result<Self, IcaoAddressError> {
        if value <= Self::MAX_VALUE {
            Ok(IcaoAddress(value))
        } else {
            Err(IcaoAddressError::InvalidAddress(value))
        }
    }

    /// Parses a hexadecimal address string. The state feed reports addresses
    /// in lower case; the registry expects upper case, which `Display` emits.
    pub fn parse_hex(string: &str) -> Result<Self, IcaoAddressError> {
        let value = u32::from_str_radix(string.trim(), 16)
            .map_err(|_| IcaoAddressError::InvalidHexFormat(string.to_string()))?;
        Self::new(value)
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for IcaoAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06X}", self.0)
    }
}

#[derive(Debug)]
pub enum IcaoAddressError {
    InvalidHexFormat(String),
    InvalidAddress(u32),
}
impl std::fmt::Display for IcaoAddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IcaoAddressError::InvalidHexFormat(string) => {
                write!(f, "'{string}' is not a hexadecimal address")
            }
            IcaoAddressError::InvalidAddress(val) => {
                write!(
                    f,
                    "Value 0x{:X} ({}) exceeds 24-bit ICAO address limit (0x{:X})",
                    val,
                    val,
                    IcaoAddress::MAX_VALUE
                )
            }
        }
    }
}
impl std::error::Error for IcaoAddressError {}

/// One aircraft discovered inside the configured area: the address plus the
/// last-known callsign (trimmed, possibly empty).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TrackedAircraft {
    pub icao_address: IcaoAddress,
    pub callsign: String,
}

/// Display-ready merged record. Assembled once per cycle and never mutated
/// after it is placed in a snapshot. Serialized field names match the JSON
/// surface contract.
#[derive(Debug, PartialEq, Clone, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AircraftRecord {
    pub registration: String,
    pub owner: String,
    pub manufacturer: String,
    #[serde(rename = "Type")]
    pub aircraft_type: String,
    pub origin: String,
    pub destination: String,
    pub last_updated: String,
}

/// The complete, timestamped view currently exposed to readers. Replaced
/// wholesale at the end of every cycle.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Snapshot {
    pub records: Vec<AircraftRecord>,
    pub last_update: String,
}

//! CIDR address ranges for IPv4 and IPv6.
//!
//! Provides [`AddressRange`], a network range stored in canonical form
//! (host bits zeroed).

use crate::error::SyncError;
use ipnet::IpNet;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::IpAddr;
use std::str::FromStr;

/// A CIDR network range in canonical form.
///
/// The wrapped network is always truncated to its network address, so two
/// ranges compare equal exactly when they cover the same block. A V4 range
/// never equals a V6 one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AddressRange(IpNet);

impl AddressRange {
    /// Build a canonical range from any address inside it.
    pub fn new(addr: IpAddr, prefix: u8) -> Result<AddressRange, SyncError> {
        let net = IpNet::new(addr, prefix).map_err(|_| {
            SyncError::MalformedRange(format!(
                "prefix length /{prefix} exceeds /{}",
                max_prefix(addr)
            ))
        })?;
        Ok(AddressRange(net.trunc()))
    }

    /// A single host range (/32 or /128).
    pub fn host(addr: IpAddr) -> AddressRange {
        AddressRange(IpNet::from(addr))
    }
}

fn max_prefix(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

impl FromStr for AddressRange {
    type Err = SyncError;

    /// Parse `addr/prefix` or a bare address. Surrounding whitespace is ignored.
    fn from_str(input: &str) -> Result<AddressRange, SyncError> {
        let trimmed = input.trim();
        let malformed = |why: &str| SyncError::MalformedRange(format!("'{input}': {why}"));

        let (addr_part, prefix_part) = match trimmed.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (trimmed, None),
        };
        if addr_part.is_empty() {
            return Err(malformed("missing address"));
        }
        let addr: IpAddr = addr_part
            .parse()
            .map_err(|_| malformed("invalid IP address"))?;

        let Some(prefix_part) = prefix_part else {
            return Ok(AddressRange::host(addr));
        };
        // u8::from_str would also accept a leading '+'
        if prefix_part.is_empty() || !prefix_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("invalid prefix length"));
        }
        let prefix: u8 = prefix_part
            .parse()
            .map_err(|_| malformed("prefix length out of range"))?;
        AddressRange::new(addr, prefix).map_err(|e| match e {
            SyncError::MalformedRange(why) => malformed(&why),
            other => other,
        })
    }
}

impl std::fmt::Display for AddressRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for AddressRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AddressRange {
    fn deserialize<D>(deserializer: D) -> Result<AddressRange, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AddressRange::from_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_bits_are_zeroed() {
        let range: AddressRange = "192.168.1.42/24".parse().unwrap();
        assert_eq!(range.to_string(), "192.168.1.0/24");
        let range: AddressRange = "2001:db8:1234::1/32".parse().unwrap();
        assert_eq!(range.to_string(), "2001:db8::/32");
        let range: AddressRange = "10.9.8.7/0".parse().unwrap();
        assert_eq!(range.to_string(), "0.0.0.0/0");
    }

    #[test]
    fn test_bare_address_is_host_range() {
        let v4: AddressRange = "10.1.2.3".parse().unwrap();
        assert_eq!(v4.to_string(), "10.1.2.3/32");
        let v6: AddressRange = "2001:db8::1".parse().unwrap();
        assert_eq!(v6.to_string(), "2001:db8::1/128");
        let full = AddressRange::new("2001:db8::1".parse().unwrap(), 128).unwrap();
        assert_eq!(v6, full);
    }

    #[test]
    fn test_equal_after_normalization() {
        let a: AddressRange = "10.0.0.1/8".parse().unwrap();
        let b: AddressRange = " 10.255.0.0/8 ".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_family_mismatch_never_equal() {
        let v4: AddressRange = "0.0.0.0/0".parse().unwrap();
        let v6: AddressRange = "::/0".parse().unwrap();
        assert_ne!(v4, v6);
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "1.2.3.4/99",
            "1.2.3.4/33",
            "2001:db8::/129",
            "1.2.3/24",
            "1.2.3.4/",
            "1.2.3.4/+8",
            "1.2.3.4/-1",
            "/24",
            "",
            "zscaler",
            "1.2.3.4/24/8",
        ] {
            let err = bad.parse::<AddressRange>().unwrap_err();
            assert!(
                matches!(err, SyncError::MalformedRange(_)),
                "expected MalformedRange for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_prefix_error_names_input() {
        let err = "10.0.0.0/33".parse::<AddressRange>().unwrap_err();
        assert_eq!(
            err,
            SyncError::MalformedRange("'10.0.0.0/33': prefix length /33 exceeds /32".into())
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for input in ["165.225.0.17/23", "2a03:eec0:1411::/48", "8.8.8.8", "::1"] {
            let once: AddressRange = input.parse().unwrap();
            let twice: AddressRange = once.to_string().parse().unwrap();
            assert_eq!(once, twice);
            assert_eq!(once.to_string(), twice.to_string());
        }
    }

    #[test]
    fn test_serde_uses_cidr_string() {
        let range: AddressRange = "10.0.0.0/8".parse().unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, "\"10.0.0.0/8\"");
        let back: AddressRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
        assert!(serde_json::from_str::<AddressRange>("\"10.0.0.0/40\"").is_err());
    }
}

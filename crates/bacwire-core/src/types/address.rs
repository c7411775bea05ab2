use std::fmt;

/// Longest MAC address carried in a `BACnetAddress` (7 bytes covers every
/// standard data link).
pub const MAX_MAC_LEN: usize = 7;

/// A network number plus MAC address, as carried inside `BACnetRecipient`
/// and used to key per-peer vendor tag resolution.
///
/// Network 0 is the local network; an empty MAC is a broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacnetAddress {
    pub network: u16,
    mac: [u8; MAX_MAC_LEN],
    mac_len: u8,
}

impl BacnetAddress {
    /// Returns `None` if `mac` is longer than [`MAX_MAC_LEN`].
    pub fn new(network: u16, mac: &[u8]) -> Option<Self> {
        if mac.len() > MAX_MAC_LEN {
            return None;
        }
        let mut out = Self {
            network,
            mac: [0; MAX_MAC_LEN],
            mac_len: mac.len() as u8,
        };
        out.mac[..mac.len()].copy_from_slice(mac);
        Some(out)
    }

    pub fn local(mac: &[u8]) -> Option<Self> {
        Self::new(0, mac)
    }

    pub fn mac(&self) -> &[u8] {
        &self.mac[..self.mac_len as usize]
    }

    pub const fn is_broadcast(&self) -> bool {
        self.mac_len == 0
    }
}

impl fmt::Display for BacnetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.network)?;
        for (i, b) in self.mac().iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::BacnetAddress;

    #[test]
    fn address_keeps_mac_length() {
        let addr = BacnetAddress::new(5, &[0xC0, 0xA8, 0x01, 0x0A, 0xBA, 0xC0]).unwrap();
        assert_eq!(addr.mac().len(), 6);
        assert_eq!(addr.to_string(), "5:C0-A8-01-0A-BA-C0");
        assert!(BacnetAddress::new(0, &[0; 8]).is_none());
        assert!(BacnetAddress::local(&[]).unwrap().is_broadcast());
    }
}

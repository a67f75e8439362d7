//! Debuggee memory access

use std::collections::BTreeMap;

use super::InspectError;

/// Longest string a summary will read
pub const MAX_STRING_LEN: usize = 4096;

/// Reads the debugged process's memory. Multi-byte values are little
/// endian.
pub trait MemoryReader {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>, InspectError>;

    fn read_u64(&self, address: u64) -> Result<u64, InspectError> {
        let bytes = self.read_bytes(address, 8)?;
        let bytes: [u8; 8] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| InspectError::UnreadableMemory { address, len: 8 })?;
        Ok(u64::from_le_bytes(bytes))
    }

    /// NUL terminated UTF-8 string, at most [`MAX_STRING_LEN`] bytes
    fn read_c_string(&self, address: u64) -> Result<String, InspectError> {
        self.read_string_units(address, 1)
    }

    /// NUL terminated string of `unit`-byte characters: UTF-8 for 1,
    /// UTF-16 for 2 and UTF-32 for 4. At most [`MAX_STRING_LEN`] units are
    /// read.
    fn read_string_units(&self, address: u64, unit: usize) -> Result<String, InspectError> {
        if !matches!(unit, 1 | 2 | 4) {
            return Err(InspectError::NotAString(format!("{}-byte characters", unit)));
        }

        let mut units = Vec::new();
        for index in 0..MAX_STRING_LEN as u64 {
            let at = (index * unit as u64)
                .checked_add(address)
                .ok_or(InspectError::AddressOverflow(address))?;
            let bytes = self.read_bytes(at, unit)?;
            let bytes =
                bytes.get(..unit).ok_or(InspectError::UnreadableMemory { address: at, len: unit })?;
            let mut value = [0u8; 4];
            value[..unit].copy_from_slice(bytes);
            match u32::from_le_bytes(value) {
                0 => break,
                code => units.push(code),
            }
        }

        let invalid = |what: &str| InspectError::NotAString(what.to_string());
        match unit {
            1 => String::from_utf8(units.into_iter().map(|u| u as u8).collect())
                .map_err(|e| invalid(&e.to_string())),
            2 => {
                let wide: Vec<u16> = units.into_iter().map(|u| u as u16).collect();
                String::from_utf16(&wide).map_err(|e| invalid(&e.to_string()))
            }
            _ => units
                .into_iter()
                .map(|u| char::from_u32(u).ok_or_else(|| invalid(&format!("invalid code point {:#x}", u))))
                .collect(),
        }
    }
}

/// Captured memory regions, for offline inspection
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    regions: BTreeMap<u64, Vec<u8>>,
}

impl MemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region starting at `address`, replacing one that starts there
    pub fn with_region(mut self, address: u64, bytes: impl Into<Vec<u8>>) -> Self {
        self.regions.insert(address, bytes.into());
        self
    }

    pub fn with_u64(self, address: u64, value: u64) -> Self {
        self.with_region(address, value.to_le_bytes())
    }
}

impl MemoryReader for MemorySnapshot {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>, InspectError> {
        let unreadable = InspectError::UnreadableMemory { address, len };
        let (&start, bytes) = self.regions.range(..=address).next_back().ok_or(unreadable.clone())?;

        let offset = usize::try_from(address - start).map_err(|_| unreadable.clone())?;
        let end = offset.checked_add(len).ok_or(unreadable.clone())?;
        bytes.get(offset..end).map(<[u8]>::to_vec).ok_or(unreadable)
    }
}

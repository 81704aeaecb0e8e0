use super::*;
use log::debug;
use range_map::Range;
use std::collections::BTreeMap;
use std::fmt;

struct Subsystem {
    subsystem: Box<dyn AddressableIO>,
    address_range: Range<u16>,
    id: String,
}

impl Subsystem {
    fn contains(&self, addr: u16) -> bool {
        self.address_range.contains(addr)
    }

    fn overlaps(&self, start: u16, end: u16) -> Option<u16> {
        if start <= self.address_range.end && self.address_range.start <= end {
            Some(start.max(self.address_range.start))
        } else {
            None
        }
    }

    fn info(&self) -> ComponentInfo {
        ComponentInfo {
            id: self.id.clone(),
            start: self.address_range.start,
            end: self.address_range.end,
        }
    }
}

impl fmt::Debug for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.info())
    }
}

/// Description of one mapped region, as returned by [`Bus::components`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInfo {
    pub id: String,
    pub start: u16,
    pub end: u16,
}

impl ComponentInfo {
    pub fn size(&self) -> usize {
        (self.end - self.start) as usize + 1
    }
}

impl fmt::Display for ComponentInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Subsystem {:<12}, address range=#0x{:04X} → #0x{:04X}, size = {} bytes",
            self.id,
            self.start,
            self.end,
            self.size()
        )
    }
}

/// The address bus: a partition of the 16 bits address space into
/// non-overlapping inclusive regions, each one routed to a component.
///
/// Every read and write performed by the processor goes through here.
#[derive(Debug, Default)]
pub struct Bus {
    stack: Vec<Subsystem>,
    // region start address → index in `stack`
    address_map: BTreeMap<u16, usize>,
}

impl Bus {
    /// A bus with a full 64 KiB RAM mapped as `"RAM"`.
    pub fn with_ram() -> Self {
        let mut bus = Self::default();
        bus.stack.push(Subsystem {
            subsystem: Box::new(RAM::default()),
            address_range: Range {
                start: 0x0000,
                end: 0xffff,
            },
            id: "RAM".to_owned(),
        });
        bus.rebuild_address_map();

        bus
    }

    /// Map `component` over `start..=end` under the name `id`.
    pub fn connect(
        &mut self,
        id: &str,
        start: u16,
        end: u16,
        component: impl AddressableIO + 'static,
    ) -> Result<()> {
        if start > end {
            return Err(MemoryError::InvalidRange { start, end });
        }

        for sub in self.stack.iter() {
            if sub.id == id {
                return Err(MemoryError::Conflict {
                    address: start,
                    id: id.to_owned(),
                });
            }
            if let Some(address) = sub.overlaps(start, end) {
                return Err(MemoryError::Conflict {
                    address,
                    id: sub.id.clone(),
                });
            }
        }

        debug!("bus: connecting '{}' at #0x{:04X} → #0x{:04X}", id, start, end);
        self.stack.push(Subsystem {
            subsystem: Box::new(component),
            address_range: Range { start, end },
            id: id.to_owned(),
        });
        self.rebuild_address_map();

        Ok(())
    }

    /// Unmap the component named `id` and hand it back to the caller.
    pub fn disconnect(&mut self, id: &str) -> Result<Box<dyn AddressableIO>> {
        let index = self
            .stack
            .iter()
            .position(|sub| sub.id == id)
            .ok_or_else(|| MemoryError::UnknownComponent(id.to_owned()))?;
        let sub = self.stack.remove(index);
        self.rebuild_address_map();
        debug!("bus: disconnected {:?}", sub);

        Ok(sub.subsystem)
    }

    pub fn is_mapped(&self, addr: u16) -> bool {
        self.find(addr).is_some()
    }

    /// Id of the component serving `addr`, if any.
    pub fn component_at(&self, addr: u16) -> Option<&str> {
        self.find(addr).map(|index| self.stack[index].id.as_str())
    }

    pub fn components(&self) -> Vec<ComponentInfo> {
        self.stack.iter().map(Subsystem::info).collect()
    }

    /// Forward a reset signal to every component. Mappings are left untouched.
    pub fn reset(&mut self) {
        debug!("bus: resetting {} component(s)", self.stack.len());
        self.stack
            .iter_mut()
            .for_each(|sub| sub.subsystem.reset());
    }

    pub fn read(&self, addr: u16) -> Result<u8> {
        let index = self.find(addr).ok_or(MemoryError::Unmapped(addr))?;

        self.stack[index].subsystem.read(addr)
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        let index = self.find(addr).ok_or(MemoryError::Unmapped(addr))?;

        self.stack[index].subsystem.write(addr, value)
    }

    /// Little endian word; the high byte address wraps past 0xFFFF.
    pub fn read_word(&self, addr: u16) -> Result<u16> {
        let low = self.read(addr)?;
        let high = self.read(addr.wrapping_add(1))?;

        Ok(little_endian(&[low, high]))
    }

    pub fn write_word(&mut self, addr: u16, value: u16) -> Result<()> {
        let [low, high] = value.to_le_bytes();
        self.write(addr, low)?;
        self.write(addr.wrapping_add(1), high)
    }

    pub fn read_bytes(&self, addr: u16, len: usize) -> Result<Vec<u8>> {
        (0..len)
            .map(|offset| self.read(addr.wrapping_add(offset as u16)))
            .collect()
    }

    pub fn write_bytes(&mut self, addr: u16, data: &[u8]) -> Result<()> {
        for (offset, byte) in data.iter().enumerate() {
            self.write(addr.wrapping_add(offset as u16), *byte)?;
        }

        Ok(())
    }

    fn find(&self, addr: u16) -> Option<usize> {
        self.address_map
            .range(..=addr)
            .next_back()
            .map(|(_, &index)| index)
            .filter(|&index| self.stack[index].contains(addr))
    }

    fn rebuild_address_map(&mut self) {
        self.address_map = self
            .stack
            .iter()
            .enumerate()
            .map(|(index, sub)| (sub.address_range.start, index))
            .collect();
    }
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use log::trace;
use thiserror::Error;

/// Size of the 8080 address space.
pub const ADDRESS_SPACE: usize = 0x10000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("image of {len} bytes does not fit in {capacity} bytes of memory (base {base:#06x})")]
    ImageTooLarge {
        len: usize,
        base: u16,
        capacity: usize,
    },
}

/// Flat byte store addressed by 16-bit addresses.
///
/// Memory smaller than the address space is mirrored: every address is taken modulo the
/// capacity, so reads and writes never fail.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    /// Zeroed memory of `capacity` bytes, clamped to `1..=ADDRESS_SPACE`.
    pub fn new(capacity: usize) -> Memory {
        let capacity = capacity.clamp(1, ADDRESS_SPACE);
        Memory {
            bytes: vec![0; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[self.index(addr)]
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        let index = self.index(addr);
        self.bytes[index] = value;
    }

    /// Little-endian word at `addr`; the high byte comes from `addr + 1`, wrapping at 0xffff.
    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from_le_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    pub fn write_word(&mut self, addr: u16, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.write(addr, low);
        self.write(addr.wrapping_add(1), high);
    }

    /// Copies `image` into memory from `base`, wrapping past the last byte.
    pub fn load(&mut self, image: &[u8], base: u16) -> Result<(), LoadError> {
        if image.len() > self.capacity() {
            return Err(LoadError::ImageTooLarge {
                len: image.len(),
                base,
                capacity: self.capacity(),
            });
        }
        let start = self.index(base);
        let (head, tail) = image.split_at(image.len().min(self.capacity() - start));
        self.bytes[start..start + head.len()].copy_from_slice(head);
        self.bytes[..tail.len()].copy_from_slice(tail);
        Ok(())
    }

    /// Whole memory, for decoding and inspection.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Index of `addr` in the backing store.
    pub fn index(&self, addr: u16) -> usize {
        let addr = addr as usize;
        if addr >= self.bytes.len() {
            trace!(
                "address {:#06x} out of range, wrapping to {:#06x}",
                addr,
                addr % self.bytes.len()
            );
        }
        addr % self.bytes.len()
    }
}

impl Default for Memory {
    fn default() -> Memory {
        Memory::new(ADDRESS_SPACE)
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Memory {{ capacity: {:#x} }}", self.capacity())
    }
}

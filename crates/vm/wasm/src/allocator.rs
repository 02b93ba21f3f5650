// Path: crates/vm/wasm/src/allocator.rs
//! A freeing-bump heap allocator living in guest linear memory.
//!
//! Blocks are carved upward from `__heap_base`. Each block is an 8-byte header
//! followed by a power-of-two payload between 8 bytes and 32 MiB. Freed blocks
//! go onto a free list for their size class and are reused before the bump
//! pointer moves again; memory is never returned to the bump region.
//!
//! Header layout (little-endian `u64`):
//! - occupied: bit 32 set, low bits hold the size-class order;
//! - free: bit 32 clear, low 32 bits hold the next free header or [`NIL`].

use crate::memory::{read_array, write_bytes};
use sbx_api::error::HostFault;

const HEADER_SIZE: u32 = 8;
const MIN_BLOCK: u32 = 8;
/// Orders 0..=22 cover payloads of 8 B ..= 32 MiB.
const N_ORDERS: usize = 23;
/// The largest payload a single allocation may request.
pub const MAX_ALLOCATION: u32 = MIN_BLOCK << (N_ORDERS - 1);
const OCCUPIED: u64 = 1 << 32;
const NIL: u32 = u32::MAX;

fn order_for(size: u32) -> Option<usize> {
    if size > MAX_ALLOCATION {
        return None;
    }
    let block = size.max(MIN_BLOCK).next_power_of_two();
    Some((block.trailing_zeros() - MIN_BLOCK.trailing_zeros()) as usize)
}

fn block_size(order: usize) -> u32 {
    MIN_BLOCK << order
}

#[derive(Debug, Clone)]
pub struct FreeingBumpHeapAllocator {
    start: u32,
    bumper: u32,
    free_lists: [u32; N_ORDERS],
    live: u32,
}

impl FreeingBumpHeapAllocator {
    /// Creates an allocator whose first block starts at `heap_base`, rounded up to 8.
    pub fn new(heap_base: u32) -> Self {
        let start = heap_base.saturating_add(7) & !7;
        Self {
            start,
            bumper: start,
            free_lists: [NIL; N_ORDERS],
            live: 0,
        }
    }

    /// Number of blocks currently handed out.
    pub fn live_allocations(&self) -> u32 {
        self.live
    }

    /// Allocates `size` bytes and returns the payload address.
    ///
    /// Exhaustion, including a request above [`MAX_ALLOCATION`], yields `Ok(0)`.
    /// Errors are reserved for a corrupted heap.
    pub fn allocate(&mut self, memory: &mut [u8], size: u32) -> Result<u32, HostFault> {
        let Some(order) = order_for(size) else {
            tracing::warn!(target: "wasm", size, "allocation above the largest size class");
            return Ok(0);
        };

        let header = match self.free_lists.get(order).copied() {
            Some(head) if head != NIL => {
                let word = u64::from_le_bytes(read_array::<8>(memory, head)?);
                if word & OCCUPIED != 0 {
                    return Err(HostFault::ContractViolation(format!(
                        "free list of order {} points at a live block {:#x}",
                        order, head
                    )));
                }
                if let Some(slot) = self.free_lists.get_mut(order) {
                    *slot = word as u32;
                }
                head
            }
            _ => {
                let next = u64::from(self.bumper)
                    + u64::from(HEADER_SIZE)
                    + u64::from(block_size(order));
                if next > memory.len() as u64 {
                    tracing::warn!(
                        target: "wasm",
                        size,
                        heap_end = self.bumper,
                        memory = memory.len(),
                        "guest heap exhausted"
                    );
                    return Ok(0);
                }
                let header = self.bumper;
                self.bumper = next as u32;
                header
            }
        };

        write_bytes(memory, header, &(OCCUPIED | order as u64).to_le_bytes())?;
        self.live += 1;
        Ok(header + HEADER_SIZE)
    }

    /// Returns the block at `ptr` to its size class.
    ///
    /// Freeing an address this allocator never handed out, or freeing twice,
    /// is a contract violation.
    pub fn deallocate(&mut self, memory: &mut [u8], ptr: u32) -> Result<(), HostFault> {
        let foreign = || HostFault::ContractViolation(format!("free of foreign pointer {:#x}", ptr));
        if ptr % 8 != 0 || ptr < self.start + HEADER_SIZE || ptr >= self.bumper {
            return Err(foreign());
        }
        let header = ptr - HEADER_SIZE;
        let word = u64::from_le_bytes(read_array::<8>(memory, header)?);
        if word & OCCUPIED == 0 {
            return Err(HostFault::ContractViolation(format!(
                "double free of {:#x}",
                ptr
            )));
        }
        let order = (word as u32) as usize;
        let head = self.free_lists.get_mut(order).ok_or_else(foreign)?;

        write_bytes(memory, header, &u64::from(*head).to_le_bytes())?;
        *head = header;
        self.live = self.live.saturating_sub(1);
        Ok(())
    }
}

// Path: crates/vm/wasm/src/memory.rs
//! Translation between packed pointer/length words and owned buffers.
//!
//! Every buffer argument crosses the boundary as one 64-bit word: the guest
//! address in the low 32 bits and the byte length in the high 32 bits. All
//! accesses are bounds-checked against the current linear memory; an
//! out-of-range pair is a [`HostFault::Memory`].

use sbx_api::error::HostFault;

/// Packs an address and a length into one boundary word.
pub fn pack_ptr_len(ptr: u32, len: u32) -> u64 {
    (u64::from(len) << 32) | u64::from(ptr)
}

/// Splits a boundary word into `(address, length)`.
pub fn unpack_ptr_len(packed: u64) -> (u32, u32) {
    (packed as u32, (packed >> 32) as u32)
}

fn range(memory_len: usize, ptr: u32, len: u32) -> Result<std::ops::Range<usize>, HostFault> {
    let start = ptr as usize;
    let end = start
        .checked_add(len as usize)
        .filter(|end| *end <= memory_len)
        .ok_or_else(|| {
            HostFault::Memory(format!(
                "range {:#x}+{} outside linear memory of {} bytes",
                ptr, len, memory_len
            ))
        })?;
    Ok(start..end)
}

/// Copies `len` bytes at `ptr` out of guest memory.
pub fn read_bytes(memory: &[u8], ptr: u32, len: u32) -> Result<Vec<u8>, HostFault> {
    let range = range(memory.len(), ptr, len)?;
    memory
        .get(range)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| HostFault::Memory(format!("unreadable range at {:#x}", ptr)))
}

/// Reads the buffer a packed word designates.
pub fn read_packed(memory: &[u8], packed: u64) -> Result<Vec<u8>, HostFault> {
    let (ptr, len) = unpack_ptr_len(packed);
    read_bytes(memory, ptr, len)
}

/// Reads a fixed-width value (a key, a signature) at `ptr`.
pub fn read_array<const N: usize>(memory: &[u8], ptr: u32) -> Result<[u8; N], HostFault> {
    let range = range(memory.len(), ptr, N as u32)?;
    let mut out = [0u8; N];
    out.copy_from_slice(
        memory
            .get(range)
            .ok_or_else(|| HostFault::Memory(format!("unreadable range at {:#x}", ptr)))?,
    );
    Ok(out)
}

/// Copies `data` into guest memory at `ptr`.
pub fn write_bytes(memory: &mut [u8], ptr: u32, data: &[u8]) -> Result<(), HostFault> {
    let range = range(memory.len(), ptr, data.len() as u32)?;
    memory
        .get_mut(range)
        .ok_or_else(|| HostFault::Memory(format!("unwritable range at {:#x}", ptr)))?
        .copy_from_slice(data);
    Ok(())
}

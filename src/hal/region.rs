//! Memory-mapped peripheral register block
//!
//! Maps a fixed physical address range (through `/dev/mem` or
//! `/dev/gpiomem`) into the process and exposes it as an array of 32-bit
//! registers. Every access goes through a word index that is checked
//! against the mapped length; the raw address never leaves this module.

use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(unix)]
use std::ptr::{self, NonNull};

/// Register width in bytes
pub const WORD_SIZE: usize = 4;

/// Failure to establish the register mapping
///
/// Fatal for the program: there is no other input source.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid region length {len:#x}: must be a non-zero multiple of 4 bytes")]
    InvalidLength { len: usize },

    #[error("physical base {base:#x} is not aligned to the {page_size}-byte page size")]
    Misaligned { base: u64, page_size: usize },

    #[error("physical base {base:#x} cannot be mapped on this platform")]
    InvalidAddress { base: u64 },

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("mmap of {len:#x} bytes at physical {base:#x} failed: {source}")]
    Map {
        base: u64,
        len: usize,
        #[source]
        source: io::Error,
    },

    #[error("region of {len:#x} bytes does not contain the register at offset {required:#x}")]
    RegionTooSmall { len: usize, required: usize },

    #[error("memory-mapped peripherals are not supported on this platform")]
    Unsupported,
}

enum Backing {
    /// Live mapping returned by mmap
    #[cfg(unix)]
    Mapped(NonNull<u32>),
    /// Process-owned words, used when no hardware is attached
    Detached(Box<[u32]>),
}

/// Exclusive handle to a mapped register block
///
/// Valid from a successful [`PeripheralRegion::acquire`] until it is
/// released or dropped; the mapping is torn down exactly once.
pub struct PeripheralRegion {
    base: u64,
    len: usize,
    backing: Backing,
}

impl PeripheralRegion {
    /// Map `len` bytes of physical memory starting at `base` through `device`
    pub fn acquire(device: &Path, base: u64, len: usize) -> Result<Self, MapError> {
        validate_length(len)?;

        let page_size = page_size();
        if base % page_size as u64 != 0 {
            return Err(MapError::Misaligned { base, page_size });
        }

        map_device(device, base, len)
    }

    /// Create a region backed by zeroed process memory instead of hardware
    pub fn detached(base: u64, len: usize) -> Result<Self, MapError> {
        validate_length(len)?;
        Ok(Self {
            base,
            len,
            backing: Backing::Detached(vec![0u32; len / WORD_SIZE].into_boxed_slice()),
        })
    }

    /// Physical base address of the block
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Mapped length in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of 32-bit registers in the block
    pub fn word_count(&self) -> usize {
        self.len / WORD_SIZE
    }

    /// True when backed by process memory rather than a device mapping
    pub fn is_detached(&self) -> bool {
        matches!(self.backing, Backing::Detached(_))
    }

    /// Read the register at word `index`
    ///
    /// # Panics
    /// If `index` lies outside the mapped block.
    pub fn read_word(&self, index: usize) -> u32 {
        self.check_index(index);
        match &self.backing {
            // SAFETY: index < word_count, and the mapping lives as long as self
            #[cfg(unix)]
            Backing::Mapped(ptr) => unsafe { ptr::read_volatile(ptr.as_ptr().add(index)) },
            Backing::Detached(words) => words[index],
        }
    }

    /// Write the register at word `index`
    ///
    /// # Panics
    /// If `index` lies outside the mapped block.
    pub fn write_word(&mut self, index: usize, value: u32) {
        self.check_index(index);
        match &mut self.backing {
            // SAFETY: index < word_count, and the mapping lives as long as self
            #[cfg(unix)]
            Backing::Mapped(ptr) => unsafe { ptr::write_volatile(ptr.as_ptr().add(index), value) },
            Backing::Detached(words) => words[index] = value,
        }
    }

    /// Read-modify-write the register at word `index`
    pub fn modify_word(&mut self, index: usize, f: impl FnOnce(u32) -> u32) {
        let value = self.read_word(index);
        self.write_word(index, f(value));
    }

    /// Unmap the region
    pub fn release(self) {
        debug!(
            "releasing {:#x} bytes of registers at {:#x}",
            self.len, self.base
        );
        drop(self);
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.word_count(),
            "register index {} outside {:#x}-byte region",
            index,
            self.len
        );
    }
}

impl Drop for PeripheralRegion {
    fn drop(&mut self) {
        unmap(self);
    }
}

#[cfg(unix)]
fn unmap(region: &mut PeripheralRegion) {
    if let Backing::Mapped(ptr) = region.backing {
        // SAFETY: ptr/len are exactly what mmap returned, and drop runs once
        let rc = unsafe { libc::munmap(ptr.as_ptr().cast(), region.len) };
        if rc != 0 {
            warn!(
                "munmap of registers at {:#x} failed: {}",
                region.base,
                io::Error::last_os_error()
            );
        }
    }
}

#[cfg(not(unix))]
fn unmap(_region: &mut PeripheralRegion) {}

impl std::fmt::Debug for PeripheralRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeripheralRegion")
            .field("base", &format_args!("{:#x}", self.base))
            .field("len", &format_args!("{:#x}", self.len))
            .field("detached", &self.is_detached())
            .finish()
    }
}

fn validate_length(len: usize) -> Result<(), MapError> {
    if len == 0 || len % WORD_SIZE != 0 {
        return Err(MapError::InvalidLength { len });
    }
    Ok(())
}

#[cfg(unix)]
fn page_size() -> usize {
    // SAFETY: sysconf has no memory-safety preconditions
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        4096
    }
}

#[cfg(not(unix))]
fn page_size() -> usize {
    4096
}

#[cfg(unix)]
fn map_device(device: &Path, base: u64, len: usize) -> Result<PeripheralRegion, MapError> {
    use std::fs::OpenOptions;
    use std::os::unix::fs::OpenOptionsExt;
    use std::os::unix::io::AsRawFd;

    let offset = libc::off_t::try_from(base).map_err(|_| MapError::InvalidAddress { base })?;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_SYNC)
        .open(device)
        .map_err(|source| MapError::Open {
            path: device.to_path_buf(),
            source,
        })?;

    // SAFETY: a fresh shared mapping of an open descriptor; the result is
    // checked against MAP_FAILED before use
    let addr = unsafe {
        libc::mmap(
            ptr::null_mut(),
            len,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_SHARED,
            file.as_raw_fd(),
            offset,
        )
    };
    if addr == libc::MAP_FAILED {
        return Err(MapError::Map {
            base,
            len,
            source: io::Error::last_os_error(),
        });
    }

    // The mapping outlives the descriptor.
    drop(file);

    let ptr = NonNull::new(addr.cast::<u32>()).ok_or(MapError::InvalidAddress { base })?;
    debug!(
        "mapped {:#x} bytes at physical {:#x} via {}",
        len,
        base,
        device.display()
    );

    Ok(PeripheralRegion {
        base,
        len,
        backing: Backing::Mapped(ptr),
    })
}

#[cfg(not(unix))]
fn map_device(_device: &Path, _base: u64, _len: usize) -> Result<PeripheralRegion, MapError> {
    Err(MapError::Unsupported)
}

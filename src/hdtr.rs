//! Header/trailer descriptor for the BSD-family `sendfile`.
//!
//! FreeBSD and Darwin kernels accept a `struct sf_hdtr` alongside the file
//! range: two `iovec` arrays whose bytes are transmitted immediately before
//! and after the file region, as part of the same operation. The kernel
//! reads that structure directly, so its layout is an ABI contract, not a
//! convention - this module builds the `libc::sf_hdtr` for the concrete
//! target OS from borrowed [`IoSlice`] segments.
//!
//! This module only exists on FreeBSD, macOS, and iOS. Linux `sendfile` has
//! no header/trailer parameter, and the type is absent there so that a
//! caller relying on the capability fails to compile instead of silently
//! losing the buffers.

use std::io::IoSlice;
use std::ptr;

/// Ordered header and trailer buffers transmitted atomically adjacent to
/// the file region by the BSD-family `sendfile`.
///
/// The descriptor borrows the caller's segments for the duration of one
/// transmission call; nothing is copied or retained. Empty header or
/// trailer sequences are passed to the kernel as a null array pointer with
/// a zero count, which the kernel ignores.
///
/// Segment counts are forwarded as the kernel's native `c_int` width; the
/// caller keeps each sequence within that range, as it would with the raw
/// syscall.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderTrailer<'a> {
    headers: &'a [IoSlice<'a>],
    trailers: &'a [IoSlice<'a>],
}

impl<'a> HeaderTrailer<'a> {
    /// Creates a descriptor from borrowed header and trailer segments.
    pub const fn new(headers: &'a [IoSlice<'a>], trailers: &'a [IoSlice<'a>]) -> Self {
        Self { headers, trailers }
    }

    /// The header segments sent before the file region.
    pub const fn headers(&self) -> &'a [IoSlice<'a>] {
        self.headers
    }

    /// The trailer segments sent after the file region.
    pub const fn trailers(&self) -> &'a [IoSlice<'a>] {
        self.trailers
    }

    /// Total number of header plus trailer bytes the kernel will transmit
    /// in addition to the file range.
    pub fn byte_len(&self) -> u64 {
        let headers: u64 = self.headers.iter().map(|s| s.len() as u64).sum();
        let trailers: u64 = self.trailers.iter().map(|s| s.len() as u64).sum();
        headers + trailers
    }

    /// Builds the kernel-facing `sf_hdtr` for this target OS.
    ///
    /// `IoSlice` is guaranteed by std to be ABI-compatible with `iovec`, so
    /// the slice pointers are reinterpreted directly. The `*mut` casts
    /// satisfy the C prototype; the kernel only reads through them. The
    /// returned structure borrows `self`'s segments and must not outlive
    /// one syscall invocation.
    pub(crate) fn as_raw(&self) -> libc::sf_hdtr {
        libc::sf_hdtr {
            headers: raw_iovec_array(self.headers),
            hdr_cnt: self.headers.len() as libc::c_int,
            trailers: raw_iovec_array(self.trailers),
            trl_cnt: self.trailers.len() as libc::c_int,
        }
    }
}

/// Null for an empty sequence (count 0 means the pointer is never read).
fn raw_iovec_array(segments: &[IoSlice<'_>]) -> *mut libc::iovec {
    if segments.is_empty() {
        ptr::null_mut()
    } else {
        segments.as_ptr() as *mut libc::iovec
    }
}

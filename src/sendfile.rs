//! The unified transmission adapter: one `sendfile` name per build, bound
//! at compile time to the native primitive of the target platform family.
//!
//! # Platform Support
//!
//! - **Linux / Android**: `sendfile(out_fd, in_fd, offset, count)` - raw
//!   byte range only, optional in/out offset pointer, bytes-sent return.
//! - **FreeBSD**: `sendfile(fd, s, offset, nbytes, hdtr, sbytes, flags)` -
//!   header/trailer descriptor support, status return plus an `sbytes`
//!   out-parameter that is meaningful even on error.
//! - **macOS / iOS**: `sendfile(fd, s, offset, len, hdtr, flags)` - same
//!   descriptor support, with `len` serving as both requested count and
//!   transmitted-bytes report.
//!
//! The three lineages are not behaviorally equivalent, so the adapter does
//! not normalize them: each binding keeps its platform's parameter list and
//! return convention, and the build target decides which one exists. The
//! only work done here is symbol selection - no buffering, no retry, no
//! byte-count bookkeeping, no error translation. Callers own the
//! loop-until-complete policy, offset advancement between calls, and
//! backoff on `EAGAIN`.
//!
//! Concurrent calls on distinct descriptor pairs are as safe as the
//! underlying syscall; concurrent calls against the same socket may
//! interleave byte ranges at the kernel's discretion, which the adapter
//! does not arbitrate.

use std::io;
use std::os::fd::{AsFd, AsRawFd, RawFd};

#[cfg(any(target_os = "freebsd", target_os = "macos", target_os = "ios"))]
use std::ptr;

#[cfg(any(target_os = "freebsd", target_os = "macos", target_os = "ios"))]
use crate::hdtr::HeaderTrailer;

/// Transmits up to `count` bytes of `file` onto `socket` via the Linux
/// `sendfile(2)` syscall.
///
/// With `offset: Some(&mut off)` the kernel reads starting at `off`, writes
/// the advanced offset back through the pointer, and leaves the file
/// position untouched. With `None` the kernel uses and advances the file
/// position instead. The adapter forwards both values verbatim; out-of-range
/// offsets or counts are the kernel's to reject.
///
/// # Returns
///
/// The native convention: the number of bytes transmitted on success, which
/// may be less than `count` (partial send - resuming is the caller's job),
/// or the unmodified OS error on failure. The call blocks or returns
/// `EAGAIN` according to the socket's own configured mode.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
/// use std::net::TcpStream;
///
/// # fn main() -> std::io::Result<()> {
/// let file = File::open("payload.bin")?;
/// let socket = TcpStream::connect("127.0.0.1:8080")?;
/// let sent = posix_io::sendfile(&file, &socket, None, 64 * 1024)?;
/// # Ok(())
/// # }
/// ```
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn sendfile(
    file: impl AsFd,
    socket: impl AsFd,
    offset: Option<&mut libc::off_t>,
    count: usize,
) -> io::Result<usize> {
    let file_fd = file.as_fd().as_raw_fd();
    let socket_fd = socket.as_fd().as_raw_fd();
    let offset = offset.map_or(std::ptr::null_mut(), std::ptr::from_mut);

    // SAFETY: both descriptors are live for the duration of the call via
    // the AsFd borrows, and the offset pointer is either null or a valid
    // exclusive borrow the kernel may write back through.
    let sent = unsafe { libc::sendfile(socket_fd, file_fd, offset, count) };

    if sent < 0 {
        let err = io::Error::last_os_error();
        trace_sendfile(file_fd, socket_fd, 0, err.raw_os_error());
        Err(err)
    } else {
        trace_sendfile(file_fd, socket_fd, sent as u64, None);
        Ok(sent as usize)
    }
}

/// Transmits up to `count` bytes of `file` starting at `offset` onto
/// `socket` via the FreeBSD `sendfile(2)` syscall, with optional header and
/// trailer buffers sent atomically adjacent to the file region.
///
/// `count` of `0` means "until end of file", per the native semantics. The
/// file position is neither consulted nor advanced - only the explicit
/// `offset` selects the range. The native `flags` argument is passed as
/// zero.
///
/// # Returns
///
/// The native two-channel convention, unnormalized: the syscall status and
/// the `sbytes` report of bytes actually transmitted (headers and trailers
/// included). `sbytes` is meaningful even when the status is an error -
/// `EAGAIN` after a partial send still reports the bytes that left - which
/// is why it is not folded into the `Result`.
#[cfg(target_os = "freebsd")]
pub fn sendfile(
    file: impl AsFd,
    socket: impl AsFd,
    offset: libc::off_t,
    count: usize,
    hdtr: Option<&HeaderTrailer<'_>>,
) -> (io::Result<()>, u64) {
    let file_fd = file.as_fd().as_raw_fd();
    let socket_fd = socket.as_fd().as_raw_fd();
    let mut raw_hdtr = hdtr.map(HeaderTrailer::as_raw);
    let hdtr_ptr = raw_hdtr.as_mut().map_or(ptr::null_mut(), ptr::from_mut);
    let mut sbytes: libc::off_t = 0;

    // SAFETY: descriptors are live via the AsFd borrows; raw_hdtr and the
    // iovec arrays it points at outlive the call (borrowed from hdtr);
    // sbytes is a valid out-parameter. The kernel only reads the hdtr
    // memory.
    let rc = unsafe {
        libc::sendfile(
            file_fd,
            socket_fd,
            offset,
            count,
            hdtr_ptr,
            &raw mut sbytes,
            0,
        )
    };

    let status = if rc < 0 {
        let err = io::Error::last_os_error();
        trace_sendfile(file_fd, socket_fd, sbytes as u64, err.raw_os_error());
        Err(err)
    } else {
        trace_sendfile(file_fd, socket_fd, sbytes as u64, None);
        Ok(())
    };
    (status, sbytes as u64)
}

/// Transmits up to `count` bytes of `file` starting at `offset` onto
/// `socket` via the Darwin `sendfile(2)` syscall, with optional header and
/// trailer buffers sent atomically adjacent to the file region.
///
/// `count` of `0` means "until end of file", per the native semantics. The
/// file position is neither consulted nor advanced - only the explicit
/// `offset` selects the range. The native `flags` argument is reserved on
/// Darwin and passed as zero.
///
/// # Returns
///
/// The native two-channel convention, unnormalized: the syscall status and
/// the final value of the kernel's in/out `len` parameter (bytes actually
/// transmitted, headers and trailers included). The byte report is
/// meaningful even when the status is an error - `EAGAIN` after a partial
/// send still reports the bytes that left - which is why it is not folded
/// into the `Result`.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub fn sendfile(
    file: impl AsFd,
    socket: impl AsFd,
    offset: libc::off_t,
    count: libc::off_t,
    hdtr: Option<&HeaderTrailer<'_>>,
) -> (io::Result<()>, u64) {
    let file_fd = file.as_fd().as_raw_fd();
    let socket_fd = socket.as_fd().as_raw_fd();
    let mut raw_hdtr = hdtr.map(HeaderTrailer::as_raw);
    let hdtr_ptr = raw_hdtr.as_mut().map_or(ptr::null_mut(), ptr::from_mut);
    let mut len = count;

    // SAFETY: descriptors are live via the AsFd borrows; raw_hdtr and the
    // iovec arrays it points at outlive the call (borrowed from hdtr); len
    // is a valid in/out parameter. The kernel only reads the hdtr memory.
    let rc = unsafe { libc::sendfile(file_fd, socket_fd, offset, &raw mut len, hdtr_ptr, 0) };

    let status = if rc < 0 {
        let err = io::Error::last_os_error();
        trace_sendfile(file_fd, socket_fd, len as u64, err.raw_os_error());
        Err(err)
    } else {
        trace_sendfile(file_fd, socket_fd, len as u64, None);
        Ok(())
    };
    (status, len as u64)
}

/// Records one adapter call outcome as a structured event.
#[cfg(feature = "tracing")]
#[inline]
fn trace_sendfile(file_fd: RawFd, socket_fd: RawFd, sent: u64, errno: Option<i32>) {
    tracing::trace!(
        target: "posix_io",
        operation = "sendfile",
        file_fd,
        socket_fd,
        sent,
        errno,
        "sendfile moved {sent} bytes"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
fn trace_sendfile(_file_fd: RawFd, _socket_fd: RawFd, _sent: u64, _errno: Option<i32>) {}

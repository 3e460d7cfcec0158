//! Unified zero-copy file-to-socket transfer for POSIX targets.
//!
//! This crate binds the native `sendfile` syscall of each supported platform
//! family under one call-site name, so higher-level file servers and proxies
//! can push a file descriptor's contents onto a socket without branching on
//! the operating system. It also carries a `splice` binding on Linux for
//! pipe-based zero-copy transfer.
//!
//! # Platform Support
//!
//! - **Linux / Android**: `sendfile(2)` moving a raw byte range with an
//!   optional in/out offset pointer. There is no header/trailer concept in
//!   this lineage, so the Linux signature of [`sendfile`] has no descriptor
//!   parameter at all - code that assumes one fails to compile rather than
//!   silently dropping the buffers.
//! - **FreeBSD**: `sendfile(2)` accepting a `HeaderTrailer` descriptor
//!   sent atomically adjacent to the file region, reporting bytes via the
//!   `sbytes` out-parameter.
//! - **macOS / iOS**: the Darwin `sendfile(2)` variant, same descriptor
//!   support, reporting bytes via the in/out `len` parameter.
//! - **Anything else**: compilation fails. NetBSD and OpenBSD have no
//!   `sendfile` syscall, and a runtime stub would misrepresent capability,
//!   so unsupported targets are rejected at build time.
//!
//! # Design
//!
//! Every binding is a direct, stateless pass-through: one syscall per call,
//! no buffering, no retry, no translation of the native return convention.
//! A successful call may transmit fewer bytes than requested; resuming after
//! a partial send or a would-block condition is the caller's job, using the
//! unmodified error the kernel produced. Platform selection happens once,
//! at compile time, via `#[cfg]` - there is no runtime branch anywhere in
//! the crate.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::net::TcpStream;
//!
//! # #[cfg(target_os = "linux")]
//! # fn main() -> std::io::Result<()> {
//! let file = File::open("payload.bin")?;
//! let socket = TcpStream::connect("127.0.0.1:8080")?;
//! let mut offset: libc::off_t = 0;
//! let sent = posix_io::sendfile(&file, &socket, Some(&mut offset), 1024 * 1024)?;
//! println!("sent {sent} bytes, next offset {offset}");
//! # Ok(())
//! # }
//! # #[cfg(not(target_os = "linux"))]
//! # fn main() {}
//! ```

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "macos",
    target_os = "ios",
)))]
compile_error!(
    "posix_io requires a native sendfile syscall: Linux/Android, FreeBSD, or macOS/iOS. \
     There is no fallback path for other targets."
);

#[cfg(any(target_os = "freebsd", target_os = "macos", target_os = "ios"))]
pub mod hdtr;
pub mod sendfile;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod splice;

#[cfg(any(target_os = "freebsd", target_os = "macos", target_os = "ios"))]
pub use hdtr::HeaderTrailer;
pub use sendfile::sendfile;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub use splice::{SPLICE_F_MORE, SPLICE_F_MOVE, SPLICE_F_NONBLOCK, splice};

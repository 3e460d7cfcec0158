//! Pipe-based zero-copy transfer using the Linux `splice` syscall.
//!
//! `splice(2)` moves bytes between two descriptors without a userspace
//! copy, provided at least one side is a pipe. Like the `sendfile`
//! adapter, this is a single-call binding with the native return
//! convention: one syscall per call, partial transfers and `EAGAIN` are
//! the caller's to handle with the unmodified error signal.
//!
//! # Platform Support
//!
//! - **Linux / Android** only. The module does not exist on other targets,
//!   so use fails to compile there rather than degrading at runtime.

use std::io;
use std::os::fd::{AsFd, AsRawFd, RawFd};

pub use libc::{SPLICE_F_MORE, SPLICE_F_MOVE, SPLICE_F_NONBLOCK};

/// Moves up to `len` bytes from `input` to `output` via `splice(2)`.
///
/// At least one of the two descriptors must be a pipe (kernel-enforced).
/// For the non-pipe side, `Some(&mut off)` reads/writes at that explicit
/// offset and writes the advanced value back without touching the file
/// position; `None` uses the descriptor's own position. An offset on a
/// pipe descriptor is invalid and rejected by the kernel.
///
/// `flags` is a bitmask of the re-exported `SPLICE_F_*` constants,
/// forwarded verbatim.
///
/// # Returns
///
/// The native convention: bytes moved on success (`0` means end of input),
/// or the unmodified OS error on failure. No retry, no loop - a short
/// transfer is resumed by the caller.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
///
/// # fn main() -> std::io::Result<()> {
/// let file = File::open("payload.bin")?;
/// # let pipe_writer: std::fs::File = unimplemented!();
/// let mut offset: libc::loff_t = 0;
/// let moved = posix_io::splice(
///     &file,
///     Some(&mut offset),
///     &pipe_writer,
///     None,
///     64 * 1024,
///     posix_io::SPLICE_F_MOVE | posix_io::SPLICE_F_MORE,
/// )?;
/// # Ok(())
/// # }
/// ```
pub fn splice(
    input: impl AsFd,
    off_in: Option<&mut libc::loff_t>,
    output: impl AsFd,
    off_out: Option<&mut libc::loff_t>,
    len: usize,
    flags: libc::c_uint,
) -> io::Result<usize> {
    let input_fd = input.as_fd().as_raw_fd();
    let output_fd = output.as_fd().as_raw_fd();
    let off_in = off_in.map_or(std::ptr::null_mut(), std::ptr::from_mut);
    let off_out = off_out.map_or(std::ptr::null_mut(), std::ptr::from_mut);

    // SAFETY: both descriptors are live for the duration of the call via
    // the AsFd borrows, and each offset pointer is either null or a valid
    // exclusive borrow the kernel may write back through.
    let moved = unsafe { libc::splice(input_fd, off_in, output_fd, off_out, len, flags) };

    if moved < 0 {
        let err = io::Error::last_os_error();
        trace_splice(input_fd, output_fd, 0, err.raw_os_error());
        Err(err)
    } else {
        trace_splice(input_fd, output_fd, moved as u64, None);
        Ok(moved as usize)
    }
}

/// Records one splice call outcome as a structured event.
#[cfg(feature = "tracing")]
#[inline]
fn trace_splice(input_fd: RawFd, output_fd: RawFd, moved: u64, errno: Option<i32>) {
    tracing::trace!(
        target: "posix_io",
        operation = "splice",
        input_fd,
        output_fd,
        moved,
        errno,
        "splice moved {moved} bytes"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
fn trace_splice(_input_fd: RawFd, _output_fd: RawFd, _moved: u64, _errno: Option<i32>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::{Read, Seek, SeekFrom, Write};
    use std::os::fd::{FromRawFd, OwnedFd};
    use tempfile::NamedTempFile;

    /// Raw pipe wrapped into owned descriptors.
    fn pipe() -> (OwnedFd, OwnedFd) {
        let mut fds = [0i32; 2];
        let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(rc, 0, "failed to create pipe");
        // SAFETY: on success both descriptors are freshly created and owned
        // by no one else.
        unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) }
    }

    #[test]
    fn moves_bytes_between_pipes() {
        // Mirror of the classic fifo-to-fifo relay: fill one pipe, splice
        // 1024 bytes into the other, read them back intact.
        let data = vec![b'a'; 1024];
        let (source_read, source_write) = pipe();
        let (sink_read, sink_write) = pipe();

        let mut writer = File::from(source_write);
        writer.write_all(&data).unwrap();
        drop(writer);

        let moved = splice(
            &source_read,
            None,
            &sink_write,
            None,
            1024,
            SPLICE_F_MOVE | SPLICE_F_MORE,
        )
        .unwrap();
        assert_eq!(moved, 1024);
        drop(sink_write);

        let mut received = Vec::new();
        File::from(sink_read).read_to_end(&mut received).unwrap();
        assert_eq!(received, data);
    }

    #[test]
    fn file_offset_is_advanced_through_pointer() {
        let content = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        let mut source = NamedTempFile::new().unwrap();
        source.write_all(content).unwrap();
        source.flush().unwrap();
        source.seek(SeekFrom::Start(0)).unwrap();
        let (sink_read, sink_write) = pipe();

        let mut offset: libc::loff_t = 10;
        let moved = splice(source.as_file(), Some(&mut offset), &sink_write, None, 10, 0).unwrap();
        drop(sink_write);

        assert_eq!(moved, 10);
        assert_eq!(offset, 20);
        // The explicit offset leaves the file position alone.
        assert_eq!(source.as_file().stream_position().unwrap(), 0);

        let mut received = Vec::new();
        File::from(sink_read).read_to_end(&mut received).unwrap();
        assert_eq!(received, b"ABCDEFGHIJ");
    }

    #[test]
    fn end_of_input_reports_zero() {
        let (source_read, source_write) = pipe();
        let (_sink_read, sink_write) = pipe();
        drop(source_write);

        let moved = splice(&source_read, None, &sink_write, None, 1024, 0).unwrap();
        assert_eq!(moved, 0);
    }

    #[test]
    fn kernel_error_is_forwarded_unmodified() {
        // Neither side is a pipe; the kernel rejects the call and the raw
        // errno reaches the caller untranslated.
        let source = NamedTempFile::new().unwrap();
        let sink = NamedTempFile::new().unwrap();

        let err = splice(source.as_file(), None, sink.as_file(), None, 16, 0).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::EINVAL));
    }

    #[test]
    fn would_block_on_full_pipe() {
        let (_sink_read, sink_write) = pipe();
        let mut source = NamedTempFile::new().unwrap();
        let payload = vec![0u8; 256 * 1024];
        source.write_all(&payload).unwrap();
        source.flush().unwrap();

        // Default pipe capacity is 64KB; keep splicing without draining
        // until the kernel reports the pipe full.
        let mut offset: libc::loff_t = 0;
        let err = loop {
            match splice(
                source.as_file(),
                Some(&mut offset),
                &sink_write,
                None,
                payload.len(),
                SPLICE_F_NONBLOCK,
            ) {
                Ok(n) => assert!(n > 0),
                Err(err) => break err,
            }
        };
        assert_eq!(err.raw_os_error(), Some(libc::EAGAIN));
        assert!(offset > 0);
    }
}

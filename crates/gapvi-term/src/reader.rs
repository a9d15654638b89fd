// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Background input reader.
//
// A worker thread reads raw bytes and sends them over an mpsc channel so
// the event loop can wait with `recv_timeout` and still notice a lone ESC
// or a resize between keystrokes.
//
// For stdin on unix the worker polls the fd with a short timeout and checks
// a stop flag between polls, so `stop()` never waits on a blocked `read()`.
// Any other `Read` source (used by tests and non-unix builds) is read
// directly until EOF.

use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Bytes requested per `read()`. Keystrokes are a few bytes; a paste can be
/// much larger and simply arrives in several chunks.
const READ_BUF_SIZE: usize = 4096;

/// How long the stdin worker waits in `poll()` before rechecking the stop
/// flag, in milliseconds.
#[cfg(unix)]
const POLL_TIMEOUT_MS: i32 = 50;

/// Handle to the reader thread. Stops the thread when dropped.
pub struct InputReader {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl InputReader {
    /// Start reading stdin.
    ///
    /// Each received `Vec<u8>` is a non-empty chunk. The channel closes at
    /// EOF, on a read error, or after [`stop`](Self::stop).
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn_stdin() -> io::Result<(Self, Receiver<Vec<u8>>)> {
        Self::spawn_with(|tx, stop| {
            #[cfg(unix)]
            poll_stdin(&tx, &stop);

            #[cfg(not(unix))]
            pump(io::stdin(), &tx, &stop);
        })
    }

    /// Start reading an arbitrary byte source until EOF.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn_from<R>(source: R) -> io::Result<(Self, Receiver<Vec<u8>>)>
    where
        R: Read + Send + 'static,
    {
        Self::spawn_with(move |tx, stop| pump(source, &tx, &stop))
    }

    fn spawn_with<F>(work: F) -> io::Result<(Self, Receiver<Vec<u8>>)>
    where
        F: FnOnce(Sender<Vec<u8>>, Arc<AtomicBool>) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("input-reader".into())
            .spawn(move || work(tx, stop_flag))?;

        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Ask the thread to exit and wait for it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read `source` chunk by chunk until EOF, error, stop, or a closed channel.
fn pump(mut source: impl Read, tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    let mut buf = [0u8; READ_BUF_SIZE];
    while !stop.load(Ordering::Relaxed) {
        match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(_) => break,
        }
    }
}

/// Stdin worker: `poll()` with a timeout so the stop flag is seen promptly.
#[cfg(unix)]
fn poll_stdin(tx: &Sender<Vec<u8>>, stop: &AtomicBool) {
    use std::os::unix::io::AsRawFd;

    let fd = io::stdin().as_raw_fd();
    let mut buf = [0u8; READ_BUF_SIZE];

    while !stop.load(Ordering::Relaxed) {
        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
        };
        if ready <= 0 {
            continue;
        }

        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n <= 0 {
            break;
        }

        #[allow(clippy::cast_sign_loss)] // n > 0 checked above.
        let chunk = buf[..n as usize].to_vec();
        if tx.send(chunk).is_err() {
            break;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::time::Duration;

    fn drain(rx: &Receiver<Vec<u8>>) -> Vec<u8> {
        let mut all = Vec::new();
        while let Ok(chunk) = rx.recv_timeout(Duration::from_secs(2)) {
            all.extend(chunk);
        }
        all
    }

    #[test]
    fn reads_source_to_eof() {
        let (_reader, rx) = InputReader::spawn_from(Cursor::new(b"ihello\x1b".to_vec())).unwrap();
        assert_eq!(drain(&rx), b"ihello\x1b");
    }

    #[test]
    fn large_source_arrives_in_chunks() {
        let data = vec![b'p'; READ_BUF_SIZE * 3 + 7];
        let (_reader, rx) = InputReader::spawn_from(Cursor::new(data.clone())).unwrap();

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(first.len() <= READ_BUF_SIZE);

        let mut all = first;
        all.extend(drain(&rx));
        assert_eq!(all, data);
    }

    #[test]
    fn empty_source_closes_channel() {
        let (_reader, rx) = InputReader::spawn_from(Cursor::new(Vec::new())).unwrap();
        assert!(rx.recv_timeout(Duration::from_secs(2)).is_err());
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut reader, _rx) = InputReader::spawn_from(Cursor::new(b"x".to_vec())).unwrap();
        reader.stop();
        reader.stop();
    }

    #[test]
    fn stdin_reader_stops_without_hanging() {
        let (mut reader, _rx) = InputReader::spawn_stdin().unwrap();
        reader.stop();
    }

    #[test]
    fn drop_stops_reader() {
        let (reader, _rx) = InputReader::spawn_stdin().unwrap();
        drop(reader);
    }
}

// src/exec/io.rs

//! I/O endpoints a command's standard streams can be wired to.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard};

#[cfg(windows)]
pub const NULL_DEVICE: &str = "NUL";
#[cfg(not(windows))]
pub const NULL_DEVICE: &str = "/dev/null";

/// Open the platform's discard device for reading and writing.
pub fn open_null_device() -> io::Result<File> {
    OpenOptions::new().read(true).write(true).open(NULL_DEVICE)
}

/// In-memory byte buffer shared between clones.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::new(Mutex::new(bytes.into())),
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Contents decoded lossily as UTF-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn append(&self, data: &[u8]) {
        self.lock().extend_from_slice(data);
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Where one standard stream of a child goes (or comes from).
///
/// Cloning an endpoint shares the underlying handle.
#[derive(Debug, Clone, Default)]
pub enum Endpoint {
    /// The caller's own stream.
    #[default]
    Inherit,
    /// Nothing in, nothing out.
    Null,
    /// An open file handle.
    File(Arc<File>),
    /// A pipe drained into (or fed from) an in-memory buffer.
    Buffer(SharedBuffer),
}

impl Endpoint {
    pub fn file(file: File) -> Self {
        Endpoint::File(Arc::new(file))
    }

    pub fn buffer(buffer: &SharedBuffer) -> Self {
        Endpoint::Buffer(buffer.clone())
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self, Endpoint::Buffer(_))
    }

    /// Native stdio for a child process.
    pub(crate) fn to_stdio(&self) -> io::Result<Stdio> {
        Ok(match self {
            Endpoint::Inherit => Stdio::inherit(),
            Endpoint::Null => Stdio::null(),
            Endpoint::File(file) => Stdio::from(file.try_clone()?),
            Endpoint::Buffer(_) => Stdio::piped(),
        })
    }
}

/// Which of the caller's streams an `Inherit` endpoint stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Out,
    Err,
}

/// The three standard streams of the launcher itself.
///
/// The launcher both writes to these directly (version output, event log)
/// and hands them to children.
#[derive(Debug, Clone, Default)]
pub struct StdStreams {
    pub stdin: Endpoint,
    pub stdout: Endpoint,
    pub stderr: Endpoint,
}

impl StdStreams {
    /// The process's own stdin/stdout/stderr.
    pub fn inherit() -> Self {
        Self::default()
    }

    pub fn write_out(&self, data: &[u8]) -> io::Result<()> {
        write_endpoint(&self.stdout, Stream::Out, data)
    }

    pub fn write_err(&self, data: &[u8]) -> io::Result<()> {
        write_endpoint(&self.stderr, Stream::Err, data)
    }
}

fn write_endpoint(endpoint: &Endpoint, stream: Stream, data: &[u8]) -> io::Result<()> {
    match endpoint {
        Endpoint::Inherit => match stream {
            Stream::Out => {
                let mut out = io::stdout().lock();
                out.write_all(data)?;
                out.flush()
            }
            Stream::Err => io::stderr().lock().write_all(data),
        },
        Endpoint::Null => Ok(()),
        Endpoint::File(file) => {
            let mut handle: &File = file;
            handle.write_all(data)
        }
        Endpoint::Buffer(buffer) => {
            buffer.append(data);
            Ok(())
        }
    }
}

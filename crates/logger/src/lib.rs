//! Run history log.
//!
//! [`TimestampedTee`] forwards everything written to it to a terminal writer and
//! appends each complete line to a history file, prefixed with the local time.
//! The file is opened in append mode and never truncated.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time in the history log format.
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Removes ANSI CSI escape sequences (terminal colors) from a line.
pub fn strip_ansi(line: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len());
    let mut bytes = line.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        if b == 0x1b && bytes.peek() == Some(&b'[') {
            bytes.next();
            // Parameters run until the final byte in 0x40..=0x7e.
            for c in bytes.by_ref() {
                if (0x40..=0x7e).contains(&c) {
                    break;
                }
            }
            continue;
        }
        out.push(b);
    }
    out
}

pub struct TimestampedTee<T: Write> {
    terminal: T,
    file: Option<BufWriter<File>>,
    pending: Vec<u8>,
    path: PathBuf,
}

impl<T: Write> TimestampedTee<T> {
    /// Opens (or creates) the history file at `path` in append mode.
    pub fn open<P: AsRef<Path>>(path: P, terminal: T) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            terminal,
            file: Some(BufWriter::new(file)),
            pending: Vec::new(),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes any partial trailing line, flushes and closes the history file.
    pub fn finish(mut self) -> io::Result<()> {
        self.close()
    }

    fn log_complete_lines(&mut self) -> io::Result<()> {
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.write_stamped(&line)?;
        }
        Ok(())
    }

    fn write_stamped(&mut self, line: &[u8]) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            write!(file, "{} ", timestamp())?;
            file.write_all(&strip_ansi(line))?;
        }
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let mut line = std::mem::take(&mut self.pending);
            line.push(b'\n');
            self.write_stamped(&line)?;
        }
        if let Err(err) = self.terminal.flush() {
            eprintln!("Terminal flush error: {}", err);
        }
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }
}

impl<T: Write> Write for TimestampedTee<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // A broken terminal must not stop the history from being recorded.
        if let Err(err) = self.terminal.write_all(buf) {
            eprintln!("Terminal write error: {}", err);
        }
        if self.file.is_some() {
            self.pending.extend_from_slice(buf);
            self.log_complete_lines()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Err(err) = self.terminal.flush() {
            eprintln!("Terminal flush error: {}", err);
        }
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<T: Write> Drop for TimestampedTee<T> {
    fn drop(&mut self) {
        if self.file.is_some() {
            if let Err(err) = self.close() {
                eprintln!("History log close error ({}): {}", self.path.display(), err);
            }
        }
    }
}

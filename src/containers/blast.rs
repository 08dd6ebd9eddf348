use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use super::Decompressor;
use crate::error::{UncookError, UncookResult};

/// Default location of the decompressor binary, relative to the working
/// directory.
pub const DEFAULT_BLAST_PATH: &str = "vendor/blast";

/// PKWARE-style decompressor invoked as a child process. It reads the
/// compressed stream on stdin and writes decompressed bytes to stdout;
/// the exit code is its only verdict.
#[derive(Debug)]
pub struct BlastProcess {
    program: PathBuf,
}

impl BlastProcess {
    /// Check that the binary exists up front, so a missing tool is
    /// reported before any archive entry is touched.
    pub fn locate<P: AsRef<Path>>(program: P) -> UncookResult<Self> {
        let program = program.as_ref().to_path_buf();
        if !program.is_file() {
            return Err(UncookError::Configuration(format!(
                "decompressor not found at {}",
                program.display()
            )));
        }
        Ok(BlastProcess { program })
    }
}

impl Decompressor for BlastProcess {
    fn decompress(&self, compressed: &[u8], expected_size: usize) -> UncookResult<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| {
                UncookError::Configuration(format!(
                    "failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        // Feed stdin from a thread so a large stream cannot deadlock
        // against the child's stdout buffer. A write error here means
        // the child died early, which the exit status reports anyway.
        let mut stdin = child.stdin.take().ok_or_else(|| {
            UncookError::Configuration("decompressor stdin unavailable".to_string())
        })?;
        let input = compressed.to_vec();
        let feeder = thread::spawn(move || {
            let _ = stdin.write_all(&input);
        });

        let output = child.wait_with_output()?;
        let _ = feeder.join();

        if !output.status.success() {
            return Err(UncookError::Integrity(format!(
                "decompressor exited with {}",
                output.status
            )));
        }
        if output.stdout.len() != expected_size {
            return Err(UncookError::Integrity(format!(
                "decompressor produced {} bytes, directory promised {}",
                output.stdout.len(),
                expected_size
            )));
        }

        Ok(output.stdout)
    }
}

//! Test fixtures for building stage commands.

use tempfile::TempDir;

/// A temporary directory holding shell scripts used as pipeline stages.
///
/// Stage command lines cannot contain quoted arguments, so anything more
/// involved than a single command goes into a script file that is run with
/// `sh <path>`. The directory must be kept alive for the test duration.
pub struct ScriptDir {
    dir: TempDir,
}

impl ScriptDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Write `body` to a script called `name` and return the stage command
    /// line that runs it.
    pub fn script(&self, name: &str, body: &str) -> String {
        let path = self.dir.path().join(name);
        std::fs::write(&path, body).expect("Failed to write stage script");
        format!("sh {}", path.display())
    }

    /// Write a plain data file and return its path.
    #[allow(dead_code)]
    pub fn file(&self, name: &str, contents: &str) -> std::path::PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write data file");
        path
    }
}

/// Build a flat argument list from stage command lines, inserting `::`
/// between them.
#[allow(dead_code)]
pub fn pipeline_args(stages: &[&str]) -> Vec<String> {
    let mut args = Vec::new();
    for (index, stage) in stages.iter().enumerate() {
        if index > 0 {
            args.push("::".to_string());
        }
        args.extend(stage.split(' ').map(str::to_string));
    }
    args
}

/// Whether a process with exactly this argument vector is alive.
///
/// Zombies have an empty command line in `/proc`, so a killed but
/// not yet reaped process does not count.
#[cfg(target_os = "linux")]
#[allow(dead_code)]
pub fn process_running(args: &[&str]) -> bool {
    let wanted = args.join("\0");
    let Ok(entries) = std::fs::read_dir("/proc") else {
        return false;
    };
    entries.flatten().any(|entry| {
        std::fs::read(entry.path().join("cmdline"))
            .map(|raw| String::from_utf8_lossy(&raw).trim_end_matches('\0') == wanted)
            .unwrap_or(false)
    })
}

/// An output sink whose every write fails with a broken pipe.
#[allow(dead_code)]
pub struct BrokenSink;

impl tokio::io::AsyncWrite for BrokenSink {
    fn poll_write(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &[u8],
    ) -> std::task::Poll<std::io::Result<usize>> {
        std::task::Poll::Ready(Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe)))
    }

    fn poll_flush(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn poll_shutdown(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Ok(()))
    }
}

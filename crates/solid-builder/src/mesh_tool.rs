//! The external mesh-conversion executable boundary.
//!
//! Converting patch rasters into a solid-geometry file is delegated to a
//! separately installed command-line tool. Its location is resolved once by
//! the configuration layer and injected here; invocation is an explicit
//! subprocess boundary with a declared timeout and distinct error mapping
//! (not found, non-zero exit, timeout, zero batches).

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use subset_common::{SubsetError, SubsetResult};
use tracing::{debug, info};

/// Marker phrase the tool prints once per patch.
pub const BATCH_MARKER: &str = "Number of triangles in patch";

/// Environment variable naming the tool's install directory.
pub const INSTALL_DIR_ENV: &str = "MASK_UTILS_HOME";

/// Accepted executable names, newest first.
pub const EXECUTABLE_NAMES: [&str; 2] = ["mask-to-solid", "mask2solid"];

const WAIT_POLL: Duration = Duration::from_millis(50);

/// Handle to the installed mesh-conversion executable.
#[derive(Debug, Clone)]
pub struct MeshTool {
    executable: PathBuf,
    timeout: Duration,
}

impl MeshTool {
    /// Wrap an explicit executable path with the default 10 minute timeout.
    pub fn new(executable: PathBuf) -> Self {
        Self {
            executable,
            timeout: Duration::from_secs(600),
        }
    }

    /// Override the subprocess timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Locate the executable on the local system.
    ///
    /// Search order: the install directory named by `MASK_UTILS_HOME`, then
    /// the directories on `PATH`; both historical executable names are
    /// accepted. Fails with [`SubsetError::MeshToolNotFound`] when neither
    /// search finds one.
    pub fn locate() -> SubsetResult<PathBuf> {
        if let Ok(dir) = std::env::var(INSTALL_DIR_ENV) {
            for name in EXECUTABLE_NAMES {
                let candidate = Path::new(&dir).join(name);
                if candidate.is_file() {
                    debug!(path = %candidate.display(), "located mesh tool via {INSTALL_DIR_ENV}");
                    return Ok(candidate);
                }
            }
        }
        if let Some(paths) = std::env::var_os("PATH") {
            for dir in std::env::split_paths(&paths) {
                for name in EXECUTABLE_NAMES {
                    let candidate = dir.join(name);
                    if candidate.is_file() {
                        debug!(path = %candidate.display(), "located mesh tool on PATH");
                        return Ok(candidate);
                    }
                }
            }
        }
        Err(SubsetError::MeshToolNotFound(format!(
            "no {} found in ${INSTALL_DIR_ENV} or on PATH",
            EXECUTABLE_NAMES.join(" or ")
        )))
    }

    /// Run the tool over six patch raster files, producing
    /// `<out_name>.sol` and `<out_name>.vtk`, and return its captured
    /// standard output.
    pub fn convert(
        &self,
        patch_files: &crate::builder::PatchFiles,
        out_name: &Path,
        z_top: f64,
        z_bottom: f64,
    ) -> SubsetResult<String> {
        let solid = out_name.with_extension("sol");
        let vtk = out_name.with_extension("vtk");
        let mut command = Command::new(&self.executable);
        command
            .arg("--mask-top")
            .arg(&patch_files.top)
            .arg("--mask-bottom")
            .arg(&patch_files.bottom)
            .arg("--mask-left")
            .arg(&patch_files.left)
            .arg("--mask-right")
            .arg(&patch_files.right)
            .arg("--mask-front")
            .arg(&patch_files.front)
            .arg("--mask-back")
            .arg(&patch_files.back)
            .arg("--solid")
            .arg(&solid)
            .arg("--vtk")
            .arg(&vtk)
            .arg("--z-top")
            .arg(z_top.to_string())
            .arg("--z-bottom")
            .arg(z_bottom.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        info!(executable = %self.executable.display(), solid = %solid.display(), "invoking mesh tool");

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SubsetError::MeshToolNotFound(self.executable.display().to_string())
            } else {
                SubsetError::Io(e)
            }
        })?;

        // drain the pipes on their own threads so a chatty child cannot
        // block on a full pipe while we poll for exit
        let stdout_reader = spawn_pipe_reader(child.stdout.take());
        let stderr_reader = spawn_pipe_reader(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SubsetError::MeshToolTimeout {
                        seconds: self.timeout.as_secs(),
                    });
                }
                None => thread::sleep(WAIT_POLL),
            }
        };

        let stdout = join_pipe_reader(stdout_reader);
        let stderr = join_pipe_reader(stderr_reader);
        if !status.success() {
            return Err(SubsetError::MeshToolFailed {
                status: status.code().unwrap_or(-1),
                stderr,
            });
        }
        debug!(bytes = stdout.len(), "captured mesh tool output");
        Ok(stdout)
    }
}

fn spawn_pipe_reader<R: Read + Send + 'static>(
    pipe: Option<R>,
) -> Option<thread::JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    })
}

fn join_pipe_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Extract the per-patch triangle counts from the tool's output.
///
/// Every line containing the marker phrase contributes its trailing numeric
/// token. An empty result means the tool produced no patches; callers must
/// treat that as fatal.
pub fn parse_batch_counts(output: &str) -> Vec<u64> {
    output
        .lines()
        .filter(|line| line.contains(BATCH_MARKER))
        .filter_map(|line| {
            line.split_whitespace()
                .rev()
                .find_map(|token| token.parse::<u64>().ok())
        })
        .collect()
}

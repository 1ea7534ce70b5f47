use std::io::{BufRead, BufReader, Read};
#[cfg(unix)]
use std::io::ErrorKind;
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command as ProcessCommand, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
#[cfg(unix)]
use std::time::Instant;

use crossbeam_channel::Sender;
use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::debug;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{kill, Signal};
#[cfg(unix)]
use nix::unistd::{setpgid, Pid};

use crate::config::ContainerSpec;
use crate::logs::{CancelToken, LogRequest, Resource, TailError, Tailable};

const REAP_INTERVAL: Duration = Duration::from_millis(40);
const TERMINATE_GRACE: Duration = Duration::from_secs(2);

/// A resource whose containers are local shell commands.
///
/// Every stream runs `sh -lc <run>` in its own process group; stdout and
/// stderr lines are forwarded to the sink and cancelling the stream
/// terminates the whole group.
#[derive(Debug, Clone)]
pub struct ShellResource {
    cwd: PathBuf,
    containers: IndexMap<String, String>,
}

impl ShellResource {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            containers: IndexMap::new(),
        }
    }

    pub fn from_specs(cwd: impl Into<PathBuf>, specs: &[ContainerSpec]) -> Self {
        specs
            .iter()
            .fold(Self::new(cwd), |resource, spec| {
                resource.with_container(&spec.name, &spec.run)
            })
    }

    pub fn with_container(mut self, name: &str, run: &str) -> Self {
        self.containers.insert(name.to_owned(), run.to_owned());
        self
    }
}

impl Resource for ShellResource {
    fn kind(&self) -> &str {
        "shell"
    }

    fn tailable(&self) -> Option<&dyn Tailable> {
        Some(self)
    }
}

impl Tailable for ShellResource {
    fn logs(
        &self,
        request: &LogRequest,
        sink: Sender<String>,
        cancel: &CancelToken,
    ) -> Result<(), TailError> {
        let Some(run) = self.containers.get(&request.container) else {
            return Err(TailError::UnknownContainer {
                container: request.container.clone(),
            });
        };
        let mut child = shell_command(run, &self.cwd, request)
            .spawn()
            .map_err(|source| TailError::Spawn {
                container: request.container.clone(),
                command: run.clone(),
                source,
            })?;
        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(TailError::MissingStdio {
                container: request.container.clone(),
            });
        };

        forward_lines(stdout, sink.clone(), cancel.clone());
        forward_lines(stderr, sink, cancel.clone());

        let pgid = child.id();
        let child = Arc::new(Mutex::new(child));
        {
            let child = child.clone();
            let container = request.container.clone();
            cancel.on_cancel(move || {
                thread::spawn(move || {
                    terminate_graceful(&child, pgid, TERMINATE_GRACE);
                    debug!(container = %container, pgid, "shell log stream terminated");
                });
            });
        }
        {
            let container = request.container.clone();
            thread::spawn(move || loop {
                let status = child.lock().try_wait();
                match status {
                    Ok(Some(status)) => {
                        debug!(container = %container, status = %status, "shell log stream exited");
                        break;
                    }
                    Ok(None) => thread::sleep(REAP_INTERVAL),
                    Err(err) => {
                        debug!(container = %container, error = %err, "shell log stream wait failed");
                        break;
                    }
                }
            });
        }
        Ok(())
    }
}

fn forward_lines<R>(pipe: R, sink: Sender<String>, cancel: CancelToken)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(pipe);
        for line in reader.lines().map_while(Result::ok) {
            if cancel.is_cancelled() || sink.send(line).is_err() {
                break;
            }
        }
    });
}

fn shell_command(run: &str, cwd: &Path, request: &LogRequest) -> ProcessCommand {
    let mut process = ProcessCommand::new("sh");
    process
        .arg("-lc")
        .arg(run)
        .current_dir(cwd)
        .env("TAILVIEW_NAMESPACE", &request.namespace)
        .env("TAILVIEW_NAME", &request.name)
        .env("TAILVIEW_CONTAINER", &request.container)
        .env("TAILVIEW_TAIL_LINES", request.tail_lines.to_string())
        .env("TAILVIEW_PREVIOUS", if request.previous { "1" } else { "0" })
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    unsafe {
        process.pre_exec(|| {
            setpgid(Pid::from_raw(0), Pid::from_raw(0))
                .map_err(|error| std::io::Error::new(ErrorKind::Other, error.to_string()))
        });
    }
    process
}

/// SIGTERM to the process group, SIGKILL once `grace` runs out.
///
/// The group is addressed by the id recorded at spawn, so members outliving
/// an already reaped leader are still reached.
#[cfg(unix)]
fn terminate_graceful(_child: &Mutex<Child>, pgid: u32, grace: Duration) {
    let Ok(pgid) = i32::try_from(pgid) else {
        return;
    };
    if !signal_process_group(pgid, Signal::SIGTERM) {
        return;
    }
    let deadline = Instant::now() + grace;
    while Instant::now() < deadline {
        if !group_alive(pgid) {
            return;
        }
        thread::sleep(REAP_INTERVAL);
    }
    if signal_process_group(pgid, Signal::SIGKILL) {
        debug!(pgid, "shell process group killed after grace period");
    }
}

#[cfg(not(unix))]
fn terminate_graceful(child: &Mutex<Child>, _pgid: u32, _grace: Duration) {
    let _ = child.lock().kill();
}

/// Sends `signal` to every member of the group. `false` once the group is gone.
#[cfg(unix)]
fn signal_process_group(pgid: i32, signal: Signal) -> bool {
    if pgid <= 0 {
        return false;
    }
    match kill(Pid::from_raw(-pgid), signal) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        Err(err) => {
            debug!(pgid, error = %err, "signalling shell process group failed");
            false
        }
    }
}

#[cfg(unix)]
fn group_alive(pgid: i32) -> bool {
    kill(Pid::from_raw(-pgid), None).is_ok()
}

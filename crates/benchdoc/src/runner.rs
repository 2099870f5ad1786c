//! # Benchmark Runner
//!
//! Spawns the external benchmark command and captures its standard output.
//! Standard error is captured separately and only surfaces in
//! [`BenchdocError::ProcessFailure`].

use crate::config::CommandConfig;
use crate::error::{BenchdocError, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// How often a child with a deadline is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the benchmark command and returns its stdout
#[derive(Debug, Clone)]
pub struct BenchmarkRunner {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
    echo: bool,
}

impl BenchmarkRunner {
    /// Create runner for an arbitrary command
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
            timeout: None,
            echo: false,
        }
    }

    /// Create runner from the `[command]` configuration section
    pub fn from_config(config: &CommandConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.clone(),
            timeout: config.timeout,
            echo: config.echo,
        }
    }

    /// Kill the command if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Print each stdout line as it arrives
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Command line as it would be typed in a shell
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command to completion and return its captured stdout
    pub fn run(&self) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::info!(command = %self.command_line(), "Running benchmark command");
        let mut child = cmd.spawn().map_err(|source| BenchdocError::Spawn {
            command: self.command_line(),
            source,
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("Failed to capture stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("Failed to capture stderr"))?;

        // Both pipes are drained concurrently so a full stderr buffer cannot stall the child.
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let stdout_reader = spawn_reader(stdout, self.echo);
        let stderr_reader = spawn_reader(stderr, false);

        let status = match deadline {
            None => child.wait()?,
            Some(deadline) => match wait_until(&mut child, deadline)? {
                Some(status) => status,
                None => return Err(self.timed_out()),
            },
        };

        // A background process may outlive the child and keep the pipes open.
        let output = self.collect_output(&stdout_reader, deadline)?;
        let errors = self.collect_output(&stderr_reader, deadline)?;

        tracing::debug!(
            stdout_bytes = output.len(),
            stderr_bytes = errors.len(),
            %status,
            "Benchmark command finished"
        );

        if !status.success() {
            return Err(BenchdocError::ProcessFailure {
                status,
                stderr: errors,
            });
        }

        Ok(output)
    }
}

impl BenchmarkRunner {
    /// Wait for a reader to hit EOF, giving up at `deadline`
    fn collect_output(
        &self,
        reader: &Receiver<std::io::Result<String>>,
        deadline: Option<Instant>,
    ) -> Result<String> {
        let received = match deadline {
            None => reader.recv().map_err(|_| RecvTimeoutError::Disconnected),
            Some(deadline) => {
                reader.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
        };

        match received {
            Ok(output) => Ok(output?),
            Err(RecvTimeoutError::Timeout) => Err(self.timed_out()),
            Err(RecvTimeoutError::Disconnected) => {
                Err(std::io::Error::other("Output reader thread panicked").into())
            }
        }
    }

    fn timed_out(&self) -> BenchdocError {
        let timeout = self.timeout.unwrap_or_default();
        tracing::warn!(
            command = %self.command_line(),
            timeout = %humantime::format_duration(timeout),
            "Benchmark command timed out"
        );
        BenchdocError::Timeout {
            command: self.command_line(),
            timeout,
        }
    }
}

impl Default for BenchmarkRunner {
    fn default() -> Self {
        Self::from_config(&CommandConfig::default())
    }
}

/// Read a pipe to EOF, keeping line structure intact
fn read_stream<R: Read>(stream: R, echo: bool) -> std::io::Result<String> {
    let mut reader = BufReader::new(stream);
    let mut output = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if echo {
            print!("{}", line);
        }
        output.push_str(&line);
    }

    Ok(output)
}

/// Drain `stream` on its own thread; the result arrives on the returned channel.
///
/// Readers are never joined, so one blocked on a pipe held open by a
/// background process cannot stall the caller.
fn spawn_reader<R: Read + Send + 'static>(
    stream: R,
    echo: bool,
) -> Receiver<std::io::Result<String>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let _ = sender.send(read_stream(stream, echo));
    });
    receiver
}

/// Wait for the child, killing it once `deadline` has passed.
///
/// Returns `None` when the child was killed.
fn wait_until(child: &mut Child, deadline: Instant) -> Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }

        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_runner_is_cargo_release() {
        let runner = BenchmarkRunner::default();
        assert_eq!(runner.command_line(), "cargo run --release");
        assert!(runner.timeout.is_none());
    }

    #[test]
    fn test_from_config() {
        let config = CommandConfig {
            program: "just".to_string(),
            args: vec!["bench".to_string()],
            working_dir: Some(PathBuf::from("/tmp")),
            timeout: Some(Duration::from_secs(5)),
            echo: true,
        };
        let runner = BenchmarkRunner::from_config(&config);
        assert_eq!(runner.command_line(), "just bench");
        assert_eq!(runner.timeout, Some(Duration::from_secs(5)));
        assert!(runner.echo);
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_only() {
        let runner = BenchmarkRunner::new(
            "sh",
            ["-c", "printf 'Day 01:\\nTime: 10ms\\n'; echo noise >&2"],
        );
        let output = runner.run().unwrap();
        assert_eq!(output, "Day 01:\nTime: 10ms\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_process_failure() {
        let runner = BenchmarkRunner::new("sh", ["-c", "echo partial; echo boom >&2; exit 3"]);
        match runner.run() {
            Err(BenchdocError::ProcessFailure { status, stderr }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "boom\n");
            }
            other => panic!("expected ProcessFailure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_child() {
        let runner = BenchmarkRunner::new("sh", ["-c", "exec sleep 5"])
            .with_timeout(Duration::from_millis(200));
        let started = Instant::now();
        let result = runner.run();
        assert!(matches!(result, Err(BenchdocError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_covers_background_process_holding_stdout() {
        let runner = BenchmarkRunner::new("sh", ["-c", "sleep 6 & echo 'Day 01:'"])
            .with_timeout(Duration::from_millis(500));
        let started = Instant::now();
        let result = runner.run();
        assert!(matches!(result, Err(BenchdocError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[cfg(unix)]
    #[test]
    fn test_fast_command_beats_timeout() {
        let runner = BenchmarkRunner::new("sh", ["-c", "echo 'Total time: 1ms'"])
            .with_timeout(Duration::from_secs(10));
        assert_eq!(runner.run().unwrap(), "Total time: 1ms\n");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let runner = BenchmarkRunner::new("benchdoc-definitely-not-a-program", Vec::<String>::new());
        assert!(matches!(runner.run(), Err(BenchdocError::Spawn { .. })));
    }

    #[test]
    fn test_read_stream_keeps_partial_last_line() {
        let output = read_stream("a\nb".as_bytes(), false).unwrap();
        assert_eq!(output, "a\nb");
    }
}

use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use docinfer_core::OllamaConfig;
use tracing::debug;

/// Answers whether AI analysis can run before any expensive work starts.
pub trait BackendProbe: Send + Sync {
    fn is_backend_running(&self) -> bool;
    fn is_model_present(&self, model: &str) -> bool;

    fn is_backend_available(&self, model: &str) -> bool {
        self.is_backend_running() && self.is_model_present(model)
    }
}

/// Probes a local Ollama install through its `list` inventory command.
///
/// A missing executable, a non-zero exit or a timeout all read as "not available".
#[derive(Debug, Clone)]
pub struct OllamaProbe {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl OllamaProbe {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args: vec!["list".to_string()],
            timeout,
        }
    }

    pub fn from_config(config: &OllamaConfig) -> Self {
        Self::new(config.command.clone(), config.probe_timeout())
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Stdout of the inventory command, or `None` if it could not be run to success.
    fn run_inventory(&self) -> Option<String> {
        let mut child = match Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                debug!(command = %self.command, "inventory probe could not start: {err}");
                return None;
            }
        };

        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) => {
                    if started.elapsed() >= self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        debug!(
                            command = %self.command,
                            "inventory probe timed out after {:?}",
                            self.timeout
                        );
                        return None;
                    }
                    thread::sleep(Duration::from_millis(50));
                }
                Err(err) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    debug!(command = %self.command, "inventory probe failed: {err}");
                    return None;
                }
            }
        }

        let output = child.wait_with_output().ok()?;
        if !output.status.success() {
            debug!(command = %self.command, status = %output.status, "inventory probe exited unsuccessfully");
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl BackendProbe for OllamaProbe {
    fn is_backend_running(&self) -> bool {
        self.run_inventory().is_some()
    }

    fn is_model_present(&self, model: &str) -> bool {
        self.run_inventory()
            .is_some_and(|inventory| inventory_lists_model(&inventory, model))
    }
}

/// `gemma2` and `gemma2:latest` both match an inventory entry for `gemma2`.
fn inventory_lists_model(inventory: &str, model: &str) -> bool {
    let base = model.split(':').next().unwrap_or(model).trim();
    !base.is_empty() && inventory.contains(base)
}

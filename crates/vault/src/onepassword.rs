//! 1Password CLI backend.
//!
//! Resolves `op://vault/item/field` references by running `op read <ref>` and
//! capturing its trimmed stdout.

use std::{
    ffi::OsString,
    path::PathBuf,
    process::Stdio,
    time::Duration,
};

use {
    async_trait::async_trait,
    secrecy::Secret,
    tokio::{process::Command, time::timeout},
    tracing::{debug, warn},
};

use crate::{
    error::{Result, VaultError},
    traits::SecretResolver,
};

/// Default `op` binary name.
pub const DEFAULT_PROGRAM: &str = "op";

/// Default per-reference timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Shells out to the 1Password CLI.
#[derive(Debug, Clone)]
pub struct OnePasswordResolver {
    program: OsString,
    leading_args: Vec<OsString>,
    timeout: Duration,
}

impl OnePasswordResolver {
    /// `op` from `PATH` with the default timeout.
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.into(),
            leading_args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Locate `op` on `PATH`, returning `None` when it is not installed.
    pub fn detect() -> Option<Self> {
        let path = which::which(DEFAULT_PROGRAM).ok()?;
        debug!(path = %path.display(), "found 1Password CLI");
        Some(Self::new().with_program(path))
    }

    /// Use a specific binary instead of `op` from `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into().into_os_string();
        self
    }

    /// Run `program leading_args... read <ref>` instead of `op read <ref>`.
    pub fn with_command(
        mut self,
        program: impl Into<OsString>,
        leading_args: impl IntoIterator<Item = impl Into<OsString>>,
    ) -> Self {
        self.program = program.into();
        self.leading_args = leading_args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl Default for OnePasswordResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretResolver for OnePasswordResolver {
    async fn resolve(&self, reference: &str) -> Result<Secret<String>> {
        debug!(reference, "resolving secret reference");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .arg("read")
            .arg(reference)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let output = match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VaultError::NotInstalled {
                    program: self.program_name(),
                });
            },
            Ok(Err(e)) => return Err(VaultError::failed(reference, e)),
            Err(_) => {
                warn!(reference, timeout_ms, "secret resolution timed out");
                return Err(VaultError::TimedOut {
                    reference: reference.to_string(),
                    timeout_ms,
                });
            },
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("exited with {}", output.status),
                s => s.to_string(),
            };
            warn!(reference, exit_code = ?output.status.code(), "secret resolution failed");
            return Err(VaultError::Failed {
                reference: reference.to_string(),
                reason,
            });
        }

        let value = String::from_utf8(output.stdout)
            .map_err(|_| VaultError::failed(reference, "output is not valid UTF-8"))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(VaultError::Empty {
                reference: reference.to_string(),
            });
        }

        debug!(reference, "secret reference resolved");
        Ok(Secret::new(value.to_string()))
    }
}

//! X.509 certificate rendering through an external command

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{CoreError, CoreResult};

/// Turns PEM bytes into human-readable certificate text.
#[async_trait]
pub trait CertificateDecoder: Send + Sync {
    async fn decode(&self, pem: &[u8]) -> CoreResult<String>;
}

/// Runs a command (by default `openssl x509 -text`) with the PEM on stdin
/// and returns its stdout.
///
/// The child is killed if the returned future is dropped.
#[derive(Debug, Clone)]
pub struct CommandCertificateDecoder {
    program: String,
    args: Vec<String>,
}

impl CommandCertificateDecoder {
    /// `command[0]` is the program, the rest its arguments.
    pub fn new(command: &[String]) -> CoreResult<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| CoreError::Config("certificate_command must name a program".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn openssl() -> Self {
        Self {
            program: "openssl".to_string(),
            args: vec!["x509".to_string(), "-text".to_string()],
        }
    }
}

#[async_trait]
impl CertificateDecoder for CommandCertificateDecoder {
    async fn decode(&self, pem: &[u8]) -> CoreResult<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CoreError::Certificate(format!("failed to run {}: {e}", self.program)))?;

        let stdin = child.stdin.take();
        let pem = pem.to_vec();
        let write = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&pem).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };

        // Feed stdin while draining stdout, or a large output could deadlock
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output
            .map_err(|e| CoreError::Certificate(format!("failed to wait for {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(CoreError::Certificate(if stderr.is_empty() {
                format!("{} {}", self.program, output.status)
            } else {
                format!("{} {}: {stderr}", self.program, output.status)
            }));
        }
        written.map_err(|e| {
            CoreError::Certificate(format!("failed to write to {}: {e}", self.program))
        })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

//! Common test utilities for reqpad integration tests
//!
//! This module provides shared test infrastructure including:
//! - CLI invocation helpers with an isolated config directory
//! - Output parsing and assertion helpers

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Exit status codes matching the Rust application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
}

impl From<i32> for ExitStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => ExitStatus::Success,
            _ => ExitStatus::Error,
        }
    }
}

/// Result of running the CLI
#[derive(Debug)]
pub struct CliResponse {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit status code
    pub exit_status: ExitStatus,
    /// Raw exit code
    pub exit_code: i32,
}

impl CliResponse {
    /// Parse stdout as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(self.stdout.trim())
            .unwrap_or_else(|e| panic!("stdout is not JSON ({}): {}", e, self.stdout))
    }

    /// First line of stdout, trimmed
    pub fn first_line(&self) -> &str {
        self.stdout.lines().next().unwrap_or("").trim()
    }

    /// Check if stdout contains a substring
    pub fn contains(&self, needle: &str) -> bool {
        self.stdout.contains(needle)
    }
}

/// Isolated environment for a test: its own config directory and store
pub struct MockEnvironment {
    /// Temporary config directory
    pub config_dir: TempDir,
    /// Environment variables to set
    pub env_vars: HashMap<String, String>,
    /// Standard input content
    pub stdin: Option<Vec<u8>>,
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEnvironment {
    /// Create a new mock environment
    pub fn new() -> Self {
        let config_dir = TempDir::new().expect("Failed to create temp config dir");
        Self {
            config_dir,
            env_vars: HashMap::new(),
            stdin: None,
        }
    }

    /// Set an environment variable
    pub fn set_env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Set stdin content
    pub fn set_stdin(&mut self, content: Vec<u8>) -> &mut Self {
        self.stdin = Some(content);
        self
    }

    /// Write `config.toml` into the config directory
    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_dir.path().join("config.toml"), content)
            .expect("Failed to write config");
    }

    /// Get the config directory path
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().to_path_buf()
    }

    /// Path of the default store file
    pub fn store_path(&self) -> PathBuf {
        self.config_dir.path().join("store.json")
    }
}

/// Run the CLI with the given arguments and environment
pub fn reqpad(args: &[&str], env: &MockEnvironment) -> CliResponse {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reqpad"));
    cmd.args(args);

    // Set up environment
    cmd.env("REQPAD_CONFIG_DIR", env.config_path());
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("RUST_LOG");
    for (key, value) in &env.env_vars {
        cmd.env(key, value);
    }

    // Configure stdio
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    if let Some(ref stdin_data) = env.stdin {
        cmd.stdin(Stdio::piped());
        let mut child = cmd.spawn().expect("Failed to spawn command");
        {
            let stdin = child.stdin.as_mut().expect("Failed to open stdin");
            stdin.write_all(stdin_data).expect("Failed to write to stdin");
        }
        let output = child.wait_with_output().expect("Failed to wait for command");
        parse_output(output)
    } else {
        cmd.stdin(Stdio::null());
        let output = cmd.output().expect("Failed to execute command");
        parse_output(output)
    }
}

fn parse_output(output: Output) -> CliResponse {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(1);

    CliResponse {
        stdout,
        stderr,
        exit_status: ExitStatus::from(exit_code),
        exit_code,
    }
}

/// Strip ANSI color codes from a string
pub fn strip_colors(s: &str) -> String {
    let re = regex::Regex::new(r"\x1b\[[\d;]*m").unwrap();
    re.replace_all(s, "").to_string()
}

/// Create a temporary file with the given content
pub fn create_temp_file(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = dir.path().join(name);
    std::fs::write(&file_path, content).expect("Failed to write temp file");
    (dir, file_path)
}

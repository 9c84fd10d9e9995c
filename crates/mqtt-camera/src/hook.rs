/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: LicenseRef-NvidiaProprietary
 *
 * NVIDIA CORPORATION, its affiliates and licensors retain all intellectual
 * property and proprietary rights in and to this material, related
 * documentation and any modifications thereto. Any use, reproduction,
 * disclosure or distribution of this material and related documentation
 * without an express license agreement from NVIDIA CORPORATION or
 * its affiliates is strictly prohibited.
 */

// src/hook.rs
// PostProcessHook runs an optional external command on every captured
// file.
//
// The configured template is handed to `sh -c` with the file path
// appended after a single space, so the template may contain its own
// arguments, pipes or redirections. Output is captured and logged but
// never interpreted.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::MqttCameraError;

// SHELL is the interpreter the command line is handed to.
const SHELL: &str = "sh";

// PostProcessOutput is what a finished command left behind.
#[derive(Debug, Clone)]
pub struct PostProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl PostProcessOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostProcessHook {
    command: Option<String>,
}

impl PostProcessHook {
    // new creates a hook for the given template. A missing or blank
    // template disables the hook.
    pub fn new(command: Option<String>) -> Self {
        Self {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        self.command.is_some()
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    // command_line is the full shell command for path, if configured.
    pub fn command_line(&self, path: &Path) -> Option<String> {
        self.command
            .as_ref()
            .map(|template| format!("{template} {}", path.display()))
    }

    // run executes the command for path and waits for it to exit.
    // Returns Ok(None) when no command is configured. A command that
    // runs but exits non-zero is still Ok; check the output status.
    pub async fn run(&self, path: &Path) -> Result<Option<PostProcessOutput>, MqttCameraError> {
        let Some(command_line) = self.command_line(path) else {
            return Ok(None);
        };

        debug!(command = %command_line, "Running post-process command");
        let output = Command::new(SHELL)
            .arg("-c")
            .arg(&command_line)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                MqttCameraError::post_process_failed(&format!("could not run '{command_line}': {e}"))
            })?;

        let output = PostProcessOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            command = %command_line,
            stdout = %output.stdout.trim_end(),
            stderr = %output.stderr.trim_end(),
            "Post-process command output"
        );
        if !output.success() {
            warn!(
                command = %command_line,
                status = %output.status,
                "Post-process command exited unsuccessfully"
            );
        }
        Ok(Some(output))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_blank_command_disables_hook() {
        assert!(!PostProcessHook::new(None).is_configured());
        assert!(!PostProcessHook::new(Some("   ".to_string())).is_configured());
        assert!(PostProcessHook::new(Some("true".to_string())).is_configured());
    }

    #[test]
    fn test_command_line_appends_path() {
        let hook = PostProcessHook::new(Some("upload.sh --bucket cams".to_string()));
        assert_eq!(
            hook.command_line(&PathBuf::from("/tmp/20240101-000000.jpg")),
            Some("upload.sh --bucket cams /tmp/20240101-000000.jpg".to_string())
        );
        assert_eq!(PostProcessHook::disabled().command_line(Path::new("x")), None);
    }

    #[tokio::test]
    async fn test_run_disabled_is_noop() {
        let output = PostProcessHook::disabled()
            .run(Path::new("/tmp/none.jpg"))
            .await
            .unwrap();
        assert!(output.is_none());
    }

    #[tokio::test]
    async fn test_run_captures_output() {
        let hook = PostProcessHook::new(Some("echo captured".to_string()));
        let output = hook
            .run(Path::new("/tmp/a.jpg"))
            .await
            .unwrap()
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "captured /tmp/a.jpg\n");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_run_reports_failure_status() {
        let hook = PostProcessHook::new(Some("echo oops >&2; exit 3;".to_string()));
        let output = hook.run(Path::new("ignored")).await.unwrap().unwrap();
        assert!(!output.success());
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.stderr, "oops\n");
    }
}

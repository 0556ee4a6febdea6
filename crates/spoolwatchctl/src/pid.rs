/*
 *  Copyright 2025-2026 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! PID file handling for the long-running agent.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use sysinfo::{Pid, System};

/// Writes this process's PID to `path`, refusing if the recorded process is
/// still alive. A stale file left by a dead process is overwritten.
pub fn acquire_pid_file(path: &Path) -> Result<()> {
    if let Some(pid) = read_pid_file(path)? {
        if pid != std::process::id() && is_process_running(pid) {
            anyhow::bail!(
                "Agent is already running (PID {} in {})",
                pid,
                path.display()
            );
        }
    }
    write_pid_file(path)
}

/// Write current process PID to PID file
pub fn write_pid_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create PID file directory: {}", parent.display())
        })?;
    }

    fs::write(path, std::process::id().to_string())
        .with_context(|| format!("Failed to write PID file: {}", path.display()))
}

/// Read PID from PID file
pub fn read_pid_file(path: &Path) -> Result<Option<u32>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read PID file: {}", path.display()))?;

    let pid: u32 = content
        .trim()
        .parse()
        .with_context(|| format!("Invalid PID in PID file: {}", content.trim()))?;

    Ok(Some(pid))
}

/// Clean up PID file
pub fn cleanup_pid_file(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove PID file: {}", path.display()))?;
    }
    Ok(())
}

pub fn is_process_running(pid: u32) -> bool {
    let mut system = System::new();
    system.refresh_process(Pid::from(pid as usize))
}

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

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use crate::config::loader::{default_config_path, write_default_config};

pub fn run(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path.unwrap_or_else(default_config_path);
    write_default_config(&path, force)?;

    println!(
        "{} Wrote default configuration to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "{} Edit server.api_url and server.office_name before running the agent",
        "→".cyan().bold()
    );
    Ok(())
}

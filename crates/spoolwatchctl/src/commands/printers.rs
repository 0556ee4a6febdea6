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
use spoolwatch::Spooler;

use super::LoadedConfig;

pub async fn run(loaded: &LoadedConfig, quiet: bool) -> Result<()> {
    let printers = loaded.config.cups_spooler().list_printers().await;

    if printers.is_empty() {
        if !quiet {
            println!("{} No printers found", "⚠".yellow().bold());
        }
        return Ok(());
    }

    for printer in printers {
        println!("{}", printer);
    }
    Ok(())
}

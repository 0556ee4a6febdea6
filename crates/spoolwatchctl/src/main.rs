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
use clap::Parser;
use spoolwatchctl::commands::{self, run::RunOverrides};
use spoolwatchctl::config::LoggingConfig;
use spoolwatchctl::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            ref api_url,
            interval,
            ref log_level,
        } => {
            let mut loaded = commands::load_config(cli.config.as_deref())?;
            RunOverrides {
                api_url: api_url.clone(),
                interval,
                log_level: log_level.clone(),
            }
            .apply(&mut loaded.config)?;

            // Held until exit so buffered file output is flushed.
            let _guard = init_logging(&loaded.config.logging, cli.verbose, cli.quiet)?;
            commands::run::run(loaded).await?;
        }
        Commands::Check { format } => {
            let loaded = commands::load_config(cli.config.as_deref())?;
            let _guard = init_logging(
                &console_only(&loaded.config.logging),
                cli.verbose,
                cli.quiet,
            )?;
            commands::check::run(&loaded, format).await?;
        }
        Commands::Printers => {
            let loaded = commands::load_config(cli.config.as_deref())?;
            let _guard = init_logging(
                &console_only(&loaded.config.logging),
                cli.verbose,
                cli.quiet,
            )?;
            commands::printers::run(&loaded, cli.quiet).await?;
        }
        Commands::InitConfig { ref path, force } => {
            let _guard = init_logging(&LoggingConfig::default(), cli.verbose, cli.quiet)?;
            commands::init_config::run(path.clone(), force)?;
        }
    }

    Ok(())
}

/// One-shot commands log to the console only.
fn console_only(logging: &LoggingConfig) -> LoggingConfig {
    LoggingConfig {
        log_file: None,
        ..logging.clone()
    }
}

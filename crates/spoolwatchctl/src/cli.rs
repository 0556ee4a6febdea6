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

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "spoolwatchctl",
    version,
    about = "Reports completed print jobs from the local CUPS spooler to a collection API",
    long_about = "Watches the CUPS completed-job history and posts each newly finished job, \
                  once, to an HTTP collection endpoint"
)]
pub struct Cli {
    /// Configuration file (defaults to SPOOLWATCH_CONFIG, then the search paths)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Monitor the spooler and report completed jobs until stopped
    Run {
        /// Collection endpoint, overriding server.api_url
        #[arg(long, env = "SPOOLWATCH_API_URL")]
        api_url: Option<String>,

        /// Poll interval in seconds, overriding monitor.poll_interval_secs
        #[arg(long, value_name = "SECONDS")]
        interval: Option<u64>,

        /// Log level, overriding logging.log_level
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Check configuration, spooler and API connectivity
    Check {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },

    /// List printers known to the spooler
    Printers,

    /// Write a default configuration file
    InitConfig {
        /// Destination (defaults to the user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

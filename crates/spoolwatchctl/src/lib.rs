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

//! Command-line agent for [`spoolwatch`].
//!
//! Loads a TOML configuration, sets up logging and runs the print job
//! monitor against the local CUPS spooler.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod pid;

pub use cli::{Cli, Commands, OutputFormat};
pub use commands::LoadedConfig;
pub use logging::init_logging;

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

//! Agent configuration, loaded from TOML.
//!
//! Files are looked up in a fixed list of locations (see [`ConfigLoader`]),
//! `${VAR}` references are expanded from the environment, and the result is
//! checked with [`Validate`] before the agent starts.

pub mod defaults;
pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use defaults::generate_default_config_toml;
pub use error::{ConfigError, ValidationError};
pub use loader::ConfigLoader;
pub use types::*;
pub use validation::Validate;

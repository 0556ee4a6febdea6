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
use serde::Serialize;
use spoolwatch::delivery::health_url;
use spoolwatch::{Delivery, DeliveryClient, DeliveryError, Spooler};
use std::path::PathBuf;
use url::Url;

use super::{machine_name, LoadedConfig};
use crate::cli::OutputFormat;

/// Result of checking the spooler and the collection API.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckReport {
    pub config_file: Option<PathBuf>,
    pub api_url: String,
    pub health_url: Option<String>,
    pub office_name: String,
    pub machine_name: String,
    pub cups_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cups_error: Option<String>,
    pub api_reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_error: Option<String>,
    pub printers: Vec<String>,
}

/// Checks the spooler and the API and prints the report.
///
/// Fails when CUPS is unavailable, after printing. An unusable `api_url`
/// is reported, not fatal.
pub async fn run(loaded: &LoadedConfig, format: OutputFormat) -> Result<()> {
    let client = DeliveryClient::new(
        &loaded.config.server.api_url,
        loaded.config.delivery_timeout(),
    );
    let spooler = loaded.config.cups_spooler();

    let delivery = client.as_ref().map(|client| client as &dyn Delivery);
    let report = gather(loaded, &spooler, delivery, machine_name()).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => print_human(&report),
    }

    if !report.cups_available {
        anyhow::bail!("CUPS is not available");
    }
    Ok(())
}

pub async fn gather(
    loaded: &LoadedConfig,
    spooler: &dyn Spooler,
    delivery: Result<&dyn Delivery, &DeliveryError>,
    machine_name: String,
) -> CheckReport {
    let server = &loaded.config.server;

    let (cups_available, cups_error) = match spooler.is_scheduler_running().await {
        Ok(true) => (true, None),
        Ok(false) => (false, Some("scheduler is not running".to_string())),
        Err(e) => (false, Some(e.to_string())),
    };
    let printers = if cups_available {
        spooler.list_printers().await
    } else {
        Vec::new()
    };
    let (api_reachable, api_error) = match delivery {
        Ok(delivery) => (delivery.health_check().await, None),
        Err(e) => (false, Some(e.to_string())),
    };

    CheckReport {
        config_file: loaded.source.clone(),
        api_url: server.api_url.clone(),
        health_url: Url::parse(&server.api_url)
            .ok()
            .map(|url| health_url(&url).to_string()),
        office_name: server.office_name.clone(),
        machine_name,
        cups_available,
        cups_error,
        api_reachable,
        api_error,
        printers,
    }
}

fn print_human(report: &CheckReport) {
    println!("{}", "Spoolwatch configuration".bold());
    match report.config_file {
        Some(ref path) => println!("  Config file: {}", path.display()),
        None => println!("  Config file: {}", "none (built-in defaults)".yellow()),
    }
    println!("  API URL:     {}", report.api_url);
    if let Some(ref health) = report.health_url {
        println!("  Health URL:  {}", health);
    }
    println!("  Office:      {}", report.office_name);
    println!("  Machine:     {}", report.machine_name);
    println!();

    if report.cups_available {
        println!("{} CUPS is running", "✓".green().bold());
    } else {
        println!(
            "{} CUPS is not available: {}",
            "✗".red().bold(),
            report.cups_error.as_deref().unwrap_or("unknown error")
        );
    }

    if report.api_reachable {
        println!("{} API is reachable", "✓".green().bold());
    } else if let Some(ref error) = report.api_error {
        println!("{} API client unusable: {}", "✗".red().bold(), error);
    } else {
        println!(
            "{} API is not reachable (jobs will be dropped until it is)",
            "⚠".yellow().bold()
        );
    }

    if report.cups_available {
        if report.printers.is_empty() {
            println!("{} No printers found", "⚠".yellow().bold());
        } else {
            println!("{} Printers: {}", "→".cyan().bold(), report.printers.join(", "));
        }
    }
}

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

use std::sync::{Arc, Mutex};
use std::time::Duration;

use spoolwatch::{
    DeliveryOutcome, Extractor, Monitor, MonitorConfig, MonitorError, MonitorState,
    ShutdownHandle, SpoolerError, TickStats,
};

use crate::fixtures::{wait_until, JournalLedger, RecordingDelivery, ScriptedSpooler};

fn job(id: u32) -> String {
    format!("HP_LaserJet-{} alice 1024 Mon 11 Jun 2025 10:30:00 AM", id)
}

fn jobs(ids: &[u32]) -> Vec<String> {
    ids.iter().map(|id| job(*id)).collect()
}

fn monitor(
    spooler: Arc<ScriptedSpooler>,
    delivery: Arc<RecordingDelivery>,
    config: MonitorConfig,
) -> Monitor {
    Monitor::new(spooler, delivery, Extractor::new("WS-01"), config)
}

#[tokio::test]
async fn test_records_carry_scraped_detail() {
    let spooler = Arc::new(
        ScriptedSpooler::new(|_| Ok(jobs(&[42]))).with_detail(
            "42",
            "job-originating-user-name = alice\n\
             document-name = quarterly report.pdf\n\
             job-media-sheets-completed pages = 7\n\
             job-k-octets size = 2048",
        ),
    );
    let delivery = Arc::new(RecordingDelivery::accepting());
    let mut monitor = monitor(spooler, delivery.clone(), MonitorConfig::default());

    let stats = monitor.tick().await.unwrap();

    assert_eq!(stats.delivered, 1);
    let records = delivery.received();
    assert_eq!(records[0].printer_name, "HP LaserJet");
    assert_eq!(records[0].user_name, "alice");
    assert_eq!(records[0].machine_name, "WS-01");
    assert_eq!(records[0].document_name, "quarterly report.pdf");
    assert_eq!(records[0].page_count, 7);
    assert_eq!(records[0].file_size, 2048);
    assert!(records[0].job_id.starts_with("cups-42-"));
}

#[tokio::test]
async fn test_duplicates_emitted_once_within_and_across_ticks() {
    let spooler = Arc::new(ScriptedSpooler::new(|_| Ok(jobs(&[7, 7, 8]))));
    let delivery = Arc::new(RecordingDelivery::accepting());
    let mut monitor = monitor(spooler, delivery.clone(), MonitorConfig::default());

    let first = monitor.tick().await.unwrap();
    assert_eq!(first.delivered, 2);
    assert_eq!(first.duplicates, 1);

    let second = monitor.tick().await.unwrap();
    assert_eq!(second.delivered, 0);
    assert_eq!(second.duplicates, 3);

    assert_eq!(delivery.received().len(), 2);
    assert_eq!(monitor.ledger().len(), 2);
}

#[tokio::test]
async fn test_ledger_cleared_only_above_ceiling() {
    let spooler = Arc::new(ScriptedSpooler::new(|call| match call {
        0 => Ok(jobs(&[1, 2, 3])),
        1 => Ok(jobs(&[1, 2, 3, 4])),
        _ => Ok(jobs(&[1, 2, 3])),
    }));
    let delivery = Arc::new(RecordingDelivery::accepting());
    let config = MonitorConfig {
        ledger_ceiling: 3,
        ..MonitorConfig::default()
    };
    let mut monitor = monitor(spooler, delivery.clone(), config);

    // Exactly at the ceiling: kept.
    let stats = monitor.tick().await.unwrap();
    assert_eq!(stats.ledger_resets, 0);
    assert_eq!(monitor.ledger().len(), 3);

    let stats = monitor.tick().await.unwrap();
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.ledger_resets, 1);
    assert!(monitor.ledger().is_empty());

    // Jobs still in spooler history come back after a reset.
    let stats = monitor.tick().await.unwrap();
    assert_eq!(stats.delivered, 3);
    assert_eq!(delivery.received().len(), 7);
}

#[tokio::test]
async fn test_substituted_ledger_drives_dedup_and_reset() {
    let spooler = Arc::new(ScriptedSpooler::new(|call| match call {
        0 => Ok(jobs(&[1, 1, 2])),
        _ => Ok(jobs(&[1, 2, 3])),
    }));
    let delivery = Arc::new(RecordingDelivery::accepting());
    let journal = JournalLedger::default();
    let config = MonitorConfig {
        ledger_ceiling: 2,
        ..MonitorConfig::default()
    };
    let mut monitor =
        monitor(spooler, delivery.clone(), config).with_ledger(Box::new(journal.clone()));

    let first = monitor.tick().await.unwrap();
    assert_eq!(first.delivered, 2);
    assert_eq!(first.duplicates, 1);
    assert_eq!(journal.recorded().len(), 2);
    assert_eq!(journal.resets(), 0);

    // Job 3 pushes the ledger past the ceiling and the monitor clears it.
    let second = monitor.tick().await.unwrap();
    assert_eq!(second.delivered, 1);
    assert_eq!(second.duplicates, 2);
    assert_eq!(journal.resets(), 1);
    assert!(monitor.ledger().is_empty());
    assert_eq!(journal.recorded().len(), 3);
    assert_eq!(delivery.received().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_totals_accumulate_across_ticks() {
    let stop: Arc<Mutex<Option<ShutdownHandle>>> = Arc::default();
    let slot = stop.clone();
    let spooler = Arc::new(ScriptedSpooler::new(move |call| match call {
        0 => Ok(vec![job(1), "garbage".to_string()]),
        1 => Err(SpoolerError::NotInstalled {
            command: "lpstat".to_string(),
        }),
        _ => {
            if let Some(handle) = slot.lock().unwrap().take() {
                handle.trigger();
            }
            Ok(jobs(&[1, 2]))
        }
    }));
    let delivery = Arc::new(RecordingDelivery::accepting());
    let mut monitor = monitor(spooler, delivery, MonitorConfig::default());
    *stop.lock().unwrap() = Some(monitor.shutdown_handle());

    assert_eq!(monitor.totals(), TickStats::default());

    let returned = monitor.run().await.unwrap();
    let totals = monitor.totals();

    assert_eq!(returned, totals);
    assert_eq!(totals.ticks, 3);
    assert_eq!(totals.failed_ticks, 1);
    assert_eq!(totals.lines, 4);
    assert_eq!(totals.malformed, 1);
    assert_eq!(totals.duplicates, 1);
    assert_eq!(totals.delivered, 2);
}

#[tokio::test]
async fn test_malformed_and_blank_lines_are_skipped() {
    let spooler = Arc::new(ScriptedSpooler::new(|_| {
        Ok(vec![
            "garbage".to_string(),
            "   ".to_string(),
            job(5),
            "HP_LaserJet-6".to_string(),
        ])
    }));
    let delivery = Arc::new(RecordingDelivery::accepting());
    let mut monitor = monitor(spooler, delivery.clone(), MonitorConfig::default());

    let stats = monitor.tick().await.unwrap();

    assert_eq!(stats.lines, 3);
    assert_eq!(stats.malformed, 2);
    assert_eq!(stats.delivered, 1);
    assert_eq!(delivery.received()[0].spooler_job_id, "5");
}

#[tokio::test]
async fn test_failed_deliveries_do_not_abort_tick() {
    let spooler = Arc::new(ScriptedSpooler::new(|_| Ok(jobs(&[1, 2, 3]))));
    let delivery = Arc::new(RecordingDelivery::new(DeliveryOutcome::Rejected {
        status: 500,
        body: "boom".to_string(),
    }));
    let mut monitor = monitor(spooler, delivery.clone(), MonitorConfig::default());

    let stats = monitor.tick().await.unwrap();

    assert_eq!(stats.rejected, 3);
    assert_eq!(delivery.received().len(), 3);
    // Failed deliveries are not retried.
    assert_eq!(monitor.ledger().len(), 3);
}

#[tokio::test]
async fn test_listing_failure_fails_tick() {
    let spooler = Arc::new(ScriptedSpooler::new(|_| {
        Err(SpoolerError::Timeout {
            command: "lpstat".to_string(),
            after: Duration::from_secs(10),
        })
    }));
    let delivery = Arc::new(RecordingDelivery::accepting());
    let mut monitor = monitor(spooler, delivery, MonitorConfig::default());

    let err = monitor.tick().await.unwrap_err();
    assert!(matches!(err, MonitorError::Spooler(SpoolerError::Timeout { .. })));
}

#[tokio::test]
async fn test_startup_fails_when_scheduler_down() {
    let spooler = Arc::new(ScriptedSpooler::repeating(&[]).scheduler_down());
    let delivery = Arc::new(RecordingDelivery::accepting());
    let mut monitor = monitor(spooler.clone(), delivery, MonitorConfig::default());

    let err = monitor.run().await.unwrap_err();

    assert!(matches!(err, MonitorError::SpoolerUnavailable { .. }));
    assert_eq!(monitor.state(), MonitorState::Stopped);
    assert_eq!(spooler.list_calls(), 0);
}

#[tokio::test]
async fn test_unhealthy_endpoint_does_not_block_startup() {
    let spooler = Arc::new(ScriptedSpooler::repeating(&[]));
    let delivery = Arc::new(RecordingDelivery::accepting().unhealthy());
    let mut monitor = monitor(spooler, delivery, MonitorConfig::default());

    monitor.initialize().await.unwrap();

    assert_eq!(monitor.state(), MonitorState::Running);
}

#[tokio::test(start_paused = true)]
async fn test_failed_tick_backs_off_then_resumes() {
    let spooler = Arc::new(ScriptedSpooler::new(|call| {
        if call == 0 {
            Err(SpoolerError::NotInstalled {
                command: "lpstat".to_string(),
            })
        } else {
            Ok(jobs(&[9]))
        }
    }));
    let delivery = Arc::new(RecordingDelivery::accepting());
    let mut monitor = monitor(spooler.clone(), delivery.clone(), MonitorConfig::default());
    delivery.stop_on_first_delivery(monitor.shutdown_handle());

    let start = tokio::time::Instant::now();
    let totals = monitor.run().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(totals.ticks, 2);
    assert_eq!(totals.failed_ticks, 1);
    assert_eq!(totals.delivered, 1);
    assert_eq!(spooler.list_calls(), 2);
    // One error backoff, not a poll interval, separates the two ticks.
    assert!(elapsed >= Duration::from_secs(10));
    assert!(elapsed < Duration::from_secs(15));
}

#[tokio::test]
async fn test_stop_during_tick_finishes_the_tick() {
    let spooler = Arc::new(ScriptedSpooler::new(|_| Ok(jobs(&[1, 2, 3]))));
    let delivery = Arc::new(RecordingDelivery::accepting());
    let mut monitor = monitor(spooler.clone(), delivery.clone(), MonitorConfig::default());
    delivery.stop_on_first_delivery(monitor.shutdown_handle());

    let totals = monitor.run().await.unwrap();

    assert_eq!(totals.ticks, 1);
    assert_eq!(totals.delivered, 3);
    assert_eq!(spooler.list_calls(), 1);
    assert_eq!(monitor.state(), MonitorState::Stopped);
}

#[tokio::test]
async fn test_stop_during_sleep_returns_promptly() {
    let spooler = Arc::new(ScriptedSpooler::repeating(&[]));
    let delivery = Arc::new(RecordingDelivery::accepting());
    let config = MonitorConfig {
        poll_interval: Duration::from_secs(60),
        ..MonitorConfig::default()
    };
    let mut monitor = monitor(spooler.clone(), delivery, config);
    let shutdown = monitor.shutdown_handle();

    let task = tokio::spawn(async move {
        let result = monitor.run().await;
        (monitor, result)
    });

    let watched = spooler.clone();
    assert!(wait_until(move || watched.list_calls() >= 1, Duration::from_secs(5)).await);
    shutdown.trigger();

    let (monitor, result) = tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("monitor did not stop within the sleep")
        .unwrap();

    assert_eq!(result.unwrap().ticks, 1);
    assert_eq!(spooler.list_calls(), 1);
    assert_eq!(monitor.state(), MonitorState::Stopped);
}

#[tokio::test]
async fn test_keeps_polling_while_endpoint_is_down() {
    // Seven fresh jobs every tick against an endpoint that never answers.
    let spooler = Arc::new(ScriptedSpooler::new(|call| {
        let base = (call as u32) * 7;
        Ok(jobs(&(base..base + 7).collect::<Vec<_>>()))
    }));
    let delivery = Arc::new(RecordingDelivery::new(DeliveryOutcome::Unreachable {
        reason: "connection refused".to_string(),
    }));
    let config = MonitorConfig {
        ledger_ceiling: 20,
        ..MonitorConfig::default()
    };
    let mut monitor = monitor(spooler, delivery.clone(), config);

    let mut unreachable = 0;
    for _ in 0..50 {
        let stats = monitor.tick().await.unwrap();
        unreachable += stats.unreachable;
        assert!(monitor.ledger().len() <= 20);
    }

    assert_eq!(unreachable, 350);
    assert_eq!(delivery.received().len(), 350);
}

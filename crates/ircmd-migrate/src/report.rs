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

// src/report.rs
// Human-readable progress output. Everything here goes to stdout;
// logs go to stderr through tracing.

use std::fmt::Write;

use ircmd::command::CommandKind;
use ircmd::{COMMAND_TOPIC_PREFIX, CommandTable, IrPublishError, PublishProgress, PublishSummary};

use crate::config::MigrateConfig;

const SEND_TOPIC: &str = "home/ir/1/send";
const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn banner() -> String {
    format!("{}\nIR Command Migration to MQTT\n{}\n", rule(), rule())
}

pub fn connecting(config: &MigrateConfig) -> String {
    format!("\nConnecting to {}...", config.broker_addr())
}

// plan renders a dry run: every topic and the exact payload that
// would be retained on it.
pub fn plan(table: &CommandTable, plan: &[(String, Vec<u8>)]) -> String {
    let mut out = format!(
        "\nDry run: {} commands ({} protocol, {} raw) would be published\n\n",
        table.len(),
        table.protocol_count(),
        table.raw_count()
    );
    for (topic, payload) in plan {
        let _ = writeln!(out, "{topic}");
        let _ = writeln!(out, "    {}", String::from_utf8_lossy(payload));
    }
    out
}

// progress renders one step of a run as it happens.
pub fn progress(config: &MigrateConfig, event: &PublishProgress<'_>) -> String {
    match event {
        PublishProgress::Connected { commands } => format!(
            "✓ Connected to MQTT broker\n\nPublishing {commands} commands to MQTT broker...\nBroker: {}\n\n",
            config.broker_addr()
        ),
        PublishProgress::Sent { name, summary } => {
            format!("✓ Published: {name}\n    Type: {summary}\n")
        }
        PublishProgress::SendFailed { name, error } => format!("✗ Failed: {name} ({error})\n"),
        PublishProgress::WaitingForAcks { timeout } => format!(
            "\nWaiting up to {} for the broker to acknowledge...\n",
            humantime::format_duration(*timeout)
        ),
    }
}

pub fn connection_failed(error: &IrPublishError) -> String {
    format!("✗ Connection failed: {error}\n")
}

// summary renders the end of a completed run: entries the broker
// never acknowledged, the tally and the follow-up instructions.
// Send failures were already shown as they happened.
pub fn summary(config: &MigrateConfig, summary: &PublishSummary) -> String {
    let mut out = String::new();
    for outcome in summary.failures() {
        if let Err(e @ IrPublishError::AckTimeout { .. }) = &outcome.result {
            let _ = writeln!(out, "✗ Not acknowledged: {} ({e})", outcome.name);
        }
    }

    let _ = writeln!(out, "\n{summary}");
    if summary.succeeded() > 0 {
        out.push_str("\nThese commands are now stored as retained messages on the MQTT broker.\n");
        out.push_str("The IR blaster loads them automatically on boot and reconnect.\n");
    }

    out.push_str(&next_steps(config, summary));
    out
}

fn next_steps(config: &MigrateConfig, summary: &PublishSummary) -> String {
    let auth = match config.username() {
        Some(username) => format!(" -u {username} -P <pass>"),
        None => String::new(),
    };
    let example = summary
        .outcomes
        .iter()
        .find(|o| o.is_success() && o.kind == CommandKind::Protocol)
        .or_else(|| summary.outcomes.iter().find(|o| o.is_success()))
        .map(|o| o.name.as_str())
        .unwrap_or("tv_power");

    let mut out = format!("\n{}\nMigration complete!\n{}\n", rule(), rule());
    out.push_str("\nNext steps:\n");
    out.push_str("1. Restart the IR blaster or let it reconnect to the broker\n");
    let _ = writeln!(
        out,
        "2. Watch its serial log for 'Loaded {} commands from MQTT'",
        summary.succeeded()
    );
    let _ = writeln!(out, "3. Test commands by publishing to {SEND_TOPIC}");
    let _ = writeln!(
        out,
        "   Example: mosquitto_pub -h {} -p {}{auth} -t '{SEND_TOPIC}' -m '{example}'",
        config.host, config.port
    );
    out.push_str("\nTo view all commands:\n");
    let _ = writeln!(
        out,
        "  mosquitto_sub -h {} -p {}{auth} -t '{COMMAND_TOPIC_PREFIX}#' -v",
        config.host, config.port
    );
    out
}

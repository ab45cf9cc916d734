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

// src/publisher.rs
// CommandPublisher pushes a CommandTable to the broker as retained
// messages, one topic per command.
//
// A connect failure aborts the run before anything is published. Any
// failure after that is recorded against the entry it belongs to and
// the batch carries on; the caller gets a PublishSummary with the
// per-entry results and the tally.

use std::collections::HashSet;
use std::fmt;

use rumqttc::QoS;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::client::{Broker, ConnectionState, DEFAULT_QOS, DEFAULT_RETAIN};
use crate::command::{CommandKind, IrCommand};
use crate::errors::IrPublishError;
use crate::stats::{PublishStats, PublishStatsTracker};
use crate::table::CommandTable;
use crate::topic::{CommandTopic, MqttRecipient};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(5);

// PublishSettings control a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublishSettings {
    // connect_timeout bounds the wait for the broker's CONNACK.
    pub connect_timeout: Duration,
    // ack_timeout bounds the wait for outstanding acknowledgments
    // after the last publish.
    pub ack_timeout: Duration,
    pub qos: QoS,
    pub retain: bool,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            ack_timeout: DEFAULT_ACK_TIMEOUT,
            qos: DEFAULT_QOS,
            retain: DEFAULT_RETAIN,
        }
    }
}

impl PublishSettings {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = timeout;
        self
    }
}

// EntryOutcome is the result of publishing one table entry.
#[derive(Debug)]
pub struct EntryOutcome {
    pub name: String,
    pub topic: String,
    pub kind: CommandKind,
    // summary is the command's short description, e.g. "Raw (35 values)".
    pub summary: String,
    pub result: Result<(), IrPublishError>,
}

impl EntryOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

// PublishProgress is a step of a run in flight, as reported to
// CommandPublisher::run_with_progress.
#[derive(Debug)]
pub enum PublishProgress<'a> {
    // Connected: the broker accepted the session.
    Connected { commands: usize },
    // Sent: the entry was handed to the session. Its acknowledgment
    // is still outstanding.
    Sent { name: &'a str, summary: &'a str },
    SendFailed {
        name: &'a str,
        error: &'a IrPublishError,
    },
    WaitingForAcks { timeout: Duration },
}

// PublishSummary is what a completed run reports: every entry's
// outcome in publish order, plus the counters.
#[derive(Debug)]
pub struct PublishSummary {
    pub outcomes: Vec<EntryOutcome>,
    pub stats: PublishStats,
}

impl PublishSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

impl fmt::Display for PublishSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} commands published successfully",
            self.succeeded(),
            self.total()
        )
    }
}

pub struct CommandPublisher<B: Broker> {
    broker: B,
    settings: PublishSettings,
    state: ConnectionState,
    stats: PublishStatsTracker,
}

impl<B: Broker> CommandPublisher<B> {
    pub fn new(broker: B, settings: PublishSettings) -> Self {
        Self {
            broker,
            settings,
            state: ConnectionState::Disconnected,
            stats: PublishStatsTracker::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn settings(&self) -> &PublishSettings {
        &self.settings
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    pub fn into_broker(self) -> B {
        self.broker
    }

    // plan returns the (topic, payload) pairs a run would publish, in
    // order, without touching the network.
    pub fn plan(table: &CommandTable) -> Result<Vec<(String, Vec<u8>)>, IrPublishError> {
        table
            .iter()
            .map(|(name, command)| {
                Ok((
                    CommandTopic::new(name).to_mqtt_topic(),
                    command.to_payload()?,
                ))
            })
            .collect()
    }

    fn transition(&mut self, next: ConnectionState) -> Result<(), IrPublishError> {
        self.state = self.state.transition(next)?;
        debug!("Connection state: {}", self.state);
        Ok(())
    }

    // run connects, publishes every entry of `table`, waits for the
    // acknowledgments and disconnects. Only connection setup
    // failures are returned as Err.
    pub async fn run(&mut self, table: &CommandTable) -> Result<PublishSummary, IrPublishError> {
        self.run_with_progress(table, |_| {}).await
    }

    // run_with_progress is run, calling `progress` as each step
    // happens so callers can report while the batch is in flight.
    pub async fn run_with_progress<F>(
        &mut self,
        table: &CommandTable,
        mut progress: F,
    ) -> Result<PublishSummary, IrPublishError>
    where
        F: FnMut(PublishProgress<'_>),
    {
        self.stats.reset_counters();

        self.transition(ConnectionState::Connecting)?;
        if let Err(e) = self.broker.connect(self.settings.connect_timeout).await {
            self.transition(ConnectionState::Disconnected)?;
            return Err(e);
        }
        self.transition(ConnectionState::Connected)?;
        progress(PublishProgress::Connected {
            commands: table.len(),
        });

        info!("Publishing {} commands", table.len());
        let mut attempts = Vec::with_capacity(table.len());
        for (name, command) in table.iter() {
            self.transition(ConnectionState::Publishing)?;
            let attempt = self.publish_entry(name, command).await;
            match &attempt.sent {
                Ok(_) => progress(PublishProgress::Sent {
                    name,
                    summary: &attempt.summary,
                }),
                Err(error) => progress(PublishProgress::SendFailed { name, error }),
            }
            attempts.push(attempt);
        }

        let any_sent = attempts.iter().any(|a| a.sent.is_ok());
        let unacked: HashSet<String> = if self.state.is_session_open() && any_sent {
            progress(PublishProgress::WaitingForAcks {
                timeout: self.settings.ack_timeout,
            });
            self.broker
                .wait_for_acks(self.settings.ack_timeout)
                .await
                .into_iter()
                .collect()
        } else {
            HashSet::new()
        };

        let outcomes = attempts
            .into_iter()
            .map(|attempt| self.settle(attempt, &unacked))
            .collect();

        // Cleanup runs whatever happened to the individual entries.
        self.transition(ConnectionState::Disconnecting)?;
        if let Err(e) = self.broker.disconnect().await {
            warn!("Error while disconnecting from broker: {}", e);
        }
        self.transition(ConnectionState::Disconnected)?;

        let summary = PublishSummary {
            outcomes,
            stats: self.stats.to_stats(),
        };
        info!("{}", summary);
        Ok(summary)
    }

    async fn publish_entry(&mut self, name: &str, command: &IrCommand) -> Attempt {
        let topic = CommandTopic::new(name).to_mqtt_topic();
        let sent = match command.to_payload() {
            Ok(payload) => {
                let size = payload.len();
                self.broker
                    .publish(&topic, payload, self.settings.qos, self.settings.retain)
                    .await
                    .map(|()| size)
            }
            Err(e) => Err(e),
        };
        if let Err(e) = &sent {
            warn!("Failed to publish '{}': {}", name, e);
        }
        Attempt {
            name: name.to_string(),
            topic,
            kind: command.kind(),
            summary: command.summary(),
            sent,
        }
    }

    // settle turns a send attempt into its final outcome once the
    // unacknowledged topics are known, updating the counters.
    fn settle(&self, attempt: Attempt, unacked: &HashSet<String>) -> EntryOutcome {
        let result = match attempt.sent {
            Ok(_) if unacked.contains(&attempt.topic) => {
                warn!("No acknowledgment for '{}'", attempt.name);
                Err(IrPublishError::ack_timeout(
                    &attempt.topic,
                    self.settings.ack_timeout,
                ))
            }
            Ok(bytes) => {
                self.stats.increment_published(bytes);
                Ok(())
            }
            Err(e) => Err(e),
        };
        if result.is_err() {
            self.stats.increment_failed();
        }

        EntryOutcome {
            name: attempt.name,
            topic: attempt.topic,
            kind: attempt.kind,
            summary: attempt.summary,
            result,
        }
    }
}

// Attempt is an entry that has been handed to the broker (or failed
// to be), before its acknowledgment is known.
struct Attempt {
    name: String,
    topic: String,
    kind: CommandKind,
    summary: String,
    // sent is the payload size on success.
    sent: Result<usize, IrPublishError>,
}

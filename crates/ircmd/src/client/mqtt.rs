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

// src/client/mqtt.rs
// MqttBroker: a Broker backed by a rumqttc AsyncClient.
//
// The rumqttc EventLoop is driven on its own tokio task. That task
// reports the CONNACK back over a oneshot, and tracks which
// publishes the broker has acknowledged so wait_for_acks can tell
// the caller what never made it.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rumqttc::{
    AsyncClient, ConnectReturnCode, ConnectionError, Event, EventLoop, MqttOptions, Outgoing,
    Packet, QoS,
};
use tokio::sync::{Mutex, Notify, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};

use crate::client::broker::Broker;
use crate::client::options::ClientOptions;
use crate::client::state::ConnectionState;
use crate::errors::IrPublishError;

// How long disconnect() gives the event loop to flush the
// DISCONNECT packet before the task is aborted.
const DISCONNECT_GRACE: Duration = Duration::from_secs(2);

// InFlight is the publish bookkeeping shared between the caller and
// the event loop task.
#[derive(Debug, Default)]
struct InFlight {
    // queued holds publishes handed to the AsyncClient that the event
    // loop has not written yet, in request order.
    queued: VecDeque<(String, QoS)>,
    // by_pkid maps written QoS 1/2 publishes to their topic until the
    // broker acknowledges them.
    by_pkid: HashMap<u16, String>,
    // pending is every topic published but not yet acknowledged.
    pending: HashSet<String>,
}

impl InFlight {
    fn enqueue(&mut self, topic: &str, qos: QoS) {
        self.queued.push_back((topic.to_string(), qos));
        self.pending.insert(topic.to_string());
    }

    // dequeue_failed takes back a publish the AsyncClient refused.
    fn dequeue_failed(&mut self, topic: &str) {
        if let Some(pos) = self.queued.iter().rposition(|(t, _)| t == topic) {
            self.queued.remove(pos);
        }
        self.pending.remove(topic);
    }

    // on_outgoing_publish pairs a written publish with the oldest
    // queued request. Returns true when that completes the publish
    // (QoS 0 has nothing to wait for).
    fn on_outgoing_publish(&mut self, pkid: u16) -> bool {
        let Some((topic, qos)) = self.queued.pop_front() else {
            warn!("Outgoing publish pkid={} with no queued request", pkid);
            return false;
        };
        if qos == QoS::AtMostOnce {
            self.pending.remove(&topic);
            return true;
        }
        trace!("Publish to '{}' sent as pkid={}", topic, pkid);
        self.by_pkid.insert(pkid, topic);
        false
    }

    // on_ack completes the publish with the given packet id.
    fn on_ack(&mut self, pkid: u16) -> bool {
        match self.by_pkid.remove(&pkid) {
            Some(topic) => {
                debug!("Broker acknowledged '{}' (pkid={})", topic, pkid);
                self.pending.remove(&topic);
                true
            }
            None => {
                warn!("Acknowledgment for unknown pkid={}", pkid);
                false
            }
        }
    }
}

pub struct MqttBroker {
    client: AsyncClient,
    eventloop: Option<EventLoop>,
    event_task: Option<JoinHandle<()>>,
    inflight: Arc<Mutex<InFlight>>,
    acked: Arc<Notify>,
    connected: Arc<AtomicBool>,
    broker_addr: String,
}

impl MqttBroker {
    pub fn new(
        broker_host: &str,
        broker_port: u16,
        client_id: &str,
        options: Option<ClientOptions>,
    ) -> Self {
        let options = options.unwrap_or_default();

        let mut mqtt_options = MqttOptions::new(client_id, broker_host, broker_port);
        mqtt_options.set_keep_alive(options.keep_alive());
        if let Some(credentials) = &options.credentials {
            mqtt_options.set_credentials(&credentials.username, &credentials.password);
        }

        let (client, eventloop) =
            AsyncClient::new(mqtt_options, options.request_channel_capacity());

        Self {
            client,
            eventloop: Some(eventloop),
            event_task: None,
            inflight: Arc::new(Mutex::new(InFlight::default())),
            acked: Arc::new(Notify::new()),
            connected: Arc::new(AtomicBool::new(false)),
            broker_addr: format!("{broker_host}:{broker_port}"),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    async fn stop_event_task(&mut self) {
        if let Some(mut task) = self.event_task.take() {
            if tokio::time::timeout(DISCONNECT_GRACE, &mut task)
                .await
                .is_err()
            {
                debug!("Event loop did not stop within {:?}, aborting", DISCONNECT_GRACE);
                task.abort();
            }
        }
    }
}

#[async_trait]
impl Broker for MqttBroker {
    async fn connect(&mut self, timeout: Duration) -> Result<(), IrPublishError> {
        if self.is_connected() {
            return Err(IrPublishError::InvalidStateTransition {
                from: ConnectionState::Connected,
                to: ConnectionState::Connecting,
            });
        }
        let Some(eventloop) = self.eventloop.take() else {
            return Err(IrPublishError::SessionConsumed);
        };

        info!("Connecting to MQTT broker at {}", self.broker_addr);
        let (connack_tx, connack_rx) = oneshot::channel();
        self.event_task = Some(tokio::spawn(run_event_loop(
            eventloop,
            self.inflight.clone(),
            self.acked.clone(),
            self.connected.clone(),
            connack_tx,
        )));

        let result = match tokio::time::timeout(timeout, connack_rx).await {
            Ok(Ok(result)) => result,
            // The task ended without reporting; treat it as a dropped session.
            Ok(Err(_)) => Err(IrPublishError::NotConnected),
            Err(_) => Err(IrPublishError::ConnectTimeout(timeout)),
        };

        match &result {
            Ok(()) => info!("Connected to MQTT broker at {}", self.broker_addr),
            Err(e) => {
                error!("Failed to connect to {}: {}", self.broker_addr, e);
                if let Some(task) = self.event_task.take() {
                    task.abort();
                }
            }
        }
        result
    }

    async fn publish(
        &mut self,
        topic: &str,
        payload: Vec<u8>,
        qos: QoS,
        retain: bool,
    ) -> Result<(), IrPublishError> {
        if !self.is_connected() {
            return Err(IrPublishError::NotConnected);
        }

        // Queue before handing off, so the event loop always finds
        // the topic when it writes the packet.
        self.inflight.lock().await.enqueue(topic, qos);

        debug!(
            "Publishing {} bytes to '{}' (qos={:?}, retain={})",
            payload.len(),
            topic,
            qos,
            retain
        );
        if let Err(e) = self.client.publish(topic, qos, retain, payload).await {
            self.inflight.lock().await.dequeue_failed(topic);
            return Err(IrPublishError::publish_error(topic, e.to_string()));
        }
        Ok(())
    }

    async fn wait_for_acks(&mut self, timeout: Duration) -> Vec<String> {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let inflight = self.inflight.lock().await;
                if inflight.pending.is_empty() {
                    return Vec::new();
                }
                debug!("Waiting for {} acknowledgments", inflight.pending.len());
            }
            if !self.is_connected() {
                warn!("Connection lost while waiting for acknowledgments");
                break;
            }
            if tokio::time::timeout_at(deadline, self.acked.notified())
                .await
                .is_err()
            {
                break;
            }
        }

        let inflight = self.inflight.lock().await;
        let mut unacked: Vec<String> = inflight.pending.iter().cloned().collect();
        unacked.sort();
        unacked
    }

    async fn disconnect(&mut self) -> Result<(), IrPublishError> {
        let result = if self.is_connected() {
            self.client.disconnect().await.map_err(IrPublishError::from)
        } else {
            Ok(())
        };
        self.stop_event_task().await;
        self.connected.store(false, Ordering::Release);
        info!("Disconnected from MQTT broker at {}", self.broker_addr);
        result
    }
}

impl Drop for MqttBroker {
    fn drop(&mut self) {
        if let Some(task) = self.event_task.take() {
            task.abort();
        }
    }
}

// run_event_loop drives the rumqttc EventLoop until the session is
// refused, lost, or closed by disconnect(). It makes no attempt to
// reconnect: a one-shot run is retried by running it again.
async fn run_event_loop(
    mut eventloop: EventLoop,
    inflight: Arc<Mutex<InFlight>>,
    acked: Arc<Notify>,
    connected: Arc<AtomicBool>,
    connack_tx: oneshot::Sender<Result<(), IrPublishError>>,
) {
    let mut connack_tx = Some(connack_tx);

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                let result = if connack.code == ConnectReturnCode::Success {
                    connected.store(true, Ordering::Release);
                    Ok(())
                } else {
                    Err(IrPublishError::ConnectionRefused(format!(
                        "{:?}",
                        connack.code
                    )))
                };
                let refused = result.is_err();
                if let Some(tx) = connack_tx.take() {
                    let _ = tx.send(result);
                }
                if refused {
                    break;
                }
            }
            Ok(Event::Incoming(Packet::PubAck(puback))) => {
                if inflight.lock().await.on_ack(puback.pkid) {
                    acked.notify_one();
                }
            }
            Ok(Event::Incoming(Packet::PubComp(pubcomp))) => {
                if inflight.lock().await.on_ack(pubcomp.pkid) {
                    acked.notify_one();
                }
            }
            Ok(Event::Outgoing(Outgoing::Publish(pkid))) => {
                if inflight.lock().await.on_outgoing_publish(pkid) {
                    acked.notify_one();
                }
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                debug!("DISCONNECT sent, stopping event loop");
                break;
            }
            Ok(event) => {
                trace!("MQTT event: {:?}", event);
            }
            Err(e) => {
                match connack_tx.take() {
                    Some(tx) => {
                        let err = match e {
                            ConnectionError::ConnectionRefused(code) => {
                                IrPublishError::ConnectionRefused(format!("{code:?}"))
                            }
                            other => IrPublishError::ConnectionError(other),
                        };
                        let _ = tx.send(Err(err));
                    }
                    None => error!("MQTT event loop error: {}", e),
                }
                break;
            }
        }
    }

    connected.store(false, Ordering::Release);
    // Wake a waiter in wait_for_acks so it sees the session is gone.
    acked.notify_one();
}

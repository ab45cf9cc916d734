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

// src/client/broker.rs
// Broker is the seam between CommandPublisher and the network. The
// real implementation is MqttBroker; tests plug in an in-memory one.

use async_trait::async_trait;
use rumqttc::QoS;
use tokio::time::Duration;

use crate::errors::IrPublishError;

#[async_trait]
pub trait Broker: Send {
    // connect opens the session and returns once the broker has
    // acknowledged it, or fails after `timeout`.
    async fn connect(&mut self, timeout: Duration) -> Result<(), IrPublishError>;

    // publish hands one message to the session without waiting for
    // the broker's acknowledgment.
    async fn publish(
        &mut self,
        topic: &str,
        payload: Vec<u8>,
        qos: QoS,
        retain: bool,
    ) -> Result<(), IrPublishError>;

    // wait_for_acks blocks until every publish so far is acknowledged
    // or `timeout` passes, and returns the topics still unacknowledged.
    async fn wait_for_acks(&mut self, timeout: Duration) -> Vec<String>;

    async fn disconnect(&mut self) -> Result<(), IrPublishError>;
}

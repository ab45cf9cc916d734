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

// src/errors.rs
// Error types for the IR command loader.
//
// Errors fall into three buckets: connection errors (fatal for a run),
// publish errors (counted per entry), and serialization errors. The
// is_*_error predicates let callers branch on the bucket without
// matching every variant.

use std::time::Duration;

use rumqttc::{ClientError, ConnectionError};
use thiserror::Error;

use crate::client::ConnectionState;

#[derive(Error, Debug)]
pub enum IrPublishError {
    // ConnectionError wraps transport failures from the rumqttc
    // event loop (DNS, TCP, TLS, protocol errors).
    #[error("MQTT connection error: {0}")]
    ConnectionError(#[from] ConnectionError),

    // ConnectionRefused is returned when the broker answers the
    // CONNECT with a non-success return code (bad credentials,
    // not authorized, etc).
    #[error("Broker refused connection: {0}")]
    ConnectionRefused(String),

    // ConnectTimeout is returned when no CONNACK arrived within
    // the configured connect timeout.
    #[error("Timed out after {0:?} waiting for broker CONNACK")]
    ConnectTimeout(Duration),

    // NotConnected is returned when publishing is attempted on a
    // session that never reached Connected (or already went away).
    #[error("Not connected to MQTT broker")]
    NotConnected,

    // SessionConsumed is returned by connect() on an MqttBroker whose
    // event loop already ran. Each session connects once.
    #[error("MQTT session already used; create a new broker to reconnect")]
    SessionConsumed,

    // ClientError wraps failures handing a request to the
    // AsyncClient request channel.
    #[error("MQTT client error: {0}")]
    ClientError(#[from] ClientError),

    #[error("Failed to publish to '{topic}': {reason}")]
    PublishError { topic: String, reason: String },

    #[error("No PUBACK for '{topic}' within {timeout:?}")]
    AckTimeout { topic: String, timeout: Duration },

    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[source] serde_json::Error),

    #[error("JSON deserialization error: {0}")]
    JsonDeserializationError(#[source] serde_json::Error),

    #[error("Invalid connection state transition: {from} -> {to}")]
    InvalidStateTransition {
        from: ConnectionState,
        to: ConnectionState,
    },
}

// serde_json::Error converts to the serialization variant; `?` in
// IrCommand::to_payload goes through here.
impl From<serde_json::Error> for IrPublishError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonSerializationError(err)
    }
}

impl IrPublishError {
    pub fn publish_error(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PublishError {
            topic: topic.into(),
            reason: reason.into(),
        }
    }

    pub fn ack_timeout(topic: impl Into<String>, timeout: Duration) -> Self {
        Self::AckTimeout {
            topic: topic.into(),
            timeout,
        }
    }

    // is_connection_error is true for anything that means the session
    // with the broker could not be (or is no longer) established.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError(_)
                | Self::ConnectionRefused(_)
                | Self::ConnectTimeout(_)
                | Self::NotConnected
                | Self::SessionConsumed
        )
    }

    // is_publish_error is true for per-topic failures that the
    // publisher counts instead of aborting on.
    pub fn is_publish_error(&self) -> bool {
        matches!(
            self,
            Self::PublishError { .. } | Self::AckTimeout { .. } | Self::ClientError(_)
        )
    }

    pub fn is_serialization_error(&self) -> bool {
        matches!(
            self,
            Self::JsonSerializationError(_) | Self::JsonDeserializationError(_)
        )
    }
}

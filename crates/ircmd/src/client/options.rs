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

// src/client/options.rs
// Configuration options for the broker session.
use std::fmt;

use rumqttc::QoS;
use tokio::time::Duration;

pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(60);
pub const DEFAULT_REQUEST_CHANNEL_CAPACITY: usize = 64;
// Command definitions are retained and must reach the broker, so
// the defaults are QoS 1 + retain.
pub const DEFAULT_QOS: QoS = QoS::AtLeastOnce;
pub const DEFAULT_RETAIN: bool = true;

// ClientOptions are optional parameters for MqttBroker. Unset
// values fall back to the DEFAULT_* consts.
#[derive(Clone, Debug, Default)]
pub struct ClientOptions {
    // keep_alive sets the keepalive to use for the broker connection.
    pub keep_alive: Option<Duration>,
    // request_channel_capacity is how many requests the AsyncClient
    // buffers before publish() starts waiting on the event loop.
    pub request_channel_capacity: Option<usize>,
    // credentials are the optional username/password sent in CONNECT.
    pub credentials: Option<ClientCredentials>,
}

impl ClientOptions {
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = Some(keep_alive);
        self
    }

    pub fn with_request_channel_capacity(mut self, capacity: usize) -> Self {
        self.request_channel_capacity = Some(capacity);
        self
    }

    pub fn with_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn keep_alive(&self) -> Duration {
        self.keep_alive.unwrap_or(DEFAULT_KEEP_ALIVE)
    }

    pub fn request_channel_capacity(&self) -> usize {
        self.request_channel_capacity
            .unwrap_or(DEFAULT_REQUEST_CHANNEL_CAPACITY)
    }
}

// ClientCredentials are the username and password for the broker.
// Debug output never includes the password.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub username: String,
    pub password: String,
}

impl ClientCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_fall_back_to_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.keep_alive(), DEFAULT_KEEP_ALIVE);
        assert_eq!(
            options.request_channel_capacity(),
            DEFAULT_REQUEST_CHANNEL_CAPACITY
        );
        assert!(options.credentials.is_none());

        let options = options
            .with_keep_alive(Duration::from_secs(15))
            .with_request_channel_capacity(8);
        assert_eq!(options.keep_alive(), Duration::from_secs(15));
        assert_eq!(options.request_channel_capacity(), 8);
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let options =
            ClientOptions::default().with_credentials(ClientCredentials::new("matt", "hunter2"));
        let debug = format!("{options:?}");
        assert!(debug.contains("matt"));
        assert!(!debug.contains("hunter2"));
    }
}

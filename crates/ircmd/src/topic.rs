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

// src/topic.rs
// Topic namespace for command definitions.
//
// The blaster subscribes to "home/ir/1/commands/#" and takes
// everything after the prefix as the command name, so this string
// has to match the firmware exactly.

use std::fmt;

pub const COMMAND_TOPIC_PREFIX: &str = "home/ir/1/commands/";

// MqttRecipient lets a type say which topic it should be published
// to. Strings are taken as literal topics.
//
// Example:
// let topic = CommandTopic::new("tv_power");
// broker.publish(&topic.to_mqtt_topic(), payload, QoS::AtLeastOnce, true).await?;
pub trait MqttRecipient {
    fn to_mqtt_topic(&self) -> String;
}

impl MqttRecipient for String {
    fn to_mqtt_topic(&self) -> String {
        self.clone()
    }
}

impl MqttRecipient for &str {
    fn to_mqtt_topic(&self) -> String {
        self.to_string()
    }
}

// command_topic joins the prefix and a command name with no
// separator in between: "tv_power" -> "home/ir/1/commands/tv_power".
pub fn command_topic(name: &str) -> String {
    format!("{COMMAND_TOPIC_PREFIX}{name}")
}

// CommandTopic addresses the retained definition of one command.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommandTopic {
    name: String,
}

impl CommandTopic {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // from_topic is the inverse of command_topic, returning None for
    // topics outside the command namespace.
    pub fn from_topic(topic: &str) -> Option<Self> {
        topic
            .strip_prefix(COMMAND_TOPIC_PREFIX)
            .filter(|name| !name.is_empty())
            .map(Self::new)
    }
}

impl MqttRecipient for CommandTopic {
    fn to_mqtt_topic(&self) -> String {
        command_topic(&self.name)
    }
}

impl fmt::Display for CommandTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{COMMAND_TOPIC_PREFIX}{}", self.name)
    }
}

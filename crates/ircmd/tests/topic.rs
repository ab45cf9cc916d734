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

// tests/topic.rs
// Tests for the command topic namespace.

use ircmd::table::CommandTable;
use ircmd::topic::{COMMAND_TOPIC_PREFIX, CommandTopic, MqttRecipient, command_topic};

#[test]
fn test_prefix_matches_device_subscription() {
    assert_eq!(COMMAND_TOPIC_PREFIX, "home/ir/1/commands/");
}

#[test]
fn test_command_topic_is_prefix_plus_name() {
    assert_eq!(command_topic("tv_power"), "home/ir/1/commands/tv_power");

    for name in CommandTable::builtin().names() {
        let topic = command_topic(name);
        assert_eq!(topic, format!("{COMMAND_TOPIC_PREFIX}{name}"));
        assert_eq!(topic.len(), COMMAND_TOPIC_PREFIX.len() + name.len());
    }
}

#[test]
fn test_command_topic_recipient() {
    let topic = CommandTopic::new("fan_rotate");
    assert_eq!(topic.name(), "fan_rotate");
    assert_eq!(topic.to_mqtt_topic(), "home/ir/1/commands/fan_rotate");
    assert_eq!(topic.to_string(), topic.to_mqtt_topic());
}

#[test]
fn test_strings_are_literal_recipients() {
    assert_eq!("home/ir/1/send".to_mqtt_topic(), "home/ir/1/send");
    assert_eq!(
        String::from("home/ir/1/state").to_mqtt_topic(),
        "home/ir/1/state"
    );
}

#[test]
fn test_from_topic() {
    assert_eq!(
        CommandTopic::from_topic("home/ir/1/commands/tv_mute"),
        Some(CommandTopic::new("tv_mute"))
    );
    assert_eq!(CommandTopic::from_topic("home/ir/1/commands/"), None);
    assert_eq!(CommandTopic::from_topic("home/ir/1/send"), None);
}

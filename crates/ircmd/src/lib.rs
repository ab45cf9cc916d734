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

// src/lib.rs
// IR command definitions and the machinery to load them onto an MQTT
// broker as retained messages.

pub mod client;
pub mod command;
pub mod errors;
pub mod publisher;
pub mod stats;
pub mod table;
pub mod topic;

pub use client::{Broker, ClientCredentials, ClientOptions, ConnectionState, MqttBroker};
pub use command::{CommandKind, IrCommand, IrProtocol, ProtocolCommand, RawCommand};
pub use errors::IrPublishError;
pub use publisher::{
    CommandPublisher, EntryOutcome, PublishProgress, PublishSettings, PublishSummary,
};
pub use rumqttc::QoS;
pub use stats::{PublishStats, PublishStatsTracker};
pub use table::{CommandTable, TableIssue};
pub use topic::{COMMAND_TOPIC_PREFIX, CommandTopic, MqttRecipient, command_topic};

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

// src/command/types.rs
// IR command records and their JSON wire shape.
//
// The device tells the two record shapes apart by which keys are
// present ("proto" vs "raw"), so on the wire IrCommand is untagged.
// In Rust it is a plain two-variant enum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::protocol::IrProtocol;
use crate::errors::IrPublishError;

// CommandKind is the variant of an IrCommand without its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Protocol,
    Raw,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol => write!(f, "Protocol"),
            Self::Raw => write!(f, "Raw"),
        }
    }
}

// ProtocolCommand is a decoded IR command: protocol name, device
// address, command code and protocol-level repeat count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolCommand {
    pub proto: String,
    pub addr: u32,
    pub cmd: u32,
    #[serde(default)]
    pub rpt: u32,
    // repeat_count and repeat_interval describe a captured button
    // burst (how many extra presses, and the average gap in ms).
    // Omitted from the payload unless set.
    #[serde(
        rename = "repeatCount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub repeat_count: Option<u8>,
    #[serde(
        rename = "repeatInterval",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub repeat_interval: Option<u16>,
}

impl ProtocolCommand {
    pub fn new(proto: impl Into<String>, addr: u32, cmd: u32) -> Self {
        Self {
            proto: proto.into(),
            addr,
            cmd,
            rpt: 0,
            repeat_count: None,
            repeat_interval: None,
        }
    }

    pub fn with_repeat(mut self, rpt: u32) -> Self {
        self.rpt = rpt;
        self
    }

    pub fn with_burst(mut self, count: u8, interval_ms: u16) -> Self {
        self.repeat_count = Some(count);
        self.repeat_interval = Some(interval_ms);
        self
    }

    // protocol resolves the proto string to a known encoding, if the
    // device supports it.
    pub fn protocol(&self) -> Option<IrProtocol> {
        IrProtocol::from_str(&self.proto).ok()
    }
}

// RawFlag is the `"raw": true` marker. It always serializes as true
// and refuses to deserialize from false.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct RawFlag;

impl Serialize for RawFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(true)
    }
}

impl<'de> Deserialize<'de> for RawFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if bool::deserialize(deserializer)? {
            Ok(RawFlag)
        } else {
            Err(serde::de::Error::custom(
                "raw command must have \"raw\": true",
            ))
        }
    }
}

// RawCommand is an undecoded IR signal: a carrier frequency in kHz
// and alternating mark/space durations in microseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCommand {
    raw: RawFlag,
    pub freq: u32,
    pub data: Vec<u32>,
    #[serde(
        rename = "repeatCount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub repeat_count: Option<u8>,
    #[serde(
        rename = "repeatInterval",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub repeat_interval: Option<u16>,
}

impl RawCommand {
    pub fn new(freq: u32, data: Vec<u32>) -> Self {
        Self {
            raw: RawFlag,
            freq,
            data,
            repeat_count: None,
            repeat_interval: None,
        }
    }

    pub fn with_burst(mut self, count: u8, interval_ms: u16) -> Self {
        self.repeat_count = Some(count);
        self.repeat_interval = Some(interval_ms);
        self
    }
}

// IrCommand is a single named entry's value in the command table,
// and the JSON payload published for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IrCommand {
    Protocol(ProtocolCommand),
    Raw(RawCommand),
}

impl IrCommand {
    pub fn protocol(proto: impl Into<String>, addr: u32, cmd: u32) -> Self {
        Self::Protocol(ProtocolCommand::new(proto, addr, cmd))
    }

    pub fn raw(freq: u32, data: Vec<u32>) -> Self {
        Self::Raw(RawCommand::new(freq, data))
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Protocol(_) => CommandKind::Protocol,
            Self::Raw(_) => CommandKind::Raw,
        }
    }

    // summary is the one-line description used in progress output,
    // e.g. "Protocol (Samsung)" or "Raw (94 values)".
    pub fn summary(&self) -> String {
        match self {
            Self::Protocol(p) => format!("{} ({})", self.kind(), p.proto),
            Self::Raw(r) => format!("{} ({} values)", self.kind(), r.data.len()),
        }
    }

    // to_payload serializes to compact JSON for publishing.
    pub fn to_payload(&self) -> Result<Vec<u8>, IrPublishError> {
        Ok(serde_json::to_vec(self)?)
    }

    // from_payload parses a published payload back into a command.
    // Payloads carrying both "proto" and "raw" are rejected.
    pub fn from_payload(bytes: &[u8]) -> Result<Self, IrPublishError> {
        serde_json::from_slice(bytes).map_err(IrPublishError::JsonDeserializationError)
    }
}

impl From<ProtocolCommand> for IrCommand {
    fn from(cmd: ProtocolCommand) -> Self {
        Self::Protocol(cmd)
    }
}

impl From<RawCommand> for IrCommand {
    fn from(cmd: RawCommand) -> Self {
        Self::Raw(cmd)
    }
}

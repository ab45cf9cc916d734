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

// src/table.rs
// The named command table and the built-in set of commands that get
// loaded onto the broker.
//
// Names are unique (map semantics) and iteration is sorted by name,
// so every run publishes the same entries in the same order.

use std::collections::BTreeMap;
use std::fmt;

use crate::command::{CommandKind, IrCommand};

// Limits of the blaster's in-memory command cache. Entries beyond
// these are truncated or dropped on the device side.
pub const MAX_COMMANDS: usize = 30;
pub const MAX_COMMAND_NAME: usize = 32;
pub const MAX_RAW_DATA: usize = 200;

const FAN_POWER: &[u32] = &[
    1330, 270, 1380, 270, 580, 1220, 1280, 270, 1430, 320, 480, 1220, 430, 1220, 480, 1220, 430,
    1220, 430, 1220, 430, 1220, 1330, 7070, 1280, 370, 1330, 270, 530, 1220, 1330, 220, 1430, 270,
    580, 1220, 480, 1170, 480, 1170, 480, 1170, 480, 1220, 430, 1220, 1330, 8020, 1330, 320, 1330,
    370, 480, 1220, 1280, 370, 1330, 320, 480, 1220, 480, 1170, 430, 1220, 430, 1270, 430, 1220,
    430, 1220, 1280, 7120, 1280, 370, 1280, 420, 430, 1220, 1280, 420, 1280, 370, 430, 1270, 380,
    1270, 430, 1220, 430, 1270, 380, 1270, 380, 1270, 1230,
];

const FAN_SPEED_UP: &[u32] = &[
    1180, 2420, 230, 1320, 180, 770, 230, 420, 230, 120, 180, 120, 380, 170, 180, 220, 280, 1470,
    180, 1470, 280, 1370, 230, 1420, 330, 1320, 1180, 570, 280, 170, 180, 7520, 1180, 520, 1180,
    520, 230, 1420, 1180, 520, 1180, 570, 180, 1420, 280, 1370, 230, 1370, 380, 1320, 280, 120,
    230, 1020, 1180, 570, 280,
];

const FAN_SPEED_DOWN: &[u32] = &[
    1280, 370, 1330, 370, 430, 1220, 1280, 320, 1380, 320, 530, 1220, 430, 1220, 1230, 420, 430,
    1270, 380, 1270, 1280, 320, 530, 7870, 1280, 320, 1380, 370, 430, 1270, 1230, 370, 1330, 370,
    480, 1220, 430, 1220, 1280, 370, 480, 1220, 430, 1220, 1280, 320, 530,
];

const FAN_ROTATE: &[u32] = &[
    1230, 120, 1580, 420, 380, 1270, 230, 120, 880, 470, 230, 120, 880, 420, 130, 120, 180, 1220,
    230, 1470, 230, 120, 280, 120, 130, 120, 230, 470, 230, 1370, 230, 1470, 230, 1420, 230,
];

// TableIssue is a problem found by validate(). Issues are advisory:
// the device copes with all of them, just not the way you'd want.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableIssue {
    TooManyCommands { count: usize, max: usize },
    InvalidName { name: String, reason: &'static str },
    NameTooLong { name: String, max: usize },
    RawDataTooLong { name: String, len: usize, max: usize },
    EmptyRawData { name: String },
    ZeroFrequency { name: String },
    UnknownProtocol { name: String, proto: String },
}

impl fmt::Display for TableIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyCommands { count, max } => {
                write!(f, "{count} commands exceeds device cache of {max}")
            }
            Self::InvalidName { name, reason } => write!(f, "'{name}': {reason}"),
            Self::NameTooLong { name, max } => {
                write!(f, "'{name}': name must be shorter than {max} bytes")
            }
            Self::RawDataTooLong { name, len, max } => {
                write!(f, "'{name}': {len} raw timings, device keeps only {max}")
            }
            Self::EmptyRawData { name } => write!(f, "'{name}': raw command has no timings"),
            Self::ZeroFrequency { name } => {
                write!(f, "'{name}': raw command has a 0 kHz carrier")
            }
            Self::UnknownProtocol { name, proto } => {
                write!(f, "'{name}': protocol '{proto}' is not supported by the device")
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandTable {
    commands: BTreeMap<String, IrCommand>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    // builtin returns the fixed set of commands this tool migrates:
    // four Samsung TV commands and four raw fan commands.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.insert("tv_power", IrCommand::protocol("Samsung", 7, 2));
        table.insert("tv_vol_up", IrCommand::protocol("Samsung", 7, 7));
        table.insert("tv_vol_down", IrCommand::protocol("Samsung", 7, 11));
        table.insert("tv_mute", IrCommand::protocol("Samsung", 7, 15));
        table.insert("fan_power", IrCommand::raw(38, FAN_POWER.to_vec()));
        table.insert("fan_speed_up", IrCommand::raw(38, FAN_SPEED_UP.to_vec()));
        table.insert("fan_speed_down", IrCommand::raw(38, FAN_SPEED_DOWN.to_vec()));
        table.insert("fan_rotate", IrCommand::raw(38, FAN_ROTATE.to_vec()));
        table
    }

    // insert adds or replaces a command, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, command: IrCommand) -> Option<IrCommand> {
        self.commands.insert(name.into(), command)
    }

    pub fn get(&self, name: &str) -> Option<&IrCommand> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IrCommand)> {
        self.commands.iter().map(|(name, cmd)| (name.as_str(), cmd))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn protocol_count(&self) -> usize {
        self.count_kind(CommandKind::Protocol)
    }

    pub fn raw_count(&self) -> usize {
        self.count_kind(CommandKind::Raw)
    }

    fn count_kind(&self, kind: CommandKind) -> usize {
        self.commands.values().filter(|c| c.kind() == kind).count()
    }

    // validate checks every entry against what the device can cache
    // and transmit. An empty result means the table loads cleanly.
    pub fn validate(&self) -> Vec<TableIssue> {
        let mut issues = Vec::new();

        if self.len() > MAX_COMMANDS {
            issues.push(TableIssue::TooManyCommands {
                count: self.len(),
                max: MAX_COMMANDS,
            });
        }

        for (name, command) in self.iter() {
            if let Some(reason) = invalid_name_reason(name) {
                issues.push(TableIssue::InvalidName {
                    name: name.to_string(),
                    reason,
                });
            } else if name.len() >= MAX_COMMAND_NAME {
                // The device stores names NUL-terminated in a fixed buffer.
                issues.push(TableIssue::NameTooLong {
                    name: name.to_string(),
                    max: MAX_COMMAND_NAME,
                });
            }

            match command {
                IrCommand::Protocol(p) => {
                    if p.protocol().is_none() {
                        issues.push(TableIssue::UnknownProtocol {
                            name: name.to_string(),
                            proto: p.proto.clone(),
                        });
                    }
                }
                IrCommand::Raw(r) => {
                    if r.freq == 0 {
                        issues.push(TableIssue::ZeroFrequency {
                            name: name.to_string(),
                        });
                    }
                    if r.data.is_empty() {
                        issues.push(TableIssue::EmptyRawData {
                            name: name.to_string(),
                        });
                    } else if r.data.len() > MAX_RAW_DATA {
                        issues.push(TableIssue::RawDataTooLong {
                            name: name.to_string(),
                            len: r.data.len(),
                            max: MAX_RAW_DATA,
                        });
                    }
                }
            }
        }

        issues
    }
}

// invalid_name_reason rejects names that would not land on a single
// concrete topic level under the command prefix.
fn invalid_name_reason(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("name is empty")
    } else if name.contains('/') {
        Some("name must not contain '/'")
    } else if name.contains('+') || name.contains('#') {
        Some("name must not contain MQTT wildcards")
    } else {
        None
    }
}

impl<N: Into<String>> FromIterator<(N, IrCommand)> for CommandTable {
    fn from_iter<I: IntoIterator<Item = (N, IrCommand)>>(iter: I) -> Self {
        Self {
            commands: iter
                .into_iter()
                .map(|(name, cmd)| (name.into(), cmd))
                .collect(),
        }
    }
}

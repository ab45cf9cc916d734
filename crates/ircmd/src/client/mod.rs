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

// src/client/mod.rs
// Broker session: the Broker seam, its rumqttc implementation,
// session options and the connection lifecycle.

mod broker;
mod mqtt;
mod options;
mod state;

pub use broker::Broker;
pub use mqtt::MqttBroker;
pub use options::{
    ClientCredentials, ClientOptions, DEFAULT_KEEP_ALIVE, DEFAULT_QOS,
    DEFAULT_REQUEST_CHANNEL_CAPACITY, DEFAULT_RETAIN,
};
pub use state::ConnectionState;

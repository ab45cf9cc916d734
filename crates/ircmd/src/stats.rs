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

// src/stats.rs
// Publish statistics for a batch run.
//
// Counters are atomics behind Arcs, so clones of a tracker share
// the same counts and can be updated through &self.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// PublishStats is a snapshot of the tracker's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishStats {
    // total_published counts entries the broker acknowledged.
    pub total_published: usize,
    // total_failed counts entries that failed to serialize, could
    // not be handed to the client, or were never acknowledged.
    pub total_failed: usize,
    // total_bytes_published is the payload size of acknowledged
    // entries.
    pub total_bytes_published: usize,
}

impl PublishStats {
    pub fn total_attempted(&self) -> usize {
        self.total_published + self.total_failed
    }
}

#[derive(Debug, Clone, Default)]
pub struct PublishStatsTracker {
    published_count: Arc<AtomicUsize>,
    failed_count: Arc<AtomicUsize>,
    published_bytes: Arc<AtomicUsize>,
}

impl PublishStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // increment_published records an acknowledged publish of
    // `bytes` payload bytes.
    pub fn increment_published(&self, bytes: usize) {
        self.published_count.fetch_add(1, Ordering::Relaxed);
        self.published_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn increment_failed(&self) {
        self.failed_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset_counters(&self) {
        self.published_count.store(0, Ordering::Relaxed);
        self.failed_count.store(0, Ordering::Relaxed);
        self.published_bytes.store(0, Ordering::Relaxed);
    }

    pub fn to_stats(&self) -> PublishStats {
        PublishStats {
            total_published: self.published_count.load(Ordering::Relaxed),
            total_failed: self.failed_count.load(Ordering::Relaxed),
            total_bytes_published: self.published_bytes.load(Ordering::Relaxed),
        }
    }
}

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

// src/command/protocol.rs
// IR protocol encodings the blaster firmware knows how to transmit.

use strum_macros::{Display, EnumIter, EnumString};

// IrProtocol lists the encodings the device will accept in a
// protocol command's "proto" field. The device matches names
// case-insensitively, so parsing does too. Anything else is
// still published, but the device falls back to NEC for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum IrProtocol {
    Samsung,
    #[strum(serialize = "NEC")]
    Nec,
    #[strum(serialize = "LG")]
    Lg,
    Sony12,
    #[strum(serialize = "JVC")]
    Jvc,
    #[strum(serialize = "RC5")]
    Rc5,
    #[strum(serialize = "RC6")]
    Rc6,
    Panasonic,
}

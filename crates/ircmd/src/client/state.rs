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

// src/client/state.rs
// Connection lifecycle for a publish run.
//
//   Disconnected -> Connecting -> Connected -> Publishing -> Disconnecting -> Disconnected
//                       |                          ^   |          ^
//                       +--> Disconnected (fail)   +---+          |
//                                    Connected --------------------+

use std::fmt;

use crate::errors::IrPublishError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Publishing,
    Disconnecting,
}

impl ConnectionState {
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Disconnected)
                | (Connected, Publishing)
                | (Connected, Disconnecting)
                | (Publishing, Publishing)
                | (Publishing, Disconnecting)
                | (Disconnecting, Disconnected)
        )
    }

    // transition returns the new state, or an error naming both ends
    // of the rejected edge.
    pub fn transition(self, next: ConnectionState) -> Result<ConnectionState, IrPublishError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(IrPublishError::InvalidStateTransition {
                from: self,
                to: next,
            })
        }
    }

    // is_session_open is true once CONNACK arrived and until the
    // disconnect starts.
    pub fn is_session_open(self) -> bool {
        matches!(self, Self::Connected | Self::Publishing)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Publishing => "publishing",
            Self::Disconnecting => "disconnecting",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionState::*;
    use super::*;

    #[test]
    fn test_happy_path_lifecycle() {
        let mut state = ConnectionState::default();
        assert_eq!(state, Disconnected);

        for next in [
            Connecting,
            Connected,
            Publishing,
            Publishing,
            Disconnecting,
            Disconnected,
        ] {
            state = state.transition(next).unwrap();
        }
        assert_eq!(state, Disconnected);
    }

    #[test]
    fn test_connect_failure_returns_to_disconnected() {
        let state = Connecting.transition(Disconnected).unwrap();
        assert_eq!(state, Disconnected);
    }

    #[test]
    fn test_empty_batch_can_disconnect_from_connected() {
        assert!(Connected.can_transition_to(Disconnecting));
    }

    #[test]
    fn test_cannot_publish_before_connected() {
        let err = Connecting.transition(Publishing).unwrap_err();
        match err {
            IrPublishError::InvalidStateTransition { from, to } => {
                assert_eq!(from, Connecting);
                assert_eq!(to, Publishing);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!Disconnected.can_transition_to(Publishing));
    }

    #[test]
    fn test_cannot_skip_disconnecting() {
        assert!(!Publishing.can_transition_to(Disconnected));
        assert!(!Connected.can_transition_to(Disconnected));
    }

    #[test]
    fn test_session_open_states() {
        assert!(Connected.is_session_open());
        assert!(Publishing.is_session_open());
        assert!(!Connecting.is_session_open());
        assert!(!Disconnecting.is_session_open());
    }

    #[test]
    fn test_display_in_error_message() {
        let err = Disconnected.transition(Disconnecting).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid connection state transition: disconnected -> disconnecting"
        );
    }
}

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

// tests/commands.rs
// Tests for IR command records and their JSON payloads.

use std::str::FromStr;

use ircmd::command::{CommandKind, IrCommand, IrProtocol, ProtocolCommand, RawCommand};
use ircmd::table::CommandTable;
use serde_json::{Value, json};
use strum::IntoEnumIterator;

fn payload_json(command: &IrCommand) -> Value {
    serde_json::from_slice(&command.to_payload().unwrap()).unwrap()
}

#[test]
fn test_protocol_command_payload_shape() {
    let command = IrCommand::protocol("Samsung", 7, 2);
    assert_eq!(
        payload_json(&command),
        json!({"proto": "Samsung", "addr": 7, "cmd": 2, "rpt": 0})
    );
}

#[test]
fn test_raw_command_payload_shape() {
    let command = IrCommand::raw(38, vec![1330, 270, 1380]);
    assert_eq!(
        payload_json(&command),
        json!({"raw": true, "freq": 38, "data": [1330, 270, 1380]})
    );
}

#[test]
fn test_payload_is_compact() {
    let payload = IrCommand::raw(38, vec![1, 2]).to_payload().unwrap();
    let text = String::from_utf8(payload).unwrap();
    assert!(!text.contains(' '));
    assert!(!text.contains('\n'));
}

#[test]
fn test_builtin_commands_round_trip() {
    let table = CommandTable::builtin();
    for (name, command) in table.iter() {
        let payload = command.to_payload().unwrap();
        let restored = IrCommand::from_payload(&payload).unwrap();
        assert_eq!(&restored, command, "round trip changed '{name}'");
    }
}

#[test]
fn test_burst_fields_round_trip_and_names() {
    let command: IrCommand = ProtocolCommand::new("NEC", 0x20, 0x10)
        .with_repeat(1)
        .with_burst(3, 110)
        .into();
    let value = payload_json(&command);
    assert_eq!(value["repeatCount"], json!(3));
    assert_eq!(value["repeatInterval"], json!(110));
    assert_eq!(value["rpt"], json!(1));

    let restored = IrCommand::from_payload(&command.to_payload().unwrap()).unwrap();
    assert_eq!(restored, command);

    let raw: IrCommand = RawCommand::new(40, vec![500, 500]).with_burst(2, 95).into();
    let restored = IrCommand::from_payload(&raw.to_payload().unwrap()).unwrap();
    assert_eq!(restored, raw);
}

#[test]
fn test_missing_rpt_defaults_to_zero() {
    let command =
        IrCommand::from_payload(br#"{"proto":"Samsung","addr":7,"cmd":11}"#).unwrap();
    assert_eq!(command, IrCommand::protocol("Samsung", 7, 11));
}

#[test]
fn test_parse_picks_variant_by_fields() {
    let protocol = IrCommand::from_payload(br#"{"proto":"LG","addr":1,"cmd":2,"rpt":0}"#).unwrap();
    assert_eq!(protocol.kind(), CommandKind::Protocol);

    let raw = IrCommand::from_payload(br#"{"raw":true,"freq":38,"data":[100,200]}"#).unwrap();
    assert_eq!(raw.kind(), CommandKind::Raw);
    match raw {
        IrCommand::Raw(r) => {
            assert_eq!(r.freq, 38);
            assert_eq!(r.data, vec![100, 200]);
        }
        other => panic!("expected raw command, got {other:?}"),
    }
}

#[test]
fn test_parse_rejects_both_shapes_at_once() {
    let err = IrCommand::from_payload(
        br#"{"proto":"Samsung","addr":7,"cmd":2,"raw":true,"freq":38,"data":[1]}"#,
    )
    .unwrap_err();
    assert!(err.is_serialization_error());
}

#[test]
fn test_parse_rejects_raw_false() {
    assert!(IrCommand::from_payload(br#"{"raw":false,"freq":38,"data":[1,2]}"#).is_err());
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(IrCommand::from_payload(b"tv_power").is_err());
    assert!(IrCommand::from_payload(br#"{"addr":7,"cmd":2}"#).is_err());
    assert!(IrCommand::from_payload(br#"{"proto":"NEC","addr":-1,"cmd":2}"#).is_err());
}

#[test]
fn test_summary_text() {
    assert_eq!(
        IrCommand::protocol("Samsung", 7, 2).summary(),
        "Protocol (Samsung)"
    );
    assert_eq!(IrCommand::raw(38, vec![1, 2, 3]).summary(), "Raw (3 values)");
}

#[test]
fn test_protocol_names_are_case_insensitive() {
    assert_eq!(IrProtocol::from_str("samsung").unwrap(), IrProtocol::Samsung);
    assert_eq!(IrProtocol::from_str("nec").unwrap(), IrProtocol::Nec);
    assert_eq!(IrProtocol::from_str("Rc6").unwrap(), IrProtocol::Rc6);
    assert!(IrProtocol::from_str("Sharp").is_err());

    assert_eq!(IrProtocol::Nec.to_string(), "NEC");
    assert_eq!(IrProtocol::Sony12.to_string(), "Sony12");
}

#[test]
fn test_protocol_command_resolves_protocol() {
    let known = ProtocolCommand::new("jvc", 1, 1);
    assert_eq!(known.protocol(), Some(IrProtocol::Jvc));

    let unknown = ProtocolCommand::new("Mitsubishi", 1, 1);
    assert_eq!(unknown.protocol(), None);
}

#[test]
fn test_every_protocol_parses_from_its_name() {
    let names: Vec<String> = IrProtocol::iter().map(|p| p.to_string()).collect();
    assert_eq!(names.len(), 8);
    for protocol in IrProtocol::iter() {
        let name = protocol.to_string();
        assert_eq!(IrProtocol::from_str(&name).unwrap(), protocol);
        assert_eq!(IrProtocol::from_str(&name.to_lowercase()).unwrap(), protocol);
    }
}

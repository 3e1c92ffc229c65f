//! Integration tests for knx-homekit-common library.

use knx_homekit_common::{Dpt, FieldValue, GroupAddress, LogFormat, LoggingConfig, parse_config};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Object {
    address: GroupAddress,
    dpt: Dpt,
    value: FieldValue,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    logging: LoggingConfig,
    objects: Vec<Object>,
}

#[test]
fn test_full_document_parsing() {
    let json5 = r#"
    {
        logging: { level: "trace", format: "json" },
        objects: [
            { address: "3/2/8", dpt: "DPT1", value: true },
            { address: "3/6/8", dpt: "DPT5.001", value: 128 },
            { address: "3/4/8", dpt: "DPT9", value: 21.5 },
        ],
    }
    "#;

    let doc: Document = parse_config(json5).expect("parse failed");

    assert_eq!(doc.logging.level, "trace");
    assert_eq!(doc.logging.format, LogFormat::Json);
    assert_eq!(doc.objects.len(), 3);

    for object in &doc.objects {
        assert!(
            object.dpt.accepts(&object.value),
            "{} should accept {}",
            object.dpt,
            object.value
        );
    }

    assert_eq!(doc.objects[1].address.to_string(), "3/6/8");
    assert_eq!(doc.objects[2].value, FieldValue::Float(21.5));
}

#[test]
fn test_invalid_address_rejected_by_parser() {
    let json5 = r#"{ objects: [{ address: "40/0/0", dpt: "DPT1", value: false }] }"#;
    let result: knx_homekit_common::Result<Document> = parse_config(json5);
    assert!(result.is_err());
}

#[test]
fn test_invalid_dpt_rejected_by_parser() {
    let json5 = r#"{ objects: [{ address: "1/0/0", dpt: "DPT232", value: 0 }] }"#;
    let result: knx_homekit_common::Result<Document> = parse_config(json5);
    assert!(result.is_err());
}

#[test]
fn test_address_ordering_follows_raw_value() {
    let mut addresses: Vec<GroupAddress> = ["3/7/8", "1/0/7", "3/0/8"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    addresses.sort();

    let rendered: Vec<String> = addresses.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["1/0/7", "3/0/8", "3/7/8"]);
}

//! Key command tests: `SET` writes and single-shot key commands.

use serde_json::json;
use tile38_query::Keys;

#[test]
fn set_point_z_with_field_and_expiration() {
    let cmd = Keys::set("agent", "47")
        .point_z(0.0, 0.0, -20.0)
        .field("age", 55.0)
        .expiration(60 * 60 * 24 * 365)
        .compile()
        .unwrap();
    assert_eq!(
        cmd.to_string(),
        "SET agent 47 EX 31536000 FIELD age 55 POINT 0 0 -20"
    );
}

#[test]
fn set_point_without_elevation() {
    let cmd = Keys::set("fleet", "truck1")
        .point(33.5123, -112.2693)
        .compile()
        .unwrap();
    assert_eq!(cmd.to_string(), "SET fleet truck1 POINT 33.5123 -112.2693");
}

#[test]
fn fields_keep_call_order() {
    let cmd = Keys::set("fleet", "truck1")
        .field("speed", 90.0)
        .point(1.0, 2.0)
        .field("age", 3.5)
        .field("speed", 95.0)
        .compile()
        .unwrap();
    assert_eq!(
        cmd.to_string(),
        "SET fleet truck1 FIELD speed 90 FIELD age 3.5 FIELD speed 95 POINT 1 2"
    );
}

#[test]
fn object_payload_is_one_token() {
    let cmd = Keys::set("cities", "tempe")
        .object(json!({"type": "Point", "coordinates": [-111.94, 33.42]}))
        .compile()
        .unwrap();
    assert_eq!(
        cmd.args,
        vec![
            "cities",
            "tempe",
            "OBJECT",
            r#"{"type":"Point","coordinates":[-111.94,33.42]}"#
        ]
    );
}

#[test]
fn string_bounds_and_hash_payloads() {
    let cmd = Keys::set("props", "p1").string("Hello").compile().unwrap();
    assert_eq!(cmd.to_string(), "SET props p1 STRING Hello");

    let cmd = Keys::set("props", "p1")
        .bounds(30.0, -110.0, 40.0, -100.5)
        .compile()
        .unwrap();
    assert_eq!(cmd.to_string(), "SET props p1 BOUNDS 30 -110 40 -100.5");

    let cmd = Keys::set("props", "p1").hash("9tbnthxzr").compile().unwrap();
    assert_eq!(cmd.to_string(), "SET props p1 HASH 9tbnthxzr");
}

#[test]
fn nx_and_xx_precede_payload() {
    let cmd = Keys::set("fleet", "truck1")
        .point(1.0, 2.0)
        .nx()
        .field("speed", 10.0)
        .compile()
        .unwrap();
    assert_eq!(
        cmd.to_string(),
        "SET fleet truck1 FIELD speed 10 NX POINT 1 2"
    );

    let cmd = Keys::set("fleet", "truck1")
        .nx()
        .xx()
        .point(1.0, 2.0)
        .compile()
        .unwrap();
    assert_eq!(cmd.to_string(), "SET fleet truck1 XX POINT 1 2");
}

#[test]
fn set_without_payload_compiles_mechanically() {
    let cmd = Keys::set("fleet", "truck1").compile().unwrap();
    assert_eq!(cmd.to_string(), "SET fleet truck1");
}

#[test]
fn non_finite_field_is_an_error() {
    assert!(Keys::set("fleet", "truck1")
        .field("speed", f64::NAN)
        .point(1.0, 2.0)
        .compile()
        .is_err());
}

#[test]
fn single_shot_key_commands() {
    let cases = [
        (Keys::get("fleet", "truck1"), "GET fleet truck1"),
        (Keys::del("fleet", "truck1"), "DEL fleet truck1"),
        (Keys::drop("fleet"), "DROP fleet"),
        (Keys::expire("fleet", "truck1", 10), "EXPIRE fleet truck1 10"),
        (Keys::persist("fleet", "truck1"), "PERSIST fleet truck1"),
        (Keys::ttl("fleet", "truck1"), "TTL fleet truck1"),
    ];
    for (command, expected) in cases {
        assert_eq!(command.compile().unwrap().to_string(), expected);
    }
}

//! JSON query descriptions and `Command` serialization.

use serde_json::json;
use tile38_query::{Command, FenceAction, FenceCommand, Geofence, Keys, OutputFormat, Query, Search};

#[test]
fn search_from_json() {
    let query = Query::from_json(
        r#"{"search":{
            "predicate":{"kind":"nearby","key":"fleet","lat":10,"lon":20,"radius":30},
            "where":[{"field":"speed","min":10,"max":20}],
            "wherein":[{"field":"speed","values":[10,20,30]}],
            "match":"abc*",
            "cursor":10,
            "limit":5,
            "format":"ids"
        }}"#,
    )
    .unwrap();
    assert_eq!(
        query.compile().unwrap().to_string(),
        "NEARBY fleet WHERE speed 10 20 WHEREIN speed 3 10 20 30 MATCH abc* CURSOR 10 LIMIT 5 IDS POINT 10 20 30"
    );
}

#[test]
fn geofence_from_json() {
    let query = Query::from_json(
        r#"{"geofence":{
            "predicate":{"kind":"nearby","key":"fleet","lat":10,"lon":20,"radius":30},
            "clip":true,
            "cursor":5,
            "detect":["cross","exit","enter"],
            "commands":["del","set"],
            "format":{"hashes":5}
        }}"#,
    )
    .unwrap();
    assert_eq!(
        query.compile().unwrap().to_string(),
        "NEARBY fleet CLIP CURSOR 5 FENCE DETECT enter,exit,cross COMMANDS set,del HASHES 5 POINT 10 20 30"
    );
}

#[test]
fn set_from_json() {
    let query = Query::from_json(
        r#"{"set":{
            "key":"agent","id":"47",
            "payload":{"point":{"lat":0,"lon":0,"z":-20}},
            "fields":[{"name":"age","value":55}],
            "ex":31536000
        }}"#,
    )
    .unwrap();
    assert_eq!(
        query.compile().unwrap().to_string(),
        "SET agent 47 EX 31536000 FIELD age 55 POINT 0 0 -20"
    );
}

#[test]
fn key_command_from_json() {
    let query = Query::from_json(r#"{"key":{"cmd":"expire","key":"fleet","id":"t1","seconds":30}}"#)
        .unwrap();
    assert_eq!(query.compile().unwrap().to_string(), "EXPIRE fleet t1 30");
}

#[test]
fn invalid_json_is_a_json_error() {
    let err = Query::from_json("{not json").unwrap_err();
    assert!(err.to_string().starts_with("JSON error"), "got: {}", err);
}

#[test]
fn builders_survive_a_json_roundtrip() {
    let queries: Vec<Query> = vec![
        Search::intersects("fleet")
            .where_range("speed", 1.0, 2.5)
            .no_fields()
            .object(json!({"type": "Point", "coordinates": [1, 2]}))
            .into(),
        Geofence::roam("agent", "target", "*", 100.0)
            .actions([FenceAction::Exit])
            .commands([FenceCommand::Expire])
            .distance()
            .into(),
        Keys::set("fleet", "t1").field("age", 3.0).xx().string("x").into(),
        Keys::ttl("fleet", "t1").into(),
    ];
    for query in queries {
        let json = serde_json::to_string(&query).unwrap();
        let back = Query::from_json(&json).unwrap();
        assert_eq!(back.compile().unwrap(), query.compile().unwrap(), "{}", json);
    }
}

#[test]
fn command_serializes_as_name_and_args() {
    let cmd = Search::within("fleet").format(OutputFormat::Count).compile().unwrap();
    let value = serde_json::to_value(&cmd).unwrap();
    assert_eq!(value, json!({"name": "WITHIN", "args": ["fleet", "COUNT"]}));
    let back: Command = serde_json::from_value(value).unwrap();
    assert_eq!(back, cmd);
}

// ============================================================================
// Unknown keys are rejected, never dropped
// ============================================================================

#[test]
fn misspelled_search_clause_is_an_error() {
    let result = Query::from_json(r#"{"search":{"predicate":{"kind":"within","key":"fleet"},"limt":5}}"#);
    let err = result.expect_err("a misspelled clause must not compile without it");
    assert!(err.to_string().contains("limt"), "got: {}", err);
}

#[test]
fn misspelled_filter_clause_is_an_error() {
    let json = r#"{"search":{"predicate":{"kind":"within","key":"fleet"},"wheres":[{"field":"speed","min":1,"max":2}]}}"#;
    assert!(Query::from_json(json).is_err());
}

#[test]
fn misspelled_geofence_clause_is_an_error() {
    let json = r#"{"geofence":{"predicate":{"kind":"within","key":"fleet"},"actions":["enter"]}}"#;
    assert!(Query::from_json(json).is_err());
}

#[test]
fn misspelled_set_clause_is_an_error() {
    let json = r#"{"set":{"key":"fleet","id":"t1","expiration":30,"payload":{"point":{"lat":1,"lon":2}}}}"#;
    assert!(Query::from_json(json).is_err());
}

#[test]
fn unknown_nested_keys_are_errors() {
    let cases = [
        r#"{"search":{"predicate":{"kind":"within","key":"fleet","radius":5}}}"#,
        r#"{"search":{"predicate":{"kind":"within","key":"fleet"},"where":[{"field":"a","min":1,"max":2,"step":1}]}}"#,
        r#"{"search":{"predicate":{"kind":"within","key":"fleet"},"area":{"tile":{"x":1,"y":2,"z":3,"w":4}}}}"#,
        r#"{"geofence":{"predicate":{"kind":"roam","key":"a","target":"b","pattern":"*","meters":1,"radius":2}}}"#,
        r#"{"set":{"key":"fleet","id":"t1","payload":{"point":{"lat":1,"lon":2,"elevation":3}}}}"#,
        r#"{"set":{"key":"fleet","id":"t1","fields":[{"name":"age","value":1,"unit":"y"}]}}"#,
        r#"{"key":{"cmd":"get","key":"fleet","id":"t1","seconds":3}}"#,
    ];
    for json in cases {
        assert!(Query::from_json(json).is_err(), "accepted: {}", json);
    }
}

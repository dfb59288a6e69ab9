use qrm::{CoercionError, Destination, MemoryRows, QrmError, ScalarKind, Value};

#[derive(Debug, Default, Destination)]
struct Reading {
    #[qrm(primary_key)]
    id: i64,
    level: i8,
    ratio: f32,
    active: bool,
    label: Option<String>,
}

fn readings(rows: Vec<[Value; 5]>) -> (Vec<Reading>, Result<usize, QrmError>) {
    let source = rows.into_iter().fold(
        MemoryRows::new([
            "reading.id",
            "reading.level",
            "reading.ratio",
            "reading.active",
            "reading.label",
        ]),
        MemoryRows::row,
    );
    let mut target = Vec::new();
    let result = qrm::query(source, &mut target);
    (target, result)
}

#[test]
fn overflow_halts_at_the_offending_row() {
    let (target, result) = readings(vec![
        [Value::from(1), Value::from(5), Value::from(0.5), Value::from(1), Value::Null],
        [Value::from(2), Value::from(300), Value::from(0.5), Value::from(0), Value::Null],
        [Value::from(3), Value::from(1), Value::from(0.5), Value::from(0), Value::Null],
    ]);

    match result {
        Err(QrmError::Coercion {
            column,
            row,
            source,
        }) => {
            assert_eq!(column, "reading.level");
            assert_eq!(row, 1);
            assert_eq!(
                source,
                CoercionError::Overflow {
                    kind: ScalarKind::Int8,
                    found: "INTEGER",
                    value: "300".into(),
                }
            );
        }
        other => panic!("expected a coercion error, got {other:?}"),
    }
    // Rows before the failure stay applied; later rows are never read
    assert!(target.iter().all(|r| r.id != 3));
    assert_eq!(target[0].level, 5);
}

#[test]
fn integral_reals_and_integer_booleans_are_accepted() {
    let (target, result) = readings(vec![[
        Value::from(1),
        Value::Real(-12.0),
        Value::Integer(2),
        Value::Integer(7),
        Value::from("warm"),
    ]]);

    assert_eq!(result.unwrap(), 1);
    let reading = &target[0];
    assert_eq!(reading.level, -12);
    assert_eq!(reading.ratio, 2.0);
    assert!(reading.active);
    assert_eq!(reading.label.as_deref(), Some("warm"));
}

#[test]
fn fractional_real_is_not_an_integer() {
    let (_, result) = readings(vec![[
        Value::from(1),
        Value::Real(1.5),
        Value::Null,
        Value::Null,
        Value::Null,
    ]]);
    assert!(matches!(
        result,
        Err(QrmError::Coercion {
            source: CoercionError::Parse {
                kind: ScalarKind::Int8,
                ..
            },
            ..
        })
    ));
}

#[test]
fn text_is_not_a_number() {
    let (_, result) = readings(vec![[
        Value::from(1),
        Value::from("five"),
        Value::Null,
        Value::Null,
        Value::Null,
    ]]);
    assert!(matches!(
        result,
        Err(QrmError::Coercion {
            source: CoercionError::Mismatch {
                kind: ScalarKind::Int8,
                found: "TEXT"
            },
            ..
        })
    ));
}

#[test]
fn nulls_become_zero_values() {
    let (target, result) = readings(vec![[
        Value::from(9),
        Value::Null,
        Value::Null,
        Value::Null,
        Value::Null,
    ]]);
    result.unwrap();
    assert_eq!(target[0].level, 0);
    assert_eq!(target[0].ratio, 0.0);
    assert!(!target[0].active);
    assert_eq!(target[0].label, None);
}

#[cfg(feature = "chrono")]
mod temporal {
    use chrono::{DateTime, NaiveDate, Utc};
    use qrm::{Destination, MemoryRows, Value};

    #[derive(Debug, Default, Destination)]
    struct Event {
        #[qrm(primary_key)]
        id: i64,
        day: NaiveDate,
        at: DateTime<Utc>,
        seen: Option<DateTime<Utc>>,
    }

    #[test]
    fn temporal_fields_parse_text_and_unix_seconds() {
        let rows = MemoryRows::new(["event.id", "event.day", "event.at", "event.seen"]).row([
            Value::from(1),
            Value::from("2024-02-29"),
            Value::from("2024-02-29 12:00:00"),
            Value::from(0),
        ]);
        let mut events: Vec<Event> = Vec::new();
        qrm::query(rows, &mut events).unwrap();

        let event = &events[0];
        assert_eq!(event.day, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(event.at.to_rfc3339(), "2024-02-29T12:00:00+00:00");
        assert_eq!(event.seen, DateTime::from_timestamp(0, 0));
    }
}

#[cfg(feature = "uuid")]
mod uuid_fields {
    use qrm::{Destination, MemoryRows, Value};
    use uuid::Uuid;

    #[derive(Debug, Default, Destination)]
    struct Session {
        #[qrm(primary_key)]
        id: Uuid,
        token: Option<Uuid>,
    }

    #[test]
    fn uuid_from_text_and_blob() {
        let id = Uuid::new_v4();
        let token = Uuid::new_v4();
        let rows = MemoryRows::new(["session.id", "session.token"])
            .row([Value::from(id.to_string()), Value::from(token.as_bytes().to_vec())]);

        let mut sessions: Vec<Session> = Vec::new();
        qrm::query(rows, &mut sessions).unwrap();
        assert_eq!(sessions[0].id, id);
        assert_eq!(sessions[0].token, Some(token));
    }
}

use qrm::{Destination, MemoryRows, Value};

#[derive(Debug, Default, Destination)]
#[qrm(alias = "op")]
struct Operation {
    #[qrm(primary_key)]
    id: i64,
    #[qrm(alias = "from")]
    source: Account,
    memo: Option<Memo>,
    legs: Vec<Leg>,
    #[qrm(skip)]
    cached: String,
    r#type: Option<String>,
    payload: Vec<u8>,
}

#[derive(Debug, Default, Destination)]
struct Account {
    #[qrm(primary)]
    id: i64,
    name: String,
}

#[derive(Debug, Default, Destination)]
struct Memo {
    text: String,
}

#[derive(Debug, Default, Destination)]
struct Leg {
    #[qrm(primary_key)]
    op: i64,
    #[qrm(primary_key)]
    seq: i32,
}

fn main() {
    let rows = MemoryRows::new(["op.id", "op.type", "from.id", "from.name", "legs.op", "legs.seq"])
        .row([
            Value::from(1),
            Value::from("transfer"),
            Value::from(7),
            Value::from("main"),
            Value::from(1),
            Value::from(0),
        ]);

    let mut operations: Vec<Operation> = Vec::new();
    let roots = qrm::query(rows, &mut operations).unwrap();

    assert_eq!(roots, 1);
    assert_eq!(operations[0].source.name, "main");
    assert_eq!(operations[0].r#type.as_deref(), Some("transfer"));
    assert_eq!(operations[0].legs.len(), 1);
    assert!(operations[0].memo.is_none());
    assert!(operations[0].cached.is_empty());
    assert!(operations[0].payload.is_empty());
}

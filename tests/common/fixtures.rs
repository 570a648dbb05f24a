//! Lineage record fixtures for integration tests.
#![allow(dead_code)]

use std::io::Write;

use lineage_graph::domain::record::{FieldRef, LineageRecord, RefField};
use tempfile::NamedTempFile;

fn derive(target: FieldRef, refs: Vec<RefField>) -> LineageRecord {
    LineageRecord::with_refs(target, refs)
}

/// `b.c` at (0,0) derives from `y.z` at (1,0), labeled.
pub fn single_edge(label: &str) -> LineageRecord {
    derive(
        FieldRef::positioned(0, 0, "a.b.c"),
        vec![RefField::labeled(FieldRef::positioned(1, 0, "x.y.z"), label)],
    )
}

/// Classic diamond:
/// `rpt.t.f <- dw.a.f <- ods.c.f` and `rpt.t.f <- dw.b.f <- ods.c.f`,
/// plus `ods.c.f <- src.d.f` above the shared ancestor.
pub fn diamond() -> Vec<LineageRecord> {
    vec![
        derive(
            FieldRef::positioned(3, 0, "rpt.t.f"),
            vec![
                RefField::new(FieldRef::positioned(2, 0, "dw.a.f")),
                RefField::new(FieldRef::positioned(2, 1, "dw.b.f")),
            ],
        ),
        derive(
            FieldRef::positioned(2, 0, "dw.a.f"),
            vec![RefField::new(FieldRef::positioned(1, 0, "ods.c.f"))],
        ),
        derive(
            FieldRef::positioned(2, 1, "dw.b.f"),
            vec![RefField::new(FieldRef::positioned(1, 0, "ods.c.f"))],
        ),
        derive(
            FieldRef::positioned(1, 0, "ods.c.f"),
            vec![RefField::new(FieldRef::terminal("src.d.f"))],
        ),
    ]
}

/// `t.f` reads `a.f` directly and through `b.f`, which itself reads `a.f`.
pub fn shared_ancestor() -> Vec<LineageRecord> {
    vec![
        derive(
            FieldRef::positioned(2, 0, "rpt.t.f"),
            vec![
                RefField::labeled(FieldRef::positioned(0, 0, "ods.a.f"), "direct"),
                RefField::labeled(FieldRef::positioned(1, 0, "dw.b.f"), "via b"),
            ],
        ),
        derive(
            FieldRef::positioned(1, 0, "dw.b.f"),
            vec![RefField::new(FieldRef::positioned(0, 0, "ods.a.f"))],
        ),
    ]
}

/// A mix of terminal and positioned fields, repeated edges and self-loops.
pub fn mixed() -> Vec<LineageRecord> {
    vec![
        derive(
            FieldRef::positioned(1, 0, "dw.orders.user_id"),
            vec![
                RefField::labeled(FieldRef::terminal("ods.users.id"), "copy"),
                RefField::new(FieldRef::positioned(1, 0, "dw.orders.raw_user")),
            ],
        ),
        derive(
            FieldRef::positioned(1, 0, "dw.orders.total"),
            vec![
                RefField::new(FieldRef::terminal("ods.items.price")),
                RefField::new(FieldRef::terminal("ods.items.qty")),
            ],
        ),
        derive(
            FieldRef::positioned(2, 0, "rpt.daily.total"),
            vec![RefField::labeled(FieldRef::positioned(1, 0, "dw.orders.total"), "sum")],
        ),
        derive(
            FieldRef::positioned(2, 0, "rpt.daily.total"),
            vec![RefField::labeled(FieldRef::positioned(1, 0, "dw.orders.total"), "sum v2")],
        ),
        LineageRecord::new(FieldRef::terminal("ods.users.name")),
    ]
}

/// Records with one malformed identifier in the middle.
pub fn with_malformed() -> Vec<LineageRecord> {
    let mut records = mixed();
    records.insert(
        1,
        derive(
            FieldRef::positioned(1, 0, "dw.orders.user_id"),
            vec![RefField::new(FieldRef::terminal("users"))],
        ),
    );
    records
}

pub fn write_records_file(records: &[LineageRecord]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    let json = serde_json::to_string(records).expect("serialize records");
    file.write_all(json.as_bytes()).expect("write records");
    file
}

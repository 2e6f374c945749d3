//! Shared fixture network for unit tests.
//!
//! ```text
//!                        E3 (150 m, Links)
//!   K1 ──E1 (310 m)── K2 ──E2 (100 m, reversed)── K3 <                 > K6 ──E5 (100 m)── K7
//!                                                      E4 (120 m, Rechts)
//!   K8 ──E6 (100 m)── K9   (isolated)
//! ```
//!
//! E2 runs from K3 to K2, so travel from E1 enters it descending.

use crate::{Container, Record};

fn signal(id: &str, edge: &str, offset: &str, direction: &str) -> Record {
    Record::point_object(
        "Signal",
        id,
        vec![Record::placement(edge, offset, Some(direction))],
    )
}

pub(crate) fn diamond() -> Container {
    Container::from_records(vec![
        Record::top_edge("E1", "K1", "K2", "Ende", "Verbindung", "310.000"),
        Record::top_edge("E2", "K3", "K2", "Spitze", "Verbindung", "100.000"),
        Record::top_edge("E3", "K3", "K6", "Links", "Links", "150.000"),
        Record::top_edge("E4", "K3", "K6", "Rechts", "Rechts", "120.000"),
        Record::top_edge("E5", "K6", "K7", "Spitze", "Ende", "100.000"),
        Record::top_edge("E6", "K8", "K9", "Ende", "Ende", "100.000"),
        signal("S1", "E1", "50.000", "in"),
        Record::point_object(
            "Datenpunkt",
            "D1",
            vec![Record::placement("E1", "150.000", None)],
        ),
        signal("S2", "E2", "60.000", "gegen"),
        signal("S3", "E3", "100.000", "in"),
        signal("S4", "E4", "100.000", "in"),
        signal("S5", "E5", "80.000", "gegen"),
        signal("S6", "E5", "30.000", "in"),
        signal("S8", "E6", "40.000", "in"),
        Record::point_object(
            "Datenpunkt",
            "B1",
            vec![
                Record::placement("E1", "310.000", Some("in")),
                Record::placement("E2", "100.000", Some("gegen")),
            ],
        ),
    ])
}

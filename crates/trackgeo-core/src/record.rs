//! # Records
//!
//! A record is a labeled attribute tree, the shape every PlanPro object has
//! once its XML is parsed: a label, optional text, and ordered children.
//!
//! Field access is by `/`-separated label paths (`TOP_Kante_Allg/TOP_Laenge/Wert`).
//! Each step takes the first child with that label.

use crate::primitives::{
    EDGE_LABEL, IDENTITY_PATH, LENGTH_PATH, NODE_A_PATH, NODE_B_PATH, PLACEMENT_DIRECTION_PATH,
    PLACEMENT_EDGE_PATH, PLACEMENT_LABEL, PLACEMENT_OFFSET_PATH, ROLE_A_PATH, ROLE_B_PATH,
};
use serde::{Deserialize, Serialize};

/// One node of a record tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Record {
    label: String,
    text: Option<String>,
    children: Vec<Record>,
}

impl Record {
    /// Create an empty record with the given label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Create a leaf record carrying text.
    #[must_use]
    pub fn leaf(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(label).with_text(text)
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Record) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child, keeping document order.
    pub fn push_child(&mut self, child: Record) {
        self.children.push(child);
    }

    /// Append text, as the XML reader does for split text nodes.
    pub fn append_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    // =========================================================================
    // ACCESS
    // =========================================================================

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Consume the record, keeping only its children.
    #[must_use]
    pub fn into_children(self) -> Vec<Record> {
        self.children
    }

    /// First child with the given label.
    #[must_use]
    pub fn child(&self, label: &str) -> Option<&Record> {
        self.children.iter().find(|c| c.label == label)
    }

    /// All children with the given label, in document order.
    pub fn children<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.children.iter().filter(move |c| c.label == label)
    }

    /// Resolve a `/`-separated path of child labels.
    ///
    /// Returns `None` as soon as one step is missing. An empty path
    /// resolves to the record itself.
    #[must_use]
    pub fn field(&self, path: &str) -> Option<&Record> {
        path.split('/')
            .filter(|step| !step.is_empty())
            .try_fold(self, |record, step| record.child(step))
    }

    /// Text of the field at `path`. A present field without text reads as "".
    #[must_use]
    pub fn value(&self, path: &str) -> Option<&str> {
        self.field(path).map(|f| f.text().unwrap_or(""))
    }

    /// The record's identity key, if it has one.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.value(IDENTITY_PATH)
    }

    /// Edge records are labeled `TOP_Kante`.
    #[must_use]
    pub fn is_edge(&self) -> bool {
        self.label == EDGE_LABEL
    }

    /// Point objects are records placed on at least one edge.
    #[must_use]
    pub fn is_point_object(&self) -> bool {
        self.child(PLACEMENT_LABEL).is_some()
    }

    // =========================================================================
    // BUILDERS
    // =========================================================================

    /// Build `<label><Wert>value</Wert></label>`, the PlanPro value wrapper.
    #[must_use]
    pub fn wert(label: &str, value: impl Into<String>) -> Self {
        Self::new(label).with_child(Self::leaf("Wert", value))
    }

    /// Build a `TOP_Kante` record. `length` is in meters, as in documents.
    #[must_use]
    pub fn top_edge(
        id: &str,
        node_a: &str,
        node_b: &str,
        role_a: &str,
        role_b: &str,
        length: &str,
    ) -> Self {
        let general = Self::new("TOP_Kante_Allg")
            .with_child(Self::wert(last_step(ROLE_A_PATH), role_a))
            .with_child(Self::wert(last_step(ROLE_B_PATH), role_b))
            .with_child(Self::wert(last_step(LENGTH_PATH), length));

        Self::new(EDGE_LABEL)
            .with_child(Self::wert("Identitaet", id))
            .with_child(Self::wert(first_step(NODE_A_PATH), node_a))
            .with_child(Self::wert(first_step(NODE_B_PATH), node_b))
            .with_child(general)
    }

    /// Build a `Punkt_Objekt_TOP_Kante` placement group. `offset` is in meters.
    #[must_use]
    pub fn placement(edge: &str, offset: &str, direction: Option<&str>) -> Self {
        let mut group = Self::new(PLACEMENT_LABEL)
            .with_child(Self::wert(first_step(PLACEMENT_EDGE_PATH), edge))
            .with_child(Self::wert(first_step(PLACEMENT_OFFSET_PATH), offset));
        if let Some(direction) = direction {
            group.push_child(Self::wert(first_step(PLACEMENT_DIRECTION_PATH), direction));
        }
        group
    }

    /// Build a point object of type `label` with the given placements.
    #[must_use]
    pub fn point_object(label: &str, id: &str, placements: Vec<Record>) -> Self {
        let mut record = Self::new(label).with_child(Self::wert("Identitaet", id));
        for placement in placements {
            record.push_child(placement);
        }
        record
    }
}

/// `A/B/Wert` -> `A`
fn first_step(path: &str) -> &str {
    path.split('/').next().unwrap_or(path)
}

/// `A/B/Wert` -> `B`
fn last_step(path: &str) -> &str {
    let mut steps = path.rsplit('/');
    steps.next();
    steps.next().unwrap_or(path)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn signal() -> Record {
        Record::point_object(
            "Signal",
            "S1",
            vec![Record::placement("E1", "50.000", Some("in"))],
        )
        .with_child(Record::new("Signal_Real").with_child(Record::wert("Signalsystem", "Ks")))
    }

    #[test]
    fn field_paths_resolve_first_match() {
        let record = signal();
        assert_eq!(record.identity(), Some("S1"));
        assert_eq!(record.value("Signal_Real/Signalsystem/Wert"), Some("Ks"));
        assert_eq!(record.value("Punkt_Objekt_TOP_Kante/Abstand/Wert"), Some("50.000"));
        assert_eq!(record.value("Signal_Real/Missing/Wert"), None);
    }

    #[test]
    fn empty_path_is_the_record() {
        let record = signal();
        assert_eq!(record.field("").map(Record::label), Some("Signal"));
    }

    #[test]
    fn field_without_text_reads_empty() {
        let record = Record::new("X").with_child(Record::new("Flag"));
        assert_eq!(record.value("Flag"), Some(""));
    }

    #[test]
    fn edge_builder_matches_field_paths() {
        let edge = Record::top_edge("E1", "K1", "K2", "Ende", "Verbindung", "310.000");
        assert!(edge.is_edge());
        assert!(!edge.is_point_object());
        assert_eq!(edge.value(NODE_A_PATH), Some("K1"));
        assert_eq!(edge.value(NODE_B_PATH), Some("K2"));
        assert_eq!(edge.value(ROLE_B_PATH), Some("Verbindung"));
        assert_eq!(edge.value(LENGTH_PATH), Some("310.000"));
    }

    #[test]
    fn children_keep_document_order() {
        let record = Record::point_object(
            "Datenpunkt",
            "B1",
            vec![
                Record::placement("E1", "310", Some("in")),
                Record::placement("E2", "100", Some("gegen")),
            ],
        );
        let edges: Vec<_> = record
            .children(PLACEMENT_LABEL)
            .filter_map(|p| p.value(PLACEMENT_EDGE_PATH))
            .collect();
        assert_eq!(edges, vec!["E1", "E2"]);
        assert!(record.is_point_object());
    }

    #[test]
    fn split_text_is_appended() {
        let mut record = Record::new("Wert");
        record.append_text("12");
        record.append_text(".5");
        assert_eq!(record.text(), Some("12.5"));
    }
}

//! Session-scoped evidence list.
//!
//! Holds the seed items of the demo case plus anything ingested during the
//! session. Newest ingested items come first. IDs are unique per dossier.

use chrono::Local;
use serde::Serialize;
use std::collections::HashSet;

use crate::evidence::EvidenceError;
use crate::types::{EvidenceItem, EvidenceType};

/// Risk score given to ingested items until a caller assigns one.
pub const DEFAULT_INGEST_RISK_SCORE: u8 = 5;

/// Timestamp format used for ingested items ("2023-10-12 02:15 AM").
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M %p";

/// An ordered collection of evidence for one case session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dossier {
    items: Vec<EvidenceItem>,
}

impl Dossier {
    /// Create an empty dossier.
    pub fn new() -> Self {
        Self::default()
    }

    /// The seeded malpractice case shown in the evidence matrix.
    pub fn demo() -> Self {
        Self {
            items: vec![
                EvidenceItem::new(
                    "EV-001",
                    "Nursing Notes - Night Shift",
                    EvidenceType::MedicalRecord,
                    "2023-10-12 02:15 AM",
                    "Patient complaining of severe abdominal pain (8/10). Dr. Smith paged twice. \
                     No response. Administered 500mg Acetaminophen per standing order. \
                     Vitals: BP 90/60, HR 115.",
                    9,
                ),
                EvidenceItem::new(
                    "EV-002",
                    "Internal Email Chain",
                    EvidenceType::Email,
                    "2023-10-12 09:30 AM",
                    "Subject: RE: Incident Report. Let's keep this off the main channel until we \
                     speak with legal. The staffing ratio was definitely below protocol last night.",
                    10,
                ),
                EvidenceItem::new(
                    "EV-004",
                    "Deposition: Dr. Smith",
                    EvidenceType::Deposition,
                    "2024-02-15",
                    "Q: Did you receive the page at 2:15 AM? A: I do not recall receiving a page. \
                     My pager battery may have been dead, but I was in the break room.",
                    7,
                ),
            ],
        }
    }

    /// Ingest free text as a new item stamped with the current local time.
    pub fn ingest(
        &mut self,
        evidence_type: EvidenceType,
        content: &str,
    ) -> Result<&EvidenceItem, EvidenceError> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.ingest_at(evidence_type, content, timestamp)
    }

    /// Ingest with an explicit timestamp.
    ///
    /// Blank content is rejected. The new item gets the lowest free
    /// `EV-NNN` id, a generated title and the default risk score, and is
    /// placed at the front of the dossier.
    pub fn ingest_at(
        &mut self,
        evidence_type: EvidenceType,
        content: &str,
        timestamp: impl Into<String>,
    ) -> Result<&EvidenceItem, EvidenceError> {
        if content.trim().is_empty() {
            return Err(EvidenceError::EmptyContent);
        }

        let item = EvidenceItem::new(
            self.next_id(),
            format!("Ingested {}", evidence_type),
            evidence_type,
            timestamp,
            content,
            DEFAULT_INGEST_RISK_SCORE,
        );

        tracing::debug!(evidence_id = %item.id, evidence_type = %evidence_type, "Evidence ingested");

        self.items.insert(0, item);
        Ok(&self.items[0])
    }

    /// Append an existing item. Its id must be unused.
    pub fn insert(&mut self, item: EvidenceItem) -> Result<(), EvidenceError> {
        item.validate()?;
        if self.get(&item.id).is_some() {
            return Err(EvidenceError::DuplicateId(item.id));
        }
        self.items.push(item);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&EvidenceItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[EvidenceItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lowest `EV-NNN` id not yet taken.
    fn next_id(&self) -> String {
        let taken: HashSet<&str> = self.items.iter().map(|item| item.id.as_str()).collect();
        (1u32..)
            .map(|n| format!("EV-{:03}", n))
            .find(|id| !taken.contains(id.as_str()))
            .unwrap_or_else(|| format!("EV-{:03}", self.items.len() + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_dossier() {
        let dossier = Dossier::demo();
        assert_eq!(dossier.len(), 3);
        assert_eq!(dossier.get("EV-002").unwrap().evidence_type, EvidenceType::Email);
        assert!(dossier.items().iter().all(|item| item.validate().is_ok()));
    }

    #[test]
    fn test_ingest_fills_lowest_free_id() {
        let mut dossier = Dossier::demo();
        let item = dossier
            .ingest_at(EvidenceType::LabResult, "Lactate 4.1 mmol/L", "2024-03-01 10:00 AM")
            .unwrap();

        assert_eq!(item.id, "EV-003");
        assert_eq!(item.title, "Ingested Lab Result");
        assert_eq!(item.risk_score, DEFAULT_INGEST_RISK_SCORE);

        let next = dossier.ingest_at(EvidenceType::Email, "follow-up", "t").unwrap();
        assert_eq!(next.id, "EV-005");
    }

    #[test]
    fn test_ingest_prepends() {
        let mut dossier = Dossier::demo();
        dossier.ingest(EvidenceType::Deposition, "A: I can't recall.").unwrap();
        assert_eq!(dossier.items()[0].evidence_type, EvidenceType::Deposition);
        assert_eq!(dossier.len(), 4);
    }

    #[test]
    fn test_ingest_rejects_blank_content() {
        let mut dossier = Dossier::new();
        let result = dossier.ingest(EvidenceType::Email, "   \n\t");
        assert!(matches!(result, Err(EvidenceError::EmptyContent)));
        assert!(dossier.is_empty());
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut dossier = Dossier::demo();
        let duplicate = dossier.get("EV-001").unwrap().clone();
        assert!(matches!(
            dossier.insert(duplicate),
            Err(EvidenceError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_ingested_ids_are_unique() {
        let mut dossier = Dossier::new();
        for i in 0..20 {
            dossier
                .ingest_at(EvidenceType::MedicalRecord, &format!("note {}", i), "t")
                .unwrap();
        }
        let ids: HashSet<&str> = dossier.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), 20);
    }
}

//! History service - ledger queries and CSV export

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use crate::domain::LedgerEntry;
use crate::ports::WalletStore;

/// Default number of entries shown
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// History service for the transaction ledger
pub struct HistoryService {
    store: Arc<dyn WalletStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self { store }
    }

    /// Most recent ledger entries, newest first
    pub fn recent(&self, user_id: Uuid, limit: usize) -> Result<Vec<LedgerEntry>> {
        Ok(self.store.get_entries(user_id, limit)?)
    }

    /// Write recent entries as CSV, returning the number of rows written
    pub fn export_csv<W: Write>(&self, user_id: Uuid, limit: usize, writer: W) -> Result<usize> {
        let entries = self.recent(user_id, limit)?;

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "id",
            "type",
            "currency",
            "amount",
            "from_currency",
            "to_currency",
            "status",
            "created_at",
        ])?;

        for entry in &entries {
            csv_writer.write_record([
                entry.id.to_string(),
                entry.kind.as_str().to_string(),
                entry.currency.to_string(),
                entry.amount.to_string(),
                entry
                    .from_currency
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
                entry.to_currency.map(|c| c.to_string()).unwrap_or_default(),
                entry.status.as_str().to_string(),
                entry.created_at.to_rfc3339(),
            ])?;
        }
        csv_writer.flush()?;

        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::{Currency, EntryKind, NewLedgerEntry};
    use crate::ports::WalletStore;
    use rust_decimal::Decimal;

    fn setup_with_entries(count: i64) -> (HistoryService, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let user_id = Uuid::new_v4();
        for i in 1..=count {
            store
                .append_entry(&NewLedgerEntry::new(
                    user_id,
                    EntryKind::Deposit,
                    Currency::Usdt,
                    Decimal::new(i, 0),
                ))
                .unwrap();
        }
        let service = HistoryService::new(store as Arc<dyn WalletStore>);
        (service, user_id)
    }

    #[test]
    fn test_recent_respects_limit() {
        let (service, user_id) = setup_with_entries(15);
        let entries = service.recent(user_id, DEFAULT_HISTORY_LIMIT).unwrap();
        assert_eq!(entries.len(), DEFAULT_HISTORY_LIMIT);
        // Newest first
        assert_eq!(entries[0].amount, Decimal::new(15, 0));
    }

    #[test]
    fn test_export_csv_shape() {
        let (service, user_id) = setup_with_entries(3);

        let mut buffer = Vec::new();
        let rows = service.export_csv(user_id, 10, &mut buffer).unwrap();
        assert_eq!(rows, 3);

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,type,currency,amount,from_currency,to_currency,status,created_at"
        );
        // Header plus one line per entry
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("deposit"));
        assert!(text.contains("USDT"));
    }

    #[test]
    fn test_export_csv_empty_history() {
        let (service, _) = setup_with_entries(0);
        let mut buffer = Vec::new();
        let rows = service.export_csv(Uuid::new_v4(), 10, &mut buffer).unwrap();
        assert_eq!(rows, 0);
        // Header only
        assert_eq!(String::from_utf8(buffer).unwrap().lines().count(), 1);
    }
}

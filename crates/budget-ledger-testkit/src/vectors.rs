//! Golden test vectors for the storage encoding.
//!
//! Counter vectors pin the 8-byte little-endian layout. Record vectors are
//! values as written by the earlier bot, which serialized timestamps with
//! the host's local offset; they must keep decoding unchanged.

use budget_ledger_core::{
    decode_counter, decode_transaction, encode_counter, parse_transaction_key, Transaction,
    TransactionId, TransactionType, UserId,
};
use chrono::{DateTime, Utc};

/// A golden counter encoding.
#[derive(Debug, Clone)]
pub struct CounterVector {
    pub value: u64,
    /// Expected encoding (hex).
    pub hex: &'static str,
}

/// Get all counter vectors.
pub fn counter_vectors() -> Vec<CounterVector> {
    vec![
        CounterVector {
            value: 0,
            hex: "0000000000000000",
        },
        CounterVector {
            value: 1,
            hex: "0100000000000000",
        },
        CounterVector {
            value: 258,
            hex: "0201000000000000",
        },
        CounterVector {
            value: 1_000_000,
            hex: "40420f0000000000",
        },
        CounterVector {
            value: u64::MAX,
            hex: "ffffffffffffffff",
        },
    ]
}

/// A stored transaction record and the values it must decode to.
#[derive(Debug, Clone)]
pub struct RecordVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub key: &'static str,
    pub json: &'static str,
    pub id: u64,
    pub user_id: i64,
    pub kind: TransactionType,
    pub amount: f64,
    pub description: &'static str,
    /// `created_at` normalized to UTC, RFC 3339.
    pub created_at_utc: &'static str,
}

impl RecordVector {
    pub fn expected(&self) -> Option<Transaction> {
        let created_at = DateTime::parse_from_rfc3339(self.created_at_utc).ok()?;
        Some(Transaction {
            id: TransactionId(self.id),
            user_id: UserId(self.user_id),
            kind: self.kind,
            amount: self.amount,
            description: self.description.to_string(),
            created_at: created_at.with_timezone(&Utc),
        })
    }
}

/// Get all record vectors.
pub fn record_vectors() -> Vec<RecordVector> {
    vec![
        RecordVector {
            name: "income with offset timestamp",
            key: "transaction:1",
            json: r#"{"id":1,"user_id":123456789,"type":"income","amount":1000,"description":"Salary","created_at":"2024-11-02T12:30:00.123456789+03:00"}"#,
            id: 1,
            user_id: 123456789,
            kind: TransactionType::Income,
            amount: 1000.0,
            description: "Salary",
            created_at_utc: "2024-11-02T09:30:00.123456789Z",
        },
        RecordVector {
            name: "expense with fractional amount",
            key: "transaction:2",
            json: r#"{"id":2,"user_id":987654321,"type":"expense","amount":150.5,"description":"Groceries","created_at":"2024-11-03T08:00:00Z"}"#,
            id: 2,
            user_id: 987654321,
            kind: TransactionType::Expense,
            amount: 150.5,
            description: "Groceries",
            created_at_utc: "2024-11-03T08:00:00Z",
        },
        RecordVector {
            name: "reset adjustment crossing a month in UTC",
            key: "transaction:10",
            json: r#"{"id":10,"user_id":0,"type":"expense","amount":849.5,"description":"Balance reset","created_at":"2024-12-01T01:15:00+05:00"}"#,
            id: 10,
            user_id: 0,
            kind: TransactionType::Expense,
            amount: 849.5,
            description: "Balance reset",
            created_at_utc: "2024-11-30T20:15:00Z",
        },
        RecordVector {
            name: "non-ascii description",
            key: "transaction:11",
            json: r#"{"id":11,"user_id":42,"type":"expense","amount":0.3,"description":"Кофе ☕","created_at":"2025-01-31T23:59:59.999+00:00"}"#,
            id: 11,
            user_id: 42,
            kind: TransactionType::Expense,
            amount: 0.3,
            description: "Кофе ☕",
            created_at_utc: "2025-01-31T23:59:59.999Z",
        },
    ]
}

/// Check every counter vector in both directions.
///
/// Returns `(name, matches, actual_hex)` per vector.
pub fn verify_counter_vectors() -> Vec<(String, bool, String)> {
    counter_vectors()
        .iter()
        .map(|v| {
            let actual = hex::encode(encode_counter(v.value));
            let decodes = hex::decode(v.hex)
                .ok()
                .and_then(|bytes| decode_counter(&bytes).ok())
                == Some(v.value);
            (v.value.to_string(), actual == v.hex && decodes, actual)
        })
        .collect()
}

/// Check that every record vector decodes to its expected transaction.
pub fn verify_record_vectors() -> Vec<(String, bool)> {
    record_vectors()
        .iter()
        .map(|v| {
            let key_ok = parse_transaction_key(v.key.as_bytes()).ok() == Some(TransactionId(v.id));
            let decoded = decode_transaction(v.json.as_bytes()).ok();
            let matches = key_ok && decoded.is_some() && decoded == v.expected();
            (v.name.to_string(), matches)
        })
        .collect()
}

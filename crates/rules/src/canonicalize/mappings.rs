//! Per-category indicator lists and canonical-field alias tables.
//!
//! Alias order is first-match-wins: the earliest alias present in the source
//! frame binds the canonical field, and later aliases are ignored even when
//! they are also present.

use super::kind::FileKind;

/// Primary column-name indicators, each worth 2 detection points when any
/// source column contains the substring.
pub(super) fn indicators(kind: FileKind) -> &'static [&'static str] {
    match kind {
        FileKind::Inventory => &[
            "item_code",
            "movement_id",
            "quantity",
            "item_name",
            "movement_type",
        ],
        FileKind::Financial => &[
            "transaction_id",
            "payment_method",
            "amount",
            "merchant",
            "currency",
        ],
        FileKind::SecurityLogs => &["log_id", "event_id", "user_agent", "source_ip", "action"],
    }
}

/// Secondary heuristic indicators, worth a single detection point when any
/// source column contains any of the substrings.
pub(super) fn heuristics(kind: FileKind) -> &'static [&'static str] {
    match kind {
        FileKind::Inventory => &["out"],
        FileKind::Financial => &["card", "payment"],
        FileKind::SecurityLogs => &["login", "auth"],
    }
}

/// Canonical field → ordered acceptable source-column aliases.
pub(super) fn alias_table(kind: FileKind) -> &'static [(&'static str, &'static [&'static str])] {
    match kind {
        FileKind::Inventory => &[
            ("id", &["movement_id", "transaction_id", "id"]),
            ("timestamp", &["date", "time", "datetime", "timestamp"]),
            ("amount", &["total_value", "value", "cost", "amount", "price"]),
            ("merchant", &["item_name", "product", "item_code", "merchant"]),
            ("location", &["location", "warehouse", "store"]),
            ("user_id", &["employee_id", "user", "staff_id", "user_id"]),
            ("quantity", &["quantity", "qty", "count"]),
        ],
        FileKind::Financial => &[
            ("id", &["transaction_id", "id", "txn_id"]),
            ("timestamp", &["timestamp", "date", "created_at", "time"]),
            ("amount", &["amount", "value", "total", "sum"]),
            ("merchant", &["merchant", "store", "vendor", "business"]),
            ("location", &["location", "address", "city", "country"]),
            (
                "user_id",
                &["user_id", "customer_id", "account_id", "client_id"],
            ),
            (
                "payment_method",
                &["payment_method", "method", "type", "card_type"],
            ),
            ("ip_address", &["ip_address", "ip", "client_ip"]),
            (
                "device_info",
                &["device_info", "device", "user_agent", "browser"],
            ),
        ],
        FileKind::SecurityLogs => &[
            ("id", &["log_id", "event_id", "id"]),
            ("timestamp", &["timestamp", "time", "datetime", "created_at"]),
            ("user_id", &["user_id", "username", "user", "account"]),
            ("ip_address", &["ip_address", "ip", "source_ip"]),
            ("device_info", &["user_agent", "device", "browser", "os"]),
            ("location", &["location", "country", "city", "region"]),
        ],
    }
}

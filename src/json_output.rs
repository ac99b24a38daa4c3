//! JSON output format for per-CPU tables

use serde::{Deserialize, Serialize};

use crate::table::CpuCountTable;

/// One per-CPU count row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCpuCount {
    pub cpu: usize,
    pub count: u64,
}

/// Rows of a count table, one per CPU in index order.
pub fn rows(table: &CpuCountTable) -> Vec<JsonCpuCount> {
    table
        .iter()
        .map(|(cpu, count)| JsonCpuCount { cpu, count })
        .collect()
}

/// Serialize a count table as a JSON array of `{cpu, count}` rows.
pub fn to_json(table: &CpuCountTable) -> serde_json::Result<String> {
    serde_json::to_string(&rows(table))
}

/// Pretty-printed variant of [`to_json`].
pub fn to_json_pretty(table: &CpuCountTable) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&rows(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_rows_in_cpu_order() {
        let mut table = CpuCountTable::zeroed(2);
        table.increment(1);
        let rows = rows(&table);
        assert_eq!(
            rows,
            vec![
                JsonCpuCount { cpu: 0, count: 0 },
                JsonCpuCount { cpu: 1, count: 1 },
            ]
        );
    }

    #[test]
    fn test_json_serialization() {
        let mut table = CpuCountTable::zeroed(2);
        table.increment(0);
        let json = to_json(&table).unwrap();
        assert_eq!(json, r#"[{"cpu":0,"count":1},{"cpu":1,"count":0}]"#);
    }

    #[test]
    fn test_json_empty_table() {
        let table = CpuCountTable::zeroed(0);
        assert_eq!(to_json(&table).unwrap(), "[]");
    }

    #[test]
    fn test_json_round_trip() {
        let mut table = CpuCountTable::zeroed(3);
        table.increment(2);
        let json = to_json_pretty(&table).unwrap();
        let back: Vec<JsonCpuCount> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rows(&table));
    }
}

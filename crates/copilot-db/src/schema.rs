//! Schema introspection rendered as prompt context.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub table: String,
    pub column: String,
    pub data_type: String,
}

/// Renders one line per table: `table(column type, column type, …)`.
/// An empty `include` list keeps every table.
pub fn render_schema(columns: &[ColumnInfo], include: &[String]) -> String {
    let mut tables: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for c in columns {
        if !include.is_empty() && !include.iter().any(|t| t == &c.table) {
            continue;
        }
        tables
            .entry(c.table.as_str())
            .or_default()
            .push(format!("{} {}", c.column, c.data_type));
    }

    tables
        .into_iter()
        .map(|(table, cols)| format!("{}({})", table, cols.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(table: &str, column: &str, data_type: &str) -> ColumnInfo {
        ColumnInfo { table: table.into(), column: column.into(), data_type: data_type.into() }
    }

    #[test]
    fn test_render_groups_by_table() {
        let cols = vec![
            col("VariantMetadata", "hgvs", "text"),
            col("VariantMetadata", "rsid", "text"),
            col("genes", "symbol", "text"),
        ];
        let out = render_schema(&cols, &[]);
        assert_eq!(out, "VariantMetadata(hgvs text, rsid text)\ngenes(symbol text)");
    }

    #[test]
    fn test_render_respects_include_list() {
        let cols = vec![col("VariantMetadata", "hgvs", "text"), col("audit", "who", "text")];
        let out = render_schema(&cols, &["VariantMetadata".to_string()]);
        assert_eq!(out, "VariantMetadata(hgvs text)");
    }
}

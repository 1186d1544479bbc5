//! Catalog output formatting.

use rule_engine_rs::catalog::{Catalog, ValueKind};
use serde::Serialize;

use super::helpers::format_header;

/// JSON output structure for a catalog attribute.
#[derive(Serialize)]
pub struct AttributeOutput<'a> {
    pub name: &'a str,
    pub kind: ValueKind,
    pub operators: &'static [&'static str],
}

/// JSON output structure for the catalog command.
#[derive(Serialize)]
pub struct CatalogOutput<'a> {
    pub attributes: Vec<AttributeOutput<'a>>,
}

/// Comparators accepted for an attribute kind.
fn operators_for(kind: ValueKind) -> &'static [&'static str] {
    match kind {
        ValueKind::Numeric => &[">", "<", "=", ">=", "<=", "!="],
        ValueKind::Text => &["=", "!="],
    }
}

/// Formats the catalog as JSON.
pub fn format_catalog_json(catalog: &Catalog) -> Result<String, serde_json::Error> {
    let attributes = catalog
        .iter()
        .map(|(name, kind)| AttributeOutput {
            name,
            kind,
            operators: operators_for(kind),
        })
        .collect();

    serde_json::to_string_pretty(&CatalogOutput { attributes })
}

/// Formats the catalog as a table.
pub fn format_catalog_table(catalog: &Catalog, use_colors: bool) -> String {
    if catalog.is_empty() {
        return "No attributes defined.\n".to_string();
    }

    let mut output = format_header(
        &format!("{:<20} {:<8} {}", "Attribute", "Kind", "Operators"),
        use_colors,
    );

    for (name, kind) in catalog.iter() {
        let line = format!(
            "{:<20} {:<8} {}",
            name,
            kind.to_string(),
            operators_for(kind).join(" ")
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_catalog_json() {
        let output = format_catalog_json(&Catalog::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        let attributes = json["attributes"].as_array().unwrap();
        assert_eq!(attributes.len(), 4);
        assert_eq!(attributes[0]["name"], "age");
        assert_eq!(attributes[0]["kind"], "numeric");
        assert_eq!(attributes[1]["name"], "department");
        assert_eq!(attributes[1]["operators"], serde_json::json!(["=", "!="]));
    }

    #[test]
    fn test_format_catalog_table() {
        let output = format_catalog_table(&Catalog::default(), false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Attribute"));
        assert!(lines[2].starts_with("department"));
        assert!(lines[2].contains("text"));
        assert!(lines[2].ends_with("= !="));
    }

    #[test]
    fn test_format_empty_catalog_table() {
        assert_eq!(format_catalog_table(&Catalog::empty(), false), "No attributes defined.\n");
    }
}

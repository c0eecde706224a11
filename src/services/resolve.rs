// SPDX-License-Identifier: MIT

//! Name resolution and field normalization for Tecopos payloads.
//!
//! The remote API is not strictly typed, so each logical attribute is read
//! through an ordered list of accepted field names. Resolution of a declared
//! display name against a candidate list follows one policy everywhere:
//! exact case-insensitive match, else the single-candidate fallback, else
//! failure carrying the available names.

use crate::models::sale::SaleLineItem;
use serde_json::Value;

// Ordered field-name aliases, tried left to right.
pub const BUSINESS_ID_ALIASES: &[&str] = &["id", "businessId", "business_id"];
pub const BUSINESS_NAME_ALIASES: &[&str] = &["name", "businessName", "business_name"];
pub const SUPPLIER_ID_ALIASES: &[&str] = &["id", "supplierId", "providerId"];
pub const SUPPLIER_NAME_ALIASES: &[&str] = &["name", "fullName", "displayName"];
pub const LINE_SUPPLIER_ID_ALIASES: &[&str] = &["supplierId", "providerId", "supplier_id"];
pub const LINE_SUPPLIER_NAME_ALIASES: &[&str] = &["supplierName", "providerName", "supplier"];
pub const PRODUCT_ID_ALIASES: &[&str] = &["productId", "id", "product_id"];
pub const PRODUCT_NAME_ALIASES: &[&str] = &["name", "productName", "product_name"];
pub const QUANTITY_ALIASES: &[&str] = &["quantitySales", "quantity", "salesQuantity"];
// Main-currency amount takes precedence when a line carries both.
pub const AMOUNT_ALIASES: &[&str] = &["totalSalesMainCurrency", "totalSales", "amount"];
pub const STOCK_ALIASES: &[&str] = &["totalQuantity", "stock", "stockQuantity"];
pub const CURRENCY_ALIASES: &[&str] = &["currency", "currencyCode"];

/// Cap on candidate names echoed back in resolution errors.
pub const MAX_CANDIDATE_NAMES: usize = 8;

/// First present alias as a string. Numbers are stringified, since remote
/// ids arrive as either.
pub fn string_field(record: &Value, aliases: &[&str]) -> Option<String> {
    for alias in aliases {
        match record.get(alias) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => continue,
        }
    }
    None
}

/// First present alias coerced to a number, with a zero default on parse
/// failure. A malformed field on one line must never fail a whole report.
pub fn numeric_field(record: &Value, aliases: &[&str]) -> f64 {
    for alias in aliases {
        match record.get(alias) {
            Some(Value::Number(n)) => return n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => return s.trim().parse().unwrap_or(0.0),
            _ => continue,
        }
    }
    0.0
}

/// Canonical form for name comparison: trimmed and case-folded.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Round to 2 decimal places for response totals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Display names of the candidates, truncated for error reporting.
pub fn candidate_names(candidates: &[Value], name_aliases: &[&str]) -> Vec<String> {
    candidates
        .iter()
        .filter_map(|candidate| string_field(candidate, name_aliases))
        .take(MAX_CANDIDATE_NAMES)
        .collect()
}

/// Resolve a declared display name against candidate records.
///
/// Exactly one exact (case-insensitive, whitespace-insensitive) match wins.
/// Failing that, an account with exactly one candidate total gets that
/// candidate regardless of the declared name — the documented single-tenant
/// fallback. Anything else is an error carrying the available names.
pub fn resolve_unique<'a>(
    declared: &str,
    candidates: &'a [Value],
    name_aliases: &[&str],
) -> Result<&'a Value, Vec<String>> {
    let wanted = normalize_name(declared);

    let matches: Vec<&Value> = candidates
        .iter()
        .filter(|candidate| {
            string_field(candidate, name_aliases)
                .map(|name| normalize_name(&name) == wanted)
                .unwrap_or(false)
        })
        .collect();

    match (matches.as_slice(), candidates) {
        ([only], _) => Ok(only),
        (_, [only]) => Ok(only),
        _ => Err(candidate_names(candidates, name_aliases)),
    }
}

/// Whether a report line belongs to the linked supplier. With a resolved
/// remote supplier id the id field decides; otherwise fall back to an exact
/// case-insensitive name comparison.
pub fn line_belongs_to_supplier(
    line: &Value,
    supplier_id: Option<&str>,
    fallback_name: &str,
) -> bool {
    if let Some(id) = supplier_id {
        return string_field(line, LINE_SUPPLIER_ID_ALIASES)
            .map(|line_id| line_id == id)
            .unwrap_or(false);
    }

    string_field(line, LINE_SUPPLIER_NAME_ALIASES)
        .map(|name| normalize_name(&name) == normalize_name(fallback_name))
        .unwrap_or(false)
}

/// Normalize one matched report line into the response shape.
pub fn normalize_line(line: &Value) -> SaleLineItem {
    SaleLineItem {
        product_id: string_field(line, PRODUCT_ID_ALIASES),
        product_name: string_field(line, PRODUCT_NAME_ALIASES).unwrap_or_default(),
        quantity: numeric_field(line, QUANTITY_ALIASES),
        amount: numeric_field(line, AMOUNT_ALIASES),
        currency: string_field(line, CURRENCY_ALIASES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_exact_match() {
        let candidates = vec![
            json!({"id": "1", "name": "Acme"}),
            json!({"id": "2", "name": "Acme West"}),
        ];

        let resolved = resolve_unique("acme west", &candidates, BUSINESS_NAME_ALIASES).unwrap();
        assert_eq!(resolved["id"], "2");
    }

    #[test]
    fn test_resolve_ignores_case_and_whitespace() {
        let candidates = vec![
            json!({"id": "1", "name": "Acme"}),
            json!({"id": "2", "name": "Acme West"}),
        ];

        let a = resolve_unique("  ACME  ", &candidates, BUSINESS_NAME_ALIASES).unwrap();
        let b = resolve_unique("acme", &candidates, BUSINESS_NAME_ALIASES).unwrap();
        assert_eq!(a, b);
        assert_eq!(a["id"], "1");
    }

    #[test]
    fn test_resolve_single_candidate_fallback() {
        // One business total: any declared name resolves to it.
        let candidates = vec![json!({"id": "42", "name": "Acme Corp"})];

        let resolved = resolve_unique("Totally Different", &candidates, BUSINESS_NAME_ALIASES)
            .unwrap();
        assert_eq!(resolved["id"], "42");
    }

    #[test]
    fn test_resolve_ambiguous_reports_candidates() {
        let candidates = vec![
            json!({"id": "1", "name": "Acme"}),
            json!({"id": "2", "name": "Acme West"}),
        ];

        let err = resolve_unique("Acme Corp", &candidates, BUSINESS_NAME_ALIASES).unwrap_err();
        assert_eq!(err, vec!["Acme".to_string(), "Acme West".to_string()]);
    }

    #[test]
    fn test_resolve_duplicate_exact_matches_fail() {
        let candidates = vec![
            json!({"id": "1", "name": "Acme"}),
            json!({"id": "2", "name": "ACME"}),
        ];

        assert!(resolve_unique("acme", &candidates, BUSINESS_NAME_ALIASES).is_err());
    }

    #[test]
    fn test_candidate_names_truncated() {
        let candidates: Vec<Value> = (0..20)
            .map(|i| json!({"name": format!("Business {}", i)}))
            .collect();

        assert_eq!(
            candidate_names(&candidates, BUSINESS_NAME_ALIASES).len(),
            MAX_CANDIDATE_NAMES
        );
    }

    #[test]
    fn test_string_field_alias_order_and_numbers() {
        let record = json!({"businessId": 7});
        assert_eq!(string_field(&record, BUSINESS_ID_ALIASES), Some("7".to_string()));

        let record = json!({"id": "9", "businessId": "ignored"});
        assert_eq!(string_field(&record, BUSINESS_ID_ALIASES), Some("9".to_string()));
    }

    #[test]
    fn test_numeric_field_zero_default() {
        assert_eq!(numeric_field(&json!({"quantitySales": "abc"}), QUANTITY_ALIASES), 0.0);
        assert_eq!(numeric_field(&json!({}), QUANTITY_ALIASES), 0.0);
        assert_eq!(numeric_field(&json!({"quantitySales": "10"}), QUANTITY_ALIASES), 10.0);
        assert_eq!(numeric_field(&json!({"quantity": 2.5}), QUANTITY_ALIASES), 2.5);
    }

    #[test]
    fn test_amount_prefers_main_currency() {
        // Lines carrying both amounts must use the main-currency figure.
        let line = json!({"totalSalesMainCurrency": 87500.0, "totalSales": 350.0});
        assert_eq!(numeric_field(&line, AMOUNT_ALIASES), 87500.0);

        let fallback = json!({"totalSales": "350"});
        assert_eq!(numeric_field(&fallback, AMOUNT_ALIASES), 350.0);
    }

    #[test]
    fn test_line_membership_by_id_and_name() {
        let line = json!({"supplierId": "42", "supplierName": "Juan Pérez"});

        assert!(line_belongs_to_supplier(&line, Some("42"), "whoever"));
        assert!(!line_belongs_to_supplier(&line, Some("43"), "whoever"));

        // Without a resolved id the display name decides.
        assert!(line_belongs_to_supplier(&line, None, "juan pérez"));
        assert!(!line_belongs_to_supplier(&line, None, "someone else"));

        // Line without any supplier id never matches an id-linked user.
        let anonymous = json!({"name": "Aceite Mini"});
        assert!(!line_belongs_to_supplier(&anonymous, Some("42"), "whoever"));
    }
}

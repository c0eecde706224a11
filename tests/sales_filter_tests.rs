// SPDX-License-Identifier: MIT

//! Report filtering and aggregation over realistic Tecopos payloads.

use serde_json::{json, Value};
use supplier_portal::services::resolve::{
    line_belongs_to_supplier, normalize_line, round2, AMOUNT_ALIASES, QUANTITY_ALIASES,
};
use supplier_portal::services::tecopos::flatten_records;

mod common;

/// A sold-products payload as the platform actually returns it: wrapped in a
/// `products` key, lines from several suppliers, stringly-typed numbers.
fn sample_report() -> Vec<Value> {
    flatten_records(json!({
        "products": [
            {"supplierId": "42", "productId": "p1", "name": "Aceite Mini",
             "quantitySales": "10", "totalSales": "100.5", "totalQuantity": "34"},
            {"supplierId": "42", "productId": "p2", "name": "Harina 1kg",
             "quantitySales": 3, "totalSales": 45.25, "totalQuantity": 12},
            {"supplierId": "7", "productId": "p3", "name": "Café Molido",
             "quantitySales": "99", "totalSales": "999"},
            {"productId": "p4", "name": "Sin Proveedor",
             "quantitySales": "5", "totalSales": "50"}
        ],
        "total": 4
    }))
}

#[test]
fn test_only_linked_supplier_lines_survive() {
    let report = sample_report();

    let matched: Vec<&Value> = report
        .iter()
        .filter(|line| line_belongs_to_supplier(line, Some("42"), "unused"))
        .collect();

    assert_eq!(matched.len(), 2);
    assert!(matched.iter().all(|line| line["supplierId"] == "42"));
}

#[test]
fn test_string_typed_numbers_aggregate() {
    let report = sample_report();

    let items: Vec<_> = report
        .iter()
        .filter(|line| line_belongs_to_supplier(line, Some("42"), "unused"))
        .map(normalize_line)
        .collect();

    let total_quantity = round2(items.iter().map(|item| item.quantity).sum());
    let total_amount = round2(items.iter().map(|item| item.amount).sum());

    assert_eq!(total_quantity, 13.0);
    assert_eq!(total_amount, 145.75);

    assert_eq!(items[0].product_name, "Aceite Mini");
    assert_eq!(items[0].quantity, 10.0);
    assert_eq!(items[0].amount, 100.5);
}

#[test]
fn test_main_currency_amount_wins_over_fallback() {
    // Real payloads often carry both figures; the main-currency one is the
    // authoritative amount, totalSales is only its fallback.
    let report = flatten_records(json!([
        {"supplierId": "42", "productId": "p1",
         "quantitySales": 2, "totalSalesMainCurrency": 87500.0, "totalSales": 350.0},
        {"supplierId": "42", "productId": "p2",
         "quantitySales": 1, "totalSales": 45.25}
    ]));

    let items: Vec<_> = report.iter().map(normalize_line).collect();
    assert_eq!(items[0].amount, 87500.0);
    assert_eq!(items[1].amount, 45.25);
    assert_eq!(round2(items.iter().map(|i| i.amount).sum()), 87545.25);
}

#[test]
fn test_name_fallback_when_unlinked_supplier_identity() {
    let report = flatten_records(json!([
        {"supplierName": "Juan Pérez", "quantitySales": 1, "totalSales": 10},
        {"supplierName": "Otra Persona", "quantitySales": 2, "totalSales": 20}
    ]));

    let matched: Vec<&Value> = report
        .iter()
        .filter(|line| line_belongs_to_supplier(line, None, "  JUAN PÉREZ "))
        .collect();

    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0]["totalSales"], 10);
}

#[test]
fn test_malformed_numeric_becomes_zero_not_failure() {
    let line = json!({"supplierId": "42", "quantitySales": "n/a", "totalSales": "12.345"});

    let item = normalize_line(&line);
    assert_eq!(item.quantity, 0.0);
    assert_eq!(item.amount, 12.345);
    assert_eq!(round2(item.amount), 12.35);
}

#[test]
fn test_empty_report_yields_zero_totals() {
    let report = flatten_records(json!({"products": [], "total": 0}));

    let items: Vec<_> = report
        .iter()
        .filter(|line| line_belongs_to_supplier(line, Some("42"), "unused"))
        .map(normalize_line)
        .collect();

    assert!(items.is_empty());
    assert_eq!(round2(items.iter().map(|i| i.quantity).sum()), 0.0);
}

#[test]
fn test_rounding_of_accumulated_floats() {
    // Three lines whose float sum drifts past two decimals.
    let report: Vec<Value> = (0..3)
        .map(|i| json!({"supplierId": "42", "productId": format!("p{i}"),
                        "quantitySales": 0.1, "totalSales": 33.333}))
        .collect();

    let items: Vec<_> = report.iter().map(normalize_line).collect();
    assert_eq!(round2(items.iter().map(|i| i.quantity).sum()), 0.3);
    assert_eq!(round2(items.iter().map(|i| i.amount).sum()), 100.0);

    // The alias tables used above are the ones the normalizer reads.
    assert!(QUANTITY_ALIASES.contains(&"quantitySales"));
    assert!(AMOUNT_ALIASES.contains(&"totalSales"));
}

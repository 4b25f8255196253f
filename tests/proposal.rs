//! Integration tests for veliz-proposals.
//!
//! These drive the public API the way the host application does: wizard
//! forms and catalogs arrive as JSON, generated documents as markdown text.
//! No I/O or network access is needed.

use serde_json::json;
use veliz_proposals::content::paginate_scope_table;
use veliz_proposals::pricing::calculate_breakdown;
use veliz_proposals::{
    amortize_addon, build_layout, calculate, lookup_by_title, paginate_rows, parse_scope_table,
    recover_embedded_addons, split_into_sections, summarize_monthly, total_monthly, AddonCatalog,
    AddonCatalogEntry, AddonFrequency, BasePricing, LayoutConfig, PricingInput, ProposalError,
    RateTable, ServiceFrequency, ServiceType,
};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn assert_close(actual: f64, expected: f64, context: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "[{context}] expected {expected}, got {actual}"
    );
}

fn form(value: serde_json::Value) -> PricingInput {
    serde_json::from_value(value).expect("valid pricing form")
}

fn catalog() -> AddonCatalog {
    let entries: Vec<AddonCatalogEntry> = serde_json::from_value(json!([
        {
            "sku": "WIN-INT",
            "label": "Interior window washing",
            "unit_type": "visit",
            "rate": 300.0,
            "min_qty": 1,
            "default_frequency": "quarterly",
            "frequency_options": ["one_time", "quarterly", "annual"],
            "amortize_to_monthly": true
        },
        {
            "sku": "CARPET-EXT",
            "label": "Carpet extraction",
            "unit_type": "sqft",
            "rate": 0.25,
            "min_qty": 500,
            "default_frequency": "one_time",
            "frequency_options": ["one_time", "annual"],
            "amortize_to_monthly": true
        },
        {
            "sku": "PORTER",
            "label": "Day porter",
            "unit_type": "hour",
            "rate": 28.0,
            "default_frequency": "monthly",
            "frequency_options": ["monthly"],
            "amortize_to_monthly": true,
            "active": false
        }
    ]))
    .expect("valid catalog json");
    AddonCatalog::new(entries).expect("valid catalog")
}

// ── Pricing ──────────────────────────────────────────────────────────────────

#[test]
fn window_form_prices_per_window() {
    let input = form(json!({
        "service_type": "window",
        "facility_size": 2400,
        "service_frequency": "monthly",
        "service_specific_data": {"window_count": 50, "stories": 2}
    }));
    let breakdown = calculate_breakdown(&input, &RateTable::default()).unwrap();
    assert_close(breakdown.base_price, 400.0, "base");
    assert_eq!(breakdown.labor_hours, 5);

    // 400 × 0.9 = 360, + 5h × 25 + 15% + 20% of 360
    assert_close(breakdown.total, 611.0, "total");

    let result = calculate(&input, &RateTable::default()).unwrap();
    assert_eq!(result.hours_estimate.min, 5);
    assert_eq!(result.hours_estimate.max, 8);
    assert_close(result.assumptions.production_rate.max, 10.0, "windows/hour");
    assert_close(result.assumptions.production_rate.min, 6.67, "windows/hour min");
}

#[test]
fn commercial_form_prices_per_square_foot() {
    let input = PricingInput::new(ServiceType::Commercial)
        .facility_size(5000.0)
        .frequency(ServiceFrequency::OneTime)
        .detail("facility_type", "office");
    let breakdown = calculate_breakdown(&input, &RateTable::default()).unwrap();
    assert_close(breakdown.base_price, 600.0, "base");
    assert_eq!(breakdown.labor_hours, 5);

    let result = calculate(&input, &RateTable::default()).unwrap();
    assert_eq!(result.price_range.low, breakdown.total * 0.9);
    assert_eq!(result.price_range.high, breakdown.total * 1.1);
    assert!(result.price_range.low <= result.price_range.high);
    assert_close(result.assumptions.production_rate.max, 1000.0, "sqft/hour");
}

#[test]
fn calculation_is_repeatable() {
    let input = PricingInput::new(ServiceType::Carpet)
        .facility_size(1234.5)
        .frequency(ServiceFrequency::BiWeekly)
        .detail("rooms", 7);
    let rates = RateTable::default();
    let first = calculate(&input, &rates).unwrap();
    let second = calculate(&input, &rates).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn first_failing_check_is_reported() {
    let input = form(json!({"service_type": "commercial", "facility_size": 0}));
    assert_eq!(
        calculate(&input, &RateTable::default()),
        Err(ProposalError::FacilitySizeRequired)
    );

    let input = form(json!({"service_type": "commercial", "facility_size": 900}));
    assert_eq!(
        calculate(&input, &RateTable::default()),
        Err(ProposalError::FrequencyRequired)
    );

    let input = form(json!({
        "service_type": "commercial",
        "facility_size": 900,
        "service_frequency": "weekly",
        "service_specific_data": {}
    }));
    assert_eq!(
        calculate(&input, &RateTable::default()),
        Err(ProposalError::ServiceDetailsRequired)
    );

    let input = form(json!({
        "service_type": "window",
        "facility_size": 900,
        "service_frequency": "weekly",
        "service_specific_data": {"stories": 3}
    }));
    assert_eq!(
        calculate(&input, &RateTable::default()),
        Err(ProposalError::WindowCountRequired)
    );
}

#[test]
fn partial_rate_table_json_keeps_defaults() {
    let rates: RateTable =
        serde_json::from_value(json!({"rates": {"window": 10.0}, "labor_rate": 30})).unwrap();
    assert_close(rates.rate(ServiceType::Window), 10.0, "window rate");
    assert_close(rates.rate(ServiceType::Commercial), 0.12, "commercial rate");
    assert_close(rates.multiplier(ServiceFrequency::Weekly), 0.8, "weekly");
    assert_close(rates.overhead_percentage, 15.0, "overhead");
    assert!(rates.validate().is_ok());
}

#[test]
fn unknown_frequency_prices_at_face_value() {
    let input = form(json!({
        "service_type": "floor",
        "facility_size": 1000,
        "service_frequency": "fortnightly",
        "service_specific_data": {"floor_type": "vct"}
    }));
    assert_eq!(input.service_frequency, Some(ServiceFrequency::Other));
    let breakdown = calculate_breakdown(&input, &RateTable::default()).unwrap();
    assert_eq!(breakdown.adjusted_price, breakdown.base_price);
}

#[test]
fn blank_frequency_is_reported_as_missing() {
    let input = form(json!({
        "service_type": "commercial",
        "facility_size": 5000,
        "service_frequency": "",
        "service_specific_data": {"floors": 1}
    }));
    assert_eq!(
        calculate(&input, &RateTable::default()),
        Err(ProposalError::FrequencyRequired)
    );
}

#[test]
fn oversized_facility_is_rejected_not_saturated() {
    let input = PricingInput::new(ServiceType::Commercial)
        .facility_size(5e12)
        .frequency(ServiceFrequency::Weekly)
        .detail("floors", 1);
    let err = calculate(&input, &RateTable::default()).unwrap_err();
    assert!(matches!(err, ProposalError::FacilitySizeTooLarge { .. }));
    assert!(err.is_validation());
}

// ── Add-ons and totals ───────────────────────────────────────────────────────

#[test]
fn amortization_table() {
    assert_eq!(amortize_addon(100.0, AddonFrequency::Annual, true), Some(8.33));
    assert_eq!(amortize_addon(1000.0, AddonFrequency::Annual, true), Some(83.33));
    assert_eq!(amortize_addon(300.0, AddonFrequency::Quarterly, true), Some(100.0));
    assert_eq!(amortize_addon(100.0, AddonFrequency::OneTime, true), None);
    for f in [
        AddonFrequency::OneTime,
        AddonFrequency::Monthly,
        AddonFrequency::Quarterly,
        AddonFrequency::Annual,
    ] {
        assert_eq!(amortize_addon(450.0, f, false), None);
    }
}

#[test]
fn catalog_lines_fold_into_monthly_summary() {
    let catalog = catalog();
    let windows = catalog.line("WIN-INT", 1.0, None).unwrap();
    assert_eq!(windows.frequency, AddonFrequency::Quarterly);
    assert_eq!(windows.monthly_amount, Some(100.0));

    let carpet = catalog.line("CARPET-EXT", 1000.0, None).unwrap();
    assert_close(carpet.subtotal, 250.0, "carpet subtotal");
    assert_eq!(carpet.monthly_amount, None);

    let base = BasePricing {
        low: Some(900.0),
        high: Some(1100.0),
    };
    let lines = vec![windows, carpet];
    assert_close(total_monthly(&base, &lines), 1100.0, "total");

    let summary = summarize_monthly(&base, &lines);
    assert_close(summary.total_monthly, 1100.0, "summary total");
    assert_eq!(summary.one_time_charges.len(), 1);
    assert_eq!(summary.one_time_charges[0].sku, "CARPET-EXT");
    assert_close(summary.one_time_total, 250.0, "one-time total");
}

#[test]
fn catalog_rejections() {
    let catalog = catalog();
    assert!(matches!(
        catalog.line("NOPE", 1.0, None),
        Err(ProposalError::UnknownSku { .. })
    ));
    assert!(matches!(
        catalog.line("PORTER", 10.0, None),
        Err(ProposalError::InactiveAddon { .. })
    ));
    assert!(matches!(
        catalog.line("CARPET-EXT", 100.0, None),
        Err(ProposalError::QuantityBelowMinimum { .. })
    ));
    assert!(matches!(
        catalog.line("WIN-INT", 1.0, Some(AddonFrequency::Monthly)),
        Err(ProposalError::FrequencyNotOffered { .. })
    ));
    assert_eq!(catalog.proposal_entries().count(), 2);
}

#[test]
fn repricing_a_line_leaves_original_untouched() {
    let catalog = catalog();
    let entry = catalog.find("WIN-INT").unwrap();
    let line = entry.line(1.0, None).unwrap();
    let annual = line.with_frequency(entry, AddonFrequency::Annual).unwrap();
    assert_eq!(line.frequency, AddonFrequency::Quarterly);
    assert_eq!(annual.monthly_amount, Some(25.0));

    let doubled = line.with_quantity(entry, 2.0).unwrap();
    assert_close(doubled.subtotal, 600.0, "doubled subtotal");
    assert_close(line.subtotal, 300.0, "original subtotal");
}

#[test]
fn price_result_feeds_monthly_total() {
    let input = PricingInput::new(ServiceType::Commercial)
        .facility_size(5000.0)
        .frequency(ServiceFrequency::OneTime)
        .detail("floors", 1);
    let result = calculate(&input, &RateTable::default()).unwrap();
    let base = BasePricing::from(&result);
    let mid = (result.price_range.low + result.price_range.high) / 2.0;
    assert_eq!(total_monthly(&base, &[]), mid);
}

// ── Content splitting ────────────────────────────────────────────────────────

#[test]
fn headings_split_in_document_order() {
    let doc = "# About Our Company\nSince 2009.\n\n# Scope of Service\nNightly.";
    let sections = split_into_sections(doc);
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title.as_deref(), Some("About Our Company"));
    assert_eq!(sections[1].title.as_deref(), Some("Scope of Service"));
    assert!(lookup_by_title(&sections, &["Pricing"]).is_none());
    assert_eq!(
        lookup_by_title(&sections, &["pricing", "scope of service"])
            .unwrap()
            .id,
        "scope-of-service"
    );
}

#[test]
fn nested_addons_are_lifted_out_of_scope() {
    let doc = "# Scope of Service\nAll common areas.\nAdd-ons\n- Carpet extraction\n- Pressure washing\n# Pricing\n$1,800/month";
    let sections = split_into_sections(doc);
    let recovery = recover_embedded_addons(&sections[0]).unwrap();
    assert_eq!(recovery.extracted.id, "synthetic-addons");
    assert_eq!(
        recovery.extracted.content,
        "- Carpet extraction\n- Pressure washing"
    );
    assert_eq!(recovery.remainder.content, "All common areas.");
}

#[test]
fn pagination_boundaries() {
    let twelve: Vec<u32> = (1..=12).collect();
    assert_eq!(paginate_rows(&twelve, 12, 14), vec![twelve.clone()]);

    let thirteen: Vec<u32> = (1..=13).collect();
    assert_eq!(
        paginate_rows(&thirteen, 12, 14),
        vec![twelve, vec![13]]
    );

    let none: Vec<u32> = Vec::new();
    assert!(paginate_rows(&none, 12, 14).is_empty());
}

#[test]
fn malformed_scope_table_is_absent_not_fatal() {
    let content = "```veliz_scope_table\n{\"rows\": [{\"area\": \"Lobby\",]}\n```";
    let table = parse_scope_table(content);
    assert!(table.is_none());
    assert!(paginate_scope_table(table.as_ref(), &LayoutConfig::default()).is_empty());
}

#[test]
fn wrapped_document_lays_out_end_to_end() {
    let doc = "```markdown\r\n\
# Introduction\r\n\
Thank you for the opportunity.\r\n\
\r\n\
## Scope of Service\r\n\
```veliz_scope_table\r\n\
{\"rows\": [{\"area\": \"Lobby\", \"frequency\": \"Nightly\", \"monthlyCost\": \"$450.00\"}]}\r\n\
```\r\n\
**Optional Add-ons:**\r\n\
- Window washing\r\n\
\r\n\
## Pricing\r\n\
Monthly investment below.\r\n\
```veliz_pricing_table\r\n\
{\"rows\": [{\"item\": \"Janitorial\", \"price\": 1800}], \"summary\": {\"total\": \"$1,800.00\"}}\r\n\
```\r\n\
```";
    let layout = build_layout(doc, &LayoutConfig::default());

    assert_eq!(layout.introduction.as_ref().unwrap().id, "introduction");
    assert_eq!(
        layout.addons.as_ref().unwrap().content,
        "- Window washing"
    );
    assert_eq!(layout.scope_page_count(), 1);
    let row = &layout.scope_pages[0][0];
    assert_eq!(row.area, "Lobby");
    assert_eq!(
        row.monthly_cost.as_ref().and_then(|c| c.as_f64()),
        Some(450.0)
    );

    let pricing = layout.pricing.as_ref().unwrap();
    assert_eq!(pricing.description.as_deref(), Some("Monthly investment below."));
    let table = layout.pricing_table.as_ref().unwrap();
    assert_eq!(table.rows[0].service, "Janitorial");
    assert!(layout.notes.is_none());

    // Same text, same layout
    assert_eq!(layout, build_layout(doc, &LayoutConfig::default()));
}

use contracts::dashboards::d402_sales_dashboard::{
    AggregateRow, RollupRow, SalesDashboard, SalesSummary,
};
use std::collections::HashMap;

use super::catalog_joiner::{EnrichedRecord, ProductKey};

/// Rows kept in the brand and category rollups
pub const TOP_N: usize = 10;

/// Build every table of the dashboard
pub fn aggregate(records: &[EnrichedRecord]) -> SalesDashboard {
    let products = group_products(records);

    let mut top_brands = rollup(&products, |row| row.brand.as_str());
    top_brands.truncate(TOP_N);
    let mut top_categories = rollup(&products, |row| row.category_name.as_str());
    top_categories.truncate(TOP_N);

    let summary = SalesSummary {
        total_revenue: products.iter().map(|r| r.total_revenue).sum(),
        total_quantity: products.iter().map(|r| r.total_quantity).sum(),
        product_count: products.len(),
    };

    SalesDashboard {
        summary,
        top_brands,
        top_categories,
        products,
    }
}

/// Sum quantity and revenue per product key, descending by quantity.
/// Groups with equal quantity keep the order in which they first appeared.
pub fn group_products(records: &[EnrichedRecord]) -> Vec<AggregateRow> {
    let mut index: HashMap<&ProductKey, usize> = HashMap::new();
    let mut rows: Vec<AggregateRow> = Vec::new();

    for enriched in records {
        let i = *index.entry(&enriched.product).or_insert_with(|| {
            let key = &enriched.product;
            rows.push(AggregateRow {
                product_main_id: key.product_main_id.clone(),
                image: key.image.clone(),
                product_url: key.product_url.clone(),
                brand: key.brand.clone(),
                category_name: key.category_name.clone(),
                total_quantity: 0,
                total_revenue: 0.0,
            });
            rows.len() - 1
        });

        rows[i].total_quantity += enriched.record.quantity;
        rows[i].total_revenue += enriched.record.revenue;
    }

    // sort_by is stable
    rows.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    rows
}

/// Sum product rows by `key`, descending by quantity, untruncated
pub fn rollup(rows: &[AggregateRow], key: impl Fn(&AggregateRow) -> &str) -> Vec<RollupRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut result: Vec<RollupRow> = Vec::new();

    for row in rows {
        let name = key(row);
        let i = *index.entry(name).or_insert_with(|| {
            result.push(RollupRow {
                key: name.to_string(),
                total_quantity: 0,
                total_revenue: 0.0,
            });
            result.len() - 1
        });

        result[i].total_quantity += row.total_quantity;
        result[i].total_revenue += row.total_revenue;
    }

    result.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d402_sales_dashboard::flattener::FlatRecord;
    use chrono::TimeZone;
    use chrono_tz::Europe::Istanbul;

    fn enriched(main_id: &str, brand: &str, category: &str, quantity: i64, price: f64) -> EnrichedRecord {
        EnrichedRecord {
            record: FlatRecord {
                created_date: Istanbul.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap(),
                barcode: format!("{}-bc", main_id),
                quantity,
                price,
                revenue: price * quantity as f64,
            },
            product: ProductKey {
                product_main_id: main_id.to_string(),
                image: "img".to_string(),
                product_url: "#".to_string(),
                brand: brand.to_string(),
                category_name: category.to_string(),
            },
        }
    }

    #[test]
    fn test_groups_by_product_and_sorts_descending() {
        let records = vec![
            enriched("P1", "Koton", "Elbise", 1, 100.0),
            enriched("P2", "Mavi", "Jean", 5, 10.0),
            enriched("P1", "Koton", "Elbise", 2, 100.0),
        ];

        let rows = group_products(&records);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_main_id, "P2");
        assert_eq!(rows[0].total_quantity, 5);
        assert_eq!(rows[1].total_quantity, 3);
        assert_eq!(rows[1].total_revenue, 300.0);
    }

    #[test]
    fn test_same_main_id_with_different_brand_is_separate_group() {
        let records = vec![
            enriched("P1", "Koton", "Elbise", 1, 1.0),
            enriched("P1", "Mavi", "Elbise", 1, 1.0),
        ];
        assert_eq!(group_products(&records).len(), 2);
    }

    #[test]
    fn test_ties_keep_first_encounter_order() {
        let records = vec![
            enriched("P3", "C", "X", 2, 1.0),
            enriched("P1", "A", "X", 2, 1.0),
            enriched("P2", "B", "X", 7, 1.0),
            enriched("P4", "D", "X", 2, 1.0),
        ];

        let ids: Vec<_> = group_products(&records)
            .into_iter()
            .map(|r| r.product_main_id)
            .collect();
        assert_eq!(ids, vec!["P2", "P3", "P1", "P4"]);
    }

    #[test]
    fn test_sums_are_preserved() {
        let records: Vec<_> = (0..40)
            .map(|i| {
                enriched(
                    &format!("P{}", i % 13),
                    &format!("B{}", i % 17),
                    &format!("C{}", i % 3),
                    (i % 5) as i64,
                    1.5 + i as f64,
                )
            })
            .collect();

        let dashboard = aggregate(&records);

        let quantity: i64 = records.iter().map(|r| r.record.quantity).sum();
        let revenue: f64 = records.iter().map(|r| r.record.revenue).sum();
        assert_eq!(dashboard.summary.total_quantity, quantity);
        assert!((dashboard.summary.total_revenue - revenue).abs() < 1e-6);

        let rows_quantity: i64 = dashboard.products.iter().map(|r| r.total_quantity).sum();
        assert_eq!(rows_quantity, quantity);
        let rows_revenue: f64 = dashboard.products.iter().map(|r| r.total_revenue).sum();
        assert!((rows_revenue - revenue).abs() < 1e-6);
        assert_eq!(dashboard.summary.product_count, dashboard.products.len());
    }

    #[test]
    fn test_rows_and_rollups_are_non_increasing_prefixes() {
        let records: Vec<_> = (0..60)
            .map(|i| {
                enriched(
                    &format!("P{}", i % 23),
                    &format!("B{}", i % 14),
                    &format!("C{}", i % 12),
                    (i * 7 % 9) as i64,
                    2.0,
                )
            })
            .collect();

        let dashboard = aggregate(&records);

        assert!(dashboard
            .products
            .windows(2)
            .all(|w| w[0].total_quantity >= w[1].total_quantity));

        let all_brands = rollup(&dashboard.products, |r| r.brand.as_str());
        assert_eq!(all_brands.len(), 14);
        assert_eq!(dashboard.top_brands.len(), TOP_N);
        assert_eq!(dashboard.top_brands[..], all_brands[..TOP_N]);

        let all_categories = rollup(&dashboard.products, |r| r.category_name.as_str());
        assert_eq!(dashboard.top_categories[..], all_categories[..TOP_N]);
        assert!(dashboard
            .top_categories
            .windows(2)
            .all(|w| w[0].total_quantity >= w[1].total_quantity));
    }

    #[test]
    fn test_empty_input() {
        let dashboard = aggregate(&[]);
        assert!(dashboard.products.is_empty());
        assert!(dashboard.top_brands.is_empty());
        assert_eq!(dashboard.summary, SalesSummary::default());
    }
}

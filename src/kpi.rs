//! KPI aggregation over the full `sales_data` table.

use std::collections::BTreeMap;

use crate::models::sales::{SalesRecord, net_income};

/// Net income of one (country, date) group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupIncome {
    pub country: String,
    pub date: String,
    pub revenue: f64,
    pub costs: f64,
    pub advertising: f64,
    pub record_count: usize,
}

impl GroupIncome {
    pub fn net_income(&self) -> f64 {
        net_income(self.revenue, self.costs, self.advertising)
    }
}

/// One bar of a bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
}

/// Totals and grouped net income for a set of records.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSummary {
    pub record_count: usize,
    pub total_revenue: f64,
    pub total_costs: f64,
    pub total_advertising: f64,
    pub total_sales_volume: i64,
    pub total_new_clients: i64,
    pub average_satisfaction: f64,
    /// Sorted by country, then date.
    pub by_country_date: Vec<GroupIncome>,
    /// Same groups sorted by date, then country.
    pub by_date_country: Vec<GroupIncome>,
}

impl KpiSummary {
    /// Aggregate `records`. Returns `None` when there is nothing to summarize.
    pub fn compute(records: &[SalesRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let mut groups: BTreeMap<(&str, &str), GroupIncome> = BTreeMap::new();
        for r in records {
            let group = groups
                .entry((r.country.as_str(), r.date.as_str()))
                .or_insert_with(|| GroupIncome {
                    country: r.country.clone(),
                    date: r.date.clone(),
                    revenue: 0.0,
                    costs: 0.0,
                    advertising: 0.0,
                    record_count: 0,
                });
            group.revenue += r.monthly_revenue;
            group.costs += r.monthly_costs;
            group.advertising += r.advertising_costs;
            group.record_count += 1;
        }

        let by_country_date: Vec<GroupIncome> = groups.into_values().collect();
        let mut by_date_country = by_country_date.clone();
        by_date_country.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.country.cmp(&b.country)));

        let satisfaction_sum: i64 = records.iter().map(|r| i64::from(r.satisfaction_rate)).sum();

        Some(Self {
            record_count: records.len(),
            total_revenue: records.iter().map(|r| r.monthly_revenue).sum(),
            total_costs: records.iter().map(|r| r.monthly_costs).sum(),
            total_advertising: records.iter().map(|r| r.advertising_costs).sum(),
            total_sales_volume: records.iter().map(|r| r.sales_volume).sum(),
            total_new_clients: records.iter().map(|r| r.new_clients).sum(),
            average_satisfaction: satisfaction_sum as f64 / records.len() as f64,
            by_country_date,
            by_date_country,
        })
    }

    /// `total_revenue - total_costs - total_advertising`.
    pub fn net_income(&self) -> f64 {
        net_income(self.total_revenue, self.total_costs, self.total_advertising)
    }

    /// Net income per country, sorted by country.
    pub fn net_income_by_country(&self) -> Vec<BarDatum> {
        Self::bars(self.by_country_date.iter().map(|g| (g.country.as_str(), g.net_income())))
    }

    /// Net income per date, sorted by date.
    pub fn net_income_by_date(&self) -> Vec<BarDatum> {
        Self::bars(self.by_date_country.iter().map(|g| (g.date.as_str(), g.net_income())))
    }

    fn bars<'a>(values: impl Iterator<Item = (&'a str, f64)>) -> Vec<BarDatum> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for (label, value) in values {
            *totals.entry(label).or_default() += value;
        }
        totals
            .into_iter()
            .map(|(label, value)| BarDatum {
                label: label.to_string(),
                value,
            })
            .collect()
    }
}

/// Format an amount with thousands separators and two decimals, e.g. `1,234.56 €`.
pub fn format_amount(value: f64, currency: &str) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    if currency.is_empty() {
        format!("{sign}{grouped}.{frac_part}")
    } else {
        format!("{sign}{grouped}.{frac_part} {currency}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: i32, country: &str, date: &str, revenue: f64, costs: f64, ads: f64) -> SalesRecord {
        SalesRecord {
            id,
            filiale_name: format!("F{id}"),
            country: country.to_string(),
            date: date.to_string(),
            monthly_revenue: revenue,
            monthly_costs: costs,
            sales_volume: 10,
            new_clients: 2,
            satisfaction_rate: 80,
            advertising_costs: ads,
        }
    }

    fn sample() -> Vec<SalesRecord> {
        vec![
            rec(1, "France", "2024-02-29", 1000.0, 400.0, 100.0),
            rec(2, "Belgium", "2024-01-31", 800.0, 500.0, 50.0),
            rec(3, "France", "2024-01-31", 1200.0, 700.0, 80.0),
            rec(4, "France", "2024-02-29", 500.0, 200.0, 20.0),
        ]
    }

    #[test]
    fn test_empty_table_has_no_summary() {
        assert!(KpiSummary::compute(&[]).is_none());
    }

    #[test]
    fn test_totals() {
        let kpi = KpiSummary::compute(&sample()).unwrap();

        assert_eq!(kpi.record_count, 4);
        assert_eq!(kpi.total_revenue, 3500.0);
        assert_eq!(kpi.total_costs, 1800.0);
        assert_eq!(kpi.total_advertising, 250.0);
        assert_eq!(kpi.net_income(), 1450.0);
        assert_eq!(kpi.total_sales_volume, 40);
        assert_eq!(kpi.total_new_clients, 8);
        assert_eq!(kpi.average_satisfaction, 80.0);
    }

    #[test]
    fn test_group_net_income_matches_member_rows() {
        let records = sample();
        let kpi = KpiSummary::compute(&records).unwrap();

        for group in &kpi.by_country_date {
            let members: Vec<_> = records
                .iter()
                .filter(|r| r.country == group.country && r.date == group.date)
                .collect();
            let expected = members.iter().map(|r| r.monthly_revenue).sum::<f64>()
                - members.iter().map(|r| r.monthly_costs).sum::<f64>()
                - members.iter().map(|r| r.advertising_costs).sum::<f64>();

            assert_eq!(group.record_count, members.len());
            assert!((group.net_income() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_group_ordering() {
        let kpi = KpiSummary::compute(&sample()).unwrap();

        let country_date: Vec<_> = kpi
            .by_country_date
            .iter()
            .map(|g| (g.country.as_str(), g.date.as_str()))
            .collect();
        assert_eq!(
            country_date,
            [
                ("Belgium", "2024-01-31"),
                ("France", "2024-01-31"),
                ("France", "2024-02-29"),
            ]
        );

        let date_country: Vec<_> = kpi
            .by_date_country
            .iter()
            .map(|g| (g.date.as_str(), g.country.as_str()))
            .collect();
        assert_eq!(
            date_country,
            [
                ("2024-01-31", "Belgium"),
                ("2024-01-31", "France"),
                ("2024-02-29", "France"),
            ]
        );

        let france_feb = &kpi.by_country_date[2];
        assert_eq!(france_feb.net_income(), 780.0);
    }

    #[test]
    fn test_bar_series() {
        let kpi = KpiSummary::compute(&sample()).unwrap();

        let by_country = kpi.net_income_by_country();
        assert_eq!(
            by_country,
            [
                BarDatum {
                    label: "Belgium".to_string(),
                    value: 250.0
                },
                BarDatum {
                    label: "France".to_string(),
                    value: 1200.0
                },
            ]
        );

        let by_date = kpi.net_income_by_date();
        assert_eq!(by_date.len(), 2);
        assert_eq!(by_date[0].label, "2024-01-31");
        assert_eq!(by_date[0].value, 670.0);
        assert_eq!(by_date[1].value, 780.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0, "€"), "0.00 €");
        assert_eq!(format_amount(999.5, "€"), "999.50 €");
        assert_eq!(format_amount(1234.567, "€"), "1,234.57 €");
        assert_eq!(format_amount(1_000_000.0, "$"), "1,000,000.00 $");
        assert_eq!(format_amount(-45_210.1, "€"), "-45,210.10 €");
        assert_eq!(format_amount(-0.001, "€"), "0.00 €");
        assert_eq!(format_amount(12.0, ""), "12.00");
    }
}

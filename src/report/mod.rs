//! Plain-text rendering of the report tables.

pub mod chart;

use rust_decimal::Decimal;
use std::io::{self, Write};

use crate::pipeline::ElectionReport;

/// `$1,234,567.89`, negatives as `-$12.00`
pub fn format_currency(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac_part)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

struct Table<'h> {
    title: String,
    headers: &'h [(&'h str, Align)],
    rows: Vec<Vec<String>>,
}

impl Table<'_> {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        writeln!(w, "{}", self.title)?;
        if self.rows.is_empty() {
            writeln!(w, "  (no rows)")?;
            return writeln!(w);
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|(h, _)| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let line = |cells: Vec<&str>| -> String {
            cells
                .iter()
                .enumerate()
                .map(|(i, cell)| match self.headers[i].1 {
                    Align::Left => format!("{:<width$}", cell, width = widths[i]),
                    Align::Right => format!("{:>width$}", cell, width = widths[i]),
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        writeln!(w, "  {}", line(self.headers.iter().map(|(h, _)| *h).collect()))?;
        let rule: Vec<String> = widths.iter().map(|n| "-".repeat(*n)).collect();
        writeln!(w, "  {}", rule.join("  "))?;
        for row in &self.rows {
            writeln!(w, "  {}", line(row.iter().map(String::as_str).collect()))?;
        }
        writeln!(w)
    }
}

/// Write every table of the report to `w`
pub fn render_tables<W: Write>(w: &mut W, report: &ElectionReport) -> io::Result<()> {
    let heading = format!("FEC {} cycle report", report.cycle);
    writeln!(w, "{}", heading)?;
    writeln!(w, "{}", "=".repeat(heading.len()))?;
    writeln!(w)?;

    Table {
        title: format!("Top {} parties by cash on hand", report.top_parties),
        headers: &[("Party", Align::Left), ("Total cash", Align::Right)],
        rows: report
            .cash_holdings
            .iter()
            .map(|r| vec![r.party.clone(), format_currency(r.total_cash)])
            .collect(),
    }
    .write_to(w)?;

    Table {
        title: "Committees and candidates by party".to_string(),
        headers: &[
            ("Party", Align::Left),
            ("Committees", Align::Right),
            ("Candidates", Align::Right),
        ],
        rows: report
            .committee_counts
            .iter()
            .map(|r| vec![r.party.clone(), r.committees.to_string(), r.candidates.to_string()])
            .collect(),
    }
    .write_to(w)?;

    Table {
        title: format!("Donations from {} employees by quarter", report.employer),
        headers: &[
            ("Quarter", Align::Left),
            ("Party", Align::Left),
            ("Total", Align::Right),
            ("Donations", Align::Right),
        ],
        rows: report
            .donations
            .iter()
            .map(|b| {
                vec![
                    b.quarter.to_string(),
                    b.party.label().to_string(),
                    format_currency(b.total),
                    b.contributions.to_string(),
                ]
            })
            .collect(),
    }
    .write_to(w)?;

    Table {
        title: format!("Top candidates funded by {} employees", report.employer),
        headers: &[
            ("Candidate", Align::Left),
            ("State", Align::Left),
            ("Party", Align::Left),
            ("Total", Align::Right),
            ("Donations", Align::Right),
        ],
        rows: report
            .top_recipients
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.state.clone().unwrap_or_default(),
                    r.party.clone(),
                    format_currency(r.total),
                    r.contributions.to_string(),
                ]
            })
            .collect(),
    }
    .write_to(w)?;

    Table {
        title: "Ingest summary".to_string(),
        headers: &[
            ("Dataset", Align::Left),
            ("Rows read", Align::Right),
            ("Kept", Align::Right),
            ("Skipped", Align::Right),
            ("Archive bytes", Align::Right),
            ("SHA-256", Align::Left),
        ],
        rows: report
            .datasets
            .iter()
            .map(|d| {
                vec![
                    d.parse.dataset.to_string(),
                    d.parse.rows_read.to_string(),
                    d.parse.rows_kept.to_string(),
                    d.parse.rows_skipped.to_string(),
                    d.archive_bytes.to_string(),
                    d.sha256.clone(),
                ]
            })
            .collect(),
    }
    .write_to(w)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::aggregate::{PartyCash, PartyCounts};
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_grouping_and_rounding() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(999.5)), "$999.50");
        assert_eq!(format_currency(dec!(1000)), "$1,000.00");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(-2500.005)), "-$2,500.00");
        assert_eq!(format_currency(dec!(100000)), "$100,000.00");
    }

    fn sample_report() -> ElectionReport {
        ElectionReport {
            cycle: "2005-2006".into(),
            employer: "HARVARD UNIVERSITY".into(),
            top_parties: 5,
            cash_holdings: vec![
                PartyCash {
                    party: "Republican Party".into(),
                    total_cash: dec!(2500),
                },
                PartyCash {
                    party: "Democratic Party".into(),
                    total_cash: dec!(1000.5),
                },
            ],
            committee_counts: vec![PartyCounts {
                party: "Democratic Party".into(),
                committees: 12,
                candidates: 3,
            }],
            donations: Vec::new(),
            top_recipients: Vec::new(),
            datasets: Vec::new(),
        }
    }

    #[test]
    fn test_render_tables_aligns_columns() {
        let mut out = Vec::new();
        render_tables(&mut out, &sample_report()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("FEC 2005-2006 cycle report\n"));
        assert!(text.contains(&format!("  {:<16}  {:>10}\n", "Republican Party", "$2,500.00")));
        assert!(text.contains(&format!("  {:<16}  {:>10}\n", "Democratic Party", "$1,000.50")));
        assert!(text.contains(&format!(
            "  {:<16}  {:>10}  {:>10}\n",
            "Democratic Party", 12, 3
        )));
    }

    #[test]
    fn test_empty_tables_say_so() {
        let mut out = Vec::new();
        render_tables(&mut out, &sample_report()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Donations from HARVARD UNIVERSITY employees by quarter\n  (no rows)\n"));
    }
}

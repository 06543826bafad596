use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{ReportError, Result};
use crate::pipeline::processing::aggregate::DonationBucket;
use crate::pipeline::processing::normalize::DonationParty;

const MIN_RADIUS: f64 = 3.0;
const MAX_RADIUS: f64 = 18.0;

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

pub fn party_color(party: DonationParty) -> RGBColor {
    match party {
        DonationParty::Democrat => RGBColor(0x1f, 0x5f, 0xbf),
        DonationParty::Republican => RGBColor(0xd6, 0x27, 0x28),
        DonationParty::Other => RGBColor(0x2c, 0xa0, 0x2c),
        DonationParty::NonPartisan => RGBColor(0x7f, 0x7f, 0x7f),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: i32,
    amount: f64,
    radius: i32,
    party: DonationParty,
}

/// Chart points: one per bucket with a positive total
fn plot_points(buckets: &[DonationBucket]) -> Vec<Point> {
    let positive: Vec<(i32, f64, DonationParty)> = buckets
        .iter()
        .filter_map(|b| {
            let amount = b.total.to_f64()?;
            if amount > 0.0 {
                Some((b.quarter.index(), amount, b.party))
            } else {
                debug!("{} {}: total {} left off the log axis", b.quarter, b.party, amount);
                None
            }
        })
        .collect();

    let max = positive.iter().map(|(_, a, _)| *a).fold(0.0_f64, f64::max);
    positive
        .into_iter()
        .map(|(x, amount, party)| Point {
            x,
            amount,
            radius: (MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * (amount / max).sqrt()).round() as i32,
            party,
        })
        .collect()
}

/// Draw the donation scatter plot as SVG.
///
/// Returns `false` without writing anything when no bucket has a positive
/// total.
pub fn render_chart(buckets: &[DonationBucket], path: &Path, options: &ChartOptions) -> Result<bool> {
    let points = plot_points(buckets);
    if points.is_empty() {
        warn!("⚠️ No positive donation totals; skipping chart");
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    draw(&points, path, options).map_err(|e| ReportError::Chart(format!("{:#}", e)))?;
    info!("📊 Chart saved to {}", path.display());
    Ok(true)
}

fn draw(points: &[Point], path: &Path, options: &ChartOptions) -> anyhow::Result<()> {
    let x_min = points.iter().map(|p| p.x).min().unwrap_or_default() - 1;
    let x_max = points.iter().map(|p| p.x).max().unwrap_or_default() + 1;
    let y_min = points.iter().map(|p| p.amount).fold(f64::INFINITY, f64::min) / 2.0;
    let y_max = points.iter().map(|p| p.amount).fold(0.0_f64, f64::max) * 2.0;

    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, ("sans-serif", 26))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min..x_max, (y_min..y_max).log_scale())?;

    let quarter_label = |x: &i32| crate::domain::Quarter::from_index(*x).to_string();
    chart
        .configure_mesh()
        .x_labels((x_max - x_min + 1) as usize)
        .x_label_formatter(&quarter_label)
        .y_label_formatter(&|y| format!("${:.0}", y))
        .x_desc("Quarter")
        .y_desc("Donation amount (log scale)")
        .draw()?;

    for party in DonationParty::ALL {
        let color = party_color(party);
        let series: Vec<&Point> = points.iter().filter(|p| p.party == party).collect();
        if series.is_empty() {
            continue;
        }
        chart
            .draw_series(
                series
                    .iter()
                    .map(|p| Circle::new((p.x, p.amount), p.radius, color.mix(0.7).filled())),
            )?
            .label(party.label())
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Quarter;
    use rust_decimal_macros::dec;

    fn bucket(year: i32, quarter: u32, party: DonationParty, total: rust_decimal::Decimal) -> DonationBucket {
        DonationBucket {
            quarter: Quarter { year, quarter },
            party,
            total,
            contributions: 1,
        }
    }

    #[test]
    fn test_points_scale_with_amount_and_drop_non_positive() {
        let buckets = vec![
            bucket(2006, 1, DonationParty::Democrat, dec!(100)),
            bucket(2006, 1, DonationParty::Republican, dec!(25)),
            bucket(2006, 2, DonationParty::Other, dec!(-40)),
            bucket(2006, 2, DonationParty::NonPartisan, dec!(0)),
        ];

        let points = plot_points(&buckets);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].radius, MAX_RADIUS as i32);
        assert!(points[1].radius < points[0].radius);
        assert!(points[1].radius >= MIN_RADIUS as i32);
    }

    #[test]
    fn test_four_distinct_colors() {
        let colors: std::collections::HashSet<(u8, u8, u8)> = DonationParty::ALL
            .iter()
            .map(|p| {
                let c = party_color(*p);
                (c.0, c.1, c.2)
            })
            .collect();
        assert_eq!(colors.len(), 4);
    }

    #[test]
    fn test_render_writes_svg() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("charts").join("donations.svg");
        let buckets = vec![
            bucket(2005, 4, DonationParty::NonPartisan, dec!(1000)),
            bucket(2006, 1, DonationParty::Democrat, dec!(350.25)),
        ];
        let options = ChartOptions {
            title: "Donations".into(),
            width: 640,
            height: 480,
        };

        assert!(render_chart(&buckets, &path, &options)?);
        let svg = std::fs::read_to_string(&path)?;
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<circle"));
        Ok(())
    }

    #[test]
    fn test_empty_buckets_skip_chart() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("none.svg");
        let options = ChartOptions {
            title: "Donations".into(),
            width: 640,
            height: 480,
        };

        assert!(!render_chart(&[], &path, &options)?);
        assert!(!path.exists());
        Ok(())
    }
}

//! Least-squares trend of a player's rating over time.

use chess_board::GameRecord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingTrendResult {
    /// Rating in the last usable game of the input order.
    pub current_rating: u32,
    /// `Up` only for a strictly positive slope.
    pub trend: Trend,
    /// Absolute slope in rating points per day.
    pub trend_strength: f64,
    pub slope: f64,
    pub r_squared: f64,
    /// Number of (date, rating) points fitted.
    pub points: usize,
}

/// Fits rating against date for `player`'s games, in input order.
///
/// Games without a parsable `YYYY.MM.DD` date or a rating for the player's
/// side are skipped. Returns `None` with fewer than two points or when
/// every point falls on the same day.
pub fn rating_trend<'a>(
    records: impl IntoIterator<Item = &'a GameRecord>,
    player: &str,
) -> Option<RatingTrendResult> {
    let points: Vec<(f64, f64)> = records
        .into_iter()
        .filter_map(|record| {
            let rating = record.rating_of(record.color_of(player)?)?;
            let date = NaiveDate::parse_from_str(record.headers.date.as_deref()?, "%Y.%m.%d").ok()?;
            Some((f64::from(date.num_days_from_ce()), f64::from(rating)))
        })
        .collect();

    if points.len() < 2 {
        debug!(player, points = points.len(), "not enough rated games for a trend");
        return None;
    }
    let (_, last_rating) = *points.last()?;
    let (slope, r_squared) = linear_fit(&points)?;

    Some(RatingTrendResult {
        current_rating: last_rating as u32,
        trend: if slope > 0.0 { Trend::Up } else { Trend::Down },
        trend_strength: slope.abs(),
        slope,
        r_squared,
        points: points.len(),
    })
}

/// Ordinary least squares; returns (slope, r²).
fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in points {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    // A flat series has no variance to explain.
    let r_squared = if syy == 0.0 {
        0.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };
    Some((slope, r_squared))
}

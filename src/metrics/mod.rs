// src/metrics/mod.rs
//
// Call-record aggregation for the dashboard charts.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{CallRecord, Outcome, Sentiment};

mod memo;

pub use memo::MetricsMemo;

pub const COLOR_GOOD: &str = "#10B981";
pub const COLOR_BAD: &str = "#EF4444";
pub const COLOR_NEUTRAL: &str = "#F59E0B";

// ───────────────────────────────────────
// Output shapes
// ───────────────────────────────────────

/// Derived summary consumed by the chart views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub outcome: Vec<ColoredSlice>,
    pub sentiment: Vec<ColoredSlice>,
    pub equipment: Vec<Slice>,
    pub rates: Vec<RatePoint>,
    pub daily: Vec<DailyTrend>,
    pub total_calls: u64,
    pub won_calls: u64,
    pub avg_initial_rate: i64,
    pub avg_final_rate: i64,
    pub total_cost: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColoredSlice {
    pub name: String,
    pub value: u64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatePoint {
    pub id: i64,
    pub initial_rate: f64,
    pub final_rate: f64,
    pub difference: f64,
    pub outcome: Outcome,
}

/// Per-day call counts. `other` holds outcomes that are neither won nor
/// lost, so `total == won + lost + other` always.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub won: u64,
    pub lost: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub other: u64,
    pub total: u64,
}

fn is_zero(n: &u64) -> bool {
    *n == 0
}

// ───────────────────────────────────────
// Aggregation
// ───────────────────────────────────────

/// Counts keys while remembering the order each key was first seen.
struct Tally<K> {
    order: Vec<(K, u64)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    fn new() -> Self {
        Self { order: Vec::new(), index: HashMap::new() }
    }

    fn add(&mut self, key: &K) {
        match self.index.get(key) {
            Some(&i) => self.order[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.order.len());
                self.order.push((key.clone(), 1));
            }
        }
    }

    /// Entries ordered by `rank`; equal ranks keep first-seen order.
    fn ranked(mut self, rank: impl Fn(&K) -> u8) -> Vec<(K, u64)> {
        self.order.sort_by_key(|(k, _)| rank(k));
        self.order
    }
}

fn outcome_rank(o: &Outcome) -> u8 {
    match o {
        Outcome::Won => 0,
        Outcome::Lost => 1,
        Outcome::Other(_) => 2,
    }
}

fn sentiment_rank(s: &Sentiment) -> u8 {
    match s {
        Sentiment::Positive => 0,
        Sentiment::Negative => 1,
        Sentiment::Neutral => 2,
        Sentiment::Other(_) => 3,
    }
}

fn sentiment_color(s: &Sentiment) -> &'static str {
    match s {
        Sentiment::Positive => COLOR_GOOD,
        Sentiment::Negative => COLOR_BAD,
        _ => COLOR_NEUTRAL,
    }
}

/// Mean rounded half away from zero; 0 for an empty set.
fn rounded_mean(sum: f64, count: u64) -> i64 {
    if count == 0 {
        return 0;
    }
    (sum / count as f64).round() as i64
}

/// Builds the dashboard summary. `None` means there is nothing to chart,
/// which callers must keep distinct from a zeroed summary.
pub fn aggregate(calls: &[CallRecord]) -> Option<Metrics> {
    if calls.is_empty() {
        return None;
    }

    let mut outcomes = Tally::new();
    let mut sentiments = Tally::new();
    let mut equipment = Tally::new();
    let mut daily: BTreeMap<NaiveDate, DailyTrend> = BTreeMap::new();
    let mut rates = Vec::new();

    let mut won_calls = 0u64;
    let mut initial_sum = 0.0;
    let mut final_sum = 0.0;

    for call in calls {
        outcomes.add(&call.outcome);
        sentiments.add(&call.sentiment);

        let date = call.created_at.date_naive();
        let day = daily.entry(date).or_insert(DailyTrend {
            date,
            won: 0,
            lost: 0,
            other: 0,
            total: 0,
        });
        match call.outcome {
            Outcome::Won => day.won += 1,
            Outcome::Lost => day.lost += 1,
            Outcome::Other(_) => day.other += 1,
        }
        day.total += 1;

        if call.outcome.is_won() {
            won_calls += 1;
            initial_sum += call.initial_rate;
            final_sum += call.final_rate;
            equipment.add(&call.equipment_type);
            rates.push(RatePoint {
                id: call.id,
                initial_rate: call.initial_rate,
                final_rate: call.final_rate,
                difference: call.final_rate - call.initial_rate,
                outcome: call.outcome.clone(),
            });
        }
    }

    let outcome = outcomes
        .ranked(outcome_rank)
        .into_iter()
        .map(|(o, value)| ColoredSlice {
            name: o.label(),
            value,
            color: if o.is_won() { COLOR_GOOD } else { COLOR_BAD },
        })
        .collect();

    let sentiment = sentiments
        .ranked(sentiment_rank)
        .into_iter()
        .map(|(s, value)| ColoredSlice {
            name: s.label().to_string(),
            value,
            color: sentiment_color(&s),
        })
        .collect();

    let equipment = equipment
        .ranked(|_| 0)
        .into_iter()
        .map(|(name, value)| Slice { name, value })
        .collect();

    Some(Metrics {
        outcome,
        sentiment,
        equipment,
        rates,
        daily: daily.into_values().collect(),
        total_calls: calls.len() as u64,
        won_calls,
        avg_initial_rate: rounded_mean(initial_sum, won_calls),
        avg_final_rate: rounded_mean(final_sum, won_calls),
        total_cost: final_sum,
        total_revenue: final_sum,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::timestamp;

    pub(crate) fn call(
        id: i64,
        outcome: &str,
        sentiment: &str,
        initial: f64,
        final_rate: f64,
        equipment: &str,
        created_at: &str,
    ) -> CallRecord {
        CallRecord {
            id,
            created_at: timestamp::parse(created_at).unwrap(),
            pickup_datetime: None,
            delivery_datetime: None,
            origin: "Houston, TX".into(),
            destination: "Phoenix, AZ".into(),
            equipment_type: equipment.into(),
            initial_rate: initial,
            final_rate,
            mc_number: format!("MC{id:06}"),
            outcome: Outcome::from(outcome.to_string()),
            sentiment: Sentiment::from(sentiment.to_string()),
        }
    }

    fn slice_value(slices: &[ColoredSlice], name: &str) -> Option<u64> {
        slices.iter().find(|s| s.name == name).map(|s| s.value)
    }

    #[test]
    fn won_and_lost_on_same_day() {
        let calls = vec![
            call(1, "won", "pos", 100.0, 120.0, "Flatbed", "2024-01-01T00:00:00Z"),
            call(2, "lost", "neg", 200.0, 200.0, "Reefer", "2024-01-01T00:00:00Z"),
        ];
        let m = aggregate(&calls).unwrap();

        assert_eq!(m.total_calls, 2);
        assert_eq!(m.won_calls, 1);
        assert_eq!(m.avg_initial_rate, 100);
        assert_eq!(m.avg_final_rate, 120);
        assert_eq!(m.total_cost, 120.0);
        assert_eq!(m.total_revenue, 120.0);

        assert_eq!(m.daily.len(), 1);
        let day = &m.daily[0];
        assert_eq!(day.date.to_string(), "2024-01-01");
        assert_eq!((day.won, day.lost, day.total), (1, 1, 2));

        assert_eq!(m.equipment, vec![Slice { name: "Flatbed".into(), value: 1 }]);
        assert_eq!(m.rates.len(), 1);
        assert_eq!(m.rates[0].difference, 20.0);
    }

    #[test]
    fn all_lost_yields_zero_averages_and_no_equipment() {
        let calls = vec![
            call(1, "lost", "neu", 900.0, 950.0, "Dry Van", "2024-02-01T10:00:00Z"),
            call(2, "lost", "neg", 1200.0, 1100.0, "Reefer", "2024-02-02T10:00:00Z"),
        ];
        let m = aggregate(&calls).unwrap();

        assert_eq!(m.won_calls, 0);
        assert_eq!(m.avg_initial_rate, 0);
        assert_eq!(m.avg_final_rate, 0);
        assert_eq!(m.total_cost, 0.0);
        assert!(m.equipment.is_empty());
        assert!(m.rates.is_empty());
        assert_eq!(slice_value(&m.outcome, "Lost"), Some(2));
        assert_eq!(slice_value(&m.outcome, "Won"), None);
    }

    #[test]
    fn empty_input_is_no_data() {
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn outcome_counts_sum_to_total() {
        let calls = vec![
            call(1, "lost", "pos", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
            call(2, "won", "pos", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
            call(3, "won", "neg", 1.0, 1.0, "B", "2024-03-02T00:00:00Z"),
            call(4, "cancelled", "neu", 1.0, 1.0, "B", "2024-03-02T00:00:00Z"),
        ];
        let m = aggregate(&calls).unwrap();

        let sum: u64 = m.outcome.iter().map(|s| s.value).sum();
        assert_eq!(sum, m.total_calls);
        assert_eq!(slice_value(&m.outcome, "Won"), Some(m.won_calls));
        assert!(m.won_calls <= m.total_calls);
    }

    #[test]
    fn outcome_order_is_canonical() {
        let calls = vec![
            call(1, "maybe", "neu", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
            call(2, "lost", "neu", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
            call(3, "won", "neu", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
        ];
        let m = aggregate(&calls).unwrap();
        let names: Vec<_> = m.outcome.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Won", "Lost", "Maybe"]);
        let colors: Vec<_> = m.outcome.iter().map(|s| s.color).collect();
        assert_eq!(colors, [COLOR_GOOD, COLOR_BAD, COLOR_BAD]);
    }

    #[test]
    fn sentiment_labels_colors_and_unknowns() {
        let calls = vec![
            call(1, "won", "neu", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
            call(2, "won", "??", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
            call(3, "won", "neg", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
            call(4, "won", "pos", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
            call(5, "won", "pos", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
        ];
        let m = aggregate(&calls).unwrap();
        let got: Vec<_> = m
            .sentiment
            .iter()
            .map(|s| (s.name.as_str(), s.value, s.color))
            .collect();
        assert_eq!(
            got,
            [
                ("Positive", 2, COLOR_GOOD),
                ("Negative", 1, COLOR_BAD),
                ("Neutral", 1, COLOR_NEUTRAL),
                ("??", 1, COLOR_NEUTRAL),
            ]
        );
    }

    #[test]
    fn equipment_counts_only_won_calls_in_first_seen_order() {
        let calls = vec![
            call(1, "won", "pos", 1.0, 1.0, "Reefer", "2024-03-01T00:00:00Z"),
            call(2, "lost", "pos", 1.0, 1.0, "Tanker", "2024-03-01T00:00:00Z"),
            call(3, "won", "pos", 1.0, 1.0, "Flatbed", "2024-03-01T00:00:00Z"),
            call(4, "won", "pos", 1.0, 1.0, "Reefer", "2024-03-01T00:00:00Z"),
        ];
        let m = aggregate(&calls).unwrap();
        assert_eq!(
            m.equipment,
            vec![
                Slice { name: "Reefer".into(), value: 2 },
                Slice { name: "Flatbed".into(), value: 1 },
            ]
        );
    }

    #[test]
    fn rates_keep_record_order() {
        let calls = vec![
            call(30, "won", "pos", 500.0, 450.0, "A", "2024-03-03T00:00:00Z"),
            call(10, "lost", "pos", 100.0, 100.0, "A", "2024-03-01T00:00:00Z"),
            call(20, "won", "pos", 300.0, 360.0, "A", "2024-03-02T00:00:00Z"),
        ];
        let m = aggregate(&calls).unwrap();
        let ids: Vec<_> = m.rates.iter().map(|r| r.id).collect();
        assert_eq!(ids, [30, 20]);
        assert_eq!(m.rates[0].difference, -50.0);
        assert_eq!(m.rates[1].outcome, Outcome::Won);
    }

    #[test]
    fn averages_round_half_away_from_zero() {
        let calls = vec![
            call(1, "won", "pos", 100.0, 101.0, "A", "2024-03-01T00:00:00Z"),
            call(2, "won", "pos", 101.0, 102.0, "A", "2024-03-01T00:00:00Z"),
        ];
        let m = aggregate(&calls).unwrap();
        assert_eq!(m.avg_initial_rate, 101); // 100.5
        assert_eq!(m.avg_final_rate, 102); // 101.5
        assert_eq!(m.total_cost, 203.0);
    }

    #[test]
    fn daily_trend_is_sorted_and_balanced() {
        let calls = vec![
            call(1, "won", "pos", 1.0, 1.0, "A", "2024-03-03T23:59:59Z"),
            call(2, "lost", "pos", 1.0, 1.0, "A", "2024-02-28T08:00:00Z"),
            call(3, "won", "pos", 1.0, 1.0, "A", "2024-03-03T00:00:00+05:00"),
            call(4, "lost", "pos", 1.0, 1.0, "A", "2024-03-01T12:00:00Z"),
        ];
        let m = aggregate(&calls).unwrap();
        let dates: Vec<_> = m.daily.iter().map(|d| d.date.to_string()).collect();
        // 2024-03-03T00:00:00+05:00 falls on 2024-03-02 in UTC.
        assert_eq!(dates, ["2024-02-28", "2024-03-01", "2024-03-02", "2024-03-03"]);
        assert!(m.daily.windows(2).all(|w| w[0].date < w[1].date));
        assert!(m.daily.iter().all(|d| d.total == d.won + d.lost));
    }

    #[test]
    fn unknown_outcome_counts_toward_daily_total() {
        let calls = vec![
            call(1, "won", "pos", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
            call(2, "no_answer", "pos", 1.0, 1.0, "A", "2024-03-01T00:00:00Z"),
        ];
        let m = aggregate(&calls).unwrap();
        let day = &m.daily[0];
        assert_eq!((day.won, day.lost, day.other, day.total), (1, 0, 1, 2));
        assert_eq!(day.total, day.won + day.lost + day.other);
    }

    #[test]
    fn serializes_view_contract() {
        let calls = vec![call(1, "won", "pos", 100.0, 120.0, "Flatbed", "2024-01-01T00:00:00Z")];
        let json = serde_json::to_value(aggregate(&calls).unwrap()).unwrap();

        assert_eq!(json["totalCalls"], 1);
        assert_eq!(json["wonCalls"], 1);
        assert_eq!(json["avgFinalRate"], 120);
        assert_eq!(json["totalCost"], 120.0);
        assert_eq!(json["outcome"][0]["name"], "Won");
        assert_eq!(json["outcome"][0]["color"], COLOR_GOOD);
        assert_eq!(json["daily"][0]["date"], "2024-01-01");
        assert!(json["daily"][0].get("other").is_none());
        assert_eq!(json["rates"][0]["initial_rate"], 100.0);
        assert_eq!(json["rates"][0]["outcome"], "won");
    }

    #[test]
    fn aggregation_is_deterministic() {
        let calls = vec![
            call(1, "won", "pos", 100.0, 120.0, "Flatbed", "2024-01-01T00:00:00Z"),
            call(2, "lost", "neg", 200.0, 200.0, "Reefer", "2024-01-02T00:00:00Z"),
        ];
        assert_eq!(aggregate(&calls), aggregate(&calls));
    }
}

//! Queue ordering.
//!
//! Both modes produce a total order: every comparison chain ends on the
//! arrival sequence, which is unique per record.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::patient::PatientRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueMode {
    /// Shortest time-to-risk first.
    #[default]
    #[serde(alias = "ttr")]
    RiskPriority,
    /// First in, first out.
    #[serde(alias = "fifo")]
    Arrival,
}

impl FromStr for QueueMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "risk-priority" | "risk_priority" | "ttr" => Ok(QueueMode::RiskPriority),
            "arrival" | "fifo" => Ok(QueueMode::Arrival),
            other => Err(Error::Configuration(format!("unknown queue mode '{}'", other))),
        }
    }
}

impl fmt::Display for QueueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueMode::RiskPriority => write!(f, "risk-priority"),
            QueueMode::Arrival => write!(f, "arrival"),
        }
    }
}

/// How risk-priority mode orders patients with equal time-to-risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Higher risk probability first, then earliest arrival.
    #[default]
    RiskThenArrival,
    /// Earliest arrival only.
    ArrivalOnly,
}

/// Rank a snapshot using the default tie-break policy.
pub fn rank(records: &[PatientRecord], mode: QueueMode) -> Vec<PatientRecord> {
    rank_with(records, mode, TieBreak::default())
}

/// Rank a snapshot. The input is left untouched; the result is a new vector.
pub fn rank_with(records: &[PatientRecord], mode: QueueMode, tie_break: TieBreak) -> Vec<PatientRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| compare(a, b, mode, tie_break));
    ranked
}

fn compare(a: &PatientRecord, b: &PatientRecord, mode: QueueMode, tie_break: TieBreak) -> Ordering {
    let by_arrival = a.arrival_sequence().cmp(&b.arrival_sequence());
    match mode {
        QueueMode::Arrival => by_arrival,
        QueueMode::RiskPriority => {
            let by_ttr = a.time_to_risk_minutes().total_cmp(&b.time_to_risk_minutes());
            match tie_break {
                TieBreak::RiskThenArrival => by_ttr
                    .then_with(|| b.risk_probability().total_cmp(&a.risk_probability()))
                    .then(by_arrival),
                TieBreak::ArrivalOnly => by_ttr.then(by_arrival),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    fn record(id: &str, risk: f64, ttr: f64, seq: u64) -> PatientRecord {
        PatientRecord::new(id, risk, ttr, seq)
    }

    fn ids(records: &[PatientRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id()).collect()
    }

    fn opd_queue() -> Vec<PatientRecord> {
        vec![
            record("P004", 92.0, 15.0, 5),
            record("P001", 85.0, 30.0, 7),
            record("P007", 68.0, 45.0, 6),
            record("P002", 45.0, 120.0, 3),
            record("P005", 30.0, 180.0, 1),
            record("P003", 12.0, 360.0, 2),
            record("P006", 8.0, 480.0, 4),
        ]
    }

    #[test]
    fn test_arrival_mode_is_fifo() {
        let ranked = rank(&opd_queue(), QueueMode::Arrival);
        assert_eq!(ids(&ranked), vec!["P005", "P003", "P002", "P006", "P004", "P007", "P001"]);
    }

    #[test]
    fn test_risk_priority_shortest_ttr_first() {
        let ranked = rank(&opd_queue(), QueueMode::RiskPriority);
        assert_eq!(ids(&ranked), vec!["P004", "P001", "P007", "P002", "P005", "P003", "P006"]);
    }

    #[test]
    fn test_equal_ttr_breaks_on_risk_then_arrival() {
        let records = vec![
            record("late-high", 80.0, 30.0, 4),
            record("early-low", 40.0, 30.0, 1),
            record("late-low", 40.0, 30.0, 3),
            record("sooner", 10.0, 20.0, 2),
        ];
        let ranked = rank(&records, QueueMode::RiskPriority);
        assert_eq!(ids(&ranked), vec!["sooner", "late-high", "early-low", "late-low"]);
    }

    #[test_case(-0.0, 0.0 ; "negative zero against zero")]
    #[test_case(0.0, -0.0 ; "zero against negative zero")]
    #[test_case(0.0, 0.0 ; "plain zeros")]
    fn test_signed_zero_ttr_still_breaks_on_risk(low_risk_ttr: f64, high_risk_ttr: f64) {
        let records = vec![
            record("LOW", 10.0, low_risk_ttr, 1),
            record("HIGH", 90.0, high_risk_ttr, 2),
        ];
        let ranked = rank(&records, QueueMode::RiskPriority);
        assert_eq!(ids(&ranked), vec!["HIGH", "LOW"]);
        assert!(ranked.iter().all(|r| r.time_to_risk_minutes().is_sign_positive()));
    }

    #[test]
    fn test_arrival_only_tie_break_ignores_risk() {
        let records = vec![
            record("late-high", 80.0, 30.0, 4),
            record("early-low", 40.0, 30.0, 1),
        ];
        let ranked = rank_with(&records, QueueMode::RiskPriority, TieBreak::ArrivalOnly);
        assert_eq!(ids(&ranked), vec!["early-low", "late-high"]);
    }

    #[test]
    fn test_rank_does_not_mutate_input() {
        let records = opd_queue();
        let before = records.clone();
        let _ = rank(&records, QueueMode::RiskPriority);
        let _ = rank(&records, QueueMode::Arrival);
        assert_eq!(records, before);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(&[], QueueMode::RiskPriority).is_empty());
    }

    #[test]
    fn test_rank_independent_of_input_order() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        // coarse values so ttr and risk ties actually occur
        let records: Vec<PatientRecord> = (1..=200u64)
            .map(|seq| {
                let ttr = f64::from(rng.gen_range(0..12u32) * 15);
                let risk = f64::from(rng.gen_range(0..5u32) * 20);
                record(&format!("P{seq:03}"), risk, ttr, seq)
            })
            .collect();

        for mode in [QueueMode::RiskPriority, QueueMode::Arrival] {
            let expected = rank(&records, mode);
            assert_eq!(expected.len(), records.len());

            for _ in 0..10 {
                let mut shuffled = records.clone();
                shuffled.shuffle(&mut rng);
                assert_eq!(rank(&shuffled, mode), expected);
            }
        }
    }

    #[test]
    fn test_risk_priority_order_is_strict() {
        let mut rng = StdRng::seed_from_u64(7);
        let records: Vec<PatientRecord> = (1..=100u64)
            .map(|seq| {
                let risk = f64::from(rng.gen_range(0..3u32) * 50);
                let ttr = f64::from(rng.gen_range(0..4u32) * 30);
                record(&format!("P{seq}"), risk, ttr, seq)
            })
            .collect();

        let ranked = rank(&records, QueueMode::RiskPriority);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.time_to_risk_minutes() <= b.time_to_risk_minutes());
            if a.time_to_risk_minutes() == b.time_to_risk_minutes() {
                assert!(a.risk_probability() >= b.risk_probability());
                if a.risk_probability() == b.risk_probability() {
                    assert!(a.arrival_sequence() < b.arrival_sequence());
                }
            }
        }

        let arrival = rank(&records, QueueMode::Arrival);
        assert!(arrival.windows(2).all(|w| w[0].arrival_sequence() < w[1].arrival_sequence()));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("risk-priority".parse::<QueueMode>().unwrap(), QueueMode::RiskPriority);
        assert_eq!("TTR".parse::<QueueMode>().unwrap(), QueueMode::RiskPriority);
        assert_eq!("fifo".parse::<QueueMode>().unwrap(), QueueMode::Arrival);
        assert!("alphabetical".parse::<QueueMode>().is_err());
        assert_eq!(QueueMode::Arrival.to_string(), "arrival");
    }
}

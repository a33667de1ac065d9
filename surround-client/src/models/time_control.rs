use serde::{Deserialize, Serialize};

/// Closed set of clock systems the service runs. All durations are seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeControlSystem {
    Fischer {
        initial_time: i64,
        time_increment: i64,
        max_time: i64,
    },
    ByoYomi {
        main_time: i64,
        periods: i64,
        period_time: i64,
    },
    Canadian {
        main_time: i64,
        period_time: i64,
        stones_per_period: i64,
    },
    Simple {
        per_move: i64,
    },
    Absolute {
        total_time: i64,
    },
    None,
}

/// Time control as the game record carries it: a system name plus whichever
/// parameters that system uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeControl {
    #[serde(default)]
    pub time_control: String,
    pub initial_time: Option<i64>,
    pub time_increment: Option<i64>,
    pub max_time: Option<i64>,
    pub main_time: Option<i64>,
    pub periods: Option<i64>,
    pub period_time: Option<i64>,
    pub per_move: Option<i64>,
    pub stones_per_period: Option<i64>,
    pub total_time: Option<i64>,
    pub speed: Option<String>,
    pub pause_on_weekend: Option<bool>,
}

impl TimeControl {
    /// Unknown names and missing parameters give [`TimeControlSystem::None`].
    pub fn system(&self) -> TimeControlSystem {
        let system = match self.time_control.as_str() {
            "fischer" => self.initial_time.zip(self.time_increment).zip(self.max_time).map(
                |((initial_time, time_increment), max_time)| TimeControlSystem::Fischer {
                    initial_time,
                    time_increment,
                    max_time,
                },
            ),
            "byoyomi" => self.main_time.zip(self.periods).zip(self.period_time).map(
                |((main_time, periods), period_time)| TimeControlSystem::ByoYomi {
                    main_time,
                    periods,
                    period_time,
                },
            ),
            "canadian" => self
                .main_time
                .zip(self.period_time)
                .zip(self.stones_per_period)
                .map(|((main_time, period_time), stones_per_period)| {
                    TimeControlSystem::Canadian {
                        main_time,
                        period_time,
                        stones_per_period,
                    }
                }),
            "simple" => self
                .per_move
                .map(|per_move| TimeControlSystem::Simple { per_move }),
            "absolute" => self
                .total_time
                .map(|total_time| TimeControlSystem::Absolute { total_time }),
            _ => None,
        };
        system.unwrap_or(TimeControlSystem::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> TimeControl {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_each_system() {
        let tc = decode(json!({
            "time_control": "byoyomi", "main_time": 600, "periods": 5, "period_time": 30,
            "speed": "live", "pause_on_weekend": false
        }));
        assert_eq!(
            tc.system(),
            TimeControlSystem::ByoYomi {
                main_time: 600,
                periods: 5,
                period_time: 30
            }
        );
        assert_eq!(tc.speed.as_deref(), Some("live"));

        let tc = decode(json!({
            "time_control": "fischer", "initial_time": 300, "time_increment": 10, "max_time": 600
        }));
        assert!(matches!(tc.system(), TimeControlSystem::Fischer { time_increment: 10, .. }));

        let tc = decode(json!({
            "time_control": "canadian", "main_time": 600, "period_time": 300, "stones_per_period": 25
        }));
        assert!(matches!(tc.system(), TimeControlSystem::Canadian { stones_per_period: 25, .. }));

        let tc = decode(json!({"time_control": "simple", "per_move": 86400}));
        assert_eq!(tc.system(), TimeControlSystem::Simple { per_move: 86400 });

        let tc = decode(json!({"time_control": "absolute", "total_time": 1800}));
        assert_eq!(tc.system(), TimeControlSystem::Absolute { total_time: 1800 });
    }

    #[test]
    fn unknown_or_incomplete_is_none() {
        assert_eq!(decode(json!({"time_control": "none"})).system(), TimeControlSystem::None);
        assert_eq!(decode(json!({"time_control": "hourglass"})).system(), TimeControlSystem::None);
        assert_eq!(
            decode(json!({"time_control": "byoyomi", "main_time": 600})).system(),
            TimeControlSystem::None
        );
        assert_eq!(decode(json!({})).system(), TimeControlSystem::None);
    }
}

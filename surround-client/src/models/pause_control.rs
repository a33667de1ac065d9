use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPause {
    pub pauses_left: Option<i64>,
    pub pausing_player_id: Option<i64>,
}

/// Reasons the service currently has the game clock stopped.
///
/// Decoded from a map whose keys are `paused`, `weekend`, `system`,
/// `stone-removal` and one `vacation-<player id>` per player on vacation.
/// Other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Value>")]
pub struct PauseControl {
    pub paused: Option<UserPause>,
    pub weekend: bool,
    pub system: bool,
    pub stone_removal: bool,
    pub vacation_player_ids: Vec<i64>,
}

impl PauseControl {
    pub fn is_paused(&self) -> bool {
        self.paused.is_some()
            || self.weekend
            || self.system
            || self.stone_removal
            || !self.vacation_player_ids.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Value>> for PauseControl {
    type Error = String;

    fn try_from(map: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        let mut control = PauseControl::default();
        for (key, value) in map {
            match key.as_str() {
                "paused" => {
                    let detail = serde_json::from_value(value)
                        .map_err(|e| format!("bad pause detail: {e}"))?;
                    control.paused = Some(detail);
                }
                "weekend" => control.weekend = flag(&key, &value)?,
                "system" => control.system = flag(&key, &value)?,
                "stone-removal" => control.stone_removal = flag(&key, &value)?,
                other => {
                    if let Some(id) = other
                        .strip_prefix("vacation-")
                        .and_then(|id| id.parse().ok())
                    {
                        control.vacation_player_ids.push(id);
                    }
                }
            }
        }
        Ok(control)
    }
}

fn flag(key: &str, value: &Value) -> Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("pause flag {key} is not a boolean"))
}

//! JSON wire format spoken by the world server
//!
//! Every inbound message is a JSON object whose keys are all optional:
//!
//! ```text
//! {"authenticated": true}
//! {"food_dist": {"size": 64, "food_fields": [{"x_min": 0, "y_min": 0, "width": 8, "values": [[...8 bools...], ...]}]},
//!  "creatures": [{"x": 32.0, "y": 32.0, "radius": 2.0, "direction": 0.0, "speed": 0.1}]}
//! ```
//!
//! Keys the client does not understand (e.g. a creature's `speed`) are
//! ignored. A key set to `null` counts as absent.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::world::{Creature, FoodTile, WorldUpdate};

/// One decoded server message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerMessage {
    /// Login acknowledgement. Only its presence matters, not its value.
    #[serde(default)]
    pub authenticated: Option<serde_json::Value>,
    #[serde(default)]
    pub food_dist: Option<FoodDistribution>,
    #[serde(default)]
    pub creatures: Option<Vec<Creature>>,
}

/// The `food_dist` payload: world size plus the food tiles.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FoodDistribution {
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub food_fields: Option<Vec<FoodTile>>,
}

impl ServerMessage {
    /// Parse one text frame. Structural problems (bad JSON, a 7-row food
    /// matrix, a creature without `x`) fail the whole message.
    pub fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// True when the message carries the `authenticated` key, whatever its
    /// value. A `null` value counts as absent.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.is_some()
    }

    /// The world fields carried by this message.
    pub fn into_update(self) -> WorldUpdate {
        let (size, food_fields) = match self.food_dist {
            Some(FoodDistribution { size, food_fields }) => (size, food_fields),
            None => (None, None),
        };
        WorldUpdate {
            size,
            food_fields,
            creatures: self.creatures,
        }
    }
}

/// A request to the world server. Flags left `false` are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorldRequest {
    #[serde(skip_serializing_if = "is_false")]
    pub full_map_requested: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub food_dist_requested: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub reset_world: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterate_n_steps: Option<u32>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl WorldRequest {
    /// Ask for the complete food distribution and creature list.
    pub fn full_map() -> Self {
        Self {
            full_map_requested: true,
            ..Self::default()
        }
    }

    /// Advance the simulation by `steps` and send back the food distribution.
    pub fn iterate(steps: u32) -> Self {
        Self {
            iterate_n_steps: Some(steps),
            food_dist_requested: true,
            ..Self::default()
        }
    }

    /// Reset the world and send back the fresh food distribution.
    pub fn reset() -> Self {
        Self {
            reset_world: true,
            food_dist_requested: true,
            ..Self::default()
        }
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

use serde::{Deserialize, Serialize};

use crate::base::BaseModel;

/// A city, linked to its state by `state_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(flatten)]
    pub(crate) base: BaseModel,
    #[serde(default)]
    pub state_id: String,
    #[serde(default)]
    pub name: String,
}

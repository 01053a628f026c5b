use serde::{Deserialize, Serialize};

use crate::base::BaseModel;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    #[serde(flatten)]
    pub(crate) base: BaseModel,
    #[serde(default)]
    pub name: String,
}

use serde::{Deserialize, Serialize};

use crate::base::BaseModel;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(flatten)]
    pub(crate) base: BaseModel,
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

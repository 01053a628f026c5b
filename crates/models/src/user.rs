use serde::{Deserialize, Serialize};

use crate::base::BaseModel;

/// An account holder. Owns places and writes reviews.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(flatten)]
    pub(crate) base: BaseModel,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

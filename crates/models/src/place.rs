use serde::{Deserialize, Serialize};

use crate::base::BaseModel;

/// A rental listing in a city, owned by a user.
///
/// `amenity_ids` holds ids of [`Amenity`](crate::Amenity) objects; nothing
/// checks that they exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(flatten)]
    pub(crate) base: BaseModel,
    #[serde(default)]
    pub city_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub number_rooms: u32,
    #[serde(default)]
    pub number_bathrooms: u32,
    #[serde(default)]
    pub max_guest: u32,
    #[serde(default)]
    pub price_by_night: u32,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub amenity_ids: Vec<String>,
}

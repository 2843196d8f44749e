//! The dispatch sheet: a generation report plus the routes it created, as
//! TOML for whoever loads the vans.

use super::service::GenerationReport;
use crate::model::DeliveryRoute;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchSheet {
    pub report: GenerationReport,
    #[serde(default)]
    pub routes: Vec<DeliveryRoute>,
}

impl DispatchSheet {
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

//! BrasilAPI `/api/cep/v1/{cep}` response shape.

use serde::{Deserialize, Serialize};

use crate::source::AddressSummary;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BrasilApiAddress {
    pub cep: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub service: String,
}

impl BrasilApiAddress {
    pub fn summary(&self) -> AddressSummary<'_> {
        AddressSummary {
            cep: &self.cep,
            state: &self.state,
            city: &self.city,
            neighborhood: &self.neighborhood,
            street: &self.street,
        }
    }
}

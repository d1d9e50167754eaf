//! ViaCEP `/ws/{cep}/json` response shape.

use serde::{Deserialize, Serialize};

use crate::source::AddressSummary;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViaCepAddress {
    pub cep: String,
    pub logradouro: String,
    pub complemento: String,
    pub unidade: String,
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
    pub estado: String,
    pub regiao: String,
    pub ibge: String,
    pub gia: String,
    pub ddd: String,
    pub siafi: String,
}

impl ViaCepAddress {
    /// Project onto the common fields. `uf` is the state, `localidade` the city.
    pub fn summary(&self) -> AddressSummary<'_> {
        AddressSummary {
            cep: &self.cep,
            state: &self.uf,
            city: &self.localidade,
            neighborhood: &self.bairro,
            street: &self.logradouro,
        }
    }
}

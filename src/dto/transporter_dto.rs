use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

use super::form::{canonical_field, parse_text, FieldSpec, FormInput};
use crate::utils::errors::AppResult;
use crate::utils::validation::{strip_non_digits, validate_cnpj};

// Borrador para crear o actualizar una transportadora
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TransporterInput {
    #[validate(length(min = 1, max = 120, message = "Informe o nome da transportadora"))]
    pub name: String,

    // El backend guarda solo los dígitos
    #[validate(
        length(min = 1, message = "Informe o CNPJ"),
        custom = "validate_cnpj"
    )]
    #[serde(serialize_with = "serialize_digits")]
    pub cnpj: String,
}

fn serialize_digits<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&strip_non_digits(value))
}

impl FormInput for TransporterInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", "Nome da transportadora"),
        FieldSpec::required("cnpj", "CNPJ da transportadora"),
    ];

    fn set_field(&mut self, field: &str, value: &str) -> AppResult<()> {
        match canonical_field(Self::FIELDS, field)? {
            "name" => self.name = parse_text(value),
            _ => self.cnpj = parse_text(value),
        }
        Ok(())
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "cnpj" => Some(self.cnpj.clone()),
            _ => None,
        }
    }
}

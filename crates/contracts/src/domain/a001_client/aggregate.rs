use crate::domain::common::validation::{check_email, normalize, require_text};
use crate::domain::common::BaseAggregate;
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
crate::uuid_aggregate_id!(
    /// Идентификатор клиента
    ClientId
);

// ============================================================================
// Aggregate Root
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    #[serde(flatten)]
    pub base: BaseAggregate<ClientId>,

    /// NIF/CIF
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Client {
    pub fn new_for_insert(code: String, dto: &ClientDto) -> Self {
        let mut client = Self {
            base: BaseAggregate::new(ClientId::new_v4(), code, String::new()),
            tax_id: None,
            email: None,
            phone: None,
            address: None,
            city: None,
            postal_code: None,
            country: None,
        };
        client.update(dto);
        client
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.to_string()
    }

    pub fn update(&mut self, dto: &ClientDto) {
        if let Some(code) = normalize(dto.code.clone()) {
            self.base.code = code;
        }
        self.base.description = dto.name.trim().to_string();
        self.base.comment = normalize(dto.comment.clone());
        self.tax_id = normalize(dto.tax_id.clone());
        self.email = normalize(dto.email.clone());
        self.phone = normalize(dto.phone.clone());
        self.address = normalize(dto.address.clone());
        self.city = normalize(dto.city.clone());
        self.postal_code = normalize(dto.postal_code.clone());
        self.country = normalize(dto.country.clone());
    }

    pub fn validate(&self) -> Result<(), String> {
        require_text(&self.base.description, "Name")?;
        require_text(&self.base.code, "Code")?;
        check_email(self.email.as_deref())
    }

    pub fn before_write(&mut self) {
        self.base.before_write();
    }

    /// Совпадение с поисковой строкой (код, имя, NIF, email)
    pub fn matches(&self, q: &str) -> bool {
        let q = q.to_lowercase();
        [
            Some(&self.base.code),
            Some(&self.base.description),
            self.tax_id.as_ref(),
            self.email.as_ref(),
        ]
        .into_iter()
        .flatten()
        .any(|v| v.to_lowercase().contains(&q))
    }
}

crate::impl_aggregate_root!(Client, ClientId, "a001", "client", "Cliente", "Clientes");

// ============================================================================
// DTO
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_fails_validation() {
        let dto = ClientDto {
            name: "   ".into(),
            ..Default::default()
        };
        let client = Client::new_for_insert("CLI-0001".into(), &dto);
        assert!(client.validate().is_err());
    }

    #[test]
    fn test_update_keeps_code_when_not_supplied() {
        let dto = ClientDto {
            name: "Talleres Ruiz".into(),
            ..Default::default()
        };
        let mut client = Client::new_for_insert("CLI-0007".into(), &dto);
        client.update(&ClientDto {
            name: "Talleres Ruiz S.L.".into(),
            city: Some("Bilbao".into()),
            ..Default::default()
        });
        assert_eq!(client.base.code, "CLI-0007");
        assert_eq!(client.base.description, "Talleres Ruiz S.L.");
        assert_eq!(client.city.as_deref(), Some("Bilbao"));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let dto = ClientDto {
            name: "Frutas Levante".into(),
            tax_id: Some("B12345678".into()),
            ..Default::default()
        };
        let client = Client::new_for_insert("CLI-0002".into(), &dto);
        assert!(client.matches("levante"));
        assert!(client.matches("b1234"));
        assert!(!client.matches("madrid"));
    }
}

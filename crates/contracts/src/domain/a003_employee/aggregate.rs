use crate::domain::common::validation::{check_email, normalize, require_text};
use crate::domain::common::BaseAggregate;
use crate::enums::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

crate::uuid_aggregate_id!(
    /// Идентификатор сотрудника
    EmployeeId
);

/// Минимальная длина пароля
pub const MIN_PASSWORD_LEN: usize = 6;

/// Сотрудник. Он же учётная запись для входа в консоль (логин = email).
///
/// Хэш пароля хранится отдельно от агрегата и никогда не сериализуется.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(flatten)]
    pub base: BaseAggregate<EmployeeId>,

    pub email: String,
    pub phone: Option<String>,
    /// Должность
    pub position: Option<String>,
    pub role: Role,
    pub is_blocked: bool,
    pub hired_on: Option<NaiveDate>,
}

impl Employee {
    pub fn new_for_insert(code: String, dto: &EmployeeDto) -> Self {
        let mut employee = Self {
            base: BaseAggregate::new(EmployeeId::new_v4(), code, String::new()),
            email: String::new(),
            phone: None,
            position: None,
            role: dto.role,
            is_blocked: false,
            hired_on: None,
        };
        employee.update(dto);
        employee
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.to_string()
    }

    pub fn update(&mut self, dto: &EmployeeDto) {
        if let Some(code) = normalize(dto.code.clone()) {
            self.base.code = code;
        }
        self.base.description = dto.name.trim().to_string();
        self.base.comment = normalize(dto.comment.clone());
        self.email = dto.email.trim().to_lowercase();
        self.phone = normalize(dto.phone.clone());
        self.position = normalize(dto.position.clone());
        self.role = dto.role;
        self.is_blocked = dto.is_blocked;
        self.hired_on = dto.hired_on;
    }

    pub fn validate(&self) -> Result<(), String> {
        require_text(&self.base.description, "Name")?;
        require_text(&self.base.code, "Code")?;
        require_text(&self.email, "Email")?;
        check_email(Some(&self.email))
    }

    pub fn before_write(&mut self) {
        self.base.before_write();
    }

    /// Активный администратор: роль Admin и не заблокирован
    pub fn is_active_admin(&self) -> bool {
        self.role == Role::Admin && !self.is_blocked
    }

    pub fn matches(&self, q: &str) -> bool {
        let q = q.to_lowercase();
        self.base.code.to_lowercase().contains(&q)
            || self.base.description.to_lowercase().contains(&q)
            || self.email.contains(&q)
    }
}

crate::impl_aggregate_root!(
    Employee,
    EmployeeId,
    "a003",
    "employee",
    "Empleado",
    "Empleados"
);

/// Проверка сложности пароля
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub is_blocked: bool,
    pub hired_on: Option<NaiveDate>,
    pub comment: Option<String>,
    /// Обязателен при создании, игнорируется при обновлении
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    /// None, если администратор меняет чужой пароль
    pub old_password: Option<String>,
    pub new_password: String,
}

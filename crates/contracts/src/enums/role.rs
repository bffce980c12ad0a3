use serde::{Deserialize, Serialize};

/// Роль сотрудника
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Sales,
    Warehouse,
}

/// Раздел консоли, доступ к которому зависит от роли
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Dashboard,
    Clients,
    Suppliers,
    Employees,
    Products,
    Warehouses,
    Invoices,
    Notifications,
    ActivityLog,
}

/// Уровень доступа. Порядок важен: None < Read < Write
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Access {
    None,
    Read,
    Write,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionAccess {
    pub section: Section,
    pub access: Access,
}

impl Role {
    pub fn code(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Sales => "sales",
            Role::Warehouse => "warehouse",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Manager => "Gerente",
            Role::Sales => "Vendedor",
            Role::Warehouse => "Almacenero",
        }
    }

    pub fn all() -> Vec<Role> {
        vec![Role::Admin, Role::Manager, Role::Sales, Role::Warehouse]
    }

    /// Матрица доступа роль × раздел
    pub fn access(&self, section: Section) -> Access {
        use Access::{None as No, Read as R, Write as W};

        match (self, section) {
            (Role::Admin, _) => W,

            (Role::Manager, Section::Dashboard) => R,
            (Role::Manager, Section::Employees) => R,
            (Role::Manager, Section::Notifications) => R,
            (Role::Manager, Section::ActivityLog) => R,
            (Role::Manager, _) => W,

            (Role::Sales, Section::Dashboard) => R,
            (Role::Sales, Section::Clients) => W,
            (Role::Sales, Section::Products) => R,
            (Role::Sales, Section::Warehouses) => R,
            (Role::Sales, Section::Invoices) => W,
            (Role::Sales, Section::Notifications) => R,
            (Role::Sales, _) => No,

            (Role::Warehouse, Section::Dashboard) => R,
            (Role::Warehouse, Section::Suppliers) => R,
            (Role::Warehouse, Section::Products) => W,
            (Role::Warehouse, Section::Warehouses) => W,
            (Role::Warehouse, Section::Invoices) => R,
            (Role::Warehouse, Section::Notifications) => R,
            (Role::Warehouse, _) => No,
        }
    }

    pub fn can(&self, section: Section, required: Access) -> bool {
        self.access(section) >= required
    }

    /// Полный список разделов с уровнем доступа (для гейтинга UI)
    pub fn permissions(&self) -> Vec<SectionAccess> {
        Section::all()
            .into_iter()
            .map(|section| SectionAccess {
                section,
                access: self.access(section),
            })
            .collect()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Section {
    pub fn all() -> Vec<Section> {
        vec![
            Section::Dashboard,
            Section::Clients,
            Section::Suppliers,
            Section::Employees,
            Section::Products,
            Section::Warehouses,
            Section::Invoices,
            Section::Notifications,
            Section::ActivityLog,
        ]
    }
}

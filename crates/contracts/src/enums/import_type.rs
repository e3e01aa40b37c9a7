use serde::{Deserialize, Serialize};

/// Тип данных, загружаемых из файла
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportType {
    Customers,
    Leads,
    Sales,
}

impl ImportType {
    pub fn code(&self) -> &'static str {
        match self {
            ImportType::Customers => "customers",
            ImportType::Leads => "leads",
            ImportType::Sales => "sales",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ImportType::Customers => "Clientes",
            ImportType::Leads => "Leads",
            ImportType::Sales => "Ventas",
        }
    }

    /// Склейка/разбиение имени выполняется только для людей, не для продаж
    pub fn reconciles_names(&self) -> bool {
        matches!(self, ImportType::Customers | ImportType::Leads)
    }

    pub fn all() -> Vec<ImportType> {
        vec![ImportType::Customers, ImportType::Leads, ImportType::Sales]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "customers" => Some(ImportType::Customers),
            "leads" => Some(ImportType::Leads),
            "sales" => Some(ImportType::Sales),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

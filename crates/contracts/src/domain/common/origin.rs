use serde::{Deserialize, Serialize};

/// Источник записи агрегата
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Создана вручную через форму CRM
    #[serde(rename = "self")]
    Self_,
    /// Загружена из CSV/XLSX файла
    #[serde(rename = "import")]
    Import,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Self_ => "self",
            Origin::Import => "import",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "import" => Origin::Import,
            _ => Origin::Self_,
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

use serde::{Deserialize, Serialize};

/// Продуктовая линия, к которой относится клиент, лид или продажа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Brand {
    Sleepwear,
    Bride,
}

impl Brand {
    /// Идентификатор бренда, как он хранится в БД и приходит из файлов
    pub fn code(&self) -> &'static str {
        match self {
            Brand::Sleepwear => "sleepwear",
            Brand::Bride => "bride",
        }
    }

    /// Фрагменты названий, по которым бренд угадывается в свободном тексте
    pub fn name_fragments(&self) -> &'static [&'static str] {
        match self {
            Brand::Sleepwear => &["sleep", "pijama", "pyjama", "pajama", "dormir", "lenceria"],
            Brand::Bride => &["brid", "novia", "boda", "wedding", "nupcial"],
        }
    }

    pub fn all() -> Vec<Brand> {
        vec![Brand::Sleepwear, Brand::Bride]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "sleepwear" => Some(Brand::Sleepwear),
            "bride" => Some(Brand::Bride),
            _ => None,
        }
    }

    /// Разбор строки вида "sleepwear,bride"; неизвестные коды отбрасываются
    pub fn parse_list(value: &str) -> Vec<Brand> {
        let mut brands = Vec::new();
        for token in value.split(',') {
            if let Some(brand) = Brand::from_code(token.trim()) {
                if !brands.contains(&brand) {
                    brands.push(brand);
                }
            }
        }
        brands
    }

    pub fn join(brands: &[Brand]) -> String {
        brands
            .iter()
            .map(|b| b.code())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl std::fmt::Display for Brand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_skips_unknown_and_duplicates() {
        let brands = Brand::parse_list("bride, xyz,bride ,sleepwear");
        assert_eq!(brands, vec![Brand::Bride, Brand::Sleepwear]);
        assert_eq!(Brand::join(&brands), "bride,sleepwear");
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(Brand::parse_list("").is_empty());
    }
}

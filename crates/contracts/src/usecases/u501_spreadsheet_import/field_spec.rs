use serde::{Deserialize, Serialize};

use crate::enums::ImportType;

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const PHONE_COUNTRY: &str = "phoneCountry";
pub const PHONE_NUMBER: &str = "phoneNumber";
pub const IDENTIFICATION: &str = "identification";
pub const ADDRESS: &str = "address";
pub const CITY: &str = "city";
pub const PROVINCE: &str = "province";
pub const BRAND: &str = "brand";
pub const NOTES: &str = "notes";
pub const SOURCE: &str = "source";
pub const STATUS: &str = "status";
pub const ORDER_NUMBER: &str = "orderNumber";
pub const CUSTOMER_NAME: &str = "customerName";
pub const TOTAL_AMOUNT: &str = "totalAmount";
pub const SALE_DATE: &str = "saleDate";
pub const PAYMENT_METHOD: &str = "paymentMethod";

/// Описание целевого поля CRM, на которое сопоставляется колонка файла
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFieldSpec {
    pub name: String,
    pub required: bool,
    pub description: String,
}

impl TargetFieldSpec {
    fn new(name: &str, required: bool, description: &str) -> Self {
        Self {
            name: name.to_string(),
            required,
            description: description.to_string(),
        }
    }
}

/// Фиксированный список целевых полей для типа импорта.
/// Порядок списка задаёт приоритет при нечётком сопоставлении и порядок колонок шаблона.
pub fn target_fields(import_type: ImportType) -> Vec<TargetFieldSpec> {
    match import_type {
        ImportType::Customers => vec![
            TargetFieldSpec::new(FIRST_NAME, true, "Nombres del cliente"),
            TargetFieldSpec::new(LAST_NAME, true, "Apellidos del cliente"),
            TargetFieldSpec::new(NAME, false, "Nombre completo; se genera si falta"),
            TargetFieldSpec::new(EMAIL, false, "Correo electrónico"),
            TargetFieldSpec::new(PHONE_COUNTRY, false, "Código de país, p. ej. +593"),
            TargetFieldSpec::new(PHONE_NUMBER, false, "Número de teléfono"),
            TargetFieldSpec::new(IDENTIFICATION, false, "Cédula o RUC"),
            TargetFieldSpec::new(ADDRESS, false, "Dirección"),
            TargetFieldSpec::new(CITY, false, "Ciudad"),
            TargetFieldSpec::new(PROVINCE, false, "Provincia"),
            TargetFieldSpec::new(BRAND, false, "Marca: sleepwear, bride"),
            TargetFieldSpec::new(NOTES, false, "Notas"),
        ],
        ImportType::Leads => vec![
            TargetFieldSpec::new(FIRST_NAME, true, "Nombres del lead"),
            TargetFieldSpec::new(LAST_NAME, true, "Apellidos del lead"),
            TargetFieldSpec::new(NAME, false, "Nombre completo; se genera si falta"),
            TargetFieldSpec::new(EMAIL, false, "Correo electrónico"),
            TargetFieldSpec::new(PHONE_COUNTRY, false, "Código de país, p. ej. +593"),
            TargetFieldSpec::new(PHONE_NUMBER, false, "Número de teléfono"),
            TargetFieldSpec::new(SOURCE, false, "Origen del lead"),
            TargetFieldSpec::new(STATUS, false, "Estado: nuevo, contactado, calificado..."),
            TargetFieldSpec::new(BRAND, false, "Marca: sleepwear, bride"),
            TargetFieldSpec::new(NOTES, false, "Notas"),
        ],
        ImportType::Sales => vec![
            TargetFieldSpec::new(ORDER_NUMBER, false, "Número de pedido"),
            TargetFieldSpec::new(CUSTOMER_NAME, true, "Nombre del cliente"),
            TargetFieldSpec::new(TOTAL_AMOUNT, true, "Monto total"),
            TargetFieldSpec::new(SALE_DATE, false, "Fecha de venta"),
            TargetFieldSpec::new(EMAIL, false, "Correo electrónico"),
            TargetFieldSpec::new(PHONE_COUNTRY, false, "Código de país, p. ej. +593"),
            TargetFieldSpec::new(PHONE_NUMBER, false, "Número de teléfono"),
            TargetFieldSpec::new(PAYMENT_METHOD, false, "Forma de pago"),
            TargetFieldSpec::new(BRAND, false, "Marca: sleepwear, bride"),
            TargetFieldSpec::new(NOTES, false, "Notas"),
        ],
    }
}

/// Пример строки для шаблона загрузки, в порядке `target_fields`
pub fn example_rows(import_type: ImportType) -> Vec<Vec<&'static str>> {
    match import_type {
        ImportType::Customers => vec![
            vec![
                "María José", "Andrade Ruiz", "", "maria.andrade@example.com", "+593",
                "0991234567", "1712345678", "Av. Amazonas N34-12", "Quito", "Pichincha",
                "sleepwear", "",
            ],
            vec![
                "Carlos", "Vera", "", "carlos.vera@example.com", "+593", "0987654321", "",
                "", "Guayaquil", "Guayas", "bride,sleepwear", "Cliente frecuente",
            ],
        ],
        ImportType::Leads => vec![
            vec![
                "Lucía", "Paredes", "", "lucia.p@example.com", "+593", "0998887766",
                "instagram", "nuevo", "bride", "",
            ],
            vec![
                "Andrés", "Salazar", "", "", "+57", "3001234567", "feria", "contactado",
                "sleepwear", "Llamar en la tarde",
            ],
        ],
        ImportType::Sales => vec![
            vec![
                "PED-1001", "María José Andrade", "89.90", "2024-03-15",
                "maria.andrade@example.com", "+593", "0991234567", "transferencia",
                "sleepwear", "",
            ],
            vec![
                "PED-1002", "Carlos Vera", "450.00", "2024-03-16", "", "+593", "0987654321",
                "tarjeta", "bride", "Entrega en tienda",
            ],
        ],
    }
}

use super::field_spec::*;

/// Известные заголовки колонок для каждого целевого поля.
/// Файлы приходят из испаноязычных таблиц, поэтому словарь в основном испанский.
/// Сравнение идёт без учёта регистра.
pub fn alternative_names(target: &str) -> &'static [&'static str] {
    match target {
        FIRST_NAME => &[
            "nombres", "nombre", "primer nombre", "first name", "firstname", "given name",
        ],
        LAST_NAME => &[
            "apellidos", "apellido", "last name", "lastname", "surname", "family name",
        ],
        NAME => &[
            "nombre completo", "nombres y apellidos", "cliente", "full name", "fullname",
            "contacto",
        ],
        EMAIL => &[
            "correo", "correo electrónico", "correo electronico", "e-mail", "mail", "email address",
        ],
        PHONE_COUNTRY => &[
            "código de país", "codigo de pais", "código país", "cod pais", "prefijo",
            "country code", "indicativo",
        ],
        PHONE_NUMBER => &[
            "teléfono", "telefono", "num telefono", "n° telefono", "número de teléfono",
            "numero de telefono", "celular", "móvil", "movil", "whatsapp", "phone", "mobile",
        ],
        IDENTIFICATION => &["cédula", "cedula", "ruc", "identificación", "documento", "dni"],
        ADDRESS => &["dirección", "direccion", "domicilio", "street"],
        CITY => &["ciudad", "cantón", "canton", "town"],
        PROVINCE => &["provincia", "estado", "region", "state"],
        BRAND => &["marca", "marcas", "línea", "linea", "brands"],
        NOTES => &["notas", "observaciones", "comentarios", "comment", "comments"],
        SOURCE => &["origen", "fuente", "canal", "lead source"],
        STATUS => &["estado", "estado del lead", "estatus", "etapa", "lead status"],
        ORDER_NUMBER => &[
            "número de pedido", "numero de pedido", "pedido", "orden", "n° orden", "order",
            "order id",
        ],
        CUSTOMER_NAME => &["cliente", "nombre del cliente", "comprador", "customer", "customer name"],
        TOTAL_AMOUNT => &["total", "monto", "monto total", "valor", "importe", "amount"],
        SALE_DATE => &["fecha", "fecha de venta", "fecha venta", "date", "sale date"],
        PAYMENT_METHOD => &["forma de pago", "método de pago", "metodo de pago", "pago", "payment"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_are_lowercase() {
        for field in [FIRST_NAME, LAST_NAME, EMAIL, PHONE_NUMBER, TOTAL_AMOUNT, BRAND] {
            for synonym in alternative_names(field) {
                assert_eq!(*synonym, synonym.to_lowercase());
            }
        }
    }

    #[test]
    fn test_unknown_target_has_no_synonyms() {
        assert!(alternative_names("favouriteColour").is_empty());
    }
}

//! Нормализация и проверка полей, общих для клиентов, лидов и продаж

pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn display_name(name: Option<&str>, first_name: &str, last_name: &str) -> String {
    match non_empty(name) {
        Some(name) => name,
        None => format!("{} {}", first_name, last_name).trim().to_string(),
    }
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(format!("Invalid email: {}", email));
    }
    Ok(())
}

pub fn validate_country_code(country: &str) -> Result<(), String> {
    let digits = country.trim_start_matches('+');
    if digits.is_empty() || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("Invalid phone country code: {}", country));
    }
    Ok(())
}

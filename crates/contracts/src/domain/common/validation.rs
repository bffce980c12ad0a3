//! Общие проверки полей DTO

/// Непустая строка после trim
pub fn require_text(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    Ok(())
}

/// Email, если указан, должен содержать '@'
pub fn check_email(email: Option<&str>) -> Result<(), String> {
    match email.map(str::trim) {
        Some(e) if !e.is_empty() && !e.contains('@') => Err("Invalid email format".into()),
        _ => Ok(()),
    }
}

/// Пустые строки из формы превращаем в None
pub fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

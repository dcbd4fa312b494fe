// src/common/dates.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// A API devolve datas em três formatos diferentes dependendo do endpoint:
// ISO completo com timezone, "YYYY-MM-DD" seco, ou epoch em milissegundos.
// Um registro com data quebrada NÃO derruba a lista: vira None e a tela
// mostra "no date".

/// Tenta todos os formatos conhecidos; lixo vira None.
pub fn parse_flexible(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_flexible_str(s),
        Value::Number(n) => n.as_i64().and_then(from_epoch),
        _ => None,
    }
}

pub fn parse_flexible_str(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    // ISO sem timezone ("2024-03-01T10:30:00")
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    // Data seca vira meia-noite UTC
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    // Epoch digitado como string
    if let Ok(epoch) = trimmed.parse::<i64>() {
        return from_epoch(epoch);
    }

    None
}

// Heurística: valores acima de ~2286 em segundos só fazem sentido como millis.
// unsigned_abs porque i64::MIN não tem abs representável.
fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    if value.unsigned_abs() >= 100_000_000_000 {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

/// Data de vencimento: só o dia importa, sem hora.
pub fn parse_flexible_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .or_else(|| parse_flexible_str(trimmed).map(|dt| dt.date_naive()))
        }
        Value::Number(_) => parse_flexible(value).map(|dt| dt.date_naive()),
        _ => None,
    }
}

// --- Adaptadores serde ---

pub fn flexible_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_flexible(&value))
}

pub fn flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_flexible_date(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rfc3339() {
        let dt = parse_flexible(&json!("2024-03-01T10:30:00Z")).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T10:30:00+00:00");
    }

    #[test]
    fn parses_naive_datetime() {
        assert!(parse_flexible(&json!("2024-03-01T10:30:00")).is_some());
        assert!(parse_flexible(&json!("2024-03-01T10:30:00.250")).is_some());
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let dt = parse_flexible(&json!("2024-03-01")).unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn parses_epoch_seconds_and_millis() {
        let secs = parse_flexible(&json!(1_709_287_800)).unwrap();
        let millis = parse_flexible(&json!(1_709_287_800_000i64)).unwrap();
        assert_eq!(secs, millis);
    }

    #[test]
    fn garbage_becomes_none() {
        assert!(parse_flexible(&json!("not-a-date")).is_none());
        assert!(parse_flexible(&json!("")).is_none());
        assert!(parse_flexible(&json!(null)).is_none());
        assert!(parse_flexible(&json!({ "d": 1 })).is_none());
        // Extremos de i64 não podem derrubar o parse.
        assert!(parse_flexible(&json!(i64::MIN)).is_none());
        assert!(parse_flexible(&json!(i64::MAX)).is_none());
    }

    #[test]
    fn due_date_accepts_full_timestamp() {
        let date = parse_flexible_date(&json!("2024-03-15T08:00:00Z")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }
}

// src/common/money.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

// Os payloads remotos misturam número e string no mesmo campo de valor
// ("amount": 10.5 em uma resposta, "amount": "10.50" em outra) e às vezes
// omitem o campo. Esta é a ÚNICA porta de entrada para valores monetários:
// tudo que vem da API passa por aqui antes de virar Decimal.

/// Converte qualquer valor JSON em um Decimal não-negativo.
/// Entrada imprestável (string aleatória, objeto, null) vira zero;
/// nunca derruba a tela por causa de um registro malformado.
pub fn parse_amount(value: &Value) -> Decimal {
    match value {
        // serde_json imprime o menor decimal exato, então "10.08" não vira 10.079999
        Value::Number(n) => parse_amount_str(&n.to_string()),
        Value::String(s) => parse_amount_str(s),
        _ => Decimal::ZERO,
    }
}

/// Versão para texto cru (campo digitado pelo operador ou string do payload).
/// Aceita "$1,250.00" porque o admin cola valores com cifrão direto do extrato.
pub fn parse_amount_str(raw: &str) -> Decimal {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let parsed = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .unwrap_or(Decimal::ZERO);

    clamp_non_negative(parsed)
}

fn clamp_non_negative(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value
    }
}

// --- Adaptadores serde ---
// Usados nos structs de wire com `#[serde(default, deserialize_with = ...)]`.

/// Campo de valor tolerante: número, string numérica ou lixo → Decimal >= 0.
pub fn flexible_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_amount(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_amount(&json!(100)), Decimal::from(100));
        assert_eq!(parse_amount(&json!(10.08)), Decimal::from_str("10.08").unwrap());
    }

    #[test]
    fn parses_numeric_strings() {
        assert_eq!(parse_amount(&json!("108")), Decimal::from(108));
        assert_eq!(parse_amount(&json!("99.90")), Decimal::from_str("99.90").unwrap());
        assert_eq!(parse_amount(&json!("  42.5 ")), Decimal::from_str("42.5").unwrap());
    }

    #[test]
    fn tolerates_currency_decorations() {
        assert_eq!(parse_amount(&json!("$1,250.00")), Decimal::from_str("1250.00").unwrap());
    }

    #[test]
    fn defaults_to_zero_on_garbage() {
        assert_eq!(parse_amount(&json!(null)), Decimal::ZERO);
        assert_eq!(parse_amount(&json!("abc")), Decimal::ZERO);
        assert_eq!(parse_amount(&json!({ "nested": 1 })), Decimal::ZERO);
        assert_eq!(parse_amount(&json!([1, 2])), Decimal::ZERO);
        assert_eq!(parse_amount(&json!(true)), Decimal::ZERO);
    }

    #[test]
    fn clamps_negative_to_zero() {
        assert_eq!(parse_amount(&json!(-5)), Decimal::ZERO);
        assert_eq!(parse_amount(&json!("-12.30")), Decimal::ZERO);
    }

    #[test]
    fn does_not_truncate_cents() {
        // 0.1 + 0.2 clássico: o caminho por string preserva os centavos
        assert_eq!(parse_amount(&json!("0.30")), Decimal::from_str("0.30").unwrap());
        assert_eq!(parse_amount(&json!(1234.56)), Decimal::from_str("1234.56").unwrap());
    }

    #[test]
    fn accepts_scientific_notation_strings() {
        assert_eq!(parse_amount(&json!("1e3")), Decimal::from(1000));
    }

    proptest! {
        #[test]
        fn any_float_yields_non_negative(x in proptest::num::f64::ANY) {
            let value = serde_json::Number::from_f64(x)
                .map(Value::Number)
                .unwrap_or(Value::Null);
            let amount = parse_amount(&value);
            prop_assert!(amount >= Decimal::ZERO);
        }

        #[test]
        fn any_string_never_panics(s in ".*") {
            let amount = parse_amount(&Value::String(s));
            prop_assert!(amount >= Decimal::ZERO);
        }
    }
}

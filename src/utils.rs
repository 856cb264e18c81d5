use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// Folds an account label into its comparison form: lowercase, accents
/// stripped, and everything except ASCII letters and digits removed.
///
/// # Examples
/// - "Depreciación y Amortización" -> "depreciacionyamortizacion"
/// - "Total Activo (Circulante)" -> "totalactivocirculante"
pub fn normalize(text: &str) -> String {
    text.nfd()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Classic edit distance with unit cost for insertion, deletion and
/// substitution. Transpositions count as two edits.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        current[0] = i + 1;

        for (j, b_char) in b_chars.iter().enumerate() {
            current[j + 1] = if a_char == *b_char {
                previous[j]
            } else {
                1 + previous[j].min(previous[j + 1]).min(current[j])
            };
        }

        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

/// Best-effort numeric reading of an arbitrary JSON value.
///
/// Numbers pass through, numeric strings are parsed, booleans count as 1/0
/// and anything else (null, arrays, objects, free text) reads as zero.
/// Non-finite results are also reported as zero.
pub fn coerce_number(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };

    finite_or_zero(number)
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Division that reports zero instead of NaN or infinity when the
/// denominator is zero.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || denominator.is_nan() {
        return 0.0;
    }
    numerator / denominator
}

/// Treats zero as "absent", falling back to `fallback`.
pub fn non_zero_or(value: f64, fallback: f64) -> f64 {
    if value != 0.0 {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_strips_accents_and_punctuation() {
        assert_eq!(normalize("Depreciación y Amortización"), "depreciacionyamortizacion");
        assert_eq!(normalize("Total Activo (Circulante)"), "totalactivocirculante");
        assert_eq!(normalize("SUPERÁVIT"), "superavit");
        assert_eq!(normalize("Año 2023"), "ano2023");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("inventario", "inventarios"), 1);
        assert_eq!(levenshtein_distance("inventario", "imventaroi"), 3);
        assert_eq!(levenshtein_distance("same", "same"), 0);
        // no transposition shortcut
        assert_eq!(levenshtein_distance("ab", "ba"), 2);
    }

    #[test]
    fn test_levenshtein_is_symmetric() {
        let pairs = [("pasivoacortoplazo", "pasivoscortoplazo"), ("ventas", "costodeventa")];
        for (a, b) in pairs {
            assert_eq!(levenshtein_distance(a, b), levenshtein_distance(b, a));
        }
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(12.5)), 12.5);
        assert_eq!(coerce_number(&json!(" 300 ")), 300.0);
        assert_eq!(coerce_number(&json!("n/a")), 0.0);
        assert_eq!(coerce_number(&json!(null)), 0.0);
        assert_eq!(coerce_number(&json!(true)), 1.0);
        assert_eq!(coerce_number(&json!([1, 2])), 0.0);
    }

    #[test]
    fn test_safe_div_guards_zero() {
        assert_eq!(safe_div(10.0, 0.0), 0.0);
        assert_eq!(safe_div(10.0, 4.0), 2.5);
        assert_eq!(safe_div(0.0, 0.0), 0.0);
    }
}

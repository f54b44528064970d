//! Forma canónica de una `PlotEntry` serializada: es lo que se hashea para
//! el fingerprint. Dos configuraciones que sólo difieren en el orden de las
//! claves o en espacios producen el mismo texto.

use serde_json::Value;

pub fn to_canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        // Escalares: el formato compacto de serde_json ya es estable.
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// Elimina recursivamente las claves volátiles (prefijo `_`): comentarios,
/// timestamps de generación, etc. No deben influir en el fingerprint.
pub fn strip_volatile(value: &Value) -> Value {
    match value {
        Value::Array(arr) => Value::Array(arr.iter().map(strip_volatile).collect()),
        Value::Object(map) => Value::Object(map.iter()
                                               .filter(|(k, _)| !k.starts_with('_'))
                                               .map(|(k, v)| (k.clone(), strip_volatile(v)))
                                               .collect()),
        other => other.clone(),
    }
}

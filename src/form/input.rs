use crate::form::{Field, PropertyForm};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use tracing::debug;

/// Fill a form from a JSON object keyed by field name.
///
/// Values go through the same text path as typed input, so range and type
/// problems surface as field errors on submit rather than here. Fields not
/// present keep their defaults.
pub fn form_from_json(json: &str) -> Result<PropertyForm> {
    let value: Value = serde_json::from_str(json).context("Property file is not valid JSON")?;
    let object = value
        .as_object()
        .ok_or_else(|| anyhow!("Property file must contain a JSON object"))?;

    let mut form = PropertyForm::new();
    for (key, value) in object {
        let field: Field = key.parse().map_err(|e: String| anyhow!(e))?;
        let text = match value {
            // 1.0 on a toggle means 1, the same as 3.0 on a count
            Value::Number(n) if field.is_toggle() => match n.as_f64() {
                Some(x) if x.fract() == 0.0 && x.abs() < 1e15 => (x as i64).to_string(),
                _ => n.to_string(),
            },
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Bool(b) if field.is_toggle() => u8::from(*b).to_string(),
            other => bail!("Unsupported value for {}: {}", field.name(), other),
        };
        form.set(field, &text)
            .map_err(|e| anyhow!("{}: {}", field.name(), e))?;
    }

    let missing: Vec<&str> = Field::ALL
        .into_iter()
        .filter(|f| !object.contains_key(f.name()))
        .map(Field::name)
        .collect();
    if !missing.is_empty() {
        debug!("Using defaults for: {}", missing.join(", "));
    }
    Ok(form)
}

use crate::form::fields::{Field, FieldKind};
use crate::models::{Flag, Furnishing, PropertyAttributes};
use std::collections::BTreeMap;
use std::fmt;

/// Field-by-field form input, as typed by the user
#[derive(Debug, Clone, PartialEq)]
pub struct RawForm {
    text: BTreeMap<Field, String>,
    flags: BTreeMap<Field, Flag>,
}

impl Default for RawForm {
    fn default() -> Self {
        let mut form = Self {
            text: BTreeMap::new(),
            flags: BTreeMap::new(),
        };
        for (field, value) in [
            (Field::Area, "3000"),
            (Field::Bedrooms, "3"),
            (Field::Bathrooms, "2"),
            (Field::Stories, "2"),
            (Field::Parking, "1"),
            (Field::FurnishingStatus, Furnishing::Unfurnished.as_str()),
        ] {
            form.text.insert(field, value.to_string());
        }
        for field in Field::ALL.into_iter().filter(|f| f.is_toggle()) {
            form.flags.insert(field, Flag::No);
        }
        form
    }
}

impl RawForm {
    /// Store the text typed into a field.
    ///
    /// Toggle fields only take 0 or 1 here; anything else is refused without
    /// touching the stored value.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), String> {
        if field.is_toggle() {
            let flag = match value.trim() {
                "0" => Flag::No,
                "1" => Flag::Yes,
                _ => return Err(format!("{} is a toggle and takes 0 or 1", field.label())),
            };
            self.flags.insert(field, flag);
        } else {
            self.text.insert(field, value.to_string());
        }
        Ok(())
    }

    /// Flip a toggle field. Returns the new value, or None for non-toggle fields.
    pub fn toggle(&mut self, field: Field) -> Option<Flag> {
        if !field.is_toggle() {
            return None;
        }
        let flag = self.flags.entry(field).or_default();
        *flag = flag.toggle();
        Some(*flag)
    }

    pub fn flag(&self, field: Field) -> Option<Flag> {
        self.flags.get(&field).copied()
    }

    /// Text shown for a field; toggles render as 0/1
    pub fn display_value(&self, field: Field) -> String {
        if field.is_toggle() {
            u8::from(self.flag(field).unwrap_or_default()).to_string()
        } else {
            self.text.get(&field).cloned().unwrap_or_default()
        }
    }

    fn text(&self, field: Field) -> &str {
        self.text.get(&field).map(String::as_str).unwrap_or("")
    }
}

/// Validation failures keyed by field, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn clear_field(&mut self, field: Field) {
        self.0.remove(&field);
    }

    fn insert(&mut self, field: Field, message: String) {
        self.0.insert(field, message);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field.name(), message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Validate the whole form at once.
///
/// Every field is checked, so the error set names each offending field
/// rather than only the first one.
pub fn validate(form: &RawForm) -> Result<PropertyAttributes, FieldErrors> {
    let mut errors = FieldErrors::default();

    let area = check(&mut errors, Field::Area, parse_area(form.text(Field::Area)));
    let mut count = |field: Field| {
        let result = match field.kind() {
            FieldKind::Count { min, max } => parse_count(form.text(field), min, max),
            _ => Err("is not a numeric field".to_string()),
        };
        check(&mut errors, field, result)
    };
    let bedrooms = count(Field::Bedrooms);
    let bathrooms = count(Field::Bathrooms);
    let stories = count(Field::Stories);
    let parking = count(Field::Parking);
    let furnishing = check(
        &mut errors,
        Field::FurnishingStatus,
        form.text(Field::FurnishingStatus).trim().parse::<Furnishing>(),
    );

    let flag = |field: Field| form.flag(field).unwrap_or_default();

    match (area, bedrooms, bathrooms, stories, parking, furnishing) {
        (Some(area), Some(bedrooms), Some(bathrooms), Some(stories), Some(parking), Some(furnishingstatus))
            if errors.is_empty() =>
        {
            Ok(PropertyAttributes {
                area,
                bedrooms,
                bathrooms,
                stories,
                mainroad: flag(Field::MainRoad),
                guestroom: flag(Field::GuestRoom),
                basement: flag(Field::Basement),
                hotwaterheating: flag(Field::HotWaterHeating),
                airconditioning: flag(Field::AirConditioning),
                parking,
                prefarea: flag(Field::PrefArea),
                furnishingstatus,
            })
        }
        _ => Err(errors),
    }
}

fn check<T>(errors: &mut FieldErrors, field: Field, result: Result<T, String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.insert(field, message);
            None
        }
    }
}

fn parse_area(input: &str) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("is required".to_string());
    }
    let area: f64 = input.parse().map_err(|_| "must be a number".to_string())?;
    if !area.is_finite() {
        return Err("must be a number".to_string());
    }
    if area <= 0.0 {
        return Err("must be greater than zero".to_string());
    }
    Ok(area)
}

fn parse_count(input: &str, min: u8, max: u8) -> Result<u8, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("is required".to_string());
    }
    let value: f64 = input
        .parse()
        .map_err(|_| "must be a whole number".to_string())?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err("must be a whole number".to_string());
    }
    if value < f64::from(min) || value > f64::from(max) {
        return Err(format!("must be between {} and {}", min, max));
    }
    Ok(value as u8)
}

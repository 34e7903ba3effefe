use serde::{Deserialize, Deserializer};

/// Normalizes user-supplied text by stripping surrounding whitespace and
/// recomposing it into Unicode Normalization Form C. Registration text is
/// stored and emailed verbatim, so the composed form is used.
pub fn normalize_text(value: impl AsRef<str>) -> String {
    use unicode_normalization::UnicodeNormalization;

    value.as_ref().trim().nfc().to_string()
}

/// Deserializes a `String` after running it through `normalize_text`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(normalize_text(s))
}

use serde::{Deserialize, Deserializer, Serialize};

/// Metadata describing one archived exam paper.
///
/// Every field is a display string. Servers emit `year` and `semester` as
/// strings, but older exports used bare numbers, so both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(rename = "class", default)]
    pub class_name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub semester: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(default)]
    pub exam_type: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub uploader: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub url: String,
}

impl Paper {
    pub fn from_tags(tags: PaperTags, original_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            class_name: tags.class_name,
            subject: tags.subject,
            semester: tags.semester,
            year: tags.year,
            exam_type: tags.exam_type,
            medium: tags.medium,
            uploader: tags.uploader,
            original_name: original_name.into(),
            url: url.into(),
        }
    }

    /// `BSc Math (Sem 2) - 2020`
    pub fn title(&self) -> String {
        format!(
            "{} {} (Sem {}) - {}",
            self.class_name, self.subject, self.semester, self.year
        )
    }
}

/// The seven metadata values encoded into a stored paper's filename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperTags {
    pub class_name: String,
    pub subject: String,
    pub semester: String,
    pub year: String,
    pub exam_type: String,
    pub medium: String,
    pub uploader: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(text)) => text,
        Some(Scalar::Integer(value)) => value.to_string(),
        Some(Scalar::Float(value)) => value.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_year_and_missing_fields() {
        let paper: Paper =
            serde_json::from_str(r#"{"year": 2020, "subject": "Math"}"#).expect("paper");
        assert_eq!(paper.year, "2020");
        assert_eq!(paper.subject, "Math");
        assert!(paper.class_name.is_empty());
        assert!(paper.url.is_empty());
    }

    #[test]
    fn uses_class_as_wire_key() {
        let paper = Paper {
            class_name: "BSc".into(),
            ..Paper::default()
        };
        let json = serde_json::to_value(&paper).expect("json");
        assert_eq!(json["class"], "BSc");
        assert!(json.get("class_name").is_none());
    }

    #[test]
    fn null_semester_becomes_empty() {
        let paper: Paper = serde_json::from_str(r#"{"semester": null}"#).expect("paper");
        assert_eq!(paper.semester, "");
    }

    #[test]
    fn title_reads_like_a_catalogue_entry() {
        let paper = Paper {
            class_name: "BSc".into(),
            subject: "Math".into(),
            semester: "2".into(),
            year: "2020".into(),
            ..Paper::default()
        };
        assert_eq!(paper.title(), "BSc Math (Sem 2) - 2020");
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Youngest age accepted when a student is added.
pub const MIN_AGE: u32 = 8;

/// One student as stored in the snapshot file.
///
/// Decoding is lenient: missing or `null` fields fall back to their defaults and
/// keys this version does not know about are kept in `extra`, so records written
/// by other tools survive a load/save cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub age: u32,
    #[serde(rename = "studentid", default, deserialize_with = "null_as_default")]
    pub student_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub courses: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub grades: String,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Student {
    /// Builds a fresh record from an already validated draft.
    pub fn from_draft(student_id: String, draft: &StudentDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            age: draft.age,
            student_id,
            courses: normalize_courses(&draft.courses),
            grades: draft.grades.trim().to_string(),
            created_at: Some(now),
            updated_at: None,
            extra: Map::new(),
        }
    }

    /// Applies the non-blank parts of `patch`. Identity and creation time never change.
    pub fn apply(&mut self, patch: &StudentPatch, now: DateTime<Utc>) {
        if let Some(name) = non_blank(&patch.name) {
            self.name = name.to_string();
        }
        if let Some(email) = non_blank(&patch.email) {
            self.email = email.to_string();
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(courses) = patch.courses.as_deref().map(normalize_courses) {
            if !courses.is_empty() {
                self.courses = courses;
            }
        }
        if let Some(grades) = non_blank(&patch.grades) {
            self.grades = grades.to_string();
        }
        self.updated_at = Some(now);
    }

    /// The individual course names, in stored order.
    pub fn course_list(&self) -> impl Iterator<Item = &str> {
        course_tokens(&self.courses)
    }

    pub fn has_course(&self, course: &str) -> bool {
        let wanted = course.trim().to_lowercase();
        self.course_list().any(|c| c.to_lowercase() == wanted)
    }
}

/// Input for `add`. The store generates the id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDraft {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub courses: String,
    pub grades: String,
}

impl StudentDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        age: u32,
        courses: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age,
            courses: courses.into(),
            grades: String::new(),
        }
    }

    pub fn with_grades(mut self, grades: impl Into<String>) -> Self {
        self.grades = grades.into();
        self
    }
}

/// Partial update. `None` and blank strings leave the stored value as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
    pub courses: Option<String>,
    pub grades: Option<String>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        non_blank(&self.name).is_none()
            && non_blank(&self.email).is_none()
            && self.age.is_none()
            && self
                .courses
                .as_deref()
                .map_or(true, |c| course_tokens(c).next().is_none())
            && non_blank(&self.grades).is_none()
    }
}

/// Splits on commas, trims each part, drops empties and rejoins with `", "`.
pub fn normalize_courses(raw: &str) -> String {
    course_tokens(raw).collect::<Vec<_>>().join(", ")
}

fn course_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|c| !c.is_empty())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 on write; on read also accepts naive ISO-8601 stamps, taken as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.filter(|s| !s.trim().is_empty())
            .map(|s| parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }

    pub(super) fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc())
            })
    }
}

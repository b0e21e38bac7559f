//! Read-only filtering over the roster.
//!
//! A [`StudentFilter`] combines up to three predicates with logical AND. Each
//! one is a no-op when left at its default (empty text, zero age, no courses).

use crate::model::Student;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    /// Case-insensitive substring of name, email and id run together.
    pub text: String,
    /// Keep students at least this old.
    pub min_age: u32,
    /// Every listed course must appear among the student's courses.
    pub courses: Vec<String>,
}

impl StudentFilter {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn min_age(mut self, min_age: u32) -> Self {
        self.min_age = min_age;
        self
    }

    pub fn course(mut self, course: impl Into<String>) -> Self {
        self.courses.push(course.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.min_age == 0 && self.selected_courses().next().is_none()
    }

    pub fn matches(&self, student: &Student) -> bool {
        self.matches_text(student)
            && student.age >= self.min_age
            && self.selected_courses().all(|c| student.has_course(c))
    }

    fn matches_text(&self, student: &Student) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let haystack = format!("{}{}{}", student.name, student.email, student.student_id);
        haystack.to_lowercase().contains(&self.text.to_lowercase())
    }

    fn selected_courses(&self) -> impl Iterator<Item = &str> {
        self.courses.iter().map(|c| c.trim()).filter(|c| !c.is_empty())
    }
}

/// Students matching `filter`, in roster order.
pub fn search<'a>(students: &'a [Student], filter: &StudentFilter) -> Vec<&'a Student> {
    students.iter().filter(|s| filter.matches(s)).collect()
}

/// Every distinct course name on the roster, sorted case-insensitively.
///
/// Names differing only in case collapse to the first spelling seen.
pub fn course_catalog(students: &[Student]) -> Vec<String> {
    let mut catalog: BTreeMap<String, String> = BTreeMap::new();
    for course in students.iter().flat_map(|s| s.course_list()) {
        catalog
            .entry(course.to_lowercase())
            .or_insert_with(|| course.to_string());
    }
    catalog.into_values().collect()
}

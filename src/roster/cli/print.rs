use chrono::{DateTime, Utc};
use colored::Colorize;
use roster::api::{CmdMessage, MessageLevel};
use roster::model::Student;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ID_WIDTH: usize = 12;
const NAME_WIDTH: usize = 22;
const EMAIL_WIDTH: usize = 26;
const AGE_WIDTH: usize = 3;
const COURSES_WIDTH: usize = 24;
const TIME_WIDTH: usize = 14;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_students(students: &[Student]) {
    if students.is_empty() {
        println!("No students found.");
        return;
    }

    println!("{}", header_row().bold());
    for student in students {
        let (id, rest) = format_row(student);
        println!("{}  {}", id.yellow(), rest);
    }
}

/// Footer for filtered listings.
pub(super) fn print_showing(shown: usize, total: usize) {
    println!("{}", format!("Showing {} / {}", shown, total).dimmed());
}

pub(super) fn print_student_card(student: &Student) {
    println!("{} {}", student.student_id.yellow(), student.name.bold());
    println!("--------------------------------");
    println!("{:<9}{}", "Email", student.email);
    println!("{:<9}{}", "Age", student.age);
    println!("{:<9}{}", "Courses", student.courses);
    if !student.grades.is_empty() {
        println!("{:<9}{}", "Grades", student.grades);
    }
    if let Some(created) = student.created_at {
        println!(
            "{:<9}{}",
            "Added",
            format!("{} ({})", created.format("%Y-%m-%d %H:%M"), time_ago(created)).dimmed()
        );
    }
    if let Some(updated) = student.updated_at {
        println!("{:<9}{}", "Updated", time_ago(updated).dimmed());
    }
}

pub(super) fn print_lines(lines: &[String], empty_message: &str) {
    if lines.is_empty() {
        println!("{}", empty_message.dimmed());
        return;
    }
    for line in lines {
        println!("{}", line);
    }
}

fn header_row() -> String {
    format!(
        "{}  {}  {}  {}  {}  {}",
        pad("ID", ID_WIDTH),
        pad("Name", NAME_WIDTH),
        pad("Email", EMAIL_WIDTH),
        pad("Age", AGE_WIDTH),
        pad("Courses", COURSES_WIDTH),
        "Added"
    )
}

/// The id column, then the rest of the row.
fn format_row(student: &Student) -> (String, String) {
    let added = student
        .created_at
        .map(time_ago)
        .unwrap_or_else(|| "-".to_string());
    let rest = format!(
        "{}  {}  {:>width$}  {}  {:>time$}",
        pad(&student.name, NAME_WIDTH),
        pad(&student.email, EMAIL_WIDTH),
        student.age,
        pad(&student.courses, COURSES_WIDTH),
        added,
        width = AGE_WIDTH,
        time = TIME_WIDTH,
    );
    (pad(&student.student_id, ID_WIDTH), rest)
}

/// Truncate to `width` columns and pad with spaces up to it.
fn pad(s: &str, width: usize) -> String {
    let cell = truncate_to_width(s, width);
    let padding = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use roster::model::StudentDraft;

    #[test]
    fn short_text_is_kept() {
        assert_eq!(truncate_to_width("Ann", 10), "Ann");
        assert_eq!(truncate_to_width("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn long_text_gets_an_ellipsis() {
        let cut = truncate_to_width("Bartholomew Richardson", 10);
        assert_eq!(cut, "Bartholom…");
        assert_eq!(cut.width(), 10);
    }

    #[test]
    fn wide_characters_count_double() {
        let cut = truncate_to_width("李小龍李小龍", 6);
        assert!(cut.width() <= 6);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad("Ann", 6), "Ann   ");
        assert_eq!(pad("", 3).width(), 3);
    }

    #[test]
    fn row_columns_line_up_with_header() {
        let draft = StudentDraft::new("Ann Lee", "ann@x.com", 20, "Math, Art");
        let created = Utc::now() - Duration::hours(3);
        let student = Student::from_draft("Abc1234def!g".to_string(), &draft, created);

        let (id, rest) = format_row(&student);
        assert_eq!(id, "Abc1234def!g");
        assert!(rest.contains("Ann Lee"));
        assert!(rest.contains("Math, Art"));
        assert!(rest.trim_end().ends_with("ago"));

        let header = header_row();
        let email_col = header.find("Email").unwrap();
        let row = format!("{}  {}", id, rest);
        assert_eq!(row.find("ann@x.com").unwrap(), email_col);
    }

    #[test]
    fn rows_without_timestamp_show_dash() {
        let draft = StudentDraft::new("Ann", "a@x.com", 20, "Math");
        let mut student = Student::from_draft("Abc1234def!g".to_string(), &draft, Utc::now());
        student.created_at = None;
        let (_, rest) = format_row(&student);
        assert!(rest.trim_end().ends_with('-'));
    }
}

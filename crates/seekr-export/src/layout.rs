//! Turns an owner's application history into fixed-height pages of text
//! lines. Pagination happens here, before any PDF object exists, so the
//! renderer knows the page total when it writes each footer.

use chrono::{DateTime, Utc};

use seekr_types::models::{ApplicationDetails, Interview};

/// Lines that fit between the top margin and the footer of an A4 page at
/// the body leading.
pub const LINES_PER_PAGE: usize = 50;

/// Characters per wrapped body line at the body font size.
pub const WRAP_WIDTH: usize = 90;

/// Characters per heading line; headings use a larger bold font.
pub const HEADING_WRAP_WIDTH: usize = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Title,
    Heading,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub style: Style,
    pub indent: u8,
    pub text: String,
}

impl Line {
    fn new(style: Style, indent: u8, text: impl Into<String>) -> Self {
        Self {
            style,
            indent,
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self::new(Style::Body, 0, "")
    }
}

#[derive(Debug, Clone)]
pub struct ReportLayout {
    pages: Vec<Vec<Line>>,
}

impl ReportLayout {
    pub fn build(history: &[ApplicationDetails], generated_at: DateTime<Utc>) -> Self {
        let interview_total: usize = history.iter().map(|d| d.interviews.len()).sum();

        let mut lines = vec![
            Line::new(Style::Title, 0, "Job applications report"),
            Line::new(
                Style::Body,
                0,
                format!("Generated {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
            ),
            Line::new(
                Style::Body,
                0,
                format!(
                    "{} applications, {} interviews",
                    history.len(),
                    interview_total
                ),
            ),
            Line::blank(),
        ];

        if history.is_empty() {
            lines.push(Line::new(Style::Body, 0, "No applications recorded."));
        }

        for details in history {
            push_application(&mut lines, details);
        }

        Self {
            pages: paginate(lines),
        }
    }

    pub fn pages(&self) -> &[Vec<Line>] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

fn push_application(lines: &mut Vec<Line>, details: &ApplicationDetails) {
    let app = &details.application;

    push_wrapped(
        lines,
        Style::Heading,
        0,
        &format!("{} - {}", app.company, app.position),
    );
    lines.push(Line::new(
        Style::Body,
        1,
        format!(
            "Applied {}   Status: {}",
            app.application_date.format("%Y-%m-%d"),
            app.status
        ),
    ));
    if !app.job_posting_url.is_empty() {
        push_wrapped(lines, Style::Body, 1, &format!("Posting: {}", app.job_posting_url));
    }
    push_wrapped(lines, Style::Body, 1, &app.job_description);

    if details.interviews.is_empty() {
        lines.push(Line::new(Style::Body, 1, "No interviews yet."));
    } else {
        lines.push(Line::new(
            Style::Body,
            1,
            format!("Interviews ({})", details.interviews.len()),
        ));
        for interview in &details.interviews {
            push_interview(lines, interview);
        }
    }

    lines.push(Line::blank());
}

fn push_interview(lines: &mut Vec<Line>, interview: &Interview) {
    push_wrapped(
        lines,
        Style::Body,
        2,
        &format!(
            "{}  {}",
            interview.interview_date.format("%Y-%m-%d %H:%M"),
            interview.topic
        ),
    );
    if !interview.participants.is_empty() {
        push_wrapped(lines, Style::Body, 3, &format!("With: {}", interview.participants));
    }
    push_wrapped(lines, Style::Body, 3, &interview.prep_notes);
}

/// Long words such as URLs are broken, so no line exceeds the width.
fn push_wrapped(lines: &mut Vec<Line>, style: Style, indent: u8, text: &str) {
    let width = match style {
        Style::Body => WRAP_WIDTH,
        Style::Title | Style::Heading => HEADING_WRAP_WIDTH,
    };
    let width = width.saturating_sub(usize::from(indent) * 4).max(20);
    for paragraph in text.lines().filter(|p| !p.trim().is_empty()) {
        for wrapped in textwrap::wrap(paragraph, width) {
            lines.push(Line::new(style, indent, wrapped.into_owned()));
        }
    }
}

fn paginate(lines: Vec<Line>) -> Vec<Vec<Line>> {
    let mut pages: Vec<Vec<Line>> = lines
        .chunks(LINES_PER_PAGE)
        .map(|chunk| chunk.to_vec())
        .collect();
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    pages
}

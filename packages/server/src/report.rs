use chrono::NaiveDate;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

/// Facts printed on a hackathon report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HackathonReport {
    pub name: String,
    pub date: NaiveDate,
    pub venue: String,
    pub is_team: bool,
    /// Live registration count at generation time.
    pub total_registrations: u64,
}

impl HackathonReport {
    /// Download name, e.g. `Hackathon_Report_Spark 2025.pdf`.
    pub fn filename(&self) -> String {
        crate::utils::filename::report_filename(&self.name)
    }
}

/// Turns a [`HackathonReport`] into a downloadable document.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, report: &HackathonReport) -> Result<Vec<u8>, ReportError>;
}

/// A titled block of prose followed by bullet points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    pub body: String,
    pub bullets: Vec<String>,
}

/// Fact lines printed under the title.
pub fn summary_lines(report: &HackathonReport) -> Vec<String> {
    vec![
        format!("Event Name: {}", report.name),
        format!("Date: {}", report.date.format("%a %b %d %Y")),
        format!(
            "Venue: {}",
            if report.venue.trim().is_empty() {
                "N/A"
            } else {
                &report.venue
            }
        ),
        format!("Total Registrations: {}", report.total_registrations),
        format!(
            "Hackathon Type: {}",
            if report.is_team { "Team-Based" } else { "Solo" }
        ),
    ]
}

fn bullets(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Narrative sections of the report.
pub fn sections(report: &HackathonReport) -> Vec<Section> {
    let count = report.total_registrations.to_string();
    let (teams, individuals) = if report.is_team {
        (count.as_str(), "N/A")
    } else {
        ("N/A", count.as_str())
    };

    vec![
        Section {
            heading: "Introduction",
            body: "The hackathon event provided an exciting opportunity for participants to \
                   showcase their coding and problem-solving skills. Teams and individuals \
                   competed to develop innovative solutions within a limited timeframe."
                .into(),
            bullets: Vec::new(),
        },
        Section {
            heading: "Objectives",
            body: "The primary goals of the hackathon were:".into(),
            bullets: bullets(&[
                "Encourage innovation and creativity in technology.",
                "Provide a platform for networking and collaboration.",
                "Develop practical solutions to real-world problems.",
                "Enhance coding, teamwork, and problem-solving skills.",
            ]),
        },
        Section {
            heading: "Event Highlights",
            body: "The event witnessed enthusiastic participation from students, developers, \
                   and tech enthusiasts. Key highlights include:"
                .into(),
            bullets: vec![
                format!("Total Teams Participated: {teams}"),
                format!("Total Individual Participants: {individuals}"),
                "Keynote speech by industry experts.".into(),
                "Hands-on workshops and mentorship sessions.".into(),
                "Live product demonstrations and project pitches.".into(),
            ],
        },
        Section {
            heading: "Judging Criteria",
            body: "The projects were evaluated based on the following parameters:".into(),
            bullets: bullets(&[
                "Innovation and originality of the idea.",
                "Technical complexity and feasibility.",
                "Presentation and user experience.",
                "Impact and real-world applicability.",
            ]),
        },
        Section {
            heading: "Winners & Recognition",
            body: "The top-performing teams and individuals were awarded for their outstanding \
                   contributions. Special recognitions were given for:"
                .into(),
            bullets: bullets(&[
                "Best Innovative Solution",
                "Most Technically Advanced Project",
                "Best Teamwork and Collaboration",
                "Audience Choice Award",
            ]),
        },
        Section {
            heading: "Conclusion",
            body: "The hackathon was a resounding success, fostering innovation and \
                   collaboration among participants. The solutions developed during the event \
                   demonstrated great potential for real-world impact. We look forward to \
                   hosting more such events in the future."
                .into(),
            bullets: Vec::new(),
        },
    ]
}

/// Greedy word wrap at `width` characters.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;
const WRAP_CHARS: usize = 95;

/// A4 report rendered with the built-in Helvetica fonts.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfReportRenderer;

/// Top-down text cursor that starts a new page when it runs out of room.
struct Cursor<'d> {
    doc: &'d PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl Cursor<'_> {
    fn line(&mut self, text: &str, size: f32, indent: f32, font: &IndirectFontRef) {
        let height = size * 0.5;
        if self.y - height < MARGIN {
            self.pages += 1;
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("Page {}", self.pages),
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= height;
        self.layer
            .use_text(text, size, Mm(MARGIN + indent), Mm(self.y), font);
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn render(&self, report: &HackathonReport) -> Result<Vec<u8>, ReportError> {
        let (doc, page, layer) = PdfDocument::new(
            format!("Hackathon Report - {}", report.name),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Page 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;

        let mut cursor = Cursor {
            layer: doc.get_page(page).get_layer(layer),
            doc: &doc,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        };

        cursor.line("Hackathon Event Report", 18.0, 55.0, &bold);
        cursor.gap(6.0);
        for fact in summary_lines(report) {
            cursor.line(&fact, 13.0, 0.0, &regular);
        }
        cursor.gap(8.0);

        for section in sections(report) {
            cursor.line(section.heading, 12.0, 0.0, &bold);
            cursor.gap(1.5);
            for line in wrap(&section.body, WRAP_CHARS) {
                cursor.line(&line, 11.0, 0.0, &regular);
            }
            for bullet in &section.bullets {
                cursor.line(&format!("- {bullet}"), 11.0, 4.0, &regular);
            }
            cursor.gap(5.0);
        }

        drop(cursor);
        doc.save_to_bytes()
            .map_err(|e| ReportError::Pdf(e.to_string()))
    }
}

use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};
use thiserror::Error;
use torsync_core::RawCourse;

// Column layout of a transcript result row. Index 0 is a running
// number, index 7 an unused bookings cell.
const COL_TITLE: usize = 1;
const COL_STATUS: usize = 2;
const COL_GRADE: usize = 3;
const COL_RATING: usize = 4;
const COL_CREDITS: usize = 5;
const COL_EXAM_DATE: usize = 6;
const COL_ATTEMPTS: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("transcript page contains no result tables")]
    NoResultTables,
    #[error("table row is missing column {index}")]
    MissingColumn { index: usize },
}

/// Turns transcript page HTML into raw course rows. Implementations
/// must fail as a unit: either every row of the document parses or the
/// whole call errors, never a partial result.
pub trait TranscriptParser: Send + Sync {
    fn try_parse(&self, html: &str) -> Result<Vec<RawCourse>, ParseError>;
}

/// Parser tailored to the current structure of the portal's transcript
/// page. Likely to break as soon as that structure changes; adjust the
/// mechanics with the tests in `tests/parse.rs` when it does.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableTranscriptParser;

impl TranscriptParser for TableTranscriptParser {
    fn try_parse(&self, html: &str) -> Result<Vec<RawCourse>, ParseError> {
        let doc = Html::parse_document(html);
        let tbody = Selector::parse("tbody").expect("static selector");
        let anchor = Selector::parse("a").expect("static selector");

        let tables: Vec<ElementRef> = doc.select(&tbody).collect();
        if tables.is_empty() {
            return Err(ParseError::NoResultTables);
        }

        // The document-final table is a legend, not a semester. Walk
        // the remaining tables newest-first.
        let rows = tables
            .iter()
            .rev()
            .skip(1)
            .copied()
            .flat_map(|table| table.children().filter_map(ElementRef::wrap));

        let mut courses = Vec::new();
        let mut current_module = String::new();

        for row in rows {
            let columns: Vec<ElementRef> = row.children().filter_map(ElementRef::wrap).collect();
            if columns.is_empty() {
                continue;
            }

            // Module header rows carry no hyperlink. Their name applies
            // to every course row until the next header.
            if row.select(&anchor).next().is_none() {
                current_module = clean_text(&column_text(&columns, COL_TITLE)?);
                continue;
            }

            let date_of_examination = clean_text(&column_text(&columns, COL_EXAM_DATE)?);
            // Without an examination date there is no result to track.
            if date_of_examination.is_empty() {
                continue;
            }

            let title = clean_text(&column_text(&columns, COL_TITLE)?);

            courses.push(RawCourse {
                id: course_id(&title),
                title,
                module: current_module.clone(),
                status: clean_text(&column_text(&columns, COL_STATUS)?),
                grade: clean_text(&column_text(&columns, COL_GRADE)?),
                rating: clean_text(&column_text(&columns, COL_RATING)?),
                credits: clean_text(&column_text(&columns, COL_CREDITS)?),
                date_of_examination,
                attempts: clean_text(&column_text(&columns, COL_ATTEMPTS)?),
            });
        }

        Ok(courses)
    }
}

fn column_text(columns: &[ElementRef], index: usize) -> Result<String, ParseError> {
    let cell = columns
        .get(index)
        .ok_or(ParseError::MissingColumn { index })?;
    Ok(cell.text().collect())
}

/// Collapses every run of whitespace (newlines and tabs included) to a
/// single space and trims the ends.
pub fn clean_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Deterministic course id: short hex digest of the cleaned title. The
/// portal exposes no real course ids, so the title has to serve as the
/// identity of a row.
pub fn course_id(title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

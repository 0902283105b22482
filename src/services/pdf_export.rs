//! Printable PDF of a structured summary, optionally with quiz results.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::{
    errors::{AppError, AppResult},
    models::{domain::StructuredSummary, dto::request::QuizResultEntry},
};

pub const PDF_TITLE: &str = "Your Child's Discharge Instructions";
pub const PDF_DISCLAIMER: &str = "This explanation was generated to help you understand your child's \
discharge instructions. It does not replace advice from your child's care team. If anything here \
differs from what the doctor or nurse told you, follow their instructions. Call emergency services \
if your child is seriously unwell.";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP: f32 = 280.0;
const BOTTOM_MARGIN: f32 = 20.0;
const LEFT: f32 = 20.0;
const INDENT: f32 = 25.0;
const LINE_CHARS: usize = 85;

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: Mm,
}

impl PageWriter {
    fn new(title: &str) -> AppResult<Self> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page1).get_layer(layer1);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::PdfRender(format!("PDF font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::PdfRender(format!("PDF font error: {e}")))?;

        Ok(Self {
            doc,
            layer,
            font,
            bold,
            y: Mm(TOP),
        })
    }

    /// Starts a new page when fewer than `needed` millimetres remain.
    fn ensure_space(&mut self, needed: f32) {
        if self.y.0 - needed >= BOTTOM_MARGIN {
            return;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = Mm(TOP);
    }

    fn title(&mut self, text: &str) {
        self.layer
            .use_text(pdf_safe(text), 16.0, Mm(LEFT), self.y, &self.bold);
        self.y -= Mm(12.0);
    }

    fn heading(&mut self, text: &str) {
        self.ensure_space(16.0);
        self.y -= Mm(3.0);
        self.layer
            .use_text(pdf_safe(text), 12.0, Mm(LEFT), self.y, &self.bold);
        self.y -= Mm(7.0);
    }

    fn paragraph(&mut self, text: &str, x: f32, size: f32) {
        for line in wrap_text(&pdf_safe(text), LINE_CHARS) {
            self.ensure_space(5.0);
            self.layer.use_text(line, size, Mm(x), self.y, &self.font);
            self.y -= Mm(5.0);
        }
        self.y -= Mm(1.5);
    }

    fn bullets(&mut self, items: &[String]) {
        for item in items {
            self.paragraph(&format!("- {}", item), INDENT, 10.0);
        }
    }

    fn finish(self) -> AppResult<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| AppError::PdfRender(format!("PDF save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| AppError::PdfRender(format!("PDF buffer error: {e}")))
    }
}

/// Renders the summary as an A4 PDF. Empty sections are skipped; the
/// disclaimer is always last.
pub fn render_summary_pdf(
    summary: &StructuredSummary,
    quiz_score: Option<f64>,
    quiz_results: &[QuizResultEntry],
) -> AppResult<Vec<u8>> {
    let mut page = PageWriter::new(PDF_TITLE)?;

    page.title(PDF_TITLE);

    page.heading("What happened");
    page.paragraph(&summary.simple_explanation, LEFT, 10.0);

    let sections: [(&str, &[String]); 3] = [
        ("What to do at home", &summary.what_to_do),
        ("What not to do", &summary.what_not_to_do),
        ("Get help right away if", &summary.red_flags),
    ];
    for (heading, items) in sections {
        if !items.is_empty() {
            page.heading(heading);
            page.bullets(items);
        }
    }

    if !summary.medications.is_empty() {
        page.heading("Medicines");
        for medication in &summary.medications {
            let mut line = medication.name.clone();
            for detail in [&medication.dose, &medication.timing] {
                if !detail.is_empty() {
                    line.push_str(", ");
                    line.push_str(detail);
                }
            }
            if let Some(notes) = &medication.notes {
                line.push_str(&format!(" ({})", notes));
            }
            page.paragraph(&format!("- {}", line), INDENT, 10.0);
        }
    }

    if !summary.follow_up.is_empty() {
        page.heading("Follow-up");
        page.bullets(&summary.follow_up);
    }

    page.heading("What to expect");
    page.paragraph(&summary.expected_course, LEFT, 10.0);

    if quiz_score.is_some() || !quiz_results.is_empty() {
        page.heading("Quiz results");
        if let Some(score) = quiz_score {
            page.paragraph(&format!("Score: {:.0}%", score), LEFT, 10.0);
        }
        for (i, result) in quiz_results.iter().enumerate() {
            let verdict = if result.is_correct { "Correct" } else { "Needs review" };
            page.paragraph(
                &format!("{}. {} [{}]", i + 1, result.question, verdict),
                INDENT,
                10.0,
            );
            page.paragraph(&format!("Your answer: {}", result.user_answer), INDENT + 5.0, 9.0);
            if !result.is_correct {
                if let Some(correct) = &result.correct_answer {
                    page.paragraph(&format!("Correct answer: {}", correct), INDENT + 5.0, 9.0);
                }
            }
        }
    }

    page.heading("Please note");
    page.paragraph(PDF_DISCLAIMER, LEFT, 8.0);

    page.finish()
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Builtin fonts only cover Latin-1, so common typographic characters are
/// folded to ASCII and anything else becomes '?'.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '-',
            c if (c as u32) < 0x100 => c,
            _ => '?',
        })
        .collect()
}

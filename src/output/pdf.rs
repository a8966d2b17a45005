//! Tailored résumé PDF rendering with printpdf's built-in Helvetica fonts

use crate::error::{JobTailorError, Result};
use crate::resume::CvDocument;
use log::info;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
/// Lowest baseline for body text; the footer sits below it
const BOTTOM_LIMIT: f32 = 22.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica advance width as a fraction of the font size
const AVG_GLYPH_EM: f32 = 0.5;
const SKILL_LABEL_WIDTH: f32 = 40.0;
const BULLET_INDENT: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One rendered line before pagination
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    pub size: f32,
    pub style: FontStyle,
    pub align: Align,
    pub indent: f32,
    /// Bold label drawn at the left margin on the same baseline
    pub label: Option<String>,
    pub space_before: f32,
}

/// Characters outside Latin-1 that WinAnsiEncoding still covers
const WIN_ANSI_EXTRAS: &[char] = &[
    '€', 'ƒ', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// Map text onto the WinAnsi characters the built-in fonts can draw.
/// Typographic quotes, dashes and bullets become ASCII; anything else
/// without a WinAnsi code is dropped.
pub fn to_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{2033}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' | '\u{2022}' | '\u{25CF}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\t' | '\n' | '\r' | '\u{A0}' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            '\u{A1}'..='\u{FF}' => out.push(c),
            c if WIN_ANSI_EXTRAS.contains(&c) => out.push(c),
            _ => {}
        }
    }
    out
}

fn glyph_width(size: f32) -> f32 {
    size * PT_TO_MM * AVG_GLYPH_EM
}

fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.5
}

/// Estimated rendered width in millimetres
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * glyph_width(size)
}

/// Greedy word wrap; words longer than a line are split
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// `CV_{company}_{title}.pdf` restricted to safe file-name characters
pub fn pdf_file_name(company: &str, job_title: &str) -> String {
    format!("CV_{}_{}.pdf", company, job_title)
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .collect::<String>()
        .replace(' ', "_")
}

#[derive(Default)]
struct LayoutBuilder {
    lines: Vec<LayoutLine>,
    pending_gap: f32,
}

impl LayoutBuilder {
    fn gap(&mut self, mm: f32) {
        self.pending_gap += mm;
    }

    fn push(&mut self, text: String, size: f32, style: FontStyle, align: Align, indent: f32, label: Option<String>) {
        self.lines.push(LayoutLine {
            text,
            size,
            style,
            align,
            indent,
            label,
            space_before: std::mem::take(&mut self.pending_gap),
        });
    }

    fn paragraph(&mut self, text: &str, size: f32, style: FontStyle, align: Align, indent: f32) {
        let text = to_pdf_text(text);
        let width = PAGE_WIDTH - 2.0 * MARGIN - indent;
        let max_chars = (width / glyph_width(size)) as usize;
        for line in wrap_text(&text, max_chars) {
            self.push(line, size, style, align, indent, None);
        }
    }

    fn heading(&mut self, text: &str) {
        self.gap(2.0);
        self.push(to_pdf_text(text), 14.0, FontStyle::Bold, Align::Left, 0.0, None);
        self.gap(1.0);
    }

    fn labelled(&mut self, label: &str, text: &str, size: f32) {
        let label = to_pdf_text(label);
        let text = to_pdf_text(text);
        let width = PAGE_WIDTH - 2.0 * MARGIN - SKILL_LABEL_WIDTH;
        let max_chars = (width / glyph_width(size)) as usize;
        let mut wrapped = wrap_text(&text, max_chars).into_iter();

        let first = wrapped.next().unwrap_or_default();
        self.push(first, size, FontStyle::Regular, Align::Left, SKILL_LABEL_WIDTH, Some(label));
        for line in wrapped {
            self.push(line, size, FontStyle::Regular, Align::Left, SKILL_LABEL_WIDTH, None);
        }
    }

    fn bullets(&mut self, items: &[String]) {
        for item in items {
            self.paragraph(&format!("- {}", item), 10.0, FontStyle::Regular, Align::Left, BULLET_INDENT);
        }
    }
}

fn joined_heading(primary: &str, secondary: &str) -> String {
    if secondary.trim().is_empty() {
        primary.to_string()
    } else {
        format!("{} - {}", primary, secondary)
    }
}

/// Lay out a tailored CV as a sequence of lines
pub fn layout_resume(cv: &CvDocument, job_title: &str, company: &str) -> Vec<LayoutLine> {
    let mut b = LayoutBuilder::default();

    match cv.contact_header() {
        Some(header) => {
            b.paragraph(&header.name, 24.0, FontStyle::Bold, Align::Center, 0.0);
            if !header.contact_line.is_empty() {
                b.paragraph(&header.contact_line, 10.0, FontStyle::Regular, Align::Center, 0.0);
            }
            b.paragraph(
                &format!("Application for {} at {}", job_title, company),
                11.0,
                FontStyle::Italic,
                Align::Center,
                0.0,
            );
        }
        None => {
            b.paragraph(&format!("{} Application", job_title), 24.0, FontStyle::Bold, Align::Center, 0.0);
            b.paragraph(&format!("Targeting: {}", company), 12.0, FontStyle::Regular, Align::Center, 0.0);
        }
    }
    b.gap(10.0);

    if !cv.professional_summary.trim().is_empty() {
        b.heading("Professional Summary");
        b.paragraph(&cv.professional_summary, 11.0, FontStyle::Regular, Align::Left, 0.0);
        b.gap(5.0);
    }

    let skills = cv.skills.categories();
    if !skills.is_empty() {
        b.heading("Technical Skills");
        for (category, items) in &skills {
            b.labelled(&format!("{}:", category), &items.join(", "), 11.0);
        }
        b.gap(5.0);
    }

    if !cv.experience.is_empty() || !cv.projects.is_empty() {
        b.heading("Relevant Experience & Projects");

        for exp in &cv.experience {
            b.paragraph(&joined_heading(&exp.title, &exp.company), 12.0, FontStyle::Bold, Align::Left, 0.0);
            let meta: Vec<&str> = [exp.date.as_str(), exp.location.as_str()]
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect();
            if !meta.is_empty() {
                b.paragraph(&meta.join(" | "), 10.0, FontStyle::Italic, Align::Left, 0.0);
            }
            if !exp.description.trim().is_empty() {
                b.paragraph(&exp.description, 11.0, FontStyle::Regular, Align::Left, 0.0);
            }
            b.bullets(&exp.achievements);
            b.gap(3.0);
        }

        for proj in &cv.projects {
            b.paragraph(&joined_heading(&proj.title, &proj.context), 12.0, FontStyle::Bold, Align::Left, 0.0);
            if !proj.technologies.is_empty() {
                b.paragraph(
                    &format!("Stack: {}", proj.technologies.join(", ")),
                    10.0,
                    FontStyle::Italic,
                    Align::Left,
                    0.0,
                );
            }
            if !proj.description.trim().is_empty() {
                b.paragraph(&proj.description, 11.0, FontStyle::Regular, Align::Left, 0.0);
            }
            b.bullets(&proj.achievements);
            b.gap(3.0);
        }
    }

    let education = cv.education.items();
    if !education.is_empty() {
        b.heading("Education");
        for edu in education {
            b.paragraph(&edu.university, 12.0, FontStyle::Bold, Align::Left, 0.0);
            let degree = if edu.graduation.trim().is_empty() {
                edu.degree.clone()
            } else {
                format!("{} ({})", edu.degree, edu.graduation)
            };
            b.paragraph(&degree, 11.0, FontStyle::Regular, Align::Left, 0.0);
            if !edu.relevant_coursework.is_empty() {
                b.paragraph(
                    &format!("Coursework: {}", edu.relevant_coursework.join(", ")),
                    11.0,
                    FontStyle::Regular,
                    Align::Left,
                    0.0,
                );
            }
        }
        b.gap(5.0);
    }

    if !cv.certifications.is_empty() {
        b.heading("Certifications");
        for cert in &cv.certifications {
            b.paragraph(&format!("- {}", cert.label()), 11.0, FontStyle::Regular, Align::Left, 0.0);
        }
    }

    b.lines
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

fn pdf_error(e: impl std::fmt::Display) -> JobTailorError {
    JobTailorError::Pdf(e.to_string())
}

fn draw_footer(layer: &PdfLayerReference, page_no: usize, fonts: &Fonts) {
    let text = format!("Page {}", page_no);
    let x = (PAGE_WIDTH - text_width(&text, 8.0)) / 2.0;
    layer.use_text(text, 8.0, Mm(x), Mm(10.0), &fonts.italic);
}

/// Paginate and draw the lines, writing the document to `path`
pub fn render_to_file(lines: &[LayoutLine], doc_title: &str, path: &Path) -> Result<()> {
    let (doc, page, layer) =
        PdfDocument::new(to_pdf_text(doc_title), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
        italic: doc.add_builtin_font(BuiltinFont::HelveticaOblique).map_err(pdf_error)?,
    };

    let mut current = doc.get_page(page).get_layer(layer);
    let mut page_no = 1;
    let mut y = PAGE_HEIGHT - MARGIN;

    for line in lines {
        let height = line_height(line.size);
        y -= line.space_before;

        if y - height < BOTTOM_LIMIT {
            draw_footer(&current, page_no, &fonts);
            let (next_page, next_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            current = doc.get_page(next_page).get_layer(next_layer);
            page_no += 1;
            y = PAGE_HEIGHT - MARGIN;
        }
        y -= height;

        let x = match line.align {
            Align::Left => MARGIN + line.indent,
            Align::Center => ((PAGE_WIDTH - text_width(&line.text, line.size)) / 2.0).max(MARGIN),
        };

        if let Some(label) = &line.label {
            current.use_text(label.clone(), line.size, Mm(MARGIN), Mm(y), &fonts.bold);
        }
        if !line.text.is_empty() {
            current.use_text(line.text.clone(), line.size, Mm(x), Mm(y), fonts.get(line.style));
        }
    }
    draw_footer(&current, page_no, &fonts);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer).map_err(pdf_error)?;
    Ok(())
}

/// Render a tailored CV to `{out_dir}/CV_{company}_{title}.pdf`
pub fn generate_resume_pdf(cv: &CvDocument, job_title: &str, company: &str, out_dir: &Path) -> Result<PathBuf> {
    let lines = layout_resume(cv, job_title, company);
    let path = out_dir.join(pdf_file_name(company, job_title));
    render_to_file(&lines, &format!("CV - {} - {}", company, job_title), &path)?;

    info!("Rendered {} lines to {}", lines.len(), path.display());
    println!("  📄 Generated PDF: {}", path.display());
    Ok(path)
}

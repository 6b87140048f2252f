//! Page layout for generated question reports.
//!
//! Positions are computed in millimetres with the origin at the bottom-left
//! corner of the page, which is what the PDF writer expects.

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Page geometry and typography of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStyle {
    /// Document title printed at the top of the first page.
    pub title: String,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
    pub margin_top_mm: f32,
    /// Content never extends below this distance from the bottom edge.
    pub margin_bottom_mm: f32,
    pub title_font_size: f32,
    pub title_height_mm: f32,
    pub heading_font_size: f32,
    pub heading_height_mm: f32,
    pub body_font_size: f32,
    pub body_line_height_mm: f32,
    /// Extra space after every body paragraph.
    pub paragraph_gap_mm: f32,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            title: "Generated Questions".to_owned(),
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_left_mm: 10.0,
            margin_right_mm: 10.0,
            margin_top_mm: 10.0,
            margin_bottom_mm: 15.0,
            title_font_size: 14.0,
            title_height_mm: 10.0,
            heading_font_size: 14.0,
            heading_height_mm: 7.0,
            body_font_size: 12.0,
            body_line_height_mm: 5.0,
            paragraph_gap_mm: 1.0,
        }
    }
}

impl ReportStyle {
    /// Width available to text between the side margins.
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_left_mm - self.margin_right_mm
    }
}

/// How a line of the answer is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum LineKind {
    Title,
    Heading,
    Body,
}

/// One source line of the generated answer, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    /// A `*`-prefixed line with every marker removed and the rest trimmed.
    Heading(String),
    /// Any other line, verbatim.
    Body(&'a str),
}

impl<'a> Block<'a> {
    /// Classifies a single line.
    pub fn classify(line: &'a str) -> Self {
        if line.starts_with('*') {
            Self::Heading(line.replace('*', "").trim().to_owned())
        } else {
            Self::Body(line)
        }
    }
}

/// A line of text at a fixed position on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub kind: LineKind,
    pub text: String,
    pub x_mm: f32,
    /// Baseline distance from the bottom edge.
    pub baseline_mm: f32,
    pub font_size: f32,
}

/// Lines placed on a single page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPage {
    pub lines: Vec<PlacedLine>,
}

/// A fully paginated report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pages: Vec<ReportPage>,
}

impl ReportLayout {
    /// Lays out `answer` with `style`.
    ///
    /// The title comes first. Then every line of the answer is either a bold
    /// heading or a wrapped body paragraph; a new page starts whenever the
    /// next line would cross the bottom margin.
    pub fn build(answer: &str, style: &ReportStyle) -> Self {
        let mut cursor = Cursor::new(style);

        let title = to_win_ansi(&style.title);
        let title_width = text_width_mm(&title, style.title_font_size);
        let title_x = ((style.page_width_mm - title_width) / 2.0).max(style.margin_left_mm);
        cursor.place_at(
            LineKind::Title,
            title,
            title_x,
            style.title_font_size,
            style.title_height_mm,
        );
        cursor.advance(style.title_height_mm);

        for line in answer.lines() {
            match Block::classify(line) {
                Block::Heading(text) => {
                    let wrapped = wrap(&text, style.heading_font_size, style.content_width_mm());
                    if wrapped.is_empty() {
                        cursor.skip(style.heading_height_mm);
                    }
                    for wrapped in wrapped {
                        cursor.place(
                            LineKind::Heading,
                            wrapped,
                            style.heading_font_size,
                            style.heading_height_mm,
                        );
                    }
                }
                Block::Body(text) => {
                    let wrapped = wrap(text, style.body_font_size, style.content_width_mm());
                    if wrapped.is_empty() {
                        cursor.skip(style.body_line_height_mm);
                    }
                    for line in wrapped {
                        cursor.place(
                            LineKind::Body,
                            line,
                            style.body_font_size,
                            style.body_line_height_mm,
                        );
                    }
                    cursor.advance(style.paragraph_gap_mm);
                }
            }
        }

        Self {
            pages: cursor.finish(),
        }
    }

    /// Returns the pages in order.
    pub fn pages(&self) -> &[ReportPage] {
        &self.pages
    }

    /// Iterates over every placed line across all pages.
    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }
}

struct Cursor<'s> {
    style: &'s ReportStyle,
    pages: Vec<ReportPage>,
    current: ReportPage,
    /// Distance from the top edge.
    y_mm: f32,
}

impl<'s> Cursor<'s> {
    fn new(style: &'s ReportStyle) -> Self {
        Self {
            style,
            pages: Vec::new(),
            current: ReportPage::default(),
            y_mm: style.margin_top_mm,
        }
    }

    fn break_if_needed(&mut self, height_mm: f32) {
        let limit = self.style.page_height_mm - self.style.margin_bottom_mm;
        if self.y_mm + height_mm > limit && self.y_mm > self.style.margin_top_mm {
            let full = std::mem::take(&mut self.current);
            self.pages.push(full);
            self.y_mm = self.style.margin_top_mm;
        }
    }

    fn place(&mut self, kind: LineKind, text: String, font_size: f32, height_mm: f32) {
        let x = self.style.margin_left_mm;
        self.place_at(kind, text, x, font_size, height_mm);
    }

    fn place_at(&mut self, kind: LineKind, text: String, x_mm: f32, font_size: f32, height_mm: f32) {
        self.break_if_needed(height_mm);
        // Vertically centred in the line box, as a cell would be.
        let baseline_from_top = self.y_mm + height_mm / 2.0 + 0.3 * font_size * PT_TO_MM;
        self.current.lines.push(PlacedLine {
            kind,
            text,
            x_mm,
            baseline_mm: self.style.page_height_mm - baseline_from_top,
            font_size,
        });
        self.y_mm += height_mm;
    }

    fn skip(&mut self, height_mm: f32) {
        self.break_if_needed(height_mm);
        self.y_mm += height_mm;
    }

    fn advance(&mut self, height_mm: f32) {
        self.y_mm += height_mm;
    }

    fn finish(mut self) -> Vec<ReportPage> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Replaces characters the built-in fonts cannot encode.
///
/// Common typographic punctuation is transliterated; anything else outside
/// Latin-1 becomes `?`. Control characters other than tab are dropped.
pub fn to_win_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2022}' | '\u{25CF}' | '\u{25E6}' | '\u{2023}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{00A0}' | '\u{2002}'..='\u{200A}' => out.push(' '),
            '\t' => out.push_str("    "),
            c if c.is_control() => {}
            c if (' '..='~').contains(&c) || ('\u{00A1}'..='\u{00FF}').contains(&c) => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Greedy word wrap against an estimated Helvetica width.
///
/// Whitespace runs collapse to one space. Words wider than the line are
/// broken between characters. Returns no lines for blank input.
fn wrap(text: &str, font_size: f32, max_width_mm: f32) -> Vec<String> {
    let text = to_win_ansi(text);
    let space = char_width_mm(' ', font_size);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0.0;

    for word in text.split_whitespace() {
        let word_width = text_width_mm(word, font_size);

        if word_width > max_width_mm {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }
            for c in word.chars() {
                let w = char_width_mm(c, font_size);
                if width + w > max_width_mm && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    width = 0.0;
                }
                line.push(c);
                width += w;
            }
            continue;
        }

        let needed = if line.is_empty() {
            word_width
        } else {
            space + word_width
        };
        if width + needed > max_width_mm && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            width = 0.0;
        }
        if !line.is_empty() {
            line.push(' ');
            width += space;
        }
        line.push_str(word);
        width += word_width;
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().map(|c| char_width_mm(c, font_size)).sum()
}

fn char_width_mm(c: char, font_size: f32) -> f32 {
    f32::from(helvetica_width(c)) / 1000.0 * font_size * PT_TO_MM
}

/// Helvetica advance widths in 1/1000 em for printable ASCII.
fn helvetica_width(c: char) -> u16 {
    const WIDTHS: [u16; 95] = [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
    ];

    match c {
        ' '..='~' => WIDTHS[c as usize - 0x20],
        _ => 556,
    }
}

//! Markdown to PDF on printpdf's built-in fonts.
//!
//! The answer is parsed with pulldown-cmark into flat text blocks, laid out
//! onto A4 pages (word wrap, automatic page breaks) and then drawn. Built-in
//! fonts only cover a narrow encoding, so text is reduced to printable ASCII:
//! typographic punctuation is transliterated, emoji are dropped and anything
//! else becomes `?`.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use codebuddy_types::error::ExportError;

use super::html::markdown_options;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const PT_TO_MM: f32 = 0.352_78;
const LIST_INDENT_MM: f32 = 5.0;

const BODY_SIZE: f32 = 11.0;
const CODE_SIZE: f32 = 9.5;

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum BlockKind {
    Heading(u8),
    Paragraph,
    /// A list item with its marker ("-", "3.") and nesting depth.
    Item { marker: String, depth: usize },
    Code,
    TableRow,
    Rule,
}

#[derive(Debug, Clone, PartialEq)]
struct Block {
    kind: BlockKind,
    text: String,
}

/// Flatten markdown into renderable blocks.
fn collect_blocks(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;
    // One entry per open list: next number for ordered lists.
    let mut lists: Vec<Option<u64>> = Vec::new();

    fn flush(current: &mut Option<Block>, blocks: &mut Vec<Block>) {
        if let Some(block) = current.take() {
            if block.kind == BlockKind::Code || !block.text.trim().is_empty() {
                blocks.push(block);
            }
        }
    }

    for event in Parser::new_ext(markdown, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut current, &mut blocks);
                current = Some(Block {
                    kind: BlockKind::Heading(level as u8),
                    text: String::new(),
                });
            }
            Event::Start(Tag::Paragraph) => {
                if current.is_none() {
                    current = Some(Block {
                        kind: BlockKind::Paragraph,
                        text: String::new(),
                    });
                }
            }
            Event::End(TagEnd::Paragraph) => match current.as_mut() {
                Some(block) if matches!(block.kind, BlockKind::Item { .. }) => block.text.push(' '),
                _ => flush(&mut current, &mut blocks),
            },
            Event::Start(Tag::CodeBlock(_)) => {
                flush(&mut current, &mut blocks);
                current = Some(Block {
                    kind: BlockKind::Code,
                    text: String::new(),
                });
            }
            Event::Start(Tag::List(start)) => {
                flush(&mut current, &mut blocks);
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                flush(&mut current, &mut blocks);
                lists.pop();
            }
            Event::Start(Tag::Item) => {
                flush(&mut current, &mut blocks);
                let marker = match lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}.");
                        *n += 1;
                        marker
                    }
                    _ => "-".to_string(),
                };
                current = Some(Block {
                    kind: BlockKind::Item {
                        marker,
                        depth: lists.len().saturating_sub(1),
                    },
                    text: String::new(),
                });
            }
            Event::Start(Tag::TableHead) | Event::Start(Tag::TableRow) => {
                flush(&mut current, &mut blocks);
                current = Some(Block {
                    kind: BlockKind::TableRow,
                    text: String::new(),
                });
            }
            Event::End(TagEnd::TableCell) => {
                if let Some(block) = current.as_mut() {
                    block.text.push_str(" | ");
                }
            }
            Event::End(
                TagEnd::Heading(_)
                | TagEnd::CodeBlock
                | TagEnd::Item
                | TagEnd::TableHead
                | TagEnd::TableRow,
            ) => flush(&mut current, &mut blocks),
            Event::Rule => {
                flush(&mut current, &mut blocks);
                blocks.push(Block {
                    kind: BlockKind::Rule,
                    text: String::new(),
                });
            }
            Event::TaskListMarker(checked) => {
                append(&mut current, if checked { "[x] " } else { "[ ] " });
            }
            Event::Text(text) | Event::Code(text) | Event::Html(text) | Event::InlineHtml(text) => {
                append(&mut current, &text);
            }
            Event::SoftBreak => append(&mut current, " "),
            Event::HardBreak => append(&mut current, "\n"),
            _ => {}
        }
    }
    flush(&mut current, &mut blocks);

    for block in &mut blocks {
        if block.kind == BlockKind::TableRow {
            block.text = block.text.trim_end_matches([' ', '|']).to_string();
        }
    }
    blocks
}

fn append(current: &mut Option<Block>, text: &str) {
    current
        .get_or_insert_with(|| Block {
            kind: BlockKind::Paragraph,
            text: String::new(),
        })
        .text
        .push_str(text);
}

// ---------------------------------------------------------------------------
// Text sanitising
// ---------------------------------------------------------------------------

/// Reduce text to what the built-in fonts can draw.
fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' | '\n' => out.push(c),
            '\t' => out.push_str("    "),
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => out.push('"'),
            '\u{2010}'..='\u{2015}' | '\u{2212}' => out.push('-'),
            '\u{2022}' | '\u{25CF}' | '\u{25E6}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2192}' => out.push_str("->"),
            '\u{2190}' => out.push_str("<-"),
            '\u{00A0}' | '\u{2009}' | '\u{202F}' => out.push(' '),
            '\u{00D7}' => out.push('x'),
            c if is_pictograph(c) => {}
            _ => out.push('?'),
        }
    }
    out
}

fn is_pictograph(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2B00..=0x2BFF | 0xFE00..=0xFE0F | 0x200D | 0x20E3
    )
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontKind {
    Regular,
    Bold,
    Mono,
}

impl FontKind {
    /// Average glyph width as a fraction of the font size.
    fn width_factor(self) -> f32 {
        match self {
            FontKind::Regular => 0.5,
            FontKind::Bold => 0.55,
            FontKind::Mono => 0.6,
        }
    }
}

/// One line of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    page: usize,
    x_mm: f32,
    y_mm: f32,
    size: f32,
    font: FontKind,
    text: String,
}

fn max_chars(width_mm: f32, size: f32, font: FontKind) -> usize {
    let char_mm = size * font.width_factor() * PT_TO_MM;
    ((width_mm / char_mm).floor() as usize).max(1)
}

/// Greedy word wrap; words longer than a line are split.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.split('\n') {
        let mut line = String::new();
        for word in source_line.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if line.is_empty() { word.len() } else { line.len() + 1 + word.len() };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

/// Hard wrap preserving indentation, for code.
fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.trim_end_matches('\n').split('\n') {
        let chars: Vec<char> = source_line.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width) {
            lines.push(chunk.iter().collect());
        }
    }
    lines
}

struct Cursor {
    page: usize,
    y_mm: f32,
    lines: Vec<PlacedLine>,
}

impl Cursor {
    fn new() -> Self {
        Self {
            page: 0,
            y_mm: PAGE_HEIGHT_MM - MARGIN_MM,
            lines: Vec::new(),
        }
    }

    fn advance(&mut self, height_mm: f32) {
        if self.y_mm - height_mm < MARGIN_MM {
            self.page += 1;
            self.y_mm = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        self.y_mm -= height_mm;
    }

    fn gap(&mut self, mm: f32) {
        // Never carry a gap over to the top of a fresh page.
        if self.y_mm - mm >= MARGIN_MM {
            self.y_mm -= mm;
        }
    }

    fn place(&mut self, x_mm: f32, size: f32, font: FontKind, text: String) {
        self.advance(size * 1.35 * PT_TO_MM);
        self.lines.push(PlacedLine {
            page: self.page,
            x_mm,
            y_mm: self.y_mm,
            size,
            font,
            text,
        });
    }
}

fn layout(blocks: &[Block]) -> (Vec<PlacedLine>, usize) {
    let content_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let mut cursor = Cursor::new();

    for block in blocks {
        let text = sanitize(&block.text);
        match &block.kind {
            BlockKind::Heading(level) => {
                let size = match level {
                    1 => 18.0,
                    2 => 15.0,
                    3 => 13.0,
                    _ => 12.0,
                };
                cursor.gap(3.0);
                let width = max_chars(content_width, size, FontKind::Bold);
                for line in wrap_words(text.trim(), width) {
                    cursor.place(MARGIN_MM, size, FontKind::Bold, line);
                }
                cursor.gap(1.5);
            }
            BlockKind::Paragraph => {
                let width = max_chars(content_width, BODY_SIZE, FontKind::Regular);
                for line in wrap_words(&text, width) {
                    cursor.place(MARGIN_MM, BODY_SIZE, FontKind::Regular, line);
                }
                cursor.gap(2.5);
            }
            BlockKind::Item { marker, depth } => {
                let indent = LIST_INDENT_MM * (*depth as f32 + 1.0);
                let marker_width = (marker.len() as f32 + 1.0) * BODY_SIZE * 0.5 * PT_TO_MM;
                let width = max_chars(content_width - indent - marker_width, BODY_SIZE, FontKind::Regular);
                for (i, line) in wrap_words(&text, width).into_iter().enumerate() {
                    if i == 0 {
                        cursor.place(MARGIN_MM + indent - marker_width, BODY_SIZE, FontKind::Regular, format!("{marker} {line}"));
                    } else {
                        cursor.place(MARGIN_MM + indent, BODY_SIZE, FontKind::Regular, line);
                    }
                }
                cursor.gap(1.0);
            }
            BlockKind::Code | BlockKind::TableRow => {
                let width = max_chars(content_width - 4.0, CODE_SIZE, FontKind::Mono);
                for line in wrap_chars(&text, width) {
                    cursor.place(MARGIN_MM + 4.0, CODE_SIZE, FontKind::Mono, line);
                }
                cursor.gap(if block.kind == BlockKind::Code { 3.0 } else { 0.5 });
            }
            BlockKind::Rule => {
                let width = max_chars(content_width, BODY_SIZE, FontKind::Regular);
                cursor.place(MARGIN_MM, BODY_SIZE, FontKind::Regular, "_".repeat(width));
                cursor.gap(2.0);
            }
        }
    }

    let pages = cursor.page + 1;
    (cursor.lines, pages)
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, printpdf::Error> {
        Ok(Self {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
            mono: doc.add_builtin_font(BuiltinFont::Courier)?,
        })
    }

    fn get(&self, kind: FontKind) -> &IndirectFontRef {
        match kind {
            FontKind::Regular => &self.regular,
            FontKind::Bold => &self.bold,
            FontKind::Mono => &self.mono,
        }
    }
}

/// Render markdown into PDF bytes.
pub fn render_pdf(markdown: &str) -> Result<Vec<u8>, ExportError> {
    if markdown.trim().is_empty() {
        return Err(ExportError::Empty);
    }

    let blocks = collect_blocks(markdown);
    let (lines, page_count) = layout(&blocks);

    let (doc, first_page, first_layer) = PdfDocument::new(
        "CodeBuddy Answer",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let fonts = Fonts::load(&doc).map_err(|e| ExportError::Render(e.to_string()))?;

    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..page_count {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for line in lines.into_iter().filter(|l| !l.text.is_empty()) {
        let Some(layer) = layers.get(line.page) else {
            continue;
        };
        layer.use_text(
            line.text,
            line.size,
            Mm(line.x_mm),
            Mm(line.y_mm),
            fonts.get(line.font),
        );
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Render(e.to_string()))
}

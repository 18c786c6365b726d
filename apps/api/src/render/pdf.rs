//! Built-in export pipeline: writes the rendered CV as a text PDF.
//!
//! Layout is a greedy word wrap against an average Helvetica glyph width,
//! paginating when the next line would cross the bottom margin. Raster
//! settings in `ExportSettings` do not apply here; the output is vector text.
//! Encoding is CPU-bound and runs inside `spawn_blocking`.

use async_trait::async_trait;
use bytes::Bytes;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::render::export::{ExportError, ExportPipeline, ExportSettings};
use crate::render::preview::RenderedCv;

const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 10.5;
const LEADING_FACTOR: f32 = 1.35;
/// Average Helvetica advance width in em; good enough to keep lines inside the margin.
const AVERAGE_GLYPH_EM: f32 = 0.5;
const BULLET: &str = "- ";

pub struct PdfExporter;

#[async_trait]
impl ExportPipeline for PdfExporter {
    async fn export(
        &self,
        cv: &RenderedCv,
        settings: &ExportSettings,
    ) -> Result<Bytes, ExportError> {
        let cv = cv.clone();
        let settings = *settings;
        let bytes = tokio::task::spawn_blocking(move || write_pdf(&cv, &settings)).await??;
        Ok(Bytes::from(bytes))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// One positioned run of text on a page.
#[derive(Debug, Clone, PartialEq)]
struct TextLine {
    font: Font,
    size: f32,
    x: f32,
    y: f32,
    text: String,
}

/// Lays out the CV into pages of positioned lines.
fn layout(cv: &RenderedCv, settings: &ExportSettings) -> Vec<Vec<TextLine>> {
    let (page_width, page_height) = settings.page_size_pt();
    let margin = settings.margin_pt();
    let text_width = page_width - 2.0 * margin;

    let mut pages: Vec<Vec<TextLine>> = vec![Vec::new()];
    let mut y = page_height - margin;

    let mut emit = |pages: &mut Vec<Vec<TextLine>>,
                    font: Font,
                    size: f32,
                    indent: f32,
                    text: String| {
        let advance = size * LEADING_FACTOR;
        if y - advance < margin {
            pages.push(Vec::new());
            y = page_height - margin;
        }
        y -= advance;
        if let Some(page) = pages.last_mut() {
            page.push(TextLine {
                font,
                size,
                x: margin + indent,
                y,
                text,
            });
        }
    };

    emit(&mut pages, Font::Bold, TITLE_SIZE, 0.0, cv.title.clone());
    if let Some(contact) = &cv.contact_line {
        for line in wrap_words(contact, max_chars(text_width, BODY_SIZE)) {
            emit(&mut pages, Font::Regular, BODY_SIZE, 0.0, line);
        }
    }

    let bullet_indent = BODY_SIZE * AVERAGE_GLYPH_EM * BULLET.len() as f32;
    for section in &cv.sections {
        emit(&mut pages, Font::Bold, HEADING_SIZE, 0.0, section.heading.clone());
        for line in &section.lines {
            if section.bulleted {
                let width = max_chars(text_width - bullet_indent, BODY_SIZE);
                for (i, wrapped) in wrap_words(line, width).into_iter().enumerate() {
                    let (indent, text) = if i == 0 {
                        (0.0, format!("{BULLET}{wrapped}"))
                    } else {
                        (bullet_indent, wrapped)
                    };
                    emit(&mut pages, Font::Regular, BODY_SIZE, indent, text);
                }
            } else {
                for wrapped in wrap_words(line, max_chars(text_width, BODY_SIZE)) {
                    emit(&mut pages, Font::Regular, BODY_SIZE, 0.0, wrapped);
                }
            }
        }
    }

    pages
}

fn max_chars(width_pt: f32, size: f32) -> usize {
    ((width_pt / (size * AVERAGE_GLYPH_EM)).floor() as usize).max(1)
}

/// Greedy word wrap by character count. Words longer than a line are split.
fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 {
            word.len()
        } else {
            current_len + 1 + word.len()
        };
        if needed > max_chars && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Maps text onto single-byte WinAnsi codes; characters outside Latin-1 become `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn page_operations(lines: &[TextLine]) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![line.font.resource_name().into(), real(line.size)],
        ));
        ops.push(Operation::new("Td", vec![real(line.x), real(line.y)]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_text(&line.text))],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

fn font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

fn write_pdf(cv: &RenderedCv, settings: &ExportSettings) -> Result<Vec<u8>, ExportError> {
    let (page_width, page_height) = settings.page_size_pt();
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = font(&mut doc, "Helvetica");
    let bold = font(&mut doc, "Helvetica-Bold");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource_name() => regular,
            Font::Bold.resource_name() => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in layout(cv, settings) {
        let content = Content {
            operations: page_operations(&lines),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(page_width), real(page_height)],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

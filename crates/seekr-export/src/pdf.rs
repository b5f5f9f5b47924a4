use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

use crate::layout::{Line, ReportLayout, Style};

// A4 in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const LEADING: i64 = 15;
const INDENT: i64 = 12;
const FOOTER_Y: i64 = 30;

/// Renders `layout` into a complete PDF document.
pub fn render(layout: &ReportLayout) -> lopdf::Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let total = layout.page_count();
    let mut kids: Vec<Object> = Vec::with_capacity(total);
    for (index, lines) in layout.pages().iter().enumerate() {
        let content = page_content(lines, index + 1, total);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => total as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn page_content(lines: &[Line], page: usize, total: usize) -> Content {
    let mut operations = Vec::with_capacity(lines.len() * 5 + 5);
    let mut y = PAGE_HEIGHT - MARGIN;

    for line in lines {
        if !line.text.is_empty() {
            let (font, size) = match line.style {
                Style::Title => ("F2", 16),
                Style::Heading => ("F2", 12),
                Style::Body => ("F1", 10),
            };
            let x = MARGIN + INDENT * i64::from(line.indent);
            push_text(&mut operations, font, size, x, y, &line.text);
        }
        y -= LEADING;
    }

    let footer = format!("Page {page} of {total}");
    push_text(&mut operations, "F1", 9, PAGE_WIDTH - MARGIN - 60, FOOTER_Y, &footer);

    Content { operations }
}

fn push_text(operations: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, text: &str) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new("Tf", vec![font.into(), size.into()]));
    operations.push(Operation::new("Td", vec![x.into(), y.into()]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::String(encode_text(text), StringFormat::Literal)],
    ));
    operations.push(Operation::new("ET", vec![]));
}

/// Latin-1 bytes for the standard fonts; anything outside that range, and
/// control characters, are replaced.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            0x09 => b' ',
            code if code < 0x20 || (0x7f..0xa0).contains(&code) => b'?',
            code if code < 0x100 => code as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn encodes_latin1_and_replaces_the_rest() {
        assert_eq!(encode_text("Café\tok"), b"Caf\xe9 ok".to_vec());
        assert_eq!(encode_text("日本"), b"??".to_vec());
    }

    #[test]
    fn renders_a_loadable_document_with_every_page() {
        let layout = ReportLayout::build(&[], Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        let bytes = render(&layout).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), layout.page_count());

        let raw = String::from_utf8_lossy(&bytes);
        assert!(raw.contains("(Page 1 of 1)"));
        assert!(raw.contains("(Job applications report)"));
    }
}

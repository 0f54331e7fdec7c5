//! Generated pages: the title page and the table of contents
//!
//! Each renderer returns a standalone one-page [`Document`]. The TOC is text
//! only. Its link annotations are attached after merging, once the chart
//! pages they point at exist in the output (see [`crate::pdf::links`]).

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use log::warn;

use crate::date::format_long;
use crate::error::Result;
use crate::layout::{PageSize, TitleLayout, TocLayout};
use crate::pdf::fonts::{to_win_ansi, BaseFont};

/// Heading printed at the top of the contents page
pub const TOC_HEADING: &str = "Table of Contents";

/// One line of the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    /// 1-based page number in the merged document
    pub absolute_start_page: usize,
    /// Named destination of the song's first page
    pub destination_id: String,
}

/// Collects text-drawing operations for a single page
struct PageCanvas {
    size: PageSize,
    operations: Vec<Operation>,
}

impl PageCanvas {
    fn new(size: PageSize) -> Self {
        Self { size, operations: vec![Operation::new("g", vec![Object::Integer(0)])] }
    }

    fn text_at(&mut self, font: BaseFont, font_size: f32, x: f32, y: f32, text: &str) {
        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new(
            "Tf",
            vec![Object::Name(font.resource_name().as_bytes().to_vec()), Object::Real(font_size)],
        ));
        self.operations.push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
        self.operations.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
        ));
        self.operations.push(Operation::new("ET", vec![]));
    }

    fn text_left(&mut self, font: BaseFont, font_size: f32, x: f32, y: f32, text: &str) {
        self.text_at(font, font_size, x, y, text);
    }

    fn text_centered(&mut self, font: BaseFont, font_size: f32, y: f32, text: &str) {
        let width = font.text_width(text, font_size);
        let x = (self.size.width - width) / 2.0;
        self.text_at(font, font_size, x, y, text);
    }

    fn text_right(&mut self, font: BaseFont, font_size: f32, right: f32, y: f32, text: &str) {
        let width = font.text_width(text, font_size);
        self.text_at(font, font_size, right - width, y, text);
    }

    /// Wrap the drawn operations into a one-page document
    fn into_document(self) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in [BaseFont::Helvetica, BaseFont::HelveticaBold] {
            let font_id = doc.add_object(font.dictionary());
            fonts.set(font.resource_name(), font_id);
        }

        let content = Content { operations: self.operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        // Resources and MediaBox live on the page itself so the page keeps
        // them once it is moved under another page tree.
        let media_box: Vec<Object> = self.size.media_box().iter().map(|&v| Object::Real(v)).collect();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box,
            "Resources" => dictionary! { "Font" => fonts },
            "Contents" => content_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }
}

/// Title page: gig name centred at the vertical mid-point, date below it
pub fn render_title_page(gig_name: &str, gig_date: &NaiveDate) -> Result<Document> {
    let layout = TitleLayout::default();
    let mut canvas = PageCanvas::new(layout.page);

    canvas.text_centered(
        BaseFont::HelveticaBold,
        layout.name_font_size,
        layout.name_baseline(),
        gig_name,
    );
    canvas.text_centered(
        BaseFont::Helvetica,
        layout.date_font_size,
        layout.date_baseline(),
        &format_long(gig_date),
    );

    canvas.into_document()
}

/// Contents page: heading, then one "title ........ page" line per entry
pub fn render_toc_page(entries: &[TocEntry], layout: &TocLayout) -> Result<Document> {
    let mut canvas = PageCanvas::new(layout.page);

    canvas.text_centered(
        BaseFont::HelveticaBold,
        layout.heading_font_size,
        layout.heading_baseline(),
        TOC_HEADING,
    );

    let capacity = layout.lines_per_page();
    if entries.len() > capacity {
        warn!(
            "Table of contents has {} entries but only {} fit on the page",
            entries.len(),
            capacity
        );
    }

    for (line, entry) in entries.iter().enumerate() {
        let y = layout.line_baseline(line);
        canvas.text_left(BaseFont::Helvetica, layout.entry_font_size, layout.left_edge(), y, &entry.title);
        canvas.text_right(
            BaseFont::Helvetica,
            layout.entry_font_size,
            layout.right_edge(),
            y,
            &entry.absolute_start_page.to_string(),
        );
    }

    canvas.into_document()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (x, y, text) of every string shown on the first page
    fn shown_text(doc: &Document) -> Vec<(f32, f32, String)> {
        let page_id = *doc.get_pages().get(&1).unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

        let mut position = (0.0, 0.0);
        let mut shown = Vec::new();
        for op in content.operations {
            match op.operator.as_str() {
                "Td" => {
                    position = (op.operands[0].as_float().unwrap(), op.operands[1].as_float().unwrap());
                }
                "Tj" => {
                    if let Object::String(bytes, _) = &op.operands[0] {
                        shown.push((position.0, position.1, String::from_utf8_lossy(bytes).into_owned()));
                    }
                }
                _ => {}
            }
        }
        shown
    }

    fn texts(doc: &Document) -> Vec<String> {
        shown_text(doc).into_iter().map(|(_, _, text)| text).collect()
    }

    fn entry(title: &str, page: usize) -> TocEntry {
        TocEntry {
            title: title.to_string(),
            absolute_start_page: page,
            destination_id: format!("song_{:03}", page),
        }
    }

    #[test]
    fn test_title_page_is_single_letter_page() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let doc = render_title_page("The Midnight Showcase", &date).unwrap();

        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page = doc.get_dictionary(pages[&1]).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_float().unwrap(), 612.0);
        assert_eq!(media_box[3].as_float().unwrap(), 792.0);

        assert_eq!(texts(&doc), vec!["The Midnight Showcase", "March 07, 2026"]);
    }

    #[test]
    fn test_title_page_centres_name_above_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let doc = render_title_page("Gig", &date).unwrap();
        let shown = shown_text(&doc);

        let layout = TitleLayout::default();
        let name_width = BaseFont::HelveticaBold.text_width("Gig", layout.name_font_size);
        assert!((shown[0].0 - (612.0 - name_width) / 2.0).abs() < 0.01);
        assert_eq!(shown[0].1, 436.0);
        assert_eq!(shown[1].1, 396.0);
    }

    #[test]
    fn test_toc_page_lists_titles_and_page_numbers() {
        let entries = vec![entry("Alive", 3), entry("Faith", 5)];
        let doc = render_toc_page(&entries, &TocLayout::default()).unwrap();

        assert_eq!(doc.get_pages().len(), 1);
        assert_eq!(texts(&doc), vec!["Table of Contents", "Alive", "3", "Faith", "5"]);
    }

    #[test]
    fn test_toc_lines_follow_layout() {
        let layout = TocLayout::default();
        let entries = vec![entry("Alive", 3), entry("Faith", 5)];
        let shown = shown_text(&render_toc_page(&entries, &layout).unwrap());

        // heading, then (title, page) pairs
        assert_eq!(shown[0].1, 720.0);
        assert_eq!((shown[1].0, shown[1].1), (72.0, 682.0));
        assert_eq!(shown[3].1, 664.0);

        let digit_width = BaseFont::Helvetica.text_width("3", layout.entry_font_size);
        assert!((shown[2].0 - (layout.right_edge() - digit_width)).abs() < 0.01);
    }

    #[test]
    fn test_toc_page_has_no_annotations() {
        let doc = render_toc_page(&[entry("Alive", 3)], &TocLayout::default()).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        assert!(!doc.get_dictionary(page_id).unwrap().has(b"Annots"));
    }

    #[test]
    fn test_empty_toc_still_renders_heading() {
        let doc = render_toc_page(&[], &TocLayout::default()).unwrap();
        assert_eq!(texts(&doc), vec![TOC_HEADING]);
    }
}

//! Small PDFs written with lopdf for loader tests.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};
use std::path::Path;

/// Pages and Info entries of a generated PDF.
pub struct PdfFixture<'a> {
    pages: &'a [&'a str],
    title: Option<&'a str>,
    author: Option<&'a str>,
}

impl<'a> PdfFixture<'a> {
    /// One page per entry.
    pub fn new(pages: &'a [&'a str]) -> Self {
        Self {
            pages,
            title: None,
            author: None,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn author(mut self, author: &'a str) -> Self {
        self.author = Some(author);
        self
    }
}

/// Write a PDF with one page per fixture entry; `\n` starts a new text line.
pub fn write_pdf(path: &Path, fixture: &PdfFixture<'_>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in fixture.pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new("TL", vec![12.into()]),
            Operation::new("Td", vec![40.into(), 800.into()]),
        ];
        for line in text.split('\n') {
            operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
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
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if fixture.title.is_some() || fixture.author.is_some() {
        let mut info = lopdf::Dictionary::new();
        if let Some(title) = fixture.title {
            info.set("Title", Object::String(title.as_bytes().to_vec(), StringFormat::Literal));
        }
        if let Some(author) = fixture.author {
            info.set("Author", Object::String(author.as_bytes().to_vec(), StringFormat::Literal));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);
    }

    doc.save(path).expect("write test PDF");
}

//! Fixtures shared by tests across the crate.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Ways a single page can be damaged while the rest of the document stays intact.
#[derive(Debug, Clone, Copy)]
pub enum PageDefect {
    /// Content stream claims FlateDecode but holds plain bytes.
    CorruptFlate,
    /// `Contents` points at an object that does not exist.
    DanglingContents,
    /// `Resources` is an integer.
    ResourcesNotDictionary,
}

/// Builds a PDF with one Courier text line per page.
pub fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
    let (mut doc, _) = build_document(page_texts);
    save(&mut doc)
}

/// Like `build_pdf`, with the page at `page_index` (0-based) damaged.
pub fn build_pdf_with_defect(
    page_texts: &[&str],
    page_index: usize,
    defect: PageDefect,
) -> Vec<u8> {
    let (mut doc, page_ids) = build_document(page_texts);
    let page_id = page_ids[page_index];

    match defect {
        PageDefect::CorruptFlate => {
            let content_id = doc
                .get_dictionary(page_id)
                .unwrap()
                .get(b"Contents")
                .unwrap()
                .as_reference()
                .unwrap();
            let broken = Stream::new(
                dictionary! { "Filter" => "FlateDecode" },
                b"BT /F1 24 Tf (not zlib) Tj ET".to_vec(),
            );
            doc.objects.insert(content_id, Object::Stream(broken));
        }
        PageDefect::DanglingContents => {
            let page = doc.get_object_mut(page_id).unwrap().as_dict_mut().unwrap();
            page.set("Contents", Object::Reference((9999, 0)));
        }
        PageDefect::ResourcesNotDictionary => {
            let page = doc.get_object_mut(page_id).unwrap().as_dict_mut().unwrap();
            page.set("Resources", 5);
        }
    }

    save(&mut doc)
}

fn build_document(page_texts: &[&str]) -> (Document, Vec<ObjectId>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    let mut page_ids = Vec::new();
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box(),
        });
        kids.push(page_id.into());
        page_ids.push(page_id);
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    (doc, page_ids)
}

fn save(doc: &mut Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn media_box() -> Vec<Object> {
    vec![0.into(), 0.into(), 612.into(), 792.into()]
}

pub const BOUNDARY: &str = "resume-readiness-test-boundary";

/// Encodes a `multipart/form-data` body. `file` is `(file_name, content_type, bytes)`.
pub fn multipart_body(file: Option<(&str, &str, &[u8])>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some((file_name, content_type, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

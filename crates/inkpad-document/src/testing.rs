// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Test fixtures shared with dependent crates through the `test-fixtures`
// feature.

use lopdf::{Document, Object, Stream, dictionary};

/// Build a PDF with one page per entry of `sizes` (points). The first page
/// carries its own MediaBox; the rest inherit it from the page tree when
/// `inherit` is set.
pub fn pdf_with_pages(sizes: &[(i64, i64)], inherit: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for (index, (width, height)) in sizes.iter().enumerate() {
        let content = Stream::new(dictionary! {}, b"BT /F1 12 Tf 72 720 Td (Hello) Tj ET".to_vec());
        let content_id = doc.add_object(content);
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if !inherit || index == 0 {
            page.set(
                "MediaBox",
                vec![0.into(), 0.into(), Object::Integer(*width), Object::Integer(*height)],
            );
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let (width, height) = sizes.first().copied().unwrap_or((612, 792));
    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), Object::Integer(width), Object::Integer(height)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

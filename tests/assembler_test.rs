//! End-to-end tests for the extraction pipeline on synthetic documents.

use std::fs;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as LopdfDocument, Object, Stream};
use tempfile::tempdir;

use pdfstruct::{AssemblerConfig, Element, PageAssembler};

/// Operations drawing one line of text at an absolute position.
fn text_ops(font: &str, size: i64, x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Operations drawing a two-cell table row on one baseline.
fn row_ops(font: &str, size: i64, x: i64, dx: i64, y: i64, left: &str, right: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(left)]),
        Operation::new("Td", vec![dx.into(), 0.into()]),
        Operation::new("Tj", vec![Object::string_literal(right)]),
        Operation::new("ET", vec![]),
    ]
}

/// Build a two-page document: page 1 carries headings and prose, page 2
/// carries an aligned table plus one RGB and one CMYK embedded image.
fn build_sample_pdf(path: &Path) {
    let mut doc = LopdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let helvetica = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let helvetica_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let fonts = dictionary! { "F1" => helvetica, "F2" => helvetica_bold };

    // Page 1
    let mut ops = Vec::new();
    ops.extend(text_ops("F1", 18, 72, 720, "Quarterly Report"));
    ops.extend(text_ops("F1", 10, 72, 680, "Revenue grew in every region."));
    ops.extend(text_ops("F1", 10, 72, 668, "Costs stayed flat."));
    ops.extend(text_ops("F2", 10, 72, 656, "Summary"));
    ops.extend(text_ops("F1", 10, 72, 560, "Outlook remains stable."));
    let content1 = doc.add_object(Stream::new(
        dictionary! {},
        Content { operations: ops }.encode().unwrap(),
    ));
    let resources1 = doc.add_object(dictionary! { "Font" => fonts.clone() });
    let page1 = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content1,
        "Resources" => resources1,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });

    // Page 2
    let mut ops = Vec::new();
    ops.extend(row_ops("F1", 12, 72, 128, 700, "Name", "Age"));
    ops.extend(row_ops("F1", 12, 72, 128, 680, "Alice", "30"));
    ops.extend(row_ops("F1", 12, 72, 128, 660, "Bob", "25"));
    let content2 = doc.add_object(Stream::new(
        dictionary! {},
        Content { operations: ops }.encode().unwrap(),
    ));

    let rgb_image = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 2,
            "BitsPerComponent" => 8,
            "ColorSpace" => "DeviceRGB",
        },
        vec![200u8; 12],
    ));
    let cmyk_image = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 2,
            "BitsPerComponent" => 8,
            "ColorSpace" => "DeviceCMYK",
        },
        vec![100u8; 16],
    ));
    let resources2 = doc.add_object(dictionary! {
        "Font" => fonts,
        "XObject" => dictionary! { "Im1" => rgb_image, "Im2" => cmyk_image },
    });
    let page2 = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content2,
        "Resources" => resources2,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page1.into(), page2.into()],
        "Count" => 2,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.compress();
    doc.save(path).unwrap();
}

fn element_kind(element: &Element) -> u8 {
    match element {
        Element::Heading { .. } => 0,
        Element::Table(_) => 1,
        Element::Figure(_) => 2,
        Element::Paragraph { .. } => 3,
    }
}

#[test]
fn test_page_numbers_contiguous_and_ordered() {
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("sample.pdf");
    build_sample_pdf(&pdf);

    let config = AssemblerConfig::new(dir.path().join("structured"), dir.path().join("figures"));
    let output = PageAssembler::new(config).parse(&pdf).unwrap();

    assert_eq!(output.document.page_count(), 2);
    for (i, page) in output.document.pages.iter().enumerate() {
        assert_eq!(page.page_num, i as u32 + 1);
    }
}

#[test]
fn test_heading_classification() {
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("sample.pdf");
    build_sample_pdf(&pdf);

    let config = AssemblerConfig::new(dir.path().join("structured"), dir.path().join("figures"));
    let output = PageAssembler::new(config).parse(&pdf).unwrap();

    let headings: Vec<&str> = output.document.pages[0]
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::Heading { content } => Some(content.as_str()),
            _ => None,
        })
        .collect();

    // The 18 pt line and the bold line qualify; 10 pt body lines do not.
    assert_eq!(headings, vec!["Quarterly Report", "Summary"]);

    // Body text appears only through paragraph segmentation.
    let paragraphs: Vec<&str> = output.document.pages[0]
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::Paragraph { content } => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert!(paragraphs
        .iter()
        .any(|p| p.contains("Revenue grew in every region.")));
}

#[test]
fn test_heading_text_also_appears_in_paragraphs() {
    // Heading and paragraph extraction are independent passes over the
    // same page; a heading line is not excluded from the paragraph text.
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("sample.pdf");
    build_sample_pdf(&pdf);

    let config = AssemblerConfig::new(dir.path().join("structured"), dir.path().join("figures"));
    let output = PageAssembler::new(config).parse(&pdf).unwrap();

    let page = &output.document.pages[0];
    let heading_present = page.elements.iter().any(
        |e| matches!(e, Element::Heading { content } if content == "Quarterly Report"),
    );
    let duplicated_in_paragraph = page.elements.iter().any(
        |e| matches!(e, Element::Paragraph { content } if content.contains("Quarterly Report")),
    );

    assert!(heading_present);
    assert!(duplicated_in_paragraph);
}

#[test]
fn test_table_extracted_from_aligned_rows() {
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("sample.pdf");
    build_sample_pdf(&pdf);

    let config = AssemblerConfig::new(dir.path().join("structured"), dir.path().join("figures"));
    let output = PageAssembler::new(config).parse(&pdf).unwrap();

    let tables: Vec<_> = output.document.pages[1]
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::Table(t) => Some(t),
            _ => None,
        })
        .collect();

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].row_count(), 3);
    assert_eq!(tables[0].column_count(), 2);
    assert_eq!(tables[0].data[0], vec!["Name", "Age"]);
    assert_eq!(tables[0].data[1], vec!["Alice", "30"]);

    // No tables on the prose page
    assert!(!output.document.pages[0].elements.iter().any(|e| e.is_table()));
}

#[test]
fn test_figure_filter_and_naming() {
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("sample.pdf");
    build_sample_pdf(&pdf);

    let figures_dir = dir.path().join("figures");
    let config = AssemblerConfig::new(dir.path().join("structured"), &figures_dir);
    let output = PageAssembler::new(config).parse(&pdf).unwrap();

    let figures: Vec<&str> = output.document.pages[1]
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::Figure(f) => Some(f.filename.as_str()),
            _ => None,
        })
        .collect();

    // The RGB image (4 channels) is persisted; the CMYK image
    // (5 channels) is skipped and leaves a gap in the index sequence.
    assert_eq!(figures, vec!["page2_fig1.png"]);
    assert!(figures_dir.join("page2_fig1.png").is_file());
    assert!(!figures_dir.join("page2_fig2.png").exists());

    let png = fs::read(figures_dir.join("page2_fig1.png")).unwrap();
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn test_element_order_within_page() {
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("sample.pdf");
    build_sample_pdf(&pdf);

    let config = AssemblerConfig::new(dir.path().join("structured"), dir.path().join("figures"));
    let output = PageAssembler::new(config).parse(&pdf).unwrap();

    for page in &output.document.pages {
        let kinds: Vec<u8> = page.elements.iter().map(element_kind).collect();
        let mut sorted = kinds.clone();
        sorted.sort();
        assert_eq!(kinds, sorted, "elements out of order on page {}", page.page_num);
    }
}

#[test]
fn test_persisted_json_shape() {
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("sample.pdf");
    build_sample_pdf(&pdf);

    let config = AssemblerConfig::new(dir.path().join("structured"), dir.path().join("figures"));
    let output = PageAssembler::new(config).parse(&pdf).unwrap();

    assert_eq!(
        output.structured_path,
        dir.path().join("structured").join("sample.json")
    );

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output.structured_path).unwrap()).unwrap();

    let pages = json["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page["page_num"], i as u64 + 1);
        for element in page["elements"].as_array().unwrap() {
            match element["type"].as_str().unwrap() {
                "heading" | "paragraph" => assert!(element["content"].is_string()),
                "table" => assert!(element["data"].is_array()),
                "figure" => assert!(element["filename"].is_string()),
                other => panic!("unexpected element type {}", other),
            }
        }
    }
}

#[test]
fn test_reparse_is_idempotent() {
    let dir = tempdir().unwrap();
    let pdf = dir.path().join("sample.pdf");
    build_sample_pdf(&pdf);

    let figures_dir = dir.path().join("figures");
    let config = AssemblerConfig::new(dir.path().join("structured"), &figures_dir);
    let assembler = PageAssembler::new(config);

    let first = assembler.parse(&pdf).unwrap();
    let first_json = fs::read(&first.structured_path).unwrap();
    let first_figs = list_files(&figures_dir);

    let second = assembler.parse(&pdf).unwrap();
    let second_json = fs::read(&second.structured_path).unwrap();
    let second_figs = list_files(&figures_dir);

    assert_eq!(first_json, second_json);
    assert_eq!(first_figs, second_figs);
}

fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

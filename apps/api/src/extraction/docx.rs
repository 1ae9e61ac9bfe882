use std::io::{Cursor, Read};

use quick_xml::{events::Event, Reader};
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from an in-memory `.docx` package.
///
/// Only the main document part is read. Each `w:p` ends with a newline so the
/// metadata locator can still see line structure.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::ParseFailure(format!("failed to open DOCX archive: {e}")))?;

    let mut document = archive.by_name(DOCUMENT_PART).map_err(|e| {
        ExtractError::ParseFailure(format!("missing {DOCUMENT_PART} in DOCX archive: {e}"))
    })?;

    let mut xml = String::new();
    document
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::ParseFailure(format!("failed to read DOCX XML: {e}")))?;

    document_xml_to_text(&xml)
}

fn document_xml_to_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut output = String::new();
    let mut in_text_node = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_text_node = true;
                }
            }
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" => output.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_node {
                    let value = e.unescape().map_err(|err| {
                        ExtractError::ParseFailure(format!("invalid DOCX text run: {err}"))
                    })?;
                    output.push_str(&value);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:t" => in_text_node = false,
                b"w:p" => output.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(ExtractError::ParseFailure(format!(
                    "failed to parse DOCX XML at byte {}: {err}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(output)
}

/// Builds a minimal `.docx` package with one paragraph per entry.
#[cfg(test)]
pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    use std::io::Write;

    let body: String = paragraphs
        .iter()
        .map(|p| {
            let escaped = p
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;");
            format!(r#"<w:p><w:r><w:t xml:space="preserve">{escaped}</w:t></w:r></w:p>"#)
        })
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_become_lines() {
        let bytes = build_docx(&["Title line", "Abstract", "Body & more"]);
        let text = extract_text(&bytes).unwrap();
        assert_eq!(text, "Title line\nAbstract\nBody & more\n");
    }

    #[test]
    fn test_tabs_and_breaks_are_preserved() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(document_xml_to_text(xml).unwrap(), "a\tb\nc\n");
    }

    #[test]
    fn test_empty_paragraph_keeps_its_line() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>Title</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Abstract</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(document_xml_to_text(xml).unwrap(), "Title\n\nAbstract\n");
    }

    #[test]
    fn test_text_outside_runs_is_ignored() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:instrText>PAGE</w:instrText><w:r><w:t>kept</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(document_xml_to_text(xml).unwrap(), "kept\n");
    }

    #[test]
    fn test_not_a_zip_is_parse_failure() {
        let err = extract_text(b"PK-but-not-really").unwrap_err();
        assert!(err.to_string().contains("DOCX archive"));
    }

    #[test]
    fn test_zip_without_document_part_is_parse_failure() {
        use std::io::Write;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_text(&bytes).unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART));
    }
}

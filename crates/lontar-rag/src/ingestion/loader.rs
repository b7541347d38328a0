//! Loaders producing one Document per PDF page or CSV row

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Document, SourceRef};

/// Load a PDF file, producing one Document per page.
///
/// Page text comes from pdf-extract; the page count is cross-checked with
/// lopdf so citations always report a real page number.
pub fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    let filename = display_name(path);
    tracing::info!("Loading pages from {}...", filename);

    let data = std::fs::read(path)
        .map_err(|e| Error::file_parse(&filename, format!("Failed to read file: {}", e)))?;

    let pages = pdf_extract::extract_text_from_mem_by_pages(&data)
        .map_err(|e| Error::file_parse(&filename, format!("Failed to extract text: {}", e)))?;

    let total_pages = match lopdf::Document::load_mem(&data) {
        Ok(doc) => doc.get_pages().len() as u32,
        Err(_) => pages.len() as u32,
    };

    let documents: Vec<Document> = pages
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let source = SourceRef::pdf(filename.clone(), i as u32 + 1, total_pages);
            Document::new(clean_text(&text), source)
        })
        .collect();

    tracing::info!("Total pages: {}", documents.len());
    Ok(documents)
}

/// Load a CSV file, producing one Document per data row.
///
/// Each row is rendered as `header: value` lines so column names survive
/// into the retrieved context.
pub fn load_csv(path: &Path) -> Result<Vec<Document>> {
    let filename = display_name(path);
    tracing::info!("Loading CSV {}...", filename);

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| Error::file_parse(&filename, format!("Failed to open CSV: {}", e)))?;

    let headers = reader
        .headers()
        .map_err(|e| Error::file_parse(&filename, format!("Failed to read headers: {}", e)))?
        .clone();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            Error::file_parse(&filename, format!("Failed to read row {}: {}", i + 1, e))
        })?;

        let content = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| format!("{}: {}", header, value))
            .collect::<Vec<_>>()
            .join("\n");

        rows.push((i as u32 + 1, content));
    }

    let total_rows = rows.len() as u32;
    let documents: Vec<Document> = rows
        .into_iter()
        .map(|(row_number, content)| {
            let source = SourceRef::csv(filename.clone(), row_number, total_rows);
            Document::new(content, source)
        })
        .collect();

    tracing::info!("Total rows: {}", documents.len());
    Ok(documents)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Strip null bytes and collapse the ragged line breaks PDF extraction leaves behind
fn clean_text(text: &str) -> String {
    text.replace('\0', "")
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileType;
    use std::io::Write;

    #[test]
    fn csv_rows_become_documents() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "name,population").unwrap();
        writeln!(file, "Jakarta,10560000").unwrap();
        writeln!(file, "Surabaya,2874000").unwrap();
        file.flush().unwrap();

        let documents = load_csv(file.path()).unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].content, "name: Jakarta\npopulation: 10560000");
        assert_eq!(documents[0].source.file_type, FileType::Csv);
        assert_eq!(documents[0].source.row_number, Some(1));
        assert_eq!(documents[1].source.row_number, Some(2));
        assert_eq!(documents[1].source.row_count, Some(2));
    }

    #[test]
    fn empty_csv_yields_no_documents() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "name,population").unwrap();
        file.flush().unwrap();

        let documents = load_csv(file.path()).unwrap();
        assert!(documents.is_empty());
    }

    #[test]
    fn missing_file_is_a_parse_error() {
        let err = load_csv(Path::new("/nonexistent/data.csv")).unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn clean_text_drops_blank_lines() {
        let cleaned = clean_text("  first line  \n\n\0\n second ");
        assert_eq!(cleaned, "first line\nsecond");
    }
}

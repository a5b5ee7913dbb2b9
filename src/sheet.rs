use std::io::Read;
use std::path::Path;

use crate::error::Error;
use crate::model::AddressRecord;

const SHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Required header cells, in the workbook's native column-header scheme:
/// name, role title, church, street address, postal code.
pub const COL_NAME: &str = "이름";
pub const COL_TITLE: &str = "직분";
pub const COL_ORGANIZATION: &str = "교회";
pub const COL_ADDRESS: &str = "주소";
pub const COL_POSTAL: &str = "우편번호";

/// Child lookup tolerant of writers that omit the spreadsheetml namespace.
fn sml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| {
        n.tag_name().name() == name
            && n.tag_name().namespace().is_none_or(|ns| ns == SHEET_NS)
    })
}

fn sml_children<'a>(
    node: roxmltree::Node<'a, 'a>,
    name: &'a str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'a>> {
    node.children().filter(move |n| {
        n.tag_name().name() == name
            && n.tag_name().namespace().is_none_or(|ns| ns == SHEET_NS)
    })
}

/// Concatenated text of all <t> descendants (shared strings may be split
/// into formatting runs).
fn gather_text(node: roxmltree::Node) -> String {
    node.descendants()
        .filter(|n| n.tag_name().name() == "t")
        .filter_map(|n| n.text())
        .collect()
}

/// Parse a cell reference like "B12" into (zero-based column, 1-based row).
fn parse_cell_ref(r: &str) -> Option<(usize, u32)> {
    let split = r.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = r.split_at(split);
    if letters.is_empty() {
        return None;
    }
    let mut col = 0usize;
    for ch in letters.chars() {
        let v = (ch.to_ascii_uppercase() as u8).checked_sub(b'A')? as usize;
        if v >= 26 {
            return None;
        }
        col = col * 26 + v + 1;
    }
    let row = digits.parse::<u32>().ok()?;
    Some((col - 1, row))
}

fn read_zip_entry<R: Read + std::io::Seek>(
    zip: &mut zip::ZipArchive<R>,
    name: &str,
) -> Option<String> {
    let mut content = String::new();
    zip.by_name(name).ok()?.read_to_string(&mut content).ok()?;
    Some(content)
}

fn parse_shared_strings(xml: &str) -> Result<Vec<String>, Error> {
    let doc = roxmltree::Document::parse(xml)?;
    Ok(sml_children(doc.root_element(), "si")
        .map(gather_text)
        .collect())
}

/// Resolve one <c> element to its display string.
fn cell_value(c: roxmltree::Node, shared: &[String]) -> Option<String> {
    let cell_type = c.attribute("t").unwrap_or("n");
    match cell_type {
        "s" => {
            let idx: usize = sml(c, "v")?.text()?.trim().parse().ok()?;
            shared.get(idx).cloned()
        }
        "inlineStr" => sml(c, "is").map(gather_text),
        _ => sml(c, "v").and_then(|v| v.text()).map(str::to_string),
    }
}

/// One worksheet row: 1-based row number plus (column index, value) pairs.
struct SheetRow {
    number: u32,
    cells: Vec<(usize, String)>,
}

impl SheetRow {
    fn get(&self, col: usize) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| *c == col)
            .map(|(_, v)| v.as_str())
    }
}

fn parse_rows(xml: &str, shared: &[String]) -> Result<Vec<SheetRow>, Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let sheet_data = sml(doc.root_element(), "sheetData")
        .ok_or_else(|| Error::InvalidSheet("worksheet has no sheetData".into()))?;

    let mut rows = Vec::new();
    for (fallback_num, row_node) in sml_children(sheet_data, "row").enumerate() {
        let number = row_node
            .attribute("r")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(fallback_num as u32 + 1);

        let mut cells = Vec::new();
        let mut next_col = 0usize;
        for c in sml_children(row_node, "c") {
            let col = c
                .attribute("r")
                .and_then(parse_cell_ref)
                .map(|(col, _)| col)
                .unwrap_or(next_col);
            next_col = col + 1;
            if let Some(value) = cell_value(c, shared) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    cells.push((col, trimmed.to_string()));
                }
            }
        }
        rows.push(SheetRow { number, cells });
    }
    Ok(rows)
}

/// Read the address list from an XLSX workbook.
///
/// The first non-empty row is the header row and must contain all five
/// required columns. Every following row with any content must fill every
/// required column; a partially filled row is an error, raised here before
/// any rendering starts. Fully empty trailing rows are skipped.
pub fn parse(path: &Path) -> Result<Vec<AddressRecord>, Error> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;

    let mut zip = zip::ZipArchive::new(file)
        .map_err(|_| Error::InvalidSheet("file is not a ZIP archive".into()))?;

    let shared = match read_zip_entry(&mut zip, "xl/sharedStrings.xml") {
        Some(xml) => parse_shared_strings(&xml)?,
        None => Vec::new(),
    };

    // First worksheet; sheet1.xml by convention, otherwise whatever is there.
    let sheet_name = if zip.by_name("xl/worksheets/sheet1.xml").is_ok() {
        "xl/worksheets/sheet1.xml".to_string()
    } else {
        let mut candidates: Vec<String> = zip
            .file_names()
            .filter(|n| n.starts_with("xl/worksheets/") && n.ends_with(".xml"))
            .map(str::to_string)
            .collect();
        candidates.sort();
        candidates.into_iter().next().ok_or_else(|| {
            Error::InvalidSheet("no worksheet found (is this an XLSX file?)".into())
        })?
    };
    let sheet_xml = read_zip_entry(&mut zip, &sheet_name)
        .ok_or_else(|| Error::InvalidSheet(format!("could not read {sheet_name}")))?;

    let rows = parse_rows(&sheet_xml, &shared)?;
    let mut iter = rows.into_iter().filter(|r| !r.cells.is_empty());

    let header = iter
        .next()
        .ok_or_else(|| Error::InvalidSheet("worksheet is empty".into()))?;

    let required: [&'static str; 5] =
        [COL_NAME, COL_TITLE, COL_ORGANIZATION, COL_ADDRESS, COL_POSTAL];
    let mut columns = [0usize; 5];
    let mut missing = Vec::new();
    for (i, &label) in required.iter().enumerate() {
        match header.cells.iter().find(|(_, v)| v.as_str() == label) {
            Some((col, _)) => columns[i] = *col,
            None => missing.push(label),
        }
    }
    if !missing.is_empty() {
        return Err(Error::InvalidSheet(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for row in iter {
        let mut values: [&str; 5] = [""; 5];
        for (i, &col) in columns.iter().enumerate() {
            values[i] = row.get(col).ok_or(Error::MissingField {
                row: row.number,
                column: required[i],
            })?;
        }
        records.push(AddressRecord {
            name: values[0].to_string(),
            title: values[1].to_string(),
            organization: values[2].to_string(),
            address: values[3].to_string(),
            postal_code: values[4].to_string(),
        });
    }

    log::debug!("Parsed {} address records from {}", records.len(), path.display());
    Ok(records)
}

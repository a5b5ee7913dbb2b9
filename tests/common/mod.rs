#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use labelsheet::AddressRecord;
use zip::write::SimpleFileOptions;

/// Per-test scratch directory under tests/output/.
pub fn output_dir(test_name: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(test_name);
    fs::create_dir_all(&dir).expect("create output dir");
    dir
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn col_letters(mut col: usize) -> String {
    let mut out = String::new();
    col += 1;
    while col > 0 {
        let rem = (col - 1) % 26;
        out.insert(0, (b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    out
}

/// Build a minimal but well-formed XLSX workbook with inline-string cells.
/// Empty strings produce no cell element, i.e. a truly missing cell.
pub fn write_xlsx(path: &Path, rows: &[&[&str]]) {
    let file = fs::File::create(path).expect("create xlsx");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#,
    )
    .unwrap();

    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheets><sheet name="Sheet1" sheetId="1"/></sheets>
</workbook>"#,
    )
    .unwrap();

    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
"#,
    );
    for (ri, row) in rows.iter().enumerate() {
        let row_num = ri + 1;
        sheet.push_str(&format!("<row r=\"{row_num}\">"));
        for (ci, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            sheet.push_str(&format!(
                "<c r=\"{}{row_num}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                col_letters(ci),
                xml_escape(value),
            ));
        }
        sheet.push_str("</row>\n");
    }
    sheet.push_str("</sheetData>\n</worksheet>");

    zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
    zip.write_all(sheet.as_bytes()).unwrap();
    zip.finish().unwrap();
}

/// Like [`write_xlsx`], but routes every value through xl/sharedStrings.xml
/// with `t="s"` index cells, the way Excel itself saves text. Entries with a
/// space are split into two formatting runs, as styled cells come out.
pub fn write_xlsx_shared(path: &Path, rows: &[&[&str]]) {
    let file = fs::File::create(path).expect("create xlsx");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#,
    )
    .unwrap();

    zip.start_file("xl/workbook.xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheets><sheet name="Sheet1" sheetId="1"/></sheets>
</workbook>"#,
    )
    .unwrap();

    // Shared-string table in first-use order, duplicates collapsed.
    let mut shared: Vec<&str> = Vec::new();
    for row in rows {
        for &value in row.iter() {
            if !value.is_empty() && !shared.contains(&value) {
                shared.push(value);
            }
        }
    }

    let mut sst = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
"#,
    );
    for s in &shared {
        match s.split_once(' ') {
            Some((head, tail)) => sst.push_str(&format!(
                "<si><r><t xml:space=\"preserve\">{} </t></r><r><t>{}</t></r></si>\n",
                xml_escape(head),
                xml_escape(tail),
            )),
            None => sst.push_str(&format!("<si><t>{}</t></si>\n", xml_escape(s))),
        }
    }
    sst.push_str("</sst>");
    zip.start_file("xl/sharedStrings.xml", options).unwrap();
    zip.write_all(sst.as_bytes()).unwrap();

    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
"#,
    );
    for (ri, row) in rows.iter().enumerate() {
        let row_num = ri + 1;
        sheet.push_str(&format!("<row r=\"{row_num}\">"));
        for (ci, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let idx = shared.iter().position(|s| s == value).unwrap();
            sheet.push_str(&format!(
                "<c r=\"{}{row_num}\" t=\"s\"><v>{idx}</v></c>",
                col_letters(ci),
            ));
        }
        sheet.push_str("</row>\n");
    }
    sheet.push_str("</sheetData>\n</worksheet>");

    zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
    zip.write_all(sheet.as_bytes()).unwrap();
    zip.finish().unwrap();
}

pub const HEADER: &[&str] = &["이름", "직분", "교회", "주소", "우편번호"];

pub fn sample_record() -> AddressRecord {
    AddressRecord {
        name: "Kim".to_string(),
        title: "Elder".to_string(),
        organization: "ABC Church".to_string(),
        address: "1 Main St".to_string(),
        postal_code: "12345".to_string(),
    }
}

/// Page count as declared by the /Count entry of the page tree.
pub fn page_count(pdf: &[u8]) -> Option<i32> {
    let needle = b"/Count ";
    let pos = pdf.windows(needle.len()).position(|w| w == needle)?;
    let rest = &pdf[pos + needle.len()..];
    let end = rest
        .iter()
        .position(|b| !b.is_ascii_digit() && *b != b'-')
        .unwrap_or(rest.len());
    std::str::from_utf8(&rest[..end]).ok()?.parse().ok()
}

/// Concatenated plain text of every Flate-compressed stream in the file.
/// Content streams are the only zlib streams the renderer emits; font and
/// cmap streams fail to inflate and are skipped.
pub fn content_streams(pdf: &[u8]) -> String {
    let mut out = String::new();
    let open = b"stream\n";
    let close = b"\nendstream";
    let mut at = 0usize;
    while let Some(rel) = pdf[at..].windows(open.len()).position(|w| w == open) {
        let start = at + rel + open.len();
        let Some(len) = pdf[start..].windows(close.len()).position(|w| w == close) else {
            break;
        };
        if let Ok(raw) = miniz_oxide::inflate::decompress_to_vec_zlib(&pdf[start..start + len]) {
            out.push_str(&String::from_utf8_lossy(&raw));
        }
        at = start + len + close.len();
    }
    out
}

/// Number of cell outlines drawn across all pages (one `re` op per cell).
/// Content streams carry one operation per line, so anchoring on the line
/// end keeps label text containing "re" out of the count.
pub fn outline_count(pdf: &[u8]) -> usize {
    content_streams(pdf)
        .lines()
        .filter(|line| line.ends_with(" re"))
        .count()
}

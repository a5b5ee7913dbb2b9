pub mod layout;

use std::collections::HashSet;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{FontEntry, encode_as_gids, register_font, to_winansi_bytes};
use crate::model::{AddressRecord, LabelStyles, MM, PageGeometry};

use layout::{WrappedLine, cell_slot, wrap_text};

/// Outline stroke for the cut/fold boundary of every cell: #b1b3b1.
const OUTLINE_RGB: [f32; 3] = [177.0 / 255.0, 179.0 / 255.0, 177.0 / 255.0];

/// Horizontal inset of the text block inside a cell.
const TEXT_INSET: f32 = 2.0 * MM;

/// Fixed baseline offsets of the four lines, measured down from the
/// text-block top edge (itself 5mm below the cell top).
const LINE_OFFSETS: [f32; 4] = [5.0 * MM, 11.0 * MM, 17.0 * MM, 23.0 * MM];

fn show_line(content: &mut Content, entry: &FontEntry, size: f32, x: f32, y: f32, text: &str) {
    let bytes = match &entry.char_to_gid {
        Some(map) => encode_as_gids(text, map),
        None => to_winansi_bytes(text),
    };
    content
        .begin_text()
        .set_font(Name(entry.pdf_name.as_bytes()), size)
        .next_line(x, y)
        .show(Str(&bytes))
        .end_text();
}

/// Draw one field into the cell: wrapped lines starting at `first_baseline`,
/// continuation lines descending by the font's natural line height. Long text
/// overflows the cell's vertical bounds; that is accepted, not defended.
fn draw_field(
    content: &mut Content,
    lines: &[WrappedLine],
    entry: &FontEntry,
    size: f32,
    text_x: f32,
    first_baseline: f32,
    wrap_width: f32,
    right_aligned: bool,
) {
    let line_h = entry.line_height(size);
    for (i, line) in lines.iter().enumerate() {
        let x = if right_aligned {
            text_x + wrap_width - line.width
        } else {
            text_x
        };
        let y = first_baseline - i as f32 * line_h;
        show_line(content, entry, size, x, y, &line.text);
    }
}

/// Render the records into finished PDF bytes.
///
/// Deterministic: identical `(records, geometry, styles)` produce identical
/// bytes. An empty record list yields a single empty page with no cells.
pub fn render_labels(
    records: &[AddressRecord],
    geometry: &PageGeometry,
    styles: &LabelStyles,
) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();

    if !geometry.fits_page() {
        log::warn!("label grid exceeds the page bounds; output will be clipped");
    }

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    // Phase 1: collect the characters each style variant will draw, then
    // embed the two font variants subsetted to exactly those.
    let mut bold_chars: HashSet<char> = HashSet::new();
    let mut normal_chars: HashSet<char> = HashSet::new();
    for record in records {
        bold_chars.extend(record.honorific_line().chars());
        bold_chars.extend(record.postal_line().chars());
        normal_chars.extend(record.organization.chars());
        normal_chars.extend(record.address.chars());
    }
    bold_chars.insert(' ');
    normal_chars.insert(' ');

    let normal = register_font(
        &mut pdf,
        &styles.font_family,
        false,
        "F1".to_string(),
        &mut alloc,
        &normal_chars,
    )?;
    let bold = register_font(
        &mut pdf,
        &styles.font_family,
        true,
        "F2".to_string(),
        &mut alloc,
        &bold_chars,
    )?;

    let t_fonts = t0.elapsed();

    // Phase 2: lay the cells out page by page. Placement is index-driven;
    // a record whose slot lands past the pages emitted so far opens a new
    // content stream.
    let wrap_width = geometry.cell_width - 2.0 * TEXT_INSET;
    let mut all_contents: Vec<Content> = Vec::new();
    let mut current = Content::new();

    for (i, record) in records.iter().enumerate() {
        let slot = cell_slot(i, geometry);
        if slot.page > all_contents.len() {
            all_contents.push(std::mem::replace(&mut current, Content::new()));
        }

        current.save_state();
        current.set_stroke_rgb(OUTLINE_RGB[0], OUTLINE_RGB[1], OUTLINE_RGB[2]);
        current.rect(slot.x, slot.y, geometry.cell_width, geometry.cell_height);
        current.stroke();
        current.restore_state();

        let text_x = slot.x + TEXT_INSET;
        let text_top = slot.y + geometry.cell_height - 5.0 * MM;

        let fields: [(String, &FontEntry, f32, bool); 4] = [
            (record.honorific_line(), &bold, styles.emphasis_size, false),
            (record.organization.clone(), &normal, styles.body_size, false),
            (record.address.clone(), &normal, styles.body_size, false),
            (record.postal_line(), &bold, styles.emphasis_size, true),
        ];
        for ((text, entry, size, right_aligned), offset) in fields.into_iter().zip(LINE_OFFSETS) {
            let lines = wrap_text(&text, entry, size, wrap_width);
            draw_field(
                &mut current,
                &lines,
                entry,
                size,
                text_x,
                text_top - offset,
                wrap_width,
                right_aligned,
            );
        }
    }
    all_contents.push(current);

    let t_layout = t0.elapsed();

    // Phase 3: assemble the document now that the page count is known.
    let n = all_contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in all_contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geometry.page_width, geometry.page_height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(Name(normal.pdf_name.as_bytes()), normal.font_ref);
        fonts.pair(Name(bold.pdf_name.as_bytes()), bold.font_ref);
    }

    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: font_embed={:.1}ms, layout={:.1}ms, assembly={:.1}ms ({} records, {} pages)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_layout - t_fonts).as_secs_f64() * 1000.0,
        (t_assembly - t_layout).as_secs_f64() * 1000.0,
        records.len(),
        n,
    );

    Ok(pdf.finish())
}

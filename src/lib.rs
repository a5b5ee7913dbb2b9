mod dispatch;
mod error;
mod fonts;
mod model;
mod pdf;
mod sheet;

pub use dispatch::{Opener, SystemOpener, dispatch_artifact};
pub use error::Error;
pub use model::{AddressRecord, LabelStyles, MM, PageGeometry};
pub use pdf::layout::{CellSlot, cell_slot};
pub use pdf::render_labels;
pub use sheet::parse as parse_workbook;

use std::path::Path;
use std::time::Instant;

/// Read the address list from `input` and write the finished label PDF to
/// `output`, using the stock A4 14-label geometry and default styles.
///
/// The PDF is committed with a single write after rendering succeeds; a
/// failure at any earlier stage leaves no partial artifact behind.
pub fn generate_labels(input: &Path, output: &Path) -> Result<(), Error> {
    generate_labels_with(
        input,
        output,
        &PageGeometry::a4_label_14(),
        &LabelStyles::default(),
    )
}

/// [`generate_labels`] with explicit geometry and styles.
pub fn generate_labels_with(
    input: &Path,
    output: &Path,
    geometry: &PageGeometry,
    styles: &LabelStyles,
) -> Result<(), Error> {
    let t0 = Instant::now();

    let records = sheet::parse(input)?;
    let t_parse = t0.elapsed();

    let bytes = pdf::render_labels(&records, geometry, styles)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms ({} records, output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        records.len(),
        bytes.len(),
    );

    Ok(())
}

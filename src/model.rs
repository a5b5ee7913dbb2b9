/// Millimetres to PDF points (1/72 inch).
pub const MM: f32 = 72.0 / 25.4;

/// One row of the address list. Fields are read once from the workbook and
/// never defaulted: an empty required cell is rejected at the read boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct AddressRecord {
    pub name: String,
    pub title: String,
    pub organization: String,
    pub address: String,
    pub postal_code: String,
}

impl AddressRecord {
    /// First label line: name + role title + the fixed honorific suffix.
    pub fn honorific_line(&self) -> String {
        format!("{}{}님 귀하", self.name, self.title)
    }

    /// Last label line: the postal code with its fixed prefix.
    pub fn postal_line(&self) -> String {
        format!("(우) {}", self.postal_code)
    }
}

/// Page and label-cell measurements, all in PDF points.
///
/// The engine does not validate that the cells fit the page; see
/// [`PageGeometry::fits_page`]. Inconsistent values yield clipped or
/// overlapping output, not an error. `cols` and `rows` must both be
/// nonzero; placement is undefined on an empty grid.
#[derive(Clone, Copy, Debug)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub gap_h: f32,
    pub gap_v: f32,
    pub cols: usize,
    pub rows: usize,
}

impl PageGeometry {
    /// The stock sheet the program was built for: A4 portrait carrying
    /// fourteen 99.1 x 38.1 mm labels in two columns of seven.
    pub fn a4_label_14() -> Self {
        Self {
            page_width: 210.0 * MM,
            page_height: 297.0 * MM,
            cell_width: 99.1 * MM,
            cell_height: 38.1 * MM,
            margin_top: 15.5 * MM,
            margin_bottom: 15.5 * MM,
            margin_left: 5.0 * MM,
            margin_right: 5.0 * MM,
            gap_h: 2.5 * MM,
            gap_v: 0.0,
            cols: 2,
            rows: 7,
        }
    }

    /// Labels per page.
    pub fn capacity(&self) -> usize {
        self.cols * self.rows
    }

    /// Whether the grid plus margins stays inside the page on both axes.
    pub fn fits_page(&self) -> bool {
        let grid_w = self.margin_left
            + self.cols as f32 * self.cell_width
            + self.cols.saturating_sub(1) as f32 * self.gap_h
            + self.margin_right;
        let grid_h = self.margin_top
            + self.rows as f32 * self.cell_height
            + self.rows.saturating_sub(1) as f32 * self.gap_v
            + self.margin_bottom;
        grid_w <= self.page_width + 0.5 && grid_h <= self.page_height + 0.5
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4_label_14()
    }
}

/// Font configuration for the three text styles used on a label:
/// normal (organization, address), bold (honorific line) and
/// bold right-aligned (postal line).
#[derive(Clone, Debug)]
pub struct LabelStyles {
    /// Family name looked up in the system font index.
    pub font_family: String,
    /// Point size for the normal lines.
    pub body_size: f32,
    /// Point size for the bold lines.
    pub emphasis_size: f32,
}

impl Default for LabelStyles {
    fn default() -> Self {
        Self {
            font_family: "NanumGothic".to_string(),
            body_size: 10.0,
            emphasis_size: 11.0,
        }
    }
}

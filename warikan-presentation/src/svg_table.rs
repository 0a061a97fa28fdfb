use std::fmt::Write;

const FONT_SIZE: u32 = 14;
const CELL_PADDING: u32 = 10;
const LINE_HEIGHT: u32 = FONT_SIZE + CELL_PADDING * 2;
const HEADER_BG: &str = "#4a5568";
const HEADER_TEXT: &str = "#ffffff";
const ROW_BG_EVEN: &str = "#f7fafc";
const ROW_BG_ODD: &str = "#edf2f7";
const ROW_TEXT: &str = "#1a202c";
const BORDER_COLOR: &str = "#cbd5e0";
const FONT_FAMILY: &str = "Noto Sans CJK TC";
const NARROW_CHAR_WIDTH: f32 = 8.5;

#[derive(Clone, Copy, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// A header row plus data rows, rendered as a rounded SVG table.
#[derive(Default)]
pub struct SvgTable {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl SvgTable {
    pub fn new(headers: impl IntoIterator<Item = (&'static str, Align)>) -> Self {
        let (headers, aligns) = headers
            .into_iter()
            .map(|(h, a)| (h.to_string(), a))
            .unzip();
        Self {
            headers,
            aligns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: impl IntoIterator<Item = String>) {
        self.rows.push(row.into_iter().collect());
    }

    pub fn width(&self) -> u32 {
        let col_count = self.headers.len() as u32;
        self.column_widths().iter().sum::<u32>() + (col_count + 1) * CELL_PADDING
    }

    pub fn height(&self) -> u32 {
        LINE_HEIGHT * (1 + self.rows.len() as u32) + 2
    }

    fn column_widths(&self) -> Vec<u32> {
        let mut widths: Vec<u32> = self.headers.iter().map(|h| estimate_width(h)).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(idx) {
                    *width = (*width).max(estimate_width(cell));
                }
            }
        }
        widths
    }

    /// Writes the table as a `<g>` group translated to `y_offset`, so a
    /// caller can stack several tables in one document.
    pub fn render_into(&self, svg: &mut String, y_offset: u32) {
        let widths = self.column_widths();
        let total_width = self.width();
        let total_height = self.height();
        let baseline = LINE_HEIGHT / 2 + FONT_SIZE / 2 - 2;

        let _ = writeln!(svg, r#"<g transform="translate(0,{y_offset})">"#);
        let _ = writeln!(
            svg,
            r#"<rect width="{total_width}" height="{total_height}" fill="{BORDER_COLOR}" rx="4" />"#
        );
        let _ = writeln!(
            svg,
            r#"<rect x="1" y="1" width="{}" height="{LINE_HEIGHT}" fill="{HEADER_BG}" rx="3" />"#,
            total_width - 2
        );

        let mut x = CELL_PADDING;
        for (idx, header) in self.headers.iter().enumerate() {
            let (text_x, anchor) = cell_anchor(x, widths[idx], self.aligns[idx]);
            let _ = writeln!(
                svg,
                r#"<text x="{text_x}" y="{baseline}" fill="{HEADER_TEXT}" text-anchor="{anchor}">{}</text>"#,
                escape_xml(header)
            );
            x += widths[idx] + CELL_PADDING;
        }

        for (row_idx, row) in self.rows.iter().enumerate() {
            let row_y = LINE_HEIGHT * (1 + row_idx as u32) + 1;
            let bg = if row_idx % 2 == 0 { ROW_BG_EVEN } else { ROW_BG_ODD };
            let _ = writeln!(
                svg,
                r#"<rect x="1" y="{row_y}" width="{}" height="{LINE_HEIGHT}" fill="{bg}" />"#,
                total_width - 2
            );

            let mut x = CELL_PADDING;
            for (idx, cell) in row.iter().enumerate() {
                if idx >= widths.len() {
                    break;
                }
                let (text_x, anchor) = cell_anchor(x, widths[idx], self.aligns[idx]);
                let _ = writeln!(
                    svg,
                    r#"<text x="{text_x}" y="{}" fill="{ROW_TEXT}" text-anchor="{anchor}">{}</text>"#,
                    row_y + baseline - 1,
                    escape_xml(cell)
                );
                x += widths[idx] + CELL_PADDING;
            }
        }

        let _ = writeln!(svg, "</g>");
    }
}

fn cell_anchor(x: u32, width: u32, align: Align) -> (u32, &'static str) {
    match align {
        Align::Left => (x, "start"),
        Align::Right => (x + width, "end"),
    }
}

// CJK glyphs run roughly twice the width of Latin ones in the table font.
fn estimate_width(text: &str) -> u32 {
    let units: f32 = text
        .chars()
        .map(|c| if (c as u32) > 0x2E7F { 2.0 } else { 1.0 })
        .sum();
    (units * NARROW_CHAR_WIDTH).ceil() as u32
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wraps already-rendered table groups in a single SVG document.
pub fn document(width: u32, height: u32, body: &str) -> String {
    let mut svg = String::with_capacity(body.len() + 256);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(
        svg,
        r#"<style>text {{ font-family: {FONT_FAMILY}; font-size: {FONT_SIZE}px; }}</style>"#
    );
    svg.push_str(body);
    svg.push_str("</svg>\n");
    svg
}

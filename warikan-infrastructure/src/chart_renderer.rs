use std::{
    path::PathBuf,
    sync::{Arc, LazyLock},
};

use resvg::usvg::{Options, Tree};
use sha2::{Digest, Sha256};
use tiny_skia::Pixmap;
use warikan_application::{ChartReference, ChartRenderError, ChartRenderer};
use warikan_domain::SettlementSummary;
use warikan_presentation::ChartPresenter;

// The table font must cover CJK member and item names.
static FONT_OPTIONS: LazyLock<Options> = LazyLock::new(|| {
    let mut fontdb = resvg::usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    fontdb.set_sans_serif_family("Noto Sans CJK TC");

    Options {
        fontdb: Arc::new(fontdb),
        ..Options::default()
    }
});

/// Rasterizes the table SVG at its intrinsic size.
fn svg_to_png(svg: &str) -> Option<Vec<u8>> {
    let tree = Tree::from_str(svg, &FONT_OPTIONS).ok()?;
    let mut pixmap = Pixmap::new(
        tree.size().width().ceil() as u32,
        tree.size().height().ceil() as u32,
    )?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    pixmap.encode_png().ok()
}

/// Rasterizes the settlement tables and stores the PNG under a
/// content-addressed name, so re-rendering the same round is a no-op
/// at the file level.
pub struct SvgChartRenderer {
    base_url: String,
    chart_dir: PathBuf,
}

impl SvgChartRenderer {
    pub fn new(base_url: impl Into<String>, chart_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: base_url.into(),
            chart_dir: chart_dir.into(),
        }
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, summary: &SettlementSummary) -> Result<ChartReference, ChartRenderError> {
        let svg = ChartPresenter::render_svg(summary);
        let png = svg_to_png(&svg)
            .ok_or_else(|| ChartRenderError::Render("svg rasterization failed".to_string()))?;

        let file_name = format!("{:x}.png", Sha256::digest(&png));
        std::fs::create_dir_all(&self.chart_dir)?;
        let path = self.chart_dir.join(&file_name);
        std::fs::write(&path, &png)?;
        tracing::info!(path = %path.display(), "chart artifact written");

        Ok(ChartReference {
            url: format!(
                "{}/chart/{file_name}",
                self.base_url.trim_end_matches('/')
            ),
        })
    }
}

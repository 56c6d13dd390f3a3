//! Composite generation for the selected item.
//!
//! ```text
//! selection ──► resolve size ──► ┌ load cover ─┐
//!                                ├ load code  ─┼─► compute_layout ─► render ─► PNG
//!                                └ make QR    ─┘
//! ```
//!
//! Checks that need no network (a selection exists, the size is valid) run
//! first, so a bad request fails before anything is fetched. The three source
//! images are then produced in parallel with `rayon::join`; once all three
//! finish, the first failure in the order cover, code, QR is returned and the
//! other results are dropped. Nothing is written on failure.
//!
//! Items without cover art get a neutral placeholder; the code image and the
//! QR link are required.

use crate::config::AppConfig;
use crate::imaging::{
    CodeGenerationError, FontSet, ImageLoadError, ImageSource, LoadedImage, QrStyle,
    SourceImages, encode_png, generate_qr_image, render_plan,
};
use crate::layout::{DrawPlan, LayoutEngine, LayoutError, LayoutStyle};
use crate::resolution::{Resolution, ResolutionError, ResolutionRequest};
use crate::types::CatalogItem;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("No item selected: run `covercard select <n>` after a search")]
    NoSelection,
    #[error(transparent)]
    InvalidDimensions(#[from] ResolutionError),
    #[error("Image load failed: {0}")]
    ImageLoad(#[from] ImageLoadError),
    #[error("Code generation failed: {0}")]
    CodeGeneration(#[from] CodeGenerationError),
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Styling and naming knobs for a composition.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    pub style: LayoutStyle,
    pub qr: QrStyle,
    pub file_prefix: String,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            style: LayoutStyle::default(),
            qr: QrStyle::default(),
            file_prefix: "spotify".to_string(),
        }
    }
}

impl ComposeOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            style: config.layout_style(),
            qr: config.qr_style(),
            file_prefix: config.output.file_prefix.clone(),
        }
    }
}

/// Laid-out sources, ready to render.
#[derive(Debug, Clone)]
pub struct PlannedComposite {
    pub resolution: Resolution,
    pub images: SourceImages,
    pub plan: DrawPlan,
}

/// A finished composite.
#[derive(Debug, Clone)]
pub struct Composite {
    /// `{prefix}-{type}-{id}.png`
    pub file_name: String,
    pub resolution: Resolution,
    pub plan: DrawPlan,
    pub png: Vec<u8>,
}

/// Validate, load sources and lay them out, without rendering.
pub fn plan_composite(
    selection: Option<&CatalogItem>,
    request: &ResolutionRequest,
    source: &impl ImageSource,
    options: &ComposeOptions,
) -> Result<PlannedComposite, ComposeError> {
    let item = selection.ok_or(ComposeError::NoSelection)?;
    let resolution = request.resolve()?;
    info!(id = %item.id, item_type = %item.item_type, %resolution, "composing");

    let images = load_sources(item, source, &options.qr)?;
    let plan = LayoutEngine::new(options.style).compute(
        item,
        images.cover.dimensions(),
        images.code.dimensions(),
        images.qr.dimensions(),
        resolution.width,
        resolution.height,
    )?;
    debug!(ops = plan.ops.len(), "layout computed");

    Ok(PlannedComposite {
        resolution,
        images,
        plan,
    })
}

/// Build the composite PNG for `selection` at the requested resolution.
pub fn compose(
    selection: Option<&CatalogItem>,
    request: &ResolutionRequest,
    source: &impl ImageSource,
    fonts: &FontSet,
    options: &ComposeOptions,
) -> Result<Composite, ComposeError> {
    let item = selection.ok_or(ComposeError::NoSelection)?;
    let planned = plan_composite(Some(item), request, source, options)?;

    let canvas = render_plan(&planned.plan, &planned.images, fonts);
    let png = encode_png(&canvas)?;
    debug!(bytes = png.len(), "encoded composite");

    Ok(Composite {
        file_name: file_name(&options.file_prefix, item),
        resolution: planned.resolution,
        plan: planned.plan,
        png,
    })
}

/// Produce cover, code and QR rasters concurrently.
pub fn load_sources(
    item: &CatalogItem,
    source: &impl ImageSource,
    qr: &QrStyle,
) -> Result<SourceImages, ComposeError> {
    let (cover, (code, qr)) = rayon::join(
        || load_cover(item, source),
        || {
            rayon::join(
                || load_code(item, source),
                || generate_qr_image(item.url.as_deref().unwrap_or_default(), qr),
            )
        },
    );

    Ok(SourceImages {
        cover: cover?,
        code: code?,
        qr: qr?,
    })
}

fn load_cover(item: &CatalogItem, source: &impl ImageSource) -> Result<LoadedImage, ImageLoadError> {
    match item.cover_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => source.load(url),
        None => {
            debug!(id = %item.id, "no cover art, using placeholder");
            Ok(LoadedImage::placeholder())
        }
    }
}

fn load_code(item: &CatalogItem, source: &impl ImageSource) -> Result<LoadedImage, ImageLoadError> {
    let url = item
        .code_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or(ImageLoadError::MissingUrl("code"))?;
    source.load(url)
}

/// Download file name: `{prefix}-{type}-{id}.png`, `motiv` when the id is empty.
///
/// Characters outside `[A-Za-z0-9_-]` are replaced so the name is safe on
/// every filesystem.
pub fn file_name(prefix: &str, item: &CatalogItem) -> String {
    let id = if item.id.trim().is_empty() {
        "motiv"
    } else {
        item.id.as_str()
    };
    format!(
        "{}-{}-{}.png",
        sanitize(prefix),
        item.item_type,
        sanitize(id)
    )
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

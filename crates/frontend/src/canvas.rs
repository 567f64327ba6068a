//! 2D canvas painting and tile image loading.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use airmap_shared::overlay::DrawCommand;
use airmap_shared::projection::TILE_SIZE;
use airmap_shared::risk::with_alpha;
use airmap_shared::tiles::{LoadProgress, TileLoadTracker, TileOutcome, TilePlacement};
use dioxus::logger::tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

const MARKER_OUTLINE: &str = "#ffffff";
const SELECTED_OUTLINE: &str = "#111827";
const LABEL_FONT: &str = "600 12px system-ui, sans-serif";
const LABEL_BACKGROUND: &str = "rgba(255,255,255,0.85)";
const LABEL_TEXT: &str = "#1f2937";
const LABEL_PADDING: f64 = 4.0;
const LABEL_HEIGHT: f64 = 18.0;
/// Opacity of a halo at its centre; it fades to zero at the rim.
const HALO_ALPHA: f64 = 0.45;

#[derive(Clone)]
pub struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Surface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or("canvas has no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Surface { canvas, ctx })
    }

    pub fn from_element_id(id: &str) -> Result<Self, JsValue> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .ok_or_else(|| JsValue::from_str(&format!("no element #{id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        Surface::new(canvas)
    }

    pub fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    pub fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    pub fn clear(&self, background: &str) {
        self.ctx.set_fill_style_str(background);
        self.ctx.fill_rect(0.0, 0.0, self.width(), self.height());
    }

    pub fn draw_tile(&self, image: &HtmlImageElement, x: f64, y: f64) -> Result<(), JsValue> {
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, TILE_SIZE, TILE_SIZE)
    }

    pub fn draw_placeholder(&self, color: &str, x: f64, y: f64) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, TILE_SIZE, TILE_SIZE);
    }

    /// Paint the overlay commands in order.
    pub fn paint(&self, commands: &[DrawCommand]) -> Result<(), JsValue> {
        for command in commands {
            match command {
                DrawCommand::Halo {
                    x,
                    y,
                    radius,
                    color,
                } => self.halo(*x, *y, *radius, color)?,
                DrawCommand::Marker {
                    x,
                    y,
                    radius,
                    fill,
                    selected,
                    ..
                } => self.marker(*x, *y, *radius, fill, *selected)?,
                DrawCommand::Label { x, y, text } => self.label(*x, *y, text)?,
            }
        }
        Ok(())
    }

    fn halo(&self, x: f64, y: f64, radius: f64, color: &str) -> Result<(), JsValue> {
        let gradient = self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius)?;
        gradient.add_color_stop(0.0, &with_alpha(color, HALO_ALPHA))?;
        gradient.add_color_stop(1.0, &with_alpha(color, 0.0))?;
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        self.ctx.arc(x, y, radius, 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }

    fn marker(&self, x: f64, y: f64, radius: f64, fill: &str, selected: bool) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.arc(x, y, radius, 0.0, TAU)?;
        self.ctx.set_fill_style_str(fill);
        self.ctx.fill();
        if selected {
            self.ctx.set_stroke_style_str(SELECTED_OUTLINE);
            self.ctx.set_line_width(4.0);
        } else {
            self.ctx.set_stroke_style_str(MARKER_OUTLINE);
            self.ctx.set_line_width(2.0);
        }
        self.ctx.stroke();
        Ok(())
    }

    fn label(&self, x: f64, y: f64, text: &str) -> Result<(), JsValue> {
        self.ctx.set_font(LABEL_FONT);
        let width = self.ctx.measure_text(text)?.width() + LABEL_PADDING * 2.0;
        self.ctx.set_fill_style_str(LABEL_BACKGROUND);
        self.ctx
            .fill_rect(x - width / 2.0, y - LABEL_HEIGHT / 2.0, width, LABEL_HEIGHT);
        self.ctx.set_fill_style_str(LABEL_TEXT);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.fill_text(text, x, y)
    }
}

type Handler = Closure<dyn FnMut()>;
type OnComplete = Rc<RefCell<Option<Box<dyn FnOnce()>>>>;

/// One draw pass worth of tile images.
///
/// Dropping the batch detaches every load/error handler and clears the image
/// sources, so tiles still in flight never reach the canvas.
pub struct TileBatch {
    images: Vec<HtmlImageElement>,
    _handlers: Vec<(Handler, Handler)>,
}

impl TileBatch {
    /// Start loading `tiles` (placement plus URL) onto `surface`.
    ///
    /// `on_complete` runs once, after every tile has either drawn or been
    /// replaced by a placeholder. It runs immediately when `tiles` is empty.
    pub fn start(
        surface: &Surface,
        tiles: Vec<(TilePlacement, String)>,
        tracker: &Rc<RefCell<TileLoadTracker>>,
        placeholder: &str,
        on_complete: impl FnOnce() + 'static,
    ) -> Result<Self, JsValue> {
        let generation = tracker.borrow_mut().begin(tiles.len());
        let on_complete: OnComplete = Rc::new(RefCell::new(Some(Box::new(on_complete))));

        if tiles.is_empty() {
            finish(&on_complete);
            return Ok(TileBatch {
                images: Vec::new(),
                _handlers: Vec::new(),
            });
        }

        let mut images = Vec::with_capacity(tiles.len());
        let mut handlers = Vec::with_capacity(tiles.len());
        for (placement, url) in tiles {
            let image = HtmlImageElement::new()?;

            let onload = {
                let image = image.clone();
                let surface = surface.clone();
                let tracker = tracker.clone();
                let on_complete = on_complete.clone();
                Closure::wrap(Box::new(move || {
                    if let Err(err) = surface.draw_tile(&image, placement.screen_x, placement.screen_y) {
                        warn!(?err, "Failed to draw tile");
                    }
                    settle(&tracker, generation, TileOutcome::Loaded, &on_complete);
                }) as Box<dyn FnMut()>)
            };

            let onerror = {
                let surface = surface.clone();
                let tracker = tracker.clone();
                let on_complete = on_complete.clone();
                let placeholder = placeholder.to_string();
                let url = url.clone();
                Closure::wrap(Box::new(move || {
                    debug!(%url, "Tile failed to load, drawing placeholder");
                    surface.draw_placeholder(&placeholder, placement.screen_x, placement.screen_y);
                    settle(&tracker, generation, TileOutcome::Failed, &on_complete);
                }) as Box<dyn FnMut()>)
            };

            image.set_onload(Some(onload.as_ref().unchecked_ref()));
            image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            image.set_src(&url);

            images.push(image);
            handlers.push((onload, onerror));
        }

        Ok(TileBatch {
            images,
            _handlers: handlers,
        })
    }
}

impl Drop for TileBatch {
    fn drop(&mut self) {
        for image in &self.images {
            image.set_onload(None);
            image.set_onerror(None);
            image.set_src("");
        }
    }
}

fn settle(
    tracker: &Rc<RefCell<TileLoadTracker>>,
    generation: u64,
    outcome: TileOutcome,
    on_complete: &OnComplete,
) {
    let progress = tracker.borrow_mut().record(generation, outcome);
    match progress {
        LoadProgress::Complete => finish(on_complete),
        LoadProgress::Stale => debug!(generation, "Ignoring tile from a superseded pass"),
        LoadProgress::Pending => {}
    }
}

fn finish(on_complete: &OnComplete) {
    let callback = on_complete.borrow_mut().take();
    if let Some(callback) = callback {
        callback();
    }
}

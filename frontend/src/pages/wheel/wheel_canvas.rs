use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::rc::Rc;

use shared::shared_wheel_game::LoadedWheel;
use shared::wheel_pointer::segment_angle;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};
use yew::prelude::*;

const CANVAS_SIZE: u32 = 500;
const SEGMENT_COLORS: [&str; 2] = ["#1a1a1a", "#2d2d2d"];
const BORDER_COLOR: &str = "#444";
const TEXT_COLOR: &str = "#FFFF00";
const TEXT_FONT: &str = "bold 13px Arial, sans-serif";
const IMAGE_WIDTH: f64 = 80.0;
const IMAGE_MAX_HEIGHT: f64 = 100.0;
const IMAGE_INSET: f64 = 60.0;
const TEXT_RADIUS_FACTOR: f64 = 0.55;
const HUB_RADIUS: f64 = 45.0;

type ImageCache = Rc<RefCell<HashMap<String, HtmlImageElement>>>;

/// Fits an image to the segment: fixed width, height capped so tall art
/// does not overlap the hub.
pub fn image_size(natural_width: f64, natural_height: f64) -> Option<(f64, f64)> {
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return None;
    }
    let height = IMAGE_WIDTH * natural_height / natural_width;
    if height > IMAGE_MAX_HEIGHT {
        Some((IMAGE_MAX_HEIGHT * natural_width / natural_height, IMAGE_MAX_HEIGHT))
    } else {
        Some((IMAGE_WIDTH, height))
    }
}

/// True when the label of a segment centred at `mid_angle` ends up on the
/// left half of the screen and must be flipped to stay readable.
pub fn text_on_left(rotation: f64, mid_angle: f64) -> bool {
    let angle = (rotation + mid_angle).rem_euclid(TAU);
    angle > FRAC_PI_2 && angle < 3.0 * FRAC_PI_2
}

fn draw_wheel(
    context: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    wheel: &LoadedWheel,
    rotation: f64,
    images: &HashMap<String, HtmlImageElement>,
) {
    let center_x = width / 2.0;
    let center_y = height / 2.0;
    let radius = center_x.min(center_y) - 10.0;
    let count = wheel.segment_count();
    let slice = segment_angle(count);

    context.clear_rect(0.0, 0.0, width, height);

    for (index, name) in wheel.segments.iter().enumerate() {
        let start = rotation + index as f64 * slice;
        let end = start + slice;
        let mid = index as f64 * slice + slice / 2.0;

        context.begin_path();
        context.move_to(center_x, center_y);
        let _ = context.arc(center_x, center_y, radius, start, end);
        context.close_path();
        context.set_fill_style_str(SEGMENT_COLORS[index % 2]);
        context.fill();
        context.set_stroke_style_str(BORDER_COLOR);
        context.set_line_width(2.0);
        context.stroke();

        let image = wheel
            .asset_bindings
            .get(index)
            .and_then(|asset| asset.as_ref())
            .and_then(|asset| images.get(asset));

        if let Some(image) = image {
            let size = image_size(image.natural_width() as f64, image.natural_height() as f64);
            if let Some((image_width, image_height)) = size {
                context.save();
                let _ = context.translate(center_x, center_y);
                let _ = context.rotate(rotation + mid + FRAC_PI_2);
                let _ = context.translate(0.0, -(radius - IMAGE_INSET));
                let _ = context.draw_image_with_html_image_element_and_dw_and_dh(
                    image,
                    -image_width / 2.0,
                    -image_height / 2.0,
                    image_width,
                    image_height,
                );
                context.restore();
            }
        }

        // Labels
        let text_radius = radius * TEXT_RADIUS_FACTOR;
        context.save();
        let _ = context.translate(center_x, center_y);
        let _ = context.rotate(rotation + mid);
        let x = if text_on_left(rotation, mid) {
            let _ = context.rotate(PI);
            -text_radius
        } else {
            text_radius
        };
        context.set_font(TEXT_FONT);
        context.set_text_align("center");
        context.set_text_baseline("middle");
        context.set_stroke_style_str("#000");
        context.set_line_width(3.0);
        let _ = context.stroke_text(name, x, 0.0);
        context.set_fill_style_str(TEXT_COLOR);
        let _ = context.fill_text(name, x, 0.0);
        context.restore();
    }

    // Rim
    context.begin_path();
    let _ = context.arc(center_x, center_y, radius, 0.0, TAU);
    context.set_stroke_style_str(BORDER_COLOR);
    context.set_line_width(2.0);
    context.stroke();

    // Hub
    context.begin_path();
    let _ = context.arc(center_x, center_y, HUB_RADIUS, 0.0, TAU);
    context.set_fill_style_str("#FFFFFF");
    context.fill();
    context.set_stroke_style_str("#333");
    context.set_line_width(5.0);
    context.stroke();

    // Pointer at twelve o'clock, tip into the rim
    context.begin_path();
    context.move_to(center_x, center_y - radius + 20.0);
    context.line_to(center_x - 15.0, center_y - radius - 8.0);
    context.line_to(center_x + 15.0, center_y - radius - 8.0);
    context.close_path();
    context.set_fill_style_str(TEXT_COLOR);
    context.fill();
    context.set_stroke_style_str("#000");
    context.set_line_width(2.0);
    context.stroke();
}

fn request_images(wheel: &LoadedWheel, cache: &ImageCache, requested: &Rc<RefCell<HashSet<String>>>, redraw: &UseForceUpdateHandle) {
    for asset in wheel.asset_bindings.iter().flatten() {
        if !requested.borrow_mut().insert(asset.clone()) {
            continue;
        }

        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("Could not create image element: {:?}", e);
                continue;
            }
        };
        image.set_cross_origin(Some("anonymous"));

        let onload = {
            let cache = cache.clone();
            let image = image.clone();
            let asset = asset.clone();
            let redraw = redraw.clone();
            Closure::<dyn FnMut()>::new(move || {
                cache.borrow_mut().insert(asset.clone(), image.clone());
                redraw.force_update();
            })
        };
        let onerror = {
            let asset = asset.clone();
            Closure::<dyn FnMut()>::new(move || {
                log::warn!("Failed to load wheel image {}", asset);
            })
        };

        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onload.forget();
        onerror.forget();
        image.set_src(asset);
    }
}

#[derive(Properties, PartialEq)]
pub struct WheelCanvasProps {
    pub wheel: Rc<LoadedWheel>,
    pub rotation: f64,
    pub is_spinning: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(WheelCanvas)]
pub fn wheel_canvas(props: &WheelCanvasProps) -> Html {
    let canvas_ref = use_node_ref();
    let cache: ImageCache = use_mut_ref(HashMap::new);
    let requested = use_mut_ref(HashSet::<String>::new);
    let redraw = use_force_update();

    // Start loading any assets the current layout needs
    {
        let cache = cache.clone();
        let requested = requested.clone();
        let redraw = redraw.clone();
        use_effect_with(props.wheel.clone(), move |wheel| {
            request_images(wheel, &cache, &requested, &redraw);
            || ()
        });
    }

    {
        let canvas_ref = canvas_ref.clone();
        let cache = cache.clone();
        let loaded = cache.borrow().len();
        use_effect_with(
            (props.rotation, props.wheel.clone(), loaded),
            move |(rotation, wheel, _)| {
                let context = canvas_ref.cast::<HtmlCanvasElement>().and_then(|canvas| {
                    let context = canvas
                        .get_context("2d")
                        .ok()
                        .flatten()
                        .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())?;
                    Some((canvas, context))
                });

                if let Some((canvas, context)) = context {
                    draw_wheel(
                        &context,
                        canvas.width() as f64,
                        canvas.height() as f64,
                        wheel,
                        *rotation,
                        &cache.borrow(),
                    );
                }
                || ()
            },
        );
    }

    let cursor = if props.is_spinning { "cursor-wait" } else { "cursor-pointer" };

    html! {
        <div class="flex justify-center">
            <canvas
                ref={canvas_ref}
                width={CANVAS_SIZE.to_string()}
                height={CANVAS_SIZE.to_string()}
                onclick={props.onclick.clone()}
                class={classes!("w-full", "max-w-[500px]", "h-auto", "rounded-full", "shadow-lg", cursor)}
            />
        </div>
    }
}

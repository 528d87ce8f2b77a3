use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, HtmlTextAreaElement,
    MouseEvent, PointerEvent,
};
use wheel_core::entries::{
    ALL_SELECTED_MESSAGE, join_entries, parse_entries, shuffle_entries, sort_entries,
    status_message,
};
use wheel_core::render::segments;
use wheel_core::{CelebrationEffect, ConfettiRain, Phase, WheelConfig, WheelEngine, WheelEvent};

mod audio;
mod canvas;
mod constants;
mod scheduler;
mod state;
mod utils;

use crate::canvas::{CanvasSurface, set_fill_style, set_stroke_style};
use crate::constants::*;
use crate::scheduler::RafScheduler;
use crate::state::{STATE, State};
use crate::utils::{
    fit_canvas_to_window, get_query_param, html_element, init_logging, is_checked,
    set_disabled, set_text, set_timeout, window_config,
};

fn draw(state: &State) {
    let ctx = &state.ctx;
    let size = state.canvas.width() as f64;
    let center = size / 2.0;
    let radius = (size / 2.0 - WHEEL_MARGIN_PX).max(1.0);
    ctx.clear_rect(0.0, 0.0, size, state.canvas.height() as f64);

    let segs = segments(state.wheel.entries(), state.wheel.rotation());
    if segs.is_empty() {
        ctx.begin_path();
        let _ = ctx.arc(center, center, radius, 0.0, TAU);
        set_fill_style(ctx, EMPTY_WHEEL_COLOR);
        ctx.fill();
        return;
    }

    for seg in &segs {
        ctx.begin_path();
        ctx.move_to(center, center);
        let _ = ctx.arc(center, center, radius, seg.start_angle, seg.end_angle);
        set_fill_style(ctx, seg.color);
        ctx.fill();
        ctx.stroke();

        // Label runs along the wedge's center line, right-aligned at the rim.
        ctx.save();
        let _ = ctx.translate(center, center);
        let _ = ctx.rotate(seg.mid_angle());
        ctx.set_text_align("right");
        set_fill_style(ctx, "white");
        ctx.set_font(LABEL_FONT);
        let _ = ctx.fill_text(&seg.label, radius - LABEL_INSET_PX, LABEL_BASELINE_PX);
        ctx.restore();
    }

    ctx.begin_path();
    let _ = ctx.arc(center, center, HUB_RADIUS_PX, 0.0, TAU);
    set_fill_style(ctx, "#ffffff");
    ctx.fill();
    set_stroke_style(ctx, "rgba(0,0,0,0.18)");
    ctx.set_line_width(HUB_RING_WIDTH_PX);
    ctx.stroke();
}

fn entries_input(doc: &Document) -> Option<HtmlTextAreaElement> {
    doc.get_element_by_id("name-input")?
        .dyn_into::<HtmlTextAreaElement>()
        .ok()
}

fn read_entries_text(doc: &Document) -> String {
    entries_input(doc).map(|t| t.value()).unwrap_or_default()
}

fn write_entries_text(doc: &Document, text: &str) {
    if let Some(t) = entries_input(doc) {
        t.set_value(text);
    }
}

fn update_entries_dom(state: &State) {
    let doc = &state.document;
    let count = state.wheel.entries().len();
    let spinning = state.wheel.phase() == Phase::Spinning;
    set_text(doc, "entries-count", &count.to_string());
    set_text(doc, "status-msg", status_message(count));
    set_disabled(doc, "spin-btn", spinning || count == 0);
}

fn set_spinning_dom(doc: &Document, spinning: bool) {
    set_disabled(doc, "spin-btn", spinning);
    set_disabled(doc, "name-input", spinning);
    set_disabled(doc, "center-spin-button", spinning);
    if let Some(btn) = doc.get_element_by_id("center-spin-button") {
        let _ = btn.class_list().toggle_with_force("spinning", spinning);
    }
}

/// Push the input's text into the engine. Ignored mid-spin, where the input
/// is disabled anyway.
fn sync_entries_from_input(state: &mut State) {
    let entries = parse_entries(&read_entries_text(&state.document));
    if let Err(e) = state.wheel.set_entries(entries) {
        log::warn!("entries not updated: {e}");
    }
    update_entries_dom(state);
    draw(state);
}

/// Rewrite the input from the engine's list after it changed on our side.
fn sync_input_from_entries(state: &State) {
    write_entries_text(&state.document, &join_entries(state.wheel.entries()));
    update_entries_dom(state);
    if state.wheel.entries().is_empty() {
        set_text(&state.document, "status-msg", ALL_SELECTED_MESSAGE);
    }
    draw(state);
}

fn request_spin(state: &mut State) {
    if state.auto_remove_pending {
        log::debug!("spin ignored: winner removal still pending");
        return;
    }
    match state.wheel.spin() {
        Ok(()) => {
            set_spinning_dom(&state.document, true);
            audio::start_spin_sound(&state.document);
        }
        Err(e) => log::warn!("spin rejected: {e}"),
    }
}

fn on_wheel_frame(state_rc: &Rc<RefCell<State>>, ts: f64) {
    let mut s = state_rc.borrow_mut();
    for ev in s.wheel.on_frame(ts) {
        match ev {
            WheelEvent::Frame { eased, .. } => {
                audio::update_spin_sound(&s.document, eased);
                draw(&s);
            }
            WheelEvent::Winner { label, .. } => finish_spin(state_rc, &mut s, &label),
        }
    }
}

fn finish_spin(state_rc: &Rc<RefCell<State>>, state: &mut State, label: &str) {
    audio::stop_spin_sound(&state.document);
    if is_checked(&state.document, "popup-toggle") {
        set_spinning_dom(&state.document, false);
        update_entries_dom(state);
        show_winner(state, label);
        return;
    }
    // Controls stay disabled until the winner is gone.
    state.auto_remove_pending = true;
    let st = state_rc.clone();
    set_timeout(&state.window, AUTO_REMOVE_DELAY_MS, move || {
        let mut s = st.borrow_mut();
        if !s.auto_remove_pending {
            // Reset got there first.
            return;
        }
        s.auto_remove_pending = false;
        remove_winner(&mut s);
        set_spinning_dom(&s.document, false);
        update_entries_dom(&s);
    });
}

fn remove_winner(state: &mut State) {
    match state.wheel.remove_last_winner() {
        Ok(Some(name)) => {
            log::info!("removed winner {name:?}");
            sync_input_from_entries(state);
        }
        Ok(None) => {}
        Err(e) => log::warn!("winner not removed: {e}"),
    }
}

fn remove_entry_at(state: &mut State, index: usize) {
    match state.wheel.remove_entry(index) {
        Ok(_) => sync_input_from_entries(state),
        Err(e) => log::warn!("entry not removed: {e}"),
    }
}

fn start_confetti(state: &mut State) {
    fit_canvas_to_window(&state.window, &state.confetti.surface().canvas);
    let (w, h) = state.confetti.surface().size();
    state.confetti.start(w, h);
}

fn show_winner(state: &mut State, label: &str) {
    let doc = &state.document;
    set_text(doc, "winner-name", label);
    if let Some(overlay) = html_element(doc, "modal-overlay") {
        let style = overlay.style();
        let _ = style.set_property("display", "flex");
        let _ = style.set_property("opacity", "1");
    }
    if let Some(modal) = doc.get_element_by_id("modal") {
        let _ = modal.class_list().add_1("show");
    }
    start_confetti(state);
}

fn hide_winner(state: &mut State) {
    let doc = state.document.clone();
    if let Some(overlay) = html_element(&doc, "modal-overlay") {
        let _ = overlay.style().set_property("opacity", "0");
    }
    if let Some(modal) = doc.get_element_by_id("modal") {
        let _ = modal.class_list().remove_1("show");
    }
    state.confetti.stop();
    set_timeout(&state.window, MODAL_FADE_MS, move || {
        if let Some(overlay) = html_element(&doc, "modal-overlay") {
            let _ = overlay.style().set_property("display", "none");
        }
    });
}

fn reset_wheel(state: &mut State) {
    write_entries_text(&state.document, &state.initial_entries);
    state.auto_remove_pending = false;
    state.wheel.reset();
    let entries = parse_entries(&state.initial_entries);
    if let Err(e) = state.wheel.set_entries(entries) {
        log::warn!("entries not restored: {e}");
    }
    audio::stop_spin_sound(&state.document);
    hide_winner(state);
    set_spinning_dom(&state.document, false);
    update_entries_dom(state);
    draw(state);
}

fn reorder_entries(state: &mut State, shuffle: bool) {
    if state.wheel.phase() == Phase::Spinning {
        return;
    }
    let mut entries = state.wheel.entries().to_vec();
    if shuffle {
        shuffle_entries(&mut entries, &mut state.rng);
    } else {
        sort_entries(&mut entries);
    }
    if let Err(e) = state.wheel.set_entries(entries) {
        log::warn!("entries not reordered: {e}");
        return;
    }
    sync_input_from_entries(state);
}

fn bind_click(
    doc: &Document,
    id: &str,
    state: &Rc<RefCell<State>>,
    f: impl Fn(&mut State) + 'static,
) -> Result<(), JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        let el: HtmlElement = el.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            f(&mut st.borrow_mut());
        }));
        el.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    bind_click(&doc, "spin-btn", &state, request_spin)?;
    bind_click(&doc, "center-spin-button", &state, request_spin)?;
    bind_click(&doc, "reset-btn", &state, reset_wheel)?;
    bind_click(&doc, "close-modal", &state, hide_winner)?;
    bind_click(&doc, "modal-close-x", &state, hide_winner)?;
    bind_click(&doc, "remove-btn", &state, |s| {
        remove_winner(s);
        hide_winner(s);
    })?;
    bind_click(&doc, "shuffle-btn", &state, |s| reorder_entries(s, true))?;
    bind_click(&doc, "sort-btn", &state, |s| reorder_entries(s, false))?;

    // Entries text area
    if let Some(input) = entries_input(&doc) {
        let st = state.clone();
        let oninput = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            sync_entries_from_input(&mut st.borrow_mut());
        }));
        input.set_oninput(Some(oninput.as_ref().unchecked_ref()));
        oninput.forget();
    }

    // Clicking the dark overlay (not the modal itself) closes the popup
    if let Some(overlay) = html_element(&doc, "modal-overlay") {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            if e.target() == e.current_target() {
                hide_winner(&mut st.borrow_mut());
            }
        }));
        overlay.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Tap the wheel to spin
    {
        let canvas = state.borrow().canvas.clone();
        let st = state.clone();
        let onpointerdown =
            Closure::<dyn FnMut(PointerEvent)>::wrap(Box::new(move |e: PointerEvent| {
                if e.button() != 0 {
                    return;
                }
                let mut s = st.borrow_mut();
                if s.wheel.phase() != Phase::Spinning {
                    request_spin(&mut s);
                }
            }));
        canvas.set_onpointerdown(Some(onpointerdown.as_ref().unchecked_ref()));
        onpointerdown.forget();
    }

    // Keep the confetti canvas full-window
    {
        let window = state.borrow().window.clone();
        let st = state.clone();
        let onresize = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            fit_canvas_to_window(&s.window, &s.confetti.surface().canvas);
            if s.confetti.is_active() {
                start_confetti(&mut s);
            }
        }));
        window.set_onresize(Some(onresize.as_ref().unchecked_ref()));
        onresize.forget();
    }
    Ok(())
}

fn init_canvas(
    document: &Document,
    id: &str,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("canvas #{id} not found")))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((cv, ctx))
}

fn load_config(window: &web_sys::Window) -> WheelConfig {
    match window_config(window) {
        Some(text) => WheelConfig::from_json(&text).unwrap_or_else(|e| {
            log::warn!("ignoring __WHEEL_CONFIG: {e}");
            WheelConfig::default()
        }),
        None => WheelConfig::default(),
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let search = window.location().search().unwrap_or_default();
    let level = get_query_param(&search, "log")
        .and_then(|v| v.parse().ok())
        .unwrap_or(log::LevelFilter::Info);
    init_logging(level);

    let config = load_config(&window);
    let (canvas, ctx) = init_canvas(&document, "wheelCanvas")?;
    let (confetti_canvas, confetti_ctx) = init_canvas(&document, "confetti-canvas")?;
    fit_canvas_to_window(&window, &confetti_canvas);

    // ?entries=Ann,Bob,Cy overrides the page's default list
    if let Some(list) = get_query_param(&search, "entries") {
        let entries: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        write_entries_text(&document, &join_entries(&entries));
    }
    let initial_entries = read_entries_text(&document);

    let wheel_frames = RafScheduler::new(window.clone());
    let confetti_frames = RafScheduler::new(window.clone());
    let mut wheel = WheelEngine::with_config(
        config.spin,
        wheel_frames.clone(),
        ChaCha8Rng::from_entropy(),
    );
    wheel
        .set_entries(parse_entries(&initial_entries))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let confetti = ConfettiRain::new(
        config.confetti,
        confetti_frames.clone(),
        ChaCha8Rng::from_entropy(),
        CanvasSurface {
            canvas: confetti_canvas,
            ctx: confetti_ctx,
        },
    );

    let state = Rc::new(RefCell::new(State {
        window,
        document,
        canvas,
        ctx,
        wheel,
        confetti,
        initial_entries,
        rng: ChaCha8Rng::from_entropy(),
        auto_remove_pending: false,
    }));

    {
        let st = state.clone();
        wheel_frames.set_callback(move |ts| on_wheel_frame(&st, ts));
    }
    {
        let st = state.clone();
        confetti_frames.set_callback(move |ts| {
            st.borrow_mut().confetti.on_frame(ts);
        });
    }

    STATE.with(|st| st.replace(Some(state.clone())));
    attach_ui(state.clone())?;
    {
        let s = state.borrow();
        update_entries_dom(&s);
        draw(&s);
        log::info!("wheel ready with {} entries", s.wheel.entries().len());
    }
    Ok(())
}

fn with_state(f: impl FnOnce(&mut State)) {
    STATE.with(|st| {
        if let Some(state) = st.borrow().as_ref() {
            f(&mut state.borrow_mut());
        }
    });
}

/// Spin the wheel, as the spin button does.
#[wasm_bindgen]
pub fn spin() {
    with_state(request_spin);
}

#[wasm_bindgen]
pub fn reset() {
    with_state(reset_wheel);
}

#[wasm_bindgen(js_name = removeEntry)]
pub fn remove_entry(index: usize) {
    with_state(|s| remove_entry_at(s, index));
}

#[wasm_bindgen(js_name = startCelebration)]
pub fn start_celebration() {
    with_state(start_confetti);
}

#[wasm_bindgen(js_name = stopCelebration)]
pub fn stop_celebration() {
    with_state(|s| s.confetti.stop());
}

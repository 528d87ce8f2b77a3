use std::cell::RefCell;
use std::rc::Rc;

use rand_chacha::ChaCha8Rng;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};
use wheel_core::{ConfettiRain, WheelEngine};

use crate::canvas::CanvasSurface;
use crate::scheduler::RafScheduler;

pub type Wheel = WheelEngine<RafScheduler, ChaCha8Rng>;
pub type Confetti = ConfettiRain<RafScheduler, ChaCha8Rng, CanvasSurface>;

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub wheel: Wheel,
    pub confetti: Confetti,
    /// Entry text at page load, restored by Reset.
    pub initial_entries: String,
    /// Used by Shuffle; the engine keeps its own generator for spins.
    pub rng: ChaCha8Rng,
    /// Set between a settled spin and the delayed winner removal. Spinning
    /// stays locked while set so the removal always sees a settled wheel.
    pub auto_remove_pending: bool,
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}

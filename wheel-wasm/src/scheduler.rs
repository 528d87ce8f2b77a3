use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;
use wheel_core::{FrameHandle, FrameScheduler, ScheduleError};

type RafClosure = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` behind the engine's scheduling port.
///
/// The callback slot is filled after the owning state exists, since the
/// callback needs a handle to that state. Clones share the slot.
#[derive(Clone)]
pub struct RafScheduler {
    window: Window,
    callback: Rc<RefCell<Option<RafClosure>>>,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        RafScheduler {
            window,
            callback: Rc::new(RefCell::new(None)),
        }
    }

    pub fn set_callback(&self, f: impl FnMut(f64) + 'static) {
        *self.callback.borrow_mut() = Some(Closure::wrap(Box::new(f) as Box<dyn FnMut(f64)>));
    }
}

impl FrameScheduler for RafScheduler {
    fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn request_frame(&mut self) -> Result<FrameHandle, ScheduleError> {
        let callback = self.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            log::warn!("frame requested before the callback was installed");
            return Err(ScheduleError);
        };
        self.window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|e| {
                log::error!("requestAnimationFrame failed: {e:?}");
                ScheduleError
            })
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }
}

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAudioElement};
use wheel_core::audio::playback_rate;

use crate::utils::{input_number, is_checked};

const DEFAULT_VOLUME: f64 = 0.8;

/// The page's spin sound, when sound is on and a source has been loaded.
fn spin_audio(doc: &Document) -> Option<HtmlAudioElement> {
    if !is_checked(doc, "sound-enable") {
        return None;
    }
    let audio = doc
        .get_element_by_id("spin-audio")?
        .dyn_into::<HtmlAudioElement>()
        .ok()?;
    if audio.src().is_empty() {
        None
    } else {
        Some(audio)
    }
}

pub fn start_spin_sound(doc: &Document) {
    let Some(audio) = spin_audio(doc) else {
        return;
    };
    audio.set_loop(is_checked(doc, "sound-loop"));
    audio.set_current_time(0.0);
    audio.set_volume(input_number(doc, "sound-volume", DEFAULT_VOLUME).min(1.0));
    audio.set_playback_rate(playback_rate(0.0));
    if let Err(e) = audio.play() {
        log::warn!("spin sound did not start: {e:?}");
    }
}

/// Follow the wheel's eased progress with the sound's playback rate.
pub fn update_spin_sound(doc: &Document, eased: f64) {
    if let Some(audio) = spin_audio(doc) {
        audio.set_playback_rate(playback_rate(eased));
    }
}

pub fn stop_spin_sound(doc: &Document) {
    // Stop even if sound was switched off mid-spin.
    let audio = doc
        .get_element_by_id("spin-audio")
        .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok());
    if let Some(audio) = audio {
        let _ = audio.pause();
        audio.set_current_time(0.0);
    }
}

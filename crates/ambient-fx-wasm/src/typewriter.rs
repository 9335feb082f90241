use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use ambient_fx_core::config::TypewriterConfig;
use ambient_fx_core::schedule::{TimerHost, TimerId};
use ambient_fx_core::typewriter::{Typewriter, TypewriterView};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, MediaQueryList, Window};

use crate::console;
use crate::dom::{self, set_styles, REDUCED_MOTION_QUERY};
use crate::error::HostError;

/// `setTimeout` behind the [`TimerHost`] port.
///
/// A fired callback is moved to `spent` rather than dropped, since it is
/// still on the stack; `spent` is emptied on the next delivery.
struct WebTimers {
    window: Window,
    runtime: Weak<RefCell<TypewriterRuntime>>,
    next_id: u64,
    live: HashMap<TimerId, (i32, Closure<dyn FnMut()>)>,
    spent: Vec<Closure<dyn FnMut()>>,
}

impl WebTimers {
    fn retire(&mut self, id: TimerId) {
        self.spent.clear();
        if let Some((_, callback)) = self.live.remove(&id) {
            self.spent.push(callback);
        }
    }

    fn clear_all(&mut self) {
        for (handle, _) in self.live.values() {
            self.window.clear_timeout_with_handle(*handle);
        }
        self.live.clear();
    }
}

impl TimerHost for WebTimers {
    fn set_timeout(&mut self, delay_ms: u32) -> Option<TimerId> {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let runtime = self.runtime.clone();
        let callback = Closure::wrap(Box::new(move || {
            with_runtime(&runtime, |rt| rt.fire(id));
        }) as Box<dyn FnMut()>);

        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), delay)
        {
            Ok(handle) => {
                self.live.insert(id, (handle, callback));
                Some(id)
            }
            Err(err) => {
                log::warn!("setTimeout failed: {:?}", err);
                None
            }
        }
    }

    fn clear_timeout(&mut self, id: TimerId) {
        if let Some((handle, _)) = self.live.remove(&id) {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// Elements inside the host: a visually hidden copy of the full text for
/// screen readers, an invisible copy with the cursor that fixes the box
/// size, and the animated overlay.
struct TypewriterDom {
    host: HtmlElement,
    label: HtmlElement,
    reserve: HtmlElement,
    text: HtmlElement,
    cursor: HtmlElement,
}

const VISUALLY_HIDDEN: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("width", "1px"),
    ("height", "1px"),
    ("padding", "0"),
    ("margin", "-1px"),
    ("overflow", "hidden"),
    ("clip", "rect(0, 0, 0, 0)"),
    ("white-space", "nowrap"),
    ("border-width", "0"),
];

const PULSE_STYLE_ID: &str = "ambient-fx-cursor-pulse";

const PULSE_KEYFRAMES: &str = "@keyframes ambient-fx-pulse { 50% { opacity: 0.5; } }";

const PULSE_ANIMATION: &str = "ambient-fx-pulse 2s cubic-bezier(0.4, 0, 0.6, 1) infinite";

const CURSOR_STYLE: &[(&str, &str)] = &[
    ("display", "inline-block"),
    ("width", "0.6ch"),
    ("margin-left", "0.125rem"),
    ("color", "color-mix(in srgb, currentColor 60%, transparent)"),
    ("animation", PULSE_ANIMATION),
];

/// Install the cursor's `@keyframes` rule once per document.
fn ensure_pulse_keyframes(document: &Document) -> Result<(), HostError> {
    if document.get_element_by_id(PULSE_STYLE_ID).is_some() {
        return Ok(());
    }
    let style = document.create_element("style")?;
    style.set_id(PULSE_STYLE_ID);
    style.set_text_content(Some(PULSE_KEYFRAMES));
    match document.head() {
        Some(head) => head.append_child(&style)?,
        None => document
            .document_element()
            .ok_or(HostError::NoDocument)?
            .append_child(&style)?,
    };
    Ok(())
}

fn span(document: &Document) -> Result<HtmlElement, HostError> {
    document
        .create_element("span")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| HostError::Js("span is not an HtmlElement".into()))
}

impl TypewriterDom {
    fn build(document: &Document, host: HtmlElement) -> Result<Self, HostError> {
        host.set_text_content(None);
        set_styles(&host, &[("position", "relative"), ("display", "inline-block")])?;

        let label = span(document)?;
        set_styles(&label, VISUALLY_HIDDEN)?;

        let reserve = span(document)?;
        reserve.set_attribute("aria-hidden", "true")?;
        set_styles(&reserve, &[("visibility", "hidden"), ("display", "block")])?;

        let overlay = span(document)?;
        overlay.set_attribute("aria-hidden", "true")?;
        set_styles(
            &overlay,
            &[("position", "absolute"), ("inset", "0"), ("pointer-events", "none")],
        )?;
        let text = span(document)?;
        let cursor = span(document)?;
        set_styles(&cursor, CURSOR_STYLE)?;
        if let Err(err) = ensure_pulse_keyframes(document) {
            log::warn!("cursor will not pulse: {err}");
        }
        overlay.append_child(&text)?;
        overlay.append_child(&cursor)?;

        host.append_child(&label)?;
        host.append_child(&reserve)?;
        host.append_child(&overlay)?;

        Ok(Self {
            host,
            label,
            reserve,
            text,
            cursor,
        })
    }

    fn render(&self, view: &TypewriterView<'_>) {
        let _ = self.host.set_attribute("aria-label", view.label);
        self.label.set_text_content(Some(view.label));
        self.reserve.set_text_content(Some(&view.reserved()));
        self.text.set_text_content(Some(view.visible));
        let cursor = view.cursor.map(String::from);
        self.cursor.set_text_content(cursor.as_deref());
    }
}

/// Subscription to the reduced-motion media query.
struct MotionWatch {
    query: MediaQueryList,
    on_change: Closure<dyn FnMut()>,
}

impl MotionWatch {
    fn detach(&self) {
        let _ = self
            .query
            .remove_event_listener_with_callback("change", self.on_change.as_ref().unchecked_ref());
    }
}

struct TypewriterRuntime {
    machine: Typewriter,
    timers: WebTimers,
    dom: TypewriterDom,
    motion: Option<MotionWatch>,
}

impl TypewriterRuntime {
    fn fire(&mut self, id: TimerId) {
        self.timers.retire(id);
        if self.machine.on_timer(id, &mut self.timers) {
            self.render();
        }
    }

    fn motion_changed(&mut self) {
        let reduced = self.motion.as_ref().is_some_and(|m| m.query.matches());
        self.machine.set_reduced_motion(reduced, &mut self.timers);
        self.render();
    }

    fn render(&self) {
        self.dom.render(&self.machine.view());
    }
}

fn with_runtime(weak: &Weak<RefCell<TypewriterRuntime>>, f: impl FnOnce(&mut TypewriterRuntime)) {
    let Some(cell) = weak.upgrade() else {
        return;
    };
    let Ok(mut runtime) = cell.try_borrow_mut() else {
        return;
    };
    f(&mut *runtime);
}

fn parse_config(options: Option<String>) -> TypewriterConfig {
    match options.as_deref().map(TypewriterConfig::from_json) {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            log::warn!("typewriter: {err}; using defaults");
            TypewriterConfig::default()
        }
        None => TypewriterConfig::default(),
    }
}

/// Types `text` into `element`, deletes it, and repeats. Screen readers get
/// the full text through `aria-label` and a visually hidden copy.
///
/// `options` is an optional JSON object with `typingDelayMs`,
/// `deletingDelayMs`, `pauseAfterTypedMs`, `pauseAfterDeletedMs` and
/// `showCursor`.
#[wasm_bindgen]
pub struct TypewriterText {
    runtime: Option<Rc<RefCell<TypewriterRuntime>>>,
}

#[wasm_bindgen]
impl TypewriterText {
    #[wasm_bindgen(constructor)]
    pub fn new(element: HtmlElement, text: String, options: Option<String>) -> TypewriterText {
        console::install();
        match Self::mount(element, text, parse_config(options)) {
            Ok(runtime) => TypewriterText {
                runtime: Some(runtime),
            },
            Err(err) => {
                log::warn!("typewriter inert: {err}");
                TypewriterText { runtime: None }
            }
        }
    }

    /// Swap the text, restarting from an empty line.
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&self, text: String) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        let mut rt = runtime.borrow_mut();
        let rt = &mut *rt;
        rt.machine.set_text(text, &mut rt.timers);
        rt.render();
    }

    /// Cancel the pending timer and stop following the media query.
    /// Also runs on `free()`.
    pub fn unmount(&self) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        let Ok(mut rt) = runtime.try_borrow_mut() else {
            return;
        };
        let rt = &mut *rt;
        rt.machine.unmount(&mut rt.timers);
        rt.timers.clear_all();
        if let Some(motion) = rt.motion.take() {
            motion.detach();
        }
    }

    pub fn displayed(&self) -> String {
        self.runtime
            .as_ref()
            .map(|rt| rt.borrow().machine.displayed().to_string())
            .unwrap_or_default()
    }

    pub fn phase(&self) -> String {
        self.runtime
            .as_ref()
            .map(|rt| rt.borrow().machine.phase().as_str().to_string())
            .unwrap_or_default()
    }
}

impl TypewriterText {
    fn mount(
        element: HtmlElement,
        text: String,
        config: TypewriterConfig,
    ) -> Result<Rc<RefCell<TypewriterRuntime>>, HostError> {
        let window = dom::window()?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        let view = TypewriterDom::build(&document, element)?;
        let query = dom::media_query(&window, REDUCED_MOTION_QUERY);

        let runtime = Rc::new_cyclic(|weak: &Weak<RefCell<TypewriterRuntime>>| {
            let motion = query.map(|query| {
                let runtime = weak.clone();
                let on_change = Closure::wrap(Box::new(move || {
                    with_runtime(&runtime, TypewriterRuntime::motion_changed);
                }) as Box<dyn FnMut()>);
                MotionWatch { query, on_change }
            });
            RefCell::new(TypewriterRuntime {
                machine: Typewriter::new(text, config),
                timers: WebTimers {
                    window: window.clone(),
                    runtime: weak.clone(),
                    next_id: 0,
                    live: HashMap::new(),
                    spent: Vec::new(),
                },
                dom: view,
                motion,
            })
        });

        {
            let mut rt = runtime.borrow_mut();
            let rt = &mut *rt;
            if let Some(motion) = &rt.motion {
                if let Err(err) = motion
                    .query
                    .add_event_listener_with_callback("change", motion.on_change.as_ref().unchecked_ref())
                {
                    log::warn!("reduced-motion changes will be missed: {:?}", err);
                }
            }
            let reduced = rt.motion.as_ref().is_some_and(|m| m.query.matches());
            rt.machine.mount(reduced, &mut rt.timers);
            rt.render();
        }
        Ok(runtime)
    }
}

impl Drop for TypewriterText {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_animation_names_installed_keyframes() {
        let (_, animation) = CURSOR_STYLE
            .iter()
            .find(|(name, _)| *name == "animation")
            .expect("cursor has an animation");
        let name = animation.split_whitespace().next().unwrap();
        assert!(PULSE_KEYFRAMES.starts_with(&format!("@keyframes {name} ")));
        assert!(animation.ends_with("infinite"));
    }
}

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use ambient_fx_core::config::FieldConfig;
use ambient_fx_core::field::ParticleField;
use ambient_fx_core::render::FlakeInstance;
use ambient_fx_core::schedule::{FrameHost, FrameId, ListenerId};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

use crate::console;
use crate::dom::{self, CanvasSurface, WebEnvironment};

/// `requestAnimationFrame` and the window `resize` event behind the
/// [`FrameHost`] port. The callbacks live as long as the runtime and only
/// hold a weak reference back to it.
struct WebFrameHost {
    window: Window,
    on_frame: Closure<dyn FnMut(f64)>,
    on_resize: Closure<dyn FnMut()>,
    last_frame: Option<FrameId>,
    listener: Option<ListenerId>,
    next_listener: u64,
}

impl FrameHost for WebFrameHost {
    fn request_frame(&mut self) -> Option<FrameId> {
        match self
            .window
            .request_animation_frame(self.on_frame.as_ref().unchecked_ref())
        {
            Ok(handle) => {
                let id = FrameId(handle as u64);
                self.last_frame = Some(id);
                Some(id)
            }
            Err(err) => {
                log::warn!("requestAnimationFrame failed: {:?}", err);
                None
            }
        }
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.last_frame == Some(id) {
            self.last_frame = None;
        }
        let _ = self.window.cancel_animation_frame(id.0 as i32);
    }

    fn watch_resize(&mut self) -> Option<ListenerId> {
        if let Err(err) = self
            .window
            .add_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())
        {
            log::warn!("resize listener rejected: {:?}", err);
            return None;
        }
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listener = Some(id);
        Some(id)
    }

    fn unwatch_resize(&mut self, id: ListenerId) {
        if self.listener != Some(id) {
            return;
        }
        self.listener = None;
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
    }
}

struct FieldRuntime {
    field: ParticleField<CanvasSurface>,
    host: WebFrameHost,
    env: WebEnvironment,
    /// Canvas kept across `unmount()` so `reconfigure()` can mount again.
    parked: Option<CanvasSurface>,
    instances: Vec<FlakeInstance>,
}

impl FieldRuntime {
    fn frame(&mut self) {
        let Some(id) = self.host.last_frame.take() else {
            return;
        };
        if self.field.cancel_token().is_some_and(|t| t.is_cancelled()) {
            return;
        }
        self.field.on_frame(id, &self.env, &mut self.host);
    }

    fn resize(&mut self) {
        if let Some(id) = self.host.listener {
            self.field.on_resize(id, &self.env);
        }
    }
}

fn with_runtime(weak: &Weak<RefCell<FieldRuntime>>, f: impl FnOnce(&mut FieldRuntime)) {
    let Some(cell) = weak.upgrade() else {
        return;
    };
    let Ok(mut runtime) = cell.try_borrow_mut() else {
        return;
    };
    f(&mut *runtime);
}

fn parse_config(options: Option<String>) -> FieldConfig {
    match options.as_deref().map(FieldConfig::from_json) {
        Some(Ok(config)) => config,
        Some(Err(err)) => {
            log::warn!("snowfall: {err}; using defaults");
            FieldConfig::default()
        }
        None => FieldConfig::default(),
    }
}

/// Full-viewport snowfall drawn into a canvas.
///
/// `options` is an optional JSON object with `intensity`, `maxFlakes` and
/// `enabled`. Without a window or a 2D context the widget stays inert.
#[wasm_bindgen]
pub struct Snowfall {
    runtime: Option<Rc<RefCell<FieldRuntime>>>,
}

#[wasm_bindgen]
impl Snowfall {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options: Option<String>) -> Snowfall {
        console::install();
        let config = parse_config(options);
        let window = match dom::window() {
            Ok(window) => window,
            Err(err) => {
                log::warn!("snowfall inert: {err}");
                return Snowfall { runtime: None };
            }
        };
        let surface = CanvasSurface::attach(canvas)
            .map_err(|err| log::warn!("snowfall: {err}"))
            .ok();

        let runtime = Rc::new_cyclic(|weak: &Weak<RefCell<FieldRuntime>>| {
            let frame_rt = weak.clone();
            let resize_rt = weak.clone();
            RefCell::new(FieldRuntime {
                field: ParticleField::new(config),
                host: WebFrameHost {
                    window: window.clone(),
                    on_frame: Closure::wrap(Box::new(move |_timestamp: f64| {
                        with_runtime(&frame_rt, FieldRuntime::frame);
                    }) as Box<dyn FnMut(f64)>),
                    on_resize: Closure::wrap(Box::new(move || {
                        with_runtime(&resize_rt, FieldRuntime::resize);
                    }) as Box<dyn FnMut()>),
                    last_frame: None,
                    listener: None,
                    next_listener: 0,
                },
                env: WebEnvironment::new(window),
                parked: None,
                instances: Vec::new(),
            })
        });

        {
            let mut rt = runtime.borrow_mut();
            let rt = &mut *rt;
            rt.field.mount(surface, &rt.env, &mut rt.host);
        }
        Snowfall {
            runtime: Some(runtime),
        }
    }

    /// Apply new options; a change restarts the animation. After
    /// `unmount()` this mounts again on the same canvas.
    pub fn reconfigure(&self, options: Option<String>) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        let config = parse_config(options);
        let mut rt = runtime.borrow_mut();
        let rt = &mut *rt;
        match rt.parked.take() {
            Some(surface) => {
                rt.field = ParticleField::new(config);
                rt.field.mount(Some(surface), &rt.env, &mut rt.host);
            }
            None => {
                rt.field.reconfigure(config, &rt.env, &mut rt.host);
            }
        }
    }

    /// Stop the loop and drop the resize listener. Also runs on `free()`.
    pub fn unmount(&self) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        let Ok(mut rt) = runtime.try_borrow_mut() else {
            return;
        };
        let rt = &mut *rt;
        if let Some(surface) = rt.field.unmount(&mut rt.host) {
            rt.parked = Some(surface);
        }
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.runtime
            .as_ref()
            .is_some_and(|rt| rt.borrow().field.is_active())
    }

    #[wasm_bindgen(js_name = flakeCount)]
    pub fn flake_count(&self) -> usize {
        self.runtime
            .as_ref()
            .map_or(0, |rt| rt.borrow().field.flake_count())
    }

    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> f64 {
        self.runtime
            .as_ref()
            .map_or(0.0, |rt| rt.borrow().field.stats().frames as f64)
    }

    /// Current flakes as `[x, y, radius, alpha]` quadruples.
    pub fn snapshot(&self) -> js_sys::Float32Array {
        let Some(runtime) = &self.runtime else {
            return js_sys::Float32Array::new_with_length(0);
        };
        let mut rt = runtime.borrow_mut();
        let rt = &mut *rt;
        rt.field.write_instances(&rt.env, &mut rt.instances);
        js_sys::Float32Array::from(bytemuck::cast_slice::<FlakeInstance, f32>(&rt.instances))
    }
}

impl Drop for Snowfall {
    fn drop(&mut self) {
        self.unmount();
    }
}

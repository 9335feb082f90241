use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::FieldConfig;
use crate::particle::FlakeSet;
use crate::platform::{Environment, Surface, SurfaceLayout};
use crate::render::{flake_fill, write_instances, FlakeInstance};
use crate::schedule::{CancelToken, FrameHost, FrameId, ListenerId};

/// Outcome of mounting a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Running,
    Disabled,
    ReducedMotion,
    NoSurface,
}

/// Counters for the current session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldStats {
    pub flakes: usize,
    /// Frames updated and painted.
    pub frames: u64,
    /// Pool reallocations caused by resize notifications.
    pub resizes: u64,
}

/// Resources held while the field is animating. Dropped as a unit on
/// teardown.
pub struct AnimationSession {
    pub flakes: FlakeSet,
    pub layout: SurfaceLayout,
    pending_frame: Option<FrameId>,
    resize_listener: Option<ListenerId>,
    token: CancelToken,
    stats: FieldStats,
}

/// Full-viewport snowfall.
///
/// Mount hands over the drawing surface; the field keeps it across restarts
/// and returns it on [`ParticleField::unmount`]. Reduced motion is checked
/// once per activation only.
pub struct ParticleField<S, R = StdRng> {
    config: FieldConfig,
    rng: R,
    surface: Option<S>,
    session: Option<AnimationSession>,
}

impl<S: Surface> ParticleField<S, StdRng> {
    pub fn new(config: FieldConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<S: Surface, R: Rng> ParticleField<S, R> {
    pub fn with_rng(config: FieldConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            surface: None,
            session: None,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&AnimationSession> {
        self.session.as_ref()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn flake_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.flakes.count)
    }

    pub fn stats(&self) -> FieldStats {
        self.session.as_ref().map(|s| s.stats).unwrap_or_default()
    }

    /// Token shared with host callbacks; `None` while inert.
    pub fn cancel_token(&self) -> Option<CancelToken> {
        self.session.as_ref().map(|s| s.token.clone())
    }

    pub fn pending_frame(&self) -> Option<FrameId> {
        self.session.as_ref().and_then(|s| s.pending_frame)
    }

    pub fn resize_listener(&self) -> Option<ListenerId> {
        self.session.as_ref().and_then(|s| s.resize_listener)
    }

    /// Take ownership of `surface` and start animating unless disabled,
    /// reduced motion is requested, or there is nothing to draw on.
    /// Any previous session is torn down first.
    pub fn mount<E, H>(&mut self, surface: Option<S>, env: &E, host: &mut H) -> Activation
    where
        E: Environment + ?Sized,
        H: FrameHost + ?Sized,
    {
        self.teardown(host);
        self.surface = surface;
        self.activate(env, host)
    }

    /// Apply a new config. A change restarts the session, re-running the
    /// reduced-motion check; an identical config leaves it untouched.
    pub fn reconfigure<E, H>(&mut self, config: FieldConfig, env: &E, host: &mut H) -> Activation
    where
        E: Environment + ?Sized,
        H: FrameHost + ?Sized,
    {
        if config == self.config {
            return if self.is_active() {
                Activation::Running
            } else {
                self.inert_reason(env)
            };
        }
        self.teardown(host);
        self.config = config;
        self.activate(env, host)
    }

    /// Release every host resource and hand the surface back.
    pub fn unmount<H: FrameHost + ?Sized>(&mut self, host: &mut H) -> Option<S> {
        self.teardown(host);
        self.surface.take()
    }

    /// Viewport changed: resize the surface and reallocate the pool.
    /// Returns false for a listener that is not this session's.
    pub fn on_resize<E: Environment + ?Sized>(&mut self, id: ListenerId, env: &E) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.token.is_cancelled() || session.resize_listener != Some(id) {
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        let (layout, flakes) = size_pass(&self.config, surface, env, &mut self.rng);
        session.layout = layout;
        session.flakes = flakes;
        session.stats.flakes = session.flakes.count;
        session.stats.resizes += 1;
        log::debug!(
            "snowfall resized to {}x{}, {} flakes",
            layout.css_width,
            layout.css_height,
            session.flakes.count
        );
        true
    }

    /// One display refresh: update every flake, then paint, then request the
    /// next frame. A frame that is not the pending one is ignored.
    pub fn on_frame<E, H>(&mut self, id: FrameId, env: &E, host: &mut H) -> bool
    where
        E: Environment + ?Sized,
        H: FrameHost + ?Sized,
    {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.token.is_cancelled() || session.pending_frame != Some(id) {
            return false;
        }
        session.pending_frame = None;
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        let viewport = env.viewport();
        let fill = flake_fill(env.color_mode());

        session.flakes.step(viewport.width, viewport.height, &mut self.rng);

        surface.clear(viewport.width, viewport.height);
        surface.set_fill(fill);
        let flakes = &session.flakes;
        for i in 0..flakes.count {
            surface.fill_circle(flakes.position[i], flakes.radius[i]);
        }
        session.stats.frames += 1;

        if !session.token.is_cancelled() {
            session.pending_frame = host.request_frame();
        }
        true
    }

    /// Snapshot of the pool as flat instances at the current theme's alpha.
    pub fn write_instances<E: Environment + ?Sized>(&self, env: &E, out: &mut Vec<FlakeInstance>) {
        match &self.session {
            Some(session) => write_instances(&session.flakes, flake_fill(env.color_mode()).a, out),
            None => out.clear(),
        }
    }

    fn activate<E, H>(&mut self, env: &E, host: &mut H) -> Activation
    where
        E: Environment + ?Sized,
        H: FrameHost + ?Sized,
    {
        let reason = self.inert_reason(env);
        if reason != Activation::Running {
            log::info!("snowfall inert: {reason:?}");
            return reason;
        }
        let Some(surface) = self.surface.as_mut() else {
            return Activation::NoSurface;
        };

        let (layout, flakes) = size_pass(&self.config, surface, env, &mut self.rng);
        let token = CancelToken::new();
        let resize_listener = host.watch_resize();
        let pending_frame = host.request_frame();
        log::debug!(
            "snowfall started: {}x{} at scale {}, {} flakes",
            layout.css_width,
            layout.css_height,
            layout.scale,
            flakes.count
        );

        self.session = Some(AnimationSession {
            stats: FieldStats {
                flakes: flakes.count,
                ..FieldStats::default()
            },
            flakes,
            layout,
            pending_frame,
            resize_listener,
            token,
        });
        Activation::Running
    }

    fn inert_reason<E: Environment + ?Sized>(&self, env: &E) -> Activation {
        if !self.config.enabled {
            Activation::Disabled
        } else if self.surface.is_none() {
            Activation::NoSurface
        } else if env.prefers_reduced_motion() {
            Activation::ReducedMotion
        } else {
            Activation::Running
        }
    }

    fn teardown<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        let Some(session) = self.session.take() else {
            return;
        };
        session.token.cancel();
        if let Some(listener) = session.resize_listener {
            host.unwatch_resize(listener);
        }
        if let Some(frame) = session.pending_frame {
            host.cancel_frame(frame);
        }
        log::debug!("snowfall stopped after {} frames", session.stats.frames);
    }
}

/// Steps 1-3 of activation: size the surface for the current viewport and
/// allocate a fresh pool over it.
fn size_pass<S, E, R>(config: &FieldConfig, surface: &mut S, env: &E, rng: &mut R) -> (SurfaceLayout, FlakeSet)
where
    S: Surface + ?Sized,
    E: Environment + ?Sized,
    R: Rng + ?Sized,
{
    let layout = env.viewport().layout();
    surface.resize(&layout);
    let flakes = FlakeSet::scatter(config.pool_size(), layout.css_width, layout.css_height, rng);
    (layout, flakes)
}

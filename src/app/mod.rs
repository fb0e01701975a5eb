// Application state management
//
// AppState wires the telemetry session into the neuron pool and owns the
// render loop, viewport and input line for one view. Construction acquires
// everything; `teardown` releases everything, once.

pub mod config;
pub mod event;

pub use config::{Cli, FrameConfig};

use crate::scene::{EntityPool, RenderLoop, ViewportController};
use crate::stream::{Session, SessionConfig, SessionNotice};
use config::{brain_regions, FRAME_TIME_THRESHOLD_MS, SLOW_FRAME_COUNT_THRESHOLD};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Instant;

/// Single-line text input
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputLine {
    buffer: String,
}

impl InputLine {
    pub fn push(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    /// Take the current text, leaving the line empty
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Frame time tracking for the status bar
#[derive(Debug)]
pub struct FrameStats {
    last_frame_time: Instant,
    /// Duration of the last frame in milliseconds
    pub last_frame_ms: u128,
    slow_frame_count: u32,
    /// Set after several consecutive slow frames; cleared by a fast one
    pub running_slow: bool,
}

impl FrameStats {
    fn new(now: Instant) -> Self {
        Self {
            last_frame_time: now,
            last_frame_ms: 0,
            slow_frame_count: 0,
            running_slow: false,
        }
    }

    /// Record the start of a frame
    pub fn record(&mut self, now: Instant) {
        let frame_time = now.duration_since(self.last_frame_time).as_millis();
        self.last_frame_time = now;
        self.last_frame_ms = frame_time;

        if frame_time > FRAME_TIME_THRESHOLD_MS {
            self.slow_frame_count = self.slow_frame_count.saturating_add(1);
            if self.slow_frame_count >= SLOW_FRAME_COUNT_THRESHOLD && !self.running_slow {
                tracing::debug!(frame_time, "Render loop running slow");
                self.running_slow = true;
            }
        } else {
            self.slow_frame_count = 0;
            self.running_slow = false;
        }
    }
}

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    /// Telemetry session; owns the brain state and event log
    pub session: Session,

    /// Neuron proxies, shared with the session subscriber that recolors them
    pool: Rc<RefCell<EntityPool>>,

    pub viewport: ViewportController,

    pub render_loop: RenderLoop,

    pub input: InputLine,

    pub frame_config: FrameConfig,

    pub frame_stats: FrameStats,

    torn_down: bool,
}

impl AppState {
    /// Build the view for a terminal of `cols` x `rows` cells
    ///
    /// The session is created idle; call `start` to connect.
    pub fn new(
        session_config: SessionConfig,
        frame_config: FrameConfig,
        cols: u16,
        rows: u16,
    ) -> Self {
        let pool = Rc::new(RefCell::new(EntityPool::new(&brain_regions())));
        let proxy_count = pool.borrow().len();

        let mut session = Session::new(session_config);
        let sink = Rc::clone(&pool);
        session.subscribe(Box::new(move |notice| {
            if let SessionNotice::BrainStateChanged(state) = notice {
                let activations = state.region_activations();
                let updated = sink.borrow_mut().apply_activations(&activations);
                tracing::trace!(updated, "Brain state applied to neuron pool");
            }
        }));

        let (width, height) = crate::ui::cortex_surface_size(cols, rows);

        Self {
            running: true,
            session,
            pool,
            viewport: ViewportController::new(width, height),
            render_loop: RenderLoop::new(proxy_count),
            input: InputLine::default(),
            frame_config,
            frame_stats: FrameStats::new(Instant::now()),
            torn_down: false,
        }
    }

    /// Open the telemetry session
    pub fn start(&mut self) {
        self.session.open();
    }

    /// Handle whatever telemetry has arrived since the last turn
    pub fn on_tick(&mut self) -> usize {
        self.session.poll()
    }

    /// Advance the render loop by one frame
    pub fn render_tick(&mut self) {
        self.frame_stats.record(Instant::now());
        let pool = self.pool.borrow();
        self.render_loop.tick(&pool, &self.viewport);
    }

    /// Terminal resized to `cols` x `rows`
    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        let (width, height) = crate::ui::cortex_surface_size(cols, rows);
        self.viewport.on_resize(width, height);
    }

    /// Send the input line to the brain
    ///
    /// Blank lines are dropped. The line is cleared either way.
    pub fn submit_input(&mut self) -> bool {
        let text = self.input.take();
        if text.trim().is_empty() {
            return false;
        }
        self.session.send(&text)
    }

    pub fn pool(&self) -> Ref<'_, EntityPool> {
        self.pool.borrow()
    }

    /// Release the session, the render loop, the pool and the surface
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.session.close();
        self.render_loop.cancel();
        let released = self.pool.borrow_mut().dispose();
        self.viewport.release();
        tracing::info!(released, "View torn down");
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.teardown();
    }
}

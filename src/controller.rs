//! The tour state machine.
//!
//! [`TourController`] is owned by the authenticated shell and driven by the
//! host through a handful of calls:
//!
//! - [`navigate`](TourController::navigate) on every location change,
//! - [`advance_time`](TourController::advance_time) as time passes,
//! - [`environment_mutated`](TourController::environment_mutated) on each
//!   batch of DOM mutations,
//! - [`next`](TourController::next), [`back`](TourController::back) and
//!   [`skip`](TourController::skip) from the overlay's controls,
//! - [`unmount`](TourController::unmount) on logout.
//!
//! ```text
//!            navigate              settle timer
//!   Idle ─────────────▶ Settling ─────────────▶ Active(mode, i)
//!    ▲                     ▲                        │
//!    │ skip / finish       │ navigate               │ finish on cart
//!    └─────────────────────┴────────────────────────┤
//!                                                   ▼
//!                                               Completed ──reset──▶ Settling
//! ```
//!
//! Side effects the host must perform come back as [`Effect`]s.

use std::time::Duration;

use jiff::Timestamp;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::detector::{self, Detection};
use crate::environment::Environment;
use crate::model::{
    DeviceClass, Location, PageKey, StepDescriptor, SubMode, TourMode, Viewport,
};
use crate::persistence::{Persistence, ProgressSnapshot};
use crate::registry::{self, NextPage};
use crate::resolver;
use crate::schedule::{Scheduler, TimerKind};
use crate::storage::KeyValueStore;
use crate::view::TourView;

#[cfg(test)]
mod tests;

/// Coarse controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// No tour showing and none scheduled.
    Idle,

    /// Waiting for a freshly navigated page to render.
    Settling,

    /// A step is showing.
    Active,

    /// The user finished the tour. Only a debug reset leaves this state.
    Completed,
}

/// Something the host must do on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effect {
    /// Navigate to this path, then report it back through `navigate`.
    Navigate(String),

    /// Stop delivering mutation notifications.
    DisconnectObserver,
}

/// Drives the guided tour for one signed-in session.
pub struct TourController<S> {
    config: Config,
    persistence: Persistence<S>,
    scheduler: Scheduler,
    location: Location,
    page: PageKey,
    device: DeviceClass,
    phase: Phase,
    mode: TourMode,
    steps: Vec<StepDescriptor>,
    step_index: usize,
    ready: bool,
    completed: bool,
    detected: Option<SubMode>,
    dismissed: Option<SubMode>,
    debug: bool,
    mounted: bool,
    observing: bool,
    last_progress: Option<ProgressSnapshot>,
}

impl<S: KeyValueStore> TourController<S> {
    /// Creates the controller at `location` and schedules the first settle.
    ///
    /// Persisted state is read here and nowhere else.
    pub fn mount(config: Config, store: S, location: &str, viewport: Viewport) -> Self {
        let persistence = Persistence::new(store);
        let persisted = persistence.load();
        let device = config.device_class(viewport);
        let observing = config.enabled && !persisted.completed;

        let mut controller = Self {
            debug: config.debug,
            config,
            persistence,
            scheduler: Scheduler::new(),
            location: Location::default(),
            page: PageKey::Home,
            device,
            phase: if persisted.completed {
                Phase::Completed
            } else {
                Phase::Idle
            },
            mode: TourMode::Normal,
            steps: Vec::new(),
            step_index: 0,
            ready: false,
            completed: persisted.completed,
            detected: None,
            dismissed: None,
            mounted: true,
            observing,
            last_progress: persisted.progress,
        };
        debug!(completed = controller.completed, ?device, "tour mounted");
        controller.enter(Location::parse(location));
        controller
    }

    // ── Host events ──

    /// Reports a location change. Same-path reports are ignored.
    pub fn navigate(&mut self, location: &str) {
        if !self.mounted {
            return;
        }
        let location = Location::parse(location);
        if location.path() == self.location.path() {
            self.note_debug_flag(&location);
            return;
        }
        self.enter(location);
    }

    /// Advances the clock by `elapsed`, firing due timers in order.
    pub fn advance_time(&mut self, elapsed: Duration, env: &dyn Environment) {
        if !self.mounted {
            return;
        }
        let until = self.scheduler.now() + elapsed;
        while let Some(kind) = self.scheduler.pop_due(until) {
            match kind {
                TimerKind::Settle => self.on_settled(env),
                TimerKind::ModePoll => self.on_environment(env),
                TimerKind::ResumeNormal => self.on_resume(env),
            }
        }
        self.scheduler.advance_to(until);
    }

    /// Reports a batch of DOM mutations.
    pub fn environment_mutated(&mut self, env: &dyn Environment) {
        if self.mounted && self.observing {
            self.on_environment(env);
        }
    }

    /// Reports a viewport change.
    ///
    /// A running tour switches to the new device's variant of its step
    /// list, keeping the cursor in bounds.
    pub fn resize(&mut self, viewport: Viewport) {
        let device = self.config.device_class(viewport);
        if device == self.device {
            return;
        }
        self.device = device;
        if !self.is_running() {
            return;
        }
        let steps = registry::steps(self.page, self.mode, device);
        if steps.is_empty() {
            debug!(page = %self.page, mode = %self.mode, ?device, "no steps for device, stopping");
            self.stop();
            return;
        }
        self.step_index = self.step_index.min(steps.len() - 1);
        self.steps = steps;
        debug!(?device, step = self.step_index, "device class changed");
    }

    /// The "next" control. On the last step this finishes the list.
    pub fn next(&mut self, env: &dyn Environment) -> Vec<Effect> {
        if !self.is_running() {
            return Vec::new();
        }
        if self.step_index + 1 < self.steps.len() {
            self.step_index += 1;
            debug!(page = %self.page, mode = %self.mode, step = self.step_index, "step advanced");
            self.record_progress();
            return Vec::new();
        }
        self.finish(env)
    }

    /// The "back" control.
    pub fn back(&mut self) {
        if !self.is_running() || self.step_index == 0 {
            return;
        }
        self.step_index -= 1;
        debug!(page = %self.page, mode = %self.mode, step = self.step_index, "step retreated");
        self.record_progress();
    }

    /// The "skip" control.
    pub fn skip(&mut self) -> Vec<Effect> {
        if !self.is_running() {
            return Vec::new();
        }
        debug!(page = %self.page, mode = %self.mode, step = self.step_index, "tour skipped");
        self.stop();
        if let Some(sub) = self.mode.sub_mode() {
            self.leave_sub_mode(sub);
            return Vec::new();
        }
        if self.page == PageKey::Cart {
            return self.complete();
        }
        Vec::new()
    }

    /// Clears persisted state and restarts the tour on the current page.
    ///
    /// Only honoured when debugging was enabled by config, env, or the
    /// debug query flag. Returns whether the reset happened.
    pub fn reset(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        if !self.debug {
            warn!("tour reset requested without debug flag");
            return false;
        }
        self.persistence.reset();
        self.completed = false;
        self.last_progress = None;
        self.observing = self.config.enabled;
        self.phase = Phase::Idle;
        info!(page = %self.page, "tour state reset");

        let location = self.location.clone();
        if location.page().has_dedicated_steps() {
            self.enter(location);
        } else {
            self.clear_page_state();
        }
        true
    }

    /// Tears the controller down. Every pending timer is cancelled and the
    /// mutation observer must be disconnected.
    pub fn unmount(&mut self) -> Vec<Effect> {
        if !self.mounted {
            return Vec::new();
        }
        self.scheduler.cancel_all();
        self.steps.clear();
        self.step_index = 0;
        self.ready = false;
        self.phase = if self.completed {
            Phase::Completed
        } else {
            Phase::Idle
        };
        self.mounted = false;
        self.observing = false;
        debug!("tour unmounted");
        vec![Effect::DisconnectObserver]
    }

    // ── Views ──

    pub fn view(&self) -> TourView<'_> {
        TourView::new(
            self.phase,
            self.page,
            self.mode,
            &self.steps,
            self.step_index,
        )
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn page(&self) -> PageKey {
        self.page
    }

    pub fn path(&self) -> &str {
        self.location.path()
    }

    pub fn mode(&self) -> TourMode {
        self.mode
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// The active step list. Empty unless a tour is running.
    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn has_completed(&self) -> bool {
        self.completed
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether the host should deliver mutation notifications.
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn is_timer_pending(&self, kind: TimerKind) -> bool {
        self.scheduler.is_pending(kind)
    }

    /// The last saved progress snapshot, if any.
    pub fn last_progress(&self) -> Option<&ProgressSnapshot> {
        self.last_progress.as_ref()
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    /// Consumes the controller, handing back its store.
    pub fn into_store(self) -> S {
        self.persistence.into_store()
    }

    // ── Transitions ──

    /// Moves to a new location: interrupts any tour, cancels every timer
    /// tied to the old page, and schedules a settle for the new one.
    fn enter(&mut self, location: Location) {
        self.note_debug_flag(&location);
        self.page = location.page();
        self.location = location;

        self.scheduler.cancel(TimerKind::Settle);
        self.scheduler.cancel(TimerKind::ModePoll);
        self.scheduler.cancel(TimerKind::ResumeNormal);
        self.clear_page_state();

        if self.completed {
            self.phase = Phase::Completed;
            debug!(page = %self.page, "tour already completed");
            return;
        }
        if !self.config.enabled {
            return;
        }
        self.phase = Phase::Settling;
        self.scheduler.once(TimerKind::Settle, self.config.settle_delay());
        self.scheduler.every(TimerKind::ModePoll, self.config.poll_interval());
        debug!(page = %self.page, path = self.location.path(), "settling");
    }

    fn on_settled(&mut self, env: &dyn Environment) {
        self.ready = true;
        if self.completed || !self.config.enabled {
            return;
        }
        if self.page.hosts_sub_panels() {
            self.refresh_detection(env);
        }
        self.start_page_tour(env);
    }

    /// Shared by the poll timer and mutation notifications.
    fn on_environment(&mut self, env: &dyn Environment) {
        if self.completed || !self.config.enabled || !self.page.hosts_sub_panels() {
            return;
        }
        if !self.refresh_detection(env) || !self.ready {
            return;
        }
        match (self.wanted_sub_mode(), self.mode.sub_mode()) {
            (Some(wanted), current) if current != Some(wanted) => {
                debug!(page = %self.page, mode = %TourMode::from(wanted), "panel opened");
                self.stop();
                self.start(wanted.into());
            }
            (None, Some(_)) => {
                debug!(page = %self.page, "panel closed");
                self.start_page_tour(env);
            }
            _ => {}
        }
    }

    fn on_resume(&mut self, env: &dyn Environment) {
        if self.completed || self.page != PageKey::SellerDashboard || self.is_running() {
            return;
        }
        let normal = registry::steps(self.page, TourMode::Normal, self.device);
        if resolver::any_resolves(&normal, env) {
            debug!(page = %self.page, "resuming page tour");
            self.start(TourMode::Normal);
        }
    }

    /// Updates the detected panel. Returns false when inspection failed.
    fn refresh_detection(&mut self, env: &dyn Environment) -> bool {
        match detector::detect(env) {
            Detection::Unknown => false,
            Detection::Clear => {
                self.detected = None;
                self.dismissed = None;
                true
            }
            Detection::Panel(sub) => {
                self.detected = Some(sub);
                if self.dismissed.is_some_and(|d| d != sub) {
                    self.dismissed = None;
                }
                true
            }
        }
    }

    /// The detected panel, unless the user dismissed its tour.
    fn wanted_sub_mode(&self) -> Option<SubMode> {
        self.detected.filter(|sub| self.dismissed != Some(*sub))
    }

    /// Starts the most specific tour the page supports: an open panel's
    /// steps, else the page's own steps when any anchor resolves, else the
    /// fallback steps.
    fn start_page_tour(&mut self, env: &dyn Environment) {
        self.stop();
        if let Some(sub) = self.wanted_sub_mode()
            && self.start(sub.into())
        {
            return;
        }
        let normal = registry::steps(self.page, TourMode::Normal, self.device);
        if resolver::any_resolves(&normal, env) {
            self.start(TourMode::Normal);
        } else {
            debug!(page = %self.page, "no page anchors resolved, using fallback");
            self.start(TourMode::Fallback);
        }
    }

    /// Starts `mode` at step 0. Refuses when not ready, completed, or the
    /// list is empty.
    fn start(&mut self, mode: TourMode) -> bool {
        if !self.ready || self.completed {
            return false;
        }
        let steps = registry::steps(self.page, mode, self.device);
        if steps.is_empty() {
            debug!(page = %self.page, %mode, "no steps");
            return false;
        }
        self.mode = mode;
        self.steps = steps;
        self.step_index = 0;
        self.phase = Phase::Active;
        debug!(page = %self.page, %mode, steps = self.steps.len(), "tour started");
        self.record_progress();
        true
    }

    /// The last step was acknowledged.
    fn finish(&mut self, env: &dyn Environment) -> Vec<Effect> {
        debug!(page = %self.page, mode = %self.mode, "steps exhausted");
        self.stop();
        if let Some(sub) = self.mode.sub_mode() {
            self.leave_sub_mode(sub);
            return Vec::new();
        }
        match registry::next_page(self.page) {
            Some(next) => {
                let path = match next {
                    NextPage::Path(path) => path.to_string(),
                    NextPage::FirstListedItem { otherwise } => env
                        .first_item_path()
                        .unwrap_or_else(|| otherwise.to_string()),
                };
                debug!(from = %self.page, to = %path, "continuing tour on next page");
                vec![Effect::Navigate(path)]
            }
            None if self.page == PageKey::Cart => self.complete(),
            None => {
                warn!(page = %self.page, "tour has no next page");
                Vec::new()
            }
        }
    }

    /// Drops back to the page tour after a sub-mode ends. The panel's tour
    /// stays dismissed until the panel closes.
    fn leave_sub_mode(&mut self, sub: SubMode) {
        self.dismissed = Some(sub);
        self.mode = TourMode::Normal;
        self.scheduler
            .once(TimerKind::ResumeNormal, self.config.resume_delay());
    }

    /// Terminal: persists completion and stops all tour activity.
    fn complete(&mut self) -> Vec<Effect> {
        self.completed = true;
        self.phase = Phase::Completed;
        self.steps.clear();
        self.step_index = 0;
        self.mode = TourMode::Normal;
        self.persistence.save(true);
        self.persistence.clear_progress();
        self.last_progress = None;
        self.scheduler.cancel_all();
        self.observing = false;
        info!("tour completed");
        vec![Effect::DisconnectObserver]
    }

    /// Stops a running tour. The mode is left for the caller to inspect.
    fn stop(&mut self) {
        if self.phase == Phase::Active {
            self.phase = Phase::Idle;
        }
        self.steps.clear();
        self.step_index = 0;
    }

    fn clear_page_state(&mut self) {
        if self.phase != Phase::Completed {
            self.phase = Phase::Idle;
        }
        self.steps.clear();
        self.step_index = 0;
        self.mode = TourMode::Normal;
        self.ready = false;
        self.detected = None;
        self.dismissed = None;
    }

    fn record_progress(&mut self) {
        if !self.is_running() {
            return;
        }
        let snapshot = ProgressSnapshot {
            path: self.location.path().to_string(),
            page: self.page,
            mode: self.mode,
            step_index: self.step_index,
            saved_at: Timestamp::now(),
        };
        self.persistence.save_progress(&snapshot);
        self.last_progress = Some(snapshot);
    }

    fn note_debug_flag(&mut self, location: &Location) {
        if !self.debug && location.query_flag(&self.config.debug_query_param) {
            info!("tour debug enabled by query flag");
            self.debug = true;
        }
    }
}

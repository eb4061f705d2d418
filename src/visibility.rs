use crate::settings::TimeRange;
use crate::topmost::should_be_topmost;
use chrono::NaiveTime;
use eframe::egui::{self, ViewportCommand, ViewportId, WindowLevel};

/// Clock opacity while the overlay is pinned on top.
pub const TOPMOST_CLOCK_OPACITY: f32 = 0.3;

/// Minimal interface over [`egui::Context`] used to drive the overlay windows.
/// Tests substitute a recorder.
pub trait ViewportCtx {
    fn send_viewport_cmd_to(&self, id: ViewportId, cmd: ViewportCommand);
    fn request_repaint(&self);
}

impl ViewportCtx for egui::Context {
    fn send_viewport_cmd_to(&self, id: ViewportId, cmd: ViewportCommand) {
        egui::Context::send_viewport_cmd_to(self, id, cmd);
    }

    fn request_repaint(&self) {
        egui::Context::request_repaint(self);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Schedule window visible, both windows at the configured transparency.
    Normal,
    /// Only the dimmed, immovable clock is shown above all other windows.
    Topmost,
}

impl DisplayMode {
    pub fn from_topmost(topmost: bool) -> Self {
        if topmost {
            DisplayMode::Topmost
        } else {
            DisplayMode::Normal
        }
    }

    pub fn is_topmost(self) -> bool {
        self == DisplayMode::Topmost
    }
}

/// Per-window presentation derived from a [`DisplayMode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayStyle {
    pub clock_opacity: f32,
    pub clock_movable: bool,
    pub clock_level: WindowLevel,
    pub schedule_visible: bool,
    pub schedule_opacity: f32,
    /// The course list sits below ordinary windows like a desktop widget.
    pub schedule_level: WindowLevel,
}

impl DisplayStyle {
    pub fn for_mode(mode: DisplayMode, transparency: f32) -> Self {
        match mode {
            DisplayMode::Topmost => Self {
                clock_opacity: TOPMOST_CLOCK_OPACITY,
                clock_movable: false,
                clock_level: WindowLevel::AlwaysOnTop,
                schedule_visible: false,
                schedule_opacity: transparency,
                schedule_level: WindowLevel::AlwaysOnBottom,
            },
            DisplayMode::Normal => Self {
                clock_opacity: transparency,
                clock_movable: true,
                clock_level: WindowLevel::Normal,
                schedule_visible: true,
                schedule_opacity: transparency,
                schedule_level: WindowLevel::AlwaysOnBottom,
            },
        }
    }
}

/// Send the window commands for entering `mode` and return the resulting style.
///
/// The clock lives in the root viewport; the schedule list in `schedule`.
pub fn apply_display_mode<C: ViewportCtx + ?Sized>(
    mode: DisplayMode,
    transparency: f32,
    ctx: &C,
    schedule: ViewportId,
) -> DisplayStyle {
    let style = DisplayStyle::for_mode(mode, transparency);
    match mode {
        DisplayMode::Topmost => {
            ctx.send_viewport_cmd_to(schedule, ViewportCommand::Visible(false));
            ctx.send_viewport_cmd_to(ViewportId::ROOT, ViewportCommand::WindowLevel(style.clock_level));
            ctx.send_viewport_cmd_to(ViewportId::ROOT, ViewportCommand::Visible(true));
            ctx.send_viewport_cmd_to(ViewportId::ROOT, ViewportCommand::Focus);
        }
        DisplayMode::Normal => {
            ctx.send_viewport_cmd_to(schedule, ViewportCommand::Visible(true));
            ctx.send_viewport_cmd_to(schedule, ViewportCommand::WindowLevel(style.schedule_level));
            ctx.send_viewport_cmd_to(schedule, ViewportCommand::Focus);
            ctx.send_viewport_cmd_to(ViewportId::ROOT, ViewportCommand::WindowLevel(style.clock_level));
            ctx.send_viewport_cmd_to(ViewportId::ROOT, ViewportCommand::Visible(true));
        }
    }
    ctx.request_repaint();
    tracing::info!(?mode, opacity = style.clock_opacity, "display mode applied");
    style
}

/// Two-state machine flipping between [`DisplayMode`]s as the topmost policy
/// changes its answer.
#[derive(Debug)]
pub struct VisibilityCoordinator {
    mode: DisplayMode,
    transitions: u64,
}

impl VisibilityCoordinator {
    pub fn new(initial: DisplayMode) -> Self {
        Self {
            mode: initial,
            transitions: 0,
        }
    }

    /// Start in whatever mode the policy asks for at `now`.
    pub fn from_policy(now: NaiveTime, ranges: &[TimeRange]) -> Self {
        Self::new(DisplayMode::from_topmost(should_be_topmost(now, ranges)))
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Number of state changes since construction.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Re-evaluate the policy. Returns the new mode only when it differs
    /// from the current one.
    pub fn poll(&mut self, now: NaiveTime, ranges: &[TimeRange]) -> Option<DisplayMode> {
        let desired = DisplayMode::from_topmost(should_be_topmost(now, ranges));
        tracing::debug!(current = ?self.mode, ?desired, "topmost check");
        if desired == self.mode {
            return None;
        }
        self.mode = desired;
        self.transitions += 1;
        Some(desired)
    }

    /// Poll and, on a change, apply the new mode through `ctx`.
    pub fn tick<C: ViewportCtx + ?Sized>(
        &mut self,
        now: NaiveTime,
        ranges: &[TimeRange],
        transparency: f32,
        ctx: &C,
        schedule: ViewportId,
    ) -> Option<DisplayStyle> {
        self.poll(now, ranges)
            .map(|mode| apply_display_mode(mode, transparency, ctx, schedule))
    }
}

use crate::geometry::OverlayLayout;
use crate::visibility::ViewportCtx;
use eframe::egui::{Vec2, ViewportCommand, ViewportId};
use rand::Rng;

/// Largest jitter, in pixels, along either axis.
pub const MAX_PIXEL_SHIFT: i32 = 3;

/// Draw an independent offset in `[-MAX_PIXEL_SHIFT, MAX_PIXEL_SHIFT]` per axis.
pub fn draw_offset<R: Rng + ?Sized>(rng: &mut R) -> (i32, i32) {
    (
        rng.gen_range(-MAX_PIXEL_SHIFT..=MAX_PIXEL_SHIFT),
        rng.gen_range(-MAX_PIXEL_SHIFT..=MAX_PIXEL_SHIFT),
    )
}

/// Jitter both windows around their anchors. The schedule window is only
/// moved while it is visible.
pub fn pixel_shift<R, C>(
    rng: &mut R,
    screen: Vec2,
    schedule_visible: bool,
    ctx: &C,
    schedule: ViewportId,
) -> OverlayLayout
where
    R: Rng + ?Sized,
    C: ViewportCtx + ?Sized,
{
    let (dx, dy) = draw_offset(rng);
    let layout = OverlayLayout::shifted(screen, dx, dy);
    if schedule_visible {
        ctx.send_viewport_cmd_to(schedule, ViewportCommand::OuterPosition(layout.schedule_pos));
    }
    ctx.send_viewport_cmd_to(ViewportId::ROOT, ViewportCommand::OuterPosition(layout.clock_pos));
    tracing::debug!(dx, dy, schedule_visible, "anti burn-in pixel shift");
    layout
}

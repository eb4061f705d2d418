use eframe::egui::{pos2, vec2, Pos2, Vec2};

pub const SCHEDULE_WIDTH: f32 = 600.0;
pub const CLOCK_SIZE: Vec2 = Vec2::new(400.0, 150.0);
/// Gap between the clock's right edge and the screen's right edge, beyond
/// the clock's own width.
pub const CLOCK_RIGHT_MARGIN: f32 = 125.0;
/// Both windows stay within `0..=VERTICAL_BAND` pixels from the top edge.
pub const VERTICAL_BAND: f32 = 10.0;
pub const FALLBACK_SCREEN: Vec2 = Vec2::new(1920.0, 1080.0);

/// Positions and sizes of the two overlay windows for one screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    pub screen: Vec2,
    pub schedule_pos: Pos2,
    pub schedule_size: Vec2,
    pub clock_pos: Pos2,
}

impl OverlayLayout {
    /// Anchored layout: schedule window flush with the right edge at full
    /// height, clock to its left along the top edge.
    pub fn anchored(screen: Vec2) -> Self {
        let schedule_width = SCHEDULE_WIDTH.min(screen.x);
        Self {
            screen,
            schedule_pos: pos2(screen.x - schedule_width, 0.0),
            schedule_size: vec2(schedule_width, screen.y),
            clock_pos: pos2((screen.x - CLOCK_SIZE.x - CLOCK_RIGHT_MARGIN).max(0.0), 0.0),
        }
    }

    /// Layout offset from the anchors by `(dx, dy)`, clamped so the schedule
    /// window never leaves the screen horizontally and both windows stay in
    /// the top band.
    pub fn shifted(screen: Vec2, dx: i32, dy: i32) -> Self {
        let anchored = Self::anchored(screen);
        let (dx, dy) = (dx as f32, dy as f32);
        let max_schedule_x = (screen.x - anchored.schedule_size.x).max(0.0);
        Self {
            schedule_pos: pos2(
                (anchored.schedule_pos.x + dx).clamp(0.0, max_schedule_x),
                (anchored.schedule_pos.y + dy).clamp(0.0, VERTICAL_BAND),
            ),
            clock_pos: pos2(
                (anchored.clock_pos.x + dx).max(0.0),
                (anchored.clock_pos.y + dy).clamp(0.0, VERTICAL_BAND),
            ),
            ..anchored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_layout_on_full_hd() {
        let layout = OverlayLayout::anchored(vec2(1920.0, 1080.0));
        assert_eq!(layout.schedule_pos, pos2(1320.0, 0.0));
        assert_eq!(layout.schedule_size, vec2(600.0, 1080.0));
        assert_eq!(layout.clock_pos, pos2(1395.0, 0.0));
    }

    #[test]
    fn narrow_screen_keeps_windows_on_screen() {
        let layout = OverlayLayout::shifted(vec2(500.0, 400.0), -3, -3);
        assert_eq!(layout.schedule_pos, pos2(0.0, 0.0));
        assert_eq!(layout.schedule_size.x, 500.0);
        assert_eq!(layout.clock_pos.x, 0.0);
    }
}

use eframe::egui;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockCtx {
    pub commands: Arc<Mutex<Vec<(egui::ViewportId, egui::ViewportCommand)>>>,
    pub repaints: Arc<Mutex<usize>>,
}

impl MockCtx {
    pub fn take(&self) -> Vec<(egui::ViewportId, egui::ViewportCommand)> {
        std::mem::take(&mut *self.commands.lock().unwrap())
    }

    #[allow(dead_code)]
    pub fn repaint_count(&self) -> usize {
        *self.repaints.lock().unwrap()
    }
}

// Record commands instead of talking to a window system.
impl class_schedule::visibility::ViewportCtx for MockCtx {
    fn send_viewport_cmd_to(&self, id: egui::ViewportId, cmd: egui::ViewportCommand) {
        self.commands.lock().unwrap().push((id, cmd));
    }

    fn request_repaint(&self) {
        *self.repaints.lock().unwrap() += 1;
    }
}

//! 响应式断点 + 面板拖拽调整宽度

use crate::kernel::settings::SettingsStore;

pub struct Breakpoints;

impl Breakpoints {
    pub const SM: u32 = 640;
    pub const MD: u32 = 768;
    pub const LG: u32 = 1024;
    pub const XL: u32 = 1280;
    pub const XXL: u32 = 1536;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    pub fn of(width: u32) -> Self {
        if width < Breakpoints::MD {
            DeviceClass::Mobile
        } else if width < Breakpoints::LG {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true when the device class changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let before = self.device_class();
        self.width = width;
        self.height = height;
        before != self.device_class()
    }

    pub fn device_class(&self) -> DeviceClass {
        DeviceClass::of(self.width)
    }

    pub fn is_mobile(&self) -> bool {
        self.device_class() == DeviceClass::Mobile
    }

    pub fn is_tablet(&self) -> bool {
        self.device_class() == DeviceClass::Tablet
    }

    pub fn is_desktop(&self) -> bool {
        self.device_class() == DeviceClass::Desktop
    }
}

pub const SIDEBAR_DRAG_RANGE: (u32, u32) = (200, 500);
pub const CONSOLE_DRAG_RANGE: (u32, u32) = (300, 600);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragTarget {
    Sidebar,
    Console,
}

/// Pointer/touch drag on a panel splitter.
#[derive(Debug, Default)]
pub struct PanelResizer {
    target: Option<DragTarget>,
}

impl PanelResizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<DragTarget> {
        self.target
    }

    pub fn start_drag(&mut self, target: DragTarget) {
        self.target = Some(target);
    }

    /// `client_x` is the pointer position from the left edge. The console sits
    /// on the right, so its width is measured from the window's right edge.
    pub fn on_drag(
        &self,
        client_x: u32,
        window_width: u32,
        settings: &mut SettingsStore,
    ) -> bool {
        match self.target {
            Some(DragTarget::Sidebar) => {
                let (min, max) = SIDEBAR_DRAG_RANGE;
                settings.set_sidebar_width(client_x.clamp(min, max));
                true
            }
            Some(DragTarget::Console) => {
                let (min, max) = CONSOLE_DRAG_RANGE;
                let width = window_width.saturating_sub(client_x);
                settings.set_console_width(width.clamp(min, max));
                true
            }
            None => false,
        }
    }

    pub fn stop_drag(&mut self) {
        self.target = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/layout.rs"]
mod tests;

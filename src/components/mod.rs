use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod debug_log;
pub mod status_bar;
pub mod status_screen;
pub mod toast;

pub use debug_log::{LogHandle, LogPane};
pub use status_bar::StatusBar;
pub use status_screen::StatusScreen;
pub use toast::Toast;

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect);

    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }
}

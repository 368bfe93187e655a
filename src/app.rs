use crate::game::{AlienInvasion, Control};
use crate::platform::InputEvent;
use crate::ui::TerminalShell;

pub struct App {
    pub should_quit: bool,
    pub game: AlienInvasion,
    pub shell: TerminalShell,
}

impl App {
    pub fn new(game: AlienInvasion, shell: TerminalShell) -> Self {
        Self {
            should_quit: false,
            game,
            shell,
        }
    }

    pub fn on_event(&mut self, event: InputEvent) {
        if self.should_quit {
            return;
        }
        if self.game.handle_event(event, &mut self.shell) == Control::Quit {
            log::info!("Quit requested");
            self.should_quit = true;
        }
    }

    pub fn on_tick(&mut self) {
        self.game.update(&mut self.shell);
    }
}

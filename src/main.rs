use std::fs::File;

use jelly_snake::config::LaunchConfig;
use jelly_snake::session::SessionError;
use jelly_snake::share::{self, FileExport, ShareCache, ShareChannel, ShareReport};
use jelly_snake::storage::{Profile, open_store};
use jelly_snake::{GameSession, RoundState};
use log::{debug, info};
use macroquad::prelude::*;
use simplelog::{Config as LogConfig, SimpleLogger, WriteLogger};

mod ui;

use ui::clipboard::WindowClipboard;
use ui::controls::{self, Control, SwipeTracker};
use ui::draw;
use ui::hud::Hud;
use ui::layout::{Button, Layout};
use ui::sound::Sounds;

const LOG_FILE: &str = "jelly_snake.log";

fn init_logging(config: &LaunchConfig) {
    let installed = match File::create(LOG_FILE) {
        Ok(file) => WriteLogger::init(config.log_level, LogConfig::default(), file),
        Err(_) => SimpleLogger::init(config.log_level, LogConfig::default()),
    };
    if let Err(e) = installed {
        eprintln!("logging disabled: {e}");
    }
}

struct App {
    session: GameSession,
    hud: Hud,
    share_cache: ShareCache,
    channels: Vec<Box<dyn ShareChannel>>,
    quit: bool,
}

impl App {
    fn handle(&mut self, control: Control, now: f64) -> Result<(), SessionError> {
        let state = self.session.state();
        match control {
            Control::Intent(dir) => {
                self.session.set_intent(dir);
            }
            Control::Quit => self.quit = true,
            Control::Confirm => match state {
                RoundState::Intro => self.session.start_game(now)?,
                RoundState::GameOver(_) => self.session.restart_game(now)?,
                _ => {}
            },
            Control::Back => match state {
                RoundState::Intro => self.hud.settings_open = false,
                RoundState::GameOver(_) => self.session.go_to_home()?,
                _ => self.session.quit_game()?,
            },
            Control::Press(button) => self.press(button, now)?,
        }
        Ok(())
    }

    fn press(&mut self, button: Button, now: f64) -> Result<(), SessionError> {
        match button {
            Button::Level(n) => {
                self.session.select_level(n)?;
            }
            Button::Start => self.session.start_game(now)?,
            Button::Settings => self.hud.settings_open = !self.hud.settings_open,
            Button::Sound => {
                self.session.toggle_sound();
            }
            Button::Wrap => {
                self.session.toggle_wrap();
            }
            Button::Pause => {
                self.session.toggle_pause(now)?;
            }
            Button::Quit => self.session.quit_game()?,
            Button::Pad(dir) => {
                self.session.set_intent(dir);
            }
            Button::Restart => self.session.restart_game(now)?,
            Button::Home => self.session.go_to_home()?,
            Button::Share => self.share(now),
        }
        Ok(())
    }

    fn share(&mut self, now: f64) {
        let Some(summary) = self.session.summary() else {
            return;
        };
        let payload = self.share_cache.payload(summary);
        let report = share::share(&mut self.channels, payload);
        self.hud.set_status(report.status_text(), now);
        if let ShareReport::Manual(text) = report {
            self.hud.manual_text = Some(text);
        }
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Jelly Snake".to_owned(),
        window_width: 480,
        window_height: 800,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = LaunchConfig::from_env();
    init_logging(&config);
    info!("starting Jelly Snake");

    let sounds = Sounds::load().await;
    let profile = Profile::load(open_store(&config.save_path));
    let channels: Vec<Box<dyn ShareChannel>> = vec![Box::new(FileExport::new(&config.share_dir)), Box::new(WindowClipboard)];
    let mut app = App {
        session: GameSession::new(profile, config.seed),
        hud: Hud::default(),
        share_cache: ShareCache::new(),
        channels,
        quit: false,
    };
    let mut swipe = SwipeTracker::default();

    loop {
        let now = get_time();
        let layout = Layout::compute(screen_width(), screen_height(), app.session.state(), app.hud.settings_open);

        for control in controls::poll(&layout, &mut swipe) {
            if let Err(e) = app.handle(control, now) {
                debug!("ignored {control:?}: {e}");
            }
        }
        if app.quit {
            break;
        }

        app.session.update(now);
        for event in app.session.drain_events() {
            sounds.play_for(&event, app.session.settings().sound);
            app.hud.apply(&event, now);
        }

        // State may have changed this frame; lay out again before drawing.
        let layout = Layout::compute(screen_width(), screen_height(), app.session.state(), app.hud.settings_open);
        draw::scene(&app.session, &app.hud, &layout, now);

        next_frame().await;
    }

    info!("exiting with best score {}", app.session.high_score());
}

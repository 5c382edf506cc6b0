//! Two-player chart player
//!
//! Plays a `.chart` file with its backing track for two players on one keyboard.
//! Player one uses `A S D F G`, player two uses `J K L ; '`, and Space starts or restarts.

use std::path::{Path, PathBuf};

use clap::Parser;
use gametime::TimeSpan;
use kira::{
    AudioManager, AudioManagerSettings, DefaultBackend,
    sound::{
        PlaybackState,
        static_sound::{StaticSoundData, StaticSoundHandle},
    },
};
use macroquad::prelude::*;
use riff_hero::{
    audio::{MusicStream, PlaybackStatus},
    chart::read_chart_source,
    config::GameConfig,
    input::InputKey,
    play::{
        game::Game,
        session::Feedback,
        snapshot::FrameSnapshot,
        status::StatusKind,
    },
    rng::RandRng,
};
use strict_num_extended::PositiveF64;

/// Command line options
#[derive(Parser, Debug)]
#[command(name = "duet_player")]
#[command(about = "A two-player falling-note chart player", long_about = None)]
struct Options {
    /// Chart file path
    #[arg(value_name = "FILE")]
    chart_path: PathBuf,

    /// Note fall speed (pixels per second)
    #[arg(long, default_value = "800", value_parser = parse_fall_speed)]
    fall_speed: PositiveF64,

    /// Hit tolerance (milliseconds)
    #[arg(
        long,
        default_value = "200",
        value_name = "MILLISECONDS",
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    tolerance_ms: i64,

    /// Sound played on every hit
    #[arg(long, default_value = "hit.ogg", value_name = "FILE")]
    hit_sound: PathBuf,

    /// Added to the audio position (milliseconds)
    #[arg(long, default_value = "0", value_name = "MILLISECONDS")]
    latency_ms: i64,
}

fn parse_fall_speed(arg: &str) -> Result<PositiveF64, String> {
    let speed: f64 = arg.parse().map_err(|e| format!("{e}"))?;
    PositiveF64::new(speed).map_err(|e| format!("fall speed {speed}: {e}"))
}

impl Options {
    fn config(&self) -> GameConfig {
        let mut config = GameConfig::default();
        config.timing.fall_speed = self.fall_speed;
        config.timing.tolerance = TimeSpan::MILLISECOND * self.tolerance_ms;
        config.timing.audio_latency = TimeSpan::MILLISECOND * self.latency_ms;
        config
    }
}

/// The backing track played through kira.
struct KiraStream {
    manager: AudioManager<DefaultBackend>,
    data: Option<StaticSoundData>,
    handle: Option<StaticSoundHandle>,
    start_at: f64,
    hit: Option<StaticSoundData>,
}

impl KiraStream {
    fn new() -> Result<Self, String> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| format!("Failed to initialize audio: {e}"))?;
        Ok(Self {
            manager,
            data: None,
            handle: None,
            start_at: 0.0,
            hit: None,
        })
    }

    /// Loads the hit sample. Without it hits are silent.
    fn load_hit_sound(&mut self, path: &Path) {
        match StaticSoundData::from_file(path) {
            Ok(data) => self.hit = Some(data),
            Err(e) => log::warn!("cannot load hit sound {}: {e}", path.display()),
        }
    }

    fn play_hit(&mut self) {
        let Some(hit) = &self.hit else {
            return;
        };
        if let Err(e) = self.manager.play(hit.clone()) {
            log::warn!("failed to play the hit sound: {e}");
        }
    }
}

impl MusicStream for KiraStream {
    fn open(&mut self, path: &Path) -> bool {
        match StaticSoundData::from_file(path) {
            Ok(data) => {
                self.stop();
                self.data = Some(data);
                true
            }
            Err(e) => {
                log::debug!("cannot decode {}: {e}", path.display());
                false
            }
        }
    }

    fn play(&mut self) {
        let Some(data) = &self.data else {
            return;
        };
        match self.manager.play(data.clone()) {
            Ok(mut handle) => {
                handle.seek_to(self.start_at);
                self.handle = Some(handle);
            }
            Err(e) => log::warn!("failed to play the backing track: {e}"),
        }
    }

    fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop(Default::default());
        }
    }

    fn set_position(&mut self, secs: f64) {
        self.start_at = secs;
        if let Some(handle) = &mut self.handle {
            handle.seek_to(secs);
        }
    }

    fn position(&self) -> f64 {
        self.handle
            .as_ref()
            .map_or(self.start_at, StaticSoundHandle::position)
    }

    fn status(&self) -> PlaybackStatus {
        match self.handle.as_ref().map(StaticSoundHandle::state) {
            Some(PlaybackState::Playing) => PlaybackStatus::Playing,
            Some(PlaybackState::Paused) => PlaybackStatus::Paused,
            _ => PlaybackStatus::Stopped,
        }
    }
}

const fn key_code(key: InputKey) -> KeyCode {
    match key {
        InputKey::A => KeyCode::A,
        InputKey::S => KeyCode::S,
        InputKey::D => KeyCode::D,
        InputKey::F => KeyCode::F,
        InputKey::G => KeyCode::G,
        InputKey::J => KeyCode::J,
        InputKey::K => KeyCode::K,
        InputKey::L => KeyCode::L,
        InputKey::Semicolon => KeyCode::Semicolon,
        InputKey::Apostrophe => KeyCode::Apostrophe,
        InputKey::Space => KeyCode::Space,
    }
}

fn window_conf() -> Conf {
    let layout = GameConfig::default().layout;
    Conf {
        window_title: "Riff Hero".to_owned(),
        window_width: layout.window_width as i32,
        window_height: layout.window_height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() -> Result<(), String> {
    env_logger::init();
    let options = Options::parse();
    let config = options.config();

    let mut audio = KiraStream::new()?;
    audio.load_hit_sound(&options.hit_sound);
    let mut game = Game::new(config.clone(), audio, RandRng::from_os_rng());
    load(&mut game, &options.chart_path);

    loop {
        for key in InputKey::ALL {
            if is_key_pressed(key_code(key)) {
                game.key_down(key);
            }
            if is_key_released(key_code(key)) {
                game.key_up(key);
            }
        }
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        game.advance(TimeSpan::from_duration(std::time::Duration::from_secs_f32(
            get_frame_time(),
        )));
        for feedback in game.drain_feedback() {
            log::trace!("{feedback:?}");
            if let Feedback::Hit { .. } = feedback {
                game.audio_mut().play_hit();
            }
        }

        render(&config, &game.frame());
        next_frame().await;
    }
    Ok(())
}

fn load<R: riff_hero::rng::ParticleRng>(game: &mut Game<KiraStream, R>, path: &Path) {
    let source = match read_chart_source(path) {
        Ok(source) => source,
        Err(_) => {
            // Let the game report it through its status line.
            let _ = game.load(path);
            return;
        }
    };
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let result = game.load_source(&source, base_dir);
    let name = path.display().to_string();
    #[cfg(feature = "diagnostics")]
    {
        riff_hero::diagnostics::emit_chart_diagnostics(&name, &source, game.warnings());
        if let Err(riff_hero::play::game::LoadError::Chart(err)) = &result {
            riff_hero::diagnostics::emit_chart_error(&name, &source, err);
        }
    }
    if let Err(e) = result {
        eprintln!("{name}: {e}");
    }
}

fn rgba(c: [u8; 4]) -> Color {
    Color::from_rgba(c[0], c[1], c[2], c[3])
}

const COLOR_BG: Color = Color::from_rgba(20, 20, 28, 255);
const COLOR_LANE_LINE: Color = Color::from_rgba(70, 70, 80, 255);
const COLOR_HIT_ZONE: Color = Color::from_rgba(255, 255, 255, 40);
const COLOR_PRESSED: Color = Color::from_rgba(255, 255, 255, 90);

fn render(config: &GameConfig, frame: &FrameSnapshot) {
    let layout = &config.layout;
    let fret_width = layout.fret_width() as f32;
    let lane_width = layout.lane_width() as f32;
    let height = layout.window_height as f32;
    let hit_zone_y = layout.hit_zone_y as f32;
    let note_height = layout.note_height as f32;

    clear_background(COLOR_BG);

    for (id, player) in frame.players.iter() {
        let left = player.offset_x as f32;
        for lane in 0..=layout.lane_count {
            let x = left + lane as f32 * lane_width;
            draw_line(x, 0.0, x, height, 1.0, COLOR_LANE_LINE);
        }
        draw_rectangle(
            left,
            hit_zone_y,
            fret_width,
            layout.hit_zone_height as f32,
            COLOR_HIT_ZONE,
        );
        for &lane in &player.pressed_lanes {
            draw_rectangle(
                left + lane as f32 * lane_width,
                hit_zone_y,
                lane_width,
                layout.hit_zone_height as f32,
                COLOR_PRESSED,
            );
        }

        for note in &player.notes {
            if note.hit && !note.is_sustain {
                continue;
            }
            let x = left + note.lane as f32 * lane_width + 4.0;
            let y = note.screen_y as f32;
            let alpha = if note.missed { 90 } else { 255 };
            let color = rgba(note.color.with_alpha(alpha));
            if note.is_sustain && !note.sustain_complete {
                let tail = note.sustain_pixel_length as f32;
                let tail_alpha = if note.sustain_active { 230 } else { alpha / 2 };
                draw_rectangle(
                    x + lane_width / 2.0 - 10.0,
                    y - tail,
                    12.0,
                    tail,
                    rgba(note.color.with_alpha(tail_alpha)),
                );
            }
            if !note.hit {
                draw_rectangle(x, y - note_height / 2.0, lane_width - 8.0, note_height, color);
            }
        }

        draw_text(
            &format!("{}: {}", id.label(), player.score),
            left + 10.0,
            30.0,
            32.0,
            WHITE,
        );
    }

    for particle in &frame.particles {
        let size = particle.size as f32;
        draw_rectangle(
            particle.x as f32 - size / 2.0,
            particle.y as f32 - size / 2.0,
            size,
            size,
            rgba(particle.rgba),
        );
    }

    let panel_x = fret_width + 10.0;
    if let Some(song) = &frame.song {
        draw_text(&song.title, panel_x, 60.0, 28.0, WHITE);
        draw_text(&song.artist, panel_x, 90.0, 22.0, LIGHTGRAY);
    }
    if let Some(time) = frame.song_time {
        draw_text(&format!("{time:.2}s"), panel_x, 120.0, 22.0, LIGHTGRAY);
    }
    let status_color = match frame.status.kind() {
        StatusKind::Error => RED,
        StatusKind::GameOver => YELLOW,
        StatusKind::Info if frame.loaded && !frame.running => GREEN,
        StatusKind::Info => WHITE,
    };
    for (row, line) in frame.status.text().lines().enumerate() {
        draw_text(
            line,
            panel_x,
            height / 2.0 + row as f32 * 26.0,
            22.0,
            status_color,
        );
    }
}

//! The backing track as seen by the game.
//!
//! Decoding and mixing live outside this crate. The game only needs a stream it can open,
//! start, stop and seek, and whose playback position serves as the song clock.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use thiserror::Error;

/// Playback state of a [`MusicStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaybackStatus {
    /// The stream advances.
    Playing,
    /// The stream holds its position.
    Paused,
    /// The stream ended or was never started.
    Stopped,
}

/// A music stream the game can drive.
pub trait MusicStream {
    /// Opens the audio file at `path`, replacing the current one. Returns whether it succeeded.
    fn open(&mut self, path: &Path) -> bool;
    /// Starts or resumes playback.
    fn play(&mut self);
    /// Stops playback.
    fn stop(&mut self);
    /// Seeks to `secs` seconds from the start.
    fn set_position(&mut self, secs: f64);
    /// Current playback position in seconds.
    fn position(&self) -> f64;
    /// Current playback state.
    fn status(&self) -> PlaybackStatus;
}

impl<T: MusicStream + ?Sized> MusicStream for Box<T> {
    fn open(&mut self, path: &Path) -> bool {
        T::open(self, path)
    }
    fn play(&mut self) {
        T::play(self);
    }
    fn stop(&mut self) {
        T::stop(self);
    }
    fn set_position(&mut self, secs: f64) {
        T::set_position(self, secs);
    }
    fn position(&self) -> f64 {
        T::position(self)
    }
    fn status(&self) -> PlaybackStatus {
        T::status(self)
    }
}

/// An error of opening the backing track.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum AudioError {
    /// None of the candidate files could be opened.
    #[error("audio file not found, tried: {}", join_paths(.tried))]
    NotFound {
        /// Every path that was tried, in order.
        tried: Vec<PathBuf>,
    },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display()).join(", ")
}

/// Paths tried for `path`: itself, then its stem with each of `extensions`.
#[must_use]
pub fn fallback_candidates(path: &Path, extensions: &[String]) -> Vec<PathBuf> {
    std::iter::once(path.to_path_buf())
        .chain(extensions.iter().map(|ext| path.with_extension(ext)))
        .unique()
        .collect()
}

/// Opens the first candidate of [`fallback_candidates`] that `stream` accepts.
///
/// # Errors
///
/// Returns [`AudioError::NotFound`] with every tried path if no candidate opens.
pub fn open_with_fallback<A: MusicStream + ?Sized>(
    stream: &mut A,
    path: &Path,
    extensions: &[String],
) -> Result<PathBuf, AudioError> {
    let tried = fallback_candidates(path, extensions);
    for candidate in &tried {
        if stream.open(candidate) {
            log::debug!("opened audio file {}", candidate.display());
            return Ok(candidate.clone());
        }
        log::debug!("could not open audio file {}", candidate.display());
    }
    log::warn!(
        "no audio file could be opened for {}, tried {} paths",
        path.display(),
        tried.len()
    );
    Err(AudioError::NotFound { tried })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts only paths with one extension.
    struct OnlyExt(&'static str, Vec<PathBuf>);

    impl MusicStream for OnlyExt {
        fn open(&mut self, path: &Path) -> bool {
            self.1.push(path.to_path_buf());
            path.extension().is_some_and(|ext| ext == self.0)
        }
        fn play(&mut self) {}
        fn stop(&mut self) {}
        fn set_position(&mut self, _secs: f64) {}
        fn position(&self) -> f64 {
            0.0
        }
        fn status(&self) -> PlaybackStatus {
            PlaybackStatus::Stopped
        }
    }

    fn exts() -> Vec<String> {
        ["ogg", "wav", "flac", "mp3"].map(String::from).to_vec()
    }

    #[test]
    fn tries_in_order() {
        let mut stream = OnlyExt("flac", Vec::new());
        let opened = open_with_fallback(&mut stream, Path::new("dir/song.ogg"), &exts()).unwrap();
        assert_eq!(opened, Path::new("dir/song.flac"));
        assert_eq!(
            stream.1,
            vec![
                PathBuf::from("dir/song.ogg"),
                PathBuf::from("dir/song.wav"),
                PathBuf::from("dir/song.flac"),
            ]
        );
    }

    #[test]
    fn reports_every_candidate() {
        let mut stream = OnlyExt("opus", Vec::new());
        let err = open_with_fallback(&mut stream, Path::new("guitar.mp3"), &exts()).unwrap_err();
        let AudioError::NotFound { tried } = &err;
        assert_eq!(
            tried,
            &[
                PathBuf::from("guitar.mp3"),
                PathBuf::from("guitar.ogg"),
                PathBuf::from("guitar.wav"),
                PathBuf::from("guitar.flac"),
            ]
        );
        assert!(err.to_string().contains("guitar.flac"));
    }
}

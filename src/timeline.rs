//! Placement of chart notes on the song timeline.

use itertools::Itertools;

use crate::{
    chart::{ChartDocument, ChartNote},
    play::{
        note::{LaneColor, RuntimeNote, TemplateNote},
        player::{PerPlayer, PlayerId},
    },
    tempo::TempoMap,
};

/// Every note of a chart, timed and copied for both players.
///
/// Built once per chart load, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    notes: Vec<TemplateNote>,
    dropped: usize,
}

impl Timeline {
    /// Times the notes of `chart` with `tempo`.
    ///
    /// Notes on lanes at or beyond `lane_count` are skipped and counted in [`Self::dropped`].
    #[must_use]
    pub fn build(chart: &ChartDocument, tempo: &TempoMap, lane_count: usize) -> Self {
        let (playable, dropped): (Vec<&ChartNote>, Vec<&ChartNote>) = chart
            .notes
            .iter()
            .partition(|note| (note.lane as usize) < lane_count);
        if !dropped.is_empty() {
            log::debug!(
                "dropped {} notes on lanes [{}]",
                dropped.len(),
                dropped.iter().map(|note| note.lane).unique().sorted().join(", "),
            );
        }

        let notes = playable
            .into_iter()
            .flat_map(|note| {
                let timestamp_secs = tempo.ticks_to_seconds(note.tick);
                let sustain_end_secs = if note.is_sustain() {
                    tempo.ticks_to_seconds(note.end_tick())
                } else {
                    timestamp_secs
                };
                let lane = note.lane as usize;
                PlayerId::ALL.map(|owner| TemplateNote {
                    timestamp_secs,
                    sustain_end_secs,
                    origin_tick: note.tick,
                    lane,
                    color: LaneColor::of_lane(lane),
                    is_sustain: note.is_sustain(),
                    owner,
                })
            })
            .sorted_by(|a, b| a.timestamp_secs.total_cmp(&b.timestamp_secs))
            .collect();

        Self {
            notes,
            dropped: dropped.len(),
        }
    }

    /// Template notes of both players in timestamp order.
    #[must_use]
    pub fn notes(&self) -> &[TemplateNote] {
        &self.notes
    }

    /// Template notes of one player in timestamp order.
    pub fn notes_of(&self, player: PlayerId) -> impl Iterator<Item = &TemplateNote> + '_ {
        self.notes.iter().filter(move |note| note.owner == player)
    }

    /// Number of chart notes, not counting the per-player copies.
    #[must_use]
    pub fn chart_note_count(&self) -> usize {
        self.notes.len() / PlayerId::ALL.len()
    }

    /// Number of chart notes skipped for being on an unplayable lane.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Whether there is nothing to play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Fresh runtime notes for a new session, per player in timestamp order.
    #[must_use]
    pub fn instantiate(&self) -> PerPlayer<Vec<RuntimeNote>> {
        PerPlayer::from_fn(|player| {
            self.notes_of(player)
                .copied()
                .map(RuntimeNote::new)
                .collect()
        })
    }
}

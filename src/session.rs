//! Play session
//!
//! Owns the live round together with its collaborators (clock, leaderboard,
//! audio) and runs one simulation tick per frame.

use crate::audio::{AudioSink, SoundCue};
use crate::highscores::Leaderboard;
use crate::persistence::ScoreStore;
use crate::platform::Clock;
use crate::settings::Settings;
use crate::sim::{GamePhase, Round, RoundSnapshot, TickInput, tick};

/// A running game with everything it talks to
pub struct Session<C: Clock, S: ScoreStore, A: AudioSink> {
    settings: Settings,
    clock: C,
    round: Round,
    leaderboard: Leaderboard<S>,
    audio: A,
    /// Top scores as of the last game over (or launch)
    top_scores: Vec<u64>,
    /// Board position the last recorded score took, if it made the board
    last_rank: Option<usize>,
}

impl<C: Clock, S: ScoreStore, A: AudioSink> Session<C, S, A> {
    pub fn new(settings: Settings, clock: C, store: S, audio: A) -> Self {
        let seed = settings.effective_seed();
        let round = Round::new(settings.variant, seed, settings.effective_lives());
        let leaderboard = Leaderboard::new(store);
        let top_scores = leaderboard.top_scores();
        log::info!(
            "Session ready: {} variant, seed {}, {} high scores",
            settings.variant.as_str(),
            seed,
            top_scores.len()
        );
        Self {
            settings,
            clock,
            round,
            leaderboard,
            audio,
            top_scores,
            last_rank: None,
        }
    }

    /// Run one frame: read the clock once, tick, then notify collaborators
    pub fn frame(&mut self, input: &TickInput) {
        let now = self.clock.now();
        tick(&mut self.round, input, now);

        for event in &self.round.events {
            if let Some(cue) = SoundCue::for_event(event) {
                self.audio.play(cue);
            }
        }

        if self.round.phase == GamePhase::GameOver && !self.round.score_recorded {
            self.round.score_recorded = true;
            self.last_rank = self.leaderboard.potential_rank(self.round.score);
            self.top_scores = self.leaderboard.record_score(self.round.score);
            if let Some(rank) = self.last_rank {
                log::info!("Score {} placed #{} on the board", self.round.score, rank);
            }
        }
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Mutable access for hosts and tests that need to stage a round
    pub fn round_mut(&mut self) -> &mut Round {
        &mut self.round
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn top_scores(&self) -> &[u64] {
        &self.top_scores
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    pub fn leaderboard(&self) -> &Leaderboard<S> {
        &self.leaderboard
    }

    /// Renderer view of the current frame, honouring reduced motion
    pub fn snapshot(&self) -> RoundSnapshot {
        let mut snapshot = self.round.snapshot(self.clock.now());
        if !self.settings.effective_screen_shake() {
            snapshot.screen_shake = false;
        }
        snapshot
    }
}

//! Slideshow playback over the timeline
//!
//! Stopped/Playing state machine moving a cursor over the event sequence.
//! While playing, an owned timer task advances the cursor on a fixed
//! cadence; manual stepping is only accepted while stopped.

use super::events::TimelineEvents;
use crate::dataflow::{Actor, Relay, Task, TaskHandle, relay};
use futures::{StreamExt, select};
use futures_signals::signal::SignalExt;
use std::time::Duration;
use tokio::time::{Instant, interval_at};

pub const DEFAULT_SLIDESHOW_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlideshowState {
    pub current_index: usize,
    pub playback: PlaybackState,
}

impl SlideshowState {
    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    /// Previous/next buttons are disabled while playing.
    pub fn navigation_enabled(&self) -> bool {
        !self.is_playing()
    }

    /// One position forward, wrapping to the first event after the last.
    pub fn stepped_forward(self, len: usize) -> Self {
        if len == 0 {
            return self.clamped_to(len);
        }
        Self {
            current_index: (self.current_index + 1) % len,
            ..self
        }
    }

    /// One position back, wrapping to the last event before the first.
    pub fn stepped_back(self, len: usize) -> Self {
        if len == 0 {
            return self.clamped_to(len);
        }
        Self {
            current_index: (self.current_index + len - 1) % len,
            ..self
        }
    }

    /// Keep the cursor inside a sequence of `len` events.
    pub fn clamped_to(self, len: usize) -> Self {
        let current_index = if len == 0 { 0 } else { self.current_index % len };
        Self {
            current_index,
            ..self
        }
    }
}

/// Slideshow controller with Actor+Relay architecture
#[derive(Clone, Debug)]
pub struct Slideshow {
    pub state: Actor<SlideshowState>,

    play_pressed_relay: Relay<()>,
    stop_pressed_relay: Relay<()>,
    toggle_pressed_relay: Relay<()>,
    next_pressed_relay: Relay<()>,
    previous_pressed_relay: Relay<()>,
}

#[derive(Clone, Copy, Debug)]
enum Input {
    Play,
    Stop,
    Toggle,
    Next,
    Previous,
}

/// The playback timer owned by the slideshow loop.
///
/// Ticks carry the generation of the timer that produced them so a tick
/// queued by a cancelled timer is never applied.
struct PlaybackTimer {
    handle: Option<TaskHandle>,
    generation: u64,
    period: Duration,
    timer_ticked_relay: Relay<u64>,
}

impl PlaybackTimer {
    /// Start ticking unless already running. Returns whether a timer started.
    fn start(&mut self) -> bool {
        if self.handle.is_some() {
            return false;
        }
        self.generation += 1;
        let generation = self.generation;
        let period = self.period;
        let timer_ticked_relay = self.timer_ticked_relay.clone();
        self.handle = Some(Task::start_droppable(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                timer_ticked_relay.send(generation);
            }
        }));
        true
    }

    /// Cancel the running timer. Returns whether one was running.
    fn stop(&mut self) -> bool {
        self.handle.take().is_some()
    }

    fn owns(&self, generation: u64) -> bool {
        self.handle.is_some() && generation == self.generation
    }
}

impl Slideshow {
    pub fn new(events: &Actor<TimelineEvents>, interval: Duration) -> Self {
        let (play_pressed_relay, mut play_pressed_stream) = relay::<()>();
        let (stop_pressed_relay, mut stop_pressed_stream) = relay::<()>();
        let (toggle_pressed_relay, mut toggle_pressed_stream) = relay::<()>();
        let (next_pressed_relay, mut next_pressed_stream) = relay::<()>();
        let (previous_pressed_relay, mut previous_pressed_stream) = relay::<()>();

        let mut sequence_len_stream = events.signal_ref(TimelineEvents::len).to_stream().fuse();

        let state = Actor::new(SlideshowState::default(), move |state| async move {
            let (timer_ticked_relay, mut timer_ticked_stream) = relay::<u64>();
            let mut timer = PlaybackTimer {
                handle: None,
                generation: 0,
                period: interval,
                timer_ticked_relay,
            };
            let mut sequence_len = 0usize;

            loop {
                let input = select! {
                    len = sequence_len_stream.next() => match len {
                        Some(len) => {
                            sequence_len = len;
                            state.set_neq(state.get().clamped_to(len));
                            continue;
                        }
                        // Event store gone; keep the last known length.
                        None => continue,
                    },
                    tick = timer_ticked_stream.next() => match tick {
                        Some(generation) if timer.owns(generation) => {
                            state.set_neq(state.get().stepped_forward(sequence_len));
                            continue;
                        }
                        Some(_) => continue,
                        None => break,
                    },
                    event = play_pressed_stream.next() => match event {
                        Some(()) => Input::Play,
                        None => break,
                    },
                    event = stop_pressed_stream.next() => match event {
                        Some(()) => Input::Stop,
                        None => break,
                    },
                    event = toggle_pressed_stream.next() => match event {
                        Some(()) => Input::Toggle,
                        None => break,
                    },
                    event = next_pressed_stream.next() => match event {
                        Some(()) => Input::Next,
                        None => break,
                    },
                    event = previous_pressed_stream.next() => match event {
                        Some(()) => Input::Previous,
                        None => break,
                    },
                };

                let current = state.get();
                match input {
                    Input::Next | Input::Previous if current.is_playing() => {
                        log::warn!("Slideshow is playing; manual step ignored");
                    }
                    Input::Next => state.set_neq(current.stepped_forward(sequence_len)),
                    Input::Previous => state.set_neq(current.stepped_back(sequence_len)),
                    Input::Play | Input::Stop | Input::Toggle => {
                        let play = match input {
                            Input::Stop => false,
                            Input::Toggle => !current.is_playing(),
                            _ => true,
                        };
                        if play {
                            if timer.start() {
                                log::info!("Slideshow started ({sequence_len} events)");
                            } else {
                                log::debug!("Slideshow already playing");
                            }
                            state.set_neq(SlideshowState {
                                playback: PlaybackState::Playing,
                                ..current
                            });
                        } else {
                            if timer.stop() {
                                log::info!("Slideshow stopped at event {}", current.current_index);
                            }
                            state.set_neq(SlideshowState {
                                playback: PlaybackState::Stopped,
                                ..current
                            });
                        }
                    }
                }
            }
        });

        Self {
            state,
            play_pressed_relay,
            stop_pressed_relay,
            toggle_pressed_relay,
            next_pressed_relay,
            previous_pressed_relay,
        }
    }

    pub fn play(&self) {
        self.play_pressed_relay.send(());
    }

    pub fn stop(&self) {
        self.stop_pressed_relay.send(());
    }

    /// The single play/pause button.
    pub fn toggle(&self) {
        self.toggle_pressed_relay.send(());
    }

    pub fn next(&self) {
        self.next_pressed_relay.send(());
    }

    pub fn previous(&self) {
        self.previous_pressed_relay.send(());
    }
}

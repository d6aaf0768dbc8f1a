// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use prism_core::asset::AnimationClip;
use prism_core::renderer::EngineHandle;
use std::collections::VecDeque;

/// A clip waiting for the current one to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuedClip {
    /// Clip index in [`Animation::clips`].
    pub clip: usize,
    /// Whether the clip loops once started.
    pub looping: bool,
}

/// The clip currently being played.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    /// Clip index in [`Animation::clips`].
    pub clip: usize,
    /// Position in the clip, in seconds.
    pub time: f32,
    /// Whether the clip wraps at its end.
    pub looping: bool,
}

/// Animation playback state of a model entity.
///
/// The clip list and the instance are published by the model loader once the
/// entity's model is attached. Until then requests are only queued.
#[derive(Debug)]
pub struct Animation {
    /// Clips exposed by the loaded model.
    pub clips: Vec<AnimationClip>,
    /// The engine instance being animated.
    pub instance: Option<EngineHandle>,
    /// Clips to play next, in order.
    pub queue: VecDeque<QueuedClip>,
    /// The clip being played.
    pub playback: Option<Playback>,
    /// Playback speed multiplier, never negative.
    pub speed: f32,
    /// Paused animations keep their position.
    pub paused: bool,
    /// Looping flag given to newly requested clips.
    pub looping: bool,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            clips: Vec::new(),
            instance: None,
            queue: VecDeque::new(),
            playback: None,
            speed: 1.0,
            paused: false,
            looping: false,
        }
    }
}

impl Clone for Animation {
    fn clone(&self) -> Self {
        Self {
            clips: self.clips.clone(),
            instance: None,
            queue: self.queue.clone(),
            playback: self.playback,
            speed: self.speed,
            paused: self.paused,
            looping: self.looping,
        }
    }
}

impl Animation {
    /// Finds a clip by name.
    pub fn clip_index(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|clip| clip.name == name)
    }

    /// Returns `true` if `clip` can be played. Any index is accepted while
    /// the clip list is not published yet.
    pub fn accepts_clip(&self, clip: usize) -> bool {
        self.clips.is_empty() || clip < self.clips.len()
    }

    /// Appends a clip to the queue.
    pub fn enqueue(&mut self, clip: usize) {
        self.queue.push_back(QueuedClip {
            clip,
            looping: self.looping,
        });
    }

    /// Starts `clip` immediately, keeping the queue.
    pub fn play(&mut self, clip: usize) {
        self.playback = Some(Playback {
            clip,
            time: 0.0,
            looping: self.looping,
        });
        self.paused = false;
    }

    /// Sets the speed multiplier, clamped to zero.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Sets the looping flag for new clips and for the current one.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        if let Some(playback) = self.playback.as_mut() {
            playback.looping = looping;
        }
    }

    /// Returns `true` while a clip is playing and not paused.
    pub fn is_playing(&self) -> bool {
        self.playback.is_some() && !self.paused
    }

    fn duration(&self, clip: usize) -> f32 {
        self.clips.get(clip).map_or(0.0, |c| c.duration_secs)
    }

    /// Advances playback by `elapsed_secs` scaled by the speed.
    ///
    /// Returns the `(clip, time)` pose to apply, or `None` when nothing moved.
    /// At the end of a clip the next queued clip starts; otherwise a looping
    /// clip wraps and a non-looping one stops on its last frame.
    pub fn advance(&mut self, elapsed_secs: f32) -> Option<(usize, f32)> {
        if self.paused {
            return None;
        }

        let Some(mut playback) = self.playback else {
            let next = self.queue.pop_front()?;
            self.playback = Some(Playback {
                clip: next.clip,
                time: 0.0,
                looping: next.looping,
            });
            return Some((next.clip, 0.0));
        };

        let duration = self.duration(playback.clip);
        playback.time += elapsed_secs * self.speed;

        if playback.time < duration {
            self.playback = Some(playback);
            return Some((playback.clip, playback.time));
        }

        if let Some(next) = self.queue.pop_front() {
            self.playback = Some(Playback {
                clip: next.clip,
                time: 0.0,
                looping: next.looping,
            });
            Some((next.clip, 0.0))
        } else if playback.looping && duration > 0.0 {
            playback.time %= duration;
            self.playback = Some(playback);
            Some((playback.clip, playback.time))
        } else {
            self.playback = None;
            Some((playback.clip, duration))
        }
    }
}

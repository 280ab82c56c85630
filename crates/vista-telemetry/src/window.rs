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

//! Bounded window of recent instantaneous FPS samples.

use std::collections::VecDeque;

/// A bounded, ordered sequence of instantaneous FPS readings plus the
/// last-seen frame timestamp.
///
/// The rolling average is recomputed from the current contents on every
/// read rather than maintained incrementally, so it can never drift from
/// the true arithmetic mean of the window.
#[derive(Debug)]
pub struct FrameSampleWindow {
    samples: VecDeque<f32>,
    capacity: usize,
    last_timestamp_ms: Option<f64>,
}

impl FrameSampleWindow {
    /// Creates an empty window holding at most `capacity` samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "sample window capacity must be non-zero");
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            last_timestamp_ms: None,
        }
    }

    /// Records one frame timestamp.
    ///
    /// The first call after construction or [`clear`](Self::clear) only
    /// arms the timestamp; subsequent calls convert the delta into an
    /// instantaneous FPS sample, push it (evicting the oldest beyond
    /// capacity) and return it. Non-positive deltas are ignored: a frozen
    /// or rewound clock must not poison the window.
    pub fn observe(&mut self, now_ms: f64) -> Option<f32> {
        let fps = match self.last_timestamp_ms {
            Some(prev) if now_ms > prev => {
                let fps = (1000.0 / (now_ms - prev)) as f32;
                if self.samples.len() == self.capacity {
                    self.samples.pop_front();
                }
                self.samples.push_back(fps);
                Some(fps)
            }
            Some(prev) => {
                log::trace!("Ignoring non-increasing frame timestamp {now_ms} (last {prev})");
                None
            }
            None => None,
        };
        self.last_timestamp_ms = Some(now_ms);
        fps
    }

    /// Arithmetic mean of the current contents, or `None` when empty.
    pub fn average(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f32>() / self.samples.len() as f32)
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drops all samples and the armed timestamp.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.last_timestamp_ms = None;
    }
}

//! GOP (Group of Pictures) splitting of over-long scenes

use std::collections::VecDeque;

use tracing::debug;

use crate::domain::model::FrameIndex;
use crate::planner::candidates::CandidateGenerator;

/// Parameters of the GOP splitter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitSettings {
    pub gop_size: u64,
    /// Reject candidates that would leave a GOP shorter than `minimum_distance`
    pub discard_short_gops: bool,
    /// Track consecutive discards for diagnostics
    pub reevaluate_discards: bool,
    pub minimum_distance: u64,
}

/// Outcome of splitting one scene interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSplit {
    /// Keyframes emitted for the interval, starting with its left boundary when nonzero
    pub keyframes: Vec<FrameIndex>,
    /// Subdivisions that found no acceptable candidate
    pub discarded: u64,
}

/// Splits scenes longer than the target GOP size
#[derive(Debug, Clone, Copy)]
pub struct GopSplitter<'a> {
    generator: CandidateGenerator<'a>,
    settings: SplitSettings,
}

impl<'a> GopSplitter<'a> {
    pub fn new(generator: CandidateGenerator<'a>, settings: SplitSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    /// Number of internal subdivisions a scene of `length` frames asks for
    pub fn required_subdivisions(&self, length: u64) -> u64 {
        length / self.settings.gop_size
    }

    /// Lazily turn merged scene boundaries into the final keyframe sequence
    pub fn split<I>(&self, scenes: I) -> SplitKeyframes<'_, 'a, I::IntoIter>
    where
        I: IntoIterator<Item = FrameIndex>,
    {
        SplitKeyframes {
            splitter: self,
            scenes: scenes.into_iter(),
            previous: 0,
            lastkey: 0,
            queue: VecDeque::new(),
            interval: 0,
            started: false,
        }
    }

    /// Place keyframes inside the scene `[last, this)`
    ///
    /// `lastkey` is the most recent keyframe; it only moves forward.
    pub fn split_interval(
        &self,
        index: usize,
        last: FrameIndex,
        this: FrameIndex,
        lastkey: &mut FrameIndex,
    ) -> IntervalSplit {
        let length = this.saturating_sub(last);
        let required = self.required_subdivisions(length);
        debug!(
            "SCENE {} : [{} -> {}] length: {} required: {}",
            index, last, this, length, required
        );

        let mut keyframes = Vec::with_capacity(required as usize + 1);
        if last != 0 {
            keyframes.push(last);
        }
        *lastkey = last;

        let minimum = self.settings.minimum_distance;
        let mut discarded: u64 = 0;
        let mut discarded_frames: u64 = 0;

        for idrs in 1..=required {
            let mut candidates = self
                .generator
                .candidates(last, this, idrs, discarded)
                .enumerate();

            let accepted = if self.settings.discard_short_gops {
                let key = *lastkey;
                candidates.find(|(_, c)| c.frame >= key + minimum && c.frame + minimum <= this)
            } else {
                let key = *lastkey;
                candidates.find(|(_, c)| c.frame > key)
            };

            match accepted {
                Some((rank, candidate)) => {
                    debug!(
                        "[{}] =>> {} (C{}:{:.0})",
                        this, candidate.frame, rank, candidate.metric
                    );
                    keyframes.push(candidate.frame);
                    *lastkey = candidate.frame;
                    discarded_frames = 0;
                }
                None => {
                    discarded += 1;
                    if self.settings.reevaluate_discards {
                        discarded_frames += self.settings.gop_size;
                    }
                    debug!(
                        "[{}] all candidates discarded -> {}",
                        this, discarded_frames
                    );
                }
            }
        }

        IntervalSplit {
            keyframes,
            discarded,
        }
    }
}

/// Iterator over the final keyframe sequence
#[derive(Debug)]
pub struct SplitKeyframes<'s, 'a, I> {
    splitter: &'s GopSplitter<'a>,
    scenes: I,
    previous: FrameIndex,
    lastkey: FrameIndex,
    queue: VecDeque<FrameIndex>,
    interval: usize,
    started: bool,
}

impl<I> Iterator for SplitKeyframes<'_, '_, I>
where
    I: Iterator<Item = FrameIndex>,
{
    type Item = FrameIndex;

    fn next(&mut self) -> Option<FrameIndex> {
        if !self.started {
            self.started = true;
            return Some(0);
        }

        loop {
            if let Some(keyframe) = self.queue.pop_front() {
                return Some(keyframe);
            }

            let this = loop {
                match self.scenes.next() {
                    None => return None,
                    Some(boundary) if boundary <= self.previous => continue,
                    Some(boundary) => break boundary,
                }
            };
            let last = std::mem::replace(&mut self.previous, this);

            let split = self
                .splitter
                .split_interval(self.interval, last, this, &mut self.lastkey);
            self.interval += 1;
            self.queue.extend(split.keyframes);
        }
    }
}

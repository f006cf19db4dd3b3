//! Coalescing of short scenes into GOP-sized runs

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::model::FrameIndex;

/// Comparison used to decide that an accumulated run is long enough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeThreshold {
    /// Flush once the run would be strictly longer than the target
    #[default]
    Exceeds,
    /// Flush once the run would reach the target
    Reaches,
}

impl MergeThreshold {
    pub fn crossed(self, total: u64, target: u64) -> bool {
        match self {
            MergeThreshold::Exceeds => total > target,
            MergeThreshold::Reaches => total >= target,
        }
    }
}

/// Parameters of the scene merger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeSettings {
    /// Accumulation target; 0 passes every boundary through
    pub target: u64,
    pub threshold: MergeThreshold,
    /// Minimum distance between a merge point and the previous one
    pub min_distance: u64,
}

/// Scene merger configured once per run
#[derive(Debug, Clone, Copy)]
pub struct SceneMerger {
    settings: MergeSettings,
}

impl SceneMerger {
    pub fn new(settings: MergeSettings) -> Self {
        Self { settings }
    }

    /// Lazily merge `boundaries` (scene cuts, without the trailing `frame_count`)
    ///
    /// The result always starts with 0 and ends with `frame_count`.
    pub fn merge<I>(&self, boundaries: I, frame_count: FrameIndex) -> MergedScenes<I::IntoIter>
    where
        I: IntoIterator<Item = FrameIndex>,
    {
        MergedScenes {
            boundaries: boundaries.into_iter(),
            frame_count,
            settings: self.settings,
            previous: 0,
            run_start: 0,
            accumulated: 0,
            pending: None,
            started: false,
            finished: false,
        }
    }
}

/// Iterator over merged scene boundaries
#[derive(Debug)]
pub struct MergedScenes<I> {
    boundaries: I,
    frame_count: FrameIndex,
    settings: MergeSettings,
    previous: FrameIndex,
    run_start: FrameIndex,
    accumulated: u64,
    pending: Option<FrameIndex>,
    started: bool,
    finished: bool,
}

impl<I> MergedScenes<I> {
    /// Feed the segment `[previous, this)`; returns its left endpoint when it becomes a merge point
    fn observe(&mut self, this: FrameIndex) -> Option<FrameIndex> {
        let last = std::mem::replace(&mut self.previous, this);
        let length = this.saturating_sub(last);

        if last <= self.run_start {
            self.accumulated += length;
            return None;
        }

        if self.settings.target == 0 {
            self.run_start = last;
            return Some(last);
        }

        let total = self.accumulated + length;
        if self.settings.threshold.crossed(total, self.settings.target)
            && last - self.run_start >= self.settings.min_distance
        {
            debug!("[{}] merged -> {} (run {})", this, last, self.accumulated);
            // The segment that crossed the threshold opens the next run.
            self.accumulated = length;
            self.run_start = last;
            Some(last)
        } else {
            self.accumulated = total;
            debug!("[{}] accumulating -> {}", this, self.accumulated);
            None
        }
    }
}

impl<I> Iterator for MergedScenes<I>
where
    I: Iterator<Item = FrameIndex>,
{
    type Item = FrameIndex;

    fn next(&mut self) -> Option<FrameIndex> {
        if let Some(pending) = self.pending.take() {
            return Some(pending);
        }
        if !self.started {
            self.started = true;
            return Some(0);
        }
        if self.finished {
            return None;
        }

        while let Some(boundary) = self.boundaries.next() {
            // Out-of-range and non-increasing boundaries carry no segment.
            if boundary >= self.frame_count || boundary <= self.previous {
                continue;
            }
            if let Some(merge_point) = self.observe(boundary) {
                return Some(merge_point);
            }
        }

        self.finished = true;
        match self.observe(self.frame_count) {
            Some(merge_point) => {
                self.pending = Some(self.frame_count);
                Some(merge_point)
            }
            None => Some(self.frame_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merger(target: u64) -> SceneMerger {
        SceneMerger::new(MergeSettings {
            target,
            threshold: MergeThreshold::Exceeds,
            min_distance: 8,
        })
    }

    #[test]
    fn test_no_scene_changes() {
        let merged: Vec<_> = merger(512).merge(vec![], 2048).collect();
        assert_eq!(merged, vec![0, 2048]);
    }

    #[test]
    fn test_short_scenes_accumulate_until_target() {
        let cuts = vec![100, 200, 300, 400, 500, 600, 700];
        let merged: Vec<_> = merger(512).merge(cuts, 800).collect();

        // Segment (500, 600) pushes the run to 600 > 512, so 500 becomes the merge point.
        assert_eq!(merged, vec![0, 500, 800]);
    }

    #[test]
    fn test_long_scenes_pass_through() {
        let cuts = vec![600, 1300];
        let merged: Vec<_> = merger(512).merge(cuts, 2000).collect();
        assert_eq!(merged, vec![0, 600, 1300, 2000]);
    }

    #[test]
    fn test_leading_zero_and_duplicates_absorbed() {
        let cuts = vec![0, 600, 600, 1300];
        let merged: Vec<_> = merger(512).merge(cuts, 2000).collect();
        assert_eq!(merged, vec![0, 600, 1300, 2000]);
    }

    #[test]
    fn test_merge_point_too_close_to_previous() {
        let merged: Vec<_> = merger(512).merge(vec![5], 1000).collect();
        assert_eq!(merged, vec![0, 1000]);
    }

    #[test]
    fn test_disabled_merging_keeps_every_boundary() {
        let cuts = vec![3, 10, 20, 900];
        let merged: Vec<_> = merger(0).merge(cuts, 1000).collect();
        assert_eq!(merged, vec![0, 3, 10, 20, 900, 1000]);
    }

    #[test]
    fn test_threshold_comparison() {
        assert!(MergeThreshold::Exceeds.crossed(513, 512));
        assert!(!MergeThreshold::Exceeds.crossed(512, 512));
        assert!(MergeThreshold::Reaches.crossed(512, 512));

        let cuts = vec![256, 512];
        let strict: Vec<_> = merger(512).merge(cuts.clone(), 1024).collect();
        assert_eq!(strict, vec![0, 512, 1024]);

        let inclusive = SceneMerger::new(MergeSettings {
            target: 512,
            threshold: MergeThreshold::Reaches,
            min_distance: 8,
        });
        let merged: Vec<_> = inclusive.merge(cuts, 1024).collect();
        assert_eq!(merged, vec![0, 256, 512, 1024]);
    }

    #[test]
    fn test_boundaries_beyond_frame_count_ignored() {
        let merged: Vec<_> = merger(512).merge(vec![700, 5000], 1000).collect();
        assert_eq!(merged, vec![0, 700, 1000]);
    }

    #[test]
    fn test_merging_is_idempotent() {
        let cuts = vec![40, 90, 300, 610, 700, 1500, 1530, 2100];
        let first: Vec<_> = merger(512).merge(cuts, 2600).collect();
        let second: Vec<_> = merger(512)
            .merge(first[1..first.len() - 1].to_vec(), 2600)
            .collect();
        assert_eq!(first, second);
    }
}

//! Integration tests for the keyframe planner

use keyplan_cli::planner::candidates::{CandidateGenerator, CandidateSettings};
use keyplan_cli::planner::gop::{GopSplitter, SplitSettings};
use keyplan_cli::planner::merge::{MergeSettings, MergeThreshold, SceneMerger};
use keyplan_cli::*;

// Test utilities

fn uniform_costs(frame_count: u64, value: f64) -> CostTable {
    (0..frame_count)
        .map(|f| (f, CostRecord::new(value, value)))
        .collect()
}

fn plan(config: PlannerConfig, analysis: &SceneAnalysis) -> KeyframePlan {
    KeyframePlanner::new(config).unwrap().plan(analysis)
}

/// Deterministic pseudo-random analysis for property checks
fn synthetic_analysis(seed: u64, frame_count: u64) -> SceneAnalysis {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        state >> 33
    };

    let mut scene_changes = Vec::new();
    let mut frame = 0;
    loop {
        frame += 1 + next() % 900;
        if frame >= frame_count {
            break;
        }
        scene_changes.push(frame);
    }

    let costs: CostTable = (0..frame_count)
        .filter_map(|f| {
            if next() % 5 == 0 {
                return None;
            }
            let inter = (next() % 1000) as f64 / 10.0;
            let importance = (next() % 100) as f64 / 10.0;
            Some((f, CostRecord::new(inter, importance)))
        })
        .collect();

    SceneAnalysis::new(frame_count, scene_changes, costs)
}

fn config_variants() -> Vec<PlannerConfig> {
    let base = PlannerConfig::default();
    vec![
        base.clone(),
        PlannerConfig { discard_short_gops: false, ..base.clone() },
        PlannerConfig { merge_short_gops: false, ..base.clone() },
        PlannerConfig { exact: true, metric: MetricMode::Product, ..base.clone() },
        PlannerConfig { ewma_floor: true, metric: MetricMode::Importance, ..base.clone() },
        PlannerConfig { strict_hierarchy: true, candidate_limit: 64, ..base.clone() },
        PlannerConfig { discard_divisor: 1, merge_threshold: MergeThreshold::Reaches, ..base.clone() },
        PlannerConfig { gop_size: 97, reevaluate_discards: false, ..base },
    ]
}

// Properties

#[test]
fn test_keyframes_strictly_increasing_from_zero() {
    for seed in 1..6 {
        let analysis = synthetic_analysis(seed, 6000);
        for config in config_variants() {
            let result = plan(config.clone(), &analysis);

            assert_eq!(result.keyframes[0], 0, "{:?}", config);
            assert!(
                result.keyframes.windows(2).all(|w| w[0] < w[1]),
                "not increasing for {:?}: {:?}",
                config,
                result.keyframes
            );
            assert!(result.keyframes.iter().all(|&k| k < analysis.frame_count));
        }
    }
}

#[test]
fn test_merged_boundaries_survive_splitting() {
    for seed in 1..6 {
        let analysis = synthetic_analysis(seed, 6000);
        for config in config_variants() {
            let merged: Vec<_> = SceneMerger::new(config.merge_settings())
                .merge(analysis.scene_changes.iter().copied(), analysis.frame_count)
                .collect();
            let result = plan(config.clone(), &analysis);

            for boundary in &merged[..merged.len() - 1] {
                assert!(
                    result.keyframes.contains(boundary),
                    "boundary {} missing for {:?}",
                    boundary,
                    config
                );
            }
        }
    }
}

#[test]
fn test_merge_output_is_a_fixed_point() {
    let merger = SceneMerger::new(PlannerConfig::default().merge_settings());
    for seed in 1..6 {
        let analysis = synthetic_analysis(seed, 6000);
        let once: Vec<_> = merger
            .merge(analysis.scene_changes.iter().copied(), analysis.frame_count)
            .collect();
        let twice: Vec<_> = merger
            .merge(once[1..once.len() - 1].iter().copied(), analysis.frame_count)
            .collect();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_disabled_merging_keeps_all_scene_changes() {
    let analysis = SceneAnalysis::new(1000, vec![10, 20, 700], uniform_costs(1000, 1.0));
    let config = PlannerConfig {
        merge_short_gops: false,
        ..PlannerConfig::default()
    };
    let result = plan(config, &analysis);

    for cut in [10, 20, 700] {
        assert!(result.keyframes.contains(&cut));
    }
}

#[test]
fn test_gops_stay_near_target_when_candidates_exist() {
    let analysis = SceneAnalysis::new(10_000, vec![3000, 7100], uniform_costs(10_000, 1.0));
    let result = plan(PlannerConfig::default(), &analysis);

    for length in result.gop_lengths() {
        assert!(length < 2 * 512, "gop of {} frames: {:?}", length, result.keyframes);
    }
}

// Scenarios

#[test]
fn test_uniform_costs_split_on_aligned_frames() {
    let analysis = SceneAnalysis::new(2048, vec![], uniform_costs(2048, 1.0));
    let result = plan(PlannerConfig::default(), &analysis);

    assert_eq!(result.keyframes, vec![0, 257, 514, 1027, 1540]);
    assert_eq!(result.gop_lengths(), vec![257, 257, 513, 513, 508]);
    assert_eq!(
        result.force_keyframes_line(),
        "ForceKeyFrames : 0f,257f,514f,1027f,1540f"
    );
}

#[test]
fn test_cut_within_eight_frames_of_start_merges_away() {
    let analysis = SceneAnalysis::new(1000, vec![5], uniform_costs(1000, 1.0));
    let result = plan(PlannerConfig::default(), &analysis);

    assert_eq!(result.keyframes[0], 0);
    assert!(!result.keyframes.contains(&5));
}

#[test]
fn test_merge_min_distance_controls_early_cuts() {
    let analysis = SceneAnalysis::new(1000, vec![10], uniform_costs(1000, 1.0));

    let default_result = plan(PlannerConfig::default(), &analysis);
    assert_eq!(default_result.keyframes, vec![0, 10, 267]);

    let wider = PlannerConfig {
        merge_min_distance: 16,
        ..PlannerConfig::default()
    };
    let merged_result = plan(wider, &analysis);
    assert_eq!(merged_result.keyframes[0], 0);
    assert!(!merged_result.keyframes.contains(&10));
}

#[test]
fn test_expensive_frame_chosen_over_aligned_neighbours() {
    let mut records: Vec<(u64, CostRecord)> =
        (0..512).map(|f| (f, CostRecord::new(1.0, 1.0))).collect();
    records[256].1 = CostRecord::new(100.0, 1.0);
    let analysis = SceneAnalysis::new(512, vec![], CostTable::from_records(records));

    let result = plan(PlannerConfig::default(), &analysis);
    assert_eq!(result.keyframes, vec![0, 256]);

    let no_discard = PlannerConfig {
        discard_short_gops: false,
        ..PlannerConfig::default()
    };
    assert_eq!(plan(no_discard, &analysis).keyframes, vec![0, 256]);
}

#[test]
fn test_expensive_frames_near_start_do_not_hide_valid_candidates() {
    // Frames 1..=255 outrank everything but all sit inside the 256-frame minimum distance.
    let records = (0..2048).map(|f| {
        let cost = if (1..=255).contains(&f) { 100.0 } else { 1.0 };
        (f, CostRecord::new(cost, cost))
    });
    let analysis = SceneAnalysis::new(2048, vec![], CostTable::from_records(records));

    let result = plan(PlannerConfig::default(), &analysis);
    assert_eq!(result.keyframes, vec![0, 257, 514, 1027, 1540]);

    // An explicit limit only sees the expensive frames and gives up on the first subdivision.
    let limited = PlannerConfig {
        candidate_limit: 64,
        ..PlannerConfig::default()
    };
    assert_eq!(plan(limited, &analysis).keyframes[1], 513);
}

#[test]
fn test_bias_outweighs_small_metric_advantage() {
    let mut records: Vec<(u64, CostRecord)> =
        (0..512).map(|f| (f, CostRecord::new(1.0, 1.0))).collect();
    records[256].1 = CostRecord::new(1.5, 1.0);
    let analysis = SceneAnalysis::new(512, vec![], CostTable::from_records(records));

    let biased = PlannerConfig {
        discard_short_gops: false,
        ..PlannerConfig::default()
    };
    // 1.122462^5 > 1.5, so the aligned frame next to the target offset wins.
    assert_eq!(plan(biased.clone(), &analysis).keyframes, vec![0, 1]);

    let exact = PlannerConfig { exact: true, ..biased };
    assert_eq!(plan(exact, &analysis).keyframes, vec![0, 256]);
}

#[test]
fn test_rejected_subdivision_shifts_next_window() {
    let costs: CostTable = (1..=100)
        .chain([1100, 1101])
        .map(|f| (f, CostRecord::new(1.0, 1.0)))
        .collect();
    let analysis = SceneAnalysis::new(2048, vec![], costs);

    let config = PlannerConfig::default();
    let generator = CandidateGenerator::new(&analysis.costs, config.candidate_settings(), None);
    assert_eq!(generator.pool_bounds(0, 2048, 2, 0), 514..1538);
    assert_eq!(generator.pool_bounds(0, 2048, 2, 1), 513..1537);

    let splitter = GopSplitter::new(generator, config.split_settings());
    let mut lastkey = 0;
    let split = splitter.split_interval(0, 0, 2048, &mut lastkey);

    // Subdivision 1 only sees frames 1..=100, all closer than 256 to frame 0.
    // Subdivision 2 then targets offset 1, where 1101 (distance 1100) outranks 1100 (distance 1099).
    assert_eq!(split.keyframes, vec![1101]);
    assert_eq!(split.discarded, 3);
    assert_eq!(lastkey, 1101);

    assert_eq!(plan(config, &analysis).keyframes, vec![0, 1101]);
}

#[test]
fn test_long_scene_without_costs_passes_through() {
    let analysis = SceneAnalysis::new(4096, vec![1000], CostTable::new());
    let result = plan(PlannerConfig::default(), &analysis);

    assert_eq!(result.keyframes, vec![0, 1000]);
    assert_eq!(result.gop_lengths(), vec![1000, 3096]);
}

#[test]
fn test_components_compose_by_hand() {
    let analysis = synthetic_analysis(42, 5000);
    let config = PlannerConfig::default();

    let generator = CandidateGenerator::new(
        &analysis.costs,
        CandidateSettings {
            gop_size: config.gop_size,
            metric: config.metric,
            bias_factor: config.effective_bias(),
            strict_hierarchy: false,
            limit: config.candidate_limit,
        },
        None,
    );
    let splitter = GopSplitter::new(
        generator,
        SplitSettings {
            gop_size: config.gop_size,
            discard_short_gops: true,
            reevaluate_discards: true,
            minimum_distance: 256,
        },
    );
    let merger = SceneMerger::new(MergeSettings {
        target: 512,
        threshold: MergeThreshold::Exceeds,
        min_distance: 8,
    });

    let by_hand: Vec<_> = splitter
        .split(merger.merge(analysis.scene_changes.iter().copied(), analysis.frame_count))
        .collect();
    assert_eq!(by_hand, plan(config, &analysis).keyframes);
}

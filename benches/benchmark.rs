//! Benchmarks for the stage gate, artifact store and script parsing.
//!
//! Run with: cargo bench

use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use videostudio::pipeline::{
    can_enter, reachable_stages, script_lines, BRollPrompt, ScriptLine, ScriptStats, VideoClip,
};
use videostudio::{ArtifactStore, Stage};

fn prompts(count: usize) -> Vec<BRollPrompt> {
    (0..count)
        .map(|i| {
            let line = ScriptLine::new(i + 1, format!("Line number {}", i + 1));
            BRollPrompt::new(format!("prompt-{}", i), &line, "Wide establishing shot")
        })
        .collect()
}

fn store_with_clips(count: usize) -> (ArtifactStore, Vec<VideoClip>) {
    let mut store = ArtifactStore::new();
    let prompts = prompts(count);
    let clips: Vec<VideoClip> = prompts
        .iter()
        .enumerate()
        .map(|(i, p)| VideoClip::pending(format!("clip-{}", i), p))
        .collect();
    store.replace_prompts(prompts);
    store.replace_clips(clips.clone());
    (store, clips)
}

fn script(segments: usize) -> String {
    let mut text = String::from("[INTRO]\nWelcome back to the channel!\n");
    for i in 0..segments {
        text.push_str(&format!(
            "\n[SEGMENT {}]\nLet's talk about topic {}. Here is what happened.\n",
            i + 1,
            i
        ));
    }
    text.push_str("\n[OUTRO]\nSee you in the next video!");
    text
}

fn bench_gate(c: &mut Criterion) {
    let completed: BTreeSet<Stage> = [Stage::Idea, Stage::Script].into_iter().collect();

    c.bench_function("can_enter_all_targets", |b| {
        b.iter(|| {
            for target in Stage::ALL {
                black_box(can_enter(target, black_box(Stage::BRoll), &completed));
            }
        })
    });

    c.bench_function("reachable_stages", |b| {
        b.iter(|| black_box(reachable_stages(black_box(Stage::BRoll), &completed)))
    });
}

fn bench_upsert_clip(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsert_clip");

    for num_clips in [10, 100, 1000] {
        let (store, clips) = store_with_clips(num_clips);
        let target = clips[num_clips / 2].clone().with_render("https://example.com/v.mp4", 6.0);

        group.bench_with_input(BenchmarkId::new("clips", num_clips), &num_clips, |b, _| {
            let mut store = store.clone();
            b.iter(|| store.upsert_clip(black_box(target.clone())))
        });
    }

    group.finish();
}

fn bench_replace_clips(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace_clips");

    for num_clips in [10, 100, 1000] {
        let (store, clips) = store_with_clips(num_clips);

        group.bench_with_input(BenchmarkId::new("clips", num_clips), &num_clips, |b, _| {
            let mut store = store.clone();
            b.iter(|| store.replace_clips(black_box(clips.clone())))
        });
    }

    group.finish();
}

fn bench_ordered_view(c: &mut Criterion) {
    let (store, _) = store_with_clips(1000);
    c.bench_function("clips_ordered_1000", |b| {
        b.iter(|| black_box(store.clips().len()))
    });
}

fn bench_script_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("script_lines");

    for segments in [4, 40, 400] {
        let text = script(segments);
        group.bench_with_input(BenchmarkId::new("segments", segments), &text, |b, text| {
            b.iter(|| black_box(script_lines(text)))
        });
    }

    group.finish();
}

fn bench_script_stats(c: &mut Criterion) {
    let text = script(40);
    c.bench_function("script_stats_40_segments", |b| {
        b.iter(|| black_box(ScriptStats::of(black_box(&text))))
    });
}

criterion_group!(
    benches,
    bench_gate,
    bench_upsert_clip,
    bench_replace_clips,
    bench_ordered_view,
    bench_script_lines,
    bench_script_stats,
);

criterion_main!(benches);

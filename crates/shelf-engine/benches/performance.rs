// Rust guideline compliant 2026-08-05

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use shelf_core::{
    Clock, MemMetadataStore, MemTabList, MetadataStore, RetentionSettings, TabCollection, TabId,
    TabRecord,
};
use shelf_engine::{build_mru_map, is_tab_archive_eligible, ArchivalEngine};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const HOUR: i64 = 3_600_000;
const NOW: i64 = 10_000 * HOUR;

struct FixedClock;

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        NOW
    }
}

fn build_tabs(count: usize) -> Vec<TabRecord> {
    (0..count)
        .map(|i| {
            // A mix of stale and fresh tabs across a handful of URLs.
            let age_hours = (i % 400) as i64;
            TabRecord::new(
                TabId(i as i64 + 1),
                format!("https://site{}", i % 64),
                NOW - age_hours * HOUR,
            )
        })
        .collect()
}

fn bench_mru_map(c: &mut Criterion) {
    let list = MemTabList::with_tabs(build_tabs(10_000));
    c.bench_function("mru_map_10k", |b| {
        b.iter(|| black_box(build_mru_map(&list, true)))
    });
}

fn bench_eligibility_scan(c: &mut Criterion) {
    let list = MemTabList::with_tabs(build_tabs(10_000));
    let mru = build_mru_map(&list, true);
    c.bench_function("eligibility_scan_10k", |b| {
        b.iter(|| {
            let mut eligible = 0usize;
            for i in 0..list.len() {
                if let Some(tab) = list.get(i) {
                    if is_tab_archive_eligible(tab, NOW, 168, &mru) {
                        eligible += 1;
                    }
                }
            }
            black_box(eligible)
        })
    });
}

fn bench_archive_pass(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("build runtime");

    c.bench_function("archive_pass_1000", |b| {
        b.iter_batched(
            || {
                let active = Rc::new(RefCell::new(MemTabList::with_tabs(build_tabs(1_000))));
                let archived = Rc::new(RefCell::new(MemTabList::new()));
                let metadata = Rc::new(MemMetadataStore::new());
                let settings = Rc::new(RefCell::new(RetentionSettings::default()));
                ArchivalEngine::new(
                    active as Rc<RefCell<dyn TabCollection>>,
                    archived as Rc<RefCell<dyn TabCollection>>,
                    metadata as Rc<dyn MetadataStore>,
                    settings,
                    Rc::new(FixedClock),
                )
            },
            |engine| {
                runtime.block_on(async { black_box(engine.do_archive_pass().await) });
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_mru_map,
    bench_eligibility_scan,
    bench_archive_pass
);
criterion_main!(benches);

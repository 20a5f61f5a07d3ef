//! Consolidation benchmark: clean + union-align + dedup over generated capture files.

use criterion::{criterion_group, criterion_main, Criterion};
use flow_ids::config::ConsolidationConfig;
use flow_ids::Consolidator;
use std::fmt::Write as _;
use std::path::PathBuf;

fn write_files(dir: &std::path::Path, files: usize, rows: usize) -> Vec<PathBuf> {
    (0..files)
        .map(|f| {
            let mut body = String::from(" Dst Port,Flow Duration,Tot Fwd Pkts,Timestamp,Label\n");
            if f % 2 == 1 {
                body = String::from("Dst Port,Flow Duration,Fwd Seg Size Min,Label\n");
            }
            for r in 0..rows {
                let label = if r % 5 == 0 { "DDoS" } else { "BENIGN" };
                if f % 2 == 1 {
                    let _ = writeln!(body, "{},{},{},{}", r % 1024, r * 3, r % 40, label);
                } else {
                    let _ = writeln!(body, "{},{},{},02/03/2018 08:47:38,{}", r % 1024, r * 3, r % 17, label);
                }
            }
            let p = dir.join(format!("capture_{}.csv", f));
            std::fs::write(&p, body).unwrap();
            p
        })
        .collect()
}

fn bench_consolidate(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_files(dir.path(), 4, 5_000);

    let mut g = c.benchmark_group("consolidate_4x5000");
    g.sample_size(20);
    for parallel in [false, true] {
        let consolidator = Consolidator::new(ConsolidationConfig {
            parallel,
            ..ConsolidationConfig::default()
        });
        let name = if parallel { "parallel" } else { "sequential" };
        g.bench_function(name, |b| b.iter(|| consolidator.consolidate(&paths).unwrap()));
    }
    g.finish();
}

criterion_group!(benches, bench_consolidate);
criterion_main!(benches);

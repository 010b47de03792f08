use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use anyhow::{Context, Result};
use image::ImageReader;
use log::{debug, warn};
use crate::constants::MAX_PROBE_WORKERS;

/// A candidate image confirmed decodable.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub path: String,
    pub validated: bool,
}

/// Answers whether a source can be decoded.
pub trait ImageProbe: Sync {
    fn probe(&self, source: &str) -> bool;
}

/// Probes by fully decoding the file found under `root`.
pub struct DecodeProbe {
    root: PathBuf,
}

impl DecodeProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

// Decode only; orientation does not affect whether the file is usable
fn decode(path: &Path) -> Result<()> {
    ImageReader::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read {}", path.display()))?
        .decode()
        .with_context(|| format!("Failed to decode image {}", path.display()))?;
    Ok(())
}

impl ImageProbe for DecodeProbe {
    fn probe(&self, source: &str) -> bool {
        match decode(&self.root.join(source)) {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping image {}: {:#}", source, e);
                false
            }
        }
    }
}

/// Remembers every answer so several carousels share one probing pass.
pub struct CachedProbe<P: ImageProbe> {
    inner: P,
    seen: Mutex<HashMap<String, bool>>,
}

impl<P: ImageProbe> CachedProbe<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, seen: Mutex::new(HashMap::new()) }
    }
}

impl<P: ImageProbe> ImageProbe for CachedProbe<P> {
    fn probe(&self, source: &str) -> bool {
        if let Some(ok) = self.seen.lock().unwrap_or_else(|e| e.into_inner()).get(source) {
            return *ok;
        }
        // Lock is not held while decoding
        let ok = self.inner.probe(source);
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).insert(source.to_string(), ok);
        ok
    }
}

pub fn probe_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, MAX_PROBE_WORKERS)
}

// A panicking probe counts as a failed one
fn probe_one<P: ImageProbe + ?Sized>(probe: &P, source: &str) -> bool {
    panic::catch_unwind(AssertUnwindSafe(|| probe.probe(source))).unwrap_or_else(|_| {
        warn!("Probe for {} panicked, treating as unloadable", source);
        false
    })
}

// Pulls candidate indices off the shared counter until none are left
fn drain<P: ImageProbe + ?Sized>(probe: &P, candidates: &[String], next: &AtomicUsize) -> Vec<(usize, bool)> {
    let mut outcomes = Vec::new();
    loop {
        let index = next.fetch_add(1, Ordering::Relaxed);
        let Some(source) = candidates.get(index) else { break };
        outcomes.push((index, probe_one(probe, source)));
    }
    outcomes
}

/// Probe every candidate and keep the loadable ones, in input order.
pub fn validate_sources<P: ImageProbe + ?Sized>(probe: &P, candidates: &[String]) -> Vec<ImageRef> {
    validate_sources_with(probe, candidates, probe_workers())
}

// All probes settle before this returns; at most `workers` run at once.
pub fn validate_sources_with<P: ImageProbe + ?Sized>(probe: &P, candidates: &[String], workers: usize) -> Vec<ImageRef> {
    let workers = workers.clamp(1, candidates.len().max(1));
    let next = AtomicUsize::new(0);
    let mut outcomes = vec![false; candidates.len()];

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let spawned = thread::Builder::new()
                .name(format!("probe-{worker}"))
                .spawn_scoped(scope, || drain(probe, candidates, &next));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Whatever is left gets probed by the threads we already have
                    debug!("Could not start probe worker {}: {}", worker, e);
                    break;
                }
            }
        }
        if handles.is_empty() {
            for (index, ok) in drain(probe, candidates, &next) {
                outcomes[index] = ok;
            }
        }
        for handle in handles {
            if let Ok(results) = handle.join() {
                for (index, ok) in results {
                    outcomes[index] = ok;
                }
            }
        }
    });

    candidates
        .iter()
        .zip(outcomes)
        .filter(|(_, ok)| *ok)
        .map(|(source, _)| ImageRef { path: source.clone(), validated: true })
        .collect()
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use std::sync::Barrier;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    /// Probe answering from a fixed set of broken sources.
    pub struct FakeProbe {
        pub broken: HashSet<String>,
    }

    impl FakeProbe {
        pub fn failing(broken: &[&str]) -> Self {
            Self { broken: broken.iter().map(|s| s.to_string()).collect() }
        }
    }

    impl ImageProbe for FakeProbe {
        fn probe(&self, source: &str) -> bool {
            !self.broken.contains(source)
        }
    }

    // Every call waits until `width` calls are in flight together
    struct LockstepProbe {
        barrier: Barrier,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        finished: AtomicUsize,
    }

    impl LockstepProbe {
        fn new(width: usize) -> Self {
            Self {
                barrier: Barrier::new(width),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                finished: AtomicUsize::new(0),
            }
        }
    }

    impl ImageProbe for LockstepProbe {
        fn probe(&self, _source: &str) -> bool {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.barrier.wait();
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.finished.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    struct CountingProbe {
        calls: AtomicUsize,
    }

    impl ImageProbe for CountingProbe {
        fn probe(&self, source: &str) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            source != "bad.png"
        }
    }

    struct PanickingProbe;

    impl ImageProbe for PanickingProbe {
        fn probe(&self, source: &str) -> bool {
            if source == "boom.png" {
                panic!("decoder crashed");
            }
            true
        }
    }

    fn sources(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_broken_source_is_dropped() {
        let validated = validate_sources(&FakeProbe::failing(&["B.png"]), &sources(&["A.png", "B.png", "C.png"]));
        let paths: Vec<&str> = validated.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["A.png", "C.png"]);
        assert!(validated.iter().all(|r| r.validated));
    }

    #[test]
    fn test_validated_is_ordered_subset() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let len = rng.random_range(0..20);
            let candidates: Vec<String> = (0..len).map(|i| format!("img/{i}.jpg")).collect();
            let broken: Vec<&str> = candidates.iter()
                .filter(|_| rng.random_bool(0.3))
                .map(|s| s.as_str())
                .collect();
            let probe = FakeProbe::failing(&broken);

            let validated = validate_sources(&probe, &candidates);
            let expected: Vec<&String> = candidates.iter().filter(|c| !broken.contains(&c.as_str())).collect();
            let got: Vec<&String> = validated.iter().map(|r| &r.path).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_panicking_probe_counts_as_failure() {
        let validated = validate_sources(&PanickingProbe, &sources(&["a.png", "boom.png", "c.png"]));
        assert_eq!(validated.len(), 2);
        assert_eq!(validated[1].path, "c.png");
    }

    #[test]
    fn test_decode_probe_reads_real_files() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::new(4, 4).save(dir.path().join("A.png")).unwrap();
        fs::write(dir.path().join("B.png"), b"\x89PNG truncated").unwrap();
        image::RgbImage::new(2, 2).save(dir.path().join("C.png")).unwrap();

        let probe = DecodeProbe::new(dir.path());
        let validated = validate_sources(&probe, &sources(&["A.png", "B.png", "C.png", "missing.png"]));
        let paths: Vec<&str> = validated.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["A.png", "C.png"]);
    }

    #[test]
    fn test_probes_overlap_and_all_settle() {
        let probe = LockstepProbe::new(4);
        let candidates: Vec<String> = (0..8).map(|i| format!("{i}.png")).collect();

        let validated = validate_sources_with(&probe, &candidates, 4);
        assert_eq!(validated.len(), 8);
        assert_eq!(probe.finished.load(Ordering::SeqCst), 8);
        assert_eq!(probe.in_flight.load(Ordering::SeqCst), 0);
        assert_eq!(probe.peak.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_worker_count_is_bounded() {
        assert!(probe_workers() >= 1);
        assert!(probe_workers() <= MAX_PROBE_WORKERS);

        let probe = FakeProbe::failing(&[]);
        let candidates: Vec<String> = (0..200).map(|i| format!("{i}.png")).collect();
        assert_eq!(validate_sources_with(&probe, &candidates, 3).len(), 200);
        assert!(validate_sources_with(&probe, &[], 3).is_empty());
    }

    #[test]
    fn test_cached_probe_decodes_once() {
        let probe = CachedProbe::new(CountingProbe { calls: AtomicUsize::new(0) });
        let candidates = sources(&["a.png", "bad.png", "c.png"]);

        let first = validate_sources(&probe, &candidates);
        let second = validate_sources(&probe, &candidates);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(probe.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_decode_probe_ignores_extension() {
        let dir = tempfile::tempdir().unwrap();
        // PNG bytes behind a .jpg name still decode
        image::RgbImage::new(2, 2).save(dir.path().join("real.png")).unwrap();
        fs::rename(dir.path().join("real.png"), dir.path().join("named.jpg")).unwrap();
        assert!(DecodeProbe::new(dir.path()).probe("named.jpg"));
    }
}

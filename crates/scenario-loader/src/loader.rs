//! Memoizing per-scenario loader

use crate::bundle::ScenarioBundle;
use crate::cache::{CacheConfig, Eviction, ScenarioCache};
use crate::source::{CsvSource, Dataset, DatasetSource, SourceFingerprint};
use crate::LoadError;
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use track_engine::{annotate_speeds, assign_frame_ids, TrackClassifier, TrackFrame};
use tracing::{debug, info};

type BundleKey = (SourceFingerprint, String);

/// Cache occupancy snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub bundles: usize,
    pub datasets: usize,
    pub evictions: u64,
}

/// Index, annotate and classify one scenario of a parsed dataset.
///
/// The dataset is only read; filtering works on a copy.
pub fn build_bundle(
    dataset: &Dataset,
    scenario_id: &str,
    classifier: &TrackClassifier,
) -> ScenarioBundle {
    let scene = dataset.trajectories.scenario(scenario_id);
    let frame_ids = assign_frame_ids(&scene.points, &scene.columns);
    let speeds = annotate_speeds(&scene.points, &scene.columns);

    let mut frames: Vec<TrackFrame> = scene
        .points
        .into_iter()
        .zip(frame_ids)
        .zip(speeds)
        .map(|((point, frame_id), speed)| TrackFrame::new(point, frame_id, speed))
        .collect();
    frames.sort_by_key(|f| f.frame_id);

    let classification = classifier.classify(&frames);

    ScenarioBundle {
        scenario_id: scenario_id.to_string(),
        has_data: true,
        frames,
        columns: scene.columns,
        map: dataset.map.scenario(scenario_id),
        classification,
    }
}

/// Loads scenarios, memoizing parsed datasets and classified bundles.
///
/// Both caches are keyed on the source fingerprint, so editing a file on
/// disk invalidates its entries on the next call.
pub struct ScenarioLoader {
    classifier: TrackClassifier,
    bundles: Mutex<ScenarioCache<BundleKey, Arc<ScenarioBundle>>>,
    datasets: Mutex<ScenarioCache<SourceFingerprint, Option<Arc<Dataset>>>>,
}

impl Default for ScenarioLoader {
    fn default() -> Self {
        Self::new(TrackClassifier::default(), CacheConfig::default())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, LoadError> {
    mutex
        .lock()
        .map_err(|e| LoadError::CachePoisoned(format!("Lock error: {}", e)))
}

impl ScenarioLoader {
    pub fn new(classifier: TrackClassifier, cache: CacheConfig) -> Self {
        Self {
            classifier,
            bundles: Mutex::new(ScenarioCache::new(Eviction::from_capacity(cache.max_bundles))),
            datasets: Mutex::new(ScenarioCache::new(Eviction::from_capacity(
                cache.max_datasets,
            ))),
        }
    }

    pub fn classifier(&self) -> &TrackClassifier {
        &self.classifier
    }

    /// Load one scenario from trajectory and map CSV files
    pub fn load_paths(
        &self,
        traj_path: &Path,
        map_path: &Path,
        scenario_id: &str,
    ) -> Result<Arc<ScenarioBundle>, LoadError> {
        self.load(&CsvSource::new(traj_path, map_path), scenario_id)
    }

    /// Load one scenario from any source.
    ///
    /// A missing trajectory source yields the no-data sentinel; an unknown
    /// scenario id yields empty sets. Repeated calls with unchanged sources
    /// return the same shared bundle.
    pub fn load<S: DatasetSource>(
        &self,
        source: &S,
        scenario_id: &str,
    ) -> Result<Arc<ScenarioBundle>, LoadError> {
        let key: BundleKey = (source.fingerprint(), scenario_id.to_string());

        if let Some(bundle) = lock(&self.bundles)?.get(&key) {
            metrics::counter!("scenario_cache_hits_total").increment(1);
            debug!("Scenario {} served from cache", scenario_id);
            return Ok(bundle);
        }
        metrics::counter!("scenario_cache_misses_total").increment(1);

        let started = Instant::now();
        let bundle = match self.dataset(source, &key.0)? {
            Some(dataset) => build_bundle(&dataset, scenario_id, &self.classifier),
            None => ScenarioBundle::no_data(scenario_id),
        };
        let bundle = Arc::new(bundle);

        let elapsed = started.elapsed();
        metrics::histogram!("scenario_load_seconds").record(elapsed.as_secs_f64());
        info!(
            "Loaded scenario {} ({} rows, {} map points) in {:?}",
            scenario_id,
            bundle.frames.len(),
            bundle.map.len(),
            elapsed
        );

        let evicted = lock(&self.bundles)?.insert(key, Arc::clone(&bundle));
        if evicted > 0 {
            metrics::counter!("scenario_cache_evictions_total").increment(evicted as u64);
        }
        Ok(bundle)
    }

    /// Scenario ids in order of first appearance; empty when no data exists
    pub fn list_scenarios<S: DatasetSource>(&self, source: &S) -> Result<Vec<String>, LoadError> {
        let fingerprint = source.fingerprint();
        Ok(self
            .dataset(source, &fingerprint)?
            .map(|d| d.trajectories.scenario_ids())
            .unwrap_or_default())
    }

    fn dataset<S: DatasetSource>(
        &self,
        source: &S,
        fingerprint: &SourceFingerprint,
    ) -> Result<Option<Arc<Dataset>>, LoadError> {
        if let Some(dataset) = lock(&self.datasets)?.get(fingerprint) {
            return Ok(dataset);
        }

        let dataset = source.read()?.map(Arc::new);
        metrics::counter!("dataset_parses_total").increment(1);

        let evicted = lock(&self.datasets)?.insert(fingerprint.clone(), dataset.clone());
        if evicted > 0 {
            metrics::counter!("scenario_cache_evictions_total").increment(evicted as u64);
        }
        Ok(dataset)
    }

    /// Drop every memoized dataset and bundle
    pub fn clear(&self) -> Result<(), LoadError> {
        lock(&self.bundles)?.clear();
        lock(&self.datasets)?.clear();
        info!("Scenario caches cleared");
        Ok(())
    }

    pub fn cache_stats(&self) -> Result<CacheStats, LoadError> {
        let bundles = lock(&self.bundles)?;
        let datasets = lock(&self.datasets)?;
        Ok(CacheStats {
            bundles: bundles.len(),
            datasets: datasets.len(),
            evictions: bundles.evictions() + datasets.evictions(),
        })
    }
}

//! Model bundle loading.
//!
//! The analysis engine needs three sub-models before any detection call is
//! valid. They load sequentially from a fixed asset directory:
//!
//! 1. Face localization
//! 2. Age/gender estimation
//! 3. Expression classification
//!
//! A loader remembers its bundle. Sharing one `Arc<ModelLoader>` between
//! sensor instances loads the models once per process. There is no retry:
//! a failed load is returned to the caller as-is.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use crate::engine::{Capability, FaceAnalysisEngine};
use crate::error::{SensorError, SensorResult};
use crate::metrics;

/// Asset directory the models are served from by default.
pub const DEFAULT_MODEL_DIR: &str = "/models";

/// Model loading configuration.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Directory the engine loads sub-models from.
    pub asset_root: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from(DEFAULT_MODEL_DIR),
        }
    }
}

impl ModelConfig {
    /// Create config with an explicit asset directory.
    pub fn with_asset_root(asset_root: impl Into<PathBuf>) -> Self {
        Self {
            asset_root: asset_root.into(),
        }
    }
}

/// Proof that every required capability is loaded.
///
/// Only [`ModelLoader`] creates bundles, and a detection loop cannot be built
/// without one.
#[derive(Debug)]
pub struct ModelBundle {
    engine: &'static str,
    asset_root: PathBuf,
    capabilities: Vec<Capability>,
}

impl ModelBundle {
    /// Name of the engine the bundle was loaded into.
    pub fn engine(&self) -> &'static str {
        self.engine
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Capabilities in the order they were loaded.
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

/// One-time loader of the engine's sub-models.
pub struct ModelLoader {
    engine: Arc<dyn FaceAnalysisEngine>,
    config: ModelConfig,
    bundle: OnceCell<Arc<ModelBundle>>,
}

impl ModelLoader {
    pub fn new(engine: Arc<dyn FaceAnalysisEngine>, config: ModelConfig) -> Self {
        Self {
            engine,
            config,
            bundle: OnceCell::new(),
        }
    }

    /// The engine models are loaded into.
    pub fn engine(&self) -> Arc<dyn FaceAnalysisEngine> {
        Arc::clone(&self.engine)
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// True once a load has completed successfully.
    pub fn is_ready(&self) -> bool {
        self.bundle.initialized()
    }

    /// The loaded bundle, if any.
    pub fn bundle(&self) -> Option<Arc<ModelBundle>> {
        self.bundle.get().cloned()
    }

    /// Load every required capability, or return the bundle already loaded.
    ///
    /// Concurrent callers wait for the same in-flight load. A failed load
    /// leaves the loader empty.
    pub async fn load(&self) -> SensorResult<Arc<ModelBundle>> {
        self.bundle
            .get_or_try_init(|| self.load_all())
            .await
            .map(Arc::clone)
    }

    async fn load_all(&self) -> SensorResult<Arc<ModelBundle>> {
        let asset_root = &self.config.asset_root;
        info!(
            engine = self.engine.name(),
            asset_root = %asset_root.display(),
            "Loading face analysis models"
        );

        let started = Instant::now();
        let mut capabilities = Vec::with_capacity(Capability::REQUIRED.len());

        for &capability in Capability::REQUIRED {
            let step = Instant::now();
            if let Err(e) = self.engine.load_model(capability, asset_root).await {
                error!("Failed to load {} model: {}", capability, e);
                metrics::record_model_load_failure(capability);
                return Err(match e {
                    err @ SensorError::ModelLoad { .. } => err,
                    other => SensorError::model_load(capability, other.to_string()),
                });
            }

            let elapsed = step.elapsed();
            metrics::record_model_load(capability, elapsed.as_secs_f64());
            debug!("Loaded {} model in {:?}", capability, elapsed);
            capabilities.push(capability);
        }

        info!("Loaded models in {:?}", started.elapsed());

        Ok(Arc::new(ModelBundle {
            engine: self.engine.name(),
            asset_root: asset_root.clone(),
            capabilities,
        }))
    }
}

impl std::fmt::Debug for ModelLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelLoader")
            .field("engine", &self.engine.name())
            .field("config", &self.config)
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::VideoFrame;
    use async_trait::async_trait;
    use facemood_models::DetectionFrame;
    use std::sync::Mutex;

    /// Engine that records load calls and fails on one capability.
    #[derive(Default)]
    struct RecordingEngine {
        loads: Mutex<Vec<Capability>>,
        fail_on: Option<Capability>,
    }

    #[async_trait]
    impl FaceAnalysisEngine for RecordingEngine {
        async fn load_model(&self, capability: Capability, _asset_root: &Path) -> SensorResult<()> {
            self.loads.lock().unwrap().push(capability);
            if self.fail_on == Some(capability) {
                return Err(SensorError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "weights not found",
                )));
            }
            Ok(())
        }

        async fn detect_single_face(&self, _frame: &VideoFrame) -> SensorResult<Option<DetectionFrame>> {
            Ok(None)
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    #[tokio::test]
    async fn test_loads_capabilities_in_order() {
        let engine = Arc::new(RecordingEngine::default());
        let loader = ModelLoader::new(engine.clone(), ModelConfig::default());

        assert!(!loader.is_ready());
        let bundle = loader.load().await.unwrap();

        assert!(loader.is_ready());
        assert_eq!(bundle.capabilities(), Capability::REQUIRED);
        assert_eq!(bundle.asset_root(), Path::new(DEFAULT_MODEL_DIR));
        assert_eq!(*engine.loads.lock().unwrap(), Capability::REQUIRED);
    }

    #[tokio::test]
    async fn test_second_load_reuses_bundle() {
        let engine = Arc::new(RecordingEngine::default());
        let loader = ModelLoader::new(engine.clone(), ModelConfig::with_asset_root("/srv/models"));

        let first = loader.load().await.unwrap();
        let second = loader.load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(engine.loads.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failure_stops_sequence() {
        let engine = Arc::new(RecordingEngine {
            fail_on: Some(Capability::AgeGender),
            ..Default::default()
        });
        let loader = ModelLoader::new(engine.clone(), ModelConfig::default());

        let err = loader.load().await.unwrap_err();

        match err {
            SensorError::ModelLoad { capability, .. } => assert_eq!(capability, Capability::AgeGender),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!loader.is_ready());
        assert!(loader.bundle().is_none());
        assert_eq!(
            *engine.loads.lock().unwrap(),
            vec![Capability::FaceDetector, Capability::AgeGender]
        );
    }
}

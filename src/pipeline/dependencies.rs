use std::sync::Arc;

use crate::{
    capture::{DefaultScreenSampler, Pause, ScreenSampler, ThreadSleep},
    encode::AnimationEncoder,
    output::{ClipboardPublisher, default_publisher},
};

/// Bundle of collaborators used by the pipeline. Each component can be mocked in tests.
#[derive(Clone)]
pub struct PipelineDependencies {
    pub sampler: Arc<dyn ScreenSampler>,
    pub pause: Arc<dyn Pause>,
    pub clipboard: Arc<dyn ClipboardPublisher>,
    pub encoder: AnimationEncoder,
}

impl Default for PipelineDependencies {
    fn default() -> Self {
        Self {
            sampler: Arc::new(DefaultScreenSampler),
            pause: Arc::new(ThreadSleep),
            clipboard: default_publisher(),
            encoder: AnimationEncoder::default(),
        }
    }
}

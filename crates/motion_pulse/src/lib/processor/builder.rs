use std::path::PathBuf;

use uuid::Uuid;

use crate::{
    compositor::Compositor,
    motion::{ClipFetcher, MotionGenerator, MotionUploader},
    validator::{ImageLimits, ImageValidator},
    VideoAssembler,
};

pub struct VideoAssemblerBuilder<U = (), M = (), F = (), C = ()> {
    workdir: PathBuf,
    output_dir: PathBuf,
    image_limits: ImageLimits,
    uploader: U,
    motion: M,
    fetcher: F,
    compositor: C,
}

impl VideoAssemblerBuilder {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        let workdir = workdir.into();
        let output_dir = workdir.join("videos");
        Self {
            workdir,
            output_dir,
            image_limits: ImageLimits::default(),
            uploader: (),
            motion: (),
            fetcher: (),
            compositor: (),
        }
    }
}

impl<U, M, F, C> VideoAssemblerBuilder<U, M, F, C> {
    pub fn uploader<U2: MotionUploader + Send + Sync + 'static>(
        self,
        uploader: U2,
    ) -> VideoAssemblerBuilder<U2, M, F, C> {
        VideoAssemblerBuilder {
            workdir: self.workdir,
            output_dir: self.output_dir,
            image_limits: self.image_limits,
            uploader,
            motion: self.motion,
            fetcher: self.fetcher,
            compositor: self.compositor,
        }
    }

    pub fn motion_generator<M2: MotionGenerator + Send + Sync + 'static>(
        self,
        motion: M2,
    ) -> VideoAssemblerBuilder<U, M2, F, C> {
        VideoAssemblerBuilder {
            workdir: self.workdir,
            output_dir: self.output_dir,
            image_limits: self.image_limits,
            uploader: self.uploader,
            motion,
            fetcher: self.fetcher,
            compositor: self.compositor,
        }
    }

    pub fn clip_fetcher<F2: ClipFetcher + Send + Sync + 'static>(
        self,
        fetcher: F2,
    ) -> VideoAssemblerBuilder<U, M, F2, C> {
        VideoAssemblerBuilder {
            workdir: self.workdir,
            output_dir: self.output_dir,
            image_limits: self.image_limits,
            uploader: self.uploader,
            motion: self.motion,
            fetcher,
            compositor: self.compositor,
        }
    }

    pub fn compositor<C2: Compositor + Clone + Send + Sync + 'static>(
        self,
        compositor: C2,
    ) -> VideoAssemblerBuilder<U, M, F, C2> {
        VideoAssemblerBuilder {
            workdir: self.workdir,
            output_dir: self.output_dir,
            image_limits: self.image_limits,
            uploader: self.uploader,
            motion: self.motion,
            fetcher: self.fetcher,
            compositor,
        }
    }

    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn image_limits(mut self, image_limits: ImageLimits) -> Self {
        self.image_limits = image_limits;
        self
    }
}

impl<U, M, F, C> VideoAssemblerBuilder<U, M, F, C>
where
    U: MotionUploader + Send + Sync + 'static,
    M: MotionGenerator + Send + Sync + 'static,
    F: ClipFetcher + Send + Sync + 'static,
    C: Compositor + Clone + Send + Sync + 'static,
{
    pub fn build(self) -> VideoAssembler<U, M, F, C> {
        VideoAssembler {
            workdir: self.workdir,
            output_dir: self.output_dir,
            run_id: Uuid::new_v4().simple().to_string(),
            validator: ImageValidator::new(self.image_limits),
            uploader: self.uploader,
            motion: self.motion,
            fetcher: self.fetcher,
            compositor: self.compositor,
        }
    }
}

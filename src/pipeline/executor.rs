use std::time::Duration;

use babelfish_av::Workspace;
use chrono::Utc;
use tracing::{info, warn};

use super::{fill, Failure, RunOutcome, RunState, RunSummary};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::{AudioExtractor, FfmpegExtractor};
use crate::job::JobRequest;
use crate::lipsync::{GenerationRequest, LipsyncController, SyncClient};
use crate::package::{output_location, write_metadata, ResultMetadata};
use crate::publish::AssetPublisher;
use crate::speech::SpeechPipeline;
use crate::transfer::Transfer;

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(f32, &str) + Send + Sync>;

/// Runs the stages of one job strictly in order.
pub struct Pipeline {
    config: Config,
    request: JobRequest,
    extractor: Box<dyn AudioExtractor>,
    progress_callback: Option<ProgressCallback>,
}

impl Pipeline {
    pub fn new(config: &Config, request: JobRequest) -> Self {
        Self {
            config: config.clone(),
            request,
            extractor: Box::new(FfmpegExtractor::new(config.tools.clone())),
            progress_callback: None,
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn AudioExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn report_progress(&self, progress: f32, step: &str) {
        if let Some(ref cb) = self.progress_callback {
            cb(progress, step);
        }
        info!("[{:.0}%] {}", progress, step);
    }

    /// Execute the run.
    pub async fn run(self) -> RunOutcome {
        match self.execute().await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "Pipeline stopped");
                RunOutcome::from(err)
            }
        }
    }

    async fn execute(&self) -> Result<RunOutcome> {
        let request = &self.request;
        request.validate()?;

        let workspace = Workspace::new(&self.config.work_dir)
            .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
        let connect_timeout = Duration::from_secs(self.config.transfer.connect_timeout_secs);
        let transfer = Transfer::new(connect_timeout);
        let mut state = RunState::default();

        self.report_progress(0.0, "Downloading source video");
        let video = fill(
            &mut state.local_video,
            transfer.fetch_into(&request.video_url, &workspace).await?,
        );

        self.report_progress(10.0, "Extracting audio");
        let waveform = fill(&mut state.waveform, self.extractor.extract(video).await?);

        self.report_progress(20.0, "Transcribing, translating and synthesizing speech");
        let speech = SpeechPipeline::from_config(&self.config, &request.credentials)
            .run(waveform, &request.target_language, request.voice(), &workspace)
            .await?;
        let transcript = fill(&mut state.transcript, speech.transcript);
        let translated_text = fill(&mut state.translated_text, speech.translated_text);
        let speech_audio = fill(&mut state.speech_audio, speech.audio_path);

        self.report_progress(45.0, "Publishing synthesized speech");
        let publisher =
            AssetPublisher::new(self.config.upload.url.clone()).with_connect_timeout(connect_timeout);
        let Some(audio_url) = publisher.publish(speech_audio).await else {
            return Ok(RunOutcome::Rejected(Failure::UploadFailed));
        };
        let audio_url = fill(&mut state.audio_url, audio_url);

        self.report_progress(55.0, "Submitting lipsync job");
        let controller = LipsyncController::new(
            Box::new(
                SyncClient::new(&self.config.sync.base_url, request.credentials.sync_api_key.clone())
                    .with_connect_timeout(connect_timeout),
            ),
            request.poll_interval.as_duration(),
        )
        .with_max_wait(request.max_wait);
        let generation = GenerationRequest::new(
            request.video_url.clone(),
            request.segment,
            audio_url.clone(),
            request.lipsync_model.clone(),
            request.sync_mode,
        );
        let job_id = fill(&mut state.job_id, controller.submit(&generation).await?);

        self.report_progress(60.0, "Waiting for lipsync job");
        controller.wait(job_id).await?;
        let output_url = fill(&mut state.output_url, controller.output_url(job_id).await?);

        self.report_progress(90.0, "Downloading translated video");
        let metadata_path = request.metadata_path.as_deref();
        let destination = output_location(&workspace, metadata_path);
        let output_path = fill(
            &mut state.output_path,
            transfer.fetch_to(output_url, &destination).await?,
        );

        if let Some(path) = metadata_path {
            self.report_progress(95.0, "Writing metadata");
            let metadata = ResultMetadata {
                input_video_url: request.video_url.clone(),
                translated_text: translated_text.clone(),
                target_language: request.target_language.clone(),
                source_language: request.source_language.clone(),
                output_video_path: output_path.clone(),
                voice_id: request.voice_id.clone(),
                lipsync_model: request.lipsync_model.to_string(),
                sync_mode: request.sync_mode.to_string(),
                job_id: job_id.clone(),
                timestamp: Utc::now(),
            };
            write_metadata(path, &metadata)?;
        }

        self.report_progress(100.0, "Finished");
        info!(job_id = %job_id, output = %output_path.display(), "Translated video ready");

        Ok(RunOutcome::Completed(RunSummary {
            output_path: output_path.clone(),
            job_id: job_id.clone(),
            transcript: transcript.clone(),
            translated_text: translated_text.clone(),
            metadata_path: metadata_path.map(|p| p.to_path_buf()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Credentials;
    use assert_matches::assert_matches;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn invalid_request_is_fault_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.work_dir = dir.path().join("work");

        let request = JobRequest::new(
            "https://cdn.example.com/clip.mp4",
            "Spanish",
            Credentials::new("", "openai", "eleven"),
        );
        let steps = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&steps);

        let outcome = Pipeline::new(&config, request)
            .with_progress_callback(Box::new(move |_, step| {
                seen.lock().unwrap().push(step.to_string())
            }))
            .run()
            .await;

        assert_matches!(outcome, RunOutcome::Fault(Error::InvalidRequest(_)));
        assert!(steps.lock().unwrap().is_empty());
        assert!(!config.work_dir.exists());
    }
}

use std::collections::VecDeque;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::sync::Semaphore;

use crate::errors::{PipelineError, PipelineResult};
use crate::events::{EngineCompletion, EngineEmitter, EngineEvent};

/// How many stderr lines are kept as the failure diagnostic
const STDERR_TAIL_LINES: usize = 20;

/// One engine invocation: inputs in index order, a filter graph, one output.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineJob {
    pub inputs: Vec<PathBuf>,
    pub filter_graph: String,
    pub channels: u8,
    pub format: &'static str,
    pub output: PathBuf,
}

impl EngineJob {
    pub fn stereo_mp3(inputs: Vec<PathBuf>, filter_graph: String, output: PathBuf) -> Self {
        Self {
            inputs,
            filter_graph,
            channels: 2,
            format: "mp3",
            output,
        }
    }

    /// Command line arguments, without the binary itself.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.inputs.len() * 2 + 9);
        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().to_string());
        }
        args.extend([
            "-filter_complex".to_string(),
            self.filter_graph.clone(),
            "-ac".to_string(),
            self.channels.to_string(),
            "-f".to_string(),
            self.format.to_string(),
            "-y".to_string(),
            self.output.to_string_lossy().to_string(),
        ]);
        args
    }
}

/// External audio engine. `start` returns as soon as the job is running;
/// the returned completion resolves when it ends.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    async fn start(&self, job: EngineJob) -> PipelineResult<EngineCompletion>;
}

pub struct FfmpegEngine {
    binary: PathBuf,
    permits: Option<Arc<Semaphore>>,
}

impl FfmpegEngine {
    pub fn new(binary: PathBuf) -> Self {
        Self {
            binary,
            permits: None,
        }
    }

    /// Caps the number of ffmpeg processes running at once.
    pub fn with_max_concurrent(mut self, limit: usize) -> Self {
        self.permits = Some(Arc::new(Semaphore::new(limit.max(1))));
        self
    }
}

#[async_trait]
impl AudioEngine for FfmpegEngine {
    async fn start(&self, job: EngineJob) -> PipelineResult<EngineCompletion> {
        let permit = match &self.permits {
            Some(permits) => Some(
                Arc::clone(permits)
                    .acquire_owned()
                    .await
                    .map_err(|e| PipelineError::Mix(format!("Engine pool closed: {}", e)))?,
            ),
            None => None,
        };

        let args = job.args();
        info!("Running FFmpeg command: {} {}", self.binary.display(), args.join(" "));

        let child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PipelineError::Mix(format!("Failed to start ffmpeg: {}", e)))?;

        let (emitter, completion) = EngineEmitter::channel();
        let output = job.output;
        tokio::spawn(async move {
            let _permit = permit;
            supervise(child, emitter, output).await;
        });

        Ok(completion)
    }
}

/// Waits for the process and reports how it ended. If the listener goes away
/// first, the process is killed and its partial output removed, so nothing is
/// written into a session that has already been swept.
async fn supervise(mut child: Child, mut emitter: EngineEmitter, output: PathBuf) {
    let stderr = child.stderr.take();

    let finished = tokio::select! {
        result = async {
            let tail = drain_stderr(stderr).await;
            (tail, child.wait().await)
        } => Some(result),
        _ = emitter.closed() => None,
    };

    match finished {
        Some((tail, status)) => emitter.emit(completion_event(tail, status)),
        None => {
            warn!("Mix abandoned by its session, stopping ffmpeg");
            if let Err(e) = child.kill().await {
                error!("Failed to kill ffmpeg: {}", e);
            }
            match tokio::fs::remove_file(&output).await {
                Ok(()) => debug!("Removed partial output {}", output.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove partial output {}: {}", output.display(), e),
            }
        }
    }
}

/// Reads stderr to EOF, keeping the last lines. Bytes are decoded lossily;
/// stopping early would close the pipe and kill ffmpeg with SIGPIPE.
async fn drain_stderr(stderr: Option<ChildStderr>) -> VecDeque<String> {
    let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
    let Some(stderr) = stderr else {
        return tail;
    };

    let mut reader = BufReader::new(stderr);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).trim_end().to_string();
                debug!("ffmpeg: {}", line);
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            Err(e) => {
                warn!("Error reading ffmpeg stderr: {}", e);
                break;
            }
        }
    }
    tail
}

fn completion_event(tail: VecDeque<String>, status: io::Result<ExitStatus>) -> EngineEvent {
    match status {
        Ok(status) if status.success() => {
            info!("FFmpeg process completed successfully");
            EngineEvent::Finished
        }
        Ok(status) => {
            let diagnostic = Vec::from(tail).join("\n");
            error!("FFmpeg process failed with status: {}", status);
            EngineEvent::Failed(format!("ffmpeg exited with {}: {}", status, diagnostic))
        }
        Err(e) => {
            error!("Error waiting for FFmpeg process: {}", e);
            EngineEvent::Failed(format!("Error waiting for ffmpeg: {}", e))
        }
    }
}

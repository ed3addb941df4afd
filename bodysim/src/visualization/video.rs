//! Post-processing: frames to video, then cleanup
//!
//! Both steps run after the simulation is over. Their failures are returned
//! to the caller to log and never touch simulation results.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{info, warn};

use crate::error::{Error, Result};

/// ffmpeg invocation for a directory of `*.png` frames
#[derive(Debug, Clone)]
pub struct VideoEncoder {
    pub program: String,   // encoder executable, `ffmpeg` by default
    pub frame_rate: u32,   // frames per second of the output
    pub frames_dir: PathBuf,
    pub output: PathBuf,
}

impl VideoEncoder {
    pub fn new(frame_rate: u32, frames_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            program: "ffmpeg".into(),
            frame_rate,
            frames_dir: frames_dir.into(),
            output: output.into(),
        }
    }

    /// Arguments passed to the encoder
    pub fn args(&self) -> Vec<String> {
        let pattern = self.frames_dir.join("*.png");
        vec![
            "-nostdin".into(),
            "-y".into(),
            "-framerate".into(),
            self.frame_rate.to_string(),
            "-pattern_type".into(),
            "glob".into(),
            "-i".into(),
            pattern.to_string_lossy().into_owned(),
            "-c:v".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            self.output.to_string_lossy().into_owned(),
        ]
    }

    /// Run the encoder to completion
    pub fn encode(&self) -> Result<()> {
        info!(program = %self.program, output = %self.output.display(), "encoding video");
        let status = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::null())
            .status()
            .map_err(|e| Error::Encode(format!("could not start {}: {e}", self.program)))?;

        if !status.success() {
            return Err(Error::Encode(format!("{} exited with {status}", self.program)));
        }
        Ok(())
    }
}

/// Delete every `.png` in `dir`; returns how many were removed
///
/// A file that cannot be deleted is logged and skipped.
pub fn clean_frames(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = match entry {
            Ok(e) => e.path(),
            Err(e) => {
                warn!(error = %e, "could not read frame directory entry");
                continue;
            }
        };
        if path.extension().and_then(|x| x.to_str()) != Some("png") {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = %path.display(), error = %e, "could not delete frame"),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_follow_glob_pattern() {
        let enc = VideoEncoder::new(25, "images", "out.mp4");
        let args = enc.args();
        let i = args.iter().position(|a| a == "-framerate").unwrap();
        assert_eq!(args[i + 1], "25");
        assert!(args.iter().any(|a| a.ends_with("*.png")));
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
    }

    #[test]
    fn missing_encoder_is_an_error() {
        let mut enc = VideoEncoder::new(25, "images", "out.mp4");
        enc.program = "definitely-not-an-encoder-bodysim".into();
        let err = enc.encode().unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
    }
}

//! Frame-to-video assembly via an external ffmpeg.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::info;

/// Frame file name for one timestep, zero-padded so ffmpeg's `%04d` input
/// pattern and lexicographic order both see the frames in time order.
pub fn frame_name(step: usize) -> String {
    format!("kernel_t{step:04}.png")
}

/// One encode: a directory of numbered frames into a single video file.
pub struct MovieJob {
    pub frame_dir: PathBuf,
    pub fps: u32,
    pub output: PathBuf,
}

impl MovieJob {
    /// The full ffmpeg argument vector, separated out so tests can check it
    /// without an ffmpeg install.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        vec![
            "-y".into(),
            "-framerate".into(),
            self.fps.to_string(),
            "-i".into(),
            self.frame_dir.join("kernel_t%04d.png").display().to_string(),
            "-c:v".into(),
            "libx264".into(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            self.output.display().to_string(),
        ]
    }

    /// Run ffmpeg and wait for it.
    ///
    /// A missing binary or a non-zero exit status is an error; the frame
    /// files are left in place either way.
    pub fn encode(&self) -> Result<()> {
        info!(output = %self.output.display(), fps = self.fps, "running ffmpeg");
        let status = Command::new("ffmpeg")
            .args(self.ffmpeg_args())
            .status()
            .context("failed to launch ffmpeg (is it installed?)")?;
        if !status.success() {
            bail!("ffmpeg exited with {status}");
        }
        Ok(())
    }
}

/// Delete the frame files. Callers invoke this only after a confirmed encode.
pub fn remove_frames(frame_dir: &Path, count: usize) -> Result<()> {
    for step in 0..count {
        let path = frame_dir.join(frame_name(step));
        std::fs::remove_file(&path)
            .with_context(|| format!("removing frame {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_names_are_zero_padded() {
        assert_eq!(frame_name(0), "kernel_t0000.png");
        assert_eq!(frame_name(37), "kernel_t0037.png");
        assert_eq!(frame_name(1234), "kernel_t1234.png");
    }

    #[test]
    fn test_ffmpeg_args() {
        let job = MovieJob {
            frame_dir: PathBuf::from("/work"),
            fps: 4,
            output: PathBuf::from("/work/kernel.mp4"),
        };
        assert_eq!(
            job.ffmpeg_args(),
            vec![
                "-y",
                "-framerate",
                "4",
                "-i",
                "/work/kernel_t%04d.png",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "/work/kernel.mp4",
            ]
        );
    }

    #[test]
    fn test_remove_frames() {
        let dir = tempfile::tempdir().unwrap();
        for step in 0..3 {
            std::fs::write(dir.path().join(frame_name(step)), b"png").unwrap();
        }
        remove_frames(dir.path(), 3).unwrap();
        assert!(!dir.path().join(frame_name(0)).exists());
    }

    #[test]
    fn test_remove_missing_frame_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(remove_frames(dir.path(), 1).is_err());
    }
}

//! FFmpeg process backend.
//!
//! Translates a composition into an `ffmpeg` invocation: a lavfi color
//! source for the background, one input per media layer, and a
//! filter_complex graph that applies effects in order, overlays layers
//! bottom-first, and mixes delayed audio with effective gain.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use clipforge_core::{ClipforgeError, Result};
use tracing::{debug, info};

use crate::compose::{Composition, Layer, LayerContent};
use crate::renderer::{ProgressFn, RenderBackend};
use crate::settings::RenderSettings;

/// Backend that spawns an `ffmpeg` process.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    binary: String,
}

impl FfmpegBackend {
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".into(),
        }
    }

    /// Use a non-default ffmpeg binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Build the full ffmpeg argument list for a composition.
    pub fn args(
        &self,
        composition: &Composition,
        settings: &RenderSettings,
        output: &Path,
    ) -> Vec<String> {
        let mut args: Vec<String> = vec!["-y".into()];

        // Input 0: solid background spanning the whole composition.
        args.extend_from_slice(&[
            "-f".into(),
            "lavfi".into(),
            "-t".into(),
            format!("{}", composition.duration),
            "-i".into(),
            format!(
                "color=c=0x{}:s={}x{}:r={}",
                composition.background.to_hex(),
                composition.width,
                composition.height,
                composition.fps
            ),
        ]);

        // Media inputs, one per non-text layer, in layer order.
        let mut input_indices = Vec::with_capacity(composition.layers.len());
        let mut next_input = 1usize;
        for layer in &composition.layers {
            match &layer.content {
                LayerContent::Video { path, media_start }
                | LayerContent::Audio { path, media_start } => {
                    args.extend_from_slice(&[
                        "-ss".into(),
                        format!("{media_start}"),
                        "-t".into(),
                        format!("{}", layer.duration),
                        "-i".into(),
                        path.clone(),
                    ]);
                    input_indices.push(Some(next_input));
                    next_input += 1;
                }
                LayerContent::Image { path } => {
                    args.extend_from_slice(&[
                        "-loop".into(),
                        "1".into(),
                        "-t".into(),
                        format!("{}", layer.duration),
                        "-i".into(),
                        path.clone(),
                    ]);
                    input_indices.push(Some(next_input));
                    next_input += 1;
                }
                LayerContent::Text { .. } => input_indices.push(None),
            }
        }

        let (filter_graph, video_label, has_audio) =
            self.filter_graph(composition, &input_indices);
        if !filter_graph.is_empty() {
            args.extend_from_slice(&["-filter_complex".into(), filter_graph]);
        }

        if video_label == "0:v" {
            args.extend_from_slice(&["-map".into(), "0:v".into()]);
        } else {
            args.extend_from_slice(&["-map".into(), format!("[{video_label}]")]);
        }
        args.extend_from_slice(&[
            "-c:v".into(),
            settings.codec.ffmpeg_encoder().into(),
            "-preset".into(),
            settings.preset.as_str().into(),
        ]);
        if has_audio {
            args.extend_from_slice(&[
                "-map".into(),
                "[aout]".into(),
                "-c:a".into(),
                settings.audio_codec.ffmpeg_encoder().into(),
            ]);
        }
        args.extend_from_slice(&[
            "-r".into(),
            composition.fps.to_string(),
            "-t".into(),
            format!("{}", composition.duration),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-progress".into(),
            "pipe:1".into(),
            "-nostats".into(),
            "-loglevel".into(),
            "error".into(),
        ]);
        args.push(output.to_string_lossy().into_owned());
        args
    }

    /// Build the filter_complex graph. Returns the graph, the final video
    /// label, and whether an `[aout]` audio stream exists.
    fn filter_graph(
        &self,
        composition: &Composition,
        input_indices: &[Option<usize>],
    ) -> (String, String, bool) {
        let mut filters: Vec<String> = Vec::new();
        let mut audio_labels: Vec<String> = Vec::new();
        let mut video_label = String::from("0:v");

        for (n, layer) in composition.layers.iter().enumerate() {
            match &layer.content {
                LayerContent::Video { .. } | LayerContent::Image { .. } => {
                    let Some(input) = input_indices[n] else { continue };
                    let mut chain = vec![
                        // Scale to fill the frame, then center-crop overflow.
                        format!(
                            "scale={}:{}:force_original_aspect_ratio=increase",
                            composition.width, composition.height
                        ),
                        format!("crop={}:{}", composition.width, composition.height),
                    ];
                    for effect in &layer.effects {
                        chain.extend(effect_filters(effect, layer, composition));
                    }
                    chain.push(format!("setpts=PTS-STARTPTS+{}/TB", layer.start));
                    filters.push(format!("[{input}:v]{}[l{n}]", chain.join(",")));
                    filters.push(format!(
                        "[{video_label}][l{n}]overlay=eof_action=pass[v{n}]"
                    ));
                    video_label = format!("v{n}");
                }
                LayerContent::Text { text, color } => {
                    filters.push(format!(
                        "[{video_label}]drawtext=text='{}':fontsize=70:fontcolor=0x{}:\
                         x=(w-text_w)/2:y=(h-text_h)/2:enable='between(t,{},{})'[v{n}]",
                        escape_drawtext(text),
                        color.to_hex(),
                        layer.start,
                        layer.end()
                    ));
                    video_label = format!("v{n}");
                }
                LayerContent::Audio { .. } => {
                    let Some(input) = input_indices[n] else { continue };
                    let delay_ms = (layer.start * 1000.0).round() as u64;
                    filters.push(format!(
                        "[{input}:a]volume={},adelay={delay_ms}:all=1[a{n}]",
                        layer.gain
                    ));
                    audio_labels.push(format!("[a{n}]"));
                }
            }
        }

        let has_audio = !audio_labels.is_empty();
        if has_audio {
            filters.push(format!(
                "{}amix=inputs={}:duration=longest:normalize=0[aout]",
                audio_labels.concat(),
                audio_labels.len()
            ));
        }
        (filters.join(";"), video_label, has_audio)
    }
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for FfmpegBackend {
    fn render(
        &self,
        composition: &Composition,
        settings: &RenderSettings,
        output: &Path,
        progress: Option<&ProgressFn>,
    ) -> Result<PathBuf> {
        let args = self.args(composition, settings, output);
        debug!(?args, "spawning ffmpeg");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ClipforgeError::Render(format!("failed to spawn ffmpeg: {e}")))?;

        // ffmpeg writes key=value progress records to stdout.
        if let Some(stdout) = child.stdout.take() {
            let total_us = composition.duration * 1_000_000.0;
            for line in BufReader::new(stdout).lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(_) => break,
                };
                // Despite the name, out_time_ms is reported in microseconds.
                let value = line
                    .strip_prefix("out_time_us=")
                    .or_else(|| line.strip_prefix("out_time_ms="));
                if let (Some(value), Some(progress)) = (value, progress) {
                    if let Ok(us) = value.trim().parse::<f64>() {
                        if total_us > 0.0 {
                            progress((us / total_us).clamp(0.0, 1.0));
                        }
                    }
                }
            }
        }

        let mut stderr_output = String::new();
        if let Some(mut stderr) = child.stderr.take() {
            let _ = stderr.read_to_string(&mut stderr_output);
        }
        let status = child
            .wait()
            .map_err(|e| ClipforgeError::Render(format!("failed to wait for ffmpeg: {e}")))?;
        if !status.success() {
            return Err(ClipforgeError::Render(format!(
                "ffmpeg exited with {status}: {}",
                stderr_output.trim()
            )));
        }

        if let Some(progress) = progress {
            progress(1.0);
        }
        info!(output = %output.display(), "ffmpeg encode complete");
        Ok(output.to_path_buf())
    }
}

/// Per-effect filter fragments, applied in effect-list order.
fn effect_filters(
    effect: &clipforge_timeline::Effect,
    layer: &Layer,
    composition: &Composition,
) -> Vec<String> {
    let num = |key: &str| effect.parameters.get(key).and_then(|v| v.as_f64());
    match effect.kind.as_str() {
        "crop" => {
            let width = num("width").unwrap_or(composition.width as f64);
            let height = num("height").unwrap_or(composition.height as f64);
            let x = num("x").unwrap_or(0.0);
            let y = num("y").unwrap_or(0.0);
            vec![format!("crop={width}:{height}:{x}:{y}")]
        }
        "fade" => {
            let mut fragments = Vec::new();
            if let Some(fade_in) = num("fade_in").filter(|&d| d > 0.0) {
                fragments.push(format!("fade=t=in:st=0:d={fade_in}"));
            }
            if let Some(fade_out) = num("fade_out").filter(|&d| d > 0.0) {
                let start = (layer.duration - fade_out).max(0.0);
                fragments.push(format!("fade=t=out:st={start}:d={fade_out}"));
            }
            fragments
        }
        "resize" => match (num("width"), num("height")) {
            (Some(width), Some(height)) => vec![format!("scale={width}:{height}")],
            (Some(width), None) => vec![format!("scale={width}:-2")],
            (None, Some(height)) => vec![format!("scale=-2:{height}")],
            (None, None) => Vec::new(),
        },
        // Unrecognized effect kinds render as no-ops.
        _ => Vec::new(),
    }
}

/// Escape text for use inside a single-quoted drawtext argument.
fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace(':', "\\:")
        .replace('%', "\\%")
}

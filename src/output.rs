//! Frame sinks that write replays to disk
//!
//! - [`PpmStream`]: every frame appended to one binary PPM (P6) stream,
//!   ready for `ffmpeg -f image2pipe -i demo.ppm demo.mp4`
//! - [`PngSequence`]: one numbered PNG per frame in a directory
//! - [`Transcript`]: one line of text per frame with `|` at the cursor

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::gap_buffer::GapBuffer;
use crate::script::{play, FrameSink, PlaybackStats, Script};
use crate::view::{Canvas, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Concatenated binary PPM frames in `<name>.ppm`
    Ppm,
    /// Numbered PNG files in `<name>/`
    Png,
    /// Plain-text transcript in `<name>.txt`
    Text,
}

impl OutputFormat {
    /// Where a script's output lands inside `out_dir`
    pub fn output_path(&self, out_dir: &Path, name: &str) -> PathBuf {
        match self {
            Self::Ppm => out_dir.join(format!("{}.ppm", name)),
            Self::Png => out_dir.join(name),
            Self::Text => out_dir.join(format!("{}.txt", name)),
        }
    }
}

fn dimensions(canvas: &Canvas) -> Result<(u32, u32)> {
    let width = u32::try_from(canvas.width).context("frame too wide")?;
    let height = u32::try_from(canvas.height).context("frame too tall")?;
    Ok((width, height))
}

/// Binary PPM frames written back to back
pub struct PpmStream<'r, W: Write> {
    renderer: &'r mut Renderer,
    out: W,
}

impl<'r, W: Write> PpmStream<'r, W> {
    pub fn new(renderer: &'r mut Renderer, out: W) -> Self {
        Self { renderer, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for PpmStream<'_, W> {
    fn frame(&mut self, buffer: &GapBuffer) -> Result<()> {
        let canvas = self.renderer.render(buffer)?;
        let (width, height) = dimensions(&canvas)?;
        PnmEncoder::new(&mut self.out)
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
            .write_image(&canvas.to_rgb8(), width, height, ExtendedColorType::Rgb8)
            .context("encoding PPM frame")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("flushing PPM stream")
    }
}

/// One PNG per frame: `<dir>/<name>-00000.png`, `<dir>/<name>-00001.png`, ...
pub struct PngSequence<'r> {
    renderer: &'r mut Renderer,
    dir: PathBuf,
    name: String,
    index: usize,
}

impl<'r> PngSequence<'r> {
    pub fn new(renderer: &'r mut Renderer, dir: &Path, name: &str) -> Result<Self> {
        fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))?;
        Ok(Self {
            renderer,
            dir: dir.to_path_buf(),
            name: name.to_string(),
            index: 0,
        })
    }

    fn frame_path(&self) -> PathBuf {
        self.dir.join(format!("{}-{:05}.png", self.name, self.index))
    }
}

impl FrameSink for PngSequence<'_> {
    fn frame(&mut self, buffer: &GapBuffer) -> Result<()> {
        let canvas = self.renderer.render(buffer)?;
        let (width, height) = dimensions(&canvas)?;
        let image = RgbImage::from_raw(width, height, canvas.to_rgb8())
            .context("failed to create image buffer")?;
        let path = self.frame_path();
        image
            .save(&path)
            .with_context(|| format!("saving PNG to {}", path.display()))?;
        self.index += 1;
        Ok(())
    }
}

/// Text lines of the form `foo(|); bar();`
pub struct Transcript<W: Write> {
    out: W,
}

impl<W: Write> Transcript<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for Transcript<W> {
    fn frame(&mut self, buffer: &GapBuffer) -> Result<()> {
        self.out.write_all(buffer.front_segment())?;
        self.out.write_all(b"|")?;
        self.out.write_all(buffer.back_segment())?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush().context("flushing transcript")
    }
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Replay `script` into `out_dir` in the given format
///
/// Returns the path written (a file, or a directory for PNG sequences).
pub fn render_script(
    script: &Script,
    format: OutputFormat,
    renderer: &mut Renderer,
    out_dir: &Path,
) -> Result<(PathBuf, PlaybackStats)> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating directory {}", out_dir.display()))?;
    let path = format.output_path(out_dir, &script.name);

    let stats = match format {
        OutputFormat::Ppm => play(script, &mut PpmStream::new(renderer, create_file(&path)?))?,
        OutputFormat::Png => play(script, &mut PngSequence::new(renderer, &path, &script.name)?)?,
        OutputFormat::Text => play(script, &mut Transcript::new(create_file(&path)?))?,
    };

    tracing::info!(
        script = %script.name,
        frames = stats.frames,
        path = %path.display(),
        "rendered script"
    );
    Ok((path, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Command;
    use crate::theme::Palette;

    #[test]
    fn test_output_paths() {
        let dir = Path::new("out");
        assert_eq!(OutputFormat::Ppm.output_path(dir, "intro"), dir.join("intro.ppm"));
        assert_eq!(OutputFormat::Png.output_path(dir, "intro"), dir.join("intro"));
        assert_eq!(OutputFormat::Text.output_path(dir, "intro"), dir.join("intro.txt"));
    }

    #[test]
    fn test_transcript_marks_cursor() {
        let script = Script::new(
            "t",
            4,
            vec![Command::InsertRun("ab".to_string()), Command::Backward(1)],
        );
        let mut transcript = Transcript::new(Vec::new());
        play(&script, &mut transcript).unwrap();
        let text = String::from_utf8(transcript.into_inner()).unwrap();
        assert_eq!(text, "a|\nab|\na|b\n");
    }

    /// Split a PPM stream into frames by walking each header
    fn split_ppm_frames(mut bytes: &[u8]) -> Vec<(u32, u32, &[u8])> {
        let mut frames = Vec::new();
        while !bytes.is_empty() {
            let mut fields = Vec::new();
            let mut pos = 0;
            while fields.len() < 4 {
                while bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                let start = pos;
                while !bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                fields.push(std::str::from_utf8(&bytes[start..pos]).unwrap());
            }
            // Exactly one whitespace byte separates maxval from the samples
            pos += 1;
            assert_eq!(fields[0], "P6");
            assert_eq!(fields[3], "255");
            let width: u32 = fields[1].parse().unwrap();
            let height: u32 = fields[2].parse().unwrap();
            let end = pos + (width * height * 3) as usize;
            frames.push((width, height, &bytes[..end]));
            bytes = &bytes[end..];
        }
        frames
    }

    #[test]
    fn test_ppm_stream_has_header_per_frame() {
        let mut renderer = Renderer::new(Palette::default(), 8, 16);
        let script = Script::new(
            "p",
            2,
            vec![Command::Insert('a'), Command::Wait(2), Command::InsertRun("bc".to_string())],
        );
        let mut stream = PpmStream::new(&mut renderer, Vec::new());
        play(&script, &mut stream).unwrap();
        let bytes = stream.into_inner();

        let frames = split_ppm_frames(&bytes);
        assert_eq!(frames.len(), 5);
        // Capacity 2 until the third unit forces growth to 4
        let widths: Vec<u32> = frames.iter().map(|(w, _, _)| *w).collect();
        assert_eq!(widths, vec![16, 16, 16, 24, 32]);
        for (width, height, frame) in frames {
            assert_eq!(height, 24);
            let decoded =
                image::load_from_memory_with_format(frame, image::ImageFormat::Pnm).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (width, height));
        }
    }

    #[test]
    fn test_oversized_frame_propagates_error() {
        let mut renderer = Renderer::new(Palette::default(), 8, 16);
        let script = Script::new("big", 4_000_000, vec![Command::Insert('a')]);
        let mut stream = PpmStream::new(&mut renderer, Vec::new());
        assert!(play(&script, &mut stream).is_err());
        assert!(stream.into_inner().is_empty());
    }
}

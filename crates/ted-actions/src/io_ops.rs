//! File loading, the durable save protocol, and byte serialization.
//!
//! Loading reads the whole file, decodes it against the selected newline
//! convention, and rejects anything the editor cannot faithfully write
//! back: bare `\r` in dos mode, control bytes other than tab, truncated or
//! malformed UTF-8.
//!
//! Saving never writes the target file in place. The buffer is streamed to
//! an exclusive temp file next to the target (`.<basename>.<n>`), synced,
//! checked against the recorded mtime, and renamed over the original.
//! A concurrent modification leaves the target untouched and reports where
//! the new content went.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ted_model::Editor;
use ted_state::FileMeta;
use ted_text::{GapBuffer, LineEnding, TedChar, utf8_len};
use thiserror::Error;
use tracing::{debug, error, info};

/// Serialization block size.
const BLKSIZE: usize = 4096;
/// Bounded retries for interrupted or short writes.
const WRITE_RETRIES: u32 = 10;
/// Temp-name probe attempts per directory.
const SAVE_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("<cr> not followed by <lf> in file.")]
    BareCarriageReturn,
    #[error("Invalid utf8 in file.")]
    InvalidUtf8,
    #[error("Invalid ASCII in file.")]
    InvalidAscii,
}

/// Decode raw file bytes into the character sequence.
pub fn decode_bytes(bytes: &[u8], line_ending: LineEnding) -> Result<Vec<TedChar>, LoadError> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut j = 0;
    while j < bytes.len() {
        let b = bytes[j];
        if line_ending == LineEnding::Dos && b == b'\r' {
            if bytes.get(j + 1) == Some(&b'\n') {
                out.push(TedChar::Newline);
                j += 2;
            } else {
                return Err(LoadError::BareCarriageReturn);
            }
        } else if line_ending == LineEnding::Unix && b == b'\n' {
            out.push(TedChar::Newline);
            j += 1;
        } else {
            let k = utf8_len(b);
            let run = bytes.get(j..j + k).ok_or(LoadError::InvalidUtf8)?;
            if k == 1 && b != b'\t' && !(0x20..=0x7e).contains(&b) {
                return Err(LoadError::InvalidAscii);
            }
            let s = std::str::from_utf8(run).map_err(|_| LoadError::InvalidUtf8)?;
            let c = s.chars().next().ok_or(LoadError::InvalidUtf8)?;
            out.push(TedChar::glyph(c));
            j += k;
        }
    }
    Ok(out)
}

/// Serialize characters under the newline convention, streaming through a
/// fixed block with bounded retries on interrupted or partial writes.
pub fn write_chars<W: Write>(
    chars: impl Iterator<Item = TedChar>,
    line_ending: LineEnding,
    w: &mut W,
) -> io::Result<()> {
    let mut block = [0u8; BLKSIZE];
    let mut used = 0;
    let mut scratch = [0u8; 4];
    for ch in chars {
        let bytes: &[u8] = match ch {
            TedChar::Newline => match line_ending {
                LineEnding::Unix => b"\n",
                LineEnding::Dos => b"\r\n",
            },
            TedChar::Glyph(g) => g.encode_utf8(&mut scratch).as_bytes(),
        };
        if used + bytes.len() > BLKSIZE {
            write_all_retry(w, &block[..used])?;
            used = 0;
        }
        block[used..used + bytes.len()].copy_from_slice(bytes);
        used += bytes.len();
    }
    if used > 0 {
        write_all_retry(w, &block[..used])?;
    }
    Ok(())
}

fn write_all_retry<W: Write>(w: &mut W, mut buf: &[u8]) -> io::Result<()> {
    let mut retries = WRITE_RETRIES;
    while !buf.is_empty() {
        match w.write(buf) {
            Ok(0) => {
                if retries == 0 {
                    return Err(io::Error::new(ErrorKind::WriteZero, "persistent short write"));
                }
                retries -= 1;
            }
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == ErrorKind::Interrupted => {
                if retries == 0 {
                    return Err(e);
                }
                retries -= 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Load `path` into a fresh buffer, creating the file when absent.
///
/// The surrounding directory must exist; a file that cannot be decoded is
/// a fatal startup error, reported before the terminal is touched.
pub fn load_file(path: &Path, line_ending: LineEnding) -> Result<(GapBuffer, FileMeta)> {
    let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match resolved.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let base = resolved
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .with_context(|| format!("'{}': not a file path", path.display()))?;

    let dir_meta = fs::metadata(&dir)
        .with_context(|| format!("cannot read directory '{}'", dir.display()))?;
    if !dir_meta.is_dir() {
        anyhow::bail!("'{}': not a directory", dir.display());
    }

    let mut bytes = Vec::new();
    match File::open(&resolved) {
        Ok(mut f) => {
            f.read_to_end(&mut bytes)
                .with_context(|| format!("read '{}'", resolved.display()))?;
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .mode(0o644)
                .open(&resolved)
                .with_context(|| format!("create '{}'", resolved.display()))?;
        }
        Err(e) => {
            return Err(e).with_context(|| format!("open '{}'", resolved.display()));
        }
    }

    let meta = fs::metadata(&resolved)
        .with_context(|| format!("stat '{}'", resolved.display()))?;
    let chars = decode_bytes(&bytes, line_ending)?;
    info!(
        target: "io.load",
        file = %resolved.display(),
        bytes = bytes.len(),
        chars = chars.len(),
        "file_loaded"
    );

    Ok((
        GapBuffer::from_chars(chars),
        FileMeta {
            path: resolved,
            dir,
            base,
            mode: meta.permissions().mode(),
            mtime: meta.modified().context("file mtime")?,
            line_ending,
            ensure_trailing_newline: true,
        },
    ))
}

fn maybe_insert_trailing_newline(ed: &mut Editor) {
    if !ed.state.file.ensure_trailing_newline || ed.buffer.is_empty() {
        return;
    }
    let last = ed.buffer.char_at(ed.buffer.len() - 1);
    if last.is_some_and(|c| c.is_newline()) {
        return;
    }
    if ed.buffer.point_at_end() {
        ed.insert_char(TedChar::Newline);
    } else {
        let save = ed.point();
        ed.end_of_buffer();
        ed.insert_char(TedChar::Newline);
        ed.move_to(save);
    }
}

/// Probe `.<base>.<n>` names in `dir` for one that can be created
/// exclusively with the original file's permission bits.
fn open_save_file(dir: &Path, base: &str, mode: u32) -> Option<(File, PathBuf)> {
    for n in 0..SAVE_NAME_ATTEMPTS {
        let path = dir.join(format!(".{base}.{n}"));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(mode)
            .open(&path)
        {
            Ok(file) => return Some((file, path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                debug!(target: "io.save", path = %path.display(), %e, "temp_open_failed");
                return None;
            }
        }
    }
    None
}

/// Save the buffer: trailing newline policy, exclusive temp file, streamed
/// serialization, mtime conflict check, rename, echo.
pub fn save_buffer(ed: &mut Editor) {
    maybe_insert_trailing_newline(ed);

    let dir = ed.state.file.dir.clone();
    let base = ed.state.file.base.clone();
    let mode = ed.state.file.mode;

    let Some((mut file, temp_path)) = open_save_file(&dir, &base, mode)
        .or_else(|| open_save_file(&std::env::temp_dir(), &base, mode))
    else {
        ed.state.echo.error("Failed to save file.");
        return;
    };

    let line_ending = ed.state.file.line_ending;
    if write_chars(ed.buffer.iter(), line_ending, &mut file).is_err() {
        error!(target: "io.save", temp = %temp_path.display(), "write_failed");
        ed.state.echo.error("Failed to save file.");
        return;
    }
    if file.sync_all().is_err() {
        ed.state.echo.error("Failed to save file.");
        return;
    }
    drop(file);

    let target = ed.state.file.path.clone();
    if let Ok(meta) = fs::metadata(&target)
        && let Ok(disk_mtime) = meta.modified()
        && disk_mtime > ed.state.file.mtime
    {
        ed.state.echo.error(format!(
            "File has been modified. Wrote to '{}'",
            temp_path.display()
        ));
        return;
    }

    if fs::rename(&temp_path, &target).is_err() {
        ed.state
            .echo
            .error(format!("'{}' rename failed.", temp_path.display()));
        return;
    }
    let _ = fs::remove_file(&temp_path);

    info!(target: "io.save", file = %target.display(), "file_saved");
    ed.state
        .echo
        .info_preserved(format!("Wrote '{}'", target.display()));
    ed.state.is_dirty = false;
    if let Ok(meta) = fs::metadata(&target)
        && let Ok(mtime) = meta.modified()
    {
        ed.state.file.mtime = mtime;
    }
}

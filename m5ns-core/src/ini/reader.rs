//! Streaming INI reader
//!
//! Each lookup rescans the file from the start, reading one line at a time
//! into the caller's buffer. Nothing is cached, so memory use is bounded by
//! the buffer regardless of file size.
//!
//! Supported syntax:
//! - `[section]` headers (text after the closing bracket is ignored)
//! - `key = value` entries, key and value trimmed
//! - Blank lines and comment lines starting with `;` or `#`
//! - `\n` or `\r\n` line endings
//!
//! Section and key names match case-insensitively unless
//! [`IniFile::case_sensitive`] is set.

use core::ops::Range;
use core::str;

use embedded_io::{Read, Seek, SeekFrom};
use heapless::String;
use m5ns_hal::{FileStorage, MAX_PATH_LEN};

use super::error::IniError;

/// One classified line, as byte ranges into the line buffer
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Blank, comment, or anything without `=`
    Ignored,
    /// `[name]` header
    Section(Range<usize>),
    /// `key = value` entry
    Entry {
        key: Range<usize>,
        value: Range<usize>,
    },
}

/// An open INI file
pub struct IniFile<F> {
    file: F,
    filename: String<MAX_PATH_LEN>,
    error: Option<IniError>,
    case_sensitive: bool,
}

impl<F: Read + Seek> IniFile<F> {
    /// Open the INI file at `path`
    ///
    /// Fails with [`IniError::FileNotFound`] if nothing exists at the path.
    pub fn open<S>(storage: &mut S, path: &str) -> Result<Self, IniError>
    where
        S: FileStorage<File = F>,
    {
        let file = storage.open(path)?;
        Ok(Self::from_file(file, path))
    }

    /// Wrap an already open file
    ///
    /// `filename` is only kept for diagnostics and is truncated to
    /// [`MAX_PATH_LEN`] bytes.
    pub fn from_file(file: F, filename: &str) -> Self {
        let mut end = filename.len().min(MAX_PATH_LEN);
        while !filename.is_char_boundary(end) {
            end -= 1;
        }
        let mut name = String::new();
        // Cannot fail, end <= capacity
        let _ = name.push_str(&filename[..end]);

        Self {
            file,
            filename: name,
            error: None,
            case_sensitive: false,
        }
    }

    /// Set whether section and key names match case-sensitively
    pub fn case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }

    /// Name the file was opened with
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Error from the last operation, `None` if it succeeded
    pub fn error(&self) -> Option<IniError> {
        self.error
    }

    /// Release the underlying file handle
    pub fn into_inner(self) -> F {
        self.file
    }

    /// Check that every line of the file fits in `buffer`
    ///
    /// Reports [`IniError::BufferTooSmall`] for the first over-long line.
    pub fn validate(&mut self, buffer: &mut [u8]) -> Result<(), IniError> {
        let mut pos = 0;
        loop {
            match self.read_line(pos, buffer) {
                Ok((_, next)) => pos = next,
                Err(IniError::EndOfFile) => break,
                Err(e) => return Err(self.fail(e)),
            }
        }
        self.error = None;
        Ok(())
    }

    /// Look up `key` in `section`
    ///
    /// On success the returned value borrows from `buffer`. A section that
    /// appears more than once is searched in every occurrence.
    pub fn get_value<'b>(
        &mut self,
        section: &str,
        key: &str,
        buffer: &'b mut [u8],
    ) -> Result<&'b str, IniError> {
        let mut pos = 0;
        let mut in_section = false;
        let mut section_seen = false;

        let value = loop {
            let (len, next) = match self.read_line(pos, buffer) {
                Ok(line) => line,
                Err(IniError::EndOfFile) => {
                    let e = if section_seen {
                        IniError::KeyNotFound
                    } else {
                        IniError::SectionNotFound
                    };
                    return Err(self.fail(e));
                }
                Err(e) => return Err(self.fail(e)),
            };
            pos = next;

            match classify(&buffer[..len]) {
                Line::Section(name) => {
                    in_section = self.names_match(&buffer[name], section.as_bytes());
                    section_seen |= in_section;
                }
                Line::Entry { key: k, value } if in_section => {
                    if self.names_match(&buffer[k], key.as_bytes()) {
                        break value;
                    }
                }
                _ => {}
            }
        };

        match str::from_utf8(&buffer[value]) {
            Ok(text) => {
                self.error = None;
                Ok(text)
            }
            Err(_) => Err(self.fail(IniError::Unknown)),
        }
    }

    /// Read the line starting at byte `pos` into `buffer`
    ///
    /// Returns the line length (without line ending) and the position of
    /// the next line.
    fn read_line(&mut self, pos: u64, buffer: &mut [u8]) -> Result<(usize, u64), IniError> {
        // Need room for at least one byte plus the terminator
        if buffer.len() < 2 {
            return Err(IniError::BufferTooSmall);
        }
        let cap = buffer.len() - 1;

        self.file
            .seek(SeekFrom::Start(pos))
            .map_err(|_| IniError::SeekError)?;

        let n = read_full(&mut self.file, &mut buffer[..cap])?;
        if n == 0 {
            return Err(IniError::EndOfFile);
        }

        if let Some(nl) = buffer[..n].iter().position(|&b| b == b'\n') {
            return Ok((strip_cr(&buffer[..nl]), pos + nl as u64 + 1));
        }

        // Last line without a trailing newline
        if n < cap {
            return Ok((strip_cr(&buffer[..n]), pos + n as u64));
        }

        // Buffer is full: the line fits only if it ends right here
        let mut probe = [0u8; 1];
        let mut consumed = 0u64;
        loop {
            if read_full(&mut self.file, &mut probe)? == 0 {
                break;
            }
            consumed += 1;
            match probe[0] {
                b'\n' => break,
                b'\r' if consumed == 1 => continue,
                _ => return Err(IniError::BufferTooSmall),
            }
        }
        Ok((strip_cr(&buffer[..n]), pos + n as u64 + consumed))
    }

    fn names_match(&self, found: &[u8], wanted: &[u8]) -> bool {
        if self.case_sensitive {
            found == wanted
        } else {
            found.eq_ignore_ascii_case(wanted)
        }
    }

    fn fail(&mut self, e: IniError) -> IniError {
        self.error = Some(e);
        e
    }
}

/// Fill `buf` from `file`, stopping early only at end of file
fn read_full<F: Read>(file: &mut F, buf: &mut [u8]) -> Result<usize, IniError> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(_) => return Err(IniError::FileNotOpen),
        }
    }
    Ok(filled)
}

/// Length of `line` without a trailing carriage return
fn strip_cr(line: &[u8]) -> usize {
    match line.last() {
        Some(b'\r') => line.len() - 1,
        _ => line.len(),
    }
}

/// Narrow `range` of `line` to exclude surrounding ASCII whitespace
fn trim(line: &[u8], range: Range<usize>) -> Range<usize> {
    let mut start = range.start;
    let mut end = range.end;
    while start < end && line[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && line[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    start..end
}

fn classify(line: &[u8]) -> Line {
    let body = trim(line, 0..line.len());
    let Some(&first) = line.get(body.start).filter(|_| !body.is_empty()) else {
        return Line::Ignored;
    };

    match first {
        b';' | b'#' => Line::Ignored,
        b'[' => match line[body.clone()].iter().position(|&b| b == b']') {
            Some(close) => Line::Section(trim(line, body.start + 1..body.start + close)),
            None => Line::Ignored,
        },
        _ => match line[body.clone()].iter().position(|&b| b == b'=') {
            Some(eq) => {
                let key = trim(line, body.start..body.start + eq);
                if key.is_empty() {
                    return Line::Ignored;
                }
                Line::Entry {
                    key,
                    value: trim(line, body.start + eq + 1..body.end),
                }
            }
            None => Line::Ignored,
        },
    }
}

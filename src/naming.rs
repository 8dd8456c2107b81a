//! Resolution of the file which holds a given slice of a raw volume.
//!
//! A volume can be stored in a single file, in a series of files named
//! after a printf-style template, or in an explicit list of files. The
//! three schemes are mutually exclusive and are represented by the variants
//! of [`FileNaming`].
//!
//! # File name templates
//!
//! Templates follow the familiar printf conventions. The template must
//! contain exactly one numeric conversion (`%d`, `%i`, `%u`, `%x`, `%X` or
//! `%o`), which receives the slice number, and may contain one string
//! conversion (`%s`) before it, which receives the file prefix. Flags
//! (`-`, `0`, `+`, space), a field width and a precision are understood,
//! so `"%s.%03d"` with the prefix `"image"` yields `image.000`,
//! `image.001`, and so on. `%%` produces a literal percent sign.
//!
//! [`FileNaming`]: ./enum.FileNaming.html
use crate::error::{RawVolumeError, Result};
use std::fmt;
use std::path::PathBuf;

/// The file naming scheme of a raw volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNaming {
    /// All slices come from the same file.
    Single(PathBuf),
    /// One file per slice, named after a template.
    Pattern(FilePattern),
    /// An explicit, ordered list of files, indexed from zero.
    List(Vec<PathBuf>),
}

impl FileNaming {
    /// Resolve the path of the file holding the given slice.
    ///
    /// # Errors
    ///
    /// - `RawVolumeError::FileIndexOutOfBounds` if a list of file names is
    ///   used and the slice index does not refer to one of its entries.
    pub fn resolve(&self, slice: i32) -> Result<PathBuf> {
        match self {
            FileNaming::Single(path) => Ok(path.clone()),
            FileNaming::Pattern(pattern) => Ok(pattern.path(slice)),
            FileNaming::List(paths) => {
                if slice < 0 {
                    return Err(RawVolumeError::FileIndexOutOfBounds(slice, paths.len()));
                }
                paths
                    .get(slice as usize)
                    .cloned()
                    .ok_or(RawVolumeError::FileIndexOutOfBounds(slice, paths.len()))
            }
        }
    }
}

/// Resolve the path of the file holding the given slice, failing if no
/// naming scheme was configured.
pub fn resolve_file_name(naming: Option<&FileNaming>, slice: i32) -> Result<PathBuf> {
    naming
        .ok_or(RawVolumeError::NoFileName)
        .and_then(|naming| naming.resolve(slice))
}

impl fmt::Display for FileNaming {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileNaming::Single(path) => write!(f, "file {}", path.display()),
            FileNaming::Pattern(pattern) => write!(f, "{}", pattern),
            FileNaming::List(paths) => {
                write!(f, "list of {} files", paths.len())?;
                if let (Some(first), Some(last)) = (paths.first(), paths.last()) {
                    write!(f, " ({} .. {})", first.display(), last.display())?;
                }
                Ok(())
            }
        }
    }
}

/// A file name template for series of files, one per slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePattern {
    prefix: Option<String>,
    template: String,
    segments: Vec<Segment>,
    slice_offset: i32,
    slice_spacing: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Decimal,
    Unsigned,
    LowerHex,
    UpperHex,
    Octal,
    Text,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placeholder {
    flags: Flags,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// Template applied when only a prefix is given.
pub const DEFAULT_FILE_PATTERN: &str = "%s.%d";

impl Default for FilePattern {
    fn default() -> Self {
        let plain = |conversion| {
            Segment::Placeholder(Placeholder {
                flags: Flags::default(),
                width: 0,
                precision: None,
                conversion,
            })
        };
        FilePattern {
            prefix: None,
            template: DEFAULT_FILE_PATTERN.to_string(),
            segments: vec![
                plain(Conversion::Text),
                Segment::Literal(".".to_string()),
                plain(Conversion::Decimal),
            ],
            slice_offset: 0,
            slice_spacing: 1,
        }
    }
}

impl FilePattern {
    /// Parse and validate a file name template.
    ///
    /// # Errors
    ///
    /// - `RawVolumeError::InvalidFilePattern` if the template contains an
    ///   unknown conversion, no numeric conversion, more than one of either
    ///   kind, or a string conversion after the numeric one.
    pub fn new<S: Into<String>>(template: S) -> Result<Self> {
        let template = template.into();
        let segments = parse_template(&template)?;
        Ok(FilePattern {
            template,
            segments,
            ..FilePattern::default()
        })
    }

    /// The default template (`"%s.%d"`) with the given prefix.
    pub fn with_default_template<S: Into<String>>(prefix: S) -> Self {
        FilePattern {
            prefix: Some(prefix.into()),
            ..FilePattern::default()
        }
    }

    /// Set the file prefix, substituted at the string conversion.
    pub fn prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the number added to every slice number.
    pub fn slice_offset(mut self, offset: i32) -> Self {
        self.slice_offset = offset;
        self
    }

    /// Set the factor applied to the slice index before the offset.
    pub fn slice_spacing(mut self, spacing: i32) -> Self {
        self.slice_spacing = spacing;
        self
    }

    /// Retrieve the file prefix, if any.
    pub fn get_prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Retrieve the template string.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Retrieve the slice number offset.
    pub fn get_slice_offset(&self) -> i32 {
        self.slice_offset
    }

    /// Retrieve the slice number spacing.
    pub fn get_slice_spacing(&self) -> i32 {
        self.slice_spacing
    }

    /// Whether the template contains a string conversion for the prefix.
    pub fn has_prefix_placeholder(&self) -> bool {
        self.segments.iter().any(|s| match s {
            Segment::Placeholder(p) => p.conversion == Conversion::Text,
            Segment::Literal(_) => false,
        })
    }

    /// The number given to the template for the slice with index `slice`.
    pub fn slice_number(&self, slice: i32) -> i64 {
        i64::from(slice) * i64::from(self.slice_spacing) + i64::from(self.slice_offset)
    }

    /// Produce the file name of the slice with index `slice`.
    ///
    /// # Example
    ///
    /// ```
    /// # use rawvol::FilePattern;
    /// let pattern = FilePattern::new("%s/img%03d.raw")?
    ///     .prefix("scan")
    ///     .slice_offset(1);
    /// assert_eq!(pattern.file_name(0), "scan/img001.raw");
    /// assert_eq!(pattern.file_name(41), "scan/img042.raw");
    /// # Ok::<(), rawvol::RawVolumeError>(())
    /// ```
    pub fn file_name(&self, slice: i32) -> String {
        let number = self.slice_number(slice);
        let prefix = self.prefix.as_deref().unwrap_or("");
        let mut out = String::with_capacity(self.template.len() + prefix.len() + 10);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(p) if p.conversion == Conversion::Text => {
                    format_text(&mut out, prefix, p)
                }
                Segment::Placeholder(p) => format_number(&mut out, number, p),
            }
        }
        out
    }

    /// Produce the file name of the slice with index `slice` as a path.
    pub fn path(&self, slice: i32) -> PathBuf {
        PathBuf::from(self.file_name(slice))
    }
}

impl fmt::Display for FilePattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "pattern {:?} (prefix {:?}, slice offset {}, slice spacing {})",
            self.template,
            self.prefix.as_deref().unwrap_or(""),
            self.slice_offset,
            self.slice_spacing
        )
    }
}

/// Largest field width or precision accepted in a template.
const MAX_FIELD_WIDTH: usize = 4096;

fn parse_template(template: &str) -> Result<Vec<Segment>> {
    let invalid = |reason| RawVolumeError::InvalidFilePattern(template.to_string(), reason);
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut numeric = 0;
    let mut text = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            let _ = chars.next();
            literal.push('%');
            continue;
        }

        let mut flags = Flags::default();
        while let Some(&f) = chars.peek() {
            match f {
                '-' => flags.left = true,
                '0' => flags.zero = true,
                '+' => flags.plus = true,
                ' ' => flags.space = true,
                '#' => {}
                _ => break,
            }
            let _ = chars.next();
        }
        let width = parse_digits(&mut chars).unwrap_or(0);
        let precision = if chars.peek() == Some(&'.') {
            let _ = chars.next();
            Some(parse_digits(&mut chars).unwrap_or(0))
        } else {
            None
        };
        if width > MAX_FIELD_WIDTH || precision.map_or(false, |p| p > MAX_FIELD_WIDTH) {
            return Err(invalid("field width or precision is too large"));
        }
        // length modifiers carry no meaning here
        while let Some(&c) = chars.peek() {
            if !matches!(c, 'h' | 'l' | 'z' | 'j' | 't') {
                break;
            }
            let _ = chars.next();
        }
        let conversion = match chars.next() {
            Some('d') | Some('i') => Conversion::Decimal,
            Some('u') => Conversion::Unsigned,
            Some('x') => Conversion::LowerHex,
            Some('X') => Conversion::UpperHex,
            Some('o') => Conversion::Octal,
            Some('s') => Conversion::Text,
            Some(_) => return Err(invalid("unsupported conversion")),
            None => return Err(invalid("incomplete conversion at end of template")),
        };
        if conversion == Conversion::Text {
            if numeric > 0 {
                return Err(invalid("the string conversion must precede the numeric one"));
            }
            text += 1;
            if text > 1 {
                return Err(invalid("more than one string conversion"));
            }
        } else {
            numeric += 1;
            if numeric > 1 {
                return Err(invalid("more than one numeric conversion"));
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(Placeholder {
            flags,
            width,
            precision,
            conversion,
        }));
    }

    if numeric == 0 {
        return Err(invalid("a numeric conversion for the slice number is required"));
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

fn parse_digits<I>(chars: &mut std::iter::Peekable<I>) -> Option<usize>
where
    I: Iterator<Item = char>,
{
    let mut value: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        let _ = chars.next();
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(d as usize));
    }
    value
}

fn pad(out: &mut String, n: usize, c: char) {
    out.extend(std::iter::repeat(c).take(n));
}

fn format_text(out: &mut String, text: &str, p: &Placeholder) {
    let text: String = match p.precision {
        Some(max) => text.chars().take(max).collect(),
        None => text.to_string(),
    };
    let fill = p.width.saturating_sub(text.chars().count());
    if p.flags.left {
        out.push_str(&text);
        pad(out, fill, ' ');
    } else {
        pad(out, fill, ' ');
        out.push_str(&text);
    }
}

fn format_number(out: &mut String, number: i64, p: &Placeholder) {
    // unsigned conversions see the value as a 32 bit unsigned integer
    let (sign, mut digits) = match p.conversion {
        Conversion::Decimal => {
            let sign = if number < 0 {
                "-"
            } else if p.flags.plus {
                "+"
            } else if p.flags.space {
                " "
            } else {
                ""
            };
            (sign, number.unsigned_abs().to_string())
        }
        Conversion::Unsigned => ("", (number as u32).to_string()),
        Conversion::LowerHex => ("", format!("{:x}", number as u32)),
        Conversion::UpperHex => ("", format!("{:X}", number as u32)),
        Conversion::Octal => ("", format!("{:o}", number as u32)),
        Conversion::Text => ("", String::new()),
    };
    if let Some(precision) = p.precision {
        if precision == 0 && number == 0 {
            digits.clear();
        } else if digits.len() < precision {
            digits.insert_str(0, &"0".repeat(precision - digits.len()));
        }
    }

    let len = sign.len() + digits.len();
    let fill = p.width.saturating_sub(len);
    if p.flags.left {
        out.push_str(sign);
        out.push_str(&digits);
        pad(out, fill, ' ');
    } else if p.flags.zero && p.precision.is_none() {
        out.push_str(sign);
        pad(out, fill, '0');
        out.push_str(&digits);
    } else {
        pad(out, fill, ' ');
        out.push_str(sign);
        out.push_str(&digits);
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_file_name, FileNaming, FilePattern};
    use crate::error::RawVolumeError;
    use std::path::PathBuf;

    #[test]
    fn default_pattern() {
        let pattern = FilePattern::with_default_template("vol");
        assert_eq!(pattern.template(), "%s.%d");
        assert_eq!(pattern.file_name(0), "vol.0");
        assert_eq!(pattern.file_name(2), "vol.2");
        assert_eq!(pattern, FilePattern::new("%s.%d").unwrap().prefix("vol"));
    }

    #[test]
    fn offset_and_spacing() {
        let pattern = FilePattern::new("%s.%03d")
            .unwrap()
            .prefix("image")
            .slice_offset(1)
            .slice_spacing(2);
        assert_eq!(pattern.slice_number(0), 1);
        assert_eq!(pattern.file_name(0), "image.001");
        assert_eq!(pattern.file_name(5), "image.011");
        assert_eq!(pattern.file_name(-3), "image.-05");
    }

    #[test]
    fn number_only_template_ignores_prefix() {
        let pattern = FilePattern::new("slice_%04d.raw").unwrap().prefix("ignored");
        assert!(!pattern.has_prefix_placeholder());
        assert_eq!(pattern.file_name(7), "slice_0007.raw");
    }

    #[test]
    fn missing_prefix_is_empty() {
        let pattern = FilePattern::new("%s/data_%d").unwrap();
        assert!(pattern.has_prefix_placeholder());
        assert_eq!(pattern.file_name(3), "/data_3");
    }

    #[test]
    fn formatting_flags() {
        let name = |t: &str, n: i32| FilePattern::new(t).unwrap().file_name(n);
        assert_eq!(name("%5d", 42), "   42");
        assert_eq!(name("%-5d|", 42), "42   |");
        assert_eq!(name("%+d", 42), "+42");
        assert_eq!(name("% d", 42), " 42");
        assert_eq!(name("%05d", -42), "-0042");
        assert_eq!(name("%.3d", 7), "007");
        assert_eq!(name("%x", 255), "ff");
        assert_eq!(name("%X", 255), "FF");
        assert_eq!(name("%o", 8), "10");
        assert_eq!(name("%u", 12), "12");
        assert_eq!(name("%ld", 12), "12");
        assert_eq!(name("100%% %d", 1), "100% 1");
        assert_eq!(
            FilePattern::new("[%-6s][%6s]%d").unwrap().prefix("ab").file_name(0),
            "[ab    ][    ab]0"
        );
        assert_eq!(
            FilePattern::new("%.2s%d").unwrap().prefix("abcdef").file_name(9),
            "ab9"
        );
    }

    #[test]
    fn invalid_templates() {
        for t in &["image", "%s", "%d%d", "%s%s%d", "%d%s", "%f", "%d%", "%q%d"] {
            let e = FilePattern::new(*t).expect_err(t);
            assert!(e.is_configuration_error());
        }
        for t in &["%99999999999999999999999d", "%4097d", "%.4097d", "%5000s%d", "%s.%.99999u"] {
            let e = FilePattern::new(*t).expect_err(t);
            assert!(matches!(e, RawVolumeError::InvalidFilePattern(_, _)), "{}", t);
        }
        let widest = FilePattern::new("%4096d").unwrap();
        assert_eq!(widest.file_name(7).len(), 4096);
    }

    #[test]
    fn resolve_modes() {
        let single = FileNaming::Single(PathBuf::from("volume.raw"));
        assert_eq!(single.resolve(0).unwrap(), PathBuf::from("volume.raw"));
        assert_eq!(single.resolve(99).unwrap(), PathBuf::from("volume.raw"));

        let list = FileNaming::List(vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(list.resolve(0).unwrap(), PathBuf::from("a"));
        assert_eq!(list.resolve(1).unwrap(), PathBuf::from("b"));
        assert!(list.resolve(2).is_err());
        assert!(list.resolve(-1).is_err());

        let pattern = FileNaming::Pattern(FilePattern::with_default_template("vol"));
        assert_eq!(pattern.resolve(1).unwrap(), PathBuf::from("vol.1"));

        assert!(resolve_file_name(None, 0).is_err());
        assert_eq!(
            resolve_file_name(Some(&pattern), 2).unwrap(),
            PathBuf::from("vol.2")
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let naming = FileNaming::Pattern(
            FilePattern::new("%s-%02d.img").unwrap().prefix("ct").slice_offset(3),
        );
        for slice in 0..20 {
            assert_eq!(naming.resolve(slice).unwrap(), naming.resolve(slice).unwrap());
        }
        assert_eq!(naming.resolve(0).unwrap(), PathBuf::from("ct-03.img"));
    }
}

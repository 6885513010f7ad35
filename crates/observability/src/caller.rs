//! Caller identification.
//!
//! A [`CallSite`] is captured where a logging macro is expanded, so it always
//! names the direct caller of the entry point. [`CallSite::tag`] turns it into
//! the `"<package>/<filename> - <function> : <line>"` string written under the
//! `caller` key.

use core::fmt;
use std::panic::Location;

/// Name of the marker item declared by `call_site!`.
const MARKER: &str = "__call_site";

const UNKNOWN: &str = "unknown";
const CLOSURE: &str = "{{closure}}";

/// Raw source location of a logging call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CallSite<'a> {
    function: &'a str,
    file: &'a str,
    line: u32,
}

impl<'a> CallSite<'a> {
    /// `function` is a fully qualified path such as `app::users::create`.
    pub const fn new(function: &'a str, file: &'a str, line: u32) -> Self {
        Self { function, file, line }
    }

    /// A call site known only by file and line.
    pub fn from_location(location: &'a Location<'a>) -> Self {
        Self::new("", location.file(), location.line())
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn tag(&self) -> CallerTag {
        let (package, function) =
            split_function_path(self.function).unwrap_or_else(|| (UNKNOWN.into(), UNKNOWN.into()));
        let file = file_name(self.file).unwrap_or(UNKNOWN);
        CallerTag(format!("{package}/{file} - {function} : {}", self.line))
    }
}

/// Rendered caller string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerTag(String);

impl CallerTag {
    /// Placeholder used when nothing about the caller could be recovered.
    pub fn unknown() -> Self {
        Self(format!("{UNKNOWN}/{UNKNOWN} - {UNKNOWN} : 0"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Captures the [`CallSite`] of the enclosing function.
///
/// The function path comes from the type name of a marker `fn` declared in the
/// caller's body, e.g. `app::users::create::__call_site`.
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __call_site() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        $crate::CallSite::new(type_name_of(__call_site), file!(), line!())
    }};
}

/// Splits a fully qualified function path into `(package, function)`.
///
/// Returns `None` when no function segment survives.
pub(crate) fn split_function_path(path: &str) -> Option<(String, String)> {
    let mut segments = split_segments(path.trim());
    if segments.last() == Some(&MARKER) {
        segments.pop();
    }
    while segments.last() == Some(&CLOSURE) {
        segments.pop();
    }

    let function = segments.pop().map(strip_generics).filter(|s| !s.is_empty())?;
    let package = segments
        .pop()
        .map(strip_decoration)
        .filter(|s| !s.is_empty())
        .unwrap_or(function);
    Some((package.to_string(), function.to_string()))
}

/// Splits on `::`, ignoring separators nested in `<...>`.
fn split_segments(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&path[start..]);
    segments.retain(|s| !s.is_empty());
    segments
}

/// Reduces `<impl a::Foo<T>>`, `<a::Foo as a::Bar>` or `&mut Foo` to `Foo`.
fn strip_decoration(segment: &str) -> &str {
    let mut s = segment.trim();
    if let Some(inner) = s.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        s = inner;
    }
    if let Some(rest) = s.strip_prefix("impl ") {
        s = rest;
    }
    if let Some((self_ty, _trait)) = s.split_once(" as ") {
        s = self_ty;
    }
    s = s.trim_matches(|c: char| matches!(c, '(' | ')' | '*' | '&' | ' '));
    if let Some(rest) = s.strip_prefix("mut ") {
        s = rest;
    }
    let s = strip_generics(s);
    split_segments(s).last().copied().unwrap_or("")
}

fn strip_generics(segment: &str) -> &str {
    match segment.find('<') {
        Some(0) | None => segment,
        Some(idx) => &segment[..idx],
    }
}

fn file_name(path: &str) -> Option<&str> {
    path.rsplit(['/', '\\']).next().filter(|name| !name.is_empty())
}

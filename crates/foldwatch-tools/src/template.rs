//! Placeholder substitution for user-authored commands.
//!
//! A template is a shell command line in which the following tokens are
//! replaced in a single left-to-right pass:
//!
//! | Token    | Replacement                                   |
//! |----------|-----------------------------------------------|
//! | `{}`     | the file path, shell-quoted when needed       |
//! | `{name}` | the file name without its extension           |
//! | `{ext}`  | the extension including the leading dot       |
//! | `{dir}`  | the containing directory                      |
//!
//! Inserted values are never scanned again, so a file name that itself
//! contains `{dir}` or `{name}` is passed through as written. Any other
//! brace is copied verbatim.
//!
//! Only `{}` is quoted. The expanded string is meant to be run through a
//! shell interpreter so templates can use `&&`, pipes and their own quoting.

use std::path::Path;

/// Substitution values for one file.
///
/// # Example
///
/// ```
/// use foldwatch_tools::TemplateContext;
/// use std::path::Path;
///
/// let ctx = TemplateContext::for_file(Path::new("/tmp/x/photo.jpg"));
///
/// assert_eq!(ctx.substitute("{dir}/{name}{ext}"), "/tmp/x/photo.jpg");
/// assert_eq!(
///     ctx.substitute("cwebp {} -o {dir}/{name}.webp"),
///     "cwebp /tmp/x/photo.jpg -o /tmp/x/photo.webp"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    file: String,
    name: String,
    ext: String,
    dir: String,
}

impl TemplateContext {
    /// Build the substitution values for `path`.
    pub fn for_file(path: &Path) -> Self {
        let file = shell_quote(&path.to_string_lossy());
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let dir = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        Self {
            file,
            name,
            ext,
            dir,
        }
    }

    /// Substitute the tokens in `template`.
    pub fn substitute(&self, template: &str) -> String {
        let tokens: [(&str, &str); 4] = [
            ("{}", &self.file),
            ("{name}", &self.name),
            ("{ext}", &self.ext),
            ("{dir}", &self.dir),
        ];

        let mut out = String::with_capacity(template.len() + self.file.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            rest = &rest[start..];

            match tokens.iter().find(|(token, _)| rest.starts_with(*token)) {
                Some((token, value)) => {
                    out.push_str(value);
                    rest = &rest[token.len()..];
                }
                None => {
                    out.push('{');
                    rest = &rest[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// Expand `template` against `file`.
pub fn expand(template: &str, file: &Path) -> String {
    TemplateContext::for_file(file).substitute(template)
}

/// Quote `s` for a POSIX shell if it contains anything outside a safe set.
///
/// ```
/// use foldwatch_tools::template::shell_quote;
///
/// assert_eq!(shell_quote("/in/a.png"), "/in/a.png");
/// assert_eq!(shell_quote("/in/my photo.png"), "'/in/my photo.png'");
/// assert_eq!(shell_quote("it's"), r"'it'\''s'");
/// ```
pub fn shell_quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '/' | '.' | '_' | '-' | '+' | ',' | ':' | '@' | '%' | '='
                )
        });

    if safe {
        return s.to_string();
    }

    format!("'{}'", s.replace('\'', r"'\''"))
}

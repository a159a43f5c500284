use super::Dialect;
use crate::error::{OrmError, Result};
use crate::value::Value;

/// A caller-supplied filter fragment for `SELECT ... WHERE`.
///
/// The fragment is inserted into the statement as written, so it must never
/// be built from untrusted input. Values belong in [`bind`](Predicate::bind)
/// arguments, referenced with `?` markers; they are renumbered for dialects
/// that use `$n`. Markers inside quoted strings or identifiers are left alone,
/// and `??` stands for a literal `?`. The number of markers must match the
/// number of bound arguments.
///
/// ```rust
/// use deckhand::Predicate;
///
/// let adults = Predicate::new("age >= ? AND username <> ?").bind(18i32).bind("admin");
/// assert_eq!(adults.params().len(), 2);
///
/// let everyone: Predicate = "id > 0".into();
/// assert!(everyone.params().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    sql: String,
    params: Vec<Value>,
}

impl Predicate {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Appends the argument for the next `?` placeholder.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// The fragment with its markers in the placeholder form of `dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::Formatting`] when the marker count differs from
    /// the number of bound arguments.
    pub(crate) fn render(&self, dialect: Dialect) -> Result<String> {
        let numbered = dialect.numbered_placeholders();
        let ident_quote = dialect.identifier_quote();
        let mut out = String::with_capacity(self.sql.len() + self.params.len() * 2);
        let mut chars = self.sql.chars().peekable();
        let mut quote: Option<char> = None;
        let mut markers = 0;

        while let Some(c) = chars.next() {
            if let Some(open) = quote {
                if c == open {
                    quote = None;
                }
                out.push(c);
                continue;
            }
            match c {
                '\'' => {
                    quote = Some(c);
                    out.push(c);
                }
                c if c == ident_quote => {
                    quote = Some(c);
                    out.push(c);
                }
                '?' if chars.next_if_eq(&'?').is_some() => {
                    // `?` builders collapse `??` themselves.
                    out.push_str(if numbered { "?" } else { "??" });
                }
                '?' => {
                    markers += 1;
                    if numbered {
                        out.push('$');
                        out.push_str(&markers.to_string());
                    } else {
                        out.push('?');
                    }
                }
                _ => out.push(c),
            }
        }

        if markers != self.params.len() {
            return Err(OrmError::Formatting(format!(
                "predicate `{}` has {markers} marker(s) but {} bound argument(s)",
                self.sql,
                self.params.len()
            )));
        }
        Ok(out)
    }
}

impl From<&str> for Predicate {
    fn from(sql: &str) -> Self {
        Predicate::new(sql)
    }
}

impl From<String> for Predicate {
    fn from(sql: String) -> Self {
        Predicate::new(sql)
    }
}

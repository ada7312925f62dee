use std::cmp::Ordering;
use std::fmt;

/// A JavaScript string value.
///
/// Strings in this crate only ever originate from Rust `&str`, so they are stored as UTF-8 and
/// lone surrogate code units cannot occur.
#[derive(Clone)]
pub struct JsString {
  text: Box<str>,
}

impl JsString {
  pub(crate) fn new(text: &str) -> Self {
    Self { text: text.into() }
  }

  pub fn as_str(&self) -> &str {
    &self.text
  }

  pub fn len(&self) -> usize {
    self.text.len()
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }
}

impl PartialEq for JsString {
  fn eq(&self, other: &Self) -> bool {
    self.text == other.text
  }
}

impl Eq for JsString {}

impl PartialOrd for JsString {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for JsString {
  fn cmp(&self, other: &Self) -> Ordering {
    self.text.cmp(&other.text)
  }
}

impl fmt::Debug for JsString {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(&self.text, f)
  }
}

// ABOUTME: Tag event source for sitekit: a streaming, tolerant HTML tokenizer.
// ABOUTME: Re-exports the tokenizer, TagSink trait, entity decoding and whitespace helpers.

//! Streaming HTML tag events without building a DOM.
//!
//! Implement [`TagSink`] and hand it to [`tokenize`] to receive start tags,
//! end tags and text in document order.
//!
//! ```
//! use sitekit_html::{tokenize, Attributes, TagSink};
//!
//! #[derive(Default)]
//! struct LinkCounter(usize);
//!
//! impl TagSink for LinkCounter {
//!     fn start_tag(&mut self, name: &str, _attrs: &Attributes) {
//!         if name == "a" {
//!             self.0 += 1;
//!         }
//!     }
//!     fn end_tag(&mut self, _name: &str) {}
//!     fn text(&mut self, _chunk: &str) {}
//! }
//!
//! let mut counter = LinkCounter::default();
//! tokenize(r#"<p><a href="/">home</a> <A HREF="/about">about</A></p>"#, &mut counter);
//! assert_eq!(counter.0, 2);
//! ```

pub mod entities;
mod entity_table;
pub mod text;
pub mod tokenizer;

pub use entities::decode_entities;
pub use text::{char_len, collapse_whitespace, flatten_chunks};
pub use tokenizer::{events, tokenize, Attributes, TagEvent, TagSink};
